//! Static content documents and the repository that holds them.
//!
//! Each document is read and parsed independently on its own loader thread;
//! outcomes arrive over a channel and are applied once. A collection is
//! `Pending` until its outcome arrives, then `Loaded` or `Failed`.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::ContentError;

// ── Records ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: u32,
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub time: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub character_id: Option<u32>,
    #[serde(default)]
    pub character_name: String,
}

impl Event {
    pub fn day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub availability: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default, alias = "specialties")]
    pub specialites: Vec<String>,
    #[serde(default)]
    pub stats: BTreeMap<String, u32>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub quote: String,
    #[serde(default)]
    pub video_wallpaper: Option<String>,
}

impl Character {
    pub fn is_online(&self) -> bool {
        self.availability == "En ligne"
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub zones: Vec<Zone>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, alias = "description")]
    pub summary: String,
    #[serde(default)]
    pub full_description: String,
    #[serde(default)]
    pub details: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Top of the catalog hierarchy. Older documents list projects directly in
/// `items`; newer ones nest them under `subcategories`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
    #[serde(default)]
    pub items: Vec<Project>,
}

impl ProjectCategory {
    pub fn project_count(&self) -> usize {
        let nested: usize = self.subcategories.iter().map(|s| s.projects.len()).sum();
        nested + self.items.len()
    }

    /// Every project in display order, paired with its subcategory name.
    pub fn projects(&self) -> Vec<(Option<&str>, &Project)> {
        let mut out: Vec<(Option<&str>, &Project)> = self
            .subcategories
            .iter()
            .flat_map(|s| s.projects.iter().map(move |p| (Some(s.name.as_str()), p)))
            .collect();
        out.extend(self.items.iter().map(|p| (None, p)));
        out
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub url: String,
    /// Seconds, when the document knows it.
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashNews {
    pub title: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub urgent: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommanderMessage {
    pub title: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub audio_url: String,
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallpaperKind {
    #[default]
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallpaper {
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "type", default)]
    pub kind: WallpaperKind,
}

/// Renders a free-form JSON detail value without quotes around strings.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ── Documents ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Document {
    Events,
    Characters,
    Locations,
    Projects,
    Playlist,
    Flash,
    Commander,
    Wallpapers,
}

impl Document {
    pub const ALL: [Document; 8] = [
        Document::Events,
        Document::Characters,
        Document::Locations,
        Document::Projects,
        Document::Playlist,
        Document::Flash,
        Document::Commander,
        Document::Wallpapers,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Document::Events => "events.json",
            Document::Characters => "characters.json",
            Document::Locations => "locations.json",
            Document::Projects => "projects-hierarchy.json",
            Document::Playlist => "playlist.json",
            Document::Flash => "flash.json",
            Document::Commander => "commander.json",
            Document::Wallpapers => "wallpapers.json",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Document::Events => "Événements",
            Document::Characters => "Membres",
            Document::Locations => "Lieux",
            Document::Projects => "Projets",
            Document::Playlist => "Playlist",
            Document::Flash => "Flash info",
            Document::Commander => "Messages du Commandant",
            Document::Wallpapers => "Fonds d'écran",
        }
    }

    /// Object keys under which the record list may be wrapped.
    fn envelope_keys(self) -> &'static [&'static str] {
        match self {
            Document::Events => &["events"],
            Document::Characters => &["characters"],
            Document::Locations => &["locations"],
            Document::Projects => &["categories"],
            Document::Playlist => &["tracks"],
            Document::Flash => &["news", "dailyNews"],
            Document::Commander => &["messages"],
            Document::Wallpapers => &["wallpapers"],
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Events(Vec<Event>),
    Characters(Vec<Character>),
    Locations(Vec<Location>),
    Projects(Vec<ProjectCategory>),
    Playlist(Vec<Track>),
    Flash(Vec<FlashNews>),
    Commander(Vec<CommanderMessage>),
    Wallpapers(Vec<Wallpaper>),
}

#[derive(Debug)]
pub struct LoadOutcome {
    pub document: Document,
    pub result: Result<Payload, ContentError>,
}

pub fn parse_document(document: Document, raw: &str) -> Result<Payload, ContentError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|source| ContentError::Parse { document, source })?;
    let list = unwrap_envelope(document, value)?;
    Ok(match document {
        Document::Events => Payload::Events(decode(document, list)?),
        Document::Characters => Payload::Characters(decode(document, list)?),
        Document::Locations => Payload::Locations(decode(document, list)?),
        Document::Projects => Payload::Projects(decode(document, list)?),
        Document::Playlist => Payload::Playlist(decode(document, list)?),
        Document::Flash => Payload::Flash(decode(document, list)?),
        Document::Commander => Payload::Commander(decode(document, list)?),
        Document::Wallpapers => Payload::Wallpapers(decode(document, list)?),
    })
}

fn unwrap_envelope(document: Document, value: Value) -> Result<Value, ContentError> {
    match value {
        Value::Array(_) => Ok(value),
        Value::Object(mut map) => document
            .envelope_keys()
            .iter()
            .find_map(|k| map.remove(*k))
            .ok_or_else(|| shape_error(document)),
        _ => Err(shape_error(document)),
    }
}

fn shape_error(document: Document) -> ContentError {
    ContentError::Shape {
        document,
        expected: document.envelope_keys().join(" | "),
    }
}

fn decode<T: DeserializeOwned>(document: Document, list: Value) -> Result<Vec<T>, ContentError> {
    serde_json::from_value(list).map_err(|source| ContentError::Parse { document, source })
}

// ── Sources ───────────────────────────────────────────────────────────────────

pub trait ContentSource: Send + Sync + 'static {
    fn read(&self, document: Document) -> Result<String, ContentError>;
}

/// Reads documents from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ContentSource for DirSource {
    fn read(&self, document: Document) -> Result<String, ContentError> {
        std::fs::read_to_string(self.root.join(document.file_name()))
            .map_err(|source| ContentError::Io { document, source })
    }
}

pub fn load_document(source: &dyn ContentSource, document: Document) -> LoadOutcome {
    let result = source
        .read(document)
        .and_then(|raw| parse_document(document, &raw));
    LoadOutcome { document, result }
}

/// Starts one loader thread per document. The receiver yields exactly one
/// outcome per document, in completion order.
pub fn spawn_loader(source: Arc<dyn ContentSource>) -> Receiver<LoadOutcome> {
    let (tx, rx) = mpsc::channel();
    for document in Document::ALL {
        let tx = tx.clone();
        let source = Arc::clone(&source);
        std::thread::spawn(move || {
            let _ = tx.send(load_document(source.as_ref(), document));
        });
    }
    rx
}

// ── Repository ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Pending,
    Loaded(Vec<T>),
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Pending
    }
}

impl<T> LoadState<T> {
    /// Loaded records; empty while pending or after a failure.
    pub fn items(&self) -> &[T] {
        match self {
            LoadState::Loaded(items) => items,
            LoadState::Pending | LoadState::Failed(_) => &[],
        }
    }

    pub fn status(&self) -> LoadStatus {
        match self {
            LoadState::Pending => LoadStatus::Pending,
            LoadState::Loaded(items) => LoadStatus::Loaded(items.len()),
            LoadState::Failed(_) => LoadStatus::Failed,
        }
    }

    fn failure(&self) -> Option<&str> {
        match self {
            LoadState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Pending,
    Loaded(usize),
    Failed,
}

impl LoadStatus {
    pub fn is_settled(self) -> bool {
        !matches!(self, LoadStatus::Pending)
    }
}

#[derive(Debug, Default)]
pub struct ContentRepository {
    events: LoadState<Event>,
    characters: LoadState<Character>,
    locations: LoadState<Location>,
    projects: LoadState<ProjectCategory>,
    playlist: LoadState<Track>,
    flash: LoadState<FlashNews>,
    commander: LoadState<CommanderMessage>,
    wallpapers: LoadState<Wallpaper>,
}

impl ContentRepository {
    /// Applies a loader outcome. Returns false when the document was already
    /// settled; documents load once per session.
    pub fn apply(&mut self, outcome: LoadOutcome) -> bool {
        let document = outcome.document;
        if self.status(document).is_settled() {
            debug!(%document, "ignoring repeated load outcome");
            return false;
        }
        match outcome.result {
            Ok(payload) => {
                let records = self.store(payload);
                debug!(%document, records, "content document loaded");
            }
            Err(err) => {
                warn!(%document, error = %err, "content document failed to load");
                let reason = err.to_string();
                match document {
                    Document::Events => self.events = LoadState::Failed(reason),
                    Document::Characters => self.characters = LoadState::Failed(reason),
                    Document::Locations => self.locations = LoadState::Failed(reason),
                    Document::Projects => self.projects = LoadState::Failed(reason),
                    Document::Playlist => self.playlist = LoadState::Failed(reason),
                    Document::Flash => self.flash = LoadState::Failed(reason),
                    Document::Commander => self.commander = LoadState::Failed(reason),
                    Document::Wallpapers => self.wallpapers = LoadState::Failed(reason),
                }
            }
        }
        true
    }

    fn store(&mut self, payload: Payload) -> usize {
        match payload {
            Payload::Events(v) => {
                let n = v.len();
                self.events = LoadState::Loaded(v);
                n
            }
            Payload::Characters(v) => {
                let n = v.len();
                self.characters = LoadState::Loaded(v);
                n
            }
            Payload::Locations(v) => {
                let n = v.len();
                self.locations = LoadState::Loaded(v);
                n
            }
            Payload::Projects(v) => {
                let n = v.len();
                self.projects = LoadState::Loaded(v);
                n
            }
            Payload::Playlist(v) => {
                let n = v.len();
                self.playlist = LoadState::Loaded(v);
                n
            }
            Payload::Flash(v) => {
                let n = v.len();
                self.flash = LoadState::Loaded(v);
                n
            }
            Payload::Commander(v) => {
                let n = v.len();
                self.commander = LoadState::Loaded(v);
                n
            }
            Payload::Wallpapers(v) => {
                let n = v.len();
                self.wallpapers = LoadState::Loaded(v);
                n
            }
        }
    }

    pub fn status(&self, document: Document) -> LoadStatus {
        match document {
            Document::Events => self.events.status(),
            Document::Characters => self.characters.status(),
            Document::Locations => self.locations.status(),
            Document::Projects => self.projects.status(),
            Document::Playlist => self.playlist.status(),
            Document::Flash => self.flash.status(),
            Document::Commander => self.commander.status(),
            Document::Wallpapers => self.wallpapers.status(),
        }
    }

    pub fn failure(&self, document: Document) -> Option<&str> {
        match document {
            Document::Events => self.events.failure(),
            Document::Characters => self.characters.failure(),
            Document::Locations => self.locations.failure(),
            Document::Projects => self.projects.failure(),
            Document::Playlist => self.playlist.failure(),
            Document::Flash => self.flash.failure(),
            Document::Commander => self.commander.failure(),
            Document::Wallpapers => self.wallpapers.failure(),
        }
    }

    pub fn all_settled(&self) -> bool {
        Document::ALL.iter().all(|d| self.status(*d).is_settled())
    }

    pub fn events(&self) -> &[Event] {
        self.events.items()
    }

    pub fn characters(&self) -> &[Character] {
        self.characters.items()
    }

    pub fn locations(&self) -> &[Location] {
        self.locations.items()
    }

    pub fn projects(&self) -> &[ProjectCategory] {
        self.projects.items()
    }

    pub fn playlist(&self) -> &[Track] {
        self.playlist.items()
    }

    pub fn flash_news(&self) -> &[FlashNews] {
        self.flash.items()
    }

    pub fn commander_messages(&self) -> &[CommanderMessage] {
        self.commander.items()
    }

    pub fn wallpapers(&self) -> &[Wallpaper] {
        self.wallpapers.items()
    }

    pub fn character(&self, id: u32) -> Option<&Character> {
        self.characters().iter().find(|c| c.id == id)
    }

    pub fn event(&self, id: u32) -> Option<&Event> {
        self.events().iter().find(|e| e.id == id)
    }

    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations().iter().find(|l| l.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&ProjectCategory> {
        self.projects().iter().find(|c| c.id == id)
    }

    pub fn events_on(&self, date: NaiveDate) -> Vec<&Event> {
        self.events()
            .iter()
            .filter(|e| e.day() == Some(date))
            .collect()
    }
}
