//! The running desktop: owns every piece of session state and maps keys to
//! navigation and panel actions.

use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::rngs::StdRng;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::accordion::Accordion;
use crate::calendar::{days_in_month, CalendarView};
use crate::chat::ChatBook;
use crate::color::{AccentColor, Theme};
use crate::content::{ContentRepository, Document, LoadOutcome, LoadStatus, WallpaperKind};
use crate::media::{BackgroundVideo, CommanderAudio, MusicPlayer};
use crate::nav::{ChromeIcon, HookError, HookRunner, InitHook, NavError, Navigator, PanelId};
use crate::panels::{self, catalog::CatalogRow, home::HomeEntry};
use crate::prefs::Preferences;
use crate::status::clock_hm;
use crate::ui::{ListCursor, Term};

const VOLUME_STEP: u8 = 10;

// ── View state ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsSection {
    #[default]
    Wallpapers,
    Accent,
    Music,
    Video,
}

impl SettingsSection {
    pub const ALL: [SettingsSection; 4] = [
        SettingsSection::Wallpapers,
        SettingsSection::Accent,
        SettingsSection::Music,
        SettingsSection::Video,
    ];

    pub fn next(self) -> Self {
        match self {
            SettingsSection::Wallpapers => SettingsSection::Accent,
            SettingsSection::Accent => SettingsSection::Music,
            SettingsSection::Music => SettingsSection::Video,
            SettingsSection::Video => SettingsSection::Wallpapers,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SettingsSection::Wallpapers => "Fonds d'écran",
            SettingsSection::Accent => "Couleur d'accent",
            SettingsSection::Music => "Musique",
            SettingsSection::Video => "Vidéo d'arrière-plan",
        }
    }
}

/// Per-panel cursors and selections.
#[derive(Debug)]
pub struct Views {
    pub home: ListCursor,
    pub commander_open: bool,
    pub commander: ListCursor,
    pub commander_acc: Accordion,

    pub calendar: CalendarView,
    pub day_events: ListCursor,
    pub event: Option<u32>,

    pub members: ListCursor,
    pub character: Option<u32>,
    pub chat_input: String,

    pub lieux: ListCursor,
    pub lieux_acc: Accordion,
    pub location: Option<String>,
    pub zones: ListCursor,
    pub zones_acc: Accordion,

    pub catalog: ListCursor,
    pub catalog_acc: Accordion,
    /// Category index and index into its flattened project list.
    pub project: Option<(usize, usize)>,

    pub settings: SettingsSection,
    pub wallpapers: ListCursor,
    pub accents: ListCursor,
    pub tracks: ListCursor,
    pub wallpaper: Option<usize>,

    pub flash: ListCursor,
    pub carte: ListCursor,
    pub carte_acc: Accordion,

    /// Scroll offset for long detail pages.
    pub scroll: u16,
}

impl Views {
    fn new(today: NaiveDate) -> Self {
        Self {
            home: ListCursor::default(),
            commander_open: false,
            commander: ListCursor::default(),
            commander_acc: Accordion::default(),
            calendar: CalendarView::starting_at(today),
            day_events: ListCursor::default(),
            event: None,
            members: ListCursor::default(),
            character: None,
            chat_input: String::new(),
            lieux: ListCursor::default(),
            lieux_acc: Accordion::default(),
            location: None,
            zones: ListCursor::default(),
            zones_acc: Accordion::default(),
            catalog: ListCursor::default(),
            catalog_acc: Accordion::default(),
            project: None,
            settings: SettingsSection::default(),
            wallpapers: ListCursor::default(),
            accents: ListCursor::default(),
            tracks: ListCursor::default(),
            wallpaper: None,
            flash: ListCursor::default(),
            carte: ListCursor::default(),
            carte_acc: Accordion::default(),
            scroll: 0,
        }
    }
}

// ── Shell ─────────────────────────────────────────────────────────────────────

/// Everything except navigation. Runs init hooks for the navigator.
pub struct Shell {
    pub content: ContentRepository,
    pub prefs: Preferences,
    pub theme: Theme,
    pub music: MusicPlayer,
    pub commander: CommanderAudio,
    pub video: BackgroundVideo,
    pub chat: ChatBook,
    pub views: Views,
    pub today: NaiveDate,
    rng: StdRng,
}

impl Shell {
    pub fn new(prefs: Preferences, today: NaiveDate, rng: StdRng) -> Self {
        let theme = Theme::from_accent(prefs.accent_color());
        let music = MusicPlayer::new(prefs.volume());
        Self {
            content: ContentRepository::default(),
            prefs,
            theme,
            music,
            commander: CommanderAudio::default(),
            video: BackgroundVideo::default(),
            chat: ChatBook::default(),
            views: Views::new(today),
            today,
            rng,
        }
    }

    /// Refreshes state that depends on a freshly loaded document.
    pub fn content_arrived(&mut self, document: Document) {
        match document {
            Document::Playlist => self.music.set_playlist_len(self.content.playlist().len()),
            Document::Wallpapers => self.apply_saved_wallpaper(),
            Document::Events
            | Document::Characters
            | Document::Locations
            | Document::Projects
            | Document::Flash
            | Document::Commander => {}
        }
    }

    fn apply_saved_wallpaper(&mut self) {
        let count = self.content.wallpapers().len();
        if count == 0 {
            return;
        }
        let saved = self.prefs.wallpaper_index();
        self.apply_wallpaper(if saved < count { saved } else { 0 });
    }

    /// Makes wallpaper `index` the background and remembers the choice.
    pub fn apply_wallpaper(&mut self, index: usize) {
        let Some(wallpaper) = self.content.wallpapers().get(index) else {
            return;
        };
        match wallpaper.kind {
            WallpaperKind::Video => self.video.load(wallpaper.url.clone()),
            WallpaperKind::Image => self.video.clear(),
        }
        self.views.wallpaper = Some(index);
        self.prefs.set_wallpaper_index(index);
        debug!(index, title = %wallpaper.title, "wallpaper applied");
    }

    /// Selects the character shown by `characterDetail`. A character with a
    /// video wallpaper takes over the background unless it is locked.
    pub fn select_character(&mut self, id: u32) -> bool {
        let Some(character) = self.content.character(id) else {
            return false;
        };
        if let Some(video) = &character.video_wallpaper {
            if !self.prefs.wallpaper_locked() {
                self.video.load(video.clone());
            }
        }
        self.views.character = Some(id);
        true
    }

    pub fn open_chat(&mut self) -> bool {
        let Some(character) = self.views.character.and_then(|id| self.content.character(id)) else {
            return false;
        };
        self.chat.open(character, &clock_hm());
        self.views.chat_input.clear();
        true
    }

    pub fn send_chat(&mut self, now: Instant) {
        let Some(character) = self.views.character.and_then(|id| self.content.character(id)) else {
            return;
        };
        let text = std::mem::take(&mut self.views.chat_input);
        self.chat.send(character, &text, now, &clock_hm(), &mut self.rng);
    }

    pub fn set_accent(&mut self, color: AccentColor) {
        self.prefs.set_accent_color(color);
        self.theme = Theme::from_accent(color);
    }

    pub fn reset_accent(&mut self) {
        self.prefs.reset_accent_color();
        self.theme = Theme::from_accent(self.prefs.accent_color());
    }

    pub fn change_volume(&mut self, up: bool) {
        let level = if up {
            self.music.volume().saturating_add(VOLUME_STEP)
        } else {
            self.music.volume().saturating_sub(VOLUME_STEP)
        };
        self.music.set_volume(level);
        self.prefs.set_volume(self.music.volume());
    }

    pub fn change_track(&mut self, direction: i32) {
        self.music.change_track(direction, &mut self.rng);
    }

    /// Moves the calendar's selected day by `delta`, staying in the month.
    pub fn move_day(&mut self, delta: i32) {
        let cal = &mut self.views.calendar;
        let len = days_in_month(cal.year(), cal.month());
        let next = match cal.selected_day() {
            Some(day) => (day as i32 + delta).clamp(1, len as i32) as u32,
            None if (cal.year(), cal.month()) == (self.today.year(), self.today.month()) => {
                self.today.day()
            }
            None => 1,
        };
        cal.select_day(next);
        self.views.day_events.reset();
    }

    pub fn selected_day_events(&self) -> Vec<u32> {
        self.views
            .calendar
            .selected_date()
            .map(|date| self.content.events_on(date).iter().map(|e| e.id).collect())
            .unwrap_or_default()
    }

    pub fn tick(&mut self, elapsed: Duration, now: Instant) {
        let duration = self
            .music
            .current()
            .and_then(|i| self.content.playlist().get(i))
            .and_then(|t| t.duration);
        if self.music.tick(elapsed, duration, &mut self.rng) {
            debug!(track = ?self.music.current(), "track finished");
        }
        let messages = self.content.commander_messages();
        self.commander
            .tick(elapsed, |i| messages.get(i).and_then(|m| m.duration));
        self.video.tick(elapsed);
        if self.chat.poll(now, &clock_hm()) > 0 {
            debug!("chat reply delivered");
        }
    }

    fn require(&self, hook: InitHook, document: Document) -> Result<(), HookError> {
        match self.content.status(document) {
            LoadStatus::Failed => Err(HookError {
                hook,
                reason: self
                    .content
                    .failure(document)
                    .unwrap_or("document unavailable")
                    .to_string(),
            }),
            LoadStatus::Pending | LoadStatus::Loaded(_) => Ok(()),
        }
    }
}

impl HookRunner for Shell {
    fn run_hook(&mut self, hook: InitHook) -> Result<(), HookError> {
        match hook {
            InitHook::RebuildCalendar => {
                self.require(hook, Document::Events)?;
                self.views.calendar = CalendarView::starting_at(self.today);
                self.views.day_events.reset();
            }
            InitHook::RenderMembers => {
                self.require(hook, Document::Characters)?;
                let len = self.content.characters().len();
                if let Some(i) = self.views.members.get(len) {
                    self.views.members.set(i);
                }
            }
            InitHook::RenderCatalog => {
                self.require(hook, Document::Projects)?;
                if self.views.catalog_acc.open_index().map_or(false, |i| i >= self.content.projects().len()) {
                    self.views.catalog_acc.collapse();
                }
            }
            InitHook::RenderLocations => {
                self.require(hook, Document::Locations)?;
                self.views.lieux_acc.collapse();
            }
        }
        Ok(())
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    pub navigator: Navigator,
    pub shell: Shell,
    loader: Option<Receiver<LoadOutcome>>,
    last_tick: Instant,
    quit: bool,
}

impl App {
    pub fn new(shell: Shell, loader: Receiver<LoadOutcome>) -> Self {
        Self {
            navigator: Navigator::default(),
            shell,
            loader: Some(loader),
            last_tick: Instant::now(),
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Applies every load outcome received so far. Returns how many were new.
    pub fn drain_loader(&mut self) -> usize {
        let mut applied = 0;
        while let Some(rx) = &self.loader {
            match rx.try_recv() {
                Ok(outcome) => {
                    let document = outcome.document;
                    if self.shell.content.apply(outcome) {
                        self.shell.content_arrived(document);
                        applied += 1;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("content loader finished");
                    self.loader = None;
                }
            }
        }
        applied
    }

    pub fn open(&mut self, id: &str) -> Result<PanelId, NavError> {
        let panel = self.navigator.open(id, &mut self.shell)?;
        self.shell.views.scroll = 0;
        Ok(panel)
    }

    /// Transitions to `panel`; failures are logged by the navigator.
    pub fn go(&mut self, panel: PanelId) {
        if self.navigator.transition(panel, &mut self.shell).is_ok() {
            self.shell.views.scroll = 0;
        }
    }

    /// Returns to the home panel.
    pub fn close(&mut self) {
        if self.navigator.close(&mut self.shell).is_ok() {
            self.shell.views.scroll = 0;
        }
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.shell.tick(elapsed, now);
    }

    pub fn run(&mut self, terminal: &mut Term) -> Result<()> {
        while !self.should_quit() {
            self.drain_loader();
            self.shell.today = Local::now().date_naive();
            self.tick();
            terminal.draw(|f| panels::render(f, self))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
        }
        info!("session closed");
        Ok(())
    }

    // ── Keys ──────────────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }

        let active = self.navigator.active();
        if active == PanelId::Home && self.shell.views.commander_open {
            self.commander_key(key.code);
            return;
        }

        if let Some(icon) = footer_icon(key.code) {
            self.go(icon.target());
            return;
        }

        if active == PanelId::Chat {
            self.chat_key(key.code);
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.back();
                return;
            }
            KeyCode::Char('l') | KeyCode::Char('L')
                if self.navigator.chrome().floating_visible() =>
            {
                self.go(PanelId::Lieux);
                return;
            }
            KeyCode::Char('p') | KeyCode::Char('P')
                if self.navigator.chrome().floating_visible() =>
            {
                self.go(PanelId::EaNexus);
                return;
            }
            KeyCode::Char('q') if active == PanelId::Home => {
                self.quit = true;
                return;
            }
            _ => {}
        }

        match active {
            PanelId::Home => self.home_key(key.code),
            PanelId::Calendrier => self.calendar_key(key.code),
            PanelId::EventDetail => self.event_key(key.code),
            PanelId::Membres => self.members_key(key.code),
            PanelId::CharacterDetail => self.character_key(key.code),
            PanelId::Parametres => self.settings_key(key.code),
            PanelId::Lieux => self.lieux_key(key.code),
            PanelId::LocationDetail => self.location_key(key.code),
            PanelId::EaNexus => self.catalog_key(key.code),
            PanelId::ProjectDetail => self.scroll_key(key.code),
            PanelId::Flash => {
                let len = self.shell.content.flash_news().len();
                move_cursor(&mut self.shell.views.flash, key.code, len);
            }
            PanelId::Carte => self.carte_key(key.code),
            PanelId::Chat => {}
        }
    }

    fn back(&mut self) {
        let target = match self.navigator.active() {
            PanelId::CharacterDetail => PanelId::Membres,
            PanelId::Chat => {
                if let Some(id) = self.shell.views.character {
                    self.shell.select_character(id);
                }
                PanelId::CharacterDetail
            }
            PanelId::LocationDetail => PanelId::Lieux,
            PanelId::ProjectDetail => PanelId::EaNexus,
            PanelId::EventDetail => PanelId::Calendrier,
            PanelId::Home => return,
            _ => {
                self.close();
                return;
            }
        };
        self.go(target);
    }

    fn home_key(&mut self, code: KeyCode) {
        let entries = panels::home::HOME_ENTRIES;
        match code {
            KeyCode::Char('c') => self.open_commander(),
            KeyCode::Enter => {
                let Some(i) = self.shell.views.home.get(entries.len()) else {
                    return;
                };
                match entries[i] {
                    HomeEntry::Panel(panel) => self.go(panel),
                    HomeEntry::Commander => self.open_commander(),
                }
            }
            other => move_cursor(&mut self.shell.views.home, other, entries.len()),
        }
    }

    fn open_commander(&mut self) {
        let views = &mut self.shell.views;
        views.commander_open = true;
        views.commander.reset();
        views.commander_acc.collapse();
    }

    fn commander_key(&mut self, code: KeyCode) {
        let len = self.shell.content.commander_messages().len();
        let views = &mut self.shell.views;
        match code {
            KeyCode::Esc => {
                views.commander_open = false;
                self.shell.commander.stop_all();
            }
            KeyCode::Enter => {
                if let Some(i) = views.commander.get(len) {
                    views.commander_acc.toggle(i);
                }
            }
            KeyCode::Char(' ') => {
                if let Some(i) = views.commander.get(len) {
                    self.shell.commander.toggle(i);
                }
            }
            KeyCode::Char('s') => {
                if let Some(i) = views.commander.get(len) {
                    self.shell.commander.stop(i);
                }
            }
            other => move_cursor(&mut views.commander, other, len),
        }
    }

    fn calendar_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left => self.shell.move_day(-1),
            KeyCode::Right => self.shell.move_day(1),
            KeyCode::Up => self.shell.move_day(-7),
            KeyCode::Down => self.shell.move_day(7),
            KeyCode::PageUp | KeyCode::Char('<') => {
                self.shell.views.calendar.prev_month();
                self.shell.views.day_events.reset();
            }
            KeyCode::PageDown | KeyCode::Char('>') => {
                self.shell.views.calendar.next_month();
                self.shell.views.day_events.reset();
            }
            KeyCode::Enter => {
                let ids = self.shell.selected_day_events();
                if let Some(i) = self.shell.views.day_events.get(ids.len()) {
                    self.shell.views.event = Some(ids[i]);
                    self.go(PanelId::EventDetail);
                }
            }
            other => {
                let len = self.shell.selected_day_events().len();
                move_cursor(&mut self.shell.views.day_events, other, len);
            }
        }
    }

    fn event_key(&mut self, code: KeyCode) {
        let Some(event) = self.shell.views.event.and_then(|id| self.shell.content.event(id)) else {
            return;
        };
        match code {
            KeyCode::Char('c') => {
                if let Some(id) = event.character_id {
                    if self.shell.select_character(id) && self.shell.open_chat() {
                        self.go(PanelId::Chat);
                    }
                }
            }
            KeyCode::Char('v') => {
                let category = event.category.clone();
                if let Some(i) = self.shell.content.projects().iter().position(|c| c.id == category) {
                    if !self.shell.views.catalog_acc.is_open(i) {
                        self.shell.views.catalog_acc.toggle(i);
                    }
                    self.go(PanelId::EaNexus);
                }
            }
            other => self.scroll_key(other),
        }
    }

    fn members_key(&mut self, code: KeyCode) {
        let len = self.shell.content.characters().len();
        match code {
            KeyCode::Enter => {
                let Some(i) = self.shell.views.members.get(len) else {
                    return;
                };
                let id = self.shell.content.characters()[i].id;
                if self.shell.select_character(id) {
                    self.go(PanelId::CharacterDetail);
                }
            }
            other => move_cursor(&mut self.shell.views.members, other, len),
        }
    }

    fn character_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter | KeyCode::Char('m') => {
                if self.shell.open_chat() {
                    self.go(PanelId::Chat);
                }
            }
            other => self.scroll_key(other),
        }
    }

    fn chat_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.back(),
            KeyCode::Enter => self.shell.send_chat(Instant::now()),
            KeyCode::Backspace => {
                self.shell.views.chat_input.pop();
            }
            KeyCode::Char(c) if !c.is_control() => self.shell.views.chat_input.push(c),
            _ => {}
        }
    }

    fn settings_key(&mut self, code: KeyCode) {
        if code == KeyCode::Tab {
            self.shell.views.settings = self.shell.views.settings.next();
            return;
        }
        let shell = &mut self.shell;
        match shell.views.settings {
            SettingsSection::Wallpapers => {
                let len = shell.content.wallpapers().len();
                match code {
                    KeyCode::Enter => {
                        if let Some(i) = shell.views.wallpapers.get(len) {
                            shell.apply_wallpaper(i);
                        }
                    }
                    KeyCode::Char('x') => {
                        let locked = !shell.prefs.wallpaper_locked();
                        shell.prefs.set_wallpaper_locked(locked);
                    }
                    other => move_cursor(&mut shell.views.wallpapers, other, len),
                }
            }
            SettingsSection::Accent => {
                let presets = AccentColor::PRESETS;
                match code {
                    KeyCode::Enter => {
                        if let Some(i) = shell.views.accents.get(presets.len()) {
                            shell.set_accent(presets[i].1);
                        }
                    }
                    KeyCode::Char('r') => shell.reset_accent(),
                    other => move_cursor(&mut shell.views.accents, other, presets.len()),
                }
            }
            SettingsSection::Music => {
                let len = shell.content.playlist().len();
                match code {
                    KeyCode::Enter => {
                        if let Some(i) = shell.views.tracks.get(len) {
                            shell.music.select(i);
                            if !shell.music.is_playing() {
                                shell.music.toggle();
                            }
                        }
                    }
                    KeyCode::Char(' ') => shell.music.toggle(),
                    KeyCode::Char('s') => shell.music.stop(),
                    KeyCode::Char('n') => shell.change_track(1),
                    KeyCode::Char('b') => shell.change_track(-1),
                    KeyCode::Char('m') => {
                        let mode = shell.music.mode().next();
                        shell.music.set_mode(mode);
                    }
                    KeyCode::Char('+') => shell.change_volume(true),
                    KeyCode::Char('-') => shell.change_volume(false),
                    other => move_cursor(&mut shell.views.tracks, other, len),
                }
            }
            SettingsSection::Video => match code {
                KeyCode::Char(' ') | KeyCode::Enter => shell.video.toggle(),
                KeyCode::Char('s') => shell.video.stop(),
                _ => {}
            },
        }
    }

    fn lieux_key(&mut self, code: KeyCode) {
        let len = self.shell.content.locations().len();
        let Some(i) = self.shell.views.lieux.get(len) else {
            return;
        };
        match code {
            KeyCode::Char(' ') => self.shell.views.lieux_acc.toggle(i),
            KeyCode::Enter => {
                let id = self.shell.content.locations()[i].id.clone();
                let views = &mut self.shell.views;
                views.location = Some(id);
                views.zones.reset();
                views.zones_acc.collapse();
                self.go(PanelId::LocationDetail);
            }
            other => move_cursor(&mut self.shell.views.lieux, other, len),
        }
    }

    fn location_key(&mut self, code: KeyCode) {
        let len = self
            .shell
            .views
            .location
            .as_deref()
            .and_then(|id| self.shell.content.location(id))
            .map_or(0, |l| l.zones.len());
        let views = &mut self.shell.views;
        match code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(i) = views.zones.get(len) {
                    views.zones_acc.toggle(i);
                }
            }
            other => move_cursor(&mut views.zones, other, len),
        }
    }

    fn catalog_key(&mut self, code: KeyCode) {
        let rows = panels::catalog::catalog_rows(
            self.shell.content.projects(),
            &self.shell.views.catalog_acc,
        );
        match code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                let Some(i) = self.shell.views.catalog.get(rows.len()) else {
                    return;
                };
                match rows[i] {
                    CatalogRow::Category(c) => self.shell.views.catalog_acc.toggle(c),
                    CatalogRow::Project { category, project } => {
                        self.shell.views.project = Some((category, project));
                        self.go(PanelId::ProjectDetail);
                    }
                }
            }
            other => move_cursor(&mut self.shell.views.catalog, other, rows.len()),
        }
    }

    fn carte_key(&mut self, code: KeyCode) {
        let len = panels::map::MAP_ZONES.len();
        let views = &mut self.shell.views;
        match code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(i) = views.carte.get(len) {
                    views.carte_acc.toggle(i);
                }
            }
            other => move_cursor(&mut views.carte, other, len),
        }
    }

    fn scroll_key(&mut self, code: KeyCode) {
        let scroll = &mut self.shell.views.scroll;
        match code {
            KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
            _ => {}
        }
    }
}

fn footer_icon(code: KeyCode) -> Option<ChromeIcon> {
    match code {
        KeyCode::F(1) => Some(ChromeIcon::Home),
        KeyCode::F(2) => Some(ChromeIcon::Calendar),
        KeyCode::F(3) => Some(ChromeIcon::Members),
        KeyCode::F(4) => Some(ChromeIcon::Settings),
        _ => None,
    }
}

fn move_cursor(cursor: &mut ListCursor, code: KeyCode, len: usize) {
    match code {
        KeyCode::Up | KeyCode::Char('k') => cursor.up(),
        KeyCode::Down | KeyCode::Char('j') => cursor.down(len),
        KeyCode::Home => cursor.reset(),
        _ => {}
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::content::load_document;
    use crate::content::tests::{sample_source, MapSource};
    use crate::prefs::{MemoryStore, PrefKey};
    use rand::SeedableRng;
    use std::sync::mpsc;

    pub(crate) fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    pub(crate) fn test_app_with(source: &MapSource, prefs: Preferences) -> App {
        let (tx, rx) = mpsc::channel();
        for document in Document::ALL {
            tx.send(load_document(source, document)).unwrap();
        }
        drop(tx);
        let shell = Shell::new(prefs, today(), StdRng::seed_from_u64(11));
        let mut app = App::new(shell, rx);
        app.drain_loader();
        app
    }

    pub(crate) fn test_app(source: &MapSource) -> App {
        test_app_with(source, Preferences::new(MemoryStore::default()))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn loader_outcomes_are_applied_and_channel_released() {
        let mut app = test_app(&sample_source());
        assert!(app.shell.content.all_settled());
        assert_eq!(app.drain_loader(), 0);
        assert!(app.loader.is_none());
        assert_eq!(app.shell.music.current(), Some(0));
        assert_eq!(app.shell.views.wallpaper, Some(0));
    }

    #[test]
    fn footer_keys_reach_their_panels() {
        let mut app = test_app(&sample_source());
        press(&mut app, KeyCode::F(2));
        assert_eq!(app.navigator.active(), PanelId::Calendrier);
        assert!(app.navigator.chrome().is_highlighted(ChromeIcon::Calendar));
        assert!(!app.navigator.chrome().is_highlighted(ChromeIcon::Home));
        press(&mut app, KeyCode::F(4));
        assert_eq!(app.navigator.active(), PanelId::Parametres);
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.navigator.active(), PanelId::Home);
    }

    #[test]
    fn floating_buttons_ignored_while_hidden() {
        let mut app = test_app(&sample_source());
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.navigator.active(), PanelId::Lieux);
        assert!(!app.navigator.chrome().floating_visible());
        assert_eq!(app.navigator.chrome().highlighted(), None);
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.navigator.active(), PanelId::Lieux);
        press(&mut app, KeyCode::F(1));
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.navigator.active(), PanelId::EaNexus);
    }

    #[test]
    fn member_detail_and_back() {
        let mut app = test_app(&sample_source());
        press(&mut app, KeyCode::F(3));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.navigator.active(), PanelId::CharacterDetail);
        assert_eq!(app.shell.views.character, Some(2));
        assert!(app.navigator.chrome().is_highlighted(ChromeIcon::Members));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.navigator.active(), PanelId::Membres);
        assert!(app.navigator.chrome().is_highlighted(ChromeIcon::Members));
    }

    #[test]
    fn character_video_respects_wallpaper_lock() {
        let mut app = test_app(&sample_source());
        app.shell.apply_wallpaper(0);
        assert!(app.shell.select_character(1));
        assert_eq!(app.shell.video.source(), Some("videos/auteur.mp4"));

        app.shell.apply_wallpaper(0);
        app.shell.prefs.set_wallpaper_locked(true);
        assert!(app.shell.select_character(1));
        assert_eq!(app.shell.video.source(), None);
    }

    #[test]
    fn chat_round_trip() {
        let mut app = test_app(&sample_source());
        press(&mut app, KeyCode::F(3));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.navigator.active(), PanelId::Chat);
        assert_eq!(app.shell.chat.history(1).len(), 1);

        // letters that are shortcuts elsewhere are plain input here
        type_text(&mut app, "lpq");
        assert_eq!(app.navigator.active(), PanelId::Chat);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.shell.chat.history(1).len(), 2);
        assert!(app.shell.views.chat_input.is_empty());
        assert!(app.shell.chat.has_pending());

        app.shell.tick(Duration::ZERO, Instant::now() + Duration::from_secs(4));
        assert_eq!(app.shell.chat.history(1).len(), 3);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.navigator.active(), PanelId::CharacterDetail);
    }

    #[test]
    fn unknown_panel_keeps_current_one() {
        let mut app = test_app(&sample_source());
        press(&mut app, KeyCode::F(2));
        assert!(app.open("auteur").is_err());
        assert_eq!(app.navigator.active(), PanelId::Calendrier);
    }

    #[test]
    fn calendar_selects_day_and_opens_event() {
        let mut app = test_app(&sample_source());
        press(&mut app, KeyCode::F(2));
        press(&mut app, KeyCode::Right);
        assert_eq!(app.shell.views.calendar.selected_day(), Some(14));
        assert_eq!(app.shell.selected_day_events(), vec![1]);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.navigator.active(), PanelId::EventDetail);
        assert_eq!(app.shell.views.event, Some(1));

        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.navigator.active(), PanelId::Chat);
        assert_eq!(app.shell.views.character, Some(2));
    }

    #[test]
    fn event_detail_back_goes_to_calendar() {
        let mut app = test_app(&sample_source());
        app.shell.views.event = Some(2);
        app.go(PanelId::EventDetail);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.navigator.active(), PanelId::Calendrier);
    }

    #[test]
    fn esc_on_top_level_panel_closes_to_home() {
        let mut app = test_app(&sample_source());
        app.go(PanelId::Flash);
        app.shell.views.scroll = 3;
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.navigator.active(), PanelId::Home);
        assert!(app.navigator.is_visible(PanelId::Home));
        assert!(!app.navigator.is_visible(PanelId::Flash));
        assert_eq!(app.navigator.visible_count(), 1);
        assert_eq!(app.navigator.chrome().highlighted(), Some(ChromeIcon::Home));
        assert!(app.navigator.chrome().floating_visible());
        assert_eq!(app.shell.views.scroll, 0);
    }

    #[test]
    fn catalog_accordion_then_project_detail() {
        let mut app = test_app(&sample_source());
        press(&mut app, KeyCode::Char('p'));
        press(&mut app, KeyCode::Enter);
        assert!(app.shell.views.catalog_acc.is_open(0));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.navigator.active(), PanelId::ProjectDetail);
        assert_eq!(app.shell.views.project, Some((0, 0)));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.navigator.active(), PanelId::EaNexus);
    }

    #[test]
    fn location_detail_and_back() {
        let mut app = test_app(&sample_source());
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.navigator.active(), PanelId::LocationDetail);
        assert_eq!(app.shell.views.location.as_deref(), Some("nexus"));
        press(&mut app, KeyCode::Enter);
        assert!(app.shell.views.zones_acc.is_open(0));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.navigator.active(), PanelId::Lieux);
    }

    #[test]
    fn settings_persist_accent_wallpaper_and_volume() {
        let mut app = test_app(&sample_source());
        press(&mut app, KeyCode::F(4));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.shell.prefs.wallpaper_index(), 1);
        assert_eq!(app.shell.video.source(), Some("video/ocean.mp4"));

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        let chosen = AccentColor::PRESETS[1].1;
        assert_eq!(app.shell.prefs.accent_color(), chosen);
        assert_eq!(app.shell.theme, Theme::from_accent(chosen));
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.shell.prefs.accent_color(), AccentColor::DEFAULT);

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.shell.prefs.get(PrefKey::Volume), "80");
        press(&mut app, KeyCode::Char(' '));
        assert!(app.shell.music.is_playing());
    }

    #[test]
    fn saved_wallpaper_is_restored() {
        let mut store = MemoryStore::default();
        crate::prefs::KeyValueStore::set(&mut store, "selectedWallpaper", "1").unwrap();
        let app = test_app_with(&sample_source(), Preferences::new(store));
        assert_eq!(app.shell.views.wallpaper, Some(1));
        assert_eq!(app.shell.video.source(), Some("video/ocean.mp4"));
    }

    #[test]
    fn failed_documents_do_not_block_navigation() {
        let app_source = MapSource::default();
        let mut app = test_app(&app_source);
        for key in [KeyCode::F(3), KeyCode::F(2), KeyCode::Char('l')] {
            press(&mut app, key);
        }
        assert_eq!(app.navigator.active(), PanelId::Lieux);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.navigator.active(), PanelId::Lieux);
    }

    #[test]
    fn commander_modal_plays_one_message() {
        let mut app = test_app(&sample_source());
        press(&mut app, KeyCode::Char('c'));
        assert!(app.shell.views.commander_open);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.shell.commander.is_playing(0));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.shell.commander.is_playing(1));
        assert!(!app.shell.commander.is_playing(0));
        // F-keys do not escape the modal
        press(&mut app, KeyCode::F(2));
        assert_eq!(app.navigator.active(), PanelId::Home);
        press(&mut app, KeyCode::Esc);
        assert!(!app.shell.views.commander_open);
        assert!(!app.shell.commander.is_playing(1));
    }

    #[test]
    fn quit_only_from_home() {
        let mut app = test_app(&sample_source());
        press(&mut app, KeyCode::F(2));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit());
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.navigator.active(), PanelId::Home);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn ctrl_c_quits_anywhere() {
        let mut app = test_app(&sample_source());
        app.go(PanelId::Chat);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }
}
