//! Persisted user preferences.
//!
//! A small key-value medium (a JSON object on disk) behind [`KeyValueStore`],
//! and [`Preferences`], which knows the fixed set of keys and their defaults.
//! Reads never fail: a missing or unreadable value yields the default.

use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::warn;

use crate::color::AccentColor;
use crate::config::{load_json, save_json, DEFAULT_ACCENT, DEFAULT_VOLUME};
use crate::error::PrefError;

// ── Storage medium ────────────────────────────────────────────────────────────

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefError>;
    fn remove(&mut self, key: &str) -> Result<(), PrefError>;
}

/// JSON object on disk, written through on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl FileStore {
    /// Opens `path`; a missing or corrupt file reads as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_json(&path);
        Self { path, entries }
    }

    fn persist(&self) -> Result<(), PrefError> {
        save_json(&self.path, &self.entries)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.entries.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefError> {
        self.entries.insert(key.to_string(), Value::String(value.to_string()));
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), PrefError> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: std::collections::BTreeMap<String, String>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PrefError> {
        self.entries.remove(key);
        Ok(())
    }
}

// ── Keys ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefKey {
    WallpaperIndex,
    WallpaperLocked,
    AccentColor,
    Volume,
}

impl PrefKey {
    pub const ALL: [PrefKey; 4] = [
        PrefKey::WallpaperIndex,
        PrefKey::WallpaperLocked,
        PrefKey::AccentColor,
        PrefKey::Volume,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PrefKey::WallpaperIndex => "selectedWallpaper",
            PrefKey::WallpaperLocked => "wallpaperLocked",
            PrefKey::AccentColor => "accentColor",
            PrefKey::Volume => "musicVolume",
        }
    }

    pub fn default_value(self) -> String {
        match self {
            PrefKey::WallpaperIndex => "0".to_string(),
            PrefKey::WallpaperLocked => "false".to_string(),
            PrefKey::AccentColor => DEFAULT_ACCENT.to_string(),
            PrefKey::Volume => DEFAULT_VOLUME.to_string(),
        }
    }
}

// ── Typed facade ──────────────────────────────────────────────────────────────

pub struct Preferences {
    store: Box<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self { store: Box::new(store) }
    }

    /// Stored value for `key`, or its documented default.
    pub fn get(&self, key: PrefKey) -> String {
        self.store
            .get(key.key())
            .unwrap_or_else(|| key.default_value())
    }

    pub fn set(&mut self, key: PrefKey, value: &str) {
        if let Err(err) = self.store.set(key.key(), value) {
            warn!(key = key.key(), error = %err, "could not persist preference");
        }
    }

    pub fn reset(&mut self, key: PrefKey) {
        if let Err(err) = self.store.remove(key.key()) {
            warn!(key = key.key(), error = %err, "could not reset preference");
        }
    }

    fn parsed<T: std::str::FromStr>(&self, key: PrefKey, fallback: T) -> T {
        let raw = self.get(key);
        raw.trim().parse().unwrap_or_else(|_| {
            warn!(key = key.key(), value = %raw, "unparsable preference, using default");
            fallback
        })
    }

    pub fn wallpaper_index(&self) -> usize {
        self.parsed(PrefKey::WallpaperIndex, 0)
    }

    pub fn set_wallpaper_index(&mut self, index: usize) {
        self.set(PrefKey::WallpaperIndex, &index.to_string());
    }

    pub fn wallpaper_locked(&self) -> bool {
        self.parsed(PrefKey::WallpaperLocked, false)
    }

    pub fn set_wallpaper_locked(&mut self, locked: bool) {
        self.set(PrefKey::WallpaperLocked, &locked.to_string());
    }

    pub fn accent_color(&self) -> AccentColor {
        self.parsed(PrefKey::AccentColor, AccentColor::DEFAULT)
    }

    pub fn set_accent_color(&mut self, color: AccentColor) {
        self.set(PrefKey::AccentColor, &color.to_string());
    }

    pub fn reset_accent_color(&mut self) {
        self.reset(PrefKey::AccentColor);
    }

    /// Volume level, 0–100.
    pub fn volume(&self) -> u8 {
        let level: i64 = self.parsed(PrefKey::Volume, i64::from(DEFAULT_VOLUME));
        level.clamp(0, 100) as u8
    }

    pub fn set_volume(&mut self, level: u8) {
        self.set(PrefKey::Volume, &level.min(100).to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_accent_color_yields_documented_default() {
        let prefs = Preferences::new(MemoryStore::default());
        assert_eq!(prefs.get(PrefKey::AccentColor), DEFAULT_ACCENT);
        assert_eq!(prefs.accent_color(), AccentColor::DEFAULT);
    }

    #[test]
    fn every_key_has_a_usable_default() {
        let prefs = Preferences::new(MemoryStore::default());
        for key in PrefKey::ALL {
            assert_eq!(prefs.get(key), key.default_value());
        }
        assert_eq!(prefs.wallpaper_index(), 0);
        assert!(!prefs.wallpaper_locked());
        assert_eq!(prefs.volume(), DEFAULT_VOLUME);
    }

    #[test]
    fn corrupt_values_degrade_to_defaults() {
        let mut store = MemoryStore::default();
        store.set("accentColor", "not-a-colour").unwrap();
        store.set("musicVolume", "loud").unwrap();
        store.set("selectedWallpaper", "-3").unwrap();
        let prefs = Preferences::new(store);
        assert_eq!(prefs.accent_color(), AccentColor::DEFAULT);
        assert_eq!(prefs.volume(), DEFAULT_VOLUME);
        assert_eq!(prefs.wallpaper_index(), 0);
    }

    #[test]
    fn volume_is_clamped() {
        let mut store = MemoryStore::default();
        store.set("musicVolume", "250").unwrap();
        let mut prefs = Preferences::new(store);
        assert_eq!(prefs.volume(), 100);
        prefs.set_volume(130);
        assert_eq!(prefs.get(PrefKey::Volume), "100");
    }

    #[test]
    fn reset_accent_restores_default() {
        let mut prefs = Preferences::new(MemoryStore::default());
        let coral = AccentColor { r: 0xff, g: 0x6b, b: 0x6b };
        prefs.set_accent_color(coral);
        assert_eq!(prefs.accent_color(), coral);
        prefs.reset_accent_color();
        assert_eq!(prefs.accent_color(), AccentColor::DEFAULT);
    }

    #[test]
    fn file_store_survives_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("preferences.json");
        {
            let mut prefs = Preferences::new(FileStore::open(&path));
            prefs.set_wallpaper_index(2);
            prefs.set_wallpaper_locked(true);
            prefs.set_volume(40);
        }
        let prefs = Preferences::new(FileStore::open(&path));
        assert_eq!(prefs.wallpaper_index(), 2);
        assert!(prefs.wallpaper_locked());
        assert_eq!(prefs.volume(), 40);
    }

    #[test]
    fn file_store_reads_non_string_json_values() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("preferences.json");
        std::fs::write(&path, r#"{ "musicVolume": 55, "wallpaperLocked": true }"#).unwrap();
        let prefs = Preferences::new(FileStore::open(&path));
        assert_eq!(prefs.volume(), 55);
        assert!(prefs.wallpaper_locked());
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("preferences.json");
        std::fs::write(&path, "][").unwrap();
        let prefs = Preferences::new(FileStore::open(&path));
        assert_eq!(prefs.accent_color(), AccentColor::DEFAULT);
    }
}
