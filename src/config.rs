use clap::Parser;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ── Constants ─────────────────────────────────────────────────────────────────

pub const APP_NAME: &str = "hourglass";

pub const DEFAULT_VOLUME: u8 = 70;
pub const DEFAULT_ACCENT: &str = "#667eea";

pub const DAYS_OF_WEEK: [&str; 7] = [
    "Dimanche", "Lundi", "Mardi", "Mercredi", "Jeudi", "Vendredi", "Samedi",
];
pub const DAY_HEADERS: [&str; 7] = ["Dim", "Lun", "Mar", "Mer", "Jeu", "Ven", "Sam"];
pub const MONTHS_OF_YEAR: [&str; 12] = [
    "Janvier", "Février", "Mars", "Avril", "Mai", "Juin",
    "Juillet", "Août", "Septembre", "Octobre", "Novembre", "Décembre",
];

/// The loading screen finishes on its own after this long.
pub const LOADING_AUTO_FINISH: Duration = Duration::from_secs(5);
/// Simulated typing delay before a character answers, in milliseconds.
pub const CHAT_REPLY_DELAY_MS: RangeInclusive<u64> = 1000..=3000;
/// Number of flash items shown in the calendar mini-feed.
pub const FLASH_FEED_LEN: usize = 3;

pub const HEADER_TITLE: &str = "HOURGLASS SOCIETY";

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Parser)]
#[command(name = "hourglass", version, about = "Hourglass Society terminal desktop")]
pub struct Cli {
    /// Directory holding the JSON content documents.
    #[arg(long, env = "HOURGLASS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory for preferences and the log file.
    #[arg(long, env = "HOURGLASS_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Skip the loading screen.
    #[arg(long)]
    pub no_boot: bool,

    /// Panel opened once loading finishes.
    #[arg(long, default_value = "home")]
    pub panel: String,
}

// ── Paths ─────────────────────────────────────────────────────────────────────

pub fn base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub data_dir: PathBuf,
    pub config_dir: PathBuf,
}

impl Paths {
    pub fn resolve(cli: &Cli) -> Self {
        let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
        let config_dir = cli.config_dir.clone().unwrap_or_else(default_config_dir);
        let _ = std::fs::create_dir_all(&config_dir);
        Self { data_dir, config_dir }
    }

    pub fn prefs_file(&self) -> PathBuf {
        self.config_dir.join("preferences.json")
    }

    pub fn log_file(&self) -> PathBuf {
        self.config_dir.join(format!("{APP_NAME}.log"))
    }
}

fn default_data_dir() -> PathBuf {
    let beside_exe = base_dir().join("data");
    if beside_exe.is_dir() {
        beside_exe
    } else {
        PathBuf::from("data")
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(APP_NAME))
        .unwrap_or_else(base_dir)
}

// ── JSON helpers ──────────────────────────────────────────────────────────────

pub fn load_json<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> T {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

pub fn save_json<T: Serialize>(path: &Path, value: &T) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dirs_win_over_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let cli = Cli {
            data_dir: Some(tmp.path().join("content")),
            config_dir: Some(tmp.path().join("cfg")),
            no_boot: true,
            panel: "home".into(),
        };
        let paths = Paths::resolve(&cli);
        assert_eq!(paths.data_dir, tmp.path().join("content"));
        assert!(paths.config_dir.is_dir());
        assert_eq!(paths.prefs_file(), tmp.path().join("cfg").join("preferences.json"));
        assert_eq!(paths.log_file(), tmp.path().join("cfg").join("hourglass.log"));
    }

    #[test]
    fn cli_defaults_to_home_panel() {
        let cli = Cli::parse_from(["hourglass"]);
        assert_eq!(cli.panel, "home");
        assert!(!cli.no_boot);
    }

    #[test]
    fn load_json_falls_back_to_default_on_garbage() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let map: serde_json::Map<String, serde_json::Value> = load_json(&path);
        assert!(map.is_empty());
    }
}
