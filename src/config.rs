use directories::{BaseDirs, ProjectDirs};
use ratatui::style::Color;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::sources;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub sources: SourceConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GeneralConfig {
    /// Terminal emulator to use instead of searching `terminals`.
    #[serde(default)]
    pub terminal: Option<String>,
    #[serde(default = "default_terminals")]
    pub terminals: Vec<String>,
    #[serde(default = "default_true")]
    pub prefer_terminal_for_terminal_entries: bool,
}

fn default_true() -> bool { true }

fn default_terminals() -> Vec<String> {
    ["kitty", "alacritty", "st", "xterm", "urxvt", "gnome-terminal", "konsole"]
        .iter()
        .map(|t| t.to_string())
        .collect()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            terminal: None,
            terminals: default_terminals(),
            prefer_terminal_for_terminal_entries: true,
        }
    }
}

impl GeneralConfig {
    /// Terminal preference list, the explicit override first.
    pub fn terminal_preferences(&self) -> Vec<String> {
        self.terminal
            .iter()
            .chain(self.terminals.iter())
            .cloned()
            .collect()
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct SourceConfig {
    /// Replaces the default applications search path when set.
    #[serde(default)]
    pub paths: Option<Vec<String>>,
}

impl SourceConfig {
    pub fn search_paths(&self) -> Vec<PathBuf> {
        match &self.paths {
            Some(paths) => paths.iter().map(|p| expand_home(p)).collect(),
            None => sources::default_paths(),
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(base_dirs) = BaseDirs::new() {
            return base_dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(path)
}

#[derive(Deserialize, Debug, Clone)]
pub struct ThemeConfig {
    #[serde(default = "default_prompt")]
    pub prompt: String,
    #[serde(default = "default_exec")]
    pub exec: String,
    #[serde(default = "default_status_fg")]
    pub status_fg: String,
    #[serde(default = "default_status_bg")]
    pub status_bg: String,
}

fn default_prompt() -> String { "yellow".to_string() }
fn default_exec() -> String { "magenta".to_string() }
fn default_status_fg() -> String { "white".to_string() }
fn default_status_bg() -> String { "black".to_string() }

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            exec: default_exec(),
            status_fg: default_status_fg(),
            status_bg: default_status_bg(),
        }
    }
}

impl ThemeConfig {
    /// Accepts color names and `#rrggbb`; anything else is the terminal default.
    pub fn parse_color(value: &str) -> Color {
        Color::from_str(value).unwrap_or(Color::Reset)
    }
}

pub fn default_config_path() -> PathBuf {
    match ProjectDirs::from("org", "tlaunch", "tlaunch") {
        Some(dirs) => dirs.config_dir().join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

/// Loads `path`, or the default location when `None`. A missing file is
/// not an error and yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);

    if !config_path.exists() {
        log::debug!("No config at {:?}, using defaults", config_path);
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
        path: config_path.clone(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: config_path,
        source,
    })
}
