use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::datetime::CalendarTz;
use crate::error::{Error, ErrorKind, Result};
use crate::model::Viewer;

const CONFIG_PATH_ENV_VAR: &str = "ROTA_CONFIG_FILE";

pub fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
        locations.push([dir.as_str(), "rota", "config.toml"].iter().collect());
    } else if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("rota").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".rota.toml"));
    }

    locations
}

fn default_fetch_delay_ms() -> u64 {
    1000
}

fn default_scroll_margin() -> usize {
    4
}

fn default_tick_rate_ms() -> u64 {
    500
}

fn default_viewer() -> Viewer {
    Viewer::new("staff1", false)
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Fixture file the calendar data is read from.
    #[serde(default)]
    pub data: Option<PathBuf>,
    #[serde(default)]
    pub timezone: CalendarTz,
    #[serde(default = "default_fetch_delay_ms")]
    pub fetch_delay_ms: u64,
    /// Distance in terminal rows to either end of the month window that
    /// triggers loading another month.
    #[serde(default = "default_scroll_margin")]
    pub scroll_margin: usize,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_viewer")]
    pub viewer: Viewer,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data: None,
            timezone: CalendarTz::default(),
            fetch_delay_ms: default_fetch_delay_ms(),
            scroll_margin: default_scroll_margin(),
            tick_rate_ms: default_tick_rate_ms(),
            viewer: default_viewer(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content).map_err(|e| {
            let msg = format!(
                "{} (in '{}')",
                e.message.as_deref().unwrap_or_default(),
                path.display()
            );
            e.with_msg(&msg)
        })?;

        // Relative data paths are taken relative to the config file
        if let (Some(data), Some(dir)) = (config.data.as_ref(), path.parent()) {
            if data.is_relative() {
                config.data = Some(dir.join(data));
            }
        }

        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::new(ErrorKind::ConfigParse, &e.to_string()))
    }

    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.fetch_delay_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

/// Loads `path` if given, otherwise the first existing file of
/// [`find_configfile_locations`], falling back to the defaults.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_file(path);
    }

    match find_configfile_locations().into_iter().find(|p| p.is_file()) {
        Some(path) => {
            log::info!("Using configuration '{}'", path.display());
            Config::from_file(&path)
        }
        None => {
            log::info!("No configuration file found, using defaults");
            Ok(Config::default())
        }
    }
}
