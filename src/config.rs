use crate::app_dirs::AppDirs;
use crate::game::{Difficulty, GameMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Frame interval for the stopwatch display
    pub tick_rate_ms: u64,
    /// Pause between the final round and the result screen
    pub result_delay_ms: u64,
    /// Starting life for endless mode, in seconds
    pub endless_life: f64,
    /// Difficulty of the last fixed game, used when replaying it
    pub default_difficulty: Difficulty,
    /// Mode the title screen's enter key replays
    pub last_mode: Option<GameMode>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: 16,
            result_delay_ms: 1000,
            endless_life: 1.0,
            default_difficulty: Difficulty::Normal,
            last_mode: None,
        }
    }
}

impl Config {
    /// Drop values that would break the game and fall back to defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Config::default();
        if self.tick_rate_ms == 0 {
            self.tick_rate_ms = defaults.tick_rate_ms;
        }
        if !(self.endless_life.is_finite() && self.endless_life > 0.0) {
            self.endless_life = defaults.endless_life;
        }
        self
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("justime_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg.sanitized(),
                Err(e) => log::warn!("ignoring malformed config {}: {e}", self.path.display()),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
