use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "justime";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// `$HOME/.local/state/justime`, or the platform data-local dir
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join(APP_NAME),
            )
        } else {
            ProjectDirs::from("", "", APP_NAME).map(|pd| pd.data_local_dir().to_path_buf())
        }
    }

    pub fn score_path() -> Option<PathBuf> {
        Self::state_dir().map(|d| d.join("score.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|d| d.join("justime.log"))
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|pd| pd.config_dir().join("config.json"))
    }
}
