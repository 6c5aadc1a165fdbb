use directories::ProjectDirs;
use std::path::PathBuf;

pub const APP_NAME: &str = "digit-span";

/// Default event log location, relative to the working directory
pub const DEFAULT_EVENT_LOG: &str = "digit_span_data.csv";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join(APP_NAME),
            )
        } else {
            ProjectDirs::from("", "", APP_NAME)
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    /// Where tracing output goes while the terminal is in the alternate screen
    pub fn diagnostics_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("diagnostics.log"))
    }

    pub fn config_path() -> PathBuf {
        if let Some(pd) = ProjectDirs::from("", "", APP_NAME) {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("digit_span_config.json")
        }
    }
}
