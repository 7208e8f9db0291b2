use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Where timestamped draft snapshots live. Falls back to a local
    /// `drafts/` directory when no home can be resolved.
    pub fn drafts_dir() -> PathBuf {
        ProjectDirs::from("", "", "skriv")
            .map(|pd| pd.data_local_dir().join("drafts"))
            .unwrap_or_else(|| PathBuf::from("drafts"))
    }

    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "skriv")
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("skriv_config.json"))
    }

    /// Per-session summary log
    pub fn session_log_path() -> PathBuf {
        ProjectDirs::from("", "", "skriv")
            .map(|pd| pd.config_dir().join("log.csv"))
            .unwrap_or_else(|| PathBuf::from("skriv_log.csv"))
    }
}
