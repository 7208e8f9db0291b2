use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;

pub const MIN_SESSION_MINUTES: u64 = 1;
pub const MAX_SESSION_MINUTES: u64 = 120;
pub const MIN_WORD_GOAL: usize = 1;
pub const MAX_WORD_GOAL: usize = 10_000;
pub const MIN_AUTOSAVE_SECS: u64 = 10;
pub const MAX_AUTOSAVE_SECS: u64 = 600;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub session_minutes: u64,
    pub word_goal: usize,
    pub autosave_secs: u64,
    pub lock_backspace: bool,
    pub theme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session_minutes: 15,
            word_goal: 500,
            autosave_secs: 60,
            lock_backspace: true,
            theme: "white".to_string(),
        }
    }
}

impl Config {
    pub fn session_secs(&self) -> u64 {
        self.session_minutes * 60
    }

    /// Reject out-of-range values at the boundary; a failing config is
    /// never partially applied.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES).contains(&self.session_minutes) {
            return Err(ConfigError::SessionLength(self.session_minutes));
        }
        if !(MIN_WORD_GOAL..=MAX_WORD_GOAL).contains(&self.word_goal) {
            return Err(ConfigError::WordGoal(self.word_goal));
        }
        if !(MIN_AUTOSAVE_SECS..=MAX_AUTOSAVE_SECS).contains(&self.autosave_secs) {
            return Err(ConfigError::AutosaveInterval(self.autosave_secs));
        }
        if crate::theme::by_name(&self.theme).is_none() {
            return Err(ConfigError::UnknownTheme(self.theme.clone()));
        }
        Ok(())
    }
}

/// Invalid configuration rejected at the boundary
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    SessionLength(u64),
    WordGoal(usize),
    AutosaveInterval(u64),
    UnknownTheme(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::SessionLength(m) => write!(
                f,
                "session length {} min is outside {}..={} min",
                m, MIN_SESSION_MINUTES, MAX_SESSION_MINUTES
            ),
            ConfigError::WordGoal(g) => write!(
                f,
                "word goal {} is outside {}..={}",
                g, MIN_WORD_GOAL, MAX_WORD_GOAL
            ),
            ConfigError::AutosaveInterval(s) => write!(
                f,
                "autosave interval {}s is outside {}..={}s",
                s, MIN_AUTOSAVE_SECS, MAX_AUTOSAVE_SECS
            ),
            ConfigError::UnknownTheme(name) => write!(f, "unknown theme '{}'", name),
        }
    }
}

impl std::error::Error for ConfigError {}

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
        Self {
            path: AppDirs::config_path(),
        }
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
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
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
