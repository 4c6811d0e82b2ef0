//! Runtime configuration resolved from CLI arguments and environment

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-flash-latest";
pub const DEFAULT_POLISH_TIMEOUT_SECS: u64 = 20;
pub const NARRATIVES_FILE_NAME: &str = "narratives.json";

/// Text-polish settings. No API key means no polish.
#[derive(Debug, Clone, PartialEq)]
pub struct PolishConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for PolishConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_POLISH_TIMEOUT_SECS),
        }
    }
}

impl PolishConfig {
    /// Polish runs only when enabled and a non-empty key is present
    pub fn is_active(&self) -> bool {
        self.enabled
            && self
                .api_key
                .as_deref()
                .map(|k| !k.trim().is_empty())
                .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory holding the startup table exports
    pub data_dir: PathBuf,
    /// Persisted narrative cache
    pub cache_file: PathBuf,
    pub polish: PolishConfig,
}

impl AppConfig {
    /// Cache file defaults to `<data_dir>/narratives.json`
    pub fn new(data_dir: impl Into<PathBuf>, cache_file: Option<PathBuf>, polish: PolishConfig) -> Self {
        let data_dir = data_dir.into();
        let cache_file = cache_file.unwrap_or_else(|| data_dir.join(NARRATIVES_FILE_NAME));
        Self {
            data_dir,
            cache_file,
            polish,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
