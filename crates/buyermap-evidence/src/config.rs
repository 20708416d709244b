use std::path::PathBuf;

use crate::error::AppError;
use crate::selection::{SelectionPolicy, DEFAULT_MAX_QUOTES};

/// Application configuration loaded explicitly from environment variables.
///
/// Everything is optional: the server scores and selects with the built-in
/// keyword tables, and extraction simply stays disabled until a model is
/// configured.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file overriding the built-in keyword tables, when set.
    pub keyword_tables_path: Option<PathBuf>,
    /// Model ID used for deck/transcript extraction. `None` disables the
    /// extraction tools.
    pub extract_model: Option<String>,
    /// Default selection size when a request does not specify one.
    pub max_quotes: usize,
    /// Default selection policy when a request does not specify one.
    pub default_policy: SelectionPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `KEYWORD_TABLES_PATH`: JSON keyword table override (must exist)
    /// - `EXTRACT_MODEL`: model ID for extraction (omit to disable)
    /// - `MAX_EVIDENCE_QUOTES`: default selection size (default 5)
    /// - `SELECTION_POLICY`: `one-per-speaker` (default) or
    ///   `bounded-per-speaker`
    pub fn from_env() -> Result<Self, AppError> {
        let keyword_tables_path = std::env::var("KEYWORD_TABLES_PATH")
            .ok()
            .map(PathBuf::from);
        if let Some(path) = &keyword_tables_path {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "keyword table file not found at {}",
                    path.display()
                )));
            }
        }

        let extract_model = std::env::var("EXTRACT_MODEL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let max_quotes = std::env::var("MAX_EVIDENCE_QUOTES")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_QUOTES);

        let default_policy = match std::env::var("SELECTION_POLICY") {
            Ok(value) => SelectionPolicy::parse(value.trim())?,
            Err(_) => SelectionPolicy::OnePerSpeaker,
        };

        Ok(Self {
            keyword_tables_path,
            extract_model,
            max_quotes,
            default_policy,
        })
    }
}
