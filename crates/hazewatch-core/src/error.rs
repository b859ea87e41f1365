use chrono::{DateTime, FixedOffset};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum HazeError {
    #[error("failed to fetch {url}: {reason}")]
    FetchFailure { url: String, reason: String },

    #[error("readings for latest hour are incomplete: '{label}' reaches {found}, expected {expected}")]
    DataIncomplete {
        label: String,
        expected: DateTime<FixedOffset>,
        found: DateTime<FixedOffset>,
    },

    #[error("failed to parse page: {0}")]
    ParseFailure(String),

    #[error("failed to load index standard from {path}: {reason}")]
    StandardLoad { path: PathBuf, reason: String },

    #[error("invalid index standard: {0}")]
    StandardInvalid(String),

    #[error("failed to load source config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid source config: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
