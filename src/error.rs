// Viral Rank Error Types

use thiserror::Error;

use crate::video::Platform;

#[derive(Error, Debug)]
pub enum ViralError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Collector unavailable for {platform}: {reason}")]
    CollectorUnavailable { platform: Platform, reason: String },

    #[error("Malformed import {path}: {reason}")]
    MalformedImport { path: String, reason: String },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for ViralError {
    fn from(err: anyhow::Error) -> Self {
        ViralError::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ViralError>;
