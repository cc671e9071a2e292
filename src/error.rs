// src/error.rs
use thiserror::Error;
use vista_theme::ThemeError;

/// Errors surfaced by [`crate::ThemeEngine`] and its builder.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Theme resolution failed: {0}")]
    Theme(#[from] ThemeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Engine is not configured: {0}")]
    Config(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Io(e.into())
    }
}
