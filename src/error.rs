// src/error.rs

//! Unified error handling for the pipeline application.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV read/write failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Mail transport error
    #[error("Mail error: {0}")]
    Mail(String),

    /// A stage's required input dataset is missing
    #[error("Required dataset not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// Search produced nothing to work with
    #[error("No leads found for this query. Try a broader search term.")]
    NoLeads,

    /// A pipeline run is already active
    #[error("Pipeline is already running")]
    PipelineBusy,
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a mail transport error.
    pub fn mail(message: impl std::fmt::Display) -> Self {
        Self::Mail(message.to_string())
    }
}
