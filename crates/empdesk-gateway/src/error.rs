use thiserror::Error;

/// Failures that stop the gateway from starting.
///
/// Per-request failures never surface here: flows turn them into
/// [`crate::services::translator::ErrorOutcome`] values and render them.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Backend base URL must be an http(s) URL, got {0:?}")]
    InvalidBaseUrl(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
