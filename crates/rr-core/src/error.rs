//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),
}

/// Shorthand result type for `rr-core`.
pub type CoreResult<T> = Result<T, CoreError>;
