//! Configuration errors.
//!
//! The per-frame hooks never fail. Errors only surface when a configuration is
//! loaded or validated before a controller is built.

use thiserror::Error;

/// Reasons a [`ControllerConfig`](crate::config::ControllerConfig) is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A tunable that must be strictly positive was zero or negative.
    #[error("`{field}` must be greater than zero (got {value})")]
    NonPositive { field: &'static str, value: f32 },

    /// A tunable that must not be negative was negative.
    #[error("`{field}` must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    /// A tunable was NaN or infinite.
    #[error("`{field}` must be finite")]
    NotFinite { field: &'static str },

    /// The JSON document could not be parsed.
    #[error("invalid controller config json: {0}")]
    Json(#[from] serde_json::Error),
}
