//! Error types for calcscene.

use thiserror::Error;

/// The main error type for calcscene operations.
///
/// The first four variants form the update-cycle taxonomy: each of them is
/// recovered at the orchestrator boundary and turned into a status value.
#[derive(Error, Debug)]
pub enum CalcSceneError {
    /// The request never produced a decodable response (network, HTTP status).
    #[error("transport error: {0}")]
    Transport(String),

    /// The computation service answered with an `error` field.
    #[error("service error: {0}")]
    Service(String),

    /// The payload is structurally malformed for its classified variant.
    #[error("cannot render response: {0}")]
    InvalidShape(String),

    /// The payload is well formed but carries no usable samples.
    #[error("no valid samples: {0}")]
    NoValidSamples(String),

    /// GPU resource allocation failed.
    #[error("render error: {0}")]
    Render(String),

    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CalcSceneError {
    /// Shorthand for [`CalcSceneError::InvalidShape`].
    pub fn invalid_shape(reason: impl Into<String>) -> Self {
        Self::InvalidShape(reason.into())
    }

    /// Shorthand for [`CalcSceneError::NoValidSamples`].
    pub fn no_valid_samples(reason: impl Into<String>) -> Self {
        Self::NoValidSamples(reason.into())
    }
}

/// A specialized Result type for calcscene operations.
pub type Result<T> = std::result::Result<T, CalcSceneError>;
