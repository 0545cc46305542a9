//! Status values reported to the UI after each update.

use std::collections::BTreeMap;
use std::fmt;

use calcscene_core::{CalcSceneError, SceneSlot};
use serde::Serialize;

/// Outcome of one update cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StatusDescriptor {
    /// The scene was updated.
    Success {
        summary: String,
        /// Primitives now live in each slot this update wrote.
        #[serde(rename = "primitiveCounts")]
        primitive_counts: BTreeMap<SceneSlot, usize>,
    },
    /// The response was valid but had nothing to show.
    Empty { reason: String },
    /// The update failed; the scene is unchanged.
    Error { message: String },
    /// A newer update had already been committed.
    Superseded { sequence: u64 },
}

impl StatusDescriptor {
    /// Maps an update-cycle error to what the user sees.
    pub fn from_error(error: &CalcSceneError) -> Self {
        match error {
            CalcSceneError::NoValidSamples(reason) => StatusDescriptor::Empty {
                reason: reason.clone(),
            },
            CalcSceneError::Transport(message) => StatusDescriptor::Error {
                message: format!("could not reach the computation service: {message}"),
            },
            CalcSceneError::Service(message) => StatusDescriptor::Error {
                message: message.clone(),
            },
            CalcSceneError::InvalidShape(reason) => StatusDescriptor::Error {
                message: format!("cannot render this response: {reason}"),
            },
            other => StatusDescriptor::Error {
                message: other.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StatusDescriptor::Success { .. })
    }

    /// The serialized `kind` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            StatusDescriptor::Success { .. } => "success",
            StatusDescriptor::Empty { .. } => "empty",
            StatusDescriptor::Error { .. } => "error",
            StatusDescriptor::Superseded { .. } => "superseded",
        }
    }
}

impl fmt::Display for StatusDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusDescriptor::Success { summary, .. } => f.write_str(summary),
            StatusDescriptor::Empty { reason } => write!(f, "nothing to plot: {reason}"),
            StatusDescriptor::Error { message } => write!(f, "error: {message}"),
            StatusDescriptor::Superseded { sequence } => {
                write!(f, "update #{sequence} was superseded by a newer one")
            }
        }
    }
}
