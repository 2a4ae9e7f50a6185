use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::EntityKind;

/// Error body returned by the catalog service on a rejected request.
///
/// Every field is optional; the service does not always send one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// The server-supplied message, if it carries any text.
    pub fn server_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}

/// A wire record that cannot be turned into a domain entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("{kind} record has no usable identifier")]
    MissingIdentifier { kind: EntityKind },
    #[error("{kind} record is not an object: {reason}")]
    Malformed { kind: EntityKind, reason: String },
}
