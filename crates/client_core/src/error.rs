use std::fmt;

use shared::domain::EntityKind;
use thiserror::Error;

/// Failure reported by a [`crate::CatalogRemote`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("catalog service unreachable: {0}")]
    Transport(String),
    #[error("catalog service rejected request with status {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
    },
    #[error("unexpected response from catalog service: {0}")]
    Decode(String),
}

impl RemoteError {
    pub fn rejected(status: u16, message: Option<String>) -> Self {
        Self::Rejected { status, message }
    }

    /// Human-readable text supplied by the server, ignoring blank messages.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } => Some(message.trim()).filter(|message| !message.is_empty()),
            _ => None,
        }
    }
}

/// Building an HTTP client failed before any request was made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientSetupError {
    #[error("invalid server url {url:?}: {reason}")]
    InvalidServerUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    Http(String),
}

/// Local form validation failure. Never reaches the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields.")]
    MissingItemFields,
    #[error("Please select a valid category.")]
    InvalidCategorySelection,
    #[error("Please select a valid location.")]
    InvalidLocationSelection,
    #[error("Please enter the date as YYYY-MM-DD.")]
    InvalidDate,
    #[error("Please fill in the category name")]
    MissingCategoryName,
    #[error("Please fill in all location fields")]
    MissingLocationFields,
    #[error("Please select a category to delete")]
    NoCategorySelected,
    #[error("Please select a location to delete")]
    NoLocationSelected,
}

/// The mutating operations the coordinator sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationOperation {
    AddItem,
    UpdateItem,
    DeleteItem,
    AddCategory,
    DeleteCategory,
    AddLocation,
    DeleteLocation,
}

impl MutationOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddItem => "add_item",
            Self::UpdateItem => "update_item",
            Self::DeleteItem => "delete_item",
            Self::AddCategory => "add_category",
            Self::DeleteCategory => "delete_category",
            Self::AddLocation => "add_location",
            Self::DeleteLocation => "delete_location",
        }
    }

    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::AddItem => "Error adding item. Please try again.",
            Self::UpdateItem => "Error updating item. Please try again.",
            Self::DeleteItem => "Error deleting item. Please try again.",
            Self::AddCategory => "Error adding category. Please try again.",
            Self::DeleteCategory => "Error deleting category. Please try again.",
            Self::AddLocation => "Error adding location. Please try again.",
            Self::DeleteLocation => "Error deleting location. Please try again.",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Self::AddItem => "Item added successfully!",
            Self::UpdateItem => "Item updated successfully!",
            Self::DeleteItem => "Item deleted successfully!",
            Self::AddCategory => "Category added successfully!",
            Self::DeleteCategory => "Category deleted successfully!",
            Self::AddLocation => "Location added successfully!",
            Self::DeleteLocation => "Location deleted successfully!",
        }
    }

    /// Question put to the user before an irreversible delete.
    pub fn confirmation_prompt(self) -> Option<&'static str> {
        match self {
            Self::DeleteItem => Some("Are you sure you want to delete this item?"),
            Self::DeleteCategory => Some(
                "Are you sure you want to delete this category? This will also remove all items associated with this category.",
            ),
            Self::DeleteLocation => Some(
                "Are you sure you want to delete this location? This will also remove all items associated with this location.",
            ),
            _ => None,
        }
    }

    /// Collections that are stale once the operation succeeds.
    ///
    /// Category and location deletes cascade to items on the server.
    pub fn reload_targets(self) -> &'static [EntityKind] {
        match self {
            Self::AddItem | Self::UpdateItem | Self::DeleteItem => &[EntityKind::Item],
            Self::AddCategory => &[EntityKind::Category],
            Self::DeleteCategory => &[EntityKind::Category, EntityKind::Item],
            Self::AddLocation => &[EntityKind::Location],
            Self::DeleteLocation => &[EntityKind::Location, EntityKind::Item],
        }
    }
}

impl fmt::Display for MutationOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn fetch_failure_message(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Item => "Failed to fetch items. Please try again later.",
        EntityKind::Category => "Failed to fetch categories.",
        EntityKind::Location => "Failed to fetch locations.",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{message}")]
    Remote {
        operation: MutationOperation,
        message: String,
        #[source]
        source: RemoteError,
    },
    #[error("another change is still being submitted")]
    Busy,
}

impl MutationError {
    pub(crate) fn remote(operation: MutationOperation, source: RemoteError) -> Self {
        let message = source
            .server_message()
            .unwrap_or(operation.fallback_message())
            .to_string();
        Self::Remote {
            operation,
            message,
            source,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
