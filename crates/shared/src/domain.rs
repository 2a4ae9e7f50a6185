use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ItemId);
id_newtype!(CategoryId);
id_newtype!(LocationId);

/// Lifecycle status of an item.
///
/// The remote authority only knows `Unclaimed` and `Claimed`; anything else it
/// sends is preserved verbatim so filters can tell it apart from the known set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ItemStatus {
    #[default]
    Unclaimed,
    Claimed,
    Unrecognized(String),
}

impl ItemStatus {
    pub const KNOWN: [ItemStatus; 2] = [ItemStatus::Unclaimed, ItemStatus::Claimed];

    pub fn parse(raw: &str) -> Self {
        match raw {
            "Unclaimed" => Self::Unclaimed,
            "Claimed" => Self::Claimed,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Unclaimed => "Unclaimed",
            Self::Claimed => "Claimed",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An item as held by the entity store, after shape normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub item_id: ItemId,
    pub name: String,
    pub description: Option<String>,
    /// `None` when the remote sent no status at all.
    pub status: Option<ItemStatus>,
    pub date_added: Option<NaiveDate>,
    pub category_id: Option<CategoryId>,
    pub location_id: Option<LocationId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub category_id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub location_id: LocationId,
    pub building: String,
    pub floor: String,
}

impl Location {
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.building, self.floor)
    }
}

/// Validated payload for creating or updating an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    pub status: ItemStatus,
    pub date_added: Option<NaiveDate>,
    pub category_id: CategoryId,
    pub location_id: LocationId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationDraft {
    pub building: String,
    pub floor: String,
}

/// The three collections the client mirrors from the remote authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Item,
    Category,
    Location,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Category => "category",
            Self::Location => "location",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
