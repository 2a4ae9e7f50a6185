//! Wire shapes exchanged with the catalog service.
//!
//! Inbound records are deliberately loose: the service has shipped several
//! spellings for the same field over time, and identifiers arrive either as
//! JSON numbers or as numeric strings. Nothing here interprets them; that is
//! the job of the normalizer in `client_core`.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{CategoryDraft, ItemDraft, LocationDraft};

/// An identifier as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Int(i64),
    Float(f64),
    Text(String),
}

impl WireId {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Float(value) => integral(*value),
            Self::Text(raw) => coerce_id(raw),
        }
    }
}

/// Coerces a free-form identifier (form selection, query string, JSON text)
/// into an integer.
///
/// Accepts surrounding whitespace and integral decimals such as `"5.0"`.
/// Empty and non-numeric input yields `None`.
pub fn coerce_id(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    trimmed.parse::<f64>().ok().and_then(integral)
}

fn integral(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

/// Any JSON scalar read as text. Objects, arrays and null read as absent.
fn loose_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// An identifier of any unusable JSON type reads as absent.
fn loose_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<WireId>, D::Error> {
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

/// A nested reference sent either as an object or as a bare identifier.
fn loose_reference<'de, D, T>(
    deserializer: D,
    from_id: fn(WireId) -> T,
) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        object @ Value::Object(_) => serde_json::from_value(object).ok(),
        Value::Null | Value::Array(_) | Value::Bool(_) => None,
        scalar => serde_json::from_value(scalar).ok().map(from_id),
    })
}

fn loose_category<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<RawCategory>, D::Error> {
    loose_reference(deserializer, |id| RawCategory {
        id: Some(id),
        ..RawCategory::default()
    })
}

fn loose_location<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<RawLocation>, D::Error> {
    loose_reference(deserializer, |id| RawLocation {
        id: Some(id),
        ..RawLocation::default()
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCategory {
    #[serde(default, deserialize_with = "loose_id")]
    pub id: Option<WireId>,
    #[serde(default, deserialize_with = "loose_id")]
    pub category_id: Option<WireId>,
    #[serde(default, deserialize_with = "loose_text")]
    pub category_name: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLocation {
    #[serde(default, deserialize_with = "loose_id")]
    pub id: Option<WireId>,
    #[serde(default, deserialize_with = "loose_id")]
    pub location_id: Option<WireId>,
    #[serde(default, deserialize_with = "loose_text")]
    pub location_building: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub building: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub location_floor: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub floor: Option<String>,
}

/// A listed item. Fields of an unexpected JSON type read as absent instead of
/// rejecting the record; only the identifier decides whether it is usable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    #[serde(default, deserialize_with = "loose_id")]
    pub item_id: Option<WireId>,
    #[serde(default, deserialize_with = "loose_id")]
    pub id: Option<WireId>,
    #[serde(default, deserialize_with = "loose_text")]
    pub item_name: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "loose_id")]
    pub category_id: Option<WireId>,
    #[serde(default, deserialize_with = "loose_category")]
    pub category: Option<RawCategory>,
    #[serde(default, deserialize_with = "loose_id")]
    pub location_id: Option<WireId>,
    #[serde(default, deserialize_with = "loose_location")]
    pub location: Option<RawLocation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRefPayload {
    pub category_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRefPayload {
    pub location_id: i64,
}

/// Body of `addItem` / `updateItem`. References travel as nested ids only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraftPayload {
    pub item_name: String,
    pub description: String,
    pub status: String,
    /// `YYYY-MM-DD`, or empty when no date was chosen.
    pub date: String,
    pub category: CategoryRefPayload,
    pub location: LocationRefPayload,
}

impl From<&ItemDraft> for ItemDraftPayload {
    fn from(draft: &ItemDraft) -> Self {
        Self {
            item_name: draft.name.clone(),
            description: draft.description.clone(),
            status: draft.status.as_str().to_string(),
            date: draft
                .date_added
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            category: CategoryRefPayload {
                category_id: draft.category_id.0,
            },
            location: LocationRefPayload {
                location_id: draft.location_id.0,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraftPayload {
    pub category_name: String,
}

impl From<&CategoryDraft> for CategoryDraftPayload {
    fn from(draft: &CategoryDraft) -> Self {
        Self {
            category_name: draft.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDraftPayload {
    pub location_building: String,
    pub location_floor: String,
}

impl From<&LocationDraft> for LocationDraftPayload {
    fn from(draft: &LocationDraft) -> Self {
        Self {
            location_building: draft.building.clone(),
            location_floor: draft.floor.clone(),
        }
    }
}
