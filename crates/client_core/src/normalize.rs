//! Converts loose wire records into domain entities.
//!
//! One function per entity kind. Consumers past this point only ever see the
//! normalized identifier fields.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    domain::{Category, CategoryId, EntityKind, Item, ItemId, ItemStatus, Location, LocationId},
    error::ShapeError,
    protocol::{RawCategory, RawItem, RawLocation, WireId},
};
use tracing::{debug, warn};

fn first_id<'a>(candidates: impl IntoIterator<Item = Option<&'a WireId>>) -> Option<i64> {
    candidates
        .into_iter()
        .flatten()
        .find_map(WireId::as_i64)
}

fn first_text(candidates: impl IntoIterator<Item = Option<String>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    // Timestamps are cut down to their calendar date.
    let day = raw.get(..10).unwrap_or(raw);
    match NaiveDate::parse_from_str(day, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(err) => {
            debug!(raw, "normalize: ignoring unparsable item date: {err}");
            None
        }
    }
}

pub fn normalize_category(raw: RawCategory) -> Result<Category, ShapeError> {
    let category_id = first_id([raw.id.as_ref(), raw.category_id.as_ref()]).ok_or(
        ShapeError::MissingIdentifier {
            kind: EntityKind::Category,
        },
    )?;
    Ok(Category {
        category_id: CategoryId(category_id),
        name: first_text([raw.name, raw.category_name]).unwrap_or_default(),
    })
}

pub fn normalize_location(raw: RawLocation) -> Result<Location, ShapeError> {
    let location_id = first_id([raw.id.as_ref(), raw.location_id.as_ref()]).ok_or(
        ShapeError::MissingIdentifier {
            kind: EntityKind::Location,
        },
    )?;
    Ok(Location {
        location_id: LocationId(location_id),
        building: first_text([raw.location_building, raw.building]).unwrap_or_default(),
        floor: first_text([raw.location_floor, raw.floor]).unwrap_or_default(),
    })
}

pub fn normalize_item(raw: RawItem) -> Result<Item, ShapeError> {
    let item_id = first_id([raw.item_id.as_ref(), raw.id.as_ref()]).ok_or(
        ShapeError::MissingIdentifier {
            kind: EntityKind::Item,
        },
    )?;

    let nested_category = raw.category.as_ref();
    let category_id = first_id([
        raw.category_id.as_ref(),
        nested_category.and_then(|category| category.id.as_ref()),
        nested_category.and_then(|category| category.category_id.as_ref()),
    ]);

    let nested_location = raw.location.as_ref();
    let location_id = first_id([
        raw.location_id.as_ref(),
        nested_location.and_then(|location| location.id.as_ref()),
        nested_location.and_then(|location| location.location_id.as_ref()),
    ]);

    Ok(Item {
        item_id: ItemId(item_id),
        name: first_text([raw.item_name, raw.name]).unwrap_or_default(),
        description: raw
            .description
            .filter(|description| !description.trim().is_empty()),
        status: raw.status.as_deref().map(ItemStatus::parse),
        date_added: raw.date.as_deref().and_then(parse_date),
        category_id: category_id.map(CategoryId),
        location_id: location_id.map(LocationId),
    })
}

fn decode<R, T>(
    kind: EntityKind,
    value: Value,
    normalize: fn(R) -> Result<T, ShapeError>,
) -> Result<T, ShapeError>
where
    R: DeserializeOwned,
{
    let raw = serde_json::from_value::<R>(value).map_err(|err| ShapeError::Malformed {
        kind,
        reason: err.to_string(),
    })?;
    normalize(raw)
}

pub fn decode_item(value: Value) -> Result<Item, ShapeError> {
    decode(EntityKind::Item, value, normalize_item)
}

pub fn decode_category(value: Value) -> Result<Category, ShapeError> {
    decode(EntityKind::Category, value, normalize_category)
}

pub fn decode_location(value: Value) -> Result<Location, ShapeError> {
    decode(EntityKind::Location, value, normalize_location)
}

/// Decodes a listing, dropping records that cannot be normalized.
///
/// A single bad record must not hide the rest of the collection.
pub fn decode_collection<T>(
    kind: EntityKind,
    values: Vec<Value>,
    decode_one: fn(Value) -> Result<T, ShapeError>,
) -> Vec<T> {
    let total = values.len();
    let decoded: Vec<T> = values
        .into_iter()
        .filter_map(|value| match decode_one(value) {
            Ok(entity) => Some(entity),
            Err(err) => {
                warn!(kind = kind.as_str(), "normalize: dropping record: {err}");
                None
            }
        })
        .collect();
    if decoded.len() != total {
        warn!(
            kind = kind.as_str(),
            kept = decoded.len(),
            total,
            "normalize: listing contained malformed records"
        );
    }
    decoded
}

#[cfg(test)]
#[path = "tests/normalize_tests.rs"]
mod tests;
