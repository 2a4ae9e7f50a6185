//! Display resolution for item references.
//!
//! A reference that does not resolve is never an error: categories and
//! locations can be deleted while an item listing is in flight.

use shared::domain::{Category, Item, Location};

/// Shown in place of any value that cannot be resolved or is empty.
pub const SENTINEL: &str = "N/A";

pub fn resolve_category<'a>(item: &Item, categories: &'a [Category]) -> Option<&'a Category> {
    let category_id = item.category_id?;
    categories
        .iter()
        .find(|category| category.category_id == category_id)
}

pub fn resolve_location<'a>(item: &Item, locations: &'a [Location]) -> Option<&'a Location> {
    let location_id = item.location_id?;
    locations
        .iter()
        .find(|location| location.location_id == location_id)
}

pub fn category_name(item: &Item, categories: &[Category]) -> String {
    resolve_category(item, categories)
        .map(|category| or_sentinel(&category.name))
        .unwrap_or_else(|| SENTINEL.to_string())
}

pub fn location_name(item: &Item, locations: &[Location]) -> String {
    match resolve_location(item, locations) {
        Some(location)
            if !location.building.trim().is_empty() && !location.floor.trim().is_empty() =>
        {
            location.display_name()
        }
        _ => SENTINEL.to_string(),
    }
}

fn or_sentinel(value: &str) -> String {
    if value.trim().is_empty() {
        SENTINEL.to_string()
    } else {
        value.to_string()
    }
}

/// One row of the inventory table, every cell ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub item_id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub status: String,
    pub date_added: String,
}

impl ItemRow {
    pub fn project(item: &Item, categories: &[Category], locations: &[Location]) -> Self {
        Self {
            item_id: item.item_id.0,
            name: or_sentinel(&item.name),
            description: or_sentinel(item.description.as_deref().unwrap_or_default()),
            category: category_name(item, categories),
            location: location_name(item, locations),
            status: or_sentinel(
                item.status
                    .as_ref()
                    .map(|status| status.as_str())
                    .unwrap_or_default(),
            ),
            date_added: item
                .date_added
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| SENTINEL.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::{CategoryId, ItemStatus};

    use super::*;
    use crate::test_support::{category, item, location};

    #[test]
    fn resolves_names_from_current_collections() {
        let lamp = item(1, "Lamp", 5, 9, "Unclaimed");
        let categories = vec![category(5, "Electronics")];
        let locations = vec![location(9, "A", "2")];

        assert_eq!(category_name(&lamp, &categories), "Electronics");
        assert_eq!(location_name(&lamp, &locations), "A - 2");
    }

    #[test]
    fn dangling_or_absent_references_fall_back_to_sentinel() {
        let mut lamp = item(1, "Lamp", 5, 9, "Unclaimed");
        let categories = vec![category(6, "Furniture")];
        let locations = vec![location(10, "B", "1")];

        assert_eq!(category_name(&lamp, &categories), SENTINEL);
        assert_eq!(location_name(&lamp, &locations), SENTINEL);

        lamp.category_id = None;
        assert_eq!(category_name(&lamp, &[category(5, "Electronics")]), SENTINEL);
    }

    #[test]
    fn half_filled_location_is_not_displayed() {
        let lamp = item(1, "Lamp", 5, 9, "Unclaimed");
        assert_eq!(location_name(&lamp, &[location(9, "A", "")]), SENTINEL);
    }

    #[test]
    fn sentinel_returned_iff_no_category_matches() {
        let categories = vec![category(5, "Electronics"), category(6, "Furniture")];
        for category_id in 1..10 {
            let mut candidate = item(1, "Candidate", 0, 0, "Claimed");
            candidate.category_id = Some(CategoryId(category_id));
            let has_match = categories
                .iter()
                .any(|category| category.category_id.0 == category_id);
            assert_eq!(category_name(&candidate, &categories) == SENTINEL, !has_match);
        }
    }

    #[test]
    fn row_fills_every_empty_cell_with_sentinel() {
        let mut bare = item(7, "", 5, 9, "Claimed");
        bare.status = None;
        bare.description = None;

        let row = ItemRow::project(&bare, &[], &[]);
        assert_eq!(row.item_id, 7);
        assert_eq!(row.name, SENTINEL);
        assert_eq!(row.description, SENTINEL);
        assert_eq!(row.category, SENTINEL);
        assert_eq!(row.location, SENTINEL);
        assert_eq!(row.status, SENTINEL);
        assert_eq!(row.date_added, SENTINEL);

        bare.status = Some(ItemStatus::Claimed);
        assert_eq!(ItemRow::project(&bare, &[], &[]).status, "Claimed");
    }
}
