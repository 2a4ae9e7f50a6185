//! Editable form state and its validation into drafts.
//!
//! Selections stay free-form text until a draft is built; that is the only
//! place they are parsed into identifiers.

use chrono::NaiveDate;
use shared::{
    domain::{
        CategoryDraft, CategoryId, Item, ItemDraft, ItemId, ItemStatus, LocationDraft, LocationId,
    },
    protocol::coerce_id,
};

use crate::error::ValidationError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemForm {
    pub name: String,
    pub category: String,
    pub description: String,
    pub location: String,
    pub status: ItemStatus,
    /// `YYYY-MM-DD` or empty.
    pub date: String,
}

impl ItemForm {
    pub fn from_item(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            category: item
                .category_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            description: item.description.clone().unwrap_or_default(),
            location: item
                .location_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            status: item.status.clone().unwrap_or_default(),
            date: item
                .date_added
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<ItemDraft, ValidationError> {
        let name = self.name.trim();
        let category = self.category.trim();
        let location = self.location.trim();
        if name.is_empty() || category.is_empty() || location.is_empty() {
            return Err(ValidationError::MissingItemFields);
        }

        let category_id = coerce_id(category).ok_or(ValidationError::InvalidCategorySelection)?;
        let location_id = coerce_id(location).ok_or(ValidationError::InvalidLocationSelection)?;

        let date = self.date.trim();
        let date_added = if date.is_empty() {
            None
        } else {
            Some(
                NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .map_err(|_| ValidationError::InvalidDate)?,
            )
        };

        Ok(ItemDraft {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            status: self.status.clone(),
            date_added,
            category_id: CategoryId(category_id),
            location_id: LocationId(location_id),
        })
    }

    /// Drops the category selection if it names `category_id`.
    pub fn clear_category_if(&mut self, category_id: CategoryId) -> bool {
        if coerce_id(&self.category) == Some(category_id.0) {
            self.category.clear();
            true
        } else {
            false
        }
    }

    pub fn clear_location_if(&mut self, location_id: LocationId) -> bool {
        if coerce_id(&self.location) == Some(location_id.0) {
            self.location.clear();
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryForm {
    pub name: String,
}

impl CategoryForm {
    pub fn validate(&self) -> Result<CategoryDraft, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingCategoryName);
        }
        Ok(CategoryDraft {
            name: name.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationForm {
    pub building: String,
    pub floor: String,
}

impl LocationForm {
    pub fn validate(&self) -> Result<LocationDraft, ValidationError> {
        let building = self.building.trim();
        let floor = self.floor.trim();
        if building.is_empty() || floor.is_empty() {
            return Err(ValidationError::MissingLocationFields);
        }
        Ok(LocationDraft {
            building: building.to_string(),
            floor: floor.to_string(),
        })
    }
}

/// Whether the item dialog is closed, adding, or editing an existing item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditorMode {
    #[default]
    Closed,
    Creating,
    Editing(ItemId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::item;

    fn filled() -> ItemForm {
        ItemForm {
            name: "  Lamp ".to_string(),
            category: "5".to_string(),
            description: " desk lamp ".to_string(),
            location: "9".to_string(),
            status: ItemStatus::Unclaimed,
            date: "2024-03-05".to_string(),
        }
    }

    #[test]
    fn builds_trimmed_draft_with_parsed_references() {
        let draft = filled().validate().expect("draft");
        assert_eq!(draft.name, "Lamp");
        assert_eq!(draft.description, "desk lamp");
        assert_eq!(draft.category_id, CategoryId(5));
        assert_eq!(draft.location_id, LocationId(9));
        assert_eq!(draft.date_added, NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn each_required_item_field_is_enforced() {
        let clears: [fn(&mut ItemForm); 3] = [
            |form| form.name.clear(),
            |form| form.category.clear(),
            |form| form.location.clear(),
        ];
        for clear in clears {
            let mut form = filled();
            clear(&mut form);
            assert_eq!(form.validate(), Err(ValidationError::MissingItemFields));
        }
    }

    #[test]
    fn non_numeric_selection_fails_validation() {
        let mut form = filled();
        form.category = "Electronics".to_string();
        assert_eq!(
            form.validate(),
            Err(ValidationError::InvalidCategorySelection)
        );

        let mut form = filled();
        form.location = "A - 2".to_string();
        assert_eq!(
            form.validate(),
            Err(ValidationError::InvalidLocationSelection)
        );
    }

    #[test]
    fn malformed_date_fails_validation() {
        let mut form = filled();
        form.date = "05/03/2024".to_string();
        assert_eq!(form.validate(), Err(ValidationError::InvalidDate));
    }

    #[test]
    fn from_item_round_trips_into_an_equivalent_draft() {
        let lamp = item(1, "Lamp", 5, 9, "Claimed");
        let form = ItemForm::from_item(&lamp);
        assert_eq!(form.category, "5");
        assert_eq!(form.location, "9");
        assert_eq!(form.status, ItemStatus::Claimed);
        assert_eq!(form.validate().expect("draft").name, "Lamp");
    }

    #[test]
    fn clearing_selection_compares_numerically() {
        let mut form = filled();
        form.category = "5.0".to_string();
        assert!(!form.clear_category_if(CategoryId(6)));
        assert!(form.clear_category_if(CategoryId(5)));
        assert!(form.category.is_empty());

        assert!(form.clear_location_if(LocationId(9)));
        assert!(form.location.is_empty());
    }

    #[test]
    fn category_and_location_forms_require_their_fields() {
        assert_eq!(
            CategoryForm::default().validate(),
            Err(ValidationError::MissingCategoryName)
        );
        assert_eq!(
            LocationForm {
                building: "A".to_string(),
                floor: " ".to_string(),
            }
            .validate(),
            Err(ValidationError::MissingLocationFields)
        );
        assert_eq!(
            LocationForm {
                building: "A".to_string(),
                floor: "2".to_string(),
            }
            .validate()
            .expect("draft")
            .floor,
            "2"
        );
    }
}
