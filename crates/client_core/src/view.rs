//! Read-only projection handed to whatever renders the catalog.

use shared::domain::{Category, ItemStatus, Location};

use crate::{
    filter::{filter_items, FilterCriteria},
    forms::{EditorMode, ItemForm},
    resolve::ItemRow,
    store::StoreSnapshot,
};

/// One entry of a dropdown: the value sent back on selection and its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorOption {
    pub value: String,
    pub label: String,
}

impl SelectorOption {
    fn category(category: &Category) -> Self {
        Self {
            value: category.category_id.to_string(),
            label: category.name.clone(),
        }
    }

    fn location(location: &Location) -> Self {
        Self {
            value: location.location_id.to_string(),
            label: location.display_name(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryView {
    pub rows: Vec<ItemRow>,
    pub category_options: Vec<SelectorOption>,
    pub location_options: Vec<SelectorOption>,
    pub status_options: Vec<SelectorOption>,
    pub criteria: FilterCriteria,
    pub editor: EditorMode,
    pub item_form: ItemForm,
    pub busy: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl InventoryView {
    /// Rows and selector options for `snapshot` under `criteria`. Session
    /// flags and notices start cleared.
    pub fn project(snapshot: &StoreSnapshot, criteria: FilterCriteria) -> Self {
        let rows = filter_items(&snapshot.items, &criteria)
            .into_iter()
            .map(|item| ItemRow::project(item, &snapshot.categories, &snapshot.locations))
            .collect();
        Self {
            rows,
            category_options: snapshot.categories.iter().map(SelectorOption::category).collect(),
            location_options: snapshot.locations.iter().map(SelectorOption::location).collect(),
            status_options: ItemStatus::KNOWN
                .iter()
                .map(|status| SelectorOption {
                    value: status.as_str().to_string(),
                    label: status.as_str().to_string(),
                })
                .collect(),
            criteria,
            ..Self::default()
        }
    }

    /// Caption for an empty table, `None` when there are rows to show.
    pub fn empty_caption(&self) -> Option<&'static str> {
        if !self.rows.is_empty() {
            None
        } else if self.loading {
            Some("Loading...")
        } else {
            Some("No items found")
        }
    }
}
