//! Composite item filter re-evaluated on every criteria change.
//!
//! Evaluation is a pure pass over a store snapshot: no I/O, no ordering of its
//! own. Results borrow from the input so repeated runs over the same snapshot
//! yield the same references in the same order.

use shared::{
    domain::{Item, ItemStatus},
    protocol::coerce_id,
};

/// Status predicate. The default accepts only the two known statuses, so items
/// carrying anything else stay out of the "all" view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    AnyKnown,
    Exactly(ItemStatus),
}

impl StatusFilter {
    /// Empty input selects [`StatusFilter::AnyKnown`].
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            Self::AnyKnown
        } else {
            Self::Exactly(ItemStatus::parse(raw))
        }
    }

    pub fn matches(&self, status: Option<&ItemStatus>) -> bool {
        match self {
            Self::AnyKnown => status.is_some_and(ItemStatus::is_known),
            Self::Exactly(expected) => status == Some(expected),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::AnyKnown => "",
            Self::Exactly(status) => status.as_str(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search_term: String,
    /// Free-form selection; coerced to an id at comparison time.
    pub category: Option<String>,
    pub location: Option<String>,
    pub status: StatusFilter,
}

impl FilterCriteria {
    pub fn matches(&self, item: &Item) -> bool {
        self.predicate()(item)
    }

    fn predicate(&self) -> impl Fn(&Item) -> bool + '_ {
        let needle = self.search_term.to_lowercase();
        let category = selection(self.category.as_deref());
        let location = selection(self.location.as_deref());
        move |item| {
            matches_text(item, &needle)
                && matches_reference(category, item.category_id.map(|id| id.0))
                && matches_reference(location, item.location_id.map(|id| id.0))
                && self.status.matches(item.status.as_ref())
        }
    }
}

/// `None` means "no filter"; `Some(None)` is a selection that names no valid
/// id and therefore matches nothing.
fn selection(raw: Option<&str>) -> Option<Option<i64>> {
    match raw {
        None => None,
        Some(raw) if raw.trim().is_empty() => None,
        Some(raw) => Some(coerce_id(raw)),
    }
}

fn matches_reference(selection: Option<Option<i64>>, id: Option<i64>) -> bool {
    match selection {
        None => true,
        Some(wanted) => wanted.is_some() && wanted == id,
    }
}

fn matches_text(item: &Item, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    item.name.to_lowercase().contains(needle)
        || item
            .description
            .as_deref()
            .is_some_and(|description| description.to_lowercase().contains(needle))
}

pub fn filter_items<'a>(items: &'a [Item], criteria: &FilterCriteria) -> Vec<&'a Item> {
    let predicate = criteria.predicate();
    items.iter().filter(|item| predicate(item)).collect()
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod tests;
