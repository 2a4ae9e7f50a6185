use std::sync::{Arc, PoisonError, RwLock};

use shared::domain::{Category, EntityKind, Item, Location};
use tracing::debug;

/// A full replacement for one collection.
#[derive(Debug, Clone)]
pub enum CollectionBatch {
    Items(Vec<Item>),
    Categories(Vec<Category>),
    Locations(Vec<Location>),
}

impl CollectionBatch {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Items(_) => EntityKind::Item,
            Self::Categories(_) => EntityKind::Category,
            Self::Locations(_) => EntityKind::Location,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Items(items) => items.len(),
            Self::Categories(categories) => categories.len(),
            Self::Locations(locations) => locations.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Immutable view of all three collections at one point in time.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    pub items: Arc<[Item]>,
    pub categories: Arc<[Category]>,
    pub locations: Arc<[Location]>,
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            items: Arc::from(Vec::new()),
            categories: Arc::from(Vec::new()),
            locations: Arc::from(Vec::new()),
        }
    }
}

/// In-memory mirror of the catalog.
///
/// Collections are only ever swapped whole; a reader holding a snapshot keeps
/// seeing the collection it was handed even while a reload lands.
#[derive(Debug, Default)]
pub struct EntityStore {
    current: RwLock<StoreSnapshot>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, batch: CollectionBatch) {
        let kind = batch.kind();
        let count = batch.len();
        {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            match batch {
                CollectionBatch::Items(items) => current.items = Arc::from(items),
                CollectionBatch::Categories(categories) => {
                    current.categories = Arc::from(categories)
                }
                CollectionBatch::Locations(locations) => current.locations = Arc::from(locations),
            }
        }
        debug!(kind = kind.as_str(), count, "store: collection replaced");
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn items(&self) -> Arc<[Item]> {
        self.snapshot().items
    }

    pub fn categories(&self) -> Arc<[Category]> {
        self.snapshot().categories
    }

    pub fn locations(&self) -> Arc<[Location]> {
        self.snapshot().locations
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        let snapshot = self.snapshot();
        match kind {
            EntityKind::Item => snapshot.items.len(),
            EntityKind::Category => snapshot.categories.len(),
            EntityKind::Location => snapshot.locations.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::{CategoryId, ItemId};

    use super::*;
    use crate::test_support::{category, item};

    #[test]
    fn load_replaces_whole_collection() {
        let store = EntityStore::new();
        store.load(CollectionBatch::Items(vec![
            item(1, "Lamp", 5, 9, "Unclaimed"),
            item(2, "Desk", 5, 9, "Claimed"),
        ]));
        store.load(CollectionBatch::Items(vec![item(3, "Chair", 5, 9, "Claimed")]));

        let ids: Vec<ItemId> = store.items().iter().map(|item| item.item_id).collect();
        assert_eq!(ids, vec![ItemId(3)]);
    }

    #[test]
    fn snapshots_survive_later_reloads() {
        let store = EntityStore::new();
        store.load(CollectionBatch::Categories(vec![category(5, "Electronics")]));
        let before = store.categories();

        store.load(CollectionBatch::Categories(Vec::new()));

        assert_eq!(before.len(), 1);
        assert_eq!(before[0].category_id, CategoryId(5));
        assert_eq!(store.len(EntityKind::Category), 0);
    }

    #[test]
    fn loading_one_kind_leaves_the_others_alone() {
        let store = EntityStore::new();
        store.load(CollectionBatch::Items(vec![item(1, "Lamp", 5, 9, "Unclaimed")]));
        store.load(CollectionBatch::Categories(vec![category(5, "Electronics")]));

        assert_eq!(store.len(EntityKind::Item), 1);
        assert_eq!(store.len(EntityKind::Category), 1);
        assert_eq!(store.len(EntityKind::Location), 0);
    }
}
