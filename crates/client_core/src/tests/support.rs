use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use shared::domain::{
    Category, CategoryDraft, CategoryId, Item, ItemDraft, ItemId, ItemStatus, Location,
    LocationDraft, LocationId,
};
use tokio::sync::{Mutex, Notify};

use crate::{error::RemoteError, remote::CatalogRemote};

pub fn item(id: i64, name: &str, category_id: i64, location_id: i64, status: &str) -> Item {
    Item {
        item_id: ItemId(id),
        name: name.to_string(),
        description: None,
        status: Some(ItemStatus::parse(status)),
        date_added: None,
        category_id: Some(CategoryId(category_id)),
        location_id: Some(LocationId(location_id)),
    }
}

pub fn category(id: i64, name: &str) -> Category {
    Category {
        category_id: CategoryId(id),
        name: name.to_string(),
    }
}

pub fn location(id: i64, building: &str, floor: &str) -> Location {
    Location {
        location_id: LocationId(id),
        building: building.to_string(),
        floor: floor.to_string(),
    }
}

/// In-memory catalog backend that records every call.
///
/// Failures are injected per operation name (`"create_item"`, `"list_items"`,
/// ...) and stay in effect until healed. A hold makes the next call of that
/// operation wait until the returned gate is notified.
#[derive(Default)]
pub struct FakeCatalog {
    items: Mutex<Vec<Item>>,
    categories: Mutex<Vec<Category>>,
    locations: Mutex<Vec<Location>>,
    next_id: Mutex<i64>,
    calls: Mutex<Vec<&'static str>>,
    failures: Mutex<HashMap<&'static str, RemoteError>>,
    holds: Mutex<HashMap<&'static str, Arc<Notify>>>,
    entered: Notify,
}

impl FakeCatalog {
    pub fn seeded(items: Vec<Item>, categories: Vec<Category>, locations: Vec<Location>) -> Self {
        Self {
            items: Mutex::new(items),
            categories: Mutex::new(categories),
            locations: Mutex::new(locations),
            next_id: Mutex::new(100),
            ..Self::default()
        }
    }

    pub async fn fail(&self, operation: &'static str, err: RemoteError) {
        self.failures.lock().await.insert(operation, err);
    }

    pub async fn heal(&self, operation: &'static str) {
        self.failures.lock().await.remove(operation);
    }

    pub async fn hold(&self, operation: &'static str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.holds.lock().await.insert(operation, gate.clone());
        gate
    }

    /// Resolves once a held operation has been entered.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    pub async fn count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| **call == operation)
            .count()
    }

    pub async fn mutation_calls(&self) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| !call.starts_with("list_"))
            .count()
    }

    async fn enter(&self, operation: &'static str) -> Result<(), RemoteError> {
        self.calls.lock().await.push(operation);
        let gate = self.holds.lock().await.remove(operation);
        if let Some(gate) = gate {
            self.entered.notify_one();
            gate.notified().await;
        }
        match self.failures.lock().await.get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn allocate(&self) -> i64 {
        let mut next = self.next_id.lock().await;
        *next += 1;
        *next
    }

    fn draft_item(item_id: ItemId, draft: &ItemDraft) -> Item {
        Item {
            item_id,
            name: draft.name.clone(),
            description: Some(draft.description.clone()).filter(|text| !text.is_empty()),
            status: Some(draft.status.clone()),
            date_added: draft.date_added,
            category_id: Some(draft.category_id),
            location_id: Some(draft.location_id),
        }
    }
}

#[async_trait]
impl CatalogRemote for FakeCatalog {
    async fn list_items(&self) -> Result<Vec<Item>, RemoteError> {
        self.enter("list_items").await?;
        Ok(self.items.lock().await.clone())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RemoteError> {
        self.enter("list_categories").await?;
        Ok(self.categories.lock().await.clone())
    }

    async fn list_locations(&self) -> Result<Vec<Location>, RemoteError> {
        self.enter("list_locations").await?;
        Ok(self.locations.lock().await.clone())
    }

    async fn create_item(&self, draft: &ItemDraft) -> Result<Option<Item>, RemoteError> {
        self.enter("create_item").await?;
        let item = Self::draft_item(ItemId(self.allocate().await), draft);
        self.items.lock().await.push(item.clone());
        Ok(Some(item))
    }

    async fn update_item(
        &self,
        item_id: ItemId,
        draft: &ItemDraft,
    ) -> Result<Option<Item>, RemoteError> {
        self.enter("update_item").await?;
        let mut items = self.items.lock().await;
        let Some(slot) = items.iter_mut().find(|item| item.item_id == item_id) else {
            return Err(RemoteError::rejected(404, Some("Item not found".to_string())));
        };
        *slot = Self::draft_item(item_id, draft);
        Ok(Some(slot.clone()))
    }

    async fn delete_item(&self, item_id: ItemId) -> Result<(), RemoteError> {
        self.enter("delete_item").await?;
        self.items.lock().await.retain(|item| item.item_id != item_id);
        Ok(())
    }

    async fn create_category(
        &self,
        draft: &CategoryDraft,
    ) -> Result<Option<Category>, RemoteError> {
        self.enter("create_category").await?;
        let created = category(self.allocate().await, &draft.name);
        self.categories.lock().await.push(created.clone());
        Ok(Some(created))
    }

    async fn delete_category(&self, category_id: CategoryId) -> Result<(), RemoteError> {
        self.enter("delete_category").await?;
        self.categories
            .lock()
            .await
            .retain(|category| category.category_id != category_id);
        Ok(())
    }

    async fn create_location(
        &self,
        draft: &LocationDraft,
    ) -> Result<Option<Location>, RemoteError> {
        self.enter("create_location").await?;
        let created = location(self.allocate().await, &draft.building, &draft.floor);
        self.locations.lock().await.push(created.clone());
        Ok(Some(created))
    }

    async fn delete_location(&self, location_id: LocationId) -> Result<(), RemoteError> {
        self.enter("delete_location").await?;
        self.locations
            .lock()
            .await
            .retain(|location| location.location_id != location_id);
        Ok(())
    }
}
