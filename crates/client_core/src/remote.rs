use async_trait::async_trait;
use shared::domain::{
    Category, CategoryDraft, CategoryId, Item, ItemDraft, ItemId, Location, LocationDraft,
    LocationId,
};

use crate::error::RemoteError;

/// Contract of the catalog service, the sole writer of truth.
///
/// Implementations return entities already normalized into domain shape.
/// Writes yield the stored entity when the service echoes one back and `None`
/// when it accepted the write without a usable body.
#[async_trait]
pub trait CatalogRemote: Send + Sync {
    async fn list_items(&self) -> Result<Vec<Item>, RemoteError>;
    async fn list_categories(&self) -> Result<Vec<Category>, RemoteError>;
    async fn list_locations(&self) -> Result<Vec<Location>, RemoteError>;

    async fn create_item(&self, draft: &ItemDraft) -> Result<Option<Item>, RemoteError>;
    async fn update_item(
        &self,
        item_id: ItemId,
        draft: &ItemDraft,
    ) -> Result<Option<Item>, RemoteError>;
    async fn delete_item(&self, item_id: ItemId) -> Result<(), RemoteError>;

    async fn create_category(&self, draft: &CategoryDraft)
        -> Result<Option<Category>, RemoteError>;
    async fn delete_category(&self, category_id: CategoryId) -> Result<(), RemoteError>;

    async fn create_location(&self, draft: &LocationDraft)
        -> Result<Option<Location>, RemoteError>;
    async fn delete_location(&self, location_id: LocationId) -> Result<(), RemoteError>;
}
