//! Client-side state for the inventory catalog: a snapshot store of items,
//! categories and locations, the filters and display resolution applied to
//! it, and the coordinator that sequences every write against the catalog
//! service.

pub mod coordinator;
pub mod error;
pub mod filter;
pub mod forms;
pub mod http;
pub mod normalize;
pub mod notice;
pub mod remote;
pub mod resolve;
pub mod store;
pub mod view;

pub use coordinator::{
    DeleteConfirmation, InventorySession, MutationOutcome, MutationPhase, Preconfirmed,
};
pub use error::{ClientSetupError, MutationError, MutationOperation, RemoteError, ValidationError};
pub use filter::{filter_items, FilterCriteria, StatusFilter};
pub use forms::{CategoryForm, EditorMode, ItemForm, LocationForm};
pub use http::{normalize_server_url, HttpCatalogClient, HttpClientOptions};
pub use notice::{NoticeBoard, SUCCESS_NOTICE_TTL};
pub use remote::CatalogRemote;
pub use resolve::{ItemRow, SENTINEL};
pub use store::{CollectionBatch, EntityStore, StoreSnapshot};
pub use view::{InventoryView, SelectorOption};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
