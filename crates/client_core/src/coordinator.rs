//! Mutation sequencing and the session state shown to the presentation layer.
//!
//! Every write goes Idle → Validating → Submitting → Succeeded | Failed → Idle.
//! The phase is held behind a guard that can only be taken from Idle, so a
//! second mutation while one is outstanding is rejected before it does
//! anything. Successful writes are followed by full reloads; the store is
//! never patched locally.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use shared::{
    domain::{Category, CategoryId, EntityKind, Item, ItemId, Location, LocationId},
    protocol::coerce_id,
};
use tracing::{info, warn};

use crate::{
    error::{fetch_failure_message, MutationError, MutationOperation, RemoteError, ValidationError},
    filter::{filter_items, FilterCriteria, StatusFilter},
    forms::{CategoryForm, EditorMode, ItemForm, LocationForm},
    notice::NoticeBoard,
    remote::CatalogRemote,
    store::{CollectionBatch, EntityStore},
    view::InventoryView,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
    Idle,
    Validating(MutationOperation),
    Submitting(MutationOperation),
    Succeeded(MutationOperation),
    Failed(MutationOperation),
}

impl MutationPhase {
    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }
}

/// Exclusive hold on the mutation phase. Dropping it returns to Idle.
struct PhaseGuard<'a> {
    slot: &'a Mutex<MutationPhase>,
    operation: MutationOperation,
}

impl PhaseGuard<'_> {
    fn set(&self, phase: fn(MutationOperation) -> MutationPhase) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = phase(self.operation);
    }

    fn submitting(&self) {
        self.set(MutationPhase::Submitting);
    }

    fn succeeded(&self) {
        self.set(MutationPhase::Succeeded);
    }

    fn failed(&self) {
        self.set(MutationPhase::Failed);
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = MutationPhase::Idle;
    }
}

/// Synchronous yes/no gate in front of every delete.
pub trait DeleteConfirmation {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> DeleteConfirmation for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirms every delete without asking.
pub struct Preconfirmed;

impl DeleteConfirmation for Preconfirmed {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Completed,
    Declined,
}

#[derive(Debug, Default)]
struct SessionForms {
    criteria: FilterCriteria,
    editor: EditorMode,
    item: ItemForm,
    category: CategoryForm,
    location: LocationForm,
}

/// One user's working session against the catalog.
pub struct InventorySession {
    remote: Arc<dyn CatalogRemote>,
    store: Arc<EntityStore>,
    notices: NoticeBoard,
    phase: Mutex<MutationPhase>,
    loading: AtomicBool,
    forms: Mutex<SessionForms>,
}

impl InventorySession {
    pub fn new(remote: Arc<dyn CatalogRemote>) -> Self {
        Self::with_parts(remote, Arc::new(EntityStore::new()), NoticeBoard::new())
    }

    pub fn with_parts(
        remote: Arc<dyn CatalogRemote>,
        store: Arc<EntityStore>,
        notices: NoticeBoard,
    ) -> Self {
        Self {
            remote,
            store,
            notices,
            phase: Mutex::new(MutationPhase::Idle),
            loading: AtomicBool::new(false),
            forms: Mutex::new(SessionForms::default()),
        }
    }

    pub fn store(&self) -> &Arc<EntityStore> {
        &self.store
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn phase(&self) -> MutationPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True while a mutation holds the phase; mutating actions should be disabled.
    pub fn is_busy(&self) -> bool {
        !self.phase().is_idle()
    }

    /// True while the item listing is being fetched or a write is on the wire.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
            || matches!(self.phase(), MutationPhase::Submitting(_))
    }

    fn forms(&self) -> MutexGuard<'_, SessionForms> {
        self.forms.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, operation: MutationOperation) -> Result<PhaseGuard<'_>, MutationError> {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        if !phase.is_idle() {
            warn!(
                operation = operation.as_str(),
                current = ?*phase,
                "inventory: mutation rejected while another is outstanding"
            );
            return Err(MutationError::Busy);
        }
        *phase = MutationPhase::Validating(operation);
        Ok(PhaseGuard {
            slot: &self.phase,
            operation,
        })
    }

    fn validated<T>(
        &self,
        guard: &PhaseGuard<'_>,
        result: Result<T, ValidationError>,
    ) -> Result<T, MutationError> {
        result.map_err(|err| {
            guard.failed();
            warn!(
                operation = guard.operation.as_str(),
                "inventory: validation failed: {err}"
            );
            self.notices.set_error(err.to_string());
            MutationError::Validation(err)
        })
    }

    fn remote_failed(&self, guard: &PhaseGuard<'_>, source: RemoteError) -> MutationError {
        guard.failed();
        let err = MutationError::remote(guard.operation, source);
        if let MutationError::Remote {
            message, source, ..
        } = &err
        {
            warn!(
                operation = guard.operation.as_str(),
                "inventory: remote rejected mutation: {source}"
            );
            self.notices.set_error(message.clone());
        }
        err
    }

    async fn completed(&self, guard: &PhaseGuard<'_>) {
        guard.succeeded();
        self.reload(guard.operation.reload_targets()).await;
        self.notices.set_success(guard.operation.success_message());
    }

    // --- base collections -------------------------------------------------

    pub async fn fetch_items(&self) -> Result<usize, RemoteError> {
        self.loading.store(true, Ordering::SeqCst);
        let result = self.remote.list_items().await;
        self.loading.store(false, Ordering::SeqCst);
        match result {
            Ok(items) => {
                let count = items.len();
                self.store.load(CollectionBatch::Items(items));
                self.notices.clear_error();
                Ok(count)
            }
            Err(err) => Err(self.fetch_failed(EntityKind::Item, err)),
        }
    }

    pub async fn fetch_categories(&self) -> Result<usize, RemoteError> {
        match self.remote.list_categories().await {
            Ok(categories) => {
                let count = categories.len();
                self.store.load(CollectionBatch::Categories(categories));
                Ok(count)
            }
            Err(err) => Err(self.fetch_failed(EntityKind::Category, err)),
        }
    }

    pub async fn fetch_locations(&self) -> Result<usize, RemoteError> {
        match self.remote.list_locations().await {
            Ok(locations) => {
                let count = locations.len();
                self.store.load(CollectionBatch::Locations(locations));
                Ok(count)
            }
            Err(err) => Err(self.fetch_failed(EntityKind::Location, err)),
        }
    }

    fn fetch_failed(&self, kind: EntityKind, err: RemoteError) -> RemoteError {
        warn!(
            kind = kind.as_str(),
            "inventory: fetch failed, keeping previous collection: {err}"
        );
        self.notices.set_error(fetch_failure_message(kind));
        err
    }

    async fn fetch(&self, kind: EntityKind) -> Result<usize, RemoteError> {
        match kind {
            EntityKind::Item => self.fetch_items().await,
            EntityKind::Category => self.fetch_categories().await,
            EntityKind::Location => self.fetch_locations().await,
        }
    }

    /// Loads all three collections and returns the item count.
    ///
    /// Only an item failure is returned. Items go first since a successful
    /// item fetch clears the error slot; category and location failures stay
    /// on the notice board with the previous collection kept.
    pub async fn refresh_all(&self) -> Result<usize, RemoteError> {
        let items = self.fetch_items().await;
        let (categories, locations) =
            futures::join!(self.fetch_categories(), self.fetch_locations());
        info!(
            items = ?items.as_ref().ok(),
            categories = ?categories.as_ref().ok(),
            locations = ?locations.as_ref().ok(),
            "inventory: catalog refreshed"
        );
        items
    }

    async fn reload(&self, kinds: &[EntityKind]) {
        for kind in kinds {
            // Failures are already on the notice board.
            let _ = self.fetch(*kind).await;
        }
    }

    // --- items ------------------------------------------------------------

    /// Yields the stored item when the service echoed it back.
    pub async fn create_item(&self, form: &ItemForm) -> Result<Option<Item>, MutationError> {
        let guard = self.begin(MutationOperation::AddItem)?;
        let draft = self.validated(&guard, form.validate())?;
        guard.submitting();
        self.notices.clear_error();
        match self.remote.create_item(&draft).await {
            Ok(item) => {
                info!(
                    item_id = ?item.as_ref().map(|item| item.item_id.0),
                    "inventory: item created"
                );
                self.completed(&guard).await;
                Ok(item)
            }
            Err(err) => Err(self.remote_failed(&guard, err)),
        }
    }

    pub async fn update_item(
        &self,
        item_id: ItemId,
        form: &ItemForm,
    ) -> Result<Option<Item>, MutationError> {
        let guard = self.begin(MutationOperation::UpdateItem)?;
        let draft = self.validated(&guard, form.validate())?;
        guard.submitting();
        self.notices.clear_error();
        match self.remote.update_item(item_id, &draft).await {
            Ok(item) => {
                info!(item_id = item_id.0, "inventory: item updated");
                self.completed(&guard).await;
                Ok(item)
            }
            Err(err) => Err(self.remote_failed(&guard, err)),
        }
    }

    pub async fn delete_item(
        &self,
        item_id: ItemId,
        confirmation: &dyn DeleteConfirmation,
    ) -> Result<MutationOutcome, MutationError> {
        let guard = self.begin(MutationOperation::DeleteItem)?;
        if !self.confirmed(&guard, confirmation) {
            return Ok(MutationOutcome::Declined);
        }
        guard.submitting();
        self.notices.clear_error();
        match self.remote.delete_item(item_id).await {
            Ok(()) => {
                info!(item_id = item_id.0, "inventory: item deleted");
                self.completed(&guard).await;
                Ok(MutationOutcome::Completed)
            }
            Err(err) => Err(self.remote_failed(&guard, err)),
        }
    }

    fn confirmed(&self, guard: &PhaseGuard<'_>, confirmation: &dyn DeleteConfirmation) -> bool {
        let prompt = guard.operation.confirmation_prompt().unwrap_or_default();
        let confirmed = confirmation.confirm(prompt);
        if !confirmed {
            info!(
                operation = guard.operation.as_str(),
                "inventory: delete declined by user"
            );
        }
        confirmed
    }

    // --- categories -------------------------------------------------------

    pub async fn create_category(
        &self,
        form: &CategoryForm,
    ) -> Result<Option<Category>, MutationError> {
        let guard = self.begin(MutationOperation::AddCategory)?;
        let draft = self.validated(&guard, form.validate())?;
        guard.submitting();
        self.notices.clear_error();
        match self.remote.create_category(&draft).await {
            Ok(category) => {
                info!(
                    category_id = ?category.as_ref().map(|category| category.category_id.0),
                    "inventory: category created"
                );
                self.completed(&guard).await;
                Ok(category)
            }
            Err(err) => Err(self.remote_failed(&guard, err)),
        }
    }

    pub async fn delete_category(
        &self,
        category_id: CategoryId,
        confirmation: &dyn DeleteConfirmation,
    ) -> Result<MutationOutcome, MutationError> {
        let guard = self.begin(MutationOperation::DeleteCategory)?;
        if !self.confirmed(&guard, confirmation) {
            return Ok(MutationOutcome::Declined);
        }
        guard.submitting();
        self.notices.clear_error();
        match self.remote.delete_category(category_id).await {
            Ok(()) => {
                info!(category_id = category_id.0, "inventory: category deleted");
                let cleared = self.forms().item.clear_category_if(category_id);
                if cleared {
                    info!(
                        category_id = category_id.0,
                        "inventory: cleared deleted category from item form"
                    );
                }
                self.completed(&guard).await;
                Ok(MutationOutcome::Completed)
            }
            Err(err) => Err(self.remote_failed(&guard, err)),
        }
    }

    // --- locations --------------------------------------------------------

    pub async fn create_location(
        &self,
        form: &LocationForm,
    ) -> Result<Option<Location>, MutationError> {
        let guard = self.begin(MutationOperation::AddLocation)?;
        let draft = self.validated(&guard, form.validate())?;
        guard.submitting();
        self.notices.clear_error();
        match self.remote.create_location(&draft).await {
            Ok(location) => {
                info!(
                    location_id = ?location.as_ref().map(|location| location.location_id.0),
                    "inventory: location created"
                );
                self.completed(&guard).await;
                Ok(location)
            }
            Err(err) => Err(self.remote_failed(&guard, err)),
        }
    }

    pub async fn delete_location(
        &self,
        location_id: LocationId,
        confirmation: &dyn DeleteConfirmation,
    ) -> Result<MutationOutcome, MutationError> {
        let guard = self.begin(MutationOperation::DeleteLocation)?;
        if !self.confirmed(&guard, confirmation) {
            return Ok(MutationOutcome::Declined);
        }
        guard.submitting();
        self.notices.clear_error();
        match self.remote.delete_location(location_id).await {
            Ok(()) => {
                info!(location_id = location_id.0, "inventory: location deleted");
                let cleared = self.forms().item.clear_location_if(location_id);
                if cleared {
                    info!(
                        location_id = location_id.0,
                        "inventory: cleared deleted location from item form"
                    );
                }
                self.completed(&guard).await;
                Ok(MutationOutcome::Completed)
            }
            Err(err) => Err(self.remote_failed(&guard, err)),
        }
    }

    // --- form-driven entry points -----------------------------------------

    pub fn open_new_item(&self) {
        let mut forms = self.forms();
        self.notices.clear_error();
        forms.item = ItemForm::default();
        forms.editor = EditorMode::Creating;
    }

    pub fn open_item_editor(&self, item: &Item) {
        let mut forms = self.forms();
        self.notices.clear_error();
        forms.item = ItemForm::from_item(item);
        forms.editor = EditorMode::Editing(item.item_id);
    }

    pub fn close_item_editor(&self) {
        let mut forms = self.forms();
        self.notices.clear_error();
        forms.item = ItemForm::default();
        forms.editor = EditorMode::Closed;
    }

    pub fn editor(&self) -> EditorMode {
        self.forms().editor
    }

    pub fn item_form(&self) -> ItemForm {
        self.forms().item.clone()
    }

    pub fn edit_item_form(&self, edit: impl FnOnce(&mut ItemForm)) {
        edit(&mut self.forms().item);
    }

    pub fn edit_category_form(&self, edit: impl FnOnce(&mut CategoryForm)) {
        edit(&mut self.forms().category);
    }

    pub fn edit_location_form(&self, edit: impl FnOnce(&mut LocationForm)) {
        edit(&mut self.forms().location);
    }

    /// Creates or updates depending on the editor mode; a closed editor creates.
    /// On success the editor closes and the form resets, unless the editor was
    /// reopened while the write was in flight.
    pub async fn submit_item_form(&self) -> Result<Option<Item>, MutationError> {
        let (editor, form) = {
            let forms = self.forms();
            (forms.editor, forms.item.clone())
        };
        let item = match editor {
            EditorMode::Editing(item_id) => self.update_item(item_id, &form).await?,
            EditorMode::Closed | EditorMode::Creating => self.create_item(&form).await?,
        };
        let mut forms = self.forms();
        if forms.editor == editor {
            forms.item = ItemForm::default();
            forms.editor = EditorMode::Closed;
        } else {
            info!(
                submitted = ?editor,
                current = ?forms.editor,
                "inventory: editor changed during submit, leaving it open"
            );
        }
        Ok(item)
    }

    pub async fn submit_category_form(&self) -> Result<Option<Category>, MutationError> {
        let form = self.forms().category.clone();
        let category = self.create_category(&form).await?;
        self.forms().category = CategoryForm::default();
        Ok(category)
    }

    pub async fn submit_location_form(&self) -> Result<Option<Location>, MutationError> {
        let form = self.forms().location.clone();
        let location = self.create_location(&form).await?;
        self.forms().location = LocationForm::default();
        Ok(location)
    }

    /// Deletes the category currently selected in the item form.
    pub async fn delete_selected_category(
        &self,
        confirmation: &dyn DeleteConfirmation,
    ) -> Result<MutationOutcome, MutationError> {
        let selected = self.forms().item.category.clone();
        let category_id = self.selected_reference(&selected, ValidationError::NoCategorySelected)?;
        self.delete_category(CategoryId(category_id), confirmation)
            .await
    }

    pub async fn delete_selected_location(
        &self,
        confirmation: &dyn DeleteConfirmation,
    ) -> Result<MutationOutcome, MutationError> {
        let selected = self.forms().item.location.clone();
        let location_id = self.selected_reference(&selected, ValidationError::NoLocationSelected)?;
        self.delete_location(LocationId(location_id), confirmation)
            .await
    }

    fn selected_reference(
        &self,
        selected: &str,
        missing: ValidationError,
    ) -> Result<i64, MutationError> {
        coerce_id(selected).ok_or_else(|| {
            self.notices.set_error(missing.to_string());
            MutationError::Validation(missing)
        })
    }

    // --- filtering --------------------------------------------------------

    pub fn criteria(&self) -> FilterCriteria {
        self.forms().criteria.clone()
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        self.forms().criteria.search_term = term.into();
    }

    /// An empty selection removes the filter.
    pub fn set_category_filter(&self, selection: Option<&str>) {
        self.forms().criteria.category = selection
            .filter(|value| !value.is_empty())
            .map(str::to_string);
    }

    pub fn set_location_filter(&self, selection: Option<&str>) {
        self.forms().criteria.location = selection
            .filter(|value| !value.is_empty())
            .map(str::to_string);
    }

    pub fn set_status_filter(&self, status: &str) {
        self.forms().criteria.status = StatusFilter::parse(status);
    }

    /// Items passing the current criteria, in store order.
    pub fn filtered_items(&self) -> Vec<Item> {
        let items = self.store.items();
        let criteria = self.criteria();
        filter_items(&items, &criteria)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn view(&self) -> InventoryView {
        let (criteria, editor, item_form) = {
            let forms = self.forms();
            (forms.criteria.clone(), forms.editor, forms.item.clone())
        };
        let mut view = InventoryView::project(&self.store.snapshot(), criteria);
        view.editor = editor;
        view.item_form = item_form;
        view.busy = self.is_busy();
        view.loading = self.is_loading();
        view.error = self.notices.error();
        view.success = self.notices.success();
        view
    }
}

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod tests;
