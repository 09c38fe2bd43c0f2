//! List view state
//!
//! `GroceryApp` is what the presentation layer talks to. Each handler is one
//! UI event: it makes a single accessor call and, on success, re-fetches the
//! whole list. Failures are logged and turned into an `Alert`; nothing is
//! retried.

use std::path::Path;
use serde::Serialize;
use crate::form::ItemForm;
use crate::item::{GroceryItem, ItemId};
use crate::storage::GroceryStore;
use crate::{Error, Result};

/// Which item a submitted form applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(ItemId),
}

/// User-facing failure notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    fn new(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn not_ready() -> Self {
        Self::new("Initialization failed", "The grocery list could not be opened.")
    }

    pub fn load_failed() -> Self {
        Self::new("Error", "Could not load the grocery list.")
    }

    pub fn save_failed() -> Self {
        Self::new("Error", "Something went wrong. Please try again.")
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new("Missing information", message)
    }
}

/// Presentation-side narrowing of the fetched list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// `Some(true)` for bought only, `Some(false)` for still-to-buy only
    pub bought: Option<bool>,
    pub category: Option<String>,
}

impl ListFilter {
    pub fn matches(&self, item: &GroceryItem) -> bool {
        self.bought.is_none_or(|bought| item.bought == bought)
            && self.category.as_deref().is_none_or(|c| item.in_category(c))
    }

    /// Matching items, order preserved
    pub fn apply(&self, items: &[GroceryItem]) -> Vec<GroceryItem> {
        items.iter().filter(|item| self.matches(item)).cloned().collect()
    }
}

pub struct GroceryApp {
    store: Option<GroceryStore>,
    init_error: Option<String>,
    items: Vec<GroceryItem>,
    alert: Option<Alert>,
}

impl GroceryApp {
    /// App over an already opened store
    pub fn new(store: GroceryStore) -> Self {
        Self::from_open_result(Ok(store))
    }

    /// Open the store at `path`. An open failure leaves the app in the
    /// not-ready state instead of failing.
    pub fn start(path: &Path) -> Self {
        Self::from_open_result(GroceryStore::open(path))
    }

    pub fn from_open_result(result: Result<GroceryStore>) -> Self {
        let (store, init_error, alert) = match result {
            Ok(store) => (Some(store), None, None),
            Err(e) => {
                tracing::error!("Failed to initialize grocery store: {}", e);
                (None, Some(e.to_string()), Some(Alert::not_ready()))
            }
        };

        Self {
            store,
            init_error,
            items: Vec::new(),
            alert,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.store.is_some()
    }

    /// Why the store could not be opened, if it couldn't
    pub fn init_error(&self) -> Option<&str> {
        self.init_error.as_deref()
    }

    pub fn store(&self) -> Result<&GroceryStore> {
        self.store.as_ref().ok_or_else(|| {
            Error::StoreUnavailable(self.init_error.clone().unwrap_or_else(|| "not initialized".to_string()))
        })
    }

    /// Items from the last successful refresh, newest first
    pub fn items(&self) -> &[GroceryItem] {
        &self.items
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    /// Dismiss the current alert
    pub fn take_alert(&mut self) -> Option<Alert> {
        self.alert.take()
    }

    /// Re-fetch the list. On failure the previous items are kept and the
    /// error is returned rather than shown as an empty list.
    pub fn refresh(&mut self) -> Result<&[GroceryItem]> {
        let result = self.store().and_then(GroceryStore::list_all);

        match result {
            Ok(items) => {
                self.items = items;
                Ok(self.items.as_slice())
            }
            Err(e) => {
                tracing::error!("Failed to load items: {}", e);
                self.alert = Some(if self.is_ready() { Alert::load_failed() } else { Alert::not_ready() });
                Err(e)
            }
        }
    }

    /// Form for editing `id`, prefilled with its current values
    pub fn edit_form(&self, id: ItemId) -> Result<ItemForm> {
        self.store()?
            .get(id)?
            .map(|item| ItemForm::from_item(&item))
            .ok_or(Error::ItemNotFound(id.0))
    }

    /// Save a submitted form, adding or editing depending on `mode`
    pub fn submit(&mut self, mode: FormMode, form: &ItemForm) -> Result<ItemId> {
        let draft = match form.validate() {
            Ok(draft) => draft,
            Err(e) => {
                self.alert = Some(Alert::invalid("Please enter an item name."));
                return Err(e);
            }
        };

        let saved = self.store().and_then(|store| match mode {
            FormMode::Add => store.add(&draft.name, draft.quantity, &draft.category),
            FormMode::Edit(id) => {
                if !store.update(id, &draft.name, draft.quantity, &draft.category)? {
                    tracing::warn!("Edited item {} no longer exists", id);
                }
                Ok(id)
            }
        });

        let id = self.after_write("save item", saved)?;
        tracing::info!("Saved item {} ({})", id, draft.name);
        Ok(id)
    }

    /// Mark an item bought or not bought
    pub fn set_bought(&mut self, id: ItemId, bought: bool) -> Result<bool> {
        let result = self.store().and_then(|store| store.toggle_bought(id, bought));
        self.after_write("update item", result)
    }

    /// Flip the bought flag of an item. Returns the new flag, or `None` if
    /// the item does not exist.
    pub fn toggle(&mut self, id: ItemId) -> Result<Option<bool>> {
        let current = match self.store().and_then(|store| store.get(id)) {
            Ok(current) => current,
            Err(e) => {
                tracing::error!("Failed to read item {}: {}", id, e);
                self.alert = Some(if self.is_ready() { Alert::load_failed() } else { Alert::not_ready() });
                return Err(e);
            }
        };
        let Some(item) = current else {
            return Ok(None);
        };
        let bought = !item.bought;
        let changed = self.set_bought(id, bought)?;
        Ok(changed.then_some(bought))
    }

    pub fn delete(&mut self, id: ItemId) -> Result<bool> {
        let result = self.store().and_then(|store| store.remove(id));
        self.after_write("delete item", result)
    }

    /// Delete all bought items, returning how many were removed
    pub fn clear_bought(&mut self) -> Result<usize> {
        let result = self.store().and_then(GroceryStore::remove_all_bought);
        self.after_write("clear bought items", result)
    }

    /// Common tail of every write: alert on failure, re-fetch on success
    fn after_write<T>(&mut self, action: &str, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                // A failed re-fetch sets its own alert; the write itself stands.
                let _ = self.refresh();
                Ok(value)
            }
            Err(e) => {
                tracing::error!("Failed to {}: {}", action, e);
                self.alert = Some(if self.is_ready() { Alert::save_failed() } else { Alert::not_ready() });
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> GroceryApp {
        GroceryApp::new(GroceryStore::open_in_memory().unwrap())
    }

    #[test]
    fn test_fresh_app_is_ready_and_empty() {
        let mut app = app();
        assert!(app.is_ready());
        assert!(app.refresh().unwrap().is_empty());
        assert!(app.alert().is_none());
    }

    #[test]
    fn test_submit_add_refreshes_list() {
        let mut app = app();
        let id = app.submit(FormMode::Add, &ItemForm::new("Milk", "2", "Drinks")).unwrap();

        assert_eq!(app.items().len(), 1);
        assert_eq!(app.items()[0].id, id);
        assert_eq!(app.items()[0].quantity, 2);
    }

    #[test]
    fn test_submit_invalid_sets_alert() {
        let mut app = app();
        let err = app.submit(FormMode::Add, &ItemForm::new("  ", "1", "")).unwrap_err();

        assert!(matches!(err, Error::InvalidItem(_)));
        assert_eq!(app.alert().unwrap().title, "Missing information");
        assert!(app.refresh().unwrap().is_empty());
    }

    #[test]
    fn test_edit_uses_prefilled_form() {
        let mut app = app();
        let id = app.submit(FormMode::Add, &ItemForm::new("Tomatoes", "4", "Produce")).unwrap();

        let mut form = app.edit_form(id).unwrap();
        assert_eq!(form.quantity, "4");
        form.quantity = "abc".to_string();
        app.submit(FormMode::Edit(id), &form).unwrap();

        let item = &app.items()[0];
        assert_eq!(item.name, "Tomatoes");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.category, "Produce");
    }

    #[test]
    fn test_edit_form_missing_item() {
        let app = app();
        assert!(matches!(app.edit_form(ItemId(3)), Err(Error::ItemNotFound(3))));
    }

    #[test]
    fn test_toggle_and_clear() {
        let mut app = app();
        let milk = app.submit(FormMode::Add, &ItemForm::new("Milk", "1", "")).unwrap();
        app.submit(FormMode::Add, &ItemForm::new("Eggs", "12", "")).unwrap();

        assert_eq!(app.toggle(milk).unwrap(), Some(true));
        assert_eq!(app.toggle(milk).unwrap(), Some(false));
        assert_eq!(app.toggle(ItemId(77)).unwrap(), None);

        app.set_bought(milk, true).unwrap();
        assert_eq!(app.clear_bought().unwrap(), 1);
        assert_eq!(app.items().len(), 1);
        assert_eq!(app.items()[0].name, "Eggs");
    }

    #[test]
    fn test_toggle_missing_item_is_quiet() {
        let mut app = app();
        app.submit(FormMode::Add, &ItemForm::new("Rice", "1", "")).unwrap();

        assert_eq!(app.toggle(ItemId(40)).unwrap(), None);
        assert!(app.alert().is_none());
        assert!(!app.items()[0].bought);
    }

    #[test]
    fn test_toggle_read_failure_is_a_load_alert() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grocery.db");
        let mut app = GroceryApp::start(&path);
        let id = app.submit(FormMode::Add, &ItemForm::new("Rice", "1", "")).unwrap();

        rusqlite::Connection::open(&path).unwrap().execute("DROP TABLE items", []).unwrap();

        assert!(matches!(app.toggle(id), Err(Error::Storage(_))));
        assert_eq!(app.alert(), Some(&Alert::load_failed()));
    }

    #[test]
    fn test_delete() {
        let mut app = app();
        let id = app.submit(FormMode::Add, &ItemForm::new("Flour", "", "Baking")).unwrap();

        assert!(app.delete(id).unwrap());
        assert!(!app.delete(id).unwrap());
        assert!(app.items().is_empty());
    }

    #[test]
    fn test_list_filter() {
        let mut app = app();
        let milk = app.submit(FormMode::Add, &ItemForm::new("Milk", "1", "Drinks")).unwrap();
        app.submit(FormMode::Add, &ItemForm::new("Juice", "1", "drinks")).unwrap();
        app.submit(FormMode::Add, &ItemForm::new("Soap", "1", "")).unwrap();
        app.set_bought(milk, true).unwrap();

        let drinks = ListFilter { category: Some("DRINKS".into()), ..Default::default() };
        assert_eq!(drinks.apply(app.items()).len(), 2);

        let pending_drinks = ListFilter { bought: Some(false), category: Some("Drinks".into()) };
        let names: Vec<String> = pending_drinks.apply(app.items()).into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Juice"]);

        let bought = ListFilter { bought: Some(true), category: None };
        assert_eq!(bought.apply(app.items())[0].id, milk);

        assert_eq!(ListFilter::default().apply(app.items()).len(), 3);
    }

    #[test]
    fn test_not_ready_state() {
        let mut app = GroceryApp::from_open_result(Err(Error::StoreUnavailable("disk gone".into())));

        assert!(!app.is_ready());
        assert!(app.init_error().unwrap().contains("disk gone"));
        assert_eq!(app.take_alert().unwrap(), Alert::not_ready());

        assert!(matches!(app.refresh(), Err(Error::StoreUnavailable(_))));
        assert!(app.submit(FormMode::Add, &ItemForm::new("Milk", "1", "")).is_err());
        assert_eq!(app.alert(), Some(&Alert::not_ready()));
    }

    #[test]
    fn test_start_with_unopenable_path() {
        let dir = tempfile::tempdir().unwrap();
        // SQLite does not create missing parent directories
        let app = GroceryApp::start(&dir.path().join("missing").join("grocery.db"));
        assert!(!app.is_ready());
    }
}
