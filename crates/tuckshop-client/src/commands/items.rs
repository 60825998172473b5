use std::sync::Arc;

use tracing::info;
use tuckshop_store::{Item, StoreError};

use super::reread;
use crate::error::CommandError;
use crate::state::{lock_db, AppState};

/// Re-read the full catalog into the view. Returns the row count.
pub fn reload_items(state: &mut AppState) -> Result<usize, CommandError> {
    state.require_login()?;
    let database = Arc::clone(&state.database);
    let items = lock_db(&database)?.list_items()?;
    let count = items.len();
    state.main_view_mut()?.catalog.set_items(items);
    Ok(count)
}

/// Select row `index` (0-based) and copy it into the form.
pub fn select_item(state: &mut AppState, index: usize) -> Result<Item, CommandError> {
    let catalog = &mut state.main_view_mut()?.catalog;
    catalog.select(index).cloned()
}

pub fn clear_form(state: &mut AppState) -> Result<(), CommandError> {
    state.main_view_mut()?.catalog.reset_form();
    Ok(())
}

/// Add the form's item, reload the list and clear the form.
pub fn add_item(state: &mut AppState) -> Result<Item, CommandError> {
    let fields = state.main_view_mut()?.catalog.form.to_fields()?;

    let database = Arc::clone(&state.database);
    let (item, items) = {
        let db = lock_db(&database)?;
        let item = db.create_item(&fields)?;
        (item, reread("items", db.list_items()))
    };

    let catalog = &mut state.main_view_mut()?.catalog;
    if let Some(items) = items {
        catalog.set_items(items);
    }
    catalog.form.clear();

    info!(item_id = %item.id, name = %item.name, "Item added");
    Ok(item)
}

/// Write the form back to the selected item, reload, and clear form and
/// selection.
pub fn update_item(state: &mut AppState) -> Result<Item, CommandError> {
    let catalog = &state.main_view_mut()?.catalog;
    let id = catalog
        .selected_item()
        .map(|item| item.id)
        .ok_or(CommandError::NoSelection("No item selected"))?;
    let fields = catalog.form.to_fields()?;

    let database = Arc::clone(&state.database);
    let (item, items) = {
        let db = lock_db(&database)?;
        let item = db.update_item(id, &fields).map_err(|e| match e {
            StoreError::NotFound => {
                CommandError::NotFound("The selected item no longer exists".into())
            }
            other => other.into(),
        })?;
        (item, reread("items", db.list_items()))
    };

    let catalog = &mut state.main_view_mut()?.catalog;
    if let Some(items) = items {
        catalog.set_items(items);
    }
    catalog.reset_form();

    info!(item_id = %item.id, name = %item.name, "Item updated");
    Ok(item)
}

/// Delete the selected item once `confirm` agrees. Returns `false` when
/// the user declined; nothing changes in that case.
pub fn delete_item(
    state: &mut AppState,
    confirm: impl FnOnce(&Item) -> bool,
) -> Result<bool, CommandError> {
    let item = state
        .main_view_mut()?
        .catalog
        .selected_item()
        .cloned()
        .ok_or(CommandError::NoSelection("No item selected"))?;

    if !confirm(&item) {
        return Ok(false);
    }

    let database = Arc::clone(&state.database);
    let (existed, items) = {
        let db = lock_db(&database)?;
        let existed = db.delete_item(item.id)?;
        (existed, reread("items", db.list_items()))
    };

    let catalog = &mut state.main_view_mut()?.catalog;
    if let Some(items) = items {
        catalog.set_items(items);
    }
    catalog.reset_form();

    info!(item_id = %item.id, name = %item.name, existed, "Item deleted");
    Ok(true)
}
