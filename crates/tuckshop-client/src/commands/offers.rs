use std::sync::Arc;

use tracing::info;
use tuckshop_shared::types::OfferId;
use tuckshop_store::{Offer, StoreError};

use super::reread;
use crate::error::CommandError;
use crate::state::{lock_db, AppState};

pub fn reload_offers(state: &mut AppState) -> Result<usize, CommandError> {
    state.require_login()?;
    let database = Arc::clone(&state.database);
    let offers = lock_db(&database)?.list_offers()?;
    let count = offers.len();
    state.main_view_mut()?.offers.set_offers(offers);
    Ok(count)
}

/// Append an offer. Blank text is ignored and returns `None`.
pub fn add_offer(state: &mut AppState, text: &str) -> Result<Option<Offer>, CommandError> {
    state.require_login()?;
    let description = text.trim();
    if description.is_empty() {
        return Ok(None);
    }

    let database = Arc::clone(&state.database);
    let (offer, offers) = {
        let db = lock_db(&database)?;
        let offer = db.create_offer(description)?;
        (offer, reread("offers", db.list_offers()))
    };
    let view = state.main_view_mut()?;
    if let Some(offers) = offers {
        view.offers.set_offers(offers);
    }

    info!(offer_id = %offer.id, "Offer added");
    Ok(Some(offer))
}

/// Select row `index` (0-based).
pub fn select_offer(state: &mut AppState, index: usize) -> Result<Offer, CommandError> {
    state.main_view_mut()?.offers.select(index).cloned()
}

/// Select the offer whose displayed line reads `line`.
pub fn select_offer_text(state: &mut AppState, line: &str) -> Result<Offer, CommandError> {
    state.main_view_mut()?.offers.select_text(line).cloned()
}

/// Replace the selected offer's text.
pub fn edit_offer(state: &mut AppState, text: &str) -> Result<Offer, CommandError> {
    let id = selected_offer_id(state)?;
    let description = text.trim();
    if description.is_empty() {
        return Err(CommandError::Validation("Offer text is required".into()));
    }

    let database = Arc::clone(&state.database);
    let (offer, offers) = {
        let db = lock_db(&database)?;
        let offer = db.update_offer(id, description).map_err(|e| match e {
            StoreError::NotFound => {
                CommandError::NotFound("The selected offer no longer exists".into())
            }
            other => other.into(),
        })?;
        (offer, reread("offers", db.list_offers()))
    };
    let view = state.main_view_mut()?;
    if let Some(offers) = offers {
        view.offers.set_offers(offers);
    }

    info!(offer_id = %offer.id, "Offer edited");
    Ok(offer)
}

/// Delete the selected offer. Without a selection nothing is touched.
pub fn remove_offer(state: &mut AppState) -> Result<Offer, CommandError> {
    let offer = state
        .main_view_mut()?
        .offers
        .selected_offer()
        .cloned()
        .ok_or(CommandError::NoSelection("No offer selected"))?;

    let database = Arc::clone(&state.database);
    let (existed, offers) = {
        let db = lock_db(&database)?;
        let existed = db.delete_offer(offer.id)?;
        (existed, reread("offers", db.list_offers()))
    };
    let view = state.main_view_mut()?;
    match offers {
        Some(offers) => view.offers.set_offers(offers),
        None => view.offers.selected = None,
    }

    info!(offer_id = %offer.id, existed, "Offer removed");
    Ok(offer)
}

fn selected_offer_id(state: &mut AppState) -> Result<OfferId, CommandError> {
    state
        .main_view_mut()?
        .offers
        .selected_offer()
        .map(|offer| offer.id)
        .ok_or(CommandError::NoSelection("No offer selected"))
}
