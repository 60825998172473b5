use std::sync::Arc;

use tracing::info;
use tuckshop_shared::price::Price;
use tuckshop_store::Purchase;

use crate::error::CommandError;
use crate::state::{lock_db, AppState};

/// Not-found message of the purchase panel.
pub const ITEM_NOT_FOUND: &str = "Item not found.";

/// Record a purchase of the item named in the purchase form.
///
/// The look-up is an exact name match; with duplicate names the oldest
/// item wins. The total is the price amount times the quantity, in the
/// price's own currency.
pub fn purchase_item(state: &mut AppState) -> Result<Purchase, CommandError> {
    let form = &state.main_view_mut()?.purchase;
    let item_name = form.item_name.clone();
    let quantity = parse_quantity(&form.quantity)?;
    if item_name.trim().is_empty() {
        return Err(CommandError::Validation("Item name is required".into()));
    }

    let database = Arc::clone(&state.database);
    let purchase = {
        let db = lock_db(&database)?;
        let item = db
            .find_items_by_name(&item_name)?
            .into_iter()
            .next()
            .ok_or_else(|| CommandError::NotFound(ITEM_NOT_FOUND.into()))?;

        let total = item.price.parse::<Price>()?.total(quantity)?;
        db.record_purchase(&item, quantity, &total.to_string())?
    };

    state.main_view_mut()?.purchase.message = Some(format!(
        "Purchase successful! Total price: {}",
        purchase.total_price
    ));

    info!(
        purchase_id = %purchase.id,
        item = %purchase.item_name,
        quantity,
        "Purchase completed"
    );
    Ok(purchase)
}

fn parse_quantity(raw: &str) -> Result<u32, CommandError> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::Validation(format!(
            "Quantity '{}' must be a positive whole number",
            raw.trim()
        ))),
    }
}
