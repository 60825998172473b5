//! User actions, one sub-module per panel.
//!
//! Every command reads the form state from the view, makes a direct store
//! call, re-reads the affected collection and refreshes the view. Failures
//! come back as [`CommandError`](crate::error::CommandError) for the
//! front-end to show.

pub mod items;
pub mod offers;
pub mod purchases;
pub mod session;

use tracing::warn;
use tuckshop_store::StoreError;

/// Re-read a collection after a write that already succeeded. A failed
/// re-read is logged and yields `None`; the view keeps its previous rows.
pub(crate) fn reread<T>(what: &'static str, result: Result<Vec<T>, StoreError>) -> Option<Vec<T>> {
    match result {
        Ok(rows) => Some(rows),
        Err(e) => {
            warn!(what, error = %e, "Reload after write failed");
            None
        }
    }
}
