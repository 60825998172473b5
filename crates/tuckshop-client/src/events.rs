//! Results handed from background tasks to the UI task.
//!
//! Right after login two blocking tasks read the `items` and `offers`
//! collections. Each posts one [`UiEvent`] on an unbounded channel; the UI
//! task applies events between user commands. The two loads are unordered.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tuckshop_store::{Database, Item, Offer};

use crate::state::AppState;
use crate::views::Screen;

#[derive(Debug)]
pub enum UiEvent {
    ItemsLoaded(Vec<Item>),
    OffersLoaded(Vec<Offer>),
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::ItemsLoaded(_) => "items-loaded",
            UiEvent::OffersLoaded(_) => "offers-loaded",
        }
    }
}

pub type UiSender = mpsc::UnboundedSender<UiEvent>;
pub type UiReceiver = mpsc::UnboundedReceiver<UiEvent>;

pub fn channel() -> (UiSender, UiReceiver) {
    mpsc::unbounded_channel()
}

/// Start the two initial loads. Must be called inside a Tokio runtime.
pub fn spawn_initial_loads(
    database: &Arc<Mutex<Database>>,
    ui_tx: &UiSender,
) -> (JoinHandle<()>, JoinHandle<()>) {
    let items = spawn_load(
        "items",
        Arc::clone(database),
        ui_tx.clone(),
        Database::list_items,
        UiEvent::ItemsLoaded,
    );
    let offers = spawn_load(
        "offers",
        Arc::clone(database),
        ui_tx.clone(),
        Database::list_offers,
        UiEvent::OffersLoaded,
    );
    (items, offers)
}

fn spawn_load<T, L, W>(
    what: &'static str,
    database: Arc<Mutex<Database>>,
    ui_tx: UiSender,
    load: L,
    wrap: W,
) -> JoinHandle<()>
where
    T: Send + 'static,
    L: FnOnce(&Database) -> tuckshop_store::Result<T> + Send + 'static,
    W: FnOnce(T) -> UiEvent + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let result = match database.lock() {
            Ok(db) => load(&*db),
            Err(e) => {
                tracing::error!(what, error = %e, "Database lock poisoned, skipping load");
                return;
            }
        };

        // Failures only reach the log; the view simply stays empty.
        match result {
            Ok(rows) => {
                if ui_tx.send(wrap(rows)).is_err() {
                    tracing::debug!(what, "UI task gone, dropping load result");
                }
            }
            Err(e) => tracing::error!(what, error = %e, "Error loading collection"),
        }
    })
}

/// Apply a background result to the view. Returns `true` if the screen
/// changed. Results for a view that a foreground reload already refreshed
/// are stale and dropped.
pub fn apply(state: &mut AppState, event: UiEvent) -> bool {
    let name = event.name();
    let Screen::Main(view) = &mut state.screen else {
        tracing::debug!(event = name, "Not on the main screen, dropping event");
        return false;
    };

    match event {
        UiEvent::ItemsLoaded(items) if !view.catalog.loaded => {
            tracing::debug!(count = items.len(), "Items loaded");
            view.catalog.set_items(items);
            true
        }
        UiEvent::OffersLoaded(offers) if !view.offers.loaded => {
            tracing::debug!(count = offers.len(), "Offers loaded");
            view.offers.set_offers(offers);
            true
        }
        _ => {
            tracing::debug!(event = name, "View already refreshed, dropping stale event");
            false
        }
    }
}
