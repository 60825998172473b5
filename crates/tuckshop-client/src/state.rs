//! Application state owned by the UI task.
//!
//! The store handle is the only piece shared with background tasks, hence
//! the `Arc<Mutex<>>`; everything else is touched only by the UI task.

use std::sync::{Arc, Mutex, MutexGuard};

use tuckshop_store::Database;

use crate::config::ShopConfig;
use crate::error::CommandError;
use crate::events::UiSender;
use crate::views::{MainView, Screen};

pub struct AppState {
    pub config: Arc<ShopConfig>,

    /// Document store handle, shared with the initial background loads.
    pub database: Arc<Mutex<Database>>,

    /// Login screen until the admin logs in, then the main screen.
    pub screen: Screen,

    /// Sender half used by background tasks to hand results to the UI task.
    pub ui_tx: UiSender,
}

impl AppState {
    pub fn new(config: Arc<ShopConfig>, database: Database, ui_tx: UiSender) -> Self {
        Self {
            config,
            database: Arc::new(Mutex::new(database)),
            screen: Screen::default(),
            ui_tx,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.screen, Screen::Main(_))
    }

    pub fn main_view(&self) -> Option<&MainView> {
        match &self.screen {
            Screen::Main(view) => Some(view.as_ref()),
            Screen::Login { .. } => None,
        }
    }

    pub fn main_view_mut(&mut self) -> Result<&mut MainView, CommandError> {
        match &mut self.screen {
            Screen::Main(view) => Ok(view.as_mut()),
            Screen::Login { .. } => Err(CommandError::NotLoggedIn),
        }
    }

    pub(crate) fn require_login(&self) -> Result<(), CommandError> {
        if self.is_logged_in() {
            Ok(())
        } else {
            Err(CommandError::NotLoggedIn)
        }
    }
}

pub(crate) fn lock_db(database: &Mutex<Database>) -> Result<MutexGuard<'_, Database>, CommandError> {
    database
        .lock()
        .map_err(|e| CommandError::LockPoisoned(e.to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::events::{self, UiReceiver};

    /// Logged-out state over a fresh database. Keep the `TempDir` alive.
    pub(crate) fn test_state() -> (tempfile::TempDir, AppState, UiReceiver) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("shop.db")).unwrap();
        let (tx, rx) = events::channel();
        let state = AppState::new(Arc::new(ShopConfig::default()), db, tx);
        (dir, state, rx)
    }

    /// Same, already on the main screen (no background loads spawned).
    pub(crate) fn logged_in_state() -> (tempfile::TempDir, AppState, UiReceiver) {
        let (dir, mut state, rx) = test_state();
        state.screen = Screen::Main(Box::new(MainView::new("Admin")));
        (dir, state, rx)
    }

    /// Write a raw `documents` row, bypassing the typed store API.
    pub(crate) fn insert_raw(state: &AppState, collection: &str, data: &str) {
        let id = tuckshop_shared::types::ItemId::new().to_string();
        state
            .database
            .lock()
            .unwrap()
            .conn()
            .execute(
                "INSERT INTO documents (collection, id, data, created_at, updated_at)
                 VALUES (?1, ?2, ?3, '2024-01-01T00:00:00+00:00', '2024-01-01T00:00:00+00:00')",
                [collection, id.as_str(), data],
            )
            .unwrap();
    }

    #[test]
    fn starts_logged_out() {
        let (_dir, mut state, _rx) = test_state();
        assert!(!state.is_logged_in());
        assert!(matches!(state.main_view_mut(), Err(CommandError::NotLoggedIn)));
    }
}
