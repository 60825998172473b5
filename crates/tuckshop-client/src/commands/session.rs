use tracing::{info, warn};

use crate::events;
use crate::session::INVALID_CREDENTIALS;
use crate::state::AppState;
use crate::views::{MainView, Screen};

/// Check the submitted credentials. On success switch to the main screen
/// and start the background loads (requires a Tokio runtime).
pub fn login(state: &mut AppState, username: &str, password: &str) -> bool {
    if !state.config.admin.verify(username, password) {
        warn!(username, "Rejected login attempt");
        state.screen = Screen::Login {
            message: Some(INVALID_CREDENTIALS.to_string()),
        };
        return false;
    }

    info!(username, "Admin logged in");
    state.screen = Screen::Main(Box::new(MainView::new(username)));
    events::spawn_initial_loads(&state.database, &state.ui_tx);
    true
}

/// Drop the main screen and return to the login screen.
pub fn logout(state: &mut AppState) {
    if let Some(view) = state.main_view() {
        info!(admin = %view.admin, "Admin logged out");
    }
    state.screen = Screen::default();
}
