pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::wizard::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Wizard API
        .route("/api/v1/wizard", get(handlers::handle_get_wizard))
        .route("/api/v1/wizard/events", post(handlers::handle_wizard_event))
        .route("/api/v1/wizard/restart", post(handlers::handle_restart))
        .with_state(state)
}
