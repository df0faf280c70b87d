use crate::wizard::driver::WizardDriver;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single wizard session plus the collaborators its effects run against.
    pub driver: WizardDriver,
}
