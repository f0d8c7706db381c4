//! Shared application state.

use std::sync::Arc;

use domain::{FormBinder, HealthController, OwnerController, ViewRenderer};
use store::{OwnerRepository, VetRepository};

/// A store that can back every handler.
pub trait ClinicStore: OwnerRepository + VetRepository + Clone + 'static {}

impl<T: OwnerRepository + VetRepository + Clone + 'static> ClinicStore for T {}

/// Shared application state accessible from all handlers.
pub struct AppState<S: ClinicStore> {
    pub owners: OwnerController<S>,
    pub health: HealthController<S>,
    pub renderer: Arc<dyn ViewRenderer>,
}

impl<S: ClinicStore> AppState<S> {
    pub fn new(store: S, renderer: Arc<dyn ViewRenderer>) -> Self {
        Self {
            owners: OwnerController::new(store.clone()),
            health: HealthController::new(store),
            renderer,
        }
    }

    /// A binder restricted the way the owner pages require.
    pub fn owner_binder(&self) -> FormBinder {
        let mut binder = FormBinder::new();
        self.owners.set_allowed_fields(&mut binder);
        binder
    }
}
