//! Shared application state for all routes.

use crate::store::BookStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Single long-lived store handle, shared by every request.
    pub store: Arc<dyn BookStore>,
}

impl AppState {
    pub fn new(store: impl BookStore + 'static) -> Self {
        AppState {
            store: Arc::new(store),
        }
    }
}
