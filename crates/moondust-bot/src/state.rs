//! Shared application state.

use std::sync::Arc;

use crate::dispatcher::Dispatcher;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The interaction dispatcher.
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}
