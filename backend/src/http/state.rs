//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::RatingRecordSource;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Rating source used by every endpoint
    pub source: Arc<dyn RatingRecordSource>,
}

impl AppState {
    /// Create a new application state with the given source.
    pub fn new(source: Arc<dyn RatingRecordSource>) -> Self {
        Self { source }
    }
}
