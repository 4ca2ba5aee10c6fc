//! Application state for dependency injection.

use std::sync::Arc;

use crate::procedures::ServiceProcedures;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub procedures: Arc<dyn ServiceProcedures>,
}

impl AppState {
    /// Create new app state.
    pub fn new(procedures: Arc<dyn ServiceProcedures>) -> Self {
        Self { procedures }
    }
}
