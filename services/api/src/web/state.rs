//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;

use course_platform_core::CoursePlatformStore;

use crate::config::Config;
use crate::reporting::Reporter;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CoursePlatformStore>,
    pub reporter: Reporter,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn CoursePlatformStore>, config: Config) -> Self {
        Self {
            reporter: Reporter::new(store.clone()),
            store,
            config: Arc::new(config),
        }
    }
}
