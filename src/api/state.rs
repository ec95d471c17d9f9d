//! Application state for the Net Pay Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers,
/// such as the loaded jurisdiction configuration.
#[derive(Clone)]
pub struct AppState {
    /// The loaded jurisdiction configuration, shared read-only.
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone_send_sync() {
        fn assert_shareable<T: Clone + Send + Sync + 'static>() {}
        assert_shareable::<AppState>();
    }

    #[test]
    fn test_clones_share_one_snapshot() {
        let state = AppState::new(ConfigLoader::load("./config/de_2025").unwrap());
        let clone = state.clone();

        assert!(std::ptr::eq(state.config(), clone.config()));
        assert_eq!(clone.config().metadata().currency, "EUR");
    }
}
