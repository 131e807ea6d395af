//! Application state for the employee directory HTTP layer.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::service::EmployeeService;
use crate::uploads::PictureStore;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// data service, the picture store and the loaded configuration.
#[derive(Clone)]
pub struct AppState {
    service: EmployeeService,
    pictures: PictureStore,
    config: Arc<AppConfig>,
}

impl AppState {
    /// Creates the state from a ready service and the application config.
    pub fn new(service: EmployeeService, config: AppConfig) -> Self {
        Self {
            service,
            pictures: PictureStore::new(&config.uploads),
            config: Arc::new(config),
        }
    }

    /// The employee data service.
    pub fn service(&self) -> &EmployeeService {
        &self.service
    }

    /// Where uploaded pictures are written.
    pub fn pictures(&self) -> &PictureStore {
        &self.pictures
    }

    /// The loaded configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Whether cookies are marked `Secure`.
    pub fn secure_cookies(&self) -> bool {
        self.config.server.session_cookie_secure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_picture_store_follows_upload_config() {
        let mut config = AppConfig::default();
        config.uploads.directory = "/tmp/pictures".into();
        config.server.session_cookie_secure = true;

        let state = AppState::new(
            EmployeeService::new(Store::in_memory().await.unwrap()),
            config,
        );
        assert_eq!(state.pictures().directory(), std::path::Path::new("/tmp/pictures"));
        assert!(state.secure_cookies());
    }
}
