//! Gateway state
//!
//! Shared dependencies for REST handlers and WebSocket connections.

use std::sync::Arc;

use stream_common::AppConfig;
use stream_service::ServiceContext;

use crate::connection::ConnectionManager;

#[derive(Clone)]
pub struct GatewayState {
    service_context: Arc<ServiceContext>,
    connection_manager: Arc<ConnectionManager>,
    config: Arc<AppConfig>,
}

impl GatewayState {
    pub fn new(
        service_context: ServiceContext,
        connection_manager: Arc<ConnectionManager>,
        config: AppConfig,
    ) -> Self {
        Self {
            service_context: Arc::new(service_context),
            connection_manager,
            config: Arc::new(config),
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn connection_manager(&self) -> &ConnectionManager {
        &self.connection_manager
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("connection_manager", &self.connection_manager)
            .field("config", &"AppConfig")
            .finish()
    }
}
