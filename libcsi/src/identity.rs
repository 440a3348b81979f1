//! CSI Identity service.
//!
//! The Identity service allows callers to discover plugin metadata and check
//! plugin health.  Every CSI plugin must implement this service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::driver::CsiDriver;
use crate::error::CsiError;
use crate::types::{PluginCapability, PluginInfo};

/// Identity service — plugin discovery and health checks.
#[async_trait]
pub trait CsiIdentity: Send + Sync {
    /// Return the plugin name and version.
    async fn get_plugin_info(&self) -> Result<PluginInfo, CsiError>;

    /// Liveness check.  Returns `true` when the plugin is healthy.
    async fn check_health(&self) -> Result<bool, CsiError>;

    /// Advertise the capabilities supported by this plugin.
    async fn get_plugin_capabilities(&self) -> Result<Vec<PluginCapability>, CsiError>;
}

/// Identity service answering from a [`CsiDriver`] registry.
#[derive(Debug, Clone)]
pub struct DefaultIdentityServer {
    driver: Arc<CsiDriver>,
}

impl DefaultIdentityServer {
    /// Identity server answering from `driver`.
    pub fn new(driver: Arc<CsiDriver>) -> Self {
        Self { driver }
    }

    /// The registry this server reports.
    pub fn driver(&self) -> &CsiDriver {
        &self.driver
    }
}

#[async_trait]
impl CsiIdentity for DefaultIdentityServer {
    /// A driver may be built without a version, but it cannot report itself
    /// to the orchestrator until one is set.
    #[instrument(skip(self))]
    async fn get_plugin_info(&self) -> Result<PluginInfo, CsiError> {
        if self.driver.version().is_empty() {
            return Err(CsiError::Unavailable("driver is missing version".into()));
        }
        Ok(PluginInfo {
            name: self.driver.name().to_owned(),
            vendor_version: self.driver.version().to_owned(),
        })
    }

    async fn check_health(&self) -> Result<bool, CsiError> {
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn get_plugin_capabilities(&self) -> Result<Vec<PluginCapability>, CsiError> {
        Ok(vec![PluginCapability::ControllerService])
    }
}
