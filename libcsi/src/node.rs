//! CSI Node service.
//!
//! The Node service runs on each worker node and handles the local filesystem
//! operations required to make a volume available to workloads:
//!
//! 1. **Stage** — mount the volume at a global staging path.
//! 2. **Publish** — bind-mount the staging path into the container.
//! 3. **Unpublish** — remove the bind-mount.
//! 4. **Unstage** — unmount the staging path.
//!
//! Node capabilities are advertised through [`CsiNode::get_capabilities`]
//! but not gated by the driver; implementations check the declared set
//! themselves when they need to.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::driver::CsiDriver;
use crate::error::CsiError;
use crate::types::{
    NodeInfo, NodePublishVolumeRequest, NodeServiceCapability, NodeStageVolumeRequest, VolumeId,
};

/// Node service — local mount / unmount operations.
#[async_trait]
pub trait CsiNode: Send + Sync {
    /// Stage a volume at the global staging path.
    ///
    /// This is idempotent — calling it again for an already-staged volume
    /// should succeed without error.
    async fn stage_volume(&self, req: NodeStageVolumeRequest) -> Result<(), CsiError>;

    /// Unstage a volume from the staging path.
    async fn unstage_volume(
        &self,
        volume_id: &VolumeId,
        staging_target_path: &str,
    ) -> Result<(), CsiError>;

    /// Publish a volume: bind-mount the staged global path into the container.
    async fn publish_volume(&self, req: NodePublishVolumeRequest) -> Result<(), CsiError>;

    /// Unpublish a volume: unmount the bind-mount from the container path.
    async fn unpublish_volume(
        &self,
        volume_id: &VolumeId,
        target_path: &str,
    ) -> Result<(), CsiError>;

    /// Grow the filesystem of a published volume, returning the new size.
    async fn expand_volume(
        &self,
        volume_id: &VolumeId,
        volume_path: &str,
        capacity_bytes: u64,
    ) -> Result<u64, CsiError>;

    /// Return information about the node on which this service is running.
    async fn get_info(&self) -> Result<NodeInfo, CsiError>;

    /// Advertise the node capabilities this plugin supports.
    async fn get_capabilities(&self) -> Result<Vec<NodeServiceCapability>, CsiError>;
}

/// Node service that answers discovery calls from a [`CsiDriver`] and
/// reports every mount operation as unimplemented.
#[derive(Debug, Clone)]
pub struct DefaultNodeServer {
    driver: Arc<CsiDriver>,
    max_volumes: u64,
}

impl DefaultNodeServer {
    /// Node server answering from `driver`, advertising `max_volumes`.
    pub fn new(driver: Arc<CsiDriver>, max_volumes: u64) -> Self {
        Self {
            driver,
            max_volumes,
        }
    }

    /// The registry this server reports.
    pub fn driver(&self) -> &CsiDriver {
        &self.driver
    }
}

#[async_trait]
impl CsiNode for DefaultNodeServer {
    async fn stage_volume(&self, _req: NodeStageVolumeRequest) -> Result<(), CsiError> {
        Err(CsiError::Unimplemented("NodeStageVolume".into()))
    }

    async fn unstage_volume(
        &self,
        _volume_id: &VolumeId,
        _staging_target_path: &str,
    ) -> Result<(), CsiError> {
        Err(CsiError::Unimplemented("NodeUnstageVolume".into()))
    }

    async fn publish_volume(&self, _req: NodePublishVolumeRequest) -> Result<(), CsiError> {
        Err(CsiError::Unimplemented("NodePublishVolume".into()))
    }

    async fn unpublish_volume(
        &self,
        _volume_id: &VolumeId,
        _target_path: &str,
    ) -> Result<(), CsiError> {
        Err(CsiError::Unimplemented("NodeUnpublishVolume".into()))
    }

    async fn expand_volume(
        &self,
        _volume_id: &VolumeId,
        _volume_path: &str,
        _capacity_bytes: u64,
    ) -> Result<u64, CsiError> {
        Err(CsiError::Unimplemented("NodeExpandVolume".into()))
    }

    #[instrument(skip(self))]
    async fn get_info(&self) -> Result<NodeInfo, CsiError> {
        Ok(NodeInfo {
            node_id: self.driver.node_id().to_owned(),
            max_volumes: self.max_volumes,
        })
    }

    #[instrument(skip(self))]
    async fn get_capabilities(&self) -> Result<Vec<NodeServiceCapability>, CsiError> {
        Ok(self.driver.node_service_capabilities().to_vec())
    }
}
