//! CSI Controller service.
//!
//! The Controller service manages the centralized volume lifecycle: creation,
//! deletion, attachment, capability validation, listing, and capacity
//! queries.  Every call is gated on the capabilities the driver advertises:
//! [`ControllerRequest::required_capability`] names the capability a request
//! needs and [`CsiDriver::validate_controller_request`] enforces it.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::driver::CsiDriver;
use crate::error::CsiError;
use crate::types::{
    ControllerCapabilityKind, ControllerServiceCapability, CreateVolumeRequest, Volume,
    VolumeCapability, VolumeId,
};

/// Controller RPCs, used to look up the capability each one requires.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ControllerRequest {
    /// `CreateVolume`.
    CreateVolume,
    /// `DeleteVolume`.
    DeleteVolume,
    /// `ControllerPublishVolume`.
    ControllerPublishVolume,
    /// `ControllerUnpublishVolume`.
    ControllerUnpublishVolume,
    /// `ValidateVolumeCapabilities`.
    ValidateVolumeCapabilities,
    /// `ListVolumes`.
    ListVolumes,
    /// `GetCapacity`.
    GetCapacity,
    /// `ControllerGetCapabilities`.
    ControllerGetCapabilities,
    /// `ControllerExpandVolume`.
    ControllerExpandVolume,
}

impl ControllerRequest {
    /// Capability the driver must advertise before serving this request.
    ///
    /// Requests that every controller must serve map to
    /// [`ControllerCapabilityKind::Unknown`].
    pub const fn required_capability(&self) -> ControllerCapabilityKind {
        match self {
            Self::CreateVolume | Self::DeleteVolume => ControllerCapabilityKind::CreateDeleteVolume,
            Self::ControllerPublishVolume | Self::ControllerUnpublishVolume => {
                ControllerCapabilityKind::PublishUnpublishVolume
            }
            Self::ListVolumes => ControllerCapabilityKind::ListVolumes,
            Self::GetCapacity => ControllerCapabilityKind::GetCapacity,
            Self::ControllerExpandVolume => ControllerCapabilityKind::ExpandVolume,
            Self::ValidateVolumeCapabilities | Self::ControllerGetCapabilities => {
                ControllerCapabilityKind::Unknown
            }
        }
    }
}

impl fmt::Display for ControllerRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Controller service — centralized volume management.
#[async_trait]
pub trait CsiController: Send + Sync {
    /// Advertise the controller capabilities this plugin supports.
    async fn get_capabilities(&self) -> Result<Vec<ControllerServiceCapability>, CsiError>;

    /// Provision a new volume.
    async fn create_volume(&self, req: CreateVolumeRequest) -> Result<Volume, CsiError>;

    /// Delete a previously provisioned volume.
    async fn delete_volume(&self, volume_id: &VolumeId) -> Result<(), CsiError>;

    /// Attach a volume to `node_id`.
    async fn publish_volume(&self, volume_id: &VolumeId, node_id: &str) -> Result<(), CsiError>;

    /// Detach a volume from `node_id`.
    async fn unpublish_volume(&self, volume_id: &VolumeId, node_id: &str) -> Result<(), CsiError>;

    /// Check whether the given capabilities are compatible with the volume.
    async fn validate_volume_capabilities(
        &self,
        volume_id: &VolumeId,
        capabilities: &[VolumeCapability],
    ) -> Result<bool, CsiError>;

    /// List all volumes known to this controller.
    async fn list_volumes(&self) -> Result<Vec<Volume>, CsiError>;

    /// Return the total available capacity in bytes.
    async fn get_capacity(&self) -> Result<u64, CsiError>;

    /// Grow a volume to at least `capacity_bytes`, returning the new size.
    async fn expand_volume(
        &self,
        volume_id: &VolumeId,
        capacity_bytes: u64,
    ) -> Result<u64, CsiError>;
}

/// Controller service that validates every request against a [`CsiDriver`]
/// and implements only the calls that need no storage backend.
///
/// Backends embed it and override the lifecycle operations they provide.
#[derive(Debug, Clone)]
pub struct DefaultControllerServer {
    driver: Arc<CsiDriver>,
}

impl DefaultControllerServer {
    /// Controller server answering from `driver`.
    pub fn new(driver: Arc<CsiDriver>) -> Self {
        Self { driver }
    }

    /// The registry requests are validated against.
    pub fn driver(&self) -> &CsiDriver {
        &self.driver
    }

    /// Reject `request` unless the driver advertises the capability it needs.
    pub fn validate(&self, request: ControllerRequest) -> Result<(), CsiError> {
        let kind = request.required_capability();
        self.driver.validate_controller_request(kind)
    }

    fn reject_unimplemented<T>(&self, request: ControllerRequest) -> Result<T, CsiError> {
        self.validate(request)?;
        Err(CsiError::Unimplemented(request.to_string()))
    }
}

#[async_trait]
impl CsiController for DefaultControllerServer {
    #[instrument(skip(self))]
    async fn get_capabilities(&self) -> Result<Vec<ControllerServiceCapability>, CsiError> {
        Ok(self.driver.controller_service_capabilities().to_vec())
    }

    async fn create_volume(&self, _req: CreateVolumeRequest) -> Result<Volume, CsiError> {
        self.reject_unimplemented(ControllerRequest::CreateVolume)
    }

    async fn delete_volume(&self, _volume_id: &VolumeId) -> Result<(), CsiError> {
        self.reject_unimplemented(ControllerRequest::DeleteVolume)
    }

    async fn publish_volume(&self, _volume_id: &VolumeId, _node_id: &str) -> Result<(), CsiError> {
        self.reject_unimplemented(ControllerRequest::ControllerPublishVolume)
    }

    async fn unpublish_volume(
        &self,
        _volume_id: &VolumeId,
        _node_id: &str,
    ) -> Result<(), CsiError> {
        self.reject_unimplemented(ControllerRequest::ControllerUnpublishVolume)
    }

    /// Capabilities are compatible when every requested access mode is one
    /// the driver declared.
    #[instrument(skip_all, fields(volume_id = %volume_id))]
    async fn validate_volume_capabilities(
        &self,
        volume_id: &VolumeId,
        capabilities: &[VolumeCapability],
    ) -> Result<bool, CsiError> {
        self.validate(ControllerRequest::ValidateVolumeCapabilities)?;
        if volume_id.0.is_empty() {
            return Err(CsiError::InvalidArgument("volume id missing in request".into()));
        }
        if capabilities.is_empty() {
            return Err(CsiError::InvalidArgument(
                "volume capabilities missing in request".into(),
            ));
        }

        let supported = self.driver.volume_capability_access_modes();
        Ok(capabilities
            .iter()
            .all(|cap| supported.iter().any(|m| m.mode() == cap.access_mode)))
    }

    async fn list_volumes(&self) -> Result<Vec<Volume>, CsiError> {
        self.reject_unimplemented(ControllerRequest::ListVolumes)
    }

    async fn get_capacity(&self) -> Result<u64, CsiError> {
        self.reject_unimplemented(ControllerRequest::GetCapacity)
    }

    async fn expand_volume(
        &self,
        _volume_id: &VolumeId,
        _capacity_bytes: u64,
    ) -> Result<u64, CsiError> {
        self.reject_unimplemented(ControllerRequest::ControllerExpandVolume)
    }
}
