//! Driver identity and capability registry.
//!
//! A [`CsiDriver`] holds the plugin's identity and the capability sets it
//! advertises to the orchestrator.  It is built and populated once at
//! startup (declaration needs `&mut self`), then shared read-only behind an
//! `Arc` with every service handler.  Controller handlers must call
//! [`CsiDriver::validate_controller_request`] before doing any work.

use tracing::{debug, info, warn};

use crate::error::CsiError;
use crate::types::{
    AccessMode, ControllerCapabilityKind, ControllerServiceCapability, NodeCapabilityKind,
    NodeServiceCapability, VolumeCapabilityAccessMode,
};

/// Identity and declared capabilities of one running plugin instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsiDriver {
    name: String,
    version: String,
    node_id: String,
    controller_caps: Vec<ControllerServiceCapability>,
    node_caps: Vec<NodeServiceCapability>,
    access_modes: Vec<VolumeCapabilityAccessMode>,
}

impl CsiDriver {
    /// Create a driver with empty capability sets.
    ///
    /// `name` and `node_id` must be non-empty; `version` may be empty.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        node_id: impl Into<String>,
    ) -> Result<Self, CsiError> {
        let name = name.into();
        let version = version.into();
        let node_id = node_id.into();

        if name.is_empty() {
            warn!("refusing to create CSI driver without a name");
            return Err(CsiError::MissingDriverName);
        }
        if node_id.is_empty() {
            warn!(%name, "refusing to create CSI driver without a node id");
            return Err(CsiError::MissingNodeId);
        }

        info!(%name, %version, %node_id, "CSI driver created");
        Ok(Self {
            name,
            version,
            node_id,
            controller_caps: Vec::new(),
            node_caps: Vec::new(),
            access_modes: Vec::new(),
        })
    }

    /// Plugin name reported to the orchestrator.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Vendor version; may be empty.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Identifier of the node this instance runs on.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Append controller capabilities in the given order.  Duplicates are
    /// kept as declared.
    pub fn add_controller_service_capabilities(
        &mut self,
        kinds: impl IntoIterator<Item = ControllerCapabilityKind>,
    ) {
        for kind in kinds {
            debug!(capability = %kind, "enabling controller service capability");
            let cap = ControllerServiceCapability::new(kind);
            self.controller_caps.push(cap);
        }
    }

    /// Append node capabilities in the given order.
    pub fn add_node_service_capabilities(
        &mut self,
        kinds: impl IntoIterator<Item = NodeCapabilityKind>,
    ) {
        for kind in kinds {
            debug!(capability = %kind, "enabling node service capability");
            self.node_caps.push(NodeServiceCapability::new(kind));
        }
    }

    /// Append volume access modes in the given order.
    pub fn add_volume_capability_access_modes(
        &mut self,
        modes: impl IntoIterator<Item = AccessMode>,
    ) {
        for mode in modes {
            debug!(%mode, "enabling volume access mode");
            let record = VolumeCapabilityAccessMode::new(mode);
            self.access_modes.push(record);
        }
    }

    /// Declared controller capabilities, in declaration order.
    pub fn controller_service_capabilities(&self) -> &[ControllerServiceCapability] {
        &self.controller_caps
    }

    /// Declared node capabilities, in declaration order.
    pub fn node_service_capabilities(&self) -> &[NodeServiceCapability] {
        &self.node_caps
    }

    /// Declared volume access modes, in declaration order.
    pub fn volume_capability_access_modes(&self) -> &[VolumeCapabilityAccessMode] {
        &self.access_modes
    }

    /// Check that `kind` is advertised by this driver.
    ///
    /// [`ControllerCapabilityKind::Unknown`] marks requests that need no
    /// optional capability and always passes.  Anything else must appear in
    /// the controller set, otherwise [`CsiError::InvalidArgument`] is
    /// returned naming the capability.
    pub fn validate_controller_request(
        &self,
        kind: ControllerCapabilityKind,
    ) -> Result<(), CsiError> {
        if kind == ControllerCapabilityKind::Unknown {
            return Ok(());
        }

        if self.controller_caps.iter().any(|cap| cap.kind() == kind) {
            return Ok(());
        }

        Err(CsiError::InvalidArgument(format!("unsupported capability {kind}")))
    }
}
