//! Core CSI types: protocol enumerations, capability records, and the
//! plugin / node metadata returned during discovery.
//!
//! The enumerations mirror the CSI v1 wire values so a transport layer can
//! convert to and from the protocol integers without a lookup table.  All
//! types are [`Serialize`]/[`Deserialize`] so advertisement responses can be
//! shipped as JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::CsiError;

// ---------------------------------------------------------------------------
// Controller service capabilities
// ---------------------------------------------------------------------------

/// Optional controller-side RPCs a plugin may advertise.
///
/// [`ControllerCapabilityKind::Unknown`] is the protocol's "no capability
/// required" marker: requests mapped to it are always permitted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ControllerCapabilityKind {
    /// No optional capability required.
    Unknown = 0,
    /// `CreateVolume` / `DeleteVolume`.
    CreateDeleteVolume = 1,
    /// `ControllerPublishVolume` / `ControllerUnpublishVolume`.
    PublishUnpublishVolume = 2,
    /// `ListVolumes`.
    ListVolumes = 3,
    /// `GetCapacity`.
    GetCapacity = 4,
    /// `CreateSnapshot` / `DeleteSnapshot`.
    CreateDeleteSnapshot = 5,
    /// `ListSnapshots`.
    ListSnapshots = 6,
    /// Creating a volume from another volume.
    CloneVolume = 7,
    /// Read-only controller publish.
    PublishReadonly = 8,
    /// `ControllerExpandVolume`.
    ExpandVolume = 9,
    /// Published node ids in `ListVolumes` entries.
    ListVolumesPublishedNodes = 10,
    /// Volume health reporting.
    VolumeCondition = 11,
    /// `ControllerGetVolume`.
    GetVolume = 12,
}

impl ControllerCapabilityKind {
    /// Every variant, in wire order.
    pub const ALL: [Self; 13] = [
        Self::Unknown,
        Self::CreateDeleteVolume,
        Self::PublishUnpublishVolume,
        Self::ListVolumes,
        Self::GetCapacity,
        Self::CreateDeleteSnapshot,
        Self::ListSnapshots,
        Self::CloneVolume,
        Self::PublishReadonly,
        Self::ExpandVolume,
        Self::ListVolumesPublishedNodes,
        Self::VolumeCondition,
        Self::GetVolume,
    ];

    /// Protocol name of this capability, e.g. `"CREATE_DELETE_VOLUME"`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::CreateDeleteVolume => "CREATE_DELETE_VOLUME",
            Self::PublishUnpublishVolume => "PUBLISH_UNPUBLISH_VOLUME",
            Self::ListVolumes => "LIST_VOLUMES",
            Self::GetCapacity => "GET_CAPACITY",
            Self::CreateDeleteSnapshot => "CREATE_DELETE_SNAPSHOT",
            Self::ListSnapshots => "LIST_SNAPSHOTS",
            Self::CloneVolume => "CLONE_VOLUME",
            Self::PublishReadonly => "PUBLISH_READONLY",
            Self::ExpandVolume => "EXPAND_VOLUME",
            Self::ListVolumesPublishedNodes => "LIST_VOLUMES_PUBLISHED_NODES",
            Self::VolumeCondition => "VOLUME_CONDITION",
            Self::GetVolume => "GET_VOLUME",
        }
    }

    /// Convert a wire integer.  Only `0` maps to [`Self::Unknown`]; values
    /// outside the enumeration yield `None`.
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Unknown),
            1 => Some(Self::CreateDeleteVolume),
            2 => Some(Self::PublishUnpublishVolume),
            3 => Some(Self::ListVolumes),
            4 => Some(Self::GetCapacity),
            5 => Some(Self::CreateDeleteSnapshot),
            6 => Some(Self::ListSnapshots),
            7 => Some(Self::CloneVolume),
            8 => Some(Self::PublishReadonly),
            9 => Some(Self::ExpandVolume),
            10 => Some(Self::ListVolumesPublishedNodes),
            11 => Some(Self::VolumeCondition),
            12 => Some(Self::GetVolume),
            _ => None,
        }
    }
}

impl TryFrom<i32> for ControllerCapabilityKind {
    type Error = CsiError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_i32(value)
            .ok_or_else(|| CsiError::InvalidArgument(format!("unsupported capability {value}")))
    }
}

impl fmt::Display for ControllerCapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single declared controller capability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ControllerServiceCapability {
    kind: ControllerCapabilityKind,
}

impl ControllerServiceCapability {
    /// Wrap `kind` in a capability record.
    pub fn new(kind: ControllerCapabilityKind) -> Self {
        Self { kind }
    }

    /// The wrapped RPC kind.
    pub fn kind(&self) -> ControllerCapabilityKind {
        self.kind
    }
}

// ---------------------------------------------------------------------------
// Node service capabilities
// ---------------------------------------------------------------------------

/// Optional node-side RPCs a plugin may advertise.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NodeCapabilityKind {
    /// No optional capability.
    Unknown = 0,
    /// `NodeStageVolume` / `NodeUnstageVolume`.
    StageUnstageVolume = 1,
    /// `NodeGetVolumeStats`.
    GetVolumeStats = 2,
    /// `NodeExpandVolume`.
    ExpandVolume = 3,
    /// Volume health reporting.
    VolumeCondition = 4,
}

impl NodeCapabilityKind {
    /// Every variant, in wire order.
    pub const ALL: [Self; 5] = [
        Self::Unknown,
        Self::StageUnstageVolume,
        Self::GetVolumeStats,
        Self::ExpandVolume,
        Self::VolumeCondition,
    ];

    /// Protocol name of this capability, e.g. `"EXPAND_VOLUME"`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::StageUnstageVolume => "STAGE_UNSTAGE_VOLUME",
            Self::GetVolumeStats => "GET_VOLUME_STATS",
            Self::ExpandVolume => "EXPAND_VOLUME",
            Self::VolumeCondition => "VOLUME_CONDITION",
        }
    }

    /// Convert a wire integer, or `None` if it is outside the enumeration.
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Unknown),
            1 => Some(Self::StageUnstageVolume),
            2 => Some(Self::GetVolumeStats),
            3 => Some(Self::ExpandVolume),
            4 => Some(Self::VolumeCondition),
            _ => None,
        }
    }
}

impl TryFrom<i32> for NodeCapabilityKind {
    type Error = CsiError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_i32(value)
            .ok_or_else(|| CsiError::InvalidArgument(format!("unknown node capability {value}")))
    }
}

impl fmt::Display for NodeCapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single declared node capability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeServiceCapability {
    kind: NodeCapabilityKind,
}

impl NodeServiceCapability {
    /// Wrap `kind` in a capability record.
    pub fn new(kind: NodeCapabilityKind) -> Self {
        Self { kind }
    }

    /// The wrapped RPC kind.
    pub fn kind(&self) -> NodeCapabilityKind {
        self.kind
    }
}

// ---------------------------------------------------------------------------
// Access modes
// ---------------------------------------------------------------------------

/// Describes how a volume may be mounted and shared between nodes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AccessMode {
    /// Unspecified.
    Unknown = 0,
    /// Read-write on a single node.
    SingleNodeWriter = 1,
    /// Read-only on a single node.
    SingleNodeReaderOnly = 2,
    /// Read-only on many nodes.
    MultiNodeReaderOnly = 3,
    /// Many readers, at most one writer.
    MultiNodeSingleWriter = 4,
    /// Read-write on many nodes.
    MultiNodeMultiWriter = 5,
}

impl AccessMode {
    /// Protocol name of this mode, e.g. `"SINGLE_NODE_WRITER"`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::SingleNodeWriter => "SINGLE_NODE_WRITER",
            Self::SingleNodeReaderOnly => "SINGLE_NODE_READER_ONLY",
            Self::MultiNodeReaderOnly => "MULTI_NODE_READER_ONLY",
            Self::MultiNodeSingleWriter => "MULTI_NODE_SINGLE_WRITER",
            Self::MultiNodeMultiWriter => "MULTI_NODE_MULTI_WRITER",
        }
    }

    /// Convert a wire integer, or `None` if it is outside the enumeration.
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Unknown),
            1 => Some(Self::SingleNodeWriter),
            2 => Some(Self::SingleNodeReaderOnly),
            3 => Some(Self::MultiNodeReaderOnly),
            4 => Some(Self::MultiNodeSingleWriter),
            5 => Some(Self::MultiNodeMultiWriter),
            _ => None,
        }
    }
}

impl TryFrom<i32> for AccessMode {
    type Error = CsiError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_i32(value)
            .ok_or_else(|| CsiError::InvalidArgument(format!("unsupported access mode {value}")))
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single declared volume access mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VolumeCapabilityAccessMode {
    mode: AccessMode,
}

impl VolumeCapabilityAccessMode {
    /// Wrap `mode` in an access-mode record.
    pub fn new(mode: AccessMode) -> Self {
        Self { mode }
    }

    /// The wrapped access mode.
    pub fn mode(&self) -> AccessMode {
        self.mode
    }
}

// ---------------------------------------------------------------------------
// Volumes & requests
// ---------------------------------------------------------------------------

/// Opaque, unique identifier for a volume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct VolumeId(pub String);

impl fmt::Display for VolumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VolumeId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Describes the capabilities required from a volume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VolumeCapability {
    /// Requested access mode.
    pub access_mode: AccessMode,
    /// Additional mount flags (e.g. `"noatime"`).
    #[serde(default)]
    pub mount_flags: Vec<String>,
    /// Filesystem type; empty lets the plugin choose.
    #[serde(default)]
    pub fs_type: String,
}

impl VolumeCapability {
    /// Capability with `access_mode`, no mount flags and no filesystem type.
    pub fn with_access_mode(access_mode: AccessMode) -> Self {
        Self {
            access_mode,
            mount_flags: Vec::new(),
            fs_type: String::new(),
        }
    }
}

/// Metadata for a provisioned volume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volume {
    /// Unique volume identifier.
    pub volume_id: VolumeId,
    /// Provisioned capacity in bytes.
    pub capacity_bytes: u64,
    /// Opaque context passed from Controller to Node operations.
    #[serde(default)]
    pub volume_context: HashMap<String, String>,
}

/// Request to create a new volume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateVolumeRequest {
    /// Human-readable name for the volume.
    pub name: String,
    /// Desired capacity in bytes.
    pub capacity_bytes: u64,
    /// Required capabilities.
    #[serde(default)]
    pub volume_capabilities: Vec<VolumeCapability>,
    /// Arbitrary parameters forwarded to the backend.
    #[serde(default)]
    pub parameters: HashMap<String, String>,
}

/// Request to stage (globally mount) a volume on a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeStageVolumeRequest {
    /// Volume to stage.
    pub volume_id: VolumeId,
    /// Global staging mount point.
    pub staging_target_path: String,
    /// Requested capability.
    pub volume_capability: VolumeCapability,
    /// Opaque context carried from `CreateVolume`.
    #[serde(default)]
    pub volume_context: HashMap<String, String>,
}

/// Request to publish (bind-mount) a staged volume into a workload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodePublishVolumeRequest {
    /// Volume to publish.
    pub volume_id: VolumeId,
    /// The global staging mount point (source of the bind mount).
    pub staging_target_path: String,
    /// Target path inside the container.
    pub target_path: String,
    /// Requested capability.
    pub volume_capability: VolumeCapability,
    /// Whether the bind mount should be read-only.
    #[serde(default)]
    pub read_only: bool,
}

// ---------------------------------------------------------------------------
// Plugin & node info
// ---------------------------------------------------------------------------

/// Information about the CSI plugin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PluginInfo {
    /// Plugin name, e.g. `"rk8s.slayerfs.csi"`.
    pub name: String,
    /// Vendor-provided version string.
    pub vendor_version: String,
}

/// Capabilities advertised by the CSI plugin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PluginCapability {
    /// Plugin provides a Controller service.
    ControllerService,
}

/// Information about the node on which the CSI Node service runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeInfo {
    /// Unique node identifier.
    pub node_id: String,
    /// Maximum number of volumes the node can host.  Zero means the
    /// orchestrator decides.
    pub max_volumes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Code;

    #[test]
    fn controller_kind_display_uses_protocol_name() {
        assert_eq!(
            ControllerCapabilityKind::PublishUnpublishVolume.to_string(),
            "PUBLISH_UNPUBLISH_VOLUME"
        );
        assert_eq!(ControllerCapabilityKind::Unknown.to_string(), "UNKNOWN");
    }

    #[test]
    fn from_i32_matches_wire_values() {
        for kind in ControllerCapabilityKind::ALL {
            assert_eq!(ControllerCapabilityKind::from_i32(kind as i32), Some(kind));
        }
        for kind in NodeCapabilityKind::ALL {
            assert_eq!(NodeCapabilityKind::from_i32(kind as i32), Some(kind));
        }
        assert_eq!(
            ControllerCapabilityKind::from_i32(0),
            Some(ControllerCapabilityKind::Unknown)
        );
        assert_eq!(ControllerCapabilityKind::GetCapacity as i32, 4);
        assert_eq!(AccessMode::from_i32(1), Some(AccessMode::SingleNodeWriter));
    }

    #[test]
    fn from_i32_out_of_range_is_rejected() {
        assert_eq!(ControllerCapabilityKind::from_i32(13), None);
        assert_eq!(ControllerCapabilityKind::from_i32(99), None);
        assert_eq!(NodeCapabilityKind::from_i32(-1), None);
        assert_eq!(AccessMode::from_i32(6), None);
    }

    #[test]
    fn try_from_out_of_range_is_invalid_argument() {
        let err = ControllerCapabilityKind::try_from(99).unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
        assert!(err.to_string().contains("99"));

        assert_eq!(
            NodeCapabilityKind::try_from(5).unwrap_err().code(),
            Code::InvalidArgument
        );
        assert_eq!(
            AccessMode::try_from(-3).unwrap_err().code(),
            Code::InvalidArgument
        );
        assert_eq!(
            ControllerCapabilityKind::try_from(2),
            Ok(ControllerCapabilityKind::PublishUnpublishVolume)
        );
    }

    #[test]
    fn capability_records_wrap_kind() {
        let cap = ControllerServiceCapability::new(ControllerCapabilityKind::ListVolumes);
        assert_eq!(cap.kind(), ControllerCapabilityKind::ListVolumes);

        let cap = NodeServiceCapability::new(NodeCapabilityKind::ExpandVolume);
        assert_eq!(cap.kind(), NodeCapabilityKind::ExpandVolume);

        let mode = VolumeCapabilityAccessMode::new(AccessMode::MultiNodeReaderOnly);
        assert_eq!(mode.mode(), AccessMode::MultiNodeReaderOnly);
    }

    #[test]
    fn volume_id_display() {
        let id = VolumeId::from("vol-abc");
        assert_eq!(id.to_string(), "vol-abc");
    }

    #[test]
    fn volume_capability_defaults_from_json() {
        let cap: VolumeCapability =
            serde_json::from_str(r#"{"access_mode":"SingleNodeWriter"}"#).expect("deserialize");
        assert_eq!(
            cap,
            VolumeCapability::with_access_mode(AccessMode::SingleNodeWriter)
        );
    }

    #[test]
    fn node_capability_serializes_as_json() {
        let cap = NodeServiceCapability::new(NodeCapabilityKind::ExpandVolume);
        let json = serde_json::to_string(&cap).expect("serialize");
        assert_eq!(json, r#"{"kind":"ExpandVolume"}"#);
    }
}
