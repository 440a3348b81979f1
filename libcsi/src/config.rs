//! CSI driver startup configuration.
//!
//! Environment variables:
//! - `CSI_DRIVER_NAME`: plugin name reported to the orchestrator. Required.
//! - `CSI_DRIVER_VERSION`: vendor version. Defaults to empty.
//! - `CSI_NODE_ID`: identifier of the node this instance runs on. Required.
//! - `CSI_MAX_VOLUMES_PER_NODE`: volume limit reported by `NodeGetInfo`.
//!   Defaults to `0` (no limit advertised).

use std::env;

use serde::{Deserialize, Serialize};

use crate::driver::CsiDriver;
use crate::error::CsiError;

/// Plugin name variable.
pub const ENV_DRIVER_NAME: &str = "CSI_DRIVER_NAME";
/// Vendor version variable.
pub const ENV_DRIVER_VERSION: &str = "CSI_DRIVER_VERSION";
/// Node identifier variable.
pub const ENV_NODE_ID: &str = "CSI_NODE_ID";
/// Per-node volume limit variable.
pub const ENV_MAX_VOLUMES_PER_NODE: &str = "CSI_MAX_VOLUMES_PER_NODE";

/// Values supplied by the surrounding process when the plugin starts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DriverConfig {
    /// Plugin name, e.g. `"rk8s.slayerfs.csi"`.
    pub name: String,
    /// Vendor version; may be empty.
    #[serde(default)]
    pub version: String,
    /// Identifier of the node this instance runs on.
    pub node_id: String,
    /// Volume limit reported by `NodeGetInfo`; zero advertises none.
    #[serde(default)]
    pub max_volumes_per_node: u64,
}

impl DriverConfig {
    /// Read the configuration from the process environment.
    ///
    /// Missing variables become empty strings; emptiness is rejected later by
    /// [`DriverConfig::build`].
    pub fn from_env() -> Result<Self, CsiError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`DriverConfig::from_env`] but reads through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CsiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_volumes_per_node = match lookup(ENV_MAX_VOLUMES_PER_NODE) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                CsiError::InvalidArgument(format!("{ENV_MAX_VOLUMES_PER_NODE}={raw}: {e}"))
            })?,
            None => 0,
        };

        Ok(Self {
            name: lookup(ENV_DRIVER_NAME).unwrap_or_default(),
            version: lookup(ENV_DRIVER_VERSION).unwrap_or_default(),
            node_id: lookup(ENV_NODE_ID).unwrap_or_default(),
            max_volumes_per_node,
        })
    }

    /// Construct the driver identity described by this configuration.
    pub fn build(&self) -> Result<CsiDriver, CsiError> {
        CsiDriver::new(&*self.name, &*self.version, &*self.node_id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn from_lookup_reads_all_fields() {
        let cfg = DriverConfig::from_lookup(lookup_from(&[
            (ENV_DRIVER_NAME, "rk8s.slayerfs.csi"),
            (ENV_DRIVER_VERSION, "0.3.0"),
            (ENV_NODE_ID, "node-01"),
            (ENV_MAX_VOLUMES_PER_NODE, "16"),
        ]))
        .expect("valid config");
        assert_eq!(cfg.name, "rk8s.slayerfs.csi");
        assert_eq!(cfg.version, "0.3.0");
        assert_eq!(cfg.node_id, "node-01");
        assert_eq!(cfg.max_volumes_per_node, 16);
    }

    #[test]
    fn from_lookup_defaults() {
        let cfg = DriverConfig::from_lookup(|_| None).expect("valid config");
        assert_eq!(cfg, DriverConfig::default());
    }

    #[test]
    fn from_lookup_rejects_bad_volume_limit() {
        let err = DriverConfig::from_lookup(lookup_from(&[(ENV_MAX_VOLUMES_PER_NODE, "many")]))
            .unwrap_err();
        assert!(matches!(err, CsiError::InvalidArgument(_)));
    }

    #[test]
    fn build_propagates_missing_fields() {
        let cfg = DriverConfig {
            name: "fake".into(),
            ..Default::default()
        };
        assert_eq!(cfg.build(), Err(CsiError::MissingNodeId));

        let cfg = DriverConfig {
            name: "fake".into(),
            node_id: "fakeNodeID".into(),
            ..Default::default()
        };
        let driver = cfg.build().expect("valid driver");
        assert_eq!(driver.version(), "");
    }

    #[test]
    fn deserialize_with_defaults() {
        let cfg: DriverConfig =
            serde_json::from_str(r#"{"name":"fake","node_id":"n1"}"#).expect("deserialize");
        assert_eq!(cfg.version, "");
        assert_eq!(cfg.max_volumes_per_node, 0);
    }
}
