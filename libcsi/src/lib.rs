//! # libcsi — CSI driver identity and capability registry for RK8s
//!
//! `libcsi` holds what a [Container Storage Interface][csi] plugin advertises
//! about itself: its identity (name, version, node id) and the optional
//! controller / node RPCs and volume access modes it supports.  Controller
//! handlers consult the registry before serving a request so that calls for
//! undeclared capabilities are rejected with `InvalidArgument`.
//!
//! It follows the RK8s conventions (Tokio async runtime, `tracing` for
//! observability, `thiserror` for structured errors).
//!
//! ## Module overview
//!
//! | Module | Purpose |
//! |---|---|
//! | [`types`] | Capability kinds, access modes, capability records, requests. |
//! | [`error`] | [`CsiError`] enum and its status [`Code`]. |
//! | [`config`] | [`DriverConfig`]: startup configuration from the environment. |
//! | [`driver`] | [`CsiDriver`]: identity & capability registry. |
//! | [`identity`] | [`CsiIdentity`] trait — plugin discovery & health. |
//! | [`controller`] | [`CsiController`] trait, gated on declared capabilities. |
//! | [`node`] | [`CsiNode`] trait — stage, publish, unpublish, unstage. |
//!
//! ```
//! use std::sync::Arc;
//! use libcsi::{ControllerCapabilityKind, CsiDriver};
//!
//! let mut driver = CsiDriver::new("rk8s.slayerfs.csi", "0.1.0", "node-01")?;
//! driver.add_controller_service_capabilities([ControllerCapabilityKind::CreateDeleteVolume]);
//! let driver = Arc::new(driver);
//!
//! assert!(driver
//!     .validate_controller_request(ControllerCapabilityKind::CreateDeleteVolume)
//!     .is_ok());
//! assert!(driver
//!     .validate_controller_request(ControllerCapabilityKind::ListVolumes)
//!     .is_err());
//! # Ok::<(), libcsi::CsiError>(())
//! ```
//!
//! [csi]: https://github.com/container-storage-interface/spec

pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod identity;
pub mod node;
pub mod types;

// Re-export the most commonly used items at crate root for convenience.
pub use config::DriverConfig;
pub use controller::{ControllerRequest, CsiController, DefaultControllerServer};
pub use driver::CsiDriver;
pub use error::{Code, CsiError};
pub use identity::{CsiIdentity, DefaultIdentityServer};
pub use node::{CsiNode, DefaultNodeServer};
pub use types::*;
