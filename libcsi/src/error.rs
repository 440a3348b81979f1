//! CSI error types.
//!
//! All errors in the `libcsi` crate are represented by the [`CsiError`] enum,
//! which derives [`thiserror::Error`] for ergonomic error handling and also
//! implements [`Serialize`]/[`Deserialize`] so errors can be carried in a
//! response envelope by whatever transport dispatches CSI calls.
//!
//! [`CsiError::code`] classifies every variant with a gRPC-style [`Code`],
//! which is what the orchestrator ultimately sees.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for CSI operations.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum CsiError {
    /// The driver was configured without a name.
    #[error("driver name must not be empty")]
    MissingDriverName,

    /// The driver was configured without a node identifier.
    #[error("node id must not be empty")]
    MissingNodeId,

    /// The caller supplied an invalid argument, or asked for a capability
    /// the driver does not advertise.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation is not provided by this plugin.
    #[error("unimplemented: {0}")]
    Unimplemented(String),

    /// The plugin is not in a state to serve the call.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// An unclassified internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CsiError {
    /// Protocol status code for this error.
    pub fn code(&self) -> Code {
        match self {
            Self::MissingDriverName | Self::MissingNodeId => Code::FailedPrecondition,
            Self::InvalidArgument(_) => Code::InvalidArgument,
            Self::Unimplemented(_) => Code::Unimplemented,
            Self::Unavailable(_) => Code::Unavailable,
            Self::Internal(_) => Code::Internal,
        }
    }
}

/// gRPC status codes used by CSI error responses.
///
/// Discriminants match the [gRPC status codes specification](https://github.com/grpc/grpc/blob/master/doc/statuscodes.md).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Code {
    /// Client specified an invalid argument.
    InvalidArgument = 3,
    /// The system is not in a state required for the operation's execution.
    FailedPrecondition = 9,
    /// Operation is not implemented or not supported.
    Unimplemented = 12,
    /// Internal error.
    Internal = 13,
    /// The service is currently unavailable.
    Unavailable = 14,
}

impl Code {
    /// Human-readable description of this code.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Code::InvalidArgument => "Client specified an invalid argument",
            Code::FailedPrecondition => {
                "The system is not in a state required for the operation's execution"
            }
            Code::Unimplemented => "Operation is not implemented or not supported",
            Code::Internal => "Internal error",
            Code::Unavailable => "The service is currently unavailable",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
