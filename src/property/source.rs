//! Property identity: where a property lives on a node.
//!
//! A property is identified by its key plus a [`SourceInfo`], i.e. which edge
//! of the node it belongs to and which port (channel) on that edge.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scaling of the outbound samples (full-scale amplitude).
pub const PROP_KEY_SCALING: &str = "scaling";
/// Sample rate of the data path.
pub const PROP_KEY_SAMP_RATE: &str = "samp_rate";
/// Tick rate of the device clock.
pub const PROP_KEY_TICK_RATE: &str = "tick_rate";
/// Over-the-wire sample format.
pub const PROP_KEY_TYPE: &str = "type";
/// Maximum transfer unit of the attached transport.
pub const PROP_KEY_MTU: &str = "mtu";

/// Which side of a node a property belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Set by the user through the node's public API.
    User,
    /// Attached to an input port.
    InputEdge,
    /// Attached to an output port.
    OutputEdge,
    /// Owned by the framework itself.
    Framework,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::User => "USER",
            SourceKind::InputEdge => "INPUT_EDGE",
            SourceKind::OutputEdge => "OUTPUT_EDGE",
            SourceKind::Framework => "FRAMEWORK",
        }
    }
}

/// Edge kind plus port instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceInfo {
    pub kind: SourceKind,
    pub instance: usize,
}

impl SourceInfo {
    pub const fn new(kind: SourceKind, instance: usize) -> Self {
        Self { kind, instance }
    }

    pub const fn output_edge(instance: usize) -> Self {
        Self::new(SourceKind::OutputEdge, instance)
    }

    pub const fn user() -> Self {
        Self::new(SourceKind::User, 0)
    }
}

impl fmt::Display for SourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.instance)
    }
}
