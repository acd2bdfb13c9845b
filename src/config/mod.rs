//! Configuration module for the transmit streamer
//!
//! This module holds the construction-time records a streamer node is built
//! from:
//! - [`StreamArgs`] - host/wire sample formats and the channel list
//! - [`ResolverConfig`] - bounds for property resolution passes
//! - [`StreamerConfig`] - both of the above, loadable from TOML
//!
//! # Example
//!
//! ```toml
//! [stream]
//! cpu_format = "fc32"
//! otw_format = "sc16"
//! channels = [0, 1, 2, 3]
//!
//! [resolver]
//! max_iterations = 32
//! ```

use crate::error::{Result, ResultExt, TxStreamerError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default host-side sample format
pub const DEFAULT_CPU_FORMAT: &str = "fc32";

/// Default over-the-wire sample format
pub const DEFAULT_OTW_FORMAT: &str = "sc16";

/// Default bound on sweeps per resolution pass
pub const DEFAULT_MAX_RESOLVE_ITERATIONS: usize = 32;

// ==================== Stream Args ====================

/// Construction-time configuration of a streamer node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamArgs {
    /// Sample format on the host side (e.g. "fc32", "sc16")
    #[serde(default = "default_cpu_format")]
    pub cpu_format: String,

    /// Sample format on the wire (e.g. "sc16", "sc8")
    #[serde(default = "default_otw_format")]
    pub otw_format: String,

    /// Free-form device arguments passed through to the backend
    #[serde(default)]
    pub args: String,

    /// Device channels served by this streamer, one per output port
    #[serde(default)]
    pub channels: Vec<usize>,
}

fn default_cpu_format() -> String {
    DEFAULT_CPU_FORMAT.to_string()
}

fn default_otw_format() -> String {
    DEFAULT_OTW_FORMAT.to_string()
}

impl Default for StreamArgs {
    fn default() -> Self {
        Self {
            cpu_format: default_cpu_format(),
            otw_format: default_otw_format(),
            args: String::new(),
            channels: vec![0],
        }
    }
}

impl StreamArgs {
    /// Create stream args for the given formats and no channels
    pub fn new(cpu_format: impl Into<String>, otw_format: impl Into<String>) -> Self {
        Self {
            cpu_format: cpu_format.into(),
            otw_format: otw_format.into(),
            args: String::new(),
            channels: Vec::new(),
        }
    }

    /// Set the channel list
    pub fn with_channels(mut self, channels: impl IntoIterator<Item = usize>) -> Self {
        self.channels = channels.into_iter().collect();
        self
    }

    /// Number of channels (output ports) the streamer will have
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Check that the record describes a buildable node
    pub fn validate(&self) -> Result<()> {
        if self.channels.is_empty() {
            return Err(TxStreamerError::Config(
                "Stream args must name at least one channel".to_string(),
            ));
        }
        if self.otw_format.is_empty() {
            return Err(TxStreamerError::Config(
                "Over-the-wire format must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// ==================== Resolver Config ====================

/// Limits applied to property resolution passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Maximum sweeps over the resolver list before a pass is declared
    /// non-convergent
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_RESOLVE_ITERATIONS
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_RESOLVE_ITERATIONS,
        }
    }
}

// ==================== Streamer Config ====================

/// Everything needed to construct a streamer node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamerConfig {
    #[serde(default)]
    pub stream: StreamArgs,

    #[serde(default)]
    pub resolver: ResolverConfig,
}

impl StreamerConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| TxStreamerError::Config(format!("Failed to parse config: {}", e)))?;
        config.stream.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(TxStreamerError::from)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid config file {:?}", path))
    }

    /// Serialize to TOML text
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| TxStreamerError::Serialization(format!("Failed to serialize config: {}", e)))
    }

    pub fn num_channels(&self) -> usize {
        self.stream.num_channels()
    }
}
