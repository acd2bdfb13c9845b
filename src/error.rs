//! Error handling for the transmit streamer
//!
//! This module defines the crate-level error type and a Result alias used by
//! the node façade, backends and configuration loading. Property-engine
//! failures are carried as [`PropertyError`].

use crate::property::PropertyError;
use thiserror::Error;

/// Main error type for transmit streamer operations
#[derive(Error, Debug)]
pub enum TxStreamerError {
    /// Errors raised by the property engine (registration, resolution)
    #[error("Property error: {0}")]
    Property(#[from] PropertyError),

    /// Channel index passed to `connect_channel` is not a channel of the node
    #[error("Channel index {channel} out of range (node has {num_channels} channels)")]
    IndexOutOfRange { channel: usize, num_channels: usize },

    /// A transport was already attached to this channel
    #[error("Channel {0} is already connected")]
    ChannelAlreadyConnected(usize),

    /// Graph shape does not match the node's ports
    #[error("Topology error: {0}")]
    Topology(String),

    /// Errors reported by the base streaming implementation
    #[error("Backend error: {0}")]
    Backend(String),

    /// Errors related to configuration loading
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<TxStreamerError>,
    },
}

impl TxStreamerError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        TxStreamerError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for transmit streamer operations
pub type Result<T> = std::result::Result<T, TxStreamerError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, PropertyError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| TxStreamerError::from(e).with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| TxStreamerError::from(e).with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TxStreamerError::IndexOutOfRange {
            channel: 4,
            num_channels: 4,
        };
        assert_eq!(
            err.to_string(),
            "Channel index 4 out of range (node has 4 channels)"
        );
    }

    #[test]
    fn test_error_with_context() {
        let err = TxStreamerError::Topology("missing output".to_string());
        let with_ctx = err.with_context("Failed to build graph");
        assert!(with_ctx.to_string().contains("Failed to build graph"));
        assert!(with_ctx.to_string().contains("missing output"));
    }

    #[test]
    fn test_property_error_context() {
        let err: Result<()> = Err(PropertyError::Convergence {
            iterations: 3,
            pending: Vec::new(),
        })
        .context("Connecting channel 0");
        match err.unwrap_err() {
            TxStreamerError::WithContext { context, source } => {
                assert_eq!(context, "Connecting channel 0");
                assert!(matches!(
                    *source,
                    TxStreamerError::Property(PropertyError::Convergence { .. })
                ));
            }
            other => panic!("expected WithContext, got {:?}", other),
        }
    }
}
