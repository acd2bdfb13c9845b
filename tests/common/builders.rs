//! Test data builders for creating streamer nodes

use txstreamer_rs::backend::RecordingBackend;
use txstreamer_rs::config::{ResolverConfig, StreamArgs, StreamerConfig};
use txstreamer_rs::streamer::TxStreamer;

/// Builder for creating test streamers on a recording backend
pub struct StreamerBuilder {
    num_channels: usize,
    otw_format: String,
    max_iterations: usize,
    backend_mtu: Option<usize>,
}

impl StreamerBuilder {
    pub fn new(num_channels: usize) -> Self {
        Self {
            num_channels,
            otw_format: "sc16".to_string(),
            max_iterations: ResolverConfig::default().max_iterations,
            backend_mtu: None,
        }
    }

    pub fn otw_format(mut self, otw_format: &str) -> Self {
        self.otw_format = otw_format.to_string();
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn backend_mtu(mut self, mtu: usize) -> Self {
        self.backend_mtu = Some(mtu);
        self
    }

    pub fn build(self) -> TxStreamer<RecordingBackend> {
        let config = StreamerConfig {
            stream: StreamArgs::new("fc32", self.otw_format).with_channels(0..self.num_channels),
            resolver: ResolverConfig {
                max_iterations: self.max_iterations,
            },
        };
        let backend = match self.backend_mtu {
            Some(mtu) => RecordingBackend::new().with_mtu(mtu),
            None => RecordingBackend::new(),
        };
        TxStreamer::with_config(config, backend).expect("Failed to build test streamer")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streamer_builder() {
        let node = StreamerBuilder::new(3).otw_format("sc8").build();
        assert_eq!(node.num_channels(), 3);
        assert_eq!(node.otw_format(2), Some("sc8"));
    }
}
