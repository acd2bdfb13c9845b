//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use txstreamer_rs::backend::RecordingBackend;
use txstreamer_rs::streamer::TxStreamer;
use txstreamer_rs::transport::FixedPayloadTransport;

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}

/// MTU property of every channel, in channel order
pub fn channel_mtus(node: &TxStreamer<RecordingBackend>) -> Vec<Option<usize>> {
    (0..node.num_channels()).map(|chan| node.mtu(chan)).collect()
}

/// Connect transports in the given order, panicking on any error
pub fn connect_all(node: &mut TxStreamer<RecordingBackend>, order: &[(usize, usize)]) {
    for &(chan, mtu) in order {
        node.connect_channel(chan, FixedPayloadTransport::boxed(mtu))
            .unwrap_or_else(|e| panic!("connect_channel({}, {}) failed: {}", chan, mtu, e));
    }
}
