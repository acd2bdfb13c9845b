//! Integration tests for per-channel property forwarding
//!
//! Scaling, sample rate and tick rate are forwarded to the backend as soon as
//! they are set, independent of whether a transport is attached.

mod common;

use common::assert_float_eq;
use common::builders::StreamerBuilder;
use txstreamer_rs::backend::BackendCall;
use txstreamer_rs::property::{PropertyError, SourceInfo, PROP_KEY_TICK_RATE, PROP_KEY_TYPE};
use txstreamer_rs::streamer::FULL_SCALE_S16;
use txstreamer_rs::TxStreamerError;

#[test]
fn test_scaling_before_connect() {
    let mut node = StreamerBuilder::new(2).build();
    node.set_scaling(1, 1.0).unwrap();

    assert_eq!(
        node.backend().calls(),
        &[BackendCall::SetScaleFactor {
            channel: 1,
            divisor: 32767.0
        }]
    );
    // No MTU side effects without a transport
    assert_eq!(node.mtu(0), None);
    assert_eq!(node.mtu(1), None);
    assert_eq!(node.current_mtu(), None);
}

#[test]
fn test_scaling_divisor_per_channel() {
    let mut node = StreamerBuilder::new(3).build();
    node.set_scaling(0, 0.25).unwrap();
    node.set_scaling(2, 2.0).unwrap();

    assert_float_eq(node.backend().scale_factor(0).unwrap(), FULL_SCALE_S16 * 4.0, 1e-9);
    assert_eq!(node.backend().scale_factor(1), None);
    assert_float_eq(node.backend().scale_factor(2).unwrap(), 16383.5, 1e-9);
}

#[test]
fn test_rates_are_node_wide() {
    let mut node = StreamerBuilder::new(2).build();
    node.set_samp_rate(0, 61.44e6).unwrap();
    node.set_samp_rate(1, 30.72e6).unwrap();
    node.set_property(PROP_KEY_TICK_RATE, 122.88e6, SourceInfo::output_edge(1))
        .unwrap();

    assert_eq!(node.backend().samp_rate(), Some(30.72e6));
    assert_eq!(node.backend().tick_rate(), Some(122.88e6));
}

#[test]
fn test_unchanged_value_is_not_forwarded_again() {
    let mut node = StreamerBuilder::new(1).build();
    node.set_samp_rate(0, 1e6).unwrap();
    let report = node.set_samp_rate(0, 1e6).unwrap();

    assert!(report.is_noop());
    assert_eq!(node.backend().calls().len(), 1);
}

#[test]
fn test_backend_rejection_surfaces_as_resolver_error() {
    let mut node = StreamerBuilder::new(1).build();
    let err = node.set_tick_rate(0, 0.0).unwrap_err();

    assert!(matches!(
        err,
        TxStreamerError::Property(PropertyError::Resolver { .. })
    ));
    assert!(err.to_string().contains("tick_rate"));
}

#[test]
fn test_rejected_rate_is_not_remembered() {
    let mut node = StreamerBuilder::new(1).build();
    node.set_tick_rate(0, 0.0).unwrap_err();
    assert!(node
        .get_property::<f64>(PROP_KEY_TICK_RATE, SourceInfo::output_edge(0))
        .is_err());

    // The same value is offered to the backend again and rejected again.
    node.set_tick_rate(0, 0.0).unwrap_err();
    assert_eq!(node.backend().tick_rate(), None);
    assert_eq!(node.backend().calls().len(), 2);

    let report = node.set_tick_rate(0, 100e6).unwrap();
    assert_eq!(report.invocations, 1);
    assert_eq!(node.backend().tick_rate(), Some(100e6));
}

#[test]
fn test_type_property_carries_wire_format() {
    let node = StreamerBuilder::new(2).otw_format("sc12").build();
    let otw: String = node
        .get_property(PROP_KEY_TYPE, SourceInfo::output_edge(1))
        .unwrap();
    assert_eq!(otw, "sc12");
}

#[test]
fn test_unknown_property_key() {
    let mut node = StreamerBuilder::new(1).build();
    let err = node
        .set_property("gain", 10.0, SourceInfo::output_edge(0))
        .unwrap_err();
    assert!(matches!(
        err,
        TxStreamerError::Property(PropertyError::UnknownProperty { .. })
    ));
}
