//! Integration tests for the graph-facing surface of the streamer

mod common;

use common::builders::StreamerBuilder;
use common::connect_all;
use txstreamer_rs::transport::FixedPayloadTransport;
use txstreamer_rs::{ForwardingPolicy, GraphNode, TxStreamerError};

#[test]
fn test_all_outputs_connected() {
    let node = StreamerBuilder::new(4).build();
    assert!(node.check_topology(&[], &[3, 1, 0, 2]));
    assert!(node.validate_topology(&[], &[0, 1, 2, 3]).is_ok());
}

#[test]
fn test_missing_output_fails() {
    let node = StreamerBuilder::new(4).build();
    assert!(!node.check_topology(&[], &[0, 1, 2]));

    let err = node.validate_topology(&[], &[0, 1, 2]).unwrap_err();
    assert!(matches!(err, TxStreamerError::Topology(_)));
}

#[test]
fn test_inputs_rejected() {
    let node = StreamerBuilder::new(1).build();
    assert_eq!(node.num_input_ports(), 0);
    assert!(!node.check_topology(&[0], &[0]));
}

#[test]
fn test_out_of_range_connect_leaves_node_untouched() {
    let mut node = StreamerBuilder::new(4).build();
    connect_all(&mut node, &[(0, 8000)]);
    let snapshot = node.property_snapshot();
    let calls = node.backend().calls().len();

    let err = node
        .connect_channel(4, FixedPayloadTransport::boxed(100))
        .unwrap_err();

    assert!(matches!(
        err,
        TxStreamerError::IndexOutOfRange {
            channel: 4,
            num_channels: 4
        }
    ));
    assert_eq!(node.property_snapshot(), snapshot);
    assert_eq!(node.backend().calls().len(), calls);
    assert_eq!(node.current_mtu(), Some(8000));
}

#[test]
fn test_second_transport_on_channel_rejected() {
    let mut node = StreamerBuilder::new(2).build();
    connect_all(&mut node, &[(1, 8000)]);

    let err = node
        .connect_channel(1, FixedPayloadTransport::boxed(1000))
        .unwrap_err();
    assert!(matches!(err, TxStreamerError::ChannelAlreadyConnected(1)));
    assert_eq!(node.mtu(0), Some(8000));
}

#[test]
fn test_policies_terminate_forwarding() {
    let node = StreamerBuilder::new(2).build();
    assert_eq!(node.prop_forwarding_policy(), ForwardingPolicy::Drop);
    assert_eq!(node.action_forwarding_policy(), ForwardingPolicy::Drop);
}

#[test]
fn test_snapshot_serializes_to_json() {
    let mut node = StreamerBuilder::new(1).build();
    connect_all(&mut node, &[(0, 1472)]);
    let json = serde_json::to_value(node.property_snapshot()).unwrap();

    let mtu = json
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["key"] == "mtu")
        .unwrap();
    assert_eq!(mtu["value"], 1472);
}
