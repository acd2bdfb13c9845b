//! Node surface seen by the surrounding graph engine.
//!
//! The graph engine that wires nodes together lives outside this crate. It
//! consumes nodes through [`GraphNode`]: identity, port arity, a structural
//! topology check and the forwarding policies for properties and actions.

use crate::error::{Result, TxStreamerError};
use serde::{Deserialize, Serialize};

/// What a node does with property changes or actions it does not handle
/// itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForwardingPolicy {
    /// Forward to the port with the same index on the opposite edge.
    OneToOne,
    /// Forward to every port on the opposite edge.
    OneToFan,
    /// Forward to all input ports.
    OneToAllIn,
    /// Forward to all output ports.
    OneToAllOut,
    /// Forward to all ports on both edges.
    OneToAll,
    /// Do not forward.
    Drop,
}

/// A node in the device configuration graph.
pub trait GraphNode {
    /// Identifier that is unique within the process.
    fn unique_id(&self) -> &str;

    fn num_input_ports(&self) -> usize;

    fn num_output_ports(&self) -> usize;

    fn prop_forwarding_policy(&self) -> ForwardingPolicy;

    fn action_forwarding_policy(&self) -> ForwardingPolicy;

    /// Whether the given connected port indices are acceptable for this node.
    fn check_topology(&self, connected_inputs: &[usize], connected_outputs: &[usize]) -> bool {
        check_port_connections(
            self.num_input_ports(),
            self.num_output_ports(),
            connected_inputs,
            connected_outputs,
        )
        .is_ok()
    }
}

/// Structural check shared by all nodes: every connected port index must be a
/// port the node has, and no port may be connected twice.
pub fn check_port_connections(
    num_inputs: usize,
    num_outputs: usize,
    connected_inputs: &[usize],
    connected_outputs: &[usize],
) -> Result<()> {
    check_edge("input", num_inputs, connected_inputs)?;
    check_edge("output", num_outputs, connected_outputs)
}

fn check_edge(edge: &str, num_ports: usize, connected: &[usize]) -> Result<()> {
    let mut seen = vec![false; num_ports];
    for &port in connected {
        if port >= num_ports {
            return Err(TxStreamerError::Topology(format!(
                "{} port {} is connected but the node has only {} {} ports",
                edge, port, num_ports, edge
            )));
        }
        if seen[port] {
            return Err(TxStreamerError::Topology(format!(
                "{} port {} is connected more than once",
                edge, port
            )));
        }
        seen[port] = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TwoByTwo;

    impl GraphNode for TwoByTwo {
        fn unique_id(&self) -> &str {
            "TwoByTwo#0"
        }
        fn num_input_ports(&self) -> usize {
            2
        }
        fn num_output_ports(&self) -> usize {
            2
        }
        fn prop_forwarding_policy(&self) -> ForwardingPolicy {
            ForwardingPolicy::OneToOne
        }
        fn action_forwarding_policy(&self) -> ForwardingPolicy {
            ForwardingPolicy::OneToOne
        }
    }

    #[test]
    fn test_default_check_accepts_partial_connection() {
        assert!(TwoByTwo.check_topology(&[0], &[1]));
        assert!(TwoByTwo.check_topology(&[], &[]));
    }

    #[test]
    fn test_out_of_range_port_rejected() {
        assert!(!TwoByTwo.check_topology(&[2], &[]));
        let err = check_port_connections(0, 4, &[], &[4]).unwrap_err();
        assert!(err.to_string().contains("output port 4"));
    }

    #[test]
    fn test_duplicate_port_rejected() {
        assert!(!TwoByTwo.check_topology(&[], &[1, 1]));
    }
}
