//! # txstreamer-rs: multi-channel transmit streamer node
//!
//! A terminal node of a device configuration graph that sends samples out of
//! the host. Before streaming starts, the node keeps every channel's
//! configuration consistent: scaling, sample rate, tick rate, wire format and
//! the MTU shared by all channels.
//!
//! ## Architecture
//!
//! - **Property**: typed properties in an arena plus a dependency-driven
//!   resolver engine that runs passes to a fixed point
//! - **Streamer**: the [`streamer::TxStreamer`] node, its per-channel
//!   resolvers and the cross-channel MTU coordinator
//! - **Backend**: the [`backend::StreamerBackend`] seam to the base streaming
//!   implementation
//! - **Node**: the surface a graph engine sees (ports, topology, forwarding)
//!
//! ## Example
//!
//! ```ignore
//! use txstreamer_rs::{
//!     backend::RecordingBackend,
//!     config::StreamArgs,
//!     streamer::TxStreamer,
//!     transport::FixedPayloadTransport,
//! };
//!
//! let args = StreamArgs::default().with_channels(0..4);
//! let mut node = TxStreamer::new(args, RecordingBackend::new())?;
//! node.connect_channel(0, FixedPayloadTransport::boxed(8000))?;
//! node.connect_channel(2, FixedPayloadTransport::boxed(1472))?;
//! assert_eq!(node.mtu(3), Some(1472));
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod logging;
pub mod node;
pub mod property;
pub mod streamer;
pub mod transport;

pub use config::{StreamArgs, StreamerConfig};
pub use error::{Result, TxStreamerError};
pub use node::{ForwardingPolicy, GraphNode};
pub use streamer::TxStreamer;
