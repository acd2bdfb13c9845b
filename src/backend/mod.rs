//! Backend module: the base streaming implementation behind the node
//!
//! The streamer node never programs hardware directly. Once a property is
//! resolved it calls into a [`StreamerBackend`], which owns the device path.
//!
//! # Components
//!
//! - [`StreamerBackend`] - Trait the node drives (scale factor, rates, MTU,
//!   channel registration)
//! - [`RecordingBackend`] - Hardware-free implementation that records every
//!   call, used for tests and dry runs
//!
//! # Example
//!
//! ```ignore
//! use txstreamer_rs::backend::RecordingBackend;
//! use txstreamer_rs::config::StreamArgs;
//! use txstreamer_rs::streamer::TxStreamer;
//!
//! let args = StreamArgs::default().with_channels([0, 1]);
//! let mut streamer = TxStreamer::new(args, RecordingBackend::new())?;
//! streamer.set_samp_rate(0, 1e6)?;
//! assert_eq!(streamer.backend().samp_rate(), Some(1e6));
//! ```

pub mod recording;
pub mod streamer_trait;

pub use recording::{BackendCall, RecordingBackend};
pub use streamer_trait::{StreamerBackend, UNBOUNDED_MTU};

#[cfg(test)]
pub use streamer_trait::MockStreamerBackend;
