//! StreamerBackend trait for the base streaming implementation
//!
//! The property layer validates and reconciles configuration; everything that
//! turns those values into hardware commands sits behind this trait. Both the
//! real device path and test doubles implement it.

use crate::error::Result;
use crate::transport::TxTransport;

/// MTU reported by a backend that has no limit of its own yet
pub const UNBOUNDED_MTU: usize = usize::MAX;

/// Interface the streamer node drives once properties are resolved
///
/// Implementations must be `Send` so a configured node can be handed to the
/// streaming thread.
///
/// # Example
///
/// ```ignore
/// fn apply_gain(backend: &mut dyn StreamerBackend, chan: usize, scaling: f64) -> Result<()> {
///     backend.set_scale_factor(chan, 32767.0 / scaling)
/// }
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait StreamerBackend: Send {
    /// Set the fixed-point divisor used to convert host samples for `channel`
    fn set_scale_factor(&mut self, channel: usize, divisor: f64) -> Result<()>;

    /// Set the sample rate (shared by all channels)
    fn set_samp_rate(&mut self, rate: f64) -> Result<()>;

    /// Set the tick rate (shared by all channels)
    fn set_tick_rate(&mut self, rate: f64) -> Result<()>;

    /// Current transfer-size limit, or [`UNBOUNDED_MTU`] if none is known
    fn get_mtu(&self) -> usize;

    /// Apply a new transfer-size limit
    fn set_mtu(&mut self, mtu: usize);

    /// Register `transport` as the active data path for `channel`
    fn connect_channel(&mut self, channel: usize, transport: Box<dyn TxTransport>) -> Result<()>;
}
