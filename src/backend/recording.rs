//! Recording backend for testing and dry runs
//!
//! `RecordingBackend` implements [`StreamerBackend`] without touching any
//! hardware. It keeps the latest applied value of every setting and a log of
//! every call in order, so tests can assert on exactly what the property layer
//! asked for.
//!
//! It applies the same sanity checks a device path would: rates must be
//! positive and finite, scale divisors finite, and a channel accepts one
//! transport only.

use super::streamer_trait::{StreamerBackend, UNBOUNDED_MTU};
use crate::error::{Result, TxStreamerError};
use crate::transport::TxTransport;
use serde::Serialize;
use std::collections::BTreeMap;

/// One call made on the backend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum BackendCall {
    SetScaleFactor { channel: usize, divisor: f64 },
    SetSampRate { rate: f64 },
    SetTickRate { rate: f64 },
    SetMtu { mtu: usize },
    ConnectChannel { channel: usize, max_payload: usize },
}

/// Backend that records calls instead of programming a device
pub struct RecordingBackend {
    scale_factors: BTreeMap<usize, f64>,
    samp_rate: Option<f64>,
    tick_rate: Option<f64>,
    mtu: usize,
    transports: BTreeMap<usize, Box<dyn TxTransport>>,
    calls: Vec<BackendCall>,
}

impl RecordingBackend {
    /// Create a backend with no limits and no channels connected
    pub fn new() -> Self {
        Self {
            scale_factors: BTreeMap::new(),
            samp_rate: None,
            tick_rate: None,
            mtu: UNBOUNDED_MTU,
            transports: BTreeMap::new(),
            calls: Vec::new(),
        }
    }

    /// Start with a transfer-size limit already in place
    pub fn with_mtu(mut self, mtu: usize) -> Self {
        self.mtu = mtu;
        self
    }

    /// Every call received, oldest first
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Forget the call log (state is kept)
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn scale_factor(&self, channel: usize) -> Option<f64> {
        self.scale_factors.get(&channel).copied()
    }

    pub fn samp_rate(&self) -> Option<f64> {
        self.samp_rate
    }

    pub fn tick_rate(&self) -> Option<f64> {
        self.tick_rate
    }

    pub fn is_connected(&self, channel: usize) -> bool {
        self.transports.contains_key(&channel)
    }

    pub fn connected_channels(&self) -> Vec<usize> {
        self.transports.keys().copied().collect()
    }

    fn check_rate(what: &str, rate: f64) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(TxStreamerError::Backend(format!(
                "Invalid {}: {}",
                what, rate
            )));
        }
        Ok(())
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RecordingBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingBackend")
            .field("scale_factors", &self.scale_factors)
            .field("samp_rate", &self.samp_rate)
            .field("tick_rate", &self.tick_rate)
            .field("mtu", &self.mtu)
            .field("connected", &self.connected_channels())
            .field("calls", &self.calls.len())
            .finish()
    }
}

impl StreamerBackend for RecordingBackend {
    fn set_scale_factor(&mut self, channel: usize, divisor: f64) -> Result<()> {
        self.calls
            .push(BackendCall::SetScaleFactor { channel, divisor });
        if !divisor.is_finite() {
            return Err(TxStreamerError::Backend(format!(
                "Invalid scale divisor for channel {}: {}",
                channel, divisor
            )));
        }
        self.scale_factors.insert(channel, divisor);
        Ok(())
    }

    fn set_samp_rate(&mut self, rate: f64) -> Result<()> {
        self.calls.push(BackendCall::SetSampRate { rate });
        Self::check_rate("sample rate", rate)?;
        self.samp_rate = Some(rate);
        Ok(())
    }

    fn set_tick_rate(&mut self, rate: f64) -> Result<()> {
        self.calls.push(BackendCall::SetTickRate { rate });
        Self::check_rate("tick rate", rate)?;
        self.tick_rate = Some(rate);
        Ok(())
    }

    fn get_mtu(&self) -> usize {
        self.mtu
    }

    fn set_mtu(&mut self, mtu: usize) {
        self.calls.push(BackendCall::SetMtu { mtu });
        self.mtu = mtu;
    }

    fn connect_channel(&mut self, channel: usize, transport: Box<dyn TxTransport>) -> Result<()> {
        self.calls.push(BackendCall::ConnectChannel {
            channel,
            max_payload: transport.get_max_payload_size(),
        });
        if self.transports.contains_key(&channel) {
            return Err(TxStreamerError::Backend(format!(
                "Channel {} already has a transport",
                channel
            )));
        }
        self.transports.insert(channel, transport);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::FixedPayloadTransport;

    #[test]
    fn test_records_calls_in_order() {
        let mut backend = RecordingBackend::new();
        backend.set_samp_rate(1e6).unwrap();
        backend.set_scale_factor(1, 32767.0).unwrap();
        backend.set_mtu(1472);

        assert_eq!(
            backend.calls(),
            &[
                BackendCall::SetSampRate { rate: 1e6 },
                BackendCall::SetScaleFactor {
                    channel: 1,
                    divisor: 32767.0
                },
                BackendCall::SetMtu { mtu: 1472 },
            ]
        );
        assert_eq!(backend.get_mtu(), 1472);
        assert_eq!(backend.scale_factor(1), Some(32767.0));
    }

    #[test]
    fn test_rejects_bad_rates() {
        let mut backend = RecordingBackend::new();
        assert!(backend.set_samp_rate(0.0).is_err());
        assert!(backend.set_tick_rate(f64::NAN).is_err());
        assert_eq!(backend.samp_rate(), None);
        assert_eq!(backend.tick_rate(), None);
    }

    #[test]
    fn test_rejects_second_transport() {
        let mut backend = RecordingBackend::new();
        backend
            .connect_channel(0, FixedPayloadTransport::boxed(8000))
            .unwrap();
        assert!(backend
            .connect_channel(0, FixedPayloadTransport::boxed(8000))
            .is_err());
        assert_eq!(backend.connected_channels(), vec![0]);
    }

    #[test]
    fn test_starts_unbounded() {
        assert_eq!(RecordingBackend::new().get_mtu(), UNBOUNDED_MTU);
        assert_eq!(RecordingBackend::new().with_mtu(9000).get_mtu(), 9000);
    }
}
