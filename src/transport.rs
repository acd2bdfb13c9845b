//! Transport handles attached to streamer channels.
//!
//! The link layer itself lives outside this crate; the streamer only needs to
//! ask a connected transport how large a payload it accepts.

/// A connected outbound data transport for one channel.
#[cfg_attr(test, mockall::automock)]
pub trait TxTransport: Send {
    /// Largest payload, in bytes, the transport accepts per packet.
    fn get_max_payload_size(&self) -> usize;
}

/// Transport stand-in that reports a fixed payload limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPayloadTransport {
    max_payload: usize,
}

impl FixedPayloadTransport {
    pub fn new(max_payload: usize) -> Self {
        Self { max_payload }
    }

    /// Boxed, ready to hand to `connect_channel`.
    pub fn boxed(max_payload: usize) -> Box<dyn TxTransport> {
        Box::new(Self::new(max_payload))
    }
}

impl TxTransport for FixedPayloadTransport {
    fn get_max_payload_size(&self) -> usize {
        self.max_payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_payload() {
        let xport = FixedPayloadTransport::boxed(1472);
        assert_eq!(xport.get_max_payload_size(), 1472);
    }
}
