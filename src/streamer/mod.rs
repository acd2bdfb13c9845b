//! Multi-channel transmit streamer node.
//!
//! The node is the terminal sink of a device configuration graph: no input
//! ports, one output port per channel. During the configuration phase it
//! keeps each channel's properties consistent, converges the channels on a
//! single MTU as transports are attached, and forwards resolved values to the
//! base streaming implementation ([`StreamerBackend`]).
//!
//! ```text
//! set_property / connect_channel
//!        │
//!        ▼
//! [PropertyTree] ── resolvers ──► [StreamerState] ──► StreamerBackend
//!   scaling, samp_rate,               current MTU
//!   tick_rate, type, mtu
//! ```
//!
//! All calls are synchronous and expected to happen on one thread before
//! streaming starts. Only the instance counter behind [`TxStreamer::unique_id`]
//! is shared between nodes.

pub mod channel;
mod mtu;

pub use channel::{ChannelProps, FULL_SCALE_S16};

use crate::backend::{StreamerBackend, UNBOUNDED_MTU};
use crate::config::{ResolverConfig, StreamArgs, StreamerConfig};
use crate::error::{Result, ResultExt, TxStreamerError};
use crate::node::{check_port_connections, ForwardingPolicy, GraphNode};
use crate::property::{
    PropertyHandle, PropertyResult, PropertySnapshot, PropertyTree, PropertyType, ResolveReport,
    SourceInfo, PROP_KEY_MTU,
};
use crate::transport::TxTransport;
use std::sync::atomic::{AtomicU64, Ordering};

/// Prefix of every streamer's unique ID.
pub const STREAMER_ID: &str = "TxStreamer";

/// Process-wide instance counter. Starts at zero, only ever incremented.
static STREAMER_INST_CTR: AtomicU64 = AtomicU64::new(0);

fn next_unique_id() -> String {
    let n = STREAMER_INST_CTR.fetch_add(1, Ordering::Relaxed);
    format!("{}#{}", STREAMER_ID, n)
}

/// State the resolvers act on: the backend plus the node's MTU ceiling.
#[derive(Debug)]
pub struct StreamerState<B> {
    backend: B,
    current_mtu: Option<usize>,
}

impl<B: StreamerBackend> StreamerState<B> {
    /// Wrap a backend. A limit the backend already enforces seeds the ceiling.
    pub fn new(backend: B) -> Self {
        let initial = backend.get_mtu();
        Self {
            backend,
            current_mtu: (initial != UNBOUNDED_MTU).then_some(initial),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The shared MTU ceiling, `None` until the first transport reports.
    pub fn current_mtu(&self) -> Option<usize> {
        self.current_mtu
    }

    pub(crate) fn lower_mtu(&mut self, mtu: usize) {
        debug_assert!(self.current_mtu.map_or(true, |current| mtu < current));
        self.current_mtu = Some(mtu);
        self.backend.set_mtu(mtu);
    }
}

/// Terminal transmit node with one output port per channel.
pub struct TxStreamer<B: StreamerBackend> {
    unique_id: String,
    stream_args: StreamArgs,
    tree: PropertyTree<StreamerState<B>>,
    state: StreamerState<B>,
    channels: Box<[ChannelProps]>,
    connected: Box<[bool]>,
}

impl<B: StreamerBackend> TxStreamer<B> {
    /// Build a node with one channel per entry of `stream_args.channels`.
    pub fn new(stream_args: StreamArgs, backend: B) -> Result<Self> {
        Self::with_config(
            StreamerConfig {
                stream: stream_args,
                resolver: ResolverConfig::default(),
            },
            backend,
        )
    }

    /// Build a node from a full configuration, run the initial resolution
    /// pass, and return it ready for `connect_channel`.
    pub fn with_config(config: StreamerConfig, backend: B) -> Result<Self> {
        config.stream.validate()?;
        let StreamerConfig {
            stream: stream_args,
            resolver,
        } = config;

        let num_channels = stream_args.num_channels();
        let unique_id = next_unique_id();
        let mut tree = PropertyTree::new(resolver.max_iterations);

        let channels = (0..num_channels)
            .map(|chan| ChannelProps::register(&mut tree, chan, &stream_args.otw_format))
            .collect::<PropertyResult<Vec<_>>>()?
            .into_boxed_slice();
        mtu::add_mtu_resolvers(&mut tree, &channels);

        let mut state = StreamerState::new(backend);
        tree.init_props(&mut state)
            .with_context(|| format!("{}: initial property resolution failed", unique_id))?;

        tracing::debug!(
            "Created {} with {} channels ({} -> {})",
            unique_id,
            num_channels,
            stream_args.cpu_format,
            stream_args.otw_format
        );

        Ok(Self {
            unique_id,
            stream_args,
            tree,
            state,
            channels,
            connected: vec![false; num_channels].into_boxed_slice(),
        })
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// The construction-time configuration record.
    pub fn stream_args(&self) -> &StreamArgs {
        &self.stream_args
    }

    pub fn channel(&self, chan: usize) -> Option<&ChannelProps> {
        self.channels.get(chan)
    }

    fn channel_or_err(&self, chan: usize) -> Result<ChannelProps> {
        self.channels
            .get(chan)
            .copied()
            .ok_or(TxStreamerError::IndexOutOfRange {
                channel: chan,
                num_channels: self.channels.len(),
            })
    }

    pub fn backend(&self) -> &B {
        self.state.backend()
    }

    /// Direct backend access. Writes made here bypass property resolution.
    pub fn backend_mut(&mut self) -> &mut B {
        self.state.backend_mut()
    }

    /// Give the backend back, e.g. to hand it to the streaming phase.
    pub fn into_backend(self) -> B {
        self.state.backend
    }

    /// The MTU all channels have converged on, if any transport has reported.
    pub fn current_mtu(&self) -> Option<usize> {
        self.state.current_mtu()
    }

    pub fn is_connected(&self, chan: usize) -> bool {
        self.connected.get(chan).copied().unwrap_or(false)
    }

    // ── Property access ──

    /// Write a property and resolve.
    pub fn set<T: PropertyType>(
        &mut self,
        handle: PropertyHandle<T>,
        value: T,
    ) -> Result<ResolveReport> {
        Ok(self.tree.set(handle, value, &mut self.state)?)
    }

    pub fn get<T: PropertyType>(&self, handle: PropertyHandle<T>) -> Result<&T> {
        Ok(self.tree.get(handle)?)
    }

    /// Write a property addressed by key and source.
    pub fn set_property<T: PropertyType>(
        &mut self,
        key: &str,
        value: T,
        source: SourceInfo,
    ) -> Result<ResolveReport> {
        let handle = self.tree.handle::<T>(key, source)?;
        self.set(handle, value)
    }

    /// Read a property addressed by key and source.
    pub fn get_property<T: PropertyType>(&self, key: &str, source: SourceInfo) -> Result<T> {
        let handle = self.tree.handle::<T>(key, source)?;
        Ok(self.tree.get(handle)?.clone())
    }

    pub fn set_scaling(&mut self, chan: usize, scaling: f64) -> Result<ResolveReport> {
        let props = self.channel_or_err(chan)?;
        self.set(props.scaling, scaling)
    }

    pub fn set_samp_rate(&mut self, chan: usize, rate: f64) -> Result<ResolveReport> {
        let props = self.channel_or_err(chan)?;
        self.set(props.samp_rate, rate)
    }

    pub fn set_tick_rate(&mut self, chan: usize, rate: f64) -> Result<ResolveReport> {
        let props = self.channel_or_err(chan)?;
        self.set(props.tick_rate, rate)
    }

    /// The channel's MTU property, `None` while unset.
    pub fn mtu(&self, chan: usize) -> Option<usize> {
        let props = self.channels.get(chan)?;
        self.tree.get(props.mtu).ok().copied()
    }

    pub fn otw_format(&self, chan: usize) -> Option<&str> {
        let props = self.channels.get(chan)?;
        self.tree.get(props.otw_format).ok().map(String::as_str)
    }

    /// Every property of the node, in registration order.
    pub fn property_snapshot(&self) -> Vec<PropertySnapshot> {
        self.tree.snapshot()
    }

    // ── Graph surface ──

    /// Attach a transport to `channel`.
    ///
    /// The transport's payload limit is published as the channel's MTU (which
    /// may lower the ceiling for every channel), then the transport is handed
    /// to the backend. Each channel accepts exactly one transport.
    pub fn connect_channel(
        &mut self,
        channel: usize,
        transport: Box<dyn TxTransport>,
    ) -> Result<ResolveReport> {
        if channel >= self.channels.len() {
            return Err(TxStreamerError::IndexOutOfRange {
                channel,
                num_channels: self.channels.len(),
            });
        }
        if self.connected[channel] {
            return Err(TxStreamerError::ChannelAlreadyConnected(channel));
        }

        let mtu = transport.get_max_payload_size();
        tracing::info!(
            "{}: connecting channel {} (max payload {} bytes)",
            self.unique_id,
            channel,
            mtu
        );
        let report = self.set_property::<usize>(PROP_KEY_MTU, mtu, SourceInfo::output_edge(channel))?;

        self.state
            .backend_mut()
            .connect_channel(channel, transport)
            .with_context(|| format!("{}: backend refused channel {}", self.unique_id, channel))?;
        self.connected[channel] = true;
        Ok(report)
    }

    /// Topology check with the reason for a rejection.
    pub fn validate_topology(
        &self,
        connected_inputs: &[usize],
        connected_outputs: &[usize],
    ) -> Result<()> {
        if !connected_inputs.is_empty() {
            return Err(TxStreamerError::Topology(format!(
                "{} has no input ports but {} inputs are connected",
                self.unique_id,
                connected_inputs.len()
            )));
        }
        if connected_outputs.len() != self.num_output_ports() {
            return Err(TxStreamerError::Topology(format!(
                "{} needs all {} channels connected, got {}",
                self.unique_id,
                self.num_output_ports(),
                connected_outputs.len()
            )));
        }
        check_port_connections(
            self.num_input_ports(),
            self.num_output_ports(),
            connected_inputs,
            connected_outputs,
        )
    }
}

impl<B: StreamerBackend> GraphNode for TxStreamer<B> {
    fn unique_id(&self) -> &str {
        &self.unique_id
    }

    fn num_input_ports(&self) -> usize {
        0
    }

    fn num_output_ports(&self) -> usize {
        self.num_channels()
    }

    // No neighbour to forward to: this node terminates the graph.
    fn prop_forwarding_policy(&self) -> ForwardingPolicy {
        ForwardingPolicy::Drop
    }

    fn action_forwarding_policy(&self) -> ForwardingPolicy {
        ForwardingPolicy::Drop
    }

    fn check_topology(&self, connected_inputs: &[usize], connected_outputs: &[usize]) -> bool {
        match self.validate_topology(connected_inputs, connected_outputs) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("{}", e);
                false
            }
        }
    }
}

impl<B: StreamerBackend + std::fmt::Debug> std::fmt::Debug for TxStreamer<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxStreamer")
            .field("unique_id", &self.unique_id)
            .field("num_channels", &self.channels.len())
            .field("current_mtu", &self.state.current_mtu)
            .field("connected", &self.connected)
            .field("backend", &self.state.backend)
            .finish()
    }
}
