//! Transmit streamer dry run
//!
//! Builds a streamer node against a recording backend, replays a scenario of
//! property writes and transport connections, and prints the resolved
//! properties and the backend calls they produced.
//!
//! Usage: `txstreamer-rs [scenario.toml]`

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use txstreamer_rs::{
    backend::RecordingBackend,
    config::StreamerConfig,
    logging,
    property::PropertySnapshot,
    streamer::TxStreamer,
    transport::FixedPayloadTransport,
    GraphNode,
};

const DEFAULT_SCENARIO: &str = "demos/four_channel.toml";

/// A simulated transport attached to one channel
#[derive(Debug, Deserialize)]
struct TransportSpec {
    channel: usize,
    max_payload: usize,
}

/// Initial property values for one channel, applied before any transport
#[derive(Debug, Deserialize)]
struct ChannelSettings {
    channel: usize,
    scaling: Option<f64>,
    samp_rate: Option<f64>,
    tick_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    #[serde(flatten)]
    config: StreamerConfig,

    /// MTU the base implementation already enforces, if any
    backend_mtu: Option<usize>,

    #[serde(default)]
    settings: Vec<ChannelSettings>,

    #[serde(default)]
    transports: Vec<TransportSpec>,
}

#[derive(Serialize)]
struct Outcome<'a> {
    unique_id: &'a str,
    current_mtu: Option<usize>,
    topology_ok: bool,
    properties: Vec<PropertySnapshot>,
    backend_calls: &'a [txstreamer_rs::backend::BackendCall],
}

fn main() -> anyhow::Result<()> {
    logging::init_logging(logging::DEFAULT_LOG_FILTER);

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCENARIO));
    tracing::info!("Loading scenario from {:?}", path);

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read scenario {:?}", path))?;
    let scenario: Scenario = toml::from_str(&content)
        .with_context(|| format!("Failed to parse scenario {:?}", path))?;

    let backend = match scenario.backend_mtu {
        Some(mtu) => RecordingBackend::new().with_mtu(mtu),
        None => RecordingBackend::new(),
    };
    let mut node = TxStreamer::with_config(scenario.config, backend)?;

    for settings in &scenario.settings {
        let chan = settings.channel;
        if let Some(scaling) = settings.scaling {
            node.set_scaling(chan, scaling)
                .with_context(|| format!("Setting scaling on channel {}", chan))?;
        }
        if let Some(rate) = settings.samp_rate {
            node.set_samp_rate(chan, rate)
                .with_context(|| format!("Setting sample rate on channel {}", chan))?;
        }
        if let Some(rate) = settings.tick_rate {
            node.set_tick_rate(chan, rate)
                .with_context(|| format!("Setting tick rate on channel {}", chan))?;
        }
    }

    let mut connected = Vec::with_capacity(scenario.transports.len());
    for xport in &scenario.transports {
        let report = node
            .connect_channel(xport.channel, FixedPayloadTransport::boxed(xport.max_payload))
            .with_context(|| format!("Connecting channel {}", xport.channel))?;
        tracing::debug!(
            "Channel {} connected: {} sweeps, {} writes",
            xport.channel,
            report.sweeps,
            report.writes
        );
        connected.push(xport.channel);
    }

    let topology_ok = node.check_topology(&[], &connected);
    if !topology_ok {
        tracing::warn!("{} is not fully connected", node.unique_id());
    }

    let outcome = Outcome {
        unique_id: node.unique_id(),
        current_mtu: node.current_mtu(),
        topology_ok,
        properties: node.property_snapshot(),
        backend_calls: node.backend().calls(),
    };
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}
