//! Per-channel properties and their local resolvers.
//!
//! Each channel owns five output-edge properties. Three of them drive the
//! backend directly:
//!
//! - `scaling` → `set_scale_factor(chan, 32767 / scaling)`
//! - `samp_rate` → `set_samp_rate(rate)` (node-wide clock)
//! - `tick_rate` → `set_tick_rate(rate)` (node-wide clock)
//!
//! `type` carries the over-the-wire format and has no resolver. `mtu` is
//! handled by the cross-channel coordinator in [`super::mtu`].

use super::StreamerState;
use crate::backend::StreamerBackend;
use crate::property::{
    Property, PropertyHandle, PropertyResult, PropertyTree, SourceInfo, PROP_KEY_MTU,
    PROP_KEY_SAMP_RATE, PROP_KEY_SCALING, PROP_KEY_TICK_RATE, PROP_KEY_TYPE,
};

/// Largest magnitude of a signed 16-bit sample; a scaling of 1.0 maps
/// normalized samples onto this range.
pub const FULL_SCALE_S16: f64 = 32767.0;

/// Handles to one channel's properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelProps {
    pub index: usize,
    pub scaling: PropertyHandle<f64>,
    pub samp_rate: PropertyHandle<f64>,
    pub tick_rate: PropertyHandle<f64>,
    pub otw_format: PropertyHandle<String>,
    pub mtu: PropertyHandle<usize>,
}

impl ChannelProps {
    /// Register the channel's properties and attach its local resolvers.
    pub(crate) fn register<B: StreamerBackend>(
        tree: &mut PropertyTree<StreamerState<B>>,
        chan: usize,
        otw_format: &str,
    ) -> PropertyResult<Self> {
        let source = SourceInfo::output_edge(chan);

        let props = Self {
            index: chan,
            scaling: tree.register_property(Property::new(PROP_KEY_SCALING, source))?,
            samp_rate: tree.register_property(Property::new(PROP_KEY_SAMP_RATE, source))?,
            tick_rate: tree.register_property(Property::new(PROP_KEY_TICK_RATE, source))?,
            otw_format: tree.register_property(Property::with_value(
                PROP_KEY_TYPE,
                otw_format.to_string(),
                source,
            ))?,
            mtu: tree.register_property(Property::new(PROP_KEY_MTU, source))?,
        };

        let scaling = props.scaling;
        tree.add_property_resolver(
            resolver_name(PROP_KEY_SCALING, chan),
            [scaling.id()],
            [],
            move |ctx| {
                if let Some(value) = ctx.value(scaling) {
                    ctx.state_mut()
                        .backend_mut()
                        .set_scale_factor(chan, FULL_SCALE_S16 / value)?;
                }
                Ok(())
            },
        );

        let samp_rate = props.samp_rate;
        tree.add_property_resolver(
            resolver_name(PROP_KEY_SAMP_RATE, chan),
            [samp_rate.id()],
            [],
            move |ctx| {
                if let Some(rate) = ctx.value(samp_rate) {
                    ctx.state_mut().backend_mut().set_samp_rate(rate)?;
                }
                Ok(())
            },
        );

        let tick_rate = props.tick_rate;
        tree.add_property_resolver(
            resolver_name(PROP_KEY_TICK_RATE, chan),
            [tick_rate.id()],
            [],
            move |ctx| {
                if let Some(rate) = ctx.value(tick_rate) {
                    ctx.state_mut().backend_mut().set_tick_rate(rate)?;
                }
                Ok(())
            },
        );

        Ok(props)
    }
}

pub(crate) fn resolver_name(key: &str, chan: usize) -> String {
    format!("'{}'@{}", key, chan)
}
