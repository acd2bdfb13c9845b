//! Cross-channel MTU coordination.
//!
//! Every channel reports its own transport limit, but the node must behave as
//! if one limit applied everywhere. One resolver per channel watches that
//! channel's `mtu` property and may write every channel's `mtu`:
//!
//! - strictly below the current ceiling (or no ceiling yet): the value becomes
//!   the new ceiling and is written to all channels, then pushed to the
//!   backend;
//! - equal to or above the ceiling: every channel is (re)written with the
//!   ceiling, so a late, looser limit never widens it. These writes only
//!   change channels that do not hold the ceiling yet.
//!
//! The ceiling only ever decreases, and re-fired resolvers see equal values,
//! so a pass terminates after at most two sweeps beyond the triggering write.

use super::channel::resolver_name;
use super::{ChannelProps, StreamerState};
use crate::backend::StreamerBackend;
use crate::property::{PropertyHandle, PropertyId, PropertyTree, PROP_KEY_MTU};

pub(crate) fn add_mtu_resolvers<B: StreamerBackend>(
    tree: &mut PropertyTree<StreamerState<B>>,
    channels: &[ChannelProps],
) {
    let all_mtus: Vec<PropertyHandle<usize>> = channels.iter().map(|c| c.mtu).collect();

    for chan in channels {
        let own = chan.mtu;
        let index = chan.index;
        let outputs: Vec<PropertyId> = all_mtus.iter().map(|h| h.id()).collect();
        let all_mtus = all_mtus.clone();

        tree.add_property_resolver(
            resolver_name(PROP_KEY_MTU, index),
            [own.id()],
            outputs,
            move |ctx| {
                let Some(mtu) = ctx.value(own) else {
                    return Ok(());
                };

                match ctx.state().current_mtu() {
                    Some(current) if mtu >= current => {
                        if mtu > current {
                            tracing::debug!(
                                "Channel {} reported MTU {} above ceiling {}, clamping",
                                index,
                                mtu,
                                current
                            );
                        }
                        // Also fills channels that have not reported yet when
                        // the ceiling came from the backend.
                        for handle in &all_mtus {
                            ctx.set(*handle, current)?;
                        }
                    }
                    _ => {
                        for handle in &all_mtus {
                            ctx.set(*handle, mtu)?;
                        }
                        tracing::info!("MTU ceiling lowered to {} by channel {}", mtu, index);
                        ctx.state_mut().lower_mtu(mtu);
                    }
                }
                Ok(())
            },
        );
    }
}
