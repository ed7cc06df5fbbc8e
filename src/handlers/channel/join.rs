//! JOIN command handler.

use async_trait::async_trait;
use solace_proto::{Command, Message};
use tracing::{debug, warn};

use super::{channel_packet, wants_creation};
use crate::handlers::{Context, Handler, HandlerResult};
use crate::protocol::ChannelPacket;
use crate::state::ChannelCache;

/// Handler for JOIN command.
///
/// Every channel in the JOIN is echoed back to the client with the original
/// tags so it can apply the channel packet it sent.
pub struct JoinHandler;

#[async_trait]
impl Handler for JoinHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let Command::JOIN(channels, _) = &msg.command else {
            return Ok(());
        };

        let member = ctx.sender(msg).ok().map(|nick| nick.name);
        let packet = channel_packet(msg);
        let create = wants_creation(msg);
        let origin = ctx.echo_origin(msg);

        for channel in channels {
            match &member {
                Some(member) => {
                    record_join(&ctx.relay.channels, channel, packet.as_ref(), create, member)
                }
                None => warn!(channel = %channel, "JOIN without a known sender"),
            }

            let echo = Message {
                tags: msg.tags.clone(),
                prefix: origin.clone(),
                command: Command::JOIN(vec![channel.clone()], Vec::new()),
            };
            ctx.send(echo).await?;
        }
        Ok(())
    }
}

/// Mirror a join in the channel cache.
///
/// A join carrying a packet may create the channel, explicitly or because it
/// is not known yet, and is keyed on the packet's name. A join without one can
/// only enter an existing channel.
fn record_join(
    channels: &ChannelCache,
    channel: &str,
    packet: Option<&ChannelPacket>,
    create: bool,
    member: &str,
) {
    let key = packet.map_or(channel, |packet| packet.name.as_str());
    if key != channel {
        debug!(channel, packet_name = key, "JOIN target differs from channel packet");
    }

    if let Some(packet) = packet.filter(|_| create || !channels.channel_exists(key)) {
        channels.create_channel(packet.clone(), &packet.channel_operator_admin);
        debug!(channel = key, admin = %packet.channel_operator_admin, "Channel created on join");
    }

    if channels.add_member(key, member) {
        debug!(channel = key, member, "Joined channel");
    } else {
        warn!(channel = key, member, "JOIN for unknown channel");
    }
}
