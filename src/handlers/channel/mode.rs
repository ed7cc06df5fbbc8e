//! MODE command handler.
//!
//! A MODE tagged `create-channel=true` with a channel packet is a channel
//! creation request and is answered only to the requester. Any other channel
//! MODE is fanned out to every live session.

use async_trait::async_trait;
use solace_proto::{Command, Message};
use tracing::{debug, info, warn};

use super::{CHANNEL_PACKET_TAG, wants_creation};
use crate::handlers::{Context, Handler, HandlerResult};
use crate::protocol::{ChannelPacket, decode_packet};

/// Handler for MODE command.
pub struct ModeHandler;

#[async_trait]
impl Handler for ModeHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let Command::ChannelMODE(channel, _) = &msg.command else {
            debug!(command = ?msg.command, "Ignoring non-channel MODE");
            return Ok(());
        };

        match msg.tag_value(CHANNEL_PACKET_TAG) {
            Some(encoded) if wants_creation(msg) => {
                let packet: ChannelPacket = decode_packet(encoded)?;
                create_channel(ctx, msg, channel, packet).await
            }
            _ => broadcast_mode(ctx, msg, channel),
        }
    }
}

async fn create_channel(
    ctx: &mut Context<'_>,
    msg: &Message,
    channel: &str,
    packet: ChannelPacket,
) -> HandlerResult {
    let sender = ctx.sender(msg)?;
    if packet.channel_operator_admin != sender.name {
        warn!(
            channel,
            sender = %sender,
            claimed_admin = %packet.channel_operator_admin,
            "Channel creation by someone other than the admin, ignoring"
        );
        return Ok(());
    }

    if ctx.relay.channels.channel_exists(&packet.name) {
        warn!(channel, "Channel already exists");
    } else {
        ctx.relay.channels.create_channel(packet, &sender.name);
        info!(channel, admin = %sender.name, "Channel created");
    }

    let echo = Message {
        tags: msg.tags.clone(),
        prefix: ctx.echo_origin(msg),
        command: msg.command.clone(),
    };
    ctx.send(echo).await
}

fn broadcast_mode(ctx: &Context<'_>, msg: &Message, channel: &str) -> HandlerResult {
    if !ctx.relay.channels.channel_exists(channel) {
        debug!(channel, "MODE for a channel the relay does not track");
    }

    let update = Message {
        tags: msg.tags.clone(),
        prefix: ctx.echo_origin(msg),
        command: msg.command.clone(),
    };
    for session in ctx.relay.sessions.get_sessions() {
        if let Err(error) = session.try_send(update.clone()) {
            debug!(session_id = %session.id(), %error, "MODE not delivered");
        }
    }
    Ok(())
}
