//! Packet routing.
//!
//! A PRIVMSG payload is a [`MessagePacket`]. Configuration publishes are
//! terminated here and forwarded to the user directory; everything else is
//! relayed unchanged to the recipient's live session.

use solace_proto::{Message, Nickname};
use tracing::{debug, info, warn};

use super::delivery::{build_relay_message, resolve_target};
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::Context;
use crate::protocol::{MessageFlag, MessagePacket, User};

/// Route a packet addressed to a nick.
pub(super) async fn route_to_nick(
    ctx: &mut Context<'_>,
    msg: &Message,
    packet: &MessagePacket,
    recipient: &Nickname,
) -> HandlerResult {
    if packet.flag == MessageFlag::PublishUserConfiguration {
        return publish_user_configuration(ctx, packet, recipient).await;
    }
    let sender = ctx.sender(msg)?;
    relay_packet(ctx, packet, &sender, recipient).await
}

/// Route a packet addressed to a channel. The relay keeps no channel fan-out;
/// the packet itself names the member it is for.
pub(super) async fn route_to_channel(
    ctx: &mut Context<'_>,
    msg: &Message,
    packet: &MessagePacket,
    channel: &str,
) -> HandlerResult {
    let recipient = packet.recipient.as_ref().ok_or(HandlerError::MissingRecipient)?;
    debug!(channel, recipient = %recipient, "Channel packet addressed to member");
    let sender = ctx.sender(msg)?;
    relay_packet(ctx, packet, &sender, recipient).await
}

/// Create the user in the directory, then bind this connection to `nick`.
///
/// Nothing is registered when the directory rejects the user.
async fn publish_user_configuration(
    ctx: &mut Context<'_>,
    packet: &MessagePacket,
    nick: &Nickname,
) -> HandlerResult {
    let configuration = packet
        .user_configuration
        .clone()
        .ok_or(HandlerError::MissingUserConfiguration)?;
    let user = User::new(nick.name.clone(), configuration);

    ctx.relay.directory.create_user(&user).await?;
    info!(username = %user.username, "User created in directory");

    ctx.handle.set_nick(nick.clone());
    ctx.relay.sessions.register_session(ctx.handle, nick.clone()).await;
    *ctx.authenticated = true;
    Ok(())
}

/// Relay `packet` to the live session of `recipient`. An offline recipient,
/// or one whose outbound queue is full, drops the packet.
async fn relay_packet(
    ctx: &Context<'_>,
    packet: &MessagePacket,
    sender: &Nickname,
    recipient: &Nickname,
) -> HandlerResult {
    let Some((target, resolved)) = resolve_target(&ctx.relay.sessions, recipient) else {
        warn!(
            flag = ?packet.flag,
            packet_id = %packet.id,
            recipient = %recipient,
            "Recipient offline, dropping packet"
        );
        return Ok(());
    };

    let relayed = build_relay_message(packet, sender, resolved)?;
    if let Err(error) = target.try_send(relayed) {
        warn!(
            flag = ?packet.flag,
            recipient = %recipient,
            %error,
            "Recipient unreachable, dropping packet"
        );
        return Ok(());
    }

    debug!(
        flag = ?packet.flag,
        sender = %sender,
        recipient = %recipient,
        "Packet relayed"
    );
    Ok(())
}
