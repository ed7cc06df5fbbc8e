//! PRIVMSG command handler.

use async_trait::async_trait;
use solace_proto::{Command, Message, Recipient};
use tracing::{debug, warn};

use super::routing::{route_to_channel, route_to_nick};
use crate::handlers::{Context, Handler, HandlerResult};
use crate::protocol::{MessagePacket, decode_packet};

/// Handler for PRIVMSG command.
///
/// The payload is decoded once and routed to each recipient in turn. A
/// recipient that fails is logged and skipped; the others still get it.
pub struct PrivmsgHandler;

#[async_trait]
impl Handler for PrivmsgHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let Command::PRIVMSG(recipients, payload) = &msg.command else {
            return Ok(());
        };

        let packet: MessagePacket = decode_packet(payload)?;

        for recipient in recipients {
            let routed = match recipient {
                Recipient::Nick(nick) => route_to_nick(ctx, msg, &packet, nick).await,
                Recipient::Channel(channel) => route_to_channel(ctx, msg, &packet, channel).await,
                Recipient::All => {
                    debug!(packet_id = %packet.id, "Ignoring broadcast recipient");
                    Ok(())
                }
            };
            if let Err(error) = routed {
                warn!(
                    packet_id = %packet.id,
                    recipient = %recipient,
                    code = error.error_code(),
                    %error,
                    "Recipient skipped"
                );
            }
        }
        Ok(())
    }
}
