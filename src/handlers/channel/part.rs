//! PART command handler.

use async_trait::async_trait;
use solace_proto::{Command, Message};
use tracing::{debug, warn};

use super::PART_MESSAGE_TAG;
use crate::handlers::{Context, Handler, HandlerResult};
use crate::protocol::{PartMessage, decode_packet};

/// Handler for PART command.
///
/// A `part-message` tag asking to destroy the channel is honoured only for
/// the channel admin; anyone else just leaves.
pub struct PartHandler;

#[async_trait]
impl Handler for PartHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let Command::PART(channels, _) = &msg.command else {
            return Ok(());
        };

        let member = ctx.sender(msg)?.name;
        let destroy = match msg.tag_value(PART_MESSAGE_TAG) {
            Some(encoded) => decode_packet::<PartMessage>(encoded)?.destroy_channel,
            None => false,
        };

        for channel in channels {
            let Some(info) = ctx.relay.channels.find_channel(channel) else {
                warn!(channel = %channel, member = %member, "PART for unknown channel");
                continue;
            };

            if destroy && info.admin == member {
                ctx.relay.channels.delete_channel(channel);
                debug!(channel = %channel, admin = %member, "Channel destroyed by admin");
            } else {
                if destroy {
                    warn!(channel = %channel, member = %member, "Non-admin asked to destroy channel");
                }
                ctx.relay.channels.remove_member(channel, &member);
                debug!(channel = %channel, member = %member, "Left channel");
            }
        }
        Ok(())
    }
}
