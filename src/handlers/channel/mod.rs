//! Channel commands. Channel contents travel in message tags; the relay
//! mirrors only enough of them to track membership and admins.

mod join;
mod mode;
mod part;

pub use join::JoinHandler;
pub use mode::ModeHandler;
pub use part::PartHandler;

use solace_proto::Message;
use tracing::warn;

use crate::protocol::{ChannelPacket, decode_packet};

pub(crate) const CHANNEL_PACKET_TAG: &str = "channel-packet";
pub(crate) const CREATE_CHANNEL_TAG: &str = "create-channel";
pub(crate) const PART_MESSAGE_TAG: &str = "part-message";

fn wants_creation(msg: &Message) -> bool {
    msg.tag_value(CREATE_CHANNEL_TAG) == Some("true")
}

/// Decode the `channel-packet` tag. An undecodable tag is logged and
/// treated as absent.
fn channel_packet(msg: &Message) -> Option<ChannelPacket> {
    let encoded = msg.tag_value(CHANNEL_PACKET_TAG)?;
    match decode_packet(encoded) {
        Ok(packet) => Some(packet),
        Err(error) => {
            warn!(%error, command = msg.command.name(), "Undecodable channel packet");
            None
        }
    }
}
