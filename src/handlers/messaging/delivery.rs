//! Target resolution and relay message construction.

use solace_proto::{Command, Message, Nickname, Recipient};
use std::sync::Arc;

use crate::error::PacketError;
use crate::protocol::{MessagePacket, encode_origin, encode_packet};
use crate::state::{SessionHandle, SessionManager};

/// Find a live session for `recipient`.
///
/// An exact nick (name and device) is tried first. Failing that, the first
/// live session registered under the same name on any device is used, which
/// lets a message reach a user whose device id the sender does not know.
/// Returns the session together with the nick it is registered under.
pub(super) fn resolve_target(
    sessions: &SessionManager,
    recipient: &Nickname,
) -> Option<(Arc<SessionHandle>, Nickname)> {
    if let Ok(handle) = sessions.get_session(recipient) {
        return Some((handle, recipient.clone()));
    }

    sessions
        .cache()
        .entries()
        .into_iter()
        .find(|(nick, handle)| nick.same_name(recipient) && handle.has_writer())
        .map(|(nick, handle)| (handle, nick))
}

/// Wrap `packet` in a PRIVMSG from `sender` to `recipient`.
pub(super) fn build_relay_message(
    packet: &MessagePacket,
    sender: &Nickname,
    recipient: Nickname,
) -> Result<Message, PacketError> {
    Ok(Message {
        tags: None,
        prefix: Some(encode_origin(sender)?),
        command: Command::PRIVMSG(vec![Recipient::Nick(recipient)], encode_packet(packet)?),
    })
}
