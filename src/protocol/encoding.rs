//! base64(MessagePack) helpers shared by PRIVMSG payloads, channel tags and
//! sender origins.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde::de::DeserializeOwned;
use solace_proto::Nickname;

use crate::error::PacketError;

/// Encode any packet as base64 of its named-field MessagePack form.
pub fn encode_packet<T: Serialize>(value: &T) -> Result<String, PacketError> {
    let bytes = rmp_serde::to_vec_named(value)?;
    Ok(STANDARD.encode(bytes))
}

/// Inverse of [`encode_packet`]. Surrounding whitespace is ignored.
pub fn decode_packet<T: DeserializeOwned>(encoded: &str) -> Result<T, PacketError> {
    let bytes = STANDARD.decode(encoded.trim())?;
    Ok(rmp_serde::from_slice(&bytes)?)
}

/// The origin string stamped on relayed messages: the encoded sender identity.
pub fn encode_origin(nick: &Nickname) -> Result<String, PacketError> {
    encode_packet(nick)
}

pub fn decode_origin(origin: &str) -> Result<Nickname, PacketError> {
    decode_packet(origin)
}
