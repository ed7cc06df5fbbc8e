//! Application packets carried inside protocol messages.
//!
//! The relay treats every cryptographic field as an opaque blob: it decodes
//! envelopes far enough to route them and never looks inside signatures or
//! ciphertexts.

mod blob;
mod channel;
mod encoding;
mod packet;
mod user;

pub use channel::{ChannelPacket, PartMessage};
pub use encoding::{decode_origin, decode_packet, encode_origin, encode_packet};
pub use packet::{MessageFlag, MessagePacket, Signed, SignedRatchetMessage};
pub use user::{
    SignedDeviceConfiguration, SignedKyberOneTimeKey, SignedPublicOneTimeKey, User,
    UserConfiguration,
};
