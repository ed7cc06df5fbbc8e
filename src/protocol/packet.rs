//! The relayed envelope.

use serde::{Deserialize, Serialize};
use solace_proto::Nickname;
use uuid::Uuid;

use super::user::UserConfiguration;

/// What a [`MessagePacket`] is for. Only `PublishUserConfiguration` changes
/// how the relay treats it; every other flag is relayed peer to peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageFlag {
    PublishUserConfiguration,
    FriendshipStateRequest,
    CommunicationSynchronization,
    ContactCreated,
    AddContacts,
    PrivateMessage,
}

/// Envelope carried base64-encoded in PRIVMSG payloads.
///
/// Which optional field is populated depends on `flag`; the relay never
/// insists on it and treats a missing field as an ordinary error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePacket {
    pub id: String,
    pub flag: MessageFlag,
    #[serde(default)]
    pub user_configuration: Option<UserConfiguration>,
    #[serde(default)]
    pub sender: Option<Uuid>,
    #[serde(default)]
    pub recipient: Option<Nickname>,
    #[serde(default)]
    pub message: Option<SignedRatchetMessage>,
}

impl MessagePacket {
    pub fn new(id: impl Into<String>, flag: MessageFlag) -> Self {
        Self {
            id: id.into(),
            flag,
            user_configuration: None,
            sender: None,
            recipient: None,
            message: None,
        }
    }
}

/// Packets are identified by id alone.
impl PartialEq for MessagePacket {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// An end-to-end encrypted ratchet message, forwarded untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedRatchetMessage {
    #[serde(rename = "a", default)]
    pub signed: Option<Signed>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signed {
    #[serde(rename = "a", with = "super::blob")]
    pub data: Vec<u8>,
    #[serde(rename = "c", with = "super::blob")]
    pub signature: Vec<u8>,
}
