//! Tag-carried channel descriptors.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Channel descriptor sent in the `channel-packet` tag of JOIN and MODE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelPacket {
    pub name: String,
    /// Display name of the user allowed to confirm creation and destroy the
    /// channel.
    pub channel_operator_admin: String,
    #[serde(default)]
    pub channel_operators: BTreeSet<String>,
    #[serde(default)]
    pub members: BTreeSet<String>,
}

/// Sent in the `part-message` tag of PART.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartMessage {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub destroy_channel: bool,
}
