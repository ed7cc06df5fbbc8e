//! In-memory channel bookkeeping.
//!
//! Channels live only as long as the process. The cache records who created
//! a channel and who joined it; it does not gate message delivery.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::BTreeSet;
use tracing::info;

use crate::protocol::ChannelPacket;

#[derive(Debug, Clone)]
pub struct ChannelInfo {
    pub packet: ChannelPacket,
    pub members: BTreeSet<String>,
    pub created: DateTime<Utc>,
    pub admin: String,
}

#[derive(Default)]
pub struct ChannelCache {
    channels: DashMap<String, ChannelInfo>,
}

impl ChannelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace the channel named by `packet`, seeded with its members.
    pub fn create_channel(&self, packet: ChannelPacket, admin: &str) {
        let name = packet.name.clone();
        let info = ChannelInfo {
            members: packet.members.clone(),
            packet,
            created: Utc::now(),
            admin: admin.to_string(),
        };
        self.channels.insert(name.clone(), info);
        info!(channel = %name, admin = %admin, "Channel cached");
    }

    pub fn find_channel(&self, name: &str) -> Option<ChannelInfo> {
        self.channels.get(name).map(|entry| entry.value().clone())
    }

    pub fn channel_exists(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    /// Returns false when the channel is unknown.
    pub fn add_member(&self, name: &str, member: &str) -> bool {
        match self.channels.get_mut(name) {
            Some(mut channel) => {
                channel.members.insert(member.to_string());
                info!(channel = %name, member = %member, "Member added");
                true
            }
            None => false,
        }
    }

    /// Returns false when the channel is unknown.
    pub fn remove_member(&self, name: &str, member: &str) -> bool {
        match self.channels.get_mut(name) {
            Some(mut channel) => {
                channel.members.remove(member);
                info!(channel = %name, member = %member, "Member removed");
                true
            }
            None => false,
        }
    }

    pub fn delete_channel(&self, name: &str) -> bool {
        let removed = self.channels.remove(name).is_some();
        if removed {
            info!(channel = %name, "Channel deleted");
        }
        removed
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
