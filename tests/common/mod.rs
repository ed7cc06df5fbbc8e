//! Integration test common infrastructure.
//!
//! Provides utilities for spawning in-process relays, creating test clients,
//! and building the packets clients exchange.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use server::{MemoryDirectory, TestServer};

use solace_proto::Nickname;
use solace_relayd::protocol::{ChannelPacket, encode_packet};
use std::collections::BTreeSet;
use uuid::Uuid;

/// A nick on a fresh device.
#[allow(dead_code)]
pub fn device_nick(name: &str) -> Nickname {
    Nickname::new(name, Some(Uuid::new_v4())).expect("valid nick")
}

/// Encoded `channel-packet` tag value.
#[allow(dead_code)]
pub fn channel_packet(name: &str, admin: &str, members: &[&str]) -> String {
    encode_packet(&ChannelPacket {
        name: name.to_string(),
        channel_operator_admin: admin.to_string(),
        channel_operators: BTreeSet::from([admin.to_string()]),
        members: members.iter().map(|m| m.to_string()).collect(),
    })
    .expect("encodable channel packet")
}

/// Poll `condition` until it holds or two seconds pass.
#[allow(dead_code)]
pub async fn eventually<F>(mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    condition()
}
