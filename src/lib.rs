//! solace-relayd - session and routing core of the Solace relay.
//!
//! Clients speak an IRC-shaped line protocol ([`solace_proto`]). The relay
//! tracks which connection serves which nick, relays opaque packets between
//! them, forwards configuration publishes to the user directory, and echoes
//! channel control messages. It never inspects encrypted payloads.

pub mod config;
pub mod directory;
pub mod error;
pub mod handlers;
pub mod network;
pub mod protocol;
pub mod state;
