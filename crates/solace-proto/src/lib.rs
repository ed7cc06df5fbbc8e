//! # solace-proto
//!
//! The line protocol spoken between Solace clients and the relay.
//!
//! Messages follow the IRC shape (`[@tags] [:origin] COMMAND params... [:trailing]`)
//! with IRCv3 message tags used as an out-of-band key/value side channel.
//! Only the command set the relay understands is typed; everything else is
//! carried through as [`Command::Raw`].
//!
//! ```rust
//! use solace_proto::{Command, Message};
//!
//! let msg: Message = "@create-channel=true JOIN #ops".parse().unwrap();
//! assert_eq!(msg.tag_value("create-channel"), Some("true"));
//! assert!(matches!(msg.command, Command::JOIN(_, _)));
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
#[cfg(feature = "tokio")]
pub mod irc;
#[cfg(feature = "tokio")]
pub mod line;
pub mod message;
pub mod nick;

pub use self::command::{Command, UserDetails};
pub use self::error::{MessageParseError, ProtocolError};
#[cfg(feature = "tokio")]
pub use self::irc::IrcCodec;
pub use self::message::{Message, Tag};
pub use self::nick::{is_channel_name, Nickname, Recipient};
