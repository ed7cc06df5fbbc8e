//! Client identities and message targets.
//!
//! A [`Nickname`] is a display name plus an optional device id. Its text
//! form on the wire is `name` or `name:<uuid>`. Equality and hashing cover
//! both fields, which is what exact session lookups rely on; lookups that
//! only care about the person use [`Nickname::same_name`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MessageParseError;

/// Longest accepted display name, in characters.
pub const MAX_NAME_LEN: usize = 64;

/// Identifies a client: a display name and, optionally, the device it runs on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nickname {
    /// Display name shared by all of a user's devices.
    pub name: String,
    /// Device the connection belongs to, if the client supplied one.
    pub device_id: Option<Uuid>,
}

impl Nickname {
    /// Build a nickname, validating the display name.
    pub fn new(name: &str, device_id: Option<Uuid>) -> Result<Self, MessageParseError> {
        if !is_valid_name(name) {
            return Err(MessageParseError::InvalidNickname(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            device_id,
        })
    }

    /// Whether `other` names the same user, ignoring the device.
    pub fn same_name(&self, other: &Nickname) -> bool {
        self.name == other.name
    }
}

/// Display names are 1..=64 characters from the classic nickname set plus `.`.
pub fn is_valid_name(name: &str) -> bool {
    let len = name.chars().count();
    (1..=MAX_NAME_LEN).contains(&len)
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || "-_[]\\`^{}|.".contains(c))
}

impl FromStr for Nickname {
    type Err = MessageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((name, device)) => {
                let device_id = Uuid::parse_str(device)
                    .map_err(|_| MessageParseError::InvalidNickname(s.to_string()))?;
                Nickname::new(name, Some(device_id))
            }
            None => Nickname::new(s, None),
        }
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.device_id {
            Some(device) => write!(f, "{}:{}", self.name, device),
            None => f.write_str(&self.name),
        }
    }
}

/// Whether a target names a channel (`#` or `&` prefix).
pub fn is_channel_name(target: &str) -> bool {
    target.len() > 1 && (target.starts_with('#') || target.starts_with('&'))
}

/// A PRIVMSG target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Recipient {
    /// Every connected client (`*`).
    All,
    /// A channel, name including its sigil.
    Channel(String),
    /// A single client.
    Nick(Nickname),
}

impl Recipient {
    /// Parse a comma separated target list.
    pub fn parse_list(s: &str) -> Result<Vec<Recipient>, MessageParseError> {
        s.split(',')
            .filter(|t| !t.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl FromStr for Recipient {
    type Err = MessageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            Ok(Recipient::All)
        } else if is_channel_name(s) {
            Ok(Recipient::Channel(s.to_string()))
        } else {
            s.parse().map(Recipient::Nick)
        }
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recipient::All => f.write_str("*"),
            Recipient::Channel(name) => f.write_str(name),
            Recipient::Nick(nick) => nick.fmt(f),
        }
    }
}
