//! Owned message representation.

use std::borrow::Cow;

use crate::command::Command;
use crate::error::MessageParseError;

/// A message tag: key plus optional value.
///
/// Tags are kept in the order they arrived so an echoed message carries
/// exactly the tag set it was built from.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Tag(pub Cow<'static, str>, pub Option<String>);

impl Tag {
    /// Create a new tag with the given key and optional value.
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Tag(Cow::Owned(key.into()), value)
    }

    /// The tag key.
    pub fn key(&self) -> &str {
        &self.0
    }

    /// The tag value, if any.
    pub fn value(&self) -> Option<&str> {
        self.1.as_deref()
    }
}

/// A complete protocol message.
#[derive(Clone, PartialEq, Debug)]
pub struct Message {
    /// Optional message tags.
    pub tags: Option<Vec<Tag>>,
    /// Opaque origin of the message (encoded sender identity or server name).
    pub prefix: Option<String>,
    /// The command and its arguments.
    pub command: Command,
}

impl Message {
    /// Build a message from raw command name and arguments.
    pub fn new(
        prefix: Option<&str>,
        command: &str,
        args: Vec<&str>,
    ) -> Result<Message, MessageParseError> {
        Message::with_tags(None, prefix, command, args)
    }

    /// Build a message with tags from raw command name and arguments.
    pub fn with_tags(
        tags: Option<Vec<Tag>>,
        prefix: Option<&str>,
        command: &str,
        args: Vec<&str>,
    ) -> Result<Message, MessageParseError> {
        Ok(Message {
            tags,
            prefix: prefix.map(str::to_owned),
            command: Command::new(command, args)?,
        })
    }

    /// Look up a tag's value by key. Tags present without a value yield `None`.
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tags
            .as_ref()?
            .iter()
            .find(|tag| tag.0 == key)
            .and_then(|tag| tag.1.as_deref())
    }

    /// Append a tag.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        self.tags
            .get_or_insert_with(Vec::new)
            .push(Tag::new(key, value.map(Into::into)));
        self
    }

    /// Replace the tag set. An empty list clears it.
    #[must_use]
    pub fn with_message_tags(mut self, tags: Option<Vec<Tag>>) -> Self {
        self.tags = tags.filter(|t| !t.is_empty());
        self
    }

    /// Set the origin.
    #[must_use]
    pub fn with_prefix(mut self, origin: impl Into<String>) -> Self {
        self.prefix = Some(origin.into());
        self
    }

    /// `PING <server>`.
    pub fn ping(server: impl Into<String>) -> Self {
        Command::PING(server.into(), None).into()
    }

    /// `PONG <server>`.
    pub fn pong(server: impl Into<String>) -> Self {
        Command::PONG(server.into(), None).into()
    }

    /// `PRIVMSG <target> :<payload>`.
    pub fn privmsg(target: crate::Recipient, payload: impl Into<String>) -> Self {
        Command::PRIVMSG(vec![target], payload.into()).into()
    }
}

impl From<Command> for Message {
    fn from(cmd: Command) -> Message {
        Message {
            tags: None,
            prefix: None,
            command: cmd,
        }
    }
}
