//! `FromStr` for [`Message`].

use std::borrow::Cow;
use std::str::FromStr;

use crate::error::{MessageParseError, ProtocolError};

use super::nom_parser::ParsedMessage;
use super::tags::unescape_tag_value;
use super::types::{Message, Tag};

/// Keys the relay sees on nearly every channel message.
#[inline]
fn intern_tag_key(key: &str) -> Cow<'static, str> {
    match key {
        "channel-packet" => Cow::Borrowed("channel-packet"),
        "create-channel" => Cow::Borrowed("create-channel"),
        "part-message" => Cow::Borrowed("part-message"),
        "members-online" => Cow::Borrowed("members-online"),
        _ => Cow::Owned(key.to_owned()),
    }
}

fn parse_tags_string(tags_str: &str) -> Vec<Tag> {
    tags_str
        .split(';')
        .filter(|s| !s.is_empty())
        .map(|tag| {
            let mut iter = tag.splitn(2, '=');
            let key = iter.next().unwrap_or("");
            let value = iter.next().map(unescape_tag_value);
            Tag(intern_tag_key(key), value)
        })
        .collect()
}

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Message, Self::Err> {
        let line = s.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Err(ProtocolError::InvalidMessage {
                string: s.to_owned(),
                cause: MessageParseError::EmptyMessage,
            });
        }

        let parsed = ParsedMessage::parse(line).map_err(|(position, kind)| {
            ProtocolError::InvalidMessage {
                string: s.to_owned(),
                cause: MessageParseError::ParseContext {
                    position,
                    context: format!("{kind:?}"),
                },
            }
        })?;

        let tags = parsed.tags.map(parse_tags_string);

        Message::with_tags(tags, parsed.prefix, parsed.command, parsed.params.to_vec()).map_err(
            |cause| ProtocolError::InvalidMessage {
                string: s.to_owned(),
                cause,
            },
        )
    }
}
