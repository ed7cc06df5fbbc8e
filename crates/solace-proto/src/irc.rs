//! [`Message`] codec for tokio.

use std::fmt::Write;

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{MessageParseError, ProtocolError, Result};
use crate::line::LineCodec;
use crate::message::Message;

/// Encodes and decodes whole [`Message`]s on top of [`LineCodec`].
///
/// A line that frames correctly but fails to parse is an error here. Readers
/// that must survive bad input should frame with [`LineCodec`] and parse
/// each line themselves.
#[derive(Debug, Clone, Default)]
pub struct IrcCodec {
    inner: LineCodec,
}

impl IrcCodec {
    /// Create a codec with a custom max line length.
    pub fn new(max_len: usize) -> Self {
        Self {
            inner: LineCodec::new(max_len),
        }
    }
}

impl Decoder for IrcCodec {
    type Item = Message;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Message>> {
        loop {
            match self.inner.decode(src)? {
                // Blank keepalive lines carry nothing.
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => return line.parse::<Message>().map(Some),
                None => return Ok(None),
            }
        }
    }
}

impl Encoder<Message> for IrcCodec {
    type Error = ProtocolError;

    fn encode(&mut self, msg: Message, dst: &mut BytesMut) -> Result<()> {
        let mut line = String::new();
        if write!(line, "{msg}").is_err() {
            return Err(ProtocolError::InvalidMessage {
                string: format!("{msg:?}"),
                cause: MessageParseError::InvalidArgument("line break in parameter".into()),
            });
        }
        if line.len() > self.inner.max_len() {
            return Err(ProtocolError::MessageTooLong {
                actual: line.len(),
                limit: self.inner.max_len(),
            });
        }
        self.inner.encode(line, dst)
    }
}
