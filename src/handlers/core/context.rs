//! Command handler context.
//!
//! A [`Context`] is built fresh for every inbound message. It borrows the
//! connection's private state mutably and the shared [`Relay`] immutably, so
//! a handler can update its own session without any locking.

use async_trait::async_trait;
use solace_proto::{Message, Nickname};
use std::sync::Arc;
use tracing::debug;

use crate::error::{HandlerError, HandlerResult};
use crate::protocol::decode_origin;
use crate::state::{MessageInfo, Relay, SessionHandle, SessionInfo};

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// Shared relay state.
    pub relay: &'a Arc<Relay>,
    /// This connection's registry entry.
    pub handle: &'a Arc<SessionHandle>,
    pub session: &'a mut SessionInfo,
    pub message_info: &'a mut MessageInfo,
    /// Set once the session is registered by a NICK or a configuration publish.
    pub authenticated: &'a mut bool,
}

impl<'a> Context<'a> {
    pub fn new(
        relay: &'a Arc<Relay>,
        handle: &'a Arc<SessionHandle>,
        session: &'a mut SessionInfo,
        message_info: &'a mut MessageInfo,
        authenticated: &'a mut bool,
    ) -> Self {
        Self {
            relay,
            handle,
            session,
            message_info,
            authenticated,
        }
    }

    /// Queue a message on this connection's outbound writer.
    pub async fn send(&self, msg: Message) -> HandlerResult {
        self.handle.send(msg).await
    }

    pub fn server_name(&self) -> &str {
        self.relay.origin()
    }

    /// Origin to stamp on messages echoed back to this client: the encoded
    /// sender recorded by NICK, else the inbound prefix.
    pub fn echo_origin(&self, msg: &Message) -> Option<String> {
        self.message_info
            .origin
            .clone()
            .or_else(|| msg.prefix.clone())
    }

    /// Resolve the sender of `msg`.
    ///
    /// A decodable prefix wins. Otherwise the identity recorded at
    /// registration, then the connection's own nick.
    pub fn sender(&self, msg: &Message) -> Result<Nickname, HandlerError> {
        if let Some(origin) = msg.prefix.as_deref() {
            match decode_origin(origin) {
                Ok(nick) => return Ok(nick),
                Err(error) => debug!(%error, "Prefix is not an encoded sender"),
            }
        }
        self.session
            .user_id()
            .map(|id| id.nick.clone())
            .or_else(|| self.session.nick().cloned())
            .or_else(|| self.handle.nick())
            .ok_or(HandlerError::MissingSender)
    }
}

/// Handler for a single command.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult;
}
