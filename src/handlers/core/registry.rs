//! Command handler registry and dispatch.

use futures_util::FutureExt;
use solace_proto::Message;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use tracing::{Instrument, Level, debug, span};

use super::context::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{
    channel::{JoinHandler, ModeHandler, PartHandler},
    connection::{NickHandler, PassHandler, PingHandler, PongHandler, QuitHandler, UserHandler},
    messaging::PrivmsgHandler,
};

/// Registry of command handlers.
pub struct Registry {
    handlers: HashMap<&'static str, Box<dyn Handler>>,
}

impl Registry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();

        // Connection/registration handlers
        handlers.insert("NICK", Box::new(NickHandler));
        handlers.insert("USER", Box::new(UserHandler));
        handlers.insert("PASS", Box::new(PassHandler));
        handlers.insert("PING", Box::new(PingHandler));
        handlers.insert("PONG", Box::new(PongHandler));
        handlers.insert("QUIT", Box::new(QuitHandler));

        // Channel handlers
        handlers.insert("JOIN", Box::new(JoinHandler));
        handlers.insert("PART", Box::new(PartHandler));
        handlers.insert("MODE", Box::new(ModeHandler));

        handlers.insert("PRIVMSG", Box::new(PrivmsgHandler));

        Self { handlers }
    }

    /// Dispatch a message to the handler registered for its command.
    ///
    /// Unknown commands are ignored. A panic inside a handler is caught and
    /// surfaced as [`HandlerError::Internal`] so the connection survives it.
    pub async fn dispatch(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let cmd_name = msg.command.name().to_ascii_uppercase();

        let Some(handler) = self.handlers.get(cmd_name.as_str()) else {
            debug!(command = %cmd_name, "Ignoring unknown command");
            return Ok(());
        };

        let irc_span = span!(
            Level::DEBUG,
            "irc.command",
            command = %cmd_name,
            session_id = %ctx.handle.id(),
        );

        let outcome = AssertUnwindSafe(handler.handle(ctx, msg))
            .catch_unwind()
            .instrument(irc_span)
            .await;

        match outcome {
            Ok(result) => result,
            Err(payload) => {
                let detail = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "handler panicked".to_string());
                Err(HandlerError::Internal(detail))
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
