//! NICK command handler.
//!
//! NICK both names the connection and registers it in the session registry.
//! A client may send NICK again at any time; each one restarts registration.

use async_trait::async_trait;
use solace_proto::{Command, Message};
use tracing::{info, warn};

use crate::handlers::{Context, Handler, HandlerResult};
use crate::protocol::{decode_origin, encode_origin};
use crate::state::UserIdentifier;

/// Handler for NICK command.
pub struct NickHandler;

#[async_trait]
impl Handler for NickHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let Command::NICK(nick) = &msg.command else {
            return Ok(());
        };

        // The prefix, when present, names the sending identity.
        let sender = match msg.prefix.as_deref() {
            Some(origin) => decode_origin(origin).unwrap_or_else(|error| {
                warn!(%error, %nick, "Undecodable NICK origin, using the nick itself");
                nick.clone()
            }),
            None => nick.clone(),
        };

        ctx.message_info.origin = Some(encode_origin(&sender)?);
        ctx.session
            .apply_nick(nick.clone(), Some(UserIdentifier::new(sender)));
        ctx.handle.set_nick(nick.clone());
        ctx.relay
            .sessions
            .register_session(ctx.handle, nick.clone())
            .await;
        *ctx.authenticated = true;

        info!(
            session_id = %ctx.handle.id(),
            nick = %nick,
            "Session registered"
        );
        Ok(())
    }
}
