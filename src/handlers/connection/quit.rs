//! QUIT handler for terminating client sessions.

use async_trait::async_trait;
use solace_proto::{Command, Message};
use tracing::info;

use crate::handlers::{Context, Handler, HandlerResult};

/// Handler for QUIT command.
///
/// The socket is left to the client to close; the session simply stops being
/// routable.
pub struct QuitHandler;

#[async_trait]
impl Handler for QuitHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let quit_msg = match &msg.command {
            Command::QUIT(message) => message.as_deref(),
            _ => None,
        };

        info!(
            session_id = %ctx.handle.id(),
            nick = ?ctx.session.nick(),
            message = ?quit_msg,
            "Client quit"
        );

        ctx.relay.sessions.unregister_session(ctx.handle).await;
        *ctx.authenticated = false;
        Ok(())
    }
}
