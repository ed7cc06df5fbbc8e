//! PASS command handler. The password is recorded, never checked.

use async_trait::async_trait;
use solace_proto::{Command, Message};
use tracing::debug;

use crate::handlers::{Context, Handler, HandlerResult};

pub struct PassHandler;

#[async_trait]
impl Handler for PassHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        if let Command::PASS(password) = &msg.command {
            ctx.session.set_password(password.clone());
            debug!(session_id = %ctx.handle.id(), "Password stored");
        }
        Ok(())
    }
}
