//! USER command handler.

use async_trait::async_trait;
use solace_proto::{Command, Message};
use tracing::{debug, warn};

use crate::handlers::{Context, Handler, HandlerResult};

/// Handler for USER command.
pub struct UserHandler;

#[async_trait]
impl Handler for UserHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let Command::USER(details) = &msg.command else {
            return Ok(());
        };

        if let Err(error) = ctx.session.apply_user(details.clone()) {
            warn!(
                session_id = %ctx.handle.id(),
                state = ?ctx.session.state(),
                "USER received outside of nick registration"
            );
            return Err(error);
        }

        debug!(
            user = %details.username,
            realname = %details.realname,
            session_id = %ctx.handle.id(),
            registered = ctx.session.is_registered(),
            has_password = ctx.session.password().is_some(),
            "User set"
        );
        Ok(())
    }
}
