//! PING and PONG handlers.
//!
//! The relay drives keepalive: it PINGs a client when the writer is
//! delivered, and answers every PONG with a fresh PING after a fixed delay.
//! That PING is dropped if the client's queue stays full past the tolerance.

use async_trait::async_trait;
use solace_proto::{Command, Message};
use std::sync::Arc;
use tracing::debug;

use crate::handlers::{Context, Handler, HandlerResult};

/// Handler for PING command.
pub struct PingHandler;

#[async_trait]
impl Handler for PingHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let Command::PING(server, _) = &msg.command else {
            return Ok(());
        };
        let reply = Message::pong(server.clone()).with_prefix(ctx.server_name());
        ctx.send(reply).await
    }
}

/// Handler for PONG command.
pub struct PongHandler;

#[async_trait]
impl Handler for PongHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let Command::PONG(server, server2) = &msg.command else {
            return Ok(());
        };

        let ping = Message::from(Command::PING(server.clone(), server2.clone()))
            .with_prefix(ctx.server_name());
        let handle = Arc::clone(ctx.handle);
        let delay = ctx.relay.keepalive.ping_after_pong();
        let tolerance = ctx.relay.keepalive.tolerance();

        debug!(session_id = %handle.id(), ?delay, "Scheduling keepalive PING");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match tokio::time::timeout(tolerance, handle.send(ping)).await {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    debug!(session_id = %handle.id(), %error, "Keepalive PING not delivered")
                }
                Err(_) => {
                    debug!(session_id = %handle.id(), ?tolerance, "Keepalive PING missed its window")
                }
            }
        });
        Ok(())
    }
}
