//! Network module.
//!
//! Contains the [`Gateway`] (TCP listener), the per-socket [`Connection`],
//! and the [`ConnectionDelegate`] callbacks a connection drives.

mod connection;
mod gateway;

pub use connection::Connection;
pub use gateway::Gateway;

use async_trait::async_trait;
use solace_proto::{Message, ProtocolError};
use tokio::sync::mpsc;

/// Lifecycle callbacks a [`Connection`] delivers to its session.
///
/// Every method is called from the connection's own task, one at a time.
#[async_trait]
pub trait ConnectionDelegate: Send {
    /// The outbound writer is ready. Called once, before any inbound message.
    async fn deliver_writer(&mut self, writer: mpsc::Sender<Message>);

    async fn deliver_inbound(&mut self, msg: Message);

    /// The peer closed the connection.
    async fn channel_inactive(&mut self);

    /// Reading failed; the connection is about to close.
    async fn report_child_channel_error(&mut self, error: &ProtocolError);

    /// The relay is shutting down.
    async fn did_shutdown_child_channel(&mut self);
}
