//! Connection - handles an individual client socket.
//!
//! ```text
//!  socket ──▶ FramedRead<LineCodec> ──parse──▶ SessionHandler
//!                                                   │
//!  socket ◀── FramedWrite<IrcCodec> ◀── writer task ◀┘ (bounded mpsc)
//! ```
//!
//! Lines are framed and parsed separately so that a malformed line is
//! skipped instead of ending the stream.

use futures_util::{SinkExt, StreamExt};
use solace_proto::{IrcCodec, Message, ProtocolError, line::LineCodec};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info, warn};

use super::ConnectionDelegate;
use crate::handlers::{Registry, SessionHandler};
use crate::state::Relay;

/// A client connection handler.
pub struct Connection {
    stream: TcpStream,
    addr: SocketAddr,
    relay: Arc<Relay>,
    registry: Arc<Registry>,
    max_line_length: usize,
    outbound_queue: usize,
}

impl Connection {
    pub fn new(
        stream: TcpStream,
        addr: SocketAddr,
        relay: Arc<Relay>,
        registry: Arc<Registry>,
        max_line_length: usize,
        outbound_queue: usize,
    ) -> Self {
        Self {
            stream,
            addr,
            relay,
            registry,
            max_line_length,
            outbound_queue,
        }
    }

    /// Run the connection until the peer leaves, reading fails, or the relay
    /// shuts down.
    pub async fn run(self) {
        let Self {
            stream,
            addr,
            relay,
            registry,
            max_line_length,
            outbound_queue,
        } = self;

        let (read_half, write_half) = stream.into_split();
        let mut reader = FramedRead::new(read_half, LineCodec::new(max_line_length));
        let writer = FramedWrite::new(write_half, IrcCodec::new(max_line_length));

        let (tx, rx) = mpsc::channel(outbound_queue.max(1));
        let writer_task = tokio::spawn(write_loop(writer, rx));

        let mut shutdown_rx = relay.shutdown_tx.subscribe();
        let mut session = SessionHandler::new(relay, registry);
        info!(%addr, session_id = %session.id(), "Connection established");

        session.deliver_writer(tx).await;

        loop {
            tokio::select! {
                frame = reader.next() => match frame {
                    Some(Ok(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        match line.parse::<Message>() {
                            Ok(msg) => session.deliver_inbound(msg).await,
                            Err(error) => warn!(%addr, %error, "Skipping unparseable line"),
                        }
                    }
                    Some(Err(error)) => {
                        session.report_child_channel_error(&error).await;
                        break;
                    }
                    None => {
                        session.channel_inactive().await;
                        break;
                    }
                },
                _ = shutdown_rx.recv() => {
                    info!(%addr, "Shutdown signal received - disconnecting client");
                    session.did_shutdown_child_channel().await;
                    break;
                }
            }
        }

        // Teardown released the session's sender; the writer drains what is
        // queued and closes the socket.
        drop(session);
        if let Err(error) = writer_task.await {
            warn!(%addr, %error, "Writer task failed");
        }
        info!(%addr, "Connection closed");
    }
}

async fn write_loop(
    mut writer: FramedWrite<OwnedWriteHalf, IrcCodec>,
    mut rx: mpsc::Receiver<Message>,
) {
    while let Some(msg) = rx.recv().await {
        match writer.send(msg).await {
            Ok(()) => {}
            // A message that cannot be encoded is dropped on its own.
            Err(error @ (ProtocolError::InvalidMessage { .. } | ProtocolError::MessageTooLong { .. })) => {
                warn!(%error, "Dropping unencodable message");
            }
            Err(error) => {
                debug!(%error, "Write failed, closing writer");
                break;
            }
        }
    }
    if let Err(error) = writer.close().await {
        debug!(%error, "Writer did not close cleanly");
    }
}
