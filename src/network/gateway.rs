//! Gateway - TCP listener that accepts incoming connections.
//!
//! The Gateway binds a socket and spawns a [`Connection`] task for each
//! incoming client. It stops accepting when the relay shuts down.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{Instrument, error, info, info_span, instrument};

use crate::config::ListenConfig;
use crate::handlers::Registry;
use crate::network::Connection;
use crate::state::Relay;

/// The Gateway accepts incoming TCP connections and spawns handlers.
pub struct Gateway {
    listener: TcpListener,
    relay: Arc<Relay>,
    registry: Arc<Registry>,
    max_line_length: usize,
    outbound_queue: usize,
}

impl Gateway {
    /// Bind the gateway to the configured listen address.
    pub async fn bind(listen: &ListenConfig, relay: Arc<Relay>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(listen.address).await?;
        let bound = listener.local_addr()?;
        info!(address = %bound, "Listener bound");

        Ok(Self {
            listener,
            relay,
            registry: Arc::new(Registry::new()),
            max_line_length: listen.max_line_length,
            outbound_queue: listen.outbound_queue,
        })
    }

    /// The bound address, useful when binding port 0.
    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Run the gateway, accepting connections until shutdown.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        let mut shutdown_rx = self.relay.shutdown_tx.subscribe();

        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        info!(%addr, "Connection accepted");
                        if let Err(e) = stream.set_nodelay(true) {
                            error!(%addr, error = %e, "Failed to set TCP_NODELAY");
                        }

                        let connection = Connection::new(
                            stream,
                            addr,
                            Arc::clone(&self.relay),
                            Arc::clone(&self.registry),
                            self.max_line_length,
                            self.outbound_queue,
                        );
                        tokio::spawn(
                            connection
                                .run()
                                .instrument(info_span!("connection", %addr)),
                        );
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to accept connection");
                    }
                },
                _ = shutdown_rx.recv() => {
                    info!("Shutdown signal received - gateway stopping");
                    break;
                }
            }
        }
        Ok(())
    }
}
