//! The shared face of a session.
//!
//! A connection task owns its `SessionHandler`; everything else (the
//! registry, other sessions routing to it) only ever sees this handle.
//! Slots are `parking_lot` locks and are never held across an `.await`.

use parking_lot::RwLock;
use solace_proto::{Message, Nickname};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::HandlerError;

#[derive(Debug)]
pub struct SessionHandle {
    id: Uuid,
    nick: RwLock<Option<Nickname>>,
    writer: RwLock<Option<mpsc::Sender<Message>>>,
}

impl SessionHandle {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: Uuid::new_v4(),
            nick: RwLock::new(None),
            writer: RwLock::new(None),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The nick this session last registered under.
    pub fn nick(&self) -> Option<Nickname> {
        self.nick.read().clone()
    }

    pub(crate) fn set_nick(&self, nick: Nickname) {
        *self.nick.write() = Some(nick);
    }

    /// A writer that is installed and whose connection is still draining it.
    pub fn has_writer(&self) -> bool {
        self.writer
            .read()
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }

    pub fn set_writer(&self, writer: mpsc::Sender<Message>) {
        *self.writer.write() = Some(writer);
    }

    /// Drop the writer. Returns whether one was installed.
    pub fn clear_writer(&self) -> bool {
        self.writer.write().take().is_some()
    }

    /// Queue a message on this session's connection.
    pub async fn send(&self, msg: Message) -> Result<(), HandlerError> {
        let tx = self
            .writer
            .read()
            .clone()
            .ok_or(HandlerError::MissingWriter)?;
        tx.send(msg).await?;
        Ok(())
    }

    /// Queue a message without waiting for room.
    ///
    /// Used when one session writes into another: a peer that stops reading
    /// must never stall the sender.
    pub fn try_send(&self, msg: Message) -> Result<(), HandlerError> {
        let tx = self
            .writer
            .read()
            .clone()
            .ok_or(HandlerError::MissingWriter)?;
        tx.try_send(msg)?;
        Ok(())
    }
}
