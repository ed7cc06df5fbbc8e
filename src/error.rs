//! Unified error handling for solace-relayd.
//!
//! Every error here is recoverable at the dispatch boundary: the offending
//! command is logged with its [`HandlerError::error_code`] and dropped, and
//! the connection stays open.

use solace_proto::Message;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::directory::DirectoryError;
use crate::state::SessionState;

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur during command handling.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("invalid state: expected {expected:?}, found {actual:?}")]
    InvalidState {
        expected: SessionState,
        actual: SessionState,
    },

    #[error("message has no resolvable sender")]
    MissingSender,

    #[error("publish request carries no user configuration")]
    MissingUserConfiguration,

    #[error("message packet has no recipient")]
    MissingRecipient,

    #[error("session has no outbound writer")]
    MissingWriter,

    #[error("packet error: {0}")]
    Packet(#[from] PacketError),

    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("send error: {0}")]
    Send(#[from] mpsc::error::SendError<Message>),

    #[error("outbound queue unavailable: {0}")]
    QueueFull(#[from] mpsc::error::TrySendError<Message>),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidState { .. } => "invalid_state",
            Self::MissingSender => "missing_sender",
            Self::MissingUserConfiguration => "missing_user_configuration",
            Self::MissingRecipient => "missing_recipient",
            Self::MissingWriter => "missing_writer",
            Self::Packet(_) => "decode_error",
            Self::Directory(_) => "directory_error",
            Self::Send(_) => "send_error",
            Self::QueueFull(_) => "queue_full",
            Self::Internal(_) => "internal_error",
        }
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// Session Errors (registry operations)
// ============================================================================

/// Registry lookups and mutations on a nickname that is not cached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    SessionNotFound(String),
}

// ============================================================================
// Packet Errors (base64 + MessagePack payloads)
// ============================================================================

#[derive(Debug, Error)]
pub enum PacketError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid packet: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("failed to encode packet: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
}
