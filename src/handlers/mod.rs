//! Command handlers.
//!
//! Each connection owns one [`SessionHandler`]. Inbound messages are
//! dispatched through the [`Registry`] to a [`Handler`] per command, with a
//! [`Context`] borrowing the session's state for the duration of the call.

mod channel;
mod connection;
mod core;
mod messaging;
mod session;

pub use self::core::{Context, Handler, Registry};
pub use channel::{JoinHandler, ModeHandler, PartHandler};
pub use connection::{NickHandler, PassHandler, PingHandler, PongHandler, QuitHandler, UserHandler};
pub use messaging::PrivmsgHandler;
pub use session::SessionHandler;

pub use crate::error::{HandlerError, HandlerResult};
