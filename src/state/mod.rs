//! State management module.
//!
//! Contains the [`Relay`] (shared server state), the session registry and the
//! channel cache.

mod cache;
mod channels;
mod handle;
mod manager;
mod relay;
mod session;

pub use cache::SessionCache;
pub use channels::{ChannelCache, ChannelInfo};
pub use handle::SessionHandle;
pub use manager::SessionManager;
pub use relay::{Relay, ServerInfo};
pub use session::{MessageInfo, SessionInfo, SessionState, UserIdentifier};
