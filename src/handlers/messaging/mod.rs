//! PRIVMSG relaying.

mod delivery;
mod privmsg;
mod routing;

pub use privmsg::PrivmsgHandler;
