//! Typed commands.

mod parse;
mod serialize;
mod types;

pub use self::types::{Command, UserDetails};
