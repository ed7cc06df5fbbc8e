//! Handler infrastructure: the [`Handler`] trait, the per-command
//! [`Context`], and the [`Registry`] that dispatches to handlers.

pub mod context;
pub mod registry;

pub use context::{Context, Handler};
pub use registry::Registry;
