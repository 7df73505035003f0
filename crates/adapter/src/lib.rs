//! Adapter - external control protocol
//!
//! This crate lets external collaborators (an animation front end, a bot, a
//! test harness) drive the engine over a line-delimited JSON protocol:
//! commands in, per-command mutation-step logs out. The TCP server is async;
//! the engine loop stays synchronous and talks to it over channels.

pub mod protocol;
pub mod runtime;
pub mod server;

// Re-export the working surface
pub use protocol::*;
pub use runtime::{Adapter, ClientCommand, InboundEvent, OutboundMessage};
pub use server::{run_server, ServerConfig};
