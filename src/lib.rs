//! gridspin (workspace facade crate).
//!
//! This package keeps the `gridspin::{types,core,engine,adapter}` public API
//! in one place while the implementation lives in dedicated crates under
//! `crates/`.

pub use gridspin_adapter as adapter;
pub use gridspin_core as core;
pub use gridspin_engine as engine;
pub use gridspin_types as types;
