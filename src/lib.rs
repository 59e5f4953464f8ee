//! Match-3 board engine (workspace facade crate).
//!
//! Re-exports the workspace crates as `match3::{core, engine, types}` and
//! hosts the headless simulation runner used by the `match3-sim` binary.

pub use match3_core as core;
pub use match3_engine as engine;
pub use match3_types as types;

pub mod sim;
