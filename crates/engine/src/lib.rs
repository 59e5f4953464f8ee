//! Engine helpers built on the core session
//!
//! - [`hint`]: which swaps on a board would score
//! - [`autoplay`]: drive a [`match3_core::Session`] one turn at a time
//!
//! Used by the `match3-sim` runner and the benches; a UI can use
//! [`first_valid_swap`] to show a hint.

pub mod autoplay;
pub mod hint;

pub use autoplay::{play_turn, AutoplayError};
pub use hint::{first_valid_swap, valid_swaps};
