//! Keyscribe: reconstructs typed text from raw virtual-key events, reports
//! phrase boundaries and hotkeys, and derives abbreviations for expansion.
//!
//! This crate re-exports the stateless building blocks of `keyscribe_core`
//! and the stateful engine of `keyscribe_session`.

mod trace_init;

pub use keyscribe_core::{abbreviation, combo, composer, keymap, settings, text};
pub use keyscribe_session::*;
pub use trace_init::init_tracing;
