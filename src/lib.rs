//! Super Capy (workspace facade crate).
//!
//! Re-exports the member crates under short names so binaries, tests and
//! benches can write `super_capy::{core, input, store, term, types}`. Host
//! configuration lives here because only the binaries need it.

pub mod config;

pub use super_capy_core as core;
pub use super_capy_input as input;
pub use super_capy_store as store;
pub use super_capy_term as term;
pub use super_capy_types as types;

pub use config::HostConfig;
