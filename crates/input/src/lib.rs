//! Terminal input module (simulation-facing).
//!
//! This crate is independent of any UI framework beyond `crossterm` events.
//! It maps key events onto the four held logical signals the simulation
//! consumes, plus a handful of host commands (reload, next level, quit), and
//! tracks held state for terminals without key-release events.

pub mod handler;
pub mod map;

pub use super_capy_types as types;

pub use handler::InputHandler;
pub use map::{command_for_key, should_quit, signal_for_key, HostCommand};
