//! Terminal rendering for the platformer.
//!
//! A small, game-oriented rendering layer: snapshots are projected into a
//! plain framebuffer (`GameView`, pure and testable) which `TerminalRenderer`
//! flushes through crossterm, rewriting only the cells that changed.
//!
//! Goals:
//! - Keep `core` deterministic and free of I/O
//! - Fixed level-unit to cell scale so the camera and the view agree
//! - Allocation-free per-frame path once buffers are warmed up

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use super_capy_core as core;
pub use super_capy_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
