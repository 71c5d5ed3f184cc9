//! Core module - pure simulation with no external dependencies
//!
//! This crate contains the platformer rules: level catalog and generator,
//! entity model, physics, collision and the [`GameSession`] controller.
//! It performs no I/O; hosts feed it held inputs and refresh-rate
//! measurements and read back snapshots and per-tick events.

pub mod camera;
pub mod clock;
pub mod collision;
pub mod enemy;
pub mod event;
pub mod generator;
pub mod geometry;
pub mod level;
pub mod physics;
pub mod player;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod world;

// Re-export commonly used types
pub use camera::{camera_offset, Camera, DEFAULT_VIEWPORT_WIDTH};
pub use clock::{FrameRateProbe, SpeedClock};
pub use enemy::{DiverPhase, Enemy, EnemyKind};
pub use event::{SimEvent, TickEvents, MAX_TICK_EVENTS};
pub use geometry::Aabb;
pub use level::{check_traversable, fixed_level, JumpMetrics, LevelCatalog, TraversalIssue};
pub use player::{MovementState, Player};
pub use rng::SimpleRng;
pub use session::{parse_level_request, GameSession};
pub use snapshot::{EnemySnapshot, GameSnapshot, PlayerSnapshot};
pub use world::{Bonus, Pipe, Platform, PlatformKind, World};
