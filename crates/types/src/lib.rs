//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are plain data with no game logic, making them usable in any
//! context (simulation core, terminal rendering, level inspection tools).
//!
//! # Coordinates
//!
//! All positions are in *level units*. `x` grows to the right from the left
//! edge of the level, `y` grows **upward** from the ground reference
//! (`y = 0` is the floor), unlike screen coordinates.
//!
//! # Tick Calibration
//!
//! Per-tick constants are calibrated for 60 updates per second at a speed
//! factor of `1.0`. The simulation multiplies every displacement and timer
//! decrement by the current speed factor.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `RUN_ACCEL` | 0.5 | Horizontal acceleration per tick |
//! | `RUN_MAX_SPEED` | 4.5 | Horizontal speed clamp |
//! | `RUN_FRICTION` | 0.85 | Velocity decay per tick without input |
//! | `GRAVITY` | -0.35 | Vertical acceleration per tick |
//! | `JUMP_IMPULSE` | 11 | Vertical velocity set by a jump |
//! | `SPAWN_INVULNERABILITY_TICKS` | 90 | Damage-free window after (re)spawn |
//! | `DROP_THROUGH_TICKS` | 18 | Elevated platforms ignored after a double-press |
//! | `TELEPORT_SPIN_TICKS` | 30 | Teleport animation window |
//!
//! # Examples
//!
//! ```
//! use super_capy_types::{EnemySpawnKind, InputSignal, TravelDirection};
//!
//! assert_eq!(EnemySpawnKind::from_str("armored"), Some(EnemySpawnKind::Armored));
//! assert_eq!(InputSignal::from_str("descend"), Some(InputSignal::Descend));
//! assert_eq!(TravelDirection::Left.sign(), -1.0);
//! ```

use serde::{Deserialize, Serialize};

/// Ticks per second the per-tick constants are calibrated for.
pub const BASELINE_TICK_RATE: f32 = 60.0;

/// Host tick interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Player bounding box width
pub const PLAYER_WIDTH: f32 = 70.0;

/// Player bounding box height
pub const PLAYER_HEIGHT: f32 = 70.0;

pub const RUN_ACCEL: f32 = 0.5;
pub const RUN_MAX_SPEED: f32 = 4.5;
pub const RUN_FRICTION: f32 = 0.85;

pub const SWIM_ACCEL: f32 = 0.35;
pub const SWIM_MAX_SPEED: f32 = 3.0;
pub const SWIM_FRICTION: f32 = 0.85;

/// Velocities below this magnitude snap to zero while decaying.
pub const VELOCITY_EPSILON: f32 = 0.05;

/// Vertical acceleration applied every tick outside water.
pub const GRAVITY: f32 = -0.35;

/// Vertical velocity set by a jump.
pub const JUMP_IMPULSE: f32 = 11.0;

/// Upward velocity after stomping or kicking an enemy.
pub const BOUNCE_IMPULSE: f32 = 8.0;

/// Airborne jumps allowed before a landing resets the counter.
pub const MAX_JUMPS: u8 = 2;

pub const SPAWN_INVULNERABILITY_TICKS: f32 = 90.0;
pub const TELEPORT_INVULNERABILITY_TICKS: f32 = 60.0;
pub const TELEPORT_SPIN_TICKS: f32 = 30.0;
pub const DROP_THROUGH_TICKS: f32 = 18.0;

/// Window in which two descend presses count as a double-press (≈300ms).
pub const DOUBLE_PRESS_TICKS: f32 = 18.0;

/// Horizontal distance from the start position where enemy contact is ignored.
pub const SPAWN_SAFE_DISTANCE: f32 = 150.0;

/// Inward margin applied to every enemy hitbox.
pub const ENEMY_HITBOX_MARGIN: f32 = 6.0;

/// Ticks during which a freshly kicked shell ignores the player.
pub const SHELL_KICK_GRACE_TICKS: f32 = 12.0;

pub const PIPE_WIDTH: f32 = 60.0;

/// Vertical tolerance for standing on a pipe mouth.
pub const PIPE_MOUTH_TOLERANCE: f32 = 8.0;

/// Thickness of the landing ledge a pipe contributes on top of its shaft.
pub const PIPE_LEDGE_THICKNESS: f32 = 5.0;

/// Ground segments are never thinner than this.
pub const GROUND_MIN_THICKNESS: f32 = 30.0;

/// Default thickness of elevated platforms.
pub const PLATFORM_THICKNESS: f32 = 20.0;

pub const BONUS_RADIUS: f32 = 14.0;

pub const GOAL_WIDTH: f32 = 40.0;
pub const GOAL_HEIGHT: f32 = 120.0;
pub const GOAL_HEIGHT_UNDERWATER: f32 = 80.0;

/// Fraction of the viewport kept to the left of the player.
pub const CAMERA_LEAD: f32 = 0.3;

/// Widest ground gap the generator leaves without a bridging platform.
pub const MAX_UNBRIDGED_GAP: f32 = 150.0;

/// Hand-authored levels before procedural generation takes over.
pub const FIXED_LEVEL_COUNT: usize = 3;

/// Total number of playable levels.
pub const LEVEL_COUNT: usize = 45;

/// Ticks the direction hint stays visible after a level load.
pub const DIRECTION_HINT_TICKS: f32 = 120.0;

/// A point in level units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Logical input signals reported by the host as held/released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSignal {
    Left,
    Right,
    /// Jump outside water, swim up underwater
    Jump,
    /// Enter pipes, drop through platforms, swim down underwater
    Descend,
}

impl InputSignal {
    /// Parse signal from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" => Some(InputSignal::Left),
            "right" => Some(InputSignal::Right),
            "jump" | "up" => Some(InputSignal::Jump),
            "descend" | "down" => Some(InputSignal::Descend),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputSignal::Left => "left",
            InputSignal::Right => "right",
            InputSignal::Jump => "jump",
            InputSignal::Descend => "descend",
        }
    }
}

/// Held state of every logical input for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub descend: bool,
}

impl InputState {
    pub fn is_held(&self, signal: InputSignal) -> bool {
        match signal {
            InputSignal::Left => self.left,
            InputSignal::Right => self.right,
            InputSignal::Jump => self.jump,
            InputSignal::Descend => self.descend,
        }
    }

    pub fn set(&mut self, signal: InputSignal, held: bool) {
        match signal {
            InputSignal::Left => self.left = held,
            InputSignal::Right => self.right = held,
            InputSignal::Jump => self.jump = held,
            InputSignal::Descend => self.descend = held,
        }
    }

    /// Builder used heavily by tests and scripted input.
    pub fn with(mut self, signal: InputSignal) -> Self {
        self.set(signal, true);
        self
    }
}

/// Which way the goal lies relative to the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelDirection {
    Left,
    #[default]
    Right,
}

impl TravelDirection {
    pub fn sign(&self) -> f32 {
        match self {
            TravelDirection::Left => -1.0,
            TravelDirection::Right => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TravelDirection::Left => "left",
            TravelDirection::Right => "right",
        }
    }
}

/// Enemy kinds as they appear in a level descriptor.
///
/// The live simulation expands these into richer per-kind state; a descriptor
/// only records what spawns where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemySpawnKind {
    /// Ground patroller, eliminated when stomped
    Walker,
    /// Ground patroller that retreats into a stationary shell when stomped
    Armored,
    /// Flying enemy that dives at the player from its cruise altitude
    Diver,
    /// Stationary shell waiting to be kicked
    Shell,
    /// Underwater patroller crossing the whole level
    Swimmer,
    /// Immobile hazard
    Mine,
}

impl EnemySpawnKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "walker" => Some(EnemySpawnKind::Walker),
            "armored" => Some(EnemySpawnKind::Armored),
            "diver" => Some(EnemySpawnKind::Diver),
            "shell" => Some(EnemySpawnKind::Shell),
            "swimmer" => Some(EnemySpawnKind::Swimmer),
            "mine" => Some(EnemySpawnKind::Mine),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemySpawnKind::Walker => "walker",
            EnemySpawnKind::Armored => "armored",
            EnemySpawnKind::Diver => "diver",
            EnemySpawnKind::Shell => "shell",
            EnemySpawnKind::Swimmer => "swimmer",
            EnemySpawnKind::Mine => "mine",
        }
    }

    /// (width, height) of the enemy's bounding box.
    pub fn size(&self) -> (f32, f32) {
        match self {
            EnemySpawnKind::Walker => (40.0, 35.0),
            EnemySpawnKind::Armored => (44.0, 40.0),
            EnemySpawnKind::Diver => (42.0, 30.0),
            EnemySpawnKind::Shell => (40.0, 30.0),
            EnemySpawnKind::Swimmer => (40.0, 28.0),
            EnemySpawnKind::Mine => (36.0, 36.0),
        }
    }

    /// Horizontal patrol speed per tick.
    pub fn speed(&self) -> f32 {
        match self {
            EnemySpawnKind::Walker => 1.5,
            EnemySpawnKind::Armored => 1.3,
            EnemySpawnKind::Diver => 1.8,
            EnemySpawnKind::Shell | EnemySpawnKind::Mine => 0.0,
            EnemySpawnKind::Swimmer => 2.0,
        }
    }
}

/// Slide speed of a kicked shell.
pub const MOVING_SHELL_SPEED: f32 = 3.0;

/// Vertical speed of a diving flyer.
pub const DIVER_DIVE_SPEED: f32 = 4.0;

/// Horizontal distance at which a flyer starts its dive.
pub const DIVER_TRIGGER_RANGE: f32 = 60.0;

/// Collectible tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BonusKind {
    LowValue,
    HighValue,
}

impl BonusKind {
    /// Score credited on pickup.
    pub fn value(&self) -> u32 {
        match self {
            BonusKind::LowValue => 1,
            BonusKind::HighValue => 10,
        }
    }
}

/// Terminal state of the current level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Playing => "playing",
            GameStatus::Won => "won",
            GameStatus::Lost => "lost",
        }
    }
}

/// Static rectangle description (platforms and goal).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectSpec {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Ground segments sit on the floor reference.
    pub fn is_ground(&self) -> bool {
        self.y <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub x: f32,
    pub y: f32,
    pub kind: EnemySpawnKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonusSpawn {
    pub x: f32,
    pub y: f32,
    pub kind: BonusKind,
}

/// A vertical pipe standing on `y`, optionally linked to another pipe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipeSpec {
    pub x: f32,
    pub y: f32,
    pub height: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Point>,
}

/// Immutable level template consumed to instantiate live entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDescriptor {
    pub width: f32,
    /// Height of the decorative ground band drawn below `y = 0`.
    pub ground_height: f32,
    pub underwater: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f32>,
    pub start_x: f32,
    pub direction: TravelDirection,
    pub platforms: Vec<RectSpec>,
    pub enemies: Vec<EnemySpawn>,
    pub bonuses: Vec<BonusSpawn>,
    #[serde(default)]
    pub pipes: Vec<PipeSpec>,
    pub goal: RectSpec,
}

impl LevelDescriptor {
    /// Ground segments sorted by x.
    pub fn ground_segments(&self) -> Vec<RectSpec> {
        let mut ground: Vec<RectSpec> = self
            .platforms
            .iter()
            .copied()
            .filter(RectSpec::is_ground)
            .collect();
        ground.sort_by(|a, b| a.x.total_cmp(&b.x));
        ground
    }

    pub fn elevated_platforms(&self) -> impl Iterator<Item = &RectSpec> {
        self.platforms.iter().filter(|p| !p.is_ground())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bonus_tiers_are_ordered() {
        assert!(BonusKind::HighValue.value() > BonusKind::LowValue.value());
        assert_eq!(BonusKind::LowValue.value(), 1);
        assert_eq!(BonusKind::HighValue.value(), 10);
    }

    #[test]
    fn enemy_kind_round_trips_through_str() {
        for kind in [
            EnemySpawnKind::Walker,
            EnemySpawnKind::Armored,
            EnemySpawnKind::Diver,
            EnemySpawnKind::Shell,
            EnemySpawnKind::Swimmer,
            EnemySpawnKind::Mine,
        ] {
            assert_eq!(EnemySpawnKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(EnemySpawnKind::from_str("goomba"), None);
    }

    #[test]
    fn immobile_kinds_have_zero_speed() {
        assert_eq!(EnemySpawnKind::Shell.speed(), 0.0);
        assert_eq!(EnemySpawnKind::Mine.speed(), 0.0);
    }

    #[test]
    fn input_state_builder_sets_signals() {
        let input = InputState::default()
            .with(InputSignal::Left)
            .with(InputSignal::Jump);
        assert!(input.is_held(InputSignal::Left));
        assert!(input.is_held(InputSignal::Jump));
        assert!(!input.right);
        assert!(!input.descend);
    }

    #[test]
    fn descriptor_uses_camel_case_fields() {
        let level = LevelDescriptor {
            width: 1000.0,
            ground_height: 80.0,
            underwater: false,
            max_height: None,
            start_x: 50.0,
            direction: TravelDirection::Right,
            platforms: vec![RectSpec::new(0.0, 0.0, 1000.0, 30.0)],
            enemies: vec![],
            bonuses: vec![BonusSpawn {
                x: 10.0,
                y: 20.0,
                kind: BonusKind::HighValue,
            }],
            pipes: vec![],
            goal: RectSpec::new(800.0, 0.0, GOAL_WIDTH, GOAL_HEIGHT),
        };
        let json = serde_json::to_string(&level).unwrap();
        assert!(json.contains("\"startX\":50"));
        assert!(json.contains("\"groundHeight\":80"));
        assert!(json.contains("\"high-value\""));
        assert!(!json.contains("maxHeight"));
    }

    #[test]
    fn ground_segments_sorted_by_x() {
        let level = LevelDescriptor {
            width: 1000.0,
            ground_height: 80.0,
            underwater: false,
            max_height: None,
            start_x: 50.0,
            direction: TravelDirection::Right,
            platforms: vec![
                RectSpec::new(600.0, 0.0, 100.0, 30.0),
                RectSpec::new(300.0, 120.0, 100.0, 20.0),
                RectSpec::new(0.0, 0.0, 400.0, 30.0),
            ],
            enemies: vec![],
            bonuses: vec![],
            pipes: vec![],
            goal: RectSpec::new(800.0, 0.0, GOAL_WIDTH, GOAL_HEIGHT),
        };
        let ground = level.ground_segments();
        assert_eq!(ground.len(), 2);
        assert_eq!(ground[0].x, 0.0);
        assert_eq!(ground[1].x, 600.0);
        assert_eq!(level.elevated_platforms().count(), 1);
    }
}
