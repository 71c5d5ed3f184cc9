use crate::enemy::EnemyKind;
use crate::geometry::Aabb;
use crate::player::MovementState;
use crate::world::{Bonus, Platform};
use super_capy_types::{GameStatus, TravelDirection};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSnapshot {
    pub bounds: Aabb,
    pub vel_x: f32,
    pub vel_y: f32,
    pub state: MovementState,
    pub jump_count: u8,
    pub invulnerable: bool,
}

impl Default for PlayerSnapshot {
    fn default() -> Self {
        Self {
            bounds: Aabb::default(),
            vel_x: 0.0,
            vel_y: 0.0,
            state: MovementState::Grounded,
            jump_count: 0,
            invulnerable: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySnapshot {
    pub bounds: Aabb,
    pub kind: EnemyKind,
    pub direction: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GameSnapshot {
    pub camera_x: f32,
    pub viewport_width: f32,
    pub level_width: f32,
    pub ground_height: f32,
    pub underwater: bool,
    pub max_height: Option<f32>,
    pub player: PlayerSnapshot,
    pub platforms: Vec<Platform>,
    pub pipes: Vec<Aabb>,
    /// Live enemies only.
    pub enemies: Vec<EnemySnapshot>,
    pub bonuses: Vec<Bonus>,
    pub goal: Aabb,
    pub score: u32,
    pub best_score: u32,
    /// 1-based level number.
    pub level_number: usize,
    pub status: GameStatus,
    /// Set while the level-start hint is visible.
    pub direction_hint: Option<TravelDirection>,
    pub speed_factor: f32,
    pub tick: u64,
}

impl GameSnapshot {
    /// Reset scalars and empty the collections, keeping their allocations.
    pub fn clear(&mut self) {
        self.camera_x = 0.0;
        self.viewport_width = 0.0;
        self.level_width = 0.0;
        self.ground_height = 0.0;
        self.underwater = false;
        self.max_height = None;
        self.player = PlayerSnapshot::default();
        self.platforms.clear();
        self.pipes.clear();
        self.enemies.clear();
        self.bonuses.clear();
        self.goal = Aabb::default();
        self.score = 0;
        self.best_score = 0;
        self.level_number = 0;
        self.status = GameStatus::Playing;
        self.direction_hint = None;
        self.speed_factor = 1.0;
        self.tick = 0;
    }

    pub fn playable(&self) -> bool {
        self.status == GameStatus::Playing
    }
}
