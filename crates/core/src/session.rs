//! Session module - the game-state controller
//!
//! [`GameSession`] exclusively owns every live collection of the current
//! level and is the only writer during a tick. One call to
//! [`GameSession::tick`] runs, in order:
//!
//! 1. Timers and input edge detection (jump, descend double-press)
//! 2. Player integration and landing
//! 3. Enemy updates
//! 4. Enemy contact, shell hits, pipes, bonuses, goal
//! 5. Camera and hint countdown
//!
//! Reloading or changing level discards the collections and instantiates
//! fresh ones from the level descriptor.

use crate::camera::{Camera, DEFAULT_VIEWPORT_WIDTH};
use crate::clock::SpeedClock;
use crate::collision;
use crate::event::{push, SimEvent, TickEvents};
use crate::level::{wrap_index, LevelCatalog};
use crate::physics;
use crate::player::Player;
use crate::snapshot::{EnemySnapshot, GameSnapshot, PlayerSnapshot};
use crate::world::{PlatformKind, World};
use super_capy_types::{
    GameStatus, InputState, LevelDescriptor, TravelDirection, DIRECTION_HINT_TICKS,
    DOUBLE_PRESS_TICKS, DROP_THROUGH_TICKS, LEVEL_COUNT, PLAYER_WIDTH,
};

/// Parse a host level request into a 0-based index.
///
/// Numbers above the range clamp to the last level. Zero, negative and
/// non-numeric requests fall back to the first level.
pub fn parse_level_request(request: Option<&str>) -> usize {
    let Some(raw) = request else {
        return 0;
    };
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 1 => (n.min(LEVEL_COUNT as i64) - 1) as usize,
        Ok(n) => {
            log::warn!("level request {n} is out of range, starting at level 1");
            0
        }
        Err(_) => {
            log::warn!("level request {raw:?} is not a number, starting at level 1");
            0
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameSession {
    catalog: LevelCatalog,
    level_index: usize,
    descriptor: LevelDescriptor,
    world: World,
    player: Player,
    clock: SpeedClock,
    camera: Camera,
    status: GameStatus,
    score: u32,
    best_score: u32,
    prev_input: InputState,
    /// Ticks left to complete a descend double-press.
    descend_window: f32,
    hint_ticks: f32,
    tick_count: u64,
}

impl GameSession {
    /// Start a session on `level_index` (0-based, clamped to the last level).
    pub fn new(seed: u32, level_index: usize) -> Self {
        let catalog = LevelCatalog::new(seed);
        let level_index = level_index.min(LEVEL_COUNT - 1);
        let descriptor = catalog.level(level_index);
        let world = World::from_descriptor(&descriptor);
        let player = spawn_player(&world);

        let mut session = Self {
            catalog,
            level_index,
            descriptor,
            world,
            player,
            clock: SpeedClock::default(),
            camera: Camera::new(DEFAULT_VIEWPORT_WIDTH),
            status: GameStatus::Playing,
            score: 0,
            best_score: 0,
            prev_input: InputState::default(),
            descend_window: 0.0,
            hint_ticks: DIRECTION_HINT_TICKS,
            tick_count: 0,
        };
        session.camera.follow(session.player.x, session.world.width);
        log::debug!("session started at level {} (seed {seed})", session.level_number());
        session
    }

    /// Start a session from a raw host level request (see [`parse_level_request`]).
    pub fn from_request(seed: u32, request: Option<&str>) -> Self {
        Self::new(seed, parse_level_request(request))
    }

    pub fn with_viewport_width(mut self, viewport_width: f32) -> Self {
        self.set_viewport_width(viewport_width);
        self
    }

    pub fn with_speed_base(mut self, base: f32) -> Self {
        self.clock = SpeedClock::new(base);
        self
    }

    pub fn set_viewport_width(&mut self, viewport_width: f32) {
        self.camera.set_viewport_width(viewport_width);
        self.camera.follow(self.player.x, self.world.width);
    }

    /// Seed the best score from persistent storage.
    pub fn set_best_score(&mut self, best: u32) {
        self.best_score = self.best_score.max(best);
    }

    /// Forward a refresh-rate notification. Returns `true` if the factor changed.
    pub fn set_speed_measurement(&mut self, measurement: Option<f32>) -> bool {
        self.clock.apply_measurement(measurement)
    }

    pub fn seed(&self) -> u32 {
        self.catalog.seed()
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    /// 1-based level number shown to players.
    pub fn level_number(&self) -> usize {
        self.level_index + 1
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn speed_factor(&self) -> f32 {
        self.clock.speed_factor()
    }

    pub fn camera_x(&self) -> f32 {
        self.camera.offset()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn descriptor(&self) -> &LevelDescriptor {
        &self.descriptor
    }

    /// Direction to travel while the level-start hint is showing.
    pub fn direction_hint(&self) -> Option<TravelDirection> {
        if self.hint_ticks > 0.0 {
            Some(self.travel_direction())
        } else {
            None
        }
    }

    fn travel_direction(&self) -> TravelDirection {
        match self.descriptor.direction {
            TravelDirection::Left => TravelDirection::Left,
            TravelDirection::Right if self.world.goal.x < self.world.start_x => TravelDirection::Left,
            TravelDirection::Right => TravelDirection::Right,
        }
    }

    /// Regenerate the current level from scratch. Score restarts at zero.
    pub fn reload_level(&mut self) {
        self.score = 0;
        self.load_level(self.level_index);
    }

    /// Move on to the next level (wrapping after the last), keeping the score.
    pub fn advance_to_next_level(&mut self) {
        self.load_level(wrap_index(self.level_index + 1));
    }

    fn load_level(&mut self, index: usize) {
        self.level_index = index;
        self.descriptor = self.catalog.level(index);
        self.world = World::from_descriptor(&self.descriptor);
        self.player = spawn_player(&self.world);
        self.status = GameStatus::Playing;
        self.prev_input = InputState::default();
        self.descend_window = 0.0;
        self.hint_ticks = DIRECTION_HINT_TICKS;
        self.camera.follow(self.player.x, self.world.width);
        log::debug!(
            "loaded level {} ({}, heading {})",
            self.level_number(),
            if self.world.underwater { "underwater" } else { "land" },
            self.travel_direction().as_str()
        );
    }

    /// Run one simulation step. Does nothing once the level is won or lost.
    pub fn tick(&mut self, input: InputState) -> TickEvents {
        let mut events = TickEvents::new();
        if self.status != GameStatus::Playing {
            return events;
        }

        let sf = self.clock.speed_factor();
        let jump_pressed = input.jump && !self.prev_input.jump;
        let descend_pressed = input.descend && !self.prev_input.descend;
        self.prev_input = input;

        self.player.tick_timers(sf);
        self.descend_window = (self.descend_window - sf).max(0.0);

        if !self.world.underwater {
            if jump_pressed && self.player.teleport_spin <= 0.0 && self.player.try_jump() {
                push(
                    &mut events,
                    SimEvent::Jumped {
                        count: self.player.jump_count,
                    },
                );
            }
            if descend_pressed && self.player.standing_on == Some(PlatformKind::Elevated) {
                self.register_descend_press(&mut events);
            }
        }

        if physics::step_player(&mut self.player, &input, &self.world, sf) {
            push(&mut events, SimEvent::Landed);
        }

        let target = self.player.bounds();
        let width = self.world.width;
        for enemy in &mut self.world.enemies {
            enemy.update(sf, width, &target);
        }

        if collision::resolve_enemy_contacts(&mut self.player, &mut self.world, &mut events) {
            self.finish(GameStatus::Lost, &mut events);
            return events;
        }
        collision::resolve_shell_hits(&mut self.world, &mut events);
        collision::block_pipes(&mut self.player, &self.world);
        collision::try_enter_pipe(&mut self.player, &self.world, &input, &mut events);

        self.score += collision::collect_bonuses(&self.player, &mut self.world, &mut events);

        if collision::reached_goal(&self.player, &self.world) {
            self.finish(GameStatus::Won, &mut events);
        }

        self.camera.follow(self.player.x, self.world.width);
        self.hint_ticks = (self.hint_ticks - sf).max(0.0);
        self.tick_count += 1;

        log::trace!(
            "tick {} x={:.1} y={:.1} vx={:.2} vy={:.2} {}",
            self.tick_count,
            self.player.x,
            self.player.y,
            self.player.vel_x,
            self.player.vel_y,
            self.player.movement_state().as_str()
        );
        events
    }

    fn register_descend_press(&mut self, events: &mut TickEvents) {
        if self.descend_window > 0.0 {
            self.descend_window = 0.0;
            self.player.drop_through = DROP_THROUGH_TICKS;
            self.player.on_ground = false;
            self.player.standing_on = None;
            push(events, SimEvent::DropThrough);
        } else {
            self.descend_window = DOUBLE_PRESS_TICKS;
        }
    }

    fn finish(&mut self, status: GameStatus, events: &mut TickEvents) {
        self.status = status;
        self.best_score = self.best_score.max(self.score);
        match status {
            GameStatus::Won => {
                log::info!("level {} cleared with score {}", self.level_number(), self.score);
                push(events, SimEvent::LevelWon);
            }
            GameStatus::Lost => {
                log::info!("player died on level {} with score {}", self.level_number(), self.score);
                push(events, SimEvent::PlayerDied);
            }
            GameStatus::Playing => {}
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.clear();
        out.camera_x = self.camera.offset();
        out.viewport_width = self.camera.viewport_width();
        out.level_width = self.world.width;
        out.ground_height = self.world.ground_height;
        out.underwater = self.world.underwater;
        out.max_height = self.world.max_height;
        out.player = PlayerSnapshot {
            bounds: self.player.bounds(),
            vel_x: self.player.vel_x,
            vel_y: self.player.vel_y,
            state: self.player.movement_state(),
            jump_count: self.player.jump_count,
            invulnerable: self.player.is_invulnerable(),
        };
        out.platforms.extend_from_slice(&self.world.platforms);
        out.pipes.extend(self.world.pipes.iter().map(|p| p.shaft()));
        out.enemies.extend(
            self.world
                .enemies
                .iter()
                .filter(|e| e.alive)
                .map(|e| EnemySnapshot {
                    bounds: e.bounds(),
                    kind: e.kind,
                    direction: e.direction,
                }),
        );
        out.bonuses.extend_from_slice(&self.world.bonuses);
        out.goal = self.world.goal;
        out.score = self.score;
        out.best_score = self.best_score;
        out.level_number = self.level_number();
        out.status = self.status;
        out.direction_hint = self.direction_hint();
        out.speed_factor = self.clock.speed_factor();
        out.tick = self.tick_count;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut out = GameSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }
}

fn spawn_player(world: &World) -> Player {
    let x = world.start_x.clamp(0.0, (world.width - PLAYER_WIDTH).max(0.0));
    Player::spawn(x, world.spawn_height(x, PLAYER_WIDTH))
}
