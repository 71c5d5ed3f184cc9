//! Enemy module - live enemy state and per-kind update rules
//!
//! A level descriptor only says *what* spawns *where*
//! ([`EnemySpawnKind`]); the live simulation carries a tagged [`EnemyKind`]
//! with whatever payload that kind needs. Update rules are independent per
//! kind and only read the player's box (flying divers aim at it).

use crate::geometry::Aabb;
use super_capy_types::{
    EnemySpawnKind, DIVER_DIVE_SPEED, DIVER_TRIGGER_RANGE, ENEMY_HITBOX_MARGIN,
    MOVING_SHELL_SPEED, SHELL_KICK_GRACE_TICKS,
};

/// Flight phase of a flying diver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiverPhase {
    Cruise,
    /// Descending until `floor` is reached.
    Diving { floor: f32 },
    /// Returning to cruise altitude at half dive speed.
    Climbing,
}

/// Live enemy kind with per-kind payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyKind {
    GroundPatroller { armored: bool },
    FlyingDiver { cruise_y: f32, phase: DiverPhase },
    StationaryShell,
    MovingShell { kick_grace: f32 },
    AquaticSwimmer,
    Mine,
}

impl EnemyKind {
    pub fn name(&self) -> &'static str {
        match self {
            EnemyKind::GroundPatroller { armored: false } => "walker",
            EnemyKind::GroundPatroller { armored: true } => "armored",
            EnemyKind::FlyingDiver { .. } => "diver",
            EnemyKind::StationaryShell => "shell",
            EnemyKind::MovingShell { .. } => "moving-shell",
            EnemyKind::AquaticSwimmer => "swimmer",
            EnemyKind::Mine => "mine",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: EnemyKind,
    pub speed: f32,
    /// -1 or +1
    pub direction: f32,
    /// Leftmost and rightmost `x` the enemy may occupy.
    pub patrol: (f32, f32),
    pub alive: bool,
}

impl Enemy {
    /// Instantiate a descriptor kind at a resolved resting position.
    pub fn spawn(kind: EnemySpawnKind, x: f32, y: f32, patrol: (f32, f32)) -> Self {
        let (width, height) = kind.size();
        let live = match kind {
            EnemySpawnKind::Walker => EnemyKind::GroundPatroller { armored: false },
            EnemySpawnKind::Armored => EnemyKind::GroundPatroller { armored: true },
            EnemySpawnKind::Diver => EnemyKind::FlyingDiver {
                cruise_y: y,
                phase: DiverPhase::Cruise,
            },
            EnemySpawnKind::Shell => EnemyKind::StationaryShell,
            EnemySpawnKind::Swimmer => EnemyKind::AquaticSwimmer,
            EnemySpawnKind::Mine => EnemyKind::Mine,
        };
        let (left, right) = patrol;
        Self {
            x: x.clamp(left, right.max(left)),
            y,
            width,
            height,
            kind: live,
            speed: kind.speed(),
            direction: -1.0,
            patrol: (left, right.max(left)),
            alive: true,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    /// Box used for player contact, shrunk by the hitbox margin.
    pub fn hitbox(&self) -> Aabb {
        self.bounds().shrink(ENEMY_HITBOX_MARGIN)
    }

    pub fn is_shell(&self) -> bool {
        matches!(
            self.kind,
            EnemyKind::StationaryShell | EnemyKind::MovingShell { .. }
        )
    }

    pub fn is_moving_shell(&self) -> bool {
        matches!(self.kind, EnemyKind::MovingShell { .. })
    }

    /// Turn a stationary shell into a sliding one heading `direction`.
    pub fn kick(&mut self, direction: f32) {
        self.kind = EnemyKind::MovingShell {
            kick_grace: SHELL_KICK_GRACE_TICKS,
        };
        self.speed = MOVING_SHELL_SPEED;
        self.direction = if direction < 0.0 { -1.0 } else { 1.0 };
    }

    /// Settle into a stationary shell, keeping the center.
    pub fn retreat_into_shell(&mut self) {
        let (width, height) = EnemySpawnKind::Shell.size();
        let center = self.bounds().center_x();
        self.kind = EnemyKind::StationaryShell;
        self.width = width;
        self.height = height;
        self.x = center - width / 2.0;
        self.speed = 0.0;
    }

    /// Advance one tick.
    pub fn update(&mut self, speed_factor: f32, level_width: f32, player: &Aabb) {
        if !self.alive {
            return;
        }
        match self.kind {
            EnemyKind::GroundPatroller { .. } | EnemyKind::AquaticSwimmer => {
                self.patrol_step(speed_factor);
            }
            EnemyKind::FlyingDiver { cruise_y, phase } => {
                let phase = self.diver_step(speed_factor, cruise_y, phase, player);
                self.kind = EnemyKind::FlyingDiver { cruise_y, phase };
            }
            EnemyKind::MovingShell { kick_grace } => {
                let right = (level_width - self.width).max(0.0);
                self.bounce_between(0.0, right, speed_factor);
                self.kind = EnemyKind::MovingShell {
                    kick_grace: (kick_grace - speed_factor).max(0.0),
                };
            }
            EnemyKind::StationaryShell | EnemyKind::Mine => {}
        }
    }

    fn patrol_step(&mut self, speed_factor: f32) {
        let (left, right) = self.patrol;
        self.bounce_between(left, right, speed_factor);
    }

    fn bounce_between(&mut self, left: f32, right: f32, speed_factor: f32) {
        self.x += self.speed * self.direction * speed_factor;
        if self.x <= left {
            self.x = left;
            self.direction = 1.0;
        } else if self.x >= right {
            self.x = right;
            self.direction = -1.0;
        }
    }

    fn diver_step(
        &mut self,
        speed_factor: f32,
        cruise_y: f32,
        phase: DiverPhase,
        player: &Aabb,
    ) -> DiverPhase {
        match phase {
            DiverPhase::Cruise => {
                self.patrol_step(speed_factor);
                let in_range =
                    (player.center_x() - self.bounds().center_x()).abs() < DIVER_TRIGGER_RANGE;
                if in_range && player.top() <= self.y {
                    DiverPhase::Diving {
                        floor: player.bottom().max(0.0),
                    }
                } else {
                    DiverPhase::Cruise
                }
            }
            DiverPhase::Diving { floor } => {
                self.y -= DIVER_DIVE_SPEED * speed_factor;
                if self.y <= floor {
                    self.y = floor;
                    DiverPhase::Climbing
                } else {
                    phase
                }
            }
            DiverPhase::Climbing => {
                self.y += DIVER_DIVE_SPEED / 2.0 * speed_factor;
                if self.y >= cruise_y {
                    self.y = cruise_y;
                    DiverPhase::Cruise
                } else {
                    DiverPhase::Climbing
                }
            }
        }
    }
}
