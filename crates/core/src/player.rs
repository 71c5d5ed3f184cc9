//! Player module - the controllable body and its movement state
//!
//! The movement state machine is not stored separately: it is derived from
//! the timers and contact flags every time it is queried, so it can never
//! disagree with the data physics actually uses.

use crate::geometry::Aabb;
use crate::world::PlatformKind;
use super_capy_types::{
    JUMP_IMPULSE, MAX_JUMPS, PLAYER_HEIGHT, PLAYER_WIDTH, SPAWN_INVULNERABILITY_TICKS,
};

/// Movement state, derived from player fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementState {
    Grounded,
    /// Airborne after `jumps` jumps (0 when walking off an edge).
    Airborne { jumps: u8 },
    DropThrough,
    Teleporting,
}

impl MovementState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementState::Grounded => "grounded",
            MovementState::Airborne { .. } => "airborne",
            MovementState::DropThrough => "drop-through",
            MovementState::Teleporting => "teleporting",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    /// Feet height at the end of the previous tick.
    pub prev_y: f32,
    pub width: f32,
    pub height: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    pub on_ground: bool,
    /// Surface the player currently stands on.
    pub standing_on: Option<PlatformKind>,
    pub jump_count: u8,
    pub spawn_invulnerability: f32,
    pub teleport_invulnerability: f32,
    pub drop_through: f32,
    pub teleport_spin: f32,
}

impl Player {
    /// Fresh player standing at `(x, y)` with spawn protection active.
    pub fn spawn(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            prev_y: y,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            vel_x: 0.0,
            vel_y: 0.0,
            on_ground: true,
            standing_on: None,
            jump_count: 0,
            spawn_invulnerability: SPAWN_INVULNERABILITY_TICKS,
            teleport_invulnerability: 0.0,
            drop_through: 0.0,
            teleport_spin: 0.0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn is_invulnerable(&self) -> bool {
        self.spawn_invulnerability > 0.0 || self.teleport_invulnerability > 0.0
    }

    pub fn movement_state(&self) -> MovementState {
        if self.teleport_spin > 0.0 {
            MovementState::Teleporting
        } else if self.drop_through > 0.0 {
            MovementState::DropThrough
        } else if self.on_ground {
            MovementState::Grounded
        } else {
            MovementState::Airborne {
                jumps: self.jump_count,
            }
        }
    }

    /// Try to start a jump. Returns `false` when the airborne budget is spent.
    pub fn try_jump(&mut self) -> bool {
        if self.jump_count >= MAX_JUMPS {
            return false;
        }
        self.vel_y = JUMP_IMPULSE;
        self.jump_count += 1;
        self.on_ground = false;
        self.standing_on = None;
        true
    }

    /// Confirmed contact with a surface whose top is `top`.
    pub fn land(&mut self, top: f32, kind: Option<PlatformKind>) {
        self.y = top;
        self.vel_y = 0.0;
        self.on_ground = true;
        self.standing_on = kind;
        self.jump_count = 0;
    }

    /// Count every timer down by `speed_factor`, flooring at zero.
    pub fn tick_timers(&mut self, speed_factor: f32) {
        for timer in [
            &mut self.spawn_invulnerability,
            &mut self.teleport_invulnerability,
            &mut self.drop_through,
            &mut self.teleport_spin,
        ] {
            *timer = (*timer - speed_factor).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn third_jump_is_refused() {
        let mut p = Player::spawn(0.0, 30.0);
        assert!(p.try_jump());
        assert!(p.try_jump());
        assert!(!p.try_jump());
        assert_eq!(p.jump_count, 2);
        assert_eq!(p.movement_state(), MovementState::Airborne { jumps: 2 });
    }

    #[test]
    fn landing_resets_jumps() {
        let mut p = Player::spawn(0.0, 30.0);
        p.try_jump();
        p.land(120.0, Some(PlatformKind::Elevated));
        assert_eq!(p.jump_count, 0);
        assert_eq!(p.movement_state(), MovementState::Grounded);
    }

    #[test]
    fn timers_scale_with_speed_factor() {
        let mut p = Player::spawn(0.0, 30.0);
        for _ in 0..44 {
            p.tick_timers(2.0);
        }
        assert!(p.is_invulnerable());
        p.tick_timers(2.0);
        assert!(!p.is_invulnerable());
    }

    #[test]
    fn teleport_outranks_other_states() {
        let mut p = Player::spawn(0.0, 30.0);
        p.drop_through = 5.0;
        assert_eq!(p.movement_state(), MovementState::DropThrough);
        p.teleport_spin = 5.0;
        assert_eq!(p.movement_state(), MovementState::Teleporting);
    }
}
