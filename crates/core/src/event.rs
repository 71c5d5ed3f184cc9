//! Per-tick simulation events, consumed by hosts for feedback (sound, HUD).

use arrayvec::ArrayVec;
use super_capy_types::BonusKind;

/// Upper bound on events recorded in a single tick; extra events are dropped.
pub const MAX_TICK_EVENTS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// `count` is the jump number since the last landing (1 or 2).
    Jumped { count: u8 },
    Landed,
    Stomped { enemy: usize },
    ShellKicked { enemy: usize, direction: i8 },
    ShellHit { shell: usize, victim: usize },
    BonusCollected { kind: BonusKind, value: u32 },
    Teleported { x: f32, y: f32 },
    DropThrough,
    LevelWon,
    PlayerDied,
}

impl SimEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimEvent::Jumped { .. } => "jumped",
            SimEvent::Landed => "landed",
            SimEvent::Stomped { .. } => "stomped",
            SimEvent::ShellKicked { .. } => "shell_kicked",
            SimEvent::ShellHit { .. } => "shell_hit",
            SimEvent::BonusCollected { .. } => "bonus_collected",
            SimEvent::Teleported { .. } => "teleported",
            SimEvent::DropThrough => "drop_through",
            SimEvent::LevelWon => "level_won",
            SimEvent::PlayerDied => "player_died",
        }
    }
}

pub type TickEvents = ArrayVec<SimEvent, MAX_TICK_EVENTS>;

pub(crate) fn push(events: &mut TickEvents, event: SimEvent) {
    if events.try_push(event).is_err() {
        log::trace!("tick event buffer full, dropping {}", event.as_str());
    }
}
