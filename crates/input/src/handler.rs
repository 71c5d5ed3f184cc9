//! Held-signal tracker for terminal environments.
//!
//! The simulation wants every signal as held/released. Terminals that
//! report key release (keyboard enhancement) give us that directly; others
//! only send presses and auto-repeats, so a signal with no fresh press for
//! the release timeout is treated as released.

use std::time::{Duration, Instant};

use arrayvec::ArrayVec;
use crossterm::event::KeyCode;

use crate::map::signal_for_key;
use crate::types::{InputSignal, InputState};

const SIGNALS: [InputSignal; 4] = [
    InputSignal::Left,
    InputSignal::Right,
    InputSignal::Jump,
    InputSignal::Descend,
];

// Long enough to bridge the gap between a press and the terminal's first
// auto-repeat on most setups.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 200;

fn slot(signal: InputSignal) -> usize {
    match signal {
        InputSignal::Left => 0,
        InputSignal::Right => 1,
        InputSignal::Jump => 2,
        InputSignal::Descend => 3,
    }
}

/// Tracks which logical signals are currently held.
#[derive(Debug, Clone)]
pub struct InputHandler {
    /// Last press (or repeat) per signal; `None` when released.
    last_seen: [Option<Instant>; 4],
    key_release_timeout_ms: u32,
    /// Once a real release event arrives the timeout is no longer needed.
    release_events_seen: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            last_seen: [None; 4],
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
            release_events_seen: false,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    /// Register a press or auto-repeat. Returns the signal if the key maps to one.
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<InputSignal> {
        self.press_at(code, Instant::now())
    }

    pub fn handle_key_release(&mut self, code: KeyCode) -> Option<InputSignal> {
        let signal = signal_for_key(code)?;
        self.release_events_seen = true;
        self.last_seen[slot(signal)] = None;
        Some(signal)
    }

    fn press_at(&mut self, code: KeyCode, now: Instant) -> Option<InputSignal> {
        let signal = signal_for_key(code)?;
        self.last_seen[slot(signal)] = Some(now);
        Some(signal)
    }

    /// Auto-release stale signals. Returns the signals released this call.
    pub fn update(&mut self) -> ArrayVec<InputSignal, 4> {
        self.update_at(Instant::now())
    }

    fn update_at(&mut self, now: Instant) -> ArrayVec<InputSignal, 4> {
        let mut released = ArrayVec::new();
        if self.release_events_seen {
            return released;
        }
        let timeout = Duration::from_millis(self.key_release_timeout_ms as u64);
        for signal in SIGNALS {
            let entry = &mut self.last_seen[slot(signal)];
            if let Some(at) = *entry {
                if now.saturating_duration_since(at) > timeout {
                    *entry = None;
                    released.push(signal);
                }
            }
        }
        released
    }

    /// Held state for the next simulation tick.
    pub fn state(&self) -> InputState {
        let mut state = InputState::default();
        for signal in SIGNALS {
            state.set(signal, self.last_seen[slot(signal)].is_some());
        }
        state
    }

    pub fn reset(&mut self) {
        self.last_seen = [None; 4];
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_marks_signal_held() {
        let mut ih = InputHandler::new();
        assert_eq!(ih.handle_key_press(KeyCode::Right), Some(InputSignal::Right));
        assert_eq!(ih.handle_key_press(KeyCode::Char('x')), None);
        let state = ih.state();
        assert!(state.right);
        assert!(!state.left && !state.jump && !state.descend);
    }

    #[test]
    fn test_auto_release_triggers_after_timeout_without_key_release_events() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(50);
        let t0 = Instant::now();
        ih.press_at(KeyCode::Left, t0);

        assert!(ih.update_at(t0 + Duration::from_millis(40)).is_empty());
        assert!(ih.state().left);

        let released = ih.update_at(t0 + Duration::from_millis(51));
        assert_eq!(released.as_slice(), &[InputSignal::Left]);
        assert!(!ih.state().left);
    }

    #[test]
    fn test_repeat_presses_keep_signal_held() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(50);
        let t0 = Instant::now();
        ih.press_at(KeyCode::Up, t0);
        ih.press_at(KeyCode::Up, t0 + Duration::from_millis(40));
        assert!(ih.update_at(t0 + Duration::from_millis(80)).is_empty());
        assert!(ih.state().jump);
    }

    #[test]
    fn test_release_events_disable_timeout() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(50);
        let t0 = Instant::now();
        ih.press_at(KeyCode::Down, t0);
        ih.handle_key_release(KeyCode::Down);
        assert!(!ih.state().descend);

        ih.press_at(KeyCode::Right, t0);
        assert!(ih.update_at(t0 + Duration::from_secs(5)).is_empty());
        assert!(ih.state().right);
    }

    #[test]
    fn test_default_key_release_timeout_is_non_zero() {
        let ih = InputHandler::new();
        assert!(ih.key_release_timeout_ms() > 0);
    }

    #[test]
    fn test_reset_clears_held_state() {
        let mut ih = InputHandler::new();
        ih.handle_key_press(KeyCode::Left);
        ih.handle_key_press(KeyCode::Char(' '));
        ih.reset();
        assert_eq!(ih.state(), InputState::default());
    }
}
