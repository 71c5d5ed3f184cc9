//! Key mapping from terminal events to logical signals and host commands.

use crate::types::InputSignal;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Session-level actions handled by the host, not the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    /// Regenerate the current level.
    Reload,
    /// Advance to the next level (only honoured after a victory).
    NextLevel,
    /// Reload after a loss, advance after a victory.
    Confirm,
}

/// Map a key to the held signal it drives.
pub fn signal_for_key(code: KeyCode) -> Option<InputSignal> {
    match code {
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(InputSignal::Left)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(InputSignal::Right)
        }
        KeyCode::Up
        | KeyCode::Char(' ')
        | KeyCode::Char('k')
        | KeyCode::Char('K')
        | KeyCode::Char('w')
        | KeyCode::Char('W')
        | KeyCode::Char('z')
        | KeyCode::Char('Z') => Some(InputSignal::Jump),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(InputSignal::Descend)
        }
        _ => None,
    }
}

/// Map a key press to a host command.
pub fn command_for_key(key: KeyEvent) -> Option<HostCommand> {
    match key.code {
        KeyCode::Char('r') | KeyCode::Char('R') => Some(HostCommand::Reload),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(HostCommand::NextLevel),
        KeyCode::Enter => Some(HostCommand::Confirm),
        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
