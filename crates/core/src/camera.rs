//! Camera module - horizontal viewport offset
//!
//! The camera keeps the player a fixed fraction of the viewport from the
//! left edge and never scrolls past either end of the level. There is no
//! vertical scrolling.

use super_capy_types::CAMERA_LEAD;

/// Viewport width used when the host does not report one.
pub const DEFAULT_VIEWPORT_WIDTH: f32 = 800.0;

/// Offset for a player at `player_x`, clamped to `[0, level_width - viewport_width]`.
///
/// Levels narrower than the viewport pin the offset to 0.
pub fn camera_offset(player_x: f32, viewport_width: f32, level_width: f32) -> f32 {
    let max = (level_width - viewport_width).max(0.0);
    (player_x - viewport_width * CAMERA_LEAD).clamp(0.0, max)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    offset: f32,
    viewport_width: f32,
}

impl Camera {
    pub fn new(viewport_width: f32) -> Self {
        Self {
            offset: 0.0,
            viewport_width: viewport_width.max(1.0),
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    pub fn set_viewport_width(&mut self, viewport_width: f32) {
        self.viewport_width = viewport_width.max(1.0);
    }

    /// Recompute the offset for the current player position.
    pub fn follow(&mut self, player_x: f32, level_width: f32) -> f32 {
        self.offset = camera_offset(player_x, self.viewport_width, level_width);
        self.offset
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT_WIDTH)
    }
}
