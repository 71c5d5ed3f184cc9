//! GameView: projects a `core::GameSnapshot` onto a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Level units map onto cells at a fixed scale (10 units per column, 20 per
//! row). Row 0 is the HUD; level height 0 sits on the bottom row and grows
//! upward. Horizontal scrolling comes from the snapshot's camera offset; the
//! view only scrolls vertically when the player climbs above the top rows.

use crate::core::{Aabb, EnemyKind, EnemySnapshot, GameSnapshot, MovementState, PlatformKind};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{BonusKind, GameStatus, TravelDirection};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

const SKY: Rgb = Rgb::new(18, 22, 38);
const WATER: Rgb = Rgb::new(10, 38, 78);
const HUD_BG: Rgb = Rgb::new(0, 0, 0);

/// Rows kept free above the player before the view scrolls up.
const TOP_MARGIN_ROWS: i32 = 2;

/// Invulnerable players blink with this period (in ticks).
const BLINK_TICKS: u64 = 6;

pub struct GameView {
    units_per_col: f32,
    units_per_row: f32,
}

impl Default for GameView {
    fn default() -> Self {
        Self {
            units_per_col: 10.0,
            units_per_row: 20.0,
        }
    }
}

/// Cell-space rectangle, signed so off-screen parts clip naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellRect {
    col: i32,
    row: i32,
    w: i32,
    h: i32,
}

/// Level-to-cell mapping for one frame.
#[derive(Debug, Clone, Copy)]
struct Projection {
    camera_x: f32,
    units_per_col: f32,
    units_per_row: f32,
    /// Row whose lower edge is level height 0.
    base_row: i32,
}

impl Projection {
    fn col(&self, x: f32) -> i32 {
        ((x - self.camera_x) / self.units_per_col).floor() as i32
    }

    fn row(&self, y: f32) -> i32 {
        self.base_row - (y / self.units_per_row).floor() as i32
    }

    fn rect(&self, b: &Aabb) -> CellRect {
        let col = self.col(b.left());
        let end = ((b.right() - self.camera_x) / self.units_per_col).ceil() as i32;
        let top = self.row(b.top() - 1e-3);
        let bottom = self.row(b.bottom());
        CellRect {
            col,
            row: top,
            w: (end - col).max(1),
            h: (bottom - top + 1).max(1),
        }
    }
}

impl GameView {
    pub fn new(units_per_col: f32, units_per_row: f32) -> Self {
        Self {
            units_per_col: units_per_col.max(1.0),
            units_per_row: units_per_row.max(1.0),
        }
    }

    /// Level width visible through a viewport this many columns wide.
    ///
    /// Hosts feed this to the session so the camera and the view agree.
    pub fn viewport_units(&self, columns: u16) -> f32 {
        columns as f32 * self.units_per_col
    }

    /// Render the snapshot into an existing framebuffer.
    ///
    /// Allocation-free once `fb` has the viewport's size.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        let bg = if snap.underwater { WATER } else { SKY };
        fb.clear(CellStyle::new(Rgb::new(90, 90, 110), bg).cell(' '));
        if viewport.height == 0 || viewport.width == 0 {
            return;
        }

        let proj = self.projection(snap, viewport);

        if let Some(ceiling) = snap.max_height {
            let style = CellStyle::new(Rgb::new(120, 180, 230), bg);
            fb.fill_row(proj.row(ceiling), '~', style);
        }

        for platform in &snap.platforms {
            let (ch, fg) = match platform.kind {
                PlatformKind::Ground => ('█', Rgb::new(125, 85, 45)),
                PlatformKind::Elevated => ('▀', Rgb::new(205, 165, 95)),
                // Drawn as part of the pipe.
                PlatformKind::PipeLedge => continue,
            };
            let r = proj.rect(&platform.bounds());
            fb.fill_rect(r.col, r.row, r.w, r.h, ch, CellStyle::new(fg, bg));
        }

        let pipe_style = CellStyle::new(Rgb::new(60, 200, 80), bg);
        for pipe in &snap.pipes {
            let r = proj.rect(pipe);
            fb.fill_rect(r.col, r.row, r.w, r.h, '║', pipe_style);
            fb.fill_rect(r.col, r.row, r.w, 1, '▄', pipe_style.bold());
        }

        self.draw_goal(fb, &proj, &snap.goal, bg);

        for bonus in &snap.bonuses {
            let (ch, style) = match bonus.kind {
                BonusKind::LowValue => ('o', CellStyle::new(Rgb::new(240, 220, 80), bg)),
                BonusKind::HighValue => ('$', CellStyle::new(Rgb::new(255, 180, 40), bg).bold()),
            };
            fb.put_char(proj.col(bonus.x), proj.row(bonus.y), ch, style);
        }

        for enemy in &snap.enemies {
            self.draw_enemy(fb, &proj, enemy, bg);
        }

        self.draw_player(fb, &proj, snap, bg);
        self.draw_hud(fb, snap);

        if let Some(direction) = snap.direction_hint {
            let text = match direction {
                TravelDirection::Right => "GOAL →",
                TravelDirection::Left => "← GOAL",
            };
            let style = CellStyle::new(Rgb::new(255, 255, 255), bg).bold();
            fb.put_str_centered(2, text, style);
        }

        match snap.status {
            GameStatus::Playing => {}
            GameStatus::Won => self.draw_overlay(fb, "LEVEL CLEAR", "n: next level   r: replay"),
            GameStatus::Lost => self.draw_overlay(fb, "GAME OVER", "enter / r: try again"),
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn projection(&self, snap: &GameSnapshot, viewport: Viewport) -> Projection {
        let mut proj = Projection {
            camera_x: snap.camera_x,
            units_per_col: self.units_per_col,
            units_per_row: self.units_per_row,
            base_row: viewport.height as i32 - 1,
        };
        let player_top = proj.row(snap.player.bounds.top() - 1e-3);
        let first_play_row = 1 + TOP_MARGIN_ROWS;
        if player_top < first_play_row {
            proj.base_row += first_play_row - player_top;
        }
        proj
    }

    fn draw_goal(&self, fb: &mut FrameBuffer, proj: &Projection, goal: &Aabb, bg: Rgb) {
        let r = proj.rect(goal);
        let pole = CellStyle::new(Rgb::new(230, 230, 230), bg);
        let flag = CellStyle::new(Rgb::new(80, 230, 120), bg).bold();
        fb.fill_rect(r.col, r.row, 1, r.h, '│', pole);
        fb.fill_rect(r.col + 1, r.row, (r.w - 1).max(1), 1, '▶', flag);
    }

    fn draw_enemy(&self, fb: &mut FrameBuffer, proj: &Projection, enemy: &EnemySnapshot, bg: Rgb) {
        let (ch, fg) = match enemy.kind {
            EnemyKind::GroundPatroller { armored: false } => ('w', Rgb::new(220, 90, 70)),
            EnemyKind::GroundPatroller { armored: true } => ('A', Rgb::new(200, 120, 60)),
            EnemyKind::FlyingDiver { .. } => ('V', Rgb::new(210, 110, 220)),
            EnemyKind::StationaryShell => ('c', Rgb::new(120, 200, 120)),
            EnemyKind::MovingShell { .. } => ('C', Rgb::new(160, 240, 160)),
            EnemyKind::AquaticSwimmer => ('f', Rgb::new(240, 150, 80)),
            EnemyKind::Mine => ('*', Rgb::new(255, 70, 70)),
        };
        let r = proj.rect(&enemy.bounds);
        fb.fill_rect(r.col, r.row, r.w, r.h, ch, CellStyle::new(fg, bg).bold());
        // Eye on the leading side.
        let eye_col = if enemy.direction < 0.0 { r.col } else { r.col + r.w - 1 };
        fb.put_char(eye_col, r.row, '•', CellStyle::new(Rgb::new(255, 255, 255), bg));
    }

    fn draw_player(&self, fb: &mut FrameBuffer, proj: &Projection, snap: &GameSnapshot, bg: Rgb) {
        let player = &snap.player;
        if player.invulnerable && (snap.tick / BLINK_TICKS) % 2 == 1 {
            return;
        }
        let body = CellStyle::new(Rgb::new(176, 120, 72), bg);
        let ch = match player.state {
            MovementState::Teleporting => '@',
            MovementState::DropThrough => '▒',
            _ => '▓',
        };
        let r = proj.rect(&player.bounds);
        fb.fill_rect(r.col, r.row, r.w, r.h, ch, body);
        let facing_left = player.vel_x < 0.0;
        let eye_col = if facing_left { r.col + 1 } else { r.col + r.w - 2 };
        fb.put_char(eye_col, r.row, '●', CellStyle::new(Rgb::new(20, 20, 20), Rgb::new(176, 120, 72)));
    }

    fn draw_hud(&self, fb: &mut FrameBuffer, snap: &GameSnapshot) {
        let label = CellStyle::new(Rgb::new(220, 220, 220), HUD_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), HUD_BG);
        fb.fill_row(0, ' ', value);

        let mut x = fb.put_str(1, 0, "SCORE ", label);
        x = put_u32(fb, x, 0, snap.score, value);
        x = fb.put_str(x + 2, 0, "BEST ", label);
        x = put_u32(fb, x, 0, snap.best_score, value);
        x = fb.put_str(x + 2, 0, "LEVEL ", label);
        x = put_u32(fb, x, 0, snap.level_number as u32, value);
        if snap.underwater {
            x = fb.put_str(x + 2, 0, "WATER", value.dim());
        }
        let status = match snap.status {
            GameStatus::Playing => value,
            GameStatus::Won => CellStyle::new(Rgb::new(80, 230, 120), HUD_BG).bold(),
            GameStatus::Lost => CellStyle::new(Rgb::new(240, 80, 80), HUD_BG).bold(),
        };
        fb.put_str(x + 2, 0, snap.status.as_str(), status);
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, title: &str, help: &str) {
        let mid = fb.height() as i32 / 2;
        let style = CellStyle::new(Rgb::new(255, 255, 255), HUD_BG).bold();
        fb.put_str_centered(mid - 1, title, style);
        fb.put_str_centered(mid + 1, help, CellStyle::new(Rgb::new(200, 200, 200), HUD_BG));
    }
}

/// Write a decimal without allocating; returns the column after the last digit.
fn put_u32(fb: &mut FrameBuffer, x: i32, y: i32, mut v: u32, style: CellStyle) -> i32 {
    let mut digits = [0u8; 10];
    let mut n = 0;
    loop {
        digits[n] = b'0' + (v % 10) as u8;
        n += 1;
        v /= 10;
        if v == 0 {
            break;
        }
    }
    let mut cx = x;
    for &d in digits[..n].iter().rev() {
        fb.put_char(cx, y, d as char, style);
        cx += 1;
    }
    cx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Platform, PlayerSnapshot};

    fn snapshot() -> GameSnapshot {
        let mut snap = GameSnapshot {
            viewport_width: 800.0,
            level_width: 2000.0,
            level_number: 3,
            ..GameSnapshot::default()
        };
        snap.platforms.push(Platform {
            x: 0.0,
            y: 0.0,
            width: 800.0,
            height: 30.0,
            kind: PlatformKind::Ground,
        });
        snap.player = PlayerSnapshot {
            bounds: Aabb::new(100.0, 30.0, 70.0, 70.0),
            ..PlayerSnapshot::default()
        };
        snap
    }

    fn ch(fb: &FrameBuffer, x: u16, y: u16) -> char {
        fb.get(x, y).map(|c| c.ch).unwrap_or('?')
    }

    #[test]
    fn ground_fills_the_bottom_rows() {
        let fb = GameView::default().render(&snapshot(), Viewport::new(80, 12));
        assert!(fb.row_text(11).chars().all(|c| c == '█'));
        assert!(fb.row_text(10).chars().skip(20).all(|c| c == '█'));
        assert!(!fb.row_text(9).contains('█'));
    }

    #[test]
    fn player_is_projected_above_the_ground() {
        let fb = GameView::default().render(&snapshot(), Viewport::new(80, 12));
        // x 100..170 -> cols 10..17, y 30..100 -> rows 7..=10.
        assert_eq!(ch(&fb, 12, 8), '▓');
        assert_eq!(ch(&fb, 12, 7), '▓');
        assert_ne!(ch(&fb, 12, 6), '▓');
        assert_ne!(ch(&fb, 9, 8), '▓');
        assert_ne!(ch(&fb, 17, 8), '▓');
    }

    #[test]
    fn camera_offset_scrolls_the_world_left() {
        let mut snap = snapshot();
        snap.camera_x = 100.0;
        let fb = GameView::default().render(&snap, Viewport::new(80, 12));
        assert_eq!(ch(&fb, 2, 8), '▓');
    }

    #[test]
    fn hud_shows_score_and_level() {
        let mut snap = snapshot();
        snap.score = 42;
        snap.best_score = 107;
        let fb = GameView::default().render(&snap, Viewport::new(80, 12));
        let hud = fb.row_text(0);
        assert!(hud.contains("SCORE 42"));
        assert!(hud.contains("BEST 107"));
        assert!(hud.contains("LEVEL 3"));
        assert!(hud.contains("playing"));
    }

    #[test]
    fn terminal_states_draw_an_overlay() {
        let mut snap = snapshot();
        snap.status = GameStatus::Lost;
        let fb = GameView::default().render(&snap, Viewport::new(80, 12));
        let all: String = (0..12).map(|y| fb.row_text(y)).collect();
        assert!(all.contains("GAME OVER"));

        snap.status = GameStatus::Won;
        let fb = GameView::default().render(&snap, Viewport::new(80, 12));
        let all: String = (0..12).map(|y| fb.row_text(y)).collect();
        assert!(all.contains("LEVEL CLEAR"));
    }

    #[test]
    fn direction_hint_points_towards_the_goal() {
        let mut snap = snapshot();
        snap.direction_hint = Some(TravelDirection::Left);
        let fb = GameView::default().render(&snap, Viewport::new(80, 12));
        assert!(fb.row_text(2).contains("← GOAL"));
    }

    #[test]
    fn invulnerable_player_blinks() {
        let mut snap = snapshot();
        snap.player.invulnerable = true;
        snap.tick = BLINK_TICKS;
        let fb = GameView::default().render(&snap, Viewport::new(80, 12));
        assert_ne!(ch(&fb, 12, 8), '▓');

        snap.tick = 0;
        let fb = GameView::default().render(&snap, Viewport::new(80, 12));
        assert_eq!(ch(&fb, 12, 8), '▓');
    }

    #[test]
    fn view_scrolls_up_for_high_jumps() {
        let mut snap = snapshot();
        snap.player.bounds = Aabb::new(100.0, 400.0, 70.0, 70.0);
        let fb = GameView::default().render(&snap, Viewport::new(80, 12));
        assert_eq!(ch(&fb, 12, 3), '▓');
    }

    #[test]
    fn enemies_use_per_kind_glyphs() {
        let mut snap = snapshot();
        snap.enemies.push(EnemySnapshot {
            bounds: Aabb::new(400.0, 30.0, 36.0, 36.0),
            kind: EnemyKind::Mine,
            direction: -1.0,
        });
        let fb = GameView::default().render(&snap, Viewport::new(80, 12));
        assert_eq!(ch(&fb, 41, 9), '*');
    }

    #[test]
    fn viewport_units_match_column_scale() {
        assert_eq!(GameView::default().viewport_units(80), 800.0);
    }
}
