//! Generator module - procedural levels
//!
//! Generation is single pass and reject-free: every random placement that
//! could fall outside the level is clamped instead of retried, so a level is
//! always produced in time linear in its content. Traversability is
//! structural: every ground gap wider than [`MAX_UNBRIDGED_GAP`] receives a
//! bridging platform centered over it.
//!
//! | Level number (1-based) | Variant |
//! |------------------------|---------|
//! | divisible by 5 | underwater, no ground, swimmers and mines |
//! | divisible by 4 | start near the far end, goal near the origin |

use crate::rng::SimpleRng;
use super_capy_types::{
    BonusKind, BonusSpawn, EnemySpawn, EnemySpawnKind, LevelDescriptor, PipeSpec, Point,
    RectSpec, TravelDirection, GOAL_HEIGHT, GOAL_HEIGHT_UNDERWATER, GOAL_WIDTH,
    GROUND_MIN_THICKNESS, MAX_UNBRIDGED_GAP, PIPE_WIDTH, PLATFORM_THICKNESS,
};

const BASE_WIDTH: f32 = 2200.0;
const WIDTH_PER_LEVEL: f32 = 100.0;

/// A ground segment reaching past `width - CLOSING_MARGIN` runs to the edge.
const CLOSING_MARGIN: f32 = 500.0;

/// Distance of the far start / goal from the right edge.
const FAR_END_OFFSET: f32 = 200.0;
const NEAR_START_X: f32 = 50.0;
const NEAR_GOAL_X: f32 = 100.0;

/// Pipes stay this far from the right edge so the goal area is clear.
const PIPE_EDGE_MARGIN: f32 = 300.0;

/// Surface height range of a platform bridging a wide gap.
const BRIDGE_SURFACE: (f32, f32) = (120.0, 240.0);

/// Open-air bonuses above platforms float this high over the surface.
const BONUS_LIFT: f32 = 40.0;

/// Produce the procedural level for a 0-based `index`.
pub fn generate(index: usize, seed: u32) -> LevelDescriptor {
    let mut rng = SimpleRng::for_level(seed, index);
    let number = index + 1;
    let width = BASE_WIDTH + WIDTH_PER_LEVEL * index as f32 + rng.range_f32(200.0, 400.0);
    let leftward = number % 4 == 0;

    let level = if number % 5 == 0 {
        underwater(&mut rng, width, leftward)
    } else {
        on_land(&mut rng, width, leftward)
    };
    log::debug!(
        "generated level {number} (seed {seed}): width {:.0}, {} platforms, {} enemies, {} bonuses, {} pipes{}",
        level.width,
        level.platforms.len(),
        level.enemies.len(),
        level.bonuses.len(),
        level.pipes.len(),
        if level.underwater { ", underwater" } else { "" }
    );
    level
}

fn orientation(width: f32, leftward: bool) -> (f32, f32, TravelDirection) {
    if leftward {
        (width - FAR_END_OFFSET, NEAR_GOAL_X, TravelDirection::Left)
    } else {
        (NEAR_START_X, width - FAR_END_OFFSET, TravelDirection::Right)
    }
}

fn on_land(rng: &mut SimpleRng, width: f32, leftward: bool) -> LevelDescriptor {
    let mut platforms = Vec::new();
    let mut elevated = Vec::new();

    // Walk the width: ground, gap, ground, ... closing on the right edge.
    let mut cursor = 0.0;
    loop {
        let mut end = cursor + rng.range_f32(250.0, 500.0);
        let closing = end >= width - CLOSING_MARGIN;
        if closing {
            end = width;
        }
        platforms.push(RectSpec::new(cursor, 0.0, end - cursor, GROUND_MIN_THICKNESS));

        if rng.chance(0.3) {
            let w = rng.range_f32(100.0, 220.0);
            let x = cursor + rng.range_f32(0.0, (end - cursor - w).max(0.0));
            let y = rng.range_f32(90.0, 240.0);
            elevated.push(RectSpec::new(x, y, w, PLATFORM_THICKNESS));
        }
        if closing {
            break;
        }

        let gap = rng.range_f32(80.0, 180.0);
        if gap > MAX_UNBRIDGED_GAP {
            let w = rng.range_f32(120.0, 200.0);
            let x = end + gap / 2.0 - w / 2.0;
            let surface = rng.range_f32(BRIDGE_SURFACE.0, BRIDGE_SURFACE.1);
            elevated.push(RectSpec::new(x, surface - PLATFORM_THICKNESS, w, PLATFORM_THICKNESS));
        }
        cursor = end + gap;
    }

    for _ in 0..rng.range_inclusive(2, 5) {
        let w = rng.range_f32(80.0, 220.0);
        let x = rng.range_f32(200.0, width - 200.0).min(width - w);
        let y = rng.range_f32(90.0, 290.0);
        elevated.push(RectSpec::new(x, y, w, PLATFORM_THICKNESS));
    }

    let enemies = (0..rng.range_inclusive(3, 6))
        .map(|_| {
            let kind = land_enemy_kind(rng);
            let (ew, _) = kind.size();
            let (x, y) = match on_platform(rng, &elevated, 0.3) {
                Some(p) => (p.x + rng.range_f32(0.0, (p.width - ew).max(0.0)), p.top()),
                None => {
                    let x = rng.range_f32(150.0, width - 150.0);
                    (onto_ground(&platforms, x, ew), 0.0)
                }
            };
            EnemySpawn {
                x: x.clamp(0.0, width - ew),
                y,
                kind,
            }
        })
        .collect();

    let bonuses = (0..rng.range_inclusive(3, 6))
        .map(|_| {
            let (x, y) = match on_platform(rng, &elevated, 0.4) {
                Some(p) => (p.x + rng.range_f32(0.0, p.width), p.top() + BONUS_LIFT),
                None => (rng.range_f32(200.0, width - 200.0), rng.range_f32(120.0, 320.0)),
            };
            BonusSpawn {
                x: x.clamp(0.0, width),
                y,
                kind: bonus_kind(rng),
            }
        })
        .collect();

    let pipes = if rng.chance(0.4) {
        let height = rng.range_f32(80.0, 160.0);
        pipe_pair(rng, width, height, |x| ground_top_at(&platforms, x + PIPE_WIDTH / 2.0))
    } else {
        Vec::new()
    };

    let (start_x, goal_x, direction) = orientation(width, leftward);
    let goal_y = ground_top_at(&platforms, goal_x + GOAL_WIDTH / 2.0);
    platforms.extend(elevated);

    LevelDescriptor {
        width,
        ground_height: 80.0,
        underwater: false,
        max_height: None,
        start_x,
        direction,
        platforms,
        enemies,
        bonuses,
        pipes,
        goal: RectSpec::new(goal_x, goal_y, GOAL_WIDTH, GOAL_HEIGHT),
    }
}

fn underwater(rng: &mut SimpleRng, width: f32, leftward: bool) -> LevelDescriptor {
    let max_height = rng.range_f32(300.0, 400.0);

    let enemies = (0..rng.range_inclusive(4, 7))
        .map(|_| {
            let kind = if rng.chance(0.7) {
                EnemySpawnKind::Swimmer
            } else {
                EnemySpawnKind::Mine
            };
            let (ew, _) = kind.size();
            EnemySpawn {
                x: rng.range_f32(150.0, width - 150.0).clamp(0.0, width - ew),
                y: rng.range_f32(80.0, max_height - 70.0),
                kind,
            }
        })
        .collect();

    let bonuses = (0..rng.range_inclusive(3, 5))
        .map(|_| BonusSpawn {
            x: rng.range_f32(200.0, width - 200.0),
            y: rng.range_f32(60.0, max_height - 60.0),
            kind: bonus_kind(rng),
        })
        .collect();

    let pipes = if rng.chance(0.3) {
        let height = rng.range_f32(60.0, 120.0).min(max_height * 0.25);
        pipe_pair(rng, width, height, |_| 0.0)
    } else {
        Vec::new()
    };

    let (start_x, goal_x, direction) = orientation(width, leftward);
    LevelDescriptor {
        width,
        ground_height: 0.0,
        underwater: true,
        max_height: Some(max_height),
        start_x,
        direction,
        platforms: Vec::new(),
        enemies,
        bonuses,
        pipes,
        goal: RectSpec::new(goal_x, 0.0, GOAL_WIDTH, GOAL_HEIGHT_UNDERWATER),
    }
}

/// Two well separated pipes, each leading to the other's base.
fn pipe_pair(
    rng: &mut SimpleRng,
    width: f32,
    height: f32,
    base_at: impl Fn(f32) -> f32,
) -> Vec<PipeSpec> {
    let x1 = rng.range_f32(200.0, width * 0.4);
    let x2 = rng
        .range_f32(width * 0.6, width * 0.9)
        .min(width - PIPE_EDGE_MARGIN - PIPE_WIDTH);
    let (y1, y2) = (base_at(x1), base_at(x2));
    vec![
        PipeSpec {
            x: x1,
            y: y1,
            height,
            destination: Some(Point::new(x2, y2)),
        },
        PipeSpec {
            x: x2,
            y: y2,
            height,
            destination: Some(Point::new(x1, y1)),
        },
    ]
}

fn on_platform<'a>(rng: &mut SimpleRng, elevated: &'a [RectSpec], p: f32) -> Option<&'a RectSpec> {
    if elevated.is_empty() || !rng.chance(p) {
        return None;
    }
    rng.pick(elevated.len()).map(|i| &elevated[i])
}

/// Walker 50%, armored 20%, shell 15%, mine 15%.
fn land_enemy_kind(rng: &mut SimpleRng) -> EnemySpawnKind {
    let roll = rng.next_f32();
    if roll < 0.5 {
        EnemySpawnKind::Walker
    } else if roll < 0.7 {
        EnemySpawnKind::Armored
    } else if roll < 0.85 {
        EnemySpawnKind::Shell
    } else {
        EnemySpawnKind::Mine
    }
}

fn bonus_kind(rng: &mut SimpleRng) -> BonusKind {
    if rng.chance(0.5) {
        BonusKind::HighValue
    } else {
        BonusKind::LowValue
    }
}

/// Shift `x` so a body of width `w` sits on the nearest ground segment.
fn onto_ground(ground: &[RectSpec], x: f32, w: f32) -> f32 {
    let distance = |g: &RectSpec| (g.x - x).max(x + w - g.right()).max(0.0);
    ground
        .iter()
        .min_by(|a, b| distance(*a).total_cmp(&distance(*b)))
        .map(|g| x.clamp(g.x, (g.right() - w).max(g.x)))
        .unwrap_or(x)
}

fn ground_top_at(ground: &[RectSpec], x: f32) -> f32 {
    ground
        .iter()
        .find(|g| x >= g.x && x <= g.right())
        .map(RectSpec::top)
        .unwrap_or(0.0)
}
