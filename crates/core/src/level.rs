//! Level module - level catalog, hand-authored templates and traversability
//!
//! Levels are addressed by a 0-based index. The first
//! [`FIXED_LEVEL_COUNT`] are hand-authored; every later one is generated
//! from `(session seed, index)` (see [`crate::generator`]).
//!
//! # Traversability
//!
//! A ground gap is crossable without help when it is no wider than
//! [`MAX_UNBRIDGED_GAP`], which stays below the distance a single jump at
//! full run speed clears. Wider gaps need an elevated platform overlapping
//! them that the player can reach from either rim.

use std::fmt;

use crate::generator;
use super_capy_types::{
    BonusKind, BonusSpawn, EnemySpawn, EnemySpawnKind, LevelDescriptor, PipeSpec, Point,
    RectSpec, TravelDirection, FIXED_LEVEL_COUNT, GOAL_HEIGHT, GOAL_WIDTH, GRAVITY,
    GROUND_MIN_THICKNESS, JUMP_IMPULSE, LEVEL_COUNT, MAX_UNBRIDGED_GAP, PLATFORM_THICKNESS,
    RUN_MAX_SPEED,
};

/// Jump reach derived from the calibrated physics constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpMetrics {
    /// Horizontal distance covered by one jump at full run speed.
    pub clear_distance: f32,
    /// Height gained by a single jump.
    pub single_apex: f32,
    /// Height gained by two chained jumps.
    pub double_apex: f32,
}

impl JumpMetrics {
    pub fn calibrated() -> Self {
        let g = GRAVITY.abs();
        let airtime = 2.0 * JUMP_IMPULSE / g;
        let single_apex = JUMP_IMPULSE * JUMP_IMPULSE / (2.0 * g);
        Self {
            clear_distance: RUN_MAX_SPEED * airtime,
            single_apex,
            double_apex: single_apex * 2.0,
        }
    }
}

/// First ground gap that neither a jump nor a bridging platform covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraversalIssue {
    pub gap_start: f32,
    pub gap_end: f32,
}

impl TraversalIssue {
    pub fn width(&self) -> f32 {
        self.gap_end - self.gap_start
    }
}

impl fmt::Display for TraversalIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unbridged gap of {:.0} units between x={:.0} and x={:.0}",
            self.width(),
            self.gap_start,
            self.gap_end
        )
    }
}

impl std::error::Error for TraversalIssue {}

/// Check every gap between consecutive ground segments.
///
/// Underwater levels have no ground and are always traversable.
pub fn check_traversable(level: &LevelDescriptor) -> Result<(), TraversalIssue> {
    if level.underwater {
        return Ok(());
    }
    let metrics = JumpMetrics::calibrated();
    let ground = level.ground_segments();

    for pair in ground.windows(2) {
        let (left, right) = (&pair[0], &pair[1]);
        let gap_start = left.right();
        let gap_end = right.x;
        if gap_end - gap_start <= MAX_UNBRIDGED_GAP {
            continue;
        }

        let rim = ground_top(left).max(ground_top(right));
        let bridged = level.elevated_platforms().any(|p| {
            let overlaps = p.x < gap_end && p.right() > gap_start;
            let near = (p.x - gap_start).max(0.0);
            let far = (gap_end - p.right()).max(0.0);
            overlaps
                && near <= metrics.clear_distance
                && far <= metrics.clear_distance
                && p.top() <= rim + metrics.double_apex
        });
        if !bridged {
            return Err(TraversalIssue { gap_start, gap_end });
        }
    }
    Ok(())
}

fn ground_top(segment: &RectSpec) -> f32 {
    segment.y + segment.height.max(GROUND_MIN_THICKNESS)
}

/// Normalize any index onto the playable range, wrapping past the end.
pub fn wrap_index(index: usize) -> usize {
    index % LEVEL_COUNT
}

/// Source of level descriptors for one session seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelCatalog {
    seed: u32,
}

impl LevelCatalog {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn level_count(&self) -> usize {
        LEVEL_COUNT
    }

    /// Descriptor for a 0-based index; the same `(seed, index)` always
    /// yields the same level.
    pub fn level(&self, index: usize) -> LevelDescriptor {
        let index = wrap_index(index);
        if index < FIXED_LEVEL_COUNT {
            fixed_level(index)
        } else {
            generator::generate(index, self.seed)
        }
    }
}

const GROUND_TOP: f32 = GROUND_MIN_THICKNESS;

fn ground(x: f32, width: f32) -> RectSpec {
    RectSpec::new(x, 0.0, width, GROUND_MIN_THICKNESS)
}

fn ledge(x: f32, y: f32, width: f32) -> RectSpec {
    RectSpec::new(x, y, width, PLATFORM_THICKNESS)
}

fn enemy(x: f32, y: f32, kind: EnemySpawnKind) -> EnemySpawn {
    EnemySpawn { x, y, kind }
}

fn bonus(x: f32, y: f32, kind: BonusKind) -> BonusSpawn {
    BonusSpawn { x, y, kind }
}

/// Hand-authored levels, indices `0..FIXED_LEVEL_COUNT`.
pub fn fixed_level(index: usize) -> LevelDescriptor {
    use BonusKind::{HighValue, LowValue};
    use EnemySpawnKind::{Armored, Diver, Mine, Shell, Walker};

    match index {
        0 => LevelDescriptor {
            width: 2200.0,
            ground_height: 80.0,
            underwater: false,
            max_height: None,
            start_x: 50.0,
            direction: TravelDirection::Right,
            platforms: vec![
                ground(0.0, 400.0),
                ground(600.0, 300.0),
                ground(1000.0, 400.0),
                ground(1500.0, 350.0),
                ground(1950.0, 250.0),
                ledge(500.0, 120.0, 150.0),
                ledge(800.0, 160.0, 120.0),
                ledge(1300.0, 100.0, 160.0),
                ledge(1700.0, 140.0, 150.0),
            ],
            enemies: vec![
                enemy(700.0, 0.0, Walker),
                enemy(1350.0, 0.0, Walker),
                enemy(1780.0, 160.0, Walker),
            ],
            bonuses: vec![
                bonus(550.0, 180.0, LowValue),
                bonus(850.0, 220.0, HighValue),
                bonus(1450.0, 160.0, LowValue),
            ],
            pipes: vec![],
            goal: RectSpec::new(2000.0, GROUND_TOP, GOAL_WIDTH, GOAL_HEIGHT),
        },
        1 => LevelDescriptor {
            width: 2600.0,
            ground_height: 80.0,
            underwater: false,
            max_height: None,
            start_x: 50.0,
            direction: TravelDirection::Right,
            platforms: vec![
                ground(0.0, 500.0),
                ground(650.0, 300.0),
                ground(1050.0, 350.0),
                ground(1500.0, 500.0),
                ground(2100.0, 500.0),
                ledge(450.0, 120.0, 160.0),
                ledge(820.0, 170.0, 140.0),
                ledge(1250.0, 140.0, 170.0),
                ledge(1700.0, 180.0, 130.0),
                ledge(2000.0, 140.0, 170.0),
            ],
            enemies: vec![
                enemy(700.0, 0.0, Walker),
                enemy(900.0, 0.0, Armored),
                enemy(1150.0, 0.0, Mine),
                enemy(1550.0, 0.0, Walker),
                enemy(1750.0, 200.0, Walker),
                enemy(2300.0, 0.0, Shell),
            ],
            bonuses: vec![
                bonus(500.0, 170.0, LowValue),
                bonus(880.0, 230.0, HighValue),
                bonus(1300.0, 200.0, LowValue),
                bonus(1900.0, 240.0, HighValue),
            ],
            pipes: vec![],
            goal: RectSpec::new(2400.0, GROUND_TOP, GOAL_WIDTH, GOAL_HEIGHT),
        },
        _ => LevelDescriptor {
            width: 2600.0,
            ground_height: 80.0,
            underwater: false,
            max_height: None,
            start_x: 2400.0,
            direction: TravelDirection::Left,
            platforms: vec![
                ground(2100.0, 500.0),
                ground(1600.0, 350.0),
                ground(1100.0, 300.0),
                ground(500.0, 400.0),
                ground(0.0, 400.0),
                ledge(1900.0, 150.0, 150.0),
                ledge(1500.0, 120.0, 170.0),
                ledge(900.0, 160.0, 150.0),
                ledge(600.0, 200.0, 130.0),
            ],
            enemies: vec![
                enemy(2200.0, 0.0, Walker),
                enemy(1850.0, 0.0, Shell),
                enemy(1250.0, 0.0, Armored),
                enemy(550.0, 0.0, Walker),
                enemy(620.0, 220.0, Walker),
                enemy(1800.0, 200.0, Diver),
                enemy(1000.0, 220.0, Diver),
            ],
            bonuses: vec![
                bonus(1850.0, 210.0, LowValue),
                bonus(1420.0, 180.0, HighValue),
                bonus(810.0, 210.0, LowValue),
                bonus(520.0, 260.0, HighValue),
            ],
            pipes: vec![
                PipeSpec {
                    x: 780.0,
                    y: GROUND_TOP,
                    height: 100.0,
                    destination: Some(Point::new(1700.0, GROUND_TOP)),
                },
                PipeSpec {
                    x: 1700.0,
                    y: GROUND_TOP,
                    height: 100.0,
                    destination: Some(Point::new(780.0, GROUND_TOP)),
                },
            ],
            goal: RectSpec::new(100.0, GROUND_TOP, GOAL_WIDTH, GOAL_HEIGHT),
        },
    }
}
