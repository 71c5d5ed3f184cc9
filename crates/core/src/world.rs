//! World module - live entity collections instantiated from a level descriptor
//!
//! The descriptor is read-only input; everything here is owned by the
//! session and discarded wholesale on reload or level change.

use crate::enemy::Enemy;
use crate::geometry::Aabb;
use super_capy_types::{
    BonusKind, EnemySpawn, EnemySpawnKind, LevelDescriptor, Point, TravelDirection,
    BONUS_RADIUS, GROUND_MIN_THICKNESS, PIPE_LEDGE_THICKNESS, PIPE_WIDTH,
};

/// Horizontal reach of a flying diver's cruise on either side of its spawn.
const DIVER_PATROL_REACH: f32 = 200.0;

/// An enemy counts as resting on a platform when its feet are this close.
const SURFACE_SNAP: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    Ground,
    Elevated,
    /// Landing surface on top of a pipe.
    PipeLedge,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Elevated surfaces are the ones drop-through ignores.
    pub fn is_elevated(&self) -> bool {
        self.kind == PlatformKind::Elevated
    }

    fn spans(&self, x: f32) -> bool {
        x >= self.x && x <= self.right()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipe {
    pub x: f32,
    pub y: f32,
    pub height: f32,
    pub destination: Option<Point>,
}

impl Pipe {
    pub fn width(&self) -> f32 {
        PIPE_WIDTH
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Height at which a player standing on the pipe mouth has its feet.
    pub fn mouth(&self) -> f32 {
        self.top() + PIPE_LEDGE_THICKNESS
    }

    pub fn shaft(&self) -> Aabb {
        Aabb::new(self.x, self.y, PIPE_WIDTH, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bonus {
    /// Center of the collectible.
    pub x: f32,
    pub y: f32,
    pub kind: BonusKind,
}

impl Bonus {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            self.x - BONUS_RADIUS,
            self.y - BONUS_RADIUS,
            BONUS_RADIUS * 2.0,
            BONUS_RADIUS * 2.0,
        )
    }
}

/// Every live entity of the current level except the player.
#[derive(Debug, Clone)]
pub struct World {
    pub width: f32,
    pub ground_height: f32,
    pub underwater: bool,
    pub max_height: Option<f32>,
    pub start_x: f32,
    pub direction: TravelDirection,
    /// Generation order; ground first as listed, pipe ledges last.
    pub platforms: Vec<Platform>,
    pub pipes: Vec<Pipe>,
    pub enemies: Vec<Enemy>,
    pub bonuses: Vec<Bonus>,
    pub goal: Aabb,
}

impl World {
    pub fn from_descriptor(level: &LevelDescriptor) -> Self {
        let mut platforms: Vec<Platform> = level
            .platforms
            .iter()
            .map(|p| {
                if p.is_ground() {
                    Platform {
                        x: p.x,
                        y: p.y,
                        width: p.width,
                        height: p.height.max(GROUND_MIN_THICKNESS),
                        kind: PlatformKind::Ground,
                    }
                } else {
                    Platform {
                        x: p.x,
                        y: p.y,
                        width: p.width,
                        height: p.height,
                        kind: PlatformKind::Elevated,
                    }
                }
            })
            .collect();

        let pipes: Vec<Pipe> = level
            .pipes
            .iter()
            .map(|p| Pipe {
                x: p.x,
                y: p.y,
                height: p.height,
                destination: p.destination,
            })
            .collect();
        platforms.extend(pipes.iter().map(|pipe| Platform {
            x: pipe.x,
            y: pipe.top(),
            width: PIPE_WIDTH,
            height: PIPE_LEDGE_THICKNESS,
            kind: PlatformKind::PipeLedge,
        }));

        let mut world = Self {
            width: level.width,
            ground_height: level.ground_height,
            underwater: level.underwater,
            max_height: level.max_height,
            start_x: level.start_x,
            direction: level.direction,
            platforms,
            pipes,
            enemies: Vec::with_capacity(level.enemies.len()),
            bonuses: level
                .bonuses
                .iter()
                .map(|b| Bonus {
                    x: b.x,
                    y: b.y,
                    kind: b.kind,
                })
                .collect(),
            goal: level.goal.into(),
        };

        let enemies = level.enemies.iter().map(|s| world.instantiate_enemy(s)).collect();
        world.enemies = enemies;
        log::debug!(
            "world instantiated: {} platforms, {} pipes, {} enemies, {} bonuses",
            world.platforms.len(),
            world.pipes.len(),
            world.enemies.len(),
            world.bonuses.len()
        );
        world
    }

    /// Ground segment under `x`, if any.
    pub fn ground_under(&self, x: f32) -> Option<&Platform> {
        self.platforms
            .iter()
            .find(|p| p.kind == PlatformKind::Ground && p.spans(x))
    }

    /// Feet height for an entity of `width` placed at `x`.
    pub fn spawn_height(&self, x: f32, width: f32) -> f32 {
        self.ground_under(x + width / 2.0)
            .map(Platform::top)
            .unwrap_or(0.0)
    }

    /// Upper bound for the player's feet underwater.
    pub fn water_ceiling(&self, body_height: f32) -> Option<f32> {
        if !self.underwater {
            return None;
        }
        self.max_height.map(|max| (max - body_height).max(0.0))
    }

    fn instantiate_enemy(&self, spawn: &EnemySpawn) -> Enemy {
        let (width, height) = spawn.kind.size();
        let full = (0.0, (self.width - width).max(0.0));
        let center = spawn.x + width / 2.0;

        let (y, patrol) = match spawn.kind {
            EnemySpawnKind::Swimmer => (self.clamp_in_water(spawn.y, height), full),
            EnemySpawnKind::Diver => (
                spawn.y,
                (
                    (spawn.x - DIVER_PATROL_REACH).max(0.0),
                    (spawn.x + DIVER_PATROL_REACH).min(full.1),
                ),
            ),
            _ if self.underwater => (self.clamp_in_water(spawn.y, height), (spawn.x, spawn.x)),
            _ => self.resting_surface(spawn.y, center, width).unwrap_or((spawn.y, full)),
        };
        Enemy::spawn(spawn.kind, spawn.x, y, patrol)
    }

    /// Resolve the surface a ground or platform enemy stands on.
    fn resting_surface(&self, y: f32, center: f32, width: f32) -> Option<(f32, (f32, f32))> {
        let surface = if y <= 0.0 {
            self.ground_under(center).or_else(|| self.nearest_ground(center))
        } else {
            self.platforms.iter().find(|p| {
                p.kind != PlatformKind::Ground && p.spans(center) && (p.top() - y).abs() <= SURFACE_SNAP
            })
        }?;
        Some((surface.top(), (surface.x, surface.right() - width)))
    }

    /// Ground segment with the shortest horizontal distance to `x`.
    fn nearest_ground(&self, x: f32) -> Option<&Platform> {
        let distance = |p: &Platform| (p.x - x).max(x - p.right()).max(0.0);
        self.platforms
            .iter()
            .filter(|p| p.kind == PlatformKind::Ground)
            .min_by(|a, b| distance(*a).total_cmp(&distance(*b)))
    }

    fn clamp_in_water(&self, y: f32, height: f32) -> f32 {
        match self.max_height {
            Some(max) => y.clamp(0.0, (max - height).max(0.0)),
            None => y.max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::EnemyKind;
    use super_capy_types::{PipeSpec, RectSpec, GOAL_HEIGHT, GOAL_WIDTH};

    fn level() -> LevelDescriptor {
        LevelDescriptor {
            width: 1500.0,
            ground_height: 80.0,
            underwater: false,
            max_height: None,
            start_x: 50.0,
            direction: TravelDirection::Right,
            platforms: vec![
                RectSpec::new(0.0, 0.0, 600.0, 10.0),
                RectSpec::new(400.0, 150.0, 200.0, 20.0),
                RectSpec::new(800.0, 0.0, 700.0, 30.0),
            ],
            enemies: vec![
                EnemySpawn {
                    x: 900.0,
                    y: 0.0,
                    kind: EnemySpawnKind::Walker,
                },
                EnemySpawn {
                    x: 450.0,
                    y: 170.0,
                    kind: EnemySpawnKind::Armored,
                },
                EnemySpawn {
                    x: 700.0,
                    y: 0.0,
                    kind: EnemySpawnKind::Walker,
                },
            ],
            bonuses: vec![],
            pipes: vec![PipeSpec {
                x: 1000.0,
                y: 30.0,
                height: 100.0,
                destination: None,
            }],
            goal: RectSpec::new(1300.0, 30.0, GOAL_WIDTH, GOAL_HEIGHT),
        }
    }

    #[test]
    fn ground_gets_minimum_thickness() {
        let world = World::from_descriptor(&level());
        assert_eq!(world.platforms[0].height, GROUND_MIN_THICKNESS);
        assert_eq!(world.platforms[0].kind, PlatformKind::Ground);
        assert_eq!(world.platforms[1].kind, PlatformKind::Elevated);
    }

    #[test]
    fn pipes_contribute_ledges() {
        let world = World::from_descriptor(&level());
        let ledge = world.platforms.last().unwrap();
        assert_eq!(ledge.kind, PlatformKind::PipeLedge);
        assert_eq!(ledge.y, 130.0);
        assert_eq!(ledge.top(), world.pipes[0].mouth());
    }

    #[test]
    fn ground_enemies_rest_on_their_segment() {
        let world = World::from_descriptor(&level());
        let walker = &world.enemies[0];
        assert_eq!(walker.y, 30.0);
        assert_eq!(walker.patrol, (800.0, 1460.0));
        assert_eq!(walker.direction, -1.0);
    }

    #[test]
    fn platform_enemies_patrol_their_platform() {
        let world = World::from_descriptor(&level());
        let armored = &world.enemies[1];
        assert_eq!(armored.kind, EnemyKind::GroundPatroller { armored: true });
        assert_eq!(armored.y, 170.0);
        assert_eq!(armored.patrol, (400.0, 556.0));
    }

    #[test]
    fn enemies_over_gaps_move_to_the_nearest_segment() {
        let world = World::from_descriptor(&level());
        // Center 720 is 80 from the right segment and 120 from the left one.
        let stray = &world.enemies[2];
        assert_eq!(stray.y, 30.0);
        assert_eq!(stray.x, 800.0);
        assert_eq!(stray.patrol, (800.0, 1460.0));
        assert!(stray.hitbox().bottom() >= world.platforms[2].top());
    }

    #[test]
    fn enemies_without_any_ground_keep_their_height() {
        let mut level = level();
        level.platforms.retain(|p| !p.is_ground());
        let world = World::from_descriptor(&level);
        let stray = &world.enemies[2];
        assert_eq!(stray.y, 0.0);
        assert_eq!(stray.patrol, (0.0, 1460.0));
    }

    #[test]
    fn spawn_height_follows_ground() {
        let world = World::from_descriptor(&level());
        assert_eq!(world.spawn_height(50.0, 70.0), 30.0);
        assert_eq!(world.spawn_height(650.0, 70.0), 0.0);
    }
}
