//! Collision module - interaction resolution after movement
//!
//! Runs once per tick, after the player and enemies have moved:
//!
//! 1. Enemy contact (stomp, kick, or death)
//! 2. Moving shells against other enemies
//! 3. Pipe shafts block horizontally; pipe mouths teleport
//! 4. Bonus pickup
//! 5. Goal contact
//!
//! Landing on surfaces is part of integration and lives in `physics`.

use crate::enemy::EnemyKind;
use crate::event::{push, SimEvent, TickEvents};
use crate::player::Player;
use crate::world::{PlatformKind, World};
use super_capy_types::{
    InputState, BOUNCE_IMPULSE, PIPE_MOUTH_TOLERANCE, PIPE_WIDTH, SPAWN_SAFE_DISTANCE,
    TELEPORT_INVULNERABILITY_TICKS, TELEPORT_SPIN_TICKS,
};

/// Destination coordinates match a pipe base within this distance.
const DESTINATION_MATCH: f32 = 0.5;

/// Whether the player is close enough to the start to be spared.
pub fn in_spawn_safety(player: &Player, world: &World) -> bool {
    (player.x - world.start_x).abs() < SPAWN_SAFE_DISTANCE
}

/// Resolve player-enemy contact. Returns `true` when the contact was lethal.
pub fn resolve_enemy_contacts(player: &mut Player, world: &mut World, events: &mut TickEvents) -> bool {
    if player.is_invulnerable() || in_spawn_safety(player, world) {
        return false;
    }

    let body = player.bounds();
    for (index, enemy) in world.enemies.iter_mut().enumerate() {
        if !enemy.alive || !body.overlaps(&enemy.hitbox()) {
            continue;
        }

        // Feet were in the upper half of the enemy box last tick.
        let stomp = player.vel_y < 0.0 && player.prev_y >= enemy.y + enemy.height / 2.0;

        match enemy.kind {
            EnemyKind::GroundPatroller { .. }
            | EnemyKind::FlyingDiver { .. }
            | EnemyKind::MovingShell { .. }
                if stomp =>
            {
                // Armored patrollers and sliding shells stop as stationary shells.
                match enemy.kind {
                    EnemyKind::GroundPatroller { armored: true } | EnemyKind::MovingShell { .. } => {
                        enemy.retreat_into_shell()
                    }
                    _ => enemy.alive = false,
                }
                bounce(player);
                push(events, SimEvent::Stomped { enemy: index });
            }
            EnemyKind::StationaryShell => {
                let direction: i8 = if player.center_x() < enemy.bounds().center_x() {
                    1
                } else {
                    -1
                };
                enemy.kick(direction as f32);
                // Hop clear of the launched shell.
                bounce(player);
                push(
                    events,
                    SimEvent::ShellKicked {
                        enemy: index,
                        direction,
                    },
                );
            }
            EnemyKind::MovingShell { kick_grace } if kick_grace > 0.0 => {}
            _ => {
                log::debug!("player hit by {} at x={:.0}", enemy.kind.name(), enemy.x);
                return true;
            }
        }
    }
    false
}

fn bounce(player: &mut Player) {
    player.vel_y = BOUNCE_IMPULSE;
    player.on_ground = false;
    player.standing_on = None;
}

/// Each moving shell eliminates the first non-shell enemy it touches and is
/// removed with it.
pub fn resolve_shell_hits(world: &mut World, events: &mut TickEvents) {
    for shell in 0..world.enemies.len() {
        let candidate = &world.enemies[shell];
        if !candidate.alive || !candidate.is_moving_shell() {
            continue;
        }
        let shell_box = candidate.bounds();
        let victim = world
            .enemies
            .iter()
            .position(|e| e.alive && !e.is_shell() && e.bounds().overlaps(&shell_box));
        if let Some(victim) = victim {
            world.enemies[victim].alive = false;
            world.enemies[shell].alive = false;
            push(events, SimEvent::ShellHit { shell, victim });
        }
    }
}

/// Keep the player out of pipe shafts by snapping to the nearer side.
pub fn block_pipes(player: &mut Player, world: &World) {
    for pipe in &world.pipes {
        let shaft = pipe.shaft();
        if !player.bounds().overlaps(&shaft) {
            continue;
        }
        player.x = if player.center_x() < shaft.center_x() {
            shaft.left() - player.width
        } else {
            shaft.right()
        };
        player.vel_x = 0.0;
    }
    player.x = player.x.clamp(0.0, (world.width - player.width).max(0.0));
}

/// Enter a linked pipe from its mouth while holding descend.
///
/// Returns the landing position when a teleport happened.
pub fn try_enter_pipe(
    player: &mut Player,
    world: &World,
    input: &InputState,
    events: &mut TickEvents,
) -> Option<(f32, f32)> {
    if !input.descend || player.teleport_spin > 0.0 {
        return None;
    }

    let body = player.bounds();
    let destination = world.pipes.iter().find_map(|pipe| {
        let at_mouth = (player.y - pipe.mouth()).abs() < PIPE_MOUTH_TOLERANCE;
        if at_mouth && body.overlaps_x(&pipe.shaft()) {
            pipe.destination
        } else {
            None
        }
    })?;

    let paired = world.pipes.iter().find(|q| {
        (q.x - destination.x).abs() <= DESTINATION_MATCH && (q.y - destination.y).abs() <= DESTINATION_MATCH
    });
    let (x, y) = match paired {
        Some(pipe) => (pipe.x + PIPE_WIDTH / 2.0 - player.width / 2.0, pipe.mouth()),
        None => (destination.x, destination.y),
    };

    player.x = x.clamp(0.0, (world.width - player.width).max(0.0));
    player.prev_y = y;
    player.vel_x = 0.0;
    player.vel_y = 0.0;
    player.drop_through = 0.0;
    if paired.is_some() {
        player.land(y, Some(PlatformKind::PipeLedge));
    } else {
        player.y = y;
    }
    player.teleport_invulnerability = TELEPORT_INVULNERABILITY_TICKS;
    player.teleport_spin = TELEPORT_SPIN_TICKS;

    log::debug!("teleported to ({:.0}, {:.0})", player.x, y);
    push(events, SimEvent::Teleported { x: player.x, y });
    Some((player.x, y))
}

/// Remove touched bonuses and return the score they are worth.
pub fn collect_bonuses(player: &Player, world: &mut World, events: &mut TickEvents) -> u32 {
    let body = player.bounds();
    let mut gained = 0;
    world.bonuses.retain(|bonus| {
        if body.overlaps(&bonus.bounds()) {
            let value = bonus.kind.value();
            gained += value;
            push(
                events,
                SimEvent::BonusCollected {
                    kind: bonus.kind,
                    value,
                },
            );
            false
        } else {
            true
        }
    });
    gained
}

pub fn reached_goal(player: &Player, world: &World) -> bool {
    player.bounds().overlaps(&world.goal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use super_capy_types::{
        BonusKind, BonusSpawn, EnemySpawn, EnemySpawnKind, InputSignal, LevelDescriptor,
        PipeSpec, Point, RectSpec, TravelDirection, GOAL_HEIGHT, GOAL_WIDTH,
    };
    use proptest::prelude::*;

    fn world_with(enemies: Vec<EnemySpawn>, pipes: Vec<PipeSpec>) -> World {
        World::from_descriptor(&LevelDescriptor {
            width: 3000.0,
            ground_height: 80.0,
            underwater: false,
            max_height: None,
            start_x: 50.0,
            direction: TravelDirection::Right,
            platforms: vec![RectSpec::new(0.0, 0.0, 3000.0, 30.0)],
            enemies,
            bonuses: vec![
                BonusSpawn {
                    x: 1035.0,
                    y: 60.0,
                    kind: BonusKind::HighValue,
                },
                BonusSpawn {
                    x: 2000.0,
                    y: 60.0,
                    kind: BonusKind::LowValue,
                },
            ],
            pipes,
            goal: RectSpec::new(2800.0, 30.0, GOAL_WIDTH, GOAL_HEIGHT),
        })
    }

    fn spawn(x: f32, kind: EnemySpawnKind) -> EnemySpawn {
        EnemySpawn { x, y: 0.0, kind }
    }

    fn exposed(x: f32, y: f32) -> Player {
        let mut p = Player::spawn(x, y);
        p.spawn_invulnerability = 0.0;
        p
    }

    #[test]
    fn lateral_contact_with_walker_is_lethal() {
        let mut world = world_with(vec![spawn(1000.0, EnemySpawnKind::Walker)], vec![]);
        let mut p = exposed(960.0, 30.0);
        let mut events = TickEvents::new();
        assert!(resolve_enemy_contacts(&mut p, &mut world, &mut events));
    }

    #[test]
    fn stomp_eliminates_walker_and_bounces() {
        let mut world = world_with(vec![spawn(1000.0, EnemySpawnKind::Walker)], vec![]);
        let mut p = exposed(990.0, 55.0);
        p.prev_y = 66.0;
        p.vel_y = -4.0;
        let mut events = TickEvents::new();
        assert!(!resolve_enemy_contacts(&mut p, &mut world, &mut events));
        assert!(!world.enemies[0].alive);
        assert_eq!(p.vel_y, BOUNCE_IMPULSE);
        assert_eq!(events.as_slice(), &[SimEvent::Stomped { enemy: 0 }]);
    }

    #[test]
    fn stomped_armored_becomes_shell() {
        let mut world = world_with(vec![spawn(1000.0, EnemySpawnKind::Armored)], vec![]);
        let mut p = exposed(990.0, 62.0);
        p.prev_y = 70.0;
        p.vel_y = -4.0;
        let mut events = TickEvents::new();
        assert!(!resolve_enemy_contacts(&mut p, &mut world, &mut events));
        assert!(world.enemies[0].alive);
        assert_eq!(world.enemies[0].kind, EnemyKind::StationaryShell);
    }

    #[test]
    fn shell_struck_from_left_moves_right() {
        let mut world = world_with(vec![spawn(1000.0, EnemySpawnKind::Shell)], vec![]);
        let mut p = exposed(940.0, 30.0);
        let mut events = TickEvents::new();
        assert!(!resolve_enemy_contacts(&mut p, &mut world, &mut events));
        let shell = &world.enemies[0];
        assert!(shell.is_moving_shell());
        assert_eq!(shell.direction, 1.0);
        assert_eq!(p.vel_y, BOUNCE_IMPULSE);
        assert!(!p.on_ground);
        assert_eq!(
            events.as_slice(),
            &[SimEvent::ShellKicked {
                enemy: 0,
                direction: 1
            }]
        );

        // The kick grace spares the player on the next contact.
        assert!(!resolve_enemy_contacts(&mut p, &mut world, &mut events));
    }

    #[test]
    fn stomping_a_moving_shell_stops_it() {
        let mut world = world_with(vec![spawn(1000.0, EnemySpawnKind::Shell)], vec![]);
        world.enemies[0].kick(1.0);
        world.enemies[0].kind = EnemyKind::MovingShell { kick_grace: 0.0 };
        let mut p = exposed(990.0, 50.0);
        p.prev_y = 57.0;
        p.vel_y = -7.0;
        let mut events = TickEvents::new();
        assert!(!resolve_enemy_contacts(&mut p, &mut world, &mut events));
        assert_eq!(world.enemies[0].kind, EnemyKind::StationaryShell);
        assert_eq!(world.enemies[0].speed, 0.0);
        assert_eq!(p.vel_y, BOUNCE_IMPULSE);
        assert_eq!(events.as_slice(), &[SimEvent::Stomped { enemy: 0 }]);
    }

    #[test]
    fn moving_shell_is_lethal_from_the_side() {
        let mut world = world_with(vec![spawn(1000.0, EnemySpawnKind::Shell)], vec![]);
        world.enemies[0].kick(-1.0);
        world.enemies[0].kind = EnemyKind::MovingShell { kick_grace: 0.0 };
        let mut p = exposed(950.0, 30.0);
        let mut events = TickEvents::new();
        assert!(resolve_enemy_contacts(&mut p, &mut world, &mut events));
    }

    #[test]
    fn mines_have_no_stomp_exception() {
        let mut world = world_with(vec![spawn(1000.0, EnemySpawnKind::Mine)], vec![]);
        let mut p = exposed(990.0, 55.0);
        p.prev_y = 70.0;
        p.vel_y = -4.0;
        let mut events = TickEvents::new();
        assert!(resolve_enemy_contacts(&mut p, &mut world, &mut events));
    }

    #[test]
    fn contact_skipped_while_invulnerable_or_near_start() {
        let mut world = world_with(
            vec![spawn(1000.0, EnemySpawnKind::Mine), spawn(100.0, EnemySpawnKind::Mine)],
            vec![],
        );
        let mut events = TickEvents::new();

        let mut p = Player::spawn(990.0, 30.0);
        assert!(!resolve_enemy_contacts(&mut p, &mut world, &mut events));

        let mut near_start = exposed(90.0, 30.0);
        assert!(!resolve_enemy_contacts(&mut near_start, &mut world, &mut events));
    }

    #[test]
    fn moving_shell_takes_out_one_enemy() {
        let mut world = world_with(
            vec![
                spawn(1000.0, EnemySpawnKind::Shell),
                spawn(1030.0, EnemySpawnKind::Walker),
                spawn(1035.0, EnemySpawnKind::Walker),
            ],
            vec![],
        );
        world.enemies[0].kick(1.0);
        let mut events = TickEvents::new();
        resolve_shell_hits(&mut world, &mut events);
        assert!(!world.enemies[0].alive);
        assert!(!world.enemies[1].alive);
        assert!(world.enemies[2].alive);
        assert_eq!(events.as_slice(), &[SimEvent::ShellHit { shell: 0, victim: 1 }]);
    }

    #[test]
    fn stationary_shells_do_not_eliminate() {
        let mut world = world_with(
            vec![
                spawn(1000.0, EnemySpawnKind::Shell),
                spawn(1030.0, EnemySpawnKind::Walker),
            ],
            vec![],
        );
        let mut events = TickEvents::new();
        resolve_shell_hits(&mut world, &mut events);
        assert!(world.enemies.iter().all(|e| e.alive));
    }

    fn linked_pipes() -> Vec<PipeSpec> {
        vec![
            PipeSpec {
                x: 700.0,
                y: 30.0,
                height: 100.0,
                destination: Some(Point::new(1700.0, 30.0)),
            },
            PipeSpec {
                x: 1700.0,
                y: 30.0,
                height: 100.0,
                destination: Some(Point::new(700.0, 30.0)),
            },
        ]
    }

    #[test]
    fn pipe_shaft_blocks_from_either_side() {
        let world = world_with(vec![], linked_pipes());
        let mut p = exposed(640.0, 30.0);
        p.vel_x = 4.0;
        block_pipes(&mut p, &world);
        assert_eq!(p.x, 630.0);
        assert_eq!(p.vel_x, 0.0);

        let mut p = exposed(750.0, 30.0);
        block_pipes(&mut p, &world);
        assert_eq!(p.x, 760.0);
    }

    proptest! {
        #[test]
        fn pipe_entry_teleports_to_paired_mouth(
            x in 635.0f32..755.0,
            y in 128.0f32..142.0,
            vel_x in -4.5f32..4.5,
            vel_y in -12.0f32..12.0,
            on_ground in any::<bool>(),
        ) {
            let world = world_with(vec![], linked_pipes());
            let mut p = exposed(x, y);
            p.vel_x = vel_x;
            p.vel_y = vel_y;
            p.on_ground = on_ground;
            let down = InputState::default().with(InputSignal::Descend);
            let mut events = TickEvents::new();
            let landed = try_enter_pipe(&mut p, &world, &down, &mut events);
            prop_assert_eq!(landed, Some((1695.0, 135.0)));
            prop_assert_eq!((p.x, p.y), (1695.0, 135.0));
            prop_assert_eq!((p.vel_x, p.vel_y), (0.0, 0.0));
            prop_assert_eq!(p.standing_on, Some(PlatformKind::PipeLedge));
            prop_assert!(p.is_invulnerable());
            prop_assert_eq!(p.teleport_spin, TELEPORT_SPIN_TICKS);

            // Spinning blocks an immediate return trip.
            prop_assert_eq!(try_enter_pipe(&mut p, &world, &down, &mut events), None);
        }
    }

    #[test]
    fn pipe_entry_requires_descend_and_mouth() {
        let world = world_with(vec![], linked_pipes());
        let mut events = TickEvents::new();
        let down = InputState::default().with(InputSignal::Descend);

        let mut idle = exposed(700.0, 135.0);
        assert_eq!(try_enter_pipe(&mut idle, &world, &InputState::default(), &mut events), None);

        let mut beside = exposed(600.0, 30.0);
        assert_eq!(try_enter_pipe(&mut beside, &world, &down, &mut events), None);
    }

    #[test]
    fn bonuses_are_one_shot() {
        let mut world = world_with(vec![], vec![]);
        let p = exposed(1000.0, 30.0);
        let mut events = TickEvents::new();
        assert_eq!(collect_bonuses(&p, &mut world, &mut events), 10);
        assert_eq!(collect_bonuses(&p, &mut world, &mut events), 0);
        assert_eq!(world.bonuses.len(), 1);
    }

    #[test]
    fn goal_contact_detected() {
        let world = world_with(vec![], vec![]);
        assert!(reached_goal(&exposed(2780.0, 30.0), &world));
        assert!(!reached_goal(&exposed(2600.0, 30.0), &world));
    }
}
