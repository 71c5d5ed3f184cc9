//! Physics module - player integration and surface landing
//!
//! Every displacement and velocity change is multiplied by the speed factor,
//! and friction is applied as `friction^speed_factor`, so the same real-time
//! motion results at any refresh rate.

use crate::player::Player;
use crate::world::{Platform, PlatformKind, World};
use super_capy_types::{
    InputState, GRAVITY, RUN_ACCEL, RUN_FRICTION, RUN_MAX_SPEED, SWIM_ACCEL, SWIM_FRICTION,
    SWIM_MAX_SPEED, VELOCITY_EPSILON,
};

/// Integrate the player for one tick.
///
/// Returns `true` when the player touched down this tick after being
/// airborne.
pub fn step_player(player: &mut Player, input: &InputState, world: &World, speed_factor: f32) -> bool {
    let was_on_ground = player.on_ground;
    player.prev_y = player.y;

    // No steering mid-teleport.
    let input = if player.teleport_spin > 0.0 {
        InputState::default()
    } else {
        *input
    };

    if world.underwater {
        swim(player, &input, world, speed_factor);
    } else {
        run(player, &input, world, speed_factor);
    }

    player.on_ground && !was_on_ground
}

fn run(player: &mut Player, input: &InputState, world: &World, sf: f32) {
    player.vel_x = steer(
        player.vel_x,
        axis(input.left, input.right),
        RUN_ACCEL,
        RUN_MAX_SPEED,
        RUN_FRICTION,
        sf,
    );
    player.vel_y += GRAVITY * sf;

    player.x += player.vel_x * sf;
    player.y += player.vel_y * sf;
    clamp_horizontal(player, world);

    player.on_ground = false;
    player.standing_on = None;

    if let Some(surface) = landing_surface(player, world) {
        player.land(surface.top(), Some(surface.kind));
    } else if player.y <= 0.0 {
        player.land(0.0, None);
    }
}

fn swim(player: &mut Player, input: &InputState, world: &World, sf: f32) {
    player.vel_x = steer(
        player.vel_x,
        axis(input.left, input.right),
        SWIM_ACCEL,
        SWIM_MAX_SPEED,
        SWIM_FRICTION,
        sf,
    );
    player.vel_y = steer(
        player.vel_y,
        axis(input.descend, input.jump),
        SWIM_ACCEL,
        SWIM_MAX_SPEED,
        SWIM_FRICTION,
        sf,
    );

    player.x += player.vel_x * sf;
    player.y += player.vel_y * sf;
    clamp_horizontal(player, world);

    let ceiling = world.water_ceiling(player.height).unwrap_or(f32::MAX);
    if player.y >= ceiling {
        player.y = ceiling;
        player.vel_y = player.vel_y.min(0.0);
    }

    player.on_ground = false;
    player.standing_on = None;

    let ledge = world
        .platforms
        .iter()
        .find(|p| p.kind == PlatformKind::PipeLedge && crosses_top(player, p));
    if let Some(ledge) = ledge {
        player.land(ledge.top(), Some(PlatformKind::PipeLedge));
    } else if player.y <= 0.0 {
        player.land(0.0, None);
    }
}

/// First platform in generation order the player lands on this tick.
fn landing_surface<'a>(player: &Player, world: &'a World) -> Option<&'a Platform> {
    if player.vel_y > 0.0 {
        return None;
    }
    world.platforms.iter().find(|p| match p.kind {
        PlatformKind::Ground => {
            let over = player.bounds().overlaps_x(&p.bounds());
            // Feet that started the tick inside the body are lifted too.
            over && player.y <= p.top() && player.prev_y >= p.y
        }
        PlatformKind::Elevated if player.drop_through > 0.0 => false,
        PlatformKind::Elevated | PlatformKind::PipeLedge => crosses_top(player, p),
    })
}

/// Descending, previous feet at or above the top, current feet at or below.
fn crosses_top(player: &Player, platform: &Platform) -> bool {
    player.vel_y < 0.0
        && player.prev_y >= platform.top()
        && player.y <= platform.top()
        && player.bounds().overlaps_x(&platform.bounds())
}

fn clamp_horizontal(player: &mut Player, world: &World) {
    let max_x = (world.width - player.width).max(0.0);
    if player.x < 0.0 {
        player.x = 0.0;
        player.vel_x = player.vel_x.max(0.0);
    } else if player.x > max_x {
        player.x = max_x;
        player.vel_x = player.vel_x.min(0.0);
    }
}

fn axis(negative: bool, positive: bool) -> f32 {
    match (negative, positive) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}

/// Accelerate along `dir`, or decay exponentially when no direction is held.
fn steer(vel: f32, dir: f32, accel: f32, max: f32, friction: f32, sf: f32) -> f32 {
    if dir != 0.0 {
        (vel + accel * dir * sf).clamp(-max, max)
    } else {
        let decayed = vel * friction.powf(sf);
        if decayed.abs() < VELOCITY_EPSILON {
            0.0
        } else {
            decayed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super_capy_types::{
        InputSignal, LevelDescriptor, PipeSpec, RectSpec, TravelDirection, GOAL_HEIGHT,
        GOAL_WIDTH, RUN_MAX_SPEED,
    };
    use proptest::prelude::*;

    fn flat(platforms: Vec<RectSpec>) -> World {
        World::from_descriptor(&LevelDescriptor {
            width: 2000.0,
            ground_height: 80.0,
            underwater: false,
            max_height: None,
            start_x: 50.0,
            direction: TravelDirection::Right,
            platforms,
            enemies: vec![],
            bonuses: vec![],
            pipes: vec![],
            goal: RectSpec::new(1900.0, 30.0, GOAL_WIDTH, GOAL_HEIGHT),
        })
    }

    fn water(max_height: f32) -> World {
        World::from_descriptor(&LevelDescriptor {
            width: 2000.0,
            ground_height: 0.0,
            underwater: true,
            max_height: Some(max_height),
            start_x: 50.0,
            direction: TravelDirection::Right,
            platforms: vec![],
            enemies: vec![],
            bonuses: vec![],
            pipes: vec![PipeSpec {
                x: 400.0,
                y: 0.0,
                height: 60.0,
                destination: None,
            }],
            goal: RectSpec::new(1900.0, 0.0, GOAL_WIDTH, GOAL_HEIGHT),
        })
    }

    #[test]
    fn standing_player_stays_grounded() {
        let world = flat(vec![RectSpec::new(0.0, 0.0, 2000.0, 30.0)]);
        let mut p = Player::spawn(100.0, 30.0);
        for _ in 0..100 {
            step_player(&mut p, &InputState::default(), &world, 1.0);
            assert_eq!(p.y, 30.0);
            assert!(p.on_ground);
        }
    }

    #[test]
    fn run_speed_is_clamped() {
        let world = flat(vec![RectSpec::new(0.0, 0.0, 2000.0, 30.0)]);
        let mut p = Player::spawn(100.0, 30.0);
        let right = InputState::default().with(InputSignal::Right);
        for _ in 0..60 {
            step_player(&mut p, &right, &world, 1.0);
        }
        assert_eq!(p.vel_x, RUN_MAX_SPEED);
        for _ in 0..100 {
            step_player(&mut p, &InputState::default(), &world, 1.0);
        }
        assert_eq!(p.vel_x, 0.0);
    }

    proptest! {
        #[test]
        fn falling_player_lands_on_elevated_platform(
            x in 40.0f32..250.0,
            vel_x in -4.5f32..4.5,
            above in 0.0f32..40.0,
            overshoot in 0.0f32..15.0,
        ) {
            let world = flat(vec![
                RectSpec::new(0.0, 0.0, 2000.0, 30.0),
                RectSpec::new(100.0, 150.0, 200.0, 20.0),
            ]);
            let mut p = Player::spawn(x, 170.0 + above);
            p.on_ground = false;
            p.vel_x = vel_x;
            p.vel_y = -(above + overshoot);
            let landed = step_player(&mut p, &InputState::default(), &world, 1.0);
            prop_assert!(landed);
            prop_assert_eq!(p.y, 170.0);
            prop_assert_eq!(p.vel_y, 0.0);
            prop_assert_eq!(p.standing_on, Some(PlatformKind::Elevated));
        }
    }

    #[test]
    fn rising_player_passes_through_platform_underside() {
        let world = flat(vec![
            RectSpec::new(0.0, 0.0, 2000.0, 30.0),
            RectSpec::new(100.0, 100.0, 200.0, 20.0),
        ]);
        let mut p = Player::spawn(150.0, 30.0);
        p.try_jump();
        for _ in 0..10 {
            step_player(&mut p, &InputState::default(), &world, 1.0);
        }
        assert!(p.y > 120.0, "{}", p.y);
        assert!(!p.on_ground);
    }

    #[test]
    fn drop_through_ignores_elevated_platforms() {
        let world = flat(vec![
            RectSpec::new(0.0, 0.0, 2000.0, 30.0),
            RectSpec::new(100.0, 150.0, 200.0, 20.0),
        ]);
        let mut p = Player::spawn(150.0, 170.0);
        p.drop_through = 18.0;
        step_player(&mut p, &InputState::default(), &world, 1.0);
        assert!(p.y < 170.0);
        assert!(!p.on_ground);
    }

    #[test]
    fn walking_into_a_gap_floor_is_not_fatal() {
        let world = flat(vec![RectSpec::new(0.0, 0.0, 300.0, 30.0)]);
        let mut p = Player::spawn(600.0, 30.0);
        for _ in 0..60 {
            step_player(&mut p, &InputState::default(), &world, 1.0);
        }
        assert_eq!(p.y, 0.0);
        assert!(p.on_ground);
    }

    #[test]
    fn walking_out_of_a_gap_steps_onto_ground() {
        let world = flat(vec![
            RectSpec::new(0.0, 0.0, 300.0, 30.0),
            RectSpec::new(450.0, 0.0, 1550.0, 30.0),
        ]);
        let mut p = Player::spawn(340.0, 0.0);
        let right = InputState::default().with(InputSignal::Right);
        for _ in 0..80 {
            step_player(&mut p, &right, &world, 1.0);
        }
        assert!(p.x > 450.0);
        assert_eq!(p.y, 30.0);
        assert!(p.on_ground);
        assert_eq!(p.standing_on, Some(PlatformKind::Ground));
    }

    #[test]
    fn underwater_player_stays_inside_water() {
        let world = water(320.0);
        let mut p = Player::spawn(100.0, 0.0);
        let up = InputState::default().with(InputSignal::Jump);
        for _ in 0..400 {
            step_player(&mut p, &up, &world, 1.0);
            assert!(p.y >= 0.0 && p.y + p.height <= 320.0);
        }
        assert_eq!(p.y, 250.0);
        let down = InputState::default().with(InputSignal::Descend);
        for _ in 0..400 {
            step_player(&mut p, &down, &world, 1.0);
            assert!(p.y >= 0.0 && p.y + p.height <= 320.0);
        }
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn underwater_has_no_gravity() {
        let world = water(400.0);
        let mut p = Player::spawn(100.0, 200.0);
        for _ in 0..30 {
            step_player(&mut p, &InputState::default(), &world, 1.0);
        }
        assert_eq!(p.y, 200.0);
    }

    #[test]
    fn same_distance_at_double_refresh_rate() {
        let world = flat(vec![RectSpec::new(0.0, 0.0, 2000.0, 30.0)]);
        let right = InputState::default().with(InputSignal::Right);
        let mut slow = Player::spawn(100.0, 30.0);
        let mut fast = Player::spawn(100.0, 30.0);
        for _ in 0..120 {
            step_player(&mut slow, &right, &world, 1.0);
        }
        for _ in 0..240 {
            step_player(&mut fast, &right, &world, 0.5);
        }
        assert!((slow.x - fast.x).abs() < 10.0, "{} vs {}", slow.x, fast.x);
    }
}
