//! Per-tick collision and support policy
//!
//! Order within a tick:
//! 1. Spawn the player if absent
//! 2. Controls, gravity and rolling spin
//! 3. Obstacles (reset or inelastic stop) and boost pads
//! 4. Platform support: goal, regained, lost, or fall deadline
//! 5. Floor clamp (skipped while falling)
//!
//! Integration (`Body::advance`) happens afterwards in the engine.

use glam::{Vec2, Vec3};

use super::body::Body;
use super::collider::ColliderCatalog;
use super::input::InputState;
use super::level::{BoostPad, Level};
use super::state::{GameEvent, GamePhase, GameState, World};
use crate::settings::{CollisionResponse, Settings};

/// How close to the floor counts as standing on it
pub const GROUND_EPSILON: f32 = 1e-3;

/// Shared read-only inputs to the policy
#[derive(Debug, Clone, Copy)]
pub struct PolicyContext<'a> {
    pub settings: &'a Settings,
    pub catalog: &'a ColliderCatalog,
}

/// Run one tick of the policy against `level`
pub fn run_tick(
    world: &mut World,
    level: &mut Level,
    ctx: PolicyContext<'_>,
    input: &InputState,
    dt: f32,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let World { player, game } = world;
    game.elapsed_ticks += 1;
    let now = game.elapsed_ticks;

    if player.is_none() {
        events.push(GameEvent::Spawned);
        *player = Some(level.spawn_player());
    }
    let Some(body) = player.as_mut() else {
        return events;
    };

    let grounded = is_grounded(body, game, ctx.settings);
    if apply_controls(body, input, ctx.settings, dt, grounded) {
        events.push(GameEvent::Jumped);
    }
    body.refresh_inverse();

    if let Some(event) = resolve_obstacles(body, &level.obstacles, ctx) {
        events.push(event);
        if matches!(event, GameEvent::ObstacleReset { .. }) {
            log::info!("Obstacle hit, resetting");
            *player = None;
            game.reset();
            return events;
        }
    }
    events.extend(resolve_boosts(body, &mut level.boosts, ctx.catalog, now));

    if let Some(event) = resolve_support(body, level, game, ctx.settings) {
        events.push(event);
        if event == GameEvent::FellOut {
            log::info!("Fell for too long, resetting");
            *player = None;
            game.reset();
            return events;
        }
    }

    clamp_floor(body, game, ctx.settings);
    events
}

/// Standing on a surface this tick (jumps allowed)
pub fn is_grounded(player: &Body, game: &GameState, settings: &Settings) -> bool {
    game.phase == GamePhase::Playing && player.center.y <= settings.floor_y + GROUND_EPSILON
}

/// Movement acceleration, drag, jump, gravity and rolling spin. Returns true on a jump.
pub fn apply_controls(
    player: &mut Body,
    input: &InputState,
    settings: &Settings,
    dt: f32,
    grounded: bool,
) -> bool {
    let (x, z) = input.move_axes();
    let wish = Vec2::new(x, z).normalize_or_zero();

    let mut planar = Vec2::new(player.linear_velocity.x, player.linear_velocity.z);
    planar += wish * settings.move_accel * dt;
    planar *= (1.0 - settings.air_drag * dt).max(0.0);
    planar = planar.clamp_length_max(settings.max_speed);
    player.linear_velocity.x = planar.x;
    player.linear_velocity.z = planar.y;

    let jumped = input.jump && grounded;
    if jumped {
        player.linear_velocity.y = settings.jump_speed;
    }
    player.linear_velocity.y -= settings.gravity * dt;

    // Roll without slipping: ω = up × v / r
    let radius = player.scale.max_element().max(f32::EPSILON);
    let rolling = Vec3::new(planar.x, 0.0, planar.y);
    player.angular_velocity = Vec3::Y.cross(rolling) / radius;

    jumped
}

/// Test the player against every obstacle and apply the configured response
pub fn resolve_obstacles(
    player: &mut Body,
    obstacles: &[Body],
    ctx: PolicyContext<'_>,
) -> Option<GameEvent> {
    let mut result = None;
    for (index, obstacle) in obstacles.iter().enumerate() {
        let proxy = ctx.catalog.get(obstacle.collider);
        if !obstacle.check_if_colliding(player, proxy) {
            continue;
        }
        log::debug!("Player touched obstacle {}", index);
        match ctx.settings.collision_response {
            CollisionResponse::Reset => return Some(GameEvent::ObstacleReset { index }),
            CollisionResponse::InelasticStop => {
                stop_into(player, obstacle.center);
                result = Some(GameEvent::ObstacleStop { index });
            }
        }
    }
    result
}

/// Cancel the velocity component pointing from the player toward `obstacle_center`
pub fn stop_into(player: &mut Body, obstacle_center: Vec3) {
    let normal = (player.center - obstacle_center).normalize_or_zero();
    let into = player.linear_velocity.dot(normal);
    if into < 0.0 {
        player.linear_velocity -= normal * into;
    }
}

/// Fire every ready pad the player overlaps
pub fn resolve_boosts(
    player: &mut Body,
    pads: &mut [BoostPad],
    catalog: &ColliderCatalog,
    now: u64,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for (index, pad) in pads.iter_mut().enumerate() {
        if !pad.is_ready(now) {
            continue;
        }
        if pad.body.check_if_colliding(player, catalog.get(pad.body.collider)) {
            player.linear_velocity += pad.impulse;
            pad.trigger(now);
            events.push(GameEvent::Boosted { index });
        }
    }
    events
}

/// Platform support and the falling state machine
pub fn resolve_support(
    player: &mut Body,
    level: &Level,
    game: &mut GameState,
    settings: &Settings,
) -> Option<GameEvent> {
    let center = player.center;
    // Sunk too deep to climb back onto anything
    let recoverable = center.y >= settings.floor_y - settings.recover_depth;
    let on_goal = recoverable
        && level
            .platforms
            .get(level.goal)
            .is_some_and(|goal| goal.contains(center));
    let supported = recoverable && level.platforms.iter().any(|p| p.contains(center));

    if on_goal {
        game.complete();
        log::info!("Goal reached after {} ticks", game.elapsed_ticks);
        return Some(GameEvent::Completed);
    }

    if supported {
        if game.regain_support() {
            log::info!("Support regained, fall cancelled");
            return Some(GameEvent::SupportRegained);
        }
        return None;
    }

    match game.phase {
        GamePhase::Playing => {
            game.begin_fall(settings.fall_grace_ticks());
            player.linear_velocity.y -= settings.fall_kick;
            log::info!("Support lost at {:?}", center);
            Some(GameEvent::SupportLost)
        }
        GamePhase::Falling if game.fall_deadline_reached() => Some(GameEvent::FellOut),
        _ => None,
    }
}

/// Stop downward motion at the floor unless falling
pub fn clamp_floor(player: &mut Body, game: &GameState, settings: &Settings) -> bool {
    if game.phase == GamePhase::Falling {
        return false;
    }
    if player.center.y <= settings.floor_y && player.linear_velocity.y < 0.0 {
        player.linear_velocity.y = 0.0;
        player.center.y = settings.floor_y;
        return true;
    }
    false
}
