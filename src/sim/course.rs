//! The platform-hopping course: a `Scenario` built from a `Level`
//!
//! Platforms run away from the start along -z. The last one is the goal.

use glam::{Mat4, Quat, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::Body;
use super::collider::{ColliderCatalog, ColliderId};
use super::draw::{DrawSets, Drawable, MaterialHandle, ShapeHandle};
use super::input::InputState;
use super::level::{BoostPad, Level};
use super::platform::PlatformQuad;
use super::policy::{self, PolicyContext};
use super::scenario::Scenario;
use super::state::{GameEvent, World};
use crate::consts::*;
use crate::error::ConfigError;
use crate::settings::Settings;

/// Depth of the slab drawn under each platform surface
pub const PLATFORM_THICKNESS: f32 = 0.5;

/// Platforms laid out by `Course::generated` after the start pad
const GENERATED_HOPS: usize = 7;

/// Opaque renderer handles for each kind of thing on the course
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseAssets {
    pub player_shape: ShapeHandle,
    pub player_material: MaterialHandle,
    pub platform_shape: ShapeHandle,
    pub platform_material: MaterialHandle,
    pub goal_material: MaterialHandle,
    pub sphere_shape: ShapeHandle,
    pub cube_shape: ShapeHandle,
    pub obstacle_material: MaterialHandle,
    pub boost_material: MaterialHandle,
}

impl Default for CourseAssets {
    fn default() -> Self {
        Self {
            player_shape: ShapeHandle(0),
            player_material: MaterialHandle(0),
            platform_shape: ShapeHandle(1),
            platform_material: MaterialHandle(1),
            goal_material: MaterialHandle(2),
            sphere_shape: ShapeHandle(2),
            cube_shape: ShapeHandle(3),
            obstacle_material: MaterialHandle(3),
            boost_material: MaterialHandle(4),
        }
    }
}

/// A concrete game: one level, its tunables and the collider catalog
#[derive(Debug, Clone)]
pub struct Course {
    pub level: Level,
    pub assets: CourseAssets,
    settings: Settings,
    catalog: ColliderCatalog,
    /// Template kept for `on_reset`
    initial_level: Level,
}

impl Course {
    pub fn new(level: Level, assets: CourseAssets) -> Self {
        let mut level = level;
        level.refresh_inverses();
        let settings = Settings::default();
        Self {
            initial_level: level.clone(),
            level,
            assets,
            catalog: ColliderCatalog::standard(settings.collider_leeway),
            settings,
        }
    }

    /// Use `settings` for the policy outside an engine (an engine overrides
    /// them with its own on construction)
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.configure(settings);
        self
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn catalog(&self) -> &ColliderCatalog {
        &self.catalog
    }

    /// Deterministic course from `seed`: a chain of jumpable platforms with a
    /// few obstacles and boost pads, ending at the goal
    pub fn generated(seed: u64, assets: CourseAssets) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut platforms = vec![PlatformQuad::axis_aligned(Vec3::ZERO, 12.0, 12.0)];
        let mut obstacles = Vec::new();
        let mut boosts = Vec::new();

        let mut center = Vec3::ZERO;
        let mut prev_depth = 12.0;
        for hop in 1..=GENERATED_HOPS {
            let width = rng.random_range(6.0..12.0);
            let depth = rng.random_range(6.0..12.0);
            let gap = rng.random_range(1.5..4.0);
            let drift = rng.random_range(-4.0..4.0);
            let yaw = rng.random_range(-0.35..0.35);

            center += Vec3::new(drift, 0.0, -(prev_depth / 2.0 + gap + depth / 2.0));
            prev_depth = depth;
            platforms.push(PlatformQuad::rotated(center, width, depth, yaw));

            if hop == GENERATED_HOPS {
                break;
            }

            // Hazards sit to one side so there is always a clear line
            if rng.random_bool(0.5) {
                let side = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                let at = center + Vec3::new(side * width / 4.0, FLOOR_Y, 0.0);
                let (shape, collider) = if rng.random_bool(0.5) {
                    (assets.sphere_shape, ColliderId::Sphere)
                } else {
                    (assets.cube_shape, ColliderId::Cube)
                };
                let radius = rng.random_range(0.6..1.2);
                obstacles.push(
                    Body::new(shape, assets.obstacle_material, collider).placed(
                        Mat4::from_scale_rotation_translation(
                            Vec3::splat(radius),
                            Quat::from_rotation_y(yaw),
                            at,
                        ),
                        Vec3::ZERO,
                        Vec3::ZERO,
                    ),
                );
            } else if rng.random_bool(0.5) {
                let pad = Body::new(assets.cube_shape, assets.boost_material, ColliderId::Cube)
                    .placed(
                        Mat4::from_scale_rotation_translation(
                            Vec3::new(1.5, 0.5, 1.5),
                            Quat::IDENTITY,
                            center,
                        ),
                        Vec3::ZERO,
                        Vec3::ZERO,
                    );
                boosts.push(BoostPad::new(pad, Vec3::new(0.0, 5.0, -6.0), 100));
            }
        }

        let goal = platforms.len() - 1;
        let level = Level {
            platforms,
            goal,
            obstacles,
            boosts,
            player_template: Body::new(
                assets.player_shape,
                assets.player_material,
                ColliderId::Sphere,
            ),
            start: Mat4::from_scale_rotation_translation(
                Vec3::splat(PLAYER_RADIUS),
                Quat::IDENTITY,
                Vec3::new(0.0, FLOOR_Y, 0.0),
            ),
        };
        log::info!(
            "Generated course (seed {}): {} platforms, {} obstacles, {} boosts",
            seed,
            level.platforms.len(),
            level.obstacles.len(),
            level.boosts.len()
        );
        Self::new(level, assets)
    }
}

impl Scenario for Course {
    fn name(&self) -> &str {
        "course"
    }

    fn configure(&mut self, settings: &Settings) {
        // Catalog leeway follows the settings
        self.catalog = ColliderCatalog::standard(settings.collider_leeway);
        self.settings = settings.clone();
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.settings.validate()?;
        self.level.validate()
    }

    fn update_state(&mut self, world: &mut World, input: &InputState, dt: f32) -> Vec<GameEvent> {
        let ctx = PolicyContext {
            settings: &self.settings,
            catalog: &self.catalog,
        };
        policy::run_tick(world, &mut self.level, ctx, input, dt)
    }

    fn enumerate_drawables(&self, world: &World) -> DrawSets {
        let mut sets = DrawSets::default();
        for (i, platform) in self.level.platforms.iter().enumerate() {
            let transform = platform.model_transform(PLATFORM_THICKNESS);
            if i == self.level.goal {
                sets.push_glowing(Drawable::new(
                    self.assets.platform_shape,
                    transform,
                    self.assets.goal_material,
                ));
            } else {
                sets.normal.push(Drawable::new(
                    self.assets.platform_shape,
                    transform,
                    self.assets.platform_material,
                ));
            }
        }
        for obstacle in &self.level.obstacles {
            sets.normal.push(obstacle.drawable());
        }
        for pad in &self.level.boosts {
            sets.push_glowing(pad.body.drawable());
        }
        if let Some(player) = &world.player {
            sets.push_glowing(player.drawable());
        }
        sets
    }

    fn on_reset(&mut self) {
        self.level = self.initial_level.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;

    #[test]
    fn test_generated_is_deterministic() {
        let a = Course::generated(7, CourseAssets::default());
        let b = Course::generated(7, CourseAssets::default());
        assert_eq!(a.level.platforms, b.level.platforms);
        assert_eq!(a.level.obstacles.len(), b.level.obstacles.len());
        let c = Course::generated(8, CourseAssets::default());
        assert_ne!(a.level.platforms, c.level.platforms);
    }

    #[test]
    fn test_generated_course_is_valid() {
        for seed in 0..20 {
            let course = Course::generated(seed, CourseAssets::default());
            assert!(course.validate().is_ok(), "seed {seed}");
            assert_eq!(course.level.goal, course.level.platforms.len() - 1);
            assert!(course.level.platforms[0].contains(Vec3::new(0.0, FLOOR_Y, 0.0)));
        }
    }

    #[test]
    fn test_obstacles_leave_the_start_clear() {
        for seed in 0..20 {
            let course = Course::generated(seed, CourseAssets::default());
            let player = course.level.spawn_player();
            for obstacle in &course.level.obstacles {
                let proxy = course.catalog().get(obstacle.collider);
                assert!(!obstacle.check_if_colliding(&player, proxy), "seed {seed}");
            }
        }
    }

    #[test]
    fn test_update_spawns_and_draws_player() {
        let mut course = Course::generated(3, CourseAssets::default());
        let mut world = World::new();
        let events = course.update_state(&mut world, &InputState::default(), SIM_DT);
        assert_eq!(events.first(), Some(&GameEvent::Spawned));
        assert_eq!(world.game.phase, GamePhase::Playing);

        let sets = course.enumerate_drawables(&world);
        let assets = course.assets;
        assert!(sets.blurred.iter().any(|d| d.shape == assets.player_shape));
        assert!(sets.blurred.iter().any(|d| d.material == assets.goal_material));
        let platforms = sets
            .normal
            .iter()
            .filter(|d| d.shape == assets.platform_shape)
            .count();
        assert_eq!(platforms, course.level.platforms.len());
    }

    #[test]
    fn test_configure_rebuilds_catalog() {
        let settings = Settings {
            collider_leeway: 0.4,
            gravity: 3.0,
            ..Default::default()
        };
        let course = Course::generated(3, CourseAssets::default()).with_settings(&settings);
        assert_eq!(course.settings(), &settings);
        assert_eq!(course.catalog().get(ColliderId::Cube).leeway(), 0.4);
    }

    #[test]
    fn test_reset_rearms_level() {
        let mut course = Course::generated(3, CourseAssets::default());
        for pad in &mut course.level.boosts {
            pad.trigger(10);
        }
        course.on_reset();
        assert!(course.level.boosts.iter().all(|p| p.is_ready(0)));
    }
}
