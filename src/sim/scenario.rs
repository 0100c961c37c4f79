//! The per-game extension point driven by the engine

use super::draw::DrawSets;
use super::input::InputState;
use super::state::{GameEvent, World};
use crate::error::ConfigError;
use crate::settings::Settings;

/// A concrete game built on the engine.
///
/// `update_state` has no default: a scenario that does not say what happens
/// each tick is not a scenario.
pub trait Scenario {
    fn name(&self) -> &str;

    /// Adopt the engine's settings. `Engine::new` calls this before
    /// `validate`, so the policy and the stepper run on the same tunables.
    fn configure(&mut self, _settings: &Settings) {}

    /// Checked once when the engine is built
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Game policy for one fixed tick, run before the player integrates.
    /// Only called while the phase is `Playing` or `Falling`.
    fn update_state(&mut self, world: &mut World, input: &InputState, dt: f32) -> Vec<GameEvent>;

    /// Everything to draw, at the blended poses
    fn enumerate_drawables(&self, world: &World) -> DrawSets;

    /// Called after an external restart so level state (cooldowns etc.) can rewind
    fn on_reset(&mut self) {}

    /// Short human-readable status line for periodic logging
    fn telemetry(&self, world: &World) -> Option<String> {
        world.player.as_ref().map(|p| {
            format!(
                "{} {:?} center=({:.2}, {:.2}, {:.2})",
                self.name(),
                world.game.phase,
                p.center.x,
                p.center.y,
                p.center.z
            )
        })
    }
}
