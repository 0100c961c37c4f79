//! Simulation engine: stepper + scenario + world
//!
//! The host calls `display` (or `simulate`) once per frame with elapsed real
//! time, feeds input through `input_mut`, and asks for the draw sets after.

use super::draw::{DrawSets, Drawable};
use super::input::{InputCollector, InputState};
use super::scenario::Scenario;
use super::state::{GameEvent, GamePhase, World};
use super::stepper::{StepReport, Steppable, Stepper};
use crate::error::ConfigError;
use crate::settings::Settings;

/// Drives a `Scenario` at a fixed rate
pub struct Engine<S: Scenario> {
    stepper: Stepper,
    runtime: Runtime<S>,
}

/// Everything the stepper mutates per tick
struct Runtime<S: Scenario> {
    scenario: S,
    world: World,
    input: InputCollector,
    events: Vec<GameEvent>,
    last_phase: GamePhase,
    telemetry_ticks: Option<u64>,
}

impl<S: Scenario> Runtime<S> {
    fn restart(&mut self) {
        log::info!("Restart requested ({:?})", self.world.game.phase);
        self.world.reset();
        self.scenario.on_reset();
        self.events.push(GameEvent::Restarted);
    }

    fn note_phase(&mut self) {
        let phase = self.world.game.phase;
        if phase != self.last_phase {
            log::info!("Phase {:?} -> {:?}", self.last_phase, phase);
            self.last_phase = phase;
        }
    }
}

impl<S: Scenario> Steppable for Runtime<S> {
    fn tick(&mut self, dt: f32, step: u64) {
        let input = self.input.snapshot(step);

        if input.restart {
            self.restart();
        }
        if input.pause
            && let Some(event) = self.world.game.toggle_pause()
        {
            self.events.push(event);
        }

        if self.world.game.phase.is_simulating() {
            let events = self.scenario.update_state(&mut self.world, &input, dt);
            if events.contains(&GameEvent::Jumped) {
                self.input.consume_jump();
            }
            self.events.extend(events);

            // Reaching the goal this tick freezes the player where it stands
            if self.world.game.phase.is_simulating()
                && let Some(player) = self.world.player.as_mut()
            {
                player.advance(dt);
            }
        }
        if !self.world.game.phase.is_simulating()
            && let Some(player) = self.world.player.as_mut()
        {
            player.hold_pose();
        }
        self.note_phase();

        if let Some(every) = self.telemetry_ticks
            && step % every == 0
            && let Some(line) = self.scenario.telemetry(&self.world)
        {
            log::debug!("{}", line);
        }
    }

    fn blend(&mut self, alpha: f32) {
        if let Some(player) = self.world.player.as_mut() {
            player.blend_state(alpha);
        }
    }
}

impl<S: Scenario> Engine<S> {
    /// Validate `settings`, hand them to `scenario`, validate it, then build
    /// an engine at rest
    pub fn new(mut scenario: S, settings: &Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        scenario.configure(settings);
        scenario.validate()?;

        let mut stepper = Stepper::new(settings.dt, settings.max_frame_time);
        stepper.time_scale = settings.time_scale;
        log::info!(
            "Engine ready: scenario '{}', dt {:.4}s, frame cap {:.3}s",
            scenario.name(),
            settings.dt,
            settings.max_frame_time
        );

        Ok(Self {
            stepper,
            runtime: Runtime {
                scenario,
                world: World::new(),
                input: InputCollector::new(settings.jump_buffer_ticks(), settings.command_ttl_ticks()),
                events: Vec::new(),
                last_phase: GamePhase::Playing,
                telemetry_ticks: settings.telemetry_ticks(),
            },
        })
    }

    /// Feed one frame of real time through the fixed stepper
    pub fn simulate(&mut self, frame_time: f32) -> StepReport {
        self.stepper.simulate(frame_time, &mut self.runtime)
    }

    /// Host per-frame callback: mirror `input`, then simulate if animating
    pub fn display(&mut self, frame_secs: f32, animate: bool, input: &InputState) -> Option<StepReport> {
        self.runtime.input.apply(input);
        animate.then(|| self.simulate(frame_secs))
    }

    /// Host-side input flags
    pub fn input_mut(&mut self) -> &mut InputCollector {
        &mut self.runtime.input
    }

    /// Force `Playing` with a fresh player (spawned on the next tick)
    pub fn reset(&mut self) {
        self.runtime.restart();
        self.runtime.note_phase();
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        if scale.is_finite() {
            self.stepper.time_scale = scale;
        } else {
            log::warn!("Ignoring non-finite time scale {}", scale);
        }
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.stepper.time_scale
    }

    /// Both draw passes at the blended poses
    pub fn drawables(&self) -> DrawSets {
        self.runtime.scenario.enumerate_drawables(&self.runtime.world)
    }

    pub fn render_scene_normal(&self) -> Vec<Drawable> {
        self.drawables().normal
    }

    pub fn render_scene_blurred(&self) -> Vec<Drawable> {
        self.drawables().blurred
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.runtime.world
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.runtime.world.game.phase
    }

    #[inline]
    pub fn stepper(&self) -> &Stepper {
        &self.stepper
    }

    #[inline]
    pub fn scenario(&self) -> &S {
        &self.runtime.scenario
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.runtime.events)
    }
}
