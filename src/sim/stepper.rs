//! Fixed timestep stepping
//!
//! Frame time goes into an accumulator; the accumulator is drained in whole
//! `dt` ticks and whatever is left sets the blend fraction for rendering.
//! Per-call contribution is capped so a stalled host never queues more than
//! one lag unit of catch-up work.

use crate::sign;

/// Largest f32 below 1.0 (one ulp under), the upper bound handed to `blend`
pub const ALPHA_MAX: f32 = 1.0 - f32::EPSILON / 2.0;

/// Receives fixed ticks and the final blend from the stepper
pub trait Steppable {
    /// One fixed step. `step` is the stepper's running tick counter.
    fn tick(&mut self, dt: f32, step: u64);
    /// Called once per `simulate` with the leftover fraction in [0, 1)
    fn blend(&mut self, alpha: f32);
}

/// What one `simulate` call did
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepReport {
    /// Fixed ticks run
    pub ticks: u32,
    /// Blend fraction handed to `Steppable::blend`
    pub alpha: f32,
    /// Frame time exceeded the cap and was clamped
    pub clamped: bool,
}

/// Accumulator-driven fixed-step clock
#[derive(Debug, Clone)]
pub struct Stepper {
    dt: f32,
    max_frame_time: f32,
    /// Frame time multiplier; negative runs the clock backward
    pub time_scale: f32,
    accumulator: f32,
    t: f64,
    steps_taken: u64,
    clamped_frames: u64,
}

impl Stepper {
    /// `dt` is fixed for the life of the stepper
    pub fn new(dt: f32, max_frame_time: f32) -> Self {
        Self {
            dt,
            max_frame_time,
            time_scale: 1.0,
            accumulator: 0.0,
            t: 0.0,
            steps_taken: 0,
            clamped_frames: 0,
        }
    }

    /// Advance by one host frame, running zero or more fixed ticks on `target`
    pub fn simulate<S: Steppable>(&mut self, frame_time: f32, target: &mut S) -> StepReport {
        let scaled = frame_time * self.time_scale;
        let frame = if scaled.is_finite() { scaled } else { 0.0 };
        let capped = frame.clamp(-self.max_frame_time, self.max_frame_time);
        let clamped = capped != frame;
        if clamped {
            self.clamped_frames += 1;
            log::warn!(
                "Frame time {:.3}s exceeds cap, clamped to {:.3}s",
                frame,
                capped
            );
        }
        self.accumulator += capped;

        let mut ticks = 0;
        while self.accumulator.abs() >= self.dt {
            // Only the side that was just pushed past dt can be the sign here
            let direction = sign(self.accumulator);
            target.tick(self.dt, self.steps_taken);
            self.t += f64::from(direction * self.dt);
            self.accumulator -= direction * self.dt;
            self.steps_taken += 1;
            ticks += 1;
        }

        let alpha = self.alpha();
        target.blend(alpha);

        StepReport {
            ticks,
            alpha,
            clamped,
        }
    }

    /// Leftover fraction of a tick, always in [0, 1)
    pub fn alpha(&self) -> f32 {
        let alpha = self.accumulator.abs() / self.dt;
        // f32 rounding can land exactly on 1.0
        alpha.min(ALPHA_MAX)
    }

    #[inline]
    pub fn dt(&self) -> f32 {
        self.dt
    }

    #[inline]
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Simulated clock (seconds, signed)
    #[inline]
    pub fn time(&self) -> f64 {
        self.t
    }

    #[inline]
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Number of frames whose time had to be clamped
    #[inline]
    pub fn clamped_frames(&self) -> u64 {
        self.clamped_frames
    }
}
