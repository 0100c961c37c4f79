//! Player input
//!
//! The host flips flags on an `InputCollector` whenever its key handlers fire.
//! Once per tick the engine takes an immutable `InputState` snapshot. Presses
//! that must outlive a quick tap (jump) or fire exactly once (pause, restart)
//! are recorded as expiring commands stamped with the simulated tick.

use serde::{Deserialize, Serialize};

/// Immutable per-tick view of the controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    /// Jump held or buffered
    pub jump: bool,
    /// One-shot: reset to the start pose
    pub restart: bool,
    /// One-shot: toggle pause
    pub pause: bool,
}

impl InputState {
    /// Movement intent on the horizontal plane as (x, z), not normalized
    pub fn move_axes(&self) -> (f32, f32) {
        let x = (self.right as i8 - self.left as i8) as f32;
        // Forward is -z
        let z = (self.backward as i8 - self.forward as i8) as f32;
        (x, z)
    }
}

/// Host-side controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
    Restart,
    Pause,
}

/// A press that stays live for `ttl` ticks after `issued_at` unless consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiringCommand {
    pub issued_at: u64,
    pub ttl: u64,
}

impl ExpiringCommand {
    #[inline]
    pub fn is_live(&self, now: u64) -> bool {
        now.saturating_sub(self.issued_at) <= self.ttl
    }
}

/// Mutable input flags owned by the host
#[derive(Debug, Clone, Default)]
pub struct InputCollector {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    jump_held: bool,
    restart_held: bool,
    pause_held: bool,
    jump_buffer: Option<ExpiringCommand>,
    restart: Option<ExpiringCommand>,
    pause: Option<ExpiringCommand>,
    /// Latest tick seen by `snapshot`, used to stamp presses
    now: u64,
    jump_buffer_ticks: u64,
    command_ttl_ticks: u64,
}

impl InputCollector {
    pub fn new(jump_buffer_ticks: u64, command_ttl_ticks: u64) -> Self {
        Self {
            jump_buffer_ticks,
            command_ttl_ticks,
            ..Default::default()
        }
    }

    /// Key handler entry point
    pub fn set(&mut self, control: Control, pressed: bool) {
        match control {
            Control::Forward => self.forward = pressed,
            Control::Backward => self.backward = pressed,
            Control::Left => self.left = pressed,
            Control::Right => self.right = pressed,
            Control::Jump => {
                if pressed && !self.jump_held {
                    self.jump_buffer = Some(ExpiringCommand {
                        issued_at: self.now,
                        ttl: self.jump_buffer_ticks,
                    });
                }
                self.jump_held = pressed;
            }
            Control::Restart => {
                if pressed && !self.restart_held {
                    self.restart = Some(self.command());
                }
                self.restart_held = pressed;
            }
            Control::Pause => {
                if pressed && !self.pause_held {
                    self.pause = Some(self.command());
                }
                self.pause_held = pressed;
            }
        }
    }

    pub fn press(&mut self, control: Control) {
        self.set(control, true);
    }

    pub fn release(&mut self, control: Control) {
        self.set(control, false);
    }

    /// Mirror a whole set of host flags at once. Held keys follow `state`;
    /// `jump`, `restart` and `pause` issue a command only when they go from
    /// false to true.
    pub fn apply(&mut self, state: &InputState) {
        self.set(Control::Forward, state.forward);
        self.set(Control::Backward, state.backward);
        self.set(Control::Left, state.left);
        self.set(Control::Right, state.right);
        self.set(Control::Jump, state.jump);
        self.set(Control::Restart, state.restart);
        self.set(Control::Pause, state.pause);
    }

    /// Drop every held flag and pending command (e.g. on focus loss)
    pub fn clear(&mut self) {
        *self = Self {
            now: self.now,
            jump_buffer_ticks: self.jump_buffer_ticks,
            command_ttl_ticks: self.command_ttl_ticks,
            ..Default::default()
        };
    }

    /// Build this tick's view; one-shot commands are consumed, stale ones dropped
    pub fn snapshot(&mut self, now: u64) -> InputState {
        self.now = now;
        let jump_buffered = self.jump_buffer.is_some_and(|c| c.is_live(now));
        if !jump_buffered {
            self.jump_buffer = None;
        }
        InputState {
            forward: self.forward,
            backward: self.backward,
            left: self.left,
            right: self.right,
            jump: self.jump_held || jump_buffered,
            restart: self.restart.take().is_some_and(|c| c.is_live(now)),
            pause: self.pause.take().is_some_and(|c| c.is_live(now)),
        }
    }

    /// Forget the buffered jump once it has been used
    pub fn consume_jump(&mut self) {
        self.jump_buffer = None;
    }

    fn command(&self) -> ExpiringCommand {
        ExpiringCommand {
            issued_at: self.now,
            ttl: self.command_ttl_ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_axes() {
        let input = InputState {
            forward: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(input.move_axes(), (1.0, -1.0));
        let both = InputState {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(both.move_axes(), (0.0, 0.0));
    }

    #[test]
    fn test_commands_fire_once() {
        let mut input = InputCollector::new(10, 25);
        input.press(Control::Pause);
        assert!(input.snapshot(1).pause);
        assert!(!input.snapshot(2).pause);
    }

    #[test]
    fn test_stale_command_is_dropped() {
        let mut input = InputCollector::new(10, 25);
        input.snapshot(100);
        input.press(Control::Restart);
        assert!(!input.snapshot(200).restart);
    }

    #[test]
    fn test_tap_between_ticks_is_buffered() {
        let mut input = InputCollector::new(10, 25);
        input.snapshot(5);
        input.press(Control::Jump);
        input.release(Control::Jump);
        assert!(input.snapshot(6).jump);
        assert!(input.snapshot(15).jump);
        assert!(!input.snapshot(16).jump);
    }

    #[test]
    fn test_consumed_jump_does_not_repeat() {
        let mut input = InputCollector::new(10, 25);
        input.press(Control::Jump);
        input.release(Control::Jump);
        assert!(input.snapshot(1).jump);
        input.consume_jump();
        assert!(!input.snapshot(2).jump);
    }

    #[test]
    fn test_held_keys_persist() {
        let mut input = InputCollector::new(10, 25);
        input.press(Control::Forward);
        assert!(input.snapshot(1).forward);
        assert!(input.snapshot(500).forward);
        input.release(Control::Forward);
        assert!(!input.snapshot(501).forward);
    }

    #[test]
    fn test_apply_mirrors_host_flags() {
        let mut input = InputCollector::new(10, 25);
        input.apply(&InputState {
            left: true,
            jump: true,
            pause: true,
            ..Default::default()
        });
        let snap = input.snapshot(1);
        assert!(snap.left && snap.jump && snap.pause);
        input.apply(&InputState::default());
        let snap = input.snapshot(2);
        assert!(!snap.left && !snap.pause);
        // Still inside the jump buffer
        assert!(snap.jump);
    }

    #[test]
    fn test_held_pause_flag_fires_once() {
        let mut input = InputCollector::new(10, 25);
        let paused = InputState {
            pause: true,
            restart: true,
            ..Default::default()
        };
        input.apply(&paused);
        let snap = input.snapshot(1);
        assert!(snap.pause && snap.restart);
        input.apply(&paused);
        let snap = input.snapshot(2);
        assert!(!snap.pause && !snap.restart);
        input.apply(&InputState::default());
        input.apply(&paused);
        assert!(input.snapshot(3).pause);
    }

    #[test]
    fn test_repeated_press_needs_release() {
        let mut input = InputCollector::new(10, 25);
        input.press(Control::Pause);
        assert!(input.snapshot(1).pause);
        input.press(Control::Pause);
        assert!(!input.snapshot(2).pause);
        input.release(Control::Pause);
        input.press(Control::Pause);
        assert!(input.snapshot(3).pause);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut input = InputCollector::new(10, 25);
        input.press(Control::Left);
        input.press(Control::Pause);
        input.clear();
        let snap = input.snapshot(1);
        assert_eq!(snap, InputState::default());
    }
}
