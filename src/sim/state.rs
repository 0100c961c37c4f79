//! Game state machine and the engine-owned world
//!
//! Time here is counted in fixed ticks so deadlines compare exactly.

use serde::{Deserialize, Serialize};

use super::body::Body;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Normal play (also the state right after any reset)
    Playing,
    /// Lost support; a reset is pending unless support comes back in time
    Falling,
    /// Reached the goal; stepping halts until an explicit reset
    Completed,
    /// Halted by the player; resumes to the phase it interrupted
    Paused,
}

impl GamePhase {
    /// Phases in which the per-tick update and integration run
    #[inline]
    pub fn is_simulating(&self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::Falling)
    }
}

/// Things that happened during a tick, for the host (sound, HUD) and the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh player body was placed at the start pose
    Spawned,
    Jumped,
    /// Touched obstacle `index`; the player was discarded
    ObstacleReset { index: usize },
    /// Touched obstacle `index`; velocity into it was cancelled
    ObstacleStop { index: usize },
    /// Boost pad `index` fired
    Boosted { index: usize },
    SupportLost,
    SupportRegained,
    /// Fall grace period ran out
    FellOut,
    /// External reset command
    Restarted,
    Completed,
    Paused,
    Resumed,
}

/// Phase plus the bookkeeping that drives its transitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    /// Phase to return to when unpausing
    resume_phase: Option<GamePhase>,
    /// Ticks simulated while `Playing` or `Falling`
    pub elapsed_ticks: u64,
    /// `elapsed_ticks` at the most recent reset
    pub last_reset_tick: u64,
    /// Tick at which an unsupported fall turns into a reset (only while `Falling`)
    pending_fall_deadline: Option<u64>,
    /// Resets of any cause
    pub resets: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            phase: GamePhase::Playing,
            resume_phase: None,
            elapsed_ticks: 0,
            last_reset_tick: 0,
            pending_fall_deadline: None,
            resets: 0,
        }
    }

    /// Elapsed play time in seconds
    pub fn elapsed_time(&self, dt: f32) -> f32 {
        self.elapsed_ticks as f32 * dt
    }

    /// Play time of the most recent reset, in seconds
    pub fn last_reset_time(&self, dt: f32) -> f32 {
        self.last_reset_tick as f32 * dt
    }

    #[inline]
    pub fn pending_fall_deadline(&self) -> Option<u64> {
        self.pending_fall_deadline
    }

    /// Enter `Falling` with a reset scheduled `grace_ticks` from now.
    /// Overlapping falls overwrite rather than stack.
    pub fn begin_fall(&mut self, grace_ticks: u64) {
        self.phase = GamePhase::Falling;
        self.pending_fall_deadline = Some(self.elapsed_ticks + grace_ticks);
    }

    /// Support came back: cancel any pending reset. Returns true if a fall was cancelled.
    pub fn regain_support(&mut self) -> bool {
        let was_falling = self.phase == GamePhase::Falling;
        if was_falling {
            self.phase = GamePhase::Playing;
        }
        self.pending_fall_deadline = None;
        was_falling
    }

    /// The scheduled reset is due (false once cancelled)
    pub fn fall_deadline_reached(&self) -> bool {
        self.phase == GamePhase::Falling
            && self
                .pending_fall_deadline
                .is_some_and(|deadline| self.elapsed_ticks >= deadline)
    }

    /// Back to `Playing`, clearing anything pending
    pub fn reset(&mut self) {
        self.phase = GamePhase::Playing;
        self.resume_phase = None;
        self.pending_fall_deadline = None;
        self.last_reset_tick = self.elapsed_ticks;
        self.resets += 1;
    }

    pub fn complete(&mut self) {
        self.phase = GamePhase::Completed;
        self.pending_fall_deadline = None;
    }

    /// Toggle pause. Only `Playing` and `Completed` may pause; returns the
    /// event for a transition that happened.
    pub fn toggle_pause(&mut self) -> Option<GameEvent> {
        match self.phase {
            GamePhase::Playing | GamePhase::Completed => {
                self.resume_phase = Some(self.phase);
                self.phase = GamePhase::Paused;
                Some(GameEvent::Paused)
            }
            GamePhase::Paused => {
                self.phase = self.resume_phase.take().unwrap_or(GamePhase::Playing);
                Some(GameEvent::Resumed)
            }
            GamePhase::Falling => None,
        }
    }
}

/// Engine-owned mutable state shared with the scenario each tick
#[derive(Debug, Clone, Default)]
pub struct World {
    /// At most one player; absent before first spawn and right after a reset
    pub player: Option<Body>,
    pub game: GameState,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard the player and return to `Playing`; the scenario respawns next tick
    pub fn reset(&mut self) {
        self.player = None;
        self.game.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let world = World::new();
        assert!(world.player.is_none());
        assert_eq!(world.game.phase, GamePhase::Playing);
        assert_eq!(world.game.pending_fall_deadline(), None);
    }

    #[test]
    fn test_fall_deadline() {
        let mut game = GameState::new();
        game.elapsed_ticks = 10;
        game.begin_fall(5);
        assert_eq!(game.phase, GamePhase::Falling);
        assert_eq!(game.pending_fall_deadline(), Some(15));
        game.elapsed_ticks = 14;
        assert!(!game.fall_deadline_reached());
        game.elapsed_ticks = 15;
        assert!(game.fall_deadline_reached());
    }

    #[test]
    fn test_regained_support_cancels_deadline() {
        let mut game = GameState::new();
        game.begin_fall(5);
        assert!(game.regain_support());
        assert_eq!(game.phase, GamePhase::Playing);
        assert_eq!(game.pending_fall_deadline(), None);
        game.elapsed_ticks = 100;
        assert!(!game.fall_deadline_reached());
        // Nothing to cancel the second time
        assert!(!game.regain_support());
    }

    #[test]
    fn test_reset_clears_deadline() {
        let mut game = GameState::new();
        game.elapsed_ticks = 40;
        game.begin_fall(5);
        game.reset();
        assert_eq!(game.phase, GamePhase::Playing);
        assert_eq!(game.pending_fall_deadline(), None);
        assert_eq!(game.last_reset_tick, 40);
        assert!((game.last_reset_time(0.01) - 0.4).abs() < 1e-6);
        assert_eq!(game.resets, 1);
    }

    #[test]
    fn test_pause_resumes_previous_phase() {
        let mut game = GameState::new();
        game.complete();
        assert_eq!(game.toggle_pause(), Some(GameEvent::Paused));
        assert_eq!(game.phase, GamePhase::Paused);
        assert_eq!(game.toggle_pause(), Some(GameEvent::Resumed));
        assert_eq!(game.phase, GamePhase::Completed);
    }

    #[test]
    fn test_cannot_pause_while_falling() {
        let mut game = GameState::new();
        game.begin_fall(5);
        assert_eq!(game.toggle_pause(), None);
        assert_eq!(game.phase, GamePhase::Falling);
    }

    #[test]
    fn test_simulating_phases() {
        assert!(GamePhase::Playing.is_simulating());
        assert!(GamePhase::Falling.is_simulating());
        assert!(!GamePhase::Completed.is_simulating());
        assert!(!GamePhase::Paused.is_simulating());
    }
}
