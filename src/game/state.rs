//! Plumbing of the top-level state machine.
//!
//! The per-state hooks live on [`crate::game::Game`]; this type only tracks the
//! current and previous state and owns the state timer.

use strum_macros::{AsRefStr, EnumIter};
use tracing::error;

use crate::error::StateError;
use crate::timer::{TickTimer, INDEFINITE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
pub enum GameState {
    /// Creatures are on their home positions, waiting for the countdown.
    Ready,
    Hunting,
    PacmanDying,
    /// Short freeze after Pac-Man eats a ghost.
    GhostDying,
    /// The maze flashes before the next level starts.
    LevelComplete,
    GameOver,
}

#[derive(Debug, Clone)]
pub struct StateMachine {
    current: GameState,
    previous: Option<GameState>,
    timer: TickTimer,
    transitions: u64,
}

impl StateMachine {
    pub fn new(initial: GameState) -> Self {
        let mut timer = TickTimer::default();
        timer.start();
        Self {
            current: initial,
            previous: None,
            timer,
            transitions: 0,
        }
    }

    pub fn current(&self) -> GameState {
        self.current
    }

    pub fn previous(&self) -> Option<GameState> {
        self.previous
    }

    pub fn timer(&self) -> &TickTimer {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut TickTimer {
        &mut self.timer
    }

    /// Number of state changes so far, resumes included.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    fn switch_to(&mut self, state: GameState) {
        self.current = state;
        self.timer.reset(INDEFINITE);
        self.timer.start();
        self.transitions += 1;
    }

    /// Switches to `to`, remembering the current state. Returns the state left.
    ///
    /// The state timer is reset to indefinite, so the entry hook may set a finite duration.
    pub fn change(&mut self, to: GameState) -> Result<GameState, StateError> {
        let from = self.current;
        if from == to {
            error!(state = from.as_ref(), "State cannot change into itself");
            return Err(StateError::SelfLoop(from));
        }
        self.previous = Some(from);
        self.switch_to(to);
        Ok(from)
    }

    /// Returns to the state that was left last, without running its entry hook.
    pub fn resume(&mut self) -> Result<(GameState, GameState), StateError> {
        let from = self.current;
        let Some(to) = self.previous.take() else {
            error!(state = from.as_ref(), "No previous state to resume");
            return Err(StateError::NothingToResume(from));
        };
        self.switch_to(to);
        Ok((from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_remembers_previous() {
        let mut fsm = StateMachine::new(GameState::Ready);
        assert_eq!(fsm.change(GameState::Hunting), Ok(GameState::Ready));
        assert_eq!(fsm.previous(), Some(GameState::Ready));
        assert!(fsm.timer().is_indefinite());
        assert!(fsm.timer().is_running());
    }

    #[test]
    fn test_self_loop_is_rejected() {
        let mut fsm = StateMachine::new(GameState::Hunting);
        assert_eq!(fsm.change(GameState::Hunting), Err(StateError::SelfLoop(GameState::Hunting)));
        assert_eq!(fsm.current(), GameState::Hunting);
        assert_eq!(fsm.transitions(), 0);
    }

    #[test]
    fn test_resume() {
        let mut fsm = StateMachine::new(GameState::Hunting);
        fsm.change(GameState::GhostDying).unwrap();
        assert_eq!(fsm.resume(), Ok((GameState::GhostDying, GameState::Hunting)));
        assert_eq!(fsm.current(), GameState::Hunting);
        assert_eq!(fsm.resume(), Err(StateError::NothingToResume(GameState::Hunting)));
    }
}
