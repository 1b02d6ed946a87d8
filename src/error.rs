//! Centralized error types for the simulation.
//!
//! The engine runs on pre-validated, immutable data, so the taxonomy is narrow:
//! map loading problems are reported before a [`crate::game::Game`] exists, and
//! everything else is a broken caller contract that must not be ignored.

use glam::IVec2;

use crate::game::state::GameState;

/// Main error type for the simulation.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Map parsing error: {0}")]
    MapParse(#[from] ParseError),

    #[error("Map error: {0}")]
    Map(#[from] MapError),

    #[error("State machine error: {0}")]
    State(#[from] StateError),
}

/// Error type for map parsing operations.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown character in board: {0:?}")]
    UnknownCharacter(char),
    #[error("Board must have at least one row")]
    EmptyBoard,
    #[error("Row {row} has width {found}, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("House door must have exactly 2 positions, found {0}")]
    InvalidHouseDoorCount(usize),
    #[error("Tunnel on row {0} does not reach both board edges")]
    UnpairedTunnel(i32),
}

/// Errors related to map queries.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MapError {
    #[error("Tile {0} is outside the board")]
    OutOfBounds(IVec2),
}

/// Violations of the top-level state machine's contract.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum StateError {
    #[error("State {0:?} cannot change into itself")]
    SelfLoop(GameState),
    #[error("No previous state to resume from {0:?}")]
    NothingToResume(GameState),
}

/// Result type for simulation operations.
pub type GameResult<T> = Result<T, GameError>;
