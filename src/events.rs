//! Semantic events emitted by the simulation.
//!
//! Listeners (renderers, sound, score keepers) receive events synchronously at the
//! point of emission and must not feed anything back into the tick that produced them.

use glam::IVec2;

use crate::entity::ghost::GhostId;
use crate::game::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    StateChanged { from: GameState, to: GameState },
    LevelStarted { level: u32 },
    PacFoundFood { tile: IVec2, energizer: bool },
    PacGainsPower,
    PacStartsLosingPower,
    PacLostPower,
    PacDied { tile: IVec2 },
    GhostEaten { ghost: GhostId, tile: IVec2, bounty: u32 },
    GhostEntersHouse { ghost: GhostId },
    GhostLeavesHouse { ghost: GhostId },
    GhostRevived { ghost: GhostId },
    BonusActivated { tile: IVec2 },
    BonusEaten { tile: IVec2, points: u32 },
    BonusExpired { tile: IVec2 },
    ScatterPhaseStarted { phase: usize },
    ChasingPhaseStarted { phase: usize },
    ExtraLife { lives: u32 },
}

impl GameEvent {
    /// The tile the event refers to, if any.
    pub fn tile(&self) -> Option<IVec2> {
        match *self {
            GameEvent::PacFoundFood { tile, .. }
            | GameEvent::PacDied { tile }
            | GameEvent::GhostEaten { tile, .. }
            | GameEvent::BonusActivated { tile }
            | GameEvent::BonusEaten { tile, .. }
            | GameEvent::BonusExpired { tile } => Some(tile),
            GameEvent::StateChanged { .. }
            | GameEvent::LevelStarted { .. }
            | GameEvent::PacGainsPower
            | GameEvent::PacStartsLosingPower
            | GameEvent::PacLostPower
            | GameEvent::GhostEntersHouse { .. }
            | GameEvent::GhostLeavesHouse { .. }
            | GameEvent::GhostRevived { .. }
            | GameEvent::ScatterPhaseStarted { .. }
            | GameEvent::ChasingPhaseStarted { .. }
            | GameEvent::ExtraLife { .. } => None,
        }
    }
}

/// Receives every event the simulation emits.
pub trait EventSink {
    fn publish(&mut self, event: GameEvent);
}

impl<F: FnMut(&GameEvent)> EventSink for F {
    fn publish(&mut self, event: GameEvent) {
        self(&event)
    }
}

/// Buffers events until the embedder drains them after a tick.
#[derive(Debug, Default, Clone)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Takes all buffered events, oldest first.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for EventQueue {
    fn publish(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
