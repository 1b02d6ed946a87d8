//! Scatter/chase phase scheduling.

use strum_macros::AsRefStr;
use tracing::debug;

use crate::timer::{TickTimer, INDEFINITE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum HuntingMode {
    Scatter,
    Chase,
}

const PHASES_LEVEL_1: [u64; 8] = [420, 1200, 420, 1200, 300, 1200, 300, INDEFINITE];
const PHASES_LEVELS_2_TO_4: [u64; 8] = [420, 1200, 420, 1200, 300, 61_980, 1, INDEFINITE];
const PHASES_LEVEL_5_UP: [u64; 8] = [300, 1200, 300, 1200, 300, 62_220, 1, INDEFINITE];

/// Alternating scatter and chase phases of a level. Even phases scatter, odd phases chase.
#[derive(Debug, Clone)]
pub struct HuntingSchedule {
    durations: [u64; 8],
    phase: usize,
    timer: TickTimer,
}

impl HuntingSchedule {
    pub fn for_level(level: u32) -> Self {
        let durations = match level {
            0 | 1 => PHASES_LEVEL_1,
            2..=4 => PHASES_LEVELS_2_TO_4,
            _ => PHASES_LEVEL_5_UP,
        };
        Self {
            durations,
            phase: 0,
            timer: TickTimer::new(durations[0]),
        }
    }

    /// Rewinds to the first scatter phase and starts its timer.
    pub fn start(&mut self) {
        self.phase = 0;
        self.timer.reset(self.durations[0]);
        self.timer.start();
    }

    pub fn phase(&self) -> usize {
        self.phase
    }

    pub fn mode(&self) -> HuntingMode {
        Self::mode_of(self.phase)
    }

    pub fn mode_of(phase: usize) -> HuntingMode {
        if phase % 2 == 0 {
            HuntingMode::Scatter
        } else {
            HuntingMode::Chase
        }
    }

    pub fn timer(&self) -> &TickTimer {
        &self.timer
    }

    /// Advances the active phase by one tick. Returns the new phase when it changed.
    pub fn on_tick(&mut self) -> Option<usize> {
        self.timer.advance();
        if !self.timer.has_expired() {
            return None;
        }
        self.phase = (self.phase + 1).min(self.durations.len() - 1);
        self.timer.reset(self.durations[self.phase]);
        self.timer.start();
        debug!(phase = self.phase, mode = self.mode().as_ref(), "Hunting phase started");
        Some(self.phase)
    }
}
