//! When locked ghosts may leave the house.

use tracing::debug;

use crate::constants::sec_to_ticks;
use crate::entity::ghost::{Ghost, GhostId, GhostState};
use crate::entity::pac::Pac;
use crate::events::EventSink;

/// Global counter values releasing Pinky, Inky and Clyde after a life was lost.
const GLOBAL_LIMITS: [u32; 3] = [7, 17, 32];

/// Ghosts that wait for a counter, in order of preference.
const PREFERENCE: [GhostId; 3] = [GhostId::Pinky, GhostId::Inky, GhostId::Clyde];

fn rank(id: GhostId) -> Option<usize> {
    PREFERENCE.iter().position(|&preferred| preferred == id)
}

#[derive(Debug, Clone)]
pub struct HouseRules {
    private_limits: [u32; 3],
    starving_limit: u64,
    global_counter_enabled: bool,
    global_dot_counter: u32,
}

impl HouseRules {
    pub fn for_level(level: u32) -> Self {
        let private_limits = match level {
            0 | 1 => [0, 30, 60],
            2 => [0, 0, 50],
            _ => [0, 0, 0],
        };
        let starving_limit = if level < 5 { sec_to_ticks(4) } else { sec_to_ticks(3) };
        Self {
            private_limits,
            starving_limit,
            global_counter_enabled: false,
            global_dot_counter: 0,
        }
    }

    pub fn global_counter_enabled(&self) -> bool {
        self.global_counter_enabled
    }

    pub fn global_dot_counter(&self) -> u32 {
        self.global_dot_counter
    }

    /// After a life is lost, ghosts are released by the global counter.
    pub fn on_life_lost(&mut self) {
        self.global_counter_enabled = true;
        self.global_dot_counter = 0;
    }

    fn preferred_locked(ghosts: &[Ghost]) -> Option<usize> {
        PREFERENCE
            .iter()
            .find_map(|&id| ghosts.iter().position(|ghost| ghost.id == id && ghost.is(GhostState::Locked)))
    }

    /// Counts eaten food towards the next release.
    pub fn on_food_eaten(&mut self, ghosts: &mut [Ghost]) {
        if self.global_counter_enabled {
            self.global_dot_counter += 1;
        } else if let Some(index) = Self::preferred_locked(ghosts) {
            ghosts[index].dot_counter += 1;
        }
    }

    /// Releases at most one ghost per tick. Returns the released ghost.
    pub fn release_ghost(&mut self, ghosts: &mut [Ghost], pac: &mut Pac, events: &mut dyn EventSink) -> Option<GhostId> {
        if let Some(blinky) = ghosts
            .iter_mut()
            .find(|ghost| ghost.id == GhostId::Blinky && ghost.is(GhostState::Locked))
        {
            blinky.release(events);
            return Some(GhostId::Blinky);
        }

        let index = Self::preferred_locked(ghosts)?;
        let ghost = &mut ghosts[index];
        let order = rank(ghost.id)?;

        let mut reason = None;
        if self.global_counter_enabled {
            if ghost.id == GhostId::Clyde && self.global_dot_counter >= GLOBAL_LIMITS[2] {
                debug!("Global dot counter disabled");
                self.global_counter_enabled = false;
                self.global_dot_counter = 0;
            } else if self.global_dot_counter >= GLOBAL_LIMITS[order] {
                reason = Some("global dot counter");
            }
        } else if ghost.dot_counter >= self.private_limits[order] {
            reason = Some("private dot counter");
        }

        if reason.is_none() && pac.starving_ticks >= self.starving_limit {
            pac.starving_ticks = 0;
            reason = Some("Pac-Man starving");
        }

        let reason = reason?;
        debug!(ghost = ghost.id.as_ref(), reason, "Releasing ghost");
        ghost.release(events);
        Some(ghost.id)
    }
}
