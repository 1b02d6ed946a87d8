//! Runtime configuration for a [`crate::game::Game`].

use strum_macros::AsRefStr;

use crate::constants::points;

/// Which arcade game's rules to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr)]
pub enum GameVariant {
    #[default]
    PacMan,
    MsPacMan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub variant: GameVariant,
    /// The autopilot steers Pac-Man.
    pub demo_mode: bool,
    /// Hunting ghosts pass through Pac-Man harmlessly.
    pub pac_immune: bool,
    pub initial_lives: u32,
    /// Score at which a single extra life is awarded.
    pub extra_life_score: u32,
    /// Seed for all random choices; `None` seeds from the operating system.
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            variant: GameVariant::PacMan,
            demo_mode: false,
            pac_immune: false,
            initial_lives: 3,
            extra_life_score: points::EXTRA_LIFE,
            rng_seed: None,
        }
    }
}

impl GameConfig {
    /// An attract-mode configuration: autopilot on, Pac-Man immune.
    pub fn demo(seed: Option<u64>) -> Self {
        Self {
            demo_mode: true,
            pac_immune: true,
            rng_seed: seed,
            ..Self::default()
        }
    }
}
