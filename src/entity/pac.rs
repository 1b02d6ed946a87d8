use glam::IVec2;
use tracing::trace;

use crate::constants::{durations, tiles, HALF_TILE};
use crate::entity::body::MobileBody;
use crate::entity::movement::{try_moving, Mover};
use crate::game::level::LevelData;
use crate::map::direction::Direction;
use crate::map::world::World;

/// Outcome of counting down Pac-Man's power for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerTick {
    /// No power left before this tick.
    Inactive,
    Active,
    /// Power just entered its final, flashing phase.
    StartsFading,
    /// Power just ran out.
    Lost,
}

#[derive(Debug, Clone)]
pub struct Pac {
    pub body: MobileBody,
    pub dead: bool,
    pub power_ticks_left: u64,
    /// Ticks Pac-Man stands still after eating.
    pub resting_ticks_left: u32,
    /// Ticks since the last food was eaten.
    pub starving_ticks: u64,
    /// Hunting ghosts cannot kill an immune Pac-Man.
    pub immune: bool,
}

impl Mover for Pac {
    fn body(&self) -> &MobileBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut MobileBody {
        &mut self.body
    }

    fn can_access(&self, world: &World, tile: IVec2) -> bool {
        world.is_accessible(tile, false)
    }
}

impl Pac {
    pub fn new(immune: bool) -> Self {
        let mut pac = Self {
            body: MobileBody::new(),
            dead: false,
            power_ticks_left: 0,
            resting_ticks_left: 0,
            starving_ticks: 0,
            immune,
        };
        pac.reset();
        pac
    }

    /// Puts Pac-Man back on its home tile, facing left.
    pub fn reset(&mut self) {
        self.body = MobileBody::new();
        self.body.place_at(tiles::PAC_HOME, HALF_TILE, 0.0);
        self.body.set_direction(Direction::Left);
        self.body.visible = true;
        self.dead = false;
        self.power_ticks_left = 0;
        self.resting_ticks_left = 0;
        self.starving_ticks = 0;
    }

    pub fn tile(&self) -> IVec2 {
        self.body.tile()
    }

    pub fn has_power(&self) -> bool {
        self.power_ticks_left > 0
    }

    /// True during the final seconds of power, while frightened ghosts flash.
    pub fn power_fading(&self) -> bool {
        self.has_power() && self.power_ticks_left <= durations::POWER_FADING
    }

    pub fn gain_power(&mut self, ticks: u64) {
        self.power_ticks_left = ticks;
    }

    pub fn rest(&mut self, ticks: u32) {
        self.resting_ticks_left = ticks;
    }

    pub fn tick_power(&mut self) -> PowerTick {
        if self.power_ticks_left == 0 {
            return PowerTick::Inactive;
        }
        self.power_ticks_left -= 1;
        match self.power_ticks_left {
            0 => PowerTick::Lost,
            durations::POWER_FADING => PowerTick::StartsFading,
            _ => PowerTick::Active,
        }
    }

    /// Moves Pac-Man for one tick unless it is dead or resting after a meal.
    pub fn update(&mut self, world: &World, level: &LevelData) {
        if self.dead {
            return;
        }
        if self.resting_ticks_left > 0 {
            self.resting_ticks_left -= 1;
            self.body.changed_tile = false;
            return;
        }
        self.body.speed = if self.has_power() {
            level.pac_powered_speed
        } else {
            level.pac_speed
        };
        if !try_moving(self, world) {
            trace!(tile = ?self.tile(), dir = self.body.dir.as_ref(), "Pac-Man blocked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_countdown() {
        let mut pac = Pac::new(false);
        pac.gain_power(durations::POWER_FADING + 2);
        assert_eq!(pac.tick_power(), PowerTick::Active);
        assert_eq!(pac.tick_power(), PowerTick::StartsFading);
        assert!(pac.power_fading());
        for _ in 0..durations::POWER_FADING - 1 {
            assert_eq!(pac.tick_power(), PowerTick::Active);
        }
        assert_eq!(pac.tick_power(), PowerTick::Lost);
        assert_eq!(pac.tick_power(), PowerTick::Inactive);
        assert!(!pac.has_power());
    }

    #[test]
    fn test_reset_places_pac_at_home() {
        let pac = Pac::new(true);
        assert_eq!(pac.tile(), tiles::PAC_HOME);
        assert_eq!(pac.body.offset().x, HALF_TILE);
        assert_eq!(pac.body.dir, Direction::Left);
        assert!(pac.immune);
    }
}
