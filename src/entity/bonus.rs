//! The bonus symbol: static in Pac-Man, wandering through the maze in Ms. Pac-Man.

use glam::IVec2;
use rand::seq::IndexedRandom;
use rand::Rng;
use strum_macros::{AsRefStr, EnumIter};
use tracing::debug;

use crate::constants::{durations, speed, HALF_TILE};
use crate::entity::body::MobileBody;
use crate::entity::movement::{try_moving, Mover};
use crate::entity::steering::accessible_directions;
use crate::events::{EventSink, GameEvent};
use crate::map::direction::Direction;
use crate::map::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
pub enum BonusSymbol {
    Cherries,
    Strawberry,
    Peach,
    Orange,
    Pretzel,
    Apple,
    Pear,
    Grapes,
    Banana,
    Galaxian,
    Bell,
    Key,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum BonusState {
    Inactive,
    Edible,
    Eaten,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusMovement {
    Static,
    Wandering,
}

#[derive(Debug, Clone)]
pub struct Bonus {
    pub body: MobileBody,
    pub state: BonusState,
    pub movement: BonusMovement,
    pub symbol: BonusSymbol,
    pub points: u32,
    pub edible_ticks_left: u64,
    pub eaten_ticks_left: u64,
    /// Last turn taken while wandering, used to avoid undoing it right away.
    last_turn: Option<Direction>,
}

impl Mover for Bonus {
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

impl Bonus {
    pub fn new(movement: BonusMovement) -> Self {
        Self {
            body: MobileBody::new(),
            state: BonusState::Inactive,
            movement,
            symbol: BonusSymbol::Cherries,
            points: 0,
            edible_ticks_left: 0,
            eaten_ticks_left: 0,
            last_turn: None,
        }
    }

    pub fn tile(&self) -> IVec2 {
        self.body.tile()
    }

    pub fn is_edible(&self) -> bool {
        self.state == BonusState::Edible
    }

    /// Makes the bonus edible for `ticks` ticks.
    ///
    /// A static bonus appears on `tile`; a wandering bonus enters through a random portal.
    pub fn activate(
        &mut self,
        symbol: BonusSymbol,
        points: u32,
        ticks: u64,
        tile: IVec2,
        world: &World,
        rng: &mut impl Rng,
    ) {
        self.symbol = symbol;
        self.points = points;
        self.edible_ticks_left = ticks;
        self.eaten_ticks_left = 0;
        self.last_turn = None;
        self.body = MobileBody::new();
        self.body.visible = true;

        match self.movement {
            BonusMovement::Static => self.body.place_at(tile, HALF_TILE, 0.0),
            BonusMovement::Wandering => {
                let entrances: Vec<(IVec2, Direction)> = world
                    .portals()
                    .iter()
                    .flat_map(|portal| [(portal.left, Direction::Right), (portal.right, Direction::Left)])
                    .collect();
                let (entrance, dir) = entrances.choose(rng).copied().unwrap_or((tile, Direction::Left));
                self.body.place_at(entrance, 0.0, 0.0);
                self.body.set_direction(dir);
                self.body.speed = speed::BONUS_WANDERING;
            }
        }

        self.state = BonusState::Edible;
        debug!(symbol = self.symbol.as_ref(), points, ticks, tile = ?self.tile(), "Bonus activated");
    }

    pub fn deactivate(&mut self) {
        self.state = BonusState::Inactive;
        self.body.visible = false;
        self.edible_ticks_left = 0;
        self.eaten_ticks_left = 0;
    }

    /// Advances the bonus by one tick. Returns the points scored if Pac-Man ate it.
    pub fn update(
        &mut self,
        world: &World,
        pac_tile: IVec2,
        rng: &mut impl Rng,
        events: &mut dyn EventSink,
    ) -> Option<u32> {
        match self.state {
            BonusState::Inactive => None,
            BonusState::Edible => {
                if self.movement == BonusMovement::Wandering {
                    self.wander(world, rng);
                    if self.body.changed_tile && world.is_portal(self.tile()) {
                        self.expire(events);
                        return None;
                    }
                }

                if self.tile() == pac_tile {
                    self.state = BonusState::Eaten;
                    self.eaten_ticks_left = durations::BONUS_EATEN;
                    debug!(symbol = self.symbol.as_ref(), points = self.points, "Bonus eaten");
                    events.publish(GameEvent::BonusEaten {
                        tile: self.tile(),
                        points: self.points,
                    });
                    return Some(self.points);
                }

                self.edible_ticks_left = self.edible_ticks_left.saturating_sub(1);
                if self.edible_ticks_left == 0 {
                    self.expire(events);
                }
                None
            }
            BonusState::Eaten => {
                self.eaten_ticks_left = self.eaten_ticks_left.saturating_sub(1);
                if self.eaten_ticks_left == 0 {
                    self.deactivate();
                }
                None
            }
        }
    }

    fn expire(&mut self, events: &mut dyn EventSink) {
        let tile = self.tile();
        self.deactivate();
        debug!(tile = ?tile, "Bonus expired");
        events.publish(GameEvent::BonusExpired { tile });
    }

    fn wander(&mut self, world: &World, rng: &mut impl Rng) {
        let body = &self.body;
        let decide = !world.is_portal(body.tile()) && (body.changed_tile || !body.could_move);
        if decide {
            let mut options = accessible_directions(&*self, world, &[self.body.dir.opposite()]);
            if options.len() > 1 {
                if let Some(last) = self.last_turn {
                    options.retain(|dir| *dir != last.opposite());
                }
            }
            let choice = options.choose(rng).copied().unwrap_or(self.body.dir.opposite());
            if choice != self.body.dir {
                self.last_turn = Some(choice);
            }
            self.body.wish_dir = choice;
        }
        try_moving(self, world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventQueue;
    use crate::constants::tiles;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_static_bonus_expires_after_exactly_its_duration() {
        let world = World::classic().unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut events = EventQueue::new();
        let mut bonus = Bonus::new(BonusMovement::Static);
        bonus.activate(BonusSymbol::Cherries, 100, 5, tiles::BONUS, &world, &mut rng);

        for _ in 0..4 {
            assert_eq!(bonus.update(&world, tiles::PAC_HOME, &mut rng, &mut events), None);
            assert_eq!(bonus.state, BonusState::Edible);
        }
        bonus.update(&world, tiles::PAC_HOME, &mut rng, &mut events);
        assert_eq!(bonus.state, BonusState::Inactive);
        assert_eq!(events.drain(), vec![GameEvent::BonusExpired { tile: tiles::BONUS }]);
    }

    #[test]
    fn test_eaten_bonus_is_displayed_then_removed() {
        let world = World::classic().unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut events = EventQueue::new();
        let mut bonus = Bonus::new(BonusMovement::Static);
        bonus.activate(BonusSymbol::Strawberry, 300, 600, tiles::BONUS, &world, &mut rng);

        assert_eq!(bonus.update(&world, tiles::BONUS, &mut rng, &mut events), Some(300));
        assert_eq!(bonus.state, BonusState::Eaten);
        assert_eq!(
            events.drain(),
            vec![GameEvent::BonusEaten {
                tile: tiles::BONUS,
                points: 300,
            }]
        );

        let mut eaten_ticks = 0;
        while bonus.state == BonusState::Eaten {
            assert_eq!(bonus.update(&world, tiles::BONUS, &mut rng, &mut events), None);
            eaten_ticks += 1;
        }
        assert_eq!(eaten_ticks, durations::BONUS_EATEN);
        assert_eq!(bonus.state, BonusState::Inactive);
        assert!(events.is_empty());
    }

    #[test]
    fn test_wandering_bonus_leaves_through_a_portal() {
        let world = World::classic().unwrap();
        let mut rng = SmallRng::seed_from_u64(9);
        let mut events = EventQueue::new();
        let mut bonus = Bonus::new(BonusMovement::Wandering);
        bonus.activate(BonusSymbol::Banana, 5000, u64::MAX, tiles::BONUS, &world, &mut rng);
        let nowhere = IVec2::new(-10, -10);

        let mut ticks = 0;
        while bonus.is_edible() && ticks < 200_000 {
            bonus.update(&world, nowhere, &mut rng, &mut events);
            ticks += 1;
        }

        assert_eq!(bonus.state, BonusState::Inactive);
        let drained = events.drain();
        assert_eq!(drained.len(), 1);
        match drained[0] {
            GameEvent::BonusExpired { tile } => assert!(world.is_portal(tile)),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_wandering_bonus_enters_through_a_portal() {
        let world = World::classic().unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        let mut bonus = Bonus::new(BonusMovement::Wandering);
        bonus.activate(BonusSymbol::Pretzel, 700, 600, tiles::BONUS, &world, &mut rng);

        assert!(world.is_portal(bonus.tile()));
        let inward = if bonus.tile().x < 0 { Direction::Right } else { Direction::Left };
        assert_eq!(bonus.body.dir, inward);
    }
}
