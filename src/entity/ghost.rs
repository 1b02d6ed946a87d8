//! Ghost identities, behavior states and per-tick behavior.

use glam::{IVec2, Vec2};
use rand::Rng;
use strum_macros::{AsRefStr, EnumIter};
use tracing::{debug, trace};

use crate::constants::{speed, tiles, BASE_PIXELS_PER_TICK, HALF_TILE};
use crate::entity::body::MobileBody;
use crate::entity::movement::{try_moving, Mover};
use crate::entity::steering::{steer_randomly, steer_towards_target};
use crate::events::{EventSink, GameEvent};
use crate::game::hunting::HuntingMode;
use crate::game::level::LevelData;
use crate::map::direction::Direction;
use crate::map::world::World;

/// The four ghosts. The identity selects the chase personality and the house seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
pub enum GhostId {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostId {
    pub const ALL: [GhostId; 4] = [GhostId::Blinky, GhostId::Pinky, GhostId::Inky, GhostId::Clyde];

    pub const fn scatter_corner(self) -> IVec2 {
        match self {
            GhostId::Blinky => tiles::BLINKY_CORNER,
            GhostId::Pinky => tiles::PINKY_CORNER,
            GhostId::Inky => tiles::INKY_CORNER,
            GhostId::Clyde => tiles::CLYDE_CORNER,
        }
    }

    /// Index into [`crate::map::world::House::seats`]. Blinky starts outside the house.
    pub const fn home_seat(self) -> Option<usize> {
        match self {
            GhostId::Blinky => None,
            GhostId::Pinky => Some(1),
            GhostId::Inky => Some(0),
            GhostId::Clyde => Some(2),
        }
    }

    /// The seat a dead ghost returns to.
    pub const fn revival_seat(self) -> usize {
        match self.home_seat() {
            Some(seat) => seat,
            None => 1,
        }
    }

    pub const fn initial_direction(self) -> Direction {
        match self {
            GhostId::Blinky => Direction::Left,
            GhostId::Pinky => Direction::Down,
            GhostId::Inky | GhostId::Clyde => Direction::Up,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
pub enum GhostState {
    /// Waiting inside the house (Blinky waits on the house entry).
    Locked,
    /// Following the scripted route out of the house.
    LeavingHouse,
    Hunting,
    Frightened,
    /// Eyes travelling back to the house.
    Dead,
    /// Following the scripted route down to the revival seat.
    EnteringHouse,
}

/// What a ghost needs to know about the rest of the level to take its turn.
pub struct GhostContext<'a> {
    pub world: &'a World,
    pub level: &'a LevelData,
    pub mode: HuntingMode,
    pub pac_tile: IVec2,
    pub pac_dir: Direction,
    pub blinky_tile: IVec2,
}

/// Half the height of the bouncing movement of locked ghosts, in pixels.
const BOUNCE_AMPLITUDE: f32 = 4.0;
/// Horizontal tolerance for a dead ghost to count as standing over the door, in pixels.
const DOOR_TOLERANCE: f32 = 2.0;

#[derive(Debug, Clone)]
pub struct Ghost {
    pub id: GhostId,
    pub body: MobileBody,
    pub state: GhostState,
    /// Private house-release counter.
    pub dot_counter: u32,
    /// Cruise Elroy tier (Blinky only): 0, 1 or 2.
    pub elroy: u8,
    /// Points awarded for this ghost while it is dead.
    pub bounty: u32,
    pub frightened_ticks_left: u64,
}

impl Mover for Ghost {
    fn body(&self) -> &MobileBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut MobileBody {
        &mut self.body
    }

    fn can_access(&self, world: &World, tile: IVec2) -> bool {
        let door_open = matches!(self.state, GhostState::LeavingHouse | GhostState::EnteringHouse);
        world.is_accessible(tile, door_open)
    }

    fn respects_upward_block(&self) -> bool {
        self.state == GhostState::Hunting
    }
}

/// Moves `current` towards `goal` by at most `pixels`.
fn step_towards(current: f32, goal: f32, pixels: f32) -> f32 {
    if current < goal {
        (current + pixels).min(goal)
    } else {
        (current - pixels).max(goal)
    }
}

impl Ghost {
    pub fn new(id: GhostId, world: &World) -> Self {
        let mut ghost = Self {
            id,
            body: MobileBody::new(),
            state: GhostState::Locked,
            dot_counter: 0,
            elroy: 0,
            bounty: 0,
            frightened_ticks_left: 0,
        };
        ghost.reset(world);
        ghost
    }

    /// Puts the ghost back on its home position, locked.
    pub fn reset(&mut self, world: &World) {
        let house = world.house();
        self.body = MobileBody::new();
        self.body.position = match self.id.home_seat() {
            Some(seat) => house.seat_position(seat),
            None => house.entry_position(),
        };
        self.body.set_direction(self.id.initial_direction());
        self.body.visible = true;
        self.body.speed = 0.0;
        self.state = GhostState::Locked;
        self.bounty = 0;
        self.frightened_ticks_left = 0;
    }

    pub fn tile(&self) -> IVec2 {
        self.body.tile()
    }

    pub fn is(&self, state: GhostState) -> bool {
        self.state == state
    }

    fn set_state(&mut self, state: GhostState) {
        trace!(ghost = self.id.as_ref(), from = self.state.as_ref(), to = state.as_ref(), "Ghost state");
        self.state = state;
    }

    /// Lets a locked ghost out. Blinky is outside already and starts hunting at once.
    pub fn release(&mut self, events: &mut dyn EventSink) {
        if self.state != GhostState::Locked {
            return;
        }
        if self.id.home_seat().is_none() {
            self.set_state(GhostState::Hunting);
            events.publish(GameEvent::GhostLeavesHouse { ghost: self.id });
        } else {
            self.set_state(GhostState::LeavingHouse);
        }
        debug!(ghost = self.id.as_ref(), "Ghost released");
    }

    /// Reacts to Pac-Man gaining power. A zero duration only makes the ghost reverse.
    pub fn frighten(&mut self, ticks: u64) {
        if !matches!(self.state, GhostState::Hunting | GhostState::Frightened) {
            return;
        }
        self.body.reverse_asap();
        if ticks > 0 {
            self.set_state(GhostState::Frightened);
            self.frightened_ticks_left = ticks;
        }
    }

    /// Reverses a hunting ghost after a scatter/chase flip.
    pub fn on_phase_change(&mut self) {
        if self.state == GhostState::Hunting {
            self.body.reverse_asap();
        }
    }

    pub fn kill(&mut self, bounty: u32) {
        self.bounty = bounty;
        self.frightened_ticks_left = 0;
        self.body.forced_direction = false;
        self.set_state(GhostState::Dead);
    }

    /// Escalates the Cruise Elroy tier once food runs low. Returns whether the tier changed.
    ///
    /// The tier never decreases within a level.
    pub fn update_elroy(&mut self, food_remaining: usize, level: &LevelData) -> bool {
        if self.id != GhostId::Blinky {
            return false;
        }
        let tier = if food_remaining <= level.elroy2_dots_left {
            2
        } else if food_remaining <= level.elroy1_dots_left {
            1
        } else {
            0
        };
        if tier > self.elroy {
            debug!(food_remaining, tier, "Cruise Elroy");
            self.elroy = tier;
            return true;
        }
        false
    }

    /// Advances the ghost by one tick.
    pub fn update(&mut self, ctx: &GhostContext, rng: &mut impl Rng, events: &mut dyn EventSink) {
        match self.state {
            GhostState::Locked => self.bounce(ctx.world),
            GhostState::LeavingHouse => self.leave_house(ctx.world, events),
            GhostState::Hunting => self.hunt(ctx),
            GhostState::Frightened => {
                self.frightened_ticks_left = self.frightened_ticks_left.saturating_sub(1);
                if self.frightened_ticks_left == 0 {
                    self.set_state(GhostState::Hunting);
                    self.hunt(ctx);
                } else {
                    self.roam(ctx, rng);
                }
            }
            GhostState::Dead => self.return_to_house(ctx.world, events),
            GhostState::EnteringHouse => self.enter_house(ctx.world, events),
        }
    }

    fn hunting_speed(&self, ctx: &GhostContext) -> f32 {
        if ctx.world.is_tunnel(self.tile()) {
            return ctx.level.ghost_tunnel_speed;
        }
        match self.elroy {
            2 => ctx.level.elroy2_speed,
            1 => ctx.level.elroy1_speed,
            _ => ctx.level.ghost_speed,
        }
    }

    /// The tile a hunting ghost heads for in the current phase.
    pub fn hunting_target(&self, ctx: &GhostContext) -> IVec2 {
        if ctx.mode == HuntingMode::Scatter && self.elroy == 0 {
            return self.id.scatter_corner();
        }
        self.chase_target(ctx)
    }

    fn chase_target(&self, ctx: &GhostContext) -> IVec2 {
        // The arcade overflow bug shifts "ahead of Pac-Man" to the left as well when facing up
        let ahead_of_pac = |n: i32| {
            let ahead = ctx.pac_tile + ctx.pac_dir.as_ivec2() * n;
            if ctx.pac_dir == Direction::Up {
                ahead + Direction::Left.as_ivec2() * n
            } else {
                ahead
            }
        };
        match self.id {
            GhostId::Blinky => ctx.pac_tile,
            GhostId::Pinky => ahead_of_pac(4),
            GhostId::Inky => ahead_of_pac(2) * 2 - ctx.blinky_tile,
            GhostId::Clyde => {
                if (self.tile() - ctx.pac_tile).length_squared() >= 8 * 8 {
                    ctx.pac_tile
                } else {
                    self.id.scatter_corner()
                }
            }
        }
    }

    fn hunt(&mut self, ctx: &GhostContext) {
        self.body.speed = self.hunting_speed(ctx);
        self.body.target_tile = Some(self.hunting_target(ctx));
        steer_towards_target(self, ctx.world);
        try_moving(self, ctx.world);
    }

    fn roam(&mut self, ctx: &GhostContext, rng: &mut impl Rng) {
        self.body.speed = if ctx.world.is_tunnel(self.tile()) {
            ctx.level.ghost_tunnel_speed
        } else {
            ctx.level.ghost_frightened_speed
        };
        self.body.target_tile = None;
        steer_randomly(self, ctx.world, rng);
        try_moving(self, ctx.world);
    }

    fn return_to_house(&mut self, world: &World, events: &mut dyn EventSink) {
        let house = world.house();
        self.body.speed = speed::GHOST_DEAD;
        self.body.target_tile = Some(house.entry);
        steer_towards_target(self, world);
        try_moving(self, world);

        let over_door = self.tile() == house.entry && (self.body.offset().x - HALF_TILE).abs() <= DOOR_TOLERANCE;
        if over_door {
            self.body.position = house.entry_position();
            self.body.set_direction(Direction::Down);
            self.set_state(GhostState::EnteringHouse);
            events.publish(GameEvent::GhostEntersHouse { ghost: self.id });
        }
    }

    /// Moves in a straight line without the movement kernel; used on scripted routes.
    fn slide(&mut self, dir: Direction, goal: Vec2) {
        let pixels = self.body.speed * BASE_PIXELS_PER_TICK;
        let before = self.tile();
        if dir.is_horizontal() {
            self.body.position.x = step_towards(self.body.position.x, goal.x, pixels);
        } else {
            self.body.position.y = step_towards(self.body.position.y, goal.y, pixels);
        }
        self.body.dir = dir;
        self.body.wish_dir = dir;
        self.body.could_move = true;
        self.body.changed_tile = self.tile() != before;
    }

    fn enter_house(&mut self, world: &World, events: &mut dyn EventSink) {
        let seat = world.house().seat_position(self.id.revival_seat());
        self.body.speed = speed::GHOST_INSIDE_HOUSE;
        let position = self.body.position;

        if position.y < seat.y {
            self.slide(Direction::Down, seat);
        } else if position.x != seat.x {
            let dir = if position.x < seat.x { Direction::Right } else { Direction::Left };
            self.slide(dir, seat);
        } else {
            self.bounty = 0;
            self.set_state(GhostState::LeavingHouse);
            events.publish(GameEvent::GhostRevived { ghost: self.id });
        }
    }

    fn leave_house(&mut self, world: &World, events: &mut dyn EventSink) {
        let house = world.house();
        let exit = house.entry_position();
        let center = house.seat_position(1);
        self.body.speed = speed::GHOST_INSIDE_HOUSE;
        let position = self.body.position;

        if position.x != exit.x {
            if position.y != center.y {
                let dir = if position.y < center.y { Direction::Down } else { Direction::Up };
                self.slide(dir, center);
            } else {
                let dir = if position.x < exit.x { Direction::Right } else { Direction::Left };
                self.slide(dir, exit);
            }
        } else if position.y > exit.y {
            self.slide(Direction::Up, exit);
        } else {
            self.body.set_direction(Direction::Left);
            self.body.forced_direction = false;
            self.set_state(GhostState::Hunting);
            events.publish(GameEvent::GhostLeavesHouse { ghost: self.id });
        }
    }

    fn bounce(&mut self, world: &World) {
        let Some(seat) = self.id.home_seat() else {
            return;
        };
        let center_y = world.house().seat_position(seat).y;
        self.body.speed = speed::GHOST_INSIDE_HOUSE;
        let (dir, goal_y) = match self.body.dir {
            Direction::Up => (Direction::Up, center_y - BOUNCE_AMPLITUDE),
            _ => (Direction::Down, center_y + BOUNCE_AMPLITUDE),
        };
        self.slide(dir, Vec2::new(self.body.position.x, goal_y));
        if self.body.position.y == goal_y {
            self.body.set_direction(dir.opposite());
        }
    }
}
