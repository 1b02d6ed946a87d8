//! This module contains the top-level game controller.
//!
//! A [`Game`] owns the level, the creatures and the top-level state machine. One call
//! to [`Game::tick`] advances the whole simulation by one step.

use glam::IVec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::config::{GameConfig, GameVariant};
use crate::constants::{durations, points, sec_to_ticks, tiles};
use crate::entity::bonus::{Bonus, BonusMovement};
use crate::entity::ghost::{Ghost, GhostContext, GhostId, GhostState};
use crate::entity::pac::{Pac, PowerTick};
use crate::error::{GameResult, StateError};
use crate::events::{EventQueue, EventSink, GameEvent};
use crate::map::direction::Direction;
use crate::map::world::World;
use crate::timer::TickTimer;

use self::autopilot::{Autopilot, Surroundings};
use self::house::HouseRules;
use self::hunting::{HuntingMode, HuntingSchedule};
use self::level::{Level, LevelData};
use self::state::{GameState, StateMachine};

pub mod autopilot;
pub mod house;
pub mod hunting;
pub mod level;
pub mod state;

/// Points and lives of the running game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    pub points: u32,
    pub lives: u32,
    extra_life_awarded: bool,
}

impl Score {
    fn new(lives: u32) -> Self {
        Self {
            points: 0,
            lives,
            extra_life_awarded: false,
        }
    }
}

/// The game simulation.
///
/// Events are published to `S` synchronously while a tick runs; the default sink
/// buffers them until the embedder drains it.
pub struct Game<S: EventSink = EventQueue> {
    config: GameConfig,
    world: World,
    level: Level,
    schedule: HuntingSchedule,
    house_rules: HouseRules,
    pac: Pac,
    ghosts: [Ghost; 4],
    bonus: Bonus,
    autopilot: Option<Autopilot>,
    fsm: StateMachine,
    score: Score,
    /// Ghosts eaten during the current ghost-dying pause; they stay frozen.
    killed_this_pause: SmallVec<[GhostId; 4]>,
    /// Set until the first ready countdown of a game has started.
    fresh_game: bool,
    ticks: u64,
    rng: SmallRng,
    sink: S,
}

impl<S: EventSink> Game<S> {
    /// Creates a game in the ready state of level 1.
    pub fn new(config: GameConfig, world: World, sink: S) -> Self {
        let mut rng = match config.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let world = match config.variant {
            GameVariant::PacMan => world,
            GameVariant::MsPacMan => world.with_upward_blocked(&[]),
        };
        let bonus_movement = match config.variant {
            GameVariant::PacMan => BonusMovement::Static,
            GameVariant::MsPacMan => BonusMovement::Wandering,
        };
        let level = Level::new(1, LevelData::for_variant(config.variant, 1, &mut rng), &world);

        let mut game = Self {
            schedule: HuntingSchedule::for_level(1),
            house_rules: HouseRules::for_level(1),
            pac: Pac::new(config.pac_immune),
            ghosts: GhostId::ALL.map(|id| Ghost::new(id, &world)),
            bonus: Bonus::new(bonus_movement),
            autopilot: config.demo_mode.then(Autopilot::default),
            fsm: StateMachine::new(GameState::Ready),
            score: Score::new(config.initial_lives),
            killed_this_pause: SmallVec::new(),
            fresh_game: true,
            ticks: 0,
            level,
            world,
            config,
            rng,
            sink,
        };
        info!(variant = game.config.variant.as_ref(), demo = game.config.demo_mode, "Game created");
        game.sink.publish(GameEvent::LevelStarted { level: 1 });
        game.enter_state(GameState::Ready);
        game
    }

    pub fn state(&self) -> GameState {
        self.fsm.current()
    }

    pub fn state_timer(&self) -> &TickTimer {
        self.fsm.timer()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    pub fn hunting_schedule(&self) -> &HuntingSchedule {
        &self.schedule
    }

    pub fn house_rules(&self) -> &HouseRules {
        &self.house_rules
    }

    pub fn pac(&self) -> &Pac {
        &self.pac
    }

    pub fn pac_mut(&mut self) -> &mut Pac {
        &mut self.pac
    }

    pub fn ghosts(&self) -> &[Ghost; 4] {
        &self.ghosts
    }

    pub fn ghost(&self, id: GhostId) -> &Ghost {
        &self.ghosts[id as usize]
    }

    pub fn ghost_mut(&mut self, id: GhostId) -> &mut Ghost {
        &mut self.ghosts[id as usize]
    }

    pub fn bonus(&self) -> &Bonus {
        &self.bonus
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    /// Ticks simulated since the game was created.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Manual steering: Pac-Man turns into `dir` at the next opportunity.
    pub fn steer_pac(&mut self, dir: Direction) {
        self.pac.body.wish_dir = dir;
    }

    /// Advances the simulation by one tick.
    ///
    /// The state timer advances at the end of the tick unless the state changed
    /// during it, so a state lasting `n` ticks sees `n` full updates.
    pub fn tick(&mut self) -> GameResult<()> {
        let transitions = self.fsm.transitions();
        self.update_state(self.fsm.current())?;
        if self.fsm.transitions() == transitions {
            self.fsm.timer_mut().advance();
        }
        self.ticks += 1;
        Ok(())
    }

    /// Leaves the current state and enters `to`.
    ///
    /// # Errors
    ///
    /// Changing a state into itself is a broken contract and fails with [`StateError::SelfLoop`].
    pub fn change_state(&mut self, to: GameState) -> GameResult<()> {
        let from = self.fsm.change(to)?;
        debug!(from = from.as_ref(), to = to.as_ref(), "State changed");
        self.exit_state(from);
        self.sink.publish(GameEvent::StateChanged { from, to });
        self.enter_state(to);
        Ok(())
    }

    /// Returns to the previous state without running its entry hook.
    ///
    /// # Errors
    ///
    /// Fails with [`StateError::NothingToResume`] if there is no previous state.
    pub fn resume_previous_state(&mut self) -> GameResult<()> {
        let (from, to) = self.fsm.resume()?;
        debug!(from = from.as_ref(), to = to.as_ref(), "State resumed");
        self.exit_state(from);
        self.sink.publish(GameEvent::StateChanged { from, to });
        Ok(())
    }

    /// Starts a new game on level 1 after the previous one ended.
    pub fn restart(&mut self) -> GameResult<()> {
        if self.state() == GameState::Ready {
            return Err(StateError::SelfLoop(GameState::Ready).into());
        }
        info!(score = self.score.points, "Restarting game");
        self.score = Score::new(self.config.initial_lives);
        self.fresh_game = true;
        self.start_level(1);
        self.change_state(GameState::Ready)
    }

    fn start_level(&mut self, number: u32) {
        let data = LevelData::for_variant(self.config.variant, number, &mut self.rng);
        self.level = Level::new(number, data, &self.world);
        self.schedule = HuntingSchedule::for_level(number);
        self.house_rules = HouseRules::for_level(number);
        for ghost in self.ghosts.iter_mut() {
            ghost.elroy = 0;
            ghost.dot_counter = 0;
        }
        self.bonus.deactivate();
        debug!(level = number, symbol = self.level.data.bonus_symbol.as_ref(), "Level started");
        self.sink.publish(GameEvent::LevelStarted { level: number });
    }

    fn enter_state(&mut self, state: GameState) {
        match state {
            GameState::Ready => {
                let duration = if self.fresh_game {
                    durations::READY_GAME_START
                } else {
                    durations::READY
                };
                self.fresh_game = false;
                self.fsm.timer_mut().reset(duration);
                self.fsm.timer_mut().start();
                self.pac.reset();
                for ghost in self.ghosts.iter_mut() {
                    ghost.reset(&self.world);
                }
                self.bonus.deactivate();
                self.killed_this_pause.clear();
            }
            GameState::Hunting => {
                self.schedule.start();
                self.sink.publish(GameEvent::ScatterPhaseStarted { phase: 0 });
            }
            GameState::PacmanDying => {
                self.fsm.timer_mut().reset(durations::PACMAN_DYING);
                self.fsm.timer_mut().start();
                self.pac.dead = true;
                self.pac.power_ticks_left = 0;
                self.bonus.deactivate();
                info!(tile = ?self.pac.tile(), lives = self.score.lives, "Pac-Man died");
                self.sink.publish(GameEvent::PacDied { tile: self.pac.tile() });
            }
            GameState::GhostDying => {
                self.fsm.timer_mut().reset(durations::GHOST_DYING);
                self.fsm.timer_mut().start();
                self.pac.body.visible = false;
            }
            GameState::LevelComplete => {
                let flashes = self.level.data.maze_flashes as u64;
                self.fsm
                    .timer_mut()
                    .reset(durations::LEVEL_COMPLETE_PAUSE + flashes * durations::MAZE_FLASH);
                self.fsm.timer_mut().start();
                self.pac.power_ticks_left = 0;
                self.bonus.deactivate();
                for ghost in self.ghosts.iter_mut() {
                    ghost.body.visible = false;
                }
                info!(level = self.level.number, score = self.score.points, "Level complete");
            }
            GameState::GameOver => {
                info!(score = self.score.points, level = self.level.number, "Game over");
            }
        }
    }

    fn exit_state(&mut self, state: GameState) {
        if state == GameState::GhostDying {
            self.pac.body.visible = true;
            self.killed_this_pause.clear();
        }
    }

    fn update_state(&mut self, state: GameState) -> GameResult<()> {
        match state {
            GameState::Ready => {
                if self.fsm.timer().has_expired() {
                    self.change_state(GameState::Hunting)?;
                }
            }
            GameState::Hunting => self.update_hunting()?,
            GameState::PacmanDying => {
                if self.fsm.timer().is_running_seconds(1) {
                    for ghost in self.ghosts.iter_mut() {
                        ghost.body.visible = false;
                    }
                }
                if self.fsm.timer().has_expired() {
                    self.score.lives = self.score.lives.saturating_sub(1);
                    self.house_rules.on_life_lost();
                    let next = if self.score.lives > 0 {
                        GameState::Ready
                    } else {
                        GameState::GameOver
                    };
                    self.change_state(next)?;
                }
            }
            GameState::GhostDying => {
                if self.fsm.timer().has_expired() {
                    self.resume_previous_state()?;
                } else {
                    self.update_ghosts(true);
                }
            }
            GameState::LevelComplete => {
                if self.fsm.timer().has_expired() {
                    self.start_level(self.level.number + 1);
                    self.change_state(GameState::Ready)?;
                }
            }
            GameState::GameOver => {}
        }
        Ok(())
    }

    fn update_hunting(&mut self) -> GameResult<()> {
        // The phase timer pauses while Pac-Man has power
        if !self.pac.has_power() {
            if let Some(phase) = self.schedule.on_tick() {
                self.on_phase_change(phase);
            }
        }

        self.house_rules.release_ghost(&mut self.ghosts, &mut self.pac, &mut self.sink);
        self.update_ghosts(false);
        self.update_pac();

        if self.level.food_remaining() == 0 {
            return self.change_state(GameState::LevelComplete);
        }

        let pac_tile = self.pac.tile();
        if let Some(points) = self.bonus.update(&self.world, pac_tile, &mut self.rng, &mut self.sink) {
            self.add_points(points);
        }

        self.check_collisions()
    }

    fn on_phase_change(&mut self, phase: usize) {
        let event = match HuntingSchedule::mode_of(phase) {
            HuntingMode::Scatter => GameEvent::ScatterPhaseStarted { phase },
            HuntingMode::Chase => GameEvent::ChasingPhaseStarted { phase },
        };
        self.sink.publish(event);
        for ghost in self.ghosts.iter_mut() {
            ghost.on_phase_change();
        }
    }

    /// Moves the ghosts. During the ghost-dying pause only returning ghosts move,
    /// except the ones eaten in this pause.
    fn update_ghosts(&mut self, returning_only: bool) {
        let ctx = GhostContext {
            world: &self.world,
            level: &self.level.data,
            mode: self.schedule.mode(),
            pac_tile: self.pac.tile(),
            pac_dir: self.pac.body.dir,
            blinky_tile: self.ghosts[GhostId::Blinky as usize].tile(),
        };
        for ghost in self.ghosts.iter_mut() {
            if returning_only
                && (!matches!(ghost.state, GhostState::Dead | GhostState::EnteringHouse)
                    || self.killed_this_pause.contains(&ghost.id))
            {
                continue;
            }
            ghost.update(&ctx, &mut self.rng, &mut self.sink);
        }
    }

    fn update_pac(&mut self) {
        match self.pac.tick_power() {
            PowerTick::StartsFading => self.sink.publish(GameEvent::PacStartsLosingPower),
            PowerTick::Lost => {
                debug!("Pac-Man lost power");
                self.level.ghosts_killed_by_energizer = 0;
                self.sink.publish(GameEvent::PacLostPower);
            }
            PowerTick::Active | PowerTick::Inactive => {}
        }

        if let Some(autopilot) = &self.autopilot {
            let env = Surroundings {
                world: &self.world,
                level: &self.level,
                ghosts: &self.ghosts,
                bonus: &self.bonus,
            };
            autopilot.steer(&mut self.pac, &env, &mut self.rng);
        }
        self.pac.update(&self.world, &self.level.data);

        let tile = self.pac.tile();
        match self.level.eat(&self.world, tile) {
            Some(energizer) => self.on_food_eaten(tile, energizer),
            None => self.pac.starving_ticks += 1,
        }
    }

    fn on_food_eaten(&mut self, tile: IVec2, energizer: bool) {
        self.pac.starving_ticks = 0;
        if energizer {
            self.add_points(points::ENERGIZER);
            self.pac.rest(durations::PAC_REST_ENERGIZER);
            self.level.ghosts_killed_by_energizer = 0;
            let power = sec_to_ticks(self.level.data.frightened_seconds);
            if power > 0 {
                self.pac.gain_power(power);
                self.sink.publish(GameEvent::PacGainsPower);
            }
            for ghost in self.ghosts.iter_mut() {
                ghost.frighten(power);
            }
        } else {
            self.add_points(points::PELLET);
            self.pac.rest(durations::PAC_REST_PELLET);
        }
        self.sink.publish(GameEvent::PacFoundFood { tile, energizer });

        self.house_rules.on_food_eaten(&mut self.ghosts);
        let remaining = self.level.food_remaining();
        self.ghosts[GhostId::Blinky as usize].update_elroy(remaining, &self.level.data);

        if points::BONUS_TRIGGERS.contains(&self.level.eaten_count()) {
            let ticks = match self.bonus.movement {
                BonusMovement::Static => self.rng.random_range(sec_to_ticks(9)..=sec_to_ticks(10)),
                BonusMovement::Wandering => sec_to_ticks(10),
            };
            let data = &self.level.data;
            self.bonus.activate(
                data.bonus_symbol,
                data.bonus_points,
                ticks,
                tiles::BONUS,
                &self.world,
                &mut self.rng,
            );
            self.sink.publish(GameEvent::BonusActivated { tile: self.bonus.tile() });
        }
    }

    fn add_points(&mut self, points: u32) {
        let before = self.score.points;
        self.score.points += points;
        let threshold = self.config.extra_life_score;
        if !self.score.extra_life_awarded && before < threshold && self.score.points >= threshold {
            self.score.extra_life_awarded = true;
            self.score.lives += 1;
            info!(lives = self.score.lives, "Extra life");
            self.sink.publish(GameEvent::ExtraLife { lives: self.score.lives });
        }
    }

    fn check_collisions(&mut self) -> GameResult<()> {
        let pac_tile = self.pac.tile();
        let prey: SmallVec<[usize; 4]> = (0..self.ghosts.len())
            .filter(|&i| self.ghosts[i].is(GhostState::Frightened) && self.ghosts[i].tile() == pac_tile)
            .collect();

        if !prey.is_empty() {
            for index in prey {
                let killed = self.level.ghosts_killed_by_energizer.min(3);
                let bounty = points::FIRST_GHOST_BOUNTY << killed;
                self.level.ghosts_killed_by_energizer += 1;
                self.level.ghosts_killed += 1;

                let ghost = &mut self.ghosts[index];
                ghost.kill(bounty);
                info!(ghost = ghost.id.as_ref(), bounty, "Ghost eaten");
                self.sink.publish(GameEvent::GhostEaten {
                    ghost: ghost.id,
                    tile: pac_tile,
                    bounty,
                });
                self.killed_this_pause.push(ghost.id);
                self.add_points(bounty);
                if self.level.ghosts_killed == 16 {
                    self.add_points(points::ALL_GHOSTS_BONUS);
                }
            }
            return self.change_state(GameState::GhostDying);
        }

        let killer = self
            .ghosts
            .iter()
            .find(|ghost| ghost.is(GhostState::Hunting) && ghost.tile() == pac_tile);
        if let Some(killer) = killer {
            if !self.pac.immune {
                debug!(ghost = killer.id.as_ref(), tile = ?pac_tile, "Pac-Man caught");
                return self.change_state(GameState::PacmanDying);
            }
        }
        Ok(())
    }
}
