use glam::IVec2;
use pacman_core::entity::ghost::{GhostId, GhostState};
use pacman_core::entity::steering::{accessible_directions, at_decision_point, choose_direction};
use pacman_core::map::direction::Direction;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

#[test]
fn test_ties_resolve_in_priority_order() {
    let world = common::classic_world();
    let mut pac = common::pac_at(IVec2::new(6, 8), Direction::Left, 1.0);
    // Every neighbor is one tile away from the target
    pac.body.target_tile = Some(IVec2::new(6, 8));

    assert_eq!(choose_direction(&pac, &world, true), Some(Direction::Up));

    pac.body.dir = Direction::Down;
    assert_eq!(choose_direction(&pac, &world, true), Some(Direction::Left));
}

#[test]
fn test_reverse_excluded_even_when_closer() {
    let world = common::classic_world();
    let mut pac = common::pac_at(IVec2::new(1, 4), Direction::Left, 1.0);
    pac.body.target_tile = Some(IVec2::new(26, 4));

    assert_eq!(choose_direction(&pac, &world, true), Some(Direction::Down));
    assert_eq!(choose_direction(&pac, &world, false), Some(Direction::Right));
}

#[test]
fn test_no_target_no_choice() {
    let world = common::classic_world();
    let pac = common::pac_at(IVec2::new(6, 8), Direction::Left, 1.0);
    assert_that(&choose_direction(&pac, &world, true)).is_none();
}

#[test]
fn test_hunting_ghost_cannot_turn_up_on_blocked_tile() {
    let world = common::classic_world();
    let blocked = IVec2::new(12, 26);
    assert_that(&world.is_upward_blocked(blocked)).is_true();

    let mut ghost = common::ghost_at(&world, GhostId::Blinky, blocked, GhostState::Hunting);
    ghost.body.set_direction(Direction::Right);
    ghost.body.target_tile = Some(IVec2::new(12, 0));
    assert_that(&choose_direction(&ghost, &world, true)).is_not_equal_to(Some(Direction::Up));

    // Frightened or dead ghosts ignore the restriction
    ghost.state = GhostState::Dead;
    assert_eq!(choose_direction(&ghost, &world, true), Some(Direction::Up));
}

#[test]
fn test_accessible_directions_skip_walls() {
    let world = common::classic_world();
    let pac = common::pac_at(IVec2::new(1, 4), Direction::Left, 1.0);

    let dirs = accessible_directions(&pac, &world, &[]);
    assert_that(&dirs.contains(&Direction::Up)).is_false();
    assert_that(&dirs.contains(&Direction::Left)).is_false();
    assert_eq!(dirs.len(), 2);
}

#[test]
fn test_decision_points() {
    let world = common::classic_world();
    let mut pac = common::pac_at(IVec2::new(6, 8), Direction::Left, 1.0);
    assert_that(&at_decision_point(&pac, &world)).is_false();

    pac.body.changed_tile = true;
    assert_that(&at_decision_point(&pac, &world)).is_true();

    pac.body.forced_direction = true;
    assert_that(&at_decision_point(&pac, &world)).is_false();
}
