//! Pac-Man simulation library crate.
//!
//! The crate has no rendering or input layer. An embedder builds a [`game::Game`],
//! calls [`game::Game::tick`] sixty times per second and reacts to the published
//! [`events::GameEvent`]s.

pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod events;
pub mod game;
pub mod map;
pub mod timer;
