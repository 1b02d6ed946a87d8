//! Headless attract-mode run: the autopilot plays and every event is logged.
//!
//! Usage: `pacman-demo [ticks] [seed]`

use anyhow::Context;
use pacman_core::config::GameConfig;
use pacman_core::events::EventQueue;
use pacman_core::game::state::GameState;
use pacman_core::game::Game;
use pacman_core::map::world::World;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

/// Ten minutes of simulated play.
const DEFAULT_TICKS: u64 = 36_000;

fn parse_arg<T: std::str::FromStr>(value: Option<String>, name: &str) -> anyhow::Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .map(|raw| raw.parse::<T>().with_context(|| format!("invalid {name}: {raw:?}")))
        .transpose()
}

fn main() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish()
        .with(ErrorLayer::default());
    tracing::subscriber::set_global_default(subscriber).context("Could not set global default")?;

    let mut args = std::env::args().skip(1);
    let ticks = parse_arg::<u64>(args.next(), "tick count")?.unwrap_or(DEFAULT_TICKS);
    let seed = parse_arg::<u64>(args.next(), "seed")?;

    let world = World::classic().context("Failed to build the classic maze")?;
    let mut game = Game::new(GameConfig::demo(seed), world, EventQueue::new());
    info!(ticks, seed = ?seed, "Starting demo");

    for _ in 0..ticks {
        game.tick()?;
        for event in game.sink_mut().drain() {
            info!(tick = game.ticks(), event = ?event, "Event");
        }
        if game.state() == GameState::GameOver {
            break;
        }
    }

    info!(
        ticks = game.ticks(),
        level = game.level().number,
        score = game.score().points,
        lives = game.score().lives,
        state = game.state().as_ref(),
        "Demo finished"
    );
    Ok(())
}
