use anyhow::{Context, Result};
use pacman_ai::config::GameConfig;
use pacman_ai::constants::LOOP_TIME;
use pacman_ai::events::GameEvent;
use pacman_ai::game::Game;
use pacman_ai::map::direction::Direction;
use thousands::Separable;
use tracing::{debug, info, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Simulated length of the session, in ticks (60 per second).
const SESSION_TICKS: u32 = 60 * 90;
const DEFAULT_SEED: u64 = 0x5EED;

/// Direction changes fed to the player, keyed by tick.
const SCRIPT: &[(u32, Direction)] = &[
    (0, Direction::Left),
    (40, Direction::Up),
    (110, Direction::Left),
    (180, Direction::Down),
    (260, Direction::Right),
    (330, Direction::Up),
    (420, Direction::Left),
    (520, Direction::Up),
    (640, Direction::Right),
    (760, Direction::Down),
    (900, Direction::Left),
    (1100, Direction::Up),
    (1300, Direction::Right),
    (1500, Direction::Down),
];

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(ErrorLayer::default())
        .init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<u64>().with_context(|| format!("Invalid seed: {arg}"))?,
        None => DEFAULT_SEED,
    };

    let mut game = Game::new(GameConfig::default().with_seed(seed)).context("Failed to initialize game")?;
    info!(seed, ticks = SESSION_TICKS, "Starting headless session");

    let mut deaths = 0u32;
    let mut script = SCRIPT.iter().peekable();

    for tick in 0..SESSION_TICKS {
        while let Some((_, direction)) = script.next_if(|(at, _)| *at <= tick) {
            debug!(tick, direction = ?direction, "Scripted input");
            game.queue_direction(*direction);
        }

        let outcome = game.tick(LOOP_TIME);

        let events: Vec<GameEvent> = game.drain_events().collect();
        for event in events {
            match event {
                GameEvent::ScoreUpdated(_) => {}
                GameEvent::PlayerDied { ghost } => {
                    warn!(tick, ghost = ghost.as_str(), "Player died");
                }
                other => {
                    if let Some(cue) = other.sound_cue() {
                        debug!(tick, cue = ?cue, "Sound cue");
                    }
                    info!(tick, event = ?other, "Event");
                }
            }
        }

        if outcome.collisions.killer.is_some() {
            deaths += 1;
            game.reset_after_death();
        }

        if game.remaining_pellets() == 0 {
            info!(tick, "Board cleared");
            break;
        }
    }

    info!(
        score = %game.score().separate_with_commas(),
        deaths,
        remaining_pellets = game.remaining_pellets(),
        "Session finished"
    );

    Ok(())
}
