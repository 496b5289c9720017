use std::time::Duration;

use pacman_ai::config::GameConfig;
use pacman_ai::constants::LOOP_TIME;
use pacman_ai::entity::ghost::{GhostMode, GhostType};
use pacman_ai::error::{ConfigError, GameError};
use pacman_ai::events::GameEvent;
use pacman_ai::game::Game;
use pacman_ai::map::direction::Direction;
use pacman_ai::map::grid::TraversalFlags;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

#[test]
fn test_new_game_announces_first_phase() {
    let mut game = common::game();

    let events: Vec<GameEvent> = game.drain_events().collect();
    assert_eq!(events, vec![GameEvent::ModeChanged(GhostMode::Scatter)]);
    assert_that(&game.score()).is_equal_to(0);
    assert!(!game.is_paused());
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = GameConfig {
        clyde_random_turn_chance: 2.0,
        ..common::config()
    };
    assert!(matches!(
        Game::new(config),
        Err(GameError::Config(ConfigError::OutOfUnitRange("clyde_random_turn_chance")))
    ));

    let config = GameConfig {
        mode_schedule: Vec::new(),
        ..common::config()
    };
    assert!(matches!(Game::new(config), Err(GameError::Config(ConfigError::EmptyModeSchedule))));
}

#[test]
fn test_board_without_player_start_is_rejected() {
    let board: Vec<&str> = pacman_ai::constants::RAW_BOARD
        .iter()
        .map(|row| if row.contains('0') { "#o..##.......  .......##..o#" } else { *row })
        .collect();

    assert!(matches!(Game::with_board(common::config(), &board), Err(GameError::MapParse(_))));
}

#[test]
fn test_moving_player_collects_pellets() {
    let mut game = common::game();
    let total = game.remaining_pellets();

    game.queue_direction(Direction::Left);
    let events = common::tick_game(&mut game, 30);

    assert!(game.remaining_pellets() < total);
    assert_that(&game.score()).is_equal_to(10 * (total - game.remaining_pellets()) as u32);
    assert!(events.contains(&GameEvent::ScoreUpdated(10)));
}

#[test]
fn test_pause_freezes_everything() {
    let mut game = common::game();
    game.queue_direction(Direction::Left);
    common::tick_game(&mut game, 30);

    game.pause();
    let player = game.player().position();
    let blinky = game.ghosts().ghost(GhostType::Blinky).position();
    let events = common::tick_game(&mut game, 120);

    assert!(events.is_empty());
    assert_that(&game.player().position()).is_equal_to(player);
    assert_that(&game.ghosts().ghost(GhostType::Blinky).position()).is_equal_to(blinky);

    game.resume();
    let events: Vec<GameEvent> = game.drain_events().collect();
    assert_eq!(events, vec![GameEvent::ModeChanged(GhostMode::Scatter)]);

    common::tick_game(&mut game, 10);
    assert!(game.player().position() != player);
}

#[test]
fn test_eating_a_ghost_scores_through_the_game() {
    let mut game = common::game();
    game.tick(LOOP_TIME);
    assert!(!game.ghosts().ghost(GhostType::Blinky).is_in_house());

    let spot = game.player().position();
    let ghosts = game.ghosts_mut();
    ghosts.on_power_pellet();
    ghosts.ghost_mut(GhostType::Blinky).set_position(spot);

    let outcome = game.tick(Duration::ZERO);
    assert_that(&outcome.collisions.eaten).is_equal_to(1);
    assert_that(&outcome.collisions.killer).is_none();
    assert_that(&game.score()).is_equal_to(200);
    assert_that(&game.ghosts().ghost(GhostType::Blinky).mode()).is_equal_to(GhostMode::Eaten);
}

#[test]
fn test_caught_player_resets_positions_but_keeps_score() {
    let mut game = common::game();
    game.queue_direction(Direction::Left);
    common::tick_game(&mut game, 30);
    let score = game.score();
    let remaining = game.remaining_pellets();

    let spot = game.player().position();
    game.ghosts_mut().ghost_mut(GhostType::Blinky).set_position(spot);
    let outcome = game.tick(Duration::ZERO);
    assert_that(&outcome.collisions.killer).is_equal_to(Some(GhostType::Blinky));

    game.reset_after_death();
    assert_that(&game.player().tile()).is_equal_to(game.grid().player_start());
    assert_that(&game.score()).is_equal_to(score);
    assert_that(&game.remaining_pellets()).is_equal_to(remaining);
    for ghost in game.ghosts().ghosts() {
        assert!(ghost.is_in_house());
    }
}

#[test]
fn test_restart_level_restores_board() {
    let mut game = common::game();
    let total = game.remaining_pellets();
    game.queue_direction(Direction::Left);
    common::tick_game(&mut game, 60);
    assert!(game.score() > 0);

    game.restart_level();
    assert_that(&game.remaining_pellets()).is_equal_to(total);
    assert_that(&game.score()).is_equal_to(0);
    assert_that(&game.ghosts().pattern_index()).is_equal_to(0);
}

#[test]
fn test_long_session_keeps_invariants() {
    let mut game = common::game();
    let script = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];
    let mut scored = 0u32;
    let mut remaining = game.remaining_pellets();

    for tick in 0..3_600usize {
        if tick % 150 == 0 {
            game.queue_direction(script[(tick / 150) % script.len()]);
        }

        let outcome = game.tick(LOOP_TIME);
        for event in game.drain_events() {
            if let GameEvent::ScoreUpdated(points) = event {
                scored += points;
            }
        }
        if outcome.collisions.killer.is_some() {
            game.reset_after_death();
        }

        assert!(game.remaining_pellets() <= remaining);
        remaining = game.remaining_pellets();
        assert_that(&game.score()).is_equal_to(scored);

        for ghost in game.ghosts().ghosts() {
            assert!(
                game.grid().is_walkable(ghost.tile(), TraversalFlags::GHOST | TraversalFlags::HOUSE),
                "{:?} left the maze at {}",
                ghost.ghost_type,
                ghost.tile()
            );
        }
        assert!(game.grid().is_walkable(game.player().tile(), TraversalFlags::PACMAN));
    }
}
