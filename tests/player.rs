use std::time::Duration;

use glam::{IVec2, Vec2};
use pacman_ai::entity::player::PlayerMotion;
use pacman_ai::events::GameEvent;
use pacman_ai::map::direction::Direction;
use pacman_ai::map::grid::MazeGrid;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

const FRAME: Duration = Duration::from_nanos(1_000_000_000 / 60);

fn player_at(grid: &MazeGrid, position: Vec2, direction: Option<Direction>) -> PlayerMotion {
    let mut player = PlayerMotion::new(grid, &common::config());
    player.set_position(position);
    player.set_direction(direction);
    player
}

fn teleports(events: &[GameEvent]) -> Vec<Vec2> {
    events
        .iter()
        .filter_map(|event| match event {
            GameEvent::PlayerTeleported { to, .. } => Some(*to),
            _ => None,
        })
        .collect()
}

#[test]
fn test_starts_stationary_on_start_tile() {
    let grid = common::grid();
    let player = PlayerMotion::new(&grid, &common::config());

    assert_that(&player.tile()).is_equal_to(IVec2::new(13, 23));
    assert_that(&player.direction()).is_none();
    assert_that(&player.velocity()).is_equal_to(Vec2::ZERO);
    assert!(player.is_aligned());
}

#[test]
fn test_turn_into_wall_stays_queued() {
    let grid = common::grid();
    let mut player = PlayerMotion::new(&grid, &common::config());
    let mut events = Vec::new();

    player.queue_direction(Direction::Up);
    player.update(FRAME, &grid, &mut events);

    assert_that(&player.direction()).is_none();
    assert_that(&player.next_direction()).is_equal_to(Some(Direction::Up));
    assert_that(&player.position()).is_equal_to(common::center(13, 23));
}

#[test]
fn test_turn_requires_alignment_and_snaps() {
    let grid = common::grid();
    let center = common::center(12, 23);

    // Ten units off center is outside the tolerance
    let mut player = player_at(&grid, center + Vec2::new(10.0, 0.0), Some(Direction::Left));
    let mut events = Vec::new();
    player.queue_direction(Direction::Up);
    player.update(FRAME, &grid, &mut events);
    assert_that(&player.direction()).is_equal_to(Some(Direction::Left));
    assert_that(&player.next_direction()).is_equal_to(Some(Direction::Up));

    let mut player = player_at(&grid, center + Vec2::new(3.0, 0.0), Some(Direction::Left));
    player.queue_direction(Direction::Up);
    player.update(FRAME, &grid, &mut events);
    assert_that(&player.direction()).is_equal_to(Some(Direction::Up));
    assert_that(&player.next_direction()).is_none();
    assert_that(&player.position().x).is_equal_to(center.x);
    assert!(player.position().y < center.y);
}

#[test]
fn test_reversal_is_immediate() {
    let grid = common::grid();
    let mut player = player_at(&grid, common::center(9, 23) + Vec2::new(11.0, 0.0), Some(Direction::Left));
    let before = player.position();
    let mut events = Vec::new();

    player.queue_direction(Direction::Right);
    player.update(FRAME, &grid, &mut events);

    assert_that(&player.direction()).is_equal_to(Some(Direction::Right));
    assert!(player.position().x > before.x);
}

#[test]
fn test_stops_on_center_before_wall() {
    let grid = common::grid();
    let mut player = player_at(&grid, common::center(9, 23), Some(Direction::Left));
    let mut events = Vec::new();

    for _ in 0..120 {
        player.update(FRAME, &grid, &mut events);
    }

    assert_that(&player.direction()).is_none();
    assert_eq!(player.position(), common::center(6, 23));
    assert_eq!(player.position(), Vec2::new(208.0, 752.0));
}

#[test]
fn test_tunnel_teleports_once_each_way() {
    let grid = common::grid();
    let mut player = player_at(&grid, common::center(3, 14), Some(Direction::Left));
    let mut events = Vec::new();

    let mut ticks = 0;
    while teleports(&events).is_empty() && ticks < 120 {
        player.update(FRAME, &grid, &mut events);
        ticks += 1;
    }
    assert_eq!(teleports(&events), vec![common::center(26, 14)]);
    assert_that(&player.tile()).is_equal_to(IVec2::new(26, 14));
    assert_that(&player.direction()).is_equal_to(Some(Direction::Left));

    // Turning around right away sends the player back through the other end
    player.queue_direction(Direction::Right);
    for _ in 0..120 {
        player.update(FRAME, &grid, &mut events);
    }
    assert_eq!(teleports(&events), vec![common::center(26, 14), common::center(1, 14)]);
    assert!(!player.is_teleporting());
    assert_that(&player.tile().y).is_equal_to(14);
    assert!(player.tile().x < 13);
}

#[test]
fn test_snapshot_reports_velocity() {
    let grid = common::grid();
    let player = player_at(&grid, common::center(12, 23), Some(Direction::Down));

    let snapshot = player.snapshot();
    assert_that(&snapshot.position).is_equal_to(common::center(12, 23));
    assert_that(&snapshot.velocity).is_equal_to(Vec2::new(0.0, 160.0));
    assert!(snapshot.aligned);
}

#[test]
fn test_reset_returns_to_start() {
    let grid = common::grid();
    let mut player = player_at(&grid, common::center(1, 1), Some(Direction::Right));
    player.queue_direction(Direction::Down);

    player.reset();
    assert_that(&player.tile()).is_equal_to(grid.player_start());
    assert_that(&player.direction()).is_none();
    assert_that(&player.next_direction()).is_none();
}
