//! Whole-level scenarios driven through the public API

use glam::IVec2;

use long_cat::consts::SIM_DT;
use long_cat::levels::builtin_levels;
use long_cat::progress::Progress;
use long_cat::scene::{Scene, SceneManager};
use long_cat::sim::{GameEvent, GameState, TickInput, play_turn};

fn replay(state: &mut GameState, moves: &str) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for cmd in moves.chars() {
        let input = TickInput::from_command(cmd).expect("valid command");
        play_turn(state, &input, SIM_DT);
        events.extend(state.drain_events());
    }
    events
}

#[test]
fn first_level_solution() {
    let levels = builtin_levels();
    let mut state = GameState::new(0, &levels[0], 42);

    let events = replay(&mut state, "RRURRRRD");

    assert!(state.is_complete());
    assert_eq!(state.moves, 8);
    assert_eq!(state.chain.len(), 4);
    assert_eq!(state.chain.head(), IVec2::new(8, 3));
    assert!(state.grow_items().is_empty());
    assert_eq!(events.last(), Some(&GameEvent::LevelComplete { level: 0 }));
    assert_eq!(events.iter().filter(|e| **e == GameEvent::Grew).count(), 1);
}

#[test]
fn win_tile_without_items_does_not_complete() {
    let levels = builtin_levels();
    let mut state = GameState::new(0, &levels[0], 42);

    // Walk straight to the goal, skipping the grow item
    let events = replay(&mut state, "RRRRRR");
    assert!(!state.is_complete());
    assert!(!events.iter().any(|e| matches!(e, GameEvent::LevelComplete { .. })));
}

#[test]
fn undo_all_the_way_back() {
    let levels = builtin_levels();
    let mut state = GameState::new(0, &levels[0], 42);
    let start = state.chain.positions();
    let items = state.items().clone();

    replay(&mut state, "RRUR");
    assert_eq!(state.chain.len(), 4);
    replay(&mut state, "ZZZZZ");

    assert_eq!(state.chain.positions(), start);
    assert_eq!(state.items(), &items);
    assert_eq!(state.moves, 0);
}

#[test]
fn reset_mid_level() {
    let levels = builtin_levels();
    let mut state = GameState::new(0, &levels[0], 42);
    let start = state.to_ascii();

    let events = replay(&mut state, "RRURX");
    assert_eq!(events.last(), Some(&GameEvent::LevelReset));
    assert_eq!(state.to_ascii(), start);
    assert!(state.undo.is_empty());
}

#[test]
fn completion_unlocks_the_next_level() {
    let levels = builtin_levels();
    let mut progress = Progress::new();
    let mut scenes = SceneManager::new(levels.len());
    let mut state = GameState::new(0, &levels[0], 42);

    assert!(!progress.is_level_available(1));
    for event in replay(&mut state, "RRURRRRD") {
        scenes.on_game_event(&event, &mut progress);
    }
    assert!(progress.is_level_available(1));
    assert!(scenes.is_transitioning());

    for _ in 0..120 {
        scenes.update(&Default::default(), &progress, SIM_DT);
    }
    assert_eq!(scenes.scene(), Scene::LevelSelect { cursor: 1 });
}
