//! Per-frame turn resolution
//!
//! Reads one command while idle, animates the queued move, commits it,
//! resolves gravity and evaluates win/lose.

use glam::IVec2;

use super::rules;
use super::state::{BlockedNudge, GameEvent, GameState, Phase};
use super::tile::ItemKind;
use crate::consts::*;

/// Edge-triggered commands for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub undo: bool,
    pub reset: bool,
}

impl TickInput {
    /// Requested direction, first of up/down/left/right
    pub fn direction(&self) -> Option<IVec2> {
        if self.up {
            Some(IVec2::NEG_Y)
        } else if self.down {
            Some(IVec2::Y)
        } else if self.left {
            Some(IVec2::NEG_X)
        } else if self.right {
            Some(IVec2::X)
        } else {
            None
        }
    }

    /// Replay command letter: `U D L R`, `Z` undo, `X` reset
    pub fn from_command(cmd: char) -> Option<Self> {
        let mut input = Self::default();
        match cmd.to_ascii_uppercase() {
            'U' => input.up = true,
            'D' => input.down = true,
            'L' => input.left = true,
            'R' => input.right = true,
            'Z' => input.undo = true,
            'X' => input.reset = true,
            _ => return None,
        }
        Some(input)
    }
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.particles.update(dt);

    match state.phase {
        Phase::Complete => return,
        Phase::Hurt => {
            if state.hide_timer.update(dt) {
                state.undo_last_move();
                state.phase = Phase::Idle;
            }
            return;
        }
        _ => {}
    }

    if let Some(mut nudge) = state.blocked {
        nudge.progress += BLOCKED_RATE * dt;
        state.blocked = (nudge.progress < 1.0).then_some(nudge);
    }

    match state.phase {
        Phase::Idle => {
            if let Some(dir) = input.direction() {
                handle_direction_input(state, dir);
            } else if input.undo {
                state.undo_last_move();
            } else if input.reset {
                state.reset_level();
            }
        }
        Phase::Committing { falling } => {
            let rate = if falling { FALL_RATE } else { MOVE_RATE };
            state.move_progress += rate * dt;
            if state.move_progress >= 1.0 {
                commit_move(state, falling);
            }
        }
        Phase::Hurt | Phase::Complete => {}
    }
}

fn handle_direction_input(state: &mut GameState, dir: IVec2) {
    let target = state.chain.head() + dir;

    // Pre-move positions only: a segment leaving this turn still blocks its cell
    if state.level.is_blocking(target) || state.chain.occupies(target) {
        state.blocked = Some(BlockedNudge { dir, progress: 0.0 });
        state.push_event(GameEvent::Blocked);
        return;
    }

    state.save_snapshot();
    state.moves += 1;

    match state.level.item_at(target) {
        Some(ItemKind::Grow) => {
            state.level.collect_item(ItemKind::Grow, target);
            state.particles.emit(target, PARTICLES_PER_EMIT);
            state.chain.expand(dir);
            start_commit(state, false);
            state.push_event(GameEvent::Grew);
            log::debug!("Grew to length {} at {}", state.chain.len(), target);
        }
        Some(ItemKind::Shrink) => {
            state.level.collect_item(ItemKind::Shrink, target);
            state.particles.emit(target, PARTICLES_PER_EMIT);
            if state.chain.shrink() {
                state.push_event(GameEvent::Shrank);
                handle_move(state, dir);
                log::debug!("Shrank to length {} at {}", state.chain.len(), target);
            } else {
                let head = state.chain.head();
                state.particles.emit(head, PARTICLES_PER_EMIT);
                handle_lose(state);
            }
        }
        None => {
            handle_move(state, dir);
            state.push_event(GameEvent::Moved);
            log::debug!("Move {} -> {}", dir, target);
        }
    }
}

fn handle_move(state: &mut GameState, dir: IVec2) {
    state.chain.begin_move(dir);
    start_commit(state, false);
}

fn start_commit(state: &mut GameState, falling: bool) {
    state.phase = Phase::Committing { falling };
    state.move_progress = 0.0;
}

/// Apply the finished move, chain into a fall if unsupported, then judge the turn
fn commit_move(state: &mut GameState, was_falling: bool) {
    state.chain.commit();
    state.move_progress = 0.0;

    if rules::should_fall(&state.level, &state.chain) {
        state.chain.begin_fall();
        start_commit(state, true);
    } else {
        state.phase = Phase::Idle;
        if was_falling {
            state.push_event(GameEvent::Landed);
        }
    }

    // Both checks run on every commit; a turn can complete and lose at once
    if state.check_win_condition() {
        state.chain.clear_directions();
        state.phase = Phase::Complete;
        state.push_event(GameEvent::LevelComplete {
            level: state.level_index,
        });
        log::info!("Level {} complete in {} moves", state.level_index, state.moves);
    }

    if state.check_lose_condition() {
        let hazards: Vec<IVec2> = state
            .chain
            .segments()
            .iter()
            .map(|s| s.pos)
            .filter(|&pos| state.level.is_lose(pos))
            .collect();
        for pos in hazards {
            state.particles.emit(pos, PARTICLES_PER_EMIT);
        }
        handle_lose(state);
    }
}

/// Feed one command, then tick with no input until the turn is over
/// (idle again, or the level is complete). Returns the frames spent.
pub fn play_turn(state: &mut GameState, input: &TickInput, dt: f32) -> u32 {
    const MAX_FRAMES: u32 = 10_000;

    tick(state, input, dt);
    let mut frames = 1;
    while !(state.is_idle() || state.is_complete()) && frames < MAX_FRAMES {
        tick(state, &TickInput::default(), dt);
        frames += 1;
    }
    frames
}

/// Hide the chain and schedule the automatic undo
fn handle_lose(state: &mut GameState) {
    state.chain.clear_directions();
    state.move_progress = 0.0;
    state.phase = Phase::Hurt;
    state.hide_timer.start();
    state.push_event(GameEvent::Hurt);
    log::info!("Lost on level {}, undoing", state.level_index);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelData;

    fn state(rows: &[&str]) -> GameState {
        GameState::new(0, &LevelData::parse(&rows.join("\n")).unwrap(), 12345)
    }

    fn press(dir: IVec2) -> TickInput {
        TickInput {
            up: dir == IVec2::NEG_Y,
            down: dir == IVec2::Y,
            left: dir == IVec2::NEG_X,
            right: dir == IVec2::X,
            ..Default::default()
        }
    }

    /// Tick with no input until the state settles (idle, complete or hurt)
    fn settle(state: &mut GameState) {
        for _ in 0..10_000 {
            if !state.is_moving() {
                return;
            }
            tick(state, &TickInput::default(), SIM_DT);
        }
        panic!("state never settled");
    }

    /// Tick through the lose hold
    fn wait_out_hurt(state: &mut GameState) {
        for _ in 0..10_000 {
            if !state.is_hidden() {
                return;
            }
            tick(state, &TickInput::default(), SIM_DT);
        }
        panic!("hide timer never finished");
    }

    fn step(state: &mut GameState, dir: IVec2) {
        tick(state, &press(dir), SIM_DT);
        settle(state);
    }

    #[test]
    fn test_direction_priority() {
        let input = TickInput {
            left: true,
            down: true,
            ..Default::default()
        };
        assert_eq!(input.direction(), Some(IVec2::Y));
        assert_eq!(TickInput::default().direction(), None);
    }

    #[test]
    fn test_grow_then_win() {
        let mut s = state(&["_PG.W"]);
        assert_eq!(s.chain.head(), IVec2::new(1, 0));

        step(&mut s, IVec2::X);
        assert_eq!(s.chain.positions(), vec![IVec2::new(2, 0), IVec2::new(1, 0)]);
        assert!(s.grow_items().is_empty());
        assert!(!s.renderables().iter().any(|r| r.pos == IVec2::new(2, 0)));
        assert!(s.drain_events().contains(&GameEvent::Grew));

        step(&mut s, IVec2::X);
        assert!(!s.is_complete());
        step(&mut s, IVec2::X);
        assert_eq!(s.chain.head(), IVec2::new(4, 0));
        assert!(s.check_win_condition());
        assert!(s.is_complete());
        assert!(s.drain_events().contains(&GameEvent::LevelComplete { level: 0 }));
    }

    #[test]
    fn test_complete_freezes_input() {
        let mut s = state(&["PW"]);
        step(&mut s, IVec2::X);
        assert!(s.is_complete());
        tick(&mut s, &press(IVec2::NEG_X), SIM_DT);
        settle(&mut s);
        assert_eq!(s.chain.head(), IVec2::new(1, 0));
        assert_eq!(s.undo.len(), 1);
    }

    #[test]
    fn test_win_gated_on_grow_items() {
        let mut s = state(&["PW.G", "____"]);
        step(&mut s, IVec2::X);
        assert_eq!(s.chain.head(), IVec2::new(1, 0));
        assert!(!s.check_win_condition());
        assert!(s.is_idle());
    }

    #[test]
    fn test_blocked_input_changes_nothing() {
        let mut s = state(&["P..", "___"]);
        let before = s.chain.positions();
        tick(&mut s, &press(IVec2::NEG_X), SIM_DT);
        assert!(s.is_idle());
        assert_eq!(s.chain.positions(), before);
        assert!(s.undo.is_empty());
        assert!(s.blocked.is_some());
        assert_eq!(s.drain_events(), vec![GameEvent::Blocked]);

        // Static terrain below blocks too
        tick(&mut s, &press(IVec2::Y), SIM_DT);
        assert_eq!(s.chain.positions(), before);
        assert!(s.undo.is_empty());
    }

    #[test]
    fn test_blocked_nudge_expires() {
        let mut s = state(&["P..", "___"]);
        tick(&mut s, &press(IVec2::NEG_X), SIM_DT);
        for _ in 0..20 {
            tick(&mut s, &TickInput::default(), SIM_DT);
        }
        assert!(s.blocked.is_none());
    }

    #[test]
    fn test_self_collision_uses_pre_move_positions() {
        let mut s = state(&["....", "....", "____"]);
        s.init_player(&[
            IVec2::new(0, 0),
            IVec2::new(1, 0),
            IVec2::new(1, 1),
            IVec2::new(0, 1),
        ]);
        // The tail would vacate (0, 1) this turn, but it still blocks
        tick(&mut s, &press(IVec2::Y), SIM_DT);
        assert!(s.is_idle());
        assert!(s.undo.is_empty());
        assert_eq!(s.drain_events(), vec![GameEvent::Blocked]);
    }

    #[test]
    fn test_move_into_own_body_is_blocked() {
        let mut s = state(&["BBP.", "____"]);
        tick(&mut s, &press(IVec2::NEG_X), SIM_DT);
        assert!(s.is_idle());
        assert!(s.undo.is_empty());
    }

    #[test]
    fn test_input_dropped_while_committing() {
        let mut s = state(&["P...", "____"]);
        tick(&mut s, &press(IVec2::X), SIM_DT);
        assert!(s.is_moving());
        tick(&mut s, &press(IVec2::X), SIM_DT);
        settle(&mut s);
        assert_eq!(s.chain.head(), IVec2::new(1, 0));
        assert_eq!(s.undo.len(), 1);
    }

    #[test]
    fn test_progress_does_not_advance_on_input_frame() {
        let mut s = state(&["P...", "____"]);
        tick(&mut s, &press(IVec2::X), SIM_DT);
        assert_eq!(s.move_progress(), 0.0);
        tick(&mut s, &TickInput::default(), SIM_DT);
        assert!((s.move_progress() - MOVE_RATE * SIM_DT).abs() < 1e-6);
    }

    #[test]
    fn test_fall_until_supported() {
        let mut s = state(&[".P.", "_..", "...", "...", "___"]);
        tick(&mut s, &press(IVec2::X), SIM_DT);
        // Run the deliberate move to its commit
        while !s.is_falling() {
            assert!(s.is_moving(), "move should chain into a fall");
            tick(&mut s, &TickInput::default(), SIM_DT);
        }
        assert_eq!(s.chain.head(), IVec2::new(2, 0));
        assert_eq!(s.segments()[0].dir, IVec2::Y);

        settle(&mut s);
        assert_eq!(s.chain.head(), IVec2::new(2, 3));
        assert!(!s.is_falling());
        assert!(s.drain_events().contains(&GameEvent::Landed));
        // A whole fall is one undoable action
        assert_eq!(s.undo.len(), 1);
    }

    #[test]
    fn test_fall_is_faster_than_move() {
        let mut s = state(&[".P.", "_..", "...", "___"]);
        tick(&mut s, &press(IVec2::X), SIM_DT);
        let mut move_frames = 0;
        while !s.is_falling() {
            tick(&mut s, &TickInput::default(), SIM_DT);
            move_frames += 1;
        }
        let mut fall_frames = 0;
        let start = s.chain.head();
        while s.chain.head() == start {
            tick(&mut s, &TickInput::default(), SIM_DT);
            fall_frames += 1;
        }
        assert!(fall_frames < move_frames);
    }

    #[test]
    fn test_lose_auto_undoes() {
        let mut s = state(&["PL.", "___"]);
        let before_chain = s.chain.positions();
        let before_items = s.items().clone();
        let before_renderables = s.renderables().to_vec();

        step(&mut s, IVec2::X);
        assert!(s.check_lose_condition());
        assert!(s.is_hidden());
        assert!(!s.particles.is_empty());
        assert!(s.drain_events().contains(&GameEvent::Hurt));

        // Input during the hold is dropped
        tick(&mut s, &press(IVec2::X), SIM_DT);
        assert!(s.is_hidden());

        wait_out_hurt(&mut s);
        assert!(s.is_idle());
        assert_eq!(s.chain.positions(), before_chain);
        assert_eq!(s.items(), &before_items);
        assert_eq!(s.renderables(), before_renderables.as_slice());
        assert!(s.undo.is_empty());
        assert!(s.drain_events().contains(&GameEvent::Undone));
    }

    #[test]
    fn test_body_segment_on_hazard_loses() {
        // After the move both segments fall; only the body lands on the hazard
        let mut s = state(&["BP..", ".L..", "____"]);
        step(&mut s, IVec2::X);
        assert_eq!(s.chain.positions(), vec![IVec2::new(2, 1), IVec2::new(1, 1)]);
        assert!(!s.level.is_lose(s.chain.head()));
        assert!(s.check_lose_condition());
        assert!(s.is_hidden());

        wait_out_hurt(&mut s);
        assert_eq!(s.chain.positions(), vec![IVec2::new(1, 0), IVec2::new(0, 0)]);
    }

    #[test]
    fn test_win_and_lose_on_same_commit_both_fire() {
        use crate::sim::Tile;

        // Head starts on the hazard, which ASCII cannot express
        let mut s = state(&["P..", "___"]);
        s.init_level(&[
            vec![Tile::Empty, Tile::Lose, Tile::Win],
            vec![Tile::Static1; 3],
        ]);
        s.init_player(&[IVec2::new(1, 0), IVec2::new(0, 0)]);

        step(&mut s, IVec2::X);
        assert!(s.check_win_condition());
        assert!(s.check_lose_condition());
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::LevelComplete { level: 0 }));
        assert!(events.contains(&GameEvent::Hurt));

        // The lose path still runs its hold and undo
        assert!(s.is_hidden());
        wait_out_hurt(&mut s);
        assert_eq!(s.chain.head(), IVec2::new(1, 0));
        assert!(s.drain_events().contains(&GameEvent::Undone));
    }

    #[test]
    fn test_shrink_at_length_one_loses() {
        let mut s = state(&["PS.", "___"]);
        tick(&mut s, &press(IVec2::X), SIM_DT);
        assert!(s.is_hidden());
        assert!(s.shrink_items().is_empty());
        assert_eq!(s.chain.len(), 1);

        wait_out_hurt(&mut s);
        assert_eq!(s.chain.head(), IVec2::new(0, 0));
        assert_eq!(s.shrink_items(), &[IVec2::new(1, 0)]);
    }

    #[test]
    fn test_shrink_drops_tail_then_moves() {
        let mut s = state(&["BPS.", "____"]);
        step(&mut s, IVec2::X);
        assert_eq!(s.chain.positions(), vec![IVec2::new(2, 0)]);
        assert!(s.shrink_items().is_empty());
        assert!(s.drain_events().contains(&GameEvent::Shrank));
    }

    #[test]
    fn test_undo_round_trip_after_grow() {
        let mut s = state(&["PG..", "____"]);
        let chain = s.chain.positions();
        let items = s.items().clone();
        let renderables = s.renderables().to_vec();

        step(&mut s, IVec2::X);
        step(&mut s, IVec2::X);
        assert_eq!(s.chain.len(), 2);

        tick(&mut s, &TickInput { undo: true, ..Default::default() }, SIM_DT);
        tick(&mut s, &TickInput { undo: true, ..Default::default() }, SIM_DT);
        assert_eq!(s.chain.positions(), chain);
        assert_eq!(s.items(), &items);
        assert_eq!(s.renderables(), renderables.as_slice());
        assert_eq!(s.moves, 0);

        // Extra undo is a no-op
        tick(&mut s, &TickInput { undo: true, ..Default::default() }, SIM_DT);
        assert_eq!(s.chain.positions(), chain);
    }

    #[test]
    fn test_reset_restores_level() {
        let mut s = state(&["PG..", "____"]);
        step(&mut s, IVec2::X);
        s.drain_events();
        tick(&mut s, &TickInput { reset: true, ..Default::default() }, SIM_DT);
        assert_eq!(s.chain.positions(), vec![IVec2::new(0, 0)]);
        assert_eq!(s.grow_items(), &[IVec2::new(1, 0)]);
        assert!(s.undo.is_empty());
        assert_eq!(s.drain_events(), vec![GameEvent::LevelReset]);
    }

    #[test]
    fn test_render_positions_interpolate() {
        let mut s = state(&["P..", "___"]);
        tick(&mut s, &press(IVec2::X), SIM_DT);
        tick(&mut s, &TickInput::default(), SIM_DT);
        let x = s.render_positions()[0].x;
        assert!(x > 0.0 && x < 1.0);
        // Authoritative position is untouched mid-move
        assert_eq!(s.chain.head(), IVec2::new(0, 0));
    }

    #[test]
    fn test_command_letters() {
        assert_eq!(TickInput::from_command('r'), Some(press(IVec2::X)));
        assert_eq!(TickInput::from_command('U'), Some(press(IVec2::NEG_Y)));
        assert!(TickInput::from_command('Z').unwrap().undo);
        assert!(TickInput::from_command('x').unwrap().reset);
        assert_eq!(TickInput::from_command('?'), None);
    }

    #[test]
    fn test_play_turn_waits_out_the_lose_hold() {
        let mut s = state(&["PL.", "___"]);
        let frames = play_turn(&mut s, &press(IVec2::X), SIM_DT);
        // Move (12 frames) plus the hide hold (54 frames)
        assert!(frames > 60);
        assert!(s.is_idle());
        assert_eq!(s.chain.head(), IVec2::new(0, 0));
    }
}
