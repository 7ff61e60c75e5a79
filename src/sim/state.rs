//! Game state aggregate and outgoing events
//!
//! Owns the level, the chain, the undo stack and the transient turn state.
//! Only `tick` and the load/undo/reset entry points below mutate it.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::chain::{Chain, Segment};
use super::level::{ItemState, Level, Renderable};
use super::particles::ParticleSystem;
use super::rules;
use super::tile::Tile;
use super::timer::Timer;
use super::undo::UndoStack;
use crate::consts::HIDE_DURATION;
use crate::ease_out_quad;
use crate::levels::LevelData;

/// Turn phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// At rest, accepting input
    Idle,
    /// Animating a queued move; input is dropped
    Committing { falling: bool },
    /// Lost: chain hidden until the hide timer undoes the move
    Hurt,
    /// Level won; frozen until the scene layer moves on
    Complete,
}

/// Signals for the audio/scene layers, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A plain move was accepted
    Moved,
    /// Direction rejected (wall or own body)
    Blocked,
    Grew,
    Shrank,
    /// A fall ended on solid ground
    Landed,
    /// Lose condition hit; auto-undo pending
    Hurt,
    Undone,
    LevelReset,
    LevelComplete { level: usize },
}

/// Cosmetic shove toward a blocked direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockedNudge {
    pub dir: IVec2,
    pub progress: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Index of the loaded level (reported on completion)
    pub level_index: usize,
    /// Pristine level data for resets
    source: LevelData,
    pub level: Level,
    pub chain: Chain,
    pub undo: UndoStack,
    pub phase: Phase,
    /// Interpolation fraction of the in-flight move, [0, 1)
    pub move_progress: f32,
    pub blocked: Option<BlockedNudge>,
    /// Lose hold before the automatic undo
    pub hide_timer: Timer,
    /// Accepted actions since load (undo subtracts)
    pub moves: u32,
    /// Seed for cosmetic randomness
    pub seed: u64,
    #[serde(skip)]
    pub particles: ParticleSystem,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Load `data` as level `level_index`
    pub fn new(level_index: usize, data: &LevelData, seed: u64) -> Self {
        let mut state = Self {
            level_index,
            source: data.clone(),
            level: Level::default(),
            chain: Chain::new(&[]),
            undo: UndoStack::new(),
            phase: Phase::Idle,
            move_progress: 0.0,
            blocked: None,
            hide_timer: Timer::new(HIDE_DURATION),
            moves: 0,
            seed,
            particles: ParticleSystem::new(seed),
            events: Vec::new(),
        };
        state.load_source();
        state
    }

    fn load_source(&mut self) {
        let layout = self.source.tiles().to_vec();
        let segments = self.source.player_segments();
        self.init_level(&layout);
        self.init_player(&segments);
        log::info!(
            "Loaded level {} ({}x{}, chain length {})",
            self.level_index,
            self.level.width(),
            self.level.height(),
            self.chain.len()
        );
    }

    /// Replace the layout and forget history
    pub fn init_level(&mut self, layout: &[Vec<Tile>]) {
        self.level.load(layout);
        self.undo.clear();
        self.moves = 0;
    }

    /// Place the chain at rest and reset the turn state
    pub fn init_player(&mut self, segments: &[IVec2]) {
        self.chain = Chain::new(segments);
        self.phase = Phase::Idle;
        self.move_progress = 0.0;
        self.blocked = None;
        self.hide_timer.stop();
        self.particles.clear();
    }

    /// Reload the current level from its pristine data
    pub fn reset_level(&mut self) {
        self.load_source();
        self.push_event(GameEvent::LevelReset);
    }

    /// Pop one snapshot and restore chain, items and renderables together.
    /// Returns false when there was nothing to undo.
    pub fn undo_last_move(&mut self) -> bool {
        let Some(snapshot) = self.undo.undo() else {
            return false;
        };
        self.chain.set_positions(&snapshot.chain);
        self.level.restore(snapshot.items, snapshot.renderables);
        self.phase = Phase::Idle;
        self.move_progress = 0.0;
        self.moves = self.moves.saturating_sub(1);
        log::debug!("Undo: {} snapshots left", self.undo.len());
        self.push_event(GameEvent::Undone);
        true
    }

    /// Snapshot the current positions and items onto the undo stack
    pub(super) fn save_snapshot(&mut self) {
        let positions = self.chain.positions();
        self.undo.save(&positions, self.level.items(), self.level.renderables());
    }

    pub fn check_win_condition(&self) -> bool {
        rules::is_win(&self.level, &self.chain)
    }

    pub fn check_lose_condition(&self) -> bool {
        rules::is_lose(&self.level, &self.chain)
    }

    pub(super) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.phase, Phase::Committing { .. })
    }

    pub fn is_falling(&self) -> bool {
        matches!(self.phase, Phase::Committing { falling: true })
    }

    /// Chain is hidden during the lose hold
    pub fn is_hidden(&self) -> bool {
        self.phase == Phase::Hurt
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn segments(&self) -> &[Segment] {
        self.chain.segments()
    }

    pub fn renderables(&self) -> &[Renderable] {
        self.level.renderables()
    }

    pub fn items(&self) -> &ItemState {
        self.level.items()
    }

    pub fn grow_items(&self) -> &[IVec2] {
        self.level.grow_items()
    }

    pub fn shrink_items(&self) -> &[IVec2] {
        self.level.shrink_items()
    }

    pub fn move_progress(&self) -> f32 {
        self.move_progress
    }

    /// Render-time segment positions in grid units. Falls interpolate
    /// linearly, deliberate moves ease out.
    pub fn render_positions(&self) -> Vec<Vec2> {
        let t = if self.is_falling() {
            self.move_progress
        } else {
            ease_out_quad(self.move_progress)
        };
        self.chain.interpolated(t)
    }

    /// ASCII dump of the board, chain drawn over the layout
    pub fn to_ascii(&self) -> String {
        let mut out = String::new();
        for y in 0..self.level.height() {
            for x in 0..self.level.width() {
                let pos = IVec2::new(x, y);
                let ch = if self.chain.head() == pos {
                    Tile::PlayerHead.symbol()
                } else if self.chain.occupies(pos) {
                    Tile::PlayerBody.symbol()
                } else if let Some(kind) = self.level.item_at(pos) {
                    kind.tile().symbol()
                } else {
                    match self.level.tile(pos) {
                        Some(tile) if tile.is_drawable() && tile.item_kind().is_none() => {
                            tile.symbol()
                        }
                        _ => Tile::Empty.symbol(),
                    }
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(rows: &[&str]) -> LevelData {
        LevelData::parse(&rows.join("\n")).unwrap()
    }

    #[test]
    fn test_new_extracts_chain_and_items() {
        let state = GameState::new(0, &data(&["BBP.GW", "______"]), 1);
        assert_eq!(
            state.chain.positions(),
            vec![IVec2::new(2, 0), IVec2::new(1, 0), IVec2::new(0, 0)]
        );
        assert_eq!(state.grow_items(), &[IVec2::new(4, 0)]);
        assert!(state.is_idle());
        assert!(state.undo.is_empty());
    }

    #[test]
    fn test_player_cells_do_not_block() {
        let state = GameState::new(0, &data(&["BP..", "____"]), 1);
        assert!(!state.level.is_blocking(IVec2::new(0, 0)));
        assert!(!state.level.is_blocking(IVec2::new(1, 0)));
    }

    #[test]
    fn test_undo_on_empty_stack_is_noop() {
        let mut state = GameState::new(0, &data(&["P.", "__"]), 1);
        assert!(!state.undo_last_move());
        assert!(state.drain_events().is_empty());
        assert_eq!(state.chain.head(), IVec2::new(0, 0));
    }

    #[test]
    fn test_ascii_dump() {
        let state = GameState::new(0, &data(&["BP.GW", "_XY#L"]), 1);
        assert_eq!(state.to_ascii(), "BP.GW\n_XY#L\n");
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = GameState::new(0, &data(&["P.", "__"]), 1);
        state.reset_level();
        assert_eq!(state.drain_events(), vec![GameEvent::LevelReset]);
        assert!(state.drain_events().is_empty());
    }
}
