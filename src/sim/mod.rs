//! Deterministic puzzle simulation
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Driven only by `tick` with an input snapshot and a frame delta
//! - Seeded RNG only (cosmetic particles)
//! - No rendering or platform dependencies

pub mod chain;
pub mod level;
pub mod particles;
pub mod rules;
pub mod state;
pub mod tick;
pub mod tile;
pub mod timer;
pub mod undo;

pub use chain::{Chain, Segment};
pub use level::{ItemState, Level, Renderable};
pub use particles::{Particle, ParticleSystem};
pub use rules::{is_lose, is_win, should_fall};
pub use state::{BlockedNudge, GameEvent, GameState, Phase};
pub use tick::{TickInput, play_turn, tick};
pub use tile::{ItemKind, Tile};
pub use timer::Timer;
pub use undo::{Snapshot, UndoStack};
