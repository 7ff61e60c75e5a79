//! Long Cat - a grid puzzle about a very long cat
//!
//! Core modules:
//! - `sim`: Deterministic puzzle state machine (chain movement, gravity, undo, win/lose)
//! - `levels`: Built-in level data and level parsing
//! - `input`: Per-frame button snapshots with edge detection
//! - `scene`: Title / level select / playing orchestration
//! - `progress`: Completed-level persistence
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Synthesized sound effects

pub mod audio;
pub mod input;
pub mod levels;
pub mod progress;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;

pub use levels::{LevelData, LevelError};
pub use progress::Progress;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Frame step used by the headless replayer (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta fed into the simulation (avoids skipping whole moves after a stall)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Player-directed move progress per second (one cell in 200 ms)
    pub const MOVE_RATE: f32 = 5.0;
    /// Falling move progress per second (one cell in 125 ms)
    pub const FALL_RATE: f32 = 8.0;
    /// Blocked "nudge" animation progress per second
    pub const BLOCKED_RATE: f32 = 10.0;

    /// How long the chain stays hidden after losing before the move is undone (seconds)
    pub const HIDE_DURATION: f32 = 0.9;
    /// Scene transition duration (seconds)
    pub const TRANSITION_DURATION: f32 = 0.9;

    /// Particle pool size
    pub const MAX_PARTICLES: usize = 100;
    /// Particle lifetime (seconds)
    pub const PARTICLE_LIFE: f32 = 0.6;
    /// Particles emitted per burst
    pub const PARTICLES_PER_EMIT: usize = 4;
    /// Particle speed range (cells per second)
    pub const PARTICLE_MIN_SPEED: f32 = 0.5;
    pub const PARTICLE_MAX_SPEED: f32 = 1.0;
}

/// Quadratic ease-out on [0, 1]
#[inline]
pub fn ease_out_quad(t: f32) -> f32 {
    t * (2.0 - t)
}

/// 0 → 1 → 0 triangle over [0, 1]
#[inline]
pub fn there_and_back(t: f32) -> f32 {
    1.0 - (t * 2.0 - 1.0).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        assert_eq!(ease_out_quad(0.0), 0.0);
        assert_eq!(ease_out_quad(1.0), 1.0);
        assert!(ease_out_quad(0.5) > 0.5);

        assert_eq!(there_and_back(0.0), 0.0);
        assert_eq!(there_and_back(0.5), 1.0);
        assert_eq!(there_and_back(1.0), 0.0);
    }
}
