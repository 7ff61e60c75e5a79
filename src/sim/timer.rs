//! Countdown timer polled once per frame

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    pub duration: f32,
    elapsed: f32,
    active: bool,
}

impl Timer {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            elapsed: 0.0,
            active: false,
        }
    }

    pub fn start(&mut self) {
        self.active = true;
        self.elapsed = 0.0;
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.elapsed = 0.0;
    }

    /// Advance by `dt`; returns true on the frame the timer finishes
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.active {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.active = false;
            return true;
        }
        false
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Fraction elapsed in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            (self.elapsed / self.duration).min(1.0)
        } else {
            1.0
        }
    }
}
