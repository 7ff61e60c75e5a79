//! Cosmetic particle bursts (item pickups, hazards)
//!
//! Particles never affect gameplay and are not part of undo snapshots.

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{MAX_PARTICLES, PARTICLE_LIFE, PARTICLE_MAX_SPEED, PARTICLE_MIN_SPEED};

#[derive(Debug, Clone, Copy)]
pub struct Particle {
    /// Position in grid units
    pub pos: Vec2,
    /// Velocity in cells per second
    pub vel: Vec2,
    /// Remaining life in seconds
    pub life: f32,
    pub max_life: f32,
}

impl Particle {
    /// 1 when fresh, 0 when expired
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Fixed-capacity particle pool with a seeded RNG
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    rng: Pcg32,
}

impl ParticleSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::with_capacity(MAX_PARTICLES),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Burst `count` particles from the center of `cell`; stops silently when the pool is full
    pub fn emit(&mut self, cell: IVec2, count: usize) {
        let center = cell.as_vec2() + Vec2::splat(0.5);
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                break;
            }
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed = self.rng.random_range(PARTICLE_MIN_SPEED..PARTICLE_MAX_SPEED);
            self.particles.push(Particle {
                pos: center,
                vel: Vec2::from_angle(angle) * speed,
                life: PARTICLE_LIFE,
                max_life: PARTICLE_LIFE,
            });
        }
    }

    pub fn update(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.pos += p.vel * dt;
            p.life -= dt;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new(0)
    }
}
