//! Decorative particles drifting up behind the avatar.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackgroundConfig {
    pub particles: usize,
    /// Fixed seed for reproducible layouts; random when unset
    pub seed: Option<u64>,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        BackgroundConfig {
            particles: 20,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Horizontal start in [0, 1]
    pub x: f64,
    /// Horizontal travel over one cycle
    pub drift: f64,
    /// Seconds per cycle, 3..5
    pub duration: f64,
    /// Seconds before the first cycle, 0..5
    pub delay: f64,
}

/// Where a particle is at a point in time, in normalised viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSample {
    pub x: f64,
    /// 0 at the top, 1 at the bottom
    pub y: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone)]
pub struct Background {
    particles: Vec<Particle>,
}

impl Background {
    pub fn seeded(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let particles = (0..count)
            .map(|_| Particle {
                x: rng.random_range(0.0..1.0),
                drift: rng.random_range(-0.05..0.05),
                duration: 3.0 + rng.random_range(0.0..2.0),
                delay: rng.random_range(0.0..5.0),
            })
            .collect();
        Background { particles }
    }

    pub fn from_config(config: &BackgroundConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        tracing::debug!("background seed {}", seed);
        Self::seeded(config.particles, seed)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Visible particles at `t` seconds; ones still waiting out their delay are skipped
    pub fn sample(&self, t: f64) -> Vec<ParticleSample> {
        self.particles
            .iter()
            .filter(|p| t >= p.delay)
            .map(|p| {
                let phase = ((t - p.delay) % p.duration) / p.duration;
                ParticleSample {
                    x: (p.x + p.drift * phase).clamp(0.0, 1.0),
                    y: 1.0 - phase,
                    opacity: 1.0 - (2.0 * phase - 1.0).abs(),
                }
            })
            .collect()
    }
}
