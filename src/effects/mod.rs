//! Decorative particle effects.
//!
//! Fire-and-forget: the board triggers these hooks but never reads anything
//! back, so nothing here can affect what data is shown.

use std::f32::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

pub const PARTICLE_COLORS: [&str; 4] = ["#dc3545", "#ff1744", "#d50000", "#ff6b6b"];
pub const BURST_COLOR: &str = "#ff1744";
pub const BURST_SIZE: usize = 25;

pub trait Effects {
    /// A create/complete action succeeded.
    fn success_burst(&mut self) {}

    /// A card was marked for removal.
    fn removal_started(&mut self, _id: u64) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoEffects;

impl Effects for NoEffects {}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Start position, percent of container width (floating) or centre offset (burst).
    pub x: f32,
    pub y: f32,
    pub size_px: f32,
    pub color: &'static str,
    /// End displacement in pixels.
    pub dx: f32,
    pub dy: f32,
    pub duration_ms: u32,
}

impl Particle {
    /// Inline CSS for an absolutely positioned particle node.
    pub fn style(&self) -> String {
        format!(
            "position:absolute;left:{:.1}%;top:{:.1}%;width:{:.1}px;height:{:.1}px;background:{};border-radius:50%;pointer-events:none;--dx:{:.1}px;--dy:{:.1}px;animation-duration:{}ms",
            self.x, self.y, self.size_px, self.size_px, self.color, self.dx, self.dy, self.duration_ms
        )
    }
}

/// A slowly rising background particle.
pub fn floating_particle<R: Rng>(rng: &mut R) -> Particle {
    Particle {
        x: rng.gen_range(0.0..100.0),
        y: 100.0,
        size_px: rng.gen_range(3.0..7.0),
        color: PARTICLE_COLORS[rng.gen_range(0..PARTICLE_COLORS.len())],
        dx: 0.0,
        dy: -900.0,
        duration_ms: rng.gen_range(8000..12000),
    }
}

/// Radial explosion of [`BURST_SIZE`] particles, evenly spread by angle.
pub fn burst<R: Rng>(rng: &mut R) -> Vec<Particle> {
    (0..BURST_SIZE)
        .map(|i| {
            let angle = (360.0 / BURST_SIZE as f32) * i as f32 * PI / 180.0;
            let distance = rng.gen_range(50.0..100.0);
            Particle {
                x: 50.0,
                y: 50.0,
                size_px: rng.gen_range(2.0..5.0),
                color: BURST_COLOR,
                dx: angle.cos() * distance,
                dy: angle.sin() * distance,
                duration_ms: rng.gen_range(800..1200),
            }
        })
        .collect()
}

/// Generates particle parameters and keeps the most recent burst so a
/// renderer can embed it.
#[derive(Debug)]
pub struct ParticleEffects {
    rng: StdRng,
    last_burst: Vec<Particle>,
    removing: Vec<u64>,
}

impl ParticleEffects {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            last_burst: Vec::new(),
            removing: Vec::new(),
        }
    }

    pub fn last_burst(&self) -> &[Particle] {
        &self.last_burst
    }

    pub fn removing(&self) -> &[u64] {
        &self.removing
    }

    pub fn ambient(&mut self, count: usize) -> Vec<Particle> {
        (0..count).map(|_| floating_particle(&mut self.rng)).collect()
    }
}

impl Default for ParticleEffects {
    fn default() -> Self {
        Self::new()
    }
}

impl Effects for ParticleEffects {
    fn success_burst(&mut self) {
        self.last_burst = burst(&mut self.rng);
        trace!(particles = self.last_burst.len(), "success burst");
    }

    fn removal_started(&mut self, id: u64) {
        self.removing.push(id);
        trace!(id, "removal animation");
    }
}
