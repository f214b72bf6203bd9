//! Smooth vector-valued drift from 3D simplex noise.
//!
//! Each output component is an independent sample of the same scalar noise,
//! taken at points offset by [`NOISE_AXIS_OFFSET`] so the components do not
//! move in lockstep. Time is the third noise axis, so the field animates
//! continuously as the simulation clock advances.

use crate::constants::NOISE_AXIS_OFFSET;
use glam::Vec3;
use noise::{NoiseFn, OpenSimplex};
use std::fmt;

#[derive(Clone)]
pub struct NoiseField {
    noise: OpenSimplex,
    seed: u32,
    /// Coordinate multiplier (smaller = larger features)
    pub scale: f32,
    /// Output multiplier
    pub strength: f32,
}

impl NoiseField {
    pub fn new(seed: u32, scale: f32, strength: f32) -> Self {
        Self {
            noise: OpenSimplex::new(seed),
            seed,
            scale,
            strength,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Drift vector at a 3D position and time.
    pub fn sample_3d(&self, x: f32, y: f32, z: f32, time: f32) -> Vec3 {
        let s = self.scale as f64;
        let (x, y, z) = (x as f64 * s, y as f64 * s, z as f64 * s);
        let t = time as f64 * s;

        let nx = self.noise.get([x, y, t]);
        let ny = self
            .noise
            .get([y + NOISE_AXIS_OFFSET, z + NOISE_AXIS_OFFSET, t]);
        let nz = self
            .noise
            .get([z + 2.0 * NOISE_AXIS_OFFSET, x + 2.0 * NOISE_AXIS_OFFSET, t]);

        Vec3::new(nx as f32, ny as f32, nz as f32) * self.strength
    }

    /// Drift vector in the XY plane (z = 0), used for planar layouts.
    pub fn sample_2d(&self, x: f32, y: f32, time: f32) -> Vec3 {
        let s = self.scale as f64;
        let (x, y) = (x as f64 * s, y as f64 * s);
        let t = time as f64 * s;

        let nx = self.noise.get([x, y, t]);
        let ny = self
            .noise
            .get([x + NOISE_AXIS_OFFSET, y + NOISE_AXIS_OFFSET, t]);

        Vec3::new(nx as f32, ny as f32, 0.0) * self.strength
    }
}

impl fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseField")
            .field("seed", &self.seed)
            .field("scale", &self.scale)
            .field("strength", &self.strength)
            .finish()
    }
}
