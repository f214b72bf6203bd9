//! Traveling sine wave.
//!
//! The surface height at a point is `A·sin(k·(p·d̂) − ω·t)` with `k =
//! frequency` and `ω = wave_speed·frequency`. Particles are sprung toward
//! that height and drift slowly along the wave direction in XZ.

use super::{check_direction, check_non_negative};
use crate::constants::{WAVE_DAMPING, WAVE_DRIFT_FACTOR, WAVE_VERTICAL_STIFFNESS};
use crate::error::ConfigValidationError;
use crate::particle::Particle;
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveParams {
    pub wave_speed: f32,
    pub amplitude: f32,
    pub frequency: f32,
    #[serde(with = "crate::serde_utils::vec3")]
    pub wave_direction: Vec3,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            wave_speed: 1.0,
            amplitude: 2.0,
            frequency: 0.5,
            wave_direction: Vec3::X,
        }
    }
}

impl WaveParams {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        check_non_negative("behavior.wave_speed", self.wave_speed)?;
        check_non_negative("behavior.amplitude", self.amplitude)?;
        check_non_negative("behavior.frequency", self.frequency)?;
        check_direction("behavior.wave_direction", self.wave_direction)
    }

    /// Surface height at `position` and `time`.
    pub fn target_height(&self, position: Vec3, time: f32) -> f32 {
        let direction = self.wave_direction.normalize_or_zero();
        let k = self.frequency;
        let omega = self.wave_speed * self.frequency;
        self.amplitude * (position.dot(direction) * k - omega * time).sin()
    }
}

pub fn apply(params: &WaveParams, particle: &mut Particle, time: f32, delta: f32) {
    let target = params.target_height(particle.position, time);
    particle.velocity.y += (target - particle.position.y) * WAVE_VERTICAL_STIFFNESS * delta;

    let drift = params.wave_direction.normalize_or_zero() * (params.wave_speed * WAVE_DRIFT_FACTOR);
    particle.velocity.x += drift.x * delta;
    particle.velocity.z += drift.z * delta;

    particle.velocity *= WAVE_DAMPING;
}
