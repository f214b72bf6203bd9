//! Inverse-square gravity toward a fixed center of mass.

use super::{check_non_negative, check_point, check_unit_interval};
use crate::constants::MIN_FORCE_RADIUS;
use crate::error::ConfigValidationError;
use crate::particle::Particle;
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrbitalParams {
    #[serde(with = "crate::serde_utils::vec3")]
    pub center_of_mass: Vec3,
    pub gravitational_constant: f32,
    pub central_mass: f32,
    /// Velocity multiplier per frame (orbital decay), in [0, 1]
    pub drag_coefficient: f32,
}

impl Default for OrbitalParams {
    fn default() -> Self {
        Self {
            center_of_mass: Vec3::ZERO,
            gravitational_constant: 50.0,
            central_mass: 1.0,
            drag_coefficient: 0.999,
        }
    }
}

impl OrbitalParams {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        check_point("behavior.center_of_mass", self.center_of_mass)?;
        check_non_negative("behavior.gravitational_constant", self.gravitational_constant)?;
        check_non_negative("behavior.central_mass", self.central_mass)?;
        check_unit_interval("behavior.drag_coefficient", self.drag_coefficient)
    }
}

/// Unit particle mass, so acceleration is `G·M/r²`.
/// Skipped entirely (drag included) inside [`MIN_FORCE_RADIUS`].
pub fn apply(params: &OrbitalParams, particle: &mut Particle, delta: f32) {
    let to_center = params.center_of_mass - particle.position;
    let distance = to_center.length();
    if distance < MIN_FORCE_RADIUS {
        return;
    }

    let accel = params.gravitational_constant * params.central_mass / (distance * distance);
    particle.velocity += to_center / distance * (accel * delta);
    particle.velocity *= params.drag_coefficient;
}
