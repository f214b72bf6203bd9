//! Hooke's-law pull toward each particle's anchor (rest length zero).

use super::{check_non_negative, check_unit_interval};
use crate::error::ConfigValidationError;
use crate::particle::Particle;
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringParams {
    pub spring_constant: f32,
    /// Velocity multiplier per frame, in [0, 1]
    pub damping: f32,
    /// Cap on the spring force magnitude
    pub max_force: f32,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            spring_constant: 2.0,
            damping: 0.95,
            max_force: 10.0,
        }
    }
}

impl SpringParams {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        check_non_negative("behavior.spring_constant", self.spring_constant)?;
        check_unit_interval("behavior.damping", self.damping)?;
        check_non_negative("behavior.max_force", self.max_force)
    }
}

pub fn apply(params: &SpringParams, particle: &mut Particle, delta: f32) {
    let Some(anchor) = particle.anchor() else {
        warn!("Spring behavior requires an anchored particle, skipping");
        return;
    };

    let force = ((anchor - particle.position) * params.spring_constant).clamp_length_max(params.max_force);
    particle.velocity += force * delta;
    particle.velocity *= params.damping;
}
