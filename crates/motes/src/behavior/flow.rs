//! Vortex flow field: swirl around an axis through the origin, pulled
//! inward and lifted along the axis.

use super::{check_direction, check_finite, check_non_negative};
use crate::constants::{MIN_FORCE_RADIUS, VORTEX_RADIUS_SOFTENING};
use crate::error::ConfigValidationError;
use crate::particle::Particle;
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowParams {
    #[serde(with = "crate::serde_utils::vec3")]
    pub vortex_axis: Vec3,
    pub rotation_speed: f32,
    pub centripetal_strength: f32,
    /// Acceleration along the axis
    pub upward_drift: f32,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            vortex_axis: Vec3::Y,
            rotation_speed: 2.0,
            centripetal_strength: 0.5,
            upward_drift: 0.5,
        }
    }
}

impl FlowParams {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        check_direction("behavior.vortex_axis", self.vortex_axis)?;
        check_finite("behavior.rotation_speed", self.rotation_speed)?;
        check_non_negative("behavior.centripetal_strength", self.centripetal_strength)?;
        check_finite("behavior.upward_drift", self.upward_drift)
    }
}

/// Tangential speed falls off as `1/(r + 0.5)`. No force within
/// [`MIN_FORCE_RADIUS`] of the axis.
pub fn apply(params: &FlowParams, particle: &mut Particle, delta: f32) {
    let axis = params.vortex_axis.normalize_or_zero();
    let radial = particle.position - axis * particle.position.dot(axis);
    let radius = radial.length();
    if radius < MIN_FORCE_RADIUS {
        return;
    }

    let tangent = axis.cross(radial).normalize_or_zero();
    let swirl = tangent * (params.rotation_speed / (radius + VORTEX_RADIUS_SOFTENING));
    let inward = -radial / radius * params.centripetal_strength;
    let lift = axis * params.upward_drift;

    particle.velocity += (swirl + inward + lift) * delta;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components_at_unit_radius() {
        let params = FlowParams {
            rotation_speed: 3.0,
            centripetal_strength: 0.8,
            upward_drift: 0.7,
            ..FlowParams::default()
        };
        let mut p = Particle::at(Vec3::new(1.0, 4.0, 0.0));
        apply(&params, &mut p, 1.0);
        // Y × X = -Z, swirl 3/(1 + 0.5)
        assert!((p.velocity - Vec3::new(-0.8, 0.7, -2.0)).length() < 1e-5);
    }

    #[test]
    fn test_on_axis_skipped() {
        let mut p = Particle::new(Vec3::new(0.0, 3.0, 0.05), Vec3::ZERO, Vec3::ONE, 1.0);
        apply(&FlowParams::default(), &mut p, 1.0);
        assert_eq!(p.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_unnormalized_axis() {
        let a = FlowParams { vortex_axis: Vec3::new(0.0, 5.0, 0.0), ..FlowParams::default() };
        let mut p = Particle::at(Vec3::new(2.0, 0.0, 2.0));
        let mut q = p;
        apply(&a, &mut p, 0.1);
        apply(&FlowParams::default(), &mut q, 0.1);
        assert!((p.velocity - q.velocity).length() < 1e-6);
    }

    #[test]
    fn test_zero_axis_rejected() {
        let params = FlowParams { vortex_axis: Vec3::ZERO, ..FlowParams::default() };
        assert!(params.validate().is_err());
    }
}
