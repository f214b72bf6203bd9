//! Rigid 4D rotation projected to 3D.
//!
//! The particle's 4D coordinate is the authoritative state. Every frame it
//! is rotated in the XW, YW and ZW planes (in that order), and the 3D
//! position is replaced by its perspective projection `p·d/(d − w)`.
//! Velocity is derived from the position change so trails still render.

use super::{check_finite, check_positive};
use crate::constants::{FALLBACK_DELTA, PROJECTION_MIN_DENOMINATOR};
use crate::error::ConfigValidationError;
use crate::particle::{AuxState, Particle};
use glam::{Vec3, Vec4};
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotationParams {
    /// Radians per second in each plane
    pub rotation_speed_xw: f32,
    pub rotation_speed_yw: f32,
    pub rotation_speed_zw: f32,
    /// Viewer distance along W
    pub projection_distance: f32,
}

impl Default for RotationParams {
    fn default() -> Self {
        Self {
            rotation_speed_xw: 0.5,
            rotation_speed_yw: 0.3,
            rotation_speed_zw: 0.2,
            projection_distance: 2.5,
        }
    }
}

impl RotationParams {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        check_finite("behavior.rotation_speed_xw", self.rotation_speed_xw)?;
        check_finite("behavior.rotation_speed_yw", self.rotation_speed_yw)?;
        check_finite("behavior.rotation_speed_zw", self.rotation_speed_zw)?;
        check_positive("behavior.projection_distance", self.projection_distance)
    }
}

pub fn rotate_xw(c: Vec4, angle: f32) -> Vec4 {
    let (sin, cos) = angle.sin_cos();
    Vec4::new(c.x * cos - c.w * sin, c.y, c.z, c.x * sin + c.w * cos)
}

pub fn rotate_yw(c: Vec4, angle: f32) -> Vec4 {
    let (sin, cos) = angle.sin_cos();
    Vec4::new(c.x, c.y * cos - c.w * sin, c.z, c.y * sin + c.w * cos)
}

pub fn rotate_zw(c: Vec4, angle: f32) -> Vec4 {
    let (sin, cos) = angle.sin_cos();
    Vec4::new(c.x, c.y, c.z * cos - c.w * sin, c.z * sin + c.w * cos)
}

/// Perspective projection from 4D. `|d − w|` is clamped to at least
/// [`PROJECTION_MIN_DENOMINATOR`], keeping its sign.
pub fn project(c: Vec4, distance: f32) -> Vec3 {
    let mut denominator = distance - c.w;
    if denominator.abs() < PROJECTION_MIN_DENOMINATOR {
        denominator = if denominator < 0.0 {
            -PROJECTION_MIN_DENOMINATOR
        } else {
            PROJECTION_MIN_DENOMINATOR
        };
    }
    c.truncate() * (distance / denominator)
}

pub fn apply(params: &RotationParams, particle: &mut Particle, delta: f32) {
    let coord = match particle.aux {
        AuxState::Rotation4D(c) => c,
        AuxState::None => particle.position.extend(0.0),
        AuxState::Anchor(_) => {
            warn!("Rotation behavior cannot drive an anchored particle, skipping");
            return;
        }
    };

    let rotated = rotate_zw(
        rotate_yw(
            rotate_xw(coord, params.rotation_speed_xw * delta),
            params.rotation_speed_yw * delta,
        ),
        params.rotation_speed_zw * delta,
    );
    particle.aux = AuxState::Rotation4D(rotated);

    let next = project(rotated, params.projection_distance);
    let step = if delta > 0.0 { delta } else { FALLBACK_DELTA };
    particle.velocity = (next - particle.position) / step;
    particle.position = next;
}
