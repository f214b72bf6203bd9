//! Simulation volumes, integration and boundary wrapping.
//!
//! Nothing is clamped or bounced: particles that leave the volume re-enter
//! from the other side, so the population stays dense.
//!
//! - Shell: leaving past the outer radius places the particle on the inner
//!   sphere at the antipodal direction.
//! - Rect: toroidal wrap on x and y by the overflow amount. z is free.
//! - Grid: no wrap (spring anchors keep lattice particles in place).

use crate::constants::MAX_GRID_CELLS_PER_AXIS;
use crate::error::ConfigValidationError;
use crate::particle::Particle;
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Bounds {
    /// Spherical shell around the origin
    Shell { inner_radius: f32, outer_radius: f32 },
    /// Axis-aligned rectangle in the XY plane
    Rect {
        min_x: f32,
        max_x: f32,
        min_y: f32,
        max_y: f32,
    },
    /// Cubic lattice of `cells_per_axis³` anchors spanning `extent` per side
    Grid { cells_per_axis: u32, extent: f32 },
}

impl Bounds {
    pub fn shell(inner_radius: f32, outer_radius: f32) -> Self {
        Self::Shell { inner_radius, outer_radius }
    }

    pub fn rect(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self::Rect { min_x, max_x, min_y, max_y }
    }

    pub fn grid(cells_per_axis: u32, extent: f32) -> Self {
        Self::Grid { cells_per_axis, extent }
    }

    /// Name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Shell { .. } => "shell",
            Self::Rect { .. } => "rect",
            Self::Grid { .. } => "grid",
        }
    }

    /// Flat layouts get 2D noise drift.
    pub fn is_planar(&self) -> bool {
        matches!(self, Self::Rect { .. })
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        match *self {
            Self::Shell { inner_radius, outer_radius } => {
                if !inner_radius.is_finite() || inner_radius < 0.0 {
                    return Err(out_of_range("spatial.bounds.inner_radius", inner_radius, ">= 0"));
                }
                if !outer_radius.is_finite() || outer_radius <= inner_radius {
                    return Err(out_of_range(
                        "spatial.bounds.outer_radius",
                        outer_radius,
                        "> inner_radius",
                    ));
                }
            }
            Self::Rect { min_x, max_x, min_y, max_y } => {
                if !(min_x.is_finite() && max_x.is_finite()) || min_x >= max_x {
                    return Err(out_of_range("spatial.bounds.max_x", max_x, "> min_x"));
                }
                if !(min_y.is_finite() && max_y.is_finite()) || min_y >= max_y {
                    return Err(out_of_range("spatial.bounds.max_y", max_y, "> min_y"));
                }
            }
            Self::Grid { cells_per_axis, extent } => {
                if !(1..=MAX_GRID_CELLS_PER_AXIS).contains(&cells_per_axis) {
                    return Err(out_of_range(
                        "spatial.bounds.cells_per_axis",
                        cells_per_axis as f32,
                        "within [1, 1024]",
                    ));
                }
                if !extent.is_finite() || extent <= 0.0 {
                    return Err(out_of_range("spatial.bounds.extent", extent, "> 0"));
                }
            }
        }
        Ok(())
    }
}

fn out_of_range(field: &'static str, value: f32, expected: &'static str) -> ConfigValidationError {
    ConfigValidationError::OutOfRange {
        field,
        value: value as f64,
        expected,
    }
}

/// Apply the boundary policy for `bounds` to every particle in the slice.
pub fn enforce_bounds(particles: &mut [Particle], bounds: &Bounds) {
    match *bounds {
        Bounds::Shell { inner_radius, outer_radius } => {
            for particle in particles {
                wrap_spherical(&mut particle.position, inner_radius, outer_radius);
            }
        }
        Bounds::Rect { min_x, max_x, min_y, max_y } => {
            for particle in particles {
                wrap_rect(&mut particle.position, min_x, max_x, min_y, max_y);
            }
        }
        Bounds::Grid { .. } => {}
    }
}

/// Past the outer radius: move to the inner sphere on the opposite side.
pub fn wrap_spherical(position: &mut Vec3, inner_radius: f32, outer_radius: f32) {
    let distance = position.length();
    if distance > outer_radius {
        *position *= -inner_radius / distance;
    }
}

/// Toroidal wrap on x and y, preserving the overflow amount.
pub fn wrap_rect(position: &mut Vec3, min_x: f32, max_x: f32, min_y: f32, max_y: f32) {
    if position.x > max_x {
        position.x = min_x + (position.x - max_x);
    } else if position.x < min_x {
        position.x = max_x + (position.x - min_x);
    }

    if position.y > max_y {
        position.y = min_y + (position.y - max_y);
    } else if position.y < min_y {
        position.y = max_y + (position.y - min_y);
    }
}
