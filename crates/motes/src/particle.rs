//! Point particle representation.

use crate::behavior::BehaviorKind;
use glam::{Vec3, Vec4};

/// Mode-specific state carried by a particle.
///
/// Bound once when the particle is created; a particle never changes mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AuxState {
    None,
    /// Spring rest position (immutable)
    Anchor(Vec3),
    /// Authoritative 4D coordinate; the 3D position is its projection
    Rotation4D(Vec4),
}

/// A single simulated point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// World position
    pub position: Vec3,
    /// Velocity in world units per second
    pub velocity: Vec3,
    /// RGB, channels in [0, 1]
    pub color: Vec3,
    /// Rendering hint, > 0
    pub size: f32,
    pub aux: AuxState,
}

impl Particle {
    /// Create a particle with no auxiliary state.
    pub fn new(position: Vec3, velocity: Vec3, color: Vec3, size: f32) -> Self {
        Self {
            position,
            velocity,
            color,
            size,
            aux: AuxState::None,
        }
    }

    /// Create a stationary white particle at the given position.
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Vec3::ZERO, Vec3::ONE, 1.0)
    }

    /// Build a particle from initializer output, binding the auxiliary
    /// state the behavior mode needs.
    ///
    /// Spring particles without an explicit anchor are anchored where they
    /// spawn. Rotation particles without a 4D coordinate start at `(pos, 0)`.
    pub fn bind(seed: ParticleSeed, kind: BehaviorKind) -> Self {
        let aux = match kind {
            BehaviorKind::Spring => AuxState::Anchor(seed.anchor.unwrap_or(seed.position)),
            BehaviorKind::Rotation => {
                AuxState::Rotation4D(seed.coord_4d.unwrap_or_else(|| seed.position.extend(0.0)))
            }
            _ => AuxState::None,
        };
        Self {
            position: seed.position,
            velocity: seed.velocity,
            color: seed.color,
            size: seed.size,
            aux,
        }
    }

    pub fn anchor(&self) -> Option<Vec3> {
        match self.aux {
            AuxState::Anchor(a) => Some(a),
            _ => None,
        }
    }

    pub fn coord_4d(&self) -> Option<Vec4> {
        match self.aux {
            AuxState::Rotation4D(c) => Some(c),
            _ => None,
        }
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

/// Initial state produced by a distribution strategy for one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSeed {
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: Vec3,
    pub size: f32,
    /// Spring anchor, if the layout defines one
    pub anchor: Option<Vec3>,
    /// 4D coordinate, if the layout lives in 4D
    pub coord_4d: Option<Vec4>,
}

impl ParticleSeed {
    pub fn new(position: Vec3, velocity: Vec3, color: Vec3, size: f32) -> Self {
        Self {
            position,
            velocity,
            color,
            size,
            anchor: None,
            coord_4d: None,
        }
    }

    pub fn with_anchor(mut self, anchor: Vec3) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn with_coord_4d(mut self, coord: Vec4) -> Self {
        self.coord_4d = Some(coord);
        self
    }
}
