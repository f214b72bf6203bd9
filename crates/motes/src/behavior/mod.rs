//! Per-particle motion models.
//!
//! A system runs exactly one [`BehaviorModel`] for its whole lifetime. Each
//! model reads one particle's kinematic state plus a small parameter record
//! and writes the particle's new velocity (rotation also writes position).
//!
//! | Mode       | Law                                                        |
//! |------------|------------------------------------------------------------|
//! | `flocking` | cohesion + alignment + separation + noise + attraction     |
//! | `brownian` | random walk with optional drift, damped                    |
//! | `orbital`  | inverse-square pull toward a center of mass, with drag     |
//! | `spring`   | Hooke pull toward the particle's anchor, clamped, damped   |
//! | `flow`     | swirl around an axis with centripetal pull and lift        |
//! | `wave`     | vertical spring toward a traveling sine surface            |
//! | `rotation` | 4D rotation in XW/YW/ZW projected back to 3D               |

pub mod brownian;
pub mod flocking;
pub mod flow;
pub mod orbital;
pub mod rotation;
pub mod spring;
pub mod wave;

pub use brownian::BrownianParams;
pub use flocking::FlockingParams;
pub use flow::FlowParams;
pub use orbital::OrbitalParams;
pub use rotation::RotationParams;
pub use spring::SpringParams;
pub use wave::WaveParams;

use crate::error::ConfigValidationError;
use crate::neighbors::NeighborQuery;
use crate::noise_field::NoiseField;
use crate::particle::Particle;
use crate::rng::SeededRandom;
use glam::Vec3;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The seven motion models.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BehaviorKind {
    Flocking,
    Brownian,
    Orbital,
    Spring,
    Flow,
    Wave,
    Rotation,
}

impl BehaviorKind {
    pub const ALL: [BehaviorKind; 7] = [
        Self::Flocking,
        Self::Brownian,
        Self::Orbital,
        Self::Spring,
        Self::Flow,
        Self::Wave,
        Self::Rotation,
    ];

    /// Canonical config tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Flocking => "flocking",
            Self::Brownian => "brownian",
            Self::Orbital => "orbital",
            Self::Spring => "spring",
            Self::Flow => "flow",
            Self::Wave => "wave",
            Self::Rotation => "rotation",
        }
    }

    /// Strict tag lookup. Accepts `vortex` for flow and `rotation4d` for rotation.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "flocking" => Some(Self::Flocking),
            "brownian" => Some(Self::Brownian),
            "orbital" => Some(Self::Orbital),
            "spring" => Some(Self::Spring),
            "flow" | "vortex" => Some(Self::Flow),
            "wave" => Some(Self::Wave),
            "rotation" | "rotation4d" | "rotation_4d" => Some(Self::Rotation),
            _ => None,
        }
    }

    /// Lenient lookup for runtime tags: unknown tags run as flocking.
    pub fn from_tag_or_flocking(tag: &str) -> Self {
        Self::parse(tag).unwrap_or_else(|| {
            warn!("Unknown behavior mode '{}', falling back to flocking", tag);
            Self::Flocking
        })
    }
}

impl fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for BehaviorKind {
    type Err = ConfigValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ConfigValidationError::UnknownBehaviorMode(s.to_string()))
    }
}

/// Mode tag plus that mode's parameter record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BehaviorParams {
    Flocking(FlockingParams),
    Brownian(BrownianParams),
    Orbital(OrbitalParams),
    Spring(SpringParams),
    Flow(FlowParams),
    Wave(WaveParams),
    Rotation(RotationParams),
}

impl BehaviorParams {
    pub fn kind(&self) -> BehaviorKind {
        match self {
            Self::Flocking(_) => BehaviorKind::Flocking,
            Self::Brownian(_) => BehaviorKind::Brownian,
            Self::Orbital(_) => BehaviorKind::Orbital,
            Self::Spring(_) => BehaviorKind::Spring,
            Self::Flow(_) => BehaviorKind::Flow,
            Self::Wave(_) => BehaviorKind::Wave,
            Self::Rotation(_) => BehaviorKind::Rotation,
        }
    }

    /// Stock parameters for a mode.
    pub fn default_for(kind: BehaviorKind) -> Self {
        match kind {
            BehaviorKind::Flocking => Self::Flocking(FlockingParams::default()),
            BehaviorKind::Brownian => Self::Brownian(BrownianParams::default()),
            BehaviorKind::Orbital => Self::Orbital(OrbitalParams::default()),
            BehaviorKind::Spring => Self::Spring(SpringParams::default()),
            BehaviorKind::Flow => Self::Flow(FlowParams::default()),
            BehaviorKind::Wave => Self::Wave(WaveParams::default()),
            BehaviorKind::Rotation => Self::Rotation(RotationParams::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        match self {
            Self::Flocking(p) => p.validate(),
            Self::Brownian(p) => p.validate(),
            Self::Orbital(p) => p.validate(),
            Self::Spring(p) => p.validate(),
            Self::Flow(p) => p.validate(),
            Self::Wave(p) => p.validate(),
            Self::Rotation(p) => p.validate(),
        }
    }
}

impl Default for BehaviorParams {
    fn default() -> Self {
        Self::Flocking(FlockingParams::default())
    }
}

/// Read-only per-frame inputs shared by every particle.
#[derive(Clone, Copy, Debug)]
pub struct FrameContext<'a> {
    /// Simulation clock after this frame's advance (seconds)
    pub time: f32,
    /// Frame length (seconds)
    pub delta: f32,
    /// User attraction point, if any
    pub interaction: Option<Vec3>,
    pub noise: &'a NoiseField,
    /// Use 2D noise drift (rect bounds)
    pub planar: bool,
}

/// Mutable per-system state the models borrow during a frame.
#[derive(Clone, Debug)]
pub struct BehaviorScratch {
    pub neighbors: NeighborQuery,
    /// Brownian kicks draw from here
    pub rng: SeededRandom,
}

impl BehaviorScratch {
    pub fn new(rng: SeededRandom) -> Self {
        Self {
            neighbors: NeighborQuery::new(),
            rng,
        }
    }
}

/// The motion model a system runs.
#[derive(Clone, Debug, PartialEq)]
pub struct BehaviorModel {
    params: BehaviorParams,
}

impl BehaviorModel {
    pub fn new(params: BehaviorParams) -> Self {
        Self { params }
    }

    /// Build a model from a runtime tag.
    ///
    /// Unknown tags run as flocking. Parameters that belong to a different
    /// mode than the resolved one are replaced with that mode's defaults.
    pub fn from_tag(tag: &str, params: Option<BehaviorParams>) -> Self {
        let kind = BehaviorKind::from_tag_or_flocking(tag);
        let params = match params {
            Some(p) if p.kind() == kind => p,
            Some(p) => {
                warn!(
                    "Behavior parameters for '{}' do not match mode '{}', using defaults",
                    p.kind(),
                    kind
                );
                BehaviorParams::default_for(kind)
            }
            None => BehaviorParams::default_for(kind),
        };
        Self::new(params)
    }

    pub fn kind(&self) -> BehaviorKind {
        self.params.kind()
    }

    pub fn params(&self) -> &BehaviorParams {
        &self.params
    }

    /// Rotation writes positions directly; every other mode is integrated
    /// from velocity by the system.
    pub fn integrates_position(&self) -> bool {
        self.kind() != BehaviorKind::Rotation
    }

    /// Noise settings the system's field should use.
    pub fn noise_settings(&self) -> (f32, f32) {
        match &self.params {
            BehaviorParams::Flocking(p) => (p.noise_scale, p.noise_strength),
            _ => {
                let stock = FlockingParams::default();
                (stock.noise_scale, stock.noise_strength)
            }
        }
    }

    /// Update `particles[index]`. `particles` is the active slice, which
    /// flocking also scans for neighbors.
    pub fn apply(
        &self,
        index: usize,
        particles: &mut [Particle],
        frame: &FrameContext<'_>,
        scratch: &mut BehaviorScratch,
    ) {
        if let BehaviorParams::Flocking(p) = &self.params {
            flocking::apply(p, index, particles, frame, &mut scratch.neighbors);
            return;
        }

        let Some(particle) = particles.get_mut(index) else {
            return;
        };
        let delta = frame.delta;
        match &self.params {
            BehaviorParams::Flocking(_) => {}
            BehaviorParams::Brownian(p) => brownian::apply(p, particle, delta, &mut scratch.rng),
            BehaviorParams::Orbital(p) => orbital::apply(p, particle, delta),
            BehaviorParams::Spring(p) => spring::apply(p, particle, delta),
            BehaviorParams::Flow(p) => flow::apply(p, particle, delta),
            BehaviorParams::Wave(p) => wave::apply(p, particle, frame.time, delta),
            BehaviorParams::Rotation(p) => rotation::apply(p, particle, delta),
        }
    }
}

impl Default for BehaviorModel {
    fn default() -> Self {
        Self::new(BehaviorParams::default())
    }
}

// =============================================================================
// PARAMETER CHECKS
// =============================================================================

pub(crate) fn check_finite(field: &'static str, value: f32) -> Result<(), ConfigValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(out_of_range(field, value, "a finite number"))
    }
}

pub(crate) fn check_non_negative(
    field: &'static str,
    value: f32,
) -> Result<(), ConfigValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(out_of_range(field, value, ">= 0"))
    }
}

pub(crate) fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(out_of_range(field, value, "> 0"))
    }
}

pub(crate) fn check_unit_interval(
    field: &'static str,
    value: f32,
) -> Result<(), ConfigValidationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(out_of_range(field, value, "within [0, 1]"))
    }
}

/// Finite and not the zero vector.
pub(crate) fn check_direction(field: &'static str, v: Vec3) -> Result<(), ConfigValidationError> {
    if !v.is_finite() {
        return Err(out_of_range(field, f32::NAN, "a finite vector"));
    }
    let length = v.length();
    if length > 0.0 {
        Ok(())
    } else {
        Err(out_of_range(field, length, "non-zero length"))
    }
}

pub(crate) fn check_point(field: &'static str, v: Vec3) -> Result<(), ConfigValidationError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(out_of_range(field, f32::NAN, "a finite vector"))
    }
}

fn out_of_range(field: &'static str, value: f32, expected: &'static str) -> ConfigValidationError {
    ConfigValidationError::OutOfRange {
        field,
        value: value as f64,
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip() {
        for kind in BehaviorKind::ALL {
            assert_eq!(BehaviorKind::parse(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!(BehaviorKind::parse("vortex"), Some(BehaviorKind::Flow));
        assert_eq!(BehaviorKind::parse("rotation4d"), Some(BehaviorKind::Rotation));
    }

    #[test]
    fn test_unknown_tag_is_strict_error() {
        let err = "teleport".parse::<BehaviorKind>().unwrap_err();
        assert!(matches!(err, ConfigValidationError::UnknownBehaviorMode(t) if t == "teleport"));
    }

    #[test]
    fn test_unknown_tag_falls_back_to_flocking() {
        assert_eq!(BehaviorKind::from_tag_or_flocking("teleport"), BehaviorKind::Flocking);
    }

    #[test]
    fn test_from_tag_mismatched_params_use_defaults() {
        let spring = BehaviorParams::Spring(SpringParams::default());
        let model = BehaviorModel::from_tag("teleport", Some(spring));
        assert_eq!(model.params(), &BehaviorParams::Flocking(FlockingParams::default()));
    }

    #[test]
    fn test_from_tag_keeps_matching_params() {
        let wave = BehaviorParams::Wave(WaveParams {
            amplitude: 4.0,
            ..WaveParams::default()
        });
        let model = BehaviorModel::from_tag("wave", Some(wave.clone()));
        assert_eq!(model.params(), &wave);
    }

    #[test]
    fn test_only_rotation_skips_integration() {
        for kind in BehaviorKind::ALL {
            let model = BehaviorModel::new(BehaviorParams::default_for(kind));
            assert_eq!(model.integrates_position(), kind != BehaviorKind::Rotation);
        }
    }

    #[test]
    fn test_default_params_validate() {
        for kind in BehaviorKind::ALL {
            BehaviorParams::default_for(kind).validate().unwrap();
        }
    }

    #[test]
    fn test_params_tagged_by_mode() {
        let json = serde_json::to_value(BehaviorParams::Orbital(OrbitalParams::default())).unwrap();
        assert_eq!(json["mode"], "orbital");
        assert_eq!(json["gravitational_constant"], 50.0);
    }
}
