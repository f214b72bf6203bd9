//! Damped random walk with optional directional drift.

use super::{check_direction, check_non_negative, check_unit_interval};
use crate::error::ConfigValidationError;
use crate::particle::Particle;
use crate::rng::RandomSource;
use glam::Vec3;
use rand::RngCore;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BrownianParams {
    /// Width of the per-axis random kick
    pub speed: f32,
    /// Velocity multiplier per frame, in [0, 1]
    pub damping: f32,
    #[serde(default, with = "crate::serde_utils::opt_vec3")]
    pub drift_direction: Option<Vec3>,
    pub drift_strength: f32,
}

impl Default for BrownianParams {
    fn default() -> Self {
        Self {
            speed: 0.5,
            damping: 0.98,
            drift_direction: None,
            drift_strength: 0.1,
        }
    }
}

impl BrownianParams {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        check_non_negative("behavior.speed", self.speed)?;
        check_unit_interval("behavior.damping", self.damping)?;
        check_non_negative("behavior.drift_strength", self.drift_strength)?;
        if let Some(direction) = self.drift_direction {
            check_direction("behavior.drift_direction", direction)?;
        }
        Ok(())
    }
}

/// Three draws per call, x then y then z.
pub fn apply<R: RngCore + ?Sized>(params: &BrownianParams, particle: &mut Particle, delta: f32, rng: &mut R) {
    let kick = Vec3::new(rng.next_centered(), rng.next_centered(), rng.next_centered()) * params.speed;
    particle.velocity += kick * delta;

    if let Some(direction) = params.drift_direction {
        particle.velocity += direction * (params.drift_strength * delta);
    }

    particle.velocity *= params.damping;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRandom;
    use rand::rngs::mock::StepRng;

    #[test]
    fn test_kick_bounded() {
        let params = BrownianParams { speed: 1.0, damping: 1.0, ..BrownianParams::default() };
        let mut rng = SeededRandom::new(11);
        for _ in 0..500 {
            let mut p = Particle::at(Vec3::ZERO);
            apply(&params, &mut p, 1.0, &mut rng);
            assert!(p.velocity.abs().max_element() <= 0.5);
        }
    }

    #[test]
    fn test_zero_draws_kick_negative_half_speed() {
        let params = BrownianParams { speed: 2.0, damping: 1.0, ..BrownianParams::default() };
        let mut rng = StepRng::new(0, 0);
        let mut p = Particle::at(Vec3::ZERO);
        apply(&params, &mut p, 0.5, &mut rng);
        assert_eq!(p.velocity, Vec3::splat(-0.5));
    }

    #[test]
    fn test_drift_and_damping() {
        let params = BrownianParams {
            speed: 0.0,
            damping: 0.5,
            drift_direction: Some(Vec3::Y),
            drift_strength: 2.0,
        };
        let mut rng = SeededRandom::new(1);
        let mut p = Particle::at(Vec3::ZERO);
        apply(&params, &mut p, 1.0, &mut rng);
        assert!((p.velocity - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_same_seed_same_walk() {
        let params = BrownianParams::default();
        let walk = |seed| {
            let mut rng = SeededRandom::new(seed);
            let mut p = Particle::at(Vec3::ZERO);
            for _ in 0..100 {
                apply(&params, &mut p, 1.0 / 60.0, &mut rng);
            }
            p.velocity
        };
        assert_eq!(walk(8), walk(8));
    }

    #[test]
    fn test_damping_above_one_rejected() {
        let params = BrownianParams { damping: 1.2, ..BrownianParams::default() };
        assert!(params.validate().is_err());
    }
}
