//! Boids flocking with noise drift and user attraction.
//!
//! Steering terms are added straight to velocity (not scaled by delta),
//! then speed is clamped to `max_speed`.

use super::{check_non_negative, check_positive, FrameContext};
use crate::constants::ATTRACTION_EPSILON;
use crate::error::ConfigValidationError;
use crate::neighbors::NeighborQuery;
use crate::particle::Particle;
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlockingParams {
    pub cohesion_radius: f32,
    pub cohesion_weight: f32,
    pub alignment_radius: f32,
    pub alignment_weight: f32,
    pub separation_radius: f32,
    pub separation_weight: f32,
    /// Hard cap on speed after steering
    pub max_speed: f32,
    pub noise_scale: f32,
    pub noise_strength: f32,
    #[serde(default = "default_interaction_strength")]
    pub interaction_strength: f32,
    /// Particles farther than this from the interaction point ignore it
    #[serde(default = "default_interaction_radius")]
    pub interaction_radius: f32,
}

fn default_interaction_strength() -> f32 {
    1.0
}

fn default_interaction_radius() -> f32 {
    4.0
}

impl Default for FlockingParams {
    fn default() -> Self {
        Self {
            cohesion_radius: 2.0,
            cohesion_weight: 0.05,
            alignment_radius: 2.0,
            alignment_weight: 0.05,
            separation_radius: 1.0,
            separation_weight: 0.1,
            max_speed: 2.0,
            noise_scale: 0.5,
            noise_strength: 0.3,
            interaction_strength: default_interaction_strength(),
            interaction_radius: default_interaction_radius(),
        }
    }
}

impl FlockingParams {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        check_non_negative("behavior.cohesion_radius", self.cohesion_radius)?;
        check_non_negative("behavior.cohesion_weight", self.cohesion_weight)?;
        check_non_negative("behavior.alignment_radius", self.alignment_radius)?;
        check_non_negative("behavior.alignment_weight", self.alignment_weight)?;
        check_non_negative("behavior.separation_radius", self.separation_radius)?;
        check_non_negative("behavior.separation_weight", self.separation_weight)?;
        check_positive("behavior.max_speed", self.max_speed)?;
        check_non_negative("behavior.noise_scale", self.noise_scale)?;
        check_non_negative("behavior.noise_strength", self.noise_strength)?;
        check_non_negative("behavior.interaction_strength", self.interaction_strength)?;
        check_non_negative("behavior.interaction_radius", self.interaction_radius)
    }
}

/// Steer `particles[index]` and clamp its speed.
pub fn apply(
    params: &FlockingParams,
    index: usize,
    particles: &mut [Particle],
    frame: &FrameContext<'_>,
    neighbors: &mut NeighborQuery,
) {
    if index >= particles.len() {
        return;
    }
    let steer = steering(params, index, particles, frame, neighbors);
    let particle = &mut particles[index];
    particle.velocity = (particle.velocity + steer).clamp_length_max(params.max_speed);
}

/// Sum of every steering term for `particles[index]`.
pub fn steering(
    params: &FlockingParams,
    index: usize,
    particles: &[Particle],
    frame: &FrameContext<'_>,
    neighbors: &mut NeighborQuery,
) -> Vec3 {
    let me = &particles[index];

    let near = neighbors.find_within_radius(index, params.cohesion_radius, particles);
    let cohesion = cohesion(me, near, particles, params.cohesion_weight);

    let near = neighbors.find_within_radius(index, params.alignment_radius, particles);
    let alignment = alignment(me, near, particles, params.alignment_weight);

    let near = neighbors.find_within_radius(index, params.separation_radius, particles);
    let separation = separation(
        me,
        near,
        particles,
        params.separation_radius,
        params.separation_weight,
    );

    let p = me.position;
    let drift = if frame.planar {
        frame.noise.sample_2d(p.x, p.y, frame.time)
    } else {
        frame.noise.sample_3d(p.x, p.y, p.z, frame.time)
    };

    let pull = attraction(
        p,
        frame.interaction,
        params.interaction_strength,
        params.interaction_radius,
    );

    cohesion + alignment + separation + drift + pull
}

/// Steer toward the mean neighbor position.
pub fn cohesion(me: &Particle, near: &[usize], particles: &[Particle], weight: f32) -> Vec3 {
    if near.is_empty() {
        return Vec3::ZERO;
    }
    let center: Vec3 = near.iter().map(|&i| particles[i].position).sum::<Vec3>() / near.len() as f32;
    (center - me.position) * weight
}

/// Steer toward the mean neighbor velocity.
pub fn alignment(me: &Particle, near: &[usize], particles: &[Particle], weight: f32) -> Vec3 {
    if near.is_empty() {
        return Vec3::ZERO;
    }
    let mean: Vec3 = near.iter().map(|&i| particles[i].velocity).sum::<Vec3>() / near.len() as f32;
    (mean - me.velocity) * weight
}

/// Push away from close neighbors, harder the closer they are.
///
/// Coincident neighbors contribute nothing but still count in the average.
pub fn separation(
    me: &Particle,
    near: &[usize],
    particles: &[Particle],
    radius: f32,
    weight: f32,
) -> Vec3 {
    if near.is_empty() {
        return Vec3::ZERO;
    }
    let mut push = Vec3::ZERO;
    for &i in near {
        let away = me.position - particles[i].position;
        let distance = away.length();
        if distance > 0.0 && distance < radius {
            push += away / distance / distance;
        }
    }
    push / near.len() as f32 * weight
}

/// Inverse-square pull toward the interaction point.
pub fn attraction(position: Vec3, target: Option<Vec3>, strength: f32, radius: f32) -> Vec3 {
    let Some(target) = target else {
        return Vec3::ZERO;
    };
    let offset = target - position;
    let distance = offset.length();
    if distance > radius || distance == 0.0 {
        return Vec3::ZERO;
    }
    offset / distance * (strength / (distance * distance + ATTRACTION_EPSILON))
}
