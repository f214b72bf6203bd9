//! Brute-force radius search.
//!
//! Every query scans the whole slice, so a flocking frame costs O(n²).
//! Fine for the few thousand particles a scene holds; swap in a spatial
//! hash if counts grow past that.

use crate::particle::Particle;

/// Reusable scratch for neighbor queries. Holds the result buffer so
/// per-particle queries do not allocate.
#[derive(Clone, Debug, Default)]
pub struct NeighborQuery {
    found: Vec<usize>,
}

impl NeighborQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indices of every particle other than `index` whose squared distance
    /// to it is strictly less than `radius²`.
    pub fn find_within_radius(
        &mut self,
        index: usize,
        radius: f32,
        particles: &[Particle],
    ) -> &[usize] {
        self.found.clear();
        let Some(origin) = particles.get(index).map(|p| p.position) else {
            return &self.found;
        };
        let radius_sq = radius * radius;

        for (i, other) in particles.iter().enumerate() {
            if i == index {
                continue;
            }
            if origin.distance_squared(other.position) < radius_sq {
                self.found.push(i);
            }
        }

        &self.found
    }
}
