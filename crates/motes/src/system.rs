//! The per-frame particle simulation.
//!
//! ## Frame pipeline
//!
//! 1. Advance the clock by `delta`
//! 2. For each active particle: apply the behavior, then integrate
//!    `pos += v·delta` (rotation writes positions itself)
//! 3. Wrap particles that left the bounds (every mode)
//! 4. Copy active particles into the flat render buffers
//!
//! Particles are updated in index order and flocking sees neighbors that
//! already moved this frame.

use crate::behavior::{BehaviorKind, BehaviorModel, BehaviorParams, BehaviorScratch, FrameContext};
use crate::bounds::{enforce_bounds, Bounds};
use crate::constants::GENERATED_PALETTE_SIZE;
use crate::environment::initializers::{InitializerRegistry, SpawnContext};
use crate::environment::{EnvironmentConfig, ValidatedEnvironment};
use crate::error::ConfigValidationError;
use crate::noise_field::NoiseField;
use crate::palette::generate_palette;
use crate::particle::Particle;
use crate::rng::SeededRandom;
use glam::Vec3;
use log::{debug, info, warn};
use rand::RngCore;

pub struct ParticleSystem {
    particles: Vec<Particle>,
    /// Only the first `active_count` particles are simulated and rendered
    active_count: usize,
    model: BehaviorModel,
    bounds: Bounds,
    noise: NoiseField,
    scratch: BehaviorScratch,
    /// Seconds of simulated time
    time: f32,
    palette: Vec<Vec3>,

    particle_size: f32,
    opacity: f32,
    size_attenuation: bool,

    positions: Vec<f32>,
    colors: Vec<f32>,
    sizes: Vec<f32>,
}

impl ParticleSystem {
    /// Build a system from a validated environment.
    ///
    /// Draws from `rng` in this order: palette (only when the config has
    /// none), every particle's initial state, the noise seed, then the seed
    /// for the behavior's own generator.
    pub fn new<R: RngCore>(environment: &ValidatedEnvironment, rng: &mut R) -> Self {
        let model = BehaviorModel::new(environment.config().behavior.clone());
        Self::with_model(environment, model, rng)
    }

    /// Build a system that runs `model` instead of the environment's own
    /// behavior section. Layout, bounds and visuals still come from the
    /// environment, and `rng` is drawn in the same order as [`Self::new`].
    pub fn with_model<R: RngCore>(
        environment: &ValidatedEnvironment,
        model: BehaviorModel,
        rng: &mut R,
    ) -> Self {
        let config = environment.config();
        let palette = match environment.palette() {
            Some(colors) => colors.to_vec(),
            None => generate_palette(rng, GENERATED_PALETTE_SIZE),
        };

        let kind = model.kind();
        let bounds = config.spatial.bounds;
        let count = environment.particle_count();
        let initializer = environment.initializer();

        let mut particles = Vec::with_capacity(count);
        for index in 0..count {
            let ctx = SpawnContext {
                index,
                count,
                bounds: &bounds,
                palette: &palette,
            };
            let seed = initializer(&ctx, &mut *rng);
            particles.push(Particle::bind(seed, kind));
        }

        let (noise_scale, noise_strength) = model.noise_settings();
        let noise = NoiseField::new(rng.next_u32(), noise_scale, noise_strength);
        let scratch = BehaviorScratch::new(SeededRandom::new(rng.next_u32()));

        info!(
            "Particle system created: '{}', {} particles, mode {}",
            config.id, count, kind
        );

        let mut system = Self {
            particles,
            active_count: count,
            model,
            bounds,
            noise,
            scratch,
            time: 0.0,
            palette,
            particle_size: config.visual.particle_size,
            opacity: config.visual.opacity,
            size_attenuation: config.visual.size_attenuation,
            positions: Vec::with_capacity(count * 3),
            colors: Vec::with_capacity(count * 3),
            sizes: Vec::with_capacity(count),
        };
        system.sync_buffers();
        system
    }

    /// Flocking system from a raw particle count and bounds.
    pub fn with_bounds<R: RngCore>(
        count: usize,
        bounds: Bounds,
        rng: &mut R,
    ) -> Result<Self, ConfigValidationError> {
        let environment =
            EnvironmentConfig::legacy(count, bounds).validate(&InitializerRegistry::new())?;
        Ok(Self::new(&environment, rng))
    }

    /// Build a system whose behavior is chosen by a runtime mode tag.
    ///
    /// Unknown tags log a warning and run flocking. `params` that belong to
    /// another mode are replaced by the resolved mode's defaults.
    pub fn with_mode<R: RngCore>(
        environment: &ValidatedEnvironment,
        mode: &str,
        params: Option<BehaviorParams>,
        rng: &mut R,
    ) -> Self {
        Self::with_model(environment, BehaviorModel::from_tag(mode, params), rng)
    }

    /// Advance one frame.
    ///
    /// A negative or non-finite `delta` is ignored (logged, no state change).
    pub fn update(&mut self, delta: f32, interaction: Option<Vec3>) {
        if !delta.is_finite() || delta < 0.0 {
            warn!("Ignoring frame with invalid delta {}", delta);
            return;
        }

        // 1. Clock
        self.time += delta;

        let frame = FrameContext {
            time: self.time,
            delta,
            interaction,
            noise: &self.noise,
            planar: self.bounds.is_planar(),
        };
        let integrate = self.model.integrates_position();
        let active = &mut self.particles[..self.active_count];

        // 2. Behavior + integration
        for index in 0..active.len() {
            self.model.apply(index, active, &frame, &mut self.scratch);
            if integrate {
                let particle = &mut active[index];
                particle.position += particle.velocity * delta;
            }
        }

        // 3. Boundaries. Rotation re-projects from its 4D state next frame,
        // so wrapping its positions does not feed back into the motion.
        enforce_bounds(active, &self.bounds);

        // 4. Render buffers
        self.sync_buffers();
    }

    /// Shrink the active set to `max(floor(active·(1 − rate)), min_count)`
    /// if that is smaller than it is now. Never grows. Returns the active count.
    pub fn reduce_particle_count(&mut self, rate: f64, min_count: usize) -> usize {
        if !rate.is_finite() {
            warn!("Ignoring quality reduction with invalid rate {}", rate);
            return self.active_count;
        }
        let rate = rate.clamp(0.0, 1.0);
        let reduced = (self.active_count as f64 * (1.0 - rate)).floor() as usize;
        let target = reduced.max(min_count);

        if target < self.active_count {
            debug!(
                "Reducing active particles {} -> {} (rate {:.2}, floor {})",
                self.active_count, target, rate, min_count
            );
            self.active_count = target;
            self.sync_buffers();
        }
        self.active_count
    }

    fn sync_buffers(&mut self) {
        let active = &self.particles[..self.active_count];

        self.positions.clear();
        self.colors.clear();
        self.sizes.clear();
        for particle in active {
            self.positions.extend_from_slice(&particle.position.to_array());
            self.colors.extend_from_slice(&particle.color.to_array());
            self.sizes.push(particle.size);
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// `x, y, z` per active particle.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// `r, g, b` per active particle.
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// One size per active particle.
    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Particles allocated at construction (upper bound on `active_count`).
    pub fn allocated_count(&self) -> usize {
        self.particles.len()
    }

    /// Simulated seconds since construction.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn active_particles(&self) -> &[Particle] {
        &self.particles[..self.active_count]
    }

    pub fn behavior(&self) -> &BehaviorModel {
        &self.model
    }

    pub fn mode(&self) -> BehaviorKind {
        self.model.kind()
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    pub fn palette(&self) -> &[Vec3] {
        &self.palette
    }

    pub fn particle_size(&self) -> f32 {
        self.particle_size
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn size_attenuation(&self) -> bool {
        self.size_attenuation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::presets;
    use crate::rng::SeededRandom;

    fn build(config: EnvironmentConfig, seed: u32) -> ParticleSystem {
        let env = config.validate(&InitializerRegistry::with_builtins()).unwrap();
        ParticleSystem::new(&env, &mut SeededRandom::new(seed))
    }

    #[test]
    fn test_buffers_sized_to_active() {
        let mut system = build(presets::sphere(), 1);
        assert_eq!(system.positions().len(), 3000);
        assert_eq!(system.colors().len(), 3000);
        assert_eq!(system.sizes().len(), 1000);

        system.reduce_particle_count(0.5, 100);
        assert_eq!(system.positions().len(), 1500);
        system.update(1.0 / 60.0, None);
        assert_eq!(system.sizes().len(), 500);
    }

    #[test]
    fn test_buffers_mirror_particles() {
        let mut system = build(presets::galaxy(), 4);
        system.update(1.0 / 60.0, None);
        let p = system.active_particles()[7];
        assert_eq!(&system.positions()[21..24], &p.position.to_array());
        assert_eq!(&system.colors()[21..24], &p.color.to_array());
        assert_eq!(system.sizes()[7], p.size);
    }

    #[test]
    fn test_reduce_particle_count() {
        let mut system = build(presets::sphere(), 2);
        assert_eq!(system.reduce_particle_count(0.15, 100), 850);
        assert_eq!(system.reduce_particle_count(0.15, 100), 722);
        // Floor at min_count
        assert_eq!(system.reduce_particle_count(0.99, 100), 100);
        // Never grows
        assert_eq!(system.reduce_particle_count(0.15, 500), 100);
        assert_eq!(system.allocated_count(), 1000);
    }

    #[test]
    fn test_inactive_particles_frozen() {
        let mut system = build(presets::vortex(), 3);
        system.reduce_particle_count(0.5, 10);
        let frozen = system.particles()[700];
        for _ in 0..10 {
            system.update(1.0 / 60.0, None);
        }
        assert_eq!(system.particles()[700], frozen);
    }

    #[test]
    fn test_invalid_delta_ignored() {
        let mut system = build(presets::sphere(), 5);
        let before = system.particles().to_vec();
        system.update(-0.1, None);
        system.update(f32::NAN, None);
        assert_eq!(system.time(), 0.0);
        assert_eq!(system.particles(), &before[..]);
    }

    #[test]
    fn test_zero_delta_advances_nothing_but_runs() {
        let mut system = build(presets::hypercube(), 6);
        system.update(0.0, None);
        assert_eq!(system.time(), 0.0);
        assert!(system.positions().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_hypercube_projection_wrapped_into_shell() {
        let mut system = build(presets::hypercube(), 42);
        let coords: Vec<_> = system.particles().iter().map(|p| p.coord_4d()).collect();
        system.update(1.0 / 60.0, None);
        for p in system.active_particles() {
            assert!(p.position.length() <= 20.0 + 1e-3, "radius {}", p.position.length());
        }
        // The 4D state itself is rotated, not wrapped
        let after: Vec<_> = system.particles().iter().map(|p| p.coord_4d()).collect();
        assert_ne!(coords, after);
        assert!(after.iter().all(|c| c.is_some_and(|c| c.is_finite())));
    }

    #[test]
    fn test_generated_palette_when_absent() {
        let system = build(presets::sphere(), 42);
        assert_eq!(system.palette().len(), GENERATED_PALETTE_SIZE);
        let explicit = build(presets::nebula(), 42);
        assert_eq!(explicit.palette().len(), 6);
    }

    #[test]
    fn test_lattice_particles_anchored() {
        let system = build(presets::lattice(), 7);
        assert!(system.particles().iter().all(|p| p.anchor().is_some()));
    }

    #[test]
    fn test_hypercube_particles_carry_4d_state() {
        let system = build(presets::hypercube(), 8);
        assert!(system.particles().iter().all(|p| p.coord_4d().is_some()));
    }

    #[test]
    fn test_with_bounds_planar() {
        let mut rng = SeededRandom::new(9);
        let mut system =
            ParticleSystem::with_bounds(200, Bounds::rect(-10.0, 10.0, -5.0, 5.0), &mut rng).unwrap();
        assert_eq!(system.mode(), BehaviorKind::Flocking);
        for _ in 0..120 {
            system.update(1.0 / 60.0, Some(Vec3::ZERO));
        }
        for p in system.active_particles() {
            assert!(p.position.x >= -10.0 - 1e-3 && p.position.x <= 10.0 + 1e-3);
            assert!(p.position.y >= -5.0 - 1e-3 && p.position.y <= 5.0 + 1e-3);
        }
    }

    #[test]
    fn test_with_mode_matches_new_for_known_tag() {
        let env = presets::galaxy().validate(&InitializerRegistry::with_builtins()).unwrap();
        let mut a = ParticleSystem::new(&env, &mut SeededRandom::new(10));
        let params = env.config().behavior.clone();
        let mut b = ParticleSystem::with_mode(&env, "orbital", Some(params), &mut SeededRandom::new(10));
        for _ in 0..5 {
            a.update(1.0 / 60.0, None);
            b.update(1.0 / 60.0, None);
        }
        assert_eq!(a.positions(), b.positions());
    }

    #[test]
    fn test_with_bounds_rejects_invalid() {
        let mut rng = SeededRandom::new(9);
        assert!(ParticleSystem::with_bounds(0, Bounds::shell(5.0, 20.0), &mut rng).is_err());
        assert!(ParticleSystem::with_bounds(10, Bounds::shell(5.0, 1.0), &mut rng).is_err());
    }
}
