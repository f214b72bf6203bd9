//! Property-based tests for simulation invariants using proptest
//!
//! These tests check that invariants hold across random seeds and inputs:
//! - Speed multiplier stays within its range
//! - Flocking never exceeds max_speed
//! - Shell environments keep particles inside the outer radius in every mode
//! - The active particle count never grows
//! - No NaN values in the render buffers

use motes::{
    presets, BehaviorParams, Bounds, FlockingParams, InitializerRegistry, ParticleSystem,
    SeededRandom, SpeedControl, Vec3,
};
use proptest::prelude::*;

const DT: f32 = 1.0 / 60.0;
const SIMULATION_STEPS: usize = 20;
const EPSILON: f32 = 1e-3;
const SHELL_PRESETS: [&str; 6] = ["sphere", "nebula", "galaxy", "vortex", "ocean", "hypercube"];

fn small_preset(id: &str, count: i64, seed: u32) -> ParticleSystem {
    let mut config = presets::preset(id).unwrap();
    config.spatial.particle_count = count;
    let environment = config
        .validate(&InitializerRegistry::with_builtins())
        .unwrap();
    ParticleSystem::new(&environment, &mut SeededRandom::new(seed))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_speed_stays_in_range(targets in prop::collection::vec(-5.0f32..5.0, 1..8), steps in 1usize..40) {
        let mut speed = SpeedControl::new();
        for target in targets {
            speed.set_speed(target);
            for _ in 0..steps {
                speed.update(DT);
                prop_assert!((0.25..=2.0).contains(&speed.current_speed()));
            }
            prop_assert!((0.25..=2.0).contains(&speed.target_speed()));
        }
        speed.update(1.0);
        prop_assert_eq!(speed.current_speed(), speed.target_speed());
    }

    #[test]
    fn test_count_never_grows(
        reductions in prop::collection::vec((0.0f64..1.0, 0usize..600), 1..12),
        seed in any::<u32>(),
    ) {
        let mut system = small_preset("galaxy", 500, seed);
        let mut previous = system.active_count();
        for (rate, floor) in reductions {
            let active = system.reduce_particle_count(rate, floor);
            prop_assert!(active <= previous);
            prop_assert_eq!(system.sizes().len(), active);
            previous = active;
        }
        prop_assert_eq!(system.allocated_count(), 500);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn test_spherical_layout_inside_shell(seed in any::<u32>()) {
        let system = small_preset("sphere", 200, seed);
        for p in system.active_particles() {
            let r = p.position.length();
            prop_assert!(
                r >= 5.0 - EPSILON && r <= 20.0 + EPSILON,
                "Initial radius {} outside shell [5, 20]", r
            );
        }
    }

    #[test]
    fn test_shell_containment_after_steps(
        seed in any::<u32>(),
        id in prop::sample::select(SHELL_PRESETS.to_vec()),
    ) {
        let mut system = small_preset(id, 200, seed);
        let outer = match *system.bounds() {
            Bounds::Shell { outer_radius, .. } => outer_radius,
            _ => unreachable!("preset uses shell bounds"),
        };
        for _ in 0..SIMULATION_STEPS {
            system.update(DT, None);
        }
        for p in system.active_particles() {
            prop_assert!(
                p.position.length() <= outer + EPSILON,
                "Particle escaped to r = {}", p.position.length()
            );
        }
        prop_assert!(system.positions().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_buffers_finite_with_interaction(
        seed in any::<u32>(),
        x in -30.0f32..30.0,
        y in -30.0f32..30.0,
        z in -30.0f32..30.0,
    ) {
        let mut system = small_preset("sphere", 150, seed);
        for _ in 0..SIMULATION_STEPS {
            system.update(DT, Some(Vec3::new(x, y, z)));
        }
        prop_assert!(system.positions().iter().all(|v| v.is_finite()));
        prop_assert!(system.colors().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_flocking_speed_clamped(seed in any::<u32>(), max_speed in 0.1f32..4.0) {
        let mut config = presets::sphere();
        config.spatial.particle_count = 150;
        config.behavior = BehaviorParams::Flocking(FlockingParams {
            max_speed,
            ..FlockingParams::default()
        });
        let environment = config
            .validate(&InitializerRegistry::with_builtins())
            .unwrap();
        let mut system = ParticleSystem::new(&environment, &mut SeededRandom::new(seed));

        for frame in 0..SIMULATION_STEPS {
            system.update(DT, Some(Vec3::ZERO));
            for p in system.active_particles() {
                prop_assert!(
                    p.velocity.length() <= max_speed + EPSILON,
                    "Speed {} above cap {} at frame {}", p.velocity.length(), max_speed, frame
                );
            }
        }
    }
}
