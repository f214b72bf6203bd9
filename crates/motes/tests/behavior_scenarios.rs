//! End-to-end behavior scenarios
//!
//! Each test places particles with a custom initializer, runs the full
//! frame pipeline and checks the motion against the analytic expectation.

use motes::{
    presets, BehaviorKind, BehaviorParams, Bounds, FlockingParams, Distribution, EnvironmentConfig, InitializerFn, InitializerRegistry,
    OrbitalParams, ParticleSeed, ParticleSystem, PerformanceConfig, SeededRandom, SpatialConfig,
    SpawnContext, SpringParams, Vec3, VisualConfig, WaveParams,
};
use rand::RngCore;

const DT: f32 = 1.0 / 60.0;

fn system_with(
    name: &str,
    initializer: InitializerFn,
    count: i64,
    bounds: Bounds,
    behavior: BehaviorParams,
) -> ParticleSystem {
    let mut registry = InitializerRegistry::new();
    registry.register(name, initializer);

    let config = EnvironmentConfig {
        id: name.to_string(),
        name: name.to_string(),
        description: "scenario".to_string(),
        spatial: SpatialConfig {
            distribution: Distribution::Custom {
                initializer: name.to_string(),
            },
            particle_count: count,
            bounds,
        },
        behavior,
        visual: VisualConfig {
            particle_size: 3.0,
            opacity: 1.0,
            color_palette: Some(vec!["#FFFFFF".to_string()]),
            size_attenuation: false,
        },
        performance: PerformanceConfig::default(),
    };
    let environment = config.validate(&registry).unwrap();
    ParticleSystem::new(&environment, &mut SeededRandom::new(1))
}

fn at_radius_ten(_ctx: &SpawnContext<'_>, _rng: &mut dyn RngCore) -> ParticleSeed {
    ParticleSeed::new(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO, Vec3::ONE, 2.0)
}

fn circular_orbit(_ctx: &SpawnContext<'_>, _rng: &mut dyn RngCore) -> ParticleSeed {
    // v = sqrt(G·M / r) with G·M = 50, r = 10
    let speed = 5.0_f32.sqrt();
    ParticleSeed::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, speed), Vec3::ONE, 2.0)
}

fn stretched_spring(_ctx: &SpawnContext<'_>, _rng: &mut dyn RngCore) -> ParticleSeed {
    ParticleSeed::new(Vec3::new(5.0, 0.0, 0.0), Vec3::ZERO, Vec3::ONE, 2.0).with_anchor(Vec3::ZERO)
}

fn flat_line(ctx: &SpawnContext<'_>, _rng: &mut dyn RngCore) -> ParticleSeed {
    let x = ctx.index as f32 * 0.37 - 15.0;
    ParticleSeed::new(Vec3::new(x, 0.0, 0.0), Vec3::ZERO, Vec3::ONE, 2.0)
}

#[test]
fn test_orbital_first_frame_pull() {
    let params = OrbitalParams {
        center_of_mass: Vec3::ZERO,
        gravitational_constant: 50.0,
        central_mass: 1.0,
        drag_coefficient: 0.9999,
    };
    let mut system = system_with(
        "orbit_pull",
        at_radius_ten,
        1,
        Bounds::shell(5.0, 20.0),
        BehaviorParams::Orbital(params),
    );

    system.update(DT, None);

    let p = system.active_particles()[0];
    let expected = -0.5 * DT * 0.9999;
    assert!(
        (p.velocity.x - expected).abs() < 1e-6,
        "Expected vx = {}, got {}",
        expected,
        p.velocity.x
    );
    assert!(p.velocity.y.abs() < 1e-9 && p.velocity.z.abs() < 1e-9);
    assert!(p.position.x < 10.0);
}

#[test]
fn test_orbital_circular_orbit_holds_radius() {
    let params = OrbitalParams {
        drag_coefficient: 1.0,
        ..OrbitalParams::default()
    };
    let mut system = system_with(
        "orbit_circle",
        circular_orbit,
        1,
        Bounds::shell(5.0, 20.0),
        BehaviorParams::Orbital(params),
    );

    for frame in 0..300 {
        system.update(DT, None);
        let r = system.active_particles()[0].position.length();
        assert!(
            (r - 10.0).abs() < 0.5,
            "Orbit drifted to r = {} at frame {}",
            r,
            frame
        );
    }
}

#[test]
fn test_spring_settles_on_anchor() {
    let params = SpringParams {
        spring_constant: 3.0,
        damping: 0.92,
        max_force: 15.0,
    };
    let mut system = system_with(
        "spring",
        stretched_spring,
        1,
        Bounds::grid(9, 20.0),
        BehaviorParams::Spring(params),
    );

    let mut previous = system.active_particles()[0].position.length();
    for second in 1..=5 {
        for _ in 0..60 {
            system.update(DT, None);
        }
        let distance = system.active_particles()[0].position.length();
        assert!(
            distance < previous,
            "Distance to anchor grew at {}s: {} -> {}",
            second,
            previous,
            distance
        );
        previous = distance;
    }
    assert!(previous < 0.5, "Still {} from anchor after 5s", previous);
}

#[test]
fn test_wave_heights_follow_amplitude() {
    let params = WaveParams {
        wave_speed: 1.5,
        amplitude: 2.5,
        frequency: 0.4,
        wave_direction: Vec3::X,
    };
    let mut system = system_with(
        "wave_line",
        flat_line,
        80,
        Bounds::rect(-100.0, 100.0, -50.0, 50.0),
        BehaviorParams::Wave(params.clone()),
    );

    let limit = params.amplitude * 1.15;
    let mut max_height = 0.0_f32;
    for _ in 0..3600 {
        system.update(DT, None);
        if system.time() > 10.0 {
            for p in system.active_particles() {
                max_height = max_height.max(p.position.y.abs());
            }
        }
    }
    assert!(
        max_height <= limit,
        "Wave height {} exceeds {}",
        max_height,
        limit
    );
    // Heights actually move, not a flat line
    assert!(max_height > params.amplitude * 0.5);

    // Drift carries particles along +X
    let mean_vx: f32 = system.active_particles().iter().map(|p| p.velocity.x).sum::<f32>() / 80.0;
    assert!(mean_vx > 0.0);
}

#[test]
fn test_unknown_runtime_mode_runs_flocking() {
    let environment = presets::nebula()
        .validate(&InitializerRegistry::with_builtins())
        .unwrap();
    // Brownian params from the environment do not fit the resolved mode
    let params = environment.config().behavior.clone();
    let mut system =
        ParticleSystem::with_mode(&environment, "teleport", Some(params), &mut SeededRandom::new(5));

    assert_eq!(system.mode(), BehaviorKind::Flocking);
    assert_eq!(
        system.behavior().params(),
        &BehaviorParams::Flocking(FlockingParams::default())
    );

    let max_speed = FlockingParams::default().max_speed;
    for _ in 0..60 {
        system.update(DT, Some(Vec3::ZERO));
        for p in system.active_particles() {
            assert!(p.velocity.length() <= max_speed + 1e-3);
        }
    }
}
