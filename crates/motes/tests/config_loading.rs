//! Environment config loading tests
//!
//! Documents that must be rejected before any system exists, plus the
//! JSON/YAML file round trip.

use motes::{
    BehaviorKind, ConfigValidationError, EnvironmentConfig, InitializerRegistry, ParticleSystem,
    SeededRandom, Vec3,
};
use serde_json::{json, Value};

fn ocean_document() -> Value {
    json!({
        "id": "calm_sea",
        "name": "Calm Sea",
        "description": "Low swell",
        "spatial": {
            "distribution": { "type": "custom", "initializer": "ocean" },
            "particle_count": 300,
            "bounds": { "kind": "shell", "inner_radius": 5.0, "outer_radius": 20.0 }
        },
        "behavior": {
            "mode": "wave",
            "wave_speed": 1.0,
            "amplitude": 1.0,
            "frequency": 0.3,
            "wave_direction": { "x": 1.0, "y": 0.0, "z": 0.0 }
        },
        "visual": {
            "particle_size": 4.0,
            "opacity": 0.7,
            "color_palette": ["#0077BE", "#00CED1"]
        }
    })
}

fn validate(document: Value) -> Result<(), ConfigValidationError> {
    let config = EnvironmentConfig::from_value(document)?;
    config.validate(&InitializerRegistry::with_builtins())?;
    Ok(())
}

#[test]
fn test_valid_document_builds_system() {
    let config = EnvironmentConfig::from_value(ocean_document()).unwrap();
    let environment = config.validate(&InitializerRegistry::with_builtins()).unwrap();
    assert_eq!(environment.config().behavior.kind(), BehaviorKind::Wave);
    // Performance section omitted: defaults apply
    assert_eq!(environment.config().performance.target_fps, 72.0);

    let system = ParticleSystem::new(&environment, &mut SeededRandom::new(11));
    assert_eq!(system.active_count(), 300);
    assert_eq!(system.palette().len(), 2);
}

type Mutation = Box<dyn Fn(&mut Value)>;

fn case(label: &'static str, mutate: impl Fn(&mut Value) + 'static) -> (&'static str, Mutation) {
    (label, Box::new(mutate))
}

#[test]
fn test_rejections() {
    let cases = vec![
        case("negative count", |d| d["spatial"]["particle_count"] = json!(-5)),
        case("zero count", |d| d["spatial"]["particle_count"] = json!(0)),
        case("empty id", |d| d["id"] = json!("")),
        case("unknown mode", |d| d["behavior"]["mode"] = json!("swarm")),
        case("missing field", |d| {
            if let Some(visual) = d["visual"].as_object_mut() {
                visual.remove("opacity");
            }
        }),
        case("opacity above one", |d| d["visual"]["opacity"] = json!(1.5)),
        case("bad color", |d| d["visual"]["color_palette"] = json!(["blue"])),
        case("empty palette", |d| d["visual"]["color_palette"] = json!([])),
        case("unknown initializer", |d| {
            d["spatial"]["distribution"]["initializer"] = json!("coral_reef")
        }),
        case("inverted shell", |d| {
            d["spatial"]["bounds"] = json!({ "kind": "shell", "inner_radius": 20.0, "outer_radius": 5.0 })
        }),
        case("lattice without grid", |d| {
            d["spatial"]["distribution"] = json!({ "type": "lattice" })
        }),
        case("zero wave direction", |d| {
            d["behavior"]["wave_direction"] = json!({ "x": 0.0, "y": 0.0, "z": 0.0 })
        }),
        case("min fps above target", |d| {
            d["performance"] = json!({ "target_fps": 30.0, "min_fps": 60.0 })
        }),
        case("count too large to allocate", |d| {
            d["spatial"]["particle_count"] = json!(i64::MAX)
        }),
        case("lattice too fine to index", |d| {
            d["spatial"]["distribution"] = json!({ "type": "lattice" });
            d["spatial"]["bounds"] = json!({ "kind": "grid", "cells_per_axis": 4_194_304u32, "extent": 20.0 });
        }),
    ];

    for (label, mutate) in cases {
        let mut document = ocean_document();
        mutate(&mut document);
        assert!(validate(document).is_err(), "'{}' was accepted", label);
    }
}

#[test]
fn test_largest_lattice_still_builds() {
    let mut document = ocean_document();
    document["spatial"]["particle_count"] = json!(2);
    document["spatial"]["distribution"] = json!({ "type": "lattice" });
    document["spatial"]["bounds"] = json!({ "kind": "grid", "cells_per_axis": 1024, "extent": 20.0 });
    let config = EnvironmentConfig::from_value(document).unwrap();
    let environment = config.validate(&InitializerRegistry::with_builtins()).unwrap();

    let system = ParticleSystem::new(&environment, &mut SeededRandom::new(3));
    assert_eq!(system.active_count(), 2);
    // Both particles sit near the first corner cells of the 1024³ lattice
    for p in system.particles() {
        assert!((p.position - Vec3::splat(-10.0)).length() < 1.5);
    }
}

#[test]
fn test_mode_alias_accepted() {
    let mut document = ocean_document();
    document["behavior"] = json!({
        "mode": "vortex",
        "vortex_axis": { "x": 0.0, "y": 1.0, "z": 0.0 },
        "rotation_speed": 2.0,
        "centripetal_strength": 0.5,
        "upward_drift": 0.5
    });
    let config = EnvironmentConfig::from_value(document).unwrap();
    assert_eq!(config.behavior.kind(), BehaviorKind::Flow);
}

#[test]
fn test_file_round_trip() {
    let dir = std::env::temp_dir().join(format!("motes-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let config = EnvironmentConfig::from_value(ocean_document()).unwrap();

    let json_path = dir.join("calm_sea.json");
    config.save_json(&json_path).unwrap();
    assert_eq!(EnvironmentConfig::load_json(&json_path).unwrap(), config);

    let yaml_path = dir.join("calm_sea.yaml");
    config.save_yaml(&yaml_path).unwrap();
    assert_eq!(EnvironmentConfig::load_yaml(&yaml_path).unwrap(), config);

    let missing = EnvironmentConfig::load_json(&dir.join("absent.json")).unwrap_err();
    assert!(matches!(missing, ConfigValidationError::Io(_)));

    std::fs::remove_dir_all(&dir).unwrap();
}
