//! Built-in environments.

use super::{Distribution, EnvironmentConfig, PerformanceConfig, SpatialConfig, VisualConfig};
use crate::behavior::{
    BehaviorParams, BrownianParams, FlockingParams, FlowParams, OrbitalParams, RotationParams,
    SpringParams, WaveParams,
};
use crate::bounds::Bounds;
use glam::Vec3;

/// Ids of every built-in environment, in menu order.
pub const PRESET_IDS: [&str; 7] = [
    "sphere",
    "nebula",
    "galaxy",
    "lattice",
    "vortex",
    "ocean",
    "hypercube",
];

/// Look up a built-in environment by id.
pub fn preset(id: &str) -> Option<EnvironmentConfig> {
    match id {
        "sphere" => Some(sphere()),
        "nebula" => Some(nebula()),
        "galaxy" => Some(galaxy()),
        "lattice" => Some(lattice()),
        "vortex" => Some(vortex()),
        "ocean" => Some(ocean()),
        "hypercube" => Some(hypercube()),
        _ => None,
    }
}

fn palette(colors: &[&str]) -> Option<Vec<String>> {
    Some(colors.iter().map(|c| c.to_string()).collect())
}

fn viewer_shell() -> Bounds {
    Bounds::shell(5.0, 20.0)
}

fn build(
    id: &str,
    name: &str,
    description: &str,
    distribution: Distribution,
    particle_count: i64,
    bounds: Bounds,
    behavior: BehaviorParams,
    visual: VisualConfig,
) -> EnvironmentConfig {
    EnvironmentConfig {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        spatial: SpatialConfig {
            distribution,
            particle_count,
            bounds,
        },
        behavior,
        visual,
        performance: PerformanceConfig::default(),
    }
}

fn custom(initializer: &str) -> Distribution {
    Distribution::Custom {
        initializer: initializer.to_string(),
    }
}

/// Flocking shell around the viewer with a seed-generated palette.
pub fn sphere() -> EnvironmentConfig {
    build(
        "sphere",
        "Sphere",
        "Spherical shell of particles surrounding you",
        Distribution::Spherical,
        1000,
        viewer_shell(),
        BehaviorParams::Flocking(FlockingParams::default()),
        VisualConfig {
            particle_size: 3.0,
            opacity: 0.8,
            color_palette: None,
            size_attenuation: false,
        },
    )
}

/// Large glowing particles on a slow Brownian drift.
pub fn nebula() -> EnvironmentConfig {
    build(
        "nebula",
        "Nebula",
        "Glowing gas clouds drifting slowly",
        custom("nebula"),
        800,
        viewer_shell(),
        BehaviorParams::Brownian(BrownianParams {
            speed: 0.3,
            damping: 0.97,
            drift_direction: None,
            drift_strength: 0.0,
        }),
        VisualConfig {
            particle_size: 6.0,
            opacity: 0.6,
            color_palette: palette(&["#8B00FF", "#4B0082", "#FF00FF", "#9370DB", "#BA55D3", "#8A2BE2"]),
            size_attenuation: true,
        },
    )
}

/// Spiral arms orbiting a central mass.
pub fn galaxy() -> EnvironmentConfig {
    build(
        "galaxy",
        "Galaxy",
        "Stars on gravitational orbits",
        custom("galaxy"),
        1000,
        viewer_shell(),
        BehaviorParams::Orbital(OrbitalParams {
            center_of_mass: Vec3::ZERO,
            gravitational_constant: 50.0,
            central_mass: 1.0,
            drag_coefficient: 0.9999,
        }),
        VisualConfig {
            particle_size: 2.5,
            opacity: 0.9,
            color_palette: palette(&["#1E90FF", "#87CEEB", "#FFFFFF", "#F0E68C", "#FFD700", "#FFA500"]),
            size_attenuation: true,
        },
    )
}

/// 9×9×9 grid of sprung particles breathing around their anchors.
pub fn lattice() -> EnvironmentConfig {
    build(
        "lattice",
        "Lattice",
        "Pulsing geometric grid on springs",
        Distribution::Lattice,
        729,
        Bounds::grid(9, 20.0),
        BehaviorParams::Spring(SpringParams {
            spring_constant: 3.0,
            damping: 0.92,
            max_force: 15.0,
        }),
        VisualConfig {
            particle_size: 4.0,
            opacity: 0.85,
            color_palette: palette(&["#00FFFF", "#FF00FF", "#FFFF00", "#00FF88", "#FF0088", "#88FF00"]),
            size_attenuation: false,
        },
    )
}

/// Tornado funnel around the vertical axis.
pub fn vortex() -> EnvironmentConfig {
    build(
        "vortex",
        "Vortex",
        "Swirling tornado in a centripetal flow field",
        Distribution::Vortex,
        1000,
        viewer_shell(),
        BehaviorParams::Flow(FlowParams {
            vortex_axis: Vec3::Y,
            rotation_speed: 3.0,
            centripetal_strength: 0.8,
            upward_drift: 0.7,
        }),
        VisualConfig {
            particle_size: 3.0,
            opacity: 0.75,
            color_palette: palette(&["#FF4500", "#FF6347", "#FFA500", "#FFD700", "#FF8C00", "#FF7F50"]),
            size_attenuation: true,
        },
    )
}

/// Undulating water surface.
pub fn ocean() -> EnvironmentConfig {
    build(
        "ocean",
        "Ocean",
        "Undulating waves rolling along +X",
        custom("ocean"),
        900,
        viewer_shell(),
        BehaviorParams::Wave(WaveParams {
            wave_speed: 1.5,
            amplitude: 2.5,
            frequency: 0.4,
            wave_direction: Vec3::X,
        }),
        VisualConfig {
            particle_size: 4.0,
            opacity: 0.7,
            color_palette: palette(&["#0077BE", "#00CED1", "#20B2AA", "#48D1CC", "#40E0D0", "#5F9EA0"]),
            size_attenuation: false,
        },
    )
}

/// Tesseract edges rotating through 4D, rainbow colored by W.
pub fn hypercube() -> EnvironmentConfig {
    build(
        "hypercube",
        "Hypercube",
        "Rotating 4D tesseract in rainbow light",
        custom("hypercube"),
        800,
        viewer_shell(),
        BehaviorParams::Rotation(RotationParams {
            rotation_speed_xw: 0.3,
            rotation_speed_yw: 0.2,
            rotation_speed_zw: 0.15,
            projection_distance: 2.5,
        }),
        VisualConfig {
            particle_size: 3.0,
            opacity: 0.8,
            color_palette: None,
            size_attenuation: true,
        },
    )
}
