//! Declarative environment configs.
//!
//! An [`EnvironmentConfig`] bundles identity, spatial layout, behavior,
//! visual and performance settings. Configs load from JSON or YAML and must
//! pass [`EnvironmentConfig::validate`], which produces the
//! [`ValidatedEnvironment`] every [`crate::ParticleSystem`] is built from.
//! An invalid config never reaches the simulation.

pub mod initializers;
pub mod presets;

use crate::behavior::{BehaviorKind, BehaviorParams};
use crate::bounds::Bounds;
use crate::constants::{DEFAULT_MIN_FPS, DEFAULT_TARGET_FPS, MAX_PARTICLE_COUNT};
use crate::error::ConfigValidationError;
use crate::palette::parse_hex_color;
use glam::Vec3;
use initializers::{InitializerFn, InitializerRegistry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// How particles are laid out at construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Distribution {
    /// Uniform within a spherical shell (needs shell bounds)
    Spherical,
    /// Uniform within an XY rectangle (needs rect bounds)
    Planar,
    /// Anchored cubic lattice (needs grid bounds)
    Lattice,
    /// Swirling cylinder around the Y axis (needs shell bounds)
    Vortex,
    /// Named initializer from the registry; any bounds
    Custom { initializer: String },
}

impl Distribution {
    pub const TAGS: [&'static str; 5] = ["spherical", "planar", "lattice", "vortex", "custom"];

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Spherical => "spherical",
            Self::Planar => "planar",
            Self::Lattice => "lattice",
            Self::Vortex => "vortex",
            Self::Custom { .. } => "custom",
        }
    }

    fn check_bounds(&self, bounds: &Bounds) -> Result<(), ConfigValidationError> {
        let expected = match (self, bounds) {
            (Self::Spherical | Self::Vortex, Bounds::Shell { .. }) => return Ok(()),
            (Self::Planar, Bounds::Rect { .. }) => return Ok(()),
            (Self::Lattice, Bounds::Grid { .. }) => return Ok(()),
            (Self::Custom { .. }, _) => return Ok(()),
            (Self::Spherical | Self::Vortex, _) => "shell",
            (Self::Planar, _) => "rect",
            (Self::Lattice, _) => "grid",
        };
        Err(ConfigValidationError::BoundsMismatch {
            distribution: self.tag(),
            expected,
        })
    }

    fn resolve(&self, registry: &InitializerRegistry) -> Result<InitializerFn, ConfigValidationError> {
        let initializer: InitializerFn = match self {
            Self::Spherical => initializers::spherical_shell,
            Self::Planar => initializers::planar,
            Self::Lattice => initializers::lattice_grid,
            Self::Vortex => initializers::vortex_cylinder,
            Self::Custom { initializer } => {
                return registry
                    .get(initializer)
                    .ok_or_else(|| ConfigValidationError::UnknownInitializer(initializer.clone()))
            }
        };
        Ok(initializer)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpatialConfig {
    pub distribution: Distribution,
    /// Signed so a negative count is reported as out of range, not a parse error
    pub particle_count: i64,
    pub bounds: Bounds,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualConfig {
    /// Base point size (pixels)
    pub particle_size: f32,
    pub opacity: f32,
    /// `#RRGGBB` strings; `None` generates a palette from the seed
    #[serde(default)]
    pub color_palette: Option<Vec<String>>,
    #[serde(default)]
    pub size_attenuation: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerformanceConfig {
    #[serde(default = "default_target_fps")]
    pub target_fps: f32,
    /// Average below this triggers a quality reduction
    #[serde(default = "default_min_fps")]
    pub min_fps: f32,
    #[serde(default = "default_adaptive_quality")]
    pub adaptive_quality: bool,
}

fn default_target_fps() -> f32 {
    DEFAULT_TARGET_FPS
}

fn default_min_fps() -> f32 {
    DEFAULT_MIN_FPS
}

fn default_adaptive_quality() -> bool {
    true
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            target_fps: default_target_fps(),
            min_fps: default_min_fps(),
            adaptive_quality: default_adaptive_quality(),
        }
    }
}

/// A complete environment description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    pub spatial: SpatialConfig,
    pub behavior: BehaviorParams,
    pub visual: VisualConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
}

impl EnvironmentConfig {
    /// Flocking environment with a generated palette, used by the raw
    /// count-plus-bounds construction path.
    pub fn legacy(particle_count: usize, bounds: Bounds) -> Self {
        let distribution = match bounds {
            Bounds::Shell { .. } => Distribution::Spherical,
            Bounds::Rect { .. } => Distribution::Planar,
            Bounds::Grid { .. } => Distribution::Lattice,
        };
        Self {
            id: "legacy".to_string(),
            name: "Legacy".to_string(),
            description: "Flocking particles within fixed bounds".to_string(),
            spatial: SpatialConfig {
                distribution,
                particle_count: particle_count as i64,
                bounds,
            },
            behavior: BehaviorParams::default(),
            visual: VisualConfig {
                particle_size: 3.0,
                opacity: 0.8,
                color_palette: None,
                size_attenuation: false,
            },
            performance: PerformanceConfig::default(),
        }
    }

    // =========================================================================
    // LOADING
    // =========================================================================

    /// Parse from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigValidationError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigValidationError> {
        let value: Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Typed parse of an already-loaded document.
    ///
    /// The mode and distribution tags are checked first so an unknown tag is
    /// reported as such instead of as a generic deserialization error.
    /// Mode aliases are rewritten to their canonical tag.
    pub fn from_value(mut value: Value) -> Result<Self, ConfigValidationError> {
        if let Some(mode) = value.pointer_mut("/behavior/mode") {
            if let Some(tag) = mode.as_str() {
                let kind = BehaviorKind::parse(tag)
                    .ok_or_else(|| ConfigValidationError::UnknownBehaviorMode(tag.to_string()))?;
                *mode = Value::String(kind.tag().to_string());
            }
        }
        if let Some(tag) = value
            .pointer("/spatial/distribution/type")
            .and_then(Value::as_str)
        {
            if !Distribution::TAGS.contains(&tag) {
                return Err(ConfigValidationError::UnknownDistribution(tag.to_string()));
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Load configuration from JSON file
    pub fn load_json(path: &Path) -> Result<Self, ConfigValidationError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Load configuration from YAML file
    pub fn load_yaml(path: &Path) -> Result<Self, ConfigValidationError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Save configuration to JSON file
    pub fn save_json(&self, path: &Path) -> Result<(), ConfigValidationError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Save configuration to YAML file
    pub fn save_yaml(&self, path: &Path) -> Result<(), ConfigValidationError> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    // =========================================================================
    // VALIDATION
    // =========================================================================

    /// Check every field and resolve the initializer.
    pub fn validate(
        &self,
        registry: &InitializerRegistry,
    ) -> Result<ValidatedEnvironment, ConfigValidationError> {
        for (field, value) in [
            ("id", &self.id),
            ("name", &self.name),
            ("description", &self.description),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigValidationError::EmptyField { field });
            }
        }

        let count = self.spatial.particle_count;
        if count <= 0 {
            return Err(ConfigValidationError::OutOfRange {
                field: "spatial.particle_count",
                value: count as f64,
                expected: "> 0",
            });
        }
        let particle_count = usize::try_from(count)
            .ok()
            .filter(|&n| n <= MAX_PARTICLE_COUNT)
            .ok_or(ConfigValidationError::OutOfRange {
                field: "spatial.particle_count",
                value: count as f64,
                expected: "<= 1000000",
            })?;

        self.spatial.bounds.validate()?;
        self.spatial.distribution.check_bounds(&self.spatial.bounds)?;
        let initializer = self.spatial.distribution.resolve(registry)?;

        self.behavior.validate()?;

        let palette = self.validate_visual()?;
        self.validate_performance()?;

        Ok(ValidatedEnvironment {
            config: self.clone(),
            particle_count,
            palette,
            initializer,
        })
    }

    fn validate_visual(&self) -> Result<Option<Vec<Vec3>>, ConfigValidationError> {
        let visual = &self.visual;
        if !visual.particle_size.is_finite() || visual.particle_size <= 0.0 {
            return Err(out_of_range("visual.particle_size", visual.particle_size, "> 0"));
        }
        if !(0.0..=1.0).contains(&visual.opacity) {
            return Err(out_of_range("visual.opacity", visual.opacity, "within [0, 1]"));
        }

        let Some(colors) = &visual.color_palette else {
            return Ok(None);
        };
        if colors.is_empty() {
            return Err(ConfigValidationError::EmptyPalette);
        }
        colors
            .iter()
            .map(|hex| parse_hex_color(hex).ok_or_else(|| ConfigValidationError::InvalidColor(hex.clone())))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    fn validate_performance(&self) -> Result<(), ConfigValidationError> {
        let perf = &self.performance;
        if !perf.target_fps.is_finite() || perf.target_fps <= 0.0 {
            return Err(out_of_range("performance.target_fps", perf.target_fps, "> 0"));
        }
        if !perf.min_fps.is_finite() || perf.min_fps <= 0.0 || perf.min_fps > perf.target_fps {
            return Err(out_of_range(
                "performance.min_fps",
                perf.min_fps,
                "> 0 and <= target_fps",
            ));
        }
        Ok(())
    }
}

fn out_of_range(field: &'static str, value: f32, expected: &'static str) -> ConfigValidationError {
    ConfigValidationError::OutOfRange {
        field,
        value: value as f64,
        expected,
    }
}

/// A config that passed validation, with its palette parsed and its
/// initializer resolved. Only [`EnvironmentConfig::validate`] creates one.
#[derive(Clone)]
pub struct ValidatedEnvironment {
    config: EnvironmentConfig,
    particle_count: usize,
    palette: Option<Vec<Vec3>>,
    initializer: InitializerFn,
}

impl ValidatedEnvironment {
    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn particle_count(&self) -> usize {
        self.particle_count
    }

    /// Explicit palette, if the config carried one.
    pub fn palette(&self) -> Option<&[Vec3]> {
        self.palette.as_deref()
    }

    pub fn initializer(&self) -> InitializerFn {
        self.initializer
    }
}

impl fmt::Debug for ValidatedEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedEnvironment")
            .field("id", &self.config.id)
            .field("particle_count", &self.particle_count)
            .field("mode", &self.config.behavior.kind())
            .field("distribution", &self.config.spatial.distribution)
            .finish()
    }
}
