//! Frame-stepped particle environments.
//!
//! A [`ParticleSystem`] owns a fixed population of point particles and moves
//! them every frame with one of seven behavior models (flocking, Brownian
//! drift, orbital gravity, spring anchoring, vortex flow, traveling waves and
//! 4D rotation). Systems are built from a validated [`EnvironmentConfig`];
//! every pseudo-random choice flows from one `u32` seed, so the same seed,
//! config and delta sequence replay the same trajectories.
//!
//! # Example
//!
//! ```
//! use motes::{presets, InitializerRegistry, ParticleSystem, SeededRandom};
//!
//! let registry = InitializerRegistry::with_builtins();
//! let environment = presets::sphere().validate(&registry).unwrap();
//!
//! let mut rng = SeededRandom::new(42);
//! let mut system = ParticleSystem::new(&environment, &mut rng);
//!
//! // Run one 60 Hz frame without an interaction point
//! system.update(1.0 / 60.0, None);
//! assert_eq!(system.positions().len(), system.active_count() * 3);
//! ```

pub mod behavior;
pub mod bounds;
pub mod constants;
pub mod environment;
pub mod error;
pub mod neighbors;
pub mod noise_field;
pub mod palette;
pub mod particle;
pub mod performance;
pub mod rng;
pub mod serde_utils;
pub mod session;
pub mod speed;
pub mod system;

pub use behavior::{
    BehaviorKind, BehaviorModel, BehaviorParams, BrownianParams, FlockingParams, FlowParams,
    OrbitalParams, RotationParams, SpringParams, WaveParams,
};
pub use bounds::Bounds;
pub use environment::initializers::{InitializerFn, InitializerRegistry, ParticleSeed, SpawnContext};
pub use environment::presets;
pub use environment::{
    Distribution, EnvironmentConfig, PerformanceConfig, SpatialConfig, ValidatedEnvironment,
    VisualConfig,
};
pub use error::{ConfigValidationError, SessionError};
pub use glam::{Vec3, Vec4};
pub use neighbors::NeighborQuery;
pub use noise_field::NoiseField;
pub use particle::{AuxState, Particle};
pub use performance::{AdaptiveQualityController, PerformanceMonitor, QualityPolicy};
pub use rng::{RandomSource, SeededRandom};
pub use session::Session;
pub use speed::{SpeedControl, SpeedPreset};
pub use system::ParticleSystem;
