//! Tuning constants shared by the behavior models and the frame driver.
//!
//! ## Singularity guards
//!
//! Orbital and vortex forces scale with `1/r` or `1/r²`. Below
//! [`MIN_FORCE_RADIUS`] the force is skipped for that particle and frame
//! instead of producing a huge impulse.

/// Radius below which central/axial forces are not applied (world units)
pub const MIN_FORCE_RADIUS: f32 = 0.1;

/// Softening term in the inverse-square user attraction `s / (d² + ε)`
pub const ATTRACTION_EPSILON: f32 = 0.1;

/// Offset added to the vortex radius so tangential speed stays finite near the axis
pub const VORTEX_RADIUS_SOFTENING: f32 = 0.5;

/// Spring stiffness pulling wave particles toward the instantaneous wave height
pub const WAVE_VERTICAL_STIFFNESS: f32 = 2.0;

/// Fraction of the wave speed applied as horizontal drift along the wave direction
pub const WAVE_DRIFT_FACTOR: f32 = 0.1;

/// Per-frame velocity damping in wave mode
pub const WAVE_DAMPING: f32 = 0.98;

/// Smallest |d - w| used as the 4D perspective denominator
pub const PROJECTION_MIN_DENOMINATOR: f32 = 0.1;

/// Delta substituted when deriving rotation velocity from a zero-length frame
pub const FALLBACK_DELTA: f32 = 1.0 / 60.0;

/// Offset between noise sample points so vector components decorrelate
pub const NOISE_AXIS_OFFSET: f64 = 1000.0;

// =============================================================================
// CONFIG LIMITS
// =============================================================================

/// Largest particle count a config may ask for
pub const MAX_PARTICLE_COUNT: usize = 1_000_000;

/// Largest lattice resolution per axis (1024³ cells)
pub const MAX_GRID_CELLS_PER_AXIS: u32 = 1024;

// =============================================================================
// ADAPTIVE QUALITY
// =============================================================================

/// Frames collected between quality checks
pub const DEFAULT_CHECK_INTERVAL: usize = 60;

/// Fraction of active particles dropped per quality reduction
pub const DEFAULT_REDUCTION_RATE: f64 = 0.15;

/// Active particle count never drops below this during adaptive quality
pub const DEFAULT_MIN_PARTICLES: usize = 100;

/// Default frame-rate target (Quest-class headsets)
pub const DEFAULT_TARGET_FPS: f32 = 72.0;

/// Default minimum acceptable frame rate before quality is reduced
pub const DEFAULT_MIN_FPS: f32 = 65.0;

// =============================================================================
// PALETTES
// =============================================================================

/// Palette size used when an environment asks for a generated palette
pub const GENERATED_PALETTE_SIZE: usize = 3;
