//! Initial particle layouts.
//!
//! An initializer turns a particle index plus the session RNG into a
//! [`ParticleSeed`]. The four distribution strategies (spherical shell,
//! planar rectangle, lattice grid, vortex cylinder) are selected by the
//! config's distribution type; custom layouts are registered by name in an
//! [`InitializerRegistry`] so configs only ever carry the name.
//!
//! Initializers must draw from the RNG in a fixed order; reproducibility of
//! a whole scene depends on it.

use crate::behavior::rotation::project;
use crate::bounds::Bounds;
use crate::constants::MAX_GRID_CELLS_PER_AXIS;
use crate::palette::{hsl_to_rgb, pick_color};
use crate::rng::RandomSource;
use glam::{Vec3, Vec4};
use rand::RngCore;
use std::collections::HashMap;
use std::f32::consts::{PI, TAU};
use std::fmt;

pub use crate::particle::ParticleSeed;

/// Produces the initial state of particle `ctx.index`.
pub type InitializerFn = fn(&SpawnContext<'_>, &mut dyn RngCore) -> ParticleSeed;

/// What an initializer knows about the particle it is spawning.
#[derive(Clone, Copy, Debug)]
pub struct SpawnContext<'a> {
    pub index: usize,
    pub count: usize,
    pub bounds: &'a Bounds,
    /// Resolved palette (explicit or generated)
    pub palette: &'a [Vec3],
}

// =============================================================================
// LAYOUT CONSTANTS
// =============================================================================

const LATTICE_JITTER: f32 = 1.5;
const LATTICE_VERTEX_SIZE: f32 = 6.0;
const DEFAULT_GRID_CELLS: u32 = 9;
const DEFAULT_GRID_EXTENT: f32 = 20.0;

const VORTEX_MAX_RADIUS: f32 = 15.0;
const VORTEX_HEIGHT: f32 = 25.0;
const VORTEX_INITIAL_LIFT: f32 = 0.3;

const GALAXY_ARMS: u32 = 3;
const GALAXY_SPIRAL_A: f32 = 3.0;
const GALAXY_SPIRAL_B: f32 = 0.15;
const GALAXY_GM: f32 = 50.0;

const OCEAN_PLANE_SIZE: f32 = 30.0;
const OCEAN_DRIFT: f32 = 0.5;

const TESSERACT_SCALE: f32 = 5.0;
const TESSERACT_PROJECTION: f32 = 2.5;

// =============================================================================
// SHARED HELPERS
// =============================================================================

/// Inner/outer radii for radial layouts; non-shell bounds fill from the origin.
fn shell_radii(bounds: &Bounds) -> (f32, f32) {
    match *bounds {
        Bounds::Shell { inner_radius, outer_radius } => (inner_radius, outer_radius),
        Bounds::Rect { min_x, max_x, min_y, max_y } => {
            (0.0, 0.5 * (max_x - min_x).min(max_y - min_y))
        }
        Bounds::Grid { extent, .. } => (0.0, 0.5 * extent),
    }
}

fn rect_extent(bounds: &Bounds) -> (f32, f32, f32, f32) {
    match *bounds {
        Bounds::Rect { min_x, max_x, min_y, max_y } => (min_x, max_x, min_y, max_y),
        Bounds::Shell { outer_radius, .. } => (-outer_radius, outer_radius, -outer_radius, outer_radius),
        Bounds::Grid { extent, .. } => (-0.5 * extent, 0.5 * extent, -0.5 * extent, 0.5 * extent),
    }
}

/// Random point in a spherical shell: r, then azimuth, then polar angle.
fn shell_point(rng: &mut dyn RngCore, inner: f32, outer: f32) -> Vec3 {
    let r = rng.next_float(inner, outer);
    let theta = rng.next_float(0.0, TAU);
    let phi = rng.next_float(0.0, PI);
    Vec3::new(r * phi.sin() * theta.cos(), r * phi.sin() * theta.sin(), r * phi.cos())
}

fn jitter3(rng: &mut dyn RngCore, scale: f32) -> Vec3 {
    let x = rng.next_centered() * scale;
    let y = rng.next_centered() * scale;
    let z = rng.next_centered() * scale;
    Vec3::new(x, y, z)
}

/// Palette pick, or a random RGB triple when no palette is available.
fn spawn_color(palette: &[Vec3], rng: &mut dyn RngCore) -> Vec3 {
    if palette.is_empty() {
        let r = rng.next_unit() as f32;
        let g = rng.next_unit() as f32;
        let b = rng.next_unit() as f32;
        return Vec3::new(r, g, b);
    }
    pick_color(palette, rng)
}

// =============================================================================
// DISTRIBUTION STRATEGIES
// =============================================================================

/// Uniform radius within the shell, slow random velocity, size 2-5.
pub fn spherical_shell(ctx: &SpawnContext<'_>, rng: &mut dyn RngCore) -> ParticleSeed {
    let (inner, outer) = shell_radii(ctx.bounds);
    let position = shell_point(rng, inner, outer);
    let velocity = jitter3(rng, 1.0);
    let color = spawn_color(ctx.palette, rng);
    let size = rng.next_float(2.0, 5.0);
    ParticleSeed::new(position, velocity, color, size)
}

/// Uniform in the XY rectangle at z = 0.
pub fn planar(ctx: &SpawnContext<'_>, rng: &mut dyn RngCore) -> ParticleSeed {
    let (min_x, max_x, min_y, max_y) = rect_extent(ctx.bounds);
    let x = rng.next_float(min_x, max_x);
    let y = rng.next_float(min_y, max_y);
    let vx = rng.next_centered();
    let vy = rng.next_centered();
    let color = spawn_color(ctx.palette, rng);
    let size = rng.next_float(2.0, 5.0);
    ParticleSeed::new(Vec3::new(x, y, 0.0), Vec3::new(vx, vy, 0.0), color, size)
}

/// Cubic lattice centred on the origin. Particle `i` is anchored to cell
/// `i mod n³` (x fastest), starts jittered around it, and the eight corner
/// cells get large particles.
pub fn lattice_grid(ctx: &SpawnContext<'_>, rng: &mut dyn RngCore) -> ParticleSeed {
    let (n, extent) = match *ctx.bounds {
        Bounds::Grid { cells_per_axis, extent } => {
            (cells_per_axis.clamp(1, MAX_GRID_CELLS_PER_AXIS), extent)
        }
        _ => (DEFAULT_GRID_CELLS, DEFAULT_GRID_EXTENT),
    };
    let n = n as usize;
    let layer = n * n;
    let cells = layer.checked_mul(n).unwrap_or(usize::MAX);
    let cell = ctx.index % cells;
    let (i, j, k) = (cell % n, (cell / n) % n, cell / layer);

    let spacing = if n > 1 { extent / (n - 1) as f32 } else { 0.0 };
    let half = (n - 1) as f32 / 2.0;
    let anchor = Vec3::new(
        (i as f32 - half) * spacing,
        (j as f32 - half) * spacing,
        (k as f32 - half) * spacing,
    );

    let position = anchor + jitter3(rng, LATTICE_JITTER);
    let velocity = jitter3(rng, 0.5);
    let color = spawn_color(ctx.palette, rng);

    let edge = |c: usize| c == 0 || c == n - 1;
    let size = if edge(i) && edge(j) && edge(k) {
        LATTICE_VERTEX_SIZE
    } else {
        rng.next_float(3.0, 5.0)
    };

    ParticleSeed::new(position, velocity, color, size).with_anchor(anchor)
}

/// Cylinder around the Y axis, denser near the axis, already swirling.
pub fn vortex_cylinder(ctx: &SpawnContext<'_>, rng: &mut dyn RngCore) -> ParticleSeed {
    let r = (rng.next_unit() as f32).sqrt() * VORTEX_MAX_RADIUS;
    let theta = rng.next_float(0.0, TAU);
    let y = rng.next_centered() * VORTEX_HEIGHT;
    let position = Vec3::new(r * theta.cos(), y, r * theta.sin());

    let angular_speed = 2.0 / (r + 0.5);
    let tangent = theta + PI / 2.0;
    let velocity = Vec3::new(
        angular_speed * tangent.cos(),
        VORTEX_INITIAL_LIFT,
        angular_speed * tangent.sin(),
    );

    let color = spawn_color(ctx.palette, rng);
    let size = (5.0 - r * 0.2).max(2.0);
    ParticleSeed::new(position, velocity, color, size)
}

// =============================================================================
// CUSTOM LAYOUTS
// =============================================================================

/// Shell cloud of large, nearly still particles.
pub fn nebula(ctx: &SpawnContext<'_>, rng: &mut dyn RngCore) -> ParticleSeed {
    let (inner, outer) = shell_radii(ctx.bounds);
    let position = shell_point(rng, inner, outer);
    let velocity = jitter3(rng, 0.2);
    let color = spawn_color(ctx.palette, rng);
    let size = rng.next_float(4.0, 8.0);
    ParticleSeed::new(position, velocity, color, size)
}

/// Three-arm logarithmic spiral in a thin disk, on circular orbits.
pub fn galaxy(ctx: &SpawnContext<'_>, rng: &mut dyn RngCore) -> ParticleSeed {
    let (inner, outer) = shell_radii(ctx.bounds);

    let arm = (rng.next_unit() * GALAXY_ARMS as f64).floor() as f32;
    let arm_offset = arm * TAU / GALAXY_ARMS as f32;
    let theta = rng.next_float(0.0, 2.0 * TAU) + arm_offset;
    let r = GALAXY_SPIRAL_A * (GALAXY_SPIRAL_B * theta).exp() + rng.next_centered() * 2.0;
    let r = r.clamp(inner, outer);
    let z = rng.next_centered() * 3.0;
    let position = Vec3::new(r * theta.cos(), r * theta.sin(), z);

    let orbital_speed = (GALAXY_GM / (r + 1.0)).sqrt();
    let tangent = theta + PI / 2.0;
    let velocity = Vec3::new(
        orbital_speed * tangent.cos(),
        orbital_speed * tangent.sin(),
        rng.next_centered() * 0.1,
    );

    let color = spawn_color(ctx.palette, rng);
    let size = rng.next_float(2.0, 4.0);
    ParticleSeed::new(position, velocity, color, size)
}

/// Square patch of the XZ plane with initial sine swell, drifting along +X.
pub fn ocean(ctx: &SpawnContext<'_>, rng: &mut dyn RngCore) -> ParticleSeed {
    let x = rng.next_centered() * OCEAN_PLANE_SIZE;
    let z = rng.next_centered() * OCEAN_PLANE_SIZE;
    let y = (x * 0.3).sin() * 2.0 + (z * 0.4).sin() * 1.5;

    let velocity = Vec3::new(OCEAN_DRIFT, 0.0, rng.next_centered() * 0.2);
    let color = spawn_color(ctx.palette, rng);
    let size = rng.next_float(3.0, 5.0);
    ParticleSeed::new(Vec3::new(x, y, z), velocity, color, size)
}

/// The 16 vertices of a tesseract with half-side [`TESSERACT_SCALE`].
pub fn tesseract_vertices() -> [Vec4; 16] {
    std::array::from_fn(|i| {
        let sign = |bit: usize| if i & bit != 0 { 1.0 } else { -1.0 };
        Vec4::new(sign(1), sign(2), sign(4), sign(8)) * TESSERACT_SCALE
    })
}

/// The 32 edges: vertex pairs differing in exactly one coordinate.
pub fn tesseract_edges() -> Vec<(usize, usize)> {
    let mut edges = Vec::with_capacity(32);
    for i in 0..16usize {
        for j in (i + 1)..16 {
            if (i ^ j).count_ones() == 1 {
                edges.push((i, j));
            }
        }
    }
    edges
}

/// Points on tesseract edges, colored by W and edge index. Seeds the 4D
/// coordinate so rotation starts from the true 4D shape.
pub fn hypercube(_ctx: &SpawnContext<'_>, rng: &mut dyn RngCore) -> ParticleSeed {
    let vertices = tesseract_vertices();
    let edges = tesseract_edges();

    let edge_index = rng.next_index(edges.len());
    let (a, b) = edges[edge_index];
    let t = rng.next_unit() as f32;
    let point = vertices[a].lerp(vertices[b], t);

    let position = project(point, TESSERACT_PROJECTION);
    let hue = ((point.w + TESSERACT_SCALE) / (2.0 * TESSERACT_SCALE) + edge_index as f32 * 0.05) % 1.0;
    let color = hsl_to_rgb(hue, 1.0, 0.6);
    let size = rng.next_float(2.5, 4.5);

    ParticleSeed::new(position, Vec3::ZERO, color, size).with_coord_4d(point)
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Named custom initializers.
#[derive(Clone, Default)]
pub struct InitializerRegistry {
    entries: HashMap<String, InitializerFn>,
}

impl InitializerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `nebula`, `galaxy`, `ocean` and `hypercube`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("nebula", nebula);
        registry.register("galaxy", galaxy);
        registry.register("ocean", ocean);
        registry.register("hypercube", hypercube);
        registry
    }

    /// Add or replace an initializer.
    pub fn register(&mut self, name: impl Into<String>, initializer: InitializerFn) {
        self.entries.insert(name.into(), initializer);
    }

    pub fn get(&self, name: &str) -> Option<InitializerFn> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for InitializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitializerRegistry")
            .field("names", &self.names())
            .finish()
    }
}
