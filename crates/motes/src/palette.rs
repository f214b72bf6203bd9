//! Color palettes.
//!
//! Generated palettes use an analogous HSL scheme: one random base hue and
//! evenly spread neighbors within 30-90 degrees, with saturation 60-90% and
//! lightness 40-70%. Explicit palettes are `#RRGGBB` strings from the config.

use crate::rng::RandomSource;
use glam::Vec3;
use rand::RngCore;

pub const MIN_PALETTE_SIZE: usize = 2;
pub const MAX_PALETTE_SIZE: usize = 4;

/// Generate `size` harmonious colors (clamped to 2..=4).
///
/// Draw order: base hue, hue spread, then saturation and lightness per color.
pub fn generate_palette<R: RngCore + ?Sized>(rng: &mut R, size: usize) -> Vec<Vec3> {
    let size = size.clamp(MIN_PALETTE_SIZE, MAX_PALETTE_SIZE);

    let base_hue = rng.next_unit() * 360.0;
    let hue_spread = rng.next_unit() * 60.0 + 30.0;

    (0..size)
        .map(|i| {
            let offset = i as f64 / (size - 1) as f64 * hue_spread;
            let hue = (base_hue + offset) % 360.0;
            let saturation = rng.next_unit() * 30.0 + 60.0;
            let lightness = rng.next_unit() * 30.0 + 40.0;
            hsl_to_rgb(
                (hue / 360.0) as f32,
                (saturation / 100.0) as f32,
                (lightness / 100.0) as f32,
            )
        })
        .collect()
}

/// Uniformly pick one palette color. An empty palette yields white without
/// consuming a draw.
pub fn pick_color<R: RngCore + ?Sized>(palette: &[Vec3], rng: &mut R) -> Vec3 {
    if palette.is_empty() {
        return Vec3::ONE;
    }
    palette[rng.next_index(palette.len())]
}

/// HSL (all channels in [0, 1], hue wraps) to linear RGB in [0, 1].
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Vec3 {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return Vec3::splat(l);
    }

    let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Vec3::new(
        hue_channel(p, q, h + 1.0 / 3.0),
        hue_channel(p, q, h),
        hue_channel(p, q, h - 1.0 / 3.0),
    )
}

fn hue_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

/// Parse `#RRGGBB` into channels in [0, 1].
pub fn parse_hex_color(hex: &str) -> Option<Vec3> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .ok()
            .map(|v| v as f32 / 255.0)
    };
    Some(Vec3::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
