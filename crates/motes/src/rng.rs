//! Seeded pseudo-random numbers (mulberry32).
//!
//! [`SeededRandom`] implements [`rand::RngCore`], which is the seam every
//! constructor takes its randomness through. Tests can hand in any other
//! `RngCore` (a `ChaCha8Rng`, or `rand::rngs::mock::StepRng` for a fixed
//! sequence) without touching the simulation code.

use rand::RngCore;

const GOLDEN_GAMMA: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Deterministic 32-bit generator. Output depends only on the seed and the
/// number of values drawn so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededRandom {
    seed: u32,
    state: u32,
}

impl SeededRandom {
    /// Create a generator from a 32-bit seed.
    pub fn new(seed: u32) -> Self {
        Self { seed, state: seed }
    }

    /// The seed this generator was created with.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Next float in [0, 1).
    pub fn next(&mut self) -> f64 {
        self.next_unit()
    }

    #[inline]
    fn step(&mut self) -> u32 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }
}

impl RngCore for SeededRandom {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.step() as u64;
        let lo = self.step() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Range helpers over any [`RngCore`]. Every helper consumes exactly one
/// 32-bit draw, so call sequences stay aligned across generators.
pub trait RandomSource: RngCore {
    /// Float in [0, 1) from a single 32-bit draw.
    fn next_unit(&mut self) -> f64 {
        self.next_u32() as f64 / TWO_POW_32
    }

    /// Integer in [min, max).
    fn next_int(&mut self, min: i32, max: i32) -> i32 {
        (self.next_unit() * (max as f64 - min as f64)).floor() as i32 + min
    }

    /// Float in [min, max).
    fn next_float(&mut self, min: f32, max: f32) -> f32 {
        (self.next_unit() * (max as f64 - min as f64) + min as f64) as f32
    }

    /// Index in [0, len). Returns 0 for an empty range.
    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_unit() * len as f64) as usize).min(len - 1)
    }

    /// Float in [-0.5, 0.5) as f32, the centred jitter used by initializers.
    fn next_centered(&mut self) -> f32 {
        (self.next_unit() - 0.5) as f32
    }
}

impl<R: RngCore + ?Sized> RandomSource for R {}
