//! Random number sources for combat rolls.
//!
//! Every random draw in a battle (crit rolls, damage jitter, spawn edges,
//! timer jitter, aim spread) goes through the battle's single [`CombatRng`].
//! Seeding it reproduces a battle on the same machine; bit-exact replay across
//! platforms is not a goal because positions use `f32`.

/// Source of random values used by the simulation.
pub trait CombatRng {
    /// Generate the next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Uniform value in `[0, 1)`.
    fn unit(&mut self) -> f32 {
        // 24 high-quality bits fit exactly in an f32 mantissa.
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform value in `[min, max)`. Returns `min` when the range is empty.
    fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + self.unit() * (max - min)
    }

    /// Uniform integer in `[0, n)`. Returns 0 when `n` is 0.
    fn below(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.next_u32() % n
    }
}

impl<R: CombatRng + ?Sized> CombatRng for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }

    fn unit(&mut self) -> f32 {
        (**self).unit()
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    /// Creates a generator from a seed. The seed is mixed so that nearby
    /// seeds do not produce correlated opening sequences.
    pub fn seeded(seed: u64) -> Self {
        let mut rng = Self {
            state: mix_seed(seed),
        };
        rng.step();
        rng
    }

    #[inline]
    fn step(&mut self) {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl Default for PcgRng {
    fn default() -> Self {
        Self::seeded(0)
    }
}

impl CombatRng for PcgRng {
    fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.step();
        Self::output(old)
    }
}

/// SplitMix64 finalizer.
fn mix_seed(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Replays a fixed cycle of unit values. Intended for tests and tooling
/// that need to pin crit rolls and jitter.
#[derive(Clone, Debug)]
pub struct FixedRng {
    values: Vec<f32>,
    cursor: usize,
}

impl FixedRng {
    /// Creates a generator cycling through `values` (each clamped to `[0, 1)`).
    /// An empty list behaves like a constant `0.0`.
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        let values = values
            .into()
            .into_iter()
            .map(|v| v.clamp(0.0, 0.999_999))
            .collect();
        Self { values, cursor: 0 }
    }

    /// Generator that always returns `value`.
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl CombatRng for FixedRng {
    fn next_u32(&mut self) -> u32 {
        (self.unit() * u32::MAX as f32) as u32
    }

    fn unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
