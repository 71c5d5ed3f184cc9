//! RNG module - deterministic random numbers for level generation
//!
//! Procedural levels must be reproducible from `(session seed, level index)`
//! so a reload regenerates the exact same layout. A small LCG is enough for
//! placement jitter and keeps the core free of external RNG dependencies.

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// RNG dedicated to one level of a session.
    ///
    /// Mixes the level index into the session seed so neighbouring levels do
    /// not share a prefix of their random stream.
    pub fn for_level(seed: u32, level_index: usize) -> Self {
        let mixed = seed ^ (level_index as u32).wrapping_add(1).wrapping_mul(0x9E37_79B9);
        let mut rng = Self::new(mixed);
        // Let the first outputs decorrelate from the raw seed.
        for _ in 0..4 {
            rng.next_u32();
        }
        rng
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // High bits of an LCG are far better distributed than the low ones.
        (((self.next_u32() >> 8) as u64 * max as u64) >> 24) as u32
    }

    /// Uniform float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform float in [lo, hi)
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }

    /// Inclusive integer range [lo, hi]
    pub fn range_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        lo + self.next_range(hi - lo + 1)
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Pick an index into a collection of `len` items
    pub fn pick(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.next_range(len as u32) as usize)
        }
    }

    /// Current RNG state (for reproducing a stream)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
