//! RNG module - seedable color source for refills
//!
//! A simple LCG keeps the whole simulation deterministic: the same seed and
//! command sequence reproduce boards and step logs exactly, which is what
//! replay and tests rely on. Refill colors are drawn uniformly from the
//! active palette (the first `palette_size` entries of [`Color::ALL`]).

use gridspin_types::Color;

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

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }
}

/// Anything that can hand out the next refill color.
///
/// The production implementation is [`PaletteSource`]; tests script exact
/// color sequences through this seam to pin down chain outcomes.
pub trait ColorPicker {
    fn next_color(&mut self) -> Color;
}

/// Uniform draws from the first `palette_size` palette entries.
#[derive(Debug, Clone)]
pub struct PaletteSource {
    rng: SimpleRng,
    palette_size: u8,
}

impl PaletteSource {
    /// Create a source for a validated palette size (1..=8).
    pub fn new(seed: u32, palette_size: u8) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            palette_size,
        }
    }

    pub fn palette_size(&self) -> u8 {
        self.palette_size
    }

    /// Current RNG state (for restarting a board with the same sequence).
    pub fn seed(&self) -> u32 {
        self.rng.state
    }
}

impl ColorPicker for PaletteSource {
    fn next_color(&mut self) -> Color {
        let index = self.rng.next_range(self.palette_size as u32) as usize;
        Color::ALL[index]
    }
}
