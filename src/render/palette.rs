use image::Rgba;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Text color drawn on top of element colors
pub const LABEL_TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Upper bound per channel so white label text stays readable
const MAX_CHANNEL: u8 = 200;

/// Source of per-element box colors
///
/// Seeded sources produce the same sequence every run, which keeps rendered
/// output reproducible.
#[derive(Debug, Clone)]
pub struct ColorSource {
    rng: StdRng,
}

impl ColorSource {
    /// Deterministic sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Fresh sequence from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded when a seed is given, random otherwise
    pub fn new(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }

    /// Next opaque color
    pub fn next_color(&mut self) -> Rgba<u8> {
        Rgba([
            self.rng.gen_range(0..=MAX_CHANNEL),
            self.rng.gen_range(0..=MAX_CHANNEL),
            self.rng.gen_range(0..=MAX_CHANNEL),
            255,
        ])
    }
}
