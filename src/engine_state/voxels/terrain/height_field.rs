//! # Height Field
//!
//! Fractal simplex noise mapping a world column to a terrain elevation.

use noise::{NoiseFn, OpenSimplex};

use crate::config::NoiseConfig;

/// Deterministic terrain elevation function.
///
/// The same seed and parameters always produce the same heights, so a chunk
/// regenerated after eviction matches the one that was dropped.
pub struct HeightField {
    noise: OpenSimplex,
    octaves: u32,
    base_height: f64,
    amplitude: f64,
    frequency: f64,
}

impl HeightField {
    /// Builds a height field from noise parameters.
    pub fn new(config: &NoiseConfig) -> Self {
        HeightField {
            noise: OpenSimplex::new(config.seed),
            octaves: config.octaves,
            base_height: config.base_height,
            amplitude: config.amplitude,
            frequency: config.frequency,
        }
    }

    /// Samples the terrain elevation at a world column.
    ///
    /// Starts from the base height and adds one simplex octave per step,
    /// doubling the frequency and halving the amplitude each time.
    pub fn height(&self, world_x: f64, world_z: f64) -> f64 {
        let mut height = self.base_height;
        let mut amplitude = self.amplitude;
        let mut frequency = self.frequency;

        for _ in 0..self.octaves {
            height += amplitude * self.noise.get([world_x * frequency, world_z * frequency]);
            frequency *= 2.0;
            amplitude *= 0.5;
        }

        height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_heights() {
        let a = HeightField::new(&NoiseConfig::default());
        let b = HeightField::new(&NoiseConfig::default());
        for (x, z) in [(0.0, 0.0), (17.0, -3.0), (-512.0, 1024.0)] {
            assert_eq!(a.height(x, z).to_bits(), b.height(x, z).to_bits());
        }
    }

    #[test]
    fn heights_stay_within_the_octave_envelope() {
        let config = NoiseConfig::default();
        let field = HeightField::new(&config);
        // Sum of 30 + 15 + 7.5 + 3.75, with headroom for the noise range.
        let envelope = config.amplitude * 2.0 * 1.1;
        for i in -50..50 {
            let h = field.height(i as f64 * 37.0, i as f64 * -11.0);
            assert!((h - config.base_height).abs() <= envelope, "height {} out of range", h);
        }
    }

    #[test]
    fn zero_amplitude_is_flat() {
        let config = NoiseConfig {
            amplitude: 0.0,
            base_height: 12.5,
            ..NoiseConfig::default()
        };
        let field = HeightField::new(&config);
        assert_eq!(field.height(100.0, -40.0), 12.5);
    }
}
