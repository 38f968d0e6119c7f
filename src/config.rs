//! # World Configuration
//!
//! Build-time defaults for the voxel world and the [`WorldConfig`] that groups
//! them. A host may load a JSON file at start-up to override any subset of the
//! defaults; nothing changes the configuration once a `World` is built.
//!
//! ```
//! use voxel_world::config::WorldConfig;
//!
//! let config = WorldConfig::from_json_str(r#"{ "render_distance": 4 }"#).unwrap();
//! assert_eq!(config.render_distance, 4);
//! assert_eq!(config.chunk_size, voxel_world::config::CHUNK_SIZE);
//! ```

use std::{fmt, fs, path::Path};

use serde::{Deserialize, Serialize};

/// Horizontal footprint of a chunk along X and Z, in blocks.
pub const CHUNK_SIZE: usize = 16;
/// Vertical extent of a chunk, in blocks.
pub const CHUNK_HEIGHT: usize = 128;
/// Surfaces below this elevation become water.
pub const WATER_LEVEL: i32 = 27;
/// Surfaces above this elevation become snow.
pub const SNOW_LEVEL: i32 = 80;
/// Surfaces below this elevation (and above water) become sand.
pub const SAND_LEVEL: i32 = 30;
/// Retention radius around the viewer, in chunks (Chebyshev distance).
pub const RENDER_DISTANCE: i32 = 16;
/// Maximum number of queued chunks meshed per update.
pub const CHUNKS_PER_FRAME: usize = 2;
/// Seed of the terrain noise.
pub const NOISE_SEED: u32 = 999;
/// Number of noise octaves summed into the height field.
pub const NOISE_OCTAVES: u32 = 4;
/// Terrain elevation before any noise is applied.
pub const BASE_HEIGHT: f64 = 60.0;
/// Amplitude of the first noise octave.
pub const BASE_AMPLITUDE: f64 = 30.0;
/// Frequency of the first noise octave.
pub const BASE_FREQUENCY: f64 = 0.003;
/// Half the edge length of a rendered block. Block geometry is centered on
/// its integer coordinate.
pub const BLOCK_RENDER_SIZE: f32 = 0.5;
/// Default reach of the block-targeting ray, in world units.
pub const MAX_REACH: f32 = 5.0;
/// Distance between two ray samples, in world units.
pub const RAY_STEP: f32 = 0.01;
/// Minimum number of frames between two block edits.
pub const EDIT_COOLDOWN_TICKS: u64 = 15;
/// Local column that receives the single tree of a chunk.
pub const TREE_COLUMN: (usize, usize) = (10, 10);
/// Cells per row and per column of the texture atlas.
pub const ATLAS_CELLS_PER_SIDE: u32 = 16;

/// Errors raised while loading a [`WorldConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io {
        /// Path that failed to open.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid JSON for a `WorldConfig`.
    Parse(serde_json::Error),
    /// The values parsed but describe an unusable world.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read world config '{}': {}", path, source)
            }
            ConfigError::Parse(error) => write!(f, "failed to parse world config: {}", error),
            ConfigError::Invalid(reason) => write!(f, "invalid world config: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(error) => Some(error),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::Parse(error)
    }
}

/// Parameters of the fractal height field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Seed handed to the simplex noise source.
    pub seed: u32,
    /// Number of octaves; each doubles the frequency and halves the amplitude.
    pub octaves: u32,
    /// Elevation the octaves are added to.
    pub base_height: f64,
    /// Amplitude of the first octave.
    pub amplitude: f64,
    /// Frequency of the first octave.
    pub frequency: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: NOISE_SEED,
            octaves: NOISE_OCTAVES,
            base_height: BASE_HEIGHT,
            amplitude: BASE_AMPLITUDE,
            frequency: BASE_FREQUENCY,
        }
    }
}

/// Which decoration pass runs after the terrain columns are filled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecorationConfig {
    /// No decoration at all.
    None,
    /// One tree at a fixed local column of every chunk.
    SingleColumn {
        /// Local x of the tree column.
        x: usize,
        /// Local z of the tree column.
        z: usize,
    },
    /// Trees scattered by a deterministic per-column probability.
    Scattered {
        /// Probability in `[0, 1]` that a suitable column grows a tree.
        chance: f64,
    },
}

impl Default for DecorationConfig {
    fn default() -> Self {
        DecorationConfig::SingleColumn {
            x: TREE_COLUMN.0,
            z: TREE_COLUMN.1,
        }
    }
}

/// Complete configuration of a voxel world.
///
/// Every field falls back to its build-time default when absent from JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Chunk footprint along X and Z.
    pub chunk_size: usize,
    /// Chunk height along Y.
    pub chunk_height: usize,
    /// Water threshold for surface blocks.
    pub water_level: i32,
    /// Snow threshold for surface blocks.
    pub snow_level: i32,
    /// Sand threshold for surface blocks.
    pub sand_level: i32,
    /// Whether the lowest layer of every column is bedrock.
    pub bedrock_floor: bool,
    /// Retention radius in chunks.
    pub render_distance: i32,
    /// Mesh builds allowed per update.
    pub chunks_per_frame: usize,
    /// Height field parameters.
    pub noise: NoiseConfig,
    /// Decoration strategy.
    pub decoration: DecorationConfig,
    /// Half edge of a rendered block.
    pub block_render_size: f32,
    /// Reach of the targeting ray.
    pub max_reach: f32,
    /// Ray marching step.
    pub ray_step: f32,
    /// Frames between two edits.
    pub edit_cooldown_ticks: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            chunk_height: CHUNK_HEIGHT,
            water_level: WATER_LEVEL,
            snow_level: SNOW_LEVEL,
            sand_level: SAND_LEVEL,
            bedrock_floor: true,
            render_distance: RENDER_DISTANCE,
            chunks_per_frame: CHUNKS_PER_FRAME,
            noise: NoiseConfig::default(),
            decoration: DecorationConfig::default(),
            block_render_size: BLOCK_RENDER_SIZE,
            max_reach: MAX_REACH,
            ray_step: RAY_STEP,
            edit_cooldown_ticks: EDIT_COOLDOWN_TICKS,
        }
    }
}

impl WorldConfig {
    /// Parses and validates a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Rejects values that would make generation, streaming or raycasting
    /// meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 || self.chunk_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "chunk dimensions must be non-zero, got {}x{}x{}",
                self.chunk_size, self.chunk_height, self.chunk_size
            )));
        }
        let volume = self
            .chunk_size
            .checked_mul(self.chunk_height)
            .and_then(|area| area.checked_mul(self.chunk_size));
        if volume.map_or(true, |volume| volume > u32::MAX as usize / 24) {
            return Err(ConfigError::Invalid(
                "chunk volume too large for 32-bit mesh indices".to_string(),
            ));
        }
        if self.render_distance < 0 {
            return Err(ConfigError::Invalid(format!(
                "render_distance must not be negative, got {}",
                self.render_distance
            )));
        }
        if self.chunks_per_frame == 0 {
            return Err(ConfigError::Invalid(
                "chunks_per_frame must be at least 1".to_string(),
            ));
        }
        if self.noise.octaves == 0 {
            return Err(ConfigError::Invalid(
                "noise.octaves must be at least 1".to_string(),
            ));
        }
        if !(self.block_render_size > 0.0) {
            return Err(ConfigError::Invalid(
                "block_render_size must be positive".to_string(),
            ));
        }
        if !(self.ray_step > 0.0 && self.ray_step.is_finite())
            || !(self.max_reach >= 0.0 && self.max_reach.is_finite())
        {
            return Err(ConfigError::Invalid(
                "ray_step must be positive and max_reach non-negative, both finite".to_string(),
            ));
        }
        if let DecorationConfig::Scattered { chance } = self.decoration {
            if !(0.0..=1.0).contains(&chance) {
                return Err(ConfigError::Invalid(format!(
                    "scattered tree chance must lie in [0, 1], got {}",
                    chance
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_build_constants() {
        let config = WorldConfig::default();
        assert_eq!(config.chunk_size, 16);
        assert_eq!(config.chunk_height, 128);
        assert_eq!(config.water_level, 27);
        assert_eq!(config.noise.octaves, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config = WorldConfig::from_json_str(
            r#"{ "chunk_size": 32, "noise": { "seed": 7 }, "decoration": { "kind": "scattered", "chance": 0.02 } }"#,
        )
        .unwrap();

        assert_eq!(config.chunk_size, 32);
        assert_eq!(config.chunk_height, CHUNK_HEIGHT);
        assert_eq!(config.noise.seed, 7);
        assert_eq!(config.noise.octaves, NOISE_OCTAVES);
        assert_eq!(config.decoration, DecorationConfig::Scattered { chance: 0.02 });
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let error = WorldConfig::from_json_str("{ chunk_size: }").unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_sized_chunks_are_rejected() {
        let error = WorldConfig::from_json_str(r#"{ "chunk_height": 0 }"#).unwrap_err();
        assert!(matches!(error, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_mesh_budget_is_rejected() {
        let config = WorldConfig {
            chunks_per_frame: 0,
            ..WorldConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn overflowing_chunk_volume_is_rejected() {
        let config = WorldConfig {
            chunk_size: usize::MAX / 2,
            chunk_height: 4,
            ..WorldConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let error = WorldConfig::from_json_str(r#"{ "chunk_size": 18446744073709551615 }"#);
        assert!(error.is_err());
    }

    #[test]
    fn zero_or_unbounded_ray_settings_are_rejected() {
        for (ray_step, max_reach) in [(0.0, 5.0), (f32::INFINITY, 5.0), (0.01, f32::INFINITY)] {
            let config = WorldConfig {
                ray_step,
                max_reach,
                ..WorldConfig::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        }
    }

    #[test]
    fn missing_file_reports_path() {
        let error = WorldConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(error.to_string().contains("/definitely/not/here.json"));
    }
}
