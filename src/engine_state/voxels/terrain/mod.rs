//! # Terrain Module
//!
//! Fills chunks with blocks from the height field and runs a decoration pass
//! over the result.
//!
//! ## Column Rule
//!
//! For a column of height `h`, every cell below `h` is solid:
//!
//! * `y == h - 1` is the surface: snow above the snow level, water below the
//!   water level, sand below the sand level, grass otherwise
//! * `y == 0` is bedrock when the floor is enabled and the column is taller
//!   than one block
//! * everything else is stone
//!
//! Cells at or above `h` stay air.

use cgmath::Point3;
use log::{trace, warn};
use web_time::Instant;

use crate::config::{DecorationConfig, WorldConfig};

use super::{block::block_type::BlockType, chunk::Chunk};

pub mod decoration;
pub mod height_field;

use decoration::{
    Decoration, NoDecoration, ScatteredTrees, SingleColumnTree, SurfaceColumn, SurfaceMap,
};
use height_field::HeightField;

/// Populates freshly created chunks.
pub struct TerrainGenerator {
    height_field: HeightField,
    water_level: i32,
    snow_level: i32,
    sand_level: i32,
    bedrock_floor: bool,
    decoration: Box<dyn Decoration>,
}

impl TerrainGenerator {
    /// Creates a generator whose decoration pass is chosen by the config.
    pub fn new(config: &WorldConfig) -> Self {
        let decoration: Box<dyn Decoration> = match config.decoration {
            DecorationConfig::None => Box::new(NoDecoration),
            DecorationConfig::SingleColumn { x, z } => Box::new(SingleColumnTree { x, z }),
            DecorationConfig::Scattered { chance } => Box::new(ScatteredTrees {
                chance,
                seed: config.noise.seed,
            }),
        };
        Self::with_decoration(config, decoration)
    }

    /// Creates a generator with an explicit decoration pass.
    pub fn with_decoration(config: &WorldConfig, decoration: Box<dyn Decoration>) -> Self {
        TerrainGenerator {
            height_field: HeightField::new(&config.noise),
            water_level: config.water_level,
            snow_level: config.snow_level,
            sand_level: config.sand_level,
            bedrock_floor: config.bedrock_floor,
            decoration,
        }
    }

    /// The noise height field backing this generator.
    pub fn height_field(&self) -> &HeightField {
        &self.height_field
    }

    /// Column height at a world column, floored and clamped to `[0, max_height]`.
    pub fn column_height(&self, world_x: i32, world_z: i32, max_height: usize) -> i32 {
        let height = self
            .height_field
            .height(world_x as f64, world_z as f64)
            .floor();
        height.clamp(0.0, max_height as f64) as i32
    }

    /// Block placed at the top of a column whose surface cell is at `y`.
    pub fn surface_block(&self, y: i32) -> BlockType {
        if y > self.snow_level {
            BlockType::SNOW
        } else if y < self.water_level {
            BlockType::WATER
        } else if y < self.sand_level {
            BlockType::SAND
        } else {
            BlockType::GRASS
        }
    }

    /// Block at height `y` of a column of height `height`.
    fn column_block(&self, y: i32, height: i32) -> BlockType {
        if y == height - 1 {
            self.surface_block(y)
        } else if y == 0 && self.bedrock_floor {
            BlockType::BEDROCK
        } else {
            BlockType::STONE
        }
    }

    /// Fills every column of an ungenerated chunk and decorates it.
    ///
    /// A chunk that is already generated is left untouched.
    pub fn fill(&self, chunk: &mut Chunk) {
        if chunk.is_generated() {
            warn!(
                "Ignoring terrain fill for already generated chunk {:?}",
                chunk.position
            );
            return;
        }

        let start = Instant::now();
        let dimensions = chunk.dimensions();
        let origin: Point3<i32> = Point3::new(
            chunk.position.x * dimensions.size_x as i32,
            0,
            chunk.position.z * dimensions.size_z as i32,
        );
        let mut surface = SurfaceMap::new(dimensions.size_x, dimensions.size_z);

        for z in 0..dimensions.size_z as i32 {
            for x in 0..dimensions.size_x as i32 {
                let height = self.column_height(origin.x + x, origin.z + z, dimensions.height);
                for y in 0..height {
                    chunk.set_block(x, y, z, self.column_block(y, height));
                }
                surface.set(
                    x as usize,
                    z as usize,
                    SurfaceColumn {
                        height,
                        block: chunk.get_block(x, height - 1, z),
                    },
                );
            }
        }

        self.decoration.decorate(chunk, &surface);
        chunk.mark_generated();

        trace!(
            "Generated chunk {:?} in {:?}",
            chunk.position,
            start.elapsed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::ChunkDimensions;

    fn bare_config() -> WorldConfig {
        WorldConfig {
            decoration: DecorationConfig::None,
            ..WorldConfig::default()
        }
    }

    #[test]
    fn surface_bands_follow_the_levels() {
        let generator = TerrainGenerator::new(&WorldConfig::default());
        assert_eq!(generator.surface_block(81), BlockType::SNOW);
        assert_eq!(generator.surface_block(80), BlockType::GRASS);
        assert_eq!(generator.surface_block(26), BlockType::WATER);
        assert_eq!(generator.surface_block(27), BlockType::SAND);
        assert_eq!(generator.surface_block(29), BlockType::SAND);
        assert_eq!(generator.surface_block(30), BlockType::GRASS);
    }

    #[test]
    fn surface_wins_over_bedrock_in_a_one_block_column() {
        let generator = TerrainGenerator::new(&WorldConfig::default());
        assert_eq!(generator.column_block(0, 1), BlockType::WATER);
        assert_eq!(generator.column_block(0, 5), BlockType::BEDROCK);
        assert_eq!(generator.column_block(2, 5), BlockType::STONE);
    }

    #[test]
    fn columns_are_solid_up_to_the_surface_and_air_above() {
        let config = bare_config();
        let generator = TerrainGenerator::new(&config);
        let dimensions = ChunkDimensions::from_config(&config);

        for position in [Point3::new(0, 0, 0), Point3::new(-3, 0, 7)] {
            let mut chunk = Chunk::empty(position, dimensions);
            generator.fill(&mut chunk);
            assert!(chunk.is_generated());

            for z in 0..dimensions.size_z as i32 {
                for x in 0..dimensions.size_x as i32 {
                    let height = generator.column_height(
                        position.x * dimensions.size_x as i32 + x,
                        position.z * dimensions.size_z as i32 + z,
                        dimensions.height,
                    );
                    for y in 0..dimensions.height as i32 {
                        assert_eq!(
                            chunk.is_block_solid(x, y, z),
                            y < height,
                            "column ({}, {}) at y = {} with height {}",
                            x,
                            z,
                            y,
                            height
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn second_fill_is_ignored() {
        let config = bare_config();
        let generator = TerrainGenerator::new(&config);
        let mut chunk = Chunk::empty(Point3::new(1, 0, 1), ChunkDimensions::from_config(&config));
        generator.fill(&mut chunk);
        chunk.set_block(0, 0, 0, BlockType::LEAVES);
        generator.fill(&mut chunk);
        assert_eq!(chunk.get_block(0, 0, 0), Some(BlockType::LEAVES));
    }

    #[test]
    fn heights_taller_than_the_chunk_are_clamped() {
        let config = WorldConfig {
            chunk_height: 8,
            decoration: DecorationConfig::None,
            noise: crate::config::NoiseConfig {
                amplitude: 0.0,
                ..Default::default()
            },
            ..WorldConfig::default()
        };
        let generator = TerrainGenerator::new(&config);
        let mut chunk = Chunk::empty(Point3::new(0, 0, 0), ChunkDimensions::from_config(&config));
        generator.fill(&mut chunk);
        assert!(chunk.blocks().iter().all(|b| b.is_solid()));
        assert_eq!(chunk.get_block(0, 0, 0), Some(BlockType::BEDROCK));
    }

    #[test]
    fn single_column_tree_grows_on_grass() {
        let config = WorldConfig {
            noise: crate::config::NoiseConfig {
                amplitude: 0.0,
                base_height: 40.0,
                ..Default::default()
            },
            ..WorldConfig::default()
        };
        let generator = TerrainGenerator::new(&config);
        let mut chunk = Chunk::empty(Point3::new(0, 0, 0), ChunkDimensions::from_config(&config));
        generator.fill(&mut chunk);

        assert_eq!(chunk.get_block(10, 39, 10), Some(BlockType::GRASS));
        assert_eq!(chunk.get_block(10, 40, 10), Some(BlockType::WOOD));
        assert_eq!(chunk.get_block(10, 44, 10), Some(BlockType::WOOD));
        assert_eq!(chunk.get_block(11, 44, 10), Some(BlockType::LEAVES));
        assert_eq!(chunk.get_block(10, 45, 10), Some(BlockType::LEAVES));
        assert_eq!(chunk.get_block(3, 40, 3), Some(BlockType::AIR));
    }

    #[test]
    fn no_tree_on_water() {
        let config = WorldConfig {
            noise: crate::config::NoiseConfig {
                amplitude: 0.0,
                base_height: 20.0,
                ..Default::default()
            },
            ..WorldConfig::default()
        };
        let generator = TerrainGenerator::new(&config);
        let mut chunk = Chunk::empty(Point3::new(0, 0, 0), ChunkDimensions::from_config(&config));
        generator.fill(&mut chunk);

        assert_eq!(chunk.get_block(10, 19, 10), Some(BlockType::WATER));
        assert_eq!(chunk.get_block(10, 20, 10), Some(BlockType::AIR));
    }
}
