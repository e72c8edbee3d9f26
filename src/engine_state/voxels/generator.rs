//! # Terrain Generator
//!
//! Produces the content of a chunk from its coordinate and the world seed.
//!
//! Generation is a pure function: the same coordinate and seed always give the
//! same chunk, byte for byte. That is what makes eviction cheap (a chunk that
//! streams out can simply be regenerated later) and lets the generator run on
//! worker threads without any shared mutable state.
//!
//! Several generation methods are supported:
//! - `perlin`: a fractal heightmap with soil layers, caves and ore veins
//! - `flat`: a level floor, mostly useful for tests and physics tuning
//! - `empty`: every chunk is air

use cgmath::Point3;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use super::block::block_type::BlockType;
use super::chunk::{Chunk, ChunkCreationIterator, CHUNK_DIMENSION};
use super::coords::chunk_origin;

/// Noise parameters for one kind of ore.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OreParams {
    /// Scaling factor applied to lattice coordinates before sampling noise.
    pub scale: f64,
    /// Noise value above which stone becomes this ore.
    pub threshold: f64,
}

/// Shape of the `perlin` terrain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Horizontal size of terrain features, in blocks.
    pub scale: f64,
    /// Surface height where the heightmap noise is zero.
    pub base_height: i32,
    /// Maximum deviation of the surface from `base_height`.
    pub amplitude: f64,
    /// Number of octaves in the heightmap.
    pub octaves: usize,
    /// Thickness of the dirt layer under the surface block.
    pub dirt_depth: i32,
    /// Surfaces at or below this height are sand instead of grass.
    pub sand_level: i32,
    /// Scaling factor for the 3D cave noise.
    pub cave_scale: f64,
    /// Cave noise with a magnitude above this value carves air out of stone.
    pub cave_threshold: f64,
    /// Coal ore distribution.
    pub coal: OreParams,
    /// Iron ore distribution.
    pub iron: OreParams,
    /// Every cell at or below this height is bedrock.
    pub bedrock_level: i32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        TerrainParams {
            scale: 48.0,
            base_height: 16,
            amplitude: 10.0,
            octaves: 4,
            dirt_depth: 3,
            sand_level: 10,
            cave_scale: 0.06,
            cave_threshold: 0.5,
            coal: OreParams {
                scale: 0.15,
                threshold: 0.55,
            },
            iron: OreParams {
                scale: 0.18,
                threshold: 0.62,
            },
            bedrock_level: -48,
        }
    }
}

/// The method used to generate new chunks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum GenerationMethod {
    /// Fractal heightmap terrain with caves and ores.
    Perlin(TerrainParams),
    /// Level ground: every cell below `height` is solid, the top layer is grass.
    Flat {
        /// One above the lattice y of the top solid layer.
        height: i32,
    },
    /// Nothing but air.
    Empty,
}

impl Default for GenerationMethod {
    fn default() -> Self {
        GenerationMethod::Perlin(TerrainParams::default())
    }
}

/// Deterministic chunk generator.
///
/// Holds only immutable configuration, so it is `Send + Sync` and can be shared
/// with worker threads behind an `Arc`.
#[derive(Clone, Debug, Default)]
pub struct TerrainGenerator {
    method: GenerationMethod,
}

impl TerrainGenerator {
    /// Creates a generator using the given method.
    pub fn new(method: GenerationMethod) -> Self {
        TerrainGenerator { method }
    }

    /// The configured generation method.
    pub fn method(&self) -> &GenerationMethod {
        &self.method
    }

    /// Generates the chunk at `position` for the world `seed`.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the chunk to generate
    /// * `seed` - The world seed
    ///
    /// # Returns
    /// A fully populated `Chunk`. Calling this twice with the same arguments
    /// returns identical chunks.
    pub fn generate(&self, position: Point3<i32>, seed: u32) -> Chunk {
        match &self.method {
            GenerationMethod::Perlin(params) => Self::perlin(position, seed, params),
            GenerationMethod::Flat { height } => Self::flat(position, *height),
            GenerationMethod::Empty => Chunk::empty(position),
        }
    }

    fn flat(position: Point3<i32>, height: i32) -> Chunk {
        let origin = chunk_origin(position);
        let mut cci = ChunkCreationIterator::new(position);

        for _k in 0..CHUNK_DIMENSION {
            for j in 0..CHUNK_DIMENSION {
                let y = origin.y + j;
                let block_type = if y >= height {
                    BlockType::AIR
                } else if y == height - 1 {
                    BlockType::GRASS
                } else {
                    BlockType::STONE
                };
                for _i in 0..CHUNK_DIMENSION {
                    cci.push_block_type(block_type);
                }
            }
        }

        cci.return_chunk()
    }

    fn perlin(position: Point3<i32>, seed: u32, params: &TerrainParams) -> Chunk {
        let heightmap = Fbm::<Perlin>::new(seed).set_octaves(params.octaves.max(1));
        let caves = Perlin::new(seed.wrapping_add(1));
        let coal = Perlin::new(seed.wrapping_add(2));
        let iron = Perlin::new(seed.wrapping_add(3));

        let origin = chunk_origin(position);
        let dimension = CHUNK_DIMENSION as usize;

        // Surface height of every column in the chunk, indexed x + z * dimension.
        let mut surface = vec![0i32; dimension * dimension];
        for k in 0..CHUNK_DIMENSION {
            for i in 0..CHUNK_DIMENSION {
                let x = (origin.x + i) as f64 / params.scale;
                let z = (origin.z + k) as f64 / params.scale;
                let sample = heightmap.get([x, z]);
                surface[i as usize + k as usize * dimension] =
                    params.base_height + (sample * params.amplitude).round() as i32;
            }
        }

        let mut cci = ChunkCreationIterator::new(position);

        for k in 0..CHUNK_DIMENSION {
            for j in 0..CHUNK_DIMENSION {
                for i in 0..CHUNK_DIMENSION {
                    let lattice = Point3::new(origin.x + i, origin.y + j, origin.z + k);
                    let height = surface[i as usize + k as usize * dimension];
                    let block_type =
                        Self::perlin_block(lattice, height, params, &caves, &coal, &iron);
                    cci.push_block_type(block_type);
                }
            }
        }

        cci.return_chunk()
    }

    fn perlin_block(
        lattice: Point3<i32>,
        surface: i32,
        params: &TerrainParams,
        caves: &Perlin,
        coal: &Perlin,
        iron: &Perlin,
    ) -> BlockType {
        let y = lattice.y;
        if y > surface {
            return BlockType::AIR;
        }
        if y <= params.bedrock_level {
            return BlockType::BEDROCK;
        }

        let beach = surface <= params.sand_level;
        if y == surface {
            return if beach { BlockType::SAND } else { BlockType::GRASS };
        }
        if y >= surface - params.dirt_depth {
            return if beach { BlockType::SAND } else { BlockType::DIRT };
        }

        if caves.get(Self::to_noise_pos(lattice, params.cave_scale)).abs() > params.cave_threshold {
            return BlockType::AIR;
        }
        if coal.get(Self::to_noise_pos(lattice, params.coal.scale)) > params.coal.threshold {
            return BlockType::COAL_ORE;
        }
        if iron.get(Self::to_noise_pos(lattice, params.iron.scale)) > params.iron.threshold {
            return BlockType::IRON_ORE;
        }
        BlockType::STONE
    }

    /// Converts lattice coordinates to scaled noise-space coordinates.
    fn to_noise_pos(pos: Point3<i32>, scale_factor: f64) -> [f64; 3] {
        [
            pos.x as f64 * scale_factor,
            pos.y as f64 * scale_factor,
            pos.z as f64 * scale_factor,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::Block;

    #[test]
    fn test_perlin_is_deterministic() {
        let generator = TerrainGenerator::default();
        for position in [Point3::new(0, 0, 0), Point3::new(-3, 1, 7), Point3::new(2, -2, -5)] {
            let first = generator.generate(position, 1234);
            let second = generator.generate(position, 1234);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_seed_changes_terrain() {
        let generator = TerrainGenerator::default();
        let position = Point3::new(0, 0, 0);
        assert_ne!(
            generator.generate(position, 1),
            generator.generate(position, 2)
        );
    }

    #[test]
    fn test_perlin_sky_and_bedrock() {
        let generator = TerrainGenerator::default();
        let params = TerrainParams::default();

        // Far above the highest possible surface.
        let sky_chunk_y = (params.base_height + params.amplitude as i32 + 1) / CHUNK_DIMENSION + 1;
        assert!(generator.generate(Point3::new(0, sky_chunk_y, 0), 7).is_empty());

        // Entirely below bedrock level.
        let deep_chunk_y = params.bedrock_level / CHUNK_DIMENSION - 1;
        let deep = generator.generate(Point3::new(0, deep_chunk_y, 0), 7);
        assert!((0..crate::engine_state::voxels::chunk::CHUNK_SIZE as usize)
            .all(|index| deep.get_block_at(Chunk::local_of(index)) == Block::new(BlockType::BEDROCK)));
        assert_eq!(deep.solid_count(), crate::engine_state::voxels::chunk::CHUNK_SIZE as usize);
    }

    #[test]
    fn test_perlin_surface_column_layers() {
        let generator = TerrainGenerator::default();
        let params = TerrainParams::default();
        let chunk = generator.generate(Point3::new(0, 0, 0), 99);

        // Find the surface in column (0, 0) and check what sits on top of it.
        let top = (0..CHUNK_DIMENSION as usize)
            .rev()
            .find(|&y| chunk.is_block_solid(0, y, 0));
        if let Some(y) = top {
            let surface = chunk.get_block_at(Point3::new(0, y, 0)).block_type();
            assert!(surface == BlockType::GRASS || surface == BlockType::SAND);
            if y + 1 < CHUNK_DIMENSION as usize {
                assert!(!chunk.is_block_solid(0, y + 1, 0));
            }
            assert!(params.dirt_depth > 0);
        }
    }

    #[test]
    fn test_flat_floor() {
        let generator = TerrainGenerator::new(GenerationMethod::Flat { height: 1 });
        let ground = generator.generate(Point3::new(0, 0, 0), 0);
        assert!(ground.is_block_solid(4, 0, 9));
        assert_eq!(
            ground.get_block_at(Point3::new(4, 0, 9)).block_type(),
            BlockType::GRASS
        );
        assert!(!ground.is_block_solid(4, 1, 9));

        let below = generator.generate(Point3::new(0, -1, 0), 0);
        assert_eq!(below.solid_count(), crate::engine_state::voxels::chunk::CHUNK_SIZE as usize);
        assert!(generator.generate(Point3::new(0, 1, 0), 0).is_empty());
    }

    #[test]
    fn test_empty_method() {
        let generator = TerrainGenerator::new(GenerationMethod::Empty);
        assert!(generator.generate(Point3::new(5, 5, 5), 42).is_empty());
    }

    #[test]
    fn test_generation_method_config_format() {
        let method: GenerationMethod =
            serde_json::from_str(r#"{ "method": "flat", "height": 4 }"#).unwrap();
        assert_eq!(method, GenerationMethod::Flat { height: 4 });

        let method: GenerationMethod =
            serde_json::from_str(r#"{ "method": "perlin", "amplitude": 3.0 }"#).unwrap();
        match method {
            GenerationMethod::Perlin(params) => {
                assert_eq!(params.amplitude, 3.0);
                assert_eq!(params.octaves, TerrainParams::default().octaves);
            }
            other => panic!("unexpected method {:?}", other),
        }
    }
}
