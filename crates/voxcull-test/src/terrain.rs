//! Procedural heightmap worlds for benchmarks and larger scenario tests.

use glam::IVec3;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::world::GridWorld;

/// Terrain generator configuration.
#[derive(Debug, Clone)]
pub struct TerrainConfig {
    /// Seed for noise generation.
    pub seed: u32,
    /// Lowest surface height (Y coordinate).
    pub base_height: i32,
    /// Horizontal scale of terrain features.
    pub terrain_scale: f64,
    /// Maximum terrain height variation.
    pub terrain_height: f64,
    /// Number of noise octaves for detail.
    pub octaves: usize,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// Generated area is `[-half_extent, half_extent)` on X and Z.
    pub half_extent: i32,
    /// Thickness of ground kept below the surface.
    pub depth: i32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            base_height: -4,
            terrain_scale: 24.0,
            terrain_height: 12.0,
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
            half_extent: 48,
            depth: 6,
        }
    }
}

/// Heightmap terrain built from fractal noise.
pub struct TerrainGenerator {
    config: TerrainConfig,
    height_noise: Fbm<Perlin>,
}

impl TerrainGenerator {
    /// Create a new terrain generator with the given configuration.
    #[must_use]
    pub fn new(config: TerrainConfig) -> Self {
        let height_noise = Fbm::<Perlin>::new(config.seed)
            .set_octaves(config.octaves)
            .set_lacunarity(config.lacunarity)
            .set_persistence(config.persistence);

        Self {
            config,
            height_noise,
        }
    }

    /// Create a terrain generator with default configuration.
    #[must_use]
    pub fn with_seed(seed: u32) -> Self {
        Self::new(TerrainConfig {
            seed,
            ..Default::default()
        })
    }

    #[must_use]
    pub const fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Surface height at world XZ.
    #[must_use]
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        let nx = f64::from(x) / self.config.terrain_scale;
        let nz = f64::from(z) / self.config.terrain_scale;

        // Noise returns [-1, 1], map to [0, terrain_height]
        let noise_value = self.height_noise.get([nx, nz]);
        ((noise_value + 1.0) * 0.5 * self.config.terrain_height) as i32 + self.config.base_height
    }

    /// Build a world with every cell at or below the surface opaque.
    #[must_use]
    pub fn generate(&self) -> GridWorld {
        let mut world = GridWorld::new();
        let extent = self.config.half_extent;
        for x in -extent..extent {
            for z in -extent..extent {
                let surface = self.height_at(x, z);
                for y in (surface - self.config.depth + 1)..=surface {
                    world.set_solid(IVec3::new(x, y, z));
                }
            }
        }
        tracing::debug!(
            seed = self.config.seed,
            solid = world.solid_count(),
            "generated terrain"
        );
        world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_deterministic() {
        let gen1 = TerrainGenerator::with_seed(12345);
        let gen2 = TerrainGenerator::with_seed(12345);

        for x in -40..40 {
            for z in -40..40 {
                assert_eq!(gen1.height_at(x, z), gen2.height_at(x, z));
            }
        }
    }

    #[test]
    fn heights_stay_in_range() {
        let gen = TerrainGenerator::with_seed(7);
        let config = gen.config().clone();
        let top = config.base_height + config.terrain_height as i32;
        for x in -20..20 {
            for z in -20..20 {
                let h = gen.height_at(x, z);
                assert!((config.base_height..=top).contains(&h), "{h} at ({x}, {z})");
            }
        }
    }

    #[test]
    fn surface_cells_are_solid() {
        let config = TerrainConfig {
            half_extent: 4,
            ..Default::default()
        };
        let gen = TerrainGenerator::new(config);
        let world = gen.generate();
        let h = gen.height_at(0, 0);
        assert!(world.is_solid(IVec3::new(0, h, 0)));
        assert!(!world.is_solid(IVec3::new(0, h + 1, 0)));
        assert_eq!(world.solid_count(), 8 * 8 * 6);
    }
}
