//! Unified configuration for world generation.
//!
//! All tunable parameters across all pipeline stages are centralized here.

use crate::geometry::BoundingBox;

/// Complete configuration for one generation run.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    // ===== Basic Settings =====
    /// Generation area.
    pub bounds: BoundingBox,
    /// Random seed for the whole run.
    pub seed: u64,
    /// Poisson-disk radius controlling tile density.
    pub poisson_radius: f64,
    /// Lloyd relaxation iterations.
    pub lloyd_iterations: u32,

    // ===== Relief Settings =====
    /// Height below this is seabed.
    pub lowland_threshold: f64,
    /// Height below this is lowland.
    pub upland_threshold: f64,
    /// Height below this is upland; at or above is highland.
    pub highland_threshold: f64,
    /// Highland components smaller than this merge into upland.
    pub min_mountain_size: usize,
    /// Seabed components smaller than this merge into lowland.
    pub min_water_size: usize,
    /// Apply the small-lake merge (the mountain merge always runs).
    pub merge_small_lakes: bool,

    // ===== Hydrology Settings =====
    /// Branches below this Strahler order are pruned.
    pub min_stream_order: u32,
    /// Leaf branches shorter than this are pruned at the first fork.
    pub min_branch_length: u32,
    /// Basins with less accumulated depth than this are deleted.
    pub min_basin_size: u32,
    /// Two river corners closer than this lose the shallower one.
    pub min_river_gap: f64,
    /// Demote highland tiles along high-order rivers.
    pub erosion: bool,

    // ===== Biome Settings =====
    /// Temperature at or below this is always snow.
    pub snow_temperature: f64,
    /// Temperature at or above this (when dry) is always sand.
    pub desert_temperature: f64,
    /// Precipitation below this gives dirt/sand instead of grass.
    pub dry_precipitation: f64,
    /// Grass tiles wetter than this may grow woods.
    pub woods_precipitation: f64,
    /// Woods-mask value a tile must exceed to grow woods.
    pub woods_density: f64,

    // ===== Site Settings =====
    /// Exclusion radius (in BFS hops) stamped around a town.
    pub town_radius: u32,
    /// Radius of unclaimed room a castle needs.
    pub castle_radius: u32,
    /// Resource chance on lowland tiles.
    pub resource_chance_lowland: f64,
    /// Resource chance on other walkable tiles.
    pub resource_chance_upland: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            // Basic
            bounds: BoundingBox::new(0.0, 0.0, 2000.0, 2000.0),
            seed: 12345,
            poisson_radius: 30.0,
            lloyd_iterations: 2,

            // Relief - thresholds tuned for roughly 40% land
            lowland_threshold: 0.42,
            upland_threshold: 0.62,
            highland_threshold: 0.78,
            min_mountain_size: 24,
            min_water_size: 12,
            merge_small_lakes: false,

            // Hydrology
            min_stream_order: 4,
            min_branch_length: 3,
            min_basin_size: 6,
            min_river_gap: 8.0,
            erosion: true,

            // Biome
            snow_temperature: 0.12,
            desert_temperature: 0.85,
            dry_precipitation: 0.25,
            woods_precipitation: 0.45,
            woods_density: 0.55,

            // Sites
            town_radius: 3,
            castle_radius: 4,
            resource_chance_lowland: 0.30,
            resource_chance_upland: 0.15,
        }
    }
}

impl GenerationConfig {
    /// Create config with custom seed.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed, ..Default::default() }
    }

    /// Create a smaller config for faster testing.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            bounds: BoundingBox::new(0.0, 0.0, 1000.0, 1000.0),
            poisson_radius: 40.0,
            seed,
            min_mountain_size: 6,
            min_basin_size: 3,
            ..Default::default()
        }
    }
}

/// Presets for common world characters.
pub mod presets {
    use super::GenerationConfig;

    /// Rugged world: more highland, deeper river carving.
    pub fn rugged(seed: u64) -> GenerationConfig {
        GenerationConfig {
            seed,
            upland_threshold: 0.55,
            highland_threshold: 0.68,
            min_stream_order: 3,
            ..Default::default()
        }
    }

    /// Verdant world: wetter, denser woods, more rivers survive.
    pub fn verdant(seed: u64) -> GenerationConfig {
        GenerationConfig {
            seed,
            woods_precipitation: 0.35,
            woods_density: 0.45,
            min_stream_order: 3,
            min_basin_size: 4,
            ..Default::default()
        }
    }
}
