//! Continent-scale world-graph generator
//!
//! Grows a playable world as a planar graph: a relaxed Voronoi
//! tessellation of tiles with shared borders and corners, classified
//! into elevation bands, threaded with drainage-basin rivers, painted
//! with regolith and terrain features, seeded with settlements, and
//! partitioned into holdings around them.
//!
//! This implementation uses:
//! - Arena-based data structures (no Rc<RefCell<T>>)
//! - Voronoi/Delaunay dual graph system
//! - A single deterministic pass: one seed, one world, bit for bit

pub mod geometry;
pub mod world;
pub mod pointgen;
pub mod voronoi;
pub mod graph;
pub mod fields;
pub mod relief;
pub mod hydrology;
pub mod biome;
pub mod sites;
pub mod holdings;
pub mod config;

use biome::assign_properties;
use fields::WorldFields;
use graph::build_world;
use holdings::assign_holdings;
use hydrology::generate_rivers;
use pointgen::PointSamplerConfig;
use relief::generate_relief;
use sites::spawn_sites;
use world::{Feature, Regolith, Relief, World, NONE};

// Re-export the unified config
pub use config::GenerationConfig;

/// Generate a complete world from the unified configuration, with all
/// scalar fields derived from the run seed.
pub fn generate_world(config: &GenerationConfig) -> World {
    let fields = WorldFields::from_seed(config.seed);
    generate_world_with_fields(config, &fields)
}

/// Generate a complete world against caller-supplied scalar fields.
/// The run is a single synchronous pass; given the same configuration
/// and fields the output is identical.
pub fn generate_world_with_fields(config: &GenerationConfig, fields: &WorldFields) -> World {
    // Step 1: Generate and relax points
    let point_config = PointSamplerConfig {
        bounds: config.bounds,
        radius: config.poisson_radius,
        seed: config.seed,
        lloyd_iterations: config.lloyd_iterations,
        lloyd_omega: 1.0,
    };
    let points = pointgen::generate_relaxed_points(&point_config);

    // Step 2: Build the dual graph
    let diagram = voronoi::build_voronoi(&points, &config.bounds);
    let mut world = build_world(&diagram, &config.bounds);

    // Step 3: Elevation bands and their corrections
    generate_relief(&mut world, fields.height.as_ref(), config);

    // Step 4: Rivers
    generate_rivers(&mut world, config);

    // Step 5: Regolith and terrain features
    assign_properties(&mut world, fields, config);

    // Step 6: Settlements and resources
    spawn_sites(&mut world, config);

    // Step 7: Territory partition
    assign_holdings(&mut world);

    debug_assert!(world.validate().is_ok());
    world
}

/// Statistics report for a generated world.
#[derive(Debug, Clone)]
pub struct WorldStats {
    pub total_tiles: usize,
    pub land_tiles: usize,
    pub coast_tiles: usize,
    pub land_percentage: f64,
    pub relief_counts: std::collections::HashMap<Relief, usize>,
    pub total_corners: usize,
    pub total_borders: usize,
    pub river_borders: usize,
    pub river_mouths: usize,
    pub regolith_counts: std::collections::HashMap<Regolith, usize>,
    pub settlements: usize,
    pub resources: usize,
    pub holdings: usize,
    pub claimed_tiles: usize,
}

/// Generate a statistics report for a world.
pub fn world_stats(world: &World) -> WorldStats {
    use std::collections::HashMap;

    let total_tiles = world.tiles.len();
    let land_tiles = world.tiles.iter().filter(|t| t.land).count();
    let coast_tiles = world.tiles.iter().filter(|t| t.coast).count();
    let land_percentage = if total_tiles > 0 {
        (land_tiles as f64 / total_tiles as f64) * 100.0
    } else {
        0.0
    };

    let river_borders = world.borders.iter().filter(|b| b.river).count();
    // Every basin drains through exactly one coastal river corner
    let river_mouths = world
        .corners
        .iter()
        .filter(|c| c.river && c.coast)
        .count();

    let mut relief_counts: HashMap<Relief, usize> = HashMap::new();
    let mut regolith_counts: HashMap<Regolith, usize> = HashMap::new();
    for tile in &world.tiles {
        *relief_counts.entry(tile.relief).or_insert(0) += 1;
        *regolith_counts.entry(tile.regolith).or_insert(0) += 1;
    }

    WorldStats {
        total_tiles,
        land_tiles,
        coast_tiles,
        land_percentage,
        relief_counts,
        total_corners: world.corners.len(),
        total_borders: world.borders.len(),
        river_borders,
        river_mouths,
        regolith_counts,
        settlements: world
            .tiles
            .iter()
            .filter(|t| t.feature == Feature::Settlement)
            .count(),
        resources: world
            .tiles
            .iter()
            .filter(|t| t.feature == Feature::Resource)
            .count(),
        holdings: world.holdings.len(),
        claimed_tiles: world.tiles.iter().filter(|t| t.holding != NONE).count(),
    }
}

/// Print a human-readable report to stdout.
pub fn print_world_report(stats: &WorldStats) {
    println!("\n=== World Generation Report ===");
    println!("Tiles: {} total", stats.total_tiles);
    println!(
        "  - Land: {} ({:.1}%)",
        stats.land_tiles, stats.land_percentage
    );
    println!("  - Coast: {}", stats.coast_tiles);
    let mut reliefs: Vec<_> = stats.relief_counts.iter().collect();
    reliefs.sort_by(|a, b| b.1.cmp(a.1));
    for (relief, count) in reliefs {
        println!("  - {:?}: {}", relief, count);
    }
    println!("Corners: {}", stats.total_corners);
    println!(
        "Borders: {} (rivers: {}, mouths: {})",
        stats.total_borders, stats.river_borders, stats.river_mouths
    );

    println!("\nRegolith Distribution:");
    let mut regoliths: Vec<_> = stats.regolith_counts.iter().collect();
    regoliths.sort_by(|a, b| b.1.cmp(a.1));
    for (regolith, count) in regoliths {
        let pct = (*count as f64 / stats.total_tiles as f64) * 100.0;
        println!("  - {:?}: {} ({:.1}%)", regolith, count, pct);
    }

    println!("\nSites:");
    println!("  - Settlements: {}", stats.settlements);
    println!("  - Resources: {}", stats.resources);
    println!(
        "Holdings: {} covering {} tiles",
        stats.holdings, stats.claimed_tiles
    );
    println!("===============================\n");
}
