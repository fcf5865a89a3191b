//! Relief classification and correction.
//!
//! Tiles are banded by sampled height, then two flood-fill passes clean
//! up the result: undersized relief components merge into their
//! surrounding band, and walkable interiors fully ringed by highland are
//! reclassified to highland wholesale. Coast and wall flags on borders
//! and corners are derived afterwards.

use std::collections::VecDeque;

use log::debug;

use crate::config::GenerationConfig;
use crate::fields::ScalarField;
use crate::world::{Relief, World};

/// Sample the heightmap at every tile center and assign elevation bands,
/// land flags and local amplitude.
pub fn classify_relief(world: &mut World, height: &dyn ScalarField, config: &GenerationConfig) {
    let bounds = world.bounds;
    for tile in &mut world.tiles {
        let (u, v) = bounds.normalize(&tile.center);
        let h = height.sample(u, v);

        tile.relief = if h < config.lowland_threshold {
            Relief::Seabed
        } else if h < config.upland_threshold {
            Relief::Lowland
        } else if h < config.highland_threshold {
            Relief::Upland
        } else {
            Relief::Highland
        };
        tile.land = tile.relief != Relief::Seabed;

        // Smooth ramp from the lowland threshold (0) to the highland
        // threshold (1).
        let span = config.highland_threshold - config.lowland_threshold;
        let t = ((h - config.lowland_threshold) / span).clamp(0.0, 1.0);
        tile.amplitude = t * t * (3.0 - 2.0 * t);
    }
}

/// Merge every connected component of `target` tiles smaller than
/// `min_size` into `replacement`. Reads only `relief`, writes `relief`
/// and (for seabed targets) `land`.
pub fn merge_small_regions(
    world: &mut World,
    target: Relief,
    replacement: Relief,
    min_size: usize,
) {
    let mut visited = vec![false; world.tiles.len()];
    let mut merged = 0usize;

    for start in 0..world.tiles.len() {
        if visited[start] || world.tiles[start].relief != target {
            continue;
        }

        // Collect the whole component across same-relief adjacency.
        let mut component = Vec::new();
        let mut queue = VecDeque::new();
        visited[start] = true;
        queue.push_back(start);
        while let Some(t) = queue.pop_front() {
            component.push(t);
            for &n in &world.tiles[t].neighbors {
                if !visited[n] && world.tiles[n].relief == target {
                    visited[n] = true;
                    queue.push_back(n);
                }
            }
        }

        if component.len() < min_size {
            for &t in &component {
                world.tiles[t].relief = replacement;
                if target == Relief::Seabed {
                    world.tiles[t].land = true;
                }
            }
            merged += 1;
        }
    }

    if merged > 0 {
        debug!("relief: merged {merged} undersized {target:?} components into {replacement:?}");
    }
}

/// Reclassify walkable components that never touch seabed to highland:
/// an interior fully ringed by mountains is not a valid region.
pub fn reclassify_landlocked_interiors(world: &mut World) {
    // Frontier tiles already leaning on highland are promoted first so
    // rings clipped by the map edge are detected too.
    let mut promote = Vec::new();
    for tile in world.tiles.iter().filter(|t| t.frontier && t.relief.walkable()) {
        if tile
            .neighbors
            .iter()
            .any(|&n| world.tiles[n].relief == Relief::Highland)
        {
            promote.push(tile.index);
        }
    }
    for t in promote {
        world.tiles[t].relief = Relief::Highland;
    }

    let mut visited = vec![false; world.tiles.len()];
    let mut sealed = 0usize;

    for start in 0..world.tiles.len() {
        if visited[start] || !world.tiles[start].relief.walkable() {
            continue;
        }

        let mut component = Vec::new();
        let mut queue = VecDeque::new();
        let mut touches_sea = false;
        visited[start] = true;
        queue.push_back(start);
        while let Some(t) = queue.pop_front() {
            component.push(t);
            for &n in &world.tiles[t].neighbors {
                if world.tiles[n].relief == Relief::Seabed {
                    touches_sea = true;
                } else if !visited[n] && world.tiles[n].relief.walkable() {
                    visited[n] = true;
                    queue.push_back(n);
                }
            }
        }

        if !touches_sea {
            for &t in &component {
                world.tiles[t].relief = Relief::Highland;
            }
            sealed += 1;
        }
    }

    if sealed > 0 {
        debug!("relief: reclassified {sealed} landlocked interior components to highland");
    }
}

/// Derive coast flags: a border is coast when exactly one of its tiles is
/// land; the flag propagates onto both tiles and both corners.
pub fn correct_coast(world: &mut World) {
    for tile in &mut world.tiles {
        tile.coast = false;
    }
    for corner in &mut world.corners {
        corner.coast = false;
    }

    for b in 0..world.borders.len() {
        let [t0, t1] = world.borders[b].tiles;
        let coast = world.tiles[t0].land != world.tiles[t1].land;
        world.borders[b].coast = coast;
        if coast {
            world.tiles[t0].coast = true;
            world.tiles[t1].coast = true;
            for &c in &world.borders[b].corners {
                world.corners[c].coast = true;
            }
        }
    }
}

/// Derive wall flags on corners and borders along the highland rim.
pub fn correct_walls(world: &mut World) {
    for i in 0..world.corners.len() {
        let touches_highland = world.corners[i]
            .touches
            .iter()
            .any(|&t| world.tiles[t].relief == Relief::Highland);
        let touches_walkable = world.corners[i]
            .touches
            .iter()
            .any(|&t| world.tiles[t].relief.walkable());

        world.corners[i].wall = (touches_highland && touches_walkable)
            || (world.corners[i].frontier && touches_highland);
    }

    for border in &mut world.borders {
        let h0 = world.tiles[border.tiles[0]].relief == Relief::Highland;
        let h1 = world.tiles[border.tiles[1]].relief == Relief::Highland;
        border.wall = if border.frontier { h0 || h1 } else { h0 != h1 };
    }
}

/// Run the full relief stage.
pub fn generate_relief(world: &mut World, height: &dyn ScalarField, config: &GenerationConfig) {
    classify_relief(world, height, config);

    merge_small_regions(
        world,
        Relief::Highland,
        Relief::Upland,
        config.min_mountain_size,
    );
    if config.merge_small_lakes {
        merge_small_regions(
            world,
            Relief::Seabed,
            Relief::Lowland,
            config.min_water_size,
        );
    }
    reclassify_landlocked_interiors(world);

    correct_coast(world);
    correct_walls(world);

    debug!(
        "relief: {} land tiles of {} ({} highland)",
        world.tiles.iter().filter(|t| t.land).count(),
        world.tiles.len(),
        world
            .tiles
            .iter()
            .filter(|t| t.relief == Relief::Highland)
            .count()
    );
}
