//! Territory partition around settlements.
//!
//! Every settlement founds a holding. One multi-source BFS relaxation
//! spreads all holdings at once over walkable tiles, re-claiming a tile
//! whenever a strictly shorter path reaches it, so each tile ends up
//! with its nearest settlement by hop count. Frontier and river borders
//! are impassable, which makes rivers natural territorial boundaries.

use std::collections::{HashSet, VecDeque};

use log::debug;

use crate::world::{Feature, Holding, World, NONE};

/// Whether a holding may spread from tile `t` across border `e`.
/// Returns the claimable neighbor tile.
fn claimable_across(world: &World, t: usize, e: usize) -> Option<usize> {
    let border = &world.borders[e];
    if border.frontier || border.river {
        return None;
    }
    let n = border.other_tile(t);
    if n == t {
        return None;
    }
    let tile = &world.tiles[n];
    if !tile.relief.walkable() || tile.feature == Feature::Settlement {
        return None;
    }
    Some(n)
}

/// Partition the map into holdings and wire up their neighbor graph.
pub fn assign_holdings(world: &mut World) {
    world.holdings.clear();
    for tile in &mut world.tiles {
        tile.holding = NONE;
    }

    let mut owner = vec![NONE; world.tiles.len()];
    let mut dist = vec![u32::MAX; world.tiles.len()];
    let mut queue = VecDeque::new();

    for t in 0..world.tiles.len() {
        if world.tiles[t].feature == Feature::Settlement {
            let id = world.holdings.len() as u32;
            world.holdings.push(Holding::new(id, t));
            owner[t] = id as usize;
            dist[t] = 0;
            queue.push_back(t);
        }
    }

    // BFS relaxation: a strictly shorter path re-claims and re-enqueues,
    // so every tile converges to its nearest settlement by hop count.
    while let Some(t) = queue.pop_front() {
        let next = dist[t] + 1;
        for e in world.tiles[t].borders.clone() {
            if let Some(n) = claimable_across(world, t, e) {
                if next < dist[n] {
                    dist[n] = next;
                    owner[n] = owner[t];
                    queue.push_back(n);
                }
            }
        }
    }

    for t in 0..world.tiles.len() {
        if owner[t] != NONE {
            world.tiles[t].holding = owner[t];
            world.holdings[owner[t]].lands.push(t);
        }
    }

    // Undirected holding adjacency, one edge per pair, in border order.
    let mut seen: HashSet<(u32, u32)> = HashSet::new();
    for e in 0..world.borders.len() {
        let [t0, t1] = world.borders[e].tiles;
        let (a, b) = (world.tiles[t0].holding, world.tiles[t1].holding);
        if a == NONE || b == NONE || a == b {
            continue;
        }
        let pair = (a.min(b) as u32, a.max(b) as u32);
        if seen.insert(pair) {
            world.holdings[a].neighbors.push(b as u32);
            world.holdings[b].neighbors.push(a as u32);
        }
    }

    debug!(
        "holdings: {} centers claimed {} tiles",
        world.holdings.len(),
        world.tiles.iter().filter(|t| t.holding != NONE).count()
    );
}
