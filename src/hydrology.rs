//! River generation over the corner graph.
//!
//! Rivers are grown as drainage basins: every coastal outlet corner roots
//! a binary tree of confluences reaching inland across scored candidate
//! corners. Strahler stream order ranks each confluence, erosion carves
//! valleys along the strong rivers, and a series of trimming passes
//! removes mountain streams, cramped corners and stubby branches before
//! the surviving forest is written back onto corner, border and tile
//! river flags.
//!
//! The forest lives in an index-addressed arena with tombstone slots and
//! every traversal is iterative; basins can be deep enough to overflow
//! the call stack otherwise.

use std::collections::VecDeque;

use log::debug;

use crate::config::GenerationConfig;
use crate::world::{Relief, World, NONE};

/// One drainage-network node: a river corner and up to two tributaries.
#[derive(Debug, Clone)]
struct Branch {
    /// Corner this confluence sits on.
    confluence: usize,
    /// Parent branch index, NONE at basin roots.
    parent: usize,
    /// Tributary branch indices.
    left: usize,
    right: usize,
    /// Strahler stream order.
    streamorder: u32,
    /// Post-order height: 0 at leaves.
    depth: u32,
    /// Tombstone flag; pruned slots are never reused within a run.
    alive: bool,
}

/// Arena of branches plus the root index of every live basin.
#[derive(Debug, Default)]
struct DrainageForest {
    branches: Vec<Branch>,
    roots: Vec<usize>,
}

impl DrainageForest {
    fn alloc(&mut self, confluence: usize, parent: usize) -> usize {
        let index = self.branches.len();
        self.branches.push(Branch {
            confluence,
            parent,
            left: NONE,
            right: NONE,
            streamorder: 1,
            depth: 0,
            alive: true,
        });
        index
    }

    /// Try to attach `child` under `parent`, left slot first.
    /// Returns false when both slots are taken.
    fn attach(&mut self, parent: usize, child: usize) -> bool {
        if self.branches[parent].left == NONE {
            self.branches[parent].left = child;
            true
        } else if self.branches[parent].right == NONE {
            self.branches[parent].right = child;
            true
        } else {
            false
        }
    }

    /// Kill a whole subtree: detach it from its parent, then walk it
    /// breadth-first marking every node dead so no child is missed.
    fn prune_subtree(&mut self, node: usize) {
        let parent = self.branches[node].parent;
        if parent != NONE {
            if self.branches[parent].left == node {
                self.branches[parent].left = NONE;
            } else if self.branches[parent].right == node {
                self.branches[parent].right = NONE;
            }
        }

        let mut queue = VecDeque::new();
        queue.push_back(node);
        while let Some(b) = queue.pop_front() {
            self.branches[b].alive = false;
            for child in [self.branches[b].left, self.branches[b].right] {
                if child != NONE {
                    queue.push_back(child);
                }
            }
        }
    }

    /// Collect the live nodes of a subtree, top-down.
    fn collect(&self, root: usize) -> Vec<usize> {
        let mut nodes = Vec::new();
        if !self.branches[root].alive {
            return nodes;
        }
        let mut queue = VecDeque::new();
        queue.push_back(root);
        while let Some(b) = queue.pop_front() {
            nodes.push(b);
            for child in [self.branches[b].left, self.branches[b].right] {
                if child != NONE && self.branches[child].alive {
                    queue.push_back(child);
                }
            }
        }
        nodes
    }

    /// Drop dead roots from the active basin list.
    fn retain_live_roots(&mut self) {
        let branches = &self.branches;
        self.roots.retain(|&r| branches[r].alive);
    }

    fn live_count(&self) -> usize {
        self.branches.iter().filter(|b| b.alive).count()
    }
}

/// Elevation penalty of a corner: the sum over touching tiles of
/// 3 for upland and 4 for highland. Water cannot climb in this metric.
fn corner_weights(world: &World) -> Vec<u32> {
    world
        .corners
        .iter()
        .map(|corner| {
            corner
                .touches
                .iter()
                .map(|&t| match world.tiles[t].relief {
                    Relief::Upland => 3,
                    Relief::Highland => 4,
                    _ => 0,
                })
                .sum()
        })
        .collect()
}

/// A corner can carry drainage iff it is not on the map edge and either
/// sits on the coast (a potential outlet) or touches no seabed at all.
fn drainage_candidates(world: &World) -> Vec<bool> {
    world
        .corners
        .iter()
        .map(|corner| {
            if corner.frontier {
                return false;
            }
            corner.coast
                || corner
                    .touches
                    .iter()
                    .all(|&t| world.tiles[t].relief != Relief::Seabed)
        })
        .collect()
}

/// Relax scores outward from every coastal candidate until fixed point.
/// A neighbor is improved only when the new score is strictly lower and
/// its elevation weight is at least the current corner's, so the metric
/// never flows uphill and every accepted update decreases a bounded
/// score: the queue must drain.
fn score_candidates(world: &World, candidates: &[bool], weights: &[u32]) -> Vec<u32> {
    let mut scores = vec![u32::MAX; world.corners.len()];
    let mut queue = VecDeque::new();

    for c in 0..world.corners.len() {
        if candidates[c] && world.corners[c].coast {
            scores[c] = 0;
            queue.push_back(c);
        }
    }

    while let Some(c) = queue.pop_front() {
        let next = scores[c] + weights[c] + 1;
        for &adj in &world.corners[c].adjacent {
            if !candidates[adj] || world.corners[adj].coast {
                continue;
            }
            if next < scores[adj] && weights[adj] >= weights[c] {
                scores[adj] = next;
                queue.push_back(adj);
            }
        }
    }

    scores
}

/// Grow one basin tree per coastal outlet: breadth-first from the root,
/// attaching a corner as a tributary when its score rises strictly and
/// its weight does not fall. A corner joins at most one basin.
fn build_forest(
    world: &World,
    candidates: &[bool],
    weights: &[u32],
    scores: &[u32],
) -> DrainageForest {
    let mut forest = DrainageForest::default();
    let mut claimed = vec![false; world.corners.len()];

    for c in 0..world.corners.len() {
        if !candidates[c] || !world.corners[c].coast || claimed[c] {
            continue;
        }
        claimed[c] = true;

        let root = forest.alloc(c, NONE);
        let mut queue = VecDeque::new();
        queue.push_back(root);

        while let Some(b) = queue.pop_front() {
            let corner = forest.branches[b].confluence;
            for &adj in &world.corners[corner].adjacent {
                if !candidates[adj]
                    || world.corners[adj].coast
                    || claimed[adj]
                    || scores[adj] == u32::MAX
                {
                    continue;
                }
                if scores[adj] > scores[corner] && weights[adj] >= weights[corner] {
                    let child = forest.alloc(adj, b);
                    if forest.attach(b, child) {
                        claimed[adj] = true;
                        queue.push_back(child);
                    } else {
                        // Both tributary slots taken: retract the node.
                        forest.branches.pop();
                    }
                }
            }
        }

        forest.roots.push(root);
    }

    forest
}

/// Strahler stream order and post-order height, computed iteratively.
fn compute_orders(forest: &mut DrainageForest) {
    for r in 0..forest.roots.len() {
        let root = forest.roots[r];
        let mut stack = vec![(root, false)];
        while let Some((node, expanded)) = stack.pop() {
            if !expanded {
                stack.push((node, true));
                for child in [forest.branches[node].left, forest.branches[node].right] {
                    if child != NONE {
                        stack.push((child, false));
                    }
                }
                continue;
            }

            let left = forest.branches[node].left;
            let right = forest.branches[node].right;
            let (order, depth) = match (left, right) {
                (NONE, NONE) => (1, 0),
                (a, NONE) | (NONE, a) => {
                    (forest.branches[a].streamorder, forest.branches[a].depth + 1)
                }
                (a, b) => {
                    let (oa, ob) = (forest.branches[a].streamorder, forest.branches[b].streamorder);
                    let order = if oa == ob { oa + 1 } else { oa.max(ob) };
                    (order, forest.branches[a].depth.max(forest.branches[b].depth) + 1)
                }
            };
            forest.branches[node].streamorder = order;
            forest.branches[node].depth = depth;
        }
    }
}

/// Rivers of order above two carve through mountains: every highland
/// tile touching such a confluence drops to upland.
fn erode_highlands(world: &mut World, forest: &DrainageForest) {
    for branch in forest.branches.iter().filter(|b| b.alive && b.streamorder > 2) {
        for t in world.corners[branch.confluence].touches.clone() {
            if world.tiles[t].relief == Relief::Highland {
                world.tiles[t].relief = Relief::Upland;
            }
        }
    }
}

fn touches_highland(world: &World, corner: usize) -> bool {
    world.corners[corner]
        .touches
        .iter()
        .any(|&t| world.tiles[t].relief == Relief::Highland)
}

/// Prune every branch still adjacent to highland or below the minimum
/// stream order. A basin whose root fails, or whose root loses both
/// children, is deleted whole.
fn trim_by_order(world: &World, forest: &mut DrainageForest, min_order: u32) {
    for r in 0..forest.roots.len() {
        let root = forest.roots[r];
        if !forest.branches[root].alive {
            continue;
        }
        let had_children =
            forest.branches[root].left != NONE || forest.branches[root].right != NONE;

        for node in forest.collect(root) {
            if !forest.branches[node].alive {
                continue;
            }
            let corner = forest.branches[node].confluence;
            if forest.branches[node].streamorder < min_order || touches_highland(world, corner) {
                forest.prune_subtree(node);
                if node == root {
                    break;
                }
            }
        }

        let root_branch = &forest.branches[root];
        if root_branch.alive && had_children && root_branch.left == NONE && root_branch.right == NONE
        {
            forest.prune_subtree(root);
        }
    }
    forest.retain_live_roots();
}

/// Find the border joining two adjacent corners.
fn border_between(world: &World, a: usize, b: usize) -> Option<usize> {
    world.corners[a]
        .borders
        .iter()
        .copied()
        .find(|&e| world.borders[e].other_corner(a) == b)
}

/// Rewrite corner and border river flags strictly from the live forest.
fn resync_rivers(world: &mut World, forest: &DrainageForest) {
    for corner in &mut world.corners {
        corner.river = false;
        corner.depth = 0;
    }
    for border in &mut world.borders {
        border.river = false;
    }

    for branch in forest.branches.iter().filter(|b| b.alive) {
        let corner = branch.confluence;
        world.corners[corner].river = true;
        world.corners[corner].depth = branch.depth;

        if branch.parent != NONE {
            let upstream = forest.branches[branch.parent].confluence;
            if let Some(e) = border_between(world, corner, upstream) {
                world.borders[e].river = true;
            }
        }
    }
}

/// Geometric vetoes on river corners: two river corners closer than the
/// minimum gap lose the shallower one (ties keep the lower index), and a
/// river corner leaning on a frontier or wall corner loses its flag.
fn veto_river_corners(world: &mut World, min_gap: f64) {
    for c in 0..world.corners.len() {
        if !world.corners[c].river {
            continue;
        }
        for adj in world.corners[c].adjacent.clone() {
            if !world.corners[adj].river {
                continue;
            }
            let gap = world.corners[c]
                .position
                .distance(&world.corners[adj].position);
            if gap < min_gap {
                let (dc, da) = (world.corners[c].depth, world.corners[adj].depth);
                let loser = if dc < da {
                    c
                } else if da < dc {
                    adj
                } else {
                    c.max(adj)
                };
                world.corners[loser].river = false;
                if loser == c {
                    // The pair rule needs two live river corners; once
                    // `c` is out it must not veto its other neighbors.
                    break;
                }
            }
        }
    }

    for c in 0..world.corners.len() {
        if !world.corners[c].river {
            continue;
        }
        let blocked = world.corners[c]
            .adjacent
            .iter()
            .any(|&adj| world.corners[adj].frontier || world.corners[adj].wall);
        if blocked {
            world.corners[c].river = false;
        }
    }
}

/// Delete every subtree whose confluence lost its river flag during the
/// vetoes; basins losing their root go entirely.
fn prune_unflagged(world: &World, forest: &mut DrainageForest) {
    for r in 0..forest.roots.len() {
        let root = forest.roots[r];
        if !forest.branches[root].alive {
            continue;
        }
        for node in forest.collect(root) {
            if !forest.branches[node].alive {
                continue;
            }
            if !world.corners[forest.branches[node].confluence].river {
                forest.prune_subtree(node);
                if node == root {
                    break;
                }
            }
        }
    }
    forest.retain_live_roots();
}

/// Remove stubby tributaries: walk rootward from every leaf; at the
/// first fork, a feeder shorter than the minimum branch length is
/// pruned. A leaf reaching the root without crossing a fork measures the
/// whole basin, which is deleted when below the minimum basin size.
fn trim_stubs(forest: &mut DrainageForest, min_branch: u32, min_basin: u32) {
    let leaves: Vec<usize> = forest
        .branches
        .iter()
        .enumerate()
        .filter(|(_, b)| b.alive && b.left == NONE && b.right == NONE)
        .map(|(i, _)| i)
        .collect();

    for leaf in leaves {
        if !forest.branches[leaf].alive {
            continue;
        }

        let mut length = 1u32;
        let mut node = leaf;
        loop {
            let parent = forest.branches[node].parent;
            if parent == NONE {
                // Reached the root fork-free: `length` measures the basin.
                if length < min_basin {
                    forest.prune_subtree(node);
                }
                break;
            }
            let fork = forest.branches[parent].left != NONE && forest.branches[parent].right != NONE;
            if fork {
                if length < min_branch {
                    forest.prune_subtree(node);
                }
                break;
            }
            node = parent;
            length += 1;
        }
    }
    forest.retain_live_roots();
}

/// Push surviving river borders up onto their tiles.
fn flag_river_tiles(world: &mut World) {
    for b in 0..world.borders.len() {
        if world.borders[b].river {
            for t in world.borders[b].tiles {
                world.tiles[t].river = true;
            }
        }
    }
}

/// Run the full hydrology stage. Branches and basins are scratch state:
/// only the river/depth flags they leave on the graph survive the call.
pub fn generate_rivers(world: &mut World, config: &GenerationConfig) {
    let weights = corner_weights(world);
    let candidates = drainage_candidates(world);
    let scores = score_candidates(world, &candidates, &weights);

    let mut forest = build_forest(world, &candidates, &weights, &scores);
    compute_orders(&mut forest);
    debug!(
        "hydrology: {} basins, {} branches before trimming",
        forest.roots.len(),
        forest.live_count()
    );

    if config.erosion {
        erode_highlands(world, &forest);
    }

    trim_by_order(world, &mut forest, config.min_stream_order);

    resync_rivers(world, &forest);
    veto_river_corners(world, config.min_river_gap);
    prune_unflagged(world, &mut forest);

    trim_stubs(&mut forest, config.min_branch_length, config.min_basin_size);

    resync_rivers(world, &forest);
    flag_river_tiles(world);

    debug!(
        "hydrology: {} basins, {} branches survive; {} river corners",
        forest.roots.len(),
        forest.live_count(),
        world.corners.iter().filter(|c| c.river).count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BoundingBox, Point};
    use crate::world::{Border, Corner, Tile};

    /// Hand-build a corner graph: positions plus adjacency, each corner
    /// touching the given tiles. Tiles carry only relief.
    fn corner_world(
        reliefs: &[Relief],
        corners: &[(f64, f64, &[usize])],
        links: &[(usize, usize)],
    ) -> World {
        let mut world = World::new(BoundingBox::new(0.0, 0.0, 100.0, 100.0));
        for (i, &relief) in reliefs.iter().enumerate() {
            let mut tile = Tile::new(i, Point::new(i as f64 * 10.0, 50.0));
            tile.relief = relief;
            tile.land = relief != Relief::Seabed;
            world.tiles.push(tile);
        }
        for (i, &(x, y, touches)) in corners.iter().enumerate() {
            let mut corner = Corner::new(i, Point::new(x, y));
            corner.touches = touches.to_vec();
            corner.coast = touches.iter().any(|&t| world.tiles[t].land)
                && touches.iter().any(|&t| !world.tiles[t].land);
            for &t in touches {
                world.tiles[t].corners.push(i);
            }
            world.corners.push(corner);
        }
        for &(a, b) in links {
            world.corners[a].adjacent.push(b);
            world.corners[b].adjacent.push(a);
            let e = world.borders.len();
            let mut border = Border::new(e);
            border.corners = [a, b];
            // Tile pair does not matter for these tests; alias tile 0.
            border.tiles = [0, 0];
            world.corners[a].borders.push(e);
            world.corners[b].borders.push(e);
            world.borders.push(border);
        }
        world
    }

    fn lenient_config() -> GenerationConfig {
        GenerationConfig {
            min_stream_order: 1,
            min_branch_length: 1,
            min_basin_size: 1,
            min_river_gap: 0.0,
            erosion: false,
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn test_degenerate_world_leaves_no_rivers() {
        // One coastal candidate corner with no qualifying neighbors: its
        // lone order-1 basin must be wiped by the stream-order trim.
        let mut world = corner_world(
            &[Relief::Seabed, Relief::Lowland, Relief::Lowland, Relief::Lowland],
            &[(10.0, 10.0, &[0, 1, 2])],
            &[],
        );
        let config = GenerationConfig {
            min_stream_order: 4,
            ..lenient_config()
        };

        let weights = corner_weights(&world);
        let candidates = drainage_candidates(&world);
        let scores = score_candidates(&world, &candidates, &weights);
        let mut forest = build_forest(&world, &candidates, &weights, &scores);
        compute_orders(&mut forest);

        assert_eq!(forest.roots.len(), 1, "one basin expected");
        assert_eq!(forest.branches[forest.roots[0]].streamorder, 1);

        generate_rivers(&mut world, &config);
        assert!(world.corners.iter().all(|c| !c.river));
        assert!(world.borders.iter().all(|b| !b.river));
    }

    #[test]
    fn test_chain_basin_survives_lenient_trim() {
        // Corner 0 is a coastal outlet; 1, 2 and 3 reach inland over lowland.
        let mut world = corner_world(
            &[Relief::Seabed, Relief::Lowland, Relief::Lowland],
            &[
                (10.0, 10.0, &[0, 1, 2]),
                (30.0, 10.0, &[1, 2]),
                (50.0, 10.0, &[1, 2]),
                (70.0, 10.0, &[1, 2]),
            ],
            &[(0, 1), (1, 2), (2, 3)],
        );
        generate_rivers(&mut world, &lenient_config());

        let river_corners: Vec<usize> = (0..world.corners.len())
            .filter(|&c| world.corners[c].river)
            .collect();
        assert_eq!(river_corners, vec![0, 1, 2, 3]);
        assert_eq!(world.borders.iter().filter(|b| b.river).count(), 3);
        // The mouth carries the greatest height above the leaves
        assert_eq!(world.corners[0].depth, 3);
        assert_eq!(world.corners[3].depth, 0);
    }

    #[test]
    fn test_scores_never_flow_uphill() {
        // Corner 2 sits by upland: its weight exceeds corner 1's, so the
        // relaxation may climb; the reverse direction must not happen.
        let world = corner_world(
            &[Relief::Seabed, Relief::Lowland, Relief::Upland],
            &[
                (10.0, 10.0, &[0, 1]),
                (30.0, 10.0, &[1]),
                (50.0, 10.0, &[1, 2]),
            ],
            &[(0, 1), (1, 2)],
        );
        let weights = corner_weights(&world);
        let candidates = drainage_candidates(&world);
        let scores = score_candidates(&world, &candidates, &weights);

        assert_eq!(scores[0], 0);
        assert_eq!(scores[1], 1);
        assert_eq!(scores[2], scores[1] + weights[1] + 1);
    }

    #[test]
    fn test_strahler_orders() {
        let mut forest = DrainageForest::default();
        // root <- a <- {leaf1, leaf2}, root <- b(leaf)
        let root = forest.alloc(0, NONE);
        let a = forest.alloc(1, root);
        forest.attach(root, a);
        let b = forest.alloc(2, root);
        forest.attach(root, b);
        let l1 = forest.alloc(3, a);
        forest.attach(a, l1);
        let l2 = forest.alloc(4, a);
        forest.attach(a, l2);
        forest.roots.push(root);

        compute_orders(&mut forest);

        assert_eq!(forest.branches[l1].streamorder, 1);
        assert_eq!(forest.branches[l1].depth, 0);
        // Two equal tributaries raise the order
        assert_eq!(forest.branches[a].streamorder, 2);
        assert_eq!(forest.branches[a].depth, 1);
        // Unequal tributaries (2 and 1) keep the maximum
        assert_eq!(forest.branches[root].streamorder, 2);
        assert_eq!(forest.branches[root].depth, 2);
    }

    #[test]
    fn test_strahler_rule_holds_on_generated_forest() {
        // Grow the drainage forest over a real generated graph and
        // check the ordering rule at every fork, pass-through and leaf.
        let config = GenerationConfig::for_testing(5);
        let point_config = crate::pointgen::PointSamplerConfig {
            bounds: config.bounds,
            radius: config.poisson_radius,
            seed: config.seed,
            lloyd_iterations: config.lloyd_iterations,
            lloyd_omega: 1.0,
        };
        let points = crate::pointgen::generate_relaxed_points(&point_config);
        let diagram = crate::voronoi::build_voronoi(&points, &config.bounds);
        let mut world = crate::graph::build_world(&diagram, &config.bounds);
        let fields = crate::fields::WorldFields::from_seed(config.seed);
        crate::relief::generate_relief(&mut world, fields.height.as_ref(), &config);

        let weights = corner_weights(&world);
        let candidates = drainage_candidates(&world);
        let scores = score_candidates(&world, &candidates, &weights);
        let mut forest = build_forest(&world, &candidates, &weights, &scores);
        compute_orders(&mut forest);

        assert!(!forest.branches.is_empty(), "coastline should seed basins");
        for branch in forest.branches.iter().filter(|b| b.alive) {
            match (branch.left, branch.right) {
                (NONE, NONE) => assert_eq!(branch.streamorder, 1),
                (a, NONE) | (NONE, a) => {
                    assert_eq!(branch.streamorder, forest.branches[a].streamorder)
                }
                (a, b) => {
                    let (oa, ob) =
                        (forest.branches[a].streamorder, forest.branches[b].streamorder);
                    let expected = if oa == ob { oa + 1 } else { oa.max(ob) };
                    assert_eq!(branch.streamorder, expected);
                }
            }
        }
    }

    #[test]
    fn test_prune_subtree_detaches_and_kills() {
        let mut forest = DrainageForest::default();
        let root = forest.alloc(0, NONE);
        let a = forest.alloc(1, root);
        forest.attach(root, a);
        let leaf = forest.alloc(2, a);
        forest.attach(a, leaf);
        forest.roots.push(root);

        forest.prune_subtree(a);

        assert!(forest.branches[root].alive);
        assert!(!forest.branches[a].alive);
        assert!(!forest.branches[leaf].alive);
        assert_eq!(forest.branches[root].left, NONE);
    }

    #[test]
    fn test_stub_trim_deletes_short_basin() {
        let mut forest = DrainageForest::default();
        let root = forest.alloc(0, NONE);
        let a = forest.alloc(1, root);
        forest.attach(root, a);
        forest.roots.push(root);

        // Fork-free basin of length 2, minimum size 3
        trim_stubs(&mut forest, 1, 3);
        assert!(forest.roots.is_empty());
        assert_eq!(forest.live_count(), 0);
    }

    #[test]
    fn test_stub_trim_prunes_short_feeder_at_fork() {
        let mut forest = DrainageForest::default();
        let root = forest.alloc(0, NONE);
        // Long arm: three nodes
        let a1 = forest.alloc(1, root);
        forest.attach(root, a1);
        let a2 = forest.alloc(2, a1);
        forest.attach(a1, a2);
        let a3 = forest.alloc(3, a2);
        forest.attach(a2, a3);
        // Short arm: one node straight off the fork at the root
        let stub = forest.alloc(4, root);
        forest.attach(root, stub);
        forest.roots.push(root);

        trim_stubs(&mut forest, 2, 1);

        assert!(!forest.branches[stub].alive, "short feeder should go");
        assert!(forest.branches[a3].alive, "long arm should stay");
        assert_eq!(forest.roots.len(), 1);
    }

    #[test]
    fn test_wall_veto_unflags_corner() {
        let mut world = corner_world(
            &[Relief::Seabed, Relief::Lowland],
            &[
                (10.0, 10.0, &[0, 1]),
                (30.0, 10.0, &[1]),
                (50.0, 10.0, &[1]),
            ],
            &[(0, 1), (1, 2)],
        );
        world.corners[0].river = true;
        world.corners[1].river = true;
        world.corners[2].wall = true;

        veto_river_corners(&mut world, 0.0);
        assert!(!world.corners[1].river, "corner beside a wall loses the river");
        assert!(world.corners[0].river);
    }

    #[test]
    fn test_losing_corner_stops_vetoing_its_neighbors() {
        // Corner 0 sits between two other river corners. It loses to the
        // deeper corner 1; once unflagged it no longer forms a river
        // pair, so the shallower corner 2 must keep its flag.
        let mut world = corner_world(
            &[Relief::Seabed, Relief::Lowland],
            &[
                (10.0, 10.0, &[0, 1]),
                (12.0, 10.0, &[0, 1]),
                (10.0, 12.0, &[0, 1]),
            ],
            &[(0, 1), (0, 2)],
        );
        world.corners[0].river = true;
        world.corners[0].depth = 1;
        world.corners[1].river = true;
        world.corners[1].depth = 5;
        world.corners[2].river = true;
        world.corners[2].depth = 0;

        veto_river_corners(&mut world, 8.0);

        assert!(!world.corners[0].river);
        assert!(world.corners[1].river);
        assert!(
            world.corners[2].river,
            "corner 2's only close river neighbor lost its flag first"
        );
    }

    #[test]
    fn test_erosion_demotes_highland_only_above_order_two() {
        let build = || {
            corner_world(
                &[Relief::Seabed, Relief::Lowland, Relief::Highland],
                &[(10.0, 10.0, &[0, 1]), (30.0, 10.0, &[1, 2])],
                &[(0, 1)],
            )
        };

        let mut forest = DrainageForest::default();
        let root = forest.alloc(1, NONE);
        forest.roots.push(root);
        forest.branches[root].streamorder = 3;

        let mut world = build();
        erode_highlands(&mut world, &forest);
        assert_eq!(world.tiles[2].relief, Relief::Upland);

        forest.branches[root].streamorder = 2;
        let mut world = build();
        erode_highlands(&mut world, &forest);
        assert_eq!(world.tiles[2].relief, Relief::Highland);
    }

    #[test]
    fn test_erosion_gate_carves_highland_valleys() {
        // A full binary tree of eight drainage corners, all leaning on
        // the same highland tile: orders reach 3 at the trunk. With
        // erosion on, the valley is carved and the basin survives the
        // highland trim; with erosion off, the trim wipes the basin and
        // the highland stands.
        let build = || {
            corner_world(
                &[Relief::Seabed, Relief::Lowland, Relief::Highland],
                &[
                    (10.0, 40.0, &[0, 1, 2]),
                    (20.0, 40.0, &[1, 2]),
                    (30.0, 30.0, &[1, 2]),
                    (30.0, 50.0, &[1, 2]),
                    (40.0, 20.0, &[1, 2]),
                    (40.0, 35.0, &[1, 2]),
                    (40.0, 45.0, &[1, 2]),
                    (40.0, 60.0, &[1, 2]),
                ],
                &[(0, 1), (1, 2), (1, 3), (2, 4), (2, 5), (3, 6), (3, 7)],
            )
        };

        let mut world = build();
        let config = GenerationConfig {
            erosion: true,
            ..lenient_config()
        };
        generate_rivers(&mut world, &config);
        assert_eq!(world.tiles[2].relief, Relief::Upland);
        assert!(world.corners[0].river, "carved basin should survive");

        let mut world = build();
        generate_rivers(&mut world, &lenient_config());
        assert_eq!(world.tiles[2].relief, Relief::Highland);
        assert!(
            world.corners.iter().all(|c| !c.river),
            "uncarved highland basin is trimmed away"
        );
    }

    #[test]
    fn test_proximity_veto_keeps_deeper_corner() {
        let mut world = corner_world(
            &[Relief::Seabed, Relief::Lowland],
            &[(10.0, 10.0, &[0, 1]), (12.0, 10.0, &[0, 1])],
            &[(0, 1)],
        );
        world.corners[0].river = true;
        world.corners[0].depth = 5;
        world.corners[1].river = true;
        world.corners[1].depth = 2;

        veto_river_corners(&mut world, 8.0);
        assert!(world.corners[0].river);
        assert!(!world.corners[1].river);
    }
}
