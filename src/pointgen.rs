//! Blue-noise point sampling and Lloyd relaxation.
//!
//! Tile density is controlled by the Poisson-disk radius rather than a
//! point count: Bridson's algorithm fills the generation area with points
//! no closer than the radius, then a few Lloyd passes even out cell sizes.

use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::geometry::{polygon_centroid, BoundingBox, Point};

/// Configuration for point sampling.
#[derive(Debug, Clone)]
pub struct PointSamplerConfig {
    /// Bounding box for the map.
    pub bounds: BoundingBox,
    /// Poisson-disk radius: no two points closer than this.
    pub radius: f64,
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Number of Lloyd relaxation iterations.
    pub lloyd_iterations: u32,
    /// Over-relaxation factor (1.0 = standard, 1.5-1.8 for faster convergence).
    pub lloyd_omega: f64,
}

impl Default for PointSamplerConfig {
    fn default() -> Self {
        Self {
            bounds: BoundingBox::new(0.0, 0.0, 1000.0, 1000.0),
            radius: 25.0,
            seed: 12345,
            lloyd_iterations: 2,
            lloyd_omega: 1.0,
        }
    }
}

/// Number of candidate darts thrown around an active point before it retires.
const BRIDSON_ATTEMPTS: u32 = 30;

/// Generate a Poisson-disk point set inside the bounding box.
pub fn generate_poisson_points(config: &PointSamplerConfig) -> Vec<Point> {
    let bounds = &config.bounds;
    let radius = config.radius.max(1e-6);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);

    // Acceleration grid: cell diagonal equals the radius, so each cell
    // holds at most one accepted point.
    let cell_size = radius / std::f64::consts::SQRT_2;
    let grid_w = (bounds.width() / cell_size).ceil() as usize + 1;
    let grid_h = (bounds.height() / cell_size).ceil() as usize + 1;
    let mut grid: Vec<usize> = vec![usize::MAX; grid_w * grid_h];

    let cell_of = |p: &Point| -> (usize, usize) {
        let gx = ((p.x - bounds.min.x) / cell_size) as usize;
        let gy = ((p.y - bounds.min.y) / cell_size) as usize;
        (gx.min(grid_w - 1), gy.min(grid_h - 1))
    };

    let mut points: Vec<Point> = Vec::new();
    let mut active: Vec<usize> = Vec::new();

    let initial = Point::new(
        rng.gen_range(bounds.min.x..bounds.max.x),
        rng.gen_range(bounds.min.y..bounds.max.y),
    );
    let (gx, gy) = cell_of(&initial);
    grid[gy * grid_w + gx] = 0;
    points.push(initial);
    active.push(0);

    while !active.is_empty() {
        // Last-in keeps the frontier compact and the walk deterministic.
        let slot = active.len() - 1;
        let origin = points[active[slot]];

        let mut placed = false;
        for _ in 0..BRIDSON_ATTEMPTS {
            let angle = rng.gen_range(0.0..std::f64::consts::TAU);
            let distance = rng.gen_range(radius..2.0 * radius);
            let candidate = Point::new(
                origin.x + angle.cos() * distance,
                origin.y + angle.sin() * distance,
            );

            if !bounds.contains(&candidate) {
                continue;
            }

            let (cx, cy) = cell_of(&candidate);
            let mut conflict = false;
            'scan: for ny in cy.saturating_sub(2)..(cy + 3).min(grid_h) {
                for nx in cx.saturating_sub(2)..(cx + 3).min(grid_w) {
                    let occupant = grid[ny * grid_w + nx];
                    if occupant != usize::MAX
                        && points[occupant].distance_sq(&candidate) < radius * radius
                    {
                        conflict = true;
                        break 'scan;
                    }
                }
            }
            if conflict {
                continue;
            }

            let index = points.len();
            grid[cy * grid_w + cx] = index;
            points.push(candidate);
            active.push(index);
            placed = true;
            break;
        }

        if !placed {
            active.swap_remove(slot);
        }
    }

    points
}

/// Perform one iteration of Lloyd relaxation.
/// Returns the maximum displacement of any point.
fn lloyd_iteration(points: &mut [Point], bounds: &BoundingBox, omega: f64) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    // Convert to delaunator points
    let delaunator_points: Vec<delaunator::Point> =
        points.iter().map(|p| (*p).into()).collect();

    let triangulation = delaunator::triangulate(&delaunator_points);
    if triangulation.triangles.is_empty() {
        return 0.0;
    }

    // Build a mapping from point index to one of its incoming half-edges
    let mut point_to_halfedge: Vec<usize> = vec![delaunator::EMPTY; points.len()];
    for e in 0..triangulation.triangles.len() {
        let endpoint = triangulation.triangles[next_halfedge(e)];
        if point_to_halfedge[endpoint] == delaunator::EMPTY
            || triangulation.halfedges[e] == delaunator::EMPTY
        {
            point_to_halfedge[endpoint] = e;
        }
    }

    // Compute the centroid of each Voronoi cell
    let mut new_positions = vec![Point::ZERO; points.len()];
    let mut max_displacement = 0.0f64;

    for p in 0..points.len() {
        let start = point_to_halfedge[p];
        if start == delaunator::EMPTY {
            new_positions[p] = points[p];
            continue;
        }

        // Collect triangles around this point
        let mut triangles = Vec::new();
        let mut incoming = start;
        loop {
            triangles.push(incoming / 3);
            let outgoing = next_halfedge(incoming);
            incoming = triangulation.halfedges[outgoing];
            if incoming == delaunator::EMPTY || incoming == start {
                break;
            }
        }

        if triangles.is_empty() {
            new_positions[p] = points[p];
            continue;
        }

        // Circumcenters (Voronoi vertices) of these triangles, clamped
        let mut voronoi_vertices = Vec::with_capacity(triangles.len());
        for &t in &triangles {
            let i0 = triangulation.triangles[3 * t];
            let i1 = triangulation.triangles[3 * t + 1];
            let i2 = triangulation.triangles[3 * t + 2];

            let cc = crate::geometry::circumcenter(&points[i0], &points[i1], &points[i2]);
            voronoi_vertices.push(bounds.clamp(&cc));
        }

        let centroid = bounds.clamp(&polygon_centroid(&voronoi_vertices));

        // Apply over-relaxation
        let old_pos = points[p];
        let new_pos = Point::new(
            old_pos.x + omega * (centroid.x - old_pos.x),
            old_pos.y + omega * (centroid.y - old_pos.y),
        );
        new_positions[p] = bounds.clamp(&new_pos);

        let displacement = old_pos.distance(&new_positions[p]);
        max_displacement = max_displacement.max(displacement);
    }

    points.copy_from_slice(&new_positions);
    max_displacement
}

/// Apply Lloyd relaxation to improve point distribution.
pub fn lloyd_relaxation(points: &mut [Point], bounds: &BoundingBox, iterations: u32, omega: f64) {
    for _ in 0..iterations {
        let _displacement = lloyd_iteration(points, bounds, omega);
    }
}

/// Generate a Poisson-disk point set and apply Lloyd relaxation.
pub fn generate_relaxed_points(config: &PointSamplerConfig) -> Vec<Point> {
    let mut points = generate_poisson_points(config);
    lloyd_relaxation(
        &mut points,
        &config.bounds,
        config.lloyd_iterations,
        config.lloyd_omega,
    );
    points
}

/// Get the next halfedge in a triangle (CCW).
#[inline]
fn next_halfedge(e: usize) -> usize {
    if e % 3 == 2 { e - 2 } else { e + 1 }
}
