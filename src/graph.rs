//! Build the world graph from Voronoi primitives.
//!
//! Converts cells, vertices and edges into the Tile/Corner/Border arenas
//! with full adjacency. All three arrays are sized up front and entities
//! keep the indices of their Voronoi sources, so cross references can be
//! written in a single pass regardless of construction order.

use log::debug;

use crate::geometry::BoundingBox;
use crate::voronoi::VoronoiDiagram;
use crate::world::{Border, Corner, Tile, World};

/// Build a world graph from a Voronoi diagram.
pub fn build_world(diagram: &VoronoiDiagram, bounds: &BoundingBox) -> World {
    let mut world = World::new(*bounds);

    world.tiles = Vec::with_capacity(diagram.cells.len());
    world.corners = Vec::with_capacity(diagram.vertices.len());
    world.borders = Vec::with_capacity(diagram.edges.len());

    for (i, cell) in diagram.cells.iter().enumerate() {
        let mut tile = Tile::new(i, cell.center);
        tile.neighbors = cell.neighbors.clone();
        tile.corners = cell.vertices.clone();
        tile.borders = cell.edges.clone();
        tile.frontier = cell.open;
        world.tiles.push(tile);
    }

    for (i, vertex) in diagram.vertices.iter().enumerate() {
        let mut corner = Corner::new(i, vertex.position);
        corner.adjacent = vertex.adjacent.clone();
        corner.touches = vertex.cells.clone();
        corner.borders = vertex.edges.clone();
        corner.frontier = vertex.boundary;
        world.corners.push(corner);
    }

    for (i, edge) in diagram.edges.iter().enumerate() {
        let mut border = Border::new(i);
        border.corners = edge.vertices;

        match edge.cells {
            [Some(t0), Some(t1)] => {
                border.tiles = [t0, t1];
            }
            [Some(t0), None] | [None, Some(t0)] => {
                // Open at the area edge: both tile references alias the
                // single present cell.
                border.tiles = [t0, t0];
                border.frontier = true;
                world.tiles[t0].frontier = true;
                for &c in &edge.vertices {
                    world.corners[c].frontier = true;
                }
            }
            [None, None] => unreachable!("edge without any adjoining cell"),
        }

        world.borders.push(border);
    }

    debug!(
        "graph: {} tiles, {} corners, {} borders ({} frontier tiles)",
        world.tiles.len(),
        world.corners.len(),
        world.borders.len(),
        world.tiles.iter().filter(|t| t.frontier).count()
    );

    world
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointgen::{generate_relaxed_points, PointSamplerConfig};
    use crate::voronoi::build_voronoi;

    pub(crate) fn sample_world(radius: f64, seed: u64) -> World {
        let config = PointSamplerConfig {
            radius,
            seed,
            lloyd_iterations: 2,
            ..Default::default()
        };
        let points = generate_relaxed_points(&config);
        let diagram = build_voronoi(&points, &config.bounds);
        build_world(&diagram, &config.bounds)
    }

    #[test]
    fn test_build_world_structure() {
        let world = sample_world(60.0, 12345);

        assert!(!world.tiles.is_empty());
        assert!(!world.corners.is_empty());
        assert!(!world.borders.is_empty());
        assert!(world.validate().is_ok());
    }

    #[test]
    fn test_frontier_borders_alias_one_tile() {
        let world = sample_world(60.0, 12345);

        let mut frontier_borders = 0;
        for border in &world.borders {
            if border.frontier {
                frontier_borders += 1;
                assert_eq!(border.tiles[0], border.tiles[1]);
                assert!(world.tiles[border.tiles[0]].frontier);
                for &c in &border.corners {
                    assert!(world.corners[c].frontier);
                }
            } else {
                assert_ne!(border.tiles[0], border.tiles[1]);
            }
        }
        assert!(frontier_borders > 0);
    }

    #[test]
    fn test_index_assignment_is_deterministic() {
        let a = sample_world(60.0, 777);
        let b = sample_world(60.0, 777);

        assert_eq!(a.tiles.len(), b.tiles.len());
        for (ta, tb) in a.tiles.iter().zip(b.tiles.iter()) {
            assert_eq!(ta.neighbors, tb.neighbors);
            assert_eq!(ta.corners, tb.corners);
            assert_eq!(ta.borders, tb.borders);
        }
        for (ca, cb) in a.corners.iter().zip(b.corners.iter()) {
            assert_eq!(ca.adjacent, cb.adjacent);
            assert_eq!(ca.touches, cb.touches);
        }
    }
}
