//! Voronoi adapter over the Delaunay triangulation.
//!
//! Consumes delaunator output and exposes the diagram as explicit cells,
//! vertices and edges with full incidence lists. Cells cut open at the map
//! edge are closed with synthetic boundary vertices (one per hull
//! half-edge) and a closing edge that has only one adjoining cell; the
//! graph builder turns those into frontier entities.

use crate::geometry::{circumcenter, BoundingBox, Point};

/// One Voronoi polygon, dual to an input point.
#[derive(Debug, Clone, Default)]
pub struct VoronoiCell {
    /// The generating point.
    pub center: Point,
    /// Vertex indices in winding order around the center.
    pub vertices: Vec<usize>,
    /// Incident edge indices.
    pub edges: Vec<usize>,
    /// Neighboring cell indices (share an edge).
    pub neighbors: Vec<usize>,
    /// True if the cell was open at the map edge before closing.
    pub open: bool,
}

/// One Voronoi vertex: a triangle circumcenter, or a synthetic boundary
/// point where an open cell meets the map edge.
#[derive(Debug, Clone, Default)]
pub struct VoronoiVertex {
    pub position: Point,
    /// Adjacent vertex indices (connected by an edge).
    pub adjacent: Vec<usize>,
    /// Cell indices this vertex bounds.
    pub cells: Vec<usize>,
    /// Incident edge indices.
    pub edges: Vec<usize>,
    /// True for synthetic boundary vertices.
    pub boundary: bool,
}

/// One Voronoi edge between two vertices. Interior edges separate two
/// cells; closing boundary edges adjoin exactly one.
#[derive(Debug, Clone)]
pub struct VoronoiEdge {
    pub vertices: [usize; 2],
    pub cells: [Option<usize>; 2],
}

/// The assembled diagram.
#[derive(Debug, Clone, Default)]
pub struct VoronoiDiagram {
    pub cells: Vec<VoronoiCell>,
    pub vertices: Vec<VoronoiVertex>,
    pub edges: Vec<VoronoiEdge>,
}

/// Build the Voronoi diagram for a point set inside the given area.
pub fn build_voronoi(points: &[Point], bounds: &BoundingBox) -> VoronoiDiagram {
    if points.len() < 3 {
        return VoronoiDiagram::default();
    }

    let delaunator_points: Vec<delaunator::Point> =
        points.iter().map(|p| (*p).into()).collect();
    let triangulation = delaunator::triangulate(&delaunator_points);
    if triangulation.triangles.is_empty() {
        return VoronoiDiagram::default();
    }

    let mut diagram = VoronoiDiagram::default();

    // One cell per input point.
    for point in points {
        diagram.cells.push(VoronoiCell {
            center: *point,
            ..Default::default()
        });
    }

    // One vertex per triangle, at the circumcenter clamped into the area.
    let num_triangles = triangulation.triangles.len() / 3;
    for t in 0..num_triangles {
        let i0 = triangulation.triangles[3 * t];
        let i1 = triangulation.triangles[3 * t + 1];
        let i2 = triangulation.triangles[3 * t + 2];

        let cc = circumcenter(&points[i0], &points[i1], &points[i2]);
        diagram.vertices.push(VoronoiVertex {
            position: bounds.clamp(&cc),
            ..Default::default()
        });
        for p in [i0, i1, i2] {
            diagram.vertices[t].cells.push(p);
        }
    }

    // Edges: one per Delaunay edge. A hull half-edge has no opposite
    // triangle, so its Voronoi edge runs from the single circumcenter out
    // to a synthetic vertex on the area boundary.
    for e in 0..triangulation.triangles.len() {
        let opposite = triangulation.halfedges[e];
        if opposite != delaunator::EMPTY && opposite < e {
            continue; // already handled from the other side
        }

        let p0 = triangulation.triangles[e];
        let p1 = triangulation.triangles[next_halfedge(e)];
        let t0 = e / 3;

        let v1 = if opposite != delaunator::EMPTY {
            opposite / 3
        } else {
            let midpoint = points[p0].lerp(&points[p1], 0.5);
            let position = project_to_boundary(&midpoint, bounds);
            let index = diagram.vertices.len();
            diagram.vertices.push(VoronoiVertex {
                position,
                cells: vec![p0, p1],
                boundary: true,
                ..Default::default()
            });
            index
        };

        if t0 == v1 {
            continue; // degenerate: both halfedges in the same triangle
        }

        let index = diagram.edges.len();
        diagram.edges.push(VoronoiEdge {
            vertices: [t0, v1],
            cells: [Some(p0), Some(p1)],
        });

        for v in [t0, v1] {
            diagram.vertices[v].edges.push(index);
        }
        diagram.vertices[t0].adjacent.push(v1);
        diagram.vertices[v1].adjacent.push(t0);

        for c in [p0, p1] {
            diagram.cells[c].edges.push(index);
        }
        diagram.cells[p0].neighbors.push(p1);
        diagram.cells[p1].neighbors.push(p0);
    }

    // Cells incident to a synthetic vertex are open at the map edge; close
    // each with one boundary edge between its two synthetic vertices.
    let mut cell_boundary_vertices: Vec<Vec<usize>> = vec![Vec::new(); diagram.cells.len()];
    for (v, vertex) in diagram.vertices.iter().enumerate() {
        if vertex.boundary {
            for &c in &vertex.cells {
                cell_boundary_vertices[c].push(v);
            }
        }
    }
    for c in 0..diagram.cells.len() {
        let synthetic = &cell_boundary_vertices[c];
        if synthetic.is_empty() {
            continue;
        }
        diagram.cells[c].open = true;
        if synthetic.len() != 2 {
            continue; // clipped corner cell with collapsed hull edge
        }
        let (s0, s1) = (synthetic[0], synthetic[1]);
        if s0 == s1 {
            continue;
        }

        let index = diagram.edges.len();
        diagram.edges.push(VoronoiEdge {
            vertices: [s0, s1],
            cells: [Some(c), None],
        });
        for v in [s0, s1] {
            diagram.vertices[v].edges.push(index);
        }
        diagram.vertices[s0].adjacent.push(s1);
        diagram.vertices[s1].adjacent.push(s0);
        diagram.cells[c].edges.push(index);
    }

    // Collect each cell's vertices from its edges, then establish winding
    // order by angle around the center.
    for c in 0..diagram.cells.len() {
        let mut vertices: Vec<usize> = Vec::new();
        for &e in &diagram.cells[c].edges {
            for &v in &diagram.edges[e].vertices {
                if !vertices.contains(&v) {
                    vertices.push(v);
                }
            }
        }
        let center = diagram.cells[c].center;
        vertices.sort_by(|&a, &b| {
            let pa = diagram.vertices[a].position;
            let pb = diagram.vertices[b].position;
            let angle_a = (pa.y - center.y).atan2(pa.x - center.x);
            let angle_b = (pb.y - center.y).atan2(pb.x - center.x);
            angle_a
                .partial_cmp(&angle_b)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for &v in &vertices {
            if !diagram.vertices[v].cells.contains(&c) {
                diagram.vertices[v].cells.push(c);
            }
        }
        diagram.cells[c].vertices = vertices;
    }

    diagram
}

/// Get the next halfedge in a triangle (CCW).
#[inline]
fn next_halfedge(e: usize) -> usize {
    if e % 3 == 2 { e - 2 } else { e + 1 }
}

/// Project a point onto the boundary of the box, along the ray from the
/// box center through the point.
fn project_to_boundary(point: &Point, bounds: &BoundingBox) -> Point {
    let center = bounds.center();
    let dir = *point - center;

    if dir.x.abs() < 1e-10 && dir.y.abs() < 1e-10 {
        return Point::new(bounds.max.x, center.y);
    }

    let mut t_min = f64::INFINITY;
    if dir.x > 0.0 {
        t_min = t_min.min((bounds.max.x - center.x) / dir.x);
    } else if dir.x < 0.0 {
        t_min = t_min.min((bounds.min.x - center.x) / dir.x);
    }
    if dir.y > 0.0 {
        t_min = t_min.min((bounds.max.y - center.y) / dir.y);
    } else if dir.y < 0.0 {
        t_min = t_min.min((bounds.min.y - center.y) / dir.y);
    }

    Point::new(center.x + dir.x * t_min, center.y + dir.y * t_min)
}
