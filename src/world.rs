//! Core data structures for the world graph.
//!
//! This module implements the Arena pattern with index-based references
//! to avoid Rc<RefCell<T>> and handle circular references cleanly.
//!
//! The graph consists of:
//! - **Tile**: Voronoi cell, one map region
//! - **Corner**: Voronoi vertex shared by adjacent tiles
//! - **Border**: edge between two corners, separating two tiles
//!
//! Indices are the *only* reference form, live and persisted alike: the
//! serialized representation is the in-memory representation, so a reload
//! needs no pointer fix-up, only [`World::validate`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{BoundingBox, Point};

/// Sentinel value for "no reference" (like null).
pub const NONE: usize = usize::MAX;

/// Discrete elevation band of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Relief {
    #[default]
    Seabed,
    Lowland,
    Upland,
    Highland,
}

impl Relief {
    /// True for the bands a settlement or holding can occupy.
    #[inline]
    pub fn walkable(self) -> bool {
        matches!(self, Relief::Lowland | Relief::Upland)
    }
}

/// Surface material category, derived from relief and climate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Regolith {
    /// Sea floor.
    #[default]
    Marine,
    Sand,
    Dirt,
    Grass,
    Rock,
    Snow,
}

/// Primitive terrain feature tag on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Feature {
    #[default]
    None,
    Woods,
    Floodplain,
    Resource,
    Settlement,
}

/// One map region (a Voronoi cell).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Index in the tiles array.
    pub index: usize,
    /// Cell center position.
    pub center: Point,

    // === Topology (indices, insertion order = Voronoi winding order) ===
    /// Neighboring Tile indices (share a border).
    pub neighbors: Vec<usize>,
    /// Bounding Corner indices.
    pub corners: Vec<usize>,
    /// Bounding Border indices.
    pub borders: Vec<usize>,

    // === Terrain properties ===
    /// True if the tile touches the map edge.
    pub frontier: bool,
    /// True if the tile is land.
    pub land: bool,
    /// True if the tile sits on a land/sea boundary.
    pub coast: bool,
    /// True if a river runs along one of the tile's borders.
    pub river: bool,
    /// Elevation band.
    pub relief: Relief,
    /// Local ruggedness in [0, 1].
    pub amplitude: f64,
    /// Sampled temperature in [0, 1].
    pub temperature: f64,
    /// Sampled precipitation in [0, 1].
    pub precipitation: f64,
    /// Surface material.
    pub regolith: Regolith,
    /// Terrain feature tag.
    pub feature: Feature,
    /// Owning holding ID as index into `World::holdings`, NONE if unclaimed.
    pub holding: usize,
}

impl Tile {
    pub fn new(index: usize, center: Point) -> Self {
        Self {
            index,
            center,
            holding: NONE,
            ..Default::default()
        }
    }
}

/// A Voronoi vertex shared by three or more tiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corner {
    /// Index in the corners array.
    pub index: usize,
    /// Vertex position.
    pub position: Point,

    // === Topology (indices) ===
    /// Adjacent Corner indices (connected by a border).
    pub adjacent: Vec<usize>,
    /// Tile indices this corner touches.
    pub touches: Vec<usize>,
    /// Border indices meeting at this corner.
    pub borders: Vec<usize>,

    // === Flags ===
    /// True if this corner lies on the map edge.
    pub frontier: bool,
    /// True if this corner sits on a land/sea boundary.
    pub coast: bool,
    /// True if a river flows through this corner.
    pub river: bool,
    /// True if this corner sits on a highland/walkable boundary.
    pub wall: bool,
    /// Height of the drainage tree above this corner: 0 at source tips,
    /// greatest at the mouth. Valid only if `river`.
    pub depth: u32,
}

impl Corner {
    pub fn new(index: usize, position: Point) -> Self {
        Self {
            index,
            position,
            ..Default::default()
        }
    }
}

/// An edge between exactly two corners, nominally separating two tiles.
/// On the outer boundary both tile references alias the single adjoining
/// tile and the border is flagged `frontier`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    /// Index in the borders array.
    pub index: usize,
    /// The two endpoint corners, always distinct.
    pub corners: [usize; 2],
    /// The two separated tiles (aliased on frontier borders).
    pub tiles: [usize; 2],

    /// True if this border lies along the map edge.
    pub frontier: bool,
    /// True if exactly one of the two tiles is land.
    pub coast: bool,
    /// True if a river runs along this border.
    pub river: bool,
    /// True if this border separates highland from walkable land.
    pub wall: bool,
}

impl Border {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            corners: [NONE, NONE],
            tiles: [NONE, NONE],
            frontier: false,
            coast: false,
            river: false,
            wall: false,
        }
    }

    /// The tile on the other side of the border, or the same tile on a
    /// frontier border.
    #[inline]
    pub fn other_tile(&self, tile: usize) -> usize {
        if self.tiles[0] == tile {
            self.tiles[1]
        } else {
            self.tiles[0]
        }
    }

    /// The corner at the other end of the border.
    #[inline]
    pub fn other_corner(&self, corner: usize) -> usize {
        if self.corners[0] == corner {
            self.corners[1]
        } else {
            self.corners[0]
        }
    }
}

/// A settlement's territory: a contiguous set of claimed tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Numeric ID, equal to the index in `World::holdings`.
    pub id: u32,
    /// The settlement tile this holding grew from.
    pub center: usize,
    /// Member tile indices, always containing `center`.
    pub lands: Vec<usize>,
    /// Neighboring holding IDs, undirected and deduplicated.
    pub neighbors: Vec<u32>,
}

impl Holding {
    pub fn new(id: u32, center: usize) -> Self {
        Self {
            id,
            center,
            lands: Vec::new(),
            neighbors: Vec::new(),
        }
    }
}

/// Structural error found while validating a (possibly reloaded) world.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("{entity} {index} references out-of-range {field} index {value}")]
    IndexOutOfRange {
        entity: &'static str,
        index: usize,
        field: &'static str,
        value: usize,
    },
    #[error("border {0} has coincident corners")]
    DegenerateBorder(usize),
    #[error("border {border} corner {corner} is not listed by tile {tile}")]
    DetachedBorderCorner {
        border: usize,
        corner: usize,
        tile: usize,
    },
    #[error("holding {0} does not contain its own center tile")]
    HoldingMissingCenter(u32),
}

/// The complete world graph. All cross references are usize indices into
/// the flat entity arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct World {
    /// Generation area.
    pub bounds: BoundingBox,
    /// All tiles (Voronoi cells / regions).
    pub tiles: Vec<Tile>,
    /// All corners (Voronoi vertices).
    pub corners: Vec<Corner>,
    /// All borders (Voronoi edges).
    pub borders: Vec<Border>,
    /// All holdings, indexed by their ID.
    pub holdings: Vec<Holding>,
}

impl World {
    pub fn new(bounds: BoundingBox) -> Self {
        Self {
            bounds,
            tiles: Vec::new(),
            corners: Vec::new(),
            borders: Vec::new(),
            holdings: Vec::new(),
        }
    }

    // === Accessors ===

    /// Get a tile by index.
    #[inline]
    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    /// Get a corner by index.
    #[inline]
    pub fn corner(&self, index: usize) -> Option<&Corner> {
        self.corners.get(index)
    }

    /// Get a border by index.
    #[inline]
    pub fn border(&self, index: usize) -> Option<&Border> {
        self.borders.get(index)
    }

    /// Iterate over land tiles.
    pub fn land_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.land)
    }

    // === Structural validation ===

    /// Validate every cross reference and the border/corner membership
    /// invariant. Run after deserialization before the graph is used.
    pub fn validate(&self) -> Result<(), WorldError> {
        let nt = self.tiles.len();
        let nc = self.corners.len();
        let nb = self.borders.len();

        let check = |entity: &'static str,
                     index: usize,
                     field: &'static str,
                     value: usize,
                     limit: usize|
         -> Result<(), WorldError> {
            if value >= limit {
                return Err(WorldError::IndexOutOfRange {
                    entity,
                    index,
                    field,
                    value,
                });
            }
            Ok(())
        };

        for tile in &self.tiles {
            for &n in &tile.neighbors {
                check("tile", tile.index, "neighbor", n, nt)?;
            }
            for &c in &tile.corners {
                check("tile", tile.index, "corner", c, nc)?;
            }
            for &b in &tile.borders {
                check("tile", tile.index, "border", b, nb)?;
            }
            if tile.holding != NONE {
                check("tile", tile.index, "holding", tile.holding, self.holdings.len())?;
            }
        }

        for corner in &self.corners {
            for &a in &corner.adjacent {
                check("corner", corner.index, "adjacent", a, nc)?;
            }
            for &t in &corner.touches {
                check("corner", corner.index, "touches", t, nt)?;
            }
            for &b in &corner.borders {
                check("corner", corner.index, "border", b, nb)?;
            }
        }

        for border in &self.borders {
            for &c in &border.corners {
                check("border", border.index, "corner", c, nc)?;
            }
            for &t in &border.tiles {
                check("border", border.index, "tile", t, nt)?;
            }
            if border.corners[0] == border.corners[1] {
                return Err(WorldError::DegenerateBorder(border.index));
            }
            // Both endpoint corners must be listed by both adjoining tiles.
            for &t in &border.tiles {
                for &c in &border.corners {
                    if !self.tiles[t].corners.contains(&c) {
                        return Err(WorldError::DetachedBorderCorner {
                            border: border.index,
                            corner: c,
                            tile: t,
                        });
                    }
                }
            }
        }

        for holding in &self.holdings {
            check("holding", holding.id as usize, "center", holding.center, nt)?;
            for &t in &holding.lands {
                check("holding", holding.id as usize, "land", t, nt)?;
            }
            if !holding.lands.contains(&holding.center) {
                return Err(WorldError::HoldingMissingCenter(holding.id));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tile_world() -> World {
        // Two tiles sharing one border with two corners, plus the closing
        // frontier borders left out for brevity.
        let mut world = World::new(BoundingBox::new(0.0, 0.0, 2.0, 1.0));

        let mut t0 = Tile::new(0, Point::new(0.5, 0.5));
        let mut t1 = Tile::new(1, Point::new(1.5, 0.5));
        t0.neighbors.push(1);
        t1.neighbors.push(0);
        t0.corners.extend([0, 1]);
        t1.corners.extend([0, 1]);
        t0.borders.push(0);
        t1.borders.push(0);

        let mut c0 = Corner::new(0, Point::new(1.0, 0.0));
        let mut c1 = Corner::new(1, Point::new(1.0, 1.0));
        c0.adjacent.push(1);
        c1.adjacent.push(0);
        c0.touches.extend([0, 1]);
        c1.touches.extend([0, 1]);
        c0.borders.push(0);
        c1.borders.push(0);

        let mut b = Border::new(0);
        b.corners = [0, 1];
        b.tiles = [0, 1];

        world.tiles = vec![t0, t1];
        world.corners = vec![c0, c1];
        world.borders = vec![b];
        world
    }

    #[test]
    fn test_validate_accepts_consistent_world() {
        let world = two_tile_world();
        assert!(world.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_neighbor() {
        let mut world = two_tile_world();
        world.tiles[0].neighbors.push(99);
        assert!(matches!(
            world.validate(),
            Err(WorldError::IndexOutOfRange { field: "neighbor", value: 99, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_degenerate_border() {
        let mut world = two_tile_world();
        world.borders[0].corners = [0, 0];
        assert!(matches!(world.validate(), Err(WorldError::DegenerateBorder(0))));
    }

    #[test]
    fn test_validate_rejects_holding_without_center() {
        let mut world = two_tile_world();
        world.holdings.push(Holding::new(0, 1));
        assert!(matches!(
            world.validate(),
            Err(WorldError::HoldingMissingCenter(0))
        ));
    }

    #[test]
    fn test_border_other_tile_aliases_on_frontier() {
        let mut b = Border::new(0);
        b.tiles = [3, 3];
        assert_eq!(b.other_tile(3), 3);
    }
}
