//! Game board representation: resource kinds, tiles, ports and the standard layout.
//!
//! This module contains:
//! - Resource types
//! - Tile types and the fixed 19-hex grid
//! - Ports (generic 3:1 and specific 2:1)
//! - Deterministic board generation from a seed
//! - Land queries used by placement validation

use crate::hex::{EdgeCoord, EdgeDirection, HexCoord, VertexCoord};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Player identifier (seat index, 0-3)
pub type PlayerId = u8;

/// Tile identifier (index into the board's tile list)
pub type TileId = u8;

/// Resource types produced by tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Resource {
    Brick,
    Wood,
    Sheep,
    Wheat,
    Ore,
}

impl Resource {
    /// All resource types
    pub const ALL: [Resource; 5] = [
        Resource::Brick,
        Resource::Wood,
        Resource::Sheep,
        Resource::Wheat,
        Resource::Ore,
    ];

    /// Lowercase display name
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Brick => "brick",
            Resource::Wood => "wood",
            Resource::Sheep => "sheep",
            Resource::Wheat => "wheat",
            Resource::Ore => "ore",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type of hex tile on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileType {
    /// Produces a resource when its number is rolled
    Resource(Resource),
    /// No production; the robber starts here
    Desert,
}

/// Port types for maritime trading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortKind {
    /// 3:1 trade any resource
    Generic,
    /// 2:1 trade for a specific resource
    Specific(Resource),
}

impl PortKind {
    /// The exchange rate for this port
    pub fn rate(&self) -> u32 {
        match self {
            PortKind::Generic => 3,
            PortKind::Specific(_) => 2,
        }
    }

    /// Whether this port improves trades giving `resource`
    pub fn applies_to(&self, resource: Resource) -> bool {
        match self {
            PortKind::Generic => true,
            PortKind::Specific(kind) => *kind == resource,
        }
    }
}

/// A single hex tile on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    /// Position on the hex grid
    pub coord: HexCoord,
    pub tile_type: TileType,
    /// Dice number that triggers production (2-12, None for the desert)
    pub production_number: Option<u8>,
    /// Whether the robber is currently on this tile
    pub has_robber: bool,
}

impl Tile {
    /// Get the resource this tile produces, if any
    pub fn resource(&self) -> Option<Resource> {
        match self.tile_type {
            TileType::Resource(r) => Some(r),
            TileType::Desert => None,
        }
    }

    /// Whether a roll of `roll` makes this tile produce
    pub fn produces_on(&self, roll: u8) -> bool {
        self.production_number == Some(roll) && !self.has_robber && self.resource().is_some()
    }
}

/// A port on a coastal edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub id: u8,
    pub kind: PortKind,
    /// Land hex the port edge belongs to
    pub hex: HexCoord,
    pub edge_direction: EdgeDirection,
    /// The two vertices that grant access to this port
    pub vertices: [VertexCoord; 2],
}

impl Port {
    /// The coastal edge this port sits on
    pub fn edge(&self) -> EdgeCoord {
        EdgeCoord::new(self.hex, self.edge_direction)
    }

    /// Whether a building at `vertex` can use this port
    pub fn touches(&self, vertex: &VertexCoord) -> bool {
        self.vertices.contains(vertex)
    }
}

/// Standard board: center, ring 1 and ring 2
pub const STANDARD_LAYOUT: [HexCoord; 19] = [
    HexCoord::new(0, 0),
    HexCoord::new(1, 0),
    HexCoord::new(1, -1),
    HexCoord::new(0, -1),
    HexCoord::new(-1, 0),
    HexCoord::new(-1, 1),
    HexCoord::new(0, 1),
    HexCoord::new(2, 0),
    HexCoord::new(2, -1),
    HexCoord::new(2, -2),
    HexCoord::new(1, -2),
    HexCoord::new(0, -2),
    HexCoord::new(-1, -1),
    HexCoord::new(-2, 0),
    HexCoord::new(-2, 1),
    HexCoord::new(-2, 2),
    HexCoord::new(-1, 2),
    HexCoord::new(0, 2),
    HexCoord::new(1, 1),
];

/// Coastal edges carrying a port, walking the perimeter
pub const PORT_LOCATIONS: [(HexCoord, EdgeDirection); 9] = [
    (HexCoord::new(0, -2), EdgeDirection::NorthWest),
    (HexCoord::new(1, -2), EdgeDirection::NorthEast),
    (HexCoord::new(2, -1), EdgeDirection::East),
    (HexCoord::new(2, 0), EdgeDirection::SouthEast),
    (HexCoord::new(1, 1), EdgeDirection::SouthEast),
    (HexCoord::new(-1, 2), EdgeDirection::SouthWest),
    (HexCoord::new(-2, 2), EdgeDirection::West),
    (HexCoord::new(-2, 0), EdgeDirection::West),
    (HexCoord::new(-1, -1), EdgeDirection::NorthWest),
];

const TERRAIN: [TileType; 19] = [
    TileType::Desert,
    TileType::Resource(Resource::Brick),
    TileType::Resource(Resource::Brick),
    TileType::Resource(Resource::Brick),
    TileType::Resource(Resource::Ore),
    TileType::Resource(Resource::Ore),
    TileType::Resource(Resource::Ore),
    TileType::Resource(Resource::Wood),
    TileType::Resource(Resource::Wood),
    TileType::Resource(Resource::Wood),
    TileType::Resource(Resource::Wood),
    TileType::Resource(Resource::Sheep),
    TileType::Resource(Resource::Sheep),
    TileType::Resource(Resource::Sheep),
    TileType::Resource(Resource::Sheep),
    TileType::Resource(Resource::Wheat),
    TileType::Resource(Resource::Wheat),
    TileType::Resource(Resource::Wheat),
    TileType::Resource(Resource::Wheat),
];

const PRODUCTION_NUMBERS: [u8; 18] = [2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12];

const PORT_KINDS: [PortKind; 9] = [
    PortKind::Generic,
    PortKind::Generic,
    PortKind::Generic,
    PortKind::Generic,
    PortKind::Specific(Resource::Brick),
    PortKind::Specific(Resource::Wood),
    PortKind::Specific(Resource::Sheep),
    PortKind::Specific(Resource::Wheat),
    PortKind::Specific(Resource::Ore),
];

/// The complete game board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    tiles: Vec<Tile>,
    ports: Vec<Port>,
    robber: TileId,
}

impl Board {
    /// Generate the standard board deterministically from `seed`
    pub fn generate(player_count: usize, seed: u64) -> Self {
        debug!(player_count, seed, "generating standard board");
        let mut rng = StdRng::seed_from_u64(seed);
        Self::generate_with_rng(&mut rng)
    }

    /// Generate the standard board with a provided RNG.
    ///
    /// Terrain, production numbers and port kinds are each shuffled once; numbers are
    /// dealt to non-desert tiles in layout order.
    pub fn generate_with_rng<R: Rng>(rng: &mut R) -> Self {
        let mut terrain = TERRAIN.to_vec();
        terrain.shuffle(rng);

        let mut numbers = PRODUCTION_NUMBERS.to_vec();
        numbers.shuffle(rng);
        let mut numbers = numbers.into_iter();

        let mut robber = 0;
        let mut tiles = Vec::with_capacity(STANDARD_LAYOUT.len());
        for (index, (coord, tile_type)) in STANDARD_LAYOUT.iter().zip(terrain).enumerate() {
            let id = index as TileId;
            let production_number = match tile_type {
                TileType::Desert => {
                    robber = id;
                    None
                }
                TileType::Resource(_) => numbers.next(),
            };
            tiles.push(Tile {
                id,
                coord: *coord,
                tile_type,
                production_number,
                has_robber: tile_type == TileType::Desert,
            });
        }

        let mut kinds = PORT_KINDS.to_vec();
        kinds.shuffle(rng);
        let ports = PORT_LOCATIONS
            .iter()
            .zip(kinds)
            .enumerate()
            .map(|(index, (&(hex, edge_direction), kind))| Port {
                id: index as u8,
                kind,
                hex,
                edge_direction,
                vertices: EdgeCoord::new(hex, edge_direction).endpoints(),
            })
            .collect();

        Self { tiles, ports, robber }
    }

    // ==================== Query Methods ====================

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Get a tile by id
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id as usize)
    }

    /// Get a tile by coordinate
    pub fn tile_at(&self, coord: &HexCoord) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.coord == *coord)
    }

    /// The desert tile
    pub fn desert(&self) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.tile_type == TileType::Desert)
    }

    /// Tile currently holding the robber
    pub fn robber_tile(&self) -> TileId {
        self.robber
    }

    pub fn is_land(&self, coord: &HexCoord) -> bool {
        self.tile_at(coord).is_some()
    }

    /// A vertex is on the board if at least one touching hex is land
    pub fn is_land_vertex(&self, vertex: &VertexCoord) -> bool {
        vertex.touching_hexes().iter().any(|h| self.is_land(h))
    }

    /// An edge is on the board if at least one touching hex is land
    pub fn is_land_edge(&self, edge: &EdgeCoord) -> bool {
        edge.touching_hexes().iter().any(|h| self.is_land(h))
    }

    /// Land tiles touching a vertex
    pub fn tiles_at_vertex<'a>(&'a self, vertex: &VertexCoord) -> impl Iterator<Item = &'a Tile> {
        let hexes = vertex.touching_hexes();
        self.tiles.iter().filter(move |t| hexes.contains(&t.coord))
    }

    /// Every distinct land vertex, in layout order
    pub fn vertices(&self) -> Vec<VertexCoord> {
        let mut seen = HashSet::new();
        self.tiles
            .iter()
            .flat_map(|t| t.coord.vertices())
            .filter(|v| seen.insert(v.key()))
            .collect()
    }

    /// Every distinct land edge, in layout order
    pub fn edges(&self) -> Vec<EdgeCoord> {
        let mut seen = HashSet::new();
        self.tiles
            .iter()
            .flat_map(|t| t.coord.edges())
            .filter(|e| seen.insert(e.key()))
            .collect()
    }

    // ==================== Mutation Methods ====================

    /// Move the robber onto `tile`; unknown ids are ignored
    pub(crate) fn move_robber(&mut self, tile: TileId) {
        if self.tile(tile).is_none() {
            return;
        }
        for t in &mut self.tiles {
            t.has_robber = t.id == tile;
        }
        self.robber = tile;
    }
}
