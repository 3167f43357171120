//! Hex coordinate system using axial coordinates (q, r).
//!
//! This module provides the foundational coordinate types for the hex-based game board:
//! - `HexCoord`: Identifies individual hex tiles
//! - `VertexCoord`: Identifies vertices (corners) where settlements/cities are placed
//! - `EdgeCoord`: Identifies edges where roads are placed
//!
//! A vertex can be written from any of the (up to) three hexes that touch it, and an
//! edge from either of its two hexes. Equality, hashing and ordering of `VertexCoord`
//! and `EdgeCoord` therefore go through canonical keys (`VertexKey`, `EdgeKey`) so
//! that every encoding of the same physical corner or side compares equal.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Direction of an edge (and of the neighbor across it), clockwise from NorthEast.
///
/// The order matches the cube offsets
/// `(1,-1,0), (1,0,-1), (0,1,-1), (-1,1,0), (-1,0,1), (0,-1,1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeDirection {
    /// Northeast edge (top-right)
    NorthEast,
    /// East edge (right)
    East,
    /// Southeast edge (bottom-right)
    SouthEast,
    /// Southwest edge (bottom-left)
    SouthWest,
    /// West edge (left)
    West,
    /// Northwest edge (top-left)
    NorthWest,
}

impl EdgeDirection {
    /// All edge directions in clockwise order starting from NorthEast
    pub const ALL: [EdgeDirection; 6] = [
        EdgeDirection::NorthEast,
        EdgeDirection::East,
        EdgeDirection::SouthEast,
        EdgeDirection::SouthWest,
        EdgeDirection::West,
        EdgeDirection::NorthWest,
    ];

    /// Position in [`EdgeDirection::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction at `index`, wrapping modulo 6
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 6]
    }

    /// Rotate clockwise by `steps` sixths of a turn
    pub const fn rotate(self, steps: usize) -> Self {
        Self::from_index(self.index() + steps)
    }

    /// The direction pointing back across this edge
    pub const fn opposite(self) -> Self {
        self.rotate(3)
    }

    /// Axial (dq, dr) offset of the neighbor in this direction
    const fn offset(self) -> (i32, i32) {
        match self {
            EdgeDirection::NorthEast => (1, -1),
            EdgeDirection::East => (1, 0),
            EdgeDirection::SouthEast => (0, 1),
            EdgeDirection::SouthWest => (-1, 1),
            EdgeDirection::West => (-1, 0),
            EdgeDirection::NorthWest => (0, -1),
        }
    }
}

/// Corner of a hex, clockwise from NorthEast.
///
/// Corner `d` sits between edge `d` and edge `d + 1`, so `NorthEast` is the corner
/// between the NorthEast and East edges and `North` closes the ring between the
/// NorthWest and NorthEast edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexDirection {
    NorthEast,
    SouthEast,
    South,
    SouthWest,
    NorthWest,
    North,
}

impl VertexDirection {
    /// All corners in clockwise order starting from NorthEast
    pub const ALL: [VertexDirection; 6] = [
        VertexDirection::NorthEast,
        VertexDirection::SouthEast,
        VertexDirection::South,
        VertexDirection::SouthWest,
        VertexDirection::NorthWest,
        VertexDirection::North,
    ];

    /// Position in [`VertexDirection::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Corner at `index`, wrapping modulo 6
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 6]
    }

    /// Rotate clockwise by `steps` sixths of a turn
    pub const fn rotate(self, steps: usize) -> Self {
        Self::from_index(self.index() + steps)
    }

    /// The two edges meeting at this corner, in clockwise order
    pub const fn edges(self) -> (EdgeDirection, EdgeDirection) {
        (
            EdgeDirection::from_index(self.index()),
            EdgeDirection::from_index(self.index() + 1),
        )
    }
}

/// Axial coordinate for hex grid.
///
/// In axial coordinates:
/// - `q` increases going east (right)
/// - `r` increases going southeast
/// - The third coordinate `s` (not stored) satisfies: q + r + s = 0
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct HexCoord {
    /// Column (increases going east)
    pub q: i32,
    /// Row (increases going southeast)
    pub r: i32,
}

impl HexCoord {
    /// Create a new hex coordinate
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Build from cube coordinates, rejecting triples with `q + r + s != 0`
    pub const fn from_cube(q: i32, r: i32, s: i32) -> Option<Self> {
        if q + r + s == 0 {
            Some(Self::new(q, r))
        } else {
            None
        }
    }

    /// The implicit third coordinate (s = -q - r)
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// The six neighboring hexes in clockwise order starting from NorthEast
    pub fn neighbors(&self) -> [HexCoord; 6] {
        EdgeDirection::ALL.map(|dir| self.neighbor(dir))
    }

    /// Get the neighbor in a specific direction
    pub const fn neighbor(&self, direction: EdgeDirection) -> HexCoord {
        let (dq, dr) = direction.offset();
        HexCoord::new(self.q + dq, self.r + dr)
    }

    /// Distance to another hex (in hex steps): `max(|dq|, |dr|, |ds|)`
    pub fn distance_to(&self, other: &HexCoord) -> u32 {
        let dq = (self.q - other.q).unsigned_abs();
        let dr = (self.r - other.r).unsigned_abs();
        let ds = (self.s() - other.s()).unsigned_abs();
        dq.max(dr).max(ds)
    }

    /// Get all six corners of this hex
    pub fn vertices(&self) -> [VertexCoord; 6] {
        VertexDirection::ALL.map(|dir| VertexCoord::new(*self, dir))
    }

    /// Get all six edges of this hex
    pub fn edges(&self) -> [EdgeCoord; 6] {
        EdgeDirection::ALL.map(|dir| EdgeCoord::new(*self, dir))
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.q, self.r, self.s())
    }
}

/// Distance between two hexes; see [`HexCoord::distance_to`]
pub fn hex_distance(a: &HexCoord, b: &HexCoord) -> u32 {
    a.distance_to(b)
}

/// Canonical identity of a vertex: its three touching hexes sorted by `(q, r, s)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexKey([HexCoord; 3]);

impl VertexKey {
    /// The sorted hexes touching this vertex
    pub fn hexes(&self) -> &[HexCoord; 3] {
        &self.0
    }
}

impl fmt::Display for VertexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = &self.0;
        write!(f, "{a}{b}{c}")
    }
}

/// Canonical key for the vertex at `direction` of `hex`
pub fn vertex_key(hex: HexCoord, direction: VertexDirection) -> VertexKey {
    VertexCoord::new(hex, direction).key()
}

/// Canonical identity of an edge: the sorted keys of its two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey([VertexKey; 2]);

impl EdgeKey {
    /// Key of the edge joining two vertices, independent of argument order
    pub fn from_vertices(a: VertexKey, b: VertexKey) -> Self {
        if a <= b {
            Self([a, b])
        } else {
            Self([b, a])
        }
    }

    /// The endpoint keys, smaller first
    pub fn vertices(&self) -> &[VertexKey; 2] {
        &self.0
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0[0], self.0[1])
    }
}

/// Canonical key for the edge between two vertex keys
pub fn edge_key(a: VertexKey, b: VertexKey) -> EdgeKey {
    EdgeKey::from_vertices(a, b)
}

/// Vertex coordinate - identifies a corner where up to 3 hexes meet.
///
/// Vertices are where settlements and cities are built. The stored `(hex, direction)`
/// is just one of three equivalent encodings; comparisons use [`VertexCoord::key`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VertexCoord {
    /// The hex this vertex is described from
    pub hex: HexCoord,
    /// Which corner of that hex
    pub direction: VertexDirection,
}

impl VertexCoord {
    /// Create a new vertex coordinate
    pub const fn new(hex: HexCoord, direction: VertexDirection) -> Self {
        Self { hex, direction }
    }

    /// Get the 3 hexes that touch this vertex
    pub fn touching_hexes(&self) -> [HexCoord; 3] {
        let (before, after) = self.direction.edges();
        [self.hex, self.hex.neighbor(before), self.hex.neighbor(after)]
    }

    /// Canonical key shared by every encoding of this vertex
    pub fn key(&self) -> VertexKey {
        let mut hexes = self.touching_hexes();
        hexes.sort();
        VertexKey(hexes)
    }

    /// The three `(hex, direction)` encodings of this vertex, starting with `self`
    pub fn equivalents(&self) -> [VertexCoord; 3] {
        let (before, after) = self.direction.edges();
        [
            *self,
            VertexCoord::new(self.hex.neighbor(before), self.direction.rotate(2)),
            VertexCoord::new(self.hex.neighbor(after), self.direction.rotate(4)),
        ]
    }

    /// The encoding with the smallest `(hex, direction)`; stable across encodings
    pub fn canonical(&self) -> VertexCoord {
        let mut best = *self;
        for candidate in self.equivalents() {
            if (candidate.hex, candidate.direction.index()) < (best.hex, best.direction.index()) {
                best = candidate;
            }
        }
        best
    }

    /// Get the 3 edges that meet at this vertex
    pub fn touching_edges(&self) -> [EdgeCoord; 3] {
        let (before, after) = self.direction.edges();
        [
            EdgeCoord::new(self.hex, before),
            EdgeCoord::new(self.hex, after),
            EdgeCoord::new(self.hex.neighbor(before), before.rotate(2)),
        ]
    }

    /// Get the 3 vertices one edge away
    pub fn adjacent_vertices(&self) -> [VertexCoord; 3] {
        let (before, _) = self.direction.edges();
        [
            VertexCoord::new(self.hex, self.direction.rotate(5)),
            VertexCoord::new(self.hex, self.direction.rotate(1)),
            VertexCoord::new(self.hex.neighbor(before), self.direction.rotate(1)),
        ]
    }

    /// Number of edges on the shortest path between two vertices.
    ///
    /// Breadth-first search over the (unbounded, connected) vertex lattice.
    pub fn distance_to(&self, other: &VertexCoord) -> u32 {
        self.search(other, None).unwrap_or(u32::MAX)
    }

    /// Whether `other` is at most `steps` edges away
    pub fn is_within(&self, other: &VertexCoord, steps: u32) -> bool {
        self.search(other, Some(steps)).is_some()
    }

    fn search(&self, other: &VertexCoord, limit: Option<u32>) -> Option<u32> {
        let target = other.key();
        let mut seen = HashSet::from([self.key()]);
        let mut frontier = VecDeque::from([(*self, 0u32)]);

        while let Some((vertex, steps)) = frontier.pop_front() {
            if vertex.key() == target {
                return Some(steps);
            }
            if limit.is_some_and(|limit| steps >= limit) {
                continue;
            }
            for next in vertex.adjacent_vertices() {
                if seen.insert(next.key()) {
                    frontier.push_back((next, steps + 1));
                }
            }
        }
        None
    }
}

impl PartialEq for VertexCoord {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for VertexCoord {}

impl Hash for VertexCoord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for VertexCoord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VertexCoord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Edge coordinate - identifies a side of a hex where roads are built.
///
/// Each edge can be written from either of its 2 hexes; comparisons use
/// [`EdgeCoord::key`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EdgeCoord {
    /// The hex this edge is described from
    pub hex: HexCoord,
    /// Which edge of that hex
    pub direction: EdgeDirection,
}

impl EdgeCoord {
    /// Create a new edge coordinate
    pub const fn new(hex: HexCoord, direction: EdgeDirection) -> Self {
        Self { hex, direction }
    }

    /// Canonical key shared by both encodings of this edge
    pub fn key(&self) -> EdgeKey {
        let [a, b] = self.endpoints();
        EdgeKey::from_vertices(a.key(), b.key())
    }

    /// The two `(hex, direction)` encodings of this edge, starting with `self`
    pub fn equivalents(&self) -> [EdgeCoord; 2] {
        [
            *self,
            EdgeCoord::new(self.hex.neighbor(self.direction), self.direction.opposite()),
        ]
    }

    /// Get the 2 hexes that share this edge
    pub fn touching_hexes(&self) -> [HexCoord; 2] {
        [self.hex, self.hex.neighbor(self.direction)]
    }

    /// Get the 2 vertices at the endpoints of this edge
    pub fn endpoints(&self) -> [VertexCoord; 2] {
        let index = self.direction.index();
        [
            VertexCoord::new(self.hex, VertexDirection::from_index(index + 5)),
            VertexCoord::new(self.hex, VertexDirection::from_index(index)),
        ]
    }

    /// Get edges that share a vertex with this edge (for road connectivity)
    pub fn adjacent_edges(&self) -> Vec<EdgeCoord> {
        let mut adjacent = Vec::with_capacity(4);
        for vertex in self.endpoints() {
            for edge in vertex.touching_edges() {
                if edge != *self && !adjacent.contains(&edge) {
                    adjacent.push(edge);
                }
            }
        }
        adjacent
    }
}

impl PartialEq for EdgeCoord {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for EdgeCoord {}

impl Hash for EdgeCoord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for EdgeCoord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EdgeCoord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}
