//! Building registry: settlements, cities and roads, and where they may go.
//!
//! Structures live in one list on [`GameState`]; a structure's id is its position in
//! that list and never changes, including when a settlement becomes a city.

use crate::actions::GameEvent;
use crate::board::PlayerId;
use crate::game::{GameError, GamePhase, GameState, SetupPlacing, TurnStep};
use crate::hex::{EdgeCoord, VertexCoord};
use crate::ledger::{costs, ResourceHand};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

pub const MAX_SETTLEMENTS: u32 = 5;
pub const MAX_CITIES: u32 = 4;
pub const MAX_ROADS: u32 = 15;

/// Settlements and cities must be at least this many edges apart
pub const SETTLEMENT_SPACING: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StructureId(pub u32);

impl fmt::Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    Settlement,
    City,
    Road,
}

impl StructureKind {
    pub const fn victory_points(self) -> u32 {
        match self {
            StructureKind::Settlement => 1,
            StructureKind::City => 2,
            StructureKind::Road => 0,
        }
    }

    /// Cards received per adjacent producing tile
    pub const fn production_multiplier(self) -> u32 {
        match self {
            StructureKind::Settlement => 1,
            StructureKind::City => 2,
            StructureKind::Road => 0,
        }
    }

    pub const fn piece_limit(self) -> u32 {
        match self {
            StructureKind::Settlement => MAX_SETTLEMENTS,
            StructureKind::City => MAX_CITIES,
            StructureKind::Road => MAX_ROADS,
        }
    }

    pub const fn cost(self) -> ResourceHand {
        match self {
            StructureKind::Settlement => costs::SETTLEMENT,
            StructureKind::City => costs::CITY,
            StructureKind::Road => costs::ROAD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    Vertex(VertexCoord),
    Edge(EdgeCoord),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub id: StructureId,
    pub kind: StructureKind,
    pub owner: PlayerId,
    pub location: Location,
}

impl Structure {
    pub fn vertex(&self) -> Option<VertexCoord> {
        match self.location {
            Location::Vertex(v) => Some(v),
            Location::Edge(_) => None,
        }
    }

    pub fn edge(&self) -> Option<EdgeCoord> {
        match self.location {
            Location::Edge(e) => Some(e),
            Location::Vertex(_) => None,
        }
    }

    /// Settlements and cities
    pub fn is_building(&self) -> bool {
        matches!(self.kind, StructureKind::Settlement | StructureKind::City)
    }
}

/// A place a player could build right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildSite {
    Vertex(VertexCoord),
    Edge(EdgeCoord),
    Upgrade(StructureId),
}

/// How a road is being paid for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoadMode {
    Setup,
    Paid,
    Free,
}

impl GameState {
    // ==================== Registry Queries ====================

    pub fn structure(&self, id: StructureId) -> Option<&Structure> {
        self.structures.iter().find(|s| s.id == id)
    }

    pub fn structures_of(&self, player: PlayerId) -> impl Iterator<Item = &Structure> {
        self.structures.iter().filter(move |s| s.owner == player)
    }

    /// Every settlement and city on the board
    pub fn buildings(&self) -> impl Iterator<Item = &Structure> {
        self.structures.iter().filter(|s| s.is_building())
    }

    /// Settlement or city at a vertex, by canonical key
    pub fn building_at(&self, vertex: &VertexCoord) -> Option<&Structure> {
        self.buildings().find(|s| s.vertex().as_ref() == Some(vertex))
    }

    /// Road on an edge, by canonical key
    pub fn road_at(&self, edge: &EdgeCoord) -> Option<&Structure> {
        self.structures.iter().find(|s| s.edge().as_ref() == Some(edge))
    }

    /// Pieces of `kind` the player has not yet put on the board
    pub fn pieces_remaining(&self, player: PlayerId, kind: StructureKind) -> u32 {
        let placed = self.structures_of(player).filter(|s| s.kind == kind).count() as u32;
        kind.piece_limit().saturating_sub(placed)
    }

    pub(crate) fn push_structure(&mut self, owner: PlayerId, kind: StructureKind, location: Location) -> StructureId {
        let id = StructureId(self.structures.len() as u32);
        self.structures.push(Structure {
            id,
            kind,
            owner,
            location,
        });
        id
    }

    // ==================== Validation ====================

    pub(crate) fn check_settlement_site(
        &self,
        player: PlayerId,
        vertex: &VertexCoord,
        setup: bool,
    ) -> Result<(), GameError> {
        if !self.board.is_land_vertex(vertex) {
            return Err(GameError::OffBoard);
        }
        let crowded = self
            .buildings()
            .filter_map(Structure::vertex)
            .any(|other| other.is_within(vertex, SETTLEMENT_SPACING - 1));
        if crowded {
            return Err(GameError::TooClose);
        }
        if !setup && !self.has_road_at(player, vertex) {
            return Err(GameError::Disconnected);
        }
        Ok(())
    }

    fn has_road_at(&self, player: PlayerId, vertex: &VertexCoord) -> bool {
        vertex
            .touching_edges()
            .iter()
            .any(|edge| self.road_at(edge).is_some_and(|r| r.owner == player))
    }

    /// During setup the road must touch the settlement placed this turn
    pub(crate) fn check_road_site(
        &self,
        player: PlayerId,
        edge: &EdgeCoord,
        setup: bool,
    ) -> Result<(), GameError> {
        if !self.board.is_land_edge(edge) {
            return Err(GameError::OffBoard);
        }
        if self.road_at(edge).is_some() {
            return Err(GameError::Occupied);
        }

        let connected = if setup {
            self.setup_settlement
                .is_some_and(|settlement| edge.endpoints().contains(&settlement))
        } else {
            self.connects_to_network(player, edge)
        };
        if !connected {
            return Err(GameError::Disconnected);
        }
        Ok(())
    }

    /// Connected if an endpoint holds our building, or holds no opponent building and
    /// meets another of our roads
    fn connects_to_network(&self, player: PlayerId, edge: &EdgeCoord) -> bool {
        edge.endpoints().iter().any(|endpoint| match self.building_at(endpoint) {
            Some(building) => building.owner == player,
            None => endpoint
                .touching_edges()
                .iter()
                .filter(|other| *other != edge)
                .any(|other| self.road_at(other).is_some_and(|r| r.owner == player)),
        })
    }

    // ==================== Placement Moves ====================

    pub(crate) fn place_settlement(
        &mut self,
        player: PlayerId,
        vertex: VertexCoord,
    ) -> Result<Vec<GameEvent>, GameError> {
        let setup = match &self.phase {
            GamePhase::Setup1 {
                placing: SetupPlacing::Settlement,
            }
            | GamePhase::Setup2 {
                placing: SetupPlacing::Settlement,
            } => true,
            GamePhase::Main {
                step: TurnStep::Build,
            } => false,
            _ => return Err(GameError::InvalidPhase),
        };

        self.check_settlement_site(player, &vertex, setup)?;
        if self.pieces_remaining(player, StructureKind::Settlement) == 0 {
            return Err(GameError::PieceExhausted);
        }
        if !setup {
            self.pay_bank(player, &costs::SETTLEMENT)?;
        }

        let structure = self.push_structure(player, StructureKind::Settlement, Location::Vertex(vertex));
        self.player_mut(player)?.victory_points += 1;
        debug!(player, %structure, vertex = %vertex.key(), "settlement built");

        let mut events = vec![GameEvent::SettlementBuilt {
            player,
            structure,
            location: vertex,
        }];

        match self.phase {
            GamePhase::Setup1 { .. } => {
                self.setup_settlement = Some(vertex);
                self.phase = GamePhase::Setup1 {
                    placing: SetupPlacing::Road,
                };
            }
            GamePhase::Setup2 { .. } => {
                events.extend(self.grant_starting_resources(player, &vertex)?);
                self.setup_settlement = Some(vertex);
                self.phase = GamePhase::Setup2 {
                    placing: SetupPlacing::Road,
                };
            }
            // A new settlement may split an opponent's road
            _ => events.extend(self.update_longest_road()),
        }

        Ok(events)
    }

    pub(crate) fn place_road(&mut self, player: PlayerId, edge: EdgeCoord) -> Result<Vec<GameEvent>, GameError> {
        let mode = match &self.phase {
            GamePhase::Setup1 {
                placing: SetupPlacing::Road,
            }
            | GamePhase::Setup2 {
                placing: SetupPlacing::Road,
            } => RoadMode::Setup,
            GamePhase::Main {
                step: TurnStep::Build,
            } => RoadMode::Paid,
            GamePhase::Main {
                step: TurnStep::RoadBuilding { .. },
            } => RoadMode::Free,
            _ => return Err(GameError::InvalidPhase),
        };

        self.check_road_site(player, &edge, mode == RoadMode::Setup)?;
        if self.pieces_remaining(player, StructureKind::Road) == 0 {
            return Err(GameError::PieceExhausted);
        }
        if mode == RoadMode::Paid {
            self.pay_bank(player, &costs::ROAD)?;
        }

        let structure = self.push_structure(player, StructureKind::Road, Location::Edge(edge));
        debug!(player, %structure, edge = %edge.key(), "road built");

        let mut events = vec![GameEvent::RoadBuilt {
            player,
            structure,
            location: edge,
        }];

        match mode {
            RoadMode::Setup => {
                self.setup_settlement = None;
                events.extend(self.advance_setup());
            }
            RoadMode::Paid => events.extend(self.update_longest_road()),
            RoadMode::Free => {
                events.extend(self.update_longest_road());
                let finished = match &mut self.phase {
                    GamePhase::Main {
                        step: TurnStep::RoadBuilding { remaining },
                    } => {
                        *remaining = remaining.saturating_sub(1);
                        *remaining == 0
                    }
                    _ => false,
                };
                if finished {
                    self.phase = GamePhase::Main {
                        step: TurnStep::Build,
                    };
                }
            }
        }

        Ok(events)
    }

    pub(crate) fn upgrade_to_city(
        &mut self,
        player: PlayerId,
        id: StructureId,
    ) -> Result<Vec<GameEvent>, GameError> {
        if self.step() != Some(&TurnStep::Build) {
            return Err(GameError::InvalidPhase);
        }

        let index = self
            .structures
            .iter()
            .position(|s| s.id == id && s.kind == StructureKind::Settlement)
            .ok_or(GameError::NotFound)?;
        if self.structures[index].owner != player {
            return Err(GameError::NotOwner);
        }
        if self.pieces_remaining(player, StructureKind::City) == 0 {
            return Err(GameError::PieceExhausted);
        }
        self.pay_bank(player, &costs::CITY)?;

        self.structures[index].kind = StructureKind::City;
        self.player_mut(player)?.victory_points += 1;
        debug!(player, structure = %id, "settlement upgraded to city");

        Ok(vec![GameEvent::CityBuilt {
            player,
            structure: id,
        }])
    }

    // ==================== Build Queries ====================

    /// Every site where `player` could place `kind` given the board alone
    pub fn legal_build_locations(&self, player: PlayerId, kind: StructureKind) -> Vec<BuildSite> {
        let setup = self.phase.is_setup();
        match kind {
            StructureKind::Settlement => self
                .board
                .vertices()
                .into_iter()
                .filter(|v| self.check_settlement_site(player, v, setup).is_ok())
                .map(BuildSite::Vertex)
                .collect(),
            StructureKind::Road => self
                .board
                .edges()
                .into_iter()
                .filter(|e| self.check_road_site(player, e, setup).is_ok())
                .map(BuildSite::Edge)
                .collect(),
            StructureKind::City => self
                .structures_of(player)
                .filter(|s| s.kind == StructureKind::Settlement)
                .map(|s| BuildSite::Upgrade(s.id))
                .collect(),
        }
    }

    /// Whether `player` could build `kind` right now: their turn and step, a piece
    /// left, the cost covered (unless free) and at least one legal site
    pub fn can_build(&self, player: PlayerId, kind: StructureKind) -> bool {
        if player != self.current_player {
            return false;
        }

        let paid = match (&self.phase, kind) {
            (GamePhase::Setup1 { placing } | GamePhase::Setup2 { placing }, _) => {
                let wanted = match placing {
                    SetupPlacing::Settlement => StructureKind::Settlement,
                    SetupPlacing::Road => StructureKind::Road,
                };
                if kind != wanted {
                    return false;
                }
                false
            }
            (GamePhase::Main { step: TurnStep::Build }, _) => true,
            (GamePhase::Main { step: TurnStep::RoadBuilding { .. } }, StructureKind::Road) => false,
            _ => return false,
        };

        if self.pieces_remaining(player, kind) == 0 {
            return false;
        }
        if paid && !self.player(player).is_some_and(|p| p.resources.can_afford(&kind.cost())) {
            return false;
        }
        !self.legal_build_locations(player, kind).is_empty()
    }
}
