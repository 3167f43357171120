//! Settlers - rules engine for a hex-tile settlement-building board game
//!
//! This crate provides the complete game rules, including:
//! - Hex coordinate system with canonical vertex and edge keys
//! - Board generation with tiles, production numbers and ports
//! - Resource ledger with a finite bank
//! - Game state machine covering setup, turns, the robber and victory
//! - Building, trading, development cards and achievements
//!
//! # Architecture
//!
//! A game is a plain value. [`GameState::apply`] takes a [`Move`] and a source of
//! [`Randomness`] and returns the next state with the [`GameEvent`]s it produced, or a
//! [`GameError`] with the original state untouched. The engine can be compiled to:
//! - Native Rust for hosts such as the `settlers` CLI
//! - WebAssembly (feature `wasm`) for browser clients
//!
//! # Modules
//!
//! - [`hex`]: Coordinate system for hex tiles, vertices, and edges
//! - [`board`]: Board generation and tile queries
//! - [`ledger`]: Resource hands, bank transfers and building costs
//! - [`game`]: Game state machine and move dispatch
//! - [`building`], [`trade`], [`development`], [`achievements`]: rules per action
//! - [`snapshot`]: JSON persistence with consistency checks on restore

pub mod achievements;
pub mod actions;
pub mod board;
pub mod building;
pub mod config;
pub mod development;
pub mod game;
pub mod hex;
pub mod invariants;
pub mod ledger;
pub mod player;
pub mod random;
pub mod snapshot;
pub mod trade;
#[cfg(feature = "wasm")]
pub mod wasm;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use actions::{CardPlay, GameEvent, Move};
pub use board::{Board, PlayerId, Port, PortKind, Resource, Tile, TileId, TileType};
pub use building::{BuildSite, Location, Structure, StructureId, StructureKind};
pub use config::{ConfigError, GameConfig};
pub use game::{GameError, GamePhase, GameState, RobberResume, SetupPlacing, Transition, TurnStep};
pub use hex::{EdgeCoord, EdgeDirection, EdgeKey, HexCoord, VertexCoord, VertexDirection, VertexKey};
pub use invariants::InvariantViolation;
pub use ledger::{LedgerError, ResourceHand};
pub use player::{DevelopmentCard, DevelopmentHand, Player};
pub use random::{Randomness, RngRandomness, ScriptedRandomness};
pub use snapshot::SnapshotError;
