//! Whole-state consistency checks.
//!
//! Run after every move and on every snapshot restore.

use crate::achievements::{MIN_LARGEST_ARMY, MIN_LONGEST_ROAD};
use crate::board::Resource;
use crate::building::StructureKind;
use crate::game::GameState;
use crate::ledger::BANK_SUPPLY;
use crate::player::DevelopmentCard;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invariant violated: {message}")]
pub struct InvariantViolation {
    pub message: String,
}

impl InvariantViolation {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<(), InvariantViolation> {
    if condition {
        Ok(())
    } else {
        Err(InvariantViolation::new(message()))
    }
}

impl GameState {
    /// Check everything that must hold between moves
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.check_players()?;
        self.check_conservation()?;
        self.check_robber()?;
        self.check_structures()?;
        self.check_development_cards()?;
        self.check_achievements()
    }

    fn check_players(&self) -> Result<(), InvariantViolation> {
        ensure(self.players.len() == self.config.player_count(), || {
            format!(
                "{} players seated for {} configured",
                self.players.len(),
                self.config.player_count()
            )
        })?;
        ensure((self.current_player as usize) < self.players.len(), || {
            format!("current player {} out of range", self.current_player)
        })?;

        for (seat, player) in self.players.iter().enumerate() {
            ensure(player.id as usize == seat, || {
                format!("player in seat {seat} has id {}", player.id)
            })?;
            let expected = self.expected_victory_points(player.id);
            ensure(player.victory_points == expected, || {
                format!(
                    "player {} has {} victory points, board says {expected}",
                    player.id, player.victory_points
                )
            })?;
        }
        Ok(())
    }

    fn check_conservation(&self) -> Result<(), InvariantViolation> {
        for resource in Resource::ALL {
            let held: u32 = self.players.iter().map(|p| p.resources.get(resource)).sum();
            let total = held + self.bank.get(resource);
            ensure(total == BANK_SUPPLY, || {
                format!("{total} {resource} in play, expected {BANK_SUPPLY}")
            })?;
        }
        Ok(())
    }

    fn check_robber(&self) -> Result<(), InvariantViolation> {
        let marked: Vec<_> = self.board.tiles().iter().filter(|t| t.has_robber).map(|t| t.id).collect();
        ensure(marked == [self.robber_tile()], || {
            format!("robber marked on {marked:?} but recorded on {}", self.robber_tile())
        })
    }

    fn check_structures(&self) -> Result<(), InvariantViolation> {
        let mut vertices = HashSet::new();
        let mut edges = HashSet::new();

        for (index, structure) in self.structures.iter().enumerate() {
            ensure(structure.id.0 as usize == index, || {
                format!("structure {} stored at position {index}", structure.id)
            })?;
            ensure(self.player(structure.owner).is_some(), || {
                format!("structure {} owned by unknown player {}", structure.id, structure.owner)
            })?;

            match (structure.kind, structure.vertex(), structure.edge()) {
                (StructureKind::Road, None, Some(edge)) => {
                    ensure(edges.insert(edge.key()), || format!("two roads on edge {}", edge.key()))?;
                }
                (StructureKind::Settlement | StructureKind::City, Some(vertex), None) => {
                    ensure(vertices.insert(vertex.key()), || {
                        format!("two buildings on vertex {}", vertex.key())
                    })?;
                }
                _ => {
                    return Err(InvariantViolation::new(format!(
                        "structure {} is a {:?} at the wrong kind of location",
                        structure.id, structure.kind
                    )))
                }
            }
        }

        for player in &self.players {
            for kind in [StructureKind::Settlement, StructureKind::City, StructureKind::Road] {
                let placed = self.structures_of(player.id).filter(|s| s.kind == kind).count() as u32;
                ensure(placed <= kind.piece_limit(), || {
                    format!("player {} has {placed} {kind:?} pieces on the board", player.id)
                })?;
            }
        }
        Ok(())
    }

    fn check_development_cards(&self) -> Result<(), InvariantViolation> {
        for card in DevelopmentCard::ALL {
            let in_deck = self.development_deck.iter().filter(|c| **c == card).count() as u32;
            let held: u32 = self
                .players
                .iter()
                .map(|p| p.development_cards.get(card) + p.new_development_cards.get(card))
                .sum();
            let played = match card {
                DevelopmentCard::Knight => self.players.iter().map(|p| p.knights_played).sum(),
                _ => 0,
            };
            let seen = in_deck + held + played;
            ensure(seen as usize <= card.copies(), || {
                format!("{seen} {card:?} cards accounted for, only {} exist", card.copies())
            })?;
        }
        Ok(())
    }

    fn check_achievements(&self) -> Result<(), InvariantViolation> {
        if let Some(owner) = self.longest_road_owner {
            let length = self.longest_road_length(owner);
            ensure(self.player(owner).is_some() && length >= MIN_LONGEST_ROAD, || {
                format!("longest road held by player {owner} with a road of {length}")
            })?;
        }
        if let Some(owner) = self.largest_army_owner {
            let knights = self.player(owner).map_or(0, |p| p.knights_played);
            ensure(knights >= MIN_LARGEST_ARMY, || {
                format!("largest army held by player {owner} with {knights} knights")
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{give, two_player_game};

    #[test]
    fn test_fresh_and_set_up_games_are_consistent() {
        let game = GameState::new(crate::config::GameConfig::default()).unwrap();
        assert_eq!(game.check_invariants(), Ok(()));

        let game = two_player_game();
        assert_eq!(game.check_invariants(), Ok(()));
    }

    #[test]
    fn test_detects_victory_point_drift() {
        let mut game = two_player_game();
        game.players[1].victory_points += 1;
        let err = game.check_invariants().unwrap_err();
        assert!(err.message.contains("victory points"));
    }

    #[test]
    fn test_detects_counterfeit_resources() {
        let mut game = two_player_game();
        game.players[0].resources.add(Resource::Ore, 1);
        assert!(game.check_invariants().is_err());

        // Moving cards out of the bank keeps the total
        let mut game = two_player_game();
        give(&mut game, 0, crate::ledger::ResourceHand::single(Resource::Ore, 3));
        assert_eq!(game.check_invariants(), Ok(()));
    }

    #[test]
    fn test_detects_duplicate_road() {
        let mut game = two_player_game();
        let mut copy = game.structures.iter().find(|s| s.kind == StructureKind::Road).cloned().unwrap();
        copy.id = crate::building::StructureId(game.structures.len() as u32);
        game.structures.push(copy);

        let err = game.check_invariants().unwrap_err();
        assert!(err.message.contains("two roads"));
    }

    #[test]
    fn test_detects_phantom_achievement() {
        let mut game = two_player_game();
        game.largest_army_owner = Some(0);
        game.players[0].victory_points += 2;
        assert!(game.check_invariants().is_err());
    }
}
