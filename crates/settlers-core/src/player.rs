//! Player state and development cards.
//!
//! This module contains:
//! - Player struct with resources, development cards and knight count
//! - Development card types, the standard deck and per-kind card counts

use crate::board::PlayerId;
use crate::ledger::ResourceHand;
use serde::{Deserialize, Serialize};

/// Development card types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DevelopmentCard {
    /// Move robber and steal, counts toward Largest Army
    Knight,
    /// Worth 1 VP as soon as it is bought
    VictoryPoint,
    /// Build 2 roads for free
    RoadBuilding,
    /// Take any 2 resources from the bank
    YearOfPlenty,
    /// All other players give you all of one resource type
    Monopoly,
}

impl DevelopmentCard {
    pub const ALL: [DevelopmentCard; 5] = [
        DevelopmentCard::Knight,
        DevelopmentCard::VictoryPoint,
        DevelopmentCard::RoadBuilding,
        DevelopmentCard::YearOfPlenty,
        DevelopmentCard::Monopoly,
    ];

    /// Copies of this card in the standard deck
    pub const fn copies(self) -> usize {
        match self {
            DevelopmentCard::Knight => 14,
            DevelopmentCard::VictoryPoint => 5,
            DevelopmentCard::RoadBuilding
            | DevelopmentCard::YearOfPlenty
            | DevelopmentCard::Monopoly => 2,
        }
    }

    /// The standard development card deck (25 cards) in canonical order.
    ///
    /// Draws pick a uniformly random index, so the deck is never shuffled.
    pub fn standard_deck() -> Vec<DevelopmentCard> {
        Self::ALL
            .into_iter()
            .flat_map(|card| std::iter::repeat(card).take(card.copies()))
            .collect()
    }

    /// Whether this card can be played (VP cards are never "played")
    pub fn is_playable(&self) -> bool {
        !matches!(self, DevelopmentCard::VictoryPoint)
    }
}

/// Count of development cards held, per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevelopmentHand {
    pub knight: u32,
    pub victory_point: u32,
    pub road_building: u32,
    pub year_of_plenty: u32,
    pub monopoly: u32,
}

impl DevelopmentHand {
    pub fn get(&self, card: DevelopmentCard) -> u32 {
        match card {
            DevelopmentCard::Knight => self.knight,
            DevelopmentCard::VictoryPoint => self.victory_point,
            DevelopmentCard::RoadBuilding => self.road_building,
            DevelopmentCard::YearOfPlenty => self.year_of_plenty,
            DevelopmentCard::Monopoly => self.monopoly,
        }
    }

    fn slot(&mut self, card: DevelopmentCard) -> &mut u32 {
        match card {
            DevelopmentCard::Knight => &mut self.knight,
            DevelopmentCard::VictoryPoint => &mut self.victory_point,
            DevelopmentCard::RoadBuilding => &mut self.road_building,
            DevelopmentCard::YearOfPlenty => &mut self.year_of_plenty,
            DevelopmentCard::Monopoly => &mut self.monopoly,
        }
    }

    pub fn add(&mut self, card: DevelopmentCard) {
        *self.slot(card) += 1;
    }

    /// Remove one copy; returns false if none is held
    pub fn remove(&mut self, card: DevelopmentCard) -> bool {
        let slot = self.slot(card);
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    pub fn total(&self) -> u32 {
        DevelopmentCard::ALL.iter().map(|c| self.get(*c)).sum()
    }

    /// Move every card from `other` into this hand
    pub fn absorb(&mut self, other: &mut DevelopmentHand) {
        for card in DevelopmentCard::ALL {
            *self.slot(card) += other.get(card);
        }
        *other = DevelopmentHand::default();
    }
}

/// A single player's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Seat index (0-3)
    pub id: PlayerId,
    /// Display name
    pub name: String,
    /// Current resources
    pub resources: ResourceHand,
    /// Public and hidden victory points, kept in step with the board
    pub victory_points: u32,
    /// Number of knights played (for Largest Army)
    pub knights_played: u32,
    /// Development cards that may be played (VP cards sit here too)
    pub development_cards: DevelopmentHand,
    /// Development cards bought this turn (can't be played same turn)
    pub new_development_cards: DevelopmentHand,
}

impl Player {
    /// Create a new player
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            resources: ResourceHand::new(),
            victory_points: 0,
            knights_played: 0,
            development_cards: DevelopmentHand::default(),
            new_development_cards: DevelopmentHand::default(),
        }
    }

    /// Hidden VP (VP cards that opponents can't see)
    pub fn hidden_victory_points(&self) -> u32 {
        self.development_cards.victory_point
    }

    /// Check if player has a playable development card of given type
    pub fn has_playable(&self, card: DevelopmentCard) -> bool {
        card.is_playable() && self.development_cards.get(card) > 0
    }

    /// Called at end of turn - move bought cards to playable pile
    pub fn end_turn(&mut self) {
        self.development_cards.absorb(&mut self.new_development_cards);
    }
}
