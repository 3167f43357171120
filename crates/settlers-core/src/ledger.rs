//! Resource ledger: hands of resource cards, the bank and building costs.
//!
//! Every transfer either succeeds completely or leaves both hands untouched.

use crate::board::Resource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cards of each resource in the bank at the start of a game
pub const BANK_SUPPLY: u32 = 19;

/// A hand of resources (also used for the bank and for costs)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceHand {
    pub brick: u32,
    pub wood: u32,
    pub sheep: u32,
    pub wheat: u32,
    pub ore: u32,
}

impl ResourceHand {
    /// Create an empty hand
    pub const fn new() -> Self {
        Self::with_amounts(0, 0, 0, 0, 0)
    }

    /// Create a hand with specific amounts
    pub const fn with_amounts(brick: u32, wood: u32, sheep: u32, wheat: u32, ore: u32) -> Self {
        Self {
            brick,
            wood,
            sheep,
            wheat,
            ore,
        }
    }

    /// Create a hand with a single resource
    pub fn single(resource: Resource, amount: u32) -> Self {
        let mut hand = Self::new();
        hand.add(resource, amount);
        hand
    }

    /// The bank's starting supply
    pub const fn bank_supply() -> Self {
        Self::with_amounts(BANK_SUPPLY, BANK_SUPPLY, BANK_SUPPLY, BANK_SUPPLY, BANK_SUPPLY)
    }

    /// Total number of resource cards
    pub fn total(&self) -> u32 {
        self.brick + self.wood + self.sheep + self.wheat + self.ore
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Get count of a specific resource
    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Brick => self.brick,
            Resource::Wood => self.wood,
            Resource::Sheep => self.sheep,
            Resource::Wheat => self.wheat,
            Resource::Ore => self.ore,
        }
    }

    /// Set count of a specific resource
    pub fn set(&mut self, resource: Resource, count: u32) {
        match resource {
            Resource::Brick => self.brick = count,
            Resource::Wood => self.wood = count,
            Resource::Sheep => self.sheep = count,
            Resource::Wheat => self.wheat = count,
            Resource::Ore => self.ore = count,
        }
    }

    pub fn add(&mut self, resource: Resource, amount: u32) {
        self.set(resource, self.get(resource) + amount);
    }

    /// Add another hand to this one
    pub fn add_hand(&mut self, other: &ResourceHand) {
        for (resource, amount) in other.iter() {
            self.add(resource, amount);
        }
    }

    /// Check if this hand covers a cost
    pub fn can_afford(&self, cost: &ResourceHand) -> bool {
        cost.iter().all(|(resource, amount)| self.get(resource) >= amount)
    }

    /// The hand left after paying `cost`, or `None` if it cannot be paid
    pub fn checked_sub(&self, cost: &ResourceHand) -> Option<ResourceHand> {
        let mut left = *self;
        for (resource, amount) in cost.iter() {
            left.set(resource, self.get(resource).checked_sub(amount)?);
        }
        Some(left)
    }

    /// The resource of the `index`-th card when the hand is laid out in
    /// [`Resource::ALL`] order
    pub fn card_at(&self, index: u32) -> Option<Resource> {
        let mut remaining = index;
        for (resource, amount) in self.iter() {
            if remaining < amount {
                return Some(resource);
            }
            remaining -= amount;
        }
        None
    }

    /// `(resource, count)` pairs in [`Resource::ALL`] order, zeros included
    pub fn iter(&self) -> impl Iterator<Item = (Resource, u32)> + '_ {
        Resource::ALL.into_iter().map(move |r| (r, self.get(r)))
    }
}

/// Ledger failures; converted into `GameError` at the move layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum LedgerError {
    #[error("Insufficient resources")]
    InsufficientResources,

    #[error("The bank cannot supply that")]
    BankDepleted,
}

/// Pay `cost` from a player's hand into the bank
pub fn transfer_to_bank(
    hand: &mut ResourceHand,
    bank: &mut ResourceHand,
    cost: &ResourceHand,
) -> Result<(), LedgerError> {
    *hand = hand.checked_sub(cost).ok_or(LedgerError::InsufficientResources)?;
    bank.add_hand(cost);
    Ok(())
}

/// Hand `amount` of `resource` from the bank to a player
pub fn transfer_from_bank(
    hand: &mut ResourceHand,
    bank: &mut ResourceHand,
    resource: Resource,
    amount: u32,
) -> Result<(), LedgerError> {
    let grant = ResourceHand::single(resource, amount);
    *bank = bank.checked_sub(&grant).ok_or(LedgerError::BankDepleted)?;
    hand.add_hand(&grant);
    Ok(())
}

/// Move cards directly between two players (robber steals, monopoly)
pub fn transfer_between(
    from: &mut ResourceHand,
    to: &mut ResourceHand,
    resource: Resource,
    amount: u32,
) -> Result<(), LedgerError> {
    let moved = ResourceHand::single(resource, amount);
    *from = from.checked_sub(&moved).ok_or(LedgerError::InsufficientResources)?;
    to.add_hand(&moved);
    Ok(())
}

/// Building costs
pub mod costs {
    use super::ResourceHand;

    /// 1 brick, 1 wood
    pub const ROAD: ResourceHand = ResourceHand::with_amounts(1, 1, 0, 0, 0);

    /// 1 brick, 1 wood, 1 sheep, 1 wheat
    pub const SETTLEMENT: ResourceHand = ResourceHand::with_amounts(1, 1, 1, 1, 0);

    /// 2 wheat, 3 ore
    pub const CITY: ResourceHand = ResourceHand::with_amounts(0, 0, 0, 2, 3);

    /// 1 sheep, 1 wheat, 1 ore
    pub const DEVELOPMENT_CARD: ResourceHand = ResourceHand::with_amounts(0, 0, 1, 1, 1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_hand_total() {
        let hand = ResourceHand::with_amounts(1, 2, 3, 4, 5);
        assert_eq!(hand.total(), 15);
    }

    #[test]
    fn test_resource_hand_can_afford() {
        let hand = ResourceHand::with_amounts(2, 2, 2, 2, 2);
        assert!(hand.can_afford(&ResourceHand::with_amounts(1, 1, 1, 1, 1)));
        assert!(!hand.can_afford(&ResourceHand::with_amounts(3, 0, 0, 0, 0)));
    }

    #[test]
    fn test_checked_sub() {
        let hand = ResourceHand::with_amounts(3, 3, 3, 3, 3);
        assert_eq!(
            hand.checked_sub(&ResourceHand::with_amounts(1, 1, 1, 1, 1)),
            Some(ResourceHand::with_amounts(2, 2, 2, 2, 2))
        );
        assert_eq!(hand.checked_sub(&ResourceHand::single(Resource::Ore, 4)), None);
    }

    #[test]
    fn test_building_costs() {
        assert_eq!(costs::ROAD.total(), 2);
        assert_eq!(costs::SETTLEMENT.total(), 4);
        assert_eq!(costs::CITY.total(), 5);
        assert_eq!(costs::DEVELOPMENT_CARD.total(), 3);
        assert_eq!(costs::CITY.get(Resource::Ore), 3);
    }

    #[test]
    fn test_card_at_walks_resources_in_order() {
        let hand = ResourceHand::with_amounts(1, 0, 2, 0, 1);
        assert_eq!(hand.card_at(0), Some(Resource::Brick));
        assert_eq!(hand.card_at(1), Some(Resource::Sheep));
        assert_eq!(hand.card_at(2), Some(Resource::Sheep));
        assert_eq!(hand.card_at(3), Some(Resource::Ore));
        assert_eq!(hand.card_at(4), None);
    }

    #[test]
    fn test_transfer_to_bank_is_atomic() {
        let mut hand = ResourceHand::with_amounts(1, 0, 0, 0, 0);
        let mut bank = ResourceHand::bank_supply();

        let result = transfer_to_bank(&mut hand, &mut bank, &costs::ROAD);

        assert_eq!(result, Err(LedgerError::InsufficientResources));
        assert_eq!(hand, ResourceHand::with_amounts(1, 0, 0, 0, 0));
        assert_eq!(bank, ResourceHand::bank_supply());
    }

    #[test]
    fn test_transfer_to_bank() {
        let mut hand = ResourceHand::with_amounts(1, 1, 0, 0, 0);
        let mut bank = ResourceHand::new();

        transfer_to_bank(&mut hand, &mut bank, &costs::ROAD).unwrap();

        assert!(hand.is_empty());
        assert_eq!(bank, costs::ROAD);
    }

    #[test]
    fn test_transfer_from_empty_bank() {
        let mut hand = ResourceHand::new();
        let mut bank = ResourceHand::with_amounts(0, 5, 5, 5, 5);

        assert_eq!(
            transfer_from_bank(&mut hand, &mut bank, Resource::Brick, 1),
            Err(LedgerError::BankDepleted)
        );
        assert!(hand.is_empty());

        transfer_from_bank(&mut hand, &mut bank, Resource::Wood, 2).unwrap();
        assert_eq!(hand.wood, 2);
        assert_eq!(bank.wood, 3);
    }

    #[test]
    fn test_transfer_between() {
        let mut thief = ResourceHand::new();
        let mut victim = ResourceHand::with_amounts(0, 0, 0, 1, 0);

        transfer_between(&mut victim, &mut thief, Resource::Wheat, 1).unwrap();
        assert!(victim.is_empty());
        assert_eq!(thief.wheat, 1);

        assert_eq!(
            transfer_between(&mut victim, &mut thief, Resource::Wheat, 1),
            Err(LedgerError::InsufficientResources)
        );
    }
}
