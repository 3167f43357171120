//! Moves players can make.
//!
//! This module defines every move accepted by [`GameState::apply`] and the
//! events a successful move reports.
//!
//! [`GameState::apply`]: crate::game::GameState::apply

use crate::board::{PlayerId, Resource, TileId};
use crate::building::StructureId;
use crate::hex::{EdgeCoord, VertexCoord};
use crate::ledger::ResourceHand;
use crate::player::DevelopmentCard;
use serde::{Deserialize, Serialize};

/// All possible moves a player can make
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    // ==================== Turn Actions ====================
    /// Roll the dice (must be done at start of turn)
    RollDice,

    // ==================== Robber Actions ====================
    /// Discard exactly half (rounded down) of your cards after a 7
    Discard(ResourceHand),
    /// Move the robber and pick who to steal from (None if nobody is eligible)
    MoveRobber {
        tile: TileId,
        victim: Option<PlayerId>,
    },

    // ==================== Building Actions ====================
    /// Place a settlement (free during setup)
    PlaceSettlement(VertexCoord),
    /// Place a road (free during setup and road building)
    PlaceRoad(EdgeCoord),
    /// Upgrade one of your settlements to a city
    UpgradeToCity(StructureId),

    // ==================== Trading Actions ====================
    /// Trade with the bank at your best ratio for `give`
    BankTrade { give: Resource, receive: Resource },

    // ==================== Development Card Actions ====================
    BuyDevelopmentCard,
    PlayDevelopmentCard(CardPlay),

    // ==================== Turn Management ====================
    EndTurn,
}

/// A development card being played, with its choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardPlay {
    /// Move the robber, counts toward largest army
    Knight,
    /// Place up to two free roads
    RoadBuilding,
    /// Take two resources from the bank
    YearOfPlenty(Resource, Resource),
    /// Take every other player's cards of one resource
    Monopoly(Resource),
    /// Always rejected: victory point cards score when bought
    VictoryPoint,
}

impl CardPlay {
    /// The card this play consumes
    pub fn card(&self) -> DevelopmentCard {
        match self {
            CardPlay::Knight => DevelopmentCard::Knight,
            CardPlay::RoadBuilding => DevelopmentCard::RoadBuilding,
            CardPlay::YearOfPlenty(..) => DevelopmentCard::YearOfPlenty,
            CardPlay::Monopoly(_) => DevelopmentCard::Monopoly,
            CardPlay::VictoryPoint => DevelopmentCard::VictoryPoint,
        }
    }
}

/// Events that occur as a result of moves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Dice were rolled
    DiceRolled {
        player: PlayerId,
        roll: (u8, u8),
        total: u8,
    },

    /// Resources were handed out (production or second setup settlement)
    ResourcesProduced {
        distributions: Vec<(PlayerId, Resource, u32)>,
    },

    /// The bank could not cover everything owed for a resource
    BankShortfall {
        resource: Resource,
        requested: u32,
        available: u32,
    },

    /// Players holding more than 7 cards must discard
    DiscardRequired { players: Vec<PlayerId> },

    CardsDiscarded {
        player: PlayerId,
        cards: ResourceHand,
    },

    RobberMoved {
        player: PlayerId,
        from: TileId,
        to: TileId,
    },

    ResourceStolen {
        thief: PlayerId,
        victim: PlayerId,
        resource: Resource,
    },

    SettlementBuilt {
        player: PlayerId,
        structure: StructureId,
        location: VertexCoord,
    },

    CityBuilt {
        player: PlayerId,
        structure: StructureId,
    },

    RoadBuilt {
        player: PlayerId,
        structure: StructureId,
        location: EdgeCoord,
    },

    BankTradeCompleted {
        player: PlayerId,
        gave: Resource,
        gave_count: u32,
        received: Resource,
    },

    /// A development card was purchased (the card itself stays hidden)
    DevelopmentCardBought { player: PlayerId },

    DevelopmentCardPlayed {
        player: PlayerId,
        card: DevelopmentCard,
    },

    MonopolyCollected {
        player: PlayerId,
        resource: Resource,
        total_taken: u32,
    },

    /// Longest road changed hands
    LongestRoadChanged {
        previous: Option<PlayerId>,
        current: Option<PlayerId>,
        length: u32,
    },

    /// Largest army changed hands
    LargestArmyChanged {
        previous: Option<PlayerId>,
        current: Option<PlayerId>,
        knights: u32,
    },

    /// Both setup rounds are done; the main phase starts
    SetupCompleted { first_player: PlayerId },

    TurnEnded {
        player: PlayerId,
        next_player: PlayerId,
    },

    /// A player won the game
    GameWon {
        player: PlayerId,
        victory_points: u32,
    },
}
