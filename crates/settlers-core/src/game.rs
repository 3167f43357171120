//! Core game state machine.
//!
//! This module contains the main `GameState` struct, the phase machine and the move
//! dispatcher. Placement, trading, development cards and achievements are further
//! `impl GameState` blocks in their own modules.

use crate::achievements::ACHIEVEMENT_POINTS;
use crate::actions::{GameEvent, Move};
use crate::board::{Board, PlayerId, Resource, TileId};
use crate::building::Structure;
use crate::config::{ConfigError, GameConfig};
use crate::hex::VertexCoord;
use crate::ledger::{self, LedgerError, ResourceHand};
use crate::player::{DevelopmentCard, Player};
use crate::random::Randomness;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Hand size above which a 7 forces a discard
pub const DISCARD_THRESHOLD: u32 = 7;

/// Game phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// First setup round, seats in order
    Setup1 { placing: SetupPlacing },
    /// Second setup round, seats in reverse order
    Setup2 { placing: SetupPlacing },
    /// Regular turns
    Main { step: TurnStep },
    /// Game is over
    End { winner: PlayerId },
}

impl GamePhase {
    pub fn is_setup(&self) -> bool {
        matches!(self, GamePhase::Setup1 { .. } | GamePhase::Setup2 { .. })
    }

    /// What the active player places next during setup
    pub fn placing(&self) -> Option<SetupPlacing> {
        match self {
            GamePhase::Setup1 { placing } | GamePhase::Setup2 { placing } => Some(*placing),
            _ => None,
        }
    }
}

/// What we're placing during setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetupPlacing {
    Settlement,
    Road,
}

/// Where the active player is within a main-phase turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnStep {
    /// Before rolling dice at start of turn
    Roll,
    /// Rolled 7; these players still owe a discard
    Discard { pending: Vec<PlayerId> },
    /// The robber must move before play continues
    MoveRobber { resume: RobberResume },
    /// After rolling: build, trade, buy and play cards, end turn
    Build,
    /// Playing road building; free roads left to place
    RoadBuilding { remaining: u8 },
}

/// Step to return to once the robber has moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RobberResume {
    /// Knight played before rolling
    BeforeRoll,
    /// Rolled 7, or knight played after rolling
    AfterRoll,
}

/// Errors that can occur when applying moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Insufficient resources")]
    InsufficientResources,

    #[error("No pieces of that kind remaining")]
    PieceExhausted,

    #[error("Too close to another settlement or city")]
    TooClose,

    #[error("Not connected to your road network")]
    Disconnected,

    #[error("No such settlement")]
    NotFound,

    #[error("You don't own that")]
    NotOwner,

    #[error("No development cards left in deck")]
    DeckEmpty,

    #[error("The bank cannot supply that")]
    BankDepleted,

    #[error("Not your turn")]
    OutOfTurn,

    #[error("Invalid move for current phase")]
    InvalidPhase,

    #[error("You don't hold a playable copy of that card")]
    NotHeld,

    #[error("That card cannot be played")]
    NotPlayable,

    #[error("A development card was already played this turn")]
    CardAlreadyPlayed,

    #[error("Something is already built there")]
    Occupied,

    #[error("Location is not on the board")]
    OffBoard,

    #[error("Invalid trade")]
    InvalidTrade,

    #[error("Invalid discard")]
    InvalidDiscard,

    #[error("The robber cannot move there")]
    InvalidRobberTarget,

    #[error("Invalid robbery victim")]
    InvalidVictim,

    #[error("No such player")]
    UnknownPlayer,

    #[error("Game is over")]
    GameOver,

    #[error("Move would leave the game in an inconsistent state")]
    Inconsistent,
}

impl From<LedgerError> for GameError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientResources => GameError::InsufficientResources,
            LedgerError::BankDepleted => GameError::BankDepleted,
        }
    }
}

/// Result of a successful move: the next state and what happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: GameState,
    pub events: Vec<GameEvent>,
}

/// The complete game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub config: GameConfig,
    /// The game board (tiles, ports, robber)
    pub board: Board,
    /// All players, indexed by seat
    pub players: Vec<Player>,
    /// Every settlement, city and road; ids are positions in this list
    pub structures: Vec<Structure>,
    pub bank: ResourceHand,
    /// Undrawn development cards
    pub development_deck: Vec<DevelopmentCard>,
    /// Seat whose turn it is
    pub current_player: PlayerId,
    /// 0 during setup, then 1, 2, ...
    pub turn_number: u32,
    pub phase: GamePhase,
    /// Dice of the current turn's roll
    pub last_roll: Option<(u8, u8)>,
    pub longest_road_owner: Option<PlayerId>,
    pub largest_army_owner: Option<PlayerId>,
    /// Whether a dev card has been played this turn
    pub(crate) development_card_played: bool,
    /// Setup phase tracking: which settlement was just placed
    pub(crate) setup_settlement: Option<VertexCoord>,
}

impl GameState {
    /// Create a new game; setup starts with seat 0
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let board = Board::generate(config.player_count(), config.seed);
        let players = config
            .player_names
            .iter()
            .enumerate()
            .map(|(seat, name)| Player::new(seat as PlayerId, name.clone()))
            .collect();

        info!(players = config.player_count(), seed = config.seed, "starting new game");

        Ok(Self {
            config,
            board,
            players,
            structures: Vec::new(),
            bank: ResourceHand::bank_supply(),
            development_deck: DevelopmentCard::standard_deck(),
            current_player: 0,
            turn_number: 0,
            phase: GamePhase::Setup1 {
                placing: SetupPlacing::Settlement,
            },
            last_roll: None,
            longest_road_owner: None,
            largest_army_owner: None,
            development_card_played: false,
            setup_settlement: None,
        })
    }

    /// Get the number of players
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Get a player by ID
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id as usize)
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, GameError> {
        self.players.get_mut(id as usize).ok_or(GameError::UnknownPlayer)
    }

    /// Tile currently holding the robber
    pub fn robber_tile(&self) -> TileId {
        self.board.robber_tile()
    }

    /// The current turn step, if in the main phase
    pub fn step(&self) -> Option<&TurnStep> {
        match &self.phase {
            GamePhase::Main { step } => Some(step),
            _ => None,
        }
    }

    /// Check if the game is finished
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::End { .. })
    }

    /// Get the winner if the game is finished
    pub fn winner(&self) -> Option<PlayerId> {
        match self.phase {
            GamePhase::End { winner } => Some(winner),
            _ => None,
        }
    }

    /// Whether a development card has already been played this turn
    pub fn development_card_played(&self) -> bool {
        self.development_card_played
    }

    /// Victory points recomputed from the board, bonuses and VP cards
    pub fn expected_victory_points(&self, player: PlayerId) -> u32 {
        let buildings: u32 = self.structures_of(player).map(|s| s.kind.victory_points()).sum();
        let bonuses = [self.longest_road_owner, self.largest_army_owner]
            .iter()
            .filter(|owner| **owner == Some(player))
            .count() as u32
            * ACHIEVEMENT_POINTS;
        let cards = self.player(player).map_or(0, Player::hidden_victory_points);
        buildings + bonuses + cards
    }

    /// Seed for the next move's randomness, derived from the game seed and progress.
    ///
    /// Hosts that keep no generator between moves use this so a replayed move log
    /// gives the same game while later moves in the same turn still get fresh dice.
    pub fn progress_seed(&self) -> u64 {
        let placed = self.structures.len() as u64;
        let deck = self.development_deck.len() as u64;
        self.config.seed
            ^ (u64::from(self.turn_number) << 32)
            ^ (placed << 16)
            ^ (deck << 8)
            ^ u64::from(self.bank.total())
    }

    // ==================== Move Application ====================

    /// Apply a move, returning the next state and its events.
    ///
    /// `self` is never modified; on error the caller keeps the state it had.
    /// The next state is checked with [`GameState::check_invariants`] in every
    /// build, and a violation rejects the move with [`GameError::Inconsistent`].
    pub fn apply<R: Randomness + ?Sized>(
        &self,
        player: PlayerId,
        mv: Move,
        rng: &mut R,
    ) -> Result<Transition, GameError> {
        let mut state = self.clone();
        let events = state.dispatch(player, mv, rng)?;
        if let Err(violation) = state.check_invariants() {
            error!(player, %violation, "move rejected");
            return Err(GameError::Inconsistent);
        }
        Ok(Transition { state, events })
    }

    /// Apply a move to this state; on error nothing changes
    pub fn apply_in_place<R: Randomness + ?Sized>(
        &mut self,
        player: PlayerId,
        mv: Move,
        rng: &mut R,
    ) -> Result<Vec<GameEvent>, GameError> {
        let Transition { state, events } = self.apply(player, mv, rng)?;
        *self = state;
        Ok(events)
    }

    fn dispatch<R: Randomness + ?Sized>(
        &mut self,
        player: PlayerId,
        mv: Move,
        rng: &mut R,
    ) -> Result<Vec<GameEvent>, GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        if self.player(player).is_none() {
            return Err(GameError::UnknownPlayer);
        }
        // Discards belong to whoever is listed as pending
        if !matches!(mv, Move::Discard(_)) && player != self.current_player {
            return Err(GameError::OutOfTurn);
        }

        debug!(player, ?mv, "applying move");

        let mut events = match mv {
            Move::RollDice => self.roll_dice(player, rng)?,
            Move::Discard(cards) => self.discard(player, cards)?,
            Move::MoveRobber { tile, victim } => self.move_robber(player, tile, victim, rng)?,
            Move::PlaceSettlement(vertex) => self.place_settlement(player, vertex)?,
            Move::PlaceRoad(edge) => self.place_road(player, edge)?,
            Move::UpgradeToCity(id) => self.upgrade_to_city(player, id)?,
            Move::BankTrade { give, receive } => self.bank_trade(player, give, receive)?,
            Move::BuyDevelopmentCard => self.buy_development_card(player, rng)?,
            Move::PlayDevelopmentCard(play) => self.play_development_card(player, play)?,
            Move::EndTurn => self.end_turn(player)?,
        };

        events.extend(self.check_victory());
        Ok(events)
    }

    // ==================== Setup ====================

    /// Pass setup to the next seat after a road: 0..N-1, then N-1..0
    pub(crate) fn advance_setup(&mut self) -> Vec<GameEvent> {
        let player = self.current_player;
        let last = (self.players.len() - 1) as PlayerId;

        let next = match self.phase {
            GamePhase::Setup1 { .. } if player < last => {
                self.phase = GamePhase::Setup1 {
                    placing: SetupPlacing::Settlement,
                };
                player + 1
            }
            GamePhase::Setup1 { .. } => {
                self.phase = GamePhase::Setup2 {
                    placing: SetupPlacing::Settlement,
                };
                player
            }
            GamePhase::Setup2 { .. } if player > 0 => {
                self.phase = GamePhase::Setup2 {
                    placing: SetupPlacing::Settlement,
                };
                player - 1
            }
            GamePhase::Setup2 { .. } => {
                self.phase = GamePhase::Main {
                    step: TurnStep::Roll,
                };
                self.current_player = 0;
                self.turn_number = 1;
                info!("setup complete");
                return vec![GameEvent::SetupCompleted { first_player: 0 }];
            }
            _ => return Vec::new(),
        };

        self.current_player = next;
        vec![GameEvent::TurnEnded {
            player,
            next_player: next,
        }]
    }

    /// One card per adjacent producing tile for the second setup settlement
    pub(crate) fn grant_starting_resources(
        &mut self,
        player: PlayerId,
        vertex: &VertexCoord,
    ) -> Result<Vec<GameEvent>, GameError> {
        let resources: Vec<Resource> = self
            .board
            .tiles_at_vertex(vertex)
            .filter_map(|tile| tile.resource())
            .collect();

        let mut events = Vec::new();
        let mut given = Vec::new();
        for resource in resources {
            if self.bank.get(resource) == 0 {
                warn!(%resource, player, "bank empty during setup payout");
                events.push(GameEvent::BankShortfall {
                    resource,
                    requested: 1,
                    available: 0,
                });
                continue;
            }
            self.grant_from_bank(player, resource, 1)?;
            given.push((player, resource, 1));
        }

        if !given.is_empty() {
            events.push(GameEvent::ResourcesProduced {
                distributions: given,
            });
        }
        Ok(events)
    }

    // ==================== Dice Rolling ====================

    fn roll_dice<R: Randomness + ?Sized>(
        &mut self,
        player: PlayerId,
        rng: &mut R,
    ) -> Result<Vec<GameEvent>, GameError> {
        if self.step() != Some(&TurnStep::Roll) {
            return Err(GameError::InvalidPhase);
        }

        let roll = (rng.roll_die(), rng.roll_die());
        let total = roll.0 + roll.1;
        self.last_roll = Some(roll);

        let mut events = vec![GameEvent::DiceRolled {
            player,
            roll,
            total,
        }];

        if total == 7 {
            let pending: Vec<PlayerId> = self
                .players
                .iter()
                .filter(|p| p.resources.total() > DISCARD_THRESHOLD)
                .map(|p| p.id)
                .collect();

            let step = if pending.is_empty() {
                TurnStep::MoveRobber {
                    resume: RobberResume::AfterRoll,
                }
            } else {
                events.push(GameEvent::DiscardRequired {
                    players: pending.clone(),
                });
                TurnStep::Discard { pending }
            };
            self.phase = GamePhase::Main { step };
        } else {
            events.extend(self.produce(total)?);
            self.phase = GamePhase::Main {
                step: TurnStep::Build,
            };
        }

        Ok(events)
    }

    /// Pay out every tile showing `roll`.
    ///
    /// When the bank cannot cover a resource, a single claimant takes what is left
    /// and several claimants get nothing.
    fn produce(&mut self, roll: u8) -> Result<Vec<GameEvent>, GameError> {
        let mut demand: BTreeMap<Resource, BTreeMap<PlayerId, u32>> = BTreeMap::new();

        for tile in self.board.tiles().iter().filter(|t| t.produces_on(roll)) {
            let Some(resource) = tile.resource() else {
                continue;
            };
            for building in self.buildings() {
                let touches = building
                    .vertex()
                    .is_some_and(|v| v.touching_hexes().contains(&tile.coord));
                if touches {
                    *demand
                        .entry(resource)
                        .or_default()
                        .entry(building.owner)
                        .or_default() += building.kind.production_multiplier();
                }
            }
        }

        let mut events = Vec::new();
        let mut distributions = Vec::new();

        for (resource, claims) in demand {
            let requested: u32 = claims.values().sum();
            let available = self.bank.get(resource);

            let payouts: Vec<(PlayerId, u32)> = if requested <= available {
                claims.into_iter().collect()
            } else {
                warn!(%resource, requested, available, "bank cannot cover production");
                events.push(GameEvent::BankShortfall {
                    resource,
                    requested,
                    available,
                });
                if claims.len() == 1 {
                    claims.into_keys().map(|player| (player, available)).collect()
                } else {
                    Vec::new()
                }
            };

            for (player, amount) in payouts.into_iter().filter(|(_, amount)| *amount > 0) {
                self.grant_from_bank(player, resource, amount)?;
                distributions.push((player, resource, amount));
            }
        }

        if !distributions.is_empty() {
            events.push(GameEvent::ResourcesProduced { distributions });
        }
        Ok(events)
    }

    // ==================== Robber ====================

    fn discard(&mut self, player: PlayerId, cards: ResourceHand) -> Result<Vec<GameEvent>, GameError> {
        let pending = match &self.phase {
            GamePhase::Main {
                step: TurnStep::Discard { pending },
            } => pending.clone(),
            _ => return Err(GameError::InvalidPhase),
        };
        if !pending.contains(&player) {
            return Err(GameError::OutOfTurn);
        }

        let hand = self.player_mut(player)?.resources;
        if cards.total() != hand.total() / 2 || !hand.can_afford(&cards) {
            return Err(GameError::InvalidDiscard);
        }
        self.pay_bank(player, &cards)?;

        let remaining: Vec<PlayerId> = pending.into_iter().filter(|p| *p != player).collect();
        let step = if remaining.is_empty() {
            TurnStep::MoveRobber {
                resume: RobberResume::AfterRoll,
            }
        } else {
            TurnStep::Discard { pending: remaining }
        };
        self.phase = GamePhase::Main { step };

        Ok(vec![GameEvent::CardsDiscarded { player, cards }])
    }

    /// Players `thief` could rob by moving the robber onto `tile`
    pub fn robber_victims(&self, thief: PlayerId, tile: TileId) -> Vec<PlayerId> {
        let Some(tile) = self.board.tile(tile) else {
            return Vec::new();
        };

        let mut victims: Vec<PlayerId> = self
            .buildings()
            .filter(|b| b.owner != thief)
            .filter(|b| b.vertex().is_some_and(|v| v.touching_hexes().contains(&tile.coord)))
            .map(|b| b.owner)
            .filter(|owner| self.player(*owner).is_some_and(|p| !p.resources.is_empty()))
            .collect();
        victims.sort_unstable();
        victims.dedup();
        victims
    }

    fn move_robber<R: Randomness + ?Sized>(
        &mut self,
        player: PlayerId,
        tile: TileId,
        victim: Option<PlayerId>,
        rng: &mut R,
    ) -> Result<Vec<GameEvent>, GameError> {
        let resume = match self.step() {
            Some(TurnStep::MoveRobber { resume }) => *resume,
            _ => return Err(GameError::InvalidPhase),
        };

        let from = self.robber_tile();
        if self.board.tile(tile).is_none() || tile == from {
            return Err(GameError::InvalidRobberTarget);
        }

        let candidates = self.robber_victims(player, tile);
        match victim {
            Some(victim) if candidates.contains(&victim) => {}
            None if candidates.is_empty() => {}
            _ => return Err(GameError::InvalidVictim),
        }

        self.board.move_robber(tile);
        let mut events = vec![GameEvent::RobberMoved {
            player,
            from,
            to: tile,
        }];

        if let Some(victim) = victim {
            events.push(self.steal(player, victim, rng)?);
        }

        let step = match resume {
            RobberResume::BeforeRoll => TurnStep::Roll,
            RobberResume::AfterRoll => TurnStep::Build,
        };
        self.phase = GamePhase::Main { step };

        Ok(events)
    }

    /// Take one uniformly random card from `victim`
    fn steal<R: Randomness + ?Sized>(
        &mut self,
        thief: PlayerId,
        victim: PlayerId,
        rng: &mut R,
    ) -> Result<GameEvent, GameError> {
        let hand = self.player_mut(victim)?.resources;
        let index = rng.choose_index(hand.total() as usize);
        let resource = hand.card_at(index as u32).ok_or(GameError::InvalidVictim)?;

        let (from, to) = self.hands_mut(victim, thief)?;
        ledger::transfer_between(from, to, resource, 1)?;

        debug!(thief, victim, %resource, "robber stole a card");
        Ok(GameEvent::ResourceStolen {
            thief,
            victim,
            resource,
        })
    }

    // ==================== Turn Management ====================

    fn end_turn(&mut self, player: PlayerId) -> Result<Vec<GameEvent>, GameError> {
        if !matches!(
            self.step(),
            Some(TurnStep::Build | TurnStep::RoadBuilding { .. })
        ) {
            return Err(GameError::InvalidPhase);
        }

        self.player_mut(player)?.end_turn();

        let next_player = ((player as usize + 1) % self.players.len()) as PlayerId;
        self.current_player = next_player;
        self.turn_number += 1;
        self.last_roll = None;
        self.development_card_played = false;
        self.phase = GamePhase::Main {
            step: TurnStep::Roll,
        };

        Ok(vec![GameEvent::TurnEnded {
            player,
            next_player,
        }])
    }

    /// Enter `End` if someone reached the target, active player first
    fn check_victory(&mut self) -> Vec<GameEvent> {
        if self.is_finished() {
            return Vec::new();
        }

        let count = self.players.len();
        let target = self.config.victory_points_to_win;
        let winner = (0..count)
            .filter_map(|offset| self.players.get((self.current_player as usize + offset) % count))
            .find(|p| p.victory_points >= target)
            .map(|p| (p.id, p.victory_points));

        match winner {
            Some((player, victory_points)) => {
                info!(player, victory_points, turn = self.turn_number, "game won");
                self.phase = GamePhase::End { winner: player };
                vec![GameEvent::GameWon {
                    player,
                    victory_points,
                }]
            }
            None => Vec::new(),
        }
    }

    // ==================== Ledger Helpers ====================

    /// Pay `cost` from a player to the bank
    pub(crate) fn pay_bank(&mut self, player: PlayerId, cost: &ResourceHand) -> Result<(), GameError> {
        let seat = self.players.get_mut(player as usize).ok_or(GameError::UnknownPlayer)?;
        ledger::transfer_to_bank(&mut seat.resources, &mut self.bank, cost)?;
        Ok(())
    }

    pub(crate) fn grant_from_bank(
        &mut self,
        player: PlayerId,
        resource: Resource,
        amount: u32,
    ) -> Result<(), GameError> {
        let seat = self.players.get_mut(player as usize).ok_or(GameError::UnknownPlayer)?;
        ledger::transfer_from_bank(&mut seat.resources, &mut self.bank, resource, amount)?;
        Ok(())
    }

    /// Two distinct players' hands, borrowed together
    pub(crate) fn hands_mut(
        &mut self,
        from: PlayerId,
        to: PlayerId,
    ) -> Result<(&mut ResourceHand, &mut ResourceHand), GameError> {
        let (from, to) = (from as usize, to as usize);
        let len = self.players.len();
        if from == to || from >= len || to >= len {
            return Err(GameError::UnknownPlayer);
        }

        if from < to {
            let (left, right) = self.players.split_at_mut(to);
            Ok((&mut left[from].resources, &mut right[0].resources))
        } else {
            let (left, right) = self.players.split_at_mut(from);
            Ok((&mut right[0].resources, &mut left[to].resources))
        }
    }
}
