//! Development cards: buying from the deck and playing card effects.

use crate::actions::{CardPlay, GameEvent};
use crate::board::{PlayerId, Resource};
use crate::building::StructureKind;
use crate::game::{GameError, GamePhase, GameState, RobberResume, TurnStep};
use crate::ledger::{self, costs, ResourceHand};
use crate::player::DevelopmentCard;
use crate::random::Randomness;
use tracing::debug;

/// Free roads granted by a road building card
pub const ROAD_BUILDING_ROADS: u8 = 2;

impl GameState {
    pub(crate) fn buy_development_card<R: Randomness + ?Sized>(
        &mut self,
        player: PlayerId,
        rng: &mut R,
    ) -> Result<Vec<GameEvent>, GameError> {
        if self.step() != Some(&TurnStep::Build) {
            return Err(GameError::InvalidPhase);
        }
        if self.development_deck.is_empty() {
            return Err(GameError::DeckEmpty);
        }
        self.pay_bank(player, &costs::DEVELOPMENT_CARD)?;

        let index = rng.choose_index(self.development_deck.len());
        let card = self.development_deck.remove(index);

        let seat = self.player_mut(player)?;
        if card == DevelopmentCard::VictoryPoint {
            seat.development_cards.add(card);
            seat.victory_points += 1;
        } else {
            seat.new_development_cards.add(card);
        }
        debug!(player, ?card, remaining = self.development_deck.len(), "development card bought");

        Ok(vec![GameEvent::DevelopmentCardBought { player }])
    }

    pub(crate) fn play_development_card(
        &mut self,
        player: PlayerId,
        play: CardPlay,
    ) -> Result<Vec<GameEvent>, GameError> {
        let card = play.card();
        if !card.is_playable() {
            return Err(GameError::NotPlayable);
        }

        // Knights may come before the roll; everything else after it
        let resume = match (self.step(), card) {
            (Some(TurnStep::Roll), DevelopmentCard::Knight) => RobberResume::BeforeRoll,
            (Some(TurnStep::Build), _) => RobberResume::AfterRoll,
            _ => return Err(GameError::InvalidPhase),
        };
        if self.development_card_played {
            return Err(GameError::CardAlreadyPlayed);
        }
        if !self.player(player).is_some_and(|p| p.has_playable(card)) {
            return Err(GameError::NotHeld);
        }

        // Reject effects that cannot happen before the card is spent
        match play {
            CardPlay::RoadBuilding if self.pieces_remaining(player, StructureKind::Road) == 0 => {
                return Err(GameError::PieceExhausted);
            }
            CardPlay::YearOfPlenty(first, second) => {
                let mut wanted = ResourceHand::single(first, 1);
                wanted.add(second, 1);
                if !self.bank.can_afford(&wanted) {
                    return Err(GameError::BankDepleted);
                }
            }
            _ => {}
        }

        if !self.player_mut(player)?.development_cards.remove(card) {
            return Err(GameError::NotHeld);
        }
        self.development_card_played = true;
        debug!(player, ?play, "development card played");

        let mut events = vec![GameEvent::DevelopmentCardPlayed { player, card }];

        match play {
            CardPlay::Knight => {
                self.player_mut(player)?.knights_played += 1;
                events.extend(self.update_largest_army());
                self.phase = GamePhase::Main {
                    step: TurnStep::MoveRobber { resume },
                };
            }
            CardPlay::RoadBuilding => {
                let pieces = self.pieces_remaining(player, StructureKind::Road);
                let remaining = pieces.min(u32::from(ROAD_BUILDING_ROADS)) as u8;
                self.phase = GamePhase::Main {
                    step: TurnStep::RoadBuilding { remaining },
                };
            }
            CardPlay::YearOfPlenty(first, second) => {
                self.grant_from_bank(player, first, 1)?;
                self.grant_from_bank(player, second, 1)?;
                let distributions = if first == second {
                    vec![(player, first, 2)]
                } else {
                    vec![(player, first, 1), (player, second, 1)]
                };
                events.push(GameEvent::ResourcesProduced { distributions });
            }
            CardPlay::Monopoly(resource) => {
                let total_taken = self.collect_monopoly(player, resource)?;
                events.push(GameEvent::MonopolyCollected {
                    player,
                    resource,
                    total_taken,
                });
            }
            CardPlay::VictoryPoint => return Err(GameError::NotPlayable),
        }

        Ok(events)
    }

    fn collect_monopoly(&mut self, player: PlayerId, resource: Resource) -> Result<u32, GameError> {
        let others: Vec<PlayerId> = self.players.iter().map(|p| p.id).filter(|id| *id != player).collect();

        let mut total = 0;
        for other in others {
            let (from, to) = self.hands_mut(other, player)?;
            let amount = from.get(resource);
            if amount > 0 {
                ledger::transfer_between(from, to, resource, amount)?;
                total += amount;
            }
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Move;
    use crate::random::ScriptedRandomness;
    use crate::testing::{give, roll, two_player_game, use_up_pieces};

    fn hand_card(game: &mut GameState, player: PlayerId, card: DevelopmentCard) {
        let index = game.development_deck.iter().position(|c| *c == card).unwrap();
        game.development_deck.remove(index);
        game.players[player as usize].development_cards.add(card);
    }

    #[test]
    fn test_buy_development_card() {
        let mut game = two_player_game();
        roll(&mut game, 1, 1);
        give(&mut game, 0, costs::DEVELOPMENT_CARD);
        // Index 0 of the canonical deck is a knight
        let mut rng = ScriptedRandomness::new().with_picks([0]);
        let bank_before = game.bank;

        game.apply_in_place(0, Move::BuyDevelopmentCard, &mut rng).unwrap();

        assert_eq!(game.development_deck.len(), 24);
        assert_eq!(game.players[0].new_development_cards.knight, 1);
        assert!(!game.players[0].has_playable(DevelopmentCard::Knight));
        let mut expected_bank = bank_before;
        expected_bank.add_hand(&costs::DEVELOPMENT_CARD);
        assert_eq!(game.bank, expected_bank);
    }

    #[test]
    fn test_victory_point_card_scores_immediately() {
        let mut game = two_player_game();
        roll(&mut game, 1, 1);
        give(&mut game, 0, costs::DEVELOPMENT_CARD);
        let vp_index = game.development_deck.iter().position(|c| *c == DevelopmentCard::VictoryPoint).unwrap();
        let mut rng = ScriptedRandomness::new().with_picks([vp_index]);
        let before = game.players[0].victory_points;

        game.apply_in_place(0, Move::BuyDevelopmentCard, &mut rng).unwrap();

        assert_eq!(game.players[0].victory_points, before + 1);
        assert_eq!(game.players[0].hidden_victory_points(), 1);
        let mut rng = ScriptedRandomness::new();
        assert_eq!(
            game.apply(0, Move::PlayDevelopmentCard(CardPlay::VictoryPoint), &mut rng).unwrap_err(),
            GameError::NotPlayable
        );
    }

    #[test]
    fn test_empty_deck() {
        let mut game = two_player_game();
        roll(&mut game, 1, 1);
        give(&mut game, 0, costs::DEVELOPMENT_CARD);
        while let Some(card) = game.development_deck.pop() {
            game.players[1].new_development_cards.add(card);
        }
        let mut rng = ScriptedRandomness::new();

        assert_eq!(
            game.apply(0, Move::BuyDevelopmentCard, &mut rng).unwrap_err(),
            GameError::DeckEmpty
        );
    }

    #[test]
    fn test_card_bought_this_turn_not_playable() {
        let mut game = two_player_game();
        roll(&mut game, 1, 1);
        give(&mut game, 0, costs::DEVELOPMENT_CARD);
        let mut rng = ScriptedRandomness::new().with_picks([0]);
        game.apply_in_place(0, Move::BuyDevelopmentCard, &mut rng).unwrap();

        let result = game.apply(0, Move::PlayDevelopmentCard(CardPlay::Knight), &mut rng);
        assert_eq!(result.unwrap_err(), GameError::NotHeld);
    }

    #[test]
    fn test_knight_before_roll_returns_to_roll() {
        let mut game = two_player_game();
        hand_card(&mut game, 0, DevelopmentCard::Knight);
        let mut rng = ScriptedRandomness::new();

        game.apply_in_place(0, Move::PlayDevelopmentCard(CardPlay::Knight), &mut rng).unwrap();
        assert_eq!(
            game.step(),
            Some(&TurnStep::MoveRobber {
                resume: RobberResume::BeforeRoll
            })
        );
        assert_eq!(game.players[0].knights_played, 1);

        let target = game
            .board
            .tiles()
            .iter()
            .map(|t| t.id)
            .find(|id| *id != game.robber_tile() && game.robber_victims(0, *id).is_empty())
            .unwrap();
        game.apply_in_place(0, Move::MoveRobber { tile: target, victim: None }, &mut rng)
            .unwrap();
        assert_eq!(game.step(), Some(&TurnStep::Roll));
    }

    #[test]
    fn test_one_card_per_turn() {
        let mut game = two_player_game();
        roll(&mut game, 1, 1);
        hand_card(&mut game, 0, DevelopmentCard::Monopoly);
        hand_card(&mut game, 0, DevelopmentCard::YearOfPlenty);
        let mut rng = ScriptedRandomness::new();

        game.apply_in_place(0, Move::PlayDevelopmentCard(CardPlay::Monopoly(Resource::Ore)), &mut rng)
            .unwrap();
        let result = game.apply(
            0,
            Move::PlayDevelopmentCard(CardPlay::YearOfPlenty(Resource::Ore, Resource::Ore)),
            &mut rng,
        );
        assert_eq!(result.unwrap_err(), GameError::CardAlreadyPlayed);
    }

    #[test]
    fn test_non_knight_before_roll_rejected() {
        let mut game = two_player_game();
        hand_card(&mut game, 0, DevelopmentCard::Monopoly);
        let mut rng = ScriptedRandomness::new();

        let result = game.apply(0, Move::PlayDevelopmentCard(CardPlay::Monopoly(Resource::Wood)), &mut rng);
        assert_eq!(result.unwrap_err(), GameError::InvalidPhase);
    }

    #[test]
    fn test_monopoly_takes_everything() {
        let mut game = two_player_game();
        roll(&mut game, 1, 1);
        hand_card(&mut game, 0, DevelopmentCard::Monopoly);
        give(&mut game, 1, ResourceHand::single(Resource::Sheep, 3));
        let theirs = game.players[1].resources.get(Resource::Sheep);
        let mine = game.players[0].resources.get(Resource::Sheep);
        let mut rng = ScriptedRandomness::new();

        let events = game
            .apply_in_place(0, Move::PlayDevelopmentCard(CardPlay::Monopoly(Resource::Sheep)), &mut rng)
            .unwrap();

        assert_eq!(game.players[1].resources.get(Resource::Sheep), 0);
        assert_eq!(game.players[0].resources.get(Resource::Sheep), mine + theirs);
        assert!(events.contains(&GameEvent::MonopolyCollected {
            player: 0,
            resource: Resource::Sheep,
            total_taken: theirs,
        }));
    }

    #[test]
    fn test_year_of_plenty() {
        let mut game = two_player_game();
        roll(&mut game, 1, 1);
        hand_card(&mut game, 0, DevelopmentCard::YearOfPlenty);
        let before = game.players[0].resources;
        let mut rng = ScriptedRandomness::new();

        game.apply_in_place(
            0,
            Move::PlayDevelopmentCard(CardPlay::YearOfPlenty(Resource::Ore, Resource::Wheat)),
            &mut rng,
        )
        .unwrap();

        assert_eq!(game.players[0].resources.ore, before.ore + 1);
        assert_eq!(game.players[0].resources.wheat, before.wheat + 1);
    }

    #[test]
    fn test_year_of_plenty_needs_both_from_bank() {
        let mut game = two_player_game();
        roll(&mut game, 1, 1);
        hand_card(&mut game, 0, DevelopmentCard::YearOfPlenty);
        let left = game.bank.get(Resource::Ore);
        give(&mut game, 1, ResourceHand::single(Resource::Ore, left - 1));
        let mut rng = ScriptedRandomness::new();

        let result = game.apply(
            0,
            Move::PlayDevelopmentCard(CardPlay::YearOfPlenty(Resource::Ore, Resource::Ore)),
            &mut rng,
        );
        assert_eq!(result.unwrap_err(), GameError::BankDepleted);
    }

    #[test]
    fn test_road_building_places_two_free_roads() {
        let mut game = two_player_game();
        roll(&mut game, 1, 1);
        hand_card(&mut game, 0, DevelopmentCard::RoadBuilding);
        let hand = game.players[0].resources;
        let mut rng = ScriptedRandomness::new();

        game.apply_in_place(0, Move::PlayDevelopmentCard(CardPlay::RoadBuilding), &mut rng)
            .unwrap();
        assert_eq!(game.step(), Some(&TurnStep::RoadBuilding { remaining: 2 }));

        for _ in 0..2 {
            let site = game.legal_build_locations(0, StructureKind::Road)[0];
            let crate::building::BuildSite::Edge(edge) = site else {
                panic!("expected an edge");
            };
            game.apply_in_place(0, Move::PlaceRoad(edge), &mut rng).unwrap();
        }

        assert_eq!(game.step(), Some(&TurnStep::Build));
        assert_eq!(game.players[0].resources, hand);
        assert_eq!(game.pieces_remaining(0, StructureKind::Road), 11);
    }

    #[test]
    fn test_road_building_without_roads_left() {
        let mut game = two_player_game();
        roll(&mut game, 1, 1);
        hand_card(&mut game, 0, DevelopmentCard::RoadBuilding);
        use_up_pieces(&mut game, 0, StructureKind::Road, &[], &[]);
        let mut rng = ScriptedRandomness::new();

        let result = game.apply(0, Move::PlayDevelopmentCard(CardPlay::RoadBuilding), &mut rng);
        assert_eq!(result.unwrap_err(), GameError::PieceExhausted);
        assert!(game.players[0].has_playable(DevelopmentCard::RoadBuilding));
        assert!(!game.development_card_played);
    }

    #[test]
    fn test_road_building_with_one_road_left() {
        let mut game = two_player_game();
        roll(&mut game, 1, 1);
        hand_card(&mut game, 0, DevelopmentCard::RoadBuilding);
        let Some(crate::building::BuildSite::Edge(last)) =
            game.legal_build_locations(0, StructureKind::Road).first().copied()
        else {
            panic!("expected a road site");
        };
        use_up_pieces(&mut game, 0, StructureKind::Road, &[], &[last]);
        // Hand one piece back by lifting the most recent filler road
        game.structures.pop();
        assert_eq!(game.pieces_remaining(0, StructureKind::Road), 1);
        let mut rng = ScriptedRandomness::new();

        game.apply_in_place(0, Move::PlayDevelopmentCard(CardPlay::RoadBuilding), &mut rng)
            .unwrap();
        assert_eq!(game.step(), Some(&TurnStep::RoadBuilding { remaining: 1 }));

        game.apply_in_place(0, Move::PlaceRoad(last), &mut rng).unwrap();
        assert_eq!(game.step(), Some(&TurnStep::Build));
        assert_eq!(game.pieces_remaining(0, StructureKind::Road), 0);
    }
}
