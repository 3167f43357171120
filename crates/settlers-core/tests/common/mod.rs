//! Helpers shared by the integration tests.

#![allow(dead_code)]

use settlers_core::*;

/// Move cards from the bank straight into a player's hand
pub fn give(game: &mut GameState, player: PlayerId, hand: ResourceHand) {
    for (resource, amount) in hand.iter() {
        let left = game.bank.get(resource);
        assert!(left >= amount, "bank has only {left} {resource}");
        game.bank.set(resource, left - amount);
        game.players[player as usize].resources.add(resource, amount);
    }
}

pub fn apply(game: &mut GameState, player: PlayerId, mv: Move) -> Vec<GameEvent> {
    let mut rng = ScriptedRandomness::new();
    let described = format!("{mv:?}");
    game.apply_in_place(player, mv, &mut rng)
        .unwrap_or_else(|err| panic!("{described} by player {player} failed: {err}"))
}

pub fn roll(game: &mut GameState, first: u8, second: u8) -> Vec<GameEvent> {
    let mut rng = ScriptedRandomness::new().with_dice([first, second]);
    let player = game.current_player;
    game.apply_in_place(player, Move::RollDice, &mut rng).unwrap()
}

pub fn vertex(q: i32, r: i32, direction: VertexDirection) -> VertexCoord {
    VertexCoord::new(HexCoord::new(q, r), direction)
}

pub fn edge(q: i32, r: i32, direction: EdgeDirection) -> EdgeCoord {
    EdgeCoord::new(HexCoord::new(q, r), direction)
}

/// Two players with every setup piece on inland vertices, so neither touches a port.
///
/// Player 0 sits at the top of the center hex and on the western hex, player 1 at
/// the bottom of the center hex and on the eastern hex.
pub fn inland_two_player_game(seed: u64) -> GameState {
    let mut game = GameState::new(GameConfig::with_player_count(2, seed)).unwrap();

    apply(&mut game, 0, Move::PlaceSettlement(vertex(0, 0, VertexDirection::North)));
    apply(&mut game, 0, Move::PlaceRoad(edge(0, 0, EdgeDirection::NorthEast)));
    apply(&mut game, 1, Move::PlaceSettlement(vertex(0, 0, VertexDirection::South)));
    apply(&mut game, 1, Move::PlaceRoad(edge(0, 0, EdgeDirection::SouthWest)));
    apply(&mut game, 1, Move::PlaceSettlement(vertex(1, 0, VertexDirection::SouthEast)));
    apply(&mut game, 1, Move::PlaceRoad(edge(1, 0, EdgeDirection::East)));
    apply(&mut game, 0, Move::PlaceSettlement(vertex(-1, 0, VertexDirection::NorthWest)));
    apply(&mut game, 0, Move::PlaceRoad(edge(-1, 0, EdgeDirection::West)));

    assert_eq!(game.step(), Some(&TurnStep::Roll));
    game
}

/// Move the robber to the first other tile, robbing the first eligible victim
pub fn move_robber_anywhere<R: Randomness>(game: &mut GameState, rng: &mut R) -> Vec<GameEvent> {
    let player = game.current_player;
    let tile = game
        .board
        .tiles()
        .iter()
        .map(|t| t.id)
        .find(|id| *id != game.robber_tile())
        .unwrap();
    let victim = game.robber_victims(player, tile).first().copied();
    game.apply_in_place(player, Move::MoveRobber { tile, victim }, rng).unwrap()
}

/// The first `count` cards of a hand in resource order
pub fn first_cards(hand: &ResourceHand, count: u32) -> ResourceHand {
    let mut picked = ResourceHand::new();
    let mut remaining = count;
    for (resource, amount) in hand.iter() {
        let take = amount.min(remaining);
        picked.add(resource, take);
        remaining -= take;
    }
    picked
}

/// Assert the cross-cutting properties every reachable state must keep
pub fn assert_consistent(game: &GameState) {
    if let Err(violation) = game.check_invariants() {
        panic!("{violation}");
    }
    for resource in Resource::ALL {
        let held: u32 = game.players.iter().map(|p| p.resources.get(resource)).sum();
        assert_eq!(held + game.bank.get(resource), 19, "{resource} not conserved");
    }
    for player in &game.players {
        assert_eq!(player.victory_points, game.expected_victory_points(player.id));
    }
}

/// Pick one legal-looking move for whoever must act next.
///
/// Returns the acting player with the move. Builds when it can, otherwise trades,
/// buys cards, plays knights and finally ends the turn.
pub fn choose_move<R: Randomness>(game: &GameState, rng: &mut R) -> (PlayerId, Move) {
    let player = game.current_player;

    if let Some(placing) = game.phase.placing() {
        let kind = match placing {
            SetupPlacing::Settlement => StructureKind::Settlement,
            SetupPlacing::Road => StructureKind::Road,
        };
        return (player, pick_site(game, player, kind, rng));
    }

    match game.step() {
        Some(TurnStep::Roll) => {
            if game.players[player as usize].has_playable(DevelopmentCard::Knight)
                && !game.development_card_played()
                && rng.choose_index(3) == 0
            {
                return (player, Move::PlayDevelopmentCard(CardPlay::Knight));
            }
            (player, Move::RollDice)
        }
        Some(TurnStep::Discard { pending }) => {
            let who = pending[0];
            let hand = game.players[who as usize].resources;
            (who, Move::Discard(first_cards(&hand, hand.total() / 2)))
        }
        Some(TurnStep::MoveRobber { .. }) => {
            let tiles: Vec<TileId> = game
                .board
                .tiles()
                .iter()
                .map(|t| t.id)
                .filter(|id| *id != game.robber_tile())
                .collect();
            let tile = tiles[rng.choose_index(tiles.len())];
            let victim = game.robber_victims(player, tile).first().copied();
            (player, Move::MoveRobber { tile, victim })
        }
        Some(TurnStep::RoadBuilding { .. }) => {
            if game.legal_build_locations(player, StructureKind::Road).is_empty() {
                (player, Move::EndTurn)
            } else {
                (player, pick_site(game, player, StructureKind::Road, rng))
            }
        }
        Some(TurnStep::Build) => build_phase_move(game, player, rng),
        None => (player, Move::EndTurn),
    }
}

fn build_phase_move<R: Randomness>(game: &GameState, player: PlayerId, rng: &mut R) -> (PlayerId, Move) {
    for kind in [StructureKind::City, StructureKind::Settlement, StructureKind::Road] {
        if game.can_build(player, kind) && (kind != StructureKind::Road || rng.choose_index(2) == 0) {
            return (player, pick_site(game, player, kind, rng));
        }
    }

    let seat = &game.players[player as usize];
    if seat.resources.can_afford(&ledger::costs::DEVELOPMENT_CARD) && !game.development_deck.is_empty() {
        return (player, Move::BuyDevelopmentCard);
    }

    if !game.development_card_played() {
        let plenty = game.bank.get(Resource::Wheat) > 0 && game.bank.get(Resource::Ore) > 0;
        let roads_left = game.pieces_remaining(player, StructureKind::Road) > 0;
        let plays = [
            (CardPlay::Knight, true),
            (CardPlay::Monopoly(Resource::ALL[rng.choose_index(5)]), true),
            (CardPlay::YearOfPlenty(Resource::Wheat, Resource::Ore), plenty),
            (CardPlay::RoadBuilding, roads_left),
        ];
        for (play, possible) in plays {
            if possible && seat.has_playable(play.card()) {
                return (player, Move::PlayDevelopmentCard(play));
            }
        }
    }

    for give in Resource::ALL {
        let ratio = game.trading_ratio(player, give);
        if seat.resources.get(give) >= ratio + 1 {
            let receive = Resource::ALL
                .into_iter()
                .filter(|r| *r != give && game.bank.get(*r) > 0)
                .min_by_key(|r| seat.resources.get(*r));
            if let Some(receive) = receive {
                return (player, Move::BankTrade { give, receive });
            }
        }
    }

    (player, Move::EndTurn)
}

fn pick_site<R: Randomness>(game: &GameState, player: PlayerId, kind: StructureKind, rng: &mut R) -> Move {
    let sites = game.legal_build_locations(player, kind);
    assert!(!sites.is_empty(), "no {kind:?} site for player {player}");
    match sites[rng.choose_index(sites.len())] {
        BuildSite::Vertex(vertex) => Move::PlaceSettlement(vertex),
        BuildSite::Edge(edge) => Move::PlaceRoad(edge),
        BuildSite::Upgrade(id) => Move::UpgradeToCity(id),
    }
}

/// Play up to `max_moves` moves, checking consistency after each one.
///
/// Every chosen move must succeed; returns the number of moves applied.
pub fn simulate<R: Randomness>(game: &mut GameState, rng: &mut R, max_moves: usize) -> usize {
    assert_consistent(game);
    for applied in 0..max_moves {
        if game.is_finished() {
            return applied;
        }
        let (player, mv) = choose_move(game, rng);
        if let Err(err) = game.apply_in_place(player, mv.clone(), rng) {
            panic!("move {applied}: {mv:?} by player {player} rejected: {err}");
        }
        assert_consistent(game);
    }
    max_moves
}
