//! Shared fixtures for unit tests.

use crate::actions::{GameEvent, Move};
use crate::board::PlayerId;
use crate::building::{BuildSite, Location, StructureKind};
use crate::config::GameConfig;
use crate::game::{GameState, SetupPlacing};
use crate::hex::{EdgeCoord, VertexCoord};
use crate::ledger::ResourceHand;
use crate::random::{Randomness, ScriptedRandomness};

/// Two players, setup finished, player 0 about to roll
pub fn two_player_game() -> GameState {
    let mut game = GameState::new(GameConfig::with_player_count(2, 42)).unwrap();
    let mut rng = ScriptedRandomness::new();
    complete_setup(&mut game, &mut rng);
    game
}

/// Move cards from the bank into a player's hand
pub fn give(game: &mut GameState, player: PlayerId, hand: ResourceHand) {
    for (resource, amount) in hand.iter() {
        if amount > 0 {
            game.grant_from_bank(player, resource, amount).unwrap();
        }
    }
}

/// Roll fixed dice for the current player
pub fn roll(game: &mut GameState, first: u8, second: u8) -> Vec<GameEvent> {
    let mut rng = ScriptedRandomness::new().with_dice([first, second]);
    let player = game.current_player;
    game.apply_in_place(player, Move::RollDice, &mut rng).unwrap()
}

/// Place the active seat's settlement and road on the first legal sites
pub fn place_first_legal_setup<R: Randomness + ?Sized>(game: &mut GameState, rng: &mut R) {
    let player = game.current_player;

    if game.phase.placing() == Some(SetupPlacing::Settlement) {
        let Some(BuildSite::Vertex(vertex)) = game.legal_build_locations(player, StructureKind::Settlement).first().copied()
        else {
            panic!("no settlement site left");
        };
        game.apply_in_place(player, Move::PlaceSettlement(vertex), rng).unwrap();
    }

    let Some(BuildSite::Edge(edge)) = game.legal_build_locations(player, StructureKind::Road).first().copied() else {
        panic!("no road site next to the new settlement");
    };
    game.apply_in_place(player, Move::PlaceRoad(edge), rng).unwrap();
}

pub fn complete_setup<R: Randomness + ?Sized>(game: &mut GameState, rng: &mut R) {
    while game.phase.is_setup() {
        place_first_legal_setup(game, rng);
    }
}

/// Put the rest of a player's `kind` pieces on the board, away from `keep_clear`.
///
/// Buildings go at least two edges from every vertex in `keep_clear` and roads
/// avoid every edge in `keep_clear_edges`. Victory points follow the pieces.
pub fn use_up_pieces(
    game: &mut GameState,
    player: PlayerId,
    kind: StructureKind,
    keep_clear: &[VertexCoord],
    keep_clear_edges: &[EdgeCoord],
) {
    let count = game.pieces_remaining(player, kind) as usize;
    let locations: Vec<Location> = match kind {
        StructureKind::Road => game
            .board
            .edges()
            .into_iter()
            .filter(|e| game.road_at(e).is_none() && !keep_clear_edges.contains(e))
            .take(count)
            .map(Location::Edge)
            .collect(),
        StructureKind::Settlement | StructureKind::City => game
            .board
            .vertices()
            .into_iter()
            .filter(|v| game.building_at(v).is_none())
            .filter(|v| keep_clear.iter().all(|k| k.distance_to(v) >= 2))
            .take(count)
            .map(Location::Vertex)
            .collect(),
    };
    assert_eq!(locations.len(), count, "not enough free sites");

    for location in locations {
        game.push_structure(player, kind, location);
        game.players[player as usize].victory_points += kind.victory_points();
    }
    assert_eq!(game.pieces_remaining(player, kind), 0);
}
