//! Human and JSON views of a game for the `inspect` command.

use serde::Serialize;
use settlers_core::{GamePhase, GameState, PlayerId, ResourceHand, TurnStep};
use std::fmt;

/// Public view of one seat.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub victory_points: u32,
    pub resources: ResourceHand,
    pub development_cards: u32,
    pub knights_played: u32,
    pub longest_road: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameSummary {
    pub turn: u32,
    pub current_player: PlayerId,
    pub phase: String,
    pub last_roll: Option<(u8, u8)>,
    pub bank: ResourceHand,
    pub deck_remaining: usize,
    pub longest_road_owner: Option<PlayerId>,
    pub largest_army_owner: Option<PlayerId>,
    pub winner: Option<PlayerId>,
    pub players: Vec<PlayerSummary>,
}

impl GameSummary {
    pub fn of(game: &GameState) -> Self {
        let players = game
            .players
            .iter()
            .map(|p| PlayerSummary {
                id: p.id,
                name: p.name.clone(),
                victory_points: p.victory_points,
                resources: p.resources,
                development_cards: p.development_cards.total() + p.new_development_cards.total(),
                knights_played: p.knights_played,
                longest_road: game.longest_road_length(p.id),
            })
            .collect();

        Self {
            turn: game.turn_number,
            current_player: game.current_player,
            phase: describe_phase(&game.phase),
            last_roll: game.last_roll,
            bank: game.bank,
            deck_remaining: game.development_deck.len(),
            longest_road_owner: game.longest_road_owner,
            largest_army_owner: game.largest_army_owner,
            winner: game.winner(),
            players,
        }
    }
}

fn describe_phase(phase: &GamePhase) -> String {
    match phase {
        GamePhase::Setup1 { placing } => format!("setup round 1, place {placing:?}"),
        GamePhase::Setup2 { placing } => format!("setup round 2, place {placing:?}"),
        GamePhase::Main { step } => match step {
            TurnStep::Roll => "roll dice".to_string(),
            TurnStep::Discard { pending } => format!("waiting for discards from {pending:?}"),
            TurnStep::MoveRobber { .. } => "move the robber".to_string(),
            TurnStep::Build => "build, trade or end turn".to_string(),
            TurnStep::RoadBuilding { remaining } => format!("place {remaining} free road(s)"),
        },
        GamePhase::End { winner } => format!("finished, player {winner} won"),
    }
}

fn hand(f: &mut fmt::Formatter<'_>, hand: &ResourceHand) -> fmt::Result {
    let parts: Vec<String> = hand
        .iter()
        .map(|(resource, count)| format!("{resource} {count}"))
        .collect();
    write!(f, "{}", parts.join(", "))
}

impl fmt::Display for GameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Turn {} | player {} to act | {}", self.turn, self.current_player, self.phase)?;
        if let Some((a, b)) = self.last_roll {
            writeln!(f, "Last roll: {a} + {b} = {}", a + b)?;
        }
        write!(f, "Bank: ")?;
        hand(f, &self.bank)?;
        writeln!(f, " | development cards left: {}", self.deck_remaining)?;

        for player in &self.players {
            let mut badges = Vec::new();
            if self.longest_road_owner == Some(player.id) {
                badges.push("longest road");
            }
            if self.largest_army_owner == Some(player.id) {
                badges.push("largest army");
            }
            write!(
                f,
                "  [{}] {:<12} {:>2} VP  road {:>2}  knights {}  cards {}  ",
                player.id,
                player.name,
                player.victory_points,
                player.longest_road,
                player.knights_played,
                player.development_cards
            )?;
            hand(f, &player.resources)?;
            if !badges.is_empty() {
                write!(f, "  ({})", badges.join(", "))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
