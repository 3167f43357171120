//! Game configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;
pub const DEFAULT_VICTORY_POINTS: u32 = 10;

/// Everything needed to start a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// One name per seat, in turn order
    pub player_names: Vec<String>,
    /// Seed for board generation
    pub seed: u64,
    pub victory_points_to_win: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_names: (1..=MAX_PLAYERS).map(|i| format!("Player {i}")).collect(),
            seed: 0,
            victory_points_to_win: DEFAULT_VICTORY_POINTS,
        }
    }
}

impl GameConfig {
    pub fn new(player_names: Vec<String>, seed: u64) -> Self {
        Self {
            player_names,
            seed,
            ..Self::default()
        }
    }

    /// Default names for `count` seats
    pub fn with_player_count(count: usize, seed: u64) -> Self {
        Self::new((1..=count).map(|i| format!("Player {i}")).collect(), seed)
    }

    pub fn with_victory_points(mut self, target: u32) -> Self {
        self.victory_points_to_win = target;
        self
    }

    pub fn player_count(&self) -> usize {
        self.player_names.len()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let count = self.player_count();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(ConfigError::PlayerCount(count));
        }
        if let Some(seat) = self.player_names.iter().position(|n| n.trim().is_empty()) {
            return Err(ConfigError::EmptyName(seat));
        }
        if self.victory_points_to_win == 0 {
            return Err(ConfigError::ZeroVictoryTarget);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("expected {MIN_PLAYERS}-{MAX_PLAYERS} players, got {0}")]
    PlayerCount(usize),

    #[error("player in seat {0} has an empty name")]
    EmptyName(usize),

    #[error("victory point target must be positive")]
    ZeroVictoryTarget,
}
