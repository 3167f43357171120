//! A game session persisted as a JSON snapshot file.

use settlers_core::{GameConfig, GameEvent, GameState, Move, PlayerId, RngRandomness};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::summary::GameSummary;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid game config: {0}")]
    Config(#[from] settlers_core::ConfigError),

    #[error("Invalid snapshot: {0}")]
    Snapshot(#[from] settlers_core::SnapshotError),

    #[error("Invalid move JSON: {0}")]
    InvalidMove(#[from] serde_json::Error),

    #[error("Move rejected: {0}")]
    Rejected(#[from] settlers_core::GameError),
}

/// A game loaded from (and saved back to) one snapshot file.
pub struct Session {
    pub path: PathBuf,
    pub game: GameState,
}

impl Session {
    /// Start a new game and write its first snapshot
    pub fn create(path: impl Into<PathBuf>, config: GameConfig) -> Result<Self, SessionError> {
        let session = Self {
            path: path.into(),
            game: GameState::new(config)?,
        };
        session.save()?;
        info!(path = %session.path.display(), "created game");
        Ok(session)
    }

    pub fn load(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let json = read(&path)?;
        let game = GameState::from_snapshot(&json)?;
        debug!(path = %path.display(), turn = game.turn_number, "loaded game");
        Ok(Self { path, game })
    }

    pub fn save(&self) -> Result<(), SessionError> {
        let json = self.game.to_snapshot_pretty()?;
        fs::write(&self.path, json).map_err(|source| SessionError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Apply a JSON-encoded move and save the new state.
    ///
    /// Without an explicit seed the randomness is derived from the game's seed and
    /// progress, so replaying the same moves gives the same game.
    pub fn apply_json(
        &mut self,
        player: PlayerId,
        move_json: &str,
        seed: Option<u64>,
    ) -> Result<Vec<GameEvent>, SessionError> {
        let mv: Move = serde_json::from_str(move_json)?;
        let seed = seed.unwrap_or_else(|| self.game.progress_seed());
        let mut rng = RngRandomness::seeded(seed);

        let events = self.game.apply_in_place(player, mv, &mut rng)?;
        self.save()?;
        info!(player, events = events.len(), "move applied");
        Ok(events)
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary::of(&self.game)
    }
}

fn read(path: &Path) -> Result<String, SessionError> {
    fs::read_to_string(path).map_err(|source| SessionError::Io {
        path: path.to_path_buf(),
        source,
    })
}
