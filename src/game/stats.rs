use crate::game::board::{GameOutcome, Mark};
use serde::{Deserialize, Serialize};

/// Which end of the connection did something.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    Local,
    Peer,
}

/// A finished game seen from the local player's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Won,
    Lost,
    Tied,
}

/// The two usernames exchanged during the handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identities {
    pub local: String,
    pub peer: String,
}

impl Identities {
    pub fn new(local: impl Into<String>, peer: impl Into<String>) -> Self {
        Self { local: local.into(), peer: peer.into() }
    }

    pub fn name_of(&self, party: Party) -> &str {
        match party {
            Party::Local => &self.local,
            Party::Peer => &self.peer,
        }
    }
}

/// Running totals for one connection. Counters only ever go up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub last_mover: Option<Party>,
}

impl SessionStats {
    pub fn record_move(&mut self, mover: Party) {
        self.last_mover = Some(mover);
    }

    /// Counts a finished game. Returns `None` and records nothing if the
    /// board is still in progress.
    pub fn record_game(&mut self, outcome: GameOutcome, local: Mark) -> Option<GameResult> {
        let result = match outcome {
            GameOutcome::Win(mark) if mark == local => GameResult::Won,
            GameOutcome::Win(_) => GameResult::Lost,
            GameOutcome::Tie => GameResult::Tied,
            GameOutcome::InProgress => return None,
        };

        self.games_played += 1;
        match result {
            GameResult::Won => self.wins += 1,
            GameResult::Lost => self.losses += 1,
            GameResult::Tied => self.ties += 1,
        }
        Some(result)
    }
}
