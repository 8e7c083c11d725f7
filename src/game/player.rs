use async_trait::async_trait;
use std::io;

use crate::game::board::{Board, IllegalMove, Mark, Position};
use crate::game::session::SessionReport;
use crate::game::stats::{GameResult, Identities, Party};

/// What the session is blocked on when it calls [`LocalPlayer::waiting`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waiting {
    PeerMove,
    PeerDecision,
}

/// The human (or script) at this end of the connection.
///
/// Only the two `choose_*` methods feed the state machine. The rest are
/// notifications for display and default to doing nothing.
#[async_trait]
pub trait LocalPlayer: Send {
    /// Picks a square. May return an occupied one; the session re-asks.
    async fn choose_move(&mut self, board: &Board, mark: Mark) -> io::Result<Position>;

    async fn choose_continue(&mut self) -> io::Result<bool>;

    fn session_started(&mut self, _identities: &Identities, _mark: Mark) {}

    fn move_rejected(&mut self, _position: Position, _reason: &IllegalMove) {}

    fn waiting(&mut self, _on: Waiting) {}

    fn board_updated(&mut self, _board: &Board, _mover: Party) {}

    fn game_finished(&mut self, _result: GameResult) {}

    fn continuing(&mut self, _keep_playing: bool) {}

    fn session_ended(&mut self, _report: &SessionReport) {}
}
