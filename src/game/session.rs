//! The turn-taking state machine shared by both roles.
//!
//! The peers never exchange state or sequence numbers. They stay in step
//! only because both start from the same phase for their role and apply the
//! same transitions to the same byte stream: a move is always followed by the
//! other side's move until the board is terminal, and a terminal board is
//! always followed by exactly one continuation byte from the decider. A
//! message of the wrong kind for the current phase means the peers have
//! drifted apart and ends the session.
use tracing::{debug, error, info, instrument, warn};

use crate::core::network::{Active, NetworkManager, Transport};
use crate::game::board::{Board, Position};
use crate::game::error::SessionError;
use crate::game::player::{LocalPlayer, Waiting};
use crate::game::protocol::{Message, MessageKind};
use crate::game::role::Role;
use crate::game::stats::{Identities, Party, SessionStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingLocalMove,
    AwaitingRemoteMove,
    GameOver,
    AwaitingContinueDecision,
    Terminated,
}

/// What a finished session hands back to its caller.
#[derive(Debug)]
pub struct SessionReport {
    pub stats: SessionStats,
    pub identities: Identities,
    /// `None` when the players agreed to stop.
    pub error: Option<SessionError>,
}

impl SessionReport {
    pub fn is_clean(&self) -> bool {
        self.error.is_none()
    }
}

pub struct Session<T, P> {
    role: Role,
    net: NetworkManager<T, Active>,
    player: P,
    identities: Identities,
    board: Board,
    stats: SessionStats,
    phase: Phase,
}

impl<T: Transport, P: LocalPlayer> Session<T, P> {
    pub fn new(role: Role, net: NetworkManager<T, Active>, player: P, identities: Identities) -> Self {
        Self {
            role,
            net,
            player,
            identities,
            board: Board::new(),
            stats: SessionStats::default(),
            phase: role.opening_phase(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Plays games until the players stop or the connection fails.
    pub async fn run(mut self) -> SessionReport {
        info!(role = ?self.role, peer = %self.identities.peer, "session started");
        self.player.session_started(&self.identities, self.role.mark());

        let error = loop {
            match self.step().await {
                Ok(Phase::Terminated) => break None,
                Ok(_) => {}
                Err(e) => {
                    error!(error = %e, phase = ?self.phase, "session aborted");
                    self.phase = Phase::Terminated;
                    break Some(e);
                }
            }
        };
        self.net.shutdown().await;

        info!(
            games = self.stats.games_played,
            wins = self.stats.wins,
            losses = self.stats.losses,
            ties = self.stats.ties,
            "session terminated"
        );
        let report = SessionReport {
            stats: self.stats,
            identities: self.identities,
            error,
        };
        self.player.session_ended(&report);
        report
    }

    /// Runs one transition and returns the phase it lands in.
    pub async fn step(&mut self) -> Result<Phase, SessionError> {
        let next = match self.phase {
            Phase::AwaitingLocalMove => self.local_move().await?,
            Phase::AwaitingRemoteMove => self.remote_move().await?,
            Phase::GameOver => self.game_over(),
            Phase::AwaitingContinueDecision => self.continue_decision().await?,
            Phase::Terminated => Phase::Terminated,
        };
        debug!(from = ?self.phase, to = ?next, "transition");
        self.phase = next;
        Ok(next)
    }

    #[instrument(skip(self), fields(mark = %self.role.mark()))]
    async fn local_move(&mut self) -> Result<Phase, SessionError> {
        let mark = self.role.mark();
        let position = loop {
            let position = self
                .player
                .choose_move(&self.board, mark)
                .await
                .map_err(SessionError::Input)?;
            match self.board.place(position, mark) {
                Ok(()) => break position,
                Err(reason) => {
                    warn!(%position, %reason, "local move rejected");
                    self.player.move_rejected(position, &reason);
                }
            }
        };

        self.net.send(Message::Move(position)).await?;
        self.moved(Party::Local, position);
        Ok(self.after_move(Phase::AwaitingRemoteMove))
    }

    #[instrument(skip(self), fields(mark = %self.role.peer_mark()))]
    async fn remote_move(&mut self) -> Result<Phase, SessionError> {
        self.player.waiting(Waiting::PeerMove);
        let position = match self.net.receive().await? {
            Message::Move(position) => position,
            got => {
                return Err(SessionError::UnexpectedMessage {
                    expected: MessageKind::Move,
                    got,
                })
            }
        };

        self.board
            .place(position, self.role.peer_mark())
            .map_err(SessionError::IllegalPeerMove)?;
        self.moved(Party::Peer, position);
        Ok(self.after_move(Phase::AwaitingLocalMove))
    }

    fn moved(&mut self, mover: Party, position: Position) {
        debug!(?mover, %position, "move applied");
        self.stats.record_move(mover);
        self.player.board_updated(&self.board, mover);
    }

    fn after_move(&self, otherwise: Phase) -> Phase {
        if self.board.is_terminal() {
            Phase::GameOver
        } else {
            otherwise
        }
    }

    fn game_over(&mut self) -> Phase {
        match self.stats.record_game(self.board.outcome(), self.role.mark()) {
            Some(result) => {
                info!(?result, games = self.stats.games_played, "game finished");
                self.player.game_finished(result);
            }
            None => warn!("game over entered on an open board"),
        }
        Phase::AwaitingContinueDecision
    }

    async fn continue_decision(&mut self) -> Result<Phase, SessionError> {
        let keep_playing = if self.role.decides_continuation() {
            let keep_playing = self.player.choose_continue().await.map_err(SessionError::Input)?;
            self.net.send(Message::continue_with(keep_playing)).await?;
            keep_playing
        } else {
            self.player.waiting(Waiting::PeerDecision);
            match self.net.receive().await? {
                Message::ContinueYes => true,
                Message::ContinueNo => false,
                got => {
                    return Err(SessionError::UnexpectedMessage {
                        expected: MessageKind::Continue,
                        got,
                    })
                }
            }
        };

        info!(keep_playing, "continuation agreed");
        self.player.continuing(keep_playing);
        if keep_playing {
            self.board.reset();
            Ok(self.role.opening_phase())
        } else {
            Ok(Phase::Terminated)
        }
    }
}
