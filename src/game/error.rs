use crate::game::board::IllegalMove;
use crate::game::protocol::{DecodeError, Message, MessageKind};
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Everything that ends a session early. All variants are fatal: the protocol
/// has no way to resynchronize once a round is lost.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("could not decode peer message: {0}")]
    Decode(#[from] DecodeError),
    #[error("peer sent {got} while a {expected} was expected")]
    UnexpectedMessage { expected: MessageKind, got: Message },
    #[error("peer made an illegal move: {0}")]
    IllegalPeerMove(#[source] IllegalMove),
    #[error("peer closed the connection")]
    Closed,
    #[error("no message from peer within {0:?}")]
    Timeout(Duration),
    #[error("stream error: {0}")]
    Stream(#[source] io::Error),
    #[error("local input failed: {0}")]
    Input(#[source] io::Error),
}

impl SessionError {
    /// Maps a transport failure, treating EOF and resets as the peer leaving.
    pub fn from_stream(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => SessionError::Closed,
            _ => SessionError::Stream(err),
        }
    }
}
