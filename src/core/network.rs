use anyhow::{anyhow, Context, Result};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::core::lobby::validate_username;
use crate::game::error::SessionError;
use crate::game::protocol::{Message, MESSAGE_LEN};
use crate::game::stats::Identities;

/// Largest identity the handshake will read in one chunk.
pub const MAX_IDENTITY_LEN: usize = 1024;

/// Anything the session can talk over: a `TcpStream` in the binary, an
/// in-memory duplex pipe in tests.
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> Transport for T {}

pub struct InLobby;
pub struct Active;

pub struct NetworkManager<T, S> {
    stream: T,
    recv_timeout: Option<Duration>,
    _state: S,
}

impl<T: Transport, S> NetworkManager<T, S> {
    pub fn recv_timeout(&self) -> Option<Duration> {
        self.recv_timeout
    }
}

impl<T: Transport> NetworkManager<T, InLobby> {
    pub fn new(stream: T) -> Self {
        Self {
            stream,
            recv_timeout: None,
            _state: InLobby,
        }
    }

    /// Bounds every later receive. `None` waits forever.
    pub fn with_recv_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.recv_timeout = timeout;
        self
    }

    /// Swaps usernames. The joining side speaks first and the host answers;
    /// neither side acknowledges.
    pub async fn handshake(mut self, local_name: &str, is_host: bool) -> Result<(NetworkManager<T, Active>, Identities)> {
        let peer_name = if is_host {
            let peer = self.read_identity().await?;
            self.write_identity(local_name).await?;
            peer
        } else {
            self.write_identity(local_name).await?;
            self.read_identity().await?
        };

        info!(local = %local_name, peer = %peer_name, "handshake complete");
        Ok((self.upgrade(), Identities::new(local_name, peer_name)))
    }

    async fn write_identity(&mut self, name: &str) -> Result<()> {
        self.stream.write_all(name.as_bytes()).await.context("sending username")?;
        self.stream.flush().await?;
        Ok(())
    }

    async fn read_identity(&mut self) -> Result<String> {
        let mut buf = vec![0u8; MAX_IDENTITY_LEN];
        let read = self.stream.read(&mut buf);
        let n = match self.recv_timeout {
            Some(limit) => tokio::time::timeout(limit, read)
                .await
                .map_err(|_| anyhow!("peer sent no username within {limit:?}"))??,
            None => read.await?,
        };
        if n == 0 {
            return Err(anyhow!("peer closed the connection during the handshake"));
        }
        buf.truncate(n);

        let name = String::from_utf8(buf).context("peer username is not UTF-8")?;
        validate_username(&name).map_err(|e| anyhow!("peer username rejected: {e}"))?;
        Ok(name)
    }

    /// Skips the handshake. Used when identities are already known.
    pub fn upgrade(self) -> NetworkManager<T, Active> {
        NetworkManager {
            stream: self.stream,
            recv_timeout: self.recv_timeout,
            _state: Active,
        }
    }
}

impl<T: Transport> NetworkManager<T, Active> {
    pub async fn send(&mut self, msg: Message) -> Result<(), SessionError> {
        debug!(%msg, "send");
        self.stream.write_all(&msg.encode()).await.map_err(SessionError::from_stream)?;
        self.stream.flush().await.map_err(SessionError::from_stream)
    }

    /// Reads exactly one message. Which kind is legal is for the caller to
    /// decide.
    pub async fn receive(&mut self) -> Result<Message, SessionError> {
        let mut buf = [0u8; MESSAGE_LEN];
        let read = self.stream.read_exact(&mut buf);
        match self.recv_timeout {
            Some(limit) => tokio::time::timeout(limit, read)
                .await
                .map_err(|_| SessionError::Timeout(limit))?
                .map_err(SessionError::from_stream)?,
            None => read.await.map_err(SessionError::from_stream)?,
        };

        let msg = Message::decode(&buf)?;
        debug!(%msg, "receive");
        Ok(msg)
    }

    /// Best-effort close of the write half.
    pub async fn shutdown(&mut self) {
        if let Err(e) = self.stream.shutdown().await {
            debug!(error = %e, "shutdown failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::Position;
    use tokio::io::duplex;

    #[tokio::test]
    async fn handshake_swaps_names() {
        let (a, b) = duplex(64);
        let host = tokio::spawn(async move { NetworkManager::new(a).handshake("player2", true).await });
        let (_, joiner_ids) = NetworkManager::new(b).handshake("alice", false).await.unwrap();
        let (_, host_ids) = host.await.unwrap().unwrap();

        assert_eq!(joiner_ids, Identities::new("alice", "player2"));
        assert_eq!(host_ids, Identities::new("player2", "alice"));
    }

    #[tokio::test]
    async fn handshake_rejects_bad_username() {
        let (a, mut b) = duplex(64);
        b.write_all(b"bad name!").await.unwrap();
        let err = NetworkManager::new(a).handshake("player2", true).await.err().unwrap();
        assert!(err.to_string().contains("rejected"));
    }

    #[tokio::test]
    async fn messages_cross_one_byte_at_a_time() {
        let (a, b) = duplex(64);
        let mut left = NetworkManager::new(a).upgrade();
        let mut right = NetworkManager::new(b).upgrade();

        let three = Position::new(3).unwrap();
        left.send(Message::Move(three)).await.unwrap();
        left.send(Message::ContinueYes).await.unwrap();

        assert_eq!(right.receive().await.unwrap(), Message::Move(three));
        assert_eq!(right.receive().await.unwrap(), Message::ContinueYes);
    }

    #[tokio::test]
    async fn closed_peer_is_reported() {
        let (a, b) = duplex(64);
        let mut right = NetworkManager::new(b).upgrade();
        drop(a);
        assert!(matches!(right.receive().await, Err(SessionError::Closed)));
    }

    #[tokio::test]
    async fn receive_times_out() {
        let (_a, b) = duplex(64);
        let limit = Duration::from_millis(20);
        let mut right = NetworkManager::new(b).with_recv_timeout(Some(limit)).upgrade();
        assert!(matches!(right.receive().await, Err(SessionError::Timeout(d)) if d == limit));
    }

    #[tokio::test]
    async fn garbage_byte_is_a_decode_error() {
        let (mut a, b) = duplex(64);
        let mut right = NetworkManager::new(b).upgrade();
        a.write_all(b"x").await.unwrap();
        assert!(matches!(right.receive().await, Err(SessionError::Decode(_))));
    }
}
