use anyhow::{Context, Result};
use std::time::Duration;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tracing::info;

use crate::core::network::{Active, NetworkManager, MAX_IDENTITY_LEN};
use crate::game::stats::Identities;

/// Username the host uses when none is given.
pub const DEFAULT_HOST_NAME: &str = "player2";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsernameError {
    #[error("username must not be empty")]
    Empty,
    #[error("username must be at most 1024 bytes")]
    TooLong,
    #[error("username must consist of only letters or numbers")]
    NotAlphanumeric,
}

pub fn validate_username(name: &str) -> Result<(), UsernameError> {
    if name.is_empty() {
        Err(UsernameError::Empty)
    } else if name.len() > MAX_IDENTITY_LEN {
        Err(UsernameError::TooLong)
    } else if !name.chars().all(char::is_alphanumeric) {
        Err(UsernameError::NotAlphanumeric)
    } else {
        Ok(())
    }
}

/// Binds `addr` and waits for exactly one peer.
pub async fn accept_one(addr: &str) -> Result<TcpStream> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    println!("Waiting for player to connect on {}...", listener.local_addr()?);

    let (stream, peer_addr) = listener.accept().await?;
    info!(%peer_addr, "peer connected");
    Ok(stream)
}

pub async fn connect(addr: &str) -> Result<TcpStream> {
    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("connecting to {addr}"))?;
    info!(%addr, "connected to host");
    Ok(stream)
}

/// Connection setup for either side: get a stream, then swap usernames.
pub async fn establish(
    stream: TcpStream,
    local_name: &str,
    is_host: bool,
    recv_timeout: Option<Duration>,
) -> Result<(NetworkManager<TcpStream, Active>, Identities)> {
    stream.set_nodelay(true)?;
    NetworkManager::new(stream)
        .with_recv_timeout(recv_timeout)
        .handshake(local_name, is_host)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames_are_alphanumeric() {
        assert_eq!(validate_username("alice42"), Ok(()));
        assert_eq!(validate_username(DEFAULT_HOST_NAME), Ok(()));
        assert_eq!(validate_username(""), Err(UsernameError::Empty));
        assert_eq!(validate_username("bob smith"), Err(UsernameError::NotAlphanumeric));
        assert_eq!(validate_username("eve!"), Err(UsernameError::NotAlphanumeric));
        assert_eq!(validate_username(&"a".repeat(MAX_IDENTITY_LEN + 1)), Err(UsernameError::TooLong));
    }

    #[tokio::test]
    async fn tcp_peers_meet() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let host = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            establish(stream, "player2", true, None).await.unwrap().1
        });
        let joiner = connect(&addr).await.unwrap();
        let (_, ids) = establish(joiner, "alice", false, None).await.unwrap();

        assert_eq!(ids.peer, "player2");
        assert_eq!(host.await.unwrap().peer, "alice");
    }
}
