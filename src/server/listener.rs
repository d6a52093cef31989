// ────────────────────────────────
// src/server/listener.rs
// Encapsulates the low‑level TCP bind so TLS can be swapped in later.
// ────────────────────────────────
use crate::startup::ListenConfig;
use anyhow::Result;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Bind the socket described by `config` and report the address the
/// kernel actually assigned (relevant when the port is 0).
pub async fn bind_tcp(config: &ListenConfig) -> Result<(TcpListener, SocketAddr)> {
    let listener = TcpListener::bind(config.socket_addr()).await?;
    let addr = listener.local_addr()?;
    tracing::debug!(%addr, "TCP listener bound");
    Ok((listener, addr))
}
