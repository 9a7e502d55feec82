// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The accept loop. Each accepted connection is dispatched serially
//! against a shared `Broker`; the lock inside the broker's atomic
//! envelope is what actually serializes concurrent connections, so a
//! `tokio` multi-connection listener never bypasses the atomicity
//! guarantee (§5).

use crate::dispatch::dispatch;
use qjb_engine::Broker;
use qjb_wire::{read_message, write_message, Request, Response};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, UnixListener};
use tracing::{debug, warn};

/// Either transport the spec calls out (§4.16): a Unix domain socket
/// or a TCP listener, selected by the `bind` address's scheme.
pub enum Listener {
    Tcp(TcpListener),
    Unix(UnixListener),
}

impl Listener {
    /// `bind` is either `unix:<path>` or a `host:port` TCP address.
    pub async fn bind(bind: &str) -> std::io::Result<Self> {
        if let Some(path) = bind.strip_prefix("unix:") {
            let _ = std::fs::remove_file(path);
            Ok(Listener::Unix(UnixListener::bind(path)?))
        } else {
            Ok(Listener::Tcp(TcpListener::bind(bind).await?))
        }
    }

    pub fn local_addr_display(&self) -> String {
        match self {
            Listener::Tcp(listener) => {
                listener.local_addr().map(|a| a.to_string()).unwrap_or_else(|_| "tcp:?".to_string())
            }
            Listener::Unix(_) => "unix socket".to_string(),
        }
    }
}

/// Accept connections forever, dispatching each one against `broker`
/// on its own task. Returns only on an accept-level I/O error.
pub async fn serve(listener: Listener, broker: Arc<Broker>) -> std::io::Result<()> {
    match listener {
        Listener::Tcp(listener) => loop {
            let (stream, addr) = listener.accept().await?;
            debug!(%addr, "accepted connection");
            let broker = Arc::clone(&broker);
            tokio::spawn(async move {
                handle_connection(stream, broker).await;
            });
        },
        Listener::Unix(listener) => loop {
            let (stream, _addr) = listener.accept().await?;
            debug!("accepted connection");
            let broker = Arc::clone(&broker);
            tokio::spawn(async move {
                handle_connection(stream, broker).await;
            });
        },
    }
}

/// Serve one connection: read a framed `Request`, dispatch it,
/// write back the framed `Response`, and repeat until the peer
/// disconnects or sends something that isn't valid JSON.
async fn handle_connection<S: AsyncRead + AsyncWrite + Unpin>(mut stream: S, broker: Arc<Broker>) {
    loop {
        let payload = match read_message(&mut stream).await {
            Ok(payload) => payload,
            Err(_) => return, // EOF or transport error: peer is gone.
        };
        let request: Request = match qjb_wire::decode(&payload) {
            Ok(request) => request,
            Err(err) => {
                warn!(%err, "malformed request");
                let response = Response::Error { message: err.to_string() };
                if send(&mut stream, &response).await.is_err() {
                    return;
                }
                continue;
            }
        };
        let response = dispatch(&broker, request);
        if send(&mut stream, &response).await.is_err() {
            return;
        }
    }
}

async fn send<S: AsyncWrite + Unpin>(stream: &mut S, response: &Response) -> std::io::Result<()> {
    let Ok(bytes) = qjb_wire::encode(response) else {
        return Ok(());
    };
    write_message(stream, &bytes).await.map_err(|_| std::io::ErrorKind::BrokenPipe.into())
}
