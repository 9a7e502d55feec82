// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A thin client connection to `qjbd`: dial the configured address,
//! send one framed `Request`, read back one framed `Response`.

use anyhow::Context;
use qjb_wire::{read_message, write_message, Request, Response};
use tokio::net::{TcpStream, UnixStream};

enum Connection {
    Tcp(TcpStream),
    Unix(UnixStream),
}

/// `bind` is either `unix:<path>` or a `host:port` TCP address,
/// mirroring `qjb-daemon::Listener::bind`.
async fn connect(bind: &str) -> anyhow::Result<Connection> {
    if let Some(path) = bind.strip_prefix("unix:") {
        let stream = UnixStream::connect(path).await.with_context(|| format!("connecting to {path}"))?;
        Ok(Connection::Unix(stream))
    } else {
        let stream = TcpStream::connect(bind).await.with_context(|| format!("connecting to {bind}"))?;
        Ok(Connection::Tcp(stream))
    }
}

/// Connect, send `request`, and return the daemon's `Response`.
pub async fn call(bind: &str, request: Request) -> anyhow::Result<Response> {
    let mut connection = connect(bind).await?;
    let payload = qjb_wire::encode(&request).context("encoding request")?;
    write_request(&mut connection, &payload).await?;
    let reply = read_response(&mut connection).await?;
    qjb_wire::decode(&reply).context("decoding response")
}

async fn write_request(connection: &mut Connection, payload: &[u8]) -> anyhow::Result<()> {
    match connection {
        Connection::Tcp(stream) => write_message(stream, payload).await,
        Connection::Unix(stream) => write_message(stream, payload).await,
    }
    .context("writing request")
}

async fn read_response(connection: &mut Connection) -> anyhow::Result<Vec<u8>> {
    match connection {
        Connection::Tcp(stream) => read_message(stream).await,
        Connection::Unix(stream) => read_message(stream).await,
    }
    .context("reading response")
}
