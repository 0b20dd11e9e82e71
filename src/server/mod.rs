//! Network session mode.
//!
//! Accepts TCP connections, upgrades them to WebSocket, and hands each one to
//! the [`Room`]. A single [`Processor`] task answers every client.

pub mod processor;
pub mod room;

use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::interpreter::Interpreter;

pub use processor::{Delivery, Processor};
pub use room::{Frame, Room, Session, SessionId};

/// Binds the listening socket.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::io(format!("Failed to bind {addr}: {e}")))
}

/// Serves clients on `listener` until `shutdown` is cancelled.
///
/// On shutdown the accept loop stops, every session is closed, and the
/// processor is awaited. Handshakes still in flight at that point find the
/// room closed and drop their connection.
pub async fn serve(
    listener: TcpListener,
    interpreter: Interpreter,
    settings: &ServerConfig,
    shutdown: CancellationToken,
) -> Result<()> {
    let (room, inbound) = Room::new(settings.inbound_capacity, settings.outbound_capacity);
    let processor = Processor::new(interpreter, room.clone(), inbound, shutdown.clone());
    let processor_task = tokio::spawn(processor.run());

    let local = listener.local_addr()?;
    info!(addr = %local, "listening for websocket clients");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,

            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(err = %e, "accept failed");
                        continue;
                    }
                };
                let room = room.clone();
                tokio::spawn(async move {
                    if let Err(e) = open_session(room, stream, peer).await {
                        warn!(peer = %peer, err = %e, "websocket handshake failed");
                    }
                });
            }
        }
    }

    let closed = room.close_all().await;
    info!(sessions = closed, "closed all sessions");

    let handled = processor_task
        .await
        .map_err(|e| ServerError::internal(format!("command processor panicked: {e}")))?;
    info!(frames = handled, "server stopped");
    Ok(())
}

async fn open_session(room: Room, stream: TcpStream, peer: SocketAddr) -> anyhow::Result<()> {
    let ws = tokio_tungstenite::accept_async(stream)
        .await
        .context("accept ws")?;
    let id = room.accept(ws).await.context("register session")?;
    info!(session = %id, peer = %peer, "client connected");
    Ok(())
}
