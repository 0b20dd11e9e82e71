//! The room of connected clients.
//!
//! Every connection becomes a [`Session`] with a fresh [`SessionId`]. Each
//! session gets a read loop that forwards inbound frames into the room's
//! single shared queue and a writer task that drains its outbound channel
//! into the socket. The room alone owns the id-to-session map; read loops
//! remove their session when the connection ends.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use futures::{SinkExt, Stream, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::WebSocketStream;
use tracing::{info, warn};

use crate::error::{Result, ServerError};

/// Identifier of a connected client. Assigned in increasing order and never
/// reused while the process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One inbound message tagged with its sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub session: SessionId,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(session: SessionId, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            session,
            payload: payload.into(),
        }
    }

    /// Payload as text; invalid UTF-8 is replaced rather than rejected.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// A live client as seen by the room: its id and outbound channel.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    outbound: mpsc::Sender<String>,
}

impl Session {
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Queues one line of output for the client without waiting.
    ///
    /// Fails if the client has stopped reading and its queue is full, or if
    /// its writer has gone away.
    pub fn send(&self, text: String) -> Result<()> {
        self.outbound.try_send(text).map_err(|e| match e {
            TrySendError::Full(_) => {
                ServerError::transport(format!("session {} is not reading", self.id))
            }
            TrySendError::Closed(_) => {
                ServerError::transport(format!("session {} is closed", self.id))
            }
        })
    }
}

#[derive(Debug, Default)]
struct Clients {
    next_id: u64,
    closed: bool,
    sessions: HashMap<SessionId, Session>,
}

#[derive(Debug)]
struct RoomInner {
    clients: Mutex<Clients>,
    inbound: mpsc::Sender<Frame>,
    outbound_capacity: usize,
}

/// Shared handle to the set of connected clients.
#[derive(Debug, Clone)]
pub struct Room {
    inner: Arc<RoomInner>,
}

impl Room {
    /// Creates a room and the receiving end of its inbound queue.
    ///
    /// The receiver must have exactly one consumer; see
    /// [`Processor`](super::processor::Processor).
    pub fn new(inbound_capacity: usize, outbound_capacity: usize) -> (Self, mpsc::Receiver<Frame>) {
        let (inbound, receiver) = mpsc::channel(inbound_capacity);
        let room = Self {
            inner: Arc::new(RoomInner {
                clients: Mutex::new(Clients::default()),
                inbound,
                outbound_capacity,
            }),
        };
        (room, receiver)
    }

    /// Adds a session without a transport attached and returns the receiving
    /// end of its outbound channel. Fails once [`Room::close_all`] has run.
    pub async fn register(&self) -> Result<(SessionId, mpsc::Receiver<String>)> {
        let (outbound, receiver) = mpsc::channel(self.inner.outbound_capacity);
        let mut clients = self.inner.clients.lock().await;
        if clients.closed {
            return Err(ServerError::transport("room is closed"));
        }
        clients.next_id += 1;
        let id = SessionId(clients.next_id);
        clients.sessions.insert(id, Session { id, outbound });
        Ok((id, receiver))
    }

    /// Takes ownership of an upgraded WebSocket connection.
    ///
    /// Registers a session and spawns its read loop and writer task. A write
    /// failure removes the session just like a read failure does.
    ///
    /// If the room is already closed the connection is dropped.
    pub async fn accept<S>(&self, ws: WebSocketStream<S>) -> Result<SessionId>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (id, mut outbound) = self.register().await?;
        let (mut sink, stream) = ws.split();

        let room = self.clone();
        tokio::spawn(async move {
            while let Some(text) = outbound.recv().await {
                if let Err(e) = sink.send(Message::Text(text)).await {
                    warn!(session = %id, err = %e, "write failed");
                    room.remove(id).await;
                    break;
                }
            }
            let _ = sink.close().await;
        });

        let room = self.clone();
        tokio::spawn(async move { room.read_loop(id, stream).await });

        Ok(id)
    }

    /// Forwards frames from `stream` until it closes or fails, then removes
    /// the session.
    async fn read_loop<St>(self, id: SessionId, mut stream: St)
    where
        St: Stream<Item = std::result::Result<Message, WsError>> + Unpin,
    {
        while let Some(message) = stream.next().await {
            let payload = match message {
                Ok(Message::Text(text)) => text.into_bytes(),
                Ok(Message::Binary(bytes)) => bytes,
                Ok(Message::Close(_)) => break,
                Ok(_) => continue,
                Err(e) => {
                    warn!(session = %id, err = %e, "read failed");
                    break;
                }
            };
            if let Err(e) = self.enqueue(id, payload).await {
                warn!(session = %id, err = %e, "dropping inbound frame");
                break;
            }
        }

        self.remove(id).await;
        info!(session = %id, "client disconnected");
    }

    /// Pushes a frame onto the shared inbound queue.
    pub async fn enqueue(&self, session: SessionId, payload: impl Into<Vec<u8>>) -> Result<()> {
        self.inner
            .inbound
            .send(Frame::new(session, payload))
            .await
            .map_err(|_| ServerError::internal("command processor has stopped"))
    }

    /// Returns the session if it is still connected.
    pub async fn lookup(&self, id: SessionId) -> Option<Session> {
        self.inner.clients.lock().await.sessions.get(&id).cloned()
    }

    /// Removes a session. Returns false if it was already gone.
    pub async fn remove(&self, id: SessionId) -> bool {
        self.inner.clients.lock().await.sessions.remove(&id).is_some()
    }

    /// Drops every session, which closes their writer tasks, and refuses any
    /// later registration.
    pub async fn close_all(&self) -> usize {
        let mut clients = self.inner.clients.lock().await;
        clients.closed = true;
        let count = clients.sessions.len();
        clients.sessions.clear();
        count
    }

    pub async fn len(&self) -> usize {
        self.inner.clients.lock().await.sessions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
