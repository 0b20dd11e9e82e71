//! The command processor: the only consumer of the room's inbound queue.
//!
//! Frames are handled one at a time in arrival order, so operations never run
//! concurrently no matter how many clients are connected.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::room::{Frame, Room};
use crate::interpreter::Interpreter;

/// What happened to the result of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Queued on the session's outbound channel.
    Sent,
    /// The session had already left the room; nothing was written.
    Dropped,
    /// The session's channel was full or closed; the session was removed.
    Failed,
}

/// Drains the inbound queue, interprets each frame, and answers the sender.
pub struct Processor {
    interpreter: Interpreter,
    room: Room,
    inbound: mpsc::Receiver<Frame>,
    shutdown: CancellationToken,
}

impl Processor {
    pub fn new(
        interpreter: Interpreter,
        room: Room,
        inbound: mpsc::Receiver<Frame>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            interpreter,
            room,
            inbound,
            shutdown,
        }
    }

    /// Runs until shutdown is signalled or the inbound queue closes.
    /// Returns the number of frames handled.
    pub async fn run(mut self) -> usize {
        let mut handled = 0;

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => {
                    info!("command processor shutting down");
                    break;
                }

                frame = self.inbound.recv() => {
                    let Some(frame) = frame else {
                        debug!("inbound queue closed");
                        break;
                    };
                    self.handle(frame).await;
                    handled += 1;
                }
            }
        }

        handled
    }

    /// Interprets one frame and writes the result back if the sender is
    /// still connected.
    ///
    /// Never waits on a client: a session that cannot take the result right
    /// away is removed from the room.
    pub async fn handle(&self, frame: Frame) -> Delivery {
        let input = frame.text();
        let outcome = self.interpreter.execute(&input);
        let reply = outcome.to_string();
        debug!(session = %frame.session, input = %input, ok = outcome.is_success(), "processed");

        let Some(session) = self.room.lookup(frame.session).await else {
            info!(session = %frame.session, "session gone; result dropped");
            return Delivery::Dropped;
        };

        match session.send(reply) {
            Ok(()) => Delivery::Sent,
            Err(e) => {
                warn!(
                    session = %frame.session,
                    err = %e,
                    "could not deliver result; dropping session"
                );
                self.room.remove(frame.session).await;
                Delivery::Failed
            }
        }
    }
}
