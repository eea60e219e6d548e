//! # Push channel
//!
//! One long-lived Socket.IO connection to the backend, redialed after a
//! fixed delay whenever it drops. Decoded events fan out to any number of
//! subscribers over a [`tokio::sync::broadcast`] channel; control commands
//! flow the other way through an unbounded mpsc queue.
//!
//! ## Lifecycle
//!
//! ```text
//! dial ──► open(0{..}) ──► send 40 ──► 40 ──► Connected ──► events...
//!   ▲                                                          │
//!   └──────────── sleep(reconnect_delay) ◄── Disconnected ◄────┘
//! ```
//!
//! A failed dial produces no event; `Disconnected` is only emitted for a
//! session that reached `Connected`. Undecodable frames and payloads are
//! logged and dropped without tearing the session down.

pub mod codec;
mod error;
pub mod events;

pub use codec::Packet;
pub use error::ChannelError;
pub use events::{ControlCommand, PushEvent};

use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

/// Buffered events per subscriber before it starts lagging.
const EVENT_BUFFER: usize = 256;

/// Handle to the background connection task.
#[derive(Debug)]
pub struct ChannelHandle {
    events: broadcast::Sender<PushEvent>,
    commands: mpsc::UnboundedSender<ControlCommand>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl ChannelHandle {
    /// Spawn the connection task.
    ///
    /// The returned receiver is subscribed before the first dial, so it sees
    /// every event including the first `Connected`.
    pub fn spawn(
        url: String,
        reconnect_delay: Duration,
        cancel: CancellationToken,
    ) -> (Self, broadcast::Receiver<PushEvent>) {
        let (events, first) = broadcast::channel(EVENT_BUFFER);
        let (commands, commands_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run(
            url,
            reconnect_delay,
            events.clone(),
            commands_rx,
            cancel.clone(),
        ));

        (
            Self {
                events,
                commands,
                cancel,
                task,
            },
            first,
        )
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PushEvent> {
        self.events.subscribe()
    }

    /// Queue a command for the backend.
    ///
    /// Commands issued while disconnected are dropped by the session.
    pub fn send(&self, command: ControlCommand) -> Result<(), ChannelError> {
        self.commands
            .send(command)
            .map_err(|_| ChannelError::Closed)
    }

    /// Stop the task and wait for it to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Push channel task ended abnormally");
        }
    }
}

async fn run(
    url: String,
    reconnect_delay: Duration,
    events: broadcast::Sender<PushEvent>,
    mut commands: mpsc::UnboundedReceiver<ControlCommand>,
    cancel: CancellationToken,
) {
    tracing::info!(url = %url, "Push channel starting");

    loop {
        if cancel.is_cancelled() {
            break;
        }

        match tokio_tungstenite::connect_async(url.as_str()).await {
            Ok((stream, _response)) => {
                tracing::debug!(url = %url, "Websocket opened");
                session(stream, &events, &mut commands, &cancel).await;
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Push channel dial failed");
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(reconnect_delay) => {
                tracing::debug!(url = %url, "Redialing push channel");
            }
        }
    }

    tracing::info!("Push channel stopped");
}

fn emit(events: &broadcast::Sender<PushEvent>, event: PushEvent) {
    tracing::trace!(event = event.name(), "Push event");
    // No subscribers is not an error
    let _ = events.send(event);
}

/// Drive one websocket until it closes. Returns after emitting
/// `Disconnected` if the namespace had been joined.
async fn session<S>(
    stream: S,
    events: &broadcast::Sender<PushEvent>,
    commands: &mut mpsc::UnboundedReceiver<ControlCommand>,
    cancel: &CancellationToken,
) where
    S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
        + futures_util::Sink<Message, Error = tokio_tungstenite::tungstenite::Error>
        + Unpin,
{
    let (mut write, mut read) = stream.split();
    let mut connected = false;

    loop {
        tokio::select! {
            // Queued commands go out before a shutdown closes the socket
            biased;

            Some(command) = commands.recv() => {
                if !connected {
                    tracing::warn!(?command, "Not connected, dropping command");
                    continue;
                }
                let frame = codec::encode_event(command.event_name(), &command.payload());
                if let Err(e) = write.send(Message::Text(frame)).await {
                    tracing::warn!(error = %e, "Failed to send command");
                    break;
                }
            }

            _ = cancel.cancelled() => {
                let _ = write.send(Message::Close(None)).await;
                break;
            }

            frame = read.next() => {
                let text = match frame {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Push channel read failed");
                        break;
                    }
                };

                let packet = match codec::decode(&text) {
                    Ok(packet) => packet,
                    Err(e) => {
                        tracing::warn!(error = %e, "Dropping undecodable frame");
                        continue;
                    }
                };

                let reply = match packet {
                    Packet::Open(handshake) => {
                        tracing::debug!(sid = %handshake.sid, "Engine handshake");
                        Some(codec::CONNECT_FRAME)
                    }
                    Packet::Ping => Some(codec::PONG_FRAME),
                    Packet::Connect => {
                        connected = true;
                        tracing::info!("Push channel connected");
                        emit(events, PushEvent::Connected);
                        None
                    }
                    Packet::Event { name, payload } => {
                        match PushEvent::from_named(&name, payload) {
                            Ok(Some(event)) => emit(events, event),
                            Ok(None) => tracing::debug!(event = %name, "Ignoring event"),
                            Err(e) => {
                                tracing::warn!(event = %name, error = %e, "Dropping malformed event payload")
                            }
                        }
                        None
                    }
                    Packet::ConnectError(message) => {
                        tracing::warn!(message = %message, "Namespace connect refused");
                        break;
                    }
                    Packet::Disconnect | Packet::Close => break,
                    Packet::Pong | Packet::Noop | Packet::Ignored(_) => None,
                };

                if let Some(reply) = reply {
                    if let Err(e) = write.send(Message::Text(reply.to_string())).await {
                        tracing::warn!(error = %e, "Failed to answer server frame");
                        break;
                    }
                }
            }
        }
    }

    if connected {
        tracing::info!("Push channel disconnected");
        emit(events, PushEvent::Disconnected);
    }
}
