//! Push channel error types

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChannelError {
    /// Websocket dial or handshake failed
    #[error("connect failed: {0}")]
    Connect(String),

    /// Frame did not follow the Socket.IO framing
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The channel task has stopped
    #[error("channel closed")]
    Closed,
}
