//! Socket.IO text packet framing.
//!
//! The backend's push channel speaks Socket.IO v5 on top of Engine.IO v4.
//! Over the websocket transport every frame is one text packet whose first
//! character is the Engine.IO type; message packets (`4`) carry a Socket.IO
//! packet whose first character is its own type.
//!
//! | frame | meaning |
//! |---|---|
//! | `0{...}` | open handshake |
//! | `1` | close |
//! | `2` / `3` | ping / pong |
//! | `40...` | namespace connected |
//! | `41` | namespace disconnected |
//! | `42["name", payload]` | event |
//! | `44{...}` | connect error |
//! | `6` | noop |

use super::error::ChannelError;
use serde::Deserialize;
use serde_json::Value;

/// Client answer to the open handshake: join the default namespace.
pub const CONNECT_FRAME: &str = "40";
/// Client answer to a server ping.
pub const PONG_FRAME: &str = "3";

/// Engine.IO open handshake payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub ping_interval: u64,
    #[serde(default)]
    pub ping_timeout: u64,
}

/// One decoded frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Open(Handshake),
    Close,
    Ping,
    Pong,
    Noop,
    Connect,
    Disconnect,
    Event { name: String, payload: Value },
    ConnectError(String),
    /// Socket.IO packet types we do not act on (acks, binary)
    Ignored(char),
}

/// Decode one text frame.
pub fn decode(frame: &str) -> Result<Packet, ChannelError> {
    let mut chars = frame.chars();
    let engine_type = chars
        .next()
        .ok_or_else(|| ChannelError::Protocol("empty frame".to_string()))?;
    let rest = chars.as_str();

    match engine_type {
        '0' => serde_json::from_str(rest)
            .map(Packet::Open)
            .map_err(|e| ChannelError::Protocol(format!("bad handshake: {}", e))),
        '1' => Ok(Packet::Close),
        '2' => Ok(Packet::Ping),
        '3' => Ok(Packet::Pong),
        '4' => decode_message(rest),
        '6' => Ok(Packet::Noop),
        other => Err(ChannelError::Protocol(format!(
            "unknown engine packet type '{}'",
            other
        ))),
    }
}

fn decode_message(message: &str) -> Result<Packet, ChannelError> {
    let mut chars = message.chars();
    let socket_type = chars
        .next()
        .ok_or_else(|| ChannelError::Protocol("empty message packet".to_string()))?;
    let body = strip_ack_id(strip_namespace(chars.as_str()));

    match socket_type {
        '0' => Ok(Packet::Connect),
        '1' => Ok(Packet::Disconnect),
        '2' => decode_event(body),
        '4' => {
            let message = serde_json::from_str::<Value>(body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| body.to_string());
            Ok(Packet::ConnectError(message))
        }
        other => Ok(Packet::Ignored(other)),
    }
}

/// Drop a leading `/namespace,` prefix.
fn strip_namespace(body: &str) -> &str {
    if body.starts_with('/') {
        match body.find(',') {
            Some(idx) => &body[idx + 1..],
            None => "",
        }
    } else {
        body
    }
}

/// Drop a leading numeric ack id.
fn strip_ack_id(body: &str) -> &str {
    body.trim_start_matches(|c: char| c.is_ascii_digit())
}

fn decode_event(body: &str) -> Result<Packet, ChannelError> {
    let array: Vec<Value> = serde_json::from_str(body)
        .map_err(|e| ChannelError::Protocol(format!("bad event body: {}", e)))?;
    let mut items = array.into_iter();

    let name = match items.next() {
        Some(Value::String(name)) => name,
        _ => {
            return Err(ChannelError::Protocol(
                "event without a name".to_string(),
            ))
        }
    };
    let payload = items.next().unwrap_or(Value::Null);

    Ok(Packet::Event { name, payload })
}

/// Encode an outbound event frame.
pub fn encode_event(name: &str, payload: &Value) -> String {
    let body = Value::Array(vec![Value::String(name.to_string()), payload.clone()]);
    format!("42{}", body)
}
