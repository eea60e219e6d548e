//! Backend connection configuration

use serde::{Deserialize, Serialize};

/// Where the monitoring backend lives and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend HTTP API (e.g. `http://127.0.0.1:5000`)
    pub url: String,
    /// Timeout applied to every REST request
    pub timeout_seconds: u64,
    /// Path of the push-event endpoint on the same host
    pub socket_path: String,
    /// Fixed delay before redialing a dropped push channel
    pub reconnect_delay_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5000".to_string(),
            timeout_seconds: 10,
            socket_path: "/socket.io/".to_string(),
            reconnect_delay_ms: 1000,
        }
    }
}

impl BackendConfig {
    /// Websocket URL of the push channel, derived from the REST base URL.
    ///
    /// `http` maps to `ws` and `https` to `wss`; the Engine.IO query
    /// string selects protocol v4 over the websocket transport.
    pub fn socket_url(&self) -> String {
        let base = self.url.trim_end_matches('/');
        let ws_base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            base.to_string()
        };
        let path = if self.socket_path.starts_with('/') {
            self.socket_path.clone()
        } else {
            format!("/{}", self.socket_path)
        };
        format!("{}{}?EIO=4&transport=websocket", ws_base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_config_defaults() {
        let config = BackendConfig::default();
        assert_eq!(config.url, "http://127.0.0.1:5000");
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.socket_path, "/socket.io/");
        assert_eq!(config.reconnect_delay_ms, 1000);
    }

    #[test]
    fn test_socket_url_from_http() {
        let config = BackendConfig::default();
        assert_eq!(
            config.socket_url(),
            "ws://127.0.0.1:5000/socket.io/?EIO=4&transport=websocket"
        );
    }

    #[test]
    fn test_socket_url_from_https_with_trailing_slash() {
        let config = BackendConfig {
            url: "https://care.example.org/".to_string(),
            socket_path: "socket.io/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.socket_url(),
            "wss://care.example.org/socket.io/?EIO=4&transport=websocket"
        );
    }
}
