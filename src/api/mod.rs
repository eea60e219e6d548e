//! # Backend REST client
//!
//! Typed access to the care backend's HTTP API.
//!
//! ## Endpoints
//!
//! - `GET /api/system/status` - run/emergency state
//! - `POST /api/system/start`, `POST /api/system/stop` - system control
//! - `GET /api/health/data` - latest vitals, recent alerts, optional analysis
//! - `GET /api/safety/data` - latest safety readings, alerts, location history
//! - `GET /api/reminders` - active and completed reminders
//! - `POST /api/acknowledge-reminder` - acknowledge one reminder
//!
//! ## Error Handling
//!
//! Transport failures, non-2xx statuses and undecodable bodies become
//! [`ApiError`]. A 2xx body of the form `{"error": "..."}` becomes
//! [`ApiError::Backend`] with the message untouched, so callers can show it
//! verbatim.
//!
//! ## Example
//!
//! ```no_run
//! use guardian::api::ApiClient;
//! use guardian::config::BackendConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new(&BackendConfig::default())?;
//! let status = client.system_status().await?;
//! println!("running: {}", status.is_running());
//! # Ok(())
//! # }
//! ```

mod error;
pub mod types;

pub use error::ApiError;
pub use types::*;

use crate::config::BackendConfig;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// HTTP client for the backend API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    timeout_seconds: u64,
}

impl ApiClient {
    /// Create a client from backend configuration.
    pub fn new(config: &BackendConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ApiError::Configuration(e.to_string()))?;

        Ok(Self::with_client(&config.url, client, config.timeout_seconds))
    }

    /// Create a client around an existing reqwest client (for testing).
    pub fn with_client(base_url: &str, client: reqwest::Client, timeout_seconds: u64) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_seconds,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Read a response body as JSON, mapping non-2xx to [`ApiError::Http`].
    async fn read_json(&self, response: reqwest::Response) -> Result<Value, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::from_reqwest(e, self.timeout_seconds))?;

        serde_json::from_str(&body)
            .map_err(|e| ApiError::Decode(format!("expected JSON body: {}", e)))
    }

    /// Decode a snapshot body, surfacing `{"error": "..."}` as [`ApiError::Backend`].
    fn decode_snapshot<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return Err(ApiError::Backend(message.to_string()));
        }
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get_snapshot<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, self.timeout_seconds))?;

        let value = self.read_json(response).await?;
        Self::decode_snapshot(value)
    }

    /// `GET /api/system/status`
    pub async fn system_status(&self) -> Result<SystemStatusResponse, ApiError> {
        self.get_snapshot("/api/system/status").await
    }

    /// `POST /api/system/start` or `POST /api/system/stop`
    ///
    /// A backend `{error}` is part of the outcome, not an `Err`.
    pub async fn control(&self, action: ControlAction) -> Result<ControlOutcome, ApiError> {
        let response = self
            .client
            .post(self.url(action.path()))
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, self.timeout_seconds))?;

        let value = self.read_json(response).await?;
        let raw: ControlResponse =
            serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(ControlOutcome::from_response(action, raw))
    }

    pub async fn start_system(&self) -> Result<ControlOutcome, ApiError> {
        self.control(ControlAction::Start).await
    }

    pub async fn stop_system(&self) -> Result<ControlOutcome, ApiError> {
        self.control(ControlAction::Stop).await
    }

    /// `GET /api/health/data`
    pub async fn health_data(&self) -> Result<HealthData, ApiError> {
        self.get_snapshot("/api/health/data").await
    }

    /// `GET /api/safety/data`
    pub async fn safety_data(&self) -> Result<SafetyData, ApiError> {
        self.get_snapshot("/api/safety/data").await
    }

    /// `GET /api/reminders`
    pub async fn reminders(&self) -> Result<RemindersData, ApiError> {
        self.get_snapshot("/api/reminders").await
    }

    /// `POST /api/acknowledge-reminder` with `{reminder_id}`.
    ///
    /// Both backend response shapes (`{success}` and `{status}`) and
    /// `{error}` normalize into [`AckOutcome`].
    pub async fn acknowledge_reminder(&self, reminder_id: &str) -> Result<AckOutcome, ApiError> {
        let body = AcknowledgeRequest {
            reminder_id: reminder_id.to_string(),
        };

        let response = self
            .client
            .post(self.url("/api/acknowledge-reminder"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, self.timeout_seconds))?;

        let value = self.read_json(response).await?;
        let raw: AcknowledgeResponse =
            serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(AckOutcome::from(raw))
    }
}
