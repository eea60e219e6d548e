//! Shared helpers for guardian integration tests.
//!
//! Canned backend snapshots and a mock backend built on wiremock.

#![allow(dead_code)]

use guardian::api::ApiClient;
use guardian::config::{BackendConfig, RefreshConfig};
use guardian::console::Console;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Snapshots
// =============================================================================

pub fn status_running() -> Value {
    json!({"status": "System running", "emergency_mode": false, "connected_agents": ["health", "safety", "reminder"]})
}

pub fn status_stopped() -> Value {
    json!({"status": "System stopped", "emergency_mode": false, "connected_agents": []})
}

pub fn health_snapshot() -> Value {
    json!({
        "latest_readings": {
            "heart_rate": 72,
            "systolic_bp": 120,
            "diastolic_bp": 80,
            "glucose": 110,
            "oxygen_saturation": 97,
            "temperature": 36.8
        },
        "alerts": [
            {"alert_type": "health", "severity": "high", "message": "Heart rate above threshold", "metric": "heart_rate", "value": 130, "threshold": 100}
        ]
    })
}

pub fn safety_snapshot() -> Value {
    json!({
        "latest_readings": {
            "location": "Kitchen",
            "movement_activity": "Active",
            "fall_detected": false,
            "door_status": "Closed",
            "movement_status": "active",
            "timestamp": "2025-03-12T10:15:00"
        },
        "alerts": []
    })
}

pub fn reminders_snapshot() -> Value {
    json!({
        "active_reminders": [
            {"id": "r42", "type": "Medication", "message": "Take Lisinopril", "scheduled_time": "08:00", "priority": "high"}
        ],
        "completed_reminders": []
    })
}

// =============================================================================
// Mock backend
// =============================================================================

/// Answer `GET <route>` with a JSON body.
pub async fn mount_get(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount every snapshot endpoint with healthy data and a running system.
pub async fn mount_all(server: &MockServer) {
    mount_get(server, "/api/system/status", status_running()).await;
    mount_get(server, "/api/health/data", health_snapshot()).await;
    mount_get(server, "/api/safety/data", safety_snapshot()).await;
    mount_get(server, "/api/reminders", reminders_snapshot()).await;
}

pub fn backend_config(server: &MockServer) -> BackendConfig {
    BackendConfig {
        url: server.uri(),
        timeout_seconds: 2,
        ..BackendConfig::default()
    }
}

pub fn api_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&backend_config(server)).unwrap()
}

pub fn console_for(server: &MockServer) -> Console {
    Console::new(api_for(server), &RefreshConfig::default())
}
