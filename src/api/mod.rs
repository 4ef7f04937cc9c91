//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Timer actions
        .route("/timer/start", post(start_handler))
        .route("/timer/toggle", post(toggle_handler))
        .route("/timer/pause", post(pause_handler))
        .route("/timer/resume", post(resume_handler))
        .route("/timer/toggle-pause", post(toggle_pause_handler))
        .route("/timer/skip", post(skip_handler))
        .route("/timer/reset", post(reset_handler))
        // Host events
        .route("/events/force-skip", post(force_skip_event_handler))
        .route("/events/toggle-pause", post(toggle_pause_event_handler))
        .route("/events/key", post(key_event_handler))
        // Settings
        .route("/settings", get(get_settings_handler).put(put_settings_handler))
        .route("/settings/open", post(open_settings_handler))
        .route("/settings/close", post(close_settings_handler))
        // Window
        .route("/window/minimize", post(minimize_handler))
        .route("/window/quit", post(quit_handler))
        // Presentation
        .route("/view", get(view_handler))
        .route("/stream", get(stream_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use futures::StreamExt;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use tower::ServiceExt;

    use crate::services::{HostCommand, SettingsStore};

    fn test_app(dir: &TempDir) -> (Router, Arc<AppState>, UnboundedReceiver<HostCommand>) {
        let store = SettingsStore::new(dir.path().join("zen-rest.json"));
        let (tx, rx) = mpsc::unbounded_channel();
        let state = Arc::new(AppState::new(
            0,
            "127.0.0.1".to_string(),
            store,
            tx,
            Duration::from_secs(1),
        ));
        (create_router(Arc::clone(&state)), state, rx)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let dir = TempDir::new().unwrap();
        let (app, _state, _rx) = test_app(&dir);

        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn toggle_starts_and_stops_the_timer() {
        let dir = TempDir::new().unwrap();
        let (app, _state, _rx) = test_app(&dir);

        let (status, body) = send(&app, Method::POST, "/timer/toggle", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "applied");
        assert_eq!(body["snapshot"]["state"], "running-work");
        assert_eq!(body["snapshot"]["timer"]["timeLeft"], 1500);

        let (_, body) = send(&app, Method::POST, "/timer/toggle", None).await;
        assert_eq!(body["snapshot"]["state"], "idle-work");
    }

    #[tokio::test]
    async fn skip_during_work_is_reported_as_ignored() {
        let dir = TempDir::new().unwrap();
        let (app, _state, mut rx) = test_app(&dir);
        send(&app, Method::POST, "/timer/start", None).await;

        let (status, body) = send(&app, Method::POST, "/events/force-skip", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ignored");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn key_fallback_toggles_pause() {
        let dir = TempDir::new().unwrap();
        let (app, _state, _rx) = test_app(&dir);
        send(&app, Method::POST, "/timer/start", None).await;

        let chord = json!({"ctrl": true, "alt": true, "key": "p"});
        let (_, body) = send(&app, Method::POST, "/events/key", Some(chord)).await;
        assert_eq!(body["snapshot"]["state"], "paused-work");

        let other = json!({"ctrl": true, "key": "p"});
        let (_, body) = send(&app, Method::POST, "/events/key", Some(other)).await;
        assert_eq!(body["status"], "ignored");
        assert_eq!(body["snapshot"]["timer"]["isPaused"], true);
    }

    #[tokio::test]
    async fn settings_round_trip_through_the_api() {
        let dir = TempDir::new().unwrap();
        let (app, _state, _rx) = test_app(&dir);

        let (_, mut settings) = send(&app, Method::GET, "/settings", None).await;
        settings["workDuration"] = json!(50);
        settings["pauseShortcut"] = json!("ctrl+alt+x");

        let (status, body) = send(&app, Method::PUT, "/settings", Some(settings)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["snapshot"]["timer"]["timeLeft"], 3000);

        let (_, saved) = send(&app, Method::GET, "/settings", None).await;
        assert_eq!(saved["pauseShortcut"], "Ctrl+Alt+X");
    }

    #[tokio::test]
    async fn invalid_settings_are_rejected() {
        let dir = TempDir::new().unwrap();
        let (app, _state, _rx) = test_app(&dir);

        let (_, mut settings) = send(&app, Method::GET, "/settings", None).await;
        settings["restDuration"] = json!(1);

        let (status, body) = send(&app, Method::PUT, "/settings", Some(settings)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "rejected");

        let (_, current) = send(&app, Method::GET, "/settings", None).await;
        assert_eq!(current["restDuration"], 20);
    }

    #[tokio::test]
    async fn view_switches_to_settings_and_back() {
        let dir = TempDir::new().unwrap();
        let (app, _state, _rx) = test_app(&dir);

        send(&app, Method::POST, "/settings/open", None).await;
        let (_, view) = send(&app, Method::GET, "/view", None).await;
        assert_eq!(view["view"], "settings");

        send(&app, Method::POST, "/settings/close", None).await;
        let (_, view) = send(&app, Method::GET, "/view", None).await;
        assert_eq!(view["view"], "work");
        assert_eq!(view["clock"], "25:00");
    }

    fn event_data(chunk: &[u8]) -> Value {
        let text = std::str::from_utf8(chunk).unwrap();
        let data = text
            .lines()
            .find_map(|line| line.strip_prefix("data:"))
            .unwrap();
        serde_json::from_str(data.trim_start()).unwrap()
    }

    #[tokio::test]
    async fn stream_opens_with_current_snapshot_then_follows_updates() {
        let dir = TempDir::new().unwrap();
        let (app, _state, _rx) = test_app(&dir);
        send(&app, Method::POST, "/timer/start", None).await;

        let request = Request::builder().uri("/stream").body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/event-stream");

        let mut events = response.into_body().into_data_stream();
        let first = event_data(&events.next().await.unwrap().unwrap());
        assert_eq!(first["state"], "running-work");
        assert_eq!(first["view"]["view"], "work");
        assert_eq!(first["timer"]["timeLeft"], 1500);

        send(&app, Method::POST, "/timer/pause", None).await;
        let next = event_data(&events.next().await.unwrap().unwrap());
        assert_eq!(next["state"], "paused-work");
        assert_eq!(next["timer"]["isPaused"], true);
    }

    #[tokio::test]
    async fn window_actions_reach_the_command_queue() {
        let dir = TempDir::new().unwrap();
        let (app, _state, mut rx) = test_app(&dir);

        let (status, _) = send(&app, Method::POST, "/window/minimize", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rx.try_recv().unwrap(), HostCommand::MinimizeToTray);

        let (_, status_body) = send(&app, Method::GET, "/status", None).await;
        assert_eq!(status_body["last_action"], "minimize_to_tray");
        assert_eq!(status_body["state"], "idle-work");
    }
}
