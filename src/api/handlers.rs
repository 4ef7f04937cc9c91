//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tracing::{debug, error, info};

use crate::{
    services::HostCommand,
    state::{AppState, HostEvent, Settings, SettingsError, Trigger, View},
    utils::{fallback_trigger, KeyPress},
};
use super::responses::{ApiResponse, ErrorResponse, HealthResponse, StatusResponse};

type HandlerResult<T> = Result<Json<T>, StatusCode>;

/// Dispatch a trigger and describe what happened
fn apply_trigger(state: &Arc<AppState>, trigger: Trigger) -> HandlerResult<ApiResponse> {
    let name = trigger.name();
    let outcome = state.dispatch(trigger).map_err(|e| {
        error!("Failed to apply '{}': {}", name, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let snapshot = outcome.snapshot;

    if outcome.transition.applied {
        Ok(Json(ApiResponse::applied(format!("{} applied", name), snapshot)))
    } else {
        Ok(Json(ApiResponse::ignored(
            format!("{} has no effect while {}", name, snapshot.state),
            snapshot,
        )))
    }
}

fn apply_event(state: &Arc<AppState>, event: HostEvent) -> HandlerResult<ApiResponse> {
    debug!("Event endpoint called: {}", event.name());
    apply_trigger(state, event.trigger())
}

fn current_snapshot(state: &AppState) -> Result<crate::state::Snapshot, StatusCode> {
    state.snapshot().map_err(|e| {
        error!("Failed to read timer snapshot: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle POST /timer/start
pub async fn start_handler(State(state): State<Arc<AppState>>) -> HandlerResult<ApiResponse> {
    apply_trigger(&state, Trigger::Start)
}

/// Handle POST /timer/toggle - start when idle, stop when running
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> HandlerResult<ApiResponse> {
    apply_trigger(&state, Trigger::Toggle)
}

/// Handle POST /timer/pause
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> HandlerResult<ApiResponse> {
    apply_trigger(&state, Trigger::Pause)
}

/// Handle POST /timer/resume
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> HandlerResult<ApiResponse> {
    apply_trigger(&state, Trigger::Resume)
}

/// Handle POST /timer/toggle-pause
pub async fn toggle_pause_handler(State(state): State<Arc<AppState>>) -> HandlerResult<ApiResponse> {
    apply_trigger(&state, Trigger::TogglePause)
}

/// Handle POST /timer/skip - end the current rest early
pub async fn skip_handler(State(state): State<Arc<AppState>>) -> HandlerResult<ApiResponse> {
    apply_trigger(&state, Trigger::Skip)
}

/// Handle POST /timer/reset
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> HandlerResult<ApiResponse> {
    apply_trigger(&state, Trigger::Reset)
}

/// Handle POST /events/force-skip - global skip shortcut pressed
pub async fn force_skip_event_handler(State(state): State<Arc<AppState>>) -> HandlerResult<ApiResponse> {
    apply_event(&state, HostEvent::ForceSkip)
}

/// Handle POST /events/toggle-pause - global pause shortcut pressed
pub async fn toggle_pause_event_handler(State(state): State<Arc<AppState>>) -> HandlerResult<ApiResponse> {
    apply_event(&state, HostEvent::TogglePause)
}

/// Handle POST /events/key - local key press forwarded by the UI
pub async fn key_event_handler(
    State(state): State<Arc<AppState>>,
    Json(press): Json<KeyPress>,
) -> HandlerResult<ApiResponse> {
    match fallback_trigger(&press) {
        Some(trigger) => apply_trigger(&state, trigger),
        None => Ok(Json(ApiResponse::ignored(
            format!("No binding for key '{}'", press.key),
            current_snapshot(&state)?,
        ))),
    }
}

/// Handle GET /settings
pub async fn get_settings_handler(State(state): State<Arc<AppState>>) -> HandlerResult<Settings> {
    Ok(Json(current_snapshot(&state)?.settings))
}

/// Handle PUT /settings - validate, save and apply a full settings record
pub async fn put_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<Settings>,
) -> Result<Json<ApiResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.save_settings(settings) {
        Ok(outcome) => Ok(Json(ApiResponse::applied(
            "Settings saved".to_string(),
            outcome.snapshot,
        ))),
        Err(SettingsError::Invalid(e)) => {
            info!("Rejected settings: {}", e);
            Err((StatusCode::BAD_REQUEST, Json(ErrorResponse::rejected(e))))
        }
        Err(SettingsError::Failed(e)) => {
            error!("Failed to save settings: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::rejected(e)),
            ))
        }
    }
}

/// Handle POST /settings/open
pub async fn open_settings_handler(State(state): State<Arc<AppState>>) -> HandlerResult<ApiResponse> {
    set_settings_open(&state, true)
}

/// Handle POST /settings/close
pub async fn close_settings_handler(State(state): State<Arc<AppState>>) -> HandlerResult<ApiResponse> {
    set_settings_open(&state, false)
}

fn set_settings_open(state: &AppState, open: bool) -> HandlerResult<ApiResponse> {
    match state.set_settings_open(open) {
        Ok(snapshot) => Ok(Json(ApiResponse::applied(
            format!("Settings view {}", if open { "opened" } else { "closed" }),
            snapshot,
        ))),
        Err(e) => {
            error!("Failed to toggle settings view: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /window/minimize
pub async fn minimize_handler(State(state): State<Arc<AppState>>) -> HandlerResult<ApiResponse> {
    window_action(&state, HostCommand::MinimizeToTray)
}

/// Handle POST /window/quit - ask the host to quit and stop the daemon
pub async fn quit_handler(State(state): State<Arc<AppState>>) -> HandlerResult<ApiResponse> {
    window_action(&state, HostCommand::QuitApp)
}

fn window_action(state: &AppState, command: HostCommand) -> HandlerResult<ApiResponse> {
    let name = command.name();
    state.window_action(command).map_err(|e| {
        error!("Failed to request {}: {}", name, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ApiResponse::applied(
        format!("{} requested", name),
        current_snapshot(state)?,
    )))
}

/// Handle GET /view - the single view the UI should show
pub async fn view_handler(State(state): State<Arc<AppState>>) -> HandlerResult<View> {
    Ok(Json(current_snapshot(&state)?.view))
}

/// Handle GET /stream - server-sent snapshot updates, starting with the current one
pub async fn stream_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let updates = state.subscribe();

    let stream = stream::unfold((updates, true), |(mut updates, first)| async move {
        if !first && updates.changed().await.is_err() {
            return None;
        }
        let snapshot = updates.borrow_and_update().clone();
        Some((Event::default().json_data(&snapshot), (updates, false)))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> HandlerResult<StatusResponse> {
    let snapshot = current_snapshot(&state)?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        snapshot,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
