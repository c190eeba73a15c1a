use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use contracts::shared::session::{
    RefreshOutcome, SessionSnapshot, UpdateFilterRequest, UpdateTabRequest,
};
use uuid::Uuid;

use super::status_for;
use crate::api::AppState;
use crate::system::session::SessionError;

fn session_status(err: &SessionError) -> StatusCode {
    match err {
        SessionError::NotFound(_) => StatusCode::NOT_FOUND,
        SessionError::Filter(_) => StatusCode::BAD_REQUEST,
    }
}

/// POST /api/session
pub async fn create_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let snapshot = state.sessions.create();
    tracing::info!("Session {} created", snapshot.session_id);
    Json(snapshot)
}

/// GET /api/session/:id
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, StatusCode> {
    match state.sessions.get(id) {
        Some(snapshot) => Ok(Json(snapshot)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// DELETE /api/session/:id
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if state.sessions.remove(id) {
        tracing::info!("Session {} closed", id);
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// PUT /api/session/:id/filter
pub async fn update_filter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateFilterRequest>,
) -> Result<Json<SessionSnapshot>, StatusCode> {
    state
        .sessions
        .update_filter(id, &request)
        .map(Json)
        .map_err(|e| {
            tracing::warn!("Session {}: filter update rejected: {}", id, e);
            session_status(&e)
        })
}

/// PUT /api/session/:id/tab
pub async fn update_tab(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTabRequest>,
) -> Result<Json<SessionSnapshot>, StatusCode> {
    state
        .sessions
        .set_tab(id, request.tab)
        .map(Json)
        .map_err(|e| session_status(&e))
}

/// POST /api/session/:id/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RefreshOutcome>, StatusCode> {
    match state.sessions.refresh_daily(id, state.source.as_ref()).await {
        Ok(outcome) => {
            if let RefreshOutcome::Applied { data } = &outcome {
                tracing::info!("Session {}: {} daily rows applied", id, data.rows.len());
            }
            Ok(Json(outcome))
        }
        Err(e) => {
            tracing::error!("Session {}: refresh failed: {}", id, e);
            Err(status_for(&e))
        }
    }
}
