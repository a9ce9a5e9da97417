use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::context::{ContextRecord, ConversationContext};
use crate::state::AppState;
use crate::sync::handlers::find_session;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentContextResponse {
    pub current: Option<ConversationContext>,
    pub versions: usize,
}

/// GET /api/v1/sessions/:id/context
pub async fn handle_current_context(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<CurrentContextResponse>, AppError> {
    let handle = find_session(&state, session_id).await?;
    let session = handle.lock().await;
    let contexts = session.engine.contexts();
    Ok(Json(CurrentContextResponse {
        current: contexts.current().cloned(),
        versions: contexts.len(),
    }))
}

/// GET /api/v1/sessions/:id/context/history
pub async fn handle_context_history(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<ConversationContext>>, AppError> {
    let handle = find_session(&state, session_id).await?;
    let session = handle.lock().await;
    let history = session
        .engine
        .contexts()
        .history()
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(history))
}

/// GET /api/v1/context/records?user_id=
pub async fn handle_context_records(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ContextRecord>>, AppError> {
    let records = state.context_store.list_for_user(params.user_id).await?;
    Ok(Json(records))
}

/// GET /api/v1/context/active?user_id=
pub async fn handle_active_context(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ContextRecord>, AppError> {
    state
        .context_store
        .active_for_user(params.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound(format!("No active context for user {}", params.user_id))
        })
}
