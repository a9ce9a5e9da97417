use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::context::{ContextRecord, NewContextRecord};
use crate::models::resume::{PartialResumeDocument, ResumeDocument};
use crate::models::tool::ToolResultEvent;
use crate::resume::completeness::CompletionReport;
use crate::resume::merge::MergeReport;
use crate::state::AppState;
use crate::sync::engine::{ApplyOutcome, ExportBundle, SkipReason};
use crate::sync::session::{Session, SessionHandle};

/// Upper bound on events accepted in one request.
const MAX_EVENTS_PER_BATCH: usize = 500;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub document: Option<ResumeDocument>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub revision: u64,
    pub document: ResumeDocument,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSnapshotResponse {
    pub revision: u64,
    pub document: ResumeDocument,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResumeResponse {
    pub revision: u64,
    pub document: ResumeDocument,
    pub report: MergeReport,
}

/// Events are taken as raw JSON so that one undecodable event is reported
/// as skipped instead of rejecting the whole batch.
#[derive(Debug, Deserialize)]
pub struct EventBatchRequest {
    pub events: Vec<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(flatten)]
    pub outcome: ApplyOutcome,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBatchResponse {
    pub revision: u64,
    /// Distinct tool invocations applied in this session so far.
    pub applied_invocations: usize,
    pub outcomes: Vec<EventOutcome>,
    pub persisted_contexts: Vec<ContextRecord>,
}

pub(crate) async fn find_session(
    state: &AppState,
    session_id: Uuid,
) -> Result<SessionHandle, AppError> {
    state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))
}

/// POST /api/v1/sessions
pub async fn handle_open_session(
    State(state): State<AppState>,
    Json(req): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let (session_id, handle) = state.sessions.open(req.user_id, req.document).await;
    let session = handle.lock().await;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id,
            revision: session.engine.revision(),
            document: (*session.engine.snapshot()).clone(),
        }),
    ))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_close_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.close(session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {session_id} not found")))
    }
}

/// GET /api/v1/sessions/:id/resume
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ResumeSnapshotResponse>, AppError> {
    let handle = find_session(&state, session_id).await?;
    let session = handle.lock().await;
    Ok(Json(ResumeSnapshotResponse {
        revision: session.engine.revision(),
        document: (*session.engine.snapshot()).clone(),
    }))
}

/// PATCH /api/v1/sessions/:id/resume
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(partial): Json<PartialResumeDocument>,
) -> Result<Json<UpdateResumeResponse>, AppError> {
    let handle = find_session(&state, session_id).await?;
    let mut session = handle.lock().await;
    let report = session.engine.update_document(&partial);
    Ok(Json(UpdateResumeResponse {
        revision: session.engine.revision(),
        document: (*session.engine.snapshot()).clone(),
        report,
    }))
}

/// POST /api/v1/sessions/:id/resume/import
///
/// Imports a complete document (e.g. loaded from a file). Modules outside the
/// template are dropped and reported, exactly as for generated updates.
pub async fn handle_import_resume(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(document): Json<ResumeDocument>,
) -> Result<Json<UpdateResumeResponse>, AppError> {
    let handle = find_session(&state, session_id).await?;
    let mut session = handle.lock().await;
    let report = session.engine.import_document(document);
    Ok(Json(UpdateResumeResponse {
        revision: session.engine.revision(),
        document: (*session.engine.snapshot()).clone(),
        report,
    }))
}

/// POST /api/v1/sessions/:id/resume/reset
pub async fn handle_reset_resume(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ResumeSnapshotResponse>, AppError> {
    let handle = find_session(&state, session_id).await?;
    let mut session = handle.lock().await;
    session.engine.reset();
    Ok(Json(ResumeSnapshotResponse {
        revision: session.engine.revision(),
        document: (*session.engine.snapshot()).clone(),
    }))
}

/// POST /api/v1/sessions/:id/events
pub async fn handle_apply_events(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<EventBatchRequest>,
) -> Result<Json<EventBatchResponse>, AppError> {
    if req.events.len() > MAX_EVENTS_PER_BATCH {
        return Err(AppError::Validation(format!(
            "at most {MAX_EVENTS_PER_BATCH} events per request, got {}",
            req.events.len()
        )));
    }

    let handle = find_session(&state, session_id).await?;
    // Held across persistence so that concurrent batches for one session reach
    // the store in the order they were applied.
    let mut session = handle.lock().await;
    let outcomes: Vec<EventOutcome> = req
        .events
        .into_iter()
        .map(|raw| match serde_json::from_value::<ToolResultEvent>(raw) {
            Ok(event) => EventOutcome {
                message_id: Some(event.message_id.clone()),
                tool_call_id: Some(event.tool_call_id.clone()),
                outcome: session.engine.apply_event(&event),
            },
            Err(e) => {
                warn!("Skipping undecodable tool event in session {session_id}: {e}");
                EventOutcome {
                    message_id: None,
                    tool_call_id: None,
                    outcome: ApplyOutcome::Skipped {
                        reason: SkipReason::Malformed {
                            reason: e.to_string(),
                        },
                    },
                }
            }
        })
        .collect();

    let persisted_contexts = persist_contexts(&state, &session, &outcomes).await;

    Ok(Json(EventBatchResponse {
        revision: session.engine.revision(),
        applied_invocations: session.engine.applied_invocations(),
        outcomes,
        persisted_contexts,
    }))
}

/// Hands the summaries recorded by this batch to the context store. Only the
/// session's current summary is stored as active; one that arrived late with
/// an older timestamp is kept as history. A store failure does not undo the
/// in-memory application.
async fn persist_contexts(
    state: &AppState,
    session: &Session,
    outcomes: &[EventOutcome],
) -> Vec<ContextRecord> {
    let current_id = session.engine.contexts().current().map(|c| c.id);
    let mut persisted = Vec::new();
    for outcome in outcomes {
        let ApplyOutcome::ContextRecorded { context } = &outcome.outcome else {
            continue;
        };
        let record = NewContextRecord::new(
            session.user_id,
            context.content.clone(),
            current_id == Some(context.id),
        );
        match state.context_store.append(record).await {
            Ok(stored) => persisted.push(stored),
            Err(e) => error!("Failed to persist context {}: {e}", context.id),
        }
    }
    persisted
}

/// GET /api/v1/sessions/:id/completion
pub async fn handle_completion(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<CompletionReport>, AppError> {
    if !state.config.completion_indicator_enabled {
        return Err(AppError::FeatureDisabled("completion indicator"));
    }
    let handle = find_session(&state, session_id).await?;
    let session = handle.lock().await;
    Ok(Json(session.engine.completion()))
}

/// GET /api/v1/sessions/:id/export
pub async fn handle_export(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ExportBundle>, AppError> {
    let handle = find_session(&state, session_id).await?;
    let session = handle.lock().await;
    Ok(Json(session.engine.export_bundle()))
}
