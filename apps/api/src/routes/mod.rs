pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::context::handlers as context_handlers;
use crate::state::AppState;
use crate::sync::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions: one canonical document per open conversation
        .route("/api/v1/sessions", post(handlers::handle_open_session))
        .route("/api/v1/sessions/:id", delete(handlers::handle_close_session))
        .route(
            "/api/v1/sessions/:id/resume",
            get(handlers::handle_get_resume).patch(handlers::handle_update_resume),
        )
        .route(
            "/api/v1/sessions/:id/resume/import",
            post(handlers::handle_import_resume),
        )
        .route(
            "/api/v1/sessions/:id/resume/reset",
            post(handlers::handle_reset_resume),
        )
        .route(
            "/api/v1/sessions/:id/events",
            post(handlers::handle_apply_events),
        )
        .route(
            "/api/v1/sessions/:id/completion",
            get(handlers::handle_completion),
        )
        .route("/api/v1/sessions/:id/export", get(handlers::handle_export))
        // Context
        .route(
            "/api/v1/sessions/:id/context",
            get(context_handlers::handle_current_context),
        )
        .route(
            "/api/v1/sessions/:id/context/history",
            get(context_handlers::handle_context_history),
        )
        .route(
            "/api/v1/context/records",
            get(context_handlers::handle_context_records),
        )
        .route(
            "/api/v1/context/active",
            get(context_handlers::handle_active_context),
        )
        .with_state(state)
}
