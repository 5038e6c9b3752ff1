pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{dashboard, interview, resume, store};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interviewee flow
        .route("/api/v1/resume", post(resume::handlers::handle_upload_resume))
        .route("/api/v1/session", get(interview::handlers::handle_get_session))
        .route(
            "/api/v1/session/profile",
            post(interview::handlers::handle_confirm_profile),
        )
        .route(
            "/api/v1/session/answer",
            post(interview::handlers::handle_submit_answer),
        )
        .route("/api/v1/session/pause", post(interview::handlers::handle_pause))
        .route("/api/v1/session/resume", post(interview::handlers::handle_resume))
        .route("/api/v1/session/reset", post(interview::handlers::handle_reset))
        // Interviewer dashboard
        .route("/api/v1/candidates", get(dashboard::handlers::handle_list))
        .route("/api/v1/candidates/:id", get(dashboard::handlers::handle_detail))
        // Preferences and maintenance
        .route(
            "/api/v1/prefs",
            get(store::handlers::handle_get_prefs).patch(store::handlers::handle_patch_prefs),
        )
        .route("/api/v1/purge", post(store::handlers::handle_purge))
        .with_state(state)
}
