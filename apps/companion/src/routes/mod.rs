pub mod health;
pub mod ui;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::quiz::handlers as quiz;
use crate::state::AppState;
use crate::study::handlers as study;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ui::index_handler))
        .route("/health", get(health::health_handler))
        // Sessions
        .route("/api/v1/sessions", post(study::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(study::handle_get_session).delete(study::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/profile",
            put(study::handle_update_profile),
        )
        .route(
            "/api/v1/sessions/:id/messages",
            post(study::handle_message_request),
        )
        // Quiz
        .route("/api/v1/sessions/:id/quiz/answer", post(quiz::handle_answer))
        .route("/api/v1/sessions/:id/quiz/exit", post(quiz::handle_exit))
        .with_state(state)
}
