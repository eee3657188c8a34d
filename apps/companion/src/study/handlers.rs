//! Axum route handlers for sessions and chat messages.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::StudentProfile;
use crate::quiz::QuizView;
use crate::session::ChatTurn;
use crate::state::AppState;
use crate::study::pipeline::{handle_message, ChatReply};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub profile: StudentProfile,
}

#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub profile: StudentProfile,
    pub history: Vec<ChatTurn>,
    pub quiz: QuizView,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub text: String,
    /// Ask the model to append a practice quiz to its answer.
    #[serde(default = "default_include_quiz")]
    pub include_quiz: bool,
}

fn default_include_quiz() -> bool {
    true
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
///
/// Starts a session. Missing profile fields take their defaults.
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(profile): Json<StudentProfile>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), AppError> {
    let profile = profile.validated()?;
    let session_id = state.sessions.create(profile.clone()).await;
    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            profile,
        }),
    ))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = state.sessions.get(session_id).await?;
    let session = session.lock().await;
    Ok(Json(SessionSnapshot {
        session_id,
        profile: session.profile.clone(),
        history: session.history.clone(),
        quiz: QuizView::from(&session.quiz),
    }))
}

/// PUT /api/v1/sessions/:id/profile
///
/// Replaces the profile. History and quiz state are kept.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(profile): Json<StudentProfile>,
) -> Result<Json<StudentProfile>, AppError> {
    let profile = profile.validated()?;
    let session = state.sessions.get(session_id).await?;
    session.lock().await.profile = profile.clone();
    Ok(Json(profile))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/messages
///
/// A question, or a yes/no reply to a quiz offer. The session stays locked
/// until the reply is ready, so a session never has two calls in flight.
pub async fn handle_message_request(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let session = state.sessions.get(session_id).await?;
    let mut session = session.lock().await;
    let reply = handle_message(
        &mut session,
        &request.text,
        request.include_quiz,
        state.llm.as_ref(),
        state.config.offline_fallback,
    )
    .await?;
    Ok(Json(reply))
}
