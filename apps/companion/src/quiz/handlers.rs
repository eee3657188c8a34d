//! Axum route handlers for the quiz buttons.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::quiz::session::AnswerOutcome;
use crate::quiz::QuizView;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    /// Option letter of the pressed button.
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub outcome: AnswerOutcome,
    pub quiz: QuizView,
}

/// POST /api/v1/sessions/:id/quiz/answer
///
/// Records the answer against the current question and moves on. There is no
/// way to answer the same question twice.
pub async fn handle_answer(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    let session = state.sessions.get(session_id).await?;
    let mut session = session.lock().await;
    let outcome = session.quiz.submit_answer(&request.answer)?;
    if let Some(summary) = &outcome.summary {
        info!(
            "Session {session_id} finished quiz: {}/{} ({:?})",
            summary.score, summary.total, summary.tier
        );
    }
    Ok(Json(AnswerResponse {
        outcome,
        quiz: QuizView::from(&session.quiz),
    }))
}

/// POST /api/v1/sessions/:id/quiz/exit
///
/// Drops the quiz from any phase. No score is kept.
pub async fn handle_exit(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<QuizView>, AppError> {
    let session = state.sessions.get(session_id).await?;
    let mut session = session.lock().await;
    session.quiz.reset();
    Ok(Json(QuizView::from(&session.quiz)))
}
