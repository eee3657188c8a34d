//! Answer/quiz pipeline: one free-text user action in, one reply out.
//!
//! compose prompt → completion call → (offline fallback) → quiz detection.
//! A failed call leaves the session exactly as it was.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::llm_client::CompletionBackend;
use crate::quiz::parser::parse_quiz;
use crate::quiz::session::{is_affirmative, QuizPhase};
use crate::quiz::QuizView;
use crate::session::{Role, SessionContext};
use crate::study::fallback;
use crate::study::prompts::compose_prompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Model,
    OfflineFallback,
    Quiz,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub source: ReplySource,
    /// Extra prompt shown under the answer, e.g. the quiz offer.
    pub follow_up: Option<String>,
    pub quiz: QuizView,
}

/// Runs one user message against `session`.
pub async fn handle_message(
    session: &mut SessionContext,
    text: &str,
    include_quiz: bool,
    backend: &dyn CompletionBackend,
    offline_fallback: bool,
) -> Result<ChatReply, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation(
            "Please enter a question before asking.".to_string(),
        ));
    }

    if session.quiz.phase() == QuizPhase::AwaitingConfirmation && is_affirmative(text) {
        session.quiz.confirm(text);
        session.record(Role::User, text);
        let total = session.quiz.questions().len();
        let reply = format!("Great! Let's begin. {total} question(s), one at a time.");
        session.record(Role::Assistant, reply.clone());
        info!("Quiz started with {total} question(s)");
        return Ok(ChatReply {
            reply,
            source: ReplySource::Quiz,
            follow_up: None,
            quiz: QuizView::from(&session.quiz),
        });
    }

    let prompt = compose_prompt(text, &session.profile, include_quiz)?;

    let (answer, source) = match backend.complete(prompt.system, &prompt.user).await {
        Ok(answer) => (answer, ReplySource::Model),
        Err(err) if err.is_unreachable() && offline_fallback => {
            match fallback::lookup(text, session.profile.language) {
                Some(canned) => {
                    warn!("Completion service unreachable ({err}); serving offline answer");
                    (canned.to_string(), ReplySource::OfflineFallback)
                }
                None => return Err(err.into()),
            }
        }
        Err(err) => return Err(err.into()),
    };

    // Any non-affirmative reply to a pending offer is a fresh question; the offer lapses.
    match session.quiz.phase() {
        QuizPhase::AwaitingConfirmation => {
            session.quiz.confirm(text);
            debug!("Pending quiz discarded by a new question");
        }
        QuizPhase::Complete => session.quiz.reset(),
        QuizPhase::Idle | QuizPhase::InProgress => {}
    }

    session.record(Role::User, text);
    session.record(Role::Assistant, answer.clone());

    let mut follow_up = None;
    if source == ReplySource::Model && session.quiz.phase() == QuizPhase::Idle {
        let questions = parse_quiz(&answer);
        let count = questions.len();
        if session.quiz.offer(questions) {
            info!("Quiz with {count} question(s) offered");
            follow_up = Some(format!(
                "I found a {count}-question quiz in this answer. Would you like to take it? (yes/no)"
            ));
        }
    }

    Ok(ChatReply {
        reply: answer,
        source,
        follow_up,
        quiz: QuizView::from(&session.quiz),
    })
}
