// Quiz flow: parse a quiz block out of an answer, then walk the student through it.

pub mod handlers;
pub mod parser;
pub mod session;

use serde::Serialize;

use crate::quiz::session::{QuizPhase, QuizSession, QuizSummary};

/// A question as the UI renders it: text plus lettered answer buttons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionView {
    pub number: usize,
    pub question_text: String,
    pub options: Vec<OptionView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionView {
    pub letter: char,
    pub text: String,
}

/// Client-facing snapshot of a quiz session. The answer key is never exposed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizView {
    pub phase: QuizPhase,
    pub started: bool,
    pub total: usize,
    pub answered: usize,
    pub score: usize,
    pub current: Option<QuestionView>,
    pub summary: Option<QuizSummary>,
}

impl From<&QuizSession> for QuizView {
    fn from(quiz: &QuizSession) -> Self {
        let current = quiz.current_question().map(|q| QuestionView {
            number: quiz.current_index() + 1,
            question_text: q.question_text.clone(),
            options: q
                .option_letters()
                .zip(&q.options)
                .map(|(letter, text)| OptionView {
                    letter,
                    text: text.clone(),
                })
                .collect(),
        });

        QuizView {
            phase: quiz.phase(),
            started: quiz.started(),
            total: quiz.questions().len(),
            answered: quiz.current_index(),
            score: quiz.score(),
            current,
            summary: quiz.summary(),
        }
    }
}
