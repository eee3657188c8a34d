//! Linear quiz state machine.
//!
//! Idle → AwaitingConfirmation → InProgress → Complete, with `exit` resetting
//! to Idle from anywhere. One answer per question; the index only moves forward.

use serde::Serialize;
use thiserror::Error;

use crate::models::quiz::QuizQuestion;

/// Replies that accept a pending quiz (compared case-insensitively after trimming).
const AFFIRMATIVE_REPLIES: &[&str] = &["yes", "y", "haan", "हाँ", "हां"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizPhase {
    #[default]
    Idle,
    AwaitingConfirmation,
    InProgress,
    Complete,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("no quiz is in progress")]
    NotInProgress,

    #[error("answer must be a single option letter, got '{0}'")]
    InvalidAnswer(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTier {
    Review,
    GoodJob,
    Excellent,
}

impl FeedbackTier {
    /// Tier for `score` out of `total`. 50% and 90% belong to the upper tier.
    pub fn for_score(score: usize, total: usize) -> Self {
        if total == 0 {
            return FeedbackTier::Review;
        }
        if score * 100 >= total * 90 {
            FeedbackTier::Excellent
        } else if score * 100 >= total * 50 {
            FeedbackTier::GoodJob
        } else {
            FeedbackTier::Review
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizSummary {
    pub score: usize,
    pub total: usize,
    pub percentage: f64,
    pub tier: FeedbackTier,
    pub message: String,
}

impl QuizSummary {
    fn new(score: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            score as f64 / total as f64 * 100.0
        };
        let tier = FeedbackTier::for_score(score, total);
        let message = match tier {
            FeedbackTier::Review => format!(
                "You scored {score}/{total}. Review the material and retry the quiz."
            ),
            FeedbackTier::GoodJob => format!("Good job! You scored {percentage:.0}%."),
            FeedbackTier::Excellent => format!("Excellent! You scored {percentage:.0}%."),
        };
        Self {
            score,
            total,
            percentage,
            tier,
            message,
        }
    }
}

/// What happened to one submitted answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerOutcome {
    /// Zero-based index of the question this answer was recorded against.
    pub question_index: usize,
    pub submitted: char,
    pub correct: bool,
    pub correct_answer_letter: Option<char>,
    pub summary: Option<QuizSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Started,
    Declined,
    NothingPending,
}

#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    phase: QuizPhase,
    questions: Vec<QuizQuestion>,
    current_index: usize,
    score: usize,
}

pub fn is_affirmative(reply: &str) -> bool {
    let reply = reply.trim().to_lowercase();
    AFFIRMATIVE_REPLIES.contains(&reply.as_str())
}

impl QuizSession {
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn started(&self) -> bool {
        matches!(self.phase, QuizPhase::InProgress | QuizPhase::Complete)
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.phase {
            QuizPhase::InProgress => self.questions.get(self.current_index),
            _ => None,
        }
    }

    /// Offers a freshly parsed quiz. Only an Idle session with a non-empty quiz accepts it.
    pub fn offer(&mut self, questions: Vec<QuizQuestion>) -> bool {
        if self.phase != QuizPhase::Idle || questions.is_empty() {
            return false;
        }
        self.questions = questions;
        self.current_index = 0;
        self.score = 0;
        self.phase = QuizPhase::AwaitingConfirmation;
        true
    }

    /// Handles a free-text reply while a quiz is pending.
    /// Anything but an affirmative reply drops the pending quiz.
    pub fn confirm(&mut self, reply: &str) -> Confirmation {
        if self.phase != QuizPhase::AwaitingConfirmation {
            return Confirmation::NothingPending;
        }
        if is_affirmative(reply) {
            self.phase = QuizPhase::InProgress;
            Confirmation::Started
        } else {
            self.reset();
            Confirmation::Declined
        }
    }

    /// Records one answer against the current question and advances.
    pub fn submit_answer(&mut self, answer: &str) -> Result<AnswerOutcome, QuizError> {
        if self.phase != QuizPhase::InProgress {
            return Err(QuizError::NotInProgress);
        }
        let submitted = parse_letter(answer)?;

        let question_index = self.current_index;
        let correct_answer_letter = self.questions[question_index].correct_answer_letter;
        let correct = correct_answer_letter == Some(submitted);
        if correct {
            self.score += 1;
        }
        self.current_index += 1;

        let summary = if self.current_index == self.questions.len() {
            self.phase = QuizPhase::Complete;
            self.summary()
        } else {
            None
        };

        Ok(AnswerOutcome {
            question_index,
            submitted,
            correct,
            correct_answer_letter,
            summary,
        })
    }

    /// Final result, once the last question is answered.
    pub fn summary(&self) -> Option<QuizSummary> {
        match self.phase {
            QuizPhase::Complete => Some(QuizSummary::new(self.score, self.questions.len())),
            _ => None,
        }
    }

    /// "Exit quiz": back to Idle without recording anything.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn parse_letter(answer: &str) -> Result<char, QuizError> {
    let trimmed = answer.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(c.to_ascii_lowercase()),
        _ => Err(QuizError::InvalidAnswer(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: Option<char>) -> QuizQuestion {
        QuizQuestion {
            question_text: "Pick one".into(),
            options: vec!["w".into(), "x".into(), "y".into(), "z".into()],
            correct_answer_letter: correct,
        }
    }

    fn started_quiz(n: usize) -> QuizSession {
        let mut quiz = QuizSession::default();
        assert!(quiz.offer(vec![question(Some('c')); n]));
        assert_eq!(quiz.confirm("yes"), Confirmation::Started);
        quiz
    }

    fn finish_with(correct: usize, total: usize) -> QuizSummary {
        let mut quiz = started_quiz(total);
        let mut last = None;
        for i in 0..total {
            let answer = if i < correct { "c" } else { "a" };
            last = quiz.submit_answer(answer).unwrap().summary;
        }
        last.expect("quiz should be complete")
    }

    #[test]
    fn test_offer_requires_questions() {
        let mut quiz = QuizSession::default();
        assert!(!quiz.offer(vec![]));
        assert_eq!(quiz.phase(), QuizPhase::Idle);
    }

    #[test]
    fn test_offer_only_from_idle() {
        let mut quiz = started_quiz(2);
        assert!(!quiz.offer(vec![question(None)]));
        assert_eq!(quiz.questions().len(), 2);
    }

    #[test]
    fn test_affirmative_tokens() {
        for reply in ["yes", "Y", " YES ", "haan", "Haan", "हाँ", "हां"] {
            assert!(is_affirmative(reply), "{reply:?} should confirm");
        }
        for reply in ["no", "yeah", "ok", "", "nahi"] {
            assert!(!is_affirmative(reply), "{reply:?} should not confirm");
        }
    }

    #[test]
    fn test_declining_returns_to_idle() {
        let mut quiz = QuizSession::default();
        quiz.offer(vec![question(Some('a'))]);
        assert_eq!(quiz.confirm("no"), Confirmation::Declined);
        assert_eq!(quiz.phase(), QuizPhase::Idle);
        assert!(quiz.questions().is_empty());
        assert!(!quiz.started());
    }

    #[test]
    fn test_confirm_without_pending_quiz() {
        let mut quiz = QuizSession::default();
        assert_eq!(quiz.confirm("yes"), Confirmation::NothingPending);
        assert_eq!(quiz.phase(), QuizPhase::Idle);
    }

    #[test]
    fn test_answer_rejected_unless_in_progress() {
        let mut quiz = QuizSession::default();
        assert_eq!(quiz.submit_answer("a"), Err(QuizError::NotInProgress));
        quiz.offer(vec![question(Some('a'))]);
        assert_eq!(quiz.submit_answer("a"), Err(QuizError::NotInProgress));
    }

    #[test]
    fn test_invalid_answer_does_not_advance() {
        let mut quiz = started_quiz(2);
        assert!(matches!(
            quiz.submit_answer("ab"),
            Err(QuizError::InvalidAnswer(_))
        ));
        assert!(matches!(quiz.submit_answer(""), Err(QuizError::InvalidAnswer(_))));
        assert_eq!(quiz.current_index(), 0);
    }

    #[test]
    fn test_second_submission_targets_next_question() {
        let mut quiz = started_quiz(3);
        let first = quiz.submit_answer("c").unwrap();
        let second = quiz.submit_answer("c").unwrap();
        assert_eq!(first.question_index, 0);
        assert_eq!(second.question_index, 1);
        assert_eq!(quiz.current_index(), 2);
        assert_eq!(quiz.score(), 2);
    }

    #[test]
    fn test_case_insensitive_scoring() {
        let mut quiz = started_quiz(1);
        let outcome = quiz.submit_answer("C").unwrap();
        assert!(outcome.correct);
        assert_eq!(outcome.submitted, 'c');
    }

    #[test]
    fn test_unmarked_question_never_scores() {
        let mut quiz = QuizSession::default();
        quiz.offer(vec![question(None)]);
        quiz.confirm("y");
        let outcome = quiz.submit_answer("a").unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.correct_answer_letter, None);
    }

    #[test]
    fn test_completion_is_terminal() {
        let mut quiz = started_quiz(1);
        let outcome = quiz.submit_answer("c").unwrap();
        assert!(outcome.summary.is_some());
        assert_eq!(quiz.phase(), QuizPhase::Complete);
        assert_eq!(quiz.submit_answer("c"), Err(QuizError::NotInProgress));
        assert_eq!(quiz.score(), 1);
        assert!(quiz.current_question().is_none());
    }

    #[test]
    fn test_score_never_exceeds_answered() {
        let mut quiz = started_quiz(5);
        for _ in 0..5 {
            quiz.submit_answer("c").unwrap();
            assert!(quiz.score() <= quiz.current_index());
            assert!(quiz.current_index() <= quiz.questions().len());
        }
    }

    #[test]
    fn test_feedback_boundaries_for_ten_questions() {
        let four = finish_with(4, 10);
        assert_eq!(four.tier, FeedbackTier::Review);
        assert!((four.percentage - 40.0).abs() < 1e-9);

        let five = finish_with(5, 10);
        assert_eq!(five.tier, FeedbackTier::GoodJob);
        assert!((five.percentage - 50.0).abs() < 1e-9);
        assert!(five.message.contains("50%"));

        let eight = finish_with(8, 10);
        assert_eq!(eight.tier, FeedbackTier::GoodJob);

        let nine = finish_with(9, 10);
        assert_eq!(nine.tier, FeedbackTier::Excellent);
        assert!(nine.message.contains("90%"));

        assert_eq!(finish_with(10, 10).tier, FeedbackTier::Excellent);
        assert_eq!(finish_with(0, 10).tier, FeedbackTier::Review);
    }

    #[test]
    fn test_feedback_tier_with_uneven_totals() {
        assert_eq!(FeedbackTier::for_score(1, 3), FeedbackTier::Review);
        assert_eq!(FeedbackTier::for_score(2, 3), FeedbackTier::GoodJob);
        assert_eq!(FeedbackTier::for_score(0, 0), FeedbackTier::Review);
    }

    #[test]
    fn test_exit_from_any_phase_resets() {
        let mut quiz = started_quiz(3);
        quiz.submit_answer("c").unwrap();
        quiz.reset();
        assert_eq!(quiz.phase(), QuizPhase::Idle);
        assert_eq!(quiz.score(), 0);
        assert_eq!(quiz.current_index(), 0);
        assert!(quiz.summary().is_none());
    }
}
