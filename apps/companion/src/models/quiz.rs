use serde::{Deserialize, Serialize};

/// One multiple-choice question recovered from model output.
/// Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question_text: String,
    /// Usually four entries, but the parser does not enforce it.
    pub options: Vec<String>,
    /// Lower-case `a`..`d`, when the model marked one.
    pub correct_answer_letter: Option<char>,
}

impl QuizQuestion {
    /// Option labels in display order: `a`, `b`, `c`, ...
    pub fn option_letters(&self) -> impl Iterator<Item = char> + '_ {
        self.options
            .iter()
            .zip('a'..='z')
            .map(|(_, letter)| letter)
    }
}
