//! Quiz text parser: recovers multiple-choice questions from free-form model output.
//!
//! Best-effort and line-based. A tagged/structured response format from the model
//! would make this unnecessary; until then the contract is kept deliberately small:
//!
//! - question start: trimmed line begins with `Q` (covers `Question`) and contains `.` or `:`
//! - answer marker: trimmed line begins with `answer` / `correct answer` (any case);
//!   the key is a standalone letter a–d after the separator
//! - option: first char is `a`..`d` (any case) and the line contains `)`, `:` or `.`
//!
//! Records with no options are dropped. At most `MAX_QUESTIONS` are returned.
//!
//! Known misfires of the option-line key heuristic: an option whose text contains
//! "incorrect", and a `Correct: b` line, which starts with `c` and so parses as
//! option `c` marked correct.

use tracing::debug;

use crate::models::quiz::QuizQuestion;

pub const MAX_QUESTIONS: usize = 10;

const OPTION_LETTERS: [char; 4] = ['a', 'b', 'c', 'd'];
const OPTION_SEPARATORS: [char; 3] = [')', ':', '.'];
const QUESTION_SEPARATORS: [char; 2] = ['.', ':'];

/// Parses every quiz block in `response`. An empty result means "no quiz available".
pub fn parse_quiz(response: &str) -> Vec<QuizQuestion> {
    let mut questions = Vec::new();
    let mut open: Option<QuizQuestion> = None;

    for line in response.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(text) = question_start(line) {
            close_record(&mut questions, open.take());
            open = Some(QuizQuestion {
                question_text: text.to_string(),
                options: Vec::new(),
                correct_answer_letter: None,
            });
            continue;
        }

        // Options and answer markers only mean something inside a question.
        let Some(record) = open.as_mut() else {
            continue;
        };

        if let Some(letter) = answer_marker(line) {
            if letter.is_some() {
                record.correct_answer_letter = letter;
            }
            continue;
        }

        if let Some((letter, text)) = option_line(line) {
            record.options.push(text.to_string());
            // Heuristic: an option mentioning "correct"/"answer" is taken as the key.
            // Misfires on option text that merely contains those words.
            let lower = line.to_lowercase();
            if lower.contains("correct") || lower.contains("answer") {
                record.correct_answer_letter = Some(letter);
            }
        }
    }
    close_record(&mut questions, open);

    let parsed = questions.len();
    questions.truncate(MAX_QUESTIONS);
    debug!("Parsed {} quiz question(s), kept {}", parsed, questions.len());
    questions
}

fn close_record(questions: &mut Vec<QuizQuestion>, record: Option<QuizQuestion>) {
    if let Some(record) = record {
        if !record.options.is_empty() {
            questions.push(record);
        }
    }
}

/// Returns the question text if `line` opens a new question.
fn question_start(line: &str) -> Option<&str> {
    if !line.starts_with('Q') {
        return None;
    }
    let idx = line.find(QUESTION_SEPARATORS)?;
    Some(line[idx + 1..].trim())
}

const ANSWER_PREFIXES: [&str; 2] = ["correct answer", "answer"];

/// `Some(letter)` when `line` is an answer marker; the inner option is `None`
/// if no option letter can be picked out after the separator.
fn answer_marker(line: &str) -> Option<Option<char>> {
    let prefix_len = ANSWER_PREFIXES.iter().find_map(|prefix| {
        line.get(..prefix.len())
            .filter(|head| head.eq_ignore_ascii_case(prefix))
            .map(|_| prefix.len())
    })?;
    let rest = &line[prefix_len..];
    let idx = rest.find(QUESTION_SEPARATORS)?;
    Some(answer_letter(rest[idx + 1..].trim()))
}

/// Picks the option letter out of an answer line's tail.
///
/// Only standalone single letters a–d count. A marked one wins: wrapped as `(c)`,
/// followed by `)` `.` `,` `:` `;`, or last on the line. Otherwise an upper-case
/// letter is taken; a bare lower-case one is too likely to be the article "a".
fn answer_letter(tail: &str) -> Option<char> {
    let mut unmarked_upper = None;
    let mut chars = tail.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if !c.is_alphabetic() {
            continue;
        }
        let mut end = start + c.len_utf8();
        let mut len = 1;
        while let Some(&(i, next)) = chars.peek() {
            if !next.is_alphabetic() {
                break;
            }
            end = i + next.len_utf8();
            len += 1;
            chars.next();
        }

        let letter = c.to_ascii_lowercase();
        if len != 1 || !OPTION_LETTERS.contains(&letter) {
            continue;
        }

        let before = tail[..start].chars().next_back();
        let after = tail[end..].chars().next();
        let marked = before == Some('(')
            || matches!(after, None | Some(')' | '.' | ',' | ':' | ';'));
        if marked {
            return Some(letter);
        }
        if c.is_ascii_uppercase() && unmarked_upper.is_none() {
            unmarked_upper = Some(letter);
        }
    }
    unmarked_upper
}

/// Returns the lower-cased leading letter and option text if `line` is an option.
fn option_line(line: &str) -> Option<(char, &str)> {
    let first = line.chars().next()?.to_ascii_lowercase();
    if !OPTION_LETTERS.contains(&first) {
        return None;
    }
    let idx = line.find(OPTION_SEPARATORS)?;
    Some((first, line[idx + 1..].trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz_block(n: usize, answer: char) -> String {
        format!(
            "Q{n}. What is item {n}?\n\
             a) first\n\
             b) second\n\
             c) third\n\
             d) fourth\n\
             Answer: {answer}\n\n"
        )
    }

    fn response_with(n: usize) -> String {
        let mut text = String::from("Here is your explanation.\n\nQuiz time!\n\n");
        for i in 1..=n {
            text.push_str(&quiz_block(i, 'c'));
        }
        text
    }

    #[test]
    fn test_ten_well_formed_blocks() {
        let quiz = parse_quiz(&response_with(10));
        assert_eq!(quiz.len(), 10);
        for (i, q) in quiz.iter().enumerate() {
            assert_eq!(q.question_text, format!("What is item {}?", i + 1));
            assert_eq!(q.options, vec!["first", "second", "third", "fourth"]);
            assert_eq!(q.correct_answer_letter, Some('c'));
        }
    }

    #[test]
    fn test_truncates_to_ten() {
        let quiz = parse_quiz(&response_with(15));
        assert_eq!(quiz.len(), MAX_QUESTIONS);
        assert_eq!(quiz[9].question_text, "What is item 10?");
    }

    #[test]
    fn test_orphaned_option_before_any_question_is_dropped() {
        let text = "a) stray option\nb) another\nQ1. Real question?\na) yes\nb) no\n";
        let quiz = parse_quiz(text);
        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz[0].options, vec!["yes", "no"]);
    }

    #[test]
    fn test_no_question_markers_yields_empty() {
        let text = "Gravity is a force that attracts masses.\nIt keeps planets in orbit.";
        assert!(parse_quiz(text).is_empty());
    }

    #[test]
    fn test_question_without_options_discarded() {
        let text = "Q1. Lonely question?\nQ2. Real one?\na) x\nb) y\nQ3. Trailing question?";
        let quiz = parse_quiz(text);
        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz[0].question_text, "Real one?");
    }

    #[test]
    fn test_question_prefix_and_colon_separator() {
        let text = "Question 1: What is H2O?\nA. Water\nB. Salt\nC: Sugar\nD) Air\n";
        let quiz = parse_quiz(text);
        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz[0].question_text, "What is H2O?");
        assert_eq!(quiz[0].options, vec!["Water", "Salt", "Sugar", "Air"]);
        assert_eq!(quiz[0].correct_answer_letter, None);
    }

    #[test]
    fn test_question_text_after_first_separator_only() {
        let quiz = parse_quiz("Q1. What is 3.5 doubled?\na) 7\nb) 6\n");
        assert_eq!(quiz[0].question_text, "What is 3.5 doubled?");
    }

    #[test]
    fn test_option_marked_correct_sets_letter() {
        let text = "Q1. Capital of India?\na) Mumbai\nb) New Delhi (correct)\nc) Kolkata\nd) Chennai\n";
        let quiz = parse_quiz(text);
        assert_eq!(quiz[0].correct_answer_letter, Some('b'));
        assert_eq!(quiz[0].options[1], "New Delhi (correct)");
    }

    #[test]
    fn test_heuristic_false_positive_is_kept() {
        // "incorrect" contains "correct"; the heuristic picks it up.
        let text = "Q1. Which is true?\na) The sun is cold\nb) Water is wet\nc) This is incorrect\nAnswer: b\n";
        let quiz = parse_quiz(text);
        assert_eq!(quiz[0].options.len(), 3);
        // The explicit answer line comes last and wins.
        assert_eq!(quiz[0].correct_answer_letter, Some('b'));

        let text = "Q1. Which is true?\na) The sun is cold\nb) Water is wet\nc) This is incorrect\n";
        assert_eq!(parse_quiz(text)[0].correct_answer_letter, Some('c'));
    }

    #[test]
    fn test_answer_line_is_not_an_option() {
        let text = "Q1. Pick one\na) x\nb) y\nCorrect Answer: (B)\n";
        let quiz = parse_quiz(text);
        assert_eq!(quiz[0].options, vec!["x", "y"]);
        assert_eq!(quiz[0].correct_answer_letter, Some('b'));
    }

    #[test]
    fn test_uppercase_answer_letter_lowercased() {
        let quiz = parse_quiz("Q1. Pick\nA) x\nB) y\nAnswer: B\n");
        assert_eq!(quiz[0].correct_answer_letter, Some('b'));
    }

    #[test]
    fn test_indented_lines_are_trimmed() {
        let text = "   Q1.  Indented?  \n    a)  one \n    b) two\n";
        let quiz = parse_quiz(text);
        assert_eq!(quiz[0].question_text, "Indented?");
        assert_eq!(quiz[0].options, vec!["one", "two"]);
    }

    fn key_for(answer_line: &str) -> Option<char> {
        let text = format!("Q1. Pick\na) x\nb) y\nc) z\nd) w\n{answer_line}\n");
        parse_quiz(&text)[0].correct_answer_letter
    }

    #[test]
    fn test_answer_letter_after_word() {
        assert_eq!(key_for("Answer: Option B"), Some('b'));
        assert_eq!(key_for("Answer: option d."), Some('d'));
    }

    #[test]
    fn test_answer_letter_wrapped_or_followed_by_text() {
        assert_eq!(key_for("Answer: (c)"), Some('c'));
        assert_eq!(key_for("Answer: c) z"), Some('c'));
        assert_eq!(key_for("Answer: b, because y is right"), Some('b'));
    }

    #[test]
    fn test_answer_letter_in_free_text() {
        assert_eq!(key_for("Answer: Because of gravity, d"), Some('d'));
        assert_eq!(key_for("Answer: it is a ball falling"), None);
        assert_eq!(key_for("Answer: Because of gravity"), None);
    }

    #[test]
    fn test_correct_colon_line_parses_as_option() {
        let quiz = parse_quiz("Q1. Pick\na) x\nb) y\nCorrect: b\n");
        assert_eq!(quiz[0].options, vec!["x", "y", "b"]);
        assert_eq!(quiz[0].correct_answer_letter, Some('c'));
    }
}
