// Prompt templates for the study assistant.
// Placeholders are filled by `compose_prompt` in a single pass, so values are never re-expanded.

use crate::errors::AppError;
use crate::llm_client::prompts::STUDY_ASSISTANT_SYSTEM;
use crate::models::profile::{Language, StudentProfile};
use crate::quiz::parser::MAX_QUESTIONS;

/// English answer template.
/// Replace: {name}, {grade}, {subject}, {mbti}, {learning_style}, {question}
pub const ENGLISH_TEMPLATE: &str = "\
You are an expert teacher who adapts explanations according to the student's MBTI type and learning style.
The student's name is {name}. They are in grade {grade} and studying {subject}.
The student's MBTI is {mbti}, and their learning style is {learning_style}.
Give a detailed, easy-to-understand answer for the question:
{question}";

/// Hindi answer template. Same placeholders as the English one.
pub const HINDI_TEMPLATE: &str = "\
आप एक विशेषज्ञ शिक्षक हैं जो छात्रों की MBTI व्यक्तित्व और सीखने की शैली को समझते हैं।
छात्र का नाम {name} है। कक्षा: {grade}, विषय: {subject}।
छात्र की MBTI प्रकार है {mbti} और उसकी सीखने की शैली है {learning_style}।
इस प्रश्न का उत्तर छात्रों के स्तर पर, आसान भाषा में और विस्तार से दें:
{question}";

/// Appended when the student wants a practice quiz. Keeps the model inside the
/// `Q1.` / `a)` / `Answer:` layout the quiz parser reads.
/// Replace: {count}
pub const QUIZ_INSTRUCTION: &str = "

After the answer, add a practice quiz of exactly {count} multiple-choice questions on this topic.
Use exactly this layout, one item per line, with no markdown:
Q1. <question>
a) <option>
b) <option>
c) <option>
d) <option>
Answer: <letter>";

/// The two chat turns of a completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompt {
    pub system: &'static str,
    pub user: String,
}

/// Builds the prompt for `question`. Fails without touching the network when the
/// question is blank. User text is trimmed but otherwise embedded as-is.
pub fn compose_prompt(
    question: &str,
    profile: &StudentProfile,
    include_quiz: bool,
) -> Result<ComposedPrompt, AppError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(AppError::Validation(
            "Please enter a question before asking.".to_string(),
        ));
    }

    let template = match profile.language {
        Language::English => ENGLISH_TEMPLATE,
        Language::Hindi => HINDI_TEMPLATE,
    };

    let grade = profile.grade.to_string();
    let mut user = fill_template(
        template,
        &[
            ("name", profile.name.trim()),
            ("grade", &grade),
            ("subject", profile.subject.as_str()),
            ("mbti", profile.mbti_type.as_str()),
            ("learning_style", profile.learning_style.as_str()),
            ("question", question),
        ],
    );

    if include_quiz {
        let count = MAX_QUESTIONS.to_string();
        user.push_str(&fill_template(QUIZ_INSTRUCTION, &[("count", &count)]));
    }

    Ok(ComposedPrompt {
        system: STUDY_ASSISTANT_SYSTEM,
        user,
    })
}

/// Replaces each `{key}` in `template` with its value. Substituted text is
/// copied as-is and never scanned again; unknown `{...}` runs stay literal.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
