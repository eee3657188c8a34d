use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const MIN_GRADE: u8 = 1;
pub const MAX_GRADE: u8 = 12;
const DEFAULT_NAME: &str = "Student";

/// The MBTI labels offered in the profile picker. Used only as a tone hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MbtiType {
    #[default]
    Intj,
    Enfp,
    Istp,
    Esfj,
    Infp,
    Entp,
}

impl MbtiType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MbtiType::Intj => "INTJ",
            MbtiType::Enfp => "ENFP",
            MbtiType::Istp => "ISTP",
            MbtiType::Esfj => "ESFJ",
            MbtiType::Infp => "INFP",
            MbtiType::Entp => "ENTP",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LearningStyle {
    #[default]
    Visual,
    Auditory,
    Kinesthetic,
}

impl LearningStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningStyle::Visual => "Visual",
            LearningStyle::Auditory => "Auditory",
            LearningStyle::Kinesthetic => "Kinesthetic",
        }
    }
}

/// Answer language. Selects the prompt template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(alias = "en")]
    English,
    #[serde(alias = "hi")]
    Hindi,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Subject {
    Mathematics,
    #[default]
    Science,
    English,
    #[serde(rename = "Social Studies")]
    SocialStudies,
    #[serde(rename = "Computer Science")]
    ComputerScience,
}

impl Subject {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Mathematics => "Mathematics",
            Subject::Science => "Science",
            Subject::English => "English",
            Subject::SocialStudies => "Social Studies",
            Subject::ComputerScience => "Computer Science",
        }
    }
}

macro_rules! display_via_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_via_as_str!(MbtiType, LearningStyle, Subject);

/// The student's settings for one UI session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudentProfile {
    pub name: String,
    pub mbti_type: MbtiType,
    pub learning_style: LearningStyle,
    pub language: Language,
    pub subject: Subject,
    pub grade: u8,
}

impl Default for StudentProfile {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            mbti_type: MbtiType::default(),
            learning_style: LearningStyle::default(),
            language: Language::default(),
            subject: Subject::default(),
            grade: 8,
        }
    }
}

impl StudentProfile {
    /// Checks the grade range and normalizes the name.
    pub fn validated(mut self) -> Result<Self, AppError> {
        if !(MIN_GRADE..=MAX_GRADE).contains(&self.grade) {
            return Err(AppError::Validation(format!(
                "grade must be between {MIN_GRADE} and {MAX_GRADE}, got {}",
                self.grade
            )));
        }
        let name = self.name.trim();
        self.name = if name.is_empty() {
            DEFAULT_NAME.to_string()
        } else {
            name.to_string()
        };
        Ok(self)
    }
}
