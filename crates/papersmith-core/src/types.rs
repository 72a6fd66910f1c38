// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain records for exam papers: bilingual strings, question types,
// answer schemas, sections and the document-level configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{PapersmithError, Result};

/// Which of the two languages a paper is printed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// Latin-script language (English).
    #[default]
    #[serde(alias = "en")]
    Primary,
    /// Devanagari-script language (Marathi / Hindi).
    #[serde(alias = "mr", alias = "hi")]
    Secondary,
}

/// A string available in the primary language and, optionally, the secondary one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "BilingualRepr")]
pub struct Bilingual {
    pub primary: String,
    pub secondary: Option<String>,
}

/// Wire forms accepted for [`Bilingual`]: a bare string or a pair.
#[derive(Deserialize)]
#[serde(untagged)]
enum BilingualRepr {
    Plain(String),
    Pair {
        #[serde(default, alias = "en")]
        primary: String,
        #[serde(default, alias = "mr")]
        secondary: Option<String>,
    },
}

impl From<BilingualRepr> for Bilingual {
    fn from(repr: BilingualRepr) -> Self {
        match repr {
            BilingualRepr::Plain(primary) => Self {
                primary,
                secondary: None,
            },
            BilingualRepr::Pair { primary, secondary } => Self { primary, secondary },
        }
    }
}

impl Bilingual {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: Some(secondary.into()),
        }
    }

    /// A string that only exists in the primary language.
    pub fn primary_only(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: None,
        }
    }

    /// The text to print for `language`.
    ///
    /// Secondary text that is missing or blank falls back to the primary text.
    pub fn resolve(&self, language: Language) -> &str {
        match (language, self.secondary.as_deref()) {
            (Language::Secondary, Some(text)) if !text.trim().is_empty() => text,
            _ => &self.primary,
        }
    }

    /// True when neither language carries any visible text.
    pub fn is_blank(&self) -> bool {
        self.primary.trim().is_empty()
            && self.secondary.as_deref().is_none_or(|s| s.trim().is_empty())
    }
}

/// The fixed set of question types a section can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Single-answer multiple choice.
    #[serde(alias = "mcq_single")]
    Mcq,
    /// Multiple-answer multiple choice.
    #[serde(alias = "mcq_multi")]
    MultiSelect,
    TrueFalse,
    #[serde(alias = "fill_in_blank", alias = "fill_in_the_blank")]
    FillBlank,
    #[serde(alias = "match_the_following")]
    Match,
    #[serde(alias = "short")]
    ShortAnswer,
    #[serde(alias = "long")]
    LongAnswer,
    #[serde(alias = "code")]
    Programming,
}

impl QuestionType {
    /// Plain English description used in default section instructions.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Mcq => "multiple choice questions",
            Self::MultiSelect => "multiple select questions",
            Self::TrueFalse => "true or false questions",
            Self::FillBlank => "fill in the blanks",
            Self::Match => "match the following",
            Self::ShortAnswer => "short answer questions",
            Self::LongAnswer => "long answer questions",
            Self::Programming => "programming questions",
        }
    }
}

/// The answer layout of a question, one variant per [`QuestionType`].
///
/// Built once when a question is constructed so the layout engine never has to
/// inspect loosely shaped data while drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerSpec {
    Mcq { options: Vec<Bilingual> },
    MultiSelect { options: Vec<Bilingual> },
    TrueFalse,
    FillBlank { blanks: usize },
    Match {
        left: Vec<Bilingual>,
        right: Vec<Bilingual>,
    },
    ShortAnswer,
    LongAnswer,
    Programming,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OptionsSchema {
    Wrapped { options: Vec<Bilingual> },
    Bare(Vec<Bilingual>),
}

#[derive(Deserialize)]
struct MatchSchema {
    #[serde(alias = "left_column", alias = "column_a")]
    left: Vec<Bilingual>,
    #[serde(alias = "right_column", alias = "column_b")]
    right: Vec<Bilingual>,
}

#[derive(Deserialize)]
struct FillBlankSchema {
    #[serde(alias = "blank_count")]
    blanks: usize,
}

impl AnswerSpec {
    /// The empty layout for `kind`: no options, no match items, one blank.
    pub fn skeleton(kind: QuestionType) -> Self {
        match kind {
            QuestionType::Mcq => Self::Mcq {
                options: Vec::new(),
            },
            QuestionType::MultiSelect => Self::MultiSelect {
                options: Vec::new(),
            },
            QuestionType::TrueFalse => Self::TrueFalse,
            QuestionType::FillBlank => Self::FillBlank { blanks: 1 },
            QuestionType::Match => Self::Match {
                left: Vec::new(),
                right: Vec::new(),
            },
            QuestionType::ShortAnswer => Self::ShortAnswer,
            QuestionType::LongAnswer => Self::LongAnswer,
            QuestionType::Programming => Self::Programming,
        }
    }

    /// Build the answer layout for `kind` from a raw answer schema.
    ///
    /// A missing schema or one whose shape does not fit `kind` produces the
    /// [`skeleton`](Self::skeleton) instead of an error.
    pub fn from_schema(kind: QuestionType, schema: Option<&Value>) -> Self {
        let parsed = match (kind, schema) {
            (_, None) | (_, Some(Value::Null)) => None,
            (QuestionType::Mcq | QuestionType::MultiSelect, Some(value)) => {
                serde_json::from_value::<OptionsSchema>(value.clone())
                    .ok()
                    .map(|schema| {
                        let options = match schema {
                            OptionsSchema::Wrapped { options } => options,
                            OptionsSchema::Bare(options) => options,
                        };
                        if kind == QuestionType::Mcq {
                            Self::Mcq { options }
                        } else {
                            Self::MultiSelect { options }
                        }
                    })
            }
            (QuestionType::Match, Some(value)) => {
                serde_json::from_value::<MatchSchema>(value.clone())
                    .ok()
                    .map(|m| Self::Match {
                        left: m.left,
                        right: m.right,
                    })
            }
            (QuestionType::FillBlank, Some(value)) => {
                serde_json::from_value::<FillBlankSchema>(value.clone())
                    .ok()
                    .map(|f| Self::FillBlank {
                        blanks: f.blanks.max(1),
                    })
            }
            // These types carry no schema; anything supplied is ignored.
            (_, Some(_)) => Some(Self::skeleton(kind)),
        };

        parsed.unwrap_or_else(|| {
            if schema.is_some_and(|v| !v.is_null()) {
                warn!(?kind, "answer schema does not match question type, using empty layout");
            }
            Self::skeleton(kind)
        })
    }

    /// The question type this layout belongs to.
    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::Mcq { .. } => QuestionType::Mcq,
            Self::MultiSelect { .. } => QuestionType::MultiSelect,
            Self::TrueFalse => QuestionType::TrueFalse,
            Self::FillBlank { .. } => QuestionType::FillBlank,
            Self::Match { .. } => QuestionType::Match,
            Self::ShortAnswer => QuestionType::ShortAnswer,
            Self::LongAnswer => QuestionType::LongAnswer,
            Self::Programming => QuestionType::Programming,
        }
    }

    /// Raw schema form, the inverse of [`from_schema`](Self::from_schema).
    pub fn to_schema(&self) -> Option<Value> {
        match self {
            Self::Mcq { options } | Self::MultiSelect { options } => {
                Some(serde_json::json!({ "options": options }))
            }
            Self::FillBlank { blanks } => Some(serde_json::json!({ "blanks": blanks })),
            Self::Match { left, right } => {
                Some(serde_json::json!({ "left": left, "right": right }))
            }
            Self::TrueFalse | Self::ShortAnswer | Self::LongAnswer | Self::Programming => None,
        }
    }
}

/// A single question as supplied by the question bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawQuestion", into = "RawQuestion")]
pub struct Question {
    pub text: Bilingual,
    pub answer: AnswerSpec,
}

#[derive(Serialize, Deserialize)]
struct RawQuestion {
    text: Bilingual,
    question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    answer_schema: Option<Value>,
}

impl From<RawQuestion> for Question {
    fn from(raw: RawQuestion) -> Self {
        Self {
            answer: AnswerSpec::from_schema(raw.question_type, raw.answer_schema.as_ref()),
            text: raw.text,
        }
    }
}

impl From<Question> for RawQuestion {
    fn from(question: Question) -> Self {
        Self {
            question_type: question.answer.question_type(),
            answer_schema: question.answer.to_schema(),
            text: question.text,
        }
    }
}

impl Question {
    pub fn new(text: Bilingual, answer: AnswerSpec) -> Self {
        Self { text, answer }
    }

    pub fn question_type(&self) -> QuestionType {
        self.answer.question_type()
    }
}

/// A named group of same-type questions with uniform marks.
///
/// `total_marks == question_count * marks_per_question` is expected to hold but is
/// left to the caller to validate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub position: u32,
    pub name: Bilingual,
    pub question_type: QuestionType,
    pub question_count: u32,
    pub marks_per_question: u32,
    pub total_marks: u32,
    #[serde(default)]
    pub instructions: Option<Bilingual>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// Document-level settings for one exam paper.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentConfig {
    pub exam_name: Bilingual,
    #[serde(default)]
    pub subject: Bilingual,
    #[serde(default)]
    pub class_name: Bilingual,
    #[serde(default)]
    pub institute: Bilingual,
    pub total_marks: u32,
    pub duration_minutes: u32,
    #[serde(default)]
    pub instructions: Vec<Bilingual>,
    #[serde(default)]
    pub language: Language,
    /// Date printed in the footer. Today's local date when absent.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Complete generation input as delivered by the exam service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamInput {
    pub config: DocumentConfig,
    pub sections: Vec<Section>,
}

impl ExamInput {
    /// Decode an exam input record from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| PapersmithError::InvalidInput(err.to_string()))
    }

    /// Encode the record back to JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}
