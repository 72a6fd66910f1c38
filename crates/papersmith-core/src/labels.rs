// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fixed strings printed on every paper, in both languages, plus date and
// numeral localization.

use chrono::{Datelike, NaiveDate};

use crate::types::{Language, QuestionType};

/// Static label set for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub language: Language,
    pub section: &'static str,
    pub instructions: &'static str,
    pub roll_no: &'static str,
    pub marks: &'static str,
    pub max_marks: &'static str,
    pub time: &'static str,
    pub minutes: &'static str,
    pub subject: &'static str,
    pub class: &'static str,
    pub true_label: &'static str,
    pub false_label: &'static str,
    pub column_a: &'static str,
    pub column_b: &'static str,
    pub answer: &'static str,
}

const PRIMARY: Labels = Labels {
    language: Language::Primary,
    section: "SECTION",
    instructions: "Instructions",
    roll_no: "Roll No.",
    marks: "marks",
    max_marks: "Max. Marks",
    time: "Time",
    minutes: "min",
    subject: "Subject",
    class: "Class",
    true_label: "True",
    false_label: "False",
    column_a: "Column A",
    column_b: "Column B",
    answer: "Ans.",
};

const SECONDARY: Labels = Labels {
    language: Language::Secondary,
    section: "विभाग",
    instructions: "सूचना",
    roll_no: "बैठक क्र.",
    marks: "गुण",
    max_marks: "एकूण गुण",
    time: "वेळ",
    minutes: "मिनिटे",
    subject: "विषय",
    class: "इयत्ता",
    true_label: "बरोबर",
    false_label: "चूक",
    column_a: "स्तंभ अ",
    column_b: "स्तंभ ब",
    answer: "उत्तर",
};

const MONTHS_SECONDARY: [&str; 12] = [
    "जानेवारी",
    "फेब्रुवारी",
    "मार्च",
    "एप्रिल",
    "मे",
    "जून",
    "जुलै",
    "ऑगस्ट",
    "सप्टेंबर",
    "ऑक्टोबर",
    "नोव्हेंबर",
    "डिसेंबर",
];

impl Labels {
    pub fn for_language(language: Language) -> &'static Labels {
        match language {
            Language::Primary => &PRIMARY,
            Language::Secondary => &SECONDARY,
        }
    }

    /// Sentence printed under a section header that has no instructions.
    pub fn default_section_instruction(&self, kind: QuestionType) -> String {
        match self.language {
            Language::Primary => format!("Answer the following {}.", kind.describe()),
            Language::Secondary => match kind {
                QuestionType::Mcq | QuestionType::MultiSelect => {
                    "योग्य पर्याय निवडा.".to_string()
                }
                QuestionType::TrueFalse => "चूक की बरोबर ते लिहा.".to_string(),
                QuestionType::FillBlank => "रिकाम्या जागा भरा.".to_string(),
                QuestionType::Match => "जोड्या जुळवा.".to_string(),
                QuestionType::Programming => "खालील प्रोग्राम लिहा.".to_string(),
                QuestionType::ShortAnswer | QuestionType::LongAnswer => {
                    "खालील प्रश्नांची उत्तरे लिहा.".to_string()
                }
            },
        }
    }

    /// Format a date the way the footer prints it, e.g. `14 October 2026`.
    pub fn format_date(&self, date: NaiveDate) -> String {
        match self.language {
            Language::Primary => date.format("%-d %B %Y").to_string(),
            Language::Secondary => format!(
                "{} {} {}",
                localize_digits(&date.day().to_string(), Language::Secondary),
                MONTHS_SECONDARY[date.month0() as usize],
                localize_digits(&date.year().to_string(), Language::Secondary),
            ),
        }
    }
}

/// Replace ASCII digits with Devanagari digits for the secondary language.
pub fn localize_digits(text: &str, language: Language) -> String {
    match language {
        Language::Primary => text.to_string(),
        Language::Secondary => text
            .chars()
            .map(|c| match c.to_digit(10) {
                Some(d) => char::from_u32(0x0966 + d).unwrap_or(c),
                None => c,
            })
            .collect(),
    }
}
