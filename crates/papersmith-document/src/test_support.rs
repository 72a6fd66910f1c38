// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Test-only helpers shared by the layout unit tests.

use papersmith_core::{AnswerSpec, Bilingual, Question, QuestionType, Section};

use crate::text::{Bitmap, Color, FontWeight, TextRasterizer};

/// Deterministic rasterizer that paints a solid block per line, sized from the
/// character count, so raster routing can be tested without a system font.
pub struct BlockRasterizer;

impl TextRasterizer for BlockRasterizer {
    fn is_available(&self) -> bool {
        true
    }

    fn rasterize(&self, text: &str, px_size: f32, _weight: FontWeight, color: Color) -> Option<Bitmap> {
        let width = (text.chars().count() as f32 * px_size * 0.5).ceil().max(1.0) as u32;
        let height = (px_size * 1.3).ceil() as u32;
        let pixel = [color.r, color.g, color.b, 255];
        Some(Bitmap {
            width,
            height,
            baseline: px_size.ceil() as u32,
            rgba: pixel.repeat((width * height) as usize),
        })
    }
}

/// A section of `count` questions of `kind`, each with a skeleton-or-sample schema.
pub fn section(kind: QuestionType, count: u32, marks: u32) -> Section {
    let questions = (0..count)
        .map(|i| {
            Question::new(
                Bilingual::new(format!("Question {}", i + 1), format!("प्रश्न {}", i + 1)),
                sample_answer(kind),
            )
        })
        .collect();
    Section {
        position: 0,
        name: Bilingual::new(kind.describe(), "विभाग"),
        question_type: kind,
        question_count: count,
        marks_per_question: marks,
        total_marks: count * marks,
        instructions: None,
        questions,
    }
}

fn sample_answer(kind: QuestionType) -> AnswerSpec {
    let items = |n: usize, stem: &str| (1..=n).map(|i| Bilingual::primary_only(format!("{stem} {i}"))).collect();
    match kind {
        QuestionType::Mcq => AnswerSpec::Mcq { options: items(4, "Option") },
        QuestionType::MultiSelect => AnswerSpec::MultiSelect { options: items(4, "Option") },
        QuestionType::Match => AnswerSpec::Match {
            left: items(3, "Left"),
            right: items(3, "Right"),
        },
        QuestionType::FillBlank => AnswerSpec::FillBlank { blanks: 1 },
        other => AnswerSpec::skeleton(other),
    }
}
