// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Question renderer — numbered question text, marks indicator and answer area,
// with the page break decided before anything is drawn.

use papersmith_core::{AnswerSpec, Labels, Question};
use serde::Serialize;
use tracing::debug;

use super::answer::{AnswerArea, AnswerAreaGenerator};
use super::page::PageManager;
use crate::text::{Align, RenderPath, TextRenderer, TextStyle};

/// Column reserved for the question number.
const NUMBER_WIDTH: f32 = 10.0;
/// Column reserved for the right-aligned `[n]` marks indicator.
const MARKS_WIDTH: f32 = 12.0;
const TEXT_ANSWER_GAP: f32 = 1.5;
/// Space after each question.
const QUESTION_SPACING: f32 = 4.0;

/// Where a question ended up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedQuestion {
    /// Document-wide question number, starting at 1.
    pub number: u32,
    /// Zero-based index of the section the question belongs to.
    pub section: usize,
    /// Zero-based page index; the whole question lies on this page.
    pub page: usize,
    pub top: f32,
    pub bottom: f32,
    /// Height used for the page-break decision.
    pub estimated_height: f32,
    pub text_path: RenderPath,
    pub answer: AnswerArea,
}

/// Draws questions in order, numbering them continuously across sections.
pub struct QuestionRenderer<'r, 'a> {
    renderer: &'r TextRenderer<'a>,
    answers: AnswerAreaGenerator<'r, 'a>,
    style: TextStyle,
    next_number: u32,
}

impl<'r, 'a> QuestionRenderer<'r, 'a> {
    pub fn new(renderer: &'r TextRenderer<'a>, labels: &'static Labels, font_size: f32) -> Self {
        Self {
            renderer,
            answers: AnswerAreaGenerator::new(renderer, labels, font_size),
            style: TextStyle::new(font_size),
            next_number: 1,
        }
    }

    /// The number the next rendered question will get.
    pub fn next_number(&self) -> u32 {
        self.next_number
    }

    fn text_style(&self, content_width: f32) -> TextStyle {
        self.style
            .max_width((content_width - NUMBER_WIDTH - MARKS_WIDTH).max(1.0))
    }

    fn text_height(&self, text: &str, content_width: f32) -> f32 {
        self.renderer
            .measure_height(text, &self.text_style(content_width))
            .max(self.renderer.line_height(&self.style))
    }

    /// Footprint of a question before drawing: wrapped text plus the answer area.
    pub fn estimate_height(&self, text: &str, spec: &AnswerSpec, content_width: f32) -> f32 {
        self.text_height(text, content_width)
            + TEXT_ANSWER_GAP
            + self.answers.estimate_height(spec, content_width - NUMBER_WIDTH)
            + QUESTION_SPACING
    }

    /// Draw `question` with the answer layout `spec` and advance the cursor.
    ///
    /// `spec` is passed separately so a section can substitute the skeleton of
    /// its own type when a question's schema does not belong to it.
    pub fn render(
        &mut self,
        pages: &mut PageManager,
        question: &Question,
        spec: &AnswerSpec,
        marks: u32,
        section: usize,
    ) -> PlacedQuestion {
        let width = pages.content_width();
        let (left, right) = (pages.left(), pages.right());
        let text = question.text.resolve(self.renderer.language());

        let estimated_height = self.estimate_height(text, spec, width);
        if pages.ensure_space(estimated_height) {
            debug!(number = self.next_number, estimated_height, "Question moved to next page");
        }

        let cursor = pages.cursor();
        let number = self.next_number;
        self.next_number += 1;

        let page = pages.page();
        let top = cursor.y;
        self.renderer
            .render(page, &format!("Q{number}."), left, top, &self.style.bold());
        self.renderer
            .render(page, text, left + NUMBER_WIDTH, top, &self.text_style(width));
        self.renderer.render(
            page,
            &format!("[{marks}]"),
            right,
            top,
            &self.style.align(Align::Right),
        );

        let text_height = self.text_height(text, width);
        let answer_top = top + text_height + TEXT_ANSWER_GAP;
        let answer = self
            .answers
            .draw(page, spec, left + NUMBER_WIDTH, answer_top, width - NUMBER_WIDTH);

        let bottom = answer_top + answer.height;
        pages.advance(bottom - top + QUESTION_SPACING);

        PlacedQuestion {
            number,
            section,
            page: cursor.page,
            top,
            bottom,
            estimated_height,
            text_path: self.renderer.path_for(text),
            answer,
        }
    }
}
