// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Section layout — header bar, marks summary, instruction strip, the section's
// questions, and a closing rule.

use std::borrow::Cow;

use papersmith_core::{AnswerSpec, Labels, Question, Section};
use tracing::{debug, warn};

use super::answer::letter;
use super::page::PageManager;
use super::question::{PlacedQuestion, QuestionRenderer};
use crate::text::{Align, Color, TextRenderer, TextStyle};

const HEADER_FONT_SIZE: f32 = 11.0;
const INSTRUCTION_FONT_SIZE: f32 = 9.0;
const BAR_PADDING: f32 = 1.5;
/// Gap between the instruction strip and the first question.
const STRIP_GAP: f32 = 2.0;
/// Horizontal room kept between the title and the marks summary.
const SUMMARY_GAP: f32 = 6.0;
const SECTION_SPACING: f32 = 5.0;

/// Letter of the section at zero-based `index`: A, B, … Z, AA, AB…
pub fn section_letter(index: usize) -> String {
    letter(index, true)
}

/// Marks summary shown on the header bar, e.g. `(2 x 1 = 2 marks)`.
pub fn marks_summary(section: &Section, labels: &Labels) -> String {
    format!(
        "({} x {} = {} {})",
        section.question_count, section.marks_per_question, section.total_marks, labels.marks
    )
}

/// The schema drawn for `question`: its own, or the section type's skeleton
/// when the two disagree.
fn answer_spec<'q>(section: &Section, question: &'q Question) -> Cow<'q, AnswerSpec> {
    if question.question_type() == section.question_type {
        Cow::Borrowed(&question.answer)
    } else {
        Cow::Owned(AnswerSpec::skeleton(section.question_type))
    }
}

/// Draws whole sections through a shared [`QuestionRenderer`].
pub struct SectionRenderer<'r, 'a> {
    renderer: &'r TextRenderer<'a>,
    labels: &'static Labels,
}

impl<'r, 'a> SectionRenderer<'r, 'a> {
    pub fn new(renderer: &'r TextRenderer<'a>, labels: &'static Labels) -> Self {
        Self { renderer, labels }
    }

    /// Lay out `section` (the `index`-th of the paper) from the cursor onward.
    ///
    /// The section starts on a new page unless the header, the instruction
    /// strip and the first question all fit, with at least
    /// `section_min_space_mm` left.
    pub fn render(
        &self,
        pages: &mut PageManager,
        questions: &mut QuestionRenderer<'r, 'a>,
        section: &Section,
        index: usize,
    ) -> Vec<PlacedQuestion> {
        let width = pages.content_width();
        let language = self.renderer.language();
        let first_question = section
            .questions
            .first()
            .map(|q| questions.estimate_height(q.text.resolve(language), &answer_spec(section, q), width))
            .unwrap_or(0.0);
        let opening = self.header_height(section, index, width) + self.strip_height(section, width) + first_question;
        let needed = pages.config().section_min_space_mm.max(opening);
        if pages.ensure_space(needed) {
            debug!(section = index, needed, "Section moved to next page");
        }

        self.draw_header(pages, section, index);
        self.draw_instructions(pages, section);

        let mut placed = Vec::with_capacity(section.questions.len());
        for question in &section.questions {
            let spec = answer_spec(section, question);
            if let Cow::Owned(_) = spec {
                warn!(
                    section = index,
                    expected = ?section.question_type,
                    found = ?question.question_type(),
                    "Question type differs from its section, drawing empty layout"
                );
            }
            placed.push(questions.render(pages, question, &spec, section.marks_per_question, index));
        }

        pages.ensure_space(SECTION_SPACING);
        let y = pages.cursor().y + SECTION_SPACING / 2.0;
        let (left, right) = (pages.left(), pages.right());
        pages.page().hline(left, right, y, 0.4, Color::RULE);
        pages.advance(SECTION_SPACING);

        placed
    }

    fn title(&self, section: &Section, index: usize) -> String {
        format!(
            "{} {} — {}",
            self.labels.section,
            section_letter(index),
            section.name.resolve(self.renderer.language()).to_uppercase()
        )
    }

    /// Title style, wrapped so it never runs into the summary.
    fn title_style(&self, summary: &str, width: f32) -> TextStyle {
        let style = TextStyle::new(HEADER_FONT_SIZE).bold();
        let summary_width = self.renderer.measure_width(summary, &style);
        style.max_width((width - summary_width - SUMMARY_GAP).max(1.0))
    }

    fn header_height(&self, section: &Section, index: usize, width: f32) -> f32 {
        let summary = marks_summary(section, self.labels);
        let style = self.title_style(&summary, width);
        let title_h = self
            .renderer
            .measure_height(&self.title(section, index), &style)
            .max(self.renderer.line_height(&style));
        title_h + 2.0 * BAR_PADDING
    }

    fn draw_header(&self, pages: &mut PageManager, section: &Section, index: usize) {
        let (left, right, width) = (pages.left(), pages.right(), pages.content_width());
        let title = self.title(section, index);
        let summary = marks_summary(section, self.labels);
        let style = self.title_style(&summary, width);
        let height = self.header_height(section, index, width);
        let top = pages.cursor().y;

        let page = pages.page();
        page.fill(left, top, width, height, Color::HEADER_FILL);
        self.renderer.render(page, &title, left + 2.0, top + BAR_PADDING, &style);
        let summary_style = TextStyle::new(HEADER_FONT_SIZE).bold().align(Align::Right);
        self.renderer
            .render(page, &summary, right - 2.0, top + BAR_PADDING, &summary_style);
        pages.advance(height);
    }

    fn instructions(&self, section: &Section) -> String {
        section
            .instructions
            .as_ref()
            .map(|i| i.resolve(self.renderer.language()))
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.labels.default_section_instruction(section.question_type))
    }

    fn instruction_style(width: f32) -> TextStyle {
        TextStyle::new(INSTRUCTION_FONT_SIZE).max_width(width - 4.0)
    }

    /// Strip height plus the gap after it.
    fn strip_height(&self, section: &Section, width: f32) -> f32 {
        let style = Self::instruction_style(width);
        self.renderer.measure_height(&self.instructions(section), &style) + 2.0 * BAR_PADDING + STRIP_GAP
    }

    fn draw_instructions(&self, pages: &mut PageManager, section: &Section) {
        let (left, width) = (pages.left(), pages.content_width());
        let style = Self::instruction_style(width);
        let text = self.instructions(section);
        let height = self.strip_height(section, width) - STRIP_GAP;
        let top = pages.cursor().y;
        let page = pages.page();
        page.fill(left, top, width, height, Color::STRIP_FILL);
        self.renderer.render(page, &text, left + 2.0, top + BAR_PADDING, &style);
        pages.advance(height + STRIP_GAP);
    }
}
