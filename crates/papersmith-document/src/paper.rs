// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout coordinator — header block, general instructions, sections and the
// footer pass, producing an `ExamPaper` that serializes to PDF.
//
// All mutable layout state (pages, cursor, question counter) lives inside a
// single `layout()` call. A generator can be reused, and shared across threads,
// without any of it leaking between papers.

use std::path::Path;

use chrono::{Local, NaiveDate};
use papersmith_core::error::Result;
use papersmith_core::labels::localize_digits;
use papersmith_core::{DocumentConfig, Labels, LayoutConfig, Section};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::layout::page::{Page, PageManager};
use crate::layout::question::{PlacedQuestion, QuestionRenderer};
use crate::layout::section::SectionRenderer;
use crate::pdf::PdfWriter;
use crate::text::{Align, GlyphRasterizer, NoRasterizer, TextRasterizer, TextRenderer, TextStyle};

const HEADER_PADDING: f32 = 3.0;
const ROLL_BOX_WIDTH: f32 = 45.0;
const MARKS_BOX_WIDTH: f32 = 22.0;
const SUB_BOX_HEIGHT: f32 = 7.0;
const BLOCK_SPACING: f32 = 5.0;
const INSTRUCTION_INDENT: f32 = 6.0;

/// A fully laid-out exam paper, ready to serialize.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamPaper {
    pub title: String,
    /// Page width and height in millimetres.
    pub page_size: (f32, f32),
    pub pages: Vec<Page>,
    /// Placement of every question, in document order.
    pub questions: Vec<PlacedQuestion>,
}

impl ExamPaper {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Questions placed on the zero-based page `page`.
    pub fn questions_on(&self, page: usize) -> impl Iterator<Item = &PlacedQuestion> {
        self.questions.iter().filter(move |q| q.page == page)
    }

    /// Placement summary of every question as JSON.
    pub fn placements_json(&self) -> Result<String> {
        #[derive(Serialize)]
        struct Placements<'a> {
            title: &'a str,
            pages: usize,
            questions: &'a [PlacedQuestion],
        }
        Ok(serde_json::to_string_pretty(&Placements {
            title: &self.title,
            pages: self.page_count(),
            questions: &self.questions,
        })?)
    }

    pub fn to_pdf_bytes(&self) -> Vec<u8> {
        PdfWriter::new(self.page_size, self.title.as_str()).write(&self.pages)
    }
}

/// Produces exam papers from a document config and its sections.
pub struct ExamPaperGenerator {
    config: LayoutConfig,
    rasterizer: Box<dyn TextRasterizer>,
}

impl ExamPaperGenerator {
    /// Generator with vector text only.
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            rasterizer: Box::new(NoRasterizer),
        }
    }

    /// Generator that rasterizes Devanagari with the first suitable system font,
    /// or with vector text only if none is installed.
    pub fn with_system_fonts(config: LayoutConfig) -> Self {
        match GlyphRasterizer::from_system_fonts() {
            Some(rasterizer) => Self::new(config).with_rasterizer(rasterizer),
            None => {
                warn!("No Devanagari system font found, secondary text falls back to vector");
                Self::new(config)
            }
        }
    }

    pub fn with_rasterizer(mut self, rasterizer: impl TextRasterizer + 'static) -> Self {
        self.rasterizer = Box::new(rasterizer);
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out the whole paper without serializing it.
    #[instrument(skip_all, fields(sections = sections.len(), language = ?doc.language))]
    pub fn layout(&self, doc: &DocumentConfig, sections: &[Section]) -> ExamPaper {
        let language = doc.language;
        let labels = Labels::for_language(language);
        let renderer = TextRenderer::new(language, self.rasterizer.as_ref(), &self.config);
        let mut pages = PageManager::new(&self.config);

        draw_header(&mut pages, &renderer, labels, doc);
        draw_instructions(&mut pages, &renderer, labels, doc);

        let mut questions = QuestionRenderer::new(&renderer, labels, self.config.base_font_size);
        let section_renderer = SectionRenderer::new(&renderer, labels);
        let mut placed = Vec::new();
        for (index, section) in sections.iter().enumerate() {
            placed.extend(section_renderer.render(&mut pages, &mut questions, section, index));
        }

        let title = doc.exam_name.resolve(language).to_string();
        let date = doc.date.unwrap_or_else(today);
        pages.stamp_footers(&renderer, &format!("{} | {}", title, labels.format_date(date)));

        let pages = pages.into_pages();
        info!(pages = pages.len(), questions = placed.len(), "Exam paper laid out");

        ExamPaper {
            title,
            page_size: self.config.page_size_mm(),
            pages,
            questions: placed,
        }
    }

    /// Lay out and serialize the paper to PDF bytes.
    pub fn generate(&self, doc: &DocumentConfig, sections: &[Section]) -> Vec<u8> {
        self.layout(doc, sections).to_pdf_bytes()
    }

    /// Generate the paper and write it to `path`.
    pub fn write_to_file(
        &self,
        doc: &DocumentConfig,
        sections: &[Section],
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let bytes = self.generate(doc, sections);
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote exam paper to {}", path.as_ref().display());
        Ok(())
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Bordered box: institute, exam title, metadata line, roll-number and marks boxes.
fn draw_header(pages: &mut PageManager, renderer: &TextRenderer<'_>, labels: &Labels, doc: &DocumentConfig) {
    let language = renderer.language();
    let base = pages.config().base_font_size;
    let (left, right, width) = (pages.left(), pages.right(), pages.content_width());
    let centre = left + width / 2.0;
    let inner = width - 2.0 * HEADER_PADDING;
    let top = pages.cursor().y;
    let mut y = top + HEADER_PADDING;

    let institute = doc.institute.resolve(language);
    if !institute.trim().is_empty() {
        let style = TextStyle::new(base + 2.0).bold().align(Align::Center).max_width(inner);
        y += renderer.render(pages.page(), institute, centre, y, &style).height;
    }

    let title_style = TextStyle::new(base + 4.0).bold().align(Align::Center).max_width(inner);
    let title = doc.exam_name.resolve(language);
    y += renderer.render(pages.page(), title, centre, y, &title_style).height;

    let meta_style = TextStyle::new(base - 1.0).align(Align::Center).max_width(inner);
    y += renderer
        .render(pages.page(), &metadata_line(labels, doc), centre, y, &meta_style)
        .height
        + 1.5;

    let label_style = TextStyle::new(base - 1.0).bold();
    let label_height = renderer.line_height(&label_style);
    let label_top = y + (SUB_BOX_HEIGHT - label_height) / 2.0;
    let page = pages.page();

    let roll_label = format!("{}:", labels.roll_no);
    let roll_x = left + HEADER_PADDING;
    let roll_w = renderer.render(page, &roll_label, roll_x, label_top, &label_style).width;
    page.outline(roll_x + roll_w + 2.0, y, ROLL_BOX_WIDTH, SUB_BOX_HEIGHT, 0.5);

    let marks_total = localize_digits(&format!("/ {}", doc.total_marks), language);
    let total_x = right - HEADER_PADDING;
    let total_w = renderer
        .render(page, &marks_total, total_x, label_top, &label_style.align(Align::Right))
        .width;
    let box_x = total_x - total_w - 1.5 - MARKS_BOX_WIDTH;
    page.outline(box_x, y, MARKS_BOX_WIDTH, SUB_BOX_HEIGHT, 0.5);
    let marks_label = format!("{}:", capitalize(labels.marks));
    renderer.render(page, &marks_label, box_x - 2.0, label_top, &label_style.align(Align::Right));

    y += SUB_BOX_HEIGHT + HEADER_PADDING;
    page.outline(left, top, width, y - top, 0.8);
    pages.advance(y - top + BLOCK_SPACING);
}

/// "Subject: .. | Class: .. | Time: 90 min | Max. Marks: 100", skipping blank names.
fn metadata_line(labels: &Labels, doc: &DocumentConfig) -> String {
    let language = labels.language;
    let mut parts = Vec::with_capacity(4);
    for (label, value) in [(labels.subject, &doc.subject), (labels.class, &doc.class_name)] {
        let value = value.resolve(language);
        if !value.trim().is_empty() {
            parts.push(format!("{label}: {value}"));
        }
    }
    parts.push(format!("{}: {} {}", labels.time, doc.duration_minutes, labels.minutes));
    parts.push(format!("{}: {}", labels.max_marks, doc.total_marks));
    localize_digits(&parts.join(" | "), language)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Numbered list of the paper's general instructions; nothing when there are none.
fn draw_instructions(pages: &mut PageManager, renderer: &TextRenderer<'_>, labels: &Labels, doc: &DocumentConfig) {
    let language = renderer.language();
    let items: Vec<&str> = doc
        .instructions
        .iter()
        .map(|i| i.resolve(language))
        .filter(|t| !t.trim().is_empty())
        .collect();
    if items.is_empty() {
        return;
    }

    let base = pages.config().base_font_size;
    let left = pages.left();
    let heading = TextStyle::new(base).bold();
    let item_style = TextStyle::new(base - 0.5).max_width(pages.content_width() - INSTRUCTION_INDENT);

    let heading_height = renderer.line_height(&heading);
    pages.ensure_space(heading_height + renderer.line_height(&item_style));
    let y = pages.cursor().y;
    renderer.render(pages.page(), &format!("{}:", labels.instructions), left, y, &heading);
    pages.advance(heading_height);

    for (i, text) in items.iter().enumerate() {
        let height = renderer.measure_height(text, &item_style);
        pages.ensure_space(height);
        let y = pages.cursor().y;
        let number = localize_digits(&format!("{}.", i + 1), language);
        let page = pages.page();
        renderer.render(page, &number, left + 1.0, y, &item_style);
        renderer.render(page, text, left + INSTRUCTION_INDENT, y, &item_style);
        pages.advance(height);
    }
    pages.advance(BLOCK_SPACING);
}
