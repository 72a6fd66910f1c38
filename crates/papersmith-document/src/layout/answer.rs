// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Answer-area generator — the response layout drawn under each question,
// selected purely by the question's `AnswerSpec` variant.

use papersmith_core::{AnswerSpec, Bilingual, Labels, QuestionType};
use serde::Serialize;

use super::page::Page;
use crate::text::{Align, Color, TextRenderer, TextStyle};

/// Space left below every answer area.
const AREA_MARGIN: f32 = 2.0;
const TRUE_FALSE_HEIGHT: f32 = 9.0;
const FILL_BLANK_HEIGHT: f32 = 9.0;
/// Gap between two ruled answer lines.
const RULE_SPACING: f32 = 7.5;
const SHORT_ANSWER_LINES: usize = 3;
const LONG_ANSWER_LINES: usize = 6;
const CODE_BOX_HEIGHT: f32 = 48.0;
const CODE_GUIDE_SPACING: f32 = 6.0;
const MATCH_SLOTS_PER_ROW: usize = 5;
const MATCH_COLUMN_GAP: f32 = 4.0;
/// Side of a checkbox.
const BOX_SIZE: f32 = 3.5;
/// Horizontal room reserved for an option label such as "(A)".
const OPTION_LABEL_WIDTH: f32 = 9.0;
/// Spacing between the two true/false pairs.
const TRUE_FALSE_PITCH: f32 = 40.0;

/// What an answer area drew, with the counts tests and callers care about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum AnswerLayout {
    /// Lettered options, one per line.
    Options { count: usize, checkboxes: bool },
    /// Checkbox + label pairs.
    TrueFalse { pairs: usize },
    FillBlank { blanks: usize },
    Match {
        rows: usize,
        empty_left: usize,
        empty_right: usize,
        slots: usize,
        slot_rows: usize,
    },
    /// Ruled writing lines.
    Ruled { lines: usize },
    CodeBox { guides: usize },
}

/// Result of drawing one answer area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerArea {
    pub kind: QuestionType,
    /// Vertical space actually consumed, in millimetres.
    pub height: f32,
    pub layout: AnswerLayout,
}

/// Draws answer areas at an explicit position; it never touches the cursor.
pub struct AnswerAreaGenerator<'r, 'a> {
    renderer: &'r TextRenderer<'a>,
    labels: &'static Labels,
    style: TextStyle,
}

impl<'r, 'a> AnswerAreaGenerator<'r, 'a> {
    pub fn new(renderer: &'r TextRenderer<'a>, labels: &'static Labels, font_size: f32) -> Self {
        Self {
            renderer,
            labels,
            style: TextStyle::new(font_size),
        }
    }

    fn line_height(&self) -> f32 {
        self.renderer.line_height(&self.style)
    }

    fn option_style(&self, width: f32) -> TextStyle {
        self.style.max_width((width - OPTION_LABEL_WIDTH).max(1.0))
    }

    fn option_heights<'o>(&self, options: &'o [Bilingual], width: f32) -> impl Iterator<Item = (&'o Bilingual, f32)> {
        let style = self.option_style(width);
        let line_height = self.line_height();
        let language = self.renderer.language();
        options.iter().map(move |option| {
            let h = self.renderer.measure_height(option.resolve(language), &style);
            (option, h.max(line_height))
        })
    }

    fn match_cell_style(&self, width: f32) -> TextStyle {
        let col_w = (width - MATCH_COLUMN_GAP) / 2.0;
        self.style.max_width((col_w - 3.0).max(1.0))
    }

    /// Labelled cell texts of match row `i`; `None` for a padded cell.
    fn match_cells(&self, left: &[Bilingual], right: &[Bilingual], i: usize) -> [Option<String>; 2] {
        let language = self.renderer.language();
        [
            left.get(i).map(|item| format!("{}. {}", i + 1, item.resolve(language))),
            right.get(i).map(|item| format!("{}) {}", letter(i, false), item.resolve(language))),
        ]
    }

    /// Body row heights; each row fits the taller of its two wrapped cells.
    fn match_rows(&self, left: &[Bilingual], right: &[Bilingual], width: f32) -> Vec<f32> {
        let style = self.match_cell_style(width);
        let line_height = self.line_height();
        let (_, row_h) = match_row_heights(line_height);
        (0..left.len().max(right.len()))
            .map(|i| {
                let tallest = self
                    .match_cells(left, right, i)
                    .iter()
                    .flatten()
                    .map(|text| self.renderer.measure_height(text, &style))
                    .fold(line_height, f32::max);
                tallest + row_h - line_height
            })
            .collect()
    }

    /// Height the area for `spec` will take at `width`, computed before drawing.
    pub fn estimate_height(&self, spec: &AnswerSpec, width: f32) -> f32 {
        let line_height = self.line_height();
        match spec {
            AnswerSpec::Mcq { options } | AnswerSpec::MultiSelect { options } => {
                self.option_heights(options, width).map(|(_, h)| h).sum::<f32>() + AREA_MARGIN
            }
            AnswerSpec::TrueFalse => TRUE_FALSE_HEIGHT,
            AnswerSpec::FillBlank { .. } => FILL_BLANK_HEIGHT,
            AnswerSpec::Match { left, right } => {
                let slot_rows = left.len().div_ceil(MATCH_SLOTS_PER_ROW);
                let (header, row) = match_row_heights(line_height);
                let body: f32 = self.match_rows(left, right, width).iter().sum();
                header + body + MATCH_COLUMN_GAP / 2.0 + slot_rows as f32 * row + AREA_MARGIN
            }
            AnswerSpec::ShortAnswer => SHORT_ANSWER_LINES as f32 * RULE_SPACING + AREA_MARGIN,
            AnswerSpec::LongAnswer => LONG_ANSWER_LINES as f32 * RULE_SPACING + AREA_MARGIN,
            AnswerSpec::Programming => CODE_BOX_HEIGHT + 1.0 + AREA_MARGIN,
        }
    }

    /// Draw the area for `spec` with its top-left corner at `(x, y)`.
    pub fn draw(&self, page: &mut Page, spec: &AnswerSpec, x: f32, y: f32, width: f32) -> AnswerArea {
        let (height, layout) = match spec {
            AnswerSpec::Mcq { options } => self.draw_options(page, options, false, x, y, width),
            AnswerSpec::MultiSelect { options } => self.draw_options(page, options, true, x, y, width),
            AnswerSpec::TrueFalse => self.draw_true_false(page, x, y),
            AnswerSpec::FillBlank { blanks } => self.draw_fill_blank(page, *blanks, x, y, width),
            AnswerSpec::Match { left, right } => self.draw_match(page, left, right, x, y, width),
            AnswerSpec::ShortAnswer => self.draw_ruled(page, SHORT_ANSWER_LINES, x, y, width),
            AnswerSpec::LongAnswer => self.draw_ruled(page, LONG_ANSWER_LINES, x, y, width),
            AnswerSpec::Programming => self.draw_code_box(page, x, y, width),
        };
        AnswerArea {
            kind: spec.question_type(),
            height,
            layout,
        }
    }

    // -- Variants -------------------------------------------------------------

    fn draw_options(
        &self,
        page: &mut Page,
        options: &[Bilingual],
        checkboxes: bool,
        x: f32,
        y: f32,
        width: f32,
    ) -> (f32, AnswerLayout) {
        let style = self.option_style(width);
        let language = self.renderer.language();
        let line_height = self.line_height();
        let mut row_y = y;

        for (i, (option, row_height)) in self.option_heights(options, width).enumerate() {
            let label = format!("({})", letter(i, true));
            if checkboxes {
                page.outline(x, row_y + (line_height - BOX_SIZE) / 2.0, BOX_SIZE, BOX_SIZE, 0.5);
                self.renderer.render(page, &label, x + BOX_SIZE + 0.8, row_y, &self.style);
            } else {
                self.renderer.render(page, &label, x, row_y, &self.style);
            }
            self.renderer
                .render(page, option.resolve(language), x + OPTION_LABEL_WIDTH, row_y, &style);
            row_y += row_height;
        }

        (
            row_y - y + AREA_MARGIN,
            AnswerLayout::Options {
                count: options.len(),
                checkboxes,
            },
        )
    }

    fn draw_true_false(&self, page: &mut Page, x: f32, y: f32) -> (f32, AnswerLayout) {
        let line_height = self.line_height();
        let top = y + 1.0;
        let labels = [self.labels.true_label, self.labels.false_label];
        for (i, label) in labels.iter().enumerate() {
            let bx = x + i as f32 * TRUE_FALSE_PITCH;
            page.outline(bx, top + (line_height - BOX_SIZE) / 2.0, BOX_SIZE, BOX_SIZE, 0.5);
            self.renderer.render(page, label, bx + BOX_SIZE + 2.0, top, &self.style);
        }
        (TRUE_FALSE_HEIGHT, AnswerLayout::TrueFalse { pairs: labels.len() })
    }

    fn draw_fill_blank(&self, page: &mut Page, blanks: usize, x: f32, y: f32, width: f32) -> (f32, AnswerLayout) {
        let blanks = blanks.max(1);
        let top = y + 1.0;
        let label = format!("{}:", self.labels.answer);
        let label_w = self.renderer.render(page, &label, x, top, &self.style).width + 2.0;

        let available = (width - label_w).max(10.0);
        let pitch = available / blanks as f32;
        let segment = (pitch - 4.0).clamp(6.0, 70.0);
        let rule_y = top + self.line_height() - 0.8;
        for k in 0..blanks {
            let sx = x + label_w + k as f32 * pitch;
            page.hline(sx, sx + segment, rule_y, 0.4, Color::BLACK);
        }
        (FILL_BLANK_HEIGHT, AnswerLayout::FillBlank { blanks })
    }

    fn draw_match(
        &self,
        page: &mut Page,
        left: &[Bilingual],
        right: &[Bilingual],
        x: f32,
        y: f32,
        width: f32,
    ) -> (f32, AnswerLayout) {
        let (header_h, row_h) = match_row_heights(self.line_height());
        let col_w = (width - MATCH_COLUMN_GAP) / 2.0;
        let right_x = x + col_w + MATCH_COLUMN_GAP;
        let pad = (row_h - self.line_height()) / 2.0;
        let bold = self.style.bold().align(Align::Center);
        let cell_style = self.match_cell_style(width);

        for (cx, title) in [(x, self.labels.column_a), (right_x, self.labels.column_b)] {
            page.fill(cx, y, col_w, header_h, Color::STRIP_FILL);
            page.outline(cx, y, col_w, header_h, 0.5);
            self.renderer.render(page, title, cx + col_w / 2.0, y + 0.5, &bold);
        }

        let heights = self.match_rows(left, right, width);
        let rows = heights.len();
        let mut row_y = y + header_h;
        for (i, height) in heights.into_iter().enumerate() {
            page.outline(x, row_y, col_w, height, 0.3);
            page.outline(right_x, row_y, col_w, height, 0.3);
            let [left_text, right_text] = self.match_cells(left, right, i);
            if let Some(text) = left_text {
                self.renderer.render(page, &text, x + 1.5, row_y + pad, &cell_style);
            }
            if let Some(text) = right_text {
                self.renderer.render(page, &text, right_x + 1.5, row_y + pad, &cell_style);
            }
            row_y += height;
        }

        // Answer slots: one per left item, five to a row.
        let slots = left.len();
        let slot_rows = slots.div_ceil(MATCH_SLOTS_PER_ROW);
        let slot_top = row_y + MATCH_COLUMN_GAP / 2.0;
        let slot_w = width / MATCH_SLOTS_PER_ROW as f32;
        for k in 0..slots {
            let sx = x + (k % MATCH_SLOTS_PER_ROW) as f32 * slot_w;
            let sy = slot_top + (k / MATCH_SLOTS_PER_ROW) as f32 * row_h;
            let number = format!("{}.", k + 1);
            let used = self.renderer.render(page, &number, sx, sy + pad, &self.style).width;
            page.hline(sx + used + 1.5, sx + slot_w - 3.0, sy + row_h - pad, 0.4, Color::BLACK);
        }

        let height = slot_top + slot_rows as f32 * row_h - y + AREA_MARGIN;
        (
            height,
            AnswerLayout::Match {
                rows,
                empty_left: rows - left.len(),
                empty_right: rows - right.len(),
                slots,
                slot_rows,
            },
        )
    }

    fn draw_ruled(&self, page: &mut Page, lines: usize, x: f32, y: f32, width: f32) -> (f32, AnswerLayout) {
        for k in 1..=lines {
            page.hline(x, x + width, y + k as f32 * RULE_SPACING, 0.3, Color::RULE);
        }
        (lines as f32 * RULE_SPACING + AREA_MARGIN, AnswerLayout::Ruled { lines })
    }

    fn draw_code_box(&self, page: &mut Page, x: f32, y: f32, width: f32) -> (f32, AnswerLayout) {
        let top = y + 1.0;
        page.outline(x, top, width, CODE_BOX_HEIGHT, 0.6);
        let mut guides = 0;
        let mut gy = top + CODE_GUIDE_SPACING;
        while gy < top + CODE_BOX_HEIGHT - 0.5 {
            page.hline(x + 1.0, x + width - 1.0, gy, 0.2, Color::GUIDE);
            guides += 1;
            gy += CODE_GUIDE_SPACING;
        }
        (CODE_BOX_HEIGHT + 1.0 + AREA_MARGIN, AnswerLayout::CodeBox { guides })
    }
}

/// Header and body row heights of a match table.
fn match_row_heights(line_height: f32) -> (f32, f32) {
    (line_height + 1.0, line_height + 1.5)
}

/// `A, B, C…` (or lowercase) for zero-based `index`, continuing `Z, AA, AB…`.
pub(crate) fn letter(index: usize, upper: bool) -> String {
    let base = if upper { b'A' } else { b'a' };
    let mut label = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        n -= 1;
        label.push(base + (n % 26) as u8);
        n /= 26;
    }
    label.iter().rev().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use papersmith_core::{Language, LayoutConfig};

    use crate::layout::page::Element;
    use crate::text::metrics::text_width_mm;
    use crate::text::NoRasterizer;

    fn items(n: usize) -> Vec<Bilingual> {
        (1..=n).map(|i| Bilingual::primary_only(format!("item {i}"))).collect()
    }

    fn checkboxes(page: &Page) -> usize {
        page.elements
            .iter()
            .filter(|e| matches!(e, Element::Rect { width, height, .. } if *width == BOX_SIZE && *height == BOX_SIZE))
            .count()
    }

    /// Every variant consumes exactly the height estimated for it.
    #[test]
    fn estimate_matches_consumed_height() {
        let config = LayoutConfig::default();
        let renderer = TextRenderer::new(Language::Primary, &NoRasterizer, &config);
        let generator = AnswerAreaGenerator::new(&renderer, Labels::for_language(Language::Primary), 10.0);
        let specs = [
            AnswerSpec::Mcq { options: items(4) },
            AnswerSpec::MultiSelect { options: items(2) },
            AnswerSpec::TrueFalse,
            AnswerSpec::FillBlank { blanks: 3 },
            AnswerSpec::Match { left: items(7), right: items(2) },
            AnswerSpec::ShortAnswer,
            AnswerSpec::LongAnswer,
            AnswerSpec::Programming,
        ];
        for spec in &specs {
            let mut page = Page::default();
            let area = generator.draw(&mut page, spec, 20.0, 50.0, 160.0);
            let estimate = generator.estimate_height(spec, 160.0);
            assert!((area.height - estimate).abs() < 1e-3, "{spec:?}: {} vs {estimate}", area.height);
            assert_eq!(area.kind, spec.question_type());
        }
    }

    #[test]
    fn mcq_letters_each_option() {
        let config = LayoutConfig::default();
        let renderer = TextRenderer::new(Language::Primary, &NoRasterizer, &config);
        let generator = AnswerAreaGenerator::new(&renderer, Labels::for_language(Language::Primary), 10.0);
        let mut page = Page::default();
        let area = generator.draw(&mut page, &AnswerSpec::Mcq { options: items(3) }, 0.0, 0.0, 150.0);
        assert_eq!(area.layout, AnswerLayout::Options { count: 3, checkboxes: false });
        let texts: Vec<&str> = page.texts().collect();
        assert_eq!(texts, vec!["(A)", "item 1", "(B)", "item 2", "(C)", "item 3"]);
        let line = renderer.line_height(&TextStyle::new(10.0));
        assert!((area.height - (3.0 * line + AREA_MARGIN)).abs() < 1e-4);
    }

    #[test]
    fn true_false_draws_two_pairs() {
        let config = LayoutConfig::default();
        let renderer = TextRenderer::new(Language::Primary, &NoRasterizer, &config);
        let generator = AnswerAreaGenerator::new(&renderer, Labels::for_language(Language::Primary), 10.0);
        let mut page = Page::default();
        let area = generator.draw(&mut page, &AnswerSpec::TrueFalse, 0.0, 0.0, 150.0);
        assert_eq!(area.layout, AnswerLayout::TrueFalse { pairs: 2 });
        assert_eq!(checkboxes(&page), 2);
        assert_eq!(page.texts().collect::<Vec<_>>(), vec!["True", "False"]);
    }

    /// Five left items and three right items: five rows, two empty right cells,
    /// and all five answer slots on a single row.
    #[test]
    fn match_pads_short_column_and_rows_slots() {
        let config = LayoutConfig::default();
        let renderer = TextRenderer::new(Language::Primary, &NoRasterizer, &config);
        let generator = AnswerAreaGenerator::new(&renderer, Labels::for_language(Language::Primary), 10.0);
        let mut page = Page::default();
        let spec = AnswerSpec::Match { left: items(5), right: items(3) };
        let area = generator.draw(&mut page, &spec, 0.0, 0.0, 160.0);
        assert_eq!(
            area.layout,
            AnswerLayout::Match { rows: 5, empty_left: 0, empty_right: 2, slots: 5, slot_rows: 1 }
        );
        let texts: Vec<&str> = page.texts().collect();
        assert!(texts.contains(&"c) item 3"));
        assert!(!texts.iter().any(|t| t.starts_with("d)")));
        for n in 1..=5 {
            assert!(texts.contains(&format!("{n}.").as_str()));
        }
    }

    #[test]
    fn match_slots_wrap_after_five() {
        let config = LayoutConfig::default();
        let renderer = TextRenderer::new(Language::Primary, &NoRasterizer, &config);
        let generator = AnswerAreaGenerator::new(&renderer, Labels::for_language(Language::Primary), 10.0);
        let mut page = Page::default();
        let spec = AnswerSpec::Match { left: items(6), right: items(6) };
        let area = generator.draw(&mut page, &spec, 0.0, 0.0, 160.0);
        assert!(matches!(area.layout, AnswerLayout::Match { slots: 6, slot_rows: 2, .. }));
    }

    /// An empty schema still draws the frame of its type.
    #[test]
    fn skeletons_draw_without_content() {
        let config = LayoutConfig::default();
        let renderer = TextRenderer::new(Language::Primary, &NoRasterizer, &config);
        let generator = AnswerAreaGenerator::new(&renderer, Labels::for_language(Language::Primary), 10.0);

        let mut page = Page::default();
        let area = generator.draw(&mut page, &AnswerSpec::skeleton(QuestionType::Match), 0.0, 0.0, 160.0);
        assert!(matches!(area.layout, AnswerLayout::Match { rows: 0, slots: 0, .. }));
        assert_eq!(page.texts().collect::<Vec<_>>(), vec!["Column A", "Column B"]);

        let mut page = Page::default();
        let area = generator.draw(&mut page, &AnswerSpec::skeleton(QuestionType::Mcq), 0.0, 0.0, 160.0);
        assert_eq!(area.layout, AnswerLayout::Options { count: 0, checkboxes: false });
        assert!(page.elements.is_empty());
    }

    #[test]
    fn ruled_and_code_layouts() {
        let config = LayoutConfig::default();
        let renderer = TextRenderer::new(Language::Primary, &NoRasterizer, &config);
        let generator = AnswerAreaGenerator::new(&renderer, Labels::for_language(Language::Primary), 10.0);
        let mut page = Page::default();
        assert_eq!(
            generator.draw(&mut page, &AnswerSpec::ShortAnswer, 0.0, 0.0, 100.0).layout,
            AnswerLayout::Ruled { lines: 3 }
        );
        assert_eq!(
            generator.draw(&mut page, &AnswerSpec::LongAnswer, 0.0, 0.0, 100.0).layout,
            AnswerLayout::Ruled { lines: 6 }
        );
        assert_eq!(
            generator.draw(&mut page, &AnswerSpec::Programming, 0.0, 0.0, 100.0).layout,
            AnswerLayout::CodeBox { guides: 7 }
        );
    }

    #[test]
    fn multi_select_has_checkboxes() {
        let config = LayoutConfig::default();
        let renderer = TextRenderer::new(Language::Primary, &NoRasterizer, &config);
        let generator = AnswerAreaGenerator::new(&renderer, Labels::for_language(Language::Primary), 10.0);
        let mut page = Page::default();
        generator.draw(&mut page, &AnswerSpec::MultiSelect { options: items(4) }, 0.0, 0.0, 150.0);
        assert_eq!(checkboxes(&page), 4);
    }

    #[test]
    fn letters_continue_past_z() {
        assert_eq!(letter(0, true), "A");
        assert_eq!(letter(2, false), "c");
        assert_eq!(letter(25, true), "Z");
        assert_eq!(letter(26, true), "AA");
        assert_eq!(letter(27, false), "ab");
        assert_eq!(letter(701, true), "ZZ");
        assert_eq!(letter(702, true), "AAA");
    }

    /// A 27-option question labels its last option `(AA)`, not a second `(A)`.
    #[test]
    fn twenty_seventh_option_is_double_lettered() {
        let config = LayoutConfig::default();
        let renderer = TextRenderer::new(Language::Primary, &NoRasterizer, &config);
        let generator = AnswerAreaGenerator::new(&renderer, Labels::for_language(Language::Primary), 10.0);
        let mut page = Page::default();
        generator.draw(&mut page, &AnswerSpec::Mcq { options: items(27) }, 0.0, 0.0, 150.0);
        let labels: Vec<&str> = page.texts().filter(|t| t.starts_with('(')).collect();
        assert_eq!(labels.iter().filter(|l| **l == "(A)").count(), 1);
        assert_eq!(labels.last(), Some(&"(AA)"));
    }

    /// A long Column A item wraps inside its cell and the row grows to fit it.
    #[test]
    fn long_match_item_wraps_inside_its_cell() {
        let config = LayoutConfig::default();
        let renderer = TextRenderer::new(Language::Primary, &NoRasterizer, &config);
        let generator = AnswerAreaGenerator::new(&renderer, Labels::for_language(Language::Primary), 10.0);
        let long = "The process by which plants convert sunlight, water and carbon dioxide into glucose";
        assert!(long.len() >= 80);
        let spec = AnswerSpec::Match {
            left: vec![Bilingual::primary_only(long), Bilingual::primary_only("Osmosis")],
            right: items(2),
        };

        let (x, width) = (25.0, 170.0);
        let mut page = Page::default();
        let area = generator.draw(&mut page, &spec, x, 40.0, width);
        assert!((area.height - generator.estimate_height(&spec, width)).abs() < 1e-3);

        let col_right = x + (width - MATCH_COLUMN_GAP) / 2.0;
        let left_cells: Vec<(f32, f32)> = page
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Text { text, x: tx, font_size, weight, .. } if *tx < col_right => {
                    Some((*tx, tx + text_width_mm(text, *font_size, *weight)))
                }
                _ => None,
            })
            .filter(|(tx, _)| (*tx - (x + 1.5)).abs() < 1e-3)
            .collect();
        assert!(left_cells.len() >= 3, "expected the long item to wrap: {left_cells:?}");
        for (_, end) in &left_cells {
            assert!(*end <= col_right, "text runs to {end}, border at {col_right}");
        }

        let short = AnswerSpec::Match { left: items(2), right: items(2) };
        assert!(area.height > generator.estimate_height(&short, width));
    }
}
