// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pages, positioned elements, the layout cursor and the page manager.
//
// Coordinates are millimetres measured from the top-left corner of the page.
// Conversion to PDF user space happens only in the serializer.

use papersmith_core::LayoutConfig;
use tracing::debug;

use crate::text::{Align, Bitmap, Color, FontWeight, TextRenderer, TextStyle};

/// A drawing primitive placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// One line of built-in font text.
    Text {
        text: String,
        x: f32,
        baseline: f32,
        font_size: f32,
        weight: FontWeight,
        color: Color,
    },
    /// A rasterized line of text.
    Image {
        bitmap: Bitmap,
        x: f32,
        top: f32,
        width: f32,
        height: f32,
        /// Effective pixel density the bitmap was rendered at.
        dpi: f32,
    },
    /// A straight rule. `thickness` is in points.
    Line {
        from: (f32, f32),
        to: (f32, f32),
        thickness: f32,
        color: Color,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
}

/// Outline settings for rectangles. `thickness` is in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub thickness: f32,
    pub color: Color,
}

impl Element {
    /// Vertical span `(top, bottom)` covered by the element.
    pub fn vertical_span(&self) -> (f32, f32) {
        match self {
            Self::Text {
                baseline, font_size, ..
            } => {
                let em = font_size * papersmith_core::config::PT_TO_MM;
                (baseline - em * 0.75, baseline + em * 0.25)
            }
            Self::Image { top, height, .. } => (*top, top + height),
            Self::Line { from, to, .. } => (from.1.min(to.1), from.1.max(to.1)),
            Self::Rect { y, height, .. } => (*y, y + height),
        }
    }
}

/// One page of laid-out content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), thickness: f32, color: Color) {
        self.push(Element::Line {
            from,
            to,
            thickness,
            color,
        });
    }

    /// Horizontal rule from `x1` to `x2` at `y`.
    pub fn hline(&mut self, x1: f32, x2: f32, y: f32, thickness: f32, color: Color) {
        self.line((x1, y), (x2, y), thickness, color);
    }

    /// Unfilled rectangle with a black outline.
    pub fn outline(&mut self, x: f32, y: f32, width: f32, height: f32, thickness: f32) {
        self.push(Element::Rect {
            x,
            y,
            width,
            height,
            fill: None,
            stroke: Some(Stroke {
                thickness,
                color: Color::BLACK,
            }),
        });
    }

    /// Filled rectangle without an outline.
    pub fn fill(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.push(Element::Rect {
            x,
            y,
            width,
            height,
            fill: Some(color),
            stroke: None,
        });
    }

    /// All vector text lines on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Number of rasterized text images on the page.
    pub fn image_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, Element::Image { .. }))
            .count()
    }
}

/// The current write position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    /// Zero-based index of the page being written.
    pub page: usize,
    /// Distance from the top edge of the page, in millimetres.
    pub y: f32,
}

/// Owns the page list and the cursor, and decides when to break pages.
pub struct PageManager {
    config: LayoutConfig,
    pages: Vec<Page>,
    cursor: LayoutCursor,
}

impl PageManager {
    /// Start with one empty page and the cursor at the top margin.
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            config: config.clone(),
            pages: vec![Page::default()],
            cursor: LayoutCursor {
                page: 0,
                y: config.margin_mm,
            },
        }
    }

    // -- Geometry -------------------------------------------------------------

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn left(&self) -> f32 {
        self.config.margin_mm
    }

    pub fn right(&self) -> f32 {
        self.config.page_size_mm().0 - self.config.margin_mm
    }

    pub fn content_width(&self) -> f32 {
        self.config.content_width_mm()
    }

    /// Lowest y content may reach before the footer zone.
    pub fn bottom_limit(&self) -> f32 {
        self.config.page_size_mm().1 - self.config.bottom_margin_mm
    }

    // -- Cursor ---------------------------------------------------------------

    pub fn cursor(&self) -> LayoutCursor {
        self.cursor
    }

    /// Space left between the cursor and the footer zone.
    pub fn remaining(&self) -> f32 {
        self.bottom_limit() - self.cursor.y
    }

    /// True if nothing has been written below the top margin of this page.
    pub fn at_page_top(&self) -> bool {
        self.cursor.y <= self.config.margin_mm + f32::EPSILON
    }

    pub fn advance(&mut self, height: f32) {
        self.cursor.y += height;
    }

    /// Start a new page if a block of `height` would cross the bottom margin.
    ///
    /// A block taller than a whole page is placed at the top of the current
    /// page when the page is still empty, rather than producing blank pages.
    /// Returns whether a break happened.
    pub fn ensure_space(&mut self, height: f32) -> bool {
        if self.cursor.y + height > self.bottom_limit() && !self.at_page_top() {
            self.new_page();
            return true;
        }
        false
    }

    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor = LayoutCursor {
            page: self.pages.len() - 1,
            y: self.config.margin_mm,
        };
        debug!(page = self.cursor.page + 1, "Page break");
    }

    // -- Pages ----------------------------------------------------------------

    /// The page the cursor is on.
    pub fn page(&mut self) -> &mut Page {
        let index = self.cursor.page;
        &mut self.pages[index]
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Draw the footer rule, `left_text` and "Page i of N" on every page.
    ///
    /// Runs once after all content is placed, since N is only known then.
    pub fn stamp_footers(&mut self, renderer: &TextRenderer<'_>, left_text: &str) {
        let total = self.pages.len();
        let (left, right) = (self.left(), self.right());
        let rule_y = self.bottom_limit() + 4.0;
        let style = TextStyle::new(8.0).color(Color::gray(70));

        for (i, page) in self.pages.iter_mut().enumerate() {
            page.hline(left, right, rule_y, 0.5, Color::RULE);
            renderer.render(page, left_text, left, rule_y + 1.0, &style);
            // Page numbers always use ASCII digits.
            let number = format!("Page {} of {}", i + 1, total);
            renderer.render(page, &number, right, rule_y + 1.0, &style.align(Align::Right));
        }
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}
