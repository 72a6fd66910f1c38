// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text renderer — the only place that decides how a string reaches the page.
//
// Secondary-language text containing Devanagari goes through the rasterizer
// and is embedded as an image; everything else is written as built-in
// Helvetica. A rasterizer that is unavailable, or that declines a line, causes
// a silent fallback to vector text.

use papersmith_core::config::PT_TO_MM;
use papersmith_core::{Language, LayoutConfig};
use serde::Serialize;
use tracing::debug;

use super::metrics::{chars_per_line, raster_width_mm, text_width_mm, wrap_by_chars, wrap_to_width};
use super::raster::TextRasterizer;
use super::script::contains_devanagari;
use super::{Align, TextExtent, TextStyle};
use crate::layout::page::{Element, Page};

/// Cap height of Helvetica as a fraction of the em, used to centre a line
/// vertically in its line box.
const CAP_HEIGHT_EM: f32 = 0.72;

const MM_PER_INCH: f32 = 25.4;

/// How a piece of text is put on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderPath {
    /// Native PDF text operators with a built-in font.
    Vector,
    /// Offscreen bitmap embedded as an image.
    Raster,
}

/// Routes strings to the vector or raster path for one paper.
pub struct TextRenderer<'a> {
    language: Language,
    rasterizer: &'a dyn TextRasterizer,
    config: &'a LayoutConfig,
}

impl<'a> TextRenderer<'a> {
    pub fn new(language: Language, rasterizer: &'a dyn TextRasterizer, config: &'a LayoutConfig) -> Self {
        Self {
            language,
            rasterizer,
            config,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// The path `text` will take.
    pub fn path_for(&self, text: &str) -> RenderPath {
        if self.language == Language::Secondary
            && contains_devanagari(text)
            && self.rasterizer.is_available()
        {
            RenderPath::Raster
        } else {
            RenderPath::Vector
        }
    }

    /// Height of one line of text in millimetres.
    pub fn line_height(&self, style: &TextStyle) -> f32 {
        self.config.line_height_mm(style.font_size)
    }

    /// Break `text` into the lines that [`render`](Self::render) will draw.
    ///
    /// Vector text wraps on measured Helvetica widths. Raster text wraps on a
    /// fixed characters-per-line estimate.
    pub fn lines(&self, text: &str, style: &TextStyle) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        match (self.path_for(text), style.max_width) {
            (_, None) => text.lines().map(str::to_string).collect(),
            (RenderPath::Vector, Some(width)) => {
                wrap_to_width(text, width, style.font_size, style.weight)
            }
            (RenderPath::Raster, Some(width)) => {
                wrap_by_chars(text, chars_per_line(width, style.font_size))
            }
        }
    }

    /// Height `text` will occupy, without drawing it.
    pub fn measure_height(&self, text: &str, style: &TextStyle) -> f32 {
        self.lines(text, style).len() as f32 * self.line_height(style)
    }

    /// Widest line of `text` without drawing it. Raster lines use the same
    /// per-character estimate as wrapping.
    pub fn measure_width(&self, text: &str, style: &TextStyle) -> f32 {
        let path = self.path_for(text);
        self.lines(text, style)
            .iter()
            .map(|line| match path {
                RenderPath::Vector => text_width_mm(line, style.font_size, style.weight),
                RenderPath::Raster => raster_width_mm(line, style.font_size),
            })
            .fold(0.0, f32::max)
    }

    /// Draw `text` with its first line box starting at `y` (top edge) and
    /// anchored horizontally at `x` according to `style.align`.
    pub fn render(&self, page: &mut Page, text: &str, x: f32, y: f32, style: &TextStyle) -> TextExtent {
        let path = self.path_for(text);
        let line_height = self.line_height(style);
        let font_mm = style.font_size * PT_TO_MM;
        let lines = self.lines(text, style);

        let mut width: f32 = 0.0;
        for (i, line) in lines.iter().enumerate() {
            let baseline = y + i as f32 * line_height + (line_height + font_mm * CAP_HEIGHT_EM) / 2.0;
            let drawn = match path {
                RenderPath::Raster => self.draw_raster_line(page, line, x, baseline, style),
                RenderPath::Vector => None,
            };
            let line_width =
                drawn.unwrap_or_else(|| self.draw_vector_line(page, line, x, baseline, style));
            width = width.max(line_width);
        }

        TextExtent {
            width,
            height: lines.len() as f32 * line_height,
        }
    }

    fn draw_vector_line(&self, page: &mut Page, line: &str, x: f32, baseline: f32, style: &TextStyle) -> f32 {
        let width = text_width_mm(line, style.font_size, style.weight);
        if !line.is_empty() {
            page.push(Element::Text {
                text: line.to_string(),
                x: aligned_x(x, width, style.align),
                baseline,
                font_size: style.font_size,
                weight: style.weight,
                color: style.color,
            });
        }
        width
    }

    fn draw_raster_line(&self, page: &mut Page, line: &str, x: f32, baseline: f32, style: &TextStyle) -> Option<f32> {
        let dpi = self.config.raster_dpi * self.config.raster_scale;
        let px_size = style.font_size / 72.0 * dpi;
        let Some(bitmap) = self.rasterizer.rasterize(line, px_size, style.weight, style.color) else {
            debug!(line, "Rasterizer declined line, falling back to vector text");
            return None;
        };

        let px_to_mm = MM_PER_INCH / dpi;
        let width = bitmap.width as f32 * px_to_mm;
        let height = bitmap.height as f32 * px_to_mm;
        let top = baseline - bitmap.baseline as f32 * px_to_mm;
        page.push(Element::Image {
            x: aligned_x(x, width, style.align),
            top,
            width,
            height,
            dpi,
            bitmap,
        });
        Some(width)
    }
}

fn aligned_x(x: f32, width: f32, align: Align) -> f32 {
    match align {
        Align::Left => x,
        Align::Center => x - width / 2.0,
        Align::Right => x - width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::BlockRasterizer;
    use crate::text::NoRasterizer;

    fn count(page: &Page) -> (usize, usize) {
        let texts = page.elements.iter().filter(|e| matches!(e, Element::Text { .. })).count();
        let images = page.elements.iter().filter(|e| matches!(e, Element::Image { .. })).count();
        (texts, images)
    }

    #[test]
    fn latin_text_stays_vector_in_secondary_language() {
        let config = LayoutConfig::default();
        let r = BlockRasterizer;
        let renderer = TextRenderer::new(Language::Secondary, &r, &config);
        let mut page = Page::default();
        renderer.render(&mut page, "Define recursion.", 10.0, 10.0, &TextStyle::new(10.0));
        assert_eq!(renderer.path_for("Define recursion."), RenderPath::Vector);
        assert_eq!(count(&page), (1, 0));
    }

    #[test]
    fn devanagari_is_rasterized_in_secondary_language() {
        let config = LayoutConfig::default();
        let r = BlockRasterizer;
        let renderer = TextRenderer::new(Language::Secondary, &r, &config);
        let mut page = Page::default();
        let extent = renderer.render(&mut page, "पुनरावृत्ती म्हणजे काय?", 10.0, 10.0, &TextStyle::new(10.0));
        assert_eq!(count(&page), (0, 1));
        assert!(extent.width > 0.0);
    }

    #[test]
    fn devanagari_is_vector_in_primary_language() {
        let config = LayoutConfig::default();
        let r = BlockRasterizer;
        let renderer = TextRenderer::new(Language::Primary, &r, &config);
        let mut page = Page::default();
        renderer.render(&mut page, "पुनरावृत्ती", 10.0, 10.0, &TextStyle::new(10.0));
        assert_eq!(count(&page), (1, 0));
    }

    #[test]
    fn unavailable_rasterizer_falls_back_to_vector() {
        let config = LayoutConfig::default();
        let renderer = TextRenderer::new(Language::Secondary, &NoRasterizer, &config);
        let mut page = Page::default();
        let extent = renderer.render(&mut page, "नमस्ते", 10.0, 10.0, &TextStyle::new(10.0));
        assert_eq!(count(&page), (1, 0));
        assert!(extent.height > 0.0);
    }

    /// Bitmap pixels map to 1/96 inch divided by the supersampling factor.
    #[test]
    fn raster_image_size_follows_dpi_and_scale() {
        let config = LayoutConfig::default();
        let r = BlockRasterizer;
        let renderer = TextRenderer::new(Language::Secondary, &r, &config);
        let mut page = Page::default();
        renderer.render(&mut page, "नमस्ते", 50.0, 10.0, &TextStyle::new(12.0).align(Align::Right));
        let Element::Image { bitmap, width, x, .. } = &page.elements[0] else {
            panic!("expected an image");
        };
        let expected = bitmap.width as f32 / 3.0 * 25.4 / 96.0;
        assert!((width - expected).abs() < 1e-3);
        assert!((x - (50.0 - expected)).abs() < 1e-3, "right aligned");
    }

    #[test]
    fn wrapped_text_height_matches_line_count() {
        let config = LayoutConfig::default();
        let renderer = TextRenderer::new(Language::Primary, &NoRasterizer, &config);
        let style = TextStyle::new(10.0).max_width(30.0);
        let text = "a long sentence that certainly needs more than one line to fit";
        let lines = renderer.lines(text, &style).len();
        assert!(lines > 1);
        let mut page = Page::default();
        let extent = renderer.render(&mut page, text, 0.0, 0.0, &style);
        assert!((extent.height - lines as f32 * renderer.line_height(&style)).abs() < 1e-4);
        assert!((renderer.measure_height(text, &style) - extent.height).abs() < 1e-4);
    }

    #[test]
    fn blank_text_draws_nothing() {
        let config = LayoutConfig::default();
        let renderer = TextRenderer::new(Language::Primary, &NoRasterizer, &config);
        let mut page = Page::default();
        let extent = renderer.render(&mut page, "   ", 0.0, 0.0, &TextStyle::new(10.0));
        assert_eq!(extent, TextExtent::default());
        assert!(page.elements.is_empty());
    }

    #[test]
    fn measured_width_matches_drawn_vector_width() {
        let config = LayoutConfig::default();
        let renderer = TextRenderer::new(Language::Primary, &NoRasterizer, &config);
        let style = TextStyle::new(10.0).bold().max_width(40.0);
        let text = "wrapped header text that spans several lines";
        let mut page = Page::default();
        let extent = renderer.render(&mut page, text, 0.0, 0.0, &style);
        assert!((renderer.measure_width(text, &style) - extent.width).abs() < 1e-4);
        assert!(extent.width <= 40.0);
    }
}
