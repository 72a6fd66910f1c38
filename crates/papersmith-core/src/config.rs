// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout configuration.

use serde::{Deserialize, Serialize};

/// Geometry and typography settings for a generated paper.
///
/// All lengths are in millimetres; font sizes are in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Paper size for every page.
    pub paper_size: crate::PaperSize,
    /// Left, right and top margin.
    pub margin_mm: f32,
    /// Bottom margin. The footer is drawn inside this zone.
    pub bottom_margin_mm: f32,
    /// Body text size for question text and answer areas.
    pub base_font_size: f32,
    /// Line height as a multiple of the font size.
    pub line_height_factor: f32,
    /// A section starts on a new page when less than this much room is left.
    pub section_min_space_mm: f32,
    /// Supersampling factor used when rasterizing secondary-script text.
    pub raster_scale: f32,
    /// Logical pixel density of rasterized text before supersampling.
    pub raster_dpi: f32,
}

impl LayoutConfig {
    /// Page dimensions `(width, height)` in millimetres.
    pub fn page_size_mm(&self) -> (f32, f32) {
        let (w, h) = self.paper_size.dimensions_mm();
        (w as f32, h as f32)
    }

    /// Horizontal space between the side margins.
    pub fn content_width_mm(&self) -> f32 {
        self.page_size_mm().0 - 2.0 * self.margin_mm
    }

    /// Line height in millimetres for the given font size.
    pub fn line_height_mm(&self, font_size_pt: f32) -> f32 {
        font_size_pt * PT_TO_MM * self.line_height_factor
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            paper_size: crate::PaperSize::A4,
            margin_mm: 15.0,
            bottom_margin_mm: 20.0,
            base_font_size: 10.0,
            line_height_factor: 1.4,
            section_min_space_mm: 45.0,
            raster_scale: 3.0,
            raster_dpi: 96.0,
        }
    }
}

/// One typographic point in millimetres.
pub const PT_TO_MM: f32 = 0.352_778;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_content_width() {
        let config = LayoutConfig::default();
        assert_eq!(config.page_size_mm(), (210.0, 297.0));
        assert!((config.content_width_mm() - 180.0).abs() < f32::EPSILON);
    }

    /// Missing fields fall back to the defaults so callers can override one knob.
    #[test]
    fn partial_json_uses_defaults() {
        let config: LayoutConfig = serde_json::from_str(r#"{ "margin_mm": 20.0 }"#).unwrap();
        assert_eq!(config.margin_mm, 20.0);
        assert_eq!(config.raster_scale, 3.0);
        assert_eq!(config.paper_size, crate::PaperSize::A4);
    }
}
