// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text module — script detection, Helvetica measurement and wrapping, the
// rasterizer capability for Devanagari, and the routing text renderer.

pub mod metrics;
pub mod raster;
pub mod renderer;
pub mod script;

pub use raster::{Bitmap, GlyphRasterizer, NoRasterizer, TextRasterizer};
pub use renderer::{RenderPath, TextRenderer};

/// Stroke weight of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Horizontal anchoring relative to the `x` passed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::gray(0);
    pub const RULE: Color = Color::gray(120);
    pub const GUIDE: Color = Color::gray(215);
    pub const HEADER_FILL: Color = Color::gray(220);
    pub const STRIP_FILL: Color = Color::gray(242);

    pub const fn gray(level: u8) -> Self {
        Self {
            r: level,
            g: level,
            b: level,
        }
    }
}

/// How a string should be drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in points.
    pub font_size: f32,
    pub weight: FontWeight,
    pub align: Align,
    /// Wrap width in millimetres. `None` draws each paragraph on one line.
    pub max_width: Option<f32>,
    pub color: Color,
}

impl TextStyle {
    pub fn new(font_size: f32) -> Self {
        Self {
            font_size,
            weight: FontWeight::Regular,
            align: Align::Left,
            max_width: None,
            color: Color::BLACK,
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn max_width(mut self, width_mm: f32) -> Self {
        self.max_width = Some(width_mm);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Space taken by a rendered string, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtent {
    pub width: f32,
    pub height: f32,
}
