// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Offscreen text rasterization — shapes a line of text with `rustybuzz` and
// draws the shaped glyphs into an RGBA bitmap with `ab_glyph` outlines, for
// scripts the built-in PDF fonts cannot display.
//
// Devanagari needs OpenType shaping: pre-base matras are reordered, conjuncts
// ligate and reph forms. Drawing `char`s one after another gets all of that wrong.

use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};
use rustybuzz::UnicodeBuffer;
use papersmith_core::error::{PapersmithError, Result};
use tracing::{debug, info, instrument};

use super::{Color, FontWeight};

/// Families tried, in order, when looking for a Devanagari font on the system.
const DEVANAGARI_FAMILIES: [&str; 6] = [
    "Noto Sans Devanagari",
    "Noto Serif Devanagari",
    "Lohit Devanagari",
    "Mangal",
    "Kohinoor Devanagari",
    "Nirmala UI",
];

/// A rasterized line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    /// Distance in pixels from the top edge to the baseline.
    pub baseline: u32,
    /// Straight (non-premultiplied) RGBA8 pixels, row-major.
    pub rgba: Vec<u8>,
}

/// Offscreen text rasterization capability.
///
/// Implementations return `None` when they cannot draw the given text; the
/// caller then falls back to vector text.
pub trait TextRasterizer: Send + Sync {
    /// Whether this backend can rasterize at all.
    fn is_available(&self) -> bool;

    /// Rasterize one line of `text` with an em size of `px_size` pixels.
    fn rasterize(&self, text: &str, px_size: f32, weight: FontWeight, color: Color) -> Option<Bitmap>;
}

/// Backend for runtimes without any offscreen drawing capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRasterizer;

impl TextRasterizer for NoRasterizer {
    fn is_available(&self) -> bool {
        false
    }

    fn rasterize(&self, _text: &str, _px_size: f32, _weight: FontWeight, _color: Color) -> Option<Bitmap> {
        None
    }
}

/// One glyph after shaping, in pixels, relative to the pen start on the baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedGlyph {
    pub id: u16,
    pub x: f32,
    /// Downward offset from the baseline.
    pub y: f32,
    pub advance: f32,
}

/// Rasterizer backed by an outline font.
pub struct GlyphRasterizer {
    /// Raw font file, kept for building the shaping face.
    data: Vec<u8>,
    index: u32,
    font: FontVec,
}

impl GlyphRasterizer {
    // -- Construction ---------------------------------------------------------

    /// Load a TrueType/OpenType font from raw bytes.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_font_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_face_data(data, 0)
    }

    /// Load a font from a file path.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_font_bytes(data)
    }

    fn from_face_data(data: Vec<u8>, index: u32) -> Result<Self> {
        if rustybuzz::Face::from_slice(&data, index).is_none() {
            return Err(PapersmithError::Font(format!("no shapeable face at index {index}")));
        }
        let font = FontVec::try_from_vec_and_index(data.clone(), index)
            .map_err(|err| PapersmithError::Font(format!("invalid font data: {}", err)))?;
        debug!(glyphs = font.glyph_count(), index, "Raster font loaded");
        Ok(Self { data, index, font })
    }

    /// Look for an installed Devanagari font. Returns `None` if there is none,
    /// which leaves rasterization unavailable.
    #[instrument]
    pub fn from_system_fonts() -> Option<Self> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        for family in DEVANAGARI_FAMILIES {
            let query = fontdb::Query {
                families: &[fontdb::Family::Name(family)],
                ..Default::default()
            };
            let Some(id) = db.query(&query) else {
                continue;
            };
            let rasterizer = db
                .with_face_data(id, |data, index| Self::from_face_data(data.to_vec(), index).ok())
                .flatten();
            if let Some(rasterizer) = rasterizer {
                info!(family, "Using system font for Devanagari rasterization");
                return Some(rasterizer);
            }
        }

        info!("No Devanagari system font found, rasterization unavailable");
        None
    }

    // -- Shaping --------------------------------------------------------------

    /// Shape one line of `text` at an em size of `px_size` pixels.
    pub fn shape(&self, text: &str, px_size: f32) -> Vec<ShapedGlyph> {
        let Some(face) = rustybuzz::Face::from_slice(&self.data, self.index) else {
            return Vec::new();
        };
        let per_unit = px_size / face.units_per_em() as f32;

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.guess_segment_properties();
        let shaped = rustybuzz::shape(&face, &[], buffer);

        let mut pen = 0.0;
        shaped
            .glyph_infos()
            .iter()
            .zip(shaped.glyph_positions())
            .map(|(info, pos)| {
                let glyph = ShapedGlyph {
                    id: info.glyph_id as u16,
                    x: pen + pos.x_offset as f32 * per_unit,
                    y: -(pos.y_offset as f32) * per_unit,
                    advance: pos.x_advance as f32 * per_unit,
                };
                pen += glyph.advance;
                glyph
            })
            .collect()
    }
}

impl TextRasterizer for GlyphRasterizer {
    fn is_available(&self) -> bool {
        true
    }

    fn rasterize(&self, text: &str, px_size: f32, weight: FontWeight, color: Color) -> Option<Bitmap> {
        if text.trim().is_empty() || px_size <= 0.0 {
            return None;
        }

        let glyphs = self.shape(text, px_size);
        let advance: f32 = glyphs.iter().map(|g| g.advance).sum();
        if glyphs.is_empty() || advance <= 0.0 {
            return None;
        }

        // ab_glyph scales by ascent-to-descent height, not by the em.
        let scale = PxScale::from(px_size * self.font.height_unscaled() / self.font.units_per_em()?);
        let scaled = self.font.as_scaled(scale);
        let ascent = scaled.ascent().ceil().max(1.0) as u32;
        let descent = (-scaled.descent()).ceil().max(0.0) as u32;

        // Bold is emulated by overdrawing a few pixels to the right.
        let overdraw = match weight {
            FontWeight::Regular => 0,
            FontWeight::Bold => (px_size / 24.0).ceil() as u32,
        };
        // Room for marks that overhang the first or last advance.
        let pad = (px_size / 10.0).ceil() as u32;
        let width = advance.ceil() as u32 + overdraw + 2 * pad;
        let height = ascent + descent;

        let mut canvas = RgbaImage::from_pixel(width, height, Rgba([color.r, color.g, color.b, 0]));
        for dx in 0..=overdraw {
            let origin = (pad + dx) as f32;
            for g in &glyphs {
                let glyph = GlyphId(g.id).with_scale_and_position(scale, point(origin + g.x, ascent as f32 + g.y));
                let Some(outline) = self.font.outline_glyph(glyph) else {
                    continue;
                };
                let bounds = outline.px_bounds();
                outline.draw(|x, y, coverage| {
                    let px = bounds.min.x as i32 + x as i32;
                    let py = bounds.min.y as i32 + y as i32;
                    if px < 0 || py < 0 || px as u32 >= width || py as u32 >= height {
                        return;
                    }
                    let pixel = canvas.get_pixel_mut(px as u32, py as u32);
                    let alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                    pixel.0[3] = pixel.0[3].max(alpha);
                });
            }
        }

        Some(Bitmap {
            width,
            height,
            baseline: ascent,
            rgba: canvas.into_raw(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_rasterizer_is_unavailable() {
        let r = NoRasterizer;
        assert!(!r.is_available());
        assert!(r.rasterize("नमस्ते", 40.0, FontWeight::Regular, Color::BLACK).is_none());
    }

    #[test]
    fn garbage_font_bytes_are_rejected() {
        let err = GlyphRasterizer::from_font_bytes(vec![0u8; 16]).err().expect("should fail");
        assert!(matches!(err, PapersmithError::Font(_)));
    }

    #[test]
    fn missing_font_file_is_io_error() {
        let err = GlyphRasterizer::open("/nonexistent/devanagari.ttf").err().expect("should fail");
        assert!(matches!(err, PapersmithError::Io(_)));
    }

    /// When the host has a Devanagari font, a rasterized line has ink and the
    /// expected buffer size.
    #[test]
    fn system_font_rasterizes_when_present() {
        let Some(r) = GlyphRasterizer::from_system_fonts() else {
            return;
        };
        let bitmap = r
            .rasterize("नमस्ते", 40.0, FontWeight::Bold, Color::BLACK)
            .expect("text should rasterize");
        assert_eq!(bitmap.rgba.len(), (bitmap.width * bitmap.height * 4) as usize);
        assert!(bitmap.baseline <= bitmap.height);
        assert!(bitmap.rgba.chunks(4).any(|px| px[3] > 0));
    }

    /// The pre-base vowel sign of "कि" is shaped in front of its consonant.
    #[test]
    fn pre_base_matra_is_reordered() {
        let Some(r) = GlyphRasterizer::from_system_fonts() else {
            return;
        };
        let ka = r.font.glyph_id('क').0;
        let glyphs = r.shape("कि", 40.0);
        assert!(glyphs.len() >= 2);
        assert_ne!(glyphs[0].id, ka, "matra should come first");
        assert!(glyphs.iter().any(|g| g.id == ka));
    }

    #[test]
    fn shaped_width_sets_bitmap_width() {
        let Some(r) = GlyphRasterizer::from_system_fonts() else {
            return;
        };
        let advance: f32 = r.shape("विद्यार्थी", 40.0).iter().map(|g| g.advance).sum();
        let bitmap = r
            .rasterize("विद्यार्थी", 40.0, FontWeight::Regular, Color::BLACK)
            .expect("text should rasterize");
        assert_eq!(bitmap.width, advance.ceil() as u32 + 2 * 4);
    }
}
