// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — turn laid-out pages into a PDF byte stream using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: each page becomes a `PdfPage` holding a
// `Vec<Op>`, and the document is serialised via `PdfDocument::save()`. Layout
// coordinates are millimetres from the top edge; PDF user space is points from
// the bottom edge, so every y is flipped here.

use std::borrow::Cow;

use printpdf::graphics::{LinePoint, PaintMode, Point, Polygon, PolygonRing, WindingOrder};
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage,
    RawImageData, RawImageFormat, Rgb, TextItem, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use crate::layout::page::{Element, Page, Stroke};
use crate::text::{Bitmap, Color, FontWeight};

/// Serializes [`Page`]s into a PDF document.
pub struct PdfWriter {
    /// Page width and height in millimetres.
    page_size: (f32, f32),
    /// Title metadata embedded in the PDF /Info dictionary.
    title: String,
}

impl PdfWriter {
    pub fn new(page_size: (f32, f32), title: impl Into<String>) -> Self {
        Self {
            page_size,
            title: title.into(),
        }
    }

    fn page_height_pt(&self) -> f32 {
        Mm(self.page_size.1).into_pt().0
    }

    /// Flip a top-origin millimetre y into PDF points.
    fn y(&self, y_mm: f32) -> f32 {
        self.page_height_pt() - pt(y_mm)
    }

    /// Write `pages` as one PDF. An empty slice still yields a single blank page.
    #[instrument(skip(self, pages), fields(pages = pages.len()))]
    pub fn write(&self, pages: &[Page]) -> Vec<u8> {
        let (page_w, page_h) = (Mm(self.page_size.0), Mm(self.page_size.1));
        let mut doc = PdfDocument::new(&self.title);

        let mut pdf_pages: Vec<PdfPage> = Vec::with_capacity(pages.len().max(1));
        for page in pages {
            let mut ops: Vec<Op> = Vec::with_capacity(page.elements.len() * 4);
            for element in &page.elements {
                self.push_element(&mut doc, &mut ops, element);
            }
            pdf_pages.push(PdfPage::new(page_w, page_h, ops));
        }
        if pdf_pages.is_empty() {
            pdf_pages.push(PdfPage::new(page_w, page_h, Vec::new()));
        }

        doc.with_pages(pdf_pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(warnings = warnings.len(), "printpdf reported warnings");
        }

        info!(bytes = output.len(), title = %self.title, "PDF serialized");
        output
    }

    fn push_element(&self, doc: &mut PdfDocument, ops: &mut Vec<Op>, element: &Element) {
        match element {
            Element::Text {
                text,
                x,
                baseline,
                font_size,
                weight,
                color,
            } => {
                let font = builtin_font(*weight);
                ops.push(Op::SetFillColor { col: pdf_color(*color) });
                ops.push(Op::StartTextSection);
                ops.push(Op::SetTextCursor {
                    pos: Point {
                        x: Pt(pt(*x)),
                        y: Pt(self.y(*baseline)),
                    },
                });
                ops.push(Op::SetFontSizeBuiltinFont {
                    size: Pt(*font_size),
                    font,
                });
                ops.push(Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(builtin_text(text).into_owned())],
                    font,
                });
                ops.push(Op::EndTextSection);
            }
            Element::Image {
                bitmap,
                x,
                top,
                width,
                height,
                ..
            } => {
                let Some(raw) = raw_image(bitmap) else {
                    warn!(
                        width = bitmap.width,
                        height = bitmap.height,
                        bytes = bitmap.rgba.len(),
                        "Skipping malformed text bitmap"
                    );
                    return;
                };
                let id = doc.add_image(&raw);
                // At 72 dpi one pixel is one point, so the scale maps pixels to
                // the target size directly.
                ops.push(Op::UseXobject {
                    id,
                    transform: XObjectTransform {
                        translate_x: Some(Pt(pt(*x))),
                        translate_y: Some(Pt(self.y(top + height))),
                        scale_x: Some(pt(*width) / bitmap.width as f32),
                        scale_y: Some(pt(*height) / bitmap.height as f32),
                        dpi: Some(72.0),
                        rotate: None,
                    },
                });
            }
            Element::Line {
                from,
                to,
                thickness,
                color,
            } => {
                ops.push(Op::SetOutlineColor { col: pdf_color(*color) });
                ops.push(Op::SetOutlineThickness { pt: Pt(*thickness) });
                ops.push(Op::DrawPolygon {
                    polygon: self.polygon(&[*from, *to], PaintMode::Stroke),
                });
            }
            Element::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
            } => {
                let corners = [(*x, *y), (x + width, *y), (x + width, y + height), (*x, y + height)];
                if let Some(fill) = fill {
                    ops.push(Op::SetFillColor { col: pdf_color(*fill) });
                    ops.push(Op::DrawPolygon {
                        polygon: self.polygon(&corners, PaintMode::Fill),
                    });
                }
                if let Some(Stroke { thickness, color }) = stroke {
                    ops.push(Op::SetOutlineColor { col: pdf_color(*color) });
                    ops.push(Op::SetOutlineThickness { pt: Pt(*thickness) });
                    ops.push(Op::DrawPolygon {
                        polygon: self.polygon(&corners, PaintMode::Stroke),
                    });
                }
            }
        }
    }

    fn polygon(&self, points: &[(f32, f32)], mode: PaintMode) -> Polygon {
        Polygon {
            rings: vec![PolygonRing {
                points: points
                    .iter()
                    .map(|&(x, y)| LinePoint {
                        p: Point {
                            x: Pt(pt(x)),
                            y: Pt(self.y(y)),
                        },
                        bezier: false,
                    })
                    .collect(),
            }],
            mode,
            winding_order: WindingOrder::EvenOdd,
        }
    }
}

fn pt(mm: f32) -> f32 {
    Mm(mm).into_pt().0
}

fn builtin_font(weight: FontWeight) -> BuiltinFont {
    match weight {
        FontWeight::Regular => BuiltinFont::Helvetica,
        FontWeight::Bold => BuiltinFont::HelveticaBold,
    }
}

fn pdf_color(c: Color) -> printpdf::color::Color {
    printpdf::color::Color::Rgb(Rgb::new(
        c.r as f32 / 255.0,
        c.g as f32 / 255.0,
        c.b as f32 / 255.0,
        None,
    ))
}

/// `None` when the pixel buffer does not match the stated dimensions.
fn raw_image(bitmap: &Bitmap) -> Option<RawImage> {
    let expected = bitmap.width as usize * bitmap.height as usize * 4;
    if bitmap.width == 0 || bitmap.height == 0 || bitmap.rgba.len() != expected {
        return None;
    }
    Some(RawImage {
        pixels: RawImageData::U8(bitmap.rgba.clone()),
        width: bitmap.width as usize,
        height: bitmap.height as usize,
        data_format: RawImageFormat::RGBA8,
        tag: Vec::new(),
    })
}

/// Built-in fonts only cover Latin-1; typographic punctuation is folded to
/// ASCII and anything else becomes `?`.
fn builtin_text(text: &str) -> Cow<'_, str> {
    if text.chars().all(|c| (c as u32) < 0x100) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|c| match c {
                '\u{2013}' | '\u{2014}' => '-',
                '\u{2018}' | '\u{2019}' => '\'',
                '\u{201C}' | '\u{201D}' => '"',
                '\u{2026}' => '.',
                c if (c as u32) < 0x100 => c,
                _ => '?',
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Element {
        Element::Text {
            text: s.to_string(),
            x: 15.0,
            baseline: 20.0,
            font_size: 10.0,
            weight: FontWeight::Regular,
            color: Color::BLACK,
        }
    }

    #[test]
    fn writes_one_pdf_page_per_layout_page() {
        let mut first = Page::default();
        first.push(text("Q1. First"));
        first.outline(15.0, 30.0, 40.0, 10.0, 0.5);
        let mut second = Page::default();
        second.push(text("Q2. Second"));
        second.fill(15.0, 30.0, 180.0, 8.0, Color::HEADER_FILL);
        second.hline(15.0, 195.0, 40.0, 0.4, Color::RULE);

        let bytes = PdfWriter::new((210.0, 297.0), "Unit Test")
            .write(&[first, second]);
        assert!(bytes.starts_with(b"%PDF"));
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn empty_layout_still_has_a_page() {
        let bytes = PdfWriter::new((210.0, 297.0), "Empty").write(&[]);
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn raster_lines_are_embedded() {
        let mut page = Page::default();
        page.push(Element::Image {
            bitmap: Bitmap {
                width: 2,
                height: 2,
                baseline: 2,
                rgba: vec![0; 16],
            },
            x: 10.0,
            top: 10.0,
            width: 5.0,
            height: 5.0,
            dpi: 288.0,
        });
        let bytes = PdfWriter::new((210.0, 297.0), "Image").write(&[page]);
        assert!(bytes.starts_with(b"%PDF"));
    }

    /// A bitmap whose buffer disagrees with its size is dropped, not fatal.
    #[test]
    fn malformed_bitmap_is_skipped() {
        let mut page = Page::default();
        page.push(Element::Image {
            bitmap: Bitmap {
                width: 4,
                height: 4,
                baseline: 3,
                rgba: vec![0; 10],
            },
            x: 0.0,
            top: 0.0,
            width: 1.0,
            height: 1.0,
            dpi: 288.0,
        });
        let bytes = PdfWriter::new((210.0, 297.0), "Bad").write(&[page]);
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        assert!(raw_image(&Bitmap { width: 1, height: 1, baseline: 1, rgba: vec![0; 3] }).is_none());
    }

    #[test]
    fn builtin_text_folds_unsupported_characters() {
        assert_eq!(builtin_text("SECTION A — MCQ"), "SECTION A - MCQ");
        assert_eq!(builtin_text("नमस्ते"), "??????");
        assert!(matches!(builtin_text("Plain"), Cow::Borrowed(_)));
    }
}
