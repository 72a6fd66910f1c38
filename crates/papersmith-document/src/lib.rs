// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// papersmith-document — Exam-paper layout engine for Papersmith.
//
// Turns a document config and its sections into paginated pages (header block,
// instructions, section bars, numbered questions with per-type answer areas,
// footers) and serializes them to PDF. Devanagari text in secondary-language
// papers is rasterized through a pluggable backend; everything else is vector
// Helvetica.

pub mod layout;
pub mod paper;
pub mod pdf;
pub mod text;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export the primary structs so callers can use `papersmith_document::ExamPaperGenerator` etc.
pub use layout::{AnswerArea, AnswerLayout, Page, PlacedQuestion};
pub use paper::{ExamPaper, ExamPaperGenerator};
pub use pdf::PdfWriter;
pub use text::{GlyphRasterizer, NoRasterizer, RenderPath, TextRasterizer};
