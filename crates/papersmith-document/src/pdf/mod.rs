// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — serializing laid-out pages with `printpdf`.

pub mod writer;

pub use writer::PdfWriter;
