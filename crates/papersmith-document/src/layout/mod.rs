// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout module — pages and the cursor, answer areas, questions and sections.

pub mod answer;
pub mod page;
pub mod question;
pub mod section;

pub use answer::{AnswerArea, AnswerAreaGenerator, AnswerLayout};
pub use page::{Element, LayoutCursor, Page, PageManager, Stroke};
pub use question::{PlacedQuestion, QuestionRenderer};
pub use section::SectionRenderer;
