// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Papersmith — Core exam records, layout configuration and error definitions
// shared by the layout engine and its callers.

pub mod config;
pub mod error;
pub mod labels;
pub mod types;

pub use config::LayoutConfig;
pub use error::PapersmithError;
pub use labels::Labels;
pub use types::*;
