// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Papersmith.
//
// Layout itself never fails; these errors only come from the edges around it
// (decoding input records, loading raster fonts, writing output files).

use thiserror::Error;

/// Top-level error type for all Papersmith operations.
#[derive(Debug, Error)]
pub enum PapersmithError {
    // -- Input --
    #[error("invalid exam input: {0}")]
    InvalidInput(String),

    // -- Rendering backends --
    #[error("font could not be loaded: {0}")]
    Font(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PapersmithError>;
