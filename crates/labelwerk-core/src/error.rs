// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error and warning types for Labelwerk.
//
// `LabelwerkError` aborts a render call. `RenderWarning` describes a problem
// with a single placed object; rendering carries on with the next one.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors. Nothing is emitted when one of these is returned.
#[derive(Debug, Error)]
pub enum LabelwerkError {
    #[error("label document could not be parsed: {0}")]
    DocumentParse(String),

    #[error("font family {family:?} not found in {} search directories", searched.len())]
    FontNotFound {
        family: String,
        searched: Vec<PathBuf>,
    },

    #[error("font file {path} could not be loaded: {reason}")]
    FontLoad { path: PathBuf, reason: String },

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LabelwerkError>;

/// Recoverable, per-object conditions reported alongside a successful render.
///
/// Every variant but `MissingGlyphs` means the object was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderWarning {
    #[error("object #{index}: unsupported object type <{tag}>")]
    UnsupportedObjectType { index: usize, tag: String },

    #[error("object #{index}: unsupported shape type {shape_type:?}")]
    UnsupportedShapeType { index: usize, shape_type: String },

    #[error("object #{index}: unsupported barcode type {barcode_type:?}")]
    UnsupportedBarcodeType { index: usize, barcode_type: String },

    #[error("object #{index}: text cannot fit its bounds")]
    TextCannotFit { index: usize },

    #[error("object #{index}: barcode content cannot be encoded: {reason}")]
    BarcodeEncoding { index: usize, reason: String },

    #[error("object #{index}: font has no glyph for {characters:?}")]
    MissingGlyphs { index: usize, characters: String },
}

impl RenderWarning {
    /// Document-order index of the object the warning refers to.
    pub fn object_index(&self) -> usize {
        match self {
            Self::UnsupportedObjectType { index, .. }
            | Self::UnsupportedShapeType { index, .. }
            | Self::UnsupportedBarcodeType { index, .. }
            | Self::TextCannotFit { index }
            | Self::BarcodeEncoding { index, .. }
            | Self::MissingGlyphs { index, .. } => *index,
        }
    }
}
