// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// labelwerk-document — Label rendering for the Labelwerk printer emulator.
//
// Parses die-cut label XML into the document model, resolves fonts, lays out
// text, shapes, and barcodes, and emits a single-page PDF.

pub mod font;
pub mod label;
pub mod pdf;
pub mod render;

// Re-export the primary entry points so callers can use `labelwerk_document::LabelRenderer` etc.
pub use font::{FontHandle, FontResolver};
pub use label::parse_label;
pub use pdf::PageEmitter;
pub use render::{LabelRenderer, RenderedLabel, render_label};
