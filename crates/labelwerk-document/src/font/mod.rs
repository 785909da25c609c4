// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Font module — family resolution and glyph metrics for text layout.

pub mod builtin;
pub mod resolver;

pub use resolver::{EmbeddedFont, FontHandle, FontResolver};
