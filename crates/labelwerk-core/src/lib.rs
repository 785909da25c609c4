// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Labelwerk — Label document model, unit conversion, and error definitions
// shared across all crates.

pub mod config;
pub mod error;
pub mod types;
pub mod units;

pub use config::RenderConfig;
pub use error::{LabelwerkError, RenderWarning};
pub use types::*;
pub use units::PointRect;
