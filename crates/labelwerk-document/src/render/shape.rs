// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shape objects. Only horizontal rules are drawn.

use labelwerk_core::{PointRect, ShapeObject, ShapeType};

use crate::pdf::PageEmitter;

/// Vertical shift applied to a rule's centre line, relative to the box top.
/// Negative moves down the page; calibrated against vendor prints.
pub const RULE_Y_OFFSET_PT: f32 = -1.0;

/// Draw `shape` in `rect`. Returns false for shape types that are not drawn.
pub fn render_shape_object(emitter: &mut PageEmitter, shape: &ShapeObject, rect: PointRect) -> bool {
    match &shape.shape_type {
        ShapeType::HorizontalLine => {
            emitter.horizontal_line(
                rect.x,
                rect.right(),
                rect.top + RULE_Y_OFFSET_PT,
                rect.height,
                shape.foreground,
            );
            true
        }
        ShapeType::Other(_) => false,
    }
}
