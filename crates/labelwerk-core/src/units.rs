// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unit conversion between label twips (top-left origin) and PDF points
// (bottom-left origin).

use crate::types::Bounds;

/// Native label units per inch.
pub const TWIPS_PER_INCH: f32 = 1440.0;

/// PDF points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Convert a length in twips to PDF points.
pub fn to_points(twips: f32) -> f32 {
    twips / TWIPS_PER_INCH * POINTS_PER_INCH
}

/// Convert a length in PDF points back to twips.
pub fn to_twips(points: f32) -> f32 {
    points / POINTS_PER_INCH * TWIPS_PER_INCH
}

/// Convert a top-down twip Y coordinate into a bottom-up PDF Y coordinate.
pub fn flip_y(twips_y: f32, page_height_pt: f32) -> f32 {
    page_height_pt - to_points(twips_y)
}

/// A box in PDF points. `top` is the upper edge in bottom-left-origin space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointRect {
    pub x: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl PointRect {
    pub fn bottom(&self) -> f32 {
        self.top - self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

impl Bounds {
    /// Convert to page space for a page `page_height_pt` tall.
    pub fn to_point_rect(&self, page_height_pt: f32) -> PointRect {
        PointRect {
            x: to_points(self.x as f32),
            top: flip_y(self.y as f32, page_height_pt),
            width: to_points(self.width as f32),
            height: to_points(self.height as f32),
        }
    }
}
