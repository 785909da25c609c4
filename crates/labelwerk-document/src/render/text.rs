// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text layout — places a text object's content inside its box.
//
// Non-verticalized text is a single line that never wraps; shrink-to-fit
// reduces the font size instead. Verticalized text puts one character on each
// line. The first run's font and size apply to the whole box.
//
// The inset and raise constants below were calibrated by overlaying output on
// the vendor renderer's prints. They are data, not derived values.

use labelwerk_core::error::Result;
use labelwerk_core::{HorizontalAlign, OverflowMode, PointRect, TextObject, VerticalAlign};
use tracing::debug;

use crate::font::FontHandle;
use crate::pdf::PageEmitter;

/// Total horizontal inset; half is applied on each side of the box.
pub const HORIZONTAL_INSET_PT: f32 = 3.0;

/// Fixed upward shift of non-centred text.
pub const RAISE_PT: f32 = 1.0;

/// Upward shift of non-centred text per point of font size.
pub const RAISE_FONT_FRACTION: f32 = 0.1;

/// Shrink-to-fit never goes below this size.
pub const MIN_FONT_SIZE: f32 = 5.0;

/// Shrink-to-fit step.
pub const SHRINK_STEP: f32 = 0.5;

const FIT_EPSILON: f32 = 1e-3;

/// A single laid-out line in page coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: f32,
    pub baseline: f32,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub font_size: f32,
    pub lines: Vec<TextLine>,
    /// Whether lines or characters were dropped to fit the box.
    pub truncated: bool,
}

/// The text cannot be placed in its box at any permitted size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CannotFit;

/// Break content into layout lines.
///
/// Verticalized content gets one character per line. Otherwise only the first
/// line is kept.
pub fn split_lines(content: &str, verticalized: bool) -> Vec<String> {
    if verticalized {
        content
            .chars()
            .filter(|c| *c != '\n' && *c != '\r')
            .map(String::from)
            .collect()
    } else {
        vec![content.lines().next().unwrap_or_default().to_string()]
    }
}

/// Lay out `content` for `object` inside `rect`.
pub fn layout_text(
    object: &TextObject,
    content: &str,
    font: &FontHandle,
    requested_size: f32,
    rect: PointRect,
) -> std::result::Result<TextLayout, CannotFit> {
    let mut lines = split_lines(content, object.verticalized);
    if lines.iter().all(|line| line.is_empty()) {
        return Ok(TextLayout {
            font_size: requested_size,
            lines: Vec::new(),
            truncated: false,
        });
    }

    let avail_width = rect.width - HORIZONTAL_INSET_PT;
    let left = rect.x + HORIZONTAL_INSET_PT / 2.0;

    let mut size = requested_size;
    let mut truncated = false;
    match object.overflow {
        OverflowMode::ShrinkToFit => {
            while !fits(&lines, font, size, avail_width, rect.height) {
                if size <= MIN_FONT_SIZE {
                    return Err(CannotFit);
                }
                size = (size - SHRINK_STEP).max(MIN_FONT_SIZE);
            }
        }
        OverflowMode::Truncate => {
            let max_lines = (1..=lines.len())
                .take_while(|n| block_height(font, size, *n) <= rect.height + FIT_EPSILON)
                .count();
            if max_lines == 0 {
                return Err(CannotFit);
            }
            if max_lines < lines.len() {
                lines.truncate(max_lines);
                truncated = true;
            }
            for line in &mut lines {
                let kept = fitting_prefix(line, font, size, avail_width);
                if kept.len() < line.len() {
                    if kept.is_empty() {
                        return Err(CannotFit);
                    }
                    *line = kept;
                    truncated = true;
                }
            }
        }
    }

    let ascent = font.ascent(size);
    let line_height = font.line_height(size);
    let text_height = block_height(font, size, lines.len());
    let slack = rect.height - text_height;

    let mut first_baseline = match object.vertical_align {
        VerticalAlign::Top => rect.top - ascent,
        VerticalAlign::Center => rect.top - slack / 2.0 - ascent,
        VerticalAlign::Bottom => rect.top - slack - ascent,
    };
    if object.vertical_align != VerticalAlign::Center {
        first_baseline += RAISE_PT + RAISE_FONT_FRACTION * size;
    }
    if object.vertical_align == VerticalAlign::Bottom {
        first_baseline -= font.descent(size);
    }

    let laid_out = lines
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            let width = font.text_width(&text, size);
            let x = match object.horizontal_align {
                HorizontalAlign::Left => left,
                HorizontalAlign::Right => left + avail_width - width,
                HorizontalAlign::Center => left + (avail_width - width) / 2.0,
            };
            TextLine {
                text,
                x,
                baseline: first_baseline - index as f32 * line_height,
                width,
            }
        })
        .collect();

    Ok(TextLayout {
        font_size: size,
        lines: laid_out,
        truncated,
    })
}

/// Fill the background (if any) and draw the laid-out text.
///
/// Returns `Ok(None)` when the text cannot fit; nothing is drawn then.
pub fn render_text_object(
    emitter: &mut PageEmitter,
    object: &TextObject,
    content: &str,
    font: &FontHandle,
    rect: PointRect,
) -> Result<Option<TextLayout>> {
    let requested_size = object.runs.first().map_or(0.0, |run| run.size as f32);
    let layout = match layout_text(object, content, font, requested_size, rect) {
        Ok(layout) => layout,
        Err(CannotFit) => return Ok(None),
    };

    if let Some(background) = object.background.filter(|color| color.is_visible()) {
        emitter.fill_rect(rect, background);
    }

    for line in &layout.lines {
        if line.text.is_empty() {
            continue;
        }
        emitter.draw_text(
            font,
            layout.font_size,
            object.foreground,
            line.x,
            line.baseline,
            &line.text,
        )?;
    }

    debug!(
        lines = layout.lines.len(),
        font_size = layout.font_size,
        truncated = layout.truncated,
        "Text object laid out"
    );
    Ok(Some(layout))
}

/// Height of `count` stacked lines, first ascender to last descender.
fn block_height(font: &FontHandle, size: f32, count: usize) -> f32 {
    if count == 0 {
        return 0.0;
    }
    count as f32 * font.line_height(size) - font.line_gap(size)
}

fn fits(lines: &[String], font: &FontHandle, size: f32, width: f32, height: f32) -> bool {
    block_height(font, size, lines.len()) <= height + FIT_EPSILON
        && lines
            .iter()
            .all(|line| font.text_width(line, size) <= width + FIT_EPSILON)
}

/// Longest prefix of `line` no wider than `width`.
fn fitting_prefix(line: &str, font: &FontHandle, size: f32, width: f32) -> String {
    let mut used = 0.0;
    line.chars()
        .zip(font.char_widths(line, size))
        .take_while(|(_, advance)| {
            used += advance;
            used <= width + FIT_EPSILON
        })
        .map(|(c, _)| c)
        .collect()
}
