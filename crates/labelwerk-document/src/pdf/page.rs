// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page emitter — collects drawing operations for a single label page and
// serialises them with `printpdf` 0.8.
//
// printpdf 0.8 builds pages from a `Vec<Op>`; operations are appended in the
// order the renderers issue them, which is the label's paint order.
//
// printpdf passes standard-font text through as UTF-8, so those strings are
// encoded to WinAnsi here and written with a raw `Tj`. The empty
// `WriteTextBuiltinFont` before it registers the font resource on the page.

use std::collections::HashMap;
use std::path::PathBuf;

use labelwerk_core::error::{LabelwerkError, Result};
use labelwerk_core::{Color, Orientation, PointRect};
use printpdf::{
    Color as PdfColor, DictItem, FontId, Line, LinePoint, Mm, Op, PaintMode, ParsedFont,
    PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Polygon, PolygonRing, Pt, Rgb,
    TextItem, WindingOrder,
};
use tracing::{debug, info};

use crate::font::builtin::encode_win_ansi;
use crate::font::{EmbeddedFont, FontHandle};

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Owns the output document and the single page being drawn.
pub struct PageEmitter {
    doc: PdfDocument,
    width_pt: f32,
    height_pt: f32,
    orientation: Orientation,
    ops: Vec<Op>,
    /// Embedded fonts already registered with the document, by file path.
    fonts: HashMap<PathBuf, FontId>,
}

impl PageEmitter {
    /// A blank page of the given size in points, zero margins.
    pub fn new(title: &str, width_pt: f32, height_pt: f32, orientation: Orientation) -> Self {
        Self {
            doc: PdfDocument::new(title),
            width_pt,
            height_pt,
            orientation,
            ops: Vec::new(),
            fonts: HashMap::new(),
        }
    }

    pub fn width_pt(&self) -> f32 {
        self.width_pt
    }

    pub fn height_pt(&self) -> f32 {
        self.height_pt
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Operations issued so far, in paint order.
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Fill an axis-aligned rectangle.
    pub fn fill_rect(&mut self, rect: PointRect, color: Color) {
        let bottom = rect.bottom();
        let points = vec![
            corner(rect.x, rect.top),
            corner(rect.right(), rect.top),
            corner(rect.right(), bottom),
            corner(rect.x, bottom),
        ];
        self.ops.push(Op::SaveGraphicsState);
        self.ops.push(Op::SetFillColor {
            col: pdf_color(color),
        });
        self.ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing { points }],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            },
        });
        self.ops.push(Op::RestoreGraphicsState);
    }

    /// Stroke a horizontal line centred on `y`.
    pub fn horizontal_line(&mut self, x_start: f32, x_end: f32, y: f32, thickness: f32, color: Color) {
        self.ops.push(Op::SaveGraphicsState);
        self.ops.push(Op::SetOutlineColor {
            col: pdf_color(color),
        });
        self.ops.push(Op::SetOutlineThickness { pt: Pt(thickness) });
        self.ops.push(Op::DrawLine {
            line: Line {
                points: vec![corner(x_start, y), corner(x_end, y)],
                is_closed: false,
            },
        });
        self.ops.push(Op::RestoreGraphicsState);
    }

    /// Write one line of text with its baseline starting at (`x`, `baseline`).
    pub fn draw_text(
        &mut self,
        font: &FontHandle,
        size: f32,
        color: Color,
        x: f32,
        baseline: f32,
        text: &str,
    ) -> Result<()> {
        let (set_size, write) = match font {
            FontHandle::Builtin { font, .. } => (
                Op::SetFontSizeBuiltinFont {
                    size: Pt(size),
                    font: *font,
                },
                vec![
                    Op::WriteTextBuiltinFont {
                        items: Vec::new(),
                        font: *font,
                    },
                    Op::Unknown {
                        key: "Tj".into(),
                        value: vec![DictItem::String {
                            data: encode_win_ansi(text),
                            literal: false,
                        }],
                    },
                ],
            ),
            FontHandle::Embedded(embedded) => {
                let id = self.register_font(embedded)?;
                (
                    Op::SetFontSize {
                        size: Pt(size),
                        font: id.clone(),
                    },
                    vec![Op::WriteText {
                        items: vec![TextItem::Text(text.to_string())],
                        font: id,
                    }],
                )
            }
        };

        self.ops.push(Op::SaveGraphicsState);
        self.ops.push(Op::SetFillColor {
            col: pdf_color(color),
        });
        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(x),
                y: Pt(baseline),
            },
        });
        self.ops.push(set_size);
        self.ops.extend(write);
        self.ops.push(Op::EndTextSection);
        self.ops.push(Op::RestoreGraphicsState);
        Ok(())
    }

    fn register_font(&mut self, font: &EmbeddedFont) -> Result<FontId> {
        if let Some(id) = self.fonts.get(&font.path) {
            return Ok(id.clone());
        }
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let parsed = ParsedFont::from_bytes(&font.data, 0, &mut warnings).ok_or_else(|| {
            LabelwerkError::FontLoad {
                path: font.path.clone(),
                reason: "printpdf could not parse the font program".into(),
            }
        })?;
        let id = self.doc.add_font(&parsed);
        debug!(family = %font.family, path = %font.path.display(), "Font embedded");
        self.fonts.insert(font.path.clone(), id.clone());
        Ok(id)
    }

    /// Serialise the page into PDF bytes.
    pub fn finish(mut self) -> Vec<u8> {
        let page = PdfPage::new(
            Mm(self.width_pt * MM_PER_PT),
            Mm(self.height_pt * MM_PER_PT),
            std::mem::take(&mut self.ops),
        );
        self.doc.with_pages(vec![page]);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        // `secure` would drop the raw `Tj` ops written for standard fonts.
        let options = PdfSaveOptions {
            secure: false,
            ..PdfSaveOptions::default()
        };
        let output = self.doc.save(&options, &mut warnings);
        if !warnings.is_empty() {
            debug!(count = warnings.len(), "printpdf reported warnings while saving");
        }

        info!(
            bytes = output.len(),
            width_pt = self.width_pt,
            height_pt = self.height_pt,
            "Label page serialised"
        );
        output
    }
}

fn corner(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

fn pdf_color(color: Color) -> PdfColor {
    PdfColor::Rgb(Rgb::new(
        f32::from(color.red) / 255.0,
        f32::from(color.green) / 255.0,
        f32::from(color.blue) / 255.0,
        None,
    ))
}
