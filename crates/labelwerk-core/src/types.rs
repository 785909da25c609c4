// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Labelwerk label model.
//
// A `LabelDocument` is built fresh for every render call and dropped once the
// page has been emitted. Object geometry stays in native twips; renderers
// convert at the point of use.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Known die-cut label stocks: (paper name, width pt, height pt).
///
/// The first entry doubles as the default for unrecognised names.
pub const PAPER_SIZES: &[(&str, f32, f32)] = &[
    ("30252 Address", 252.0, 81.0),
    ("30320 Address", 252.0, 81.0),
    ("99012 Large Address", 252.0, 102.0),
    ("30256 Shipping", 288.0, 167.0),
    ("30323 Shipping", 288.0, 153.0),
    ("30330 Return Address", 144.0, 54.0),
    ("30334 Medium Multipurpose", 162.0, 90.0),
    ("30336 Small Multipurpose", 153.0, 72.0),
    ("30346 Library Barcode", 135.0, 36.0),
    ("11354 Multi-Purpose", 162.0, 91.0),
];

/// A named label stock with its page dimensions in PDF points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperSize {
    pub name: String,
    pub width_pt: f32,
    pub height_pt: f32,
}

impl PaperSize {
    /// Look a stock up by name, falling back to the first table entry.
    pub fn lookup(name: &str) -> Self {
        let (found, width_pt, height_pt) = PAPER_SIZES
            .iter()
            .find(|(candidate, _, _)| *candidate == name.trim())
            .copied()
            .unwrap_or(PAPER_SIZES[0]);
        Self {
            name: found.to_string(),
            width_pt,
            height_pt,
        }
    }

    /// Whether `name` is one of the known stocks.
    pub fn is_known(name: &str) -> bool {
        PAPER_SIZES.iter().any(|(candidate, _, _)| *candidate == name.trim())
    }

    /// Page (width, height) in points for the given orientation.
    ///
    /// Portrait keeps the table entry as listed; landscape guarantees the
    /// long edge runs horizontally.
    pub fn oriented(&self, orientation: Orientation) -> (f32, f32) {
        match orientation {
            Orientation::Portrait => (self.width_pt, self.height_pt),
            Orientation::Landscape => (
                self.width_pt.max(self.height_pt),
                self.width_pt.min(self.height_pt),
            ),
        }
    }
}

impl Default for PaperSize {
    fn default() -> Self {
        let (name, width_pt, height_pt) = PAPER_SIZES[0];
        Self {
            name: name.to_string(),
            width_pt,
            height_pt,
        }
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Parse the `PaperOrientation` element value.
    pub fn from_source(value: &str) -> Self {
        match value.trim() {
            "Landscape" => Self::Landscape,
            _ => Self::Portrait,
        }
    }
}

/// 8-bit RGBA colour as written in the label XML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 255,
        }
    }

    /// Fully transparent colours paint nothing.
    pub fn is_visible(&self) -> bool {
        self.alpha > 0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Object placement in native twips, top-left origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizontalAlign {
    #[default]
    Left,
    Right,
    Center,
}

impl HorizontalAlign {
    pub fn from_source(value: &str) -> Self {
        match value.trim() {
            "Right" => Self::Right,
            "Center" | "Centre" => Self::Center,
            _ => Self::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalAlign {
    #[default]
    Top,
    Bottom,
    Center,
}

impl VerticalAlign {
    pub fn from_source(value: &str) -> Self {
        match value.trim() {
            "Bottom" => Self::Bottom,
            "Middle" | "Center" => Self::Center,
            _ => Self::Top,
        }
    }
}

/// What to do when text is larger than its box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverflowMode {
    #[default]
    Truncate,
    ShrinkToFit,
}

impl OverflowMode {
    /// Parse the `TextFitMode` element value.
    pub fn from_source(value: &str) -> Self {
        match value.trim() {
            "AlwaysFit" | "ShrinkToFit" => Self::ShrinkToFit,
            _ => Self::Truncate,
        }
    }
}

/// One styled span of a text object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledRun {
    pub font_family: String,
    /// Point size before any shrink-to-fit.
    pub size: u32,
    pub literal_text: String,
}

impl StyledRun {
    /// Text to draw: the merge-field override when one applies.
    pub fn effective_text<'a>(&'a self, field_override: Option<&'a str>) -> &'a str {
        field_override.unwrap_or(&self.literal_text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextObject {
    pub foreground: Color,
    pub background: Option<Color>,
    pub verticalized: bool,
    pub horizontal_align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
    pub overflow: OverflowMode,
    /// Merge-field name (the object's `<Name>`).
    pub field_name: Option<String>,
    pub runs: Vec<StyledRun>,
}

impl TextObject {
    /// Concatenated run texts after merge-field substitution.
    pub fn content(&self, fields: &HashMap<String, String>) -> String {
        let field_override = self
            .field_name
            .as_ref()
            .and_then(|name| fields.get(name))
            .map(String::as_str);
        self.runs
            .iter()
            .map(|run| run.effective_text(field_override))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeType {
    HorizontalLine,
    Other(String),
}

impl ShapeType {
    pub fn from_source(value: &str) -> Self {
        match value.trim() {
            "HorizontalLine" => Self::HorizontalLine,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeObject {
    pub shape_type: ShapeType,
    pub foreground: Color,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarcodeType {
    QrCode,
    Code128Auto,
    Code128A,
    Code128B,
    Code128C,
    Other(String),
}

impl BarcodeType {
    pub fn from_source(value: &str) -> Self {
        match value.trim() {
            "QRCode" => Self::QrCode,
            "Code128Auto" => Self::Code128Auto,
            "Code128A" => Self::Code128A,
            "Code128B" => Self::Code128B,
            "Code128C" => Self::Code128C,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeObject {
    pub barcode_type: BarcodeType,
    pub text: String,
    pub foreground: Color,
}

/// What a placed object draws. Decided once by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectPayload {
    Text(TextObject),
    Shape(ShapeObject),
    Barcode(BarcodeObject),
    /// An object element this engine does not render, kept by tag name.
    Unsupported { tag: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedObject {
    pub bounds: Bounds,
    pub payload: ObjectPayload,
}

/// Root of the parsed label description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelDocument {
    pub paper: PaperSize,
    pub orientation: Orientation,
    /// Paint order; never reordered after parsing.
    pub objects: Vec<PlacedObject>,
}

impl LabelDocument {
    /// Page (width, height) in points.
    pub fn page_size(&self) -> (f32, f32) {
        self.paper.oriented(self.orientation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> StyledRun {
        StyledRun {
            font_family: "Arial".into(),
            size: 12,
            literal_text: text.into(),
        }
    }

    fn text_object(field_name: Option<&str>, runs: Vec<StyledRun>) -> TextObject {
        TextObject {
            foreground: Color::BLACK,
            background: None,
            verticalized: false,
            horizontal_align: HorizontalAlign::Left,
            vertical_align: VerticalAlign::Top,
            overflow: OverflowMode::Truncate,
            field_name: field_name.map(String::from),
            runs,
        }
    }

    #[test]
    fn every_known_paper_size_resolves_to_its_entry() {
        for (name, width, height) in PAPER_SIZES {
            let paper = PaperSize::lookup(name);
            assert_eq!(paper.name, *name);
            assert_eq!((paper.width_pt, paper.height_pt), (*width, *height));
            assert!(PaperSize::is_known(name));
        }
    }

    #[test]
    fn unknown_paper_falls_back_to_first_entry() {
        let paper = PaperSize::lookup("99999 Imaginary");
        assert_eq!(paper, PaperSize::default());
        assert_eq!((paper.width_pt, paper.height_pt), (252.0, 81.0));
        assert!(!PaperSize::is_known("99999 Imaginary"));
    }

    #[test]
    fn landscape_puts_long_edge_horizontal() {
        let tall = PaperSize {
            name: "tall".into(),
            width_pt: 81.0,
            height_pt: 252.0,
        };
        assert_eq!(tall.oriented(Orientation::Portrait), (81.0, 252.0));
        assert_eq!(tall.oriented(Orientation::Landscape), (252.0, 81.0));

        let wide = PaperSize::default();
        assert_eq!(wide.oriented(Orientation::Portrait), (252.0, 81.0));
        assert_eq!(wide.oriented(Orientation::Landscape), (252.0, 81.0));
    }

    #[test]
    fn enum_fallbacks() {
        assert_eq!(HorizontalAlign::from_source("Justify"), HorizontalAlign::Left);
        assert_eq!(HorizontalAlign::from_source("Center"), HorizontalAlign::Center);
        assert_eq!(VerticalAlign::from_source("Middle"), VerticalAlign::Center);
        assert_eq!(VerticalAlign::from_source(""), VerticalAlign::Top);
        assert_eq!(OverflowMode::from_source("AlwaysFit"), OverflowMode::ShrinkToFit);
        assert_eq!(OverflowMode::from_source("None"), OverflowMode::Truncate);
        assert_eq!(Orientation::from_source("Landscape"), Orientation::Landscape);
        assert_eq!(Orientation::from_source("Sideways"), Orientation::Portrait);
        assert_eq!(
            BarcodeType::from_source("Ean13"),
            BarcodeType::Other("Ean13".into())
        );
    }

    #[test]
    fn content_uses_literal_text_without_override() {
        let object = text_object(Some("NAME"), vec![run("Hello"), run(" world")]);
        assert_eq!(object.content(&HashMap::new()), "Hello world");
    }

    #[test]
    fn merge_field_replaces_every_run() {
        let object = text_object(Some("NAME"), vec![run("Hello")]);
        let mut fields = HashMap::new();
        fields.insert("NAME".to_string(), "Ada".to_string());
        assert_eq!(object.content(&fields), "Ada");

        let unnamed = text_object(None, vec![run("Hello")]);
        assert_eq!(unnamed.content(&fields), "Hello");
    }

    #[test]
    fn empty_runs_produce_empty_content() {
        let object = text_object(None, Vec::new());
        assert!(object.content(&HashMap::new()).is_empty());
    }
}
