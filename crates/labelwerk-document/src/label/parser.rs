// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Label XML parser — builds a `LabelDocument` from a die-cut label description
// using `roxmltree`.
//
// Only malformed XML and unreadable bounds are errors. Every optional element
// (orientation, colours, alignment, verticalized flag) falls back to its
// default, and object elements this engine does not draw become
// `ObjectPayload::Unsupported` so the renderer can report and skip them.

use labelwerk_core::error::{LabelwerkError, Result};
use labelwerk_core::{
    BarcodeObject, BarcodeType, Bounds, Color, HorizontalAlign, LabelDocument, ObjectPayload,
    Orientation, OverflowMode, PaperSize, PlacedObject, ShapeObject, ShapeType, StyledRun,
    TextObject, VerticalAlign,
};
use roxmltree::{Document, Node};
use tracing::{debug, instrument, warn};

/// Family used when a styled run carries no `<Font>` element.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Size used when a styled run carries no usable `Size` attribute.
pub const DEFAULT_FONT_SIZE: u32 = 12;

/// Parse a label description into its object model.
#[instrument(skip_all, fields(xml_len = xml.len()))]
pub fn parse_label(xml: &str) -> Result<LabelDocument> {
    let doc = Document::parse(xml)
        .map_err(|err| LabelwerkError::DocumentParse(format!("malformed XML: {err}")))?;

    let paper_name = first_descendant_text(&doc, "PaperName").unwrap_or_default();
    if !paper_name.is_empty() && !PaperSize::is_known(&paper_name) {
        warn!(paper = %paper_name, "unknown paper name, using default stock");
    }
    let paper = PaperSize::lookup(&paper_name);

    let orientation = first_descendant_text(&doc, "PaperOrientation")
        .map(|value| Orientation::from_source(&value))
        .unwrap_or_default();

    let objects = doc
        .descendants()
        .filter(|node| is_named(node, "ObjectInfo"))
        .map(parse_object_info)
        .collect::<Result<Vec<_>>>()?;

    debug!(
        paper = %paper.name,
        ?orientation,
        objects = objects.len(),
        "Label parsed"
    );

    Ok(LabelDocument {
        paper,
        orientation,
        objects,
    })
}

fn parse_object_info(info: Node<'_, '_>) -> Result<PlacedObject> {
    let bounds = match child(info, "Bounds") {
        Some(node) => parse_bounds(node)?,
        None => Bounds::default(),
    };

    let payload = match info
        .children()
        .find(|node| node.is_element() && node.tag_name().name() != "Bounds")
    {
        Some(node) => match node.tag_name().name() {
            "TextObject" => ObjectPayload::Text(parse_text_object(node)),
            "ShapeObject" => ObjectPayload::Shape(ShapeObject {
                shape_type: ShapeType::from_source(&child_text(node, "ShapeType").unwrap_or_default()),
                foreground: color_or(child(node, "ForeColor"), Color::BLACK),
            }),
            "BarcodeObject" => ObjectPayload::Barcode(BarcodeObject {
                barcode_type: BarcodeType::from_source(&child_text(node, "Type").unwrap_or_default()),
                text: child_text(node, "Text").unwrap_or_default(),
                foreground: color_or(child(node, "ForeColor"), Color::BLACK),
            }),
            other => ObjectPayload::Unsupported {
                tag: other.to_string(),
            },
        },
        None => ObjectPayload::Unsupported {
            tag: String::new(),
        },
    };

    Ok(PlacedObject { bounds, payload })
}

fn parse_bounds(node: Node<'_, '_>) -> Result<Bounds> {
    Ok(Bounds {
        x: bounds_attribute(node, "X")?,
        y: bounds_attribute(node, "Y")?,
        width: bounds_attribute(node, "Width")?,
        height: bounds_attribute(node, "Height")?,
    })
}

fn bounds_attribute(node: Node<'_, '_>, name: &str) -> Result<u32> {
    match node.attribute(name) {
        None => Ok(0),
        Some(raw) => raw.trim().parse::<u32>().map_err(|err| {
            LabelwerkError::DocumentParse(format!("Bounds {name}={raw:?} is not a length: {err}"))
        }),
    }
}

fn parse_text_object(node: Node<'_, '_>) -> TextObject {
    let background = child(node, "BackColor")
        .map(|back| parse_color(back, Color::rgb(255, 255, 255)))
        .filter(Color::is_visible);

    let verticalized = child_text(node, "Verticalized")
        .is_some_and(|value| value.eq_ignore_ascii_case("true"));

    let field_name = child_text(node, "Name").filter(|name| !name.is_empty());

    TextObject {
        foreground: color_or(child(node, "ForeColor"), Color::BLACK),
        background,
        verticalized,
        horizontal_align: child_text(node, "HorizontalAlignment")
            .map(|value| HorizontalAlign::from_source(&value))
            .unwrap_or_default(),
        vertical_align: child_text(node, "VerticalAlignment")
            .map(|value| VerticalAlign::from_source(&value))
            .unwrap_or_default(),
        overflow: child_text(node, "TextFitMode")
            .map(|value| OverflowMode::from_source(&value))
            .unwrap_or_default(),
        field_name,
        runs: parse_runs(node),
    }
}

/// Styled runs from `<StyledText><Element>`; older labels carry a bare
/// `<Text>` plus a sibling `<Font>` instead.
fn parse_runs(node: Node<'_, '_>) -> Vec<StyledRun> {
    if let Some(styled) = child(node, "StyledText") {
        return styled
            .children()
            .filter(|element| is_named(element, "Element"))
            .map(|element| {
                let font = child(element, "Attributes").and_then(|attrs| child(attrs, "Font"));
                run_from(font, raw_text(child(element, "String")))
            })
            .collect();
    }

    match child(node, "Text") {
        Some(text) => vec![run_from(child(node, "Font"), raw_text(Some(text)))],
        None => Vec::new(),
    }
}

fn run_from(font: Option<Node<'_, '_>>, literal_text: String) -> StyledRun {
    let font_family = font
        .and_then(|f| f.attribute("Family"))
        .map(str::trim)
        .filter(|family| !family.is_empty())
        .unwrap_or(DEFAULT_FONT_FAMILY)
        .to_string();
    // Sizes are integral in practice; round the odd fractional one.
    let size = font
        .and_then(|f| f.attribute("Size"))
        .and_then(|raw| raw.trim().parse::<f32>().ok())
        .filter(|size| size.is_finite() && *size > 0.0)
        .map(|size| size.round() as u32)
        .unwrap_or(DEFAULT_FONT_SIZE);

    StyledRun {
        font_family,
        size,
        literal_text,
    }
}

fn parse_color(node: Node<'_, '_>, default: Color) -> Color {
    let channel = |name: &str, fallback: u8| {
        node.attribute(name)
            .and_then(|raw| raw.trim().parse::<u8>().ok())
            .unwrap_or(fallback)
    };
    Color {
        red: channel("Red", default.red),
        green: channel("Green", default.green),
        blue: channel("Blue", default.blue),
        alpha: channel("Alpha", default.alpha),
    }
}

fn color_or(node: Option<Node<'_, '_>>, default: Color) -> Color {
    node.map(|n| parse_color(n, default)).unwrap_or(default)
}

// -- Node helpers -------------------------------------------------------------

fn is_named(node: &Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|c| is_named(c, name))
}

fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    child(node, name).map(|c| raw_text(Some(c)).trim().to_string())
}

/// Full text content, untrimmed; label strings keep their spaces.
fn raw_text(node: Option<Node<'_, '_>>) -> String {
    node.map(|n| {
        n.descendants()
            .filter(|d| d.is_text())
            .filter_map(|d| d.text())
            .collect()
    })
    .unwrap_or_default()
}

fn first_descendant_text(doc: &Document<'_>, name: &str) -> Option<String> {
    doc.descendants()
        .find(|node| is_named(node, name))
        .map(|node| raw_text(Some(node)).trim().to_string())
}
