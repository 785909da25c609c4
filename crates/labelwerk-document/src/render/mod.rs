// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Label renderer — walks a parsed label in document order and dispatches each
// placed object to the text, shape, or barcode renderer, all drawing onto one
// page.
//
// Per-object problems become `RenderWarning`s and the object is skipped, except
// for missing glyphs, which are reported and drawn as a substitute. Only a
// malformed document or an unresolvable font aborts the render.

pub mod barcode;
pub mod shape;
pub mod text;

use std::collections::HashMap;

use labelwerk_core::error::{LabelwerkError, Result};
use labelwerk_core::{
    LabelDocument, ObjectPayload, Orientation, RenderConfig, RenderWarning, ShapeType,
};
use tracing::{info, instrument, warn};

use crate::font::{FontHandle, FontResolver};
use crate::label::parse_label;
use crate::pdf::PageEmitter;
use barcode::BarcodeSkip;

/// Output of a successful render.
#[derive(Debug, Clone)]
pub struct RenderedLabel {
    /// The single-page PDF.
    pub pdf: Vec<u8>,
    pub orientation: Orientation,
    pub paper_width_pt: f32,
    pub paper_height_pt: f32,
    /// Objects that were skipped, in document order.
    pub warnings: Vec<RenderWarning>,
}

/// Renders label documents with a fixed configuration.
///
/// Holds no per-render state; concurrent renders may share one instance.
#[derive(Debug, Clone)]
pub struct LabelRenderer {
    config: RenderConfig,
    resolver: FontResolver,
}

impl LabelRenderer {
    pub fn new(config: RenderConfig) -> Self {
        let resolver = FontResolver::from_config(&config);
        Self { config, resolver }
    }

    /// Parse `xml` and render it.
    pub fn render_xml(&self, xml: &str, fields: &HashMap<String, String>) -> Result<RenderedLabel> {
        let document = parse_label(xml)?;
        self.render(&document, fields)
    }

    /// Render a parsed label. `fields` maps merge-field names to replacement text.
    #[instrument(skip_all, fields(paper = %document.paper.name, objects = document.objects.len()))]
    pub fn render(
        &self,
        document: &LabelDocument,
        fields: &HashMap<String, String>,
    ) -> Result<RenderedLabel> {
        let (emitter, warnings) = self.paint(document, fields)?;
        let orientation = emitter.orientation();
        let paper_width_pt = emitter.width_pt();
        let paper_height_pt = emitter.height_pt();
        let pdf = emitter.finish();

        info!(
            warnings = warnings.len(),
            bytes = pdf.len(),
            "Label rendered"
        );

        Ok(RenderedLabel {
            pdf,
            orientation,
            paper_width_pt,
            paper_height_pt,
            warnings,
        })
    }

    /// Draw every object onto a fresh page without serialising it.
    fn paint(
        &self,
        document: &LabelDocument,
        fields: &HashMap<String, String>,
    ) -> Result<(PageEmitter, Vec<RenderWarning>)> {
        let (width, height) = document.page_size();
        let mut emitter =
            PageEmitter::new(&self.config.title, width, height, document.orientation);
        let mut warnings = Vec::new();
        let mut fonts: HashMap<String, FontHandle> = HashMap::new();

        for (index, object) in document.objects.iter().enumerate() {
            let rect = object.bounds.to_point_rect(height);
            let warning = match &object.payload {
                ObjectPayload::Text(text) => {
                    let Some(first_run) = text.runs.first() else {
                        continue;
                    };
                    let font = self.resolve_font(&first_run.font_family, &mut fonts)?;
                    let content = text.content(fields);
                    let missing = font.missing_chars(&content);
                    if !missing.is_empty() {
                        report(
                            &mut warnings,
                            RenderWarning::MissingGlyphs {
                                index,
                                characters: missing.into_iter().collect(),
                            },
                        );
                    }
                    match text::render_text_object(&mut emitter, text, &content, &font, rect)? {
                        Some(_) => None,
                        None => Some(RenderWarning::TextCannotFit { index }),
                    }
                }
                ObjectPayload::Shape(shape) => {
                    if shape::render_shape_object(&mut emitter, shape, rect) {
                        None
                    } else {
                        let shape_type = match &shape.shape_type {
                            ShapeType::Other(name) => name.clone(),
                            other => format!("{other:?}"),
                        };
                        Some(RenderWarning::UnsupportedShapeType { index, shape_type })
                    }
                }
                ObjectPayload::Barcode(code) => {
                    match barcode::render_barcode_object(&mut emitter, code, rect) {
                        Ok(()) => None,
                        Err(BarcodeSkip::UnsupportedType(barcode_type)) => {
                            Some(RenderWarning::UnsupportedBarcodeType {
                                index,
                                barcode_type,
                            })
                        }
                        Err(BarcodeSkip::Encoding(reason)) => {
                            Some(RenderWarning::BarcodeEncoding { index, reason })
                        }
                    }
                }
                ObjectPayload::Unsupported { tag } => Some(RenderWarning::UnsupportedObjectType {
                    index,
                    tag: tag.clone(),
                }),
            };

            if let Some(warning) = warning {
                report(&mut warnings, warning);
            }
        }

        Ok((emitter, warnings))
    }

    /// Resolve a family once per render, substituting the configured fallback
    /// family when the requested one does not exist.
    fn resolve_font(
        &self,
        family: &str,
        cache: &mut HashMap<String, FontHandle>,
    ) -> Result<FontHandle> {
        if let Some(handle) = cache.get(family) {
            return Ok(handle.clone());
        }

        let handle = match self.resolver.resolve(family) {
            Ok(handle) => handle,
            Err(LabelwerkError::FontNotFound { .. })
                if self
                    .config
                    .fallback_family
                    .as_deref()
                    .is_some_and(|fallback| fallback != family) =>
            {
                let fallback = self.config.fallback_family.as_deref().unwrap_or(family);
                warn!(requested = family, fallback, "Font not found, using fallback family");
                self.resolver.resolve(fallback)?
            }
            Err(err) => return Err(err),
        };

        cache.insert(family.to_string(), handle.clone());
        Ok(handle)
    }
}

fn report(warnings: &mut Vec<RenderWarning>, warning: RenderWarning) {
    warn!(object = warning.object_index(), %warning, "Label object warning");
    warnings.push(warning);
}

/// Render `xml` with `config` in one call.
pub fn render_label(
    xml: &str,
    fields: &HashMap<String, String>,
    config: RenderConfig,
) -> Result<RenderedLabel> {
    LabelRenderer::new(config).render_xml(xml, fields)
}

#[cfg(test)]
mod tests {
    use labelwerk_core::{
        Bounds, Color, HorizontalAlign, OverflowMode, PAPER_SIZES, PaperSize, PlacedObject,
        ShapeObject, StyledRun, TextObject, VerticalAlign,
    };
    use printpdf::{DictItem, Op};

    use super::*;
    use crate::pdf::page::tests::{media_box, shown_strings, system_test_font};

    const HELLO_LABEL: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<DieCutLabel Version="8.0" Units="twips">
  <PaperName>30252 Address</PaperName>
  <ObjectInfo>
    <TextObject>
      <Name>GREETING</Name>
      <HorizontalAlignment>Left</HorizontalAlignment>
      <VerticalAlignment>Top</VerticalAlignment>
      <StyledText>
        <Element>
          <String>Hello</String>
          <Attributes><Font Family="Arial" Size="12" /></Attributes>
        </Element>
      </StyledText>
    </TextObject>
    <Bounds X="0" Y="0" Width="1440" Height="720" />
  </ObjectInfo>
</DieCutLabel>"#;

    fn renderer() -> LabelRenderer {
        LabelRenderer::new(RenderConfig::builtin_only())
    }

    fn text_object(family: &str, text: &str, background: Color) -> ObjectPayload {
        ObjectPayload::Text(TextObject {
            foreground: Color::BLACK,
            background: Some(background),
            verticalized: false,
            horizontal_align: HorizontalAlign::Left,
            vertical_align: VerticalAlign::Top,
            overflow: OverflowMode::Truncate,
            field_name: None,
            runs: vec![StyledRun {
                font_family: family.into(),
                size: 10,
                literal_text: text.into(),
            }],
        })
    }

    fn placed(payload: ObjectPayload) -> PlacedObject {
        PlacedObject {
            bounds: Bounds {
                x: 100,
                y: 100,
                width: 2000,
                height: 600,
            },
            payload,
        }
    }

    fn document(objects: Vec<PlacedObject>) -> LabelDocument {
        LabelDocument {
            paper: PaperSize::default(),
            orientation: Orientation::Portrait,
            objects,
        }
    }

    /// Standard-font strings in paint order, decoded from their `Tj` bytes.
    fn written_text(ops: &[Op]) -> Vec<String> {
        ops.iter()
            .filter_map(|op| match op {
                Op::Unknown { key, value } if key == "Tj" => match value.first() {
                    Some(DictItem::String { data, .. }) => {
                        Some(encoding_rs::WINDOWS_1252.decode(data).0.into_owned())
                    }
                    _ => None,
                },
                _ => None,
            })
            .collect()
    }

    #[test]
    fn hello_label_renders_at_top_left() {
        let (emitter, warnings) = renderer()
            .paint(&parse_label(HELLO_LABEL).unwrap(), &HashMap::new())
            .unwrap();
        assert!(warnings.is_empty());
        assert_eq!((emitter.width_pt(), emitter.height_pt()), (252.0, 81.0));
        assert_eq!(written_text(emitter.ops()), vec!["Hello"]);

        let cursor = emitter
            .ops()
            .iter()
            .find_map(|op| match op {
                Op::SetTextCursor { pos } => Some((pos.x.0, pos.y.0)),
                _ => None,
            })
            .unwrap();
        assert!(cursor.0 < 10.0, "x = {}", cursor.0);
        assert!(cursor.1 > 81.0 - 36.0 && cursor.1 < 81.0, "y = {}", cursor.1);
    }

    #[test]
    fn hello_label_produces_a_sized_pdf() {
        let rendered = renderer().render_xml(HELLO_LABEL, &HashMap::new()).unwrap();
        assert!(rendered.pdf.starts_with(b"%PDF"));
        assert_eq!(rendered.orientation, Orientation::Portrait);
        assert_eq!(rendered.paper_width_pt, 252.0);
        assert_eq!(rendered.paper_height_pt, 81.0);
        assert!(rendered.warnings.is_empty());
    }

    #[test]
    fn merge_fields_replace_text() {
        let mut fields = HashMap::new();
        fields.insert("GREETING".to_string(), "Goodbye".to_string());
        let (emitter, _) = renderer()
            .paint(&parse_label(HELLO_LABEL).unwrap(), &fields)
            .unwrap();
        assert_eq!(written_text(emitter.ops()), vec!["Goodbye"]);
    }

    #[test]
    fn objects_paint_in_document_order() {
        let red = Color::rgb(255, 0, 0);
        let green = Color::rgb(0, 255, 0);
        let blue = Color::rgb(0, 0, 255);
        let doc = document(vec![
            placed(text_object("Arial", "one", red)),
            placed(text_object("Arial", "two", green)),
            placed(text_object("Arial", "three", blue)),
        ]);

        let (emitter, warnings) = renderer().paint(&doc, &HashMap::new()).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(written_text(emitter.ops()), vec!["one", "two", "three"]);

        let polygons: Vec<usize> = emitter
            .ops()
            .iter()
            .enumerate()
            .filter(|(_, op)| matches!(op, Op::DrawPolygon { .. }))
            .map(|(i, _)| i)
            .collect();
        let texts: Vec<usize> = emitter
            .ops()
            .iter()
            .enumerate()
            .filter(|(_, op)| matches!(op, Op::WriteTextBuiltinFont { .. }))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(polygons.len(), 3);
        for i in 0..3 {
            assert!(polygons[i] < texts[i], "background precedes its text");
            if i > 0 {
                assert!(texts[i - 1] < polygons[i], "later objects paint over earlier");
            }
        }
    }

    #[test]
    fn unsupported_objects_are_reported_and_skipped() {
        let doc = document(vec![
            placed(ObjectPayload::Unsupported {
                tag: "ImageObject".into(),
            }),
            placed(ObjectPayload::Shape(ShapeObject {
                shape_type: ShapeType::Other("Ellipse".into()),
                foreground: Color::BLACK,
            })),
            placed(text_object("Arial", "still here", Color::BLACK)),
        ]);

        let rendered = renderer().render(&doc, &HashMap::new()).unwrap();
        assert_eq!(
            rendered.warnings,
            vec![
                RenderWarning::UnsupportedObjectType {
                    index: 0,
                    tag: "ImageObject".into()
                },
                RenderWarning::UnsupportedShapeType {
                    index: 1,
                    shape_type: "Ellipse".into()
                },
            ]
        );
        assert!(rendered.pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn text_that_cannot_fit_is_a_warning() {
        let mut object = placed(text_object("Arial", "far too long for this box", Color::BLACK));
        if let ObjectPayload::Text(text) = &mut object.payload {
            text.overflow = OverflowMode::ShrinkToFit;
        }
        object.bounds.width = 100;
        let rendered = renderer()
            .render(&document(vec![object]), &HashMap::new())
            .unwrap();
        assert_eq!(
            rendered.warnings,
            vec![RenderWarning::TextCannotFit { index: 0 }]
        );
    }

    #[test]
    fn missing_font_is_fatal() {
        let doc = document(vec![placed(text_object(
            "Wingdings Imaginary",
            "x",
            Color::BLACK,
        ))]);
        let err = renderer().render(&doc, &HashMap::new()).unwrap_err();
        assert!(matches!(err, LabelwerkError::FontNotFound { family, .. } if family == "Wingdings Imaginary"));
    }

    #[test]
    fn fallback_family_is_substituted() {
        let config = RenderConfig {
            fallback_family: Some("Arial".into()),
            ..RenderConfig::builtin_only()
        };
        let doc = document(vec![placed(text_object(
            "Wingdings Imaginary",
            "x",
            Color::BLACK,
        ))]);
        let rendered = LabelRenderer::new(config)
            .render(&doc, &HashMap::new())
            .unwrap();
        assert!(rendered.warnings.is_empty());
    }

    #[test]
    fn empty_text_objects_render_nothing() {
        let doc = document(vec![placed(ObjectPayload::Text(TextObject {
            foreground: Color::BLACK,
            background: Some(Color::BLACK),
            verticalized: false,
            horizontal_align: HorizontalAlign::Left,
            vertical_align: VerticalAlign::Top,
            overflow: OverflowMode::Truncate,
            field_name: None,
            runs: Vec::new(),
        }))]);
        let (emitter, warnings) = renderer().paint(&doc, &HashMap::new()).unwrap();
        assert!(warnings.is_empty());
        assert!(emitter.ops().is_empty());
    }

    #[test]
    fn accented_merge_values_print_in_the_standard_font() {
        let mut fields = HashMap::new();
        fields.insert("GREETING".to_string(), "Café Zoë".to_string());
        let rendered = renderer().render_xml(HELLO_LABEL, &fields).unwrap();
        assert!(rendered.warnings.is_empty());
        assert_eq!(shown_strings(&rendered.pdf), vec![b"Caf\xE9 Zo\xEB".to_vec()]);
    }

    #[test]
    fn characters_outside_the_standard_font_are_reported() {
        let doc = document(vec![
            placed(text_object("Arial", "ok", Color::BLACK)),
            placed(text_object("Arial", "Tokyo \u{6771}\u{4eac}", Color::BLACK)),
        ]);
        let (emitter, warnings) = renderer().paint(&doc, &HashMap::new()).unwrap();
        assert_eq!(
            warnings,
            vec![RenderWarning::MissingGlyphs {
                index: 1,
                characters: "\u{6771}\u{4eac}".into(),
            }]
        );
        assert_eq!(written_text(emitter.ops()), vec!["ok", "Tokyo ??"]);
    }

    #[test]
    fn every_paper_size_sets_the_media_box() {
        for (name, width, height) in PAPER_SIZES {
            let xml = format!(
                r#"<DieCutLabel Version="8.0" Units="twips"><PaperName>{name}</PaperName></DieCutLabel>"#
            );
            let rendered = renderer().render_xml(&xml, &HashMap::new()).unwrap();
            assert_eq!(
                (rendered.paper_width_pt, rendered.paper_height_pt),
                (*width, *height),
                "{name}"
            );
            let media = media_box(&rendered.pdf);
            assert!((media[2] - media[0] - width).abs() < 0.1, "{name}: {media:?}");
            assert!((media[3] - media[1] - height).abs() < 0.1, "{name}: {media:?}");
        }
    }

    #[test]
    fn labels_render_through_an_embedded_font() {
        let Some(data) = system_test_font() else {
            eprintln!("no TrueType font installed, skipping");
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Arial.ttf"), data).unwrap();
        let config = RenderConfig {
            font_dirs: vec![dir.path().to_path_buf()],
            ..RenderConfig::default()
        };

        let (emitter, warnings) = LabelRenderer::new(config)
            .paint(&parse_label(HELLO_LABEL).unwrap(), &HashMap::new())
            .unwrap();
        assert!(warnings.is_empty());
        let written = emitter
            .ops()
            .iter()
            .filter(|op| matches!(op, Op::WriteText { .. }))
            .count();
        assert_eq!(written, 1);
        assert!(written_text(emitter.ops()).is_empty());
        assert!(emitter.finish().starts_with(b"%PDF"));
    }

    #[test]
    fn malformed_document_is_fatal() {
        let err = renderer()
            .render_xml("<DieCutLabel>", &HashMap::new())
            .unwrap_err();
        assert!(matches!(err, LabelwerkError::DocumentParse(_)));
    }
}
