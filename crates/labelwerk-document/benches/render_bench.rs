// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the labelwerk-document crate. Renders a typical
// address label with text, a rule, and both barcode families using only the
// built-in fonts, so results do not depend on the host's font directories.

use std::collections::HashMap;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use labelwerk_core::RenderConfig;
use labelwerk_document::{LabelRenderer, parse_label};

const SHIPPING_LABEL: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<DieCutLabel Version="8.0" Units="twips">
  <PaperOrientation>Landscape</PaperOrientation>
  <PaperName>30252 Address</PaperName>
  <ObjectInfo>
    <TextObject>
      <Name>ADDRESS</Name>
      <HorizontalAlignment>Left</HorizontalAlignment>
      <VerticalAlignment>Middle</VerticalAlignment>
      <TextFitMode>ShrinkToFit</TextFitMode>
      <StyledText>
        <Element>
          <String>Jane Example, 221B Baker Street, London</String>
          <Attributes><Font Family="Arial" Size="14" /></Attributes>
        </Element>
      </StyledText>
    </TextObject>
    <Bounds X="150" Y="100" Width="3000" Height="500" />
  </ObjectInfo>
  <ObjectInfo>
    <ShapeObject><ShapeType>HorizontalLine</ShapeType></ShapeObject>
    <Bounds X="150" Y="700" Width="4700" Height="20" />
  </ObjectInfo>
  <ObjectInfo>
    <BarcodeObject><Text>ORDER-000123</Text><Type>Code128Auto</Type></BarcodeObject>
    <Bounds X="150" Y="800" Width="3000" Height="700" />
  </ObjectInfo>
  <ObjectInfo>
    <BarcodeObject><Text>https://example.com/o/000123</Text><Type>QRCode</Type></BarcodeObject>
    <Bounds X="3600" Y="100" Width="1400" Height="1400" />
  </ObjectInfo>
</DieCutLabel>"#;

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_label (4 objects)", |b| {
        b.iter(|| black_box(parse_label(black_box(SHIPPING_LABEL)).unwrap()));
    });
}

fn bench_render(c: &mut Criterion) {
    let renderer = LabelRenderer::new(RenderConfig::builtin_only());
    let fields = HashMap::new();
    c.bench_function("render_xml (4 objects)", |b| {
        b.iter(|| {
            let rendered = renderer
                .render_xml(black_box(SHIPPING_LABEL), &fields)
                .unwrap();
            black_box(rendered.pdf);
        });
    });
}

criterion_group!(benches, bench_parse, bench_render);
criterion_main!(benches);
