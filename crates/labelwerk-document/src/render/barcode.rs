// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Barcode objects — QR codes via `qrcode`, Code 128 via `barcoders`.
//
// QR symbols use square modules sized to the shorter box axis and are centred
// on the other. Code 128 symbols fill the box height and keep a quiet zone of
// `QUIET_ZONE_MODULES` on each side.

use barcoders::sym::code128::Code128;
use labelwerk_core::{BarcodeObject, BarcodeType, Color, PointRect};
use qrcode::{EcLevel, QrCode};
use tracing::debug;

use crate::pdf::PageEmitter;

/// Minimum blank modules either side of a Code 128 symbol.
pub const QUIET_ZONE_MODULES: f32 = 10.0;

// barcoders selects the Code 128 character set with these marker characters.
const CODE128_SET_A: char = 'À';
const CODE128_SET_B: char = 'Ɓ';
const CODE128_SET_C: char = 'Ć';

/// Characters barcoders reads as set switches, FNC codes, shift, or its set B
/// stand-in for DEL. User text containing them would encode something else.
fn is_reserved_for_barcoders(c: char) -> bool {
    matches!(c, CODE128_SET_A | CODE128_SET_B | CODE128_SET_C | '\u{00F7}' | '\u{0179}'..='\u{017D}')
}

/// Why a barcode object was not drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarcodeSkip {
    UnsupportedType(String),
    Encoding(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code128Subset {
    Auto,
    A,
    B,
    C,
}

/// A square QR module grid, row-major, `true` = dark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    pub size: usize,
    pub dark: Vec<bool>,
}

/// Where a QR symbol lands in its box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixPlacement {
    pub module: f32,
    pub x: f32,
    pub top: f32,
    pub side: f32,
}

/// Where a linear symbol lands in its box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearPlacement {
    pub module: f32,
    pub x: f32,
    pub width: f32,
}

/// Encode `text` as a QR code at the lowest error-correction level.
pub fn encode_qr(text: &str) -> Result<QrMatrix, String> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::L)
        .map_err(|err| err.to_string())?;
    let size = code.width();
    let dark = code
        .to_colors()
        .into_iter()
        .map(|color| color == qrcode::Color::Dark)
        .collect();
    Ok(QrMatrix { size, dark })
}

/// Encode `text` as Code 128 modules (1 = bar), start to stop pattern.
pub fn encode_code128(text: &str, subset: Code128Subset) -> Result<Vec<u8>, String> {
    if text.is_empty() {
        return Err("barcode text is empty".into());
    }
    if let Some(c) = text.chars().find(|c| is_reserved_for_barcoders(*c)) {
        return Err(format!("character {c:?} is not valid Code 128 data"));
    }
    let data = match subset {
        Code128Subset::Auto => auto_subset_data(text),
        Code128Subset::A => format!("{CODE128_SET_A}{text}"),
        Code128Subset::B => format!("{CODE128_SET_B}{text}"),
        Code128Subset::C => format!("{CODE128_SET_C}{text}"),
    };
    let barcode = Code128::new(data).map_err(|err| err.to_string())?;
    Ok(barcode.encode())
}

/// Character set a single character forces, if any.
fn required_set(c: char) -> Option<char> {
    match c {
        '\x00'..='\x1f' => Some(CODE128_SET_A),
        '`' | 'a'..='z' | '{' | '|' | '}' | '~' => Some(CODE128_SET_B),
        _ => None,
    }
}

/// Insert character-set markers into `text`, switching sets as the data
/// requires.
///
/// Runs of four or more digits, or a text made only of digits, go in set C
/// two digits per symbol; an odd trailing digit falls back to A or B.
/// Control characters need set A and lowercase needs set B. Characters valid
/// in both stay in the current set, or take the set the next forcing
/// character needs (B when none follows).
pub fn auto_subset_data(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut data = String::with_capacity(text.len() + 4);
    let mut current: Option<char> = None;
    let mut index = 0;

    while index < chars.len() {
        let digits = chars[index..]
            .iter()
            .take_while(|c| c.is_ascii_digit())
            .count();
        let pairs = digits - digits % 2;
        let all_digits = index == 0 && digits == chars.len();
        if pairs >= 4 || (all_digits && pairs >= 2) {
            if current != Some(CODE128_SET_C) {
                data.push(CODE128_SET_C);
                current = Some(CODE128_SET_C);
            }
            data.extend(&chars[index..index + pairs]);
            index += pairs;
            continue;
        }

        let c = chars[index];
        let set = match required_set(c) {
            Some(set) => set,
            None => match current {
                Some(set) if set != CODE128_SET_C => set,
                _ => chars[index..]
                    .iter()
                    .find_map(|c| required_set(*c))
                    .unwrap_or(CODE128_SET_B),
            },
        };
        if current != Some(set) {
            data.push(set);
            current = Some(set);
        }
        data.push(c);
        index += 1;
    }
    data
}

/// Square modules sized to fit both axes, centred on the axis with slack.
pub fn place_matrix(modules: usize, rect: PointRect) -> MatrixPlacement {
    let count = modules.max(1) as f32;
    let module = (rect.width / count).min(rect.height / count);
    let side = module * count;
    MatrixPlacement {
        module,
        x: rect.x + (rect.width - side) / 2.0,
        top: rect.top - (rect.height - side) / 2.0,
        side,
    }
}

/// Module width for a linear symbol and its horizontal centring.
///
/// The symbol plus both quiet zones spans the box exactly, so the module is
/// `width / (modules + 2 * QUIET_ZONE_MODULES)`.
pub fn place_linear(modules: usize, rect: PointRect) -> LinearPlacement {
    let count = modules.max(1) as f32;
    let module = rect.width / (count + 2.0 * QUIET_ZONE_MODULES);
    let width = module * count;
    LinearPlacement {
        module,
        x: rect.x + (rect.width - width) / 2.0,
        width,
    }
}

/// Draw `barcode` in `rect`.
pub fn render_barcode_object(
    emitter: &mut PageEmitter,
    barcode: &BarcodeObject,
    rect: PointRect,
) -> Result<(), BarcodeSkip> {
    let subset = match &barcode.barcode_type {
        BarcodeType::QrCode => {
            let matrix = encode_qr(&barcode.text).map_err(BarcodeSkip::Encoding)?;
            draw_matrix(emitter, &matrix, rect, barcode.foreground);
            return Ok(());
        }
        BarcodeType::Code128Auto => Code128Subset::Auto,
        BarcodeType::Code128A => Code128Subset::A,
        BarcodeType::Code128B => Code128Subset::B,
        BarcodeType::Code128C => Code128Subset::C,
        BarcodeType::Other(name) => return Err(BarcodeSkip::UnsupportedType(name.clone())),
    };

    let modules = encode_code128(&barcode.text, subset).map_err(BarcodeSkip::Encoding)?;
    draw_linear(emitter, &modules, rect, barcode.foreground);
    Ok(())
}

fn draw_matrix(emitter: &mut PageEmitter, matrix: &QrMatrix, rect: PointRect, color: Color) {
    let placement = place_matrix(matrix.size, rect);
    for (row, cells) in matrix.dark.chunks(matrix.size.max(1)).enumerate() {
        let top = placement.top - row as f32 * placement.module;
        for (start, len) in dark_runs(cells.iter().copied()) {
            emitter.fill_rect(
                PointRect {
                    x: placement.x + start as f32 * placement.module,
                    top,
                    width: len as f32 * placement.module,
                    height: placement.module,
                },
                color,
            );
        }
    }
    debug!(
        modules = matrix.size,
        module_pt = placement.module,
        "QR symbol placed"
    );
}

fn draw_linear(emitter: &mut PageEmitter, modules: &[u8], rect: PointRect, color: Color) {
    let placement = place_linear(modules.len(), rect);
    for (start, len) in dark_runs(modules.iter().map(|m| *m == 1)) {
        emitter.fill_rect(
            PointRect {
                x: placement.x + start as f32 * placement.module,
                top: rect.top,
                width: len as f32 * placement.module,
                height: rect.height,
            },
            color,
        );
    }
    debug!(
        modules = modules.len(),
        module_pt = placement.module,
        "Code 128 symbol placed"
    );
}

/// (start, length) of each run of `true`.
fn dark_runs(cells: impl Iterator<Item = bool>) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start: Option<usize> = None;
    let mut last = 0;
    for (index, dark) in cells.enumerate() {
        match (dark, start) {
            (true, None) => start = Some(index),
            (false, Some(begin)) => {
                runs.push((begin, index - begin));
                start = None;
            }
            _ => {}
        }
        last = index + 1;
    }
    if let Some(begin) = start {
        runs.push((begin, last - begin));
    }
    runs
}
