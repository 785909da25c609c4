// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF standard-14 font metrics and the label-family compatibility table.
//
// Standard fonts are written with WinAnsiEncoding (Windows-1252). Widths are
// the Adobe AFM advance widths (1000 units per em) indexed by WinAnsi code
// from 0x20 to 0xFF. A character with no WinAnsi code is drawn as `?` and
// measured as one.

use encoding_rs::WINDOWS_1252;
use printpdf::BuiltinFont;

/// Byte drawn in place of a character the encoding cannot express.
pub const REPLACEMENT_BYTE: u8 = b'?';

/// Metrics for one standard PDF font, in 1/1000 em.
#[derive(Debug)]
pub struct StandardMetrics {
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
    /// Advances for WinAnsi codes 0x20..=0xFF.
    widths: &'static [u16; 224],
}

impl StandardMetrics {
    /// Advance of `c` as it will be drawn.
    pub fn advance(&self, c: char) -> u16 {
        let byte = win_ansi_byte(c).unwrap_or(REPLACEMENT_BYTE);
        self.widths[usize::from(byte - 0x20)]
    }
}

/// WinAnsi code for a printable character, if it has one.
pub fn win_ansi_byte(c: char) -> Option<u8> {
    let mut buf = [0u8; 4];
    let (bytes, _, unmappable) = WINDOWS_1252.encode(c.encode_utf8(&mut buf));
    match bytes.as_ref() {
        [byte] if !unmappable && is_printable_win_ansi(*byte) => Some(*byte),
        _ => None,
    }
}

/// Codes with a glyph in the standard fonts. 0x7F and the five holes in
/// 0x80..=0x9F are unassigned.
fn is_printable_win_ansi(byte: u8) -> bool {
    matches!(byte, 0x20..=0x7E | 0x80..=0xFF) && !matches!(byte, 0x81 | 0x8D | 0x8F | 0x90 | 0x9D)
}

/// `text` as WinAnsi bytes, one per character.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| win_ansi_byte(c).unwrap_or(REPLACEMENT_BYTE))
        .collect()
}

/// Characters of `text` without a WinAnsi code, first occurrence order.
pub fn unencodable_chars(text: &str) -> Vec<char> {
    let mut missing: Vec<char> = Vec::new();
    for c in text.chars() {
        if win_ansi_byte(c).is_none() && !missing.contains(&c) {
            missing.push(c);
        }
    }
    missing
}

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 224] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~ (0x7F unassigned)
    334, 260, 334, 584, 350,
    // 0x80-0x8F: € _ ‚ ƒ „ … † ‡ ˆ ‰ Š ‹ Œ _ Ž _
    556, 350, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 350, 611, 350,
    // 0x90-0x9F: _ ‘ ’ “ ” • – — ˜ ™ š › œ _ ž Ÿ
    350, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 350, 500, 667,
    // 0xA0-0xAF
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    // 0xB0-0xBF
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    // 0xC0-0xCF: À-Å Æ Ç È-Ë Ì-Ï
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    // 0xD0-0xDF: Ð Ñ Ò-Ö × Ø Ù-Ü Ý Þ ß
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    // 0xE0-0xEF: à-å æ ç è-ë ì-ï
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    // 0xF0-0xFF: ð ñ ò-ö ÷ ø ù-ü ý þ ÿ
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

const COURIER_WIDTHS: [u16; 224] = [600; 224];

pub static HELVETICA: StandardMetrics = StandardMetrics {
    ascender: 718,
    descender: -207,
    line_gap: 231,
    widths: &HELVETICA_WIDTHS,
};

pub static COURIER: StandardMetrics = StandardMetrics {
    ascender: 629,
    descender: -157,
    line_gap: 269,
    widths: &COURIER_WIDTHS,
};

/// Label font families that map onto a standard PDF font.
const COMPATIBILITY_TABLE: &[(&str, BuiltinFont)] = &[
    ("Arial", BuiltinFont::Helvetica),
    ("Helvetica", BuiltinFont::Helvetica),
    ("Courier New", BuiltinFont::Courier),
    ("Courier", BuiltinFont::Courier),
];

/// Standard font for a label family, if the table knows it.
pub fn builtin_for_family(family: &str) -> Option<(BuiltinFont, &'static StandardMetrics)> {
    let family = family.trim();
    COMPATIBILITY_TABLE
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(family))
        .map(|(_, font)| (*font, metrics_for(*font)))
}

fn metrics_for(font: BuiltinFont) -> &'static StandardMetrics {
    match font {
        BuiltinFont::Courier => &COURIER,
        _ => &HELVETICA,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arial_maps_to_helvetica() {
        let (font, metrics) = builtin_for_family("arial").unwrap();
        assert!(matches!(font, BuiltinFont::Helvetica));
        assert_eq!(metrics.ascender, 718);
    }

    #[test]
    fn courier_new_is_monospaced() {
        let (_, metrics) = builtin_for_family("Courier New").unwrap();
        assert_eq!(metrics.advance('i'), metrics.advance('W'));
        assert_eq!(metrics.advance('é'), 600);
        assert_eq!(metrics.advance('\u{4e2d}'), 600);
    }

    #[test]
    fn unknown_family_is_not_substituted() {
        assert!(builtin_for_family("Comic Sans MS").is_none());
    }

    #[test]
    fn helvetica_widths_line_up_with_characters() {
        assert_eq!(HELVETICA.advance(' '), 278);
        assert_eq!(HELVETICA.advance('0'), 556);
        assert_eq!(HELVETICA.advance('@'), 1015);
        assert_eq!(HELVETICA.advance('W'), 944);
        assert_eq!(HELVETICA.advance('i'), 222);
        assert_eq!(HELVETICA.advance('~'), 584);
    }

    #[test]
    fn latin1_and_windows_1252_characters_have_codes() {
        assert_eq!(win_ansi_byte('A'), Some(0x41));
        assert_eq!(win_ansi_byte('é'), Some(0xE9));
        assert_eq!(win_ansi_byte('€'), Some(0x80));
        assert_eq!(win_ansi_byte('—'), Some(0x97));
        assert_eq!(win_ansi_byte('ÿ'), Some(0xFF));
        assert_eq!(win_ansi_byte('\u{0081}'), None);
        assert_eq!(win_ansi_byte('\n'), None);
        assert_eq!(win_ansi_byte('\u{4e2d}'), None);
    }

    #[test]
    fn text_encodes_one_byte_per_character() {
        assert_eq!(encode_win_ansi("Café €5"), b"Caf\xE9 \x805".to_vec());
        assert_eq!(encode_win_ansi("a\u{4e2d}b"), b"a?b".to_vec());
        assert_eq!(unencodable_chars("x\u{4e2d}y\u{4e2d}\u{1F600}"), vec!['\u{4e2d}', '\u{1F600}']);
        assert!(unencodable_chars("Zoë Ødegård").is_empty());
    }

    #[test]
    fn accented_characters_measure_like_their_glyphs() {
        assert_eq!(HELVETICA.advance('é'), 556);
        assert_eq!(HELVETICA.advance('É'), 667);
        assert_eq!(HELVETICA.advance('ß'), 611);
        assert_eq!(HELVETICA.advance('€'), 556);
        assert_eq!(HELVETICA.advance('\u{4e2d}'), HELVETICA.advance('?'));
    }
}
