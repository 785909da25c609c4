// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Font resolution — maps a label font family onto a concrete font.
//
// Search order: font files in the configured directories (first directory,
// first name variant, first extension wins), then the standard-font
// compatibility table. Nothing else is guessed; an unmatched family is
// `FontNotFound`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use labelwerk_core::RenderConfig;
use labelwerk_core::error::{LabelwerkError, Result};
use printpdf::BuiltinFont;
use tracing::{debug, instrument};

use super::builtin::{self, StandardMetrics};

/// File extensions tried for every candidate name, in order.
pub const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc", "TTF", "OTF"];

/// A resolved font plus the metrics needed for layout.
#[derive(Debug, Clone)]
pub enum FontHandle {
    Builtin {
        font: BuiltinFont,
        metrics: &'static StandardMetrics,
    },
    Embedded(Arc<EmbeddedFont>),
}

/// A font file loaded from disk.
#[derive(Debug)]
pub struct EmbeddedFont {
    pub family: String,
    pub path: PathBuf,
    pub data: Vec<u8>,
    units_per_em: f32,
    ascender: f32,
    descender: f32,
    line_gap: f32,
}

impl EmbeddedFont {
    /// Read and validate a TrueType/OpenType file.
    pub fn load(family: &str, path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|err| LabelwerkError::FontLoad {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        let face = ttf_parser::Face::parse(&data, 0).map_err(|err| LabelwerkError::FontLoad {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        let units_per_em = f32::from(face.units_per_em());
        let ascender = f32::from(face.ascender());
        let descender = f32::from(face.descender());
        let line_gap = f32::from(face.line_gap());

        Ok(Self {
            family: family.to_string(),
            path: path.to_path_buf(),
            data,
            units_per_em,
            ascender,
            descender,
            line_gap,
        })
    }
}

impl FontHandle {
    /// Advance widths in points for each character of `text`.
    pub fn char_widths(&self, text: &str, size: f32) -> Vec<f32> {
        match self {
            Self::Builtin { metrics, .. } => text
                .chars()
                .map(|c| f32::from(metrics.advance(c)) * size / 1000.0)
                .collect(),
            Self::Embedded(font) => {
                let scale = size / font.units_per_em;
                let fallback = font.units_per_em / 2.0;
                match ttf_parser::Face::parse(&font.data, 0) {
                    Ok(face) => text
                        .chars()
                        .map(|c| {
                            face.glyph_index(c)
                                .and_then(|glyph| face.glyph_hor_advance(glyph))
                                .map(f32::from)
                                .unwrap_or(fallback)
                                * scale
                        })
                        .collect(),
                    Err(_) => text.chars().map(|_| fallback * scale).collect(),
                }
            }
        }
    }

    /// Characters of `text` this font cannot draw, first occurrence order.
    ///
    /// Standard fonts draw these as `?`; embedded fonts draw `.notdef`.
    pub fn missing_chars(&self, text: &str) -> Vec<char> {
        match self {
            Self::Builtin { .. } => builtin::unencodable_chars(text),
            Self::Embedded(font) => {
                let Ok(face) = ttf_parser::Face::parse(&font.data, 0) else {
                    return Vec::new();
                };
                let mut missing: Vec<char> = Vec::new();
                for c in text.chars() {
                    if face.glyph_index(c).is_none() && !missing.contains(&c) {
                        missing.push(c);
                    }
                }
                missing
            }
        }
    }

    /// Width of `text` in points.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        self.char_widths(text, size).iter().sum()
    }

    /// Distance from baseline to ascender, in points.
    pub fn ascent(&self, size: f32) -> f32 {
        match self {
            Self::Builtin { metrics, .. } => f32::from(metrics.ascender) * size / 1000.0,
            Self::Embedded(font) => font.ascender * size / font.units_per_em,
        }
    }

    /// Depth of the descender below the baseline, as a positive length.
    pub fn descent(&self, size: f32) -> f32 {
        match self {
            Self::Builtin { metrics, .. } => f32::from(metrics.descender).abs() * size / 1000.0,
            Self::Embedded(font) => font.descender.abs() * size / font.units_per_em,
        }
    }

    /// Extra space between consecutive lines.
    pub fn line_gap(&self, size: f32) -> f32 {
        match self {
            Self::Builtin { metrics, .. } => f32::from(metrics.line_gap) * size / 1000.0,
            Self::Embedded(font) => font.line_gap * size / font.units_per_em,
        }
    }

    /// Height of one line of glyphs, ascender to descender.
    pub fn glyph_height(&self, size: f32) -> f32 {
        self.ascent(size) + self.descent(size)
    }

    /// Baseline-to-baseline distance.
    pub fn line_height(&self, size: f32) -> f32 {
        self.glyph_height(size) + self.line_gap(size)
    }
}

/// Resolves label font families against an ordered directory list.
///
/// Holds no mutable state, so one resolver can serve concurrent renders.
#[derive(Debug, Clone)]
pub struct FontResolver {
    dirs: Vec<PathBuf>,
    search_files: bool,
}

impl FontResolver {
    pub fn new(dirs: Vec<PathBuf>, search_files: bool) -> Self {
        Self { dirs, search_files }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.font_dirs.clone(), config.embed_fonts)
    }

    /// Resolve `family` to a font.
    #[instrument(skip(self))]
    pub fn resolve(&self, family: &str) -> Result<FontHandle> {
        let found = if self.search_files {
            self.find_font_file(family)
        } else {
            None
        };
        if let Some(path) = found {
            debug!(path = %path.display(), "Font file found");
            let font = EmbeddedFont::load(family, &path)?;
            return Ok(FontHandle::Embedded(Arc::new(font)));
        }

        if let Some((font, metrics)) = builtin::builtin_for_family(family) {
            debug!(?font, "Using standard PDF font");
            return Ok(FontHandle::Builtin { font, metrics });
        }

        Err(LabelwerkError::FontNotFound {
            family: family.to_string(),
            searched: if self.search_files {
                self.dirs.clone()
            } else {
                Vec::new()
            },
        })
    }

    /// First font file matching `family`, if any.
    pub fn find_font_file(&self, family: &str) -> Option<PathBuf> {
        let stems = candidate_stems(family);
        self.dirs.iter().find_map(|dir| {
            stems.iter().find_map(|stem| {
                FONT_EXTENSIONS
                    .iter()
                    .map(|ext| dir.join(format!("{stem}.{ext}")))
                    .find(|path| path.is_file())
            })
        })
    }
}

/// File-name variants for a family: as written, without spaces, and
/// lowercased without spaces ("Courier New", "CourierNew", "couriernew").
fn candidate_stems(family: &str) -> Vec<String> {
    let family = family.trim();
    let compact: String = family.chars().filter(|c| !c.is_whitespace()).collect();
    let mut stems = vec![family.to_string(), compact.clone(), compact.to_lowercase()];
    stems.dedup();
    stems
}
