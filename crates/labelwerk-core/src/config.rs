// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Render configuration. Passed explicitly to every render call.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LabelwerkError, Result};

/// Settings for a single render call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Ordered font directories; the first matching file wins.
    pub font_dirs: Vec<PathBuf>,
    /// Look for font files at all. When false only the built-in table applies.
    pub embed_fonts: bool,
    /// Family substituted when a requested family cannot be resolved.
    pub fallback_family: Option<String>,
    /// Title written to the PDF /Info dictionary.
    pub title: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_dirs: default_font_dirs(),
            embed_fonts: true,
            fallback_family: None,
            title: "Labelwerk Label".into(),
        }
    }
}

impl RenderConfig {
    /// A configuration that never reads the filesystem.
    pub fn builtin_only() -> Self {
        Self {
            font_dirs: Vec::new(),
            embed_fonts: false,
            ..Self::default()
        }
    }

    /// Load from a JSON file. Missing keys take their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self
            .fallback_family
            .as_ref()
            .is_some_and(|family| family.trim().is_empty())
        {
            return Err(LabelwerkError::Config(
                "fallback_family must not be blank".into(),
            ));
        }
        Ok(())
    }
}

/// Platform font directories, most specific first.
pub fn default_font_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    if cfg!(target_os = "macos") {
        dirs.push("/Library/Fonts".into());
        dirs.push("/System/Library/Fonts/Supplemental".into());
        dirs.push("/System/Library/Fonts".into());
    } else if cfg!(target_os = "windows") {
        dirs.push(r"C:\Windows\Fonts".into());
    } else {
        dirs.push("/usr/share/fonts/truetype/msttcorefonts".into());
        dirs.push("/usr/share/fonts/truetype".into());
        dirs.push("/usr/local/share/fonts".into());
        dirs.push("/usr/share/fonts".into());
    }
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_only_has_no_dirs() {
        let config = RenderConfig::builtin_only();
        assert!(config.font_dirs.is_empty());
        assert!(!config.embed_fonts);
        assert!(config.fallback_family.is_none());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.json");
        std::fs::write(&path, r#"{ "fallback_family": "Arial", "font_dirs": ["/opt/fonts"] }"#)
            .unwrap();

        let config = RenderConfig::from_json_file(&path).unwrap();
        assert_eq!(config.fallback_family.as_deref(), Some("Arial"));
        assert_eq!(config.font_dirs, vec![PathBuf::from("/opt/fonts")]);
        assert!(config.embed_fonts);
        assert_eq!(config.title, "Labelwerk Label");
    }

    #[test]
    fn blank_fallback_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.json");
        std::fs::write(&path, r#"{ "fallback_family": "  " }"#).unwrap();

        let err = RenderConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, LabelwerkError::Config(_)));
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = RenderConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, LabelwerkError::Serialization(_)));
    }
}
