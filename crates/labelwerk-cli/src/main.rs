// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Labelwerk — command-line label renderer.
//
// Entry point. Initialises logging, reads a label description, renders it, and
// writes the PDF.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use labelwerk_core::RenderConfig;
use labelwerk_core::error::Result;
use labelwerk_document::render_label;

#[derive(Debug, Parser)]
#[command(name = "labelwerk", version, about = "Render die-cut label XML to PDF")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a label description to a single-page PDF.
    Render {
        /// Label XML file.
        label: PathBuf,
        /// Output PDF path.
        #[arg(short, long, default_value = "out.pdf")]
        output: PathBuf,
        /// Merge-field override, NAME=VALUE. Repeatable.
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
        /// JSON render configuration.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Family to use when a requested font cannot be found.
        #[arg(long)]
        fallback_font: Option<String>,
        /// Font directory searched before the configured ones. Repeatable.
        #[arg(long = "font-dir")]
        font_dirs: Vec<PathBuf>,
    },
}

fn parse_field(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected NAME=VALUE, got {raw:?}"))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "render failed");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Render {
            label,
            output,
            fields,
            config,
            fallback_font,
            font_dirs,
        } => {
            let mut config = match config {
                Some(path) => RenderConfig::from_json_file(path)?,
                None => RenderConfig::default(),
            };
            if fallback_font.is_some() {
                config.fallback_family = fallback_font;
            }
            if !font_dirs.is_empty() {
                let mut dirs = font_dirs;
                dirs.append(&mut config.font_dirs);
                config.font_dirs = dirs;
            }
            config.validate()?;

            let xml = std::fs::read_to_string(&label)?;
            let fields: HashMap<String, String> = fields.into_iter().collect();

            let rendered = render_label(&xml, &fields, config)?;
            for warning in &rendered.warnings {
                tracing::warn!(object = warning.object_index(), %warning, "label object warning");
            }

            std::fs::write(&output, &rendered.pdf)?;
            tracing::info!(
                output = %output.display(),
                orientation = ?rendered.orientation,
                width_pt = rendered.paper_width_pt,
                height_pt = rendered.paper_height_pt,
                "Wrote label PDF"
            );
            Ok(())
        }
    }
}
