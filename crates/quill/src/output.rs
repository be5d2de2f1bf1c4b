//! Output formatting for rendered documents

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use eyre::Result;
use quill_core::{Document, Heading};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The rendered HTML fragment
    #[default]
    Html,
    /// `{file, html, headings}` as JSON
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

#[derive(Serialize)]
struct RenderedFile<'a> {
    file: String,
    html: &'a str,
    headings: &'a [Heading],
}

/// Format a rendered document for output
pub fn format_document(file: &Path, doc: &Document, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Html => Ok(doc.html.clone()),
        OutputFormat::Json => {
            let rendered = RenderedFile {
                file: file.display().to_string(),
                html: &doc.html,
                headings: &doc.headings,
            };
            Ok(serde_json::to_string_pretty(&rendered)?)
        }
    }
}

/// Where the output for `input` goes inside an output directory
pub fn output_path(dir: &Path, input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "index".to_string());
    dir.join(format!("{stem}.{}", format.extension()))
}
