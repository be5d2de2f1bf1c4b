//! quill - render markdown documentation to HTML
//!
//! The library half of the `quill` binary: config loading, output formats,
//! and rendering a file from disk with [`quill_core`].

pub mod config;
pub mod output;

use std::path::Path;

use eyre::{Result, WrapErr};
use quill_core::{Document, RenderOptions};

/// Read and render one markdown file.
pub async fn render_file(path: &Path, options: &RenderOptions) -> Result<Document> {
    let markdown = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;

    quill_core::render(&markdown, options)
        .await
        .wrap_err_with(|| format!("Failed to render {}", path.display()))
}
