//! Splicing highlighted code back into rendered HTML.
//!
//! The HTML renderer emits a fenced block tagged `lang` as
//! `<pre><code class="language-lang">ESCAPED</code></pre>`. A [`CodeRegion`]
//! is one such span. Its escaped content is decoded, handed to a
//! [`CodeBlockHandler`], and the result replaces the content between the
//! markers. Everything outside the regions is copied through byte for byte,
//! and a block whose highlighting fails keeps the content it was rendered with.

use std::time::Duration;

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::Error;
use crate::escape::{escape_html, unescape_html};
use crate::handler::CodeBlockHandler;

pub const CLOSING_MARKER: &str = "</code></pre>";

/// The opening marker the renderer emits for a block tagged `language`.
pub fn opening_marker(language: &str) -> String {
    format!(r#"<pre><code class="language-{}">"#, escape_html(language))
}

/// A fenced code block found in rendered HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRegion {
    /// Offset of the opening marker
    pub start: usize,
    /// Offset just past the closing marker
    pub end: usize,
    /// Content between the markers, as the renderer escaped it
    pub escaped: String,
    /// Source text between the markers, unescaped
    pub code: String,
}

/// Options for the splice pass.
#[derive(Debug, Clone, Default)]
pub struct SpliceOptions {
    /// Give up on a single block after this long and use the plain source.
    pub timeout: Option<Duration>,
}

/// Find the first code region for `language` in `html`.
///
/// Returns `None` when there is no opening marker, and also when an opening
/// marker is never closed: a truncated block is left as it is.
pub fn find_region(html: &str, language: &str) -> Option<CodeRegion> {
    let open = opening_marker(language);
    let start = html.find(&open)?;
    let code_start = start + open.len();
    let code_end = code_start + html[code_start..].find(CLOSING_MARKER)?;

    let escaped = &html[code_start..code_end];

    Some(CodeRegion {
        start,
        end: code_end + CLOSING_MARKER.len(),
        escaped: escaped.to_string(),
        code: unescape_html(escaped),
    })
}

/// All code regions for `language`, left to right, with offsets into `html`.
pub fn find_regions(html: &str, language: &str) -> Vec<CodeRegion> {
    let mut regions = Vec::new();
    let mut offset = 0;
    while let Some(mut region) = find_region(&html[offset..], language) {
        region.start += offset;
        region.end += offset;
        offset = region.end;
        regions.push(region);
    }
    regions
}

/// Highlight every `language` block in `html`, one block at a time.
///
/// Each search runs on the suffix left after the previous splice, and block
/// `k` is not submitted until block `k - 1` has been spliced.
pub async fn highlight_regions(
    html: &str,
    language: &str,
    handler: &dyn CodeBlockHandler,
    options: &SpliceOptions,
) -> String {
    let open = opening_marker(language);
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    let mut spliced = 0usize;

    while let Some(region) = find_region(rest, language) {
        let highlighted = highlight_or_plain(handler, language, &region, options).await;
        out.push_str(&rest[..region.start]);
        out.push_str(&open);
        out.push_str(&highlighted);
        out.push_str(CLOSING_MARKER);
        rest = &rest[region.end..];
        spliced += 1;
    }
    out.push_str(rest);

    debug!(language, blocks = spliced, "spliced code blocks");
    out
}

/// Like [`highlight_regions`], but submits every block at once.
///
/// Regions are collected up front with their original offsets, all highlight
/// calls run concurrently, and results are spliced back in document order.
/// The output is identical to the sequential pass.
pub async fn highlight_regions_concurrent(
    html: &str,
    language: &str,
    handler: &dyn CodeBlockHandler,
    options: &SpliceOptions,
) -> String {
    let regions = find_regions(html, language);
    if regions.is_empty() {
        return html.to_string();
    }

    let highlighted = join_all(
        regions
            .iter()
            .map(|region| highlight_or_plain(handler, language, region, options)),
    )
    .await;

    let open = opening_marker(language);
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;
    for (region, markup) in regions.iter().zip(&highlighted) {
        out.push_str(&html[cursor..region.start]);
        out.push_str(&open);
        out.push_str(markup);
        out.push_str(CLOSING_MARKER);
        cursor = region.end;
    }
    out.push_str(&html[cursor..]);

    debug!(language, blocks = regions.len(), "spliced code blocks concurrently");
    out
}

async fn highlight_or_plain(
    handler: &dyn CodeBlockHandler,
    language: &str,
    region: &CodeRegion,
    options: &SpliceOptions,
) -> String {
    let code = region.code.as_str();
    let result = match options.timeout {
        Some(limit) => tokio::time::timeout(limit, handler.highlight(language, code))
            .await
            .unwrap_or_else(|_| {
                Err(Error::HighlightTimeout {
                    language: language.to_string(),
                    elapsed: limit,
                })
            }),
        None => handler.highlight(language, code).await,
    };

    match result {
        Ok(html) => html,
        Err(e) => {
            warn!(language, error = %e, "highlighting failed, using plain code");
            region.escaped.clone()
        }
    }
}
