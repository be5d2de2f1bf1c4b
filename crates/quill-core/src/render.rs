//! The rendering pipeline: markdown in, HTML out.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::Result;
use crate::anchor::{AnchorInjector, AnchorOptions, Heading};
use crate::handler::BoxedHandler;
use crate::splice::{SpliceOptions, highlight_regions, highlight_regions_concurrent};
use crate::token::{self, ParseOptions};

/// Language re-highlighted by default.
pub const DEFAULT_LANGUAGE: &str = "fsharp";

/// Options for [`render`].
#[derive(Clone)]
pub struct RenderOptions {
    pub parse: ParseOptions,
    pub anchors: AnchorOptions,
    /// Fenced code languages to re-highlight, processed in this order.
    /// Repeats are ignored.
    pub languages: Vec<String>,
    /// Submit all blocks of a language at once instead of one by one
    pub concurrent: bool,
    /// Per-block highlight deadline; a late block is rendered plain
    pub highlight_timeout: Option<Duration>,
    /// Highlighter; `None` leaves code blocks as the renderer emitted them
    pub handler: Option<BoxedHandler>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            anchors: AnchorOptions::default(),
            languages: vec![DEFAULT_LANGUAGE.to_string()],
            concurrent: false,
            highlight_timeout: None,
            handler: default_handler(),
        }
    }
}

#[cfg(feature = "highlight")]
fn default_handler() -> Option<BoxedHandler> {
    Some(std::sync::Arc::new(
        crate::handlers::ArboriumHandler::new(),
    ))
}

#[cfg(not(feature = "highlight"))]
fn default_handler() -> Option<BoxedHandler> {
    None
}

impl RenderOptions {
    pub fn with_handler(mut self, handler: BoxedHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn without_highlighting(mut self) -> Self {
        self.handler = None;
        self
    }
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("parse", &self.parse)
            .field("anchors", &self.anchors)
            .field("languages", &self.languages)
            .field("concurrent", &self.concurrent)
            .field("highlight_timeout", &self.highlight_timeout)
            .field("handler", &self.handler.as_ref().map(|_| ".."))
            .finish()
    }
}

/// A rendered document.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub html: String,
    /// Anchored headings in document order
    pub headings: Vec<Heading>,
}

/// Render markdown to HTML with heading anchors and highlighted code.
///
/// Parsing, anchor injection and HTML rendering run synchronously; the only
/// suspension points are the highlight calls. Every call uses its own slug
/// registry, so concurrent renders of different documents never share slugs.
pub async fn render(markdown: &str, options: &RenderOptions) -> Result<Document> {
    let mut tokens = token::parse(markdown, &options.parse)?;

    let mut injector = AnchorInjector::new(options.anchors.clone());
    injector.inject(&mut tokens);
    let headings = injector.into_headings();

    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html, token::into_events(tokens).into_iter());

    if let Some(handler) = &options.handler {
        let splice = SpliceOptions {
            timeout: options.highlight_timeout,
        };
        // A second pass over the same language would re-highlight markup.
        let mut seen = HashSet::new();
        for language in options.languages.iter().filter(|l| seen.insert(l.as_str())) {
            html = if options.concurrent {
                highlight_regions_concurrent(&html, language, handler.as_ref(), &splice).await
            } else {
                highlight_regions(&html, language, handler.as_ref(), &splice).await
            };
        }
    }

    debug!(
        headings = headings.len(),
        bytes = html.len(),
        "rendered document"
    );
    Ok(Document { html, headings })
}

/// [`render`], keeping only the HTML.
pub async fn render_html(markdown: &str, options: &RenderOptions) -> Result<String> {
    Ok(render(markdown, options).await?.html)
}
