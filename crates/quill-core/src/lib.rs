//! quill-core - markdown to HTML for documentation sites
//!
//! This crate provides the rendering pipeline behind quill:
//! - Parsing markdown into a mutable token tree ([`token`])
//! - Giving every heading a unique, stable anchor ([`slugify`], [`SlugRegistry`], [`AnchorInjector`])
//! - Re-highlighting fenced code blocks of chosen languages through an
//!   asynchronous highlighter, spliced back in document order ([`splice`])
//!
//! # Features
//!
//! - `highlight` (default) - Enable [`ArboriumHandler`], tree-sitter highlighting via `arborium`
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use quill_core::{PlainHandler, RenderOptions, render};
//!
//! let options = RenderOptions::default().with_handler(Arc::new(PlainHandler));
//! let markdown = "# Intro\n\n```fsharp\nlet x = 1\n```\n\n# Intro\n";
//!
//! let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let doc = runtime.block_on(render(markdown, &options)).unwrap();
//!
//! assert!(doc.html.contains(r#"id="intro""#));
//! assert_eq!(doc.headings[1].slug, "intro-2");
//! ```
//!
//! # Custom highlighters
//!
//! Anything implementing [`CodeBlockHandler`] can be plugged in. A failing
//! handler never fails the render: the block falls back to its escaped
//! source text.

pub mod anchor;
pub mod escape;
pub mod handler;
#[cfg(feature = "highlight")]
mod handlers;
pub mod render;
mod slug;
pub mod splice;
pub mod token;

use std::time::Duration;

pub use anchor::{AnchorInjector, AnchorOptions, Heading};
pub use handler::{BoxedHandler, CodeBlockHandler, HighlightFuture, PlainHandler, spawn_blocking};
pub use render::{DEFAULT_LANGUAGE, Document, RenderOptions, render, render_html};
pub use slug::{SlugRegistry, slugify};
pub use splice::{CodeRegion, SpliceOptions};
pub use token::{ParseOptions, Token};

#[cfg(feature = "highlight")]
pub use handlers::{ArboriumHandler, DEFAULT_FALLBACK_LANGUAGE};

/// Error type for quill-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The event stream could not be folded into a token tree
    #[error("markdown parse error: {0}")]
    Parse(String),

    /// A highlighter could not handle a code block
    #[error("highlighting '{language}' failed: {message}")]
    Highlight { language: String, message: String },

    /// A highlighter did not answer in time
    #[error("highlighting '{language}' timed out after {elapsed:?}")]
    HighlightTimeout { language: String, elapsed: Duration },
}

/// Result type alias for quill-core operations.
pub type Result<T> = std::result::Result<T, Error>;
