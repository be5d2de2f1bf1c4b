//! The boundary to the syntax highlighting engine.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::escape::escape_html;
use crate::{Error, Result};

/// Future returned by [`CodeBlockHandler::highlight`].
pub type HighlightFuture<'a> = Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

/// Produces highlighted HTML for the source text of one fenced code block.
///
/// `code` is the original, unescaped source. The returned markup replaces the
/// block's content between `<pre><code ...>` and `</code></pre>`, so it must
/// already be valid HTML. Returning an error is fine: the caller falls back
/// to the escaped source.
pub trait CodeBlockHandler: Send + Sync {
    fn highlight<'a>(&'a self, language: &'a str, code: &'a str) -> HighlightFuture<'a>;
}

/// Shared handle to a highlighter.
pub type BoxedHandler = Arc<dyn CodeBlockHandler>;

/// Run a synchronous highlighter on tokio's blocking pool.
///
/// The returned future suspends while `work` runs on another thread, so a
/// highlight deadline can fire and several blocks can be in flight at once.
/// A timed-out call is abandoned, not interrupted: `work` still runs to the end.
pub fn spawn_blocking<F>(language: &str, work: F) -> HighlightFuture<'static>
where
    F: FnOnce() -> Result<String> + Send + 'static,
{
    let language = language.to_string();
    Box::pin(async move {
        tokio::task::spawn_blocking(work)
            .await
            .map_err(|e| Error::Highlight {
                language,
                message: format!("highlighter task failed: {e}"),
            })?
    })
}

/// A handler that does no highlighting, only escaping.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainHandler;

impl CodeBlockHandler for PlainHandler {
    fn highlight<'a>(&'a self, _language: &'a str, code: &'a str) -> HighlightFuture<'a> {
        Box::pin(async move { Ok(escape_html(code)) })
    }
}
