//! Built-in highlighters.

use std::sync::{Arc, Mutex};

use crate::handler::{CodeBlockHandler, HighlightFuture, spawn_blocking};
use crate::{Error, Result};

/// Grammar used when the requested one is not available.
///
/// arborium ships no loadable F# grammar; OCaml is the closest ML dialect.
pub const DEFAULT_FALLBACK_LANGUAGE: &str = "ocaml";

/// Tree-sitter highlighting through arborium.
///
/// arborium's highlighter needs `&mut self`, so calls are serialized through
/// a mutex and run on the blocking pool. When a grammar is missing for the
/// requested language the handler retries once with `fallback_language`
/// ([`DEFAULT_FALLBACK_LANGUAGE`] unless changed).
pub struct ArboriumHandler {
    highlighter: Arc<Mutex<arborium::Highlighter>>,
    fallback_language: Option<String>,
}

impl ArboriumHandler {
    pub fn new() -> Self {
        Self {
            highlighter: Arc::new(Mutex::new(arborium::Highlighter::new())),
            fallback_language: Some(DEFAULT_FALLBACK_LANGUAGE.to_string()),
        }
    }

    pub fn with_fallback(mut self, language: impl Into<String>) -> Self {
        self.fallback_language = Some(language.into());
        self
    }

    pub fn without_fallback(mut self) -> Self {
        self.fallback_language = None;
        self
    }
}

fn highlight_with(
    highlighter: &Mutex<arborium::Highlighter>,
    language: &str,
    fallback: Option<&str>,
    code: &str,
) -> Result<String> {
    let mut hl = highlighter.lock().map_err(|_| Error::Highlight {
        language: language.to_string(),
        message: "highlighter lock poisoned".to_string(),
    })?;

    match hl.highlight(language, code) {
        Ok(html) => Ok(html),
        Err(primary) => match fallback {
            Some(fallback) if fallback != language => {
                hl.highlight(fallback, code).map_err(|e| Error::Highlight {
                    language: language.to_string(),
                    message: format!("{primary}; fallback '{fallback}': {e}"),
                })
            }
            _ => Err(Error::Highlight {
                language: language.to_string(),
                message: primary.to_string(),
            }),
        },
    }
}

impl Default for ArboriumHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeBlockHandler for ArboriumHandler {
    fn highlight<'a>(&'a self, language: &'a str, code: &'a str) -> HighlightFuture<'a> {
        let highlighter = Arc::clone(&self.highlighter);
        let fallback = self.fallback_language.clone();
        let lang = language.to_string();
        let code = code.to_string();
        spawn_blocking(language, move || {
            highlight_with(&highlighter, &lang, fallback.as_deref(), &code)
        })
    }
}
