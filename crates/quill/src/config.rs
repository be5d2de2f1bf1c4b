//! Configuration schema for quill
//!
//! Config lives at `.config/quill/config.yaml` relative to the working
//! directory. Every field is optional; anything left out keeps the renderer's
//! default.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use eyre::{Result, WrapErr};
use quill_core::{AnchorOptions, ArboriumHandler, DEFAULT_LANGUAGE, ParseOptions, RenderOptions};
use serde::Deserialize;
use tracing::info;

/// Default config location, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = ".config/quill/config.yaml";

/// Root configuration for quill
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Fenced code languages to re-highlight, e.g. `[fsharp, rust]`
    pub languages: Option<Vec<String>>,

    /// Link text of the heading permalink
    pub anchor_symbol: Option<String>,

    /// Class on the anchor target span
    pub anchor_class: Option<String>,

    /// Shallowest heading level that gets an anchor
    pub min_level: Option<usize>,

    /// Pass raw HTML in the markdown through untouched
    pub raw_html: Option<bool>,

    /// Highlight all blocks of a language at once
    pub concurrent: Option<bool>,

    /// Set to `false` to leave code blocks as plain escaped text
    pub highlight: Option<bool>,

    /// Grammar to retry with when a block's language has none (default: ocaml)
    pub fallback_language: Option<String>,

    /// Per-block highlight deadline in milliseconds
    pub highlight_timeout_ms: Option<u64>,

    pub extensions: Extensions,
}

/// Markdown syntax extensions
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Extensions {
    pub tables: Option<bool>,
    pub footnotes: Option<bool>,
    pub strikethrough: Option<bool>,
    pub tasklists: Option<bool>,
    pub smart_punctuation: Option<bool>,
}

impl Config {
    /// Parse a config from YAML text. An empty document is the default config.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Build render options. `no_highlight` overrides the `highlight` setting.
    pub fn to_render_options(&self, no_highlight: bool) -> RenderOptions {
        let parse_defaults = ParseOptions::default();
        let anchor_defaults = AnchorOptions::default();
        let ext = &self.extensions;

        let parse = ParseOptions {
            tables: ext.tables.unwrap_or(parse_defaults.tables),
            footnotes: ext.footnotes.unwrap_or(parse_defaults.footnotes),
            strikethrough: ext.strikethrough.unwrap_or(parse_defaults.strikethrough),
            tasklists: ext.tasklists.unwrap_or(parse_defaults.tasklists),
            smart_punctuation: ext
                .smart_punctuation
                .unwrap_or(parse_defaults.smart_punctuation),
            raw_html: self.raw_html.unwrap_or(parse_defaults.raw_html),
        };

        let anchors = AnchorOptions {
            symbol: self.anchor_symbol.clone().unwrap_or(anchor_defaults.symbol),
            class: self.anchor_class.clone().unwrap_or(anchor_defaults.class),
            min_level: self.min_level.unwrap_or(anchor_defaults.min_level),
        };

        let options = RenderOptions {
            parse,
            anchors,
            languages: self
                .languages
                .clone()
                .unwrap_or_else(|| vec![DEFAULT_LANGUAGE.to_string()]),
            concurrent: self.concurrent.unwrap_or(false),
            highlight_timeout: self.highlight_timeout_ms.map(Duration::from_millis),
            handler: None,
        };

        if no_highlight || self.highlight == Some(false) {
            return options;
        }

        let mut handler = ArboriumHandler::new();
        if let Some(fallback) = &self.fallback_language {
            handler = handler.with_fallback(fallback.clone());
        }
        options.with_handler(Arc::new(handler))
    }
}

/// Load the config at `path`. A missing file means defaults; a malformed one
/// is an error, since silently ignoring it could change every slug.
pub fn load(path: &Path) -> Result<Config> {
    if !path.exists() {
        info!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

    Config::from_yaml(&content)
        .wrap_err_with(|| format!("Failed to parse config file: {}", path.display()))
}
