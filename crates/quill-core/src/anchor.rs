//! Heading anchor injection.

use pulldown_cmark::{Event, Tag};
use serde::Serialize;

use crate::escape::escape_html;
use crate::slug::{SlugRegistry, slugify};
use crate::token::Token;

/// A heading seen while injecting anchors, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    /// 1 for `#`, 6 for `######`
    pub level: usize,
    /// Aggregated text of the heading's text and inline-code tokens
    pub text: String,
    /// Unique slug, also the anchor's `id` and `href` fragment
    pub slug: String,
}

/// How anchors look and which headings get one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorOptions {
    /// Link text shown inside the anchor (raw HTML)
    pub symbol: String,
    /// Class on the `<span>` carrying the id
    pub class: String,
    /// Headings shallower than this level are left alone
    pub min_level: usize,
}

impl Default for AnchorOptions {
    fn default() -> Self {
        Self {
            symbol: "#".to_string(),
            class: "anchor".to_string(),
            min_level: 1,
        }
    }
}

/// Adds a permalink anchor to every selected heading in a token tree.
///
/// Each injector owns its own [`SlugRegistry`], so one injector must be used
/// for exactly one document.
pub struct AnchorInjector {
    options: AnchorOptions,
    registry: SlugRegistry,
    headings: Vec<Heading>,
}

impl AnchorInjector {
    pub fn new(options: AnchorOptions) -> Self {
        Self {
            options,
            registry: SlugRegistry::new(),
            headings: Vec::new(),
        }
    }

    /// Walk `tokens` in document order and prepend an anchor to each heading.
    ///
    /// The anchor is inserted as the heading's first inline child, so the
    /// heading keeps its level, attributes and text.
    pub fn inject(&mut self, tokens: &mut [Token<'_>]) {
        for token in tokens.iter_mut() {
            let heading_level = match token {
                Token::Container {
                    tag: Tag::Heading { level, .. },
                    ..
                } => Some(*level as usize),
                _ => None,
            };

            match heading_level {
                Some(level) if level >= self.options.min_level => {
                    self.anchor_heading(token, level);
                }
                Some(_) => {}
                None => {
                    if let Token::Container { children, .. } = token {
                        self.inject(children);
                    }
                }
            }
        }
    }

    fn anchor_heading(&mut self, token: &mut Token<'_>, level: usize) {
        let text = token.text();
        let slug = self.registry.reserve(&slugify(&text));
        let markup = self.permalink(&slug);

        if let Token::Container { children, .. } = token {
            children.insert(0, Token::Leaf(Event::InlineHtml(markup.into())));
        }
        self.headings.push(Heading { level, text, slug });
    }

    fn permalink(&self, slug: &str) -> String {
        let slug = escape_html(slug);
        format!(
            r##"<a href="#{slug}" aria-hidden="true"><span class="{class}" id="{slug}"></span>{symbol}</a> "##,
            class = escape_html(&self.options.class),
            symbol = self.options.symbol,
        )
    }

    /// Headings seen so far, in document order.
    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    pub fn into_headings(self) -> Vec<Heading> {
        self.headings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{ParseOptions, into_events, parse};

    fn render(markdown: &str, options: AnchorOptions) -> (String, Vec<Heading>) {
        let mut tokens = parse(markdown, &ParseOptions::default()).unwrap();
        let mut injector = AnchorInjector::new(options);
        injector.inject(&mut tokens);
        let mut html = String::new();
        pulldown_cmark::html::push_html(&mut html, into_events(tokens).into_iter());
        (html, injector.into_headings())
    }

    #[test]
    fn injects_anchor_before_heading_text() {
        let (html, headings) = render("# Hello World!\n", AnchorOptions::default());
        assert_eq!(
            html,
            "<h1><a href=\"#hello-world\" aria-hidden=\"true\"><span class=\"anchor\" id=\"hello-world\"></span>#</a> Hello World!</h1>\n"
        );
        assert_eq!(
            headings,
            vec![Heading {
                level: 1,
                text: "Hello World!".to_string(),
                slug: "hello-world".to_string(),
            }]
        );
    }

    #[test]
    fn duplicate_headings_get_suffixes_in_order() {
        let (html, headings) = render(
            "# Intro\n\n## Intro\n\ntext\n\n### Intro\n",
            AnchorOptions::default(),
        );
        let slugs: Vec<&str> = headings.iter().map(|h| h.slug.as_str()).collect();
        assert_eq!(slugs, ["intro", "intro-2", "intro-3"]);
        let first = html.find(r#"id="intro""#).unwrap();
        let second = html.find(r#"id="intro-2""#).unwrap();
        let third = html.find(r#"id="intro-3""#).unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn heading_text_includes_code_and_emphasis_text() {
        let (_, headings) = render(
            "## Decode `Json` *values*\n",
            AnchorOptions::default(),
        );
        assert_eq!(headings[0].text, "Decode Json values");
        assert_eq!(headings[0].slug, "decode-json-values");
        assert_eq!(headings[0].level, 2);
    }

    #[test]
    fn headings_without_text_share_the_empty_base() {
        let (html, headings) = render(
            "# <span></span>\n\n# !!!\n",
            AnchorOptions::default(),
        );
        assert_eq!(headings[0].slug, "");
        assert_eq!(headings[1].slug, "-2");
        assert!(html.contains(r##"<a href="#-2" aria-hidden="true"><span class="anchor" id="-2">"##));
    }

    #[test]
    fn headings_in_nested_blocks_are_anchored() {
        let (_, headings) = render(
            "> # Quoted\n\n- item\n\n  ## In list\n",
            AnchorOptions::default(),
        );
        let slugs: Vec<&str> = headings.iter().map(|h| h.slug.as_str()).collect();
        assert_eq!(slugs, ["quoted", "in-list"]);
    }

    #[test]
    fn min_level_skips_shallow_headings() {
        let options = AnchorOptions {
            min_level: 2,
            ..AnchorOptions::default()
        };
        let (html, headings) = render("# Title\n\n## Section\n", options);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].slug, "section");
        assert!(html.contains("<h1>Title</h1>"));
    }

    #[test]
    fn custom_symbol_and_class() {
        let options = AnchorOptions {
            symbol: "🔗".to_string(),
            class: "header-anchor".to_string(),
            min_level: 1,
        };
        let (html, _) = render("# Primitives decoders\n", options);
        assert!(html.contains(
            r##"<a href="#primitives-decoders" aria-hidden="true"><span class="header-anchor" id="primitives-decoders"></span>🔗</a> Primitives decoders"##
        ));
    }
}
