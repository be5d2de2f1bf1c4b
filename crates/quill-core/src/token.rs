//! Owned token tree over pulldown-cmark's event stream.
//!
//! The parser yields a flat stream of `Start`/`End` pairs and leaf events.
//! Folding it into a tree lets passes such as anchor injection edit a
//! heading's children in place before the stream is handed to the HTML
//! renderer.

use pulldown_cmark::{Event, Options, Parser, Tag};

use crate::{Error, Result};

/// A node in the parsed document.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// A `Start(tag)` ... `End` pair and everything between them.
    Container { tag: Tag<'a>, children: Vec<Token<'a>> },
    /// Any event that is not a `Start` or `End`.
    Leaf(Event<'a>),
}

impl<'a> Token<'a> {
    /// Concatenated text of all descendant text and inline-code leaves, in order.
    ///
    /// Markup such as emphasis contributes only the text it wraps; raw HTML,
    /// breaks and other leaves contribute nothing.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Token::Leaf(Event::Text(text)) | Token::Leaf(Event::Code(text)) => out.push_str(text),
            Token::Leaf(_) => {}
            Token::Container { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }

    pub fn children(&self) -> &[Token<'a>] {
        match self {
            Token::Container { children, .. } => children,
            Token::Leaf(_) => &[],
        }
    }

    pub fn is_heading(&self) -> bool {
        matches!(
            self,
            Token::Container {
                tag: Tag::Heading { .. },
                ..
            }
        )
    }
}

/// Markdown extensions and raw HTML handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
    pub smart_punctuation: bool,
    /// Pass raw HTML through. When false it is rendered as escaped text.
    pub raw_html: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: false,
            strikethrough: true,
            tasklists: true,
            smart_punctuation: false,
            raw_html: true,
        }
    }
}

impl ParseOptions {
    fn cmark_options(&self) -> Options {
        let mut options = Options::empty();
        options.set(Options::ENABLE_TABLES, self.tables);
        options.set(Options::ENABLE_FOOTNOTES, self.footnotes);
        options.set(Options::ENABLE_STRIKETHROUGH, self.strikethrough);
        options.set(Options::ENABLE_TASKLISTS, self.tasklists);
        options.set(Options::ENABLE_SMART_PUNCTUATION, self.smart_punctuation);
        options
    }
}

/// Parse markdown into a token tree.
pub fn parse<'a>(markdown: &'a str, options: &ParseOptions) -> Result<Vec<Token<'a>>> {
    let raw_html = options.raw_html;
    let events = Parser::new_ext(markdown, options.cmark_options()).map(move |event| {
        if raw_html {
            return event;
        }
        match event {
            Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
            other => other,
        }
    });
    tokens_from_events(events)
}

/// Fold a balanced event stream into a token tree.
///
/// Fails with [`Error::Parse`] if an `End` has no matching `Start` or the
/// stream finishes with containers still open.
pub fn tokens_from_events<'a, I>(events: I) -> Result<Vec<Token<'a>>>
where
    I: IntoIterator<Item = Event<'a>>,
{
    let mut root = Vec::new();
    let mut open: Vec<(Tag<'a>, Vec<Token<'a>>)> = Vec::new();

    for event in events {
        match event {
            Event::Start(tag) => open.push((tag, Vec::new())),
            Event::End(end) => {
                let Some((tag, children)) = open.pop() else {
                    return Err(Error::Parse(format!("unexpected end of {end:?}")));
                };
                if tag.to_end() != end {
                    return Err(Error::Parse(format!(
                        "{end:?} closes {:?}",
                        tag.to_end()
                    )));
                }
                let token = Token::Container { tag, children };
                match open.last_mut() {
                    Some((_, siblings)) => siblings.push(token),
                    None => root.push(token),
                }
            }
            leaf => match open.last_mut() {
                Some((_, siblings)) => siblings.push(Token::Leaf(leaf)),
                None => root.push(Token::Leaf(leaf)),
            },
        }
    }

    if let Some((tag, _)) = open.last() {
        return Err(Error::Parse(format!("unclosed {:?}", tag.to_end())));
    }
    Ok(root)
}

/// Flatten a token tree back into the event stream the renderer consumes.
pub fn into_events(tokens: Vec<Token<'_>>) -> Vec<Event<'_>> {
    let mut events = Vec::new();
    push_events(tokens, &mut events);
    events
}

fn push_events<'a>(tokens: Vec<Token<'a>>, events: &mut Vec<Event<'a>>) {
    for token in tokens {
        match token {
            Token::Leaf(event) => events.push(event),
            Token::Container { tag, children } => {
                let end = tag.to_end();
                events.push(Event::Start(tag));
                push_events(children, events);
                events.push(Event::End(end));
            }
        }
    }
}
