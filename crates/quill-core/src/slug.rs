//! Heading slugs.
//!
//! [`slugify`] turns heading text into a candidate slug, and a [`SlugRegistry`]
//! makes candidates unique within one rendered document.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

/// Characters removed from heading text before it becomes a slug.
const STRIPPED: &[char] = &[
    '&', '+', '$', ',', '/', ':', ';', '=', '?', '@', '"', '#', '{', '}', '|', '^', '¨', '~', '[',
    ']', '`', '\\', '*', ')', '(', '%', '.', '!', '\'', '<', '>',
];

const SOFT_HYPHEN: char = '\u{00AD}';

/// Named and numeric character references left over in already-rendered text.
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:[A-Za-z][A-Za-z0-9]*|#[0-9]+|#[xX][0-9A-Fa-f]+);")
        .expect("entity pattern is valid")
});

/// Generate a candidate slug from heading text.
///
/// Entity remnants and soft hyphens are dropped first, then the fixed
/// punctuation set, then the text is lower-cased and each internal run of
/// whitespace becomes a single `-`. Existing hyphens are kept, so slugifying
/// a slug returns it unchanged.
///
/// # Examples
///
/// ```
/// use quill_core::slugify;
///
/// assert_eq!(slugify("Hello World!"), "hello-world");
/// assert_eq!(slugify("Fish &amp; Chips"), "fish-chips");
/// assert_eq!(slugify("hello-world"), "hello-world");
/// ```
pub fn slugify(text: &str) -> String {
    let without_entities = ENTITY.replace_all(text, "");
    let kept: String = without_entities
        .chars()
        .filter(|c| *c != SOFT_HYPHEN && !STRIPPED.contains(c))
        .collect();

    kept.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Tracks slugs handed out during a single document render.
///
/// A registry belongs to exactly one render; create a new one per document.
/// The first use of a base slug returns it unchanged, later uses get `-2`,
/// `-3`, ... appended in the order they are reserved.
#[derive(Debug, Default, Clone)]
pub struct SlugRegistry {
    counts: HashMap<String, usize>,
    issued: HashSet<String>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a unique slug derived from `base`.
    ///
    /// If the suffixed form was already issued (a heading literally titled
    /// `intro-2` after two `Intro`s), the counter keeps going until the
    /// result is free, so no two calls ever return the same string.
    pub fn reserve(&mut self, base: &str) -> String {
        let count = self.counts.entry(base.to_string()).or_insert(0);
        loop {
            *count += 1;
            let candidate = if *count == 1 {
                base.to_string()
            } else {
                format!("{base}-{count}")
            };
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// How many times `base` has been reserved (including skipped suffixes).
    pub fn count(&self, base: &str) -> usize {
        self.counts.get(base).copied().unwrap_or(0)
    }

    /// Number of distinct slugs issued so far.
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}
