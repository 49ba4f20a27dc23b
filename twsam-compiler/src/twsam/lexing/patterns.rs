//! Pattern classes of the passage lexer
//!
//! Order matters: classes are tried in declaration order, and text between the matches
//! of one class is handed to the classes that follow it.

use super::token::Token;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;

/// Backslash, optional trailing blanks, line break
pub(crate) static LINE_CONTINUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\[ \t]*\n").unwrap());

static LIST_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^([#*])[ \t](.*)$").unwrap());

static MACRO: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<<\s*([^\s>]+)\s*(.*?)>>").unwrap());

static IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[img\[(.*?)\]\]").unwrap());

static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\[(.*?)\]\]").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternClass {
    ListItem,
    Macro,
    Image,
    Link,
    Text,
}

impl PatternClass {
    /// All classes, highest priority first.
    pub const ALL: &'static [PatternClass] = &[
        PatternClass::ListItem,
        PatternClass::Macro,
        PatternClass::Image,
        PatternClass::Link,
        PatternClass::Text,
    ];

    /// Every class except list items.
    pub const INLINE: &'static [PatternClass] = &[
        PatternClass::Macro,
        PatternClass::Image,
        PatternClass::Link,
        PatternClass::Text,
    ];

    /// The regex for this class; `Text` matches whatever is left.
    pub fn regex(self) -> Option<&'static Regex> {
        match self {
            PatternClass::ListItem => Some(&*LIST_ITEM),
            PatternClass::Macro => Some(&*MACRO),
            PatternClass::Image => Some(&*IMAGE),
            PatternClass::Link => Some(&*LINK),
            PatternClass::Text => None,
        }
    }

    /// Number of extra bytes swallowed after a match when they are present.
    pub fn trailing(self, rest: &str) -> usize {
        match self {
            PatternClass::ListItem if rest.starts_with('\n') => 1,
            _ => 0,
        }
    }

    /// Build the token for a match.
    ///
    /// List items are returned without children; the lexer fills them in, since that
    /// requires recursing with the full class list.
    pub fn build(self, captures: &Captures<'_>) -> Token {
        let group = |i: usize| captures.get(i).map_or("", |m| m.as_str());
        match self {
            PatternClass::ListItem => Token::List {
                ordered: group(1) == "#",
                children: Vec::new(),
            },
            PatternClass::Macro => Token::macro_call(group(1), group(2)),
            PatternClass::Image => Token::image(group(1)),
            PatternClass::Link => Token::link(group(1)),
            PatternClass::Text => Token::text(group(0)),
        }
    }
}

/// The absolute range of a list item's content with surrounding blanks removed.
pub fn list_item_content(captures: &Captures<'_>, offset: usize) -> Range<usize> {
    let Some(content) = captures.get(2) else {
        return offset..offset;
    };
    let text = content.as_str();
    let leading = text.len() - text.trim_start().len();
    let trimmed = text.trim();
    let start = offset + content.start() + leading;
    start..start + trimmed.len()
}
