//! Lexer
//!
//!     This module segments the text of one passage into a flat sequence of tokens. The
//!     only recursive token is the list item, whose content is lexed again.
//!
//! The Pattern Classes
//!
//!     Lexing applies pattern classes in strict priority order. See
//!     [patterns](patterns::PatternClass).
//!         1. List item lines (`# ` or `* ` at the start of a line). The line break after
//!            the item is consumed together with it.
//!         2. Macro spans `<<name params>>`. Parameters are captured verbatim.
//!         3. Image spans `[img[path]]`.
//!         4. Link spans `[[...]]`. The inner text is captured verbatim; splitting label,
//!            target and on-click happens in the parser.
//!         5. Everything else is text.
//!
//!     Each class consumes its matches and hands the text in between to the classes of
//!     lower priority, so a match of a higher class is never split by a lower one.
//!
//! Source Ranges
//!
//!     Every token is paired with the byte range it was produced from. Top-level ranges
//!     are contiguous and cover the whole input: concatenating the source slices of the
//!     tokens gives back the input. List children carry absolute ranges too, inside their
//!     parent's range.
//!
//! Nesting
//!
//!     A list item whose content is again a list item nests one level deeper. Below
//!     [MAX_LIST_DEPTH] levels the content is no longer checked for list markers, so a
//!     deeper marker stays part of the item's text.
//!
//!     Line continuations (a backslash at the end of a line) must be collapsed before
//!     lexing, see [collapse_line_continuations].

pub mod patterns;
pub mod token;

pub use patterns::PatternClass;
pub use token::{Spanned, SpannedRef, Token};

use std::borrow::Cow;
use std::ops::Range;

/// Deepest list item nesting the lexer splits up.
pub const MAX_LIST_DEPTH: usize = 32;

/// Removes backslash + line break sequences, joining the two lines.
pub fn collapse_line_continuations(source: &str) -> Cow<'_, str> {
    patterns::LINE_CONTINUATION.replace_all(source, "")
}

/// Tokenize one passage's text.
pub fn tokenize(source: &str) -> Vec<Spanned> {
    lex_range(source, 0..source.len(), PatternClass::ALL, 0)
}

fn lex_range(
    source: &str,
    range: Range<usize>,
    classes: &[PatternClass],
    depth: usize,
) -> Vec<Spanned> {
    if range.is_empty() {
        return Vec::new();
    }
    let Some((&class, lower)) = classes.split_first() else {
        return Vec::new();
    };
    let Some(regex) = class.regex() else {
        let value = &source[range.clone()];
        return vec![(Token::text(value), range)];
    };

    let slice = &source[range.clone()];
    let mut tokens = Vec::new();
    let mut cursor = range.start;

    for captures in regex.captures_iter(slice) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        let start = range.start + whole.start();
        let mut end = range.start + whole.end();
        if start < cursor || whole.is_empty() {
            continue;
        }

        if cursor < start {
            tokens.extend(lex_range(source, cursor..start, lower, depth));
        }
        end += class.trailing(&source[end..range.end]);

        let mut token = class.build(&captures);
        if let Token::List { children, .. } = &mut token {
            let content = patterns::list_item_content(&captures, range.start);
            let depth = depth + 1;
            let classes = if depth < MAX_LIST_DEPTH {
                PatternClass::ALL
            } else {
                PatternClass::INLINE
            };
            *children = lex_range(source, content, classes, depth);
        }
        tokens.push((token, start..end));
        cursor = end;
    }

    if cursor < range.end {
        tokens.extend(lex_range(source, cursor..range.end, lower, depth));
    }

    tokens
}
