//! Passage records handed to the compiler.
//!
//! Reading the source container (a twee file, a story archive) is the caller's job; the
//! compiler only needs the titles and raw texts, in source order.

/// One raw passage: its title and its unparsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassageSource {
    pub title: String,
    pub text: String,
}

impl PassageSource {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        PassageSource {
            title: title.into(),
            text: text.into(),
        }
    }
}
