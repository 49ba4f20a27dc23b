//! Passage token types
//!
//! Tokens always travel together with the byte range of the source text they were
//! produced from, as `(Token, Range<usize>)` pairs. Ranges are absolute offsets into
//! the passage text handed to [`tokenize`](super::tokenize), including for the children
//! of a list item.

use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// A token paired with its source range.
pub type Spanned = (Token, Range<usize>);

/// All token kinds produced by the passage lexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Token {
    /// Plain text, kept verbatim (trimming happens at emit time).
    Text { value: String },
    /// `[img[path]]`
    Image { path: String },
    /// `[[...]]`, with the inner text left unparsed.
    Link { spec: String },
    /// `<<name params>>`, with the parameters left unparsed.
    Macro { name: String, params: String },
    /// A `# ` (ordered) or `* ` (unordered) list item line.
    List {
        ordered: bool,
        #[serde(serialize_with = "serialize_children")]
        children: Vec<Spanned>,
    },
}

impl Token {
    pub fn text(value: impl Into<String>) -> Self {
        Token::Text {
            value: value.into(),
        }
    }

    pub fn image(path: impl Into<String>) -> Self {
        Token::Image { path: path.into() }
    }

    pub fn link(spec: impl Into<String>) -> Self {
        Token::Link { spec: spec.into() }
    }

    pub fn macro_call(name: impl Into<String>, params: impl Into<String>) -> Self {
        Token::Macro {
            name: name.into(),
            params: params.into(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Text { value } => write!(f, "<text {:?}>", value),
            Token::Image { path } => write!(f, "<img {}>", path),
            Token::Link { spec } => write!(f, "<link {}>", spec),
            Token::Macro { name, params } if params.is_empty() => write!(f, "<<{}>>", name),
            Token::Macro { name, params } => write!(f, "<<{} {}>>", name, params),
            Token::List { ordered, children } => {
                write!(f, "<{}", if *ordered { "ol" } else { "ul" })?;
                for (child, _) in children {
                    write!(f, " {}", child)?;
                }
                write!(f, ">")
            }
        }
    }
}

// Ranges serialize as `[start, end]` so dumps stay compact.
fn serialize_children<S>(children: &[Spanned], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeSeq;

    let mut seq = serializer.serialize_seq(Some(children.len()))?;
    for (token, range) in children {
        seq.serialize_element(&SpannedRef {
            token,
            range: [range.start, range.end],
        })?;
    }
    seq.end()
}

/// Serializable view of a [`Spanned`] pair.
#[derive(Serialize)]
pub struct SpannedRef<'a> {
    #[serde(flatten)]
    pub token: &'a Token,
    pub range: [usize; 2],
}

impl<'a> SpannedRef<'a> {
    pub fn new(spanned: &'a Spanned) -> Self {
        SpannedRef {
            token: &spanned.0,
            range: [spanned.1.start, spanned.1.end],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_nested_list() {
        let token = Token::List {
            ordered: false,
            children: vec![(Token::link("North"), 2..11)],
        };
        assert_eq!(token.to_string(), "<ul <link North>>");
    }

    #[test]
    fn test_serialize_spanned() {
        let pair = (Token::macro_call("set", "$a = 1"), 0..14);
        let json = serde_json::to_string(&SpannedRef::new(&pair)).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"macro","name":"set","params":"$a = 1","range":[0,14]}"#
        );
    }
}
