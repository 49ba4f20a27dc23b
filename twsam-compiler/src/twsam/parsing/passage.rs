use super::command::Command;
use super::parser::parse_commands;
use crate::twsam::lexing::{collapse_line_continuations, tokenize};
use std::collections::HashMap;

/// A parsed passage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    pub title: String,
    pub commands: Vec<Command>,
}

impl Passage {
    /// Collapse line continuations, tokenize and parse a passage's raw text.
    pub fn parse(title: impl Into<String>, text: &str) -> Self {
        let source = collapse_line_continuations(text);
        let tokens = tokenize(&source);
        Passage {
            title: title.into(),
            commands: parse_commands(&tokens),
        }
    }
}

/// Parsed passages keyed by title, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct PassageSet {
    passages: Vec<Passage>,
    positions: HashMap<String, usize>,
}

impl PassageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a passage. A passage with the same title is replaced in place, keeping its
    /// original position, and returned.
    pub fn insert(&mut self, passage: Passage) -> Option<Passage> {
        match self.positions.get(&passage.title) {
            Some(&pos) => Some(std::mem::replace(&mut self.passages[pos], passage)),
            None => {
                self.positions
                    .insert(passage.title.clone(), self.passages.len());
                self.passages.push(passage);
                None
            }
        }
    }

    pub fn get(&self, title: &str) -> Option<&Passage> {
        self.positions.get(title).map(|&pos| &self.passages[pos])
    }

    pub fn contains(&self, title: &str) -> bool {
        self.positions.contains_key(title)
    }

    /// Passages in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &Passage> {
        self.passages.iter()
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}

impl FromIterator<Passage> for PassageSet {
    fn from_iter<I: IntoIterator<Item = Passage>>(iter: I) -> Self {
        let mut set = PassageSet::new();
        for passage in iter {
            set.insert(passage);
        }
        set
    }
}
