//! Passage indexing
//!
//!     Every passage becomes one script, and scripts are addressed by number. `Start`
//!     is always script 0; the other passages follow in first-seen source order, so the
//!     numbering (and every jump target derived from it) is the same on every run.
//!
//!     The table is built after all passages are parsed and before any code is
//!     generated: links and calls may point at passages defined later in the source.

use crate::twsam::error::{CompileError, Result, START_PASSAGE};
use crate::twsam::parsing::PassageSet;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct PassageIndexTable {
    indices: HashMap<String, usize>,
    order: Vec<String>,
}

impl PassageIndexTable {
    /// Number the passages of `passages`, failing when there is no `Start`.
    pub fn build(passages: &PassageSet) -> Result<Self> {
        if !passages.contains(START_PASSAGE) {
            return Err(CompileError::MissingStart);
        }

        let mut table = PassageIndexTable::default();
        table.assign(START_PASSAGE);
        for passage in passages.iter() {
            table.assign(&passage.title);
        }
        Ok(table)
    }

    fn assign(&mut self, title: &str) {
        if !self.indices.contains_key(title) {
            self.indices.insert(title.to_string(), self.order.len());
            self.order.push(title.to_string());
        }
    }

    pub fn get(&self, title: &str) -> Option<usize> {
        self.indices.get(title).copied()
    }

    /// Titles sorted by index
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
