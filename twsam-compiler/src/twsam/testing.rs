//! Testing utilities
//!
//!     Helpers shared by the unit tests and the integration tests under `tests/`.
//!
//! Writing Stories in Tests
//!
//!     A story is written as a slice of `(title, text)` pairs in source order, exactly as
//!     the twee reader would hand them over. The first pair does not need to be `Start`:
//!     index assignment is part of what is under test.
//!
//!     ```rust,ignore
//!     use twsam_compiler::twsam::testing::{compile_story, script_code};
//!
//!     let story = compile_story(&[("Start", "Hello[[Hall]]"), ("Hall", "")]).unwrap();
//!     assert!(script_code(&story, "Start").ends_with("B:1+B.\n"));
//!     ```
//!
//! Asserting on Output
//!
//!     Generated scripts are compared in full, usually through `insta` inline snapshots.
//!     SAM glyphs are terse and a single misplaced space changes the program, so
//!     `contains` checks are reserved for properties that must hold regardless of the
//!     surrounding code.

use crate::twsam::codegen::CompileOptions;
use crate::twsam::diagnostics::{Diagnostic, DiagnosticKind};
use crate::twsam::error::Result;
use crate::twsam::pipeline::{compile, CompiledStory};
use crate::twsam::source::PassageSource;

/// Passage records from `(title, text)` pairs.
pub fn sources(story: &[(&str, &str)]) -> Vec<PassageSource> {
    story
        .iter()
        .map(|(title, text)| PassageSource::new(*title, *text))
        .collect()
}

/// Compile with default options.
pub fn compile_story(story: &[(&str, &str)]) -> Result<CompiledStory> {
    compile(&sources(story), &CompileOptions::default())
}

pub fn compile_story_with(
    story: &[(&str, &str)],
    options: &CompileOptions,
) -> Result<CompiledStory> {
    compile(&sources(story), options)
}

/// Code of the script generated for `title`.
///
/// Panics when the story has no such passage.
pub fn script_code<'s>(story: &'s CompiledStory, title: &str) -> &'s str {
    match story.script(title) {
        Some(script) => &script.code,
        None => panic!("no script for passage {:?}", title),
    }
}

pub fn diagnostics_of(story: &CompiledStory, kind: DiagnosticKind) -> Vec<&Diagnostic> {
    story.diagnostics.iter().filter(|d| d.kind == kind).collect()
}
