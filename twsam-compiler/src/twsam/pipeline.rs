//! Compilation pipeline
//!
//! The compiler runs three batch passes, each finishing before the next starts:
//!
//! 1. **Parse** - every passage is collapsed, tokenized and parsed into commands
//! 2. **Index** - titles are numbered, `Start` first
//! 3. **Generate** - scripts are emitted in index order
//!
//! Variable usage and script file names are checked once the last script is generated.
//! Nothing is written anywhere: the result is a [CompiledStory] the caller stores as it
//! sees fit.

use crate::twsam::codegen::manifest::script_identifiers;
use crate::twsam::codegen::{
    name_to_identifier, AssetList, CodeGenerator, CompileOptions, OutputNaming, Script,
    VariableAllocator,
};
use crate::twsam::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::twsam::error::Result;
use crate::twsam::indexing::PassageIndexTable;
use crate::twsam::parsing::{Passage, PassageSet};
use crate::twsam::source::PassageSource;

/// Output of a successful run.
#[derive(Debug, Clone)]
pub struct CompiledStory {
    /// One script per passage, in index order
    pub scripts: Vec<Script>,
    pub images: AssetList,
    pub music: AssetList,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompiledStory {
    pub fn script(&self, title: &str) -> Option<&Script> {
        self.scripts.iter().find(|script| script.title == title)
    }

    pub fn script_manifest(&self, naming: &OutputNaming) -> String {
        naming.script_manifest(self.titles())
    }

    pub fn image_manifest(&self, naming: &OutputNaming) -> String {
        naming.image_manifest(&self.images)
    }

    pub fn music_manifest(&self, naming: &OutputNaming) -> String {
        naming.music_manifest(&self.music)
    }

    /// Every output file as `(file name, contents)`: the scripts, then the script,
    /// image and music manifests.
    pub fn files(&self, naming: &OutputNaming) -> Vec<(String, String)> {
        let mut files: Vec<(String, String)> = naming
            .script_file_names(self.titles())
            .into_iter()
            .zip(&self.scripts)
            .map(|(name, script)| (name, script.code.clone()))
            .collect();
        files.push((naming.script_list.clone(), self.script_manifest(naming)));
        files.push((naming.image_list.clone(), self.image_manifest(naming)));
        files.push((naming.music_list.clone(), self.music_manifest(naming)));
        files
    }

    fn titles(&self) -> impl Iterator<Item = &str> {
        self.scripts.iter().map(|script| script.title.as_str())
    }
}

pub struct Pipeline {
    options: CompileOptions,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::with_options(CompileOptions::default())
    }

    pub fn with_options(options: CompileOptions) -> Self {
        Pipeline { options }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Parse pass only. Later definitions of a title replace earlier ones.
    pub fn parse(&self, sources: &[PassageSource], diagnostics: &mut Diagnostics) -> PassageSet {
        let mut passages = PassageSet::new();
        for source in sources {
            let passage = Passage::parse(source.title.as_str(), &source.text);
            if passages.insert(passage).is_some() {
                diagnostics.report(
                    Some(source.title.as_str()),
                    DiagnosticKind::DuplicatePassage,
                    "passage defined more than once; the last definition wins",
                );
            }
        }
        tracing::debug!(passages = passages.len(), "parsed");
        passages
    }

    pub fn run(&self, sources: &[PassageSource]) -> Result<CompiledStory> {
        let mut diagnostics = Diagnostics::new();
        let passages = self.parse(sources, &mut diagnostics);

        let index = PassageIndexTable::build(&passages)?;
        tracing::debug!(scripts = index.len(), "indexed");

        let generated = CodeGenerator::new(&self.options, &passages, &index, diagnostics).run()?;
        let mut diagnostics = generated.diagnostics;
        report_variable_usage(&generated.variables, &mut diagnostics);
        report_file_name_collisions(&generated.scripts, &mut diagnostics);

        Ok(CompiledStory {
            scripts: generated.scripts,
            images: generated.images,
            music: generated.music,
            diagnostics: diagnostics.into_vec(),
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Compile passages with the given options.
pub fn compile(sources: &[PassageSource], options: &CompileOptions) -> Result<CompiledStory> {
    Pipeline::with_options(options.clone()).run(sources)
}

fn report_variable_usage(variables: &VariableAllocator, diagnostics: &mut Diagnostics) {
    // temps start with `*` and are internal
    let story = |name: &&String| !name.starts_with('*');

    for name in variables.never_read().iter().filter(story) {
        diagnostics.report(
            None,
            DiagnosticKind::UnusedVariable,
            format!("variable ${} is set but never read", name),
        );
    }
    for name in variables.never_written().iter().filter(story) {
        diagnostics.report(
            None,
            DiagnosticKind::UnsetVariable,
            format!("variable ${} is read but never set", name),
        );
    }
}

fn report_file_name_collisions(scripts: &[Script], diagnostics: &mut Diagnostics) {
    let titles = scripts.iter().map(|script| script.title.as_str());
    for (script, identifier) in scripts.iter().zip(script_identifiers(titles)) {
        if identifier != name_to_identifier(&script.title) {
            diagnostics.report(
                Some(script.title.as_str()),
                DiagnosticKind::FileNameCollision,
                format!(
                    "script file name clashes with an earlier passage; renamed to {}",
                    identifier
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twsam::error::CompileError;

    #[test]
    fn test_missing_start_fails_before_generation() {
        let sources = [PassageSource::new("Intro", "[[Nowhere]]")];
        let err = Pipeline::new().run(&sources).unwrap_err();
        assert_eq!(err, CompileError::MissingStart);
    }

    #[test]
    fn test_duplicate_passage_keeps_last_body() {
        let sources = [
            PassageSource::new("Start", "first"),
            PassageSource::new("Start", "second"),
        ];
        let story = Pipeline::new().run(&sources).unwrap();
        assert_eq!(story.scripts.len(), 1);
        assert!(story.scripts[0].code.starts_with("\"second\""));
        assert_eq!(story.diagnostics[0].kind, DiagnosticKind::DuplicatePassage);
    }

    #[test]
    fn test_variable_usage_is_reported_once_per_name() {
        let sources = [PassageSource::new(
            "Start",
            "<<set $gold = 1>><<set $gold = 2>><<if $lamp>>lit<<endif>>",
        )];
        let story = Pipeline::new().run(&sources).unwrap();
        let kinds: Vec<_> = story.diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![DiagnosticKind::UnusedVariable, DiagnosticKind::UnsetVariable]
        );
        assert!(story.diagnostics[0].message.contains("$gold"));
        assert!(story.diagnostics[1].message.contains("$lamp"));
    }

    #[test]
    fn test_files_lists_scripts_then_manifests() {
        let sources = [
            PassageSource::new("Start", "[[Dark Hall]]"),
            PassageSource::new("Dark Hall", ""),
        ];
        let story = Pipeline::new().run(&sources).unwrap();
        let names: Vec<String> = story
            .files(&OutputNaming::default())
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            vec![
                "Start.twsam",
                "Dark_Hall.twsam",
                "Script.list.txt",
                "Images.txt",
                "Music.list.txt"
            ]
        );
    }

    #[test]
    fn test_colliding_file_names_are_renamed() {
        let sources = [
            PassageSource::new("Start", "[[Go North]][[Go_North]]"),
            PassageSource::new("Go North", ""),
            PassageSource::new("Go_North", ""),
        ];
        let story = Pipeline::new().run(&sources).unwrap();
        let naming = OutputNaming::default();
        let names: Vec<String> = story
            .files(&naming)
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            &names[..3],
            ["Start.twsam", "Go_North.twsam", "Go_North_2.twsam"]
        );
        assert_eq!(
            story.script_manifest(&naming),
            "Start.twsam\nGo_North.twsam\nGo_North_2.twsam\n"
        );

        assert_eq!(story.diagnostics.len(), 1);
        let diagnostic = &story.diagnostics[0];
        assert_eq!(diagnostic.kind, DiagnosticKind::FileNameCollision);
        assert_eq!(diagnostic.passage.as_deref(), Some("Go_North"));
        assert!(diagnostic.message.contains("Go_North_2"));
    }
}
