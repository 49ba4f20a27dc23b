//! Lowering of command trees to SAM scripts.
//!
//! One [CodeGenerator] runs over the whole story. Registers and asset numbers are
//! global, everything else lives in a [PassageState] that is thrown away once the
//! passage's script is assembled.

use super::assets::AssetList;
use super::buffer::{sanitize, TextBuffer};
use super::options::CompileOptions;
use super::variables::{TempRegisterPool, VariableAllocator};
use crate::twsam::diagnostics::{DiagnosticKind, Diagnostics};
use crate::twsam::error::{CompileError, Result};
use crate::twsam::expression::CompiledExpression;
use crate::twsam::indexing::PassageIndexTable;
use crate::twsam::parsing::{Command, Link, Passage, PassageSet};
use serde::Serialize;

const FLUSH: &str = "!";
const RETURN: &str = "$";
const NUMERIC_ECHO: &str = "\"\\#\"";
const IF_CLOSE: &str = " 0]";
const GUARD_CLOSE: &str = "0]";
const MENU_READ: &str = "?A.";
const MENU_COUNTER_RESET: &str = "0B.";
const LOOP_FOREVER: &str = "1[1]";

/// Buffer bytes counted for a printed number
pub const PRINT_WIDTH: usize = 5;

const OVERFLOW_MESSAGE: &str =
    "The text exceeds the maximum buffer size; try to intersperse the text with some <<pause>> macros";

/// Generated program of one passage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Script {
    pub title: String,
    pub index: usize,
    pub code: String,
}

/// Everything the generator produced for a story.
#[derive(Debug)]
pub struct Generated {
    /// Scripts in index order
    pub scripts: Vec<Script>,
    pub images: AssetList,
    pub music: AssetList,
    pub variables: VariableAllocator,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, Copy, Default)]
struct Scope {
    /// Inside an `<<if>>` body
    conditional: bool,
    /// Inside a list item: links join the menu without printing their label
    in_list: bool,
}

struct MenuEntry<'a> {
    link: &'a Link,
    /// Temp register name set to 1 when the link was reached
    guard: Option<String>,
}

struct PassageState<'a> {
    title: &'a str,
    body: String,
    buffer: TextBuffer,
    links: Vec<MenuEntry<'a>>,
    displaying: Vec<&'a str>,
    temps: Vec<char>,
}

impl<'a> PassageState<'a> {
    fn new(title: &'a str, buffer_cap: usize) -> Self {
        PassageState {
            title,
            body: String::new(),
            buffer: TextBuffer::new(buffer_cap),
            links: Vec::new(),
            displaying: vec![title],
            temps: Vec::new(),
        }
    }

    fn line(&mut self, code: &str) {
        self.body.push_str(code);
        self.body.push('\n');
    }

    /// The script: temp registers cleared first, then the body.
    fn into_code(self) -> String {
        let mut code: String = self
            .temps
            .iter()
            .map(|register| format!("0{}.\n", register))
            .collect();
        code.push_str(&self.body);
        code
    }
}

pub struct CodeGenerator<'a> {
    options: &'a CompileOptions,
    passages: &'a PassageSet,
    index: &'a PassageIndexTable,
    variables: VariableAllocator,
    temps: TempRegisterPool,
    images: AssetList,
    music: AssetList,
    diagnostics: Diagnostics,
}

impl<'a> CodeGenerator<'a> {
    /// `diagnostics` holds whatever earlier passes reported; new ones are appended.
    pub fn new(
        options: &'a CompileOptions,
        passages: &'a PassageSet,
        index: &'a PassageIndexTable,
        diagnostics: Diagnostics,
    ) -> Self {
        CodeGenerator {
            options,
            passages,
            index,
            variables: VariableAllocator::new(options.first_register),
            temps: TempRegisterPool::new(),
            images: AssetList::new(),
            music: AssetList::new(),
            diagnostics,
        }
    }

    /// Generate every indexed passage, in index order.
    pub fn run(mut self) -> Result<Generated> {
        let index = self.index;
        let passages = self.passages;
        let mut scripts = Vec::with_capacity(index.len());

        for (number, title) in index.titles().enumerate() {
            let Some(passage) = passages.get(title) else {
                continue;
            };
            tracing::debug!(passage = title, index = number, "generating");
            scripts.push(self.generate(number, passage)?);
        }

        Ok(Generated {
            scripts,
            images: self.images,
            music: self.music,
            variables: self.variables,
            diagnostics: self.diagnostics,
        })
    }

    fn generate(&mut self, number: usize, passage: &'a Passage) -> Result<Script> {
        if self.options.reset_temps_per_passage {
            self.temps.reset();
        }

        let mut state = PassageState::new(&passage.title, self.options.buffer_cap);
        self.commands(&mut state, &passage.commands, Scope::default());
        self.flush(&mut state);
        self.menu(&mut state)?;

        for name in self.variables.take_overflowed() {
            let register = self.variables.register(&name).unwrap_or('?');
            self.diagnostics.report(
                Some(state.title),
                DiagnosticKind::RegisterOverflow,
                format!(
                    "no register left for variable {:?}; it got {:?}, which SAM reads as an \
                     instruction, so this script will not run correctly",
                    name, register
                ),
            );
        }

        Ok(Script {
            title: passage.title.clone(),
            index: number,
            code: state.into_code(),
        })
    }

    fn commands(&mut self, state: &mut PassageState<'a>, commands: &'a [Command], scope: Scope) {
        for command in commands {
            self.command(state, command, scope);
        }
    }

    fn command(&mut self, state: &mut PassageState<'a>, command: &'a Command, scope: Scope) {
        match command {
            Command::Text { text } => self.text(state, text),
            Command::Print { expr } => {
                let value = self.render(expr);
                if !state.buffer.reserve(PRINT_WIDTH) {
                    // the number cannot be cut, so it starts a fresh buffer
                    self.flush(state);
                    state.buffer.reserve(PRINT_WIDTH);
                }
                state.line(&format!("{}{}", value.trim_end(), NUMERIC_ECHO));
                state.buffer.mark_pending();
            }
            Command::Pause => {
                state.buffer.mark_pending();
                self.flush(state);
            }
            Command::Image { path } => {
                self.flush(state);
                let number = self.images.intern(path);
                state.line(&format!("{}i", number));
            }
            Command::Music { path } => {
                let number = self.music.intern(path);
                state.line(&format!("{}m", number));
            }
            Command::Link(link) => {
                self.register_link(state, link, scope);
                if !scope.in_list {
                    self.text(state, link.actual_label());
                }
            }
            Command::List { children, .. } => {
                let scope = Scope {
                    in_list: true,
                    ..scope
                };
                self.commands(state, children, scope);
            }
            Command::Set { target, expr } => {
                let code = self.assignment(target, expr);
                state.line(&code);
            }
            Command::If { expr, children } => {
                let guard = self.render(expr);
                state.line(&format!("{}[", guard.trim_end()));
                let scope = Scope {
                    conditional: true,
                    ..scope
                };
                self.commands(state, children, scope);
                state.line(IF_CLOSE);
            }
            Command::Call { target } => {
                self.flush(state);
                match self.index.get(target) {
                    Some(number) => state.line(&format!("{}c", number)),
                    None => self.diagnostics.report(
                        Some(state.title),
                        DiagnosticKind::UnresolvedCall,
                        format!("call to a nonexisting passage: {:?}", target),
                    ),
                }
            }
            Command::Return => {
                self.flush(state);
                state.line(RETURN);
            }
            Command::Display { target } => self.display(state, target, scope),
            Command::Invalid { message } => {
                self.diagnostics.report(
                    Some(state.title),
                    DiagnosticKind::InvalidMacro,
                    message.as_str(),
                );
            }
        }
    }

    fn text(&mut self, state: &mut PassageState<'a>, raw: &str) {
        let text = raw.trim();
        if text.is_empty() {
            return;
        }
        self.string(state, &sanitize(text));
        state.buffer.mark_pending();
    }

    /// Push a quoted string, truncated to what the buffer still holds.
    fn string(&mut self, state: &mut PassageState<'a>, text: &str) {
        let fitted = state.buffer.fit(text);
        if fitted.truncated {
            self.diagnostics.report(
                Some(state.title),
                DiagnosticKind::BufferOverflow,
                OVERFLOW_MESSAGE,
            );
        }
        state.body.push('"');
        state.body.push_str(fitted.text);
        state.body.push_str("\"\n");
    }

    fn flush(&mut self, state: &mut PassageState<'a>) {
        if state.buffer.flush() {
            state.line(FLUSH);
        }
    }

    fn render(&mut self, expr: &CompiledExpression) -> String {
        let variables = &mut self.variables;
        expr.render(|name| variables.read(name).to_string())
    }

    /// `value R.`; the value is rendered before the target register is resolved.
    fn assignment(&mut self, target: &str, expr: &CompiledExpression) -> String {
        let value = self.render(expr);
        let register = self.variables.write(target);
        format!("{} {}.", value.trim_end(), register)
    }

    fn register_link(&mut self, state: &mut PassageState<'a>, link: &'a Link, scope: Scope) {
        let guard = if scope.conditional {
            let name = self.temps.acquire();
            let register = self.variables.write(&name);
            state.line(&format!("1{}.", register));
            if !state.temps.contains(&register) {
                state.temps.push(register);
            }
            Some(name)
        } else {
            None
        };
        state.links.push(MenuEntry { link, guard });
    }

    fn display(&mut self, state: &mut PassageState<'a>, target: &str, scope: Scope) {
        let passages = self.passages;
        let Some(passage) = passages.get(target) else {
            self.diagnostics.report(
                Some(state.title),
                DiagnosticKind::UnresolvedDisplay,
                format!("display of a nonexisting passage: {:?}", target),
            );
            return;
        };
        if state.displaying.contains(&passage.title.as_str()) {
            self.diagnostics.report(
                Some(state.title),
                DiagnosticKind::DisplayCycle,
                format!("{:?} is already being displayed; skipped", target),
            );
            return;
        }

        state.displaying.push(&passage.title);
        let scope = Scope {
            conditional: scope.conditional,
            in_list: false,
        };
        self.commands(state, &passage.commands, scope);
        state.displaying.pop();
    }

    fn menu(&mut self, state: &mut PassageState<'a>) -> Result<()> {
        if state.links.is_empty() {
            state.line(LOOP_FOREVER);
            return Ok(());
        }

        let links = std::mem::take(&mut state.links);
        let width = self.options.menu_label_width;

        for entry in &links {
            let guarded = self.open_guard(state, entry);
            let label: String = entry.link.actual_label().chars().take(width).collect();
            self.string(state, &format!("{}\n", sanitize(&label)));
            if guarded {
                state.line(GUARD_CLOSE);
            }
        }
        state.line(MENU_READ);
        state.buffer.reset();

        state.line(MENU_COUNTER_RESET);
        for entry in &links {
            let target = self.index.get(&entry.link.target).ok_or_else(|| {
                CompileError::UnresolvedLink {
                    passage: state.title.to_string(),
                    target: entry.link.target.clone(),
                }
            })?;
            let guarded = self.open_guard(state, entry);
            let action = self.link_action(state.title, entry.link);
            state.line(&format!("A:B:=[{}{}j]B:1+B.", action, target));
            if guarded {
                state.line(GUARD_CLOSE);
            }
        }
        Ok(())
    }

    fn open_guard(&mut self, state: &mut PassageState<'a>, entry: &MenuEntry<'a>) -> bool {
        match &entry.guard {
            Some(name) => {
                let register = self.variables.read(name);
                state.body.push_str(&format!("{}:[", register));
                true
            }
            None => false,
        }
    }

    fn link_action(&mut self, title: &str, link: &Link) -> String {
        match link.action.as_deref() {
            Some(Command::Set { target, expr }) => self.assignment(target, expr),
            Some(Command::Invalid { message }) => {
                self.diagnostics.report(
                    Some(title),
                    DiagnosticKind::IgnoredLinkAction,
                    format!("on-click action ignored: {}", message),
                );
                String::new()
            }
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(story: &[(&str, &str)]) -> Result<Generated> {
        let passages: PassageSet = story
            .iter()
            .map(|(title, text)| Passage::parse(*title, text))
            .collect();
        let index = PassageIndexTable::build(&passages)?;
        let options = CompileOptions::default();
        CodeGenerator::new(&options, &passages, &index, Diagnostics::new()).run()
    }

    fn start_code(text: &str) -> String {
        generate(&[("Start", text)]).unwrap().scripts[0].code.clone()
    }

    #[test]
    fn test_text_then_loop() {
        assert_eq!(start_code("Hello \"you\""), "\"Hello 'you'\"\n!\n1[1]\n");
    }

    #[test]
    fn test_pause_flushes() {
        assert_eq!(start_code("one<<pause>>two"), "\"one\"\n!\n\"two\"\n!\n1[1]\n");
    }

    #[test]
    fn test_set_and_print() {
        assert_eq!(
            start_code("<<set $gold = 5>><<print $gold>>"),
            "5 C.\nC:\"\\#\"\n!\n1[1]\n"
        );
    }

    #[test]
    fn test_menu_dispatch() {
        let generated = generate(&[("Start", "[[Go|Hall]]"), ("Hall", "")]).unwrap();
        assert_eq!(
            generated.scripts[0].code,
            "\"Go\"\n!\n\"Go\n\"\n?A.\n0B.\nA:B:=[1j]B:1+B.\n"
        );
    }

    #[test]
    fn test_conditional_link_is_guarded_and_cleared() {
        let generated =
            generate(&[("Start", "<<if $lamp>>[[Hall]]<<endif>>"), ("Hall", "")]).unwrap();
        assert_eq!(
            generated.scripts[0].code,
            "0D.\nC:[\n1D.\n\"Hall\"\n 0]\n!\nD:[\"Hall\n\"\n0]\n?A.\n0B.\nD:[A:B:=[1j]B:1+B.\n0]\n"
        );
    }

    #[test]
    fn test_list_links_only_join_menu() {
        let generated = generate(&[
            ("Start", "* [[Hall]]\n* [[Attic]]"),
            ("Hall", ""),
            ("Attic", ""),
        ])
        .unwrap();
        assert_eq!(
            generated.scripts[0].code,
            "\"Hall\n\"\n\"Attic\n\"\n?A.\n0B.\nA:B:=[1j]B:1+B.\nA:B:=[2j]B:1+B.\n"
        );
    }

    #[test]
    fn test_link_action_runs_before_jump() {
        let generated = generate(&[("Start", "* [[Take|Hall][$key = 1]]"), ("Hall", "")]).unwrap();
        assert!(generated.scripts[0].code.contains("A:B:=[1 C.1j]B:1+B.\n"));
    }

    #[test]
    fn test_unresolved_link_is_fatal() {
        let err = generate(&[("Start", "[[Nowhere]]")]).unwrap_err();
        assert_eq!(
            err,
            CompileError::UnresolvedLink {
                passage: "Start".to_string(),
                target: "Nowhere".to_string(),
            }
        );
    }

    #[test]
    fn test_display_inlines_and_stops_cycles() {
        let generated = generate(&[
            ("Start", "<<display Intro>>"),
            ("Intro", "Welcome<<display Intro>>"),
        ])
        .unwrap();
        assert_eq!(generated.scripts[0].code, "\"Welcome\"\n!\n1[1]\n");
        assert_eq!(
            generated.diagnostics.of_kind(DiagnosticKind::DisplayCycle).count(),
            2
        );
    }

    #[test]
    fn test_print_counts_against_buffer() {
        let full = "a".repeat(CompileOptions::default().buffer_cap - 2);
        let code = start_code(&format!("{}<<print 7>>", full));
        assert_eq!(code, format!("\"{}\"\n!\n7\"\\#\"\n!\n1[1]\n", full));
        assert_eq!(start_code("x<<print 7>>"), "\"x\"\n7\"\\#\"\n!\n1[1]\n");
    }

    #[test]
    fn test_assets_are_interned() {
        assert_eq!(
            start_code("[img[a.png]]<<music tune.mod>>[img[b.png]][img[a.png]]"),
            "0i\n0m\n1i\n0i\n1[1]\n"
        );
    }
}
