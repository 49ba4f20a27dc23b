//! `--dump` output: the lexed or parsed passages as JSON, for debugging stories.

use anyhow::{bail, Result};
use serde::Serialize;
use twsam_compiler::twsam::lexing::{collapse_line_continuations, tokenize, SpannedRef};
use twsam_compiler::twsam::parsing::{Command, Passage};
use twsam_compiler::twsam::source::PassageSource;

pub const DUMP_KINDS: [&str; 2] = ["tokens", "commands"];

#[derive(Serialize)]
struct PassageDump<'a, T> {
    title: &'a str,
    #[serde(flatten)]
    contents: T,
}

#[derive(Serialize)]
struct Tokens<'a> {
    tokens: Vec<SpannedRef<'a>>,
}

#[derive(Serialize)]
struct Commands<'a> {
    commands: &'a [Command],
}

pub fn render(kind: &str, sources: &[PassageSource]) -> Result<String> {
    let json = match kind {
        "tokens" => {
            let lexed: Vec<(String, Vec<_>)> = sources
                .iter()
                .map(|source| {
                    let text = collapse_line_continuations(&source.text);
                    (source.title.clone(), tokenize(&text))
                })
                .collect();
            let dumps: Vec<_> = lexed
                .iter()
                .map(|(title, tokens)| PassageDump {
                    title,
                    contents: Tokens {
                        tokens: tokens.iter().map(SpannedRef::new).collect(),
                    },
                })
                .collect();
            serde_json::to_string_pretty(&dumps)?
        }
        "commands" => {
            let passages: Vec<Passage> = sources
                .iter()
                .map(|source| Passage::parse(source.title.as_str(), &source.text))
                .collect();
            let dumps: Vec<_> = passages
                .iter()
                .map(|passage| PassageDump {
                    title: &passage.title,
                    contents: Commands {
                        commands: &passage.commands,
                    },
                })
                .collect();
            serde_json::to_string_pretty(&dumps)?
        }
        other => bail!("unknown dump kind {:?}, expected one of {:?}", other, DUMP_KINDS),
    };
    Ok(json)
}
