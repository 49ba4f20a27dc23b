//! Command-line interface for twsam
//! This binary compiles twee stories into SAM scripts, one per passage, plus the script,
//! image and music manifests the SAM runtime loads.
//!
//! Usage:
//!   twsam `<sources>...` --out `<dir>` [--config `<file>`]  - Compile a story
//!   twsam `<sources>...` --dump tokens|commands             - Print passages as JSON
//!
//! Exit status is 0 on success, 2 when the story cannot be compiled (no `Start` passage,
//! a link to a missing passage) and 1 for I/O or configuration errors.

mod dump;
mod twee;

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;
use tracing::Level;
use twsam_compiler::twsam::error::CompileError;
use twsam_compiler::twsam::source::PassageSource;
use twsam_config::{Loader, TwsamConfig};

const EXIT_COMPILE_ERROR: u8 = 2;

fn cli() -> Command {
    Command::new("twsam")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile twee stories into SAM scripts")
        .arg_required_else_help(true)
        .arg(
            Arg::new("sources")
                .help("Twee source files, read in the order given")
                .required(true)
                .num_args(1..)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("out")
                .long("out")
                .short('o')
                .help("Destination directory for scripts and manifests")
                .required_unless_present("dump")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the built-in defaults")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("dump")
                .long("dump")
                .help("Print the passages as JSON instead of compiling")
                .value_parser(dump::DUMP_KINDS),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .short('l')
                .help("One of `TRACE`, `DEBUG`, `INFO`, `WARN`, or `ERROR`")
                .default_value("INFO")
                .value_parser(Level::from_str),
        )
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    let level = matches
        .get_one::<Level>("log-level")
        .copied()
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is::<CompileError>() => {
            tracing::error!("{err}");
            ExitCode::from(EXIT_COMPILE_ERROR)
        }
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let paths: Vec<&PathBuf> = matches
        .get_many::<PathBuf>("sources")
        .into_iter()
        .flatten()
        .collect();
    let sources = read_sources(&paths)?;

    if let Some(kind) = matches.get_one::<String>("dump") {
        println!("{}", dump::render(kind, &sources)?);
        return Ok(());
    }

    let config = load_config(matches.get_one::<PathBuf>("config"))?;
    let out = matches
        .get_one::<PathBuf>("out")
        .context("--out is required when not dumping")?;

    let story = twsam_compiler::compile(&sources, &config.compile_options())?;
    write_files(out, &story.files(&config.output_naming()))?;

    tracing::info!(
        scripts = story.scripts.len(),
        warnings = story.diagnostics.len(),
        "wrote {}",
        out.display()
    );
    Ok(())
}

fn read_sources(paths: &[&PathBuf]) -> Result<Vec<PassageSource>> {
    let mut sources = Vec::new();
    for path in paths {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let passages = twee::parse_twee(&text);
        tracing::debug!(path = %path.display(), passages = passages.len(), "read");
        sources.extend(passages);
    }
    Ok(sources)
}

fn load_config(path: Option<&PathBuf>) -> Result<TwsamConfig> {
    let mut loader = Loader::new();
    if let Some(path) = path {
        loader = loader.with_file(path);
    }
    loader.build().context("invalid configuration")
}

/// Files are only written once the whole story compiled.
fn write_files(out: &Path, files: &[(String, String)]) -> Result<()> {
    fs::create_dir_all(out).with_context(|| format!("cannot create {}", out.display()))?;
    for (name, contents) in files {
        let path = out.join(name);
        fs::write(&path, contents).with_context(|| format!("cannot write {}", path.display()))?;
    }
    Ok(())
}
