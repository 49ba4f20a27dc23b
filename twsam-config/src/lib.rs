//! Configuration loader for twsam.
//!
//! `defaults/twsam.default.toml` is embedded into the binary so the documented
//! defaults and the runtime behavior cannot drift apart. Callers layer their own
//! files and overrides on top via [`Loader`] before deserializing into
//! [`TwsamConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use twsam_compiler::twsam::codegen::variables::REGISTER_COUNT;
use twsam_compiler::twsam::codegen::{CompileOptions, OutputNaming};

const DEFAULT_TOML: &str = include_str!("../defaults/twsam.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TwsamConfig {
    pub compiler: CompilerConfig,
    pub output: OutputConfig,
}

/// Mirrors [`CompileOptions`].
#[derive(Debug, Clone, Deserialize)]
pub struct CompilerConfig {
    pub buffer_cap: usize,
    pub menu_label_width: usize,
    pub first_register: usize,
    pub reset_temps_per_passage: bool,
}

/// Mirrors [`OutputNaming`].
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub script_extension: String,
    pub script_list: String,
    pub image_list: String,
    pub music_list: String,
    pub music_suffix: String,
    pub empty_image: String,
    pub empty_music: String,
}

impl TwsamConfig {
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions::from(&self.compiler)
    }

    pub fn output_naming(&self) -> OutputNaming {
        OutputNaming::from(&self.output)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        let compiler = &self.compiler;
        // A and B belong to the menu, and at least one register must be left
        if !(2..REGISTER_COUNT).contains(&compiler.first_register) {
            return Err(ConfigError::Message(format!(
                "compiler.first_register must be between 2 and {}, got {}",
                REGISTER_COUNT - 1,
                compiler.first_register
            )));
        }
        if compiler.buffer_cap == 0 {
            return Err(ConfigError::Message(
                "compiler.buffer_cap must be positive".to_string(),
            ));
        }
        if compiler.menu_label_width == 0 {
            return Err(ConfigError::Message(
                "compiler.menu_label_width must be positive".to_string(),
            ));
        }
        if self.output.script_extension.is_empty() {
            return Err(ConfigError::Message(
                "output.script_extension must not be empty".to_string(),
            ));
        }
        Ok(self)
    }
}

impl From<&CompilerConfig> for CompileOptions {
    fn from(config: &CompilerConfig) -> Self {
        CompileOptions {
            buffer_cap: config.buffer_cap,
            menu_label_width: config.menu_label_width,
            first_register: config.first_register,
            reset_temps_per_passage: config.reset_temps_per_passage,
        }
    }
}

impl From<&OutputConfig> for OutputNaming {
    fn from(config: &OutputConfig) -> Self {
        OutputNaming {
            script_extension: config.script_extension.clone(),
            script_list: config.script_list.clone(),
            image_list: config.image_list.clone(),
            music_list: config.music_list.clone(),
            music_suffix: config.music_suffix.clone(),
            empty_image: config.empty_image.clone(),
            empty_music: config.empty_music.clone(),
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder, deserialize and validate.
    pub fn build(self) -> Result<TwsamConfig, ConfigError> {
        let config: TwsamConfig = self.builder.build()?.try_deserialize()?;
        config.validate()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<TwsamConfig, ConfigError> {
    Loader::new().build()
}
