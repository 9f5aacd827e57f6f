//! Layered configuration for docex runs.
//!
//! `defaults/docex.default.toml` is embedded into the binary so that the documented
//! defaults and the runtime behavior cannot drift apart. Callers layer their own files
//! and command-line overrides on top with [`Loader`] before deserializing into
//! [`DocexConfig`].

use crate::evaluator::{EvaluatorRegistry, UnknownEvaluator};
use crate::orchestrator::Orchestrator;
use crate::parser::{CodeBlockParser, FencedBlockParser};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/docex.default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct DocexConfig {
    pub discovery: DiscoveryConfig,
    pub parsers: ParsersConfig,
    pub evaluators: EvaluatorsConfig,
    pub output: OutputConfig,
}

/// Which files make up the corpus
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    pub path: PathBuf,
    pub pattern: Option<String>,
    /// Empty means "use the pattern"
    pub filenames: Vec<PathBuf>,
    pub excludes: Vec<String>,
}

/// Which of the bundled parsers run
#[derive(Debug, Clone, Deserialize)]
pub struct ParsersConfig {
    pub codeblock: bool,
    pub fenced: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluatorsConfig {
    pub enabled: Vec<String>,
    pub pragmas: Vec<PragmaConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PragmaConfig {
    pub language: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

impl DocexConfig {
    /// A registry holding every enabled built-in evaluator
    pub fn registry(&self) -> Result<EvaluatorRegistry, UnknownEvaluator> {
        EvaluatorRegistry::with_builtins(&self.evaluators.enabled)
    }

    /// An orchestrator with the configured discovery settings and parsers.
    ///
    /// Each enabled parser gets its own copy of the registry and all configured pragmas.
    pub fn orchestrator(&self) -> Result<Orchestrator, UnknownEvaluator> {
        let registry = self.registry()?;
        let discovery = &self.discovery;

        let mut orchestrator = Orchestrator::new().with_path(&discovery.path);
        if let Some(pattern) = &discovery.pattern {
            orchestrator = orchestrator.with_pattern(pattern);
        }
        if !discovery.filenames.is_empty() {
            orchestrator = orchestrator.with_filenames(discovery.filenames.iter().cloned());
        }
        for exclude in &discovery.excludes {
            orchestrator = orchestrator.with_exclude(exclude);
        }

        if self.parsers.codeblock {
            let mut parser = CodeBlockParser::new(registry.clone());
            for pragma in &self.evaluators.pragmas {
                parser = parser.with_pragmas(&pragma.language, &pragma.lines);
            }
            orchestrator = orchestrator.with_parser(parser);
        }
        if self.parsers.fenced {
            let mut parser = FencedBlockParser::new(registry);
            for pragma in &self.evaluators.pragmas {
                parser = parser.with_pragmas(&pragma.language, &pragma.lines);
            }
            orchestrator = orchestrator.with_parser(parser);
        }
        Ok(orchestrator)
    }
}

/// Name of the per-project configuration file looked up in a documentation root
pub const PROJECT_FILE: &str = "docex.toml";

/// Builds a [`DocexConfig`] from layers, later layers winning.
///
/// The embedded defaults are always the bottom layer. A typical run stacks the project
/// file of the documentation root, an explicit `--config` file and then command-line
/// flags on top of them.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml)),
        }
    }

    /// Layer a TOML file that must exist
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Layer a TOML file if it exists
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    /// Layer `docex.toml` from the documentation root, when there is one
    pub fn with_project_file(self, root: impl AsRef<Path>) -> Self {
        self.with_optional_file(root.as_ref().join(PROJECT_FILE))
    }

    /// Set one dotted key, e.g. `discovery.pattern`
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<DocexConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocexConfig {
    /// The embedded defaults alone
    pub fn defaults() -> Result<Self, ConfigError> {
        Loader::new().build()
    }
}
