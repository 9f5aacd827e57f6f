//! Orchestrator: from a directory of files to a corpus of documents
//!
//! The orchestrator holds an ordered list of parsers and a discovery configuration:
//!
//! - `path`: the root directory, `.` by default;
//! - `pattern`: a glob selecting files under the root (matched against file names, so
//!   `*.rst` finds `.rst` files at any depth), or
//! - `filenames`: an explicit list of files relative to the root, which wins over the
//!   pattern when both are set;
//! - `excludes`: globs of files to leave out.
//!
//! With neither a pattern nor a filename list nothing is discovered.
//!
//! Every discovered file becomes one [`Document`], with the regions of every parser
//! added in parser order. Parsers that disagree about who owns a piece of text are a
//! configuration error reported as [`CorpusError::Document`], never resolved silently.

use crate::document::Document;
use crate::error::CorpusError;
use crate::namespace::Namespace;
use crate::parser::Parser;
use crate::region::Region;
use ignore::overrides::{Override, OverrideBuilder};
use ignore::{Walk, WalkBuilder};
use std::fmt;
use std::path::{Path, PathBuf};
use std::vec;
use tracing::debug;

/// A setup or teardown hook, run against a document's namespace
pub type Hook = Box<dyn Fn(&mut Namespace)>;

pub struct Orchestrator {
    parsers: Vec<Box<dyn Parser>>,
    path: PathBuf,
    pattern: Option<String>,
    filenames: Option<Vec<PathBuf>>,
    excludes: Vec<String>,
    setup: Option<Hook>,
    teardown: Option<Hook>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
            path: PathBuf::from("."),
            pattern: None,
            filenames: None,
            excludes: Vec::new(),
            setup: None,
            teardown: None,
        }
    }

    /// Append a parser. Parsers run in the order they were added.
    pub fn with_parser(mut self, parser: impl Parser + 'static) -> Self {
        self.parsers.push(Box::new(parser));
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_filenames<I, P>(mut self, filenames: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.filenames = Some(filenames.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_exclude(mut self, glob: impl Into<String>) -> Self {
        self.excludes.push(glob.into());
        self
    }

    /// Run `hook` on every document's namespace before its first example
    pub fn with_setup(mut self, hook: impl Fn(&mut Namespace) + 'static) -> Self {
        self.setup = Some(Box::new(hook));
        self
    }

    /// Run `hook` on every document's namespace after its last example
    pub fn with_teardown(mut self, hook: impl Fn(&mut Namespace) + 'static) -> Self {
        self.teardown = Some(Box::new(hook));
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parser_names(&self) -> Vec<&str> {
        self.parsers.iter().map(|parser| parser.name()).collect()
    }

    pub fn setup(&self, namespace: &mut Namespace) {
        if let Some(hook) = &self.setup {
            hook(namespace);
        }
    }

    pub fn teardown(&self, namespace: &mut Namespace) {
        if let Some(hook) = &self.teardown {
            hook(namespace);
        }
    }

    /// Lazily list the files to parse.
    ///
    /// The file system is walked again on every call. Walks are sorted by file name so
    /// that runs are reproducible.
    pub fn discover(&self) -> Result<Discovery, CorpusError> {
        if let Some(filenames) = &self.filenames {
            let overrides = self.overrides(None)?;
            let listed: Vec<_> = filenames
                .iter()
                .map(|filename| self.path.join(filename))
                .filter(|path| !overrides.matched(path, false).is_ignore())
                .collect();
            debug!(root = %self.path.display(), files = listed.len(), "using explicit file list");
            return Ok(Discovery::Listed(listed.into_iter()));
        }

        let Some(pattern) = &self.pattern else {
            return Ok(Discovery::Listed(Vec::new().into_iter()));
        };
        debug!(root = %self.path.display(), pattern = %pattern, "walking");
        let walk = WalkBuilder::new(&self.path)
            .standard_filters(false)
            .overrides(self.overrides(Some(pattern.as_str()))?)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();
        Ok(Discovery::Walk {
            root: self.path.clone(),
            walk,
        })
    }

    fn overrides(&self, pattern: Option<&str>) -> Result<Override, CorpusError> {
        let mut builder = OverrideBuilder::new(&self.path);
        let globs = pattern
            .map(str::to_string)
            .into_iter()
            .chain(self.excludes.iter().map(|glob| format!("!{}", glob)));
        for glob in globs {
            builder
                .add(&glob)
                .map_err(|source| CorpusError::Pattern {
                    pattern: glob.clone(),
                    source,
                })?;
        }
        builder.build().map_err(|source| CorpusError::Pattern {
            pattern: pattern.unwrap_or_default().to_string(),
            source,
        })
    }

    /// Build the document for one file, with the regions of every parser added.
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<Document, CorpusError> {
        let path = path.as_ref();
        let mut document = Document::from_path(path)?;
        for parser in &self.parsers {
            let regions: Vec<Region> = parser.parse(&document).collect();
            debug!(path = %path.display(), parser = parser.name(), regions = regions.len(), "parsed");
            for region in regions {
                document
                    .add(region)
                    .map_err(|source| CorpusError::Document {
                        path: path.to_path_buf(),
                        source,
                    })?;
            }
        }
        Ok(document)
    }

    /// One document per discovered file, in discovery order.
    ///
    /// Files are read and parsed as the iterator is advanced.
    pub fn all_documents(
        &self,
    ) -> Result<impl Iterator<Item = Result<Document, CorpusError>> + '_, CorpusError> {
        Ok(self
            .discover()?
            .map(move |path| path.and_then(|path| self.parse(path))))
    }

    /// Whether a file handed in by a test-runner would have been discovered.
    ///
    /// With a filename list the path must end with one of the listed names; otherwise
    /// it must match the pattern. Excluded files are never accepted.
    pub fn accepts(&self, path: impl AsRef<Path>) -> Result<bool, CorpusError> {
        let path = path.as_ref();
        if let Some(filenames) = &self.filenames {
            let listed = filenames.iter().any(|filename| path.ends_with(filename));
            return Ok(listed && !self.overrides(None)?.matched(path, false).is_ignore());
        }
        match &self.pattern {
            Some(pattern) => Ok(self
                .overrides(Some(pattern.as_str()))?
                .matched(path, false)
                .is_whitelist()),
            None => Ok(false),
        }
    }

    /// The document for `path` if this orchestrator accepts it
    pub fn collect(&self, path: impl AsRef<Path>) -> Option<Result<Document, CorpusError>> {
        let path = path.as_ref();
        match self.accepts(path) {
            Ok(true) => Some(self.parse(path)),
            Ok(false) => None,
            Err(error) => Some(Err(error)),
        }
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("parsers", &self.parser_names())
            .field("path", &self.path)
            .field("pattern", &self.pattern)
            .field("filenames", &self.filenames)
            .field("excludes", &self.excludes)
            .field("setup", &self.setup.is_some())
            .field("teardown", &self.teardown.is_some())
            .finish()
    }
}

/// Lazy sequence of discovered files
pub enum Discovery {
    Listed(vec::IntoIter<PathBuf>),
    Walk { root: PathBuf, walk: Walk },
}

impl Iterator for Discovery {
    type Item = Result<PathBuf, CorpusError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Discovery::Listed(paths) => paths.next().map(Ok),
            Discovery::Walk { root, walk } => loop {
                let entry = match walk.next()? {
                    Ok(entry) => entry,
                    Err(source) => {
                        return Some(Err(CorpusError::Walk {
                            root: root.clone(),
                            source,
                        }))
                    }
                };
                if entry.file_type().map_or(false, |kind| kind.is_file()) {
                    debug!(path = %entry.path().display(), "discovered");
                    return Some(Ok(entry.into_path()));
                }
            },
        }
    }
}

impl fmt::Debug for Discovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discovery::Listed(paths) => f.debug_tuple("Listed").field(&paths.as_slice()).finish(),
            Discovery::Walk { root, .. } => f.debug_struct("Walk").field("root", root).finish(),
        }
    }
}
