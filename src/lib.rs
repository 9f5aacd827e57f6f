//! # docex
//!
//! Treat the examples embedded in documentation as tests.
//!
//! Documentation text is scanned by pluggable parsers, each of which yields
//! regions: spans of the text carrying a parsed payload and the evaluator that
//! knows how to check it. Regions are collected into a [`Document`] that keeps
//! them ordered and non-overlapping, and every region is exposed as an
//! [`Example`] that can be evaluated against a shared [`Namespace`] and
//! reported by path, line and column.
//!
//! File Layout
//!
//!     .
//!     ├── region.rs           # Region: span + payload + evaluator
//!     ├── location.rs         # byte offset -> line:column
//!     ├── document.rs         # Document: text + ordered regions
//!     │   └── sources.rs      # start/end marker scanning for parsers
//!     ├── example.rs          # Example: a region resolved against its document
//!     ├── namespace.rs        # state shared between examples
//!     ├── evaluator.rs        # Evaluator trait and outcomes
//!     │   ├── registry.rs     # language tag -> evaluator
//!     │   └── <builtin>.rs    # json, yaml, sh
//!     ├── parser.rs           # Parser trait
//!     │   ├── codeblock.rs    # reStructuredText `code-block` directives
//!     │   ├── fenced.rs       # Markdown fences
//!     │   └── text.rs         # dedent and line alignment
//!     ├── orchestrator.rs     # discovery and parser composition
//!     ├── runner.rs           # evaluation driver and reports
//!     ├── config.rs           # layered configuration
//!     └── error.rs
//!
//! The core never executes anything on its own. Evaluators are capabilities
//! handed in by whoever builds the parsers, so what "running an example"
//! means is entirely up to them.

pub mod config;
pub mod document;
pub mod error;
pub mod evaluator;
pub mod example;
pub mod location;
pub mod namespace;
pub mod orchestrator;
pub mod parser;
pub mod region;
pub mod runner;

pub use document::Document;
pub use error::{
    BoxError, CorpusError, DocumentError, EvaluationError, EvaluationFailure, LoaderError,
    OverlapError, PositionError,
};
pub use evaluator::{evaluator_fn, Evaluator, EvaluatorRegistry, Outcome};
pub use example::{Example, ExampleLocation};
pub use location::Position;
pub use namespace::Namespace;
pub use orchestrator::Orchestrator;
pub use parser::{CodeBlockParser, FencedBlockParser, Parser, Regions};
pub use region::Region;
pub use runner::{Report, Runner};
