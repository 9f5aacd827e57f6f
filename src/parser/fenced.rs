//! Markdown fenced code blocks
//!
//! ````text
//! ```json
//! {"answer": 42}
//! ```
//! ````
//!
//! Only fences carrying a language tag open a block. A fence that is never closed is
//! not a block.

use super::{Dispatch, Parser, Regions};
use crate::document::{Document, RegionSource};
use crate::evaluator::{Evaluator, EvaluatorRegistry};
use crate::region::Region;
use once_cell::sync::Lazy;
use regex::Regex;
use std::rc::Rc;

static FENCE_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*```[ \t]*(?P<language>[\w+-]+)[^\n]*\n").unwrap());

static FENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*```[ \t]*\r?$").unwrap());

/// Finds fenced blocks and dispatches them on their language tag
#[derive(Debug, Clone, Default)]
pub struct FencedBlockParser {
    dispatch: Dispatch,
}

impl FencedBlockParser {
    pub fn new(registry: EvaluatorRegistry) -> Self {
        Self {
            dispatch: Dispatch::new(registry),
        }
    }

    /// Lines injected at the top of every block tagged `language`
    pub fn with_pragmas<I, S>(mut self, language: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dispatch.set_pragmas(language, lines);
        self
    }

    pub fn add_evaluator(
        &mut self,
        language: impl Into<String>,
        evaluator: Rc<dyn Evaluator>,
    ) -> Option<Rc<dyn Evaluator>> {
        self.dispatch.add_evaluator(language, evaluator)
    }

    pub fn registry(&self) -> &EvaluatorRegistry {
        &self.dispatch.registry
    }

    fn region(&self, document: &Document, source: &RegionSource<'_>) -> Option<Region> {
        let language = source.captures().name("language")?.as_str();
        self.dispatch
            .region(document, language, source.span(), source.body_span())
    }
}

impl Parser for FencedBlockParser {
    fn name(&self) -> &str {
        "fenced"
    }

    fn parse<'a>(&'a self, document: &'a Document) -> Regions<'a> {
        Box::new(
            document
                .find_region_sources(&FENCE_START, &FENCE_END)
                .filter_map(move |source| self.region(document, &source)),
        )
    }
}
