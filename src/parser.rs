//! Parsers: finding examples in document text
//!
//! A parser scans a [`Document`] and yields [`Region`]s. Parsers never touch the
//! document themselves; whoever drives them adds the regions, and the document enforces
//! ordering and non-overlap. That leaves parsers free to:
//!
//! - yield regions in any order;
//! - pick an evaluator per region (the block parsers dispatch on a language tag);
//! - yield nothing at all, which is never an error.
//!
//! Parsers are lazy and restartable: `parse` recomputes everything from the document
//! text each time it is called.
//!
//! Any `Fn(&Document) -> Vec<Region>` is a parser, which keeps one-off parsers short:
//!
//! ```ignore
//! let first_line = |document: &Document| {
//!     let line = document.text().split('\n').next().unwrap_or("");
//!     vec![Region::new(0, line.len(), line.to_string(), evaluator.clone())]
//! };
//! ```

use crate::document::Document;
use crate::evaluator::{Evaluator, EvaluatorRegistry};
use crate::region::Region;
use std::any::type_name;
use std::collections::HashMap;
use std::ops::Range;
use std::rc::Rc;
use tracing::trace;

pub mod codeblock;
pub mod fenced;
pub mod text;

pub use codeblock::CodeBlockParser;
pub use fenced::FencedBlockParser;

/// The lazy sequence of regions a parser yields
pub type Regions<'a> = Box<dyn Iterator<Item = Region> + 'a>;

pub trait Parser {
    /// Name used in logs
    fn name(&self) -> &str {
        type_name::<Self>()
    }

    fn parse<'a>(&'a self, document: &'a Document) -> Regions<'a>;
}

impl<F> Parser for F
where
    F: Fn(&Document) -> Vec<Region>,
{
    fn parse<'a>(&'a self, document: &'a Document) -> Regions<'a> {
        Box::new(self(document).into_iter())
    }
}

/// Payload of the regions produced by the block parsers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// The language tag the block was introduced with
    pub language: String,
    /// Dedented body, line-aligned with the document (see [`text::align`])
    pub source: String,
}

impl CodeBlock {
    /// The source without its alignment lines
    pub fn body(&self) -> &str {
        self.source.trim_start_matches('\n')
    }

    /// Document line that the first line of [`body`](Self::body) is aligned with.
    ///
    /// Injected pragma lines are part of the body, so with pragmas this is the line of
    /// the first pragma and the block's own text starts one line per pragma later.
    pub fn first_line(&self) -> usize {
        self.source.len() - self.body().len() + 1
    }
}

/// Language dispatch shared by the block parsers.
///
/// Turns a located block into a region when its language has an evaluator, dedenting the
/// body and aligning it with the document.
#[derive(Debug, Clone, Default)]
struct Dispatch {
    registry: EvaluatorRegistry,
    pragmas: HashMap<String, Vec<String>>,
}

impl Dispatch {
    fn new(registry: EvaluatorRegistry) -> Self {
        Self {
            registry,
            pragmas: HashMap::new(),
        }
    }

    fn add_evaluator(
        &mut self,
        language: impl Into<String>,
        evaluator: Rc<dyn Evaluator>,
    ) -> Option<Rc<dyn Evaluator>> {
        self.registry.register(language, evaluator)
    }

    fn set_pragmas<I, S>(&mut self, language: impl Into<String>, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pragmas
            .insert(language.into(), lines.into_iter().map(Into::into).collect());
    }

    fn region(
        &self,
        document: &Document,
        language: &str,
        span: Range<usize>,
        body: Range<usize>,
    ) -> Option<Region> {
        let Some(evaluator) = self.registry.get(language) else {
            trace!(path = %document.path().display(), language, offset = span.start, "no evaluator, skipping block");
            return None;
        };
        let pragmas = self.pragmas.get(language).map_or(&[][..], Vec::as_slice);
        let newlines_before = document.line_column(body.start).line - 1;
        let source = text::align(
            &text::dedent(&document.text()[body]),
            newlines_before,
            pragmas,
        );
        let block = CodeBlock {
            language: language.to_string(),
            source,
        };
        Some(Region::new(span.start, span.end, block, evaluator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{evaluator_fn, Outcome};

    #[test]
    fn test_closures_are_parsers() {
        let evaluator = evaluator_fn("noop", |_: &String, _| Ok(Outcome::Pass));
        let first_line = move |document: &Document| {
            let line = document.text().split('\n').next().unwrap_or("");
            vec![Region::new(0, line.len(), line.to_string(), evaluator.clone())]
        };
        let document = Document::new("# believe it or not,\nmore\n", "doc.txt");

        let regions: Vec<_> = first_line.parse(&document).collect();
        assert_eq!(regions.len(), 1);
        assert_eq!(
            regions[0].parsed_as::<String>().map(String::as_str),
            Some("# believe it or not,")
        );
        // restartable
        assert_eq!(first_line.parse(&document).count(), 1);
    }

    #[test]
    fn test_code_block_lines() {
        let block = CodeBlock {
            language: "json".to_string(),
            source: "\n\n\n{}\n".to_string(),
        };
        assert_eq!(block.body(), "{}\n");
        assert_eq!(block.first_line(), 4);
    }
}
