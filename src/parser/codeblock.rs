//! reStructuredText `code-block` directives
//!
//! Recognises `.. code-block:: <language>`, plus the `code`, `invisible-code` and
//! `invisible-code-block` spellings, with any number of `:option:` lines after the
//! directive. The body is the indented text that follows, up to the first non-blank line
//! indented no deeper than the directive itself:
//!
//! ```text
//! .. code-block:: json
//!    :caption: settings
//!
//!     {"answer": 42}
//!
//! This paragraph is no longer part of the block.
//! ```

use super::{Dispatch, Parser, Regions};
use crate::document::Document;
use crate::evaluator::{Evaluator, EvaluatorRegistry};
use crate::parser::text;
use crate::region::Region;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::rc::Rc;

static CODEBLOCK_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^(?P<indent>[ \t]*)\.\.\s*(?:invisible-)?code(?:-block)?::?\s*(?P<language>[\w-]+)\b",
        r"(?:\s*:[\w-]+:.*\n)*",
        r"(?:[ \t]*\n)*",
    ))
    .unwrap()
});

/// Finds `code-block` directives and dispatches them on their language tag.
///
/// Blocks whose language has no evaluator in the parser's registry are skipped.
#[derive(Debug, Clone, Default)]
pub struct CodeBlockParser {
    dispatch: Dispatch,
}

impl CodeBlockParser {
    pub fn new(registry: EvaluatorRegistry) -> Self {
        Self {
            dispatch: Dispatch::new(registry),
        }
    }

    /// Lines injected at the top of every block tagged `language`.
    ///
    /// They replace blank alignment lines, so line numbers of the body are unchanged.
    pub fn with_pragmas<I, S>(mut self, language: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dispatch.set_pragmas(language, lines);
        self
    }

    /// Register an evaluator for this parser only
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

    fn region(&self, document: &Document, captures: &Captures<'_>) -> Option<Region> {
        let directive = captures.get(0)?;
        let indent = captures.name("indent").map_or(0, |m| m.len());
        let language = captures.name("language")?.as_str();

        let body_start = directive.end();
        let body_end = text::indented_body_end(document.text(), body_start, indent);
        self.dispatch.region(
            document,
            language,
            directive.start()..body_end,
            body_start..body_end,
        )
    }
}

impl Parser for CodeBlockParser {
    fn name(&self) -> &str {
        "codeblock"
    }

    fn parse<'a>(&'a self, document: &'a Document) -> Regions<'a> {
        Box::new(
            CODEBLOCK_START
                .captures_iter(document.text())
                .filter_map(move |captures| self.region(document, &captures)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{evaluator_fn, Outcome};
    use crate::namespace::Namespace;
    use crate::parser::CodeBlock;

    const SAMPLE: &str = r#"Some text.

.. code-block:: json

    {"a": 1}

More text.

.. code-block:: python

    print("hi")

.. code-block:: yaml
   :caption: thing

   a: 1
   b: 2
"#;

    fn parser() -> CodeBlockParser {
        CodeBlockParser::new(EvaluatorRegistry::with_builtins(["json", "yaml"]).unwrap())
    }

    fn blocks(parser: &CodeBlockParser, document: &Document) -> Vec<CodeBlock> {
        parser
            .parse(document)
            .map(|region| region.parsed_as::<CodeBlock>().unwrap().clone())
            .collect()
    }

    #[test]
    fn test_unregistered_language_is_skipped() {
        let document = Document::new(SAMPLE, "sample.rst");
        let languages: Vec<_> = blocks(&parser(), &document)
            .into_iter()
            .map(|block| block.language)
            .collect();
        assert_eq!(languages, vec!["json", "yaml"]);
    }

    #[test]
    fn test_source_is_dedented_and_aligned() {
        let document = Document::new(SAMPLE, "sample.rst");
        let blocks = blocks(&parser(), &document);

        assert_eq!(blocks[0].source, "\n\n\n\n{\"a\": 1}\n");
        assert_eq!(blocks[0].first_line(), 5);
        assert_eq!(blocks[1].source, format!("{}a: 1\nb: 2", "\n".repeat(15)));
        assert_eq!(blocks[1].first_line(), 16);
    }

    #[test]
    fn test_region_covers_directive_and_body() {
        let document = Document::new(SAMPLE, "sample.rst");
        let regions: Vec<_> = parser().parse(&document).collect();

        let first = &document.text()[regions[0].span()];
        assert_eq!(first, ".. code-block:: json\n\n    {\"a\": 1}\n");
        assert_eq!(document.line_column(regions[0].start()).line, 3);
        assert_eq!(regions[1].end(), SAMPLE.len() - 1);
    }

    #[test]
    fn test_nested_directive_ends_at_its_own_indent() {
        let text = "- item\n\n  .. code-block:: json\n\n     [1]\n\n  next para\n";
        let document = Document::new(text, "nested.rst");
        let regions: Vec<_> = parser().parse(&document).collect();

        assert_eq!(regions.len(), 1);
        assert_eq!(
            &text[regions[0].span()],
            "  .. code-block:: json\n\n     [1]\n"
        );
        let block = regions[0].parsed_as::<CodeBlock>().unwrap();
        assert_eq!(block.body(), "[1]\n");
    }

    #[test]
    fn test_directive_spellings() {
        let text = ".. code:: json\n\n   1\n\n.. invisible-code-block: json\n\n   2\n";
        let document = Document::new(text, "spellings.rst");
        let bodies: Vec<_> = blocks(&parser(), &document)
            .into_iter()
            .map(|block| block.body().to_string())
            .collect();
        assert_eq!(bodies, vec!["1\n", "2"]);
    }

    #[test]
    fn test_directive_spacing_is_optional() {
        let text = "..code-block:: json\n\n   1\n\n.. code-block::yaml\n\n   a: 2\n";
        let document = Document::new(text, "spacing.rst");
        let languages: Vec<_> = blocks(&parser(), &document)
            .into_iter()
            .map(|block| block.language)
            .collect();
        assert_eq!(languages, vec!["json", "yaml"]);
    }

    #[test]
    fn test_pragmas_take_the_place_of_blank_lines() {
        let capture = evaluator_fn("capture", |_: &CodeBlock, _| Ok(Outcome::Pass));
        let parser = CodeBlockParser::new(EvaluatorRegistry::new().with("python", capture))
            .with_pragmas("python", ["from __future__ import annotations"]);
        let document = Document::new(SAMPLE, "sample.rst");

        let blocks = blocks(&parser, &document);
        assert_eq!(blocks.len(), 1);
        assert_eq!(
            blocks[0].source,
            format!(
                "{}from __future__ import annotations\nprint(\"hi\")\n",
                "\n".repeat(9)
            )
        );
        assert_eq!(blocks[0].first_line(), 10);
        assert_eq!(document.line_column(SAMPLE.find("print").unwrap()).line, 11);
    }

    #[test]
    fn test_parsed_blocks_evaluate() {
        let source = Document::new(SAMPLE, "sample.rst");
        let parser = parser();
        let mut document = Document::new(SAMPLE, "sample.rst");
        for region in parser.parse(&source) {
            document.add(region).unwrap();
        }
        let mut namespace = Namespace::new();

        for example in &document {
            example.evaluate(&mut namespace).unwrap();
        }
        assert_eq!(namespace.get::<serde_yaml::Value>("yaml").unwrap()["b"], 2);
    }

    #[test]
    fn test_parser_owns_its_evaluators() {
        let mut parser = CodeBlockParser::default();
        assert!(parser.registry().is_empty());
        parser.add_evaluator("json", evaluator_fn("mine", |_: &CodeBlock, _| Ok(Outcome::Pass)));

        let document = Document::new(SAMPLE, "sample.rst");
        let names: Vec<_> = parser
            .parse(&document)
            .map(|region| region.evaluator().name().to_string())
            .collect();
        assert_eq!(names, vec!["mine"]);
    }
}
