//! JSON blocks must parse.

use super::{code_block, Evaluator, Outcome};
use crate::error::BoxError;
use crate::namespace::Namespace;
use std::any::Any;

/// Checks that a block is valid JSON and binds the parsed value to `json`.
///
/// The block source is line-aligned with the document, so line numbers in parse errors
/// point into the document itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonEvaluator;

impl Evaluator for JsonEvaluator {
    fn name(&self) -> &str {
        "json"
    }

    fn evaluate(&self, parsed: &dyn Any, namespace: &mut Namespace) -> Result<Outcome, BoxError> {
        let block = code_block(self.name(), parsed)?;
        match serde_json::from_str::<serde_json::Value>(&block.source) {
            Ok(value) => {
                namespace.insert("json", value);
                Ok(Outcome::Pass)
            }
            Err(err) => Ok(Outcome::fail(format!("invalid JSON: {}", err))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CodeBlock;

    fn block(source: &str) -> CodeBlock {
        CodeBlock {
            language: "json".to_string(),
            source: source.to_string(),
        }
    }

    #[test]
    fn test_valid_json_is_bound() {
        let mut namespace = Namespace::new();
        let outcome = JsonEvaluator
            .evaluate(&block("\n\n{\"a\": [1, 2]}\n"), &mut namespace)
            .unwrap();

        assert_eq!(outcome, Outcome::Pass);
        let value = namespace.get::<serde_json::Value>("json").unwrap();
        assert_eq!(value["a"][1], 2);
    }

    #[test]
    fn test_error_reports_document_line() {
        let outcome = JsonEvaluator
            .evaluate(&block("\n\n\n{\"a\": }\n"), &mut Namespace::new())
            .unwrap();

        match outcome {
            Outcome::Fail(message) => {
                assert!(message.starts_with("invalid JSON: "), "{}", message);
                assert!(message.contains("line 4"), "{}", message);
            }
            Outcome::Pass => panic!("expected a failure"),
        }
    }
}
