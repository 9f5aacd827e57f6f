//! YAML blocks must parse.

use super::{code_block, Evaluator, Outcome};
use crate::error::BoxError;
use crate::namespace::Namespace;
use std::any::Any;

/// Checks that a block is valid YAML and binds the parsed value to `yaml`.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlEvaluator;

impl Evaluator for YamlEvaluator {
    fn name(&self) -> &str {
        "yaml"
    }

    fn evaluate(&self, parsed: &dyn Any, namespace: &mut Namespace) -> Result<Outcome, BoxError> {
        let block = code_block(self.name(), parsed)?;
        match serde_yaml::from_str::<serde_yaml::Value>(&block.source) {
            Ok(value) => {
                namespace.insert("yaml", value);
                Ok(Outcome::Pass)
            }
            Err(err) => Ok(Outcome::fail(format!("invalid YAML: {}", err))),
        }
    }
}
