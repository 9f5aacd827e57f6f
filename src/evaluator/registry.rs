//! Evaluator registry keyed by language tag
//!
//! Parsers that dispatch on a language tag (`.. code-block:: json`, ```` ```yaml ````) own
//! a registry and look the tag up for every block they find. A tag with no registered
//! evaluator is not an error: the block is simply not an example.
//!
//! Registries are plain values. Two parsers in the same run can hold different
//! registries, and cloning one only bumps reference counts.

use super::{Evaluator, JsonEvaluator, ShellEvaluator, YamlEvaluator};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Names accepted by [`EvaluatorRegistry::builtin`]
pub const BUILTINS: &[&str] = &["bash", "json", "sh", "yaml"];

/// A configured evaluator name that is not built in
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown evaluator '{name}' (available: {})", BUILTINS.join(", "))]
pub struct UnknownEvaluator {
    pub name: String,
}

#[derive(Clone, Default)]
pub struct EvaluatorRegistry {
    evaluators: HashMap<String, Rc<dyn Evaluator>>,
}

impl EvaluatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an evaluator for a language tag.
    ///
    /// If the tag already has an evaluator it is replaced and returned.
    pub fn register(
        &mut self,
        language: impl Into<String>,
        evaluator: Rc<dyn Evaluator>,
    ) -> Option<Rc<dyn Evaluator>> {
        self.evaluators.insert(language.into(), evaluator)
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, language: impl Into<String>, evaluator: Rc<dyn Evaluator>) -> Self {
        self.register(language, evaluator);
        self
    }

    pub fn get(&self, language: &str) -> Option<Rc<dyn Evaluator>> {
        self.evaluators.get(language).cloned()
    }

    pub fn has(&self, language: &str) -> bool {
        self.evaluators.contains_key(language)
    }

    /// All registered language tags (sorted)
    pub fn languages(&self) -> Vec<String> {
        let mut languages: Vec<_> = self.evaluators.keys().cloned().collect();
        languages.sort();
        languages
    }

    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }

    /// A built-in evaluator by name
    pub fn builtin(name: &str) -> Option<Rc<dyn Evaluator>> {
        match name {
            "json" => Some(Rc::new(JsonEvaluator)),
            "yaml" => Some(Rc::new(YamlEvaluator)),
            "sh" => Some(Rc::new(ShellEvaluator::new("sh"))),
            "bash" => Some(Rc::new(ShellEvaluator::new("bash"))),
            _ => None,
        }
    }

    /// A registry holding the named built-in evaluators under all of their tags
    pub fn with_builtins<I, S>(names: I) -> Result<Self, UnknownEvaluator>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::new();
        for name in names {
            let name = name.as_ref();
            let evaluator = Self::builtin(name).ok_or_else(|| UnknownEvaluator {
                name: name.to_string(),
            })?;
            for language in builtin_languages(name) {
                registry.register(*language, Rc::clone(&evaluator));
            }
        }
        Ok(registry)
    }
}

/// The language tags a built-in evaluator answers to
fn builtin_languages(name: &str) -> &'static [&'static str] {
    match name {
        "json" => &["json"],
        "yaml" => &["yaml", "yml"],
        "sh" => &["sh", "shell"],
        "bash" => &["bash"],
        _ => &[],
    }
}

impl fmt::Debug for EvaluatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self
            .evaluators
            .iter()
            .map(|(language, evaluator)| (language.as_str(), evaluator.name()))
            .collect();
        entries.sort_unstable();
        f.debug_map().entries(entries).finish()
    }
}
