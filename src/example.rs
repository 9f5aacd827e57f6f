//! Examples: a region resolved against the document it came from
//!
//! Examples are not stored anywhere. They are built on the fly while iterating a
//! [`Document`] and derive everything (path, line, column) from the document and the
//! region's start offset.

use crate::document::Document;
use crate::error::{EvaluationError, EvaluationFailure};
use crate::evaluator::{Evaluator, Outcome};
use crate::location::Position;
use crate::namespace::Namespace;
use crate::region::Region;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

#[derive(Clone, Copy)]
pub struct Example<'a> {
    document: &'a Document,
    region: &'a Region,
}

impl<'a> Example<'a> {
    pub fn new(document: &'a Document, region: &'a Region) -> Self {
        Self { document, region }
    }

    pub fn document(&self) -> &'a Document {
        self.document
    }

    pub fn region(&self) -> &'a Region {
        self.region
    }

    pub fn path(&self) -> &'a Path {
        self.document.path()
    }

    pub fn position(&self) -> Position {
        self.document.line_column(self.region.start())
    }

    pub fn line(&self) -> usize {
        self.position().line
    }

    pub fn column(&self) -> usize {
        self.position().column
    }

    pub fn evaluator(&self) -> &'a dyn Evaluator {
        self.region.evaluator()
    }

    /// Owned snapshot of where this example lives
    pub fn location(&self) -> ExampleLocation {
        let position = self.position();
        ExampleLocation {
            path: self.path().to_path_buf(),
            line: position.line,
            column: position.column,
            evaluator: self.evaluator().name().to_string(),
        }
    }

    /// Run the region's evaluator over its payload.
    ///
    /// `Outcome::Fail` becomes an [`EvaluationFailure`] pointing at this example. An
    /// error raised by the evaluator is returned as [`EvaluationError::Raised`] without
    /// being wrapped or rewritten.
    pub fn evaluate(&self, namespace: &mut Namespace) -> Result<(), EvaluationError> {
        trace!(example = %self, evaluator = self.evaluator().name(), "evaluating");
        match self.evaluator().evaluate(self.region.parsed(), namespace) {
            Ok(Outcome::Pass) => Ok(()),
            Ok(Outcome::Fail(result)) => Err(EvaluationFailure {
                example: self.location(),
                result,
            }
            .into()),
            Err(error) => {
                warn!(example = %self, %error, "evaluator raised");
                Err(EvaluationError::Raised(error))
            }
        }
    }
}

impl fmt::Display for Example<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path().display(), self.position())
    }
}

impl fmt::Debug for Example<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let position = self.position();
        f.debug_struct("Example")
            .field("path", &self.path())
            .field("line", &position.line)
            .field("column", &position.column)
            .field("evaluator", &self.evaluator().name())
            .finish()
    }
}

/// Where an example lives, detached from the document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ExampleLocation {
    pub path: PathBuf,
    pub line: usize,
    pub column: usize,
    pub evaluator: String,
}

impl fmt::Display for ExampleLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path.display(), self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::evaluator::evaluator_fn;
    use std::io;

    fn document_with(evaluator: std::rc::Rc<dyn Evaluator>) -> Document {
        let mut document = Document::new("first\nsecond line\n", "/the/path");
        document
            .add(Region::new(7, 13, "the data".to_string(), evaluator))
            .unwrap();
        document
    }

    #[test]
    fn test_derived_attributes() {
        let document = document_with(evaluator_fn("check", |_: &String, _| Ok(Outcome::Pass)));
        let example = document.examples().next().unwrap();

        assert_eq!(example.path(), Path::new("/the/path"));
        assert_eq!((example.line(), example.column()), (2, 2));
        assert_eq!(example.to_string(), "/the/path:2:2");
        assert_eq!(
            format!("{:?}", example),
            r#"Example { path: "/the/path", line: 2, column: 2, evaluator: "check" }"#
        );
    }

    #[test]
    fn test_evaluate_okay() {
        let document = document_with(evaluator_fn("store", |parsed: &String, namespace| {
            namespace.insert("parsed", parsed.clone());
            Ok(Outcome::Pass)
        }));
        let mut namespace = Namespace::new();

        let example = document.examples().next().unwrap();
        assert!(example.evaluate(&mut namespace).is_ok());
        assert_eq!(
            namespace.get::<String>("parsed").map(String::as_str),
            Some("the data")
        );
    }

    #[test]
    fn test_evaluate_not_okay() {
        let document = document_with(evaluator_fn("check", |_: &String, _| {
            Ok(Outcome::fail("foo!"))
        }));
        let example = document.examples().next().unwrap();

        let error = example.evaluate(&mut Namespace::new()).unwrap_err();
        let failure = error.failure().unwrap();
        assert_eq!(
            error.to_string(),
            "example at /the/path, line 2, column 2 did not evaluate as expected:\nfoo!"
        );
        assert_eq!(failure.example, example.location());
        assert_eq!(failure.result, "foo!");
    }

    #[test]
    fn test_evaluate_raises() {
        let document = document_with(evaluator_fn("check", |_: &String, _| -> Result<Outcome, BoxError> {
            Err(Box::new(io::Error::new(io::ErrorKind::InvalidData, "foo!")))
        }));
        let example = document.examples().next().unwrap();

        let error = example.evaluate(&mut Namespace::new()).unwrap_err();
        assert_eq!(error.to_string(), "foo!");
        let raised = error.into_raised().unwrap();
        let original = raised.downcast_ref::<io::Error>().unwrap();
        assert_eq!(original.kind(), io::ErrorKind::InvalidData);
        assert_eq!(original.to_string(), "foo!");
    }
}
