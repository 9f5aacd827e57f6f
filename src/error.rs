//! Error types
//!
//! Structural errors ([`PositionError`], [`OverlapError`]) are raised while a corpus is
//! being built and mean a parser produced something impossible. Evaluation errors come
//! in two flavours that must stay distinguishable: an [`EvaluationFailure`] is the
//! expected "this example did not behave as documented" signal, while
//! [`EvaluationError::Raised`] carries whatever the evaluator itself raised, untouched.

use crate::example::ExampleLocation;
use crate::region::Region;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error channel of an evaluator. Whatever goes in comes back out unchanged.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An owned description of a region, for error messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSpan {
    pub start: usize,
    pub end: usize,
    pub evaluator: String,
}

impl From<&Region> for RegionSpan {
    fn from(region: &Region) -> Self {
        Self {
            start: region.start(),
            end: region.end(),
            evaluator: region.evaluator().name().to_string(),
        }
    }
}

impl fmt::Display for RegionSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region {}..{} ({})", self.start, self.end, self.evaluator)
    }
}

/// A region whose span does not fit the document text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("{region} ends before it starts")]
    Inverted { region: RegionSpan },

    #[error("{region} goes beyond end of document ({len} bytes)")]
    BeyondEnd { region: RegionSpan, len: usize },

    #[error("{region} does not fall on a character boundary at offset {offset}")]
    NotCharBoundary { region: RegionSpan, offset: usize },
}

impl PositionError {
    pub fn region(&self) -> &RegionSpan {
        match self {
            PositionError::Inverted { region }
            | PositionError::BeyondEnd { region, .. }
            | PositionError::NotCharBoundary { region, .. } => region,
        }
    }
}

/// Two regions claiming the same text. `first` precedes `second` in the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{first} overlaps {second}")]
pub struct OverlapError {
    pub first: RegionSpan,
    pub second: RegionSpan,
}

/// Why a region could not be added to a document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Position(#[from] PositionError),

    #[error(transparent)]
    Overlap(#[from] OverlapError),
}

/// Error that can occur when loading documents
#[derive(Debug, Error)]
#[error("failed to read {path}: {source}")]
pub struct LoaderError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// An evaluator was handed a payload of a type it does not understand
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("evaluator '{evaluator}' expected a {expected} payload")]
pub struct PayloadMismatch {
    pub evaluator: String,
    pub expected: &'static str,
}

/// An example returned a result instead of passing silently
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "example at {}, line {}, column {} did not evaluate as expected:\n{result}",
    example.path.display(),
    example.line,
    example.column
)]
pub struct EvaluationFailure {
    pub example: ExampleLocation,
    pub result: String,
}

/// The two ways evaluating an example can go wrong
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// The evaluator reported a documented failure
    #[error(transparent)]
    Failed(#[from] EvaluationFailure),

    /// The evaluator itself raised; the original error is passed through as-is
    #[error(transparent)]
    Raised(BoxError),
}

impl EvaluationError {
    pub fn is_failure(&self) -> bool {
        matches!(self, EvaluationError::Failed(_))
    }

    pub fn failure(&self) -> Option<&EvaluationFailure> {
        match self {
            EvaluationError::Failed(failure) => Some(failure),
            EvaluationError::Raised(_) => None,
        }
    }

    /// Recover the error an evaluator raised
    pub fn into_raised(self) -> Option<BoxError> {
        match self {
            EvaluationError::Raised(error) => Some(error),
            EvaluationError::Failed(_) => None,
        }
    }
}

/// Errors raised while discovering files and building documents
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error(transparent)]
    Load(#[from] LoaderError),

    #[error("{}: {source}", path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },

    #[error("invalid pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: ignore::Error,
    },

    #[error("failed to walk {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: ignore::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize) -> RegionSpan {
        RegionSpan {
            start,
            end,
            evaluator: "check".to_string(),
        }
    }

    #[test]
    fn test_position_messages() {
        let error = PositionError::BeyondEnd {
            region: span(8, 9),
            len: 8,
        };
        assert_eq!(
            error.to_string(),
            "region 8..9 (check) goes beyond end of document (8 bytes)"
        );
        assert_eq!(error.region(), &span(8, 9));

        let error = PositionError::Inverted { region: span(4, 2) };
        assert_eq!(error.to_string(), "region 4..2 (check) ends before it starts");
    }

    #[test]
    fn test_overlap_message() {
        let error = OverlapError {
            first: span(0, 2),
            second: span(1, 3),
        };
        assert_eq!(
            error.to_string(),
            "region 0..2 (check) overlaps region 1..3 (check)"
        );
    }

    #[test]
    fn test_document_error_is_transparent() {
        let error = DocumentError::from(PositionError::Inverted { region: span(1, 0) });
        assert_eq!(error.to_string(), "region 1..0 (check) ends before it starts");
    }

    #[test]
    fn test_failure_message() {
        let failure = EvaluationFailure {
            example: ExampleLocation {
                path: PathBuf::from("/the/path"),
                line: 1,
                column: 2,
                evaluator: "check".to_string(),
            },
            result: "foo!".to_string(),
        };
        assert_eq!(
            failure.to_string(),
            "example at /the/path, line 1, column 2 did not evaluate as expected:\nfoo!"
        );
    }

    #[test]
    fn test_raised_passes_through() {
        let raised: BoxError = Box::new(io::Error::new(io::ErrorKind::Other, "boom"));
        let error = EvaluationError::Raised(raised);

        assert!(!error.is_failure());
        assert_eq!(error.to_string(), "boom");
        let original = error.into_raised().unwrap();
        assert_eq!(
            original.downcast_ref::<io::Error>().map(io::Error::kind),
            Some(io::ErrorKind::Other)
        );
    }
}
