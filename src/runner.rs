//! Runner: evaluate a whole corpus and report on every example
//!
//! The runner builds every document before evaluating anything, so a structural error
//! (a region out of bounds, two parsers claiming the same text) stops the run before a
//! single example has had side effects.
//!
//! Each document gets a fresh [`Namespace`]: examples of one document share state, while
//! documents stay independent of each other. A failing or erroring example is recorded
//! and the run moves on to the next one.

use crate::document::Document;
use crate::error::{CorpusError, EvaluationError};
use crate::example::{Example, ExampleLocation};
use crate::namespace::Namespace;
use crate::orchestrator::Orchestrator;
use serde::Serialize;
use std::fmt::Write as _;
use tracing::{debug, info};

/// How one example fared
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Status {
    Passed,
    /// The evaluator reported that the example did not behave as documented
    Failed { message: String },
    /// The evaluator itself raised
    Errored { message: String },
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Passed => "ok",
            Status::Failed { .. } => "FAILED",
            Status::Errored { .. } => "ERROR",
        }
    }

    fn message(&self) -> Option<&str> {
        match self {
            Status::Passed => None,
            Status::Failed { message } | Status::Errored { message } => Some(message.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExampleReport {
    #[serde(flatten)]
    pub location: ExampleLocation,
    #[serde(flatten)]
    pub status: Status,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub documents: usize,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub examples: Vec<ExampleReport>,
    pub summary: Summary,
}

impl Report {
    fn record(&mut self, location: ExampleLocation, status: Status) {
        self.summary.total += 1;
        match status {
            Status::Passed => self.summary.passed += 1,
            Status::Failed { .. } => self.summary.failed += 1,
            Status::Errored { .. } => self.summary.errored += 1,
        }
        self.examples.push(ExampleReport { location, status });
    }

    /// True when no example failed or errored
    pub fn is_success(&self) -> bool {
        self.summary.failed == 0 && self.summary.errored == 0
    }

    /// One line per example, messages indented below, then the totals
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for example in &self.examples {
            let _ = writeln!(
                out,
                "{} [{}] {}",
                example.location,
                example.location.evaluator,
                example.status.label()
            );
            if let Some(message) = example.status.message() {
                for line in message.lines() {
                    let _ = writeln!(out, "    {}", line);
                }
            }
        }
        let summary = &self.summary;
        let _ = write!(
            out,
            "{} examples in {} documents: {} passed, {} failed, {} errored",
            summary.total, summary.documents, summary.passed, summary.failed, summary.errored
        );
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Drives the evaluation of everything an [`Orchestrator`] discovers
#[derive(Debug)]
pub struct Runner<'a> {
    orchestrator: &'a Orchestrator,
}

impl<'a> Runner<'a> {
    pub fn new(orchestrator: &'a Orchestrator) -> Self {
        Self { orchestrator }
    }

    pub fn run(&self) -> Result<Report, CorpusError> {
        let documents = self
            .orchestrator
            .all_documents()?
            .collect::<Result<Vec<_>, _>>()?;

        let mut report = Report::default();
        for document in &documents {
            self.run_document(document, &mut report);
        }
        report.summary.documents = documents.len();

        let summary = &report.summary;
        info!(
            documents = summary.documents,
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            errored = summary.errored,
            "run complete"
        );
        Ok(report)
    }

    fn run_document(&self, document: &Document, report: &mut Report) {
        debug!(path = %document.path().display(), examples = document.regions().len(), "evaluating document");
        let mut namespace = Namespace::new();
        self.orchestrator.setup(&mut namespace);
        for example in document {
            report.record(example.location(), evaluate(&example, &mut namespace));
        }
        self.orchestrator.teardown(&mut namespace);
        debug!(path = %document.path().display(), "document done");
    }
}

fn evaluate(example: &Example<'_>, namespace: &mut Namespace) -> Status {
    match example.evaluate(namespace) {
        Ok(()) => Status::Passed,
        Err(EvaluationError::Failed(failure)) => Status::Failed {
            message: failure.result,
        },
        Err(EvaluationError::Raised(error)) => Status::Errored {
            message: error.to_string(),
        },
    }
}
