//! Evaluators: checking what a region extracted
//!
//! An evaluator receives a region's payload and the shared [`Namespace`] and reports
//! one of three things:
//!
//! - `Ok(Outcome::Pass)`: the example behaved as documented.
//! - `Ok(Outcome::Fail(value))`: it did not; `value` describes how. The example wraps
//!   it into an [`EvaluationFailure`](crate::EvaluationFailure).
//! - `Err(error)`: the evaluator itself broke. The error is handed back to the caller
//!   unchanged.
//!
//! Evaluators are shared between regions as `Rc<dyn Evaluator>`. Plain closures become
//! evaluators through [`evaluator_fn`]; the built-in ones live in the submodules and are
//! looked up by name through the [`EvaluatorRegistry`].

use crate::error::{BoxError, PayloadMismatch};
use crate::namespace::Namespace;
use crate::parser::CodeBlock;
use std::any::{type_name, Any};
use std::marker::PhantomData;
use std::rc::Rc;

mod json;
pub mod registry;
mod shell;
mod yaml;

pub use json::JsonEvaluator;
pub use registry::{EvaluatorRegistry, UnknownEvaluator};
pub use shell::ShellEvaluator;
pub use yaml::YamlEvaluator;

/// What an evaluator reports when it did not raise
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail(String),
}

impl Outcome {
    pub fn fail(value: impl Into<String>) -> Self {
        Outcome::Fail(value.into())
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }
}

impl From<()> for Outcome {
    fn from(_: ()) -> Self {
        Outcome::Pass
    }
}

/// `None` passes, `Some(value)` fails with `value`
impl From<Option<String>> for Outcome {
    fn from(value: Option<String>) -> Self {
        value.map_or(Outcome::Pass, Outcome::Fail)
    }
}

/// The capability that checks a region's payload
pub trait Evaluator {
    /// Name used in reports and error messages
    fn name(&self) -> &str;

    fn evaluate(&self, parsed: &dyn Any, namespace: &mut Namespace) -> Result<Outcome, BoxError>;
}

/// An evaluator backed by a closure over a typed payload
pub struct FnEvaluator<P, F> {
    name: String,
    function: F,
    payload: PhantomData<fn(&P)>,
}

impl<P, F> Evaluator for FnEvaluator<P, F>
where
    P: Any,
    F: Fn(&P, &mut Namespace) -> Result<Outcome, BoxError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, parsed: &dyn Any, namespace: &mut Namespace) -> Result<Outcome, BoxError> {
        let payload = downcast_payload::<P>(&self.name, parsed)?;
        (self.function)(payload, namespace)
    }
}

/// Wrap a closure as a shareable evaluator.
///
/// The payload type is checked at evaluation time; a region carrying anything else makes
/// the evaluator raise a [`PayloadMismatch`].
pub fn evaluator_fn<P, F>(name: impl Into<String>, function: F) -> Rc<dyn Evaluator>
where
    P: Any,
    F: Fn(&P, &mut Namespace) -> Result<Outcome, BoxError> + 'static,
{
    Rc::new(FnEvaluator {
        name: name.into(),
        function,
        payload: PhantomData,
    })
}

fn downcast_payload<'a, P: Any>(evaluator: &str, parsed: &'a dyn Any) -> Result<&'a P, PayloadMismatch> {
    parsed.downcast_ref::<P>().ok_or_else(|| PayloadMismatch {
        evaluator: evaluator.to_string(),
        expected: type_name::<P>(),
    })
}

/// Payload access shared by the built-in evaluators, which all check code blocks
fn code_block<'a>(evaluator: &str, parsed: &'a dyn Any) -> Result<&'a CodeBlock, PayloadMismatch> {
    downcast_payload::<CodeBlock>(evaluator, parsed)
}
