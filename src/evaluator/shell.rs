//! Shell blocks are run and must exit successfully.
//!
//! Blocks run with the full privileges of the current process; nothing is sandboxed.

use super::{code_block, Evaluator, Outcome};
use crate::error::BoxError;
use crate::namespace::Namespace;
use std::any::Any;
use std::process::Command;

/// Runs a block with `<program> -c <source>`.
///
/// The source keeps its leading alignment lines, so line numbers in the shell's error
/// messages are document lines.
///
/// `String` entries of the namespace are exported as environment variables, and the
/// standard output of a successful run is bound to `stdout`. A non-zero exit is a
/// failure carrying the status and standard error; failing to start the program at all
/// is raised.
#[derive(Debug, Clone)]
pub struct ShellEvaluator {
    program: String,
}

impl ShellEvaluator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ShellEvaluator {
    fn default() -> Self {
        Self::new("sh")
    }
}

impl Evaluator for ShellEvaluator {
    fn name(&self) -> &str {
        &self.program
    }

    fn evaluate(&self, parsed: &dyn Any, namespace: &mut Namespace) -> Result<Outcome, BoxError> {
        let block = code_block(self.name(), parsed)?;
        let output = Command::new(&self.program)
            .arg("-c")
            .arg(&block.source)
            .envs(namespace.strings())
            .output()?;

        if output.status.success() {
            namespace.insert(
                "stdout",
                String::from_utf8_lossy(&output.stdout).into_owned(),
            );
            return Ok(Outcome::Pass);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Ok(Outcome::fail(format!(
            "{} {}\n{}",
            self.program,
            output.status,
            stderr.trim_end()
        )))
    }
}
