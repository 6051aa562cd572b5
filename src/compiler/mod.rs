use thiserror::Error;

use crate::bytecode::Instruction;

pub mod compiler;

pub use compiler::compile;

pub const SUCCESS_MESSAGE: &str = "Compilation completed successfully without any errors.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Compilation failed: misplaced '{symbol:}' on line {line:}, column {column:} (no matching bracket found).")]
    MisbalancedSymbol {
        symbol: char,
        line: usize,
        column: usize,
    },
}

/// Outcome of a compile, only ever carries the first error that was found.
///
/// A failed compile still produces a runnable (sanitised) program, it's up to the
/// caller whether to run it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompileDiagnostic {
    error: Option<CompileError>,
}

impl CompileDiagnostic {
    pub fn success() -> Self {
        Self { error: None }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn error(&self) -> Option<&CompileError> {
        self.error.as_ref()
    }

    pub fn message(&self) -> String {
        match &self.error {
            Some(e) => e.to_string(),
            None => SUCCESS_MESSAGE.to_string(),
        }
    }

    /// Record `error` unless an earlier one is already held
    pub(crate) fn record(&mut self, error: CompileError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiled {
    pub instructions: Vec<Instruction>,
    pub diagnostic: CompileDiagnostic,
}
