use core::fmt;

use crate::backend::BackendError;
use crate::driver::TestCase;

/// Errors that stop a sweep before its checks can complete.
///
/// A failed check is not an error: it is recorded in the sweep outcome and
/// the sweep continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessError {
    /// The backend refused to build a plan for a case.
    Setup { case: TestCase, source: BackendError },
    /// A transform call failed on an existing plan.
    Transform {
        case: TestCase,
        bin: usize,
        source: BackendError,
    },
}

impl HarnessError {
    pub fn case(&self) -> TestCase {
        match self {
            HarnessError::Setup { case, .. } | HarnessError::Transform { case, .. } => *case,
        }
    }
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::Setup { case, source } => {
                write!(f, "{case}: setup failed: {source}")
            }
            HarnessError::Transform { case, bin, source } => {
                write!(f, "{case}: transform failed at bin {bin}: {source}")
            }
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HarnessError::Setup { source, .. } | HarnessError::Transform { source, .. } => {
                Some(source)
            }
        }
    }
}
