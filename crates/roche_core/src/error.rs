use thiserror::Error;

/// Errors raised by the Roche geometry routines.
///
/// `InvalidArgument` means a supplied parameter violates a documented
/// precondition and is reported before any computation begins.
/// `NoSolution` means the parameters were individually valid but the
/// requested physical configuration has no solution within the search
/// space (a point never eclipsed, a stream that cannot reach the
/// requested sample count). Callers are expected to branch on the
/// variant: the first is a caller bug, the second a legitimate outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RocheError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("no solution: {0}")]
    NoSolution(String),
}

impl RocheError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        RocheError::InvalidArgument(message.into())
    }

    pub(crate) fn no_solution(message: impl Into<String>) -> Self {
        RocheError::NoSolution(message.into())
    }
}

pub type Result<T> = std::result::Result<T, RocheError>;
