//! Error types for the ratite solver.

use thiserror::Error;

/// Error type shared by the expression layer and the simplex engine.
///
/// Every failure propagates to the public call site; nothing is handled
/// internally. After an [`InternalError`](RatiteError::InternalError) the
/// solver's state is undefined and it should be discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatiteError {
    /// A required constraint is algebraically inconsistent with the current
    /// system. The caller recovers by discarding the attempted constraint.
    #[error("required constraint is unsatisfiable")]
    RequiredFailure,

    /// Expression arithmetic produced a nonlinear form (product or quotient
    /// of two non-constant expressions, or division by a near-zero
    /// constant). The caller recovers by reformulating.
    #[error("operation would produce a nonlinear expression")]
    NonLinearResult,

    /// Reserved: a resolve needed more stay constraints than were available.
    /// Not raised by the base algorithm.
    #[error("not enough stay constraints to resolve")]
    NotEnoughStays,

    /// Invariant violation, unbounded objective, missing pivot ratio, or
    /// misuse of the edit protocol. A programmer bug, not recoverable.
    #[error("internal solver error: {0}")]
    InternalError(&'static str),
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, RatiteError>;
