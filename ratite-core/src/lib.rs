//! Ratite Core - Value Types for the Incremental Constraint Solver
//!
//! This crate provides the foundational types for the ratite constraint
//! solver:
//! - Tagged variables with stable creation-order identities
//! - Symbolic (lexicographic) weights and strength tiers
//! - Sparse linear expressions, generic over the coefficient type
//! - Immutable constraint value objects with cheap-clone identity
//!
//! The simplex engine itself lives in the `ratite-solver` crate; everything
//! here is inert data plus the arithmetic the engine performs on it.
//!
//! # Examples
//!
//! ## Building constraints
//!
//! ```
//! use ratite_core::{Constraint, Variable, strength::STRONG};
//!
//! let x = Variable::external();
//! let y = Variable::external();
//!
//! // x + y == 20, required
//! let sum = Constraint::eq(x + y, 20.0);
//!
//! // x >= 2*y, strong preference
//! let ratio = Constraint::geq(x, 2.0 * y).with_strength(STRONG);
//!
//! assert!(sum.is_required());
//! assert!(!ratio.is_required());
//! ```

pub mod approx;
pub mod constraint;
pub mod error;
pub mod expr;
pub mod strength;
pub mod variable;

pub use constraint::{Constraint, ConstraintBody, ConstraintId, Relation};
pub use error::{RatiteError, Result};
pub use expr::{Coefficient, LinExpr, TermChange};
pub use strength::{Strength, SymbolicWeight};
pub use variable::{VarId, VarKind, Variable};
