//! Ratite Solver - Incremental Cassowary Constraint Solving
//!
//! This crate implements the Cassowary linear-arithmetic algorithm: an
//! incremental simplex over a system of weighted linear equalities and
//! inequalities. After every change (adding or removing a constraint,
//! suggesting a value for an edited variable) the solver produces an
//! assignment that exactly satisfies all *required* constraints while
//! minimizing a lexicographic cost over the *preferential* ones.
//!
//! It is the computational substrate for UI layout, diagram editors, and
//! any interactive system whose geometry is expressed as constraints.
//!
//! # Examples
//!
//! ## Basic constraint solving
//!
//! ```
//! use ratite_core::Constraint;
//! use ratite_core::strength::WEAK;
//! use ratite_solver::SimplexSolver;
//!
//! let mut solver = SimplexSolver::new();
//! let x = solver.new_variable(0.0);
//! let y = solver.new_variable(0.0);
//!
//! solver.add_constraint(&Constraint::eq(x + y, 12.0)).unwrap();
//! solver.add_constraint(&Constraint::geq(x, 8.0)).unwrap();
//! solver.add_stay(y, WEAK).unwrap();
//!
//! assert!((solver.value(x) + solver.value(y) - 12.0).abs() < 1.0e-6);
//! assert!(solver.value(x) >= 8.0 - 1.0e-6);
//! ```
//!
//! ## Interactive editing
//!
//! ```
//! use ratite_core::strength::{STRONG, WEAK};
//! use ratite_solver::SimplexSolver;
//!
//! let mut solver = SimplexSolver::new();
//! let x = solver.new_variable(100.0);
//! solver.add_stay(x, WEAK).unwrap();
//!
//! solver.add_edit_var(x, STRONG).unwrap();
//! solver.begin_edit().unwrap();
//! for target in [90.0, 80.0, 70.0] {
//!     solver.suggest_value(x, target).unwrap();
//!     solver.resolve().unwrap();
//!     assert!((solver.value(x) - target).abs() < 1.0e-6);
//! }
//! solver.end_edit().unwrap();
//! ```

mod edit;
mod solver;
mod tableau;

pub use solver::{SimplexSolver, SolverConfig, SolverStats};

// Re-exported for downstream convenience; `ratite-core` remains the home
// of the value types.
pub use ratite_core::{Constraint, LinExpr, RatiteError, Result, Strength, Variable};
