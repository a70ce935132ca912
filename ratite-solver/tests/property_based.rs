//! Property-based tests for the incremental solver.
//!
//! These check the structural invariants under random operation sequences:
//! - the tableau's row/column incidence stays exact
//! - admitted required constraints hold at every solution
//! - restricted basic rows stay feasible between operations
//! - solving is idempotent and add/remove round-trips cleanly

use proptest::collection::vec;
use proptest::prelude::*;
use ratite_core::Constraint;
use ratite_core::strength::{MEDIUM, STRONG, WEAK};
use ratite_solver::{RatiteError, SimplexSolver};

/// One random solver operation over a small pool of variables.
#[derive(Debug, Clone)]
enum Op {
    PreferEq { var: usize, target: f64 },
    RequireGeq { var: usize, bound: f64 },
    RequireLeq { var: usize, bound: f64 },
    Stay { var: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..3, -10.0..10.0f64).prop_map(|(var, target)| Op::PreferEq { var, target }),
        (0usize..3, -10.0..10.0f64).prop_map(|(var, bound)| Op::RequireGeq { var, bound }),
        (0usize..3, -10.0..10.0f64).prop_map(|(var, bound)| Op::RequireLeq { var, bound }),
        (0usize..3).prop_map(|var| Op::Stay { var }),
    ]
}

/// Apply `op`, returning the constraint if it was admitted. Required
/// failures are a legitimate outcome of random bound combinations.
fn apply(
    solver: &mut SimplexSolver,
    vars: &[ratite_core::Variable; 3],
    op: &Op,
) -> Result<Option<Constraint>, RatiteError> {
    let attempt = match op {
        Op::PreferEq { var, target } => {
            let cn = Constraint::eq(vars[*var], *target).with_strength(MEDIUM);
            solver.add_constraint(&cn).map(|_| cn)
        }
        Op::RequireGeq { var, bound } => {
            let cn = Constraint::geq(vars[*var], *bound);
            solver.add_constraint(&cn).map(|_| cn)
        }
        Op::RequireLeq { var, bound } => {
            let cn = Constraint::leq(vars[*var], *bound);
            solver.add_constraint(&cn).map(|_| cn)
        }
        Op::Stay { var } => solver.add_stay(vars[*var], WEAK),
    };
    match attempt {
        Ok(cn) => Ok(Some(cn)),
        Err(RatiteError::RequiredFailure) => Ok(None),
        Err(err) => Err(err),
    }
}

proptest! {
    /// Structural invariants hold after every operation, and every
    /// admitted required constraint is satisfied at the final solution.
    #[test]
    fn prop_invariants_under_random_ops(ops in vec(op_strategy(), 1..25)) {
        let mut solver = SimplexSolver::new();
        let vars = [
            solver.new_variable(0.0),
            solver.new_variable(0.0),
            solver.new_variable(0.0),
        ];
        let mut admitted = Vec::new();
        for op in &ops {
            match apply(&mut solver, &vars, op) {
                Ok(Some(cn)) => admitted.push(cn),
                Ok(None) => {}
                Err(err) => prop_assert!(false, "unexpected error: {err}"),
            }
            if let Err(violation) = solver.check_invariants() {
                prop_assert!(false, "invariant violated after {op:?}: {violation}");
            }
        }

        prop_assert!(solver.solve().is_ok());
        for cn in &admitted {
            if !cn.is_required() {
                continue;
            }
            let Some(expr) = cn.linear_expr() else { continue };
            let residual: f64 = expr.constant()
                + expr
                    .terms()
                    .map(|(v, c)| c * solver.value(v))
                    .sum::<f64>();
            if cn.is_inequality() {
                prop_assert!(residual >= -1.0e-6, "violated {cn:?}: residual {residual}");
            } else {
                prop_assert!(residual.abs() < 1.0e-6, "violated {cn:?}: residual {residual}");
            }
        }
    }

    /// A preferential constraint can be added and removed repeatedly; each
    /// round the tableau comes back structurally clean.
    #[test]
    fn prop_add_remove_round_trips(targets in vec(-50.0..50.0f64, 1..10)) {
        let mut solver = SimplexSolver::new();
        let x = solver.new_variable(0.0);
        solver.add_stay(x, WEAK).unwrap();
        for &target in &targets {
            let cn = Constraint::eq(x, target).with_strength(MEDIUM);
            solver.add_constraint(&cn).unwrap();
            prop_assert!((solver.value(x) - target).abs() < 1.0e-6);
            solver.remove_constraint(&cn).unwrap();
            prop_assert!(!solver.has_constraint(&cn));
            prop_assert!(solver.check_invariants().is_ok());
        }
    }

    /// Solving twice never moves a value.
    #[test]
    fn prop_solve_is_idempotent(ops in vec(op_strategy(), 1..15)) {
        let mut solver = SimplexSolver::new();
        let vars = [
            solver.new_variable(0.0),
            solver.new_variable(0.0),
            solver.new_variable(0.0),
        ];
        for op in &ops {
            match apply(&mut solver, &vars, op) {
                Ok(_) => {}
                Err(err) => prop_assert!(false, "unexpected error: {err}"),
            }
        }
        prop_assert!(solver.solve().is_ok());
        let first: Vec<f64> = vars.iter().map(|&v| solver.value(v)).collect();
        prop_assert!(solver.solve().is_ok());
        for (&v, &before) in vars.iter().zip(first.iter()) {
            prop_assert!((solver.value(v) - before).abs() < 1.0e-6);
        }
    }

    /// A strong edit always reaches a satisfiable target.
    #[test]
    fn prop_edit_reaches_target(start in -100.0..100.0f64, target in -100.0..100.0f64) {
        let mut solver = SimplexSolver::new();
        let x = solver.new_variable(start);
        solver.add_stay(x, WEAK).unwrap();
        solver.add_edit_var(x, STRONG).unwrap();
        solver.begin_edit().unwrap();
        solver.suggest_value(x, target).unwrap();
        solver.resolve().unwrap();
        let tolerance = 1.0e-6 * (1.0 + target.abs());
        prop_assert!((solver.value(x) - target).abs() < tolerance);
        solver.end_edit().unwrap();
        prop_assert!(solver.check_invariants().is_ok());
    }
}
