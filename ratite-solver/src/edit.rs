//! Edit and stay protocol.
//!
//! An edit session follows a strict order: `add_edit_var` for each dragged
//! variable, `begin_edit`, then any number of `suggest_value`/`resolve`
//! cycles, then `end_edit`. Within one `resolve`, stays are re-pinned
//! before the edit deltas are applied, and only then is feasibility
//! restored with the dual simplex.
//!
//! Stays re-pin by zeroing the constant of whichever error variable of the
//! pair is basic: a basic stay-error row's constant is exactly the
//! deviation from the stayed value, so zeroing it re-anchors the stay at
//! the current solution.

use ratite_core::constraint::Constraint;
use ratite_core::error::{RatiteError, Result};
use ratite_core::strength::Strength;
use ratite_core::variable::Variable;
use tracing::debug;

use crate::solver::SimplexSolver;

/// Bookkeeping for one active edit, in insertion order.
#[derive(Debug, Clone)]
pub(crate) struct EditInfo {
    pub(crate) variable: Variable,
    pub(crate) constraint: Constraint,
    pub(crate) plus_error: Variable,
    pub(crate) minus_error: Variable,
    /// Target value the tableau currently encodes for the variable.
    pub(crate) prev_constant: f64,
}

impl SimplexSolver {
    /// Add a stay: a preference that `v` keep its current value. Returns
    /// the synthesized constraint so the caller can remove it later.
    pub fn add_stay(&mut self, v: Variable, strength: Strength) -> Result<Constraint> {
        let cn = Constraint::stay(v, strength);
        self.add_constraint(&cn)?;
        Ok(cn)
    }

    /// Enable an edit on `v`: a dynamically updatable target value,
    /// starting at the variable's current value. Returns the synthesized
    /// constraint.
    ///
    /// Edit constraints must carry a preferential strength; the protocol
    /// works by rewriting error-variable constants, which required
    /// constraints do not have.
    pub fn add_edit_var(&mut self, v: Variable, strength: Strength) -> Result<Constraint> {
        if strength.is_required() {
            return Err(RatiteError::InternalError(
                "edit constraints must carry a preferential strength",
            ));
        }
        let cn = Constraint::edit(v, strength);
        self.add_constraint(&cn)?;
        Ok(cn)
    }

    /// Disable the edit on `v` outside of `end_edit`.
    pub fn remove_edit_var(&mut self, v: Variable) -> Result<()> {
        let Some(info) = self.edits.iter().find(|e| e.variable == v).cloned() else {
            return Err(RatiteError::InternalError(
                "no active edit for the variable",
            ));
        };
        self.remove_constraint(&info.constraint)
    }

    /// Whether `v` currently has an active edit.
    pub fn has_edit_var(&self, v: Variable) -> bool {
        self.edits.iter().any(|e| e.variable == v)
    }

    /// Open an edit session over the currently registered edit variables.
    ///
    /// The suggestion slots start at zero, so every active edit should
    /// receive a `suggest_value` before `resolve`; an edit left without a
    /// suggestion resolves toward zero.
    pub fn begin_edit(&mut self) -> Result<()> {
        if self.edits.is_empty() {
            return Err(RatiteError::InternalError(
                "begin_edit requires at least one edit variable",
            ));
        }
        if self.editing {
            return Err(RatiteError::InternalError("edit session is already open"));
        }
        self.new_edit_constants = vec![0.0; self.edits.len()];
        self.editing = true;
        Ok(())
    }

    /// Record a new target value for the edited variable `v`.
    ///
    /// Requires an open edit session. Every active edit on `v` receives
    /// the suggestion.
    pub fn suggest_value(&mut self, v: Variable, value: f64) -> Result<()> {
        if !self.editing {
            return Err(RatiteError::InternalError(
                "suggest_value outside an edit session",
            ));
        }
        debug!(variable = ?v, value, "suggest value");
        let mut found = false;
        for (info, slot) in self.edits.iter().zip(self.new_edit_constants.iter_mut()) {
            if info.variable == v {
                *slot = value;
                found = true;
            }
        }
        if !found {
            return Err(RatiteError::InternalError(
                "suggest_value for a variable with no active edit",
            ));
        }
        Ok(())
    }

    /// Apply the suggested values: re-pin stays, push the edit deltas
    /// through the tableau, restore feasibility with the dual simplex and
    /// refresh external values.
    pub fn resolve(&mut self) -> Result<()> {
        if !self.editing {
            return Err(RatiteError::InternalError("resolve outside an edit session"));
        }
        self.stats.resolves += 1;
        self.tableau.clear_infeasible();
        self.reset_stay_constants();
        self.reset_edit_constants();
        self.dual_optimize()?;
        self.set_external_variables();
        Ok(())
    }

    /// [`resolve`](Self::resolve) with explicit targets, one per active
    /// edit in insertion order.
    pub fn resolve_with(&mut self, constants: &[f64]) -> Result<()> {
        if !self.editing {
            return Err(RatiteError::InternalError("resolve outside an edit session"));
        }
        if constants.len() != self.edits.len() {
            return Err(RatiteError::InternalError(
                "resolve constants do not match the active edits",
            ));
        }
        self.new_edit_constants.copy_from_slice(constants);
        self.resolve()
    }

    /// Close the edit session, removing every edit constraint.
    pub fn end_edit(&mut self) -> Result<()> {
        if !self.editing {
            return Err(RatiteError::InternalError("end_edit without begin_edit"));
        }
        // Newest first keeps the remaining indices stable.
        while let Some(info) = self.edits.last().cloned() {
            self.remove_constraint(&info.constraint)?;
        }
        self.editing = false;
        self.new_edit_constants.clear();
        Ok(())
    }

    /// Re-pin every stay at the current solution by zeroing the constant
    /// of whichever of its error variables is basic.
    pub(crate) fn reset_stay_constants(&mut self) {
        for i in 0..self.stay_plus_error_vars.len() {
            let plus = self.stay_plus_error_vars[i];
            let minus = self.stay_minus_error_vars[i];
            if !self.tableau.set_row_constant_if_basic(plus, 0.0) {
                self.tableau.set_row_constant_if_basic(minus, 0.0);
            }
        }
    }

    /// Apply `delta = new − prev` for each edit and advance the recorded
    /// targets.
    fn reset_edit_constants(&mut self) {
        for i in 0..self.edits.len() {
            let Some(&new) = self.new_edit_constants.get(i) else {
                continue;
            };
            let delta = new - self.edits[i].prev_constant;
            self.edits[i].prev_constant = new;
            let plus = self.edits[i].plus_error;
            let minus = self.edits[i].minus_error;
            self.delta_edit_constant(delta, plus, minus);
        }
    }

    /// Shift the tableau by `delta` along the edit identity
    /// `v = c + e⁺ − e⁻`.
    ///
    /// If either error variable is basic the delta lands on its row
    /// constant directly; otherwise it is distributed through every row
    /// that mentions the minus variable. Restricted rows whose constant
    /// turns negative are queued for the dual simplex.
    fn delta_edit_constant(&mut self, delta: f64, plus_error: Variable, minus_error: Variable) {
        if let Some(constant) = self.tableau.increment_row_constant(plus_error, delta) {
            if constant < 0.0 {
                self.tableau.push_infeasible(plus_error);
            }
            return;
        }
        if let Some(constant) = self.tableau.increment_row_constant(minus_error, -delta) {
            if constant < 0.0 {
                self.tableau.push_infeasible(minus_error);
            }
            return;
        }
        // Both error variables are parametric.
        let Some(col) = self.tableau.column(minus_error).cloned() else {
            return;
        };
        let objective_var = self.tableau.objective_var();
        for basic in col {
            if basic == objective_var {
                self.tableau.bump_objective_constant_for(minus_error, delta);
                continue;
            }
            let coeff = self
                .tableau
                .row(basic)
                .map(|row| row.coefficient_for(minus_error))
                .unwrap_or(0.0);
            if coeff == 0.0 {
                continue;
            }
            if let Some(constant) = self.tableau.increment_row_constant(basic, coeff * delta)
                && constant < 0.0
                && basic.is_restricted()
            {
                self.tableau.push_infeasible(basic);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratite_core::strength::{STRONG, WEAK};

    #[test]
    fn test_protocol_order_is_enforced() {
        let mut solver = SimplexSolver::new();
        let x = solver.new_variable(0.0);

        assert!(solver.begin_edit().is_err());
        assert!(solver.suggest_value(x, 1.0).is_err());
        assert!(solver.resolve().is_err());
        assert!(solver.end_edit().is_err());

        solver.add_edit_var(x, STRONG).unwrap();
        solver.begin_edit().unwrap();
        assert!(solver.begin_edit().is_err());
        solver.suggest_value(x, 1.0).unwrap();
        solver.resolve().unwrap();
        solver.end_edit().unwrap();
    }

    #[test]
    fn test_required_edit_is_rejected() {
        let mut solver = SimplexSolver::new();
        let x = solver.new_variable(0.0);
        assert!(matches!(
            solver.add_edit_var(x, ratite_core::strength::REQUIRED),
            Err(RatiteError::InternalError(_))
        ));
    }

    #[test]
    fn test_suggest_unknown_variable_is_rejected() {
        let mut solver = SimplexSolver::new();
        let x = solver.new_variable(0.0);
        let y = solver.new_variable(0.0);
        solver.add_edit_var(x, STRONG).unwrap();
        solver.begin_edit().unwrap();
        assert!(solver.suggest_value(y, 1.0).is_err());
    }

    #[test]
    fn test_edit_moves_variable() {
        let mut solver = SimplexSolver::new();
        let x = solver.new_variable(10.0);
        solver.add_stay(x, WEAK).unwrap();
        solver.add_edit_var(x, STRONG).unwrap();
        solver.begin_edit().unwrap();
        solver.suggest_value(x, 3.0).unwrap();
        solver.resolve().unwrap();
        assert!((solver.value(x) - 3.0).abs() < 1.0e-6);
        solver.end_edit().unwrap();
        assert!((solver.value(x) - 3.0).abs() < 1.0e-6);
        solver.check_invariants().unwrap();
    }

    #[test]
    fn test_second_edit_variable_receives_suggestions() {
        // The edited variable need not be the first registered edit.
        let mut solver = SimplexSolver::new();
        let x = solver.new_variable(1.0);
        let y = solver.new_variable(2.0);
        solver.add_stay(x, WEAK).unwrap();
        solver.add_stay(y, WEAK).unwrap();
        solver.add_edit_var(x, STRONG).unwrap();
        solver.add_edit_var(y, STRONG).unwrap();
        solver.begin_edit().unwrap();
        solver.suggest_value(x, 1.0).unwrap();
        solver.suggest_value(y, 20.0).unwrap();
        solver.resolve().unwrap();
        assert!((solver.value(x) - 1.0).abs() < 1.0e-6);
        assert!((solver.value(y) - 20.0).abs() < 1.0e-6);
        solver.end_edit().unwrap();
    }

    #[test]
    fn test_remove_edit_var_mid_session() {
        let mut solver = SimplexSolver::new();
        let x = solver.new_variable(0.0);
        let y = solver.new_variable(0.0);
        solver.add_edit_var(x, STRONG).unwrap();
        solver.add_edit_var(y, STRONG).unwrap();
        solver.begin_edit().unwrap();
        solver.remove_edit_var(x).unwrap();
        assert!(!solver.has_edit_var(x));
        solver.suggest_value(y, 4.0).unwrap();
        solver.resolve().unwrap();
        assert!((solver.value(y) - 4.0).abs() < 1.0e-6);
        solver.end_edit().unwrap();
        solver.check_invariants().unwrap();
    }

    #[test]
    fn test_resolve_with_checks_length() {
        let mut solver = SimplexSolver::new();
        let x = solver.new_variable(0.0);
        solver.add_edit_var(x, STRONG).unwrap();
        solver.begin_edit().unwrap();
        assert!(solver.resolve_with(&[1.0, 2.0]).is_err());
        solver.resolve_with(&[6.0]).unwrap();
        assert!((solver.value(x) - 6.0).abs() < 1.0e-6);
        solver.end_edit().unwrap();
    }
}
