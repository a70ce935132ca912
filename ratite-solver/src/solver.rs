//! Incremental Cassowary simplex engine.
//!
//! Constraints are admitted one at a time, each admission followed by a
//! local primal re-optimization, so the tableau is always optimal and
//! feasible between public operations. Edits perturb row constants and
//! restore feasibility with the dual simplex, which is what makes
//! interactive dragging cheap. Every constraint is identified in the
//! tableau by a marker variable so it can be removed again later.
//!
//! Pivot ties are broken by smallest variable identity (Bland's rule),
//! which both prevents cycling and makes solving deterministic.
//!
//! ## References
//!
//! - Badros, Borning, Stuckey: "The Cassowary Linear Arithmetic Constraint
//!   Solving Algorithm" (ACM TOCHI, 2001)

use ratite_core::approx::{EPSILON, near_zero};
use ratite_core::constraint::Constraint;
use ratite_core::error::{RatiteError, Result};
use ratite_core::expr::{Coefficient, LinExpr};
use ratite_core::strength::SymbolicWeight;
use ratite_core::variable::Variable;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;
use tracing::{debug, trace};

use crate::edit::EditInfo;
use crate::tableau::Tableau;

/// Solver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Re-optimize and refresh external values after every constraint
    /// addition and removal.
    pub auto_solve: bool,
    /// Upper bound on pivots per optimization pass. Bland's rule already
    /// guarantees termination; the cap turns a violated termination
    /// argument into an `InternalError` instead of a hang.
    pub max_pivots: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            auto_solve: true,
            max_pivots: 10_000,
        }
    }
}

/// Counters describing the work a solver has performed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolverStats {
    /// Constraints successfully admitted.
    pub constraints_added: u64,
    /// Constraints removed.
    pub constraints_removed: u64,
    /// Primal pivots, including pivots of artificial passes.
    pub pivots: u64,
    /// Dual pivots performed while resolving edits.
    pub dual_pivots: u64,
    /// Primal optimization passes.
    pub optimize_passes: u64,
    /// Resolve cycles of the edit protocol.
    pub resolves: u64,
    /// Constraint additions that needed an artificial variable.
    pub artificial_passes: u64,
}

/// An incremental constraint solver based on the Cassowary algorithm.
///
/// The solver owns all internal (slack, dummy, objective) variables and an
/// arena of observable values for the external variables it has seen.
/// It is single-threaded and cooperative: no operation suspends, and
/// concurrent callers must serialize access externally.
#[derive(Debug)]
pub struct SimplexSolver {
    pub(crate) tableau: Tableau,
    /// Observable values of external variables, refreshed after each solve.
    pub(crate) values: FxHashMap<Variable, f64>,
    /// Marker variable of every enabled constraint.
    pub(crate) marker_vars: FxHashMap<Constraint, Variable>,
    /// Error variables of every enabled non-required constraint, in
    /// `[eplus]` or `[eplus, eminus]` order.
    pub(crate) error_vars: FxHashMap<Constraint, SmallVec<[Variable; 2]>>,
    pub(crate) stay_plus_error_vars: Vec<Variable>,
    pub(crate) stay_minus_error_vars: Vec<Variable>,
    /// Active edits in insertion order.
    pub(crate) edits: Vec<EditInfo>,
    pub(crate) new_edit_constants: Vec<f64>,
    pub(crate) editing: bool,
    pub(crate) config: SolverConfig,
    pub(crate) stats: SolverStats,
}

impl SimplexSolver {
    /// A solver with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    /// A solver with an explicit configuration.
    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            tableau: Tableau::new(),
            values: FxHashMap::default(),
            marker_vars: FxHashMap::default(),
            error_vars: FxHashMap::default(),
            stay_plus_error_vars: Vec::new(),
            stay_minus_error_vars: Vec::new(),
            edits: Vec::new(),
            new_edit_constants: Vec::new(),
            editing: false,
            config,
            stats: SolverStats::default(),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Toggle implicit solving after constraint additions and removals.
    pub fn set_auto_solve(&mut self, auto_solve: bool) {
        self.config.auto_solve = auto_solve;
    }

    /// Work counters.
    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    /// Register a fresh external variable with a seeded value.
    ///
    /// This is the variable-factory collaborator: the handle is ordinary
    /// (any [`Variable::external`] works with the solver), but seeding the
    /// value here gives stays and edits their starting anchor.
    pub fn new_variable(&mut self, initial: f64) -> Variable {
        let v = Variable::external();
        self.values.insert(v, initial);
        v
    }

    /// Seed or overwrite the observable value of an external variable.
    ///
    /// Meaningful before stays or edits are added for the variable; after
    /// a solve the value is recomputed from the tableau.
    pub fn set_value(&mut self, v: Variable, value: f64) {
        debug_assert!(v.is_external());
        self.values.insert(v, value);
    }

    /// Current observable value of an external variable. Zero for
    /// variables the solver has never seen.
    pub fn value(&self, v: Variable) -> f64 {
        self.values.get(&v).copied().unwrap_or(0.0)
    }

    /// Whether `cn` is currently enabled.
    pub fn has_constraint(&self, cn: &Constraint) -> bool {
        self.marker_vars.contains_key(cn)
    }

    /// Add a constraint to the system.
    ///
    /// Fails with [`RequiredFailure`](RatiteError::RequiredFailure) when a
    /// required constraint is inconsistent with the current system; the
    /// attempted constraint is un-registered and the tableau remains
    /// equivalent to its pre-call state.
    pub fn add_constraint(&mut self, cn: &Constraint) -> Result<()> {
        if self.marker_vars.contains_key(cn) {
            return Err(RatiteError::InternalError(
                "constraint is already in the solver",
            ));
        }
        debug!(constraint = cn.id(), "add constraint");
        let expr = self.make_expression(cn);
        if let Err(err) = self.install_row(expr) {
            self.forget_constraint(cn);
            return Err(err);
        }
        self.stats.constraints_added += 1;
        if self.config.auto_solve {
            self.optimize_primary()?;
            self.dual_optimize()?;
            self.set_external_variables();
        }
        Ok(())
    }

    /// Remove a previously added constraint.
    pub fn remove_constraint(&mut self, cn: &Constraint) -> Result<()> {
        let marker = self.marker_vars.remove(cn).ok_or(RatiteError::InternalError(
            "removing a constraint that is not in the solver",
        ))?;
        debug!(constraint = cn.id(), "remove constraint");

        self.reset_stay_constants();

        let evars = self.error_vars.remove(cn);

        // Retire the error contributions from the objective before any
        // pivoting; substituting afterwards would corrupt the objective.
        if let Some(evars) = &evars
            && let Some(sw) = cn.strength().error_weight(cn.weight())
        {
            for &ev in evars {
                match self.tableau.row(ev).cloned() {
                    Some(row) => self.tableau.add_expr_to_objective(&row, -sw),
                    None => self.tableau.add_to_objective(ev, -sw),
                }
            }
        }

        if self.tableau.remove_row(marker).is_none() {
            // The marker is parametric; bring it into the basis so its row
            // can be dropped.
            match self.find_marker_exit(marker) {
                Some(exit_var) => {
                    self.pivot(marker, exit_var)?;
                    self.tableau.remove_row(marker);
                }
                None => self.tableau.remove_column(marker),
            }
        }

        // Remove the remaining error variables from the tableau.
        if let Some(evars) = &evars {
            for &ev in evars {
                if ev != marker && self.tableau.remove_row(ev).is_none() {
                    self.tableau.remove_column(ev);
                }
            }
        }

        if cn.is_stay() {
            if let Some(evars) = &evars {
                let mut i = 0;
                while i < self.stay_plus_error_vars.len() {
                    if evars.contains(&self.stay_plus_error_vars[i]) {
                        self.stay_plus_error_vars.remove(i);
                        self.stay_minus_error_vars.remove(i);
                    } else {
                        i += 1;
                    }
                }
            }
        } else if cn.is_edit()
            && let Some(pos) = self.edits.iter().position(|e| e.constraint == *cn)
        {
            self.edits.remove(pos);
            if pos < self.new_edit_constants.len() {
                self.new_edit_constants.remove(pos);
            }
        }

        self.stats.constraints_removed += 1;
        if self.config.auto_solve {
            self.optimize_primary()?;
            self.dual_optimize()?;
            self.set_external_variables();
        }
        Ok(())
    }

    /// Re-optimize from the current tableau and refresh external values.
    ///
    /// Substitutions performed while installing or removing rows can leave
    /// restricted basic rows with negative constants; those are queued and
    /// repaired here by the dual simplex once the objective is optimal
    /// again.
    pub fn solve(&mut self) -> Result<()> {
        self.optimize_primary()?;
        self.dual_optimize()?;
        self.set_external_variables();
        Ok(())
    }

    /// Build the row to insert for `cn`: the constraint expression with
    /// every basic variable substituted by its defining row, augmented with
    /// the marker and error variables the constraint needs.
    fn make_expression(&mut self, cn: &Constraint) -> LinExpr {
        let cn_expr = self.constraint_expression(cn);
        let mut expr = LinExpr::new(cn_expr.constant());
        for (v, c) in cn_expr.terms() {
            if v.is_external() {
                self.values.entry(v).or_insert(0.0);
            }
            match self.tableau.row(v) {
                Some(row) => expr.add_scaled_expr(row, c, |_, _| {}),
                None => {
                    expr.add_variable(v, c);
                }
            }
        }

        if cn.is_inequality() {
            // expr >= 0: the slack both absorbs the inequality and marks
            // the constraint.
            let slack = Variable::slack();
            expr.set_variable(slack, -1.0);
            self.marker_vars.insert(cn.clone(), slack);
            if let Some(sw) = cn.strength().error_weight(cn.weight()) {
                let eminus = Variable::slack();
                expr.set_variable(eminus, 1.0);
                self.tableau.add_to_objective(eminus, sw);
                self.error_vars.entry(cn.clone()).or_default().push(eminus);
            }
        } else if let Some(sw) = cn.strength().error_weight(cn.weight()) {
            // Non-required equality: split the violation into eplus/eminus.
            let eplus = Variable::slack();
            let eminus = Variable::slack();
            expr.set_variable(eplus, -1.0);
            expr.set_variable(eminus, 1.0);
            self.marker_vars.insert(cn.clone(), eplus);
            self.tableau.add_to_objective(eplus, sw);
            self.tableau.add_to_objective(eminus, sw);
            let evars = self.error_vars.entry(cn.clone()).or_default();
            evars.push(eplus);
            evars.push(eminus);
            if cn.is_stay() {
                self.stay_plus_error_vars.push(eplus);
                self.stay_minus_error_vars.push(eminus);
            } else if cn.is_edit()
                && let Some(variable) = cn.variable()
            {
                self.edits.push(EditInfo {
                    variable,
                    constraint: cn.clone(),
                    plus_error: eplus,
                    minus_error: eminus,
                    prev_constant: cn_expr.constant(),
                });
                if self.editing {
                    // Joined mid-session: target the anchor until suggested.
                    self.new_edit_constants.push(cn_expr.constant());
                }
            }
        } else {
            // Required equality: a dummy marker that never enters the
            // basis.
            let dummy = Variable::dummy();
            expr.set_variable(dummy, 1.0);
            self.marker_vars.insert(cn.clone(), dummy);
        }

        if expr.constant() < 0.0 {
            expr.scale(-1.0);
        }
        expr
    }

    /// The expression form of a constraint body; edit and stay constraints
    /// expand to `anchor − v`.
    fn constraint_expression(&self, cn: &Constraint) -> LinExpr {
        match cn.linear_expr() {
            Some(expr) => expr.clone(),
            None => {
                let mut expr = LinExpr::default();
                if let Some(v) = cn.variable() {
                    let anchor = cn.anchor_value().unwrap_or_else(|| self.value(v));
                    expr.set_constant(anchor);
                    expr.add_variable(v, -1.0);
                }
                expr
            }
        }
    }

    /// Install a freshly built row, either directly under a chosen subject
    /// or through an artificial variable.
    fn install_row(&mut self, mut expr: LinExpr) -> Result<()> {
        match self.choose_subject(&mut expr)? {
            Some(subject) => {
                expr.new_subject(subject)?;
                if self.tableau.has_column(subject) {
                    self.tableau.substitute_out(subject, &expr);
                }
                self.tableau.add_row(subject, expr);
                Ok(())
            }
            None => self.add_with_artificial_variable(expr),
        }
    }

    /// Undo the bookkeeping of a constraint whose row could not be
    /// installed. Only required constraints can fail, and those carry no
    /// error variables or stay/edit registrations.
    fn forget_constraint(&mut self, cn: &Constraint) {
        self.marker_vars.remove(cn);
        self.error_vars.remove(cn);
    }

    /// Select the variable to become basic for a freshly built row.
    ///
    /// Preference order: a new unrestricted variable, any known
    /// unrestricted variable, a new restricted non-dummy variable with a
    /// negative coefficient. If every term is a dummy the row encodes a
    /// redundant required equality (constant ~0, a new dummy becomes
    /// subject) or an inconsistent one (`RequiredFailure`). `Ok(None)`
    /// means the caller must fall back to an artificial variable.
    ///
    /// May negate `expr` in the all-dummies case. Each preference class is
    /// resolved by smallest identity so subject choice is deterministic.
    fn choose_subject(&self, expr: &mut LinExpr) -> Result<Option<Variable>> {
        let mut new_unrestricted: Option<Variable> = None;
        let mut known_unrestricted: Option<Variable> = None;
        let mut new_restricted: Option<Variable> = None;
        for (v, c) in expr.terms() {
            if !v.is_restricted() {
                if self.tableau.has_column(v) {
                    pick_min(&mut known_unrestricted, v);
                } else {
                    pick_min(&mut new_unrestricted, v);
                }
            } else if !v.is_dummy() && c < 0.0 {
                let is_new = match self.tableau.column(v) {
                    None => true,
                    Some(col) => col.len() == 1 && col.contains(&self.tableau.objective_var()),
                };
                if is_new {
                    pick_min(&mut new_restricted, v);
                }
            }
        }
        if let Some(subject) = new_unrestricted.or(known_unrestricted).or(new_restricted) {
            return Ok(Some(subject));
        }

        // Nothing usable: the row is acceptable only if it consists of
        // dummy variables alone.
        let mut subject: Option<Variable> = None;
        for (v, _) in expr.terms() {
            if !v.is_dummy() {
                return Ok(None);
            }
            if !self.tableau.has_column(v) {
                pick_min(&mut subject, v);
            }
        }
        if !near_zero(expr.constant()) {
            return Err(RatiteError::RequiredFailure);
        }
        if let Some(subject) = subject {
            if expr.coefficient_for(subject) > 0.0 {
                expr.scale(-1.0);
            }
            return Ok(Some(subject));
        }
        Ok(None)
    }

    /// Install a row no subject could be chosen for.
    ///
    /// The row enters under an artificial slack `av` while an auxiliary
    /// objective `az` with the same expression is driven to zero; a
    /// non-zero minimum proves the required constraint unsatisfiable.
    fn add_with_artificial_variable(&mut self, expr: LinExpr) -> Result<()> {
        self.stats.artificial_passes += 1;
        let av = Variable::slack();
        let az = Variable::objective();
        trace!(?av, ?az, "artificial pass");
        self.tableau.add_row(az, expr.clone());
        self.tableau.add_row(av, expr);
        self.optimize_scalar(az)?;

        let recovered = self
            .tableau
            .row(az)
            .is_some_and(|row| near_zero(row.constant()));
        if !recovered {
            self.tableau.remove_row(az);
            self.tableau.remove_row(av);
            self.tableau.remove_column(av);
            return Err(RatiteError::RequiredFailure);
        }

        if let Some(mut av_row) = self.tableau.remove_row(av) {
            if av_row.is_constant() {
                self.tableau.remove_row(az);
                return Ok(());
            }
            let entering = av_row
                .terms()
                .filter(|(v, _)| v.is_pivotable())
                .map(|(v, _)| v)
                .min();
            let Some(entering) = entering else {
                // A basic artificial row of dummies cannot be pivoted out.
                self.tableau.remove_row(az);
                self.tableau.remove_column(av);
                return Err(RatiteError::RequiredFailure);
            };
            av_row.change_subject(av, entering)?;
            self.tableau.substitute_out(entering, &av_row);
            self.tableau.add_row(entering, av_row);
            self.stats.pivots += 1;
        }

        self.tableau.remove_column(av);
        self.tableau.remove_row(az);
        Ok(())
    }

    /// Primal simplex on the symbolic objective row.
    pub(crate) fn optimize_primary(&mut self) -> Result<()> {
        self.stats.optimize_passes += 1;
        let mut pivots = 0usize;
        loop {
            let Some(entering) = select_entering(self.tableau.objective()) else {
                return Ok(());
            };
            self.bounded_pivot(entering, &mut pivots)?;
        }
    }

    /// Primal simplex on a scalar objective row stored in the tableau (the
    /// artificial objective).
    fn optimize_scalar(&mut self, zvar: Variable) -> Result<()> {
        self.stats.optimize_passes += 1;
        let mut pivots = 0usize;
        loop {
            let entering = match self.tableau.row(zvar) {
                Some(zrow) => select_entering(zrow),
                None => {
                    return Err(RatiteError::InternalError(
                        "artificial objective row disappeared",
                    ));
                }
            };
            let Some(entering) = entering else {
                return Ok(());
            };
            self.bounded_pivot(entering, &mut pivots)?;
        }
    }

    fn bounded_pivot(&mut self, entering: Variable, pivots: &mut usize) -> Result<()> {
        if *pivots >= self.config.max_pivots {
            return Err(RatiteError::InternalError("pivot limit exceeded"));
        }
        *pivots += 1;
        let leaving = self
            .select_leaving(entering)
            .ok_or(RatiteError::InternalError("objective function is unbounded"))?;
        self.pivot(entering, leaving)
    }

    /// Minimum-ratio leaving variable for `entering`: among basic pivotable
    /// rows with a negative coefficient, minimize `-constant / coeff`,
    /// breaking ties by smallest identity.
    fn select_leaving(&self, entering: Variable) -> Option<Variable> {
        let col = self.tableau.column(entering)?;
        let mut best: Option<(f64, Variable)> = None;
        for &basic in col {
            if !basic.is_pivotable() {
                continue;
            }
            let Some(row) = self.tableau.row(basic) else {
                continue;
            };
            let coeff = row.coefficient_for(entering);
            if coeff < 0.0 {
                replace_min(&mut best, -row.constant() / coeff, basic);
            }
        }
        best.map(|(_, v)| v)
    }

    /// Restore feasibility with the dual simplex after edit deltas pushed
    /// restricted row constants negative.
    pub(crate) fn dual_optimize(&mut self) -> Result<()> {
        let mut pivots = 0usize;
        while let Some(exit_var) = self.tableau.pop_infeasible() {
            let entering = {
                let Some(row) = self.tableau.row(exit_var) else {
                    continue;
                };
                if row.constant() >= 0.0 {
                    continue;
                }
                let mut best: Option<(SymbolicWeight, Variable)> = None;
                for (v, c) in row.terms() {
                    if c > 0.0 && v.is_pivotable() {
                        let ratio = self.tableau.objective_coefficient(v) / c;
                        let replace = match &best {
                            None => true,
                            Some((r, b)) => match ratio.cmp_lex(r) {
                                Ordering::Less => true,
                                Ordering::Equal => v.id() < b.id(),
                                Ordering::Greater => false,
                            },
                        };
                        if replace {
                            best = Some((ratio, v));
                        }
                    }
                }
                best.map(|(_, v)| v)
            };
            let Some(entering) = entering else {
                return Err(RatiteError::InternalError(
                    "dual optimize found no pivot ratio",
                ));
            };
            if pivots >= self.config.max_pivots {
                return Err(RatiteError::InternalError("pivot limit exceeded"));
            }
            pivots += 1;
            self.stats.dual_pivots += 1;
            self.pivot(entering, exit_var)?;
        }
        Ok(())
    }

    /// Pivot `entering` into the basis in place of `leaving`.
    pub(crate) fn pivot(&mut self, entering: Variable, leaving: Variable) -> Result<()> {
        self.stats.pivots += 1;
        trace!(?entering, ?leaving, "pivot");
        let mut row = self
            .tableau
            .remove_row(leaving)
            .ok_or(RatiteError::InternalError("leaving variable is not basic"))?;
        row.change_subject(leaving, entering)?;
        self.tableau.substitute_out(entering, &row);
        self.tableau.add_row(entering, row);
        Ok(())
    }

    /// Exit row for making a parametric `marker` basic during removal.
    ///
    /// Preference: (i) restricted row with a negative marker coefficient
    /// minimizing `-constant/coeff`, (ii) restricted row minimizing
    /// `constant/coeff`, (iii) none (empty column), (iv) any row from the
    /// column. Ties resolve to the smallest identity.
    fn find_marker_exit(&self, marker: Variable) -> Option<Variable> {
        let col = self.tableau.column(marker)?;
        let objective_var = self.tableau.objective_var();
        let mut negative: Option<(f64, Variable)> = None;
        let mut restricted: Option<(f64, Variable)> = None;
        let mut any: Option<Variable> = None;
        for &basic in col {
            if basic == objective_var {
                continue;
            }
            let Some(row) = self.tableau.row(basic) else {
                continue;
            };
            let coeff = row.coefficient_for(marker);
            if coeff == 0.0 {
                continue;
            }
            if basic.is_restricted() {
                if coeff < 0.0 {
                    replace_min(&mut negative, -row.constant() / coeff, basic);
                } else {
                    replace_min(&mut restricted, row.constant() / coeff, basic);
                }
            }
            pick_min(&mut any, basic);
        }
        negative
            .map(|(_, v)| v)
            .or(restricted.map(|(_, v)| v))
            .or(any)
    }

    /// Write the solution into the value arena: basic externals take their
    /// row constant, parametric externals take zero, variables outside the
    /// tableau keep their seeded value.
    pub(crate) fn set_external_variables(&mut self) {
        let tableau = &self.tableau;
        for (v, value) in self.values.iter_mut() {
            if let Some(row) = tableau.row(*v) {
                *value = row.constant();
            } else if tableau.has_column(*v) {
                *value = 0.0;
            }
        }
    }

    /// Verify the structural invariants of the tableau and the edit
    /// bookkeeping. Intended for tests and debugging.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        let objective_var = self.tableau.objective_var();
        for (basic, row) in self.tableau.rows_iter() {
            for (v, c) in row.terms() {
                if near_zero(c) {
                    return Err(format!("near-zero coefficient for {v} in row of {basic}"));
                }
                if !self.tableau.column_contains(v, basic) {
                    return Err(format!("columns index is missing {v} -> {basic}"));
                }
            }
            if basic.is_restricted()
                && row.constant() < -EPSILON
                && !self.tableau.infeasible_contains(basic)
            {
                return Err(format!(
                    "restricted basic {basic} is negative and not queued"
                ));
            }
        }
        for (v, basics) in self.tableau.columns_iter() {
            if self.tableau.row(v).is_some() {
                return Err(format!("{v} is both basic and parametric"));
            }
            for &basic in basics {
                let present = if basic == objective_var {
                    self.tableau.objective().contains_term(v)
                } else {
                    self.tableau
                        .row(basic)
                        .is_some_and(|row| row.contains_term(v))
                };
                if !present {
                    return Err(format!("columns index has stale entry {v} -> {basic}"));
                }
            }
        }
        if self.editing && self.new_edit_constants.len() != self.edits.len() {
            return Err("edit bookkeeping lists diverged in length".to_string());
        }
        Ok(())
    }
}

impl Default for SimplexSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Bland entering rule: the smallest-identity pivotable variable with a
/// definitely negative objective coefficient.
fn select_entering<K: Coefficient>(zrow: &LinExpr<K>) -> Option<Variable> {
    let mut best: Option<Variable> = None;
    for (v, c) in zrow.terms() {
        if v.is_pivotable() && c.definitely_negative() {
            pick_min(&mut best, v);
        }
    }
    best
}

fn pick_min(slot: &mut Option<Variable>, v: Variable) {
    if slot.is_none_or(|cur| v.id() < cur.id()) {
        *slot = Some(v);
    }
}

fn replace_min(slot: &mut Option<(f64, Variable)>, ratio: f64, v: Variable) {
    let replace = match slot {
        None => true,
        Some((r, b)) => ratio < *r || (ratio == *r && v.id() < b.id()),
    };
    if replace {
        *slot = Some((ratio, v));
    }
}
