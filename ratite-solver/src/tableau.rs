//! Row/column incidence indexing of basic and parametric variables.
//!
//! `rows` maps each basic variable to its defining expression; `columns`
//! maps each parametric variable to the set of basic variables whose row
//! mentions it. The two indexes are kept exact through every mutation so
//! substitution touches only the rows that actually change.
//!
//! The objective row is held apart from the constraint rows because its
//! coefficients are symbolic weights rather than scalars; for incidence
//! purposes it participates through a distinguished objective-kind
//! variable, exactly like any other basic variable.

use ratite_core::expr::{LinExpr, TermChange};
use ratite_core::strength::SymbolicWeight;
use ratite_core::variable::Variable;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

#[derive(Debug)]
pub(crate) struct Tableau {
    rows: FxHashMap<Variable, LinExpr<f64>>,
    columns: FxHashMap<Variable, FxHashSet<Variable>>,
    /// Queue of restricted basic variables whose constant went negative.
    infeasible_rows: Vec<Variable>,
    objective: LinExpr<SymbolicWeight>,
    objective_var: Variable,
}

impl Tableau {
    pub(crate) fn new() -> Self {
        Self {
            rows: FxHashMap::default(),
            columns: FxHashMap::default(),
            infeasible_rows: Vec::new(),
            objective: LinExpr::default(),
            objective_var: Variable::objective(),
        }
    }

    pub(crate) fn objective_var(&self) -> Variable {
        self.objective_var
    }

    pub(crate) fn objective(&self) -> &LinExpr<SymbolicWeight> {
        &self.objective
    }

    pub(crate) fn row(&self, basic: Variable) -> Option<&LinExpr<f64>> {
        self.rows.get(&basic)
    }

    pub(crate) fn rows_iter(&self) -> impl Iterator<Item = (Variable, &LinExpr<f64>)> {
        self.rows.iter().map(|(v, row)| (*v, row))
    }

    pub(crate) fn columns_iter(&self) -> impl Iterator<Item = (Variable, &FxHashSet<Variable>)> {
        self.columns.iter().map(|(v, col)| (*v, col))
    }

    pub(crate) fn column(&self, v: Variable) -> Option<&FxHashSet<Variable>> {
        self.columns.get(&v)
    }

    pub(crate) fn has_column(&self, v: Variable) -> bool {
        self.columns.contains_key(&v)
    }

    pub(crate) fn column_contains(&self, v: Variable, basic: Variable) -> bool {
        self.columns.get(&v).is_some_and(|col| col.contains(&basic))
    }

    fn apply_column_change(
        columns: &mut FxHashMap<Variable, FxHashSet<Variable>>,
        v: Variable,
        basic: Variable,
        change: TermChange,
    ) {
        match change {
            TermChange::Added => {
                columns.entry(v).or_default().insert(basic);
            }
            TermChange::Removed => {
                if let Some(col) = columns.get_mut(&v) {
                    col.remove(&basic);
                    if col.is_empty() {
                        columns.remove(&v);
                    }
                }
            }
            TermChange::Updated => {}
        }
    }

    /// Install `row` as the definition of `subject`.
    pub(crate) fn add_row(&mut self, subject: Variable, row: LinExpr<f64>) {
        trace!(?subject, "add row");
        for (v, _) in row.terms() {
            self.columns.entry(v).or_default().insert(subject);
        }
        self.rows.insert(subject, row);
    }

    /// Remove and return the row of `subject`, dropping its column entries.
    pub(crate) fn remove_row(&mut self, subject: Variable) -> Option<LinExpr<f64>> {
        let row = self.rows.remove(&subject)?;
        trace!(?subject, "remove row");
        for (v, _) in row.terms() {
            Self::apply_column_change(&mut self.columns, v, subject, TermChange::Removed);
        }
        Some(row)
    }

    /// Drop `v` as a parametric variable from every row that mentions it.
    pub(crate) fn remove_column(&mut self, v: Variable) {
        let Some(basics) = self.columns.remove(&v) else {
            return;
        };
        for basic in basics {
            if basic == self.objective_var {
                self.objective.remove_variable(v);
            } else if let Some(row) = self.rows.get_mut(&basic) {
                row.remove_variable(v);
            }
        }
    }

    /// Replace every occurrence of the parametric `entering` throughout the
    /// tableau with `expr`. Restricted rows whose constant turns negative
    /// are queued for dual re-optimization.
    pub(crate) fn substitute_out(&mut self, entering: Variable, expr: &LinExpr<f64>) {
        let Some(basics) = self.columns.remove(&entering) else {
            return;
        };
        let Tableau {
            rows,
            columns,
            infeasible_rows,
            objective,
            objective_var,
        } = self;
        for basic in basics {
            if basic == *objective_var {
                objective.substitute(entering, expr, |v, change| {
                    Self::apply_column_change(columns, v, *objective_var, change);
                });
            } else if let Some(row) = rows.get_mut(&basic) {
                row.substitute(entering, expr, |v, change| {
                    Self::apply_column_change(columns, v, basic, change);
                });
                if basic.is_restricted() && row.constant() < 0.0 {
                    infeasible_rows.push(basic);
                }
            }
        }
    }

    /// Add `delta` to the objective coefficient of `v`.
    pub(crate) fn add_to_objective(&mut self, v: Variable, delta: SymbolicWeight) {
        if let Some(change) = self.objective.add_variable(v, delta) {
            Self::apply_column_change(&mut self.columns, v, self.objective_var, change);
        }
    }

    /// Add `factor·expr` to the objective row.
    pub(crate) fn add_expr_to_objective(&mut self, expr: &LinExpr<f64>, factor: SymbolicWeight) {
        let Tableau {
            columns,
            objective,
            objective_var,
            ..
        } = self;
        objective.add_scaled_expr(expr, factor, |v, change| {
            Self::apply_column_change(columns, v, *objective_var, change);
        });
    }

    pub(crate) fn objective_coefficient(&self, v: Variable) -> SymbolicWeight {
        self.objective.coefficient_for(v)
    }

    /// Add `coefficient_for(v) · delta` to the objective constant.
    pub(crate) fn bump_objective_constant_for(&mut self, v: Variable, delta: f64) {
        let coeff = self.objective.coefficient_for(v);
        self.objective.increment_constant(coeff * delta);
    }

    /// Add `delta` to the constant of the row of `basic`, returning the new
    /// constant, or `None` when `basic` is not basic.
    pub(crate) fn increment_row_constant(&mut self, basic: Variable, delta: f64) -> Option<f64> {
        let row = self.rows.get_mut(&basic)?;
        let constant = row.constant() + delta;
        row.set_constant(constant);
        Some(constant)
    }

    /// Overwrite the constant of the row of `basic`; reports whether a row
    /// was present.
    pub(crate) fn set_row_constant_if_basic(&mut self, basic: Variable, constant: f64) -> bool {
        match self.rows.get_mut(&basic) {
            Some(row) => {
                row.set_constant(constant);
                true
            }
            None => false,
        }
    }

    pub(crate) fn push_infeasible(&mut self, basic: Variable) {
        self.infeasible_rows.push(basic);
    }

    pub(crate) fn pop_infeasible(&mut self) -> Option<Variable> {
        self.infeasible_rows.pop()
    }

    pub(crate) fn clear_infeasible(&mut self) {
        self.infeasible_rows.clear();
    }

    pub(crate) fn infeasible_contains(&self, basic: Variable) -> bool {
        self.infeasible_rows.contains(&basic)
    }
}

impl Default for Tableau {
    fn default() -> Self {
        Self::new()
    }
}
