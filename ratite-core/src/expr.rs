//! Sparse linear expressions over solver variables.
//!
//! A [`LinExpr`] is the row form `c + Σ cᵢ·vᵢ`: a constant plus a mapping
//! from variable to non-zero coefficient. Ordinary tableau rows carry `f64`
//! coefficients; the objective row carries
//! [`SymbolicWeight`](crate::strength::SymbolicWeight)s. The [`Coefficient`]
//! trait abstracts over the two so the same substitution and scaling code
//! serves both.
//!
//! Mutating operations report term additions and removals through a
//! [`TermChange`] callback; the tableau uses those notifications to keep its
//! column incidence index exact.

use num_traits::Zero;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::approx::{EPSILON, near_zero};
use crate::error::{RatiteError, Result};
use crate::strength::SymbolicWeight;
use crate::variable::Variable;

/// Row coefficient abstraction: `f64` for ordinary rows,
/// [`SymbolicWeight`](crate::strength::SymbolicWeight) for the objective
/// row.
pub trait Coefficient:
    Copy + PartialEq + Zero + Neg<Output = Self> + Mul<f64, Output = Self>
{
    /// Close enough to zero to drop the term from a row.
    fn approx_zero(&self) -> bool;

    /// Strictly negative beyond tolerance. For symbolic weights this
    /// inspects the first non-negligible component.
    fn definitely_negative(&self) -> bool;
}

impl Coefficient for f64 {
    fn approx_zero(&self) -> bool {
        near_zero(*self)
    }

    fn definitely_negative(&self) -> bool {
        *self < -EPSILON
    }
}

impl Coefficient for SymbolicWeight {
    fn approx_zero(&self) -> bool {
        SymbolicWeight::approx_zero(self)
    }

    fn definitely_negative(&self) -> bool {
        SymbolicWeight::definitely_negative(self)
    }
}

/// How a mutation affected one term of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermChange {
    /// The variable was absent and now carries a coefficient.
    Added,
    /// The variable's coefficient landed within tolerance of zero and the
    /// term was dropped.
    Removed,
    /// The coefficient changed but the term survives.
    Updated,
}

/// A sparse linear form `constant + Σ coeff·var`.
///
/// Invariant: no stored coefficient is approximately zero.
#[derive(Debug, Clone, PartialEq)]
pub struct LinExpr<K: Coefficient = f64> {
    constant: K,
    terms: FxHashMap<Variable, K>,
}

impl<K: Coefficient> LinExpr<K> {
    /// A constant expression with no terms.
    pub fn new(constant: K) -> Self {
        Self {
            constant,
            terms: FxHashMap::default(),
        }
    }

    /// The constant part.
    pub fn constant(&self) -> K {
        self.constant
    }

    /// Overwrite the constant part.
    pub fn set_constant(&mut self, constant: K) {
        self.constant = constant;
    }

    /// Add `delta` to the constant part.
    pub fn increment_constant(&mut self, delta: K) {
        self.constant = self.constant + delta;
    }

    /// Whether the expression has no variable terms.
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of variable terms.
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Iterate over `(variable, coefficient)` pairs in arbitrary order.
    pub fn terms(&self) -> impl Iterator<Item = (Variable, K)> + '_ {
        self.terms.iter().map(|(v, c)| (*v, *c))
    }

    /// Coefficient of `v`, zero if absent.
    pub fn coefficient_for(&self, v: Variable) -> K {
        self.terms.get(&v).copied().unwrap_or_else(K::zero)
    }

    /// Whether `v` carries a coefficient.
    pub fn contains_term(&self, v: Variable) -> bool {
        self.terms.contains_key(&v)
    }

    /// Add `c·v`, dropping the term if the result lands within tolerance of
    /// zero. Returns what happened to the term so callers maintaining
    /// column incidence can react.
    pub fn add_variable(&mut self, v: Variable, c: K) -> Option<TermChange> {
        match self.terms.entry(v) {
            Entry::Occupied(mut entry) => {
                let updated = *entry.get() + c;
                if updated.approx_zero() {
                    entry.remove();
                    Some(TermChange::Removed)
                } else {
                    entry.insert(updated);
                    Some(TermChange::Updated)
                }
            }
            Entry::Vacant(entry) => {
                if c.approx_zero() {
                    None
                } else {
                    entry.insert(c);
                    Some(TermChange::Added)
                }
            }
        }
    }

    /// Overwrite the coefficient of `v`; near-zero coefficients remove the
    /// term.
    pub fn set_variable(&mut self, v: Variable, c: K) -> Option<TermChange> {
        if c.approx_zero() {
            self.terms.remove(&v).map(|_| TermChange::Removed)
        } else {
            match self.terms.insert(v, c) {
                Some(_) => Some(TermChange::Updated),
                None => Some(TermChange::Added),
            }
        }
    }

    /// Remove the term for `v`, returning its coefficient.
    pub fn remove_variable(&mut self, v: Variable) -> Option<K> {
        self.terms.remove(&v)
    }

    /// Add `factor` times a scalar expression, term by term, scaling the
    /// constant as well.
    pub fn add_scaled_expr(
        &mut self,
        expr: &LinExpr<f64>,
        factor: K,
        mut on_change: impl FnMut(Variable, TermChange),
    ) {
        self.constant = self.constant + factor * expr.constant;
        for (v, c) in expr.terms() {
            if let Some(change) = self.add_variable(v, factor * c) {
                on_change(v, change);
            }
        }
    }

    /// Replace every occurrence of `v` by `expr`, i.e. perform
    /// `self ← self + coeff·expr − coeff·v` where `coeff` is `v`'s current
    /// coefficient. A no-op when `v` is absent.
    pub fn substitute(
        &mut self,
        v: Variable,
        expr: &LinExpr<f64>,
        mut on_change: impl FnMut(Variable, TermChange),
    ) {
        let Some(coeff) = self.terms.remove(&v) else {
            return;
        };
        on_change(v, TermChange::Removed);
        self.add_scaled_expr(expr, coeff, on_change);
    }

    /// Scale the whole expression in place.
    pub fn scale(&mut self, factor: f64) {
        self.constant = self.constant * factor;
        for c in self.terms.values_mut() {
            *c = *c * factor;
        }
    }
}

impl<K: Coefficient> Default for LinExpr<K> {
    fn default() -> Self {
        Self::new(K::zero())
    }
}

impl LinExpr<f64> {
    /// A single-term expression `c·v`.
    pub fn term(v: Variable, c: f64) -> Self {
        let mut expr = Self::default();
        expr.add_variable(v, c);
        expr
    }

    /// Rescale so the row reads `subject = self`, removing `subject` from
    /// the terms. Returns the reciprocal of `subject`'s old coefficient.
    ///
    /// The row is assumed to represent the equation `0 = self` (or
    /// equivalently `old_subject = self` when called through
    /// [`change_subject`](Self::change_subject)).
    pub fn new_subject(&mut self, subject: Variable) -> Result<f64> {
        let coeff = self
            .terms
            .remove(&subject)
            .ok_or(RatiteError::InternalError("new subject is not in the row"))?;
        let reciprocal = 1.0 / coeff;
        self.scale(-reciprocal);
        Ok(reciprocal)
    }

    /// Rewrite `old = self` (with `new` among the terms) into a definition
    /// of `new`, moving `old` onto the right-hand side.
    pub fn change_subject(&mut self, old: Variable, new: Variable) -> Result<()> {
        let reciprocal = self.new_subject(new)?;
        self.set_variable(old, reciprocal);
        Ok(())
    }

    /// Product of two expressions. Fails with
    /// [`NonLinearResult`](RatiteError::NonLinearResult) unless at least
    /// one operand is constant.
    pub fn try_mul(&self, other: &LinExpr) -> Result<LinExpr> {
        if self.is_constant() {
            Ok(other.scaled(self.constant))
        } else if other.is_constant() {
            Ok(self.scaled(other.constant))
        } else {
            Err(RatiteError::NonLinearResult)
        }
    }

    /// Quotient of two expressions. Fails with
    /// [`NonLinearResult`](RatiteError::NonLinearResult) when the divisor
    /// is non-constant or near zero.
    pub fn try_div(&self, other: &LinExpr) -> Result<LinExpr> {
        if !other.is_constant() || near_zero(other.constant) {
            return Err(RatiteError::NonLinearResult);
        }
        Ok(self.scaled(1.0 / other.constant))
    }

    fn scaled(&self, factor: f64) -> LinExpr {
        let mut expr = self.clone();
        expr.scale(factor);
        expr
    }
}

impl fmt::Display for LinExpr<f64> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.constant)?;
        let mut terms: Vec<_> = self.terms().collect();
        terms.sort_by_key(|(v, _)| v.id());
        for (v, c) in terms {
            if c < 0.0 {
                write!(f, " - {}*{}", -c, v)?;
            } else {
                write!(f, " + {}*{}", c, v)?;
            }
        }
        Ok(())
    }
}

// Builder operators. Linearity is encoded in the types where possible:
// expression-by-expression products go through `try_mul`/`try_div`, which
// report `NonLinearResult` at runtime.

impl From<Variable> for LinExpr {
    fn from(v: Variable) -> Self {
        LinExpr::term(v, 1.0)
    }
}

impl From<f64> for LinExpr {
    fn from(c: f64) -> Self {
        LinExpr::new(c)
    }
}

impl<T: Into<LinExpr>> Add<T> for LinExpr {
    type Output = LinExpr;

    fn add(mut self, rhs: T) -> LinExpr {
        let rhs = rhs.into();
        self.add_scaled_expr(&rhs, 1.0, |_, _| {});
        self
    }
}

impl<T: Into<LinExpr>> Sub<T> for LinExpr {
    type Output = LinExpr;

    fn sub(mut self, rhs: T) -> LinExpr {
        let rhs = rhs.into();
        self.add_scaled_expr(&rhs, -1.0, |_, _| {});
        self
    }
}

impl<T: Into<LinExpr>> Add<T> for Variable {
    type Output = LinExpr;

    fn add(self, rhs: T) -> LinExpr {
        let rhs: LinExpr = rhs.into();
        LinExpr::from(self) + rhs
    }
}

impl<T: Into<LinExpr>> Sub<T> for Variable {
    type Output = LinExpr;

    fn sub(self, rhs: T) -> LinExpr {
        let rhs: LinExpr = rhs.into();
        LinExpr::from(self) - rhs
    }
}

impl Add<LinExpr> for f64 {
    type Output = LinExpr;

    fn add(self, rhs: LinExpr) -> LinExpr {
        LinExpr::new(self) + rhs
    }
}

impl Add<Variable> for f64 {
    type Output = LinExpr;

    fn add(self, rhs: Variable) -> LinExpr {
        LinExpr::new(self) + rhs
    }
}

impl Sub<LinExpr> for f64 {
    type Output = LinExpr;

    fn sub(self, rhs: LinExpr) -> LinExpr {
        LinExpr::new(self) - rhs
    }
}

impl Sub<Variable> for f64 {
    type Output = LinExpr;

    fn sub(self, rhs: Variable) -> LinExpr {
        LinExpr::new(self) - rhs
    }
}

impl Mul<f64> for LinExpr {
    type Output = LinExpr;

    fn mul(mut self, rhs: f64) -> LinExpr {
        self.scale(rhs);
        self
    }
}

impl Mul<LinExpr> for f64 {
    type Output = LinExpr;

    fn mul(self, rhs: LinExpr) -> LinExpr {
        rhs * self
    }
}

impl Mul<f64> for Variable {
    type Output = LinExpr;

    fn mul(self, rhs: f64) -> LinExpr {
        LinExpr::term(self, rhs)
    }
}

impl Mul<Variable> for f64 {
    type Output = LinExpr;

    fn mul(self, rhs: Variable) -> LinExpr {
        LinExpr::term(rhs, self)
    }
}

impl Div<f64> for LinExpr {
    type Output = LinExpr;

    fn div(mut self, rhs: f64) -> LinExpr {
        self.scale(1.0 / rhs);
        self
    }
}

impl Div<f64> for Variable {
    type Output = LinExpr;

    fn div(self, rhs: f64) -> LinExpr {
        LinExpr::term(self, 1.0 / rhs)
    }
}

impl Neg for LinExpr {
    type Output = LinExpr;

    fn neg(mut self) -> LinExpr {
        self.scale(-1.0);
        self
    }
}

impl Neg for Variable {
    type Output = LinExpr;

    fn neg(self) -> LinExpr {
        LinExpr::term(self, -1.0)
    }
}
