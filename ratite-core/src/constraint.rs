//! Constraint value objects.
//!
//! A [`Constraint`] is immutable after construction and cheap to clone: the
//! payload sits behind an `Arc` and identity is a monotonic integer, so the
//! solver can key its marker and error bookkeeping by constraint without
//! back-pointers.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::expr::LinExpr;
use crate::strength::Strength;
use crate::variable::Variable;

/// Constraint identifier.
pub type ConstraintId = usize;

static NEXT_CONSTRAINT_ID: AtomicUsize = AtomicUsize::new(0);

/// Relation of a linear constraint body. Inequalities are normalized at
/// construction so they always read `expr ≥ 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `expr = 0`.
    Eq,
    /// `expr ≥ 0`.
    Geq,
}

/// Constraint payload.
#[derive(Debug, Clone)]
pub enum ConstraintBody {
    /// An explicit linear equation or inequality.
    Linear {
        /// Left-hand side of `expr = 0` / `expr ≥ 0`.
        expr: LinExpr,
        /// Equation or inequality.
        relation: Relation,
    },
    /// Pin `variable` near a target value, updatable through the edit
    /// protocol. The implicit expression is `value − variable = 0`.
    Edit {
        /// The edited variable.
        variable: Variable,
        /// Explicit starting target; the variable's current value when
        /// `None`.
        value: Option<f64>,
    },
    /// Prefer that `variable` keep its value.
    Stay {
        /// The anchored variable.
        variable: Variable,
        /// Explicit anchor; the variable's current value when `None`.
        value: Option<f64>,
    },
}

#[derive(Debug)]
struct ConstraintData {
    body: ConstraintBody,
    strength: Strength,
    weight: f64,
}

/// An immutable constraint with a stable identity.
///
/// Clones share the payload and compare equal; the solver's bookkeeping is
/// keyed by this identity.
#[derive(Clone)]
pub struct Constraint {
    id: ConstraintId,
    data: Arc<ConstraintData>,
}

impl Constraint {
    fn build(body: ConstraintBody, strength: Strength, weight: f64) -> Self {
        Self {
            id: NEXT_CONSTRAINT_ID.fetch_add(1, Ordering::Relaxed),
            data: Arc::new(ConstraintData {
                body,
                strength,
                weight,
            }),
        }
    }

    /// A constraint from an explicit body, strength and weight.
    pub fn new(body: ConstraintBody, strength: Strength, weight: f64) -> Self {
        Self::build(body, strength, weight)
    }

    /// Required equality `lhs = rhs`.
    pub fn eq(lhs: impl Into<LinExpr>, rhs: impl Into<LinExpr>) -> Self {
        Self::build(
            ConstraintBody::Linear {
                expr: lhs.into() - rhs.into(),
                relation: Relation::Eq,
            },
            Strength::Required,
            1.0,
        )
    }

    /// Required inequality `lhs ≥ rhs`.
    pub fn geq(lhs: impl Into<LinExpr>, rhs: impl Into<LinExpr>) -> Self {
        Self::build(
            ConstraintBody::Linear {
                expr: lhs.into() - rhs.into(),
                relation: Relation::Geq,
            },
            Strength::Required,
            1.0,
        )
    }

    /// Required inequality `lhs ≤ rhs`.
    pub fn leq(lhs: impl Into<LinExpr>, rhs: impl Into<LinExpr>) -> Self {
        Self::build(
            ConstraintBody::Linear {
                expr: rhs.into() - lhs.into(),
                relation: Relation::Geq,
            },
            Strength::Required,
            1.0,
        )
    }

    /// Required strict inequality `lhs > rhs`, modeled as `lhs ≥ rhs + 1`.
    ///
    /// The unit offset only makes sense for integer-like domains; it is
    /// preserved for backward behavioral compatibility.
    pub fn gt(lhs: impl Into<LinExpr>, rhs: impl Into<LinExpr>) -> Self {
        let rhs: LinExpr = rhs.into();
        Self::geq(lhs, rhs + 1.0)
    }

    /// Required strict inequality `lhs < rhs`, modeled as `lhs ≤ rhs − 1`.
    ///
    /// See [`gt`](Self::gt) for the integer-bias caveat.
    pub fn lt(lhs: impl Into<LinExpr>, rhs: impl Into<LinExpr>) -> Self {
        let rhs: LinExpr = rhs.into();
        Self::leq(lhs, rhs - 1.0)
    }

    /// Edit constraint on `variable`, targeting its current value.
    pub fn edit(variable: Variable, strength: Strength) -> Self {
        Self::build(
            ConstraintBody::Edit {
                variable,
                value: None,
            },
            strength,
            1.0,
        )
    }

    /// Stay constraint anchoring `variable` at its current value.
    pub fn stay(variable: Variable, strength: Strength) -> Self {
        Self::build(
            ConstraintBody::Stay {
                variable,
                value: None,
            },
            strength,
            1.0,
        )
    }

    /// Stay constraint anchoring `variable` at an explicit value.
    pub fn stay_at(variable: Variable, value: f64, strength: Strength) -> Self {
        Self::build(
            ConstraintBody::Stay {
                variable,
                value: Some(value),
            },
            strength,
            1.0,
        )
    }

    /// A copy of this constraint with a different strength and a fresh
    /// identity.
    pub fn with_strength(&self, strength: Strength) -> Self {
        Self::build(self.data.body.clone(), strength, self.data.weight)
    }

    /// A copy of this constraint with a different weight multiplier and a
    /// fresh identity.
    pub fn with_weight(&self, weight: f64) -> Self {
        Self::build(self.data.body.clone(), self.data.strength, weight)
    }

    /// Stable identity.
    pub fn id(&self) -> ConstraintId {
        self.id
    }

    /// Constraint payload.
    pub fn body(&self) -> &ConstraintBody {
        &self.data.body
    }

    /// Priority tier.
    pub fn strength(&self) -> Strength {
        self.data.strength
    }

    /// Weight multiplier within the tier.
    pub fn weight(&self) -> f64 {
        self.data.weight
    }

    /// Whether the constraint must hold exactly.
    pub fn is_required(&self) -> bool {
        self.data.strength.is_required()
    }

    /// Whether the body is an inequality.
    pub fn is_inequality(&self) -> bool {
        matches!(
            self.data.body,
            ConstraintBody::Linear {
                relation: Relation::Geq,
                ..
            }
        )
    }

    /// Whether this is an edit constraint.
    pub fn is_edit(&self) -> bool {
        matches!(self.data.body, ConstraintBody::Edit { .. })
    }

    /// Whether this is a stay constraint.
    pub fn is_stay(&self) -> bool {
        matches!(self.data.body, ConstraintBody::Stay { .. })
    }

    /// The anchored variable of an edit or stay constraint.
    pub fn variable(&self) -> Option<Variable> {
        match self.data.body {
            ConstraintBody::Edit { variable, .. } | ConstraintBody::Stay { variable, .. } => {
                Some(variable)
            }
            ConstraintBody::Linear { .. } => None,
        }
    }

    /// The explicit anchor value of an edit or stay constraint, if one was
    /// given at construction.
    pub fn anchor_value(&self) -> Option<f64> {
        match self.data.body {
            ConstraintBody::Edit { value, .. } | ConstraintBody::Stay { value, .. } => value,
            ConstraintBody::Linear { .. } => None,
        }
    }

    /// The expression of a linear body.
    pub fn linear_expr(&self) -> Option<&LinExpr> {
        match &self.data.body {
            ConstraintBody::Linear { expr, .. } => Some(expr),
            _ => None,
        }
    }
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Constraint {}

impl Hash for Constraint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data.body {
            ConstraintBody::Linear { expr, relation } => {
                let op = match relation {
                    Relation::Eq => "=",
                    Relation::Geq => ">=",
                };
                write!(f, "{} {} 0 [{}]", expr, op, self.data.strength)
            }
            ConstraintBody::Edit { variable, .. } => {
                write!(f, "edit({}) [{}]", variable, self.data.strength)
            }
            ConstraintBody::Stay { variable, .. } => {
                write!(f, "stay({}) [{}]", variable, self.data.strength)
            }
        }
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("id", &self.id)
            .field("body", &self.data.body)
            .field("strength", &self.data.strength)
            .field("weight", &self.data.weight)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strength::{STRONG, WEAK};

    #[test]
    fn test_leq_normalizes_to_geq() {
        let x = Variable::external();
        let cn = Constraint::leq(x, 10.0);
        assert!(cn.is_inequality());
        let expr = cn.linear_expr().unwrap();
        // 10 - x >= 0
        assert_eq!(expr.constant(), 10.0);
        assert_eq!(expr.coefficient_for(x), -1.0);
    }

    #[test]
    fn test_strict_inequalities_carry_unit_bias() {
        let x = Variable::external();
        let gt = Constraint::gt(x, 5.0);
        // x - 6 >= 0
        assert_eq!(gt.linear_expr().unwrap().constant(), -6.0);

        let lt = Constraint::lt(x, 5.0);
        // 4 - x >= 0
        assert_eq!(lt.linear_expr().unwrap().constant(), 4.0);
    }

    #[test]
    fn test_identity_semantics() {
        let x = Variable::external();
        let a = Constraint::eq(x, 1.0);
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a.id(), b.id());

        // Same shape, distinct identity.
        let c = Constraint::eq(x, 1.0);
        assert_ne!(a, c);
    }

    #[test]
    fn test_with_strength_rebinds() {
        let x = Variable::external();
        let weak = Constraint::eq(x, 1.0).with_strength(WEAK);
        assert!(!weak.is_required());
        let strong = weak.with_strength(STRONG);
        assert_eq!(strong.strength(), STRONG);
        assert_ne!(weak, strong);
    }

    #[test]
    fn test_edit_and_stay_bodies() {
        let x = Variable::external();
        let edit = Constraint::edit(x, STRONG);
        assert!(edit.is_edit() && !edit.is_stay());
        assert_eq!(edit.variable(), Some(x));
        assert_eq!(edit.anchor_value(), None);

        let stay = Constraint::stay_at(x, 7.0, WEAK);
        assert!(stay.is_stay());
        assert_eq!(stay.anchor_value(), Some(7.0));
    }
}
