//! Strength tiers and symbolic weights.
//!
//! Preferential constraints are ranked lexicographically rather than by a
//! single scalar: a symbolic weight is a vector of three non-negative
//! reals, one slot per predefined tier. Minimizing the objective under
//! lexicographic comparison means any amount of weak error is preferable
//! to the smallest strong error, so strength strictly dominates the
//! per-constraint `weight` multiplier.
//!
//! The `required` tier is distinguished: it carries no symbolic weight and
//! participates in the tableau as a hard equality via a dummy marker.

use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::approx::{EPSILON, approx_eq};

/// A lexicographic vector of three non-negative reals, ordered
/// strong/medium/weak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymbolicWeight([f64; 3]);

impl SymbolicWeight {
    /// The additive identity.
    pub const ZERO: SymbolicWeight = SymbolicWeight([0.0, 0.0, 0.0]);

    /// Build a weight from its three components.
    pub const fn new(strong: f64, medium: f64, weak: f64) -> Self {
        Self([strong, medium, weak])
    }

    /// The raw components.
    pub fn components(&self) -> [f64; 3] {
        self.0
    }

    /// Lexicographic comparison.
    pub fn cmp_lex(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            match a.partial_cmp(b) {
                Some(Ordering::Equal) | None => continue,
                Some(ord) => return ord,
            }
        }
        Ordering::Equal
    }

    /// True when the first non-negligible component is below `-EPSILON`.
    pub fn definitely_negative(&self) -> bool {
        for c in self.0 {
            if c < -EPSILON {
                return true;
            }
            if c > EPSILON {
                return false;
            }
        }
        false
    }

    /// Componentwise approximate equality.
    pub fn approx_eq(&self, other: &Self) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| approx_eq(*a, *b))
    }

    /// True when every component lies within tolerance of zero.
    pub fn approx_zero(&self) -> bool {
        self.0.iter().all(|c| c.abs() < EPSILON)
    }
}

impl Add for SymbolicWeight {
    type Output = SymbolicWeight;

    fn add(self, rhs: Self) -> Self {
        Self([
            self.0[0] + rhs.0[0],
            self.0[1] + rhs.0[1],
            self.0[2] + rhs.0[2],
        ])
    }
}

impl Sub for SymbolicWeight {
    type Output = SymbolicWeight;

    fn sub(self, rhs: Self) -> Self {
        Self([
            self.0[0] - rhs.0[0],
            self.0[1] - rhs.0[1],
            self.0[2] - rhs.0[2],
        ])
    }
}

impl Neg for SymbolicWeight {
    type Output = SymbolicWeight;

    fn neg(self) -> Self {
        Self([-self.0[0], -self.0[1], -self.0[2]])
    }
}

impl Mul<f64> for SymbolicWeight {
    type Output = SymbolicWeight;

    fn mul(self, rhs: f64) -> Self {
        Self([self.0[0] * rhs, self.0[1] * rhs, self.0[2] * rhs])
    }
}

impl Div<f64> for SymbolicWeight {
    type Output = SymbolicWeight;

    fn div(self, rhs: f64) -> Self {
        Self([self.0[0] / rhs, self.0[1] / rhs, self.0[2] / rhs])
    }
}

impl Zero for SymbolicWeight {
    fn zero() -> Self {
        Self::ZERO
    }

    fn is_zero(&self) -> bool {
        self.0 == [0.0, 0.0, 0.0]
    }
}

impl fmt::Display for SymbolicWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.0[0], self.0[1], self.0[2])
    }
}

/// A constraint priority tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Strength {
    /// Must hold exactly; inconsistent required constraints are rejected.
    Required,
    /// Violations are minimized lexicographically according to the weight
    /// vector.
    Preferred(SymbolicWeight),
}

/// The distinguished hard tier.
pub const REQUIRED: Strength = Strength::Required;
/// Strongest preferential tier.
pub const STRONG: Strength = Strength::Preferred(SymbolicWeight::new(1.0, 0.0, 0.0));
/// Middle preferential tier.
pub const MEDIUM: Strength = Strength::Preferred(SymbolicWeight::new(0.0, 1.0, 0.0));
/// Weakest preferential tier, the default for stays.
pub const WEAK: Strength = Strength::Preferred(SymbolicWeight::new(0.0, 0.0, 1.0));

impl Strength {
    /// Whether this is the hard tier.
    pub fn is_required(&self) -> bool {
        matches!(self, Strength::Required)
    }

    /// Objective coefficient for one unit of error on a constraint of this
    /// strength with the given weight multiplier. `None` for required
    /// constraints, which produce no error variables.
    pub fn error_weight(&self, weight: f64) -> Option<SymbolicWeight> {
        match self {
            Strength::Required => None,
            Strength::Preferred(w) => Some(*w * weight),
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strength::Required => write!(f, "required"),
            Strength::Preferred(w) if *w == SymbolicWeight::new(1.0, 0.0, 0.0) => {
                write!(f, "strong")
            }
            Strength::Preferred(w) if *w == SymbolicWeight::new(0.0, 1.0, 0.0) => {
                write!(f, "medium")
            }
            Strength::Preferred(w) if *w == SymbolicWeight::new(0.0, 0.0, 1.0) => {
                write!(f, "weak")
            }
            Strength::Preferred(w) => write!(f, "preferred{}", w),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicographic_order() {
        let strong = SymbolicWeight::new(1.0, 0.0, 0.0);
        let medium = SymbolicWeight::new(0.0, 1.0, 0.0);
        let weak = SymbolicWeight::new(0.0, 0.0, 1.0);
        assert_eq!(strong.cmp_lex(&medium), Ordering::Greater);
        assert_eq!(medium.cmp_lex(&weak), Ordering::Greater);
        assert_eq!(weak.cmp_lex(&weak), Ordering::Equal);
    }

    #[test]
    fn test_strength_dominates_weight() {
        // A strong preference with weight 1 beats a medium preference with
        // weight 10^6 under lexicographic comparison.
        let strong = SymbolicWeight::new(1.0, 0.0, 0.0);
        let heavy_medium = SymbolicWeight::new(0.0, 1.0, 0.0) * 1.0e6;
        assert_eq!(strong.cmp_lex(&heavy_medium), Ordering::Greater);
    }

    #[test]
    fn test_definitely_negative_skips_negligible_components() {
        assert!(SymbolicWeight::new(0.0, -1.0, 0.0).definitely_negative());
        assert!(SymbolicWeight::new(1.0e-12, -1.0, 0.0).definitely_negative());
        assert!(!SymbolicWeight::new(1.0, -1.0, 0.0).definitely_negative());
        assert!(!SymbolicWeight::ZERO.definitely_negative());
    }

    #[test]
    fn test_arithmetic() {
        let w = SymbolicWeight::new(1.0, 2.0, 3.0);
        assert_eq!(w + w, SymbolicWeight::new(2.0, 4.0, 6.0));
        assert_eq!(w - w, SymbolicWeight::ZERO);
        assert_eq!(w * 2.0, SymbolicWeight::new(2.0, 4.0, 6.0));
        assert_eq!(w / 2.0, SymbolicWeight::new(0.5, 1.0, 1.5));
        assert_eq!(-w, SymbolicWeight::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn test_error_weight() {
        assert_eq!(REQUIRED.error_weight(1.0), None);
        assert_eq!(
            STRONG.error_weight(2.0),
            Some(SymbolicWeight::new(2.0, 0.0, 0.0))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(WEAK.to_string(), "weak");
        assert_eq!(REQUIRED.to_string(), "required");
    }
}
