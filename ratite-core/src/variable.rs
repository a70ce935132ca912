//! Tagged solver variables.
//!
//! A variable is a cheap `Copy` handle: a stable creation-order identity
//! plus a kind tag. The tag replaces the subclass dispatch of classic
//! Cassowary implementations; the three capabilities each kind carries are
//! a direct function of the tag:
//!
//! | Kind      | external | pivotable | restricted |
//! |-----------|----------|-----------|------------|
//! | External  | yes      | no        | no         |
//! | Slack     | no       | yes       | yes        |
//! | Dummy     | no       | no        | yes        |
//! | Objective | no       | no        | no         |
//!
//! Identities are drawn from a process-wide monotonic counter, so they
//! induce a total order independent of memory layout. The simplex engine
//! breaks pivot ties by smallest identity (Bland's rule), which is what
//! makes solving deterministic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Variable identifier.
pub type VarId = usize;

static NEXT_VAR_ID: AtomicUsize = AtomicUsize::new(0);

/// Variable kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarKind {
    /// User-visible variable carrying an observable value.
    External,
    /// Restricted, pivotable variable introduced for inequalities and
    /// preferential errors.
    Slack,
    /// Restricted, non-pivotable marker standing in for a required
    /// equality. Dummies never enter the basis.
    Dummy,
    /// Key of an objective row.
    Objective,
}

/// A solver variable.
///
/// Only external variables are created by callers; the solver creates
/// slack, dummy and objective variables internally. All kinds share one
/// identity space so the engine can order any two variables.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variable {
    id: VarId,
    kind: VarKind,
}

impl Variable {
    fn fresh(kind: VarKind) -> Self {
        Self {
            id: NEXT_VAR_ID.fetch_add(1, Ordering::Relaxed),
            kind,
        }
    }

    /// Create a new external (user-visible) variable.
    pub fn external() -> Self {
        Self::fresh(VarKind::External)
    }

    /// Create a new slack variable.
    pub fn slack() -> Self {
        Self::fresh(VarKind::Slack)
    }

    /// Create a new dummy variable.
    pub fn dummy() -> Self {
        Self::fresh(VarKind::Dummy)
    }

    /// Create a new objective variable.
    pub fn objective() -> Self {
        Self::fresh(VarKind::Objective)
    }

    /// Stable creation-order identity.
    pub fn id(&self) -> VarId {
        self.id
    }

    /// Kind tag.
    pub fn kind(&self) -> VarKind {
        self.kind
    }

    /// Whether the variable carries an observable value.
    pub fn is_external(&self) -> bool {
        self.kind == VarKind::External
    }

    /// Whether the variable may enter or leave the basis during
    /// optimization.
    pub fn is_pivotable(&self) -> bool {
        self.kind == VarKind::Slack
    }

    /// Whether the variable must be non-negative in every feasible
    /// solution.
    pub fn is_restricted(&self) -> bool {
        matches!(self.kind, VarKind::Slack | VarKind::Dummy)
    }

    /// Whether the variable is a dummy marker.
    pub fn is_dummy(&self) -> bool {
        self.kind == VarKind::Dummy
    }
}

impl PartialOrd for Variable {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Variable {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            VarKind::External => "v",
            VarKind::Slack => "s",
            VarKind::Dummy => "d",
            VarKind::Objective => "z",
        };
        write!(f, "{}{}", prefix, self.id)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
