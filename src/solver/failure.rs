//! Structured UNSAT reasons produced by the satisfiability checker.
//!
//! Every logical rejection is a value, not an exception: it names the
//! goal that was being probed, carries the evidence a diagnostic needs
//! without re-running the check, and corresponds to the blame marks the
//! checker already stamped onto the selection. Infrastructure problems
//! (a source manager that cannot answer) pass through unchanged as
//! [`SolveFailure::Fetch`].

use thiserror::Error;

use crate::core::SourceError;
use crate::solver::{Dependency, ProjectAtom, ProjectName};
use crate::version::{Constraint, Version};

/// Why a candidate atom was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveFailure {
    /// The atom's own version is ruled out by the constraints already
    /// accumulated on its project.
    #[error("version {} of {} rejected by the current constraint {constraint}", .goal.version, .goal.id)]
    VersionNotAllowed {
        /// The atom that was probed.
        goal: ProjectAtom,

        /// Every selected depender whose constraint rejects the version.
        /// Each has been marked failed; empty when nothing depends on
        /// the project yet (the candidate itself carries the blame).
        failparent: Vec<Dependency>,

        /// The accumulated constraint that rejected the version.
        constraint: Constraint,
    },

    /// A dependency the atom declares has no possible overlap with the
    /// constraints already accumulated on that dependency.
    #[error("constraint {} on {} (from {}) is disjoint with the existing constraint {constraint}", .goal.dep.constraint, .goal.dep.id, .goal.depender.id)]
    DisjointConstraint {
        /// The dependency edge that was being introduced.
        goal: Dependency,

        /// Siblings whose constraints are disjoint with the new one;
        /// each depender has been marked failed.
        failsib: Vec<Dependency>,

        /// Siblings that still overlap the new constraint. Carried for
        /// diagnostics only; their dependers are *not* marked failed.
        nofailsib: Vec<Dependency>,

        /// The accumulated constraint on the dependency.
        constraint: Constraint,
    },

    /// A dependency the atom declares disallows the version already
    /// selected for that dependency.
    #[error("constraint {} on {} (from {}) disallows the selected version {selected}", .goal.dep.constraint, .goal.dep.id, .goal.depender.id)]
    ConstraintNotAllowed {
        /// The dependency edge that was being introduced.
        goal: Dependency,

        /// The selected version the constraint disallows.
        selected: Version,
    },

    /// A dependency reuses a local name that is already bound to a
    /// different network source. No version reasoning can reconcile two
    /// projects masquerading under one name.
    #[error("{shared} is depended on as both {current} and {mismatch}")]
    SourceMismatch {
        /// The local name both sources claim.
        shared: ProjectName,

        /// The dependers of the probed atom at rejection time; all have
        /// been marked failed.
        sel: Vec<Dependency>,

        /// The network name the solve has already bound the local name
        /// to.
        current: String,

        /// The conflicting network name the new dependency names.
        mismatch: String,

        /// The atom that introduced the conflicting dependency.
        prob: ProjectAtom,
    },

    /// The source manager could not produce the atom's metadata. Not a
    /// logical failure; passed through verbatim.
    #[error(transparent)]
    Fetch(#[from] SourceError),
}

impl SolveFailure {
    /// Whether this is a logical UNSAT reason, as opposed to an
    /// infrastructure error the outer loop may retry.
    #[must_use]
    pub fn is_logical(&self) -> bool {
        !matches!(self, Self::Fetch(_))
    }
}
