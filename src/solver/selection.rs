//! The selection seam between the checker and the outer solve loop.

use crate::solver::{Dependency, ProjectAtom, ProjectIdentifier};
use crate::version::Constraint;

/// The outer loop's working set of committed atoms and dependency edges.
///
/// The satisfiability checker consumes this read-mostly: the single
/// write it performs is [`Selection::fail`], which stamps blame onto the
/// projects responsible for a rejection so the outer loop knows where to
/// backjump. Mutation of everything else happens in the outer loop,
/// between checks.
pub trait Selection {
    /// The currently selected atom for a project, if one is committed.
    fn selected(&self, id: &ProjectIdentifier) -> Option<ProjectAtom>;

    /// The intersection of every constraint currently imposed on the
    /// project; [`Constraint::Any`] when nothing constrains it.
    fn constraint_on(&self, id: &ProjectIdentifier) -> Constraint;

    /// Every selected atom that currently depends on the project, with
    /// the constraint each imposes.
    fn dependencies_on(&self, id: &ProjectIdentifier) -> Vec<Dependency>;

    /// Mark a project as a blame target for the current rejection.
    fn fail(&mut self, id: &ProjectIdentifier);
}
