//! The satisfiability checker.
//!
//! [`SatisfyChecker::satisfiable`] is the predicate the outer loop
//! evaluates for every candidate atom: would adopting this `(project,
//! version)` keep the partial solution consistent with every accumulated
//! constraint and with the identity rules? A rejection is returned as a
//! structured [`SolveFailure`] and accompanied by blame marks on the
//! selection, which is what directs the outer loop's backjumping.

use tracing::debug;

use crate::solver::{
    Dependency, NameTable, ProjectAtom, ProjectDep, Selection, SolveFailure,
};
use crate::source::{SourceBridge, SourceManager};

/// One satisfiability evaluation's view of the solve: the bridge for
/// metadata, the selection for accumulated state, the name table for
/// identity checks.
pub struct SatisfyChecker<'a, S, L> {
    bridge: &'a mut SourceBridge<S>,
    sel: &'a mut L,
    names: &'a NameTable,
}

impl<'a, S: SourceManager, L: Selection> SatisfyChecker<'a, S, L> {
    pub fn new(bridge: &'a mut SourceBridge<S>, sel: &'a mut L, names: &'a NameTable) -> Self {
        Self {
            bridge,
            sel,
            names,
        }
    }

    /// Decide whether introducing the atom keeps all solver requirements
    /// satisfied.
    ///
    /// The check order is load-bearing: the atom's own admissibility is
    /// settled before any dependency-level reasoning, and for each
    /// dependency the identity check runs before the constraint checks,
    /// because a source mismatch invalidates any constraint reasoning
    /// about the name.
    ///
    /// # Panics
    ///
    /// Panics when handed the empty sentinel atom; that is a bug in the
    /// caller, not a solvable state.
    pub fn satisfiable(&mut self, pa: &ProjectAtom) -> Result<(), SolveFailure> {
        assert!(!pa.is_empty(), "satisfiability check on the empty project atom");

        debug!(
            name = %pa.id,
            version = %pa.version,
            "checking satisfiability of project atom against current constraints"
        );

        self.check_atom_allowable(pa)?;

        // A failure here is from the metadata fetcher; pass it straight
        // back.
        let deps = self.dependencies_of(pa)?;

        for dep in &deps {
            self.check_ident_matches(pa, dep)?;
            self.check_dep_constraints_allowable(pa, dep)?;
            self.check_dep_disallows_selected(pa, dep)?;

            // TODO: reject atoms whose dependencies would close a cycle,
            // once the selection exposes a path query to detect one.
        }

        debug!(
            name = %pa.id,
            version = %pa.version,
            "project atom passed satisfiability against current state"
        );

        Ok(())
    }

    fn dependencies_of(&mut self, pa: &ProjectAtom) -> Result<Vec<ProjectDep>, SolveFailure> {
        let info = self.bridge.project_info(pa)?;
        Ok(info.dependencies)
    }

    /// The atom itself must be acceptable under the constraints the
    /// current solution has accumulated on its project.
    fn check_atom_allowable(&mut self, pa: &ProjectAtom) -> Result<(), SolveFailure> {
        let constraint = self.sel.constraint_on(&pa.id);
        if constraint.matches(&pa.version) {
            return Ok(());
        }

        debug!(
            name = %pa.id,
            version = %pa.version,
            constraint = %constraint,
            "current constraints do not allow version"
        );

        let mut failparent = Vec::new();
        for dep in self.sel.dependencies_on(&pa.id) {
            if !dep.dep.constraint.matches(&pa.version) {
                debug!(
                    name = %pa.id,
                    depender = %dep.depender.id,
                    constraint = %dep.dep.constraint,
                    "marking depender with conflicting constraint as failed"
                );
                self.sel.fail(&dep.depender.id);
                failparent.push(dep);
            }
        }

        Err(SolveFailure::VersionNotAllowed {
            goal: pa.clone(),
            failparent,
            constraint,
        })
    }

    /// A dependency's local name must agree with the network source the
    /// solve has already bound that name to. The solver never selects
    /// two identifiers that share a local name but disagree about where
    /// their source lives.
    fn check_ident_matches(&mut self, pa: &ProjectAtom, dep: &ProjectDep) -> Result<(), SolveFailure> {
        let Some(current) = self.names.get(&dep.id.local_name) else {
            return Ok(());
        };
        if current == dep.id.net_name() {
            return Ok(());
        }

        debug!(
            name = %pa.id,
            shared = %dep.id.local_name,
            current = %current,
            mismatch = %dep.id.net_name(),
            "dependency disagrees about the network source for a known local name"
        );

        // No version of this atom can ever be compatible with the
        // existing dependers; fail them all.
        let sel = self.sel.dependencies_on(&pa.id);
        for d in &sel {
            self.sel.fail(&d.depender.id);
        }

        Err(SolveFailure::SourceMismatch {
            shared: dep.id.local_name.clone(),
            sel,
            current: current.clone(),
            mismatch: dep.id.net_name().to_string(),
            prob: pa.clone(),
        })
    }

    /// The constraint a dependency introduces must leave at least some
    /// possible intersection with the constraints already accumulated on
    /// that dependency.
    fn check_dep_constraints_allowable(
        &mut self,
        pa: &ProjectAtom,
        dep: &ProjectDep,
    ) -> Result<(), SolveFailure> {
        let constraint = self.sel.constraint_on(&dep.id);
        if constraint.matches_any(&dep.constraint) {
            return Ok(());
        }

        debug!(
            name = %pa.id,
            version = %pa.version,
            depname = %dep.id,
            current = %constraint,
            introduced = %dep.constraint,
            "atom cannot be added; its constraint is disjoint with existing constraints"
        );

        // No admissible versions remain. Visit every sibling and
        // identify the disagreements; siblings that still overlap are
        // recorded for diagnostics but carry no blame.
        let mut failsib = Vec::new();
        let mut nofailsib = Vec::new();
        for sibling in self.sel.dependencies_on(&dep.id) {
            if !sibling.dep.constraint.matches_any(&dep.constraint) {
                debug!(
                    name = %pa.id,
                    depender = %sibling.depender.id,
                    sibling_constraint = %sibling.dep.constraint,
                    introduced = %dep.constraint,
                    "marking sibling with disjoint constraint as failed"
                );
                self.sel.fail(&sibling.depender.id);
                failsib.push(sibling);
            } else {
                nofailsib.push(sibling);
            }
        }

        Err(SolveFailure::DisjointConstraint {
            goal: Dependency {
                depender: pa.clone(),
                dep: dep.clone(),
            },
            failsib,
            nofailsib,
            constraint,
        })
    }

    /// A dependency's constraint must not rule out the version already
    /// selected for that dependency.
    fn check_dep_disallows_selected(
        &mut self,
        pa: &ProjectAtom,
        dep: &ProjectDep,
    ) -> Result<(), SolveFailure> {
        let Some(selected) = self.sel.selected(&dep.id) else {
            return Ok(());
        };
        if dep.constraint.matches(&selected.version) {
            return Ok(());
        }

        debug!(
            name = %pa.id,
            version = %pa.version,
            depname = %dep.id,
            selected = %selected.version,
            introduced = %dep.constraint,
            "atom cannot be added; it disallows the currently selected version of a dependency"
        );

        self.sel.fail(&dep.id);

        Err(SolveFailure::ConstraintNotAllowed {
            goal: Dependency {
                depender: pa.clone(),
                dep: dep.clone(),
            },
            selected: selected.version,
        })
    }
}
