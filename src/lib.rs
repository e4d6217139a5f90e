//! depsolve - the version-solving core of a vendoring dependency
//! resolver.
//!
//! Given a root project with declared dependency constraints, a full
//! resolver selects, for every transitively-reachable project, exactly
//! one concrete version satisfying every constraint imposed on it, or
//! proves that no such selection exists. This crate implements the
//! semantic heart of that search; the outer backtracking loop, the real
//! source managers, and vendor materialization live with the embedding
//! tool.
//!
//! # Architecture Overview
//!
//! Three cooperating components, leaves first:
//!
//! - [`version`] - the version algebra: value types for versions and
//!   constraints, the basic `matches` / `matches_any` / `intersect`
//!   operations, and the direction-aware candidate ordering.
//! - [`source`] - the source-manager seam and the per-solve
//!   [`source::SourceBridge`]: version-list caching, identity
//!   projection between solver identifiers and network names, and the
//!   *authoritative* constraint operations that consult version
//!   metadata to reconcile "same revision under different names" before
//!   declaring a mismatch.
//! - [`solver`] - the satisfiability checker: given a candidate
//!   `(project, version)` atom and the current partial selection,
//!   decides admissibility, and on rejection produces a structured
//!   [`solver::SolveFailure`] while stamping blame marks that direct
//!   the outer loop's backjumping.
//!
//! # Error Categories
//!
//! Failures split into two disjoint categories:
//!
//! - **Infrastructural** ([`core::SourceError`]): the source manager
//!   could not answer. Returned verbatim, never cached, never treated
//!   as evidence about versions.
//! - **Logical** ([`solver::SolveFailure`]): the candidate is ruled out
//!   by accumulated constraints or identity rules. Each failure value
//!   carries the context a diagnostic needs and corresponds to the
//!   blame set already stamped onto the selection.
//!
//! # Example
//!
//! Wiring the checker takes a source manager (here a one-project stub),
//! a bridge over it, and the outer loop's selection state:
//!
//! ```rust
//! use depsolve::core::SourceError;
//! use depsolve::solver::{
//!     Dependency, NameTable, ProjectAtom, ProjectIdentifier, ProjectName, SatisfyChecker,
//!     Selection,
//! };
//! use depsolve::source::{ProjectInfo, SourceBridge, SourceManager};
//! use depsolve::version::{Constraint, Version};
//!
//! struct OneProject;
//!
//! impl SourceManager for OneProject {
//!     fn project_info(
//!         &mut self,
//!         name: &ProjectName,
//!         version: &Version,
//!     ) -> Result<ProjectInfo, SourceError> {
//!         Ok(ProjectInfo {
//!             name: name.clone(),
//!             version: version.clone(),
//!             dependencies: vec![],
//!         })
//!     }
//!     fn list_versions(&mut self, _: &ProjectName) -> Result<Vec<Version>, SourceError> {
//!         Ok(vec![Version::from_ref("1.2.0")])
//!     }
//!     fn repo_exists(&mut self, _: &ProjectName) -> Result<bool, SourceError> {
//!         Ok(true)
//!     }
//!     fn vendor_code_exists(&mut self, _: &ProjectName) -> Result<bool, SourceError> {
//!         Ok(false)
//!     }
//! }
//!
//! struct EmptySelection;
//!
//! impl Selection for EmptySelection {
//!     fn selected(&self, _: &ProjectIdentifier) -> Option<ProjectAtom> {
//!         None
//!     }
//!     fn constraint_on(&self, _: &ProjectIdentifier) -> Constraint {
//!         Constraint::Any
//!     }
//!     fn dependencies_on(&self, _: &ProjectIdentifier) -> Vec<Dependency> {
//!         vec![]
//!     }
//!     fn fail(&mut self, _: &ProjectIdentifier) {}
//! }
//!
//! let mut bridge = SourceBridge::new(OneProject, false);
//! let mut sel = EmptySelection;
//! let names = NameTable::new();
//!
//! let candidate = ProjectAtom::new(
//!     ProjectIdentifier::plain("example.com/foo"),
//!     Version::from_ref("1.2.0"),
//! );
//! let mut checker = SatisfyChecker::new(&mut bridge, &mut sel, &names);
//! assert!(checker.satisfiable(&candidate).is_ok());
//! ```
//!
//! Richer fixtures (a scriptable mock source manager, an in-memory
//! selection that records blame marks) live in the `test_utils` module
//! behind the `test-utils` feature.

pub mod core;
pub mod solver;
pub mod source;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
