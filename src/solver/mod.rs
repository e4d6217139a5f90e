//! The satisfiability core of the solver.
//!
//! The outer solve loop walks candidate versions project by project;
//! for each candidate atom it asks [`SatisfyChecker::satisfiable`]
//! whether adoption keeps the partial solution consistent. This module
//! holds that checker, the value types it reasons about, the
//! [`Selection`] seam it reads the solve state through, and the
//! structured [`SolveFailure`] values it rejects with.
//!
//! The outer loop itself (candidate enumeration, the selection stack,
//! backjumping) is not part of this crate; it consumes the blame marks
//! the checker leaves via [`Selection::fail`] to decide where to jump
//! back to.

mod failure;
mod satisfy;
mod selection;
mod types;

#[cfg(test)]
mod tests;

pub use failure::SolveFailure;
pub use satisfy::SatisfyChecker;
pub use selection::Selection;
pub use types::{Dependency, NameTable, ProjectAtom, ProjectDep, ProjectIdentifier, ProjectName};
