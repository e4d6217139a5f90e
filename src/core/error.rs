//! Infrastructural error types for the resolver core.
//!
//! [`SourceError`] covers the non-logical failure category: a source
//! manager that cannot be reached, a project it does not know, metadata
//! it cannot produce. These are returned verbatim to the outer loop -
//! never cached, never converted into UNSAT reasoning - so a transient
//! network failure cannot poison a solve. The *logical* failure category
//! (versions ruled out by constraints) lives in
//! [`crate::solver::SolveFailure`].

use thiserror::Error;

use crate::solver::ProjectName;

/// A failure reported by the source manager.
///
/// Carried unchanged through the resolver; the outer loop decides
/// whether to retry, abort, or treat the project as unsolvable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The project is not known to any configured source.
    #[error("project {name} is not known to any source")]
    ProjectNotFound {
        /// Network name the lookup used.
        name: ProjectName,
    },

    /// Metadata for a project could not be fetched.
    #[error("failed to fetch metadata for {name}: {reason}")]
    Fetch {
        name: ProjectName,
        reason: String,
    },

    /// The project exists but has no such version.
    #[error("{name} has no version {version}")]
    VersionNotFound {
        name: ProjectName,
        version: String,
    },

    /// A network operation failed outright.
    #[error("network failure during {operation}: {reason}")]
    Network {
        operation: String,
        reason: String,
    },
}
