//! The source-manager seam and the per-solve bridge over it.
//!
//! A [`SourceManager`] is the resolver's window onto the outside world:
//! it can list the versions a project has, fetch the metadata a
//! particular version declares, and answer existence questions about
//! repositories and vendored copies. Implementations live outside this
//! crate (they talk to Git, to disk, to a registry); the resolver only
//! consumes the trait.
//!
//! The [`SourceBridge`] wraps a source manager for the duration of one
//! solve run. It caches each project's version list sorted in the
//! direction the solve walks it, translates the solver's
//! [`ProjectIdentifier`](crate::solver::ProjectIdentifier)s into the
//! network names the source manager traffics in, and promotes the basic
//! constraint algebra to *authoritative* operations that consult version
//! metadata before declaring a mismatch.

mod bridge;

pub use bridge::SourceBridge;

use crate::core::SourceError;
use crate::solver::{ProjectDep, ProjectName};
use crate::version::Version;

/// Metadata for one version of one project, as declared at that version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    /// Network name the metadata was fetched under.
    pub name: ProjectName,

    /// The version the metadata describes.
    pub version: Version,

    /// The dependencies this version declares.
    pub dependencies: Vec<ProjectDep>,
}

/// The external source of project metadata.
///
/// All methods are keyed by network name; mapping solver-local
/// identifiers onto network names is the bridge's job. Calls may block
/// on network or disk; the core is synchronous and makes one request at
/// a time.
pub trait SourceManager {
    /// Fetch the metadata a project declares at a version.
    fn project_info(
        &mut self,
        name: &ProjectName,
        version: &Version,
    ) -> Result<ProjectInfo, SourceError>;

    /// List every version the project has, in no particular order.
    fn list_versions(&mut self, name: &ProjectName) -> Result<Vec<Version>, SourceError>;

    /// Whether a source repository exists for the project.
    fn repo_exists(&mut self, name: &ProjectName) -> Result<bool, SourceError>;

    /// Whether vendored code for the project is already on disk.
    fn vendor_code_exists(&mut self, name: &ProjectName) -> Result<bool, SourceError>;
}
