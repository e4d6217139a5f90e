//! Value types the solver reasons about.
//!
//! All of these are immutable values: identifiers, concrete selections
//! (atoms), and constraint-carrying dependency edges. The mutable state
//! of a solve (the selection, the identity map) lives with the outer
//! loop; see [`crate::solver::Selection`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::version::{Constraint, Revision, Version};

/// A globally-unique network name for a project, the key the source
/// manager traffics in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProjectName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The identity map the outer loop maintains: each local name, as seen
/// inside importing sources, mapped to the network name it was first
/// resolved against. Within one solve this mapping must stay injective;
/// the checker raises a source mismatch when a dependency disagrees.
pub type NameTable = HashMap<ProjectName, String>;

/// How a project is identified: by the local name importing sources use,
/// and optionally by an explicit network name when the two differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectIdentifier {
    /// The identifier as it appears inside importing sources; stable
    /// within the project graph.
    pub local_name: ProjectName,

    /// The canonical remote source identifier, when it differs from the
    /// local name.
    pub network_name: Option<String>,
}

impl ProjectIdentifier {
    /// An identifier whose network name is the local name itself.
    pub fn plain(local: impl Into<String>) -> Self {
        Self {
            local_name: ProjectName::new(local),
            network_name: None,
        }
    }

    pub fn with_network(local: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            local_name: ProjectName::new(local),
            network_name: Some(network.into()),
        }
    }

    /// The network name this identifier resolves to.
    #[must_use]
    pub fn net_name(&self) -> &str {
        self.network_name.as_deref().unwrap_or(self.local_name.as_str())
    }
}

impl fmt::Display for ProjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.local_name)
    }
}

/// A concrete candidate selection: one project at one version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAtom {
    pub id: ProjectIdentifier,
    pub version: Version,
}

impl ProjectAtom {
    pub fn new(id: ProjectIdentifier, version: Version) -> Self {
        Self {
            id,
            version,
        }
    }

    /// The recognizable empty sentinel. Handing it to the satisfiability
    /// checker is a programming error and panics there.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            id: ProjectIdentifier::plain(""),
            version: Version::Revision(Revision::new("")),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.local_name.as_str().is_empty()
            && self.id.network_name.is_none()
            && matches!(&self.version, Version::Revision(r) if r.is_empty())
    }
}

/// An outgoing dependency declaration: the project depended on, and the
/// constraint imposed on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDep {
    pub id: ProjectIdentifier,
    pub constraint: Constraint,
}

impl ProjectDep {
    pub fn new(id: ProjectIdentifier, constraint: Constraint) -> Self {
        Self {
            id,
            constraint,
        }
    }
}

/// A dependency edge with its source attached: which selected atom
/// imposes which constraint on which project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub depender: ProjectAtom,
    pub dep: ProjectDep,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::NamedVersion;

    #[test]
    fn test_net_name_defaults_to_local() {
        let plain = ProjectIdentifier::plain("foo");
        assert_eq!(plain.net_name(), "foo");

        let netted = ProjectIdentifier::with_network("foo", "example.com/x/foo");
        assert_eq!(netted.net_name(), "example.com/x/foo");
    }

    #[test]
    fn test_empty_atom_is_recognizable() {
        assert!(ProjectAtom::empty().is_empty());

        let real = ProjectAtom::new(
            ProjectIdentifier::plain("foo"),
            Version::Named(NamedVersion::semver("1.0.0").unwrap()),
        );
        assert!(!real.is_empty());

        let empty_name = ProjectAtom::new(
            ProjectIdentifier::plain(""),
            Version::Named(NamedVersion::branch("main")),
        );
        assert!(!empty_name.is_empty());
    }
}
