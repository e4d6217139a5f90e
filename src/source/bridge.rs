//! Per-solve bridge over a [`SourceManager`].
//!
//! The bridge has three jobs:
//!
//! 1. **Caching**: each project's version list is fetched once per solve,
//!    sorted in the direction the solve walks candidates, and kept for
//!    the run. Fetch errors are *not* cached, so a transient failure does
//!    not poison later attempts.
//! 2. **Identity projection**: the solver deals in
//!    [`ProjectIdentifier`]s (a local name plus an optional network
//!    name); the source manager deals in network-unique
//!    [`ProjectName`]s. [`SourceBridge::key`] performs the projection.
//! 3. **Authoritative constraint algebra**: the basic operations on
//!    [`Constraint`] are purely syntactic, so a bare revision and the
//!    semver tag that points at it look unrelated. The authoritative
//!    `matches` / `matches_any` / `intersect` here re-evaluate
//!    inconclusive answers after *pairing* incomplete versions against
//!    the project's version list, making the answer positive whenever
//!    any evidence supports a match.

use std::collections::HashMap;

use crate::core::SourceError;
use crate::solver::{ProjectAtom, ProjectIdentifier, ProjectName};
use crate::source::{ProjectInfo, SourceManager};
use crate::version::{
    sort_for_downgrade, sort_for_upgrade, Constraint, NamedVersion, Revision, Version,
};

/// A solve-scoped adapter around a [`SourceManager`].
///
/// Born empty at solver start, grows monotonically, and is discarded
/// with the solve. Construct one per run via [`SourceBridge::new`].
pub struct SourceBridge<S> {
    sm: S,

    /// Sort direction for cached version lists: `false` sorts for
    /// upgrades (descending semver), `true` for downgrades.
    sort_down: bool,

    /// Version lists keyed by network name, sorted for this run.
    vlists: HashMap<ProjectName, Vec<Version>>,
}

impl<S: SourceManager> SourceBridge<S> {
    pub fn new(sm: S, sort_down: bool) -> Self {
        Self {
            sm,
            sort_down,
            vlists: HashMap::new(),
        }
    }

    /// The network name a project identifier resolves to: the explicit
    /// network name when set, the local name otherwise.
    #[must_use]
    pub fn key(&self, id: &ProjectIdentifier) -> ProjectName {
        ProjectName::new(id.net_name())
    }

    /// Fetch the metadata an atom's version declares.
    pub fn project_info(&mut self, pa: &ProjectAtom) -> Result<ProjectInfo, SourceError> {
        let k = self.key(&pa.id);
        self.sm.project_info(&k, &pa.version)
    }

    /// The project's version list, sorted in this run's direction.
    ///
    /// Fetched and sorted on first request, cached afterwards. Errors
    /// are returned to the caller and leave the cache untouched.
    pub fn list_versions(&mut self, id: &ProjectIdentifier) -> Result<Vec<Version>, SourceError> {
        let k = self.key(id);

        if let Some(vl) = self.vlists.get(&k) {
            return Ok(vl.clone());
        }

        let mut vl = self.sm.list_versions(&k)?;
        if self.sort_down {
            sort_for_downgrade(&mut vl);
        } else {
            sort_for_upgrade(&mut vl);
        }

        self.vlists.insert(k, vl.clone());
        Ok(vl)
    }

    pub fn repo_exists(&mut self, id: &ProjectIdentifier) -> Result<bool, SourceError> {
        let k = self.key(id);
        self.sm.repo_exists(&k)
    }

    pub fn vendor_code_exists(&mut self, id: &ProjectIdentifier) -> Result<bool, SourceError> {
        let k = self.key(id);
        self.sm.vendor_code_exists(&k)
    }

    /// Resolve an unpaired ref to the paired version it corresponds to,
    /// if the project's version list carries one.
    ///
    /// Returns the first match in the already-sorted list, so the
    /// tie-break between aliased refs is deterministic and follows the
    /// run's sort direction. List errors read as "no pairing found".
    #[must_use]
    pub fn pair_version(&mut self, id: &ProjectIdentifier, v: &NamedVersion) -> Option<Version> {
        let vl = self.list_versions(id).ok()?;

        vl.into_iter()
            .find(|v2| matches!(v2, Version::Paired(n, _) if n == v))
    }

    /// Every identity the revision is known under: the bare revision
    /// itself plus each paired version whose underlying revision is `r`.
    #[must_use]
    pub fn pair_revision(&mut self, id: &ProjectIdentifier, r: &Revision) -> Vec<Version> {
        let mut out = vec![Version::Revision(r.clone())];

        if let Ok(vl) = self.list_versions(id) {
            out.extend(
                vl.into_iter()
                    .filter(|v2| matches!(v2, Version::Paired(_, pr) if pr == r)),
            );
        }

        out
    }

    /// Authoritative match between a constraint and a version.
    ///
    /// Starts from the basic check. When that fails and either operand
    /// is incomplete, gathers the missing identity information through
    /// pairing and re-evaluates; combinations where the basic answer was
    /// already final stay negative.
    pub fn matches(&mut self, id: &ProjectIdentifier, c: &Constraint, v: &Version) -> bool {
        if c.matches(v) {
            return true;
        }

        match v {
            Version::Paired(_, r) => match c {
                // The basic check was already authoritative for these.
                Constraint::None
                | Constraint::Union(_)
                | Constraint::Version(Version::Paired(..))
                | Constraint::Version(Version::Revision(_)) => false,
                // A pair and an unpaired ref can only match by sharing
                // an underlying revision.
                Constraint::Version(Version::Named(n)) => {
                    self.pair_version(id, n).is_some_and(|pc| pc.matches(v))
                }
                // A range can never match the pair's revision directly,
                // but another name for the same revision might be in
                // range.
                Constraint::Range(_) => {
                    let rescued = self.pair_revision(id, r).iter().any(|pv| c.matches(pv));
                    if rescued {
                        tracing::debug!(name = %id, version = %v, constraint = %c, "pairing rescued a range match");
                    }
                    rescued
                }
                Constraint::Any => unreachable!("any-constraint matches are always authoritative"),
            },

            Version::Revision(r) => match c {
                Constraint::None
                | Constraint::Union(_)
                | Constraint::Version(Version::Paired(..))
                | Constraint::Version(Version::Revision(_)) => false,
                Constraint::Version(Version::Named(n)) => {
                    self.pair_version(id, n).is_some_and(|pc| pc.matches(v))
                }
                Constraint::Range(_) => {
                    let rescued = self.pair_revision(id, r).iter().any(|pv| c.matches(pv));
                    if rescued {
                        tracing::debug!(name = %id, version = %v, constraint = %c, "pairing rescued a range match");
                    }
                    rescued
                }
                Constraint::Any => unreachable!("any-constraint matches are always authoritative"),
            },

            Version::Named(n) => match c {
                Constraint::None | Constraint::Union(_) => false,
                // Pair the version and compare against the concrete
                // constraint.
                Constraint::Version(Version::Revision(_))
                | Constraint::Version(Version::Paired(..)) => {
                    self.pair_version(id, n).is_some_and(|pv| c.matches(&pv))
                }
                // Two unpaired refs match only if they pair to the same
                // underlying revision.
                Constraint::Version(Version::Named(cn)) => {
                    let Some(pv) = self.pair_version(id, n) else {
                        return false;
                    };
                    let Some(pc) = self.pair_version(id, cn) else {
                        return false;
                    };
                    pc.matches(&pv)
                }
                // Pair the version, then check every identity of its
                // revision against the range.
                Constraint::Range(_) => {
                    let Some(pv) = self.pair_version(id, n) else {
                        return false;
                    };
                    let Some(r) = pv.underlying().cloned() else {
                        unreachable!("pair_version returns complete versions");
                    };
                    self.pair_revision(id, &r).iter().any(|alias| c.matches(alias))
                }
                Constraint::Any => unreachable!("any-constraint matches are always authoritative"),
            },
        }
    }

    /// Authoritative form of [`Constraint::matches_any`].
    pub fn matches_any(&mut self, id: &ProjectIdentifier, c1: &Constraint, c2: &Constraint) -> bool {
        if c1.matches_any(c2) {
            return true;
        }

        // Expanding both operands up front is slightly wasteful, but far
        // easier to follow than a second decision table.
        let u1 = self.expand(id, c1);
        let u2 = self.expand(id, c2);
        u1.matches_any(&u2)
    }

    /// Authoritative form of [`Constraint::intersect`].
    pub fn intersect(
        &mut self,
        id: &ProjectIdentifier,
        c1: &Constraint,
        c2: &Constraint,
    ) -> Constraint {
        let rc = c1.intersect(c2);
        if !matches!(rc, Constraint::None) {
            return rc;
        }

        let u1 = self.expand(id, c1);
        let u2 = self.expand(id, c2);
        u1.intersect(&u2)
    }

    /// Replace a bare-version constraint with the union of every
    /// identity its underlying revision is known under.
    fn expand(&mut self, id: &ProjectIdentifier, c: &Constraint) -> Constraint {
        match c {
            Constraint::Version(v) => self.vtype_union(id, v),
            other => other.clone(),
        }
    }

    fn vtype_union(&mut self, id: &ProjectIdentifier, v: &Version) -> Constraint {
        match v {
            Version::Revision(r) | Version::Paired(_, r) => {
                Constraint::union_of(self.pair_revision(id, r))
            }
            Version::Named(n) => {
                match self.pair_version(id, n) {
                    Some(pv) => {
                        let Some(r) = pv.underlying().cloned() else {
                            unreachable!("pair_version returns complete versions");
                        };
                        Constraint::union_of(self.pair_revision(id, &r))
                    }
                    // Nothing to pair against; the union is the ref
                    // alone.
                    None => Constraint::union_of([v.clone()]),
                }
            }
        }
    }
}
