//! Version value types and parsing for the resolver core.
//!
//! Every version the resolver reasons about is one of three shapes:
//!
//! - A bare [`Revision`]: an opaque source-control commit id. Fully
//!   concrete, semantically opaque.
//! - A [`NamedVersion`]: a branch, a plain (non-semver) tag, or a parsed
//!   semantic version. Named versions are *unpaired* - the revision they
//!   currently point at is unknown until a source manager is consulted.
//! - A paired version: a named ref bound to the revision it resolves to.
//!   Paired versions are complete; they are what a lockfile records.
//!
//! The pairing distinction is load-bearing: two inputs that look unrelated
//! (a bare revision and a semver tag, say) may be alternate identities of
//! the same underlying commit. The basic matching here is purely
//! syntactic; [`crate::source::SourceBridge`] layers the authoritative
//! operations that consult a source manager to reconcile such cases.
//!
//! # Examples
//!
//! ```rust
//! use depsolve::version::{NamedVersion, Revision, Version};
//!
//! let rev = Revision::new("d0c0ffee");
//! let tag = NamedVersion::semver("1.2.3").unwrap();
//! let paired = tag.clone().pair(rev.clone());
//!
//! // A pair matches both of its halves.
//! assert!(paired.matches(&Version::Revision(rev)));
//! assert!(paired.matches(&Version::Named(tag)));
//! ```

pub mod comparison;
pub mod constraints;

pub use comparison::{compare_version_type, sort_for_downgrade, sort_for_upgrade};
pub use constraints::Constraint;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use semver::VersionReq;
use serde::{Deserialize, Serialize};

/// An opaque source-control revision (a commit id).
///
/// Revisions compare and hash by their string form. They carry no
/// semantic ordering beyond lexicographic, which the sorter uses only to
/// keep output deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(String);

impl Revision {
    pub fn new(r: impl Into<String>) -> Self {
        Self(r.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An unpaired named ref: a branch, a plain tag, or a semantic version.
///
/// The named half of a paired [`Version`] is always a `NamedVersion`, so
/// "a pair's name is never itself a revision or another pair" holds at
/// the type level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamedVersion {
    /// A branch name (e.g. `main`, `feature/auth`).
    Branch(String),

    /// A tag that does not parse as a semantic version (e.g.
    /// `release-2023-01`).
    Tag(String),

    /// A parsed semantic version tag.
    Semver(semver::Version),
}

impl NamedVersion {
    pub fn branch(name: impl Into<String>) -> Self {
        Self::Branch(name.into())
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Self::Tag(name.into())
    }

    /// Parse a semantic version ref, tolerating a leading `v`.
    pub fn semver(s: &str) -> Result<Self, semver::Error> {
        let cleaned = s.strip_prefix('v').unwrap_or(s);
        Ok(Self::Semver(semver::Version::parse(cleaned)?))
    }

    /// Bind this ref to the revision it currently resolves to.
    #[must_use]
    pub fn pair(self, r: Revision) -> Version {
        Version::Paired(self, r)
    }

    /// Whether a concrete version is this ref or a pair carrying it.
    #[must_use]
    pub fn matches(&self, v: &Version) -> bool {
        match v {
            Version::Named(n) | Version::Paired(n, _) => n == self,
            Version::Revision(_) => false,
        }
    }
}

impl fmt::Display for NamedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch(s) | Self::Tag(s) => write!(f, "{s}"),
            Self::Semver(sv) => write!(f, "{sv}"),
        }
    }
}

/// A version as the solver sees it.
///
/// `Revision` and `Paired` are complete (they identify a concrete
/// commit); `Named` is incomplete until paired against a source manager's
/// version list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Version {
    /// A bare commit id.
    Revision(Revision),

    /// An unpaired named ref.
    Named(NamedVersion),

    /// A named ref bound to its underlying revision.
    Paired(NamedVersion, Revision),
}

impl Version {
    /// Guess the shape of a ref string: a parseable semantic version
    /// becomes [`NamedVersion::Semver`], anything else a plain tag.
    ///
    /// Callers that know the ref kind (a source manager listing branches,
    /// say) should construct the variant directly; this guess cannot tell
    /// a branch from a tag.
    #[must_use]
    pub fn from_ref(s: &str) -> Self {
        match NamedVersion::semver(s) {
            Ok(sv) => Self::Named(sv),
            Err(_) => Self::Named(NamedVersion::tag(s)),
        }
    }

    /// The underlying revision, for the complete variants.
    #[must_use]
    pub fn underlying(&self) -> Option<&Revision> {
        match self {
            Self::Revision(r) | Self::Paired(_, r) => Some(r),
            Self::Named(_) => None,
        }
    }

    /// Whether this version is complete (identifies a concrete commit).
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !matches!(self, Self::Named(_))
    }

    /// Point matching between versions.
    ///
    /// A pair `(n, r)` matches the bare revision `r`, the bare ref `n`,
    /// and any pair sharing the underlying revision `r`. Bare revisions
    /// and bare refs match their own equal form or any pair carrying
    /// them. Two *unpaired* names never match each other here even if
    /// they refer to the same commit; that reconciliation is the
    /// [`crate::source::SourceBridge`]'s job.
    #[must_use]
    pub fn matches(&self, other: &Version) -> bool {
        match self {
            Self::Revision(r) => match other {
                Self::Revision(o) | Self::Paired(_, o) => r == o,
                Self::Named(_) => false,
            },
            Self::Named(n) => n.matches(other),
            Self::Paired(n, r) => match other {
                Self::Revision(o) | Self::Paired(_, o) => r == o,
                Self::Named(o) => n == o,
            },
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Revision(r) => write!(f, "{r}"),
            Self::Named(n) => write!(f, "{n}"),
            Self::Paired(n, r) => write!(f, "{n}@{r}"),
        }
    }
}

/// Parse a version requirement string, normalizing `v` prefixes.
///
/// Handles both prefixed (`^v1.0.0`, `>=v2.1.0`) and unprefixed
/// (`^1.0.0`) requirement strings. The `v` is stripped only at the start
/// or directly after an operator, so prerelease tags like `1.0.0-dev.1`
/// survive intact.
pub fn parse_version_req(requirement: &str) -> Result<VersionReq, semver::Error> {
    static RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(^|[~^=><])v").unwrap());

    let normalized = RE.replace_all(requirement, "$1");
    VersionReq::parse(&normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sv(s: &str) -> NamedVersion {
        NamedVersion::semver(s).unwrap()
    }

    #[test]
    fn test_pair_matches_both_halves() {
        let pair = sv("1.2.3").pair(Revision::new("abc123"));

        assert!(pair.matches(&Version::Revision(Revision::new("abc123"))));
        assert!(pair.matches(&Version::Named(sv("1.2.3"))));
        assert!(pair.matches(&sv("1.2.3").pair(Revision::new("abc123"))));

        assert!(!pair.matches(&Version::Revision(Revision::new("def456"))));
        assert!(!pair.matches(&Version::Named(sv("1.2.4"))));
    }

    #[test]
    fn test_pairs_match_by_underlying_revision() {
        // Two names for one commit are the same concrete selection.
        let tag = sv("1.2.3").pair(Revision::new("abc123"));
        let branch = NamedVersion::branch("main").pair(Revision::new("abc123"));
        assert!(tag.matches(&branch));
        assert!(branch.matches(&tag));

        let elsewhere = NamedVersion::branch("main").pair(Revision::new("def456"));
        assert!(!tag.matches(&elsewhere));
    }

    #[test]
    fn test_bare_forms_match_pairs_carrying_them() {
        let pair = NamedVersion::branch("main").pair(Revision::new("abc123"));

        assert!(Version::Revision(Revision::new("abc123")).matches(&pair));
        assert!(Version::Named(NamedVersion::branch("main")).matches(&pair));
        assert!(!Version::Named(NamedVersion::tag("main")).matches(&pair));
    }

    #[test]
    fn test_revision_never_matches_named() {
        let rev = Version::Revision(Revision::new("abc123"));
        assert!(!rev.matches(&Version::Named(NamedVersion::tag("abc123"))));
        assert!(!Version::Named(NamedVersion::tag("abc123")).matches(&rev));
    }

    #[test]
    fn test_from_ref_guesses_shape() {
        assert_eq!(Version::from_ref("1.2.3"), Version::Named(sv("1.2.3")));
        assert_eq!(Version::from_ref("v1.2.3"), Version::Named(sv("1.2.3")));
        assert_eq!(
            Version::from_ref("release-2023"),
            Version::Named(NamedVersion::tag("release-2023"))
        );
    }

    #[test]
    fn test_parse_version_req_normalizes_v_prefix() {
        assert!(parse_version_req("^v1.0.0").is_ok());
        assert!(parse_version_req(">=v1.0.0, <v2.0.0").is_ok());
        assert!(parse_version_req("~2.1.0").is_ok());

        let req = parse_version_req("^v1.0.0").unwrap();
        assert!(req.matches(&semver::Version::new(1, 5, 0)));
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(Version::Revision(Revision::new("abc")).to_string(), "abc");
        assert_eq!(Version::Named(sv("1.0.0")).to_string(), "1.0.0");
        assert_eq!(sv("1.0.0").pair(Revision::new("abc")).to_string(), "1.0.0@abc");
    }
}
