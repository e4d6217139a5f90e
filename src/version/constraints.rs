//! Version constraint algebra for the resolver core.
//!
//! A [`Constraint`] is a predicate over [`Version`]s. Constraints form a
//! lattice: [`Constraint::Any`] is the top, [`Constraint::None`] the
//! bottom, and [`Constraint::intersect`] the meet. The solver accumulates
//! constraints on a project by intersecting every requirement imposed on
//! it; a selection stays viable only while that intersection is not
//! `None`.
//!
//! # Constraint kinds
//!
//! - **`Any` / `None`** - top and bottom of the lattice.
//! - **`Range`** - a semver requirement (`^1.0.0`, `>=1.0.0, <2.0.0`).
//!   Matches only semantic versions (paired or not); never a branch, tag,
//!   or bare revision.
//! - **`Version`** - a single-point constraint: any version value used as
//!   a requirement. A paired point matches either of its halves.
//! - **`Union`** - a disjunction of versions that are alternate
//!   identities of one underlying commit. Unions are synthesized by the
//!   source-manager bridge during authoritative operations and are never
//!   persisted in a selection.
//!
//! # Laws
//!
//! The operations here are purely syntactic and obey:
//!
//! - `matches_any(a, b)` is symmetric, and holds exactly when
//!   `intersect(a, b)` is not `None`.
//! - `intersect` is commutative, idempotent, and returns the more
//!   specific operand when one subsumes the other.
//!
//! Syntactic answers can be incomplete: a bare revision and a semver
//! range never match here even if the revision *is* that release. The
//! authoritative forms on [`crate::source::SourceBridge`] exist to close
//! exactly that gap.
//!
//! # Examples
//!
//! ```rust
//! use depsolve::version::{Constraint, Version};
//!
//! let range = Constraint::parse("^1.0.0")?;
//! assert!(range.matches(&Version::from_ref("1.5.0")));
//! assert!(!range.matches(&Version::from_ref("2.0.0")));
//!
//! let narrower = Constraint::parse("~1.2.0")?;
//! let met = range.intersect(&narrower);
//! assert!(met.matches(&Version::from_ref("1.2.9")));
//! assert!(!met.matches(&Version::from_ref("1.3.0")));
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fmt;

use semver::{Comparator, Prerelease, VersionReq};

use super::{parse_version_req, NamedVersion, Version};

/// A predicate over versions.
///
/// See the [module docs](self) for the lattice laws and the split
/// between syntactic and authoritative evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Matches every version.
    Any,

    /// Matches no version.
    None,

    /// A semver requirement; matches semantic versions in range.
    Range(VersionReq),

    /// A single-point constraint.
    Version(Version),

    /// Alternate identities of one underlying commit. Internal to
    /// authoritative evaluation; satisfied by any member.
    Union(Vec<Version>),
}

impl Constraint {
    /// Parse a constraint string.
    ///
    /// The guessing order mirrors how requirement strings appear in
    /// manifests:
    ///
    /// 1. `*` - any version.
    /// 2. A bare semantic version (`1.0.0`, `v1.0.0`) - an exact point.
    /// 3. Requirement syntax (`^1.0.0`, `~v1.2.0`, `>=1.0.0, <2.0.0`) -
    ///    a range.
    /// 4. Anything else - a named-ref point constraint (branch or tag;
    ///    the guess cannot tell which, so it reads as a tag).
    ///
    /// Only malformed requirement syntax fails; ref constraints always
    /// parse.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use depsolve::version::Constraint;
    ///
    /// assert!(matches!(Constraint::parse("*")?, Constraint::Any));
    /// assert!(matches!(Constraint::parse("1.0.0")?, Constraint::Version(_)));
    /// assert!(matches!(Constraint::parse("^v1.0.0")?, Constraint::Range(_)));
    /// assert!(matches!(Constraint::parse("main")?, Constraint::Version(_)));
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        let trimmed = s.trim();

        if trimmed == "*" {
            return Ok(Self::Any);
        }

        let has_operator = trimmed.starts_with('^')
            || trimmed.starts_with('~')
            || trimmed.starts_with('=')
            || trimmed.starts_with('>')
            || trimmed.starts_with('<');

        if !has_operator {
            let cleaned = trimmed.strip_prefix('v').unwrap_or(trimmed);
            if let Ok(sv) = semver::Version::parse(cleaned) {
                return Ok(Self::Version(Version::Named(NamedVersion::Semver(sv))));
            }
        }

        match parse_version_req(trimmed) {
            Ok(req) => Ok(Self::Range(req)),
            Err(e) if has_operator => {
                Err(anyhow::anyhow!("invalid semver requirement '{trimmed}': {e}"))
            }
            Err(_) => Ok(Self::Version(Version::Named(NamedVersion::tag(trimmed)))),
        }
    }

    /// Build the union of alternate version identities.
    ///
    /// Collapses the degenerate shapes: no members is `None`, one member
    /// is that point.
    #[must_use]
    pub fn union_of(versions: impl IntoIterator<Item = Version>) -> Self {
        let mut members: Vec<Version> = versions.into_iter().collect();
        match members.len() {
            0 => Self::None,
            1 => Self::Version(members.remove(0)),
            _ => Self::Union(members),
        }
    }

    /// Whether a version satisfies this constraint.
    #[must_use]
    pub fn matches(&self, v: &Version) -> bool {
        match self {
            Self::Any => true,
            Self::None => false,
            Self::Range(req) => range_matches(req, v),
            Self::Version(cv) => cv.matches(v),
            Self::Union(members) => members.iter().any(|m| m.matches(v)),
        }
    }

    /// Whether this constraint and another admit at least one common
    /// version - true exactly when [`Self::intersect`] is not `None`.
    #[must_use]
    pub fn matches_any(&self, other: &Constraint) -> bool {
        !matches!(self.intersect(other), Self::None)
    }

    /// The meet of two constraints.
    ///
    /// Returns the more specific operand when one subsumes the other
    /// (a pair is more specific than either of its halves), the combined
    /// range for two overlapping ranges, and `None` when the operands
    /// are disjoint.
    #[must_use]
    pub fn intersect(&self, other: &Constraint) -> Constraint {
        match (self, other) {
            (Self::None, _) | (_, Self::None) => Self::None,
            (Self::Any, c) | (c, Self::Any) => c.clone(),
            (Self::Union(members), c) | (c, Self::Union(members)) => members
                .iter()
                .map(|m| Self::Version(m.clone()).intersect(c))
                .find(|rc| !matches!(rc, Self::None))
                .unwrap_or(Self::None),
            (Self::Range(a), Self::Range(b)) => intersect_ranges(a, b),
            (Self::Range(req), Self::Version(v)) | (Self::Version(v), Self::Range(req)) => {
                if range_matches(req, v) {
                    Self::Version(v.clone())
                } else {
                    Self::None
                }
            }
            (Self::Version(a), Self::Version(b)) => {
                if !(a.matches(b) || b.matches(a)) {
                    return Self::None;
                }
                match (a, b) {
                    // Two pairs agreeing on the revision: the revision
                    // is their common ground unless the names agree
                    // too.
                    (Version::Paired(an, ar), Version::Paired(bn, _)) => {
                        if an == bn {
                            Self::Version(a.clone())
                        } else {
                            Self::Version(Version::Revision(ar.clone()))
                        }
                    }
                    // Otherwise prefer the complete operand.
                    (_, Version::Paired(..)) => Self::Version(b.clone()),
                    _ => Self::Version(a.clone()),
                }
            }
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "*"),
            Self::None => write!(f, "none"),
            Self::Range(req) => write!(f, "{req}"),
            Self::Version(v) => write!(f, "{v}"),
            Self::Union(members) => {
                // Unions are transient; render the identity they stand for.
                match members.first() {
                    Some(v) => write!(f, "{v}"),
                    Option::None => write!(f, "none"),
                }
            }
        }
    }
}

impl From<Version> for Constraint {
    fn from(v: Version) -> Self {
        Self::Version(v)
    }
}

/// A range constrains only semantic versions, paired or not.
fn range_matches(req: &VersionReq, v: &Version) -> bool {
    match v {
        Version::Named(NamedVersion::Semver(sv)) | Version::Paired(NamedVersion::Semver(sv), _) => {
            req.matches(sv)
        }
        _ => false,
    }
}

/// Meet of two semver requirements.
///
/// A `VersionReq` is a conjunction of comparators, so the meet is the
/// concatenated comparator list; the only work is deciding whether that
/// conjunction is satisfiable at all.
fn intersect_ranges(a: &VersionReq, b: &VersionReq) -> Constraint {
    if a == b {
        return Constraint::Range(a.clone());
    }

    let mut comparators = a.comparators.clone();
    comparators.extend(b.comparators.iter().cloned());
    let merged = VersionReq {
        comparators,
    };

    if range_is_empty(&merged) {
        Constraint::None
    } else {
        Constraint::Range(merged)
    }
}

/// Decide whether a comparator conjunction admits any version.
///
/// The satisfying set of each comparator is an interval whose endpoints
/// come from the comparator's own version, so a nonempty conjunction must
/// contain a boundary candidate: some comparator's version, its
/// prerelease successor, or one of its release bumps (the successor of a
/// release triple under semver's default prerelease exclusion is
/// `patch+1`). Probing those candidates is therefore an exact emptiness
/// test for the operator set `semver` supports.
fn range_is_empty(req: &VersionReq) -> bool {
    !boundary_candidates(req).iter().any(|v| req.matches(v))
}

fn boundary_candidates(req: &VersionReq) -> Vec<semver::Version> {
    // Seeds cover requirements with no comparators at all (`*`).
    let mut out = vec![semver::Version::new(0, 0, 0), semver::Version::new(1, 0, 0)];

    for c in &req.comparators {
        out.extend(comparator_candidates(c));
    }

    out
}

fn comparator_candidates(c: &Comparator) -> Vec<semver::Version> {
    let major = c.major;
    let minor = c.minor.unwrap_or(0);
    let patch = c.patch.unwrap_or(0);

    let mut out = Vec::with_capacity(6);

    if !c.pre.is_empty() {
        let mut exact = semver::Version::new(major, minor, patch);
        exact.pre = c.pre.clone();
        // The smallest prerelease strictly after the comparator's own.
        if let Ok(next) = Prerelease::new(&format!("{}.0", c.pre.as_str())) {
            let mut bumped = semver::Version::new(major, minor, patch);
            bumped.pre = next;
            out.push(bumped);
        }
        out.push(exact);
    }

    out.push(semver::Version::new(major, minor, patch));
    out.push(semver::Version::new(major, minor, patch + 1));
    out.push(semver::Version::new(major, minor + 1, 0));
    out.push(semver::Version::new(major + 1, 0, 0));

    out
}
