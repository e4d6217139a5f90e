//! Version ordering for solve-time candidate lists.
//!
//! Ordering is used by the source-manager bridge to sort each project's
//! version list in the direction the current solve walks it (descending
//! semver for upgrades, ascending for downgrades). Matching never
//! consults this ordering.

use std::cmp::Ordering;

use super::{NamedVersion, Version};

/// Total order on version *kinds*: semver tags first, then branches,
/// then plain tags, with bare revisions last. A paired version ranks as
/// its named half.
#[must_use]
pub fn compare_version_type(a: &Version, b: &Version) -> Ordering {
    type_rank(a).cmp(&type_rank(b))
}

fn type_rank(v: &Version) -> u8 {
    match v {
        Version::Named(n) | Version::Paired(n, _) => match n {
            NamedVersion::Semver(_) => 0,
            NamedVersion::Branch(_) => 1,
            NamedVersion::Tag(_) => 2,
        },
        Version::Revision(_) => 3,
    }
}

/// Sort for an upgrade solve: preferred candidates first, semver
/// descending.
pub fn sort_for_upgrade(versions: &mut [Version]) {
    versions.sort_by(|a, b| compare_versions(a, b, Direction::Upgrade));
}

/// Sort for a downgrade solve: semver ascending.
pub fn sort_for_downgrade(versions: &mut [Version]) {
    versions.sort_by(|a, b| compare_versions(a, b, Direction::Downgrade));
}

#[derive(Clone, Copy)]
enum Direction {
    Upgrade,
    Downgrade,
}

fn compare_versions(l: &Version, r: &Version, direction: Direction) -> Ordering {
    let by_type = compare_version_type(l, r);
    if by_type != Ordering::Equal {
        return by_type;
    }

    match (named_half(l), named_half(r)) {
        (Some(NamedVersion::Semver(lsv)), Some(NamedVersion::Semver(rsv))) => {
            // Prereleases sort after every full release, in both
            // directions.
            let lpre = !lsv.pre.is_empty();
            let rpre = !rsv.pre.is_empty();
            if lpre != rpre {
                return if lpre {
                    Ordering::Greater
                } else {
                    Ordering::Less
                };
            }
            match direction {
                Direction::Upgrade => rsv.cmp(lsv),
                Direction::Downgrade => lsv.cmp(rsv),
            }
        }
        // Branches, plain tags, and revisions have no version order;
        // alphabetical keeps the list deterministic in both directions.
        _ => string_form(l).cmp(string_form(r)),
    }
}

fn named_half(v: &Version) -> Option<&NamedVersion> {
    match v {
        Version::Named(n) | Version::Paired(n, _) => Some(n),
        Version::Revision(_) => None,
    }
}

fn string_form(v: &Version) -> &str {
    match v {
        Version::Revision(r) => r.as_str(),
        Version::Named(n) | Version::Paired(n, _) => match n {
            NamedVersion::Branch(s) | NamedVersion::Tag(s) => s,
            NamedVersion::Semver(_) => unreachable!("semver buckets are compared numerically"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::Revision;

    fn sem(s: &str) -> Version {
        Version::Named(NamedVersion::semver(s).unwrap())
    }

    fn mixed_list() -> Vec<Version> {
        vec![
            Version::Revision(Revision::new("ffff")),
            sem("1.0.0"),
            Version::Named(NamedVersion::branch("main")),
            sem("2.0.0"),
            Version::Named(NamedVersion::tag("release-a")),
            Version::Named(NamedVersion::branch("develop")),
            sem("1.5.0"),
            Version::Revision(Revision::new("aaaa")),
        ]
    }

    #[test]
    fn test_type_buckets_partition_the_list() {
        let mut vl = mixed_list();
        sort_for_upgrade(&mut vl);

        let ranks: Vec<u8> = vl.iter().map(type_rank).collect();
        let mut sorted_ranks = ranks.clone();
        sorted_ranks.sort_unstable();
        assert_eq!(ranks, sorted_ranks, "buckets interleaved: {vl:?}");
    }

    #[test]
    fn test_upgrade_puts_highest_semver_first() {
        let mut vl = mixed_list();
        sort_for_upgrade(&mut vl);
        assert_eq!(vl[0], sem("2.0.0"));
        assert_eq!(vl[1], sem("1.5.0"));
        assert_eq!(vl[2], sem("1.0.0"));
    }

    #[test]
    fn test_downgrade_reverses_semver_only() {
        let mut up = mixed_list();
        let mut down = mixed_list();
        sort_for_upgrade(&mut up);
        sort_for_downgrade(&mut down);

        assert_eq!(down[0], sem("1.0.0"));
        assert_eq!(down[2], sem("2.0.0"));

        // Branch, tag, and revision buckets stay alphabetical in both
        // directions.
        let tail_up: Vec<_> = up.iter().filter(|v| type_rank(v) != 0).collect();
        let tail_down: Vec<_> = down.iter().filter(|v| type_rank(v) != 0).collect();
        assert_eq!(tail_up, tail_down);
        assert_eq!(
            tail_up.iter().map(|v| v.to_string()).collect::<Vec<_>>(),
            vec!["develop", "main", "release-a", "aaaa", "ffff"]
        );
    }

    #[test]
    fn test_prereleases_sort_after_all_releases() {
        let mut vl = vec![sem("2.1.0-alpha.1"), sem("1.0.0"), sem("3.0.0-rc.1"), sem("2.0.0")];
        sort_for_upgrade(&mut vl);
        assert_eq!(vl, vec![sem("2.0.0"), sem("1.0.0"), sem("3.0.0-rc.1"), sem("2.1.0-alpha.1")]);

        let mut vl = vec![sem("2.1.0-alpha.1"), sem("1.0.0"), sem("3.0.0-rc.1"), sem("2.0.0")];
        sort_for_downgrade(&mut vl);
        assert_eq!(vl, vec![sem("1.0.0"), sem("2.0.0"), sem("2.1.0-alpha.1"), sem("3.0.0-rc.1")]);
    }

    #[test]
    fn test_paired_sorts_as_its_named_half() {
        let paired = NamedVersion::semver("1.5.0").unwrap().pair(Revision::new("abc123"));
        let mut vl = vec![sem("1.0.0"), paired.clone(), sem("2.0.0")];
        sort_for_upgrade(&mut vl);
        assert_eq!(vl, vec![sem("2.0.0"), paired, sem("1.0.0")]);
    }

    #[test]
    fn test_sort_is_deterministic() {
        let mut a = mixed_list();
        let mut b = mixed_list();
        sort_for_upgrade(&mut a);
        sort_for_upgrade(&mut b);
        assert_eq!(a, b);
    }
}
