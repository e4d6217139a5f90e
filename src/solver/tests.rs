//! Scenario tests for the satisfiability checker.
//!
//! Each test builds a small solve state out of the in-memory fixtures,
//! probes one candidate atom, and asserts both the structured failure
//! and the blame marks stamped onto the selection.

use crate::solver::{
    NameTable, ProjectAtom, ProjectDep, ProjectIdentifier, ProjectName, SatisfyChecker,
    SolveFailure,
};
use crate::source::SourceBridge;
use crate::test_utils::{MockSourceManager, SelectionState};
use crate::version::{Constraint, NamedVersion, Revision, Version};

fn sem(s: &str) -> Version {
    Version::Named(NamedVersion::semver(s).unwrap())
}

fn atom(name: &str, version: &str) -> ProjectAtom {
    ProjectAtom::new(ProjectIdentifier::plain(name), sem(version))
}

fn dep(name: &str, constraint: &str) -> ProjectDep {
    ProjectDep::new(ProjectIdentifier::plain(name), Constraint::parse(constraint).unwrap())
}

fn check(
    sm: MockSourceManager,
    sel: &mut SelectionState,
    names: &NameTable,
    candidate: &ProjectAtom,
) -> Result<(), SolveFailure> {
    let mut bridge = SourceBridge::new(sm, false);
    SatisfyChecker::new(&mut bridge, sel, names).satisfiable(candidate)
}

#[test]
fn test_straight_accept() {
    let mut sm = MockSourceManager::new();
    sm.add_project("foo", vec![sem("1.2.0")]);
    sm.set_dependencies("foo", sem("1.2.0"), vec![dep("bar", "^1.0")]);

    let mut sel = SelectionState::new();
    let names = NameTable::new();

    let result = check(sm, &mut sel, &names, &atom("foo", "1.2.0"));
    assert!(result.is_ok());
    assert!(sel.failed().is_empty());
}

#[test]
fn test_version_not_allowed_blames_conflicting_parent() {
    // A selected baz constrains foo to ^2.0; the candidate is foo 1.5.0.
    let mut sel = SelectionState::new();
    let baz = atom("baz", "1.0.0");
    sel.select(baz.clone());
    sel.add_dependency(baz.clone(), dep("foo", "^2.0"));

    let names = NameTable::new();
    let result = check(MockSourceManager::new(), &mut sel, &names, &atom("foo", "1.5.0"));

    match result {
        Err(SolveFailure::VersionNotAllowed {
            goal,
            failparent,
            constraint,
        }) => {
            assert_eq!(goal, atom("foo", "1.5.0"));
            assert_eq!(failparent.len(), 1);
            assert_eq!(failparent[0].depender, baz);
            assert_eq!(constraint, Constraint::parse("^2.0").unwrap());
        }
        other => panic!("expected VersionNotAllowed, got {other:?}"),
    }
    assert_eq!(sel.fail_count(&ProjectIdentifier::plain("baz")), 1);
}

#[test]
fn test_version_not_allowed_spares_agreeing_parents() {
    // Two dependers: ^1.0 still matches the candidate, ^1.3 does not.
    // Only the disagreeing parent is blamed.
    let mut sel = SelectionState::new();
    let a = atom("a", "1.0.0");
    let b = atom("b", "1.0.0");
    sel.select(a.clone());
    sel.select(b.clone());
    sel.add_dependency(a.clone(), dep("foo", "^1.0"));
    sel.add_dependency(b.clone(), dep("foo", "^1.3"));

    let names = NameTable::new();
    let result = check(MockSourceManager::new(), &mut sel, &names, &atom("foo", "1.1.0"));

    match result {
        Err(SolveFailure::VersionNotAllowed {
            failparent, ..
        }) => {
            assert_eq!(failparent.len(), 1);
            assert_eq!(failparent[0].depender, b);
        }
        other => panic!("expected VersionNotAllowed, got {other:?}"),
    }
    assert_eq!(sel.fail_count(&ProjectIdentifier::plain("b")), 1);
    assert_eq!(sel.fail_count(&ProjectIdentifier::plain("a")), 0);
}

#[test]
fn test_disjoint_constraint_blames_sibling() {
    // A selected quux wants bar ^1.0; the candidate foo introduces bar
    // ^2.0.
    let mut sm = MockSourceManager::new();
    sm.add_project("foo", vec![sem("1.0.0")]);
    sm.set_dependencies("foo", sem("1.0.0"), vec![dep("bar", "^2.0")]);

    let mut sel = SelectionState::new();
    let quux = atom("quux", "1.0.0");
    sel.select(quux.clone());
    sel.add_dependency(quux.clone(), dep("bar", "^1.0"));

    let names = NameTable::new();
    let result = check(sm, &mut sel, &names, &atom("foo", "1.0.0"));

    match result {
        Err(SolveFailure::DisjointConstraint {
            goal,
            failsib,
            nofailsib,
            constraint,
        }) => {
            assert_eq!(goal.depender, atom("foo", "1.0.0"));
            assert_eq!(goal.dep, dep("bar", "^2.0"));
            assert_eq!(failsib.len(), 1);
            assert_eq!(failsib[0].depender, quux);
            assert!(nofailsib.is_empty());
            assert_eq!(constraint, Constraint::parse("^1.0").unwrap());
        }
        other => panic!("expected DisjointConstraint, got {other:?}"),
    }
    assert_eq!(sel.fail_count(&ProjectIdentifier::plain("quux")), 1);
}

#[test]
fn test_disjoint_constraint_spares_overlapping_sibling() {
    // quux wants bar ^1.0 (disjoint with ^2.0), wibble wants bar
    // >=1.0.0 (overlaps ^2.0): only quux is blamed, wibble rides along
    // in the diagnostic.
    let mut sm = MockSourceManager::new();
    sm.add_project("foo", vec![sem("1.0.0")]);
    sm.set_dependencies("foo", sem("1.0.0"), vec![dep("bar", "^2.0")]);

    let mut sel = SelectionState::new();
    let quux = atom("quux", "1.0.0");
    let wibble = atom("wibble", "1.0.0");
    sel.select(quux.clone());
    sel.select(wibble.clone());
    sel.add_dependency(quux.clone(), dep("bar", "~1.2.0"));
    sel.add_dependency(wibble.clone(), dep("bar", ">=1.0.0"));

    let names = NameTable::new();
    let result = check(sm, &mut sel, &names, &atom("foo", "1.0.0"));

    match result {
        Err(SolveFailure::DisjointConstraint {
            failsib,
            nofailsib,
            ..
        }) => {
            assert_eq!(failsib.len(), 1);
            assert_eq!(failsib[0].depender, quux);
            assert_eq!(nofailsib.len(), 1);
            assert_eq!(nofailsib[0].depender, wibble);
        }
        other => panic!("expected DisjointConstraint, got {other:?}"),
    }
    assert_eq!(sel.fail_count(&ProjectIdentifier::plain("quux")), 1);
    assert_eq!(sel.fail_count(&ProjectIdentifier::plain("wibble")), 0);
}

#[test]
fn test_dep_disallows_selected_version() {
    // bar 1.0.0 is already selected; the candidate foo wants bar ^2.0.
    let mut sm = MockSourceManager::new();
    sm.add_project("foo", vec![sem("1.0.0")]);
    sm.set_dependencies("foo", sem("1.0.0"), vec![dep("bar", "^2.0")]);

    let mut sel = SelectionState::new();
    sel.select(atom("bar", "1.0.0"));

    let names = NameTable::new();
    let result = check(sm, &mut sel, &names, &atom("foo", "1.0.0"));

    match result {
        Err(SolveFailure::ConstraintNotAllowed {
            goal,
            selected,
        }) => {
            assert_eq!(goal.dep, dep("bar", "^2.0"));
            assert_eq!(selected, sem("1.0.0"));
        }
        other => panic!("expected ConstraintNotAllowed, got {other:?}"),
    }
    assert_eq!(sel.fail_count(&ProjectIdentifier::plain("bar")), 1);
}

#[test]
fn test_source_mismatch_fails_every_depender() {
    // The solve already knows bar as github.com/x/bar; the candidate's
    // dependency names github.com/y/bar for the same local name.
    let mut sm = MockSourceManager::new();
    sm.add_project("foo", vec![sem("1.0.0")]);
    sm.set_dependencies(
        "foo",
        sem("1.0.0"),
        vec![ProjectDep::new(
            ProjectIdentifier::with_network("bar", "github.com/y/bar"),
            Constraint::Any,
        )],
    );

    let mut sel = SelectionState::new();
    let baz = atom("baz", "1.0.0");
    sel.select(baz.clone());
    sel.add_dependency(baz.clone(), dep("foo", "^1.0"));

    let mut names = NameTable::new();
    names.insert(ProjectName::new("bar"), "github.com/x/bar".to_string());

    let result = check(sm, &mut sel, &names, &atom("foo", "1.0.0"));

    match result {
        Err(SolveFailure::SourceMismatch {
            shared,
            sel: dependers,
            current,
            mismatch,
            prob,
        }) => {
            assert_eq!(shared, ProjectName::new("bar"));
            assert_eq!(dependers.len(), 1);
            assert_eq!(dependers[0].depender, baz);
            assert_eq!(current, "github.com/x/bar");
            assert_eq!(mismatch, "github.com/y/bar");
            assert_eq!(prob, atom("foo", "1.0.0"));
        }
        other => panic!("expected SourceMismatch, got {other:?}"),
    }
    assert_eq!(sel.fail_count(&ProjectIdentifier::plain("baz")), 1);
}

#[test]
fn test_agreeing_network_name_passes_ident_check() {
    let mut sm = MockSourceManager::new();
    sm.add_project("foo", vec![sem("1.0.0")]);
    sm.set_dependencies(
        "foo",
        sem("1.0.0"),
        vec![ProjectDep::new(
            ProjectIdentifier::with_network("bar", "github.com/x/bar"),
            Constraint::Any,
        )],
    );

    let mut sel = SelectionState::new();
    let mut names = NameTable::new();
    names.insert(ProjectName::new("bar"), "github.com/x/bar".to_string());

    assert!(check(sm, &mut sel, &names, &atom("foo", "1.0.0")).is_ok());
    assert!(sel.failed().is_empty());
}

#[test]
fn test_fetch_errors_pass_through_verbatim() {
    // No project registered: metadata fetch fails, and the error is the
    // infrastructure category, not a logical UNSAT.
    let mut sel = SelectionState::new();
    let names = NameTable::new();

    let result = check(MockSourceManager::new(), &mut sel, &names, &atom("foo", "1.0.0"));
    match result {
        Err(failure @ SolveFailure::Fetch(_)) => assert!(!failure.is_logical()),
        other => panic!("expected Fetch, got {other:?}"),
    }
    assert!(sel.failed().is_empty());
}

#[test]
#[should_panic(expected = "empty project atom")]
fn test_empty_atom_is_a_programming_error() {
    let mut sm = MockSourceManager::new();
    sm.add_project("foo", vec![sem("1.0.0")]);
    let mut bridge = SourceBridge::new(sm, false);
    let mut sel = SelectionState::new();
    let names = NameTable::new();

    let _ = SatisfyChecker::new(&mut bridge, &mut sel, &names).satisfiable(&ProjectAtom::empty());
}

#[test]
fn test_atom_admissibility_precedes_dep_checks() {
    // The candidate both violates its own constraint and introduces a
    // disjoint dependency; the atom-level failure wins.
    let mut sm = MockSourceManager::new();
    sm.add_project("foo", vec![sem("1.5.0")]);
    sm.set_dependencies("foo", sem("1.5.0"), vec![dep("bar", "^2.0")]);

    let mut sel = SelectionState::new();
    let baz = atom("baz", "1.0.0");
    let quux = atom("quux", "1.0.0");
    sel.select(baz.clone());
    sel.select(quux.clone());
    sel.add_dependency(baz, dep("foo", "^2.0"));
    sel.add_dependency(quux, dep("bar", "^1.0"));

    let names = NameTable::new();
    let result = check(sm, &mut sel, &names, &atom("foo", "1.5.0"));
    assert!(matches!(result, Err(SolveFailure::VersionNotAllowed { .. })));
}

#[test]
fn test_ident_check_precedes_constraint_checks() {
    // The dependency both mismatches its known source and is disjoint
    // with a sibling constraint; the identity failure wins, because a
    // source mismatch invalidates any constraint reasoning.
    let mut sm = MockSourceManager::new();
    sm.add_project("foo", vec![sem("1.0.0")]);
    sm.set_dependencies(
        "foo",
        sem("1.0.0"),
        vec![ProjectDep::new(
            ProjectIdentifier::with_network("bar", "github.com/y/bar"),
            Constraint::parse("^2.0").unwrap(),
        )],
    );

    let mut sel = SelectionState::new();
    let quux = atom("quux", "1.0.0");
    sel.select(quux.clone());
    sel.add_dependency(quux, dep("bar", "^1.0"));

    let mut names = NameTable::new();
    names.insert(ProjectName::new("bar"), "github.com/x/bar".to_string());

    let result = check(sm, &mut sel, &names, &atom("foo", "1.0.0"));
    assert!(matches!(result, Err(SolveFailure::SourceMismatch { .. })));
}

#[test]
fn test_revision_dep_rescued_by_pairing_at_the_bridge() {
    // The constraint ^1.0 rejects a bare revision syntactically, but the
    // version list reveals the revision is release 1.2.3.
    let mut sm = MockSourceManager::new();
    sm.add_project(
        "bar",
        vec![NamedVersion::semver("1.2.3").unwrap().pair(Revision::new("abcd"))],
    );

    let mut bridge = SourceBridge::new(sm, false);
    let bar = ProjectIdentifier::plain("bar");
    let range = Constraint::parse("^1.0").unwrap();
    let rev = Version::Revision(Revision::new("abcd"));

    assert!(!range.matches(&rev));
    assert!(bridge.matches(&bar, &range, &rev));
}

#[test]
fn test_every_rejection_leaves_a_blame_mark() {
    // Logical failures either stamp at least one blame mark or are a
    // VersionNotAllowed with no dependers to blame.
    let scenarios: Vec<(MockSourceManager, SelectionState, NameTable)> = vec![
        {
            let mut sel = SelectionState::new();
            let baz = atom("baz", "1.0.0");
            sel.select(baz.clone());
            sel.add_dependency(baz, dep("foo", "^2.0"));
            (MockSourceManager::new(), sel, NameTable::new())
        },
        {
            let mut sm = MockSourceManager::new();
            sm.add_project("foo", vec![sem("1.0.0")]);
            sm.set_dependencies("foo", sem("1.0.0"), vec![dep("bar", "^2.0")]);
            let mut sel = SelectionState::new();
            let quux = atom("quux", "1.0.0");
            sel.select(quux.clone());
            sel.add_dependency(quux, dep("bar", "^1.0"));
            (sm, sel, NameTable::new())
        },
        {
            let mut sm = MockSourceManager::new();
            sm.add_project("foo", vec![sem("1.0.0")]);
            sm.set_dependencies("foo", sem("1.0.0"), vec![dep("bar", "^2.0")]);
            let mut sel = SelectionState::new();
            sel.select(atom("bar", "1.0.0"));
            (sm, sel, NameTable::new())
        },
    ];

    for (sm, mut sel, names) in scenarios {
        let result = check(sm, &mut sel, &names, &atom("foo", "1.0.0"));
        match result {
            Err(SolveFailure::VersionNotAllowed {
                failparent, ..
            }) => {
                assert_eq!(sel.failed().len(), failparent.len());
            }
            Err(f) if f.is_logical() => {
                assert!(!sel.failed().is_empty(), "{f:?} left no blame mark");
            }
            other => panic!("expected a logical failure, got {other:?}"),
        }
    }
}

#[test]
fn test_identical_state_produces_identical_results() {
    let build = || {
        let mut sm = MockSourceManager::new();
        sm.add_project("foo", vec![sem("1.0.0")]);
        sm.set_dependencies("foo", sem("1.0.0"), vec![dep("bar", "^2.0")]);
        let mut sel = SelectionState::new();
        let quux = atom("quux", "1.0.0");
        sel.select(quux.clone());
        sel.add_dependency(quux, dep("bar", "^1.0"));
        (sm, sel)
    };

    let names = NameTable::new();
    let (sm1, mut sel1) = build();
    let (sm2, mut sel2) = build();

    let r1 = check(sm1, &mut sel1, &names, &atom("foo", "1.0.0"));
    let r2 = check(sm2, &mut sel2, &names, &atom("foo", "1.0.0"));

    assert_eq!(r1, r2);
    assert_eq!(sel1.failed(), sel2.failed());
}
