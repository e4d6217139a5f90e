//! Test fixtures for the resolver core.
//!
//! [`MockSourceManager`] stands in for a real source manager: projects
//! are registered with in-memory version lists and per-version
//! dependency sets, listing failures can be scripted (and recovered) to
//! exercise the no-error-caching rule, and calls are counted so cache
//! behavior is observable.
//!
//! [`SelectionState`] is an in-memory [`Selection`]: tests commit atoms
//! and dependency edges to it, and every blame mark the checker stamps
//! is recorded for assertion.

use std::collections::{HashMap, HashSet};

use crate::core::SourceError;
use crate::solver::{
    Dependency, ProjectAtom, ProjectDep, ProjectIdentifier, ProjectName, Selection,
};
use crate::source::{ProjectInfo, SourceManager};
use crate::version::{Constraint, Version};

#[derive(Debug, Default)]
struct MockProject {
    versions: Vec<Version>,
    deps: Vec<(Version, Vec<ProjectDep>)>,
}

/// An in-memory [`SourceManager`] with scriptable failures and call
/// counting.
#[derive(Debug, Default)]
pub struct MockSourceManager {
    projects: HashMap<ProjectName, MockProject>,
    failing: HashSet<ProjectName>,
    list_calls: HashMap<ProjectName, usize>,
}

impl MockSourceManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project with its (unordered) version list.
    pub fn add_project(&mut self, name: impl Into<String>, versions: Vec<Version>) {
        let entry = self.projects.entry(ProjectName::new(name)).or_default();
        entry.versions = versions;
    }

    /// Declare the dependencies a project has at a version. Matching at
    /// lookup time goes through [`Version::matches`], so deps recorded
    /// against a paired version are found for either of its halves.
    pub fn set_dependencies(
        &mut self,
        name: impl Into<String>,
        version: Version,
        deps: Vec<ProjectDep>,
    ) {
        let entry = self.projects.entry(ProjectName::new(name)).or_default();
        entry.deps.push((version, deps));
    }

    /// Script every subsequent `list_versions` for the project to fail.
    pub fn fail_listing(&mut self, name: impl Into<String>) {
        self.failing.insert(ProjectName::new(name));
    }

    /// Undo [`Self::fail_listing`].
    pub fn recover_listing(&mut self, name: impl Into<String>) {
        self.failing.remove(&ProjectName::new(name));
    }

    /// How many times `list_versions` was called for the project.
    #[must_use]
    pub fn list_calls(&self, name: &ProjectName) -> usize {
        self.list_calls.get(name).copied().unwrap_or(0)
    }
}

impl SourceManager for MockSourceManager {
    fn project_info(
        &mut self,
        name: &ProjectName,
        version: &Version,
    ) -> Result<ProjectInfo, SourceError> {
        let project = self.projects.get(name).ok_or_else(|| SourceError::ProjectNotFound {
            name: name.clone(),
        })?;

        let dependencies = project
            .deps
            .iter()
            .find(|(v, _)| v.matches(version) || version.matches(v))
            .map(|(_, deps)| deps.clone())
            .unwrap_or_default();

        Ok(ProjectInfo {
            name: name.clone(),
            version: version.clone(),
            dependencies,
        })
    }

    fn list_versions(&mut self, name: &ProjectName) -> Result<Vec<Version>, SourceError> {
        *self.list_calls.entry(name.clone()).or_insert(0) += 1;

        if self.failing.contains(name) {
            return Err(SourceError::Network {
                operation: "list versions".to_string(),
                reason: format!("scripted failure for {name}"),
            });
        }

        self.projects
            .get(name)
            .map(|p| p.versions.clone())
            .ok_or_else(|| SourceError::ProjectNotFound {
                name: name.clone(),
            })
    }

    fn repo_exists(&mut self, name: &ProjectName) -> Result<bool, SourceError> {
        Ok(self.projects.contains_key(name))
    }

    fn vendor_code_exists(&mut self, _name: &ProjectName) -> Result<bool, SourceError> {
        Ok(false)
    }
}

/// An in-memory [`Selection`] recording every blame mark.
#[derive(Debug, Default)]
pub struct SelectionState {
    selected: Vec<ProjectAtom>,
    deps: Vec<Dependency>,
    failed: Vec<ProjectIdentifier>,
}

impl SelectionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit an atom to the selection.
    pub fn select(&mut self, atom: ProjectAtom) {
        self.selected.push(atom);
    }

    /// Record a dependency edge from an already-selected atom.
    pub fn add_dependency(&mut self, depender: ProjectAtom, dep: ProjectDep) {
        self.deps.push(Dependency {
            depender,
            dep,
        });
    }

    /// Every blame mark stamped so far, in order.
    #[must_use]
    pub fn failed(&self) -> &[ProjectIdentifier] {
        &self.failed
    }

    /// How many times a project was blamed.
    #[must_use]
    pub fn fail_count(&self, id: &ProjectIdentifier) -> usize {
        self.failed.iter().filter(|f| f.local_name == id.local_name).count()
    }
}

impl Selection for SelectionState {
    fn selected(&self, id: &ProjectIdentifier) -> Option<ProjectAtom> {
        self.selected.iter().find(|a| a.id.local_name == id.local_name).cloned()
    }

    fn constraint_on(&self, id: &ProjectIdentifier) -> Constraint {
        self.deps
            .iter()
            .filter(|d| d.dep.id.local_name == id.local_name)
            .fold(Constraint::Any, |acc, d| acc.intersect(&d.dep.constraint))
    }

    fn dependencies_on(&self, id: &ProjectIdentifier) -> Vec<Dependency> {
        self.deps
            .iter()
            .filter(|d| d.dep.id.local_name == id.local_name)
            .cloned()
            .collect()
    }

    fn fail(&mut self, id: &ProjectIdentifier) {
        self.failed.push(id.clone());
    }
}
