use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::{BuildPath, ProjectPath};

/// A named combination of project paths and build paths.
///
/// Matrix-generated scopes pair exactly one [`ProjectPath`] with one
/// [`BuildPath`] and take their id from the pair (`main-compile`). Extra
/// scopes built by hand may span several paths (the legacy combined `test`
/// scope spans both build paths of the test project path).
///
/// `order` is assigned sequentially when the matrix is built and is
/// meaningful only as a sort key. Instances are immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildScope {
    pub id: String,
    pub project_paths: BTreeSet<ProjectPath>,
    pub build_paths: BTreeSet<BuildPath>,
    pub order: u32,
}

impl BuildScope {
    /// A matrix cell: one project path × one build path, id joined with `-`.
    pub fn singleton(project_path: ProjectPath, build_path: BuildPath, order: u32) -> Self {
        let id = format!("{}-{}", project_path.id, build_path.id);
        Self {
            id,
            project_paths: BTreeSet::from([project_path]),
            build_paths: BTreeSet::from([build_path]),
            order,
        }
    }

    /// A hand-built scope spanning arbitrary path sets, keyed by its own id.
    pub fn combined(
        id: impl Into<String>,
        project_paths: impl IntoIterator<Item = ProjectPath>,
        build_paths: impl IntoIterator<Item = BuildPath>,
        order: u32,
    ) -> Self {
        Self {
            id: id.into(),
            project_paths: project_paths.into_iter().collect(),
            build_paths: build_paths.into_iter().collect(),
            order,
        }
    }

    pub fn contains_project_path(&self, path: &ProjectPath) -> bool {
        self.project_paths.contains(path)
    }

    pub fn contains_build_path(&self, path: &BuildPath) -> bool {
        self.build_paths.contains(path)
    }
}

impl fmt::Display for BuildScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
