use crate::path::{BuildPath, ProjectPath};
use crate::scope::BuildScope;

/// A typed request against the build-scope matrix.
///
/// The parameter shape each mode requires is encoded in the variant itself,
/// so a malformed query cannot be constructed. `Singleton` is the only
/// variant whose resolution can fail; the set-valued variants degrade to
/// empty results on no match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildScopeQuery {
    /// Every scope in the matrix, extras included.
    All,
    /// Scopes whose project-path set contains the given path.
    ByProjectPath(ProjectPath),
    /// Scopes whose build-path set contains the given path.
    ByBuildPath(BuildPath),
    /// Scopes containing both paths.
    Select(ProjectPath, BuildPath),
    /// The unique matrix cell `project.id-build.id`; an error if absent.
    Singleton(ProjectPath, BuildPath),
}

impl BuildScopeQuery {
    /// Whether `scope` satisfies this query.
    pub fn matches(&self, scope: &BuildScope) -> bool {
        match self {
            Self::All => true,
            Self::ByProjectPath(p) => scope.contains_project_path(p),
            Self::ByBuildPath(b) => scope.contains_build_path(b),
            Self::Select(p, b) => scope.contains_project_path(p) && scope.contains_build_path(b),
            Self::Singleton(p, b) => scope.id == format!("{}-{}", p.id, b.id),
        }
    }

    /// The exact id a `Singleton` query targets, if this is one.
    pub fn singleton_id(&self) -> Option<String> {
        match self {
            Self::Singleton(p, b) => Some(format!("{}-{}", p.id, b.id)),
            _ => None,
        }
    }
}
