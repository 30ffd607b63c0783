//! The build-scope matrix: every project path × build path combination,
//! plus any hand-built extras, with deterministic enumeration order.

use std::collections::{BTreeSet, HashMap, HashSet};

use mallet_util::errors::{MalletError, MalletResult};
use tracing::debug;

use crate::path::{BuildPath, ProjectPath};
use crate::query::BuildScopeQuery;
use crate::scope::BuildScope;

/// The full set of build scopes for one profile.
///
/// Built once, immutable thereafter. Scopes are stored in enumeration order;
/// the id index only ever points into that storage.
#[derive(Debug, Clone)]
pub struct BuildScopeMatrix {
    scopes: Vec<BuildScope>,
    index: HashMap<String, usize>,
    project_paths: BTreeSet<ProjectPath>,
    build_paths: BTreeSet<BuildPath>,
}

impl BuildScopeMatrix {
    /// Generate the matrix and append `extras` verbatim.
    ///
    /// For each build path in ascending `order`, project paths are iterated
    /// in ascending `order` (or `reverse_order` when the build path is
    /// reverse); each pair becomes one scope with a global order counter
    /// 1, 2, 3, … in that sequence. Extras keep the order they carry.
    ///
    /// Fails if either input collection is empty.
    pub fn new(
        project_paths: Vec<ProjectPath>,
        build_paths: Vec<BuildPath>,
        extras: Vec<BuildScope>,
    ) -> MalletResult<Self> {
        if project_paths.is_empty() {
            return Err(MalletError::ScopeConfig {
                message: "project path universe is empty".to_string(),
            }
            .into());
        }
        if build_paths.is_empty() {
            return Err(MalletError::ScopeConfig {
                message: "build path universe is empty".to_string(),
            }
            .into());
        }

        let mut sorted_build_paths = build_paths;
        sorted_build_paths.sort_by_key(|b| b.order);

        let mut scopes = Vec::new();
        let mut counter = 0u32;
        for build_path in &sorted_build_paths {
            let mut row = project_paths.clone();
            if build_path.reverse {
                row.sort_by_key(|p| p.reverse_order);
            } else {
                row.sort_by_key(|p| p.order);
            }
            for project_path in row {
                counter += 1;
                scopes.push(BuildScope::singleton(
                    project_path,
                    build_path.clone(),
                    counter,
                ));
            }
        }
        scopes.extend(extras);

        let mut index = HashMap::new();
        for (i, scope) in scopes.iter().enumerate() {
            index.insert(scope.id.clone(), i);
        }

        // Aggregate universes are the union over matrix-generated and extra
        // scopes' members.
        let mut all_projects = BTreeSet::new();
        let mut all_builds = BTreeSet::new();
        for scope in &scopes {
            all_projects.extend(scope.project_paths.iter().cloned());
            all_builds.extend(scope.build_paths.iter().cloned());
        }

        debug!(scopes = scopes.len(), "built build-scope matrix");

        Ok(Self {
            scopes,
            index,
            project_paths: all_projects,
            build_paths: all_builds,
        })
    }

    /// Look up a scope by id.
    pub fn get(&self, id: &str) -> Option<&BuildScope> {
        self.index.get(id).map(|&i| &self.scopes[i])
    }

    /// All scopes in enumeration order, extras last.
    pub fn all(&self) -> impl Iterator<Item = &BuildScope> {
        self.scopes.iter()
    }

    /// The union of project paths across every scope.
    pub fn project_paths(&self) -> impl Iterator<Item = &ProjectPath> {
        self.project_paths.iter()
    }

    /// The union of build paths across every scope.
    pub fn build_paths(&self) -> impl Iterator<Item = &BuildPath> {
        self.build_paths.iter()
    }

    /// Resolve a set of queries to the deduplicated union of their results,
    /// in first-seen enumeration order.
    ///
    /// Only `Singleton` can fail; the set-valued modes degrade to empty.
    pub fn query(&self, queries: &[BuildScopeQuery]) -> MalletResult<Vec<&BuildScope>> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut result = Vec::new();
        for query in queries {
            if let Some(id) = query.singleton_id() {
                let scope = self.get(&id).ok_or(MalletError::NoSuchBuildScope { id })?;
                if seen.insert(&scope.id) {
                    result.push(scope);
                }
                continue;
            }
            for scope in &self.scopes {
                if query.matches(scope) && seen.insert(&scope.id) {
                    result.push(scope);
                }
            }
        }
        Ok(result)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}
