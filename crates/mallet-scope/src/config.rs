//! Profile composition root: assembles the whole scope catalogue for one
//! build-tool behavioral profile.
//!
//! A [`ScopeProfile`] is declarative data; [`ScopeManager::new`] turns it
//! into an immutable catalogue (matrix built, widths computed, ids indexed,
//! queries validated) that is shared read-only from then on.

use std::collections::{BTreeMap, HashMap};

use mallet_util::errors::{MalletError, MalletResult};
use tracing::debug;

use crate::dependency::{DependencyScope, ResolutionMode, ResolutionScope};
use crate::derive::{DeriveVariant, ScopeDeriver};
use crate::matrix::BuildScopeMatrix;
use crate::path::{BuildPath, ProjectPath};
use crate::query::BuildScopeQuery;
use crate::scope::BuildScope;
use crate::select::ScopeSelector;

/// Width contribution of transitivity; member build scopes add `1000/order`
/// each, so scopes spanning more (and earlier) build contexts come out wider.
const TRANSITIVE_WIDTH_BONUS: u32 = 1000;

/// Declarative description of one behavioral profile: paths, matrix extras,
/// scope catalogues, and compatibility flags.
#[derive(Debug, Clone)]
pub struct ScopeProfile {
    pub id: String,
    pub system_scope_id: Option<String>,
    pub system_scope_transitive: bool,
    /// Historical quirk: runtime resolution that cannot truly remove
    /// subtrees. When set, `Remove` resolution scopes soften to `Eliminate`.
    pub broken_runtime_resolution: bool,
    pub derive_variant: DeriveVariant,
    pub project_paths: Vec<ProjectPath>,
    pub build_paths: Vec<BuildPath>,
    pub extra_scopes: Vec<BuildScope>,
    pub dependency_scopes: Vec<DependencyScope>,
    pub resolution_scopes: Vec<ResolutionScope>,
}

impl ScopeProfile {
    /// The legacy profile: matrix over the main project path only, plus one
    /// combined `test` scope spanning both build paths of the test path.
    /// System scope is transitive here.
    pub fn maven3() -> Self {
        let main = ProjectPath::new("main", 1, 2);
        let test = ProjectPath::new("test", 2, 1);
        let compile = BuildPath::new("compile", 1, false);
        let runtime = BuildPath::new("runtime", 2, true);

        let combined_test = BuildScope::combined(
            "test",
            [test.clone()],
            [compile.clone(), runtime.clone()],
            3,
        );

        let dependency_scopes = vec![
            DependencyScope::new("compile", true, vec![BuildScopeQuery::All]),
            DependencyScope::new(
                "runtime",
                true,
                vec![BuildScopeQuery::ByBuildPath(runtime.clone())],
            ),
            DependencyScope::new(
                "provided",
                false,
                vec![BuildScopeQuery::ByBuildPath(compile.clone())],
            ),
            DependencyScope::new(
                "test",
                false,
                vec![BuildScopeQuery::ByProjectPath(test.clone())],
            ),
            DependencyScope::new(
                "system",
                true,
                vec![BuildScopeQuery::ByBuildPath(compile.clone())],
            ),
        ];

        let resolution_scopes = vec![
            ResolutionScope::new(
                "main-compile",
                ResolutionMode::Eliminate,
                ["runtime".to_string(), "test".to_string()],
                ["system".to_string()],
                vec![BuildScopeQuery::Select(main.clone(), compile.clone())],
            ),
            ResolutionScope::new(
                "main-runtime",
                ResolutionMode::Remove,
                [
                    "provided".to_string(),
                    "test".to_string(),
                    "system".to_string(),
                ],
                [],
                vec![BuildScopeQuery::Select(main.clone(), runtime.clone())],
            ),
            ResolutionScope::new(
                "test-compile",
                ResolutionMode::Eliminate,
                ["runtime".to_string()],
                ["system".to_string()],
                vec![BuildScopeQuery::Select(test.clone(), compile.clone())],
            ),
            ResolutionScope::new(
                "test-runtime",
                ResolutionMode::Eliminate,
                ["provided".to_string()],
                [],
                vec![BuildScopeQuery::Select(test.clone(), runtime.clone())],
            ),
        ];

        Self {
            id: "maven3".to_string(),
            system_scope_id: Some("system".to_string()),
            system_scope_transitive: true,
            broken_runtime_resolution: true,
            derive_variant: DeriveVariant::Narrowest,
            project_paths: vec![main],
            build_paths: vec![compile, runtime],
            extra_scopes: vec![combined_test],
            dependency_scopes,
            resolution_scopes,
        }
    }

    /// The modern profile: full {main, test} × {compile, runtime} matrix,
    /// non-transitive system scope, and the finer-grained `none`,
    /// `compile-only`, `test-only` and `test-runtime` scopes.
    pub fn maven4() -> Self {
        let main = ProjectPath::new("main", 1, 2);
        let test = ProjectPath::new("test", 2, 1);
        let compile = BuildPath::new("compile", 1, false);
        let runtime = BuildPath::new("runtime", 2, true);

        let dependency_scopes = vec![
            DependencyScope::new("compile", true, vec![BuildScopeQuery::All]),
            DependencyScope::new(
                "runtime",
                true,
                vec![BuildScopeQuery::ByBuildPath(runtime.clone())],
            ),
            DependencyScope::new(
                "provided",
                false,
                vec![BuildScopeQuery::ByBuildPath(compile.clone())],
            )
            .with_derive_table(BTreeMap::from([(
                "runtime".to_string(),
                "none".to_string(),
            )])),
            DependencyScope::new(
                "test",
                false,
                vec![BuildScopeQuery::ByProjectPath(test.clone())],
            ),
            DependencyScope::new(
                "system",
                false,
                vec![BuildScopeQuery::ByBuildPath(compile.clone())],
            ),
            DependencyScope::new("none", false, vec![]),
            DependencyScope::new(
                "compile-only",
                false,
                vec![BuildScopeQuery::Select(main.clone(), compile.clone())],
            ),
            DependencyScope::new(
                "test-only",
                false,
                vec![BuildScopeQuery::Select(test.clone(), compile.clone())],
            ),
            DependencyScope::new(
                "test-runtime",
                true,
                vec![BuildScopeQuery::Select(test.clone(), runtime.clone())],
            ),
        ];

        let resolution_scopes = vec![
            ResolutionScope::new(
                "main-compile",
                ResolutionMode::Eliminate,
                [
                    "runtime".to_string(),
                    "test".to_string(),
                    "test-only".to_string(),
                    "test-runtime".to_string(),
                    "none".to_string(),
                ],
                ["system".to_string()],
                vec![BuildScopeQuery::Select(main.clone(), compile.clone())],
            ),
            ResolutionScope::new(
                "main-runtime",
                ResolutionMode::Remove,
                [
                    "provided".to_string(),
                    "test".to_string(),
                    "system".to_string(),
                    "compile-only".to_string(),
                    "test-only".to_string(),
                    "test-runtime".to_string(),
                    "none".to_string(),
                ],
                [],
                vec![BuildScopeQuery::Select(main.clone(), runtime.clone())],
            ),
            ResolutionScope::new(
                "test-compile",
                ResolutionMode::Eliminate,
                [
                    "runtime".to_string(),
                    "test-runtime".to_string(),
                    "none".to_string(),
                ],
                ["system".to_string()],
                vec![BuildScopeQuery::Select(test.clone(), compile.clone())],
            ),
            ResolutionScope::new(
                "test-runtime",
                ResolutionMode::Eliminate,
                [
                    "provided".to_string(),
                    "compile-only".to_string(),
                    "test-only".to_string(),
                    "none".to_string(),
                ],
                [],
                vec![BuildScopeQuery::Select(test.clone(), runtime.clone())],
            ),
        ];

        Self {
            id: "maven4".to_string(),
            system_scope_id: Some("system".to_string()),
            system_scope_transitive: false,
            broken_runtime_resolution: false,
            derive_variant: DeriveVariant::Narrowest,
            project_paths: vec![main, test],
            build_paths: vec![compile, runtime],
            extra_scopes: vec![],
            dependency_scopes,
            resolution_scopes,
        }
    }
}

/// The assembled, immutable scope catalogue for one profile.
///
/// Lookups are by string id. Assembly happens exactly once, in [`Self::new`];
/// concurrent reads afterwards need no locking.
#[derive(Debug)]
pub struct ScopeManager {
    profile_id: String,
    system_scope_id: Option<String>,
    broken_runtime_resolution: bool,
    derive_variant: DeriveVariant,
    matrix: BuildScopeMatrix,
    dependency_scopes: Vec<DependencyScope>,
    dependency_index: HashMap<String, usize>,
    resolution_scopes: Vec<ResolutionScope>,
    resolution_index: HashMap<String, usize>,
}

impl ScopeManager {
    /// Build the catalogue: matrix, widths, indexes. Every membership and
    /// `wanted` query is resolved here, so a profile referencing a missing
    /// singleton cell or an unknown scope id fails now, not at use time.
    pub fn new(profile: ScopeProfile) -> MalletResult<Self> {
        let matrix = BuildScopeMatrix::new(
            profile.project_paths,
            profile.build_paths,
            profile.extra_scopes,
        )?;

        let mut dependency_scopes = profile.dependency_scopes;
        for scope in &mut dependency_scopes {
            if profile.system_scope_id.as_deref() == Some(scope.id.as_str()) {
                scope.transitive = profile.system_scope_transitive;
            }
            let members = matrix.query(&scope.membership)?;
            let mut width = if scope.transitive {
                TRANSITIVE_WIDTH_BONUS
            } else {
                0
            };
            for member in members {
                // Extras may carry an order of 0; clamp so they still count.
                width += TRANSITIVE_WIDTH_BONUS / member.order.max(1);
            }
            scope.width = width;
            debug!(scope = %scope.id, width, "assembled dependency scope");
        }

        let mut dependency_index = HashMap::new();
        for (i, scope) in dependency_scopes.iter().enumerate() {
            dependency_index.insert(scope.id.clone(), i);
        }

        let mut resolution_scopes = profile.resolution_scopes;
        for scope in &mut resolution_scopes {
            matrix.query(&scope.wanted)?;
            for id in scope.excluded.iter().chain(scope.widened.iter()) {
                if !dependency_index.contains_key(id) {
                    return Err(MalletError::ScopeConfig {
                        message: format!(
                            "resolution scope {} references unknown dependency scope {id}",
                            scope.id
                        ),
                    }
                    .into());
                }
            }
            if profile.broken_runtime_resolution && scope.mode == ResolutionMode::Remove {
                scope.mode = ResolutionMode::Eliminate;
            }
        }

        let mut resolution_index = HashMap::new();
        for (i, scope) in resolution_scopes.iter().enumerate() {
            resolution_index.insert(scope.id.clone(), i);
        }

        debug!(
            profile = %profile.id,
            build_scopes = matrix.len(),
            dependency_scopes = dependency_scopes.len(),
            resolution_scopes = resolution_scopes.len(),
            "assembled scope catalogue"
        );

        Ok(Self {
            profile_id: profile.id,
            system_scope_id: profile.system_scope_id,
            broken_runtime_resolution: profile.broken_runtime_resolution,
            derive_variant: profile.derive_variant,
            matrix,
            dependency_scopes,
            dependency_index,
            resolution_scopes,
            resolution_index,
        })
    }

    pub fn profile_id(&self) -> &str {
        &self.profile_id
    }

    pub fn broken_runtime_resolution(&self) -> bool {
        self.broken_runtime_resolution
    }

    pub fn matrix(&self) -> &BuildScopeMatrix {
        &self.matrix
    }

    /// Look up a dependency scope by id.
    pub fn dependency_scope(&self, id: &str) -> Option<&DependencyScope> {
        self.dependency_index
            .get(id)
            .map(|&i| &self.dependency_scopes[i])
    }

    /// Look up a resolution scope by id (e.g. `main-compile`).
    pub fn resolution_scope(&self, id: &str) -> Option<&ResolutionScope> {
        self.resolution_index
            .get(id)
            .map(|&i| &self.resolution_scopes[i])
    }

    pub fn dependency_scopes(&self) -> impl Iterator<Item = &DependencyScope> {
        self.dependency_scopes.iter()
    }

    pub fn resolution_scopes(&self) -> impl Iterator<Item = &ResolutionScope> {
        self.resolution_scopes.iter()
    }

    /// The configured system sentinel scope, if the profile has one.
    pub fn system_scope(&self) -> Option<&DependencyScope> {
        self.system_scope_id
            .as_deref()
            .and_then(|id| self.dependency_scope(id))
    }

    pub fn scope_width(&self, id: &str) -> Option<u32> {
        self.dependency_scope(id).map(|s| s.width)
    }

    /// A deriver using the profile's configured variant.
    pub fn deriver(&self) -> ScopeDeriver<'_> {
        ScopeDeriver::new(self, self.derive_variant)
    }

    /// A deriver with an explicit variant override.
    pub fn deriver_with(&self, variant: DeriveVariant) -> ScopeDeriver<'_> {
        ScopeDeriver::new(self, variant)
    }

    /// The post-conflict scope selector for this catalogue.
    pub fn selector(&self) -> ScopeSelector<'_> {
        ScopeSelector::new(self)
    }
}
