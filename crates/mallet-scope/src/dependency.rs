//! Dependency and resolution scopes: the named values this engine produces
//! and the policy bundles higher layers look up by id.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::query::BuildScopeQuery;
use crate::selectors::ScopeDependencySelector;

/// A named dependency scope (e.g. `compile`, `runtime`, `test`).
///
/// `width` totally orders scopes from widest to narrowest and is computed at
/// catalogue assembly from matrix membership; until then it is zero.
/// Residual width ties are broken by id wherever a single scope must win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyScope {
    pub id: String,
    pub transitive: bool,
    /// Which build scopes this dependency scope is present in.
    pub membership: Vec<BuildScopeQuery>,
    pub width: u32,
    /// Optional non-monotonic derivation rules: parent scope id → derived
    /// scope id. Consulted only by the delegated deriver variant.
    pub derive_table: Option<BTreeMap<String, String>>,
}

impl DependencyScope {
    pub fn new(id: impl Into<String>, transitive: bool, membership: Vec<BuildScopeQuery>) -> Self {
        Self {
            id: id.into(),
            transitive,
            membership,
            width: 0,
            derive_table: None,
        }
    }

    /// Attach derivation rules (builder pattern).
    pub fn with_derive_table(mut self, table: BTreeMap<String, String>) -> Self {
        self.derive_table = Some(table);
        self
    }

    /// Ask this scope what it derives to under `parent`.
    ///
    /// `None` means the scope has no opinion and the caller falls back to
    /// the width rule.
    pub fn derive_from_parent(&self, parent: Option<&DependencyScope>) -> Option<String> {
        let table = self.derive_table.as_ref()?;
        let parent = parent?;
        table.get(&parent.id).cloned()
    }
}

impl fmt::Display for DependencyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// How a resolution scope disposes of excluded nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMode {
    /// Excluded nodes are cut together with their whole subtree.
    Remove,
    /// Excluded nodes are dropped but their children stay reachable through
    /// surviving paths.
    Eliminate,
}

/// A named policy bundle defining what subset of a collected graph an
/// operation retains (e.g. `main-compile`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionScope {
    pub id: String,
    pub mode: ResolutionMode,
    /// Dependency scope ids filtered out of the result.
    pub excluded: BTreeSet<String>,
    /// Scope ids exempt from exclusion (e.g. a widened `system`).
    pub widened: BTreeSet<String>,
    /// Which build scopes this resolution targets.
    pub wanted: Vec<BuildScopeQuery>,
}

impl ResolutionScope {
    pub fn new(
        id: impl Into<String>,
        mode: ResolutionMode,
        excluded: impl IntoIterator<Item = String>,
        widened: impl IntoIterator<Item = String>,
        wanted: Vec<BuildScopeQuery>,
    ) -> Self {
        Self {
            id: id.into(),
            mode,
            excluded: excluded.into_iter().collect(),
            widened: widened.into_iter().collect(),
            wanted,
        }
    }

    /// Whether a dependency scope id is filtered out by this resolution.
    /// Widened scopes are never excluded.
    pub fn is_excluded(&self, scope_id: &str) -> bool {
        self.excluded.contains(scope_id) && !self.widened.contains(scope_id)
    }

    /// The effective exclusion set (excluded minus widened).
    pub fn effective_exclusions(&self) -> BTreeSet<String> {
        self.excluded
            .iter()
            .filter(|s| !self.widened.contains(*s))
            .cloned()
            .collect()
    }

    /// A selector suitable for filtering a request's direct dependencies
    /// before collection starts.
    pub fn direct_selector(&self) -> ScopeDependencySelector {
        ScopeDependencySelector::from_root(None, Some(self.effective_exclusions()))
    }
}

impl fmt::Display for ResolutionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
