//! Per-edge scope derivation during top-down graph expansion.
//!
//! Invoked once per edge, before its children are visited, so derivation
//! composes along a root-to-leaf path: the parent's *effective* scope and
//! the child's *declared* scope combine into the child's effective scope.

use crate::config::ScopeManager;
use crate::dependency::DependencyScope;

/// Which rule decides when both parent and child scopes are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeriveVariant {
    /// The narrower of parent and child (by `width`) wins.
    Narrowest,
    /// The child scope's own derive table decides; scopes without an opinion
    /// fall back to the width rule.
    Delegated,
}

/// Derives a child edge's effective scope from its declared scope and its
/// parent's effective scope.
///
/// Stateless apart from the shared read-only catalogue, so one deriver can
/// serve any number of concurrent collection sessions.
#[derive(Debug, Clone, Copy)]
pub struct ScopeDeriver<'a> {
    manager: &'a ScopeManager,
    variant: DeriveVariant,
}

impl<'a> ScopeDeriver<'a> {
    pub fn new(manager: &'a ScopeManager, variant: DeriveVariant) -> Self {
        Self { manager, variant }
    }

    /// Compute the effective scope for an edge.
    ///
    /// `parent_effective` is `None` for root edges. Labels the catalogue
    /// does not know degrade to the empty sentinel; they never error.
    ///
    /// Rule order:
    /// 1. a child that *is* the system sentinel stays system, whatever the
    ///    ancestry says;
    /// 2. a root edge keeps its own scope (or `""` if unrecognized);
    /// 3. an unrecognized child under a known parent takes the parent's
    ///    scope, and a recognized child under an unrecognized parent keeps
    ///    its own;
    /// 4. otherwise the variant decides.
    pub fn derive(&self, declared: &str, parent_effective: Option<&str>) -> String {
        let child = self.manager.dependency_scope(declared);

        if let (Some(system), Some(child)) = (self.manager.system_scope(), child) {
            if child.id == system.id {
                return system.id.clone();
            }
        }

        let Some(parent_label) = parent_effective else {
            return child.map(|c| c.id.clone()).unwrap_or_default();
        };
        let parent = self.manager.dependency_scope(parent_label);

        match (parent, child) {
            (None, None) => String::new(),
            (Some(parent), None) => parent.id.clone(),
            (None, Some(child)) => child.id.clone(),
            (Some(parent), Some(child)) => match self.variant {
                DeriveVariant::Narrowest => narrower(parent, child).id.clone(),
                DeriveVariant::Delegated => child
                    .derive_from_parent(Some(parent))
                    .unwrap_or_else(|| narrower(parent, child).id.clone()),
            },
        }
    }
}

/// The narrower of the two scopes; the child wins width ties so that a
/// scope composed with itself stays itself.
fn narrower<'s>(parent: &'s DependencyScope, child: &'s DependencyScope) -> &'s DependencyScope {
    if parent.width < child.width {
        parent
    } else {
        child
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ScopeManager, ScopeProfile};

    fn maven4() -> ScopeManager {
        ScopeManager::new(ScopeProfile::maven4()).unwrap()
    }

    #[test]
    fn root_edge_keeps_own_scope() {
        let manager = maven4();
        let deriver = manager.deriver();
        assert_eq!(deriver.derive("compile", None), "compile");
        assert_eq!(deriver.derive("test", None), "test");
    }

    #[test]
    fn root_edge_unknown_scope_degrades_to_empty() {
        let manager = maven4();
        let deriver = manager.deriver();
        assert_eq!(deriver.derive("foo", None), "");
    }

    #[test]
    fn unknown_child_under_known_parent_takes_parent() {
        let manager = maven4();
        let deriver = manager.deriver();
        assert_eq!(deriver.derive("foo", Some("compile")), "compile");
    }

    #[test]
    fn known_child_under_unknown_parent_keeps_own() {
        let manager = maven4();
        let deriver = manager.deriver();
        assert_eq!(deriver.derive("runtime", Some("bar")), "runtime");
    }

    #[test]
    fn system_child_never_overridden() {
        let manager = maven4();
        let deriver = manager.deriver();
        assert_eq!(deriver.derive("system", Some("test")), "system");
        assert_eq!(deriver.derive("system", None), "system");
    }

    #[test]
    fn narrowest_wins() {
        let manager = maven4();
        let deriver = manager.deriver();
        // test is narrower than compile
        assert_eq!(deriver.derive("compile", Some("test")), "test");
        // runtime is narrower than compile
        assert_eq!(deriver.derive("runtime", Some("compile")), "runtime");
        assert_eq!(deriver.derive("compile", Some("runtime")), "runtime");
    }

    #[test]
    fn same_scope_composes_to_itself() {
        let manager = maven4();
        let deriver = manager.deriver();
        assert_eq!(deriver.derive("compile", Some("compile")), "compile");
        assert_eq!(deriver.derive("test", Some("test")), "test");
    }

    #[test]
    fn delegated_variant_consults_derive_table() {
        let manager = maven4();
        let deriver = manager.deriver_with(DeriveVariant::Delegated);
        // maven4's provided demotes to none under a runtime parent
        assert_eq!(deriver.derive("provided", Some("runtime")), "none");
        // scopes without an opinion fall back to the width rule
        assert_eq!(deriver.derive("compile", Some("test")), "test");
    }
}
