//! Dependency-edge selectors: composable accept/reject predicates that
//! control which edges a collection session traverses.
//!
//! A selector judges edges at one depth level and derives the instance used
//! one level below; depth state lives in the instances themselves, so a
//! selector chain is safe to share across unrelated sessions as long as each
//! session starts from the root instance.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex};

use mallet_util::errors::{MalletError, MalletResult};

/// The view of a graph edge a selector judges: the artifact it points at,
/// the edge's scope label, and its optionality flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    /// `group:artifact` key of the target.
    pub key: String,
    pub scope: String,
    pub optional: bool,
}

impl DependencyEdge {
    pub fn new(key: impl Into<String>, scope: impl Into<String>, optional: bool) -> Self {
        Self {
            key: key.into(),
            scope: scope.into(),
            optional,
        }
    }
}

/// An accept/reject predicate over edges plus the derivation of the selector
/// instance for the next depth level.
///
/// Implementations are immutable; `derive` returns a fresh instance instead
/// of mutating, so concurrent sessions can share root selectors freely.
pub trait DependencySelector: fmt::Debug + Send + Sync {
    /// Whether the collector should traverse this edge.
    fn accept(&self, edge: &DependencyEdge) -> bool;

    /// The selector applied to the children of the node `edge` points at.
    fn derive(&self, edge: &DependencyEdge) -> Arc<dyn DependencySelector>;
}

/// Accepts nothing, forever. What a level selector degrades into past its
/// last level.
#[derive(Debug, Clone, Copy)]
struct RejectAll;

impl DependencySelector for RejectAll {
    fn accept(&self, _edge: &DependencyEdge) -> bool {
        false
    }

    fn derive(&self, _edge: &DependencyEdge) -> Arc<dyn DependencySelector> {
        Arc::new(RejectAll)
    }
}

/// Accepts edges through depth `max_level`, rejects everything deeper.
#[derive(Debug, Clone)]
pub struct LevelDependencySelector {
    depth: u32,
    max_level: u32,
}

impl LevelDependencySelector {
    /// `max_level` counts accepted levels and must be at least 1.
    pub fn new(max_level: u32) -> MalletResult<Self> {
        if max_level < 1 {
            return Err(MalletError::Selector {
                message: format!("max level must be at least 1, got {max_level}"),
            }
            .into());
        }
        Ok(Self {
            depth: 1,
            max_level,
        })
    }

    pub(crate) fn with_levels(max_level: u32) -> Self {
        Self {
            depth: 1,
            max_level,
        }
    }
}

impl DependencySelector for LevelDependencySelector {
    fn accept(&self, _edge: &DependencyEdge) -> bool {
        self.depth <= self.max_level
    }

    fn derive(&self, _edge: &DependencyEdge) -> Arc<dyn DependencySelector> {
        if self.depth >= self.max_level {
            Arc::new(RejectAll)
        } else {
            Arc::new(Self {
                depth: self.depth + 1,
                max_level: self.max_level,
            })
        }
    }
}

/// Rejects optional edges from depth `apply_from` onward.
#[derive(Debug, Clone)]
pub struct OptionalDependencySelector {
    depth: u32,
    apply_from: u32,
}

impl OptionalDependencySelector {
    pub fn new(apply_from: u32) -> MalletResult<Self> {
        if apply_from < 1 {
            return Err(MalletError::Selector {
                message: format!("apply-from depth must be at least 1, got {apply_from}"),
            }
            .into());
        }
        Ok(Self {
            depth: 1,
            apply_from,
        })
    }

    /// Rejects optional edges everywhere, the root's own included.
    pub fn from_root() -> Self {
        Self {
            depth: 1,
            apply_from: 1,
        }
    }

    /// Keeps the root's own optional edges, rejects optional transitives.
    pub fn from_direct() -> Self {
        Self {
            depth: 1,
            apply_from: 2,
        }
    }
}

impl DependencySelector for OptionalDependencySelector {
    fn accept(&self, edge: &DependencyEdge) -> bool {
        !(self.depth >= self.apply_from && edge.optional)
    }

    fn derive(&self, _edge: &DependencyEdge) -> Arc<dyn DependencySelector> {
        Arc::new(Self {
            depth: self.depth.saturating_add(1),
            apply_from: self.apply_from,
        })
    }
}

/// Filters edges by scope label from depth `apply_from` onward.
///
/// Before `apply_from` every edge passes. At or past it, an edge is rejected
/// when `included` is present and does not contain its scope, or when
/// `excluded` is present and does.
#[derive(Debug, Clone)]
pub struct ScopeDependencySelector {
    depth: u32,
    apply_from: u32,
    included: Option<BTreeSet<String>>,
    excluded: Option<BTreeSet<String>>,
}

impl ScopeDependencySelector {
    pub fn new(
        apply_from: u32,
        included: Option<BTreeSet<String>>,
        excluded: Option<BTreeSet<String>>,
    ) -> MalletResult<Self> {
        if apply_from < 1 {
            return Err(MalletError::Selector {
                message: format!("apply-from depth must be at least 1, got {apply_from}"),
            }
            .into());
        }
        Ok(Self {
            depth: 1,
            apply_from,
            included,
            excluded,
        })
    }

    /// Applies from the root's direct edges onward.
    pub fn from_root(
        included: Option<BTreeSet<String>>,
        excluded: Option<BTreeSet<String>>,
    ) -> Self {
        Self {
            depth: 1,
            apply_from: 1,
            included,
            excluded,
        }
    }

    /// Leaves the root's direct edges alone, applies to transitives.
    pub fn from_direct(
        included: Option<BTreeSet<String>>,
        excluded: Option<BTreeSet<String>>,
    ) -> Self {
        Self {
            depth: 1,
            apply_from: 2,
            included,
            excluded,
        }
    }
}

impl DependencySelector for ScopeDependencySelector {
    fn accept(&self, edge: &DependencyEdge) -> bool {
        if self.depth < self.apply_from {
            return true;
        }
        if let Some(included) = &self.included {
            if !included.contains(&edge.scope) {
                return false;
            }
        }
        if let Some(excluded) = &self.excluded {
            if excluded.contains(&edge.scope) {
                return false;
            }
        }
        true
    }

    fn derive(&self, _edge: &DependencyEdge) -> Arc<dyn DependencySelector> {
        Arc::new(Self {
            depth: self.depth.saturating_add(1),
            apply_from: self.apply_from,
            included: self.included.clone(),
            excluded: self.excluded.clone(),
        })
    }
}

/// Logical AND of several selectors; derives each component in lockstep.
#[derive(Debug, Clone)]
pub struct AndDependencySelector {
    selectors: Vec<Arc<dyn DependencySelector>>,
}

impl AndDependencySelector {
    pub fn new(selectors: Vec<Arc<dyn DependencySelector>>) -> Self {
        Self { selectors }
    }
}

impl DependencySelector for AndDependencySelector {
    fn accept(&self, edge: &DependencyEdge) -> bool {
        self.selectors.iter().all(|s| s.accept(edge))
    }

    fn derive(&self, edge: &DependencyEdge) -> Arc<dyn DependencySelector> {
        Arc::new(Self {
            selectors: self.selectors.iter().map(|s| s.derive(edge)).collect(),
        })
    }
}

/// Shows a tree in full down to and including the first artifact `delegate`
/// would reject, then only `max_level_past` further levels beneath it.
///
/// Inclusion is always decided by `filter`; `delegate` is evaluated purely
/// to detect its first rejection. Rejected artifact ids land in a stoppers
/// set shared by every selector derived from the same root instance:
/// write-once per id, idempotent, and scoped to that one walk. Build a fresh
/// instance per root invocation; never reuse one across unrelated walks.
///
/// Once an id is a stopper it stays one for the remainder of the walk, even
/// when a diamond path reaches the same id again at a shallower depth, so
/// visibility beneath it is bounded everywhere regardless of traversal
/// order.
#[derive(Debug)]
pub struct DirtyTreeDependencySelector {
    delegate: Arc<dyn DependencySelector>,
    filter: Arc<dyn DependencySelector>,
    max_level_past: u32,
    stoppers: Arc<Mutex<HashSet<String>>>,
}

impl DirtyTreeDependencySelector {
    pub fn new(
        delegate: Arc<dyn DependencySelector>,
        filter: Arc<dyn DependencySelector>,
        max_level_past: u32,
    ) -> MalletResult<Self> {
        if max_level_past < 1 {
            return Err(MalletError::Selector {
                message: format!("max level past cut must be at least 1, got {max_level_past}"),
            }
            .into());
        }
        Ok(Self {
            delegate,
            filter,
            max_level_past,
            stoppers: Arc::new(Mutex::new(HashSet::new())),
        })
    }

    fn is_stopper(&self, key: &str) -> bool {
        self.stoppers.lock().expect("stopper set poisoned").contains(key)
    }
}

impl DependencySelector for DirtyTreeDependencySelector {
    fn accept(&self, edge: &DependencyEdge) -> bool {
        if !self.delegate.accept(edge) {
            self.stoppers
                .lock()
                .expect("stopper set poisoned")
                .insert(edge.key.clone());
        }
        self.filter.accept(edge)
    }

    fn derive(&self, edge: &DependencyEdge) -> Arc<dyn DependencySelector> {
        if self.is_stopper(&edge.key) {
            Arc::new(LevelDependencySelector::with_levels(self.max_level_past))
        } else {
            Arc::new(Self {
                delegate: self.delegate.derive(edge),
                filter: self.filter.derive(edge),
                max_level_past: self.max_level_past,
                stoppers: Arc::clone(&self.stoppers),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(key: &str, scope: &str, optional: bool) -> DependencyEdge {
        DependencyEdge::new(key, scope, optional)
    }

    #[test]
    fn level_accepts_through_max_level() {
        let root = LevelDependencySelector::new(1).unwrap();
        let e = edge("org.a:a", "compile", false);
        assert!(root.accept(&e));

        let next = root.derive(&e);
        assert!(!next.accept(&edge("org.b:b", "compile", false)));

        // Reject-all is permanent
        let deeper = next.derive(&e);
        assert!(!deeper.accept(&e));
    }

    #[test]
    fn level_rejects_zero() {
        assert!(LevelDependencySelector::new(0).is_err());
    }

    #[test]
    fn optional_from_root_rejects_direct_optionals() {
        let sel = OptionalDependencySelector::from_root();
        assert!(!sel.accept(&edge("org.a:a", "compile", true)));
        assert!(sel.accept(&edge("org.a:a", "compile", false)));
    }

    #[test]
    fn optional_from_direct_keeps_direct_optionals() {
        let root = OptionalDependencySelector::from_direct();
        let opt = edge("org.a:a", "compile", true);
        assert!(root.accept(&opt));

        let next = root.derive(&opt);
        assert!(!next.accept(&opt));
    }

    #[test]
    fn optional_rejects_zero_apply_from() {
        assert!(OptionalDependencySelector::new(0).is_err());
    }

    #[test]
    fn scope_selector_applies_from_depth() {
        let excluded = BTreeSet::from(["test".to_string()]);
        let root = ScopeDependencySelector::from_direct(None, Some(excluded));
        let test_edge = edge("org.a:a", "test", false);

        // Direct edges pass untouched
        assert!(root.accept(&test_edge));

        let next = root.derive(&test_edge);
        assert!(!next.accept(&test_edge));
        assert!(next.accept(&edge("org.b:b", "compile", false)));
    }

    #[test]
    fn scope_selector_included_set() {
        let included = BTreeSet::from(["compile".to_string(), "runtime".to_string()]);
        let sel = ScopeDependencySelector::from_root(Some(included), None);
        assert!(sel.accept(&edge("org.a:a", "compile", false)));
        assert!(!sel.accept(&edge("org.a:a", "provided", false)));
    }

    #[test]
    fn and_selector_composes() {
        let level: Arc<dyn DependencySelector> =
            Arc::new(LevelDependencySelector::new(2).unwrap());
        let optional: Arc<dyn DependencySelector> =
            Arc::new(OptionalDependencySelector::from_root());
        let sel = AndDependencySelector::new(vec![level, optional]);

        assert!(sel.accept(&edge("org.a:a", "compile", false)));
        assert!(!sel.accept(&edge("org.a:a", "compile", true)));
    }

    #[test]
    fn dirty_tree_cut_and_peek() {
        // Delegate excludes scope "test" from depth 2 on; filter accepts all.
        let delegate = Arc::new(ScopeDependencySelector::from_direct(
            None,
            Some(BTreeSet::from(["test".to_string()])),
        ));
        let filter = Arc::new(ScopeDependencySelector::from_root(None, None));
        let root = DirtyTreeDependencySelector::new(delegate, filter, 1).unwrap();

        // Depth 1: a compile edge, accepted by everyone.
        let d1 = edge("org.a:a", "compile", false);
        assert!(root.accept(&d1));
        let at_d2 = root.derive(&d1);

        // Depth 2: a test edge the delegate rejects; still included, but
        // recorded as a stopper.
        let d2 = edge("org.b:b", "test", false);
        assert!(at_d2.accept(&d2));
        let at_d3 = at_d2.derive(&d2);

        // Depth 3: children of the stopper are included (one level past)...
        let d3 = edge("org.c:c", "compile", false);
        assert!(at_d3.accept(&d3));
        let at_d4 = at_d3.derive(&d3);

        // ...and depth 4 descendants are not.
        assert!(!at_d4.accept(&edge("org.d:d", "compile", false)));
    }

    #[test]
    fn dirty_tree_stopper_persists_across_diamond() {
        let delegate = Arc::new(ScopeDependencySelector::from_direct(
            None,
            Some(BTreeSet::from(["test".to_string()])),
        ));
        let filter = Arc::new(ScopeDependencySelector::from_root(None, None));
        let root = DirtyTreeDependencySelector::new(delegate, filter, 1).unwrap();

        let d1 = edge("org.a:a", "compile", false);
        root.accept(&d1);
        let at_d2 = root.derive(&d1);

        let stopper = edge("org.b:b", "test", false);
        at_d2.accept(&stopper);

        // The same artifact reappears at depth 1 through another branch:
        // it is already a stopper, so its children are level-bounded even
        // on the shallower path.
        let shallow = edge("org.b:b", "compile", false);
        assert!(root.accept(&shallow));
        let beneath = root.derive(&shallow);
        let child = edge("org.e:e", "compile", false);
        assert!(beneath.accept(&child));
        assert!(!beneath.derive(&child).accept(&edge("org.f:f", "compile", false)));
    }

    #[test]
    fn dirty_tree_rejects_zero_peek() {
        let filter = Arc::new(ScopeDependencySelector::from_root(None, None));
        let delegate = Arc::new(OptionalDependencySelector::from_root());
        assert!(DirtyTreeDependencySelector::new(delegate, filter, 0).is_err());
    }
}
