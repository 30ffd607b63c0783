//! Per-artifact scope selection after conflict resolution.
//!
//! Once a winning version has been chosen for an artifact, the conflict
//! items (one per distinct path that reached it) are reconciled into a
//! single effective scope.

use serde::{Deserialize, Serialize};

use crate::config::ScopeManager;

/// One path by which an artifact was reached during expansion, with the
/// scope derived along that path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictItem {
    pub depth: usize,
    pub scope: String,
}

impl ConflictItem {
    pub fn new(depth: usize, scope: impl Into<String>) -> Self {
        Self {
            depth,
            scope: scope.into(),
        }
    }
}

/// Picks one effective scope per artifact from its conflict items.
///
/// Pure and deterministic: for a fixed catalogue the result depends only on
/// the item set, never on the order conflicts were discovered in.
#[derive(Debug, Clone, Copy)]
pub struct ScopeSelector<'a> {
    manager: &'a ScopeManager,
}

impl<'a> ScopeSelector<'a> {
    pub fn new(manager: &'a ScopeManager) -> Self {
        Self { manager }
    }

    /// Select the effective scope for an artifact whose winning version
    /// carries `winner_scope` and whose paths produced `items`.
    ///
    /// Rule order:
    /// 1. a system-scoped winner stays system;
    /// 2. any item at depth ≤ 1 wins verbatim (direct declarations beat
    ///    inherited ones);
    /// 3. among the distinct candidate scopes, system is dropped when it is
    ///    not the only candidate;
    /// 4. a single survivor is returned as-is, otherwise the widest known
    ///    candidate (ties by id); candidates the catalogue does not know at
    ///    all yield `""`.
    pub fn select(&self, winner_scope: &str, items: &[ConflictItem]) -> String {
        let system = self.manager.system_scope();

        if let Some(system) = system {
            if winner_scope == system.id {
                return winner_scope.to_string();
            }
        }

        if let Some(direct) = items
            .iter()
            .filter(|i| i.depth <= 1)
            .min_by(|a, b| (a.depth, &a.scope).cmp(&(b.depth, &b.scope)))
        {
            return direct.scope.clone();
        }

        let mut candidates: Vec<&str> = Vec::new();
        for item in items {
            if !candidates.contains(&item.scope.as_str()) {
                candidates.push(&item.scope);
            }
        }
        if candidates.len() > 1 {
            if let Some(system) = system {
                candidates.retain(|c| *c != system.id);
            }
        }

        if candidates.len() == 1 {
            return candidates[0].to_string();
        }

        candidates
            .iter()
            .filter_map(|c| self.manager.dependency_scope(c))
            .max_by(|a, b| (a.width, &a.id).cmp(&(b.width, &b.id)))
            .map(|s| s.id.clone())
            .unwrap_or_default()
    }
}
