//! Offline dependency collection: BFS expansion over an in-memory
//! descriptor registry, driven by the scope engine.
//!
//! Per edge, in order: the effective scope is derived from the parent's
//! effective scope, the session selector judges the edge, and a `Remove`
//! resolution scope may prune the subtree. Versions resolve nearest-wins,
//! with same-depth ties going to the higher version so the outcome never
//! depends on declaration order. After expansion, each artifact's conflict
//! items are reconciled into one effective scope.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use mallet_scope::config::ScopeManager;
use mallet_scope::dependency::{ResolutionMode, ResolutionScope};
use mallet_scope::select::ConflictItem;
use mallet_scope::selectors::{DependencyEdge, DependencySelector, ScopeDependencySelector};
use mallet_util::errors::{MalletError, MalletResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conflict::{ConflictReport, VersionConflict};
use crate::graph::{DepEdge, DependencyGraph, ResolvedNode};
use crate::version::MavenVersion;

/// A dependency as declared in an artifact's descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclaredDependency {
    pub group: String,
    pub artifact: String,
    pub version: String,
    pub scope: String,
    pub optional: bool,
}

impl DeclaredDependency {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
            scope: scope.into(),
            optional: false,
        }
    }

    /// Mark as optional (builder pattern).
    pub fn with_optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// `group:artifact` identifier (without version).
    pub fn key(&self) -> String {
        format!("{}:{}", self.group, self.artifact)
    }
}

/// What the registry knows about one artifact version: its coordinates and
/// declared dependencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    pub group: String,
    pub artifact: String,
    pub version: String,
    pub dependencies: Vec<DeclaredDependency>,
}

impl ArtifactDescriptor {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
            dependencies: Vec::new(),
        }
    }

    /// Append a declared dependency (builder pattern).
    pub fn with_dependency(mut self, dep: DeclaredDependency) -> Self {
        self.dependencies.push(dep);
        self
    }

    /// Full `group:artifact:version` coordinate.
    pub fn gav(&self) -> String {
        format!("{}:{}:{}", self.group, self.artifact, self.version)
    }
}

/// In-memory lookup from GAV to descriptor; the collector's only source of
/// transitive dependency information.
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    descriptors: HashMap<String, ArtifactDescriptor>,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, descriptor: ArtifactDescriptor) {
        self.descriptors.insert(descriptor.gav(), descriptor);
    }

    pub fn get(&self, group: &str, artifact: &str, version: &str) -> Option<&ArtifactDescriptor> {
        self.descriptors
            .get(&format!("{group}:{artifact}:{version}"))
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// One collection request: the requesting project's descriptor (its
/// dependencies are the depth-1 edges), an optional named resolution scope,
/// and an optional session selector.
pub struct CollectRequest {
    pub root: ArtifactDescriptor,
    pub resolution_scope: Option<String>,
    pub selector: Option<Arc<dyn DependencySelector>>,
}

impl CollectRequest {
    pub fn new(root: ArtifactDescriptor) -> Self {
        Self {
            root,
            resolution_scope: None,
            selector: None,
        }
    }

    pub fn with_resolution_scope(mut self, id: impl Into<String>) -> Self {
        self.resolution_scope = Some(id.into());
        self
    }

    pub fn with_selector(mut self, selector: Arc<dyn DependencySelector>) -> Self {
        self.selector = Some(selector);
        self
    }
}

/// A resolved artifact with the scope selection settled on for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedArtifact {
    pub group: String,
    pub artifact: String,
    pub version: String,
    pub scope: String,
    pub depth: usize,
}

/// The output of collection.
pub struct CollectResult {
    pub graph: DependencyGraph,
    pub conflicts: ConflictReport,
    /// Flat artifact list sorted by `group:artifact`, resolution-scope
    /// filtering applied.
    pub artifacts: Vec<ResolvedArtifact>,
}

/// Entry in the BFS queue. `selector` is the instance judging this node's
/// child edges, derived along the path that enqueued it.
struct QueueEntry {
    group: String,
    artifact: String,
    version: String,
    effective_scope: String,
    optional: bool,
    depth: usize,
    parent_key: Option<String>,
    selector: Arc<dyn DependencySelector>,
}

impl QueueEntry {
    fn key(&self) -> String {
        format!("{}:{}", self.group, self.artifact)
    }
}

/// Collect the dependency graph for `request.root`.
pub fn collect(
    registry: &DescriptorRegistry,
    manager: &ScopeManager,
    request: CollectRequest,
) -> MalletResult<CollectResult> {
    let resolution = match &request.resolution_scope {
        Some(id) => Some(manager.resolution_scope(id).ok_or_else(|| {
            MalletError::Resolution {
                message: format!("unknown resolution scope: {id}"),
            }
        })?),
        None => None,
    };
    let deriver = manager.deriver();

    debug!(
        root = %request.root.gav(),
        resolution = resolution.map(|r| r.id.as_str()).unwrap_or("none"),
        "collecting dependencies"
    );

    let mut graph = DependencyGraph::new();
    let root_idx = graph.add_node(ResolvedNode {
        group: request.root.group.clone(),
        artifact: request.root.artifact.clone(),
        version: request.root.version.clone(),
        scope: String::new(),
    });
    graph.set_root(root_idx);

    let root_selector: Arc<dyn DependencySelector> = request
        .selector
        .unwrap_or_else(|| Arc::new(ScopeDependencySelector::from_root(None, None)));

    let mut queue: VecDeque<QueueEntry> = VecDeque::new();
    for dep in &request.root.dependencies {
        let effective = deriver.derive(&dep.scope, None);
        let edge = DependencyEdge::new(dep.key(), effective.clone(), dep.optional);
        if !root_selector.accept(&edge) {
            continue;
        }
        if prunes(resolution, &effective) {
            continue;
        }
        queue.push_back(QueueEntry {
            group: dep.group.clone(),
            artifact: dep.artifact.clone(),
            version: dep.version.clone(),
            effective_scope: effective,
            optional: dep.optional,
            depth: 1,
            parent_key: None,
            selector: root_selector.derive(&edge),
        });
    }

    let mut resolved: BTreeMap<String, (String, usize)> = BTreeMap::new();
    let mut conflict_items: HashMap<String, Vec<ConflictItem>> = HashMap::new();
    let mut conflicts = ConflictReport::new();

    while !queue.is_empty() {
        // Drain the current depth level, grouped by key so same-depth
        // version ties resolve by version order, not discovery order.
        let current_depth = queue.front().map(|e| e.depth).unwrap_or(0);
        let mut level: BTreeMap<String, Vec<QueueEntry>> = BTreeMap::new();
        while queue.front().is_some_and(|e| e.depth == current_depth) {
            let entry = queue.pop_front().unwrap();
            level.entry(entry.key()).or_default().push(entry);
        }

        for (key, entries) in level {
            for entry in &entries {
                conflict_items
                    .entry(key.clone())
                    .or_default()
                    .push(ConflictItem::new(entry.depth, entry.effective_scope.clone()));
            }

            // Already resolved at a shallower depth: record conflicts and
            // attach edges, but do not expand again.
            if let Some((winner_version, winner_depth)) = resolved.get(&key).cloned() {
                let Some(node_idx) = graph.find(&key) else {
                    continue;
                };
                for entry in &entries {
                    if entry.version != winner_version {
                        conflicts.add(VersionConflict {
                            group: entry.group.clone(),
                            artifact: entry.artifact.clone(),
                            requested: entry.version.clone(),
                            resolved: winner_version.clone(),
                            scope: graph.node(node_idx).scope.clone(),
                            reason: format!(
                                "nearest wins (depth {} vs {})",
                                winner_depth, entry.depth
                            ),
                        });
                    }
                    attach_edge(&mut graph, root_idx, entry, node_idx);
                }
                continue;
            }

            // First encounter is at this depth; the highest version wins,
            // first declaration winning exact ties.
            let winner_pos = entries
                .iter()
                .enumerate()
                .max_by(|(ia, a), (ib, b)| {
                    MavenVersion::parse(&a.version)
                        .cmp(&MavenVersion::parse(&b.version))
                        .then(ib.cmp(ia))
                })
                .map(|(i, _)| i)
                .unwrap_or(0);
            let winner = &entries[winner_pos];

            let node_idx = graph.add_node(ResolvedNode {
                group: winner.group.clone(),
                artifact: winner.artifact.clone(),
                version: winner.version.clone(),
                scope: winner.effective_scope.clone(),
            });
            resolved.insert(key.clone(), (winner.version.clone(), winner.depth));

            for entry in &entries {
                if entry.version != winner.version {
                    conflicts.add(VersionConflict {
                        group: entry.group.clone(),
                        artifact: entry.artifact.clone(),
                        requested: entry.version.clone(),
                        resolved: winner.version.clone(),
                        scope: winner.effective_scope.clone(),
                        reason: format!("higher version wins (depth {current_depth})"),
                    });
                }
                attach_edge(&mut graph, root_idx, entry, node_idx);
            }

            let Some(descriptor) = registry.get(&winner.group, &winner.artifact, &winner.version)
            else {
                debug!(artifact = %key, version = %winner.version, "no descriptor, treating as leaf");
                continue;
            };
            for dep in &descriptor.dependencies {
                let effective = deriver.derive(&dep.scope, Some(&winner.effective_scope));
                let edge = DependencyEdge::new(dep.key(), effective.clone(), dep.optional);
                if !winner.selector.accept(&edge) {
                    continue;
                }
                if prunes(resolution, &effective) {
                    continue;
                }
                queue.push_back(QueueEntry {
                    group: dep.group.clone(),
                    artifact: dep.artifact.clone(),
                    version: dep.version.clone(),
                    effective_scope: effective,
                    optional: dep.optional,
                    depth: current_depth + 1,
                    parent_key: Some(key.clone()),
                    selector: winner.selector.derive(&edge),
                });
            }
        }
    }

    // Reconcile each artifact's conflict items into one effective scope.
    let scope_selector = manager.selector();
    let no_items = Vec::new();
    let mut artifacts = Vec::new();
    for (key, (version, depth)) in &resolved {
        let Some(idx) = graph.find(key) else {
            continue;
        };
        let winner_scope = graph.node(idx).scope.clone();
        let items = conflict_items.get(key).unwrap_or(&no_items);
        let selected = scope_selector.select(&winner_scope, items);
        graph.set_scope(idx, selected.clone());
        let node = graph.node(idx);
        artifacts.push(ResolvedArtifact {
            group: node.group.clone(),
            artifact: node.artifact.clone(),
            version: version.clone(),
            scope: selected,
            depth: *depth,
        });
    }

    // Eliminate drops excluded nodes from the flat list but leaves the
    // graph intact, so their children stay reachable.
    if let Some(resolution) = resolution {
        if resolution.mode == ResolutionMode::Eliminate {
            artifacts.retain(|a| !resolution.is_excluded(&a.scope));
        }
    }

    debug!(
        resolved = resolved.len(),
        kept = artifacts.len(),
        conflicts = conflicts.len(),
        "collection finished"
    );

    Ok(CollectResult {
        graph,
        conflicts,
        artifacts,
    })
}

/// `Remove` resolution scopes cut excluded subtrees during traversal.
fn prunes(resolution: Option<&ResolutionScope>, effective_scope: &str) -> bool {
    match resolution {
        Some(r) => r.mode == ResolutionMode::Remove && r.is_excluded(effective_scope),
        None => false,
    }
}

fn attach_edge(
    graph: &mut DependencyGraph,
    root_idx: petgraph::graph::NodeIndex,
    entry: &QueueEntry,
    node_idx: petgraph::graph::NodeIndex,
) {
    let parent_idx = entry
        .parent_key
        .as_ref()
        .and_then(|k| graph.find(k))
        .unwrap_or(root_idx);
    graph.add_edge(
        parent_idx,
        node_idx,
        DepEdge {
            scope: entry.effective_scope.clone(),
            optional: entry.optional,
        },
    );
}
