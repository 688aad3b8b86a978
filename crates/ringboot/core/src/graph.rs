//! Dependency graph: arena-owned nodes with cycle-safe resolution.
//!
//! Nodes live in a single arena owned by [`DependencyGraph`]; dependency
//! links are arena indices, so tearing the graph down can never leave a
//! dangling reference. Resolution is a one-pass depth-first traversal
//! from the root: dependencies first, then the node's own action, then
//! the node is marked resolved and appended to the resolution order.
//!
//! Resolution is not transactional. When a cycle is found every node on
//! the active path is marked failed, and nodes that finished before the
//! offending branch was reached keep their state and side effects.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{BootError, BootResult};
use crate::types::{NodeId, NodeState, TreeLevel};

/// One-time setup action run when a node resolves.
pub type NodeAction = Box<dyn FnMut(&DependencyNode) + Send>;

/// `(id, level, parent)` entry of a tree specification.
pub type TreeEntry = (NodeId, TreeLevel, Option<NodeId>);

// ── Node Spec ───────────────────────────────────────────────────────

/// Declarative description of a node, used to build a graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: NodeId,
    pub level: TreeLevel,
    /// The node that requires this one. `None` marks the root.
    #[serde(default)]
    pub parent: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl NodeSpec {
    pub fn new(id: u32, level: TreeLevel, parent: Option<u32>) -> Self {
        Self {
            id: NodeId(id),
            level,
            parent: parent.map(NodeId),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl From<TreeEntry> for NodeSpec {
    fn from((id, level, parent): TreeEntry) -> Self {
        Self {
            id,
            level,
            parent,
            label: None,
        }
    }
}

/// The reference boot tree: one root, one trunk, three branches, one
/// leaf under each branch.
pub fn reference_node_specs() -> Vec<NodeSpec> {
    vec![
        NodeSpec::new(0, TreeLevel::Root, None).with_label("Kernel Root"),
        NodeSpec::new(1, TreeLevel::Trunk, Some(0)).with_label("Memory Manager"),
        NodeSpec::new(2, TreeLevel::Branch, Some(1)).with_label("Interrupt Handler"),
        NodeSpec::new(3, TreeLevel::Leaf, Some(2)).with_label("Timer"),
        NodeSpec::new(4, TreeLevel::Branch, Some(1)).with_label("Device Manager"),
        NodeSpec::new(5, TreeLevel::Leaf, Some(4)).with_label("Console"),
        NodeSpec::new(6, TreeLevel::Branch, Some(1)).with_label("File System"),
        NodeSpec::new(7, TreeLevel::Leaf, Some(6)).with_label("Boot Loader"),
    ]
}

/// The reference boot tree as bare `(id, level, parent)` entries.
pub fn reference_tree_spec() -> Vec<TreeEntry> {
    reference_node_specs()
        .into_iter()
        .map(|spec| (spec.id, spec.level, spec.parent))
        .collect()
}

/// Build a graph from `(id, level, parent)` entries.
pub fn create_boot_graph(tree_spec: &[TreeEntry]) -> BootResult<DependencyGraph> {
    let specs: Vec<NodeSpec> = tree_spec.iter().copied().map(NodeSpec::from).collect();
    DependencyGraph::build(&specs, &[])
}

// ── Dependency Node ─────────────────────────────────────────────────

/// A node owned by the graph arena.
#[derive(Clone, Debug, Serialize)]
pub struct DependencyNode {
    id: NodeId,
    level: TreeLevel,
    state: NodeState,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(skip)]
    dependencies: Vec<usize>,
}

impl DependencyNode {
    fn new(id: NodeId, level: TreeLevel, label: Option<String>) -> Self {
        Self {
            id,
            level,
            state: NodeState::Unresolved,
            label,
            dependencies: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn level(&self) -> TreeLevel {
        self.level
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is_resolved(&self) -> bool {
        self.state == NodeState::Resolved
    }

    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }
}

// ── Resolution Context ──────────────────────────────────────────────

/// Traversal mark of a node within one resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mark {
    /// On the active DFS path.
    Visiting,
    /// Finished, appended to the order.
    Visited,
}

/// A node on the active DFS path and the next dependency to descend into.
#[derive(Clone, Copy, Debug)]
struct Frame {
    idx: usize,
    next_dep: usize,
    already_resolved: bool,
}

/// Scratch state of a single resolution, owned by the caller.
#[derive(Debug, Default)]
pub struct ResolutionContext {
    marks: HashMap<usize, Mark>,
    stack: Vec<Frame>,
    order: Vec<NodeId>,
    actions_invoked: usize,
}

impl ResolutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self, capacity: usize) {
        self.marks.clear();
        self.marks.reserve(capacity);
        self.stack.clear();
        self.order.clear();
        self.actions_invoked = 0;
    }

    /// Post-order of the last resolution.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// How many node actions ran during the last resolution.
    pub fn actions_invoked(&self) -> usize {
        self.actions_invoked
    }

    /// Number of nodes marked during the last resolution.
    pub fn marked(&self) -> usize {
        self.marks.len()
    }
}

// ── Dependency Graph ────────────────────────────────────────────────

/// Arena of dependency nodes with a single root.
pub struct DependencyGraph {
    nodes: Vec<DependencyNode>,
    index: HashMap<NodeId, usize>,
    actions: HashMap<usize, NodeAction>,
    root: Option<usize>,
    resolved_count: usize,
    max_depth: usize,
    resolution_order: Vec<NodeId>,
}

impl DependencyGraph {
    /// An empty graph with no root.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            actions: HashMap::new(),
            root: None,
            resolved_count: 0,
            max_depth: 0,
            resolution_order: Vec::new(),
        }
    }

    /// The reference 8-node boot tree.
    pub fn reference() -> Self {
        Self::build(&reference_node_specs(), &[]).unwrap_or_default()
    }

    /// Build a graph from node specs plus extra `(from, to)` requires edges.
    pub fn build(specs: &[NodeSpec], edges: &[(NodeId, NodeId)]) -> BootResult<Self> {
        let mut graph = Self::new();

        for spec in specs {
            if graph.index.contains_key(&spec.id) {
                return Err(BootError::DuplicateNode(spec.id));
            }
            graph.index.insert(spec.id, graph.nodes.len());
            graph
                .nodes
                .push(DependencyNode::new(spec.id, spec.level, spec.label.clone()));
        }

        let roots: Vec<NodeId> = specs
            .iter()
            .filter(|s| s.parent.is_none())
            .map(|s| s.id)
            .collect();
        if roots.len() > 1 {
            return Err(BootError::MultipleRoots(roots));
        }
        graph.root = roots.first().map(|id| graph.index[id]);

        for spec in specs {
            if let Some(parent) = spec.parent {
                graph.link(parent, spec.id)?;
            }
        }
        for &(from, to) in edges {
            graph.link(from, to)?;
        }

        graph.max_depth = graph.compute_max_depth();
        debug!(
            nodes = graph.nodes.len(),
            max_depth = graph.max_depth,
            "Dependency graph built"
        );
        Ok(graph)
    }

    fn lookup(&self, id: NodeId) -> BootResult<usize> {
        self.index
            .get(&id)
            .copied()
            .ok_or(BootError::UnknownNode(id))
    }

    fn link(&mut self, from: NodeId, to: NodeId) -> BootResult<()> {
        let from_idx = self.lookup(from)?;
        let to_idx = self.lookup(to)?;
        self.nodes[from_idx].dependencies.push(to_idx);
        Ok(())
    }

    /// Add a requires edge `from → to` after construction.
    pub fn add_dependency(&mut self, from: NodeId, to: NodeId) -> BootResult<()> {
        self.link(from, to)?;
        self.max_depth = self.compute_max_depth();
        Ok(())
    }

    /// Register the one-time resolution action of a node.
    pub fn set_action<F>(&mut self, id: NodeId, action: F) -> BootResult<()>
    where
        F: FnMut(&DependencyNode) + Send + 'static,
    {
        let idx = self.lookup(id)?;
        self.actions.insert(idx, Box::new(action));
        Ok(())
    }

    /// Builder form of [`set_action`](Self::set_action).
    pub fn with_action<F>(mut self, id: NodeId, action: F) -> BootResult<Self>
    where
        F: FnMut(&DependencyNode) + Send + 'static,
    {
        self.set_action(id, action)?;
        Ok(self)
    }

    pub fn node(&self, id: NodeId) -> Option<&DependencyNode> {
        self.index.get(&id).map(|&idx| &self.nodes[idx])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &DependencyNode> {
        self.nodes.iter()
    }

    pub fn root(&self) -> Option<&DependencyNode> {
        self.root.map(|idx| &self.nodes[idx])
    }

    /// Ids a node directly requires, in declaration order.
    pub fn dependencies_of(&self, id: NodeId) -> Option<Vec<NodeId>> {
        self.node(id)
            .map(|node| node.dependencies.iter().map(|&d| self.nodes[d].id).collect())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes resolved by the last resolution, equal to the length of its
    /// post-order on success.
    pub fn resolved_count(&self) -> usize {
        self.resolved_count
    }

    /// Longest shortest-path distance from the root.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Post-order recorded by the last resolution.
    pub fn resolution_order(&self) -> &[NodeId] {
        &self.resolution_order
    }

    fn compute_max_depth(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut seen = HashSet::from([root]);
        let mut queue = VecDeque::from([(root, 0usize)]);
        let mut deepest = 0;
        while let Some((idx, depth)) = queue.pop_front() {
            deepest = deepest.max(depth);
            for &dep in &self.nodes[idx].dependencies {
                if seen.insert(dep) {
                    queue.push_back((dep, depth + 1));
                }
            }
        }
        deepest
    }

    // ── Resolution ──────────────────────────────────────────────────

    /// Resolve the graph with a fresh context.
    pub fn resolve(&mut self) -> BootResult<usize> {
        let mut ctx = ResolutionContext::new();
        self.resolve_with(&mut ctx)
    }

    /// Resolve the graph using a caller-owned context.
    ///
    /// Returns the number of nodes in the resolution order. Nodes that
    /// were already resolved are walked and reported again, but their
    /// actions are not re-run.
    pub fn resolve_with(&mut self, ctx: &mut ResolutionContext) -> BootResult<usize> {
        let root = self.root.ok_or(BootError::MissingRoot)?;
        ctx.reset(self.nodes.len());

        let outcome = self.visit(root, ctx);
        self.resolution_order = ctx.order.clone();

        match outcome {
            Ok(()) => {
                self.resolved_count = ctx.order.len();
                info!(
                    resolved = self.resolved_count,
                    actions = ctx.actions_invoked,
                    "Dependency graph resolved"
                );
                Ok(self.resolved_count)
            }
            Err(e) => {
                self.resolved_count = self.nodes.iter().filter(|n| n.is_resolved()).count();
                warn!(error = %e, resolved = self.resolved_count, "Dependency resolution aborted");
                Err(e)
            }
        }
    }

    fn visit(&mut self, root: usize, ctx: &mut ResolutionContext) -> BootResult<()> {
        self.enter(root, ctx)?;
        while let Some(frame) = ctx.stack.last_mut() {
            let idx = frame.idx;
            match self.nodes[idx].dependencies.get(frame.next_dep).copied() {
                Some(dep) => {
                    frame.next_dep += 1;
                    if let Err(e) = self.enter(dep, ctx) {
                        self.unwind(ctx);
                        return Err(e);
                    }
                }
                None => {
                    let already_resolved = frame.already_resolved;
                    ctx.stack.pop();
                    self.finish(idx, already_resolved, ctx);
                }
            }
        }
        Ok(())
    }

    /// Push `idx` onto the active path unless it is already finished.
    fn enter(&mut self, idx: usize, ctx: &mut ResolutionContext) -> BootResult<()> {
        match ctx.marks.get(&idx) {
            Some(Mark::Visited) => return Ok(()),
            Some(Mark::Visiting) => {
                return Err(BootError::CycleDetected {
                    node: self.nodes[idx].id,
                })
            }
            None => {}
        }
        ctx.marks.insert(idx, Mark::Visiting);

        let already_resolved = self.nodes[idx].is_resolved();
        if !already_resolved {
            self.nodes[idx].state = NodeState::Resolving;
        }
        ctx.stack.push(Frame {
            idx,
            next_dep: 0,
            already_resolved,
        });
        Ok(())
    }

    /// All dependencies done: run the action once and append to the order.
    fn finish(&mut self, idx: usize, already_resolved: bool, ctx: &mut ResolutionContext) {
        if !already_resolved {
            if let Some(action) = self.actions.get_mut(&idx) {
                action(&self.nodes[idx]);
                ctx.actions_invoked += 1;
            }
            self.nodes[idx].state = NodeState::Resolved;
            debug!(
                node = %self.nodes[idx].id,
                level = %self.nodes[idx].level,
                "Node resolved"
            );
        }

        ctx.marks.insert(idx, Mark::Visited);
        ctx.order.push(self.nodes[idx].id);
    }

    /// Fail every node left on the active path.
    fn unwind(&mut self, ctx: &mut ResolutionContext) {
        while let Some(frame) = ctx.stack.pop() {
            if !frame.already_resolved {
                self.nodes[frame.idx].state = NodeState::Failed;
            }
        }
    }

    // ── Rendering ───────────────────────────────────────────────────

    /// Indented dump of the graph from the root, one node per line.
    ///
    /// A node already printed elsewhere is marked `(shown above)` and its
    /// dependencies are not repeated. A node on the current path is marked
    /// `(cycle)`.
    pub fn render_tree(&self) -> String {
        enum Step {
            Enter(usize, usize),
            Leave(usize),
        }

        let mut out = String::new();
        let Some(root) = self.root else {
            return out;
        };
        let mut path = HashSet::new();
        let mut rendered = HashSet::new();
        let mut steps = vec![Step::Enter(root, 0)];

        while let Some(step) = steps.pop() {
            let (idx, depth) = match step {
                Step::Leave(idx) => {
                    path.remove(&idx);
                    continue;
                }
                Step::Enter(idx, depth) => (idx, depth),
            };

            let node = &self.nodes[idx];
            out.push_str(&"  ".repeat(depth));
            out.push_str(&format!("{} [{}] ", node.id, node.level));
            if let Some(label) = &node.label {
                out.push_str(label);
                out.push(' ');
            }
            if path.contains(&idx) {
                out.push_str("(cycle)\n");
                continue;
            }
            if !rendered.insert(idx) {
                out.push_str("(shown above)\n");
                continue;
            }
            out.push_str(&format!("({})\n", node.state));

            path.insert(idx);
            steps.push(Step::Leave(idx));
            for &dep in node.dependencies.iter().rev() {
                steps.push(Step::Enter(dep, depth + 1));
            }
        }
        out
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("nodes", &self.nodes)
            .field("root", &self.root)
            .field("actions", &self.actions.len())
            .field("resolved_count", &self.resolved_count)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn position(order: &[NodeId], id: u32) -> usize {
        order.iter().position(|n| *n == NodeId(id)).unwrap()
    }

    #[test]
    fn reference_tree_shape() {
        let graph = DependencyGraph::reference();
        assert_eq!(graph.node_count(), 8);
        assert_eq!(graph.max_depth(), 3);
        assert_eq!(graph.root().unwrap().id(), NodeId(0));
        assert_eq!(
            graph.dependencies_of(NodeId(1)).unwrap(),
            vec![NodeId(2), NodeId(4), NodeId(6)]
        );
        assert_eq!(graph.node(NodeId(5)).unwrap().label(), Some("Console"));
    }

    #[test]
    fn resolve_reference_tree_dependencies_first() {
        let mut graph = DependencyGraph::reference();
        let count = graph.resolve().unwrap();
        assert_eq!(count, 8);
        assert_eq!(graph.resolved_count(), 8);

        let order = graph.resolution_order().to_vec();
        assert_eq!(order.len(), 8);
        for node in graph.nodes() {
            let at = position(&order, node.id().0);
            for dep in graph.dependencies_of(node.id()).unwrap() {
                assert!(position(&order, dep.0) < at, "{} before {}", dep, node.id());
            }
            assert!(node.is_resolved());
        }
        assert_eq!(*order.last().unwrap(), NodeId(0));
    }

    #[test]
    fn reference_order_is_deterministic() {
        let mut graph = DependencyGraph::reference();
        graph.resolve().unwrap();
        let ids: Vec<u32> = graph.resolution_order().iter().map(|n| n.0).collect();
        assert_eq!(ids, vec![3, 2, 5, 4, 7, 6, 1, 0]);
    }

    #[test]
    fn back_edge_is_detected() {
        let specs = reference_node_specs();
        let mut graph = DependencyGraph::build(&specs, &[(NodeId(3), NodeId(0))]).unwrap();

        let err = graph.resolve().unwrap_err();
        assert_eq!(err, BootError::CycleDetected { node: NodeId(0) });
        for id in [0, 1, 2, 3] {
            let node = graph.node(NodeId(id)).unwrap();
            assert!(!node.is_resolved());
            assert_eq!(node.state(), NodeState::Failed);
        }
        // Never reached.
        assert_eq!(graph.node(NodeId(5)).unwrap().state(), NodeState::Unresolved);
    }

    #[test]
    fn earlier_branches_keep_resolved_state_after_cycle() {
        let specs = reference_node_specs();
        // Cycle inside the file-system branch: 7 → 6.
        let mut graph = DependencyGraph::build(&specs, &[(NodeId(7), NodeId(6))]).unwrap();

        let err = graph.resolve().unwrap_err();
        assert_eq!(err, BootError::CycleDetected { node: NodeId(6) });

        for id in [2, 3, 4, 5] {
            assert!(graph.node(NodeId(id)).unwrap().is_resolved());
        }
        for id in [0, 1, 6, 7] {
            assert_eq!(graph.node(NodeId(id)).unwrap().state(), NodeState::Failed);
        }
        assert_eq!(graph.resolved_count(), 4);
        assert_eq!(graph.resolution_order().len(), 4);
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let mut graph = DependencyGraph::build(
            &[NodeSpec::new(0, TreeLevel::Root, None)],
            &[(NodeId(0), NodeId(0))],
        )
        .unwrap();
        assert_eq!(
            graph.resolve().unwrap_err(),
            BootError::CycleDetected { node: NodeId(0) }
        );
    }

    #[test]
    fn empty_graph_reports_missing_root() {
        let mut graph = DependencyGraph::build(&[], &[]).unwrap();
        assert_eq!(graph.resolve().unwrap_err(), BootError::MissingRoot);
        assert_eq!(graph.resolved_count(), 0);
    }

    #[test]
    fn rootless_graph_reports_missing_root() {
        let specs = vec![
            NodeSpec::new(0, TreeLevel::Trunk, Some(1)),
            NodeSpec::new(1, TreeLevel::Trunk, Some(0)),
        ];
        let mut graph = DependencyGraph::build(&specs, &[]).unwrap();
        assert_eq!(graph.resolve().unwrap_err(), BootError::MissingRoot);
    }

    #[test]
    fn build_rejects_duplicates_unknowns_and_multiple_roots() {
        let dup = vec![
            NodeSpec::new(0, TreeLevel::Root, None),
            NodeSpec::new(0, TreeLevel::Leaf, Some(0)),
        ];
        assert_eq!(
            DependencyGraph::build(&dup, &[]).unwrap_err(),
            BootError::DuplicateNode(NodeId(0))
        );

        let unknown = vec![
            NodeSpec::new(0, TreeLevel::Root, None),
            NodeSpec::new(1, TreeLevel::Leaf, Some(9)),
        ];
        assert_eq!(
            DependencyGraph::build(&unknown, &[]).unwrap_err(),
            BootError::UnknownNode(NodeId(9))
        );

        let roots = vec![
            NodeSpec::new(0, TreeLevel::Root, None),
            NodeSpec::new(1, TreeLevel::Root, None),
        ];
        assert_eq!(
            DependencyGraph::build(&roots, &[]).unwrap_err(),
            BootError::MultipleRoots(vec![NodeId(0), NodeId(1)])
        );

        let bad_edge = vec![NodeSpec::new(0, TreeLevel::Root, None)];
        assert_eq!(
            DependencyGraph::build(&bad_edge, &[(NodeId(0), NodeId(4))]).unwrap_err(),
            BootError::UnknownNode(NodeId(4))
        );
    }

    #[test]
    fn actions_run_once_in_resolution_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut graph = DependencyGraph::reference();
        for id in 0..8 {
            let seen = Arc::clone(&seen);
            graph
                .set_action(NodeId(id), move |node| {
                    assert_eq!(node.state(), NodeState::Resolving);
                    seen.lock().unwrap().push(node.id());
                })
                .unwrap();
        }

        graph.resolve().unwrap();
        assert_eq!(*seen.lock().unwrap(), graph.resolution_order());
    }

    #[test]
    fn re_resolution_is_idempotent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut graph = DependencyGraph::reference();
        for id in 0..8 {
            let calls = Arc::clone(&calls);
            graph
                .set_action(NodeId(id), move |_| {
                    calls.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }

        let mut ctx = ResolutionContext::new();
        let first = graph.resolve_with(&mut ctx).unwrap();
        let first_order = graph.resolution_order().to_vec();
        assert_eq!(ctx.actions_invoked(), 8);

        let second = graph.resolve_with(&mut ctx).unwrap();
        assert_eq!(first, second);
        assert_eq!(graph.resolution_order(), first_order.as_slice());
        assert_eq!(ctx.actions_invoked(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 8);
        assert!(graph.nodes().all(|n| n.state() == NodeState::Resolved));
    }

    fn chain(len: u32) -> Vec<NodeSpec> {
        (0..len)
            .map(|id| {
                let parent = id.checked_sub(1);
                let level = if parent.is_none() { TreeLevel::Root } else { TreeLevel::Leaf };
                NodeSpec::new(id, level, parent)
            })
            .collect()
    }

    /// Layers of diamonds: each layer's top requires two middles that both
    /// require the next layer's top.
    fn stacked_diamonds(layers: u32) -> (Vec<NodeSpec>, Vec<(NodeId, NodeId)>) {
        let mut specs = vec![NodeSpec::new(0, TreeLevel::Root, None)];
        let mut edges = Vec::new();
        for layer in 0..layers {
            let top = layer * 3;
            let (left, right, next) = (top + 1, top + 2, top + 3);
            specs.push(NodeSpec::new(left, TreeLevel::Branch, Some(top)));
            specs.push(NodeSpec::new(right, TreeLevel::Branch, Some(top)));
            specs.push(NodeSpec::new(next, TreeLevel::Leaf, Some(left)));
            edges.push((NodeId(right), NodeId(next)));
        }
        (specs, edges)
    }

    #[test]
    fn long_chain_resolves_without_recursion() {
        let len = 200_000;
        let mut graph = DependencyGraph::build(&chain(len), &[]).unwrap();
        assert_eq!(graph.resolve().unwrap(), len as usize);

        let order = graph.resolution_order();
        assert_eq!(order.first(), Some(&NodeId(len - 1)));
        assert_eq!(order.last(), Some(&NodeId(0)));
        assert_eq!(graph.max_depth(), len as usize - 1);
        assert!(graph.nodes().all(|n| n.is_resolved()));
    }

    #[test]
    fn long_chain_cycle_fails_whole_path() {
        let len = 150_000;
        let mut graph =
            DependencyGraph::build(&chain(len), &[(NodeId(len - 1), NodeId(0))]).unwrap();
        assert_eq!(
            graph.resolve().unwrap_err(),
            BootError::CycleDetected { node: NodeId(0) }
        );
        assert!(graph.nodes().all(|n| n.state() == NodeState::Failed));
        assert_eq!(graph.resolved_count(), 0);
    }

    #[test]
    fn render_tree_prints_shared_dependencies_once() {
        let (specs, edges) = stacked_diamonds(20);
        let mut graph = DependencyGraph::build(&specs, &edges).unwrap();
        let rendered = graph.render_tree();
        // Every node once, plus one repeat line per diamond.
        assert_eq!(rendered.lines().count(), specs.len() + 20);
        assert_eq!(rendered.matches("(shown above)").count(), 20);
        assert!(!rendered.contains("(cycle)"));

        assert_eq!(graph.resolve().unwrap(), specs.len());
    }

    #[test]
    fn shared_dependency_resolves_once() {
        // Diamond: 0 → 1, 0 → 2, 1 → 3, 2 → 3.
        let specs = vec![
            NodeSpec::new(0, TreeLevel::Root, None),
            NodeSpec::new(1, TreeLevel::Branch, Some(0)),
            NodeSpec::new(2, TreeLevel::Branch, Some(0)),
            NodeSpec::new(3, TreeLevel::Leaf, Some(1)),
        ];
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut graph = DependencyGraph::build(&specs, &[(NodeId(2), NodeId(3))])
            .unwrap()
            .with_action(NodeId(3), move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        assert_eq!(graph.resolve().unwrap(), 4);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(graph.max_depth(), 2);
    }

    #[test]
    fn create_boot_graph_from_tuples() {
        let graph = create_boot_graph(&reference_tree_spec()).unwrap();
        assert_eq!(graph.node_count(), 8);
        assert_eq!(graph.max_depth(), 3);
        assert!(graph.node(NodeId(0)).unwrap().label().is_none());
    }

    #[test]
    fn add_dependency_updates_depth() {
        let mut graph = DependencyGraph::build(
            &[
                NodeSpec::new(0, TreeLevel::Root, None),
                NodeSpec::new(1, TreeLevel::Trunk, Some(0)),
                NodeSpec::new(2, TreeLevel::Leaf, Some(0)),
            ],
            &[],
        )
        .unwrap();
        assert_eq!(graph.max_depth(), 1);
        graph.add_dependency(NodeId(2), NodeId(1)).unwrap();
        assert_eq!(graph.max_depth(), 1);
        assert!(graph.add_dependency(NodeId(2), NodeId(8)).is_err());
    }

    #[test]
    fn render_tree_marks_cycles() {
        let graph = DependencyGraph::reference();
        let rendered = graph.render_tree();
        assert_eq!(rendered.lines().count(), 8);
        assert!(rendered.starts_with("node:0 [root] Kernel Root (unresolved)"));
        assert!(rendered.contains("      node:3 [leaf] Timer (unresolved)"));

        let cyclic =
            DependencyGraph::build(&reference_node_specs(), &[(NodeId(3), NodeId(0))]).unwrap();
        assert!(cyclic.render_tree().contains("(cycle)"));
    }
}
