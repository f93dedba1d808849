//! The scene-graph engine: an arena of nodes, each with a transform stack,
//! an ordered child list, an optional light slot, and a behavior payload.
//!
//! Traversals:
//! - [`SceneGraph::update`] runs children first, then the node's own
//!   [`Behavior::change`], so a parent sees its children's new state.
//! - [`SceneGraph::render`] saves the frame, applies the node's transforms,
//!   depicts the node, renders children, and restores the frame.
//! - [`SceneGraph::enable`] walks the tree the same way as render and
//!   switches each node's light on before its children, so the light sits
//!   in its node's frame.
//! - [`SceneGraph::disable`] switches lights off after their children. It
//!   issues no frame or transform calls.
//!
//! Transform order: the last-pushed transform is the outermost frame. It is
//! handed to the context first, so later pushes act relative to what was
//! already on the stack.

use crate::draw::DrawContext;
use crate::id::NodeId;
use crate::image::ImageTable;
use crate::lighting::{LightSlot, LightSource};
use crate::transform::{Transform, compose};

use glam::Mat4;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::ops::{Index, IndexMut};

// ─── Node ────────────────────────────────────────────────────────────────

/// A single element of the scene graph.
#[derive(Debug, Clone)]
pub struct Node<B> {
    /// Label used for lookup and logging.
    pub id: NodeId,

    /// Per-kind state and hooks.
    pub behavior: B,

    transforms: SmallVec<[Transform; 4]>,
    light: Option<LightSlot>,
    children: SmallVec<[NodeIndex; 4]>,
}

impl<B> Node<B> {
    pub fn new(id: NodeId, behavior: B) -> Self {
        Self {
            id,
            behavior,
            transforms: SmallVec::new(),
            light: None,
            children: SmallVec::new(),
        }
    }

    /// Builder form of [`set_light`](Self::set_light).
    #[must_use]
    pub fn with_light(mut self, slot: LightSlot) -> Self {
        self.light = Some(slot);
        self
    }

    /// Builder form of [`push_transform`](Self::push_transform).
    #[must_use]
    pub fn with_transform(mut self, t: Transform) -> Self {
        self.transforms.push(t);
        self
    }

    pub fn push_transform(&mut self, t: Transform) {
        self.transforms.push(t);
    }

    pub fn pop_transform(&mut self) -> Option<Transform> {
        self.transforms.pop()
    }

    /// Drop every transform pushed after the first `len`.
    pub fn truncate_transforms(&mut self, len: usize) {
        self.transforms.truncate(len);
    }

    /// The stack, bottom first.
    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    pub fn light(&self) -> Option<LightSlot> {
        self.light
    }

    /// Claim (or release) a light slot. At most one reachable node should
    /// claim a given slot; see `lint::lint_scene`.
    pub fn set_light(&mut self, slot: Option<LightSlot>) {
        self.light = slot;
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }
}

// ─── Behavior ────────────────────────────────────────────────────────────

/// The per-kind hooks a node payload provides. Implemented by a closed enum
/// of node kinds; every hook has an empty default.
pub trait Behavior: Sized {
    /// Explicit per-frame state handed to every hook.
    type Frame;

    /// State change for the node at `idx`. Runs after all of its children
    /// have changed. May restructure the subtree below `idx`.
    fn change(graph: &mut SceneGraph<Self>, idx: NodeIndex, frame: &mut Self::Frame) {
        let _ = (graph, idx, frame);
    }

    /// Draw this node (not its children) in its own frame.
    fn depict(&self, ctx: &mut dyn DrawContext, images: &ImageTable, frame: &Self::Frame) {
        let _ = (ctx, images, frame);
    }

    /// The light this node emits when it holds a light slot.
    fn light_source(&self) -> Option<LightSource> {
        None
    }
}

// ─── Scene Graph ─────────────────────────────────────────────────────────

/// An owned tree of [`Node`]s stored in a `petgraph` arena.
///
/// Edges go from parent to child; each node also keeps its ordered child
/// list. A node has at most one parent. Nodes created with
/// [`spawn`](Self::spawn) stay detached until [`add`](Self::add)ed.
#[derive(Debug, Clone)]
pub struct SceneGraph<B> {
    graph: StableDiGraph<Node<B>, ()>,
    root: NodeIndex,
    images: ImageTable,
    id_index: HashMap<NodeId, NodeIndex>,
}

impl<B: Behavior> SceneGraph<B> {
    pub fn new(root: Node<B>, images: ImageTable) -> Self {
        let mut graph = StableDiGraph::new();
        let id = root.id;
        let root = graph.add_node(root);

        let mut id_index = HashMap::new();
        id_index.insert(id, root);

        Self {
            graph,
            root,
            images,
            id_index,
        }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// The shared image table every node draws with.
    pub fn images(&self) -> &ImageTable {
        &self.images
    }

    /// Put a node in the arena without attaching it.
    pub fn spawn(&mut self, node: Node<B>) -> NodeIndex {
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.id_index.insert(id, idx);
        idx
    }

    /// Spawn `node` and attach it as the last child of `parent`.
    pub fn add_node(&mut self, parent: NodeIndex, node: Node<B>) -> NodeIndex {
        let idx = self.spawn(node);
        self.add(parent, idx);
        idx
    }

    /// Append `child` to `parent`'s children. Adding a child that is already
    /// there is a no-op. A child owned by another parent is moved. Returns
    /// whether anything changed.
    pub fn add(&mut self, parent: NodeIndex, child: NodeIndex) -> bool {
        if self.graph[parent].children.contains(&child) {
            return false;
        }
        if parent == child || self.is_ancestor(child, parent) {
            log::warn!(
                "refusing to add {:?} under {:?}: it would create a cycle",
                self.graph[child].id,
                self.graph[parent].id
            );
            return false;
        }
        if let Some(old) = self.parent(child) {
            self.detach(old, child);
        }
        self.graph.add_edge(parent, child, ());
        self.graph[parent].children.push(child);
        true
    }

    /// Detach the first occurrence of `child` from `parent`. The child stays
    /// in the arena (see [`remove_subtree`](Self::remove_subtree)). Returns
    /// whether it was there.
    pub fn remove(&mut self, parent: NodeIndex, child: NodeIndex) -> bool {
        if !self.graph[parent].children.contains(&child) {
            return false;
        }
        self.detach(parent, child);
        true
    }

    fn detach(&mut self, parent: NodeIndex, child: NodeIndex) {
        let children = &mut self.graph[parent].children;
        if let Some(pos) = children.iter().position(|c| *c == child) {
            children.remove(pos);
        }
        if let Some(edge) = self.graph.find_edge(parent, child) {
            self.graph.remove_edge(edge);
        }
    }

    /// Tear down `idx` and everything below it. Returns the removed nodes
    /// in pre-order. The root cannot be removed.
    pub fn remove_subtree(&mut self, idx: NodeIndex) -> Vec<Node<B>> {
        if idx == self.root {
            log::warn!("refusing to remove the scene root");
            return Vec::new();
        }
        if let Some(parent) = self.parent(idx) {
            self.detach(parent, idx);
        }
        let doomed = self.descendants(idx);
        let mut removed = Vec::with_capacity(doomed.len());
        for i in doomed {
            if let Some(node) = self.graph.remove_node(i) {
                if self.id_index.get(&node.id) == Some(&i) {
                    self.id_index.remove(&node.id);
                }
                removed.push(node);
            }
        }
        removed
    }

    pub fn contains(&self, idx: NodeIndex) -> bool {
        self.graph.contains_node(idx)
    }

    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    /// Children of `idx` in insertion order.
    pub fn children(&self, idx: NodeIndex) -> &[NodeIndex] {
        self.graph[idx].children()
    }

    /// Whether `ancestor` lies on the path from `idx` up to its top.
    pub fn is_ancestor(&self, ancestor: NodeIndex, idx: NodeIndex) -> bool {
        let mut current = idx;
        while let Some(parent) = self.parent(current) {
            if parent == ancestor {
                return true;
            }
            current = parent;
        }
        false
    }

    /// `idx` followed by all its descendants, pre-order.
    pub fn descendants(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack = vec![idx];
        while let Some(i) = stack.pop() {
            out.push(i);
            stack.extend(self.graph[i].children.iter().rev().copied());
        }
        out
    }

    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    pub fn get_by_id(&self, id: NodeId) -> Option<&Node<B>> {
        self.index_of(id).map(|idx| &self.graph[idx])
    }


    pub fn get(&self, idx: NodeIndex) -> Option<&Node<B>> {
        self.graph.node_weight(idx)
    }

    pub fn get_mut(&mut self, idx: NodeIndex) -> Option<&mut Node<B>> {
        self.graph.node_weight_mut(idx)
    }

    /// Every node in the arena, attached or not.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Matrix mapping `idx`'s local frame to the frame of the tree's top.
    pub fn world_transform(&self, idx: NodeIndex) -> Mat4 {
        let mut matrix = compose(self.graph[idx].transforms());
        let mut current = idx;
        while let Some(parent) = self.parent(current) {
            matrix = compose(self.graph[parent].transforms()) * matrix;
            current = parent;
        }
        matrix
    }

    // ─── Traversals ──────────────────────────────────────────────────────

    /// Update the whole tree.
    pub fn update(&mut self, frame: &mut B::Frame) {
        self.update_from(self.root, frame);
    }

    /// Update the subtree at `idx`: children first, then `idx` itself.
    pub fn update_from(&mut self, idx: NodeIndex, frame: &mut B::Frame) {
        let children = self.graph[idx].children.clone();
        for child in children {
            // An earlier sibling's change may have torn this one down.
            if self.graph.contains_node(child) {
                self.update_from(child, frame);
            }
        }
        B::change(self, idx, frame);
    }

    /// Render the whole tree. Leaves the context's frame depth unchanged.
    pub fn render(&self, ctx: &mut dyn DrawContext, frame: &B::Frame) {
        self.render_from(self.root, ctx, frame);
    }

    pub fn render_from(&self, idx: NodeIndex, ctx: &mut dyn DrawContext, frame: &B::Frame) {
        let node = &self.graph[idx];
        ctx.push_frame();
        for t in node.transforms.iter().rev() {
            t.apply_forward(ctx);
        }
        node.behavior.depict(ctx, &self.images, frame);
        for &child in &node.children {
            self.render_from(child, ctx, frame);
        }
        ctx.pop_frame();
    }

    /// Switch on every light in the tree, parents before children.
    pub fn enable(&self, ctx: &mut dyn DrawContext) {
        self.enable_from(self.root, ctx);
    }

    pub fn enable_from(&self, idx: NodeIndex, ctx: &mut dyn DrawContext) {
        let node = &self.graph[idx];
        ctx.push_frame();
        for t in node.transforms.iter().rev() {
            t.apply_forward(ctx);
        }
        if let Some(slot) = node.light
            && let Some(source) = node.behavior.light_source()
        {
            log::trace!("light {} on ({})", slot.index(), node.id);
            ctx.enable_light(slot, &source);
        }
        for &child in &node.children {
            self.enable_from(child, ctx);
        }
        ctx.pop_frame();
    }

    /// Switch off every light in the tree, children before parents. Leaves
    /// the context's frame untouched.
    pub fn disable(&self, ctx: &mut dyn DrawContext) {
        self.disable_from(self.root, ctx);
    }

    pub fn disable_from(&self, idx: NodeIndex, ctx: &mut dyn DrawContext) {
        let node = &self.graph[idx];
        for &child in &node.children {
            self.disable_from(child, ctx);
        }
        if let Some(slot) = node.light {
            log::trace!("light {} off ({})", slot.index(), node.id);
            ctx.disable_light(slot);
        }
    }
}

impl<B> Index<NodeIndex> for SceneGraph<B> {
    type Output = Node<B>;

    fn index(&self, idx: NodeIndex) -> &Node<B> {
        &self.graph[idx]
    }
}

impl<B> IndexMut<NodeIndex> for SceneGraph<B> {
    fn index_mut(&mut self, idx: NodeIndex) -> &mut Node<B> {
        &mut self.graph[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::draw::RecordingContext;
    use glam::Vec3;

    #[derive(Debug, Clone, Default)]
    struct Tracer {
        glow: bool,
    }

    impl Behavior for Tracer {
        type Frame = Vec<NodeId>;

        fn change(graph: &mut SceneGraph<Self>, idx: NodeIndex, frame: &mut Vec<NodeId>) {
            frame.push(graph[idx].id);
        }

        fn light_source(&self) -> Option<LightSource> {
            self.glow
                .then(|| LightSource::point(0.0, 0.0, 0.0, Color::WHITE))
        }
    }

    fn node(label: &str) -> Node<Tracer> {
        Node::new(NodeId::intern(label), Tracer::default())
    }

    fn tree() -> (SceneGraph<Tracer>, NodeIndex, NodeIndex, NodeIndex) {
        let mut g = SceneGraph::new(node("t_root"), ImageTable::sequential(1));
        let root = g.root();
        let a = g.add_node(root, node("t_a"));
        let b = g.add_node(root, node("t_b"));
        let a1 = g.add_node(a, node("t_a1"));
        (g, a, b, a1)
    }

    #[test]
    fn update_runs_children_before_parent() {
        let (mut g, ..) = tree();
        let mut order = Vec::new();
        g.update(&mut order);
        let labels: Vec<&str> = order.iter().map(|id| id.as_str()).collect();
        assert_eq!(labels, ["t_a1", "t_a", "t_b", "t_root"]);
    }

    #[test]
    fn add_is_idempotent_and_remove_is_first_match() {
        let (mut g, a, b, _) = tree();
        let root = g.root();
        assert!(!g.add(root, a));
        assert_eq!(g.children(root), &[a, b]);
        assert!(g.remove(root, a));
        assert!(!g.remove(root, a));
        assert_eq!(g.children(root), &[b]);
        assert!(g.contains(a));
    }

    #[test]
    fn add_moves_a_child_between_parents() {
        let (mut g, a, b, a1) = tree();
        assert!(g.add(b, a1));
        assert!(g.children(a).is_empty());
        assert_eq!(g.parent(a1), Some(b));
    }

    #[test]
    fn add_refuses_cycles() {
        let (mut g, a, _, a1) = tree();
        assert!(!g.add(a1, a));
        assert!(!g.add(a, a));
        assert_eq!(g.parent(a), Some(g.root()));
    }

    #[test]
    fn remove_subtree_drops_descendants() {
        let (mut g, a, _, a1) = tree();
        let removed = g.remove_subtree(a);
        assert_eq!(removed.len(), 2);
        assert!(!g.contains(a1));
        assert!(g.index_of(NodeId::intern("t_a1")).is_none());
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn render_balances_frames_and_applies_top_of_stack_first() {
        let (mut g, a, _, a1) = tree();
        g[a].push_transform(Transform::translate(10.0, 0.0, 0.0));
        g[a].push_transform(Transform::scale(2.0, 2.0, 2.0));
        g[a1].push_transform(Transform::translate(1.0, 0.0, 0.0));

        let mut ctx = RecordingContext::new();
        g.render(&mut ctx, &Vec::new());
        assert_eq!(ctx.depth(), 0);
        assert_eq!(ctx.max_depth(), 3);

        // Scale (last pushed) is outermost: the translate is scaled too.
        let world = g.world_transform(a1);
        assert_eq!(world.transform_point3(Vec3::ZERO), Vec3::new(22.0, 0.0, 0.0));
    }

    #[test]
    fn lights_follow_their_node() {
        let (mut g, a, _, a1) = tree();
        g[a].push_transform(Transform::translate(0.0, 3.0, 0.0));
        g[a1].behavior.glow = true;
        g[a1].set_light(LightSlot::new(1));

        let mut ctx = RecordingContext::new();
        g.enable(&mut ctx);
        assert_eq!(ctx.lit(), &[LightSlot::new(1).unwrap()]);
        assert_eq!(ctx.depth(), 0);
        match &ctx.commands()[0] {
            crate::draw::DrawCommand::LightOn { model, .. } => {
                assert_eq!(model.transform_point3(Vec3::ZERO), Vec3::new(0.0, 3.0, 0.0));
            }
            other => panic!("expected LightOn, got {other:?}"),
        }
        g.disable(&mut ctx);
        assert!(ctx.lit().is_empty());
    }

    #[test]
    fn disable_only_switches_lights_off() {
        let (mut g, a, _, a1) = tree();
        g[a].push_transform(Transform::translate(0.0, 3.0, 0.0));
        g[a1].set_light(LightSlot::new(4));

        let mut ctx = RecordingContext::new();
        g.disable(&mut ctx);
        assert_eq!(ctx.max_depth(), 0);
        assert_eq!(ctx.current(), Mat4::IDENTITY);
        assert_eq!(
            ctx.commands(),
            &[crate::draw::DrawCommand::LightOff(LightSlot::new(4).unwrap())]
        );
        assert!(g.get_by_id(NodeId::intern("t_a1")).is_some());
    }
}
