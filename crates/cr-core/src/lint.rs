//! Lint diagnostics for a built scene.
//!
//! Reports structural issues the engine itself does not enforce, without
//! modifying the graph.

use crate::graph::{Behavior, SceneGraph};
use crate::id::NodeId;
use std::collections::{HashMap, HashSet};

// ─── Diagnostic types ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Likely a mistake.
    Warning,
    Info,
}

/// A single lint diagnostic for a scene node.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDiagnostic {
    pub node_id: NodeId,
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (`duplicate-light`, `orphan-node`).
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the scene graph.
#[must_use]
pub fn lint_scene<B: Behavior>(graph: &SceneGraph<B>) -> Vec<SceneDiagnostic> {
    let mut diags = Vec::new();
    lint_duplicate_lights(graph, &mut diags);
    lint_orphans(graph, &mut diags);
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

/// Two reachable nodes driving the same light slot fight over it.
fn lint_duplicate_lights<B: Behavior>(graph: &SceneGraph<B>, diags: &mut Vec<SceneDiagnostic>) {
    let mut owners: HashMap<u8, NodeId> = HashMap::new();
    for idx in graph.descendants(graph.root()) {
        let node = &graph[idx];
        let Some(slot) = node.light() else { continue };
        match owners.get(&slot.index()) {
            Some(first) => diags.push(SceneDiagnostic {
                node_id: node.id,
                message: format!(
                    "`{}` claims light {} already driven by `{}`",
                    node.id,
                    slot.index(),
                    first
                ),
                severity: LintSeverity::Warning,
                rule: "duplicate-light",
            }),
            None => {
                owners.insert(slot.index(), node.id);
            }
        }
    }
}

/// Nodes left in the arena but never attached are neither updated nor drawn.
fn lint_orphans<B: Behavior>(graph: &SceneGraph<B>, diags: &mut Vec<SceneDiagnostic>) {
    let reachable: HashSet<_> = graph.descendants(graph.root()).into_iter().collect();
    let mut orphans: Vec<_> = graph
        .node_indices()
        .filter(|idx| !reachable.contains(idx))
        .collect();
    orphans.sort();
    for idx in orphans {
        let id = graph[idx].id;
        diags.push(SceneDiagnostic {
            node_id: id,
            message: format!("`{id}` is not reachable from the scene root"),
            severity: LintSeverity::Info,
            rule: "orphan-node",
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;
    use crate::image::ImageTable;
    use crate::lighting::LightSlot;

    struct Plain;

    impl Behavior for Plain {
        type Frame = ();
    }

    fn node(label: &str) -> Node<Plain> {
        Node::new(NodeId::intern(label), Plain)
    }

    #[test]
    fn clean_scene_has_no_diagnostics() {
        let mut g = SceneGraph::new(node("l_root"), ImageTable::sequential(0));
        let root = g.root();
        g.add_node(root, node("l_lamp").with_light(LightSlot::new(0).unwrap()));
        assert!(lint_scene(&g).is_empty());
    }

    #[test]
    fn reports_shared_light_slot() {
        let mut g = SceneGraph::new(node("l2_root"), ImageTable::sequential(0));
        let root = g.root();
        let slot = LightSlot::new(3).unwrap();
        g.add_node(root, node("l2_a").with_light(slot));
        g.add_node(root, node("l2_b").with_light(slot));
        let diags = lint_scene(&g);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, "duplicate-light");
        assert_eq!(diags[0].node_id.as_str(), "l2_b");
    }

    #[test]
    fn reports_detached_nodes() {
        let mut g = SceneGraph::new(node("l3_root"), ImageTable::sequential(0));
        g.spawn(node("l3_loose"));
        let diags = lint_scene(&g);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, "orphan-node");
        assert_eq!(diags[0].severity, LintSeverity::Info);
    }
}
