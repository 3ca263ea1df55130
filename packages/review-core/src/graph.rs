//! Evidence graph builder.
//!
//! Turns the two candidate authors plus their shared collaborators into a
//! node/link model a renderer can lay out. Layout and drawing are not done
//! here. The graph is always derived locally from the raw evidence list.

use review_api_client::SharedCoauthor;
use serde::Serialize;

/// Identifier of the first candidate's anchor node.
pub const ANCHOR_A: &str = "A";
/// Identifier of the second candidate's anchor node.
pub const ANCHOR_B: &str = "B";

/// Size of an anchor node.
pub const ANCHOR_NODE_SIZE: u32 = 8;
/// Minimum size of a shared-collaborator node; overlap is added on top.
pub const BASE_NODE_SIZE: u32 = 4;
/// Weight of the direct link between the two anchors.
pub const DIRECT_LINK_WEIGHT: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeGroup {
    /// One of the two candidate authors
    Anchor,
    /// A collaborator shared by both candidates
    Shared,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    pub group: NodeGroup,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub weight: u32,
    /// Joint publication count, absent for the direct candidate link
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvidenceGraph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl EvidenceGraph {
    /// Shared-collaborator nodes only, in evidence order.
    pub fn shared_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|n| n.group == NodeGroup::Shared)
    }

    /// Whether the graph carries any evidence beyond the candidate pair itself.
    pub fn has_evidence(&self) -> bool {
        self.nodes.len() > 2
    }

    /// Weight of the link from `source` to `target`, if one exists.
    pub fn weight_between(&self, source: &str, target: &str) -> Option<u32> {
        self.links
            .iter()
            .find(|l| l.source == source && l.target == target)
            .map(|l| l.weight)
    }
}

/// Build the evidence graph for a candidate pair.
///
/// Always yields `2 + shared.len()` nodes and `1 + 2 * shared.len()` links,
/// in input order.
pub fn build_graph(name_a: &str, name_b: &str, shared: &[SharedCoauthor]) -> EvidenceGraph {
    let mut nodes = Vec::with_capacity(2 + shared.len());
    let mut links = Vec::with_capacity(1 + 2 * shared.len());

    nodes.push(anchor(ANCHOR_A, name_a));
    nodes.push(anchor(ANCHOR_B, name_b));
    links.push(GraphLink {
        source: ANCHOR_A.to_string(),
        target: ANCHOR_B.to_string(),
        weight: DIRECT_LINK_WEIGHT,
        label: None,
    });

    for (i, coauthor) in shared.iter().enumerate() {
        let id = format!("shared_{}", i);
        let overlap = coauthor.total_overlap.unwrap_or(0);

        nodes.push(GraphNode {
            id: id.clone(),
            name: coauthor.name.clone(),
            group: NodeGroup::Shared,
            size: BASE_NODE_SIZE.saturating_add(overlap),
        });
        links.push(counted_link(ANCHOR_A, &id, coauthor.count_a));
        links.push(counted_link(ANCHOR_B, &id, coauthor.count_b));
    }

    EvidenceGraph { nodes, links }
}

fn anchor(id: &str, name: &str) -> GraphNode {
    GraphNode {
        id: id.to_string(),
        name: name.to_string(),
        group: NodeGroup::Anchor,
        size: ANCHOR_NODE_SIZE,
    }
}

fn counted_link(source: &str, target: &str, count: u32) -> GraphLink {
    GraphLink {
        source: source.to_string(),
        target: target.to_string(),
        weight: count,
        label: Some(count.to_string()),
    }
}
