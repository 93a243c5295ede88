//! Arena of bundle nodes.
//!
//! Leaves are the input edges. Every MINGLE pass replaces each merged group with one new node
//! whose coordinates are the group's shared waypoints and whose `parents` are the group members.
//! Nodes are never removed from the arena, so the merge history stays a tree indexed by `NodeIx`.

use crate::geom::{self, Vec2};
use focal_graphlib::EdgeId;

pub(crate) type NodeIx = usize;

#[derive(Debug, Clone)]
pub(crate) struct BundleNode {
    /// `[x1, y1, x2, y2]`: segment endpoints for leaves, `[m1, m2]` waypoints for bundles.
    pub coords: [f64; 4],
    pub parents: Vec<NodeIx>,
    pub edge: Option<EdgeId>,
    /// Ink below this node's own waypoints.
    pub sub_ink: f64,
}

impl BundleNode {
    pub fn start(&self) -> Vec2 {
        geom::start(&self.coords)
    }

    pub fn end(&self) -> Vec2 {
        geom::end(&self.coords)
    }

    pub fn is_leaf(&self) -> bool {
        self.parents.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Arena {
    nodes: Vec<BundleNode>,
}

impl Arena {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, ix: NodeIx) -> &BundleNode {
        &self.nodes[ix]
    }

    pub fn push_leaf(&mut self, edge: EdgeId, start: Vec2, end: Vec2) -> NodeIx {
        self.nodes.push(BundleNode {
            coords: [start[0], start[1], end[0], end[1]],
            parents: Vec::new(),
            edge: Some(edge),
            sub_ink: 0.0,
        });
        self.nodes.len() - 1
    }

    pub fn push_bundle(&mut self, m1: Vec2, m2: Vec2, parents: Vec<NodeIx>) -> NodeIx {
        let sub_ink = self.members_ink(&parents, m1, m2);
        self.nodes.push(BundleNode {
            coords: [m1[0], m1[1], m2[0], m2[1]],
            parents,
            edge: None,
            sub_ink,
        });
        self.nodes.len() - 1
    }

    /// Ink of `members` routed through the waypoints `m1`/`m2`, excluding the `m1`-`m2` span.
    pub fn members_ink(&self, members: &[NodeIx], m1: Vec2, m2: Vec2) -> f64 {
        members
            .iter()
            .map(|&ix| {
                let n = &self.nodes[ix];
                geom::dist(m1, n.start()) + geom::dist(m2, n.end()) + n.sub_ink
            })
            .sum()
    }

    /// Standalone ink of a node: its straight length for a leaf, or its routed tree plus the
    /// shared span for a bundle.
    pub fn ink(&self, ix: NodeIx) -> f64 {
        let n = &self.nodes[ix];
        geom::dist(n.start(), n.end()) + n.sub_ink
    }
}
