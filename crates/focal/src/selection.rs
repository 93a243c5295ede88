//! The current focal selection and the edits a user can make to it.
//!
//! Groups stay disjoint: nodes that are already selected are filtered out of new or extended
//! groups, and groups that become empty are dropped.

use focal_graphlib::NodeId;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum SelectionMode {
    /// New group from the nodes not selected yet.
    Create,
    /// Add unselected nodes to an existing group.
    Append { group: usize },
    /// Remove the nodes from whichever groups hold them.
    RemoveFrom,
    /// Remove the nodes from their groups, then select them as a group of their own.
    SingleOut,
    /// Drop one group.
    Delete { group: usize },
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocalSelection {
    groups: Vec<Vec<NodeId>>,
}

impl FocalSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Two singleton groups, for comparing a pair of nodes.
    pub fn pair(a: NodeId, b: NodeId) -> Self {
        let mut s = Self::new();
        s.apply(SelectionMode::Create, &[a]);
        s.apply(SelectionMode::Create, &[b]);
        s
    }

    pub fn groups(&self) -> &[Vec<NodeId>] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<Vec<NodeId>> {
        self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.group_of(node).is_some()
    }

    pub fn group_of(&self, node: NodeId) -> Option<usize> {
        self.groups.iter().position(|g| g.contains(&node))
    }

    /// Applies one edit. Out-of-range group indices leave the selection unchanged.
    pub fn apply(&mut self, mode: SelectionMode, nodes: &[NodeId]) {
        match mode {
            SelectionMode::Create => {
                let fresh = self.unselected(nodes);
                if !fresh.is_empty() {
                    self.groups.push(fresh);
                }
            }
            SelectionMode::Append { group } => {
                let fresh = self.unselected(nodes);
                if let Some(g) = self.groups.get_mut(group) {
                    g.extend(fresh);
                }
            }
            SelectionMode::RemoveFrom => self.remove_nodes(nodes),
            SelectionMode::SingleOut => {
                self.remove_nodes(nodes);
                let fresh = self.unselected(nodes);
                if !fresh.is_empty() {
                    self.groups.push(fresh);
                }
            }
            SelectionMode::Delete { group } => {
                if group < self.groups.len() {
                    self.groups.remove(group);
                }
            }
            SelectionMode::Clear => self.groups.clear(),
        }
    }

    /// `nodes` minus anything already selected, deduplicated, in input order.
    fn unselected(&self, nodes: &[NodeId]) -> Vec<NodeId> {
        let mut seen: FxHashSet<NodeId> = self.groups.iter().flatten().copied().collect();
        nodes.iter().copied().filter(|n| seen.insert(*n)).collect()
    }

    fn remove_nodes(&mut self, nodes: &[NodeId]) {
        let drop: FxHashSet<NodeId> = nodes.iter().copied().collect();
        for g in &mut self.groups {
            g.retain(|n| !drop.contains(n));
        }
        self.groups.retain(|g| !g.is_empty());
    }
}
