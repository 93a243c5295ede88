//! Traversal helpers over [`Graph`].

use super::{Graph, NodeId};
use std::collections::VecDeque;

/// Breadth-first hop distances from `source`, stopping after `max_hops` layers.
///
/// Unreached nodes (and nodes beyond `max_hops`) are `None`.
pub fn hop_distances(g: &Graph, source: NodeId, max_hops: usize) -> Vec<Option<usize>> {
    let mut dist: Vec<Option<usize>> = vec![None; g.num_nodes()];
    let mut q: VecDeque<NodeId> = VecDeque::new();
    dist[source] = Some(0);
    q.push_back(source);

    while let Some(v) = q.pop_front() {
        let Some(d) = dist[v] else {
            continue;
        };
        if d >= max_hops {
            continue;
        }
        for &u in g.neighbors(v) {
            if dist[u].is_none() {
                dist[u] = Some(d + 1);
                q.push_back(u);
            }
        }
    }

    dist
}
