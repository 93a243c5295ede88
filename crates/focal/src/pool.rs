use crate::error::Result;
use crate::worker::{LayoutWorker, ProjectionTask};
use focal_layout::algo::projection;
use focal_layout::{LayoutRequest, LayoutState, Point, ProjectionOptions};
use futures::future::try_join_all;

/// Projection workers sharing one graph state; tiers run in parallel.
#[derive(Debug)]
pub struct ProjectionPool {
    workers: Vec<LayoutWorker>,
}

impl ProjectionPool {
    pub fn new(size: usize) -> Result<Self> {
        let workers = (0..size.max(1))
            .map(|i| LayoutWorker::spawn(format!("focal-projection-{i}")))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { workers })
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub async fn install_state(&self, state: &LayoutState) -> Result<()> {
        try_join_all(self.workers.iter().map(|w| w.install_state(state.clone()))).await?;
        Ok(())
    }

    /// Embeddings for every tier of `request`, in [`projection::tiers`] order.
    pub async fn project(&self, request: &LayoutRequest, options: &ProjectionOptions) -> Result<Vec<Vec<Point>>> {
        let tiers = projection::tiers(request);
        let sizes: Vec<usize> = tiers.iter().map(|t| t.len()).collect();
        let assignment = assign_least_loaded(&sizes, self.workers.len());
        tracing::debug!(tiers = tiers.len(), workers = self.workers.len(), ?assignment, "dispatching projections");

        let jobs = tiers.into_iter().zip(assignment).map(|(nodes, w)| {
            self.workers[w].project(ProjectionTask {
                nodes: nodes.to_vec(),
                use_global_mask: request.use_global_mask,
                node_size: request.node_size,
                fallback_threshold: options.fallback_threshold,
                random_seed: options.random_seed,
            })
        });
        try_join_all(jobs).await
    }
}

/// Worker index for each task: the one with the smallest cumulative size so far, lowest index on
/// ties.
pub fn assign_least_loaded(sizes: &[usize], workers: usize) -> Vec<usize> {
    let mut load = vec![0usize; workers.max(1)];
    sizes
        .iter()
        .map(|&size| {
            let (w, _) = load
                .iter()
                .enumerate()
                .min_by_key(|&(i, l)| (*l, i))
                .unwrap_or((0, &0));
            load[w] += size;
            w
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::assign_least_loaded;

    #[test]
    fn tasks_go_to_the_lightest_worker() {
        assert_eq!(assign_least_loaded(&[10, 3, 4, 2, 1, 6], 2), vec![0, 1, 1, 1, 1, 0]);
        assert_eq!(assign_least_loaded(&[5, 5, 5], 4), vec![0, 1, 2]);
        assert_eq!(assign_least_loaded(&[1, 1], 0), vec![0, 0]);
    }
}
