use crate::graph::ScheduleDag;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;

/// Early dates in hours from the project clock origin.
pub struct ForwardPass<'a> {
    dag: &'a ScheduleDag<'a>,
}

impl<'a> ForwardPass<'a> {
    pub fn new(dag: &'a ScheduleDag<'a>) -> Self {
        Self { dag }
    }

    /// `order` must be a topological order of the graph.
    ///
    /// Returns `(early_start, early_finish)` per node. A node never starts
    /// before the origin, even when a negative lag would allow it.
    pub fn execute(&self, order: &[NodeIndex]) -> HashMap<NodeIndex, (f64, f64)> {
        let mut results: HashMap<NodeIndex, (f64, f64)> = HashMap::with_capacity(order.len());

        for &node_ix in order {
            let mut early_start = 0.0_f64;
            for (pred_ix, edge) in self.dag.predecessors(node_ix) {
                // Predecessors always precede in topological order; skip if not.
                if let Some(&(_, pred_finish)) = results.get(&pred_ix) {
                    let candidate = pred_finish + edge.lag_hours;
                    if candidate > early_start {
                        early_start = candidate;
                    }
                }
            }

            let early_finish = early_start + self.dag.duration(node_ix);
            results.insert(node_ix, (early_start, early_finish));
        }

        tracing::debug!(activities = results.len(), "forward pass complete");
        results
    }
}
