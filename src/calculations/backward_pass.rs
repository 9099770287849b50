use crate::graph::ScheduleDag;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;

pub struct BackwardPass<'a> {
    dag: &'a ScheduleDag<'a>,
}

impl<'a> BackwardPass<'a> {
    pub fn new(dag: &'a ScheduleDag<'a>) -> Self {
        Self { dag }
    }

    /// Walks `order` in reverse and returns `(late_start, late_finish)` per node.
    ///
    /// `project_end` is the latest early finish from the forward pass; no
    /// activity may finish after it.
    pub fn execute(
        &self,
        order: &[NodeIndex],
        project_end: f64,
    ) -> HashMap<NodeIndex, (f64, f64)> {
        let mut results: HashMap<NodeIndex, (f64, f64)> = HashMap::with_capacity(order.len());

        for &node_ix in order.iter().rev() {
            let mut late_finish = project_end;
            for (succ_ix, edge) in self.dag.successors(node_ix) {
                if let Some(&(succ_start, _)) = results.get(&succ_ix) {
                    let candidate = succ_start - edge.lag_hours;
                    if candidate < late_finish {
                        late_finish = candidate;
                    }
                }
            }

            let late_start = late_finish - self.dag.duration(node_ix);
            results.insert(node_ix, (late_start, late_finish));
        }

        tracing::debug!(activities = results.len(), project_end, "backward pass complete");
        results
    }
}
