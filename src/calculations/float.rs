use super::ActivityTiming;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;

/// Derives total float and criticality from the two passes.
pub struct FloatClassifier {
    tolerance: f64,
}

pub struct Classification {
    pub timings: HashMap<NodeIndex, ActivityTiming>,
    /// Critical nodes in the order they were supplied.
    pub critical: Vec<NodeIndex>,
}

impl FloatClassifier {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn classify(
        &self,
        order: &[NodeIndex],
        early: &HashMap<NodeIndex, (f64, f64)>,
        late: &HashMap<NodeIndex, (f64, f64)>,
    ) -> Classification {
        let mut timings = HashMap::with_capacity(order.len());
        let mut critical = Vec::new();

        for &node_ix in order {
            let (Some(&(early_start, early_finish)), Some(&(late_start, late_finish))) =
                (early.get(&node_ix), late.get(&node_ix))
            else {
                continue;
            };
            let timing = ActivityTiming {
                early_start,
                early_finish,
                late_start,
                late_finish,
                total_float: late_start - early_start,
            };
            if timing.is_critical(self.tolerance) {
                critical.push(node_ix);
            }
            timings.insert(node_ix, timing);
        }

        Classification { timings, critical }
    }
}
