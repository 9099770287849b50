use crate::graph::ScheduleDag;
use petgraph::Direction;
use petgraph::algo::{all_simple_paths, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashSet;

/// Longest chains found among the critical activities.
#[derive(Debug, Clone, PartialEq)]
pub struct PathEnumeration {
    /// Sorted by task-code sequence; each entry carries its summed duration.
    pub paths: Vec<(Vec<NodeIndex>, f64)>,
    /// Set when the critical activities do not form an acyclic chain and the
    /// whole critical set is returned as a single unordered path.
    pub degraded: bool,
    /// Set when more longest chains existed than the configured cap allowed.
    pub truncated: bool,
}

pub struct CriticalPathEnumerator {
    tolerance: f64,
    max_paths: Option<usize>,
}

impl CriticalPathEnumerator {
    pub fn new(tolerance: f64, max_paths: Option<usize>) -> Self {
        Self {
            tolerance,
            max_paths,
        }
    }

    pub fn enumerate(&self, dag: &ScheduleDag<'_>, critical: &[NodeIndex]) -> PathEnumeration {
        if critical.is_empty() {
            return PathEnumeration {
                paths: Vec::new(),
                degraded: false,
                truncated: false,
            };
        }

        let critical_set: HashSet<NodeIndex> = critical.iter().copied().collect();
        // Node weight of the induced subgraph is the index in the full graph.
        let sub: DiGraph<NodeIndex, ()> = dag.graph.filter_map(
            |ix, _| critical_set.contains(&ix).then_some(ix),
            |_, _| Some(()),
        );

        let Some(longest) = longest_chain(dag, &sub) else {
            return degraded(dag, critical);
        };

        let mut sources: Vec<NodeIndex> = sub
            .node_indices()
            .filter(|&ix| sub.neighbors_directed(ix, Direction::Incoming).next().is_none())
            .collect();
        let mut sinks: Vec<NodeIndex> = sub
            .node_indices()
            .filter(|&ix| sub.neighbors_directed(ix, Direction::Outgoing).next().is_none())
            .collect();
        sources.sort_by_cached_key(|&ix| dag.activity(sub[ix]).task_code.clone());
        sinks.sort_by_cached_key(|&ix| dag.activity(sub[ix]).task_code.clone());

        let mut paths: Vec<(Vec<NodeIndex>, f64)> = Vec::new();
        let mut truncated = false;
        // Returns false once the cap is hit.
        let mut admit = |chain: Vec<NodeIndex>| -> bool {
            let nodes: Vec<NodeIndex> = chain.into_iter().map(|ix| sub[ix]).collect();
            let duration: f64 = nodes.iter().map(|&ix| dag.duration(ix)).sum();
            if longest - duration > self.tolerance {
                return true;
            }
            if self.max_paths.is_some_and(|max| paths.len() >= max) {
                truncated = true;
                return false;
            }
            paths.push((nodes, duration));
            true
        };

        'outer: for &source in &sources {
            for &sink in &sinks {
                if source == sink {
                    // Isolated critical activity: a chain of one.
                    if !admit(vec![source]) {
                        break 'outer;
                    }
                    continue;
                }
                for chain in all_simple_paths::<Vec<NodeIndex>, _>(&sub, source, sink, 0, None) {
                    if !admit(chain) {
                        break 'outer;
                    }
                }
            }
        }

        if truncated {
            tracing::warn!(
                max_paths = ?self.max_paths,
                "critical path enumeration stopped at configured limit"
            );
        } else if paths.is_empty() {
            return degraded(dag, critical);
        }

        paths.sort_by_cached_key(|(path, _)| {
            path.iter()
                .map(|&ix| dag.activity(ix).task_code.clone())
                .collect::<Vec<String>>()
        });
        paths.dedup_by(|a, b| a.0 == b.0);

        tracing::debug!(paths = paths.len(), longest, truncated, "enumerated critical paths");
        PathEnumeration {
            paths,
            degraded: false,
            truncated,
        }
    }
}

/// Longest summed duration of any chain in the critical subgraph, or `None`
/// when the subgraph is cyclic.
fn longest_chain(dag: &ScheduleDag<'_>, sub: &DiGraph<NodeIndex, ()>) -> Option<f64> {
    let order = toposort(sub, None).ok()?;
    let mut best = vec![0.0_f64; sub.node_count()];
    for ix in order {
        let before = sub
            .neighbors_directed(ix, Direction::Incoming)
            .map(|pred| best[pred.index()])
            .fold(0.0, f64::max);
        best[ix.index()] = before + dag.duration(sub[ix]);
    }
    best.into_iter().reduce(f64::max)
}

/// Reached only when the critical activities cannot be chained, which the
/// calculator rules out by rejecting cyclic graphs first.
fn degraded(dag: &ScheduleDag<'_>, critical: &[NodeIndex]) -> PathEnumeration {
    tracing::warn!(
        critical = critical.len(),
        "no source-to-sink chain among critical activities; returning them as one path"
    );
    let duration = critical.iter().map(|&ix| dag.duration(ix)).sum();
    PathEnumeration {
        paths: vec![(critical.to_vec(), duration)],
        degraded: true,
        truncated: false,
    }
}
