//! Cycle detection and enumeration for the schedule graph.
//!
//! Enumeration follows Johnson's algorithm: for each start vertex `s` in
//! index order, restrict the graph to vertices `>= s`, take the strongly
//! connected component holding `s`, and walk it with a blocked set so every
//! elementary circuit through `s` is produced exactly once. Running time is
//! bounded by `O((n + e)(c + 1))` for `c` cycles.

use super::schedule_dag::ScheduleDag;
use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleInfo {
    /// 1-based position in discovery order.
    pub cycle_id: usize,
    pub task_codes: Vec<String>,
    pub task_names: Vec<String>,
    pub length: usize,
}

pub fn has_cycles(dag: &ScheduleDag<'_>) -> bool {
    is_cyclic_directed(&dag.graph)
}

/// Lists every simple cycle, stopping after `limit` cycles when one is given.
pub fn detect_cycles(dag: &ScheduleDag<'_>, limit: Option<usize>) -> Vec<CycleInfo> {
    let adjacency: Vec<Vec<usize>> = dag
        .graph
        .node_indices()
        .map(|ix| {
            let mut succ: Vec<usize> = dag.graph.neighbors(ix).map(|n| n.index()).collect();
            succ.sort_unstable();
            succ.dedup();
            succ
        })
        .collect();

    let raw = simple_cycles(&adjacency, limit);
    if limit.is_some_and(|max| raw.len() >= max) {
        tracing::warn!(limit = ?limit, "cycle enumeration stopped at configured limit");
    }

    raw.into_iter()
        .enumerate()
        .map(|(i, cycle)| {
            let activities: Vec<_> = cycle
                .iter()
                .map(|&n| dag.activity(NodeIndex::new(n)))
                .collect();
            CycleInfo {
                cycle_id: i + 1,
                task_codes: activities.iter().map(|a| a.task_code.clone()).collect(),
                task_names: activities
                    .iter()
                    .map(|a| a.display_name().to_string())
                    .collect(),
                length: cycle.len(),
            }
        })
        .collect()
}

struct Circuits<'g> {
    adjacency: &'g [Vec<usize>],
    component: HashSet<usize>,
    start: usize,
    blocked: Vec<bool>,
    block_map: Vec<HashSet<usize>>,
    stack: Vec<usize>,
    found: Vec<Vec<usize>>,
    limit: Option<usize>,
}

impl Circuits<'_> {
    fn full(&self) -> bool {
        self.limit.is_some_and(|max| self.found.len() >= max)
    }

    fn unblock(&mut self, node: usize) {
        let mut pending = vec![node];
        while let Some(u) = pending.pop() {
            if !self.blocked[u] {
                continue;
            }
            self.blocked[u] = false;
            pending.extend(self.block_map[u].drain());
        }
    }

    fn circuit(&mut self, v: usize) -> bool {
        let mut closed = false;
        self.stack.push(v);
        self.blocked[v] = true;

        let adjacency = self.adjacency;
        for &w in &adjacency[v] {
            if self.full() {
                break;
            }
            if !self.component.contains(&w) {
                continue;
            }
            if w == self.start {
                self.found.push(self.stack.clone());
                closed = true;
            } else if !self.blocked[w] && self.circuit(w) {
                closed = true;
            }
        }

        if closed {
            self.unblock(v);
        } else {
            for &w in &adjacency[v] {
                if self.component.contains(&w) {
                    self.block_map[w].insert(v);
                }
            }
        }

        self.stack.pop();
        closed
    }
}

/// Johnson's elementary circuit enumeration over a dense `usize` adjacency.
fn simple_cycles(adjacency: &[Vec<usize>], limit: Option<usize>) -> Vec<Vec<usize>> {
    let n = adjacency.len();
    let mut found: Vec<Vec<usize>> = Vec::new();

    for start in 0..n {
        if limit.is_some_and(|max| found.len() >= max) {
            break;
        }

        // Subgraph induced by vertices >= start; node weight is the original index.
        let mut sub: DiGraph<usize, ()> = DiGraph::new();
        let mut to_sub: HashMap<usize, NodeIndex> = HashMap::new();
        for v in start..n {
            to_sub.insert(v, sub.add_node(v));
        }
        for v in start..n {
            for &w in &adjacency[v] {
                if w >= start {
                    sub.add_edge(to_sub[&v], to_sub[&w], ());
                }
            }
        }

        let component: HashSet<usize> = tarjan_scc(&sub)
            .into_iter()
            .find(|scc| scc.iter().any(|&ix| sub[ix] == start))
            .map(|scc| scc.into_iter().map(|ix| sub[ix]).collect())
            .unwrap_or_default();

        let self_loop = adjacency[start].contains(&start);
        if component.len() < 2 && !self_loop {
            continue;
        }

        let mut circuits = Circuits {
            adjacency,
            component,
            start,
            blocked: vec![false; n],
            block_map: vec![HashSet::new(); n],
            stack: Vec::new(),
            found: std::mem::take(&mut found),
            limit,
        };
        circuits.circuit(start);
        found = circuits.found;
    }

    found
}
