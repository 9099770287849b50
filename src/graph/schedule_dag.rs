use crate::activity::Activity;
use crate::config::EdgePolicy;
use crate::dependency::{Dependency, RelationshipKind};
use crate::error::CpmError;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DependencyEdge {
    pub lag_hours: f64,
    pub kind: RelationshipKind,
}

/// Directed precedence graph over one project's activities.
///
/// Node weights index into `activities`, so the graph never clones activity
/// data. Every activity becomes a node, including ones without dependencies.
#[derive(Debug)]
pub struct ScheduleDag<'a> {
    pub graph: DiGraph<usize, DependencyEdge>,
    pub id_to_index: HashMap<&'a str, NodeIndex>,
    pub activities: Vec<&'a Activity>,
    pub dropped_edges: usize,
}

impl<'a> ScheduleDag<'a> {
    pub fn build(
        activities: &'a [Activity],
        dependencies: &[Dependency],
        policy: EdgePolicy,
    ) -> Result<Self, CpmError> {
        let mut graph: DiGraph<usize, DependencyEdge> =
            DiGraph::with_capacity(activities.len(), dependencies.len());
        let mut id_to_index: HashMap<&'a str, NodeIndex> = HashMap::new();
        let mut kept: Vec<&'a Activity> = Vec::with_capacity(activities.len());

        // Add nodes first
        for activity in activities {
            if !activity.duration_hours.is_finite() || activity.duration_hours < 0.0 {
                return Err(CpmError::InvalidDuration {
                    task_code: activity.task_code.clone(),
                    hours: activity.duration_hours,
                });
            }
            if id_to_index.contains_key(activity.task_code.as_str()) {
                match policy {
                    EdgePolicy::Strict => {
                        return Err(CpmError::DuplicateActivity(activity.task_code.clone()));
                    }
                    EdgePolicy::Permissive => {
                        tracing::warn!(task_code = %activity.task_code, "ignoring duplicate activity");
                        continue;
                    }
                }
            }
            let node_ix = graph.add_node(kept.len());
            id_to_index.insert(activity.task_code.as_str(), node_ix);
            kept.push(activity);
        }

        // Add edges: predecessor -> successor
        let mut dropped_edges = 0usize;
        for dep in dependencies {
            let pred = id_to_index.get(dep.predecessor.as_str()).copied();
            let succ = id_to_index.get(dep.successor.as_str()).copied();
            match (pred, succ) {
                (Some(u), Some(v)) => {
                    graph.update_edge(
                        u,
                        v,
                        DependencyEdge {
                            lag_hours: dep.lag_hours,
                            kind: dep.kind,
                        },
                    );
                }
                _ => {
                    let missing = if pred.is_none() {
                        dep.predecessor.clone()
                    } else {
                        dep.successor.clone()
                    };
                    if policy == EdgePolicy::Strict {
                        return Err(CpmError::UnknownActivity {
                            predecessor: dep.predecessor.clone(),
                            successor: dep.successor.clone(),
                            missing,
                        });
                    }
                    tracing::warn!(
                        predecessor = %dep.predecessor,
                        successor = %dep.successor,
                        missing = %missing,
                        "dropping dependency on unknown activity"
                    );
                    dropped_edges += 1;
                }
            }
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            dropped_edges,
            "built schedule graph"
        );

        Ok(Self {
            graph,
            id_to_index,
            activities: kept,
            dropped_edges,
        })
    }

    pub fn activity(&self, node_ix: NodeIndex) -> &'a Activity {
        self.activities[self.graph[node_ix]]
    }

    pub fn node(&self, task_code: &str) -> Option<NodeIndex> {
        self.id_to_index.get(task_code).copied()
    }

    pub fn duration(&self, node_ix: NodeIndex) -> f64 {
        self.activity(node_ix).duration_hours
    }

    pub fn predecessors(
        &self,
        node_ix: NodeIndex,
    ) -> impl Iterator<Item = (NodeIndex, DependencyEdge)> + '_ {
        self.graph
            .edges_directed(node_ix, Direction::Incoming)
            .map(|edge| (edge.source(), *edge.weight()))
    }

    pub fn successors(
        &self,
        node_ix: NodeIndex,
    ) -> impl Iterator<Item = (NodeIndex, DependencyEdge)> + '_ {
        self.graph
            .edges_directed(node_ix, Direction::Outgoing)
            .map(|edge| (edge.target(), *edge.weight()))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}
