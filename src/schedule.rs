use crate::activity::Activity;
use crate::calculations::ActivityTiming;
use crate::calculations::backward_pass::BackwardPass;
use crate::calculations::critical_paths::CriticalPathEnumerator;
use crate::calculations::float::FloatClassifier;
use crate::calculations::forward_pass::ForwardPass;
use crate::config::CpmConfig;
use crate::dependency::Dependency;
use crate::error::CpmError;
use crate::graph::{self, CycleInfo, ScheduleDag};
use crate::project::Project;
use chrono::{NaiveDateTime, TimeDelta};
use petgraph::algo::toposort;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One activity's position on a critical path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalPathStep {
    pub sequence: usize,
    pub task_code: String,
    pub task_name: String,
    pub planned_start: Option<NaiveDateTime>,
    pub planned_end: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalPath {
    pub path_id: usize,
    pub is_primary: bool,
    pub duration_hours: f64,
    pub activities: Vec<CriticalPathStep>,
}

impl CriticalPath {
    pub fn activity_count(&self) -> usize {
        self.activities.len()
    }

    pub fn task_codes(&self) -> Vec<&str> {
        self.activities.iter().map(|s| s.task_code.as_str()).collect()
    }
}

/// Per-activity CPM results of one computation, keyed by task code.
///
/// Offsets are hours from `project_start`; `project_start` is `None` only
/// for an empty schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpmSchedule {
    pub project_start: Option<NaiveDateTime>,
    pub float_tolerance_hours: f64,
    timings: BTreeMap<String, ActivityTiming>,
}

impl CpmSchedule {
    pub fn timing(&self, task_code: &str) -> Option<&ActivityTiming> {
        self.timings.get(task_code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ActivityTiming)> {
        self.timings.iter().map(|(code, timing)| (code.as_str(), timing))
    }

    pub fn len(&self) -> usize {
        self.timings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }

    pub fn is_critical(&self, task_code: &str) -> bool {
        self.timing(task_code)
            .is_some_and(|t| t.is_critical(self.float_tolerance_hours))
    }

    pub fn critical_codes(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, t)| t.is_critical(self.float_tolerance_hours))
            .map(|(code, _)| code)
            .collect()
    }

    /// Converts an hour offset into a timestamp on the project clock.
    ///
    /// `None` for an empty schedule or when the offset leaves chrono's range.
    pub fn at(&self, offset_hours: f64) -> Option<NaiveDateTime> {
        let start = self.project_start?;
        let delta = TimeDelta::try_milliseconds((offset_hours * 3_600_000.0).round() as i64)?;
        start.checked_add_signed(delta)
    }

    pub fn early_start_at(&self, task_code: &str) -> Option<NaiveDateTime> {
        self.timing(task_code).and_then(|t| self.at(t.early_start))
    }

    pub fn early_finish_at(&self, task_code: &str) -> Option<NaiveDateTime> {
        self.timing(task_code).and_then(|t| self.at(t.early_finish))
    }

    pub fn late_start_at(&self, task_code: &str) -> Option<NaiveDateTime> {
        self.timing(task_code).and_then(|t| self.at(t.late_start))
    }

    pub fn late_finish_at(&self, task_code: &str) -> Option<NaiveDateTime> {
        self.timing(task_code).and_then(|t| self.at(t.late_finish))
    }

    /// Slack on a single relationship: how far the predecessor can slip
    /// before it pushes the successor's early start.
    pub fn relationship_free_float(&self, dependency: &Dependency) -> Option<f64> {
        let pred = self.timing(&dependency.predecessor)?;
        let succ = self.timing(&dependency.successor)?;
        Some(succ.early_start - (pred.early_finish + dependency.lag_hours))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpmOutcome {
    pub critical_paths: Vec<CriticalPath>,
    pub project_duration_hours: f64,
    pub schedule: CpmSchedule,
    /// True when the critical activities could not be chained and were
    /// returned together as one unordered path.
    pub degraded: bool,
    /// True when `max_critical_paths` cut off further longest chains.
    #[serde(default)]
    pub truncated: bool,
    pub dropped_edges: usize,
}

impl CpmOutcome {
    fn empty(config: &CpmConfig) -> Self {
        Self {
            critical_paths: Vec::new(),
            project_duration_hours: 0.0,
            schedule: CpmSchedule {
                project_start: config.project_start,
                float_tolerance_hours: config.float_tolerance_hours,
                timings: BTreeMap::new(),
            },
            degraded: false,
            truncated: false,
            dropped_edges: 0,
        }
    }

    pub fn primary_path(&self) -> Option<&CriticalPath> {
        self.critical_paths.iter().find(|p| p.is_primary)
    }

    pub fn project_finish(&self) -> Option<NaiveDateTime> {
        let latest = self
            .schedule
            .iter()
            .map(|(_, t)| t.early_finish)
            .fold(None, |acc: Option<f64>, ef| Some(acc.map_or(ef, |a| a.max(ef))))?;
        self.schedule.at(latest)
    }
}

/// Runs the CPM pipeline over one project's activities and dependencies.
///
/// The calculator borrows its inputs and never mutates them; every call
/// builds a fresh graph, so one set of activities can feed any number of
/// independent computations.
pub struct CriticalPathCalculator<'a> {
    activities: &'a [Activity],
    dependencies: &'a [Dependency],
    config: CpmConfig,
}

impl<'a> CriticalPathCalculator<'a> {
    pub fn new(activities: &'a [Activity], dependencies: &'a [Dependency]) -> Self {
        Self {
            activities,
            dependencies,
            config: CpmConfig::default(),
        }
    }

    pub fn for_project(project: &'a Project) -> Self {
        Self::new(&project.activities, &project.dependencies)
    }

    pub fn with_config(mut self, config: CpmConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CpmConfig {
        &self.config
    }

    pub fn build_graph(&self) -> Result<ScheduleDag<'a>, CpmError> {
        ScheduleDag::build(self.activities, self.dependencies, self.config.edge_policy)
    }

    pub fn has_cycles(&self) -> Result<bool, CpmError> {
        Ok(graph::has_cycles(&self.build_graph()?))
    }

    pub fn detect_cycles(&self) -> Result<Vec<CycleInfo>, CpmError> {
        Ok(graph::detect_cycles(&self.build_graph()?, self.config.max_cycles))
    }

    pub fn calculate(&self) -> Result<CpmOutcome, CpmError> {
        let dag = self.build_graph()?;
        if dag.node_count() == 0 {
            return Ok(CpmOutcome::empty(&self.config));
        }

        let order = match toposort(&dag.graph, None) {
            Ok(order) => order,
            Err(_) => {
                let cycles = graph::detect_cycles(&dag, self.config.max_cycles);
                tracing::error!(cycles = cycles.len(), "dependency graph is cyclic");
                return Err(CpmError::Cycle { cycles });
            }
        };
        let project_start = self.project_origin(&dag)?;

        let early = ForwardPass::new(&dag).execute(&order);
        let project_end = early
            .values()
            .map(|&(_, ef)| ef)
            .fold(f64::NEG_INFINITY, f64::max);
        let late = BackwardPass::new(&dag).execute(&order, project_end);

        let classification =
            FloatClassifier::new(self.config.float_tolerance_hours).classify(&order, &early, &late);

        // Keep critical nodes in input order for the degraded fallback.
        let mut critical = classification.critical.clone();
        critical.sort_by_key(|&ix| dag.graph[ix]);

        let enumeration =
            CriticalPathEnumerator::new(self.config.float_tolerance_hours, self.config.max_critical_paths)
                .enumerate(&dag, &critical);

        let critical_paths: Vec<CriticalPath> = enumeration
            .paths
            .iter()
            .enumerate()
            .map(|(idx, (nodes, duration))| CriticalPath {
                path_id: idx + 1,
                is_primary: idx == 0,
                duration_hours: *duration,
                activities: nodes
                    .iter()
                    .enumerate()
                    .map(|(seq, &ix)| {
                        let activity = dag.activity(ix);
                        CriticalPathStep {
                            sequence: seq + 1,
                            task_code: activity.task_code.clone(),
                            task_name: activity.task_name.clone(),
                            planned_start: activity.planned_start,
                            planned_end: activity.planned_end,
                        }
                    })
                    .collect(),
            })
            .collect();

        let earliest_start = early
            .values()
            .map(|&(es, _)| es)
            .fold(f64::INFINITY, f64::min);
        let project_duration_hours = project_end - earliest_start;

        let timings: BTreeMap<String, ActivityTiming> = classification
            .timings
            .into_iter()
            .map(|(ix, timing)| (dag.activity(ix).task_code.clone(), timing))
            .collect();

        tracing::info!(
            activities = timings.len(),
            critical = critical.len(),
            paths = critical_paths.len(),
            project_duration_hours,
            "critical path analysis complete"
        );

        Ok(CpmOutcome {
            critical_paths,
            project_duration_hours,
            schedule: CpmSchedule {
                project_start: Some(project_start),
                float_tolerance_hours: self.config.float_tolerance_hours,
                timings,
            },
            degraded: enumeration.degraded,
            truncated: enumeration.truncated,
            dropped_edges: dag.dropped_edges,
        })
    }

    /// Earliest planned start among the activities, else the configured
    /// project start.
    fn project_origin(&self, dag: &ScheduleDag<'a>) -> Result<NaiveDateTime, CpmError> {
        dag.activities
            .iter()
            .filter_map(|a| a.planned_start)
            .min()
            .or(self.config.project_start)
            .ok_or(CpmError::UndatedSchedule)
    }
}

/// Computes independent projects in parallel, one result per project.
pub fn calculate_many(projects: &[Project], config: &CpmConfig) -> Vec<Result<CpmOutcome, CpmError>> {
    projects
        .par_iter()
        .map(|project| {
            CriticalPathCalculator::for_project(project)
                .with_config(config.clone())
                .calculate()
        })
        .collect()
}
