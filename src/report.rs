use crate::graph::CycleInfo;
use crate::project::ProjectInfo;
use crate::schedule::{CpmOutcome, CriticalPath};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalPathSummary {
    pub total_duration_hours: f64,
    pub total_duration_days: f64,
    pub critical_path_count: usize,
    pub total_activities_on_critical_paths: usize,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub degraded: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
    #[serde(skip)]
    pub primary_path: Vec<String>,
}

impl CriticalPathSummary {
    pub fn from_outcome(outcome: &CpmOutcome, hours_per_day: f64) -> Self {
        let unique: BTreeSet<&str> = outcome
            .critical_paths
            .iter()
            .flat_map(|path| path.activities.iter().map(|step| step.task_code.as_str()))
            .collect();
        Self {
            total_duration_hours: round2(outcome.project_duration_hours),
            total_duration_days: round2(outcome.project_duration_hours / hours_per_day),
            critical_path_count: outcome.critical_paths.len(),
            total_activities_on_critical_paths: unique.len(),
            degraded: outcome.degraded,
            truncated: outcome.truncated,
            primary_path: outcome
                .primary_path()
                .map(|path| path.activities.iter().map(|s| s.task_code.clone()).collect())
                .unwrap_or_default(),
        }
    }

    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("duration={}h", self.total_duration_hours));
        parts.push(format!("days={}", self.total_duration_days));
        parts.push(format!("paths={}", self.critical_path_count));
        parts.push(format!("critical={}", self.total_activities_on_critical_paths));
        if self.degraded {
            parts.push("degraded".to_string());
        }
        if self.truncated {
            parts.push("truncated".to_string());
        }
        if !self.primary_path.is_empty() {
            parts.push(format!("crit_path={}", self.primary_path.join("->")));
        }
        parts.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathReport {
    pub path_id: usize,
    pub is_primary: bool,
    pub duration_hours: f64,
    pub duration_days: f64,
    pub activity_count: usize,
    pub activities: Vec<crate::schedule::CriticalPathStep>,
}

impl PathReport {
    fn from_path(path: &CriticalPath, hours_per_day: f64) -> Self {
        Self {
            path_id: path.path_id,
            is_primary: path.is_primary,
            duration_hours: round2(path.duration_hours),
            duration_days: round2(path.duration_hours / hours_per_day),
            activity_count: path.activity_count(),
            activities: path.activities.clone(),
        }
    }
}

/// Presentation-ready view of one computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalPathReport {
    pub project: ProjectInfo,
    pub summary: CriticalPathSummary,
    pub critical_paths: Vec<PathReport>,
}

impl CriticalPathReport {
    pub fn new(project: &ProjectInfo, outcome: &CpmOutcome, hours_per_day: f64) -> Self {
        Self {
            project: project.clone(),
            summary: CriticalPathSummary::from_outcome(outcome, hours_per_day),
            critical_paths: outcome
                .critical_paths
                .iter()
                .map(|path| PathReport::from_path(path, hours_per_day))
                .collect(),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Plain-text listing of cycles, shortest first.
pub fn render_cycle_report(project_code: &str, cycles: &[CycleInfo]) -> String {
    let rule = "=".repeat(60);
    let thin = "-".repeat(60);
    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "CIRCULAR DEPENDENCIES REPORT - {project_code}");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Total cycles found: {}", cycles.len());
    let _ = writeln!(out);

    let mut sorted: Vec<&CycleInfo> = cycles.iter().collect();
    sorted.sort_by_key(|c| (c.length, c.cycle_id));

    for cycle in sorted {
        let _ = writeln!(out, "{thin}");
        let _ = writeln!(
            out,
            "## Cycle {} (Length: {} activities)",
            cycle.cycle_id, cycle.length
        );
        let _ = writeln!(out, "{thin}");
        for (i, (code, name)) in cycle.task_codes.iter().zip(&cycle.task_names).enumerate() {
            let _ = writeln!(out, "  {}. [{}] {}", i + 1, code, truncate(name, 50));
        }
        if let Some(first) = cycle.task_codes.first() {
            let _ = writeln!(out, "     +---> (back to [{first}])");
        }
        let _ = writeln!(out);
    }
    out
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
