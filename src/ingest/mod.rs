//! Ingestion collaborator: turns external project files into validated
//! activities and dependencies for the CPM core.

use crate::activity::{Activity, DuplicateActivity};
use crate::activity_validation::{self, ValidationError};
use crate::dependency::Dependency;
use crate::project::Project;
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("input file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
}

pub type IngestResult<T> = Result<T, IngestError>;

/// A project ready for computation plus what ingestion had to discard.
#[derive(Debug, Clone, Default)]
pub struct LoadedProject {
    pub project: Project,
    pub duplicates: BTreeMap<String, Vec<DuplicateActivity>>,
    pub dropped_dependencies: Vec<Dependency>,
}

/// Splits dependencies into those whose endpoints both exist and the rest.
pub fn filter_unknown_dependencies(
    activities: &[Activity],
    dependencies: Vec<Dependency>,
) -> (Vec<Dependency>, Vec<Dependency>) {
    let known: HashSet<&str> = activities.iter().map(|a| a.task_code.as_str()).collect();
    let (kept, dropped): (Vec<_>, Vec<_>) = dependencies.into_iter().partition(|dep| {
        known.contains(dep.predecessor.as_str()) && known.contains(dep.successor.as_str())
    });
    for dep in &dropped {
        tracing::warn!(
            predecessor = %dep.predecessor,
            successor = %dep.successor,
            "skipping dependency with unknown endpoint"
        );
    }
    (kept, dropped)
}

pub(crate) fn assemble(project: Project) -> IngestResult<LoadedProject> {
    if project.activities.is_empty() {
        return Err(IngestError::InvalidData("project contained no activities".into()));
    }

    let Project {
        info,
        activities,
        dependencies,
    } = project;
    let (activities, duplicates) = crate::activity::deduplicate_activities(activities);
    let (dependencies, dropped_dependencies) =
        filter_unknown_dependencies(&activities, dependencies);
    activity_validation::validate_activities(&activities, &dependencies)?;

    tracing::debug!(
        project = %info.project_code,
        activities = activities.len(),
        dependencies = dependencies.len(),
        duplicates = duplicates.len(),
        dropped = dropped_dependencies.len(),
        "project ingested"
    );

    Ok(LoadedProject {
        project: Project::new(info, activities, dependencies),
        duplicates,
        dropped_dependencies,
    })
}

pub mod file;

pub use file::{
    load_project_from_csv, load_project_from_json, parse_timestamp, project_from_json_str,
};
