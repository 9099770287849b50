use super::{IngestError, IngestResult, LoadedProject};
use crate::activity::Activity;
use crate::dependency::{Dependency, RelationshipKind};
use crate::project::{Project, ProjectInfo};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

const TIMESTAMP_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d-%H.%M",
];

#[derive(Deserialize)]
struct ProjectSnapshot {
    #[serde(default)]
    project: ProjectInfo,
    activities: Vec<ActivityRecord>,
    #[serde(default)]
    dependencies: Vec<DependencyRecord>,
}

/// Shared by the JSON snapshot and the activities CSV.
#[derive(Debug, Deserialize)]
struct ActivityRecord {
    task_code: String,
    #[serde(default)]
    task_name: String,
    #[serde(default, alias = "planned_start_date")]
    planned_start: Option<String>,
    #[serde(default, alias = "planned_end_date")]
    planned_end: Option<String>,
    #[serde(default, alias = "actual_start_date")]
    actual_start: Option<String>,
    #[serde(default, alias = "actual_end_date")]
    actual_end: Option<String>,
    #[serde(default)]
    duration_hours: Option<f64>,
}

impl ActivityRecord {
    fn into_activity(self) -> IngestResult<Activity> {
        let planned_start = parse_optional(self.planned_start.as_deref())?;
        let planned_end = parse_optional(self.planned_end.as_deref())?;
        let mut activity = Activity::new(self.task_code.trim(), self.task_name)
            .with_actual(
                parse_optional(self.actual_start.as_deref())?,
                parse_optional(self.actual_end.as_deref())?,
            );
        activity.planned_start = planned_start;
        activity.planned_end = planned_end;
        activity.duration_hours = self
            .duration_hours
            .unwrap_or_else(|| Activity::derive_duration_hours(planned_start, planned_end));
        Ok(activity)
    }
}

#[derive(Debug, Deserialize)]
struct DependencyRecord {
    predecessor: String,
    successor: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    lag_hours: Option<f64>,
}

impl DependencyRecord {
    fn into_dependency(self) -> IngestResult<Dependency> {
        let kind = match self.kind.as_deref().map(str::trim) {
            None | Some("") => RelationshipKind::FinishToStart,
            Some(code) => code.parse::<RelationshipKind>().map_err(|err| {
                IngestError::InvalidData(format!(
                    "{err} on {} -> {}",
                    self.predecessor, self.successor
                ))
            })?,
        };
        Ok(Dependency::new(self.predecessor.trim(), self.successor.trim())
            .with_kind(kind)
            .with_lag(self.lag_hours.unwrap_or(0.0)))
    }
}

fn build_project(
    info: ProjectInfo,
    activities: Vec<ActivityRecord>,
    dependencies: Vec<DependencyRecord>,
) -> IngestResult<LoadedProject> {
    let activities = activities
        .into_iter()
        .map(ActivityRecord::into_activity)
        .collect::<IngestResult<Vec<_>>>()?;
    let dependencies = dependencies
        .into_iter()
        .map(DependencyRecord::into_dependency)
        .collect::<IngestResult<Vec<_>>>()?;
    super::assemble(Project::new(info, activities, dependencies))
}

pub fn project_from_json_str(input: &str) -> IngestResult<LoadedProject> {
    let snapshot: ProjectSnapshot = serde_json::from_str(input)?;
    build_project(snapshot.project, snapshot.activities, snapshot.dependencies)
}

pub fn load_project_from_json<P: AsRef<Path>>(path: P) -> IngestResult<LoadedProject> {
    let file = open_input(path.as_ref())?;
    let snapshot: ProjectSnapshot = serde_json::from_reader(file)?;
    build_project(snapshot.project, snapshot.activities, snapshot.dependencies)
}

/// Reads an activities CSV and an optional dependencies CSV.
///
/// The project code defaults to the activities file stem.
pub fn load_project_from_csv<P: AsRef<Path>, Q: AsRef<Path>>(
    activities_path: P,
    dependencies_path: Option<Q>,
) -> IngestResult<LoadedProject> {
    let activities_path = activities_path.as_ref();
    let mut reader = csv::Reader::from_reader(open_input(activities_path)?);
    let activities = reader
        .deserialize::<ActivityRecord>()
        .collect::<Result<Vec<_>, _>>()?;

    let dependencies = match dependencies_path {
        Some(path) => {
            let mut reader = csv::Reader::from_reader(open_input(path.as_ref())?);
            reader
                .deserialize::<DependencyRecord>()
                .collect::<Result<Vec<_>, _>>()?
        }
        None => Vec::new(),
    };

    let code = activities_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| ProjectInfo::default().project_code);
    let info = ProjectInfo {
        project_name: code.clone(),
        project_code: code,
    };
    build_project(info, activities, dependencies)
}

fn open_input(path: &Path) -> IngestResult<File> {
    if !path.exists() {
        return Err(IngestError::NotFound(path.to_path_buf()));
    }
    Ok(File::open(path)?)
}

/// Parses the timestamp spellings found in schedule exports.
///
/// A trailing `Z` is ignored and a bare date means midnight.
pub fn parse_timestamp(input: &str) -> IngestResult<NaiveDateTime> {
    let trimmed = input.trim();
    let cleaned = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    for format in TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(cleaned, format) {
            return Ok(parsed);
        }
    }
    NaiveDate::parse_from_str(cleaned, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| IngestError::InvalidData(format!("invalid timestamp '{input}'")))
}

fn parse_optional(input: Option<&str>) -> IngestResult<Option<NaiveDateTime>> {
    match input {
        Some(value) if !value.trim().is_empty() => parse_timestamp(value).map(Some),
        _ => Ok(None),
    }
}
