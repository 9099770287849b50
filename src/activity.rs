use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub task_code: String,
    pub task_name: String,
    pub planned_start: Option<NaiveDateTime>,
    pub planned_end: Option<NaiveDateTime>,
    pub actual_start: Option<NaiveDateTime>,
    pub actual_end: Option<NaiveDateTime>,
    #[serde(default)]
    pub duration_hours: f64,
}

impl Activity {
    pub fn new(task_code: impl Into<String>, task_name: impl Into<String>) -> Self {
        Self {
            task_code: task_code.into(),
            task_name: task_name.into(),
            planned_start: None,
            planned_end: None,
            actual_start: None,
            actual_end: None,
            duration_hours: 0.0,
        }
    }

    /// Sets the planned window and derives the duration from it.
    pub fn with_planned(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.planned_start = Some(start);
        self.planned_end = Some(end);
        self.duration_hours = Self::derive_duration_hours(self.planned_start, self.planned_end);
        self
    }

    pub fn with_planned_start(mut self, start: NaiveDateTime) -> Self {
        self.planned_start = Some(start);
        self
    }

    pub fn with_actual(mut self, start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        self.actual_start = start;
        self.actual_end = end;
        self
    }

    pub fn with_duration_hours(mut self, hours: f64) -> Self {
        self.duration_hours = hours;
        self
    }

    /// `planned_end - planned_start` in hours, zero when either bound is missing.
    pub fn derive_duration_hours(
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> f64 {
        match (start, end) {
            (Some(start), Some(end)) => hours_between(start, end),
            _ => 0.0,
        }
    }

    pub fn display_name(&self) -> &str {
        if self.task_name.trim().is_empty() {
            "(no name)"
        } else {
            &self.task_name
        }
    }

    fn differing_fields(&self, other: &Activity) -> Vec<String> {
        let mut differences = Vec::new();
        if self.task_name != other.task_name {
            differences.push("task_name".to_string());
        }
        if self.planned_start != other.planned_start {
            differences.push("planned_start".to_string());
        }
        if self.planned_end != other.planned_end {
            differences.push("planned_end".to_string());
        }
        if self.actual_start != other.actual_start {
            differences.push("actual_start".to_string());
        }
        if self.actual_end != other.actual_end {
            differences.push("actual_end".to_string());
        }
        differences
    }
}

pub(crate) fn hours_between(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    (end - start).num_milliseconds() as f64 / 3_600_000.0
}

/// A discarded activity that shared its task code with an earlier one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateActivity {
    pub activity: Activity,
    pub is_identical: bool,
    pub differences: Vec<String>,
}

/// Keeps the first occurrence of every task code.
///
/// Returns the surviving activities in their original order along with the
/// discarded duplicates grouped by task code.
pub fn deduplicate_activities(
    activities: Vec<Activity>,
) -> (Vec<Activity>, BTreeMap<String, Vec<DuplicateActivity>>) {
    let mut kept: Vec<Activity> = Vec::with_capacity(activities.len());
    let mut positions: BTreeMap<String, usize> = BTreeMap::new();
    let mut discarded: BTreeMap<String, Vec<DuplicateActivity>> = BTreeMap::new();

    for activity in activities {
        match positions.get(&activity.task_code) {
            Some(&idx) => {
                let differences = kept[idx].differing_fields(&activity);
                tracing::warn!(
                    task_code = %activity.task_code,
                    identical = differences.is_empty(),
                    "discarding duplicate activity"
                );
                discarded
                    .entry(activity.task_code.clone())
                    .or_default()
                    .push(DuplicateActivity {
                        is_identical: differences.is_empty(),
                        differences,
                        activity,
                    });
            }
            None => {
                positions.insert(activity.task_code.clone(), kept.len());
                kept.push(activity);
            }
        }
    }

    (kept, discarded)
}
