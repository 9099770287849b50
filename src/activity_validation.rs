use crate::activity::Activity;
use crate::dependency::Dependency;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no activities found")]
    Empty,
    #[error("activity missing task_code")]
    MissingCode,
    #[error("activity {0} missing task_name")]
    MissingName(String),
    #[error("activity {0}: planned_end before planned_start")]
    PlannedEndBeforeStart(String),
    #[error("activity {0}: has actual_end but no actual_start")]
    ActualEndWithoutStart(String),
    #[error("activity {task_code} has invalid duration {hours} hours")]
    InvalidDuration { task_code: String, hours: String },
    #[error("duplicate activity id {0}")]
    DuplicateCode(String),
    #[error("dependency {predecessor} -> {successor}: {missing} not found")]
    UnknownReference {
        predecessor: String,
        successor: String,
        missing: String,
    },
}

pub fn validate_activity(activity: &Activity) -> Result<(), ValidationError> {
    if activity.task_code.trim().is_empty() {
        return Err(ValidationError::MissingCode);
    }
    if activity.task_name.trim().is_empty() {
        return Err(ValidationError::MissingName(activity.task_code.clone()));
    }

    if let (Some(start), Some(end)) = (activity.planned_start, activity.planned_end) {
        if end < start {
            return Err(ValidationError::PlannedEndBeforeStart(
                activity.task_code.clone(),
            ));
        }
    }

    if activity.actual_end.is_some() && activity.actual_start.is_none() {
        return Err(ValidationError::ActualEndWithoutStart(
            activity.task_code.clone(),
        ));
    }

    if !activity.duration_hours.is_finite() || activity.duration_hours < 0.0 {
        return Err(ValidationError::InvalidDuration {
            task_code: activity.task_code.clone(),
            hours: activity.duration_hours.to_string(),
        });
    }

    Ok(())
}

/// Self dependencies pass here; the cycle check reports them as cycles.
pub fn validate_activities(
    activities: &[Activity],
    dependencies: &[Dependency],
) -> Result<(), ValidationError> {
    if activities.is_empty() {
        return Err(ValidationError::Empty);
    }

    let mut seen_codes = HashSet::with_capacity(activities.len());
    for activity in activities {
        validate_activity(activity)?;
        if !seen_codes.insert(activity.task_code.as_str()) {
            return Err(ValidationError::DuplicateCode(activity.task_code.clone()));
        }
    }

    for dep in dependencies {
        for code in [&dep.predecessor, &dep.successor] {
            if !seen_codes.contains(code.as_str()) {
                return Err(ValidationError::UnknownReference {
                    predecessor: dep.predecessor.clone(),
                    successor: dep.successor.clone(),
                    missing: code.clone(),
                });
            }
        }
    }

    Ok(())
}
