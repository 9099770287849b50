use crate::graph::cycles::CycleInfo;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CpmError {
    #[error("dependency graph contains {} cycle(s): {}", .cycles.len(), describe_cycles(.cycles))]
    Cycle { cycles: Vec<CycleInfo> },
    #[error("dependency {predecessor} -> {successor} references unknown activity {missing}")]
    UnknownActivity {
        predecessor: String,
        successor: String,
        missing: String,
    },
    #[error("duplicate activity id {0}")]
    DuplicateActivity(String),
    #[error("activity {task_code} has invalid duration {hours} hours")]
    InvalidDuration { task_code: String, hours: f64 },
    #[error("no activity has a planned start date and no project start was configured")]
    UndatedSchedule,
}

fn describe_cycles(cycles: &[CycleInfo]) -> String {
    cycles
        .iter()
        .map(|cycle| cycle.task_codes.join(" -> "))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_error_lists_every_cycle() {
        let err = CpmError::Cycle {
            cycles: vec![CycleInfo {
                cycle_id: 1,
                task_codes: vec!["A".into(), "B".into()],
                task_names: vec!["Alpha".into(), "Beta".into()],
                length: 2,
            }],
        };
        assert_eq!(
            err.to_string(),
            "dependency graph contains 1 cycle(s): A -> B"
        );
    }
}
