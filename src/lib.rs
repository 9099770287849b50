pub mod activity;
pub mod activity_validation;
pub mod calculations;
pub mod config;
pub mod dependency;
pub mod error;
pub mod graph;
pub mod ingest;
#[cfg(feature = "cli")]
pub mod logging;
pub mod project;
pub mod report;
pub mod schedule;
pub mod table;

pub use activity::Activity;
pub use calculations::ActivityTiming;
pub use config::{CpmConfig, EdgePolicy};
pub use dependency::{Dependency, ParseRelationshipKindError, RelationshipKind};
pub use error::CpmError;
pub use graph::CycleInfo;
pub use project::{Project, ProjectInfo};
pub use report::{CriticalPathReport, CriticalPathSummary};
pub use schedule::{
    CpmOutcome, CpmSchedule, CriticalPath, CriticalPathCalculator, CriticalPathStep,
    calculate_many,
};
