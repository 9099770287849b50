pub mod cycles;
pub mod schedule_dag;

pub use cycles::{CycleInfo, detect_cycles, has_cycles};
pub use schedule_dag::{DependencyEdge, ScheduleDag};
