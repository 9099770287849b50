pub mod backward_pass;
pub mod critical_paths;
pub mod float;
pub mod forward_pass;

use serde::{Deserialize, Serialize};

/// CPM dates for one activity, in hours from the project clock origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivityTiming {
    pub early_start: f64,
    pub early_finish: f64,
    pub late_start: f64,
    pub late_finish: f64,
    pub total_float: f64,
}

impl ActivityTiming {
    pub fn is_critical(&self, tolerance: f64) -> bool {
        self.total_float <= tolerance
    }
}
