use crate::activity::Activity;
use crate::dependency::Dependency;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub project_code: String,
    pub project_name: String,
}

impl Default for ProjectInfo {
    fn default() -> Self {
        Self {
            project_code: "PROJECT".to_string(),
            project_name: "New Project".to_string(),
        }
    }
}

/// One project's schedule as handed over by ingestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "project", default)]
    pub info: ProjectInfo,
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl Project {
    pub fn new(info: ProjectInfo, activities: Vec<Activity>, dependencies: Vec<Dependency>) -> Self {
        Self {
            info,
            activities,
            dependencies,
        }
    }

    pub fn find_activity(&self, task_code: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.task_code == task_code)
    }
}
