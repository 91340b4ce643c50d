use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{LayerVersionId, ProjectId, Release};

/// A named collection of layers, machine and settings driving builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    /// The project collecting builds started from the command line.
    pub is_default: bool,
    pub release: Option<Release>,
    /// Currently selected machine, if any.
    pub machine: Option<String>,
    pub created: NaiveDateTime,
    pub updated: NaiveDateTime,
}

/// Membership of a layer version in a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLayer {
    pub project_id: ProjectId,
    pub layer_version_id: LayerVersionId,
    pub optional: bool,
}
