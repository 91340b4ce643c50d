use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use toaster_types::{
    Build, BuildId, BuildOutcome, LayerDependency, LayerId, LayerVersion, LayerVersionId,
    LogMessageId, MachineId, MessageLevel, PackageId, Project, ProjectId, RecipeId, ReleaseId,
    TargetId, Task, TaskId, TaskOutcome,
};

// --------------------------------------------------------
// Import records
// --------------------------------------------------------
//
// Flat, foreign-key shaped rows as the build system exports them. A
// `Dataset` is what `Database::import` loads; everything the tables read
// comes from these.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseRecord {
    pub id: ReleaseId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub branch_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerRecord {
    pub id: LayerId,
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub vcs_url: String,
    #[serde(default)]
    pub vcs_web_url: Option<String>,
    #[serde(default)]
    pub vcs_web_tree_base_url: Option<String>,
    #[serde(default)]
    pub vcs_web_file_base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerVersionRecord {
    pub id: LayerVersionId,
    pub layer_id: LayerId,
    #[serde(default)]
    pub release_id: Option<ReleaseId>,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    #[serde(default)]
    pub build_id: Option<BuildId>,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub commit: String,
    #[serde(default)]
    pub dirpath: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerDependencyRecord {
    pub layer_version_id: LayerVersionId,
    pub depends_on_id: LayerVersionId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub release_id: Option<ReleaseId>,
    #[serde(default)]
    pub machine: Option<String>,
    pub created: NaiveDateTime,
    pub updated: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectLayerRecord {
    pub project_id: ProjectId,
    pub layer_version_id: LayerVersionId,
    #[serde(default = "default_optional")]
    pub optional: bool,
}

fn default_optional() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub id: RecipeId,
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub is_image: bool,
    pub layer_version_id: LayerVersionId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineRecord {
    pub id: MachineId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub layer_version_id: LayerVersionId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomImageRecipeRecord {
    pub id: RecipeId,
    pub name: String,
    #[serde(default)]
    pub base_recipe_id: Option<RecipeId>,
    pub project_id: ProjectId,
    #[serde(default)]
    pub file_path: String,
    /// Packages currently in the image.
    #[serde(default)]
    pub packages: Vec<PackageId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildRecord {
    pub id: BuildId,
    pub project_id: ProjectId,
    #[serde(default)]
    pub machine: String,
    pub outcome: BuildOutcome,
    pub started_on: NaiveDateTime,
    pub completed_on: NaiveDateTime,
    #[serde(default)]
    pub cooker_log_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetRecord {
    pub id: TargetId,
    pub build_id: BuildId,
    pub target: String,
    #[serde(default)]
    pub task: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetImageFileRecord {
    pub target_id: TargetId,
    pub file_name: String,
    #[serde(default)]
    pub file_size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub build_id: BuildId,
    #[serde(default)]
    pub recipe_name: String,
    pub task_name: String,
    pub outcome: TaskOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageRecord {
    pub id: PackageId,
    #[serde(default)]
    pub build_id: Option<BuildId>,
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub revision: String,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogMessageRecord {
    pub id: LogMessageId,
    pub build_id: BuildId,
    pub level: MessageLevel,
    #[serde(default)]
    pub message: String,
}

/// A full export of dashboard data, loadable with `Database::import`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub releases: Vec<ReleaseRecord>,
    pub layers: Vec<LayerRecord>,
    pub layer_versions: Vec<LayerVersionRecord>,
    pub layer_dependencies: Vec<LayerDependencyRecord>,
    pub projects: Vec<ProjectRecord>,
    pub project_layers: Vec<ProjectLayerRecord>,
    pub recipes: Vec<RecipeRecord>,
    pub machines: Vec<MachineRecord>,
    pub builds: Vec<BuildRecord>,
    pub targets: Vec<TargetRecord>,
    pub target_image_files: Vec<TargetImageFileRecord>,
    pub tasks: Vec<TaskRecord>,
    pub packages: Vec<PackageRecord>,
    pub custom_image_recipes: Vec<CustomImageRecipeRecord>,
    pub log_messages: Vec<LogMessageRecord>,
}

impl Dataset {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Row counts written by an import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub projects: usize,
    pub layer_versions: usize,
    pub recipes: usize,
    pub machines: usize,
    pub builds: usize,
    pub packages: usize,
    pub log_messages: usize,
}

// --------------------------------------------------------
// Annotated rows
// --------------------------------------------------------

/// Layer version row with its dependency list.
#[derive(Debug, Clone, Serialize)]
pub struct LayerSummary {
    pub layer_version: LayerVersion,
    pub dependencies_count: i64,
    /// Loaded for the rows of the current page only.
    pub dependencies: Vec<LayerDependency>,
}

/// Build row annotated with log message counts.
#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    pub build: Build,
    pub project_name: String,
    pub project_is_default: bool,
    /// ERROR and EXCEPTION log messages.
    pub errors_no: i64,
    /// WARNING log messages.
    pub warnings_no: i64,
    // Loaded for the rows of the current page only.
    pub failed_tasks: Vec<Task>,
    pub target_labels: Vec<String>,
    pub image_extensions: String,
}

impl BuildSummary {
    pub fn outcome(&self) -> BuildOutcome {
        self.build.outcome
    }
}

/// Most recent finished build of a project.
#[derive(Debug, Clone, Serialize)]
pub struct LastBuild {
    pub id: BuildId,
    pub outcome: BuildOutcome,
    pub target: String,
    pub errors: i64,
    pub warnings: i64,
    pub image_extensions: String,
}

/// Project row annotated with build counts.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub project: Project,
    /// Every build of the project, whatever its state.
    pub num_builds: i64,
    /// Builds that ran to completion (succeeded or failed).
    pub finished_builds: i64,
    pub last_build_id: Option<BuildId>,
    /// Loaded for the rows of the current page only.
    pub last_build: Option<LastBuild>,
}
