//! Fixtures for building datasets in tests.
//!
//! Every entity gets a fresh id from a single counter, so ids never collide
//! across tables and tests can refer to rows by the value a method returned.

use chrono::{NaiveDate, NaiveDateTime};
use toaster_index::{
    BuildRecord, CustomImageRecipeRecord, Dataset, LayerDependencyRecord, LayerRecord,
    LayerVersionRecord, LogMessageRecord, MachineRecord, PackageRecord, ProjectLayerRecord,
    ProjectRecord, RecipeRecord, ReleaseRecord, TargetImageFileRecord, TargetRecord, TaskRecord,
};
use toaster_types::{
    BuildId, BuildOutcome, LayerId, LayerVersionId, LogMessageId, MachineId, MessageLevel,
    PackageId, ProjectId, RecipeId, ReleaseId, TargetId, TaskId, TaskOutcome, parse_timestamp,
};

/// Name given to the project collecting command line builds.
pub const DEFAULT_PROJECT_NAME: &str = "Command line builds";

/// Parse a `YYYY-MM-DD HH:MM:SS` literal.
///
/// Panics on malformed input; fixtures are written by hand.
pub fn ts(literal: &str) -> NaiveDateTime {
    parse_timestamp(literal).unwrap_or_else(|e| panic!("bad fixture timestamp {literal}: {e}"))
}

pub fn date(literal: &str) -> NaiveDate {
    NaiveDate::parse_from_str(literal, "%Y-%m-%d")
        .unwrap_or_else(|e| panic!("bad fixture date {literal}: {e}"))
}

/// Incremental dataset builder.
///
/// # Example
/// ```
/// use toaster_testing::DatasetBuilder;
/// use toaster_types::BuildOutcome;
///
/// let mut data = DatasetBuilder::new();
/// let release = data.release("master");
/// let project = data.project("demo", Some(release));
/// data.build(project, BuildOutcome::Succeeded, "2024-03-01 10:00:00", "2024-03-01 11:00:00");
/// let dataset = data.finish();
/// assert_eq!(dataset.builds.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    dataset: Dataset,
    next_id: i64,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn finish(self) -> Dataset {
        self.dataset
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    // --------------------------------------------------------
    // Layers
    // --------------------------------------------------------

    pub fn release(&mut self, name: &str) -> ReleaseId {
        let id = ReleaseId::new(self.id());
        self.dataset.releases.push(ReleaseRecord {
            id,
            name: name.to_string(),
            description: format!("{} release", name),
            branch_name: name.to_string(),
        });
        id
    }

    /// A layer with one version available for `release`.
    pub fn layer(&mut self, name: &str, release: Option<ReleaseId>) -> LayerVersionId {
        let layer_id = LayerId::new(self.id());
        self.dataset.layers.push(LayerRecord {
            id: layer_id,
            name: name.to_string(),
            summary: format!("{} summary", name),
            description: String::new(),
            vcs_url: format!("git://git.example.com/{}", name),
            vcs_web_url: Some(format!("https://git.example.com/{}", name)),
            vcs_web_tree_base_url: Some(format!(
                "https://git.example.com/{}/tree/%path%?h=%branch%",
                name
            )),
            vcs_web_file_base_url: Some(format!(
                "https://git.example.com/{}/tree/%path%?h=%branch%",
                name
            )),
        });
        self.layer_version(layer_id, release, None)
    }

    /// Another version of an existing layer, optionally local to a project.
    pub fn layer_version(
        &mut self,
        layer_id: LayerId,
        release: Option<ReleaseId>,
        project: Option<ProjectId>,
    ) -> LayerVersionId {
        let id = LayerVersionId::new(self.id());
        self.dataset.layer_versions.push(LayerVersionRecord {
            id,
            layer_id,
            release_id: release,
            project_id: project,
            build_id: None,
            branch: "master".to_string(),
            commit: String::new(),
            dirpath: String::new(),
        });
        id
    }

    pub fn layer_of(&self, layer_version: LayerVersionId) -> Option<LayerId> {
        self.dataset
            .layer_versions
            .iter()
            .find(|lv| lv.id == layer_version)
            .map(|lv| lv.layer_id)
    }

    pub fn layer_dependency(&mut self, layer_version: LayerVersionId, depends_on: LayerVersionId) {
        self.dataset.layer_dependencies.push(LayerDependencyRecord {
            layer_version_id: layer_version,
            depends_on_id: depends_on,
        });
    }

    pub fn add_layer_to_project(&mut self, project: ProjectId, layer_version: LayerVersionId) {
        self.dataset.project_layers.push(ProjectLayerRecord {
            project_id: project,
            layer_version_id: layer_version,
            optional: true,
        });
    }

    pub fn recipe(&mut self, name: &str, layer_version: LayerVersionId, is_image: bool) -> RecipeId {
        let id = RecipeId::new(self.id());
        self.dataset.recipes.push(RecipeRecord {
            id,
            name: name.to_string(),
            version: "1.0".to_string(),
            summary: format!("{} summary", name),
            description: String::new(),
            section: if is_image { "image" } else { "base" }.to_string(),
            license: "MIT".to_string(),
            file_path: format!("recipes-core/{}/{}_1.0.bb", name, name),
            is_image,
            layer_version_id: layer_version,
        });
        id
    }

    pub fn classify_recipe(&mut self, recipe: RecipeId, section: &str, license: &str) {
        if let Some(r) = self.dataset.recipes.iter_mut().find(|r| r.id == recipe) {
            r.section = section.to_string();
            r.license = license.to_string();
        }
    }

    pub fn machine(&mut self, name: &str, layer_version: LayerVersionId) -> MachineId {
        let id = MachineId::new(self.id());
        self.dataset.machines.push(MachineRecord {
            id,
            name: name.to_string(),
            description: format!("{} machine", name),
            layer_version_id: layer_version,
        });
        id
    }

    // --------------------------------------------------------
    // Projects
    // --------------------------------------------------------

    pub fn project(&mut self, name: &str, release: Option<ReleaseId>) -> ProjectId {
        self.push_project(name, release, false)
    }

    /// The project collecting command line builds.
    pub fn default_project(&mut self) -> ProjectId {
        self.push_project(DEFAULT_PROJECT_NAME, None, true)
    }

    fn push_project(&mut self, name: &str, release: Option<ReleaseId>, is_default: bool) -> ProjectId {
        let id = ProjectId::new(self.id());
        let machine = (!is_default).then(|| "qemux86-64".to_string());
        self.dataset.projects.push(ProjectRecord {
            id,
            name: name.to_string(),
            is_default,
            release_id: release,
            machine,
            created: ts("2024-01-01 09:00:00"),
            updated: ts("2024-01-01 09:00:00"),
        });
        id
    }

    pub fn touch_project(&mut self, project: ProjectId, updated: &str) {
        if let Some(p) = self.dataset.projects.iter_mut().find(|p| p.id == project) {
            p.updated = ts(updated);
        }
    }

    pub fn custom_image(
        &mut self,
        name: &str,
        base: Option<RecipeId>,
        project: ProjectId,
        packages: &[PackageId],
    ) -> RecipeId {
        let id = RecipeId::new(self.id());
        self.dataset.custom_image_recipes.push(CustomImageRecipeRecord {
            id,
            name: name.to_string(),
            base_recipe_id: base,
            project_id: project,
            file_path: String::new(),
            packages: packages.to_vec(),
        });
        id
    }

    // --------------------------------------------------------
    // Builds
    // --------------------------------------------------------

    pub fn build(
        &mut self,
        project: ProjectId,
        outcome: BuildOutcome,
        started_on: &str,
        completed_on: &str,
    ) -> BuildId {
        let id = BuildId::new(self.id());
        self.dataset.builds.push(BuildRecord {
            id,
            project_id: project,
            machine: "qemux86-64".to_string(),
            outcome,
            started_on: ts(started_on),
            completed_on: ts(completed_on),
            cooker_log_path: Some(format!("/tmp/build/cooker-{}.log", id)),
        });
        id
    }

    /// Builds default to `qemux86-64`.
    pub fn build_machine(&mut self, build: BuildId, machine: &str) {
        if let Some(b) = self.dataset.builds.iter_mut().find(|b| b.id == build) {
            b.machine = machine.to_string();
        }
    }

    pub fn target(&mut self, build: BuildId, target: &str) -> TargetId {
        let id = TargetId::new(self.id());
        self.dataset.targets.push(TargetRecord {
            id,
            build_id: build,
            target: target.to_string(),
            task: None,
        });
        id
    }

    pub fn image_file(&mut self, target: TargetId, file_name: &str, file_size: i64) {
        self.dataset.target_image_files.push(TargetImageFileRecord {
            target_id: target,
            file_name: file_name.to_string(),
            file_size,
        });
    }

    pub fn task(&mut self, build: BuildId, recipe: &str, task: &str, outcome: TaskOutcome) -> TaskId {
        let id = TaskId::new(self.id());
        self.dataset.tasks.push(TaskRecord {
            id,
            build_id: build,
            recipe_name: recipe.to_string(),
            task_name: task.to_string(),
            outcome,
        });
        id
    }

    pub fn log(&mut self, build: BuildId, level: MessageLevel) -> LogMessageId {
        let id = LogMessageId::new(self.id());
        self.dataset.log_messages.push(LogMessageRecord {
            id,
            build_id: build,
            level,
            message: format!("{:?} message", level),
        });
        id
    }

    pub fn package(&mut self, name: &str, build: Option<BuildId>, size: i64) -> PackageId {
        let id = PackageId::new(self.id());
        self.dataset.packages.push(PackageRecord {
            id,
            build_id: build,
            name: name.to_string(),
            version: "1.0".to_string(),
            revision: "r0".to_string(),
            size,
            summary: format!("{} package", name),
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_across_entities() {
        let mut data = DatasetBuilder::new();
        let release = data.release("master");
        let lv = data.layer("meta-a", Some(release));
        let project = data.project("p", Some(release));

        let ids = [release.get(), lv.get(), project.get()];
        assert_eq!(ids.len(), ids.iter().collect::<std::collections::HashSet<_>>().len());
        assert!(data.layer_of(lv).is_some());
    }
}
