use serde::{Deserialize, Serialize};

use crate::{LayerVersion, MachineId, ProjectId, RecipeId};

/// A buildable software unit definition provided by a layer version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub version: String,
    pub summary: String,
    pub description: String,
    pub section: String,
    pub license: String,
    /// Path of the `.bb` file relative to the layer directory.
    pub file_path: String,
    pub is_image: bool,
    pub layer_version: LayerVersion,
}

impl Recipe {
    pub fn description_or_summary(&self) -> &str {
        if self.description.is_empty() {
            &self.summary
        } else {
            &self.description
        }
    }

    pub fn vcs_recipe_file_link_url(&self) -> Option<String> {
        self.layer_version.vcs_file_link_url(&self.file_path)
    }
}

/// A machine configuration provided by a layer version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    pub id: MachineId,
    pub name: String,
    pub description: String,
    pub layer_version: LayerVersion,
}

impl Machine {
    pub fn machine_file(&self) -> String {
        format!("conf/machine/{}.conf", self.name)
    }

    pub fn vcs_machine_file_link_url(&self) -> Option<String> {
        self.layer_version.vcs_file_link_url(&self.machine_file())
    }
}

/// An image recipe customised inside one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomImageRecipe {
    pub id: RecipeId,
    pub name: String,
    pub base_recipe_id: Option<RecipeId>,
    pub project_id: ProjectId,
    pub file_path: String,
    /// Number of packages currently in the image.
    pub package_count: i64,
}
