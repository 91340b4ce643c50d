use serde::{Deserialize, Serialize};

use crate::{BuildId, LayerId, LayerVersionId, ProjectId, ReleaseId};

/// Version of the build system a project is pinned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub id: ReleaseId,
    pub name: String,
    pub description: String,
    /// Branch name compatible layers are checked out at.
    pub branch_name: String,
}

/// A layer as published by a layer source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub summary: String,
    pub description: String,
    pub vcs_url: String,
    /// Web front-end for the repository, if any.
    pub vcs_web_url: Option<String>,
    /// Tree browsing URL with `%path%` and `%branch%` placeholders.
    pub vcs_web_tree_base_url: Option<String>,
    /// File browsing URL with `%path%` and `%branch%` placeholders.
    pub vcs_web_file_base_url: Option<String>,
}

/// A layer checked out at a particular revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerVersion {
    pub id: LayerVersionId,
    pub layer: Layer,
    /// Release this version is compatible with.
    pub release: Option<Release>,
    /// Set when the layer was imported into a single project.
    pub project_id: Option<ProjectId>,
    /// Set when the layer version was captured from a build.
    pub build_id: Option<BuildId>,
    pub branch: String,
    pub commit: String,
    /// Layer directory inside the repository.
    pub dirpath: String,
}

impl LayerVersion {
    /// Branch, tag or commit this layer version refers to.
    pub fn vcs_reference(&self) -> String {
        if !self.branch.is_empty() {
            return self.branch.clone();
        }
        if let Some(release) = &self.release
            && !release.branch_name.is_empty()
        {
            return release.branch_name.clone();
        }
        if !self.commit.is_empty() {
            return self.commit.clone();
        }
        "N/A".to_string()
    }

    pub fn vcs_link_url(&self) -> Option<&str> {
        self.layer
            .vcs_web_url
            .as_deref()
            .filter(|url| !url.is_empty())
    }

    /// Web link to the layer directory.
    pub fn vcs_dirpath_link_url(&self) -> Option<String> {
        let base = self.layer.vcs_web_tree_base_url.as_deref()?;
        if base.is_empty() {
            return None;
        }
        Some(self.substitute(base, self.dirpath.trim_start_matches('/')))
    }

    /// Web link to a file inside the layer directory.
    pub fn vcs_file_link_url(&self, file_path: &str) -> Option<String> {
        let base = self.layer.vcs_web_file_base_url.as_deref()?;
        if base.is_empty() {
            return None;
        }
        let file_path = file_path.trim_start_matches('/');
        let path = if self.dirpath.is_empty() {
            file_path.to_string()
        } else {
            format!("{}/{}", self.dirpath.trim_matches('/'), file_path)
        };
        Some(self.substitute(base, &path))
    }

    fn substitute(&self, base: &str, path: &str) -> String {
        base.replace("%path%", path)
            .replace("%branch%", &self.vcs_reference())
    }
}

/// Declared dependency of one layer version on another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerDependency {
    pub layer_version_id: LayerVersionId,
    pub depends_on: LayerVersionId,
    /// Name of the layer depended upon.
    pub depends_on_name: String,
}
