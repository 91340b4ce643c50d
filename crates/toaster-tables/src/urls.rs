//! Dashboard routes the rendered cells link to.

use toaster_types::{BuildId, LayerVersionId, ProjectId, RecipeId, TaskId};

const ROOT: &str = "/toastergui";

pub fn project(pid: ProjectId) -> String {
    format!("{}/project/{}/", ROOT, pid)
}

pub fn project_builds(pid: ProjectId) -> String {
    format!("{}/project/{}/builds/", ROOT, pid)
}

/// Landing page of a project. The default project only collects command
/// line builds, so it lands on its builds page.
pub fn project_url(pid: ProjectId, is_default: bool) -> String {
    if is_default {
        project_builds(pid)
    } else {
        project(pid)
    }
}

pub fn layer_details(pid: ProjectId, layer_version: LayerVersionId) -> String {
    format!("{}/project/{}/layer/{}", ROOT, pid, layer_version)
}

pub fn custom_recipe(pid: ProjectId, recipe: RecipeId) -> String {
    format!("{}/project/{}/customrecipe/{}", ROOT, pid, recipe)
}

pub fn build_dashboard(build: BuildId) -> String {
    format!("{}/build/{}", ROOT, build)
}

pub fn build_tasks(build: BuildId) -> String {
    format!("{}/build/{}/tasks/", ROOT, build)
}

pub fn task(build: BuildId, task: TaskId) -> String {
    format!("{}/build/{}/task/{}", ROOT, build, task)
}

pub fn build_time(build: BuildId) -> String {
    format!("{}/build/{}/time/", ROOT, build)
}

/// Download link for a build artifact (`cookerlog`, `tasklogfile`, ...).
pub fn build_artifact(build: BuildId, kind: &str, id: i64) -> String {
    format!("{}/build/{}/artifact/{}/id/{}", ROOT, build, kind, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_project_links_to_builds() {
        let pid = ProjectId::new(1);
        assert_eq!(project_url(pid, true), "/toastergui/project/1/builds/");
        assert_eq!(project_url(pid, false), "/toastergui/project/1/");
    }

    #[test]
    fn test_artifact_url() {
        assert_eq!(
            build_artifact(BuildId::new(5), "cookerlog", 5),
            "/toastergui/build/5/artifact/cookerlog/id/5"
        );
    }
}
