//! Shared dataset for the CLI and server tests.
#![cfg(test)]
#![allow(dead_code)]

use toaster_index::Dataset;
use toaster_testing::DatasetBuilder;
use toaster_types::{BuildOutcome, MessageLevel, ProjectId};

pub const TODAY: &str = "2024-03-10";

pub struct Demo {
    pub dataset: Dataset,
    pub project: ProjectId,
}

/// One project on `master` with two machines, two finished builds and one
/// build still running.
pub fn demo() -> Demo {
    let mut data = DatasetBuilder::new();
    let master = data.release("master");
    let core = data.layer("openembedded-core", Some(master));

    let project = data.project("demo", Some(master));
    data.add_layer_to_project(project, core);

    data.machine("qemux86-64", core);
    data.machine("qemuarm", core);
    data.recipe("core-image-minimal", core, true);
    data.recipe("busybox", core, false);

    let ok = data.build(
        project,
        BuildOutcome::Succeeded,
        "2024-03-09 10:00:00",
        "2024-03-09 11:00:00",
    );
    let ok_target = data.target(ok, "core-image-minimal");
    data.image_file(ok_target, "core-image-minimal-qemux86-64.ext4", 4096);
    data.log(ok, MessageLevel::Warning);

    let failed = data.build(
        project,
        BuildOutcome::Failed,
        "2024-03-10 08:00:00",
        "2024-03-10 08:30:00",
    );
    data.target(failed, "busybox");
    data.log(failed, MessageLevel::Error);

    let running = data.build(
        project,
        BuildOutcome::InProgress,
        "2024-03-10 09:00:00",
        "2024-03-10 09:00:00",
    );
    data.target(running, "core-image-sato");

    Demo {
        dataset: data.finish(),
        project,
    }
}
