mod common;

use common::{cell, ctx, ids_after, open, request, with_filter};
use serde_json::Value;
use toaster_tables::tables::{
    CustomImagesTable, ImageRecipesTable, LayerMachinesTable, LayersTable, MachinesTable,
    ProjectsTable, SelectPackagesTable, SoftwareRecipesTable,
};
use toaster_tables::{Error, TableResponse, get_data, lookup};
use toaster_testing::DatasetBuilder;
use toaster_types::{BuildOutcome, MessageLevel, ProjectId};

fn names(response: &TableResponse) -> Vec<String> {
    response
        .rows
        .iter()
        .map(|row| match row.get("name") {
            Some(Value::String(s)) => s.clone(),
            other => panic!("unexpected name cell {:?}", other),
        })
        .collect()
}

fn projects_with_default(default_has_build: bool) -> (DatasetBuilder, ProjectId, ProjectId) {
    let mut data = DatasetBuilder::new();
    let release = data.release("master");
    let default = data.default_project();
    let demo = data.project("demo", Some(release));
    if default_has_build {
        data.build(default, BuildOutcome::Succeeded, "2024-03-09 08:00:00", "2024-03-09 09:00:00");
    }
    (data, default, demo)
}

#[test]
fn test_default_project_hidden_until_it_has_builds() {
    let (data, _, demo) = projects_with_default(false);
    let db = open(data);

    let response = get_data(&ProjectsTable, &db, &ctx(), &request()).unwrap();
    assert_eq!(ids_after(&response, "name", "/project/"), vec![demo.get()]);

    let (data, default, _) = projects_with_default(true);
    let db = open(data);

    let response = get_data(&ProjectsTable, &db, &ctx(), &request()).unwrap();
    assert_eq!(response.total, 2);
    // command line builds land on the builds page, without release or machine
    let row = ids_after(&response, "name", "/project/")
        .iter()
        .position(|id| *id == default.get())
        .unwrap();
    assert!(cell(&response, row, "name").contains(&format!("/project/{}/builds/", default)));
    assert!(cell(&response, row, "release").contains("Not applicable"));
    assert!(cell(&response, row, "machine").contains("Not applicable"));
}

#[test]
fn test_projects_last_build_annotations() {
    let mut data = DatasetBuilder::new();
    let release = data.release("master");
    let project = data.project("demo", Some(release));
    let old = data.build(project, BuildOutcome::Succeeded, "2024-03-08 08:00:00", "2024-03-08 09:00:00");
    data.target(old, "core-image-sato");
    let last = data.build(project, BuildOutcome::Failed, "2024-03-09 08:00:00", "2024-03-09 09:00:00");
    data.target(last, "core-image-minimal");
    data.log(last, MessageLevel::Error);
    data.log(last, MessageLevel::Warning);
    data.log(last, MessageLevel::Warning);
    data.build(project, BuildOutcome::InProgress, "2024-03-10 08:00:00", "2024-03-10 08:00:00");
    let db = open(data);

    let response = get_data(&ProjectsTable, &db, &ctx(), &request()).unwrap();

    assert_eq!(response.total, 1);
    assert!(cell(&response, 0, "number_of_builds").contains(">2<"));
    assert!(cell(&response, 0, "recipe_name").contains("core-image-minimal"));
    assert!(cell(&response, 0, "last_build_outcome").contains(&format!("/build/{}", last)));
    assert!(cell(&response, 0, "errors").contains("1 error<"));
    assert!(cell(&response, 0, "warnings").contains("2 warnings"));
    assert_eq!(cell(&response, 0, "image_files"), "");
}

#[test]
fn test_projects_ordered_by_last_activity() {
    let mut data = DatasetBuilder::new();
    let release = data.release("master");
    let old = data.project("old", Some(release));
    let busy = data.project("busy", Some(release));
    let quiet = data.project("quiet", Some(release));
    data.touch_project(busy, "2024-03-05 12:00:00");
    data.touch_project(quiet, "2024-02-01 12:00:00");
    let db = open(data);

    let response = get_data(&ProjectsTable, &db, &ctx(), &request()).unwrap();
    assert_eq!(response.orderby, "-updated");
    assert_eq!(
        ids_after(&response, "name", "/project/"),
        vec![busy.get(), quiet.get(), old.get()]
    );

    let mut req = request();
    req.orderby = Some("updated".to_string());
    let response = get_data(&ProjectsTable, &db, &ctx(), &req).unwrap();
    assert_eq!(
        ids_after(&response, "name", "/project/"),
        vec![old.get(), quiet.get(), busy.get()]
    );
}

/// Project on `master` with two compatible layers (one added), a layer of
/// another release and a layer imported into the project.
fn layered_project() -> (DatasetBuilder, ProjectId) {
    let mut data = DatasetBuilder::new();
    let master = data.release("master");
    let other = data.release("dunfell");
    let project = data.project("demo", Some(master));

    let core = data.layer("openembedded-core", Some(master));
    let bsp = data.layer("meta-bsp", Some(master));
    let old = data.layer("meta-old", Some(other));
    let imported = data.layer("meta-local", None);
    let local_layer = data.layer_of(imported).unwrap();
    let local = data.layer_version(local_layer, None, Some(project));
    data.add_layer_to_project(project, core);
    data.layer_dependency(bsp, core);

    data.machine("qemux86-64", core);
    data.machine("beaglebone", bsp);
    data.machine("oldboard", old);
    data.machine("localboard", local);

    data.recipe("core-image-minimal", core, true);
    data.recipe("busybox", core, false);
    data.recipe("bsp-image", bsp, true);
    data.recipe("old-image", old, true);
    data.recipe("", core, false);

    (data, project)
}

#[test]
fn test_layers_compatible_with_project_release() {
    let (data, project) = layered_project();
    let db = open(data);

    let response = get_data(&LayersTable, &db, &ctx().with_project(project), &request()).unwrap();

    assert_eq!(
        names(&response),
        vec!["meta-bsp", "meta-local", "openembedded-core"]
    );
    let bsp = names(&response).iter().position(|n| n == "meta-bsp").unwrap();
    assert!(cell(&response, bsp, "dependencies").contains("openembedded-core"));
}

#[test]
fn test_project_without_release_has_nothing_compatible() {
    let mut data = DatasetBuilder::new();
    let master = data.release("master");
    let project = data.project("bare", None);
    let core = data.layer("openembedded-core", Some(master));
    let imported = data.layer("meta-local", None);
    let local_layer = data.layer_of(imported).unwrap();
    let local = data.layer_version(local_layer, None, Some(project));
    data.add_layer_to_project(project, core);
    data.machine("localboard", local);
    data.recipe("local-image", local, true);
    data.recipe("busybox", core, false);
    let db = open(data);
    let ctx = ctx().with_project(project);

    let layers = get_data(&LayersTable, &db, &ctx, &request()).unwrap();
    assert_eq!(layers.total, 0);
    assert!(layers.rows.is_empty());
    assert_eq!(get_data(&MachinesTable, &db, &ctx, &request()).unwrap().total, 0);
    assert_eq!(get_data(&ImageRecipesTable, &db, &ctx, &request()).unwrap().total, 0);
    assert_eq!(get_data(&SoftwareRecipesTable, &db, &ctx, &request()).unwrap().total, 0);

    // toggles still partition the empty set
    let added = get_data(&LayersTable, &db, &ctx, &with_filter("in_current_project:in_project")).unwrap();
    assert_eq!(added.total, 0);
}

#[test]
fn test_layer_toggles_partition() {
    let (data, project) = layered_project();
    let db = open(data);
    let ctx = ctx().with_project(project);

    let all = get_data(&LayersTable, &db, &ctx, &request()).unwrap();
    let added = get_data(&LayersTable, &db, &ctx, &with_filter("in_current_project:in_project")).unwrap();
    let missing =
        get_data(&LayersTable, &db, &ctx, &with_filter("in_current_project:not_in_project")).unwrap();

    assert_eq!(names(&added), vec!["openembedded-core"]);
    assert_eq!(added.total + missing.total, all.total);
    assert!(names(&missing).iter().all(|n| !names(&added).contains(n)));
}

#[test]
fn test_machine_toggles_and_search() {
    let (data, project) = layered_project();
    let db = open(data);
    let ctx = ctx().with_project(project);

    let all = get_data(&MachinesTable, &db, &ctx, &request()).unwrap();
    assert_eq!(names(&all), vec!["beaglebone", "localboard", "qemux86-64"]);

    let added = get_data(&MachinesTable, &db, &ctx, &with_filter("in_current_project:in_project")).unwrap();
    let missing =
        get_data(&MachinesTable, &db, &ctx, &with_filter("in_current_project:not_in_project")).unwrap();
    assert_eq!(names(&added), vec!["qemux86-64"]);
    assert_eq!(added.total + missing.total, all.total);

    let mut req = request();
    req.search = Some("beagle".to_string());
    let found = get_data(&MachinesTable, &db, &ctx, &req).unwrap();
    assert_eq!(names(&found), vec!["beaglebone"]);

    req.orderby = Some("-name".to_string());
    req.search = None;
    let descending = get_data(&MachinesTable, &db, &ctx, &req).unwrap();
    assert_eq!(names(&descending), vec!["qemux86-64", "localboard", "beaglebone"]);
}

#[test]
fn test_layer_machines_requires_layer() {
    let (data, project) = layered_project();
    let db = open(data);

    let err = get_data(&LayerMachinesTable, &db, &ctx().with_project(project), &request())
        .unwrap_err();
    assert!(matches!(err, Error::MissingParameter("layerid")));
    assert!(err.is_bad_request());
}

#[test]
fn test_image_and_software_recipes_split() {
    let (data, project) = layered_project();
    let db = open(data);
    let ctx = ctx().with_project(project);

    let images = get_data(&ImageRecipesTable, &db, &ctx, &request()).unwrap();
    assert_eq!(names(&images), vec!["bsp-image", "core-image-minimal"]);

    let software = get_data(&SoftwareRecipesTable, &db, &ctx, &request()).unwrap();
    // unnamed recipes are never listed
    assert_eq!(names(&software), vec!["busybox"]);
}

#[test]
fn test_select_packages_union() {
    let mut data = DatasetBuilder::new();
    let project = data.project("demo", None);
    let other = data.project("other", None);
    let build = data.build(project, BuildOutcome::Succeeded, "2024-03-09 08:00:00", "2024-03-09 09:00:00");
    let elsewhere = data.build(other, BuildOutcome::Succeeded, "2024-03-09 08:00:00", "2024-03-09 09:00:00");

    let in_image = data.package("busybox", None, 1024);
    data.package("busybox", Some(build), 2048);
    data.package("glibc", Some(build), 4096);
    data.package("openssl", Some(elsewhere), 512);
    let image = data.custom_image("my-image", None, project, &[in_image]);
    let db = open(data);

    let ctx = ctx().with_project(project).with_recipe(image);
    let response = get_data(&SelectPackagesTable, &db, &ctx, &request()).unwrap();

    assert_eq!(names(&response), vec!["busybox", "glibc"]);
    // the first button removes; it is hidden for packages not in the image
    let remove_hidden = |row: usize| {
        let html = cell(&response, row, "add_rm_pkg_btn");
        html.split("</button>").next().unwrap().contains("display:none")
    };
    assert!(cell(&response, 0, "add_rm_pkg_btn").contains(&format!("data-package=\"{}\"", in_image)));
    assert!(!remove_hidden(0));
    assert!(remove_hidden(1));
    assert_eq!(cell(&response, 1, "size"), "4.0 KB");
}

#[test]
fn test_custom_images_scoped_to_project() {
    let mut data = DatasetBuilder::new();
    let project = data.project("demo", None);
    let other = data.project("other", None);
    let pkg = data.package("busybox", None, 10);
    data.custom_image("mine", None, project, &[pkg]);
    data.custom_image("theirs", None, other, &[]);
    let db = open(data);

    let response = get_data(&CustomImagesTable, &db, &ctx().with_project(project), &request()).unwrap();

    assert_eq!(response.total, 1);
    assert!(cell(&response, 0, "name").contains("mine"));
    assert!(cell(&response, 0, "approx_packages").contains(">1<"));
}

#[test]
fn test_registry_lookup_runs_table() {
    let (data, project) = layered_project();
    let db = open(data);

    let table = lookup("machines").unwrap();
    let response = table.get_data(&db, &ctx().with_project(project), &request()).unwrap();
    assert_eq!(response.table, "machines");
    assert_eq!(response.total, 3);

    let err = lookup("nosuchtable").err().unwrap();
    assert!(matches!(err, Error::UnknownTable(_)));
}
