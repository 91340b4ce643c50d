mod common;

use std::collections::HashMap;
use std::fmt::Debug;

use common::{build_ids, ctx, ids_after, open, request};
use serde_json::Value;
use toaster_index::Database;
use toaster_tables::tables::{
    BuildsTable, ImageRecipesTable, LayersTable, MachinesTable, ProjectsTable,
    SelectPackagesTable, SoftwareRecipesTable,
};
use toaster_tables::{Table, TableContext, TableRequest, TableResponse};
use toaster_testing::DatasetBuilder;
use toaster_types::{BuildOutcome, LayerVersionId};

fn sorted_by(key: &str, descending: bool) -> TableRequest {
    let mut req = request();
    req.orderby = Some(if descending { format!("-{}", key) } else { key.to_string() });
    req
}

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

fn assert_monotone<K: Ord + Debug>(key: &str, descending: bool, values: &[K]) {
    let ordered = values.windows(2).all(|w| {
        if descending {
            w[0] >= w[1]
        } else {
            w[0] <= w[1]
        }
    });
    assert!(
        ordered,
        "rows sorted by {} (descending: {}) are out of order: {:?}",
        key, descending, values
    );
}

/// Sort `table` by `key` both ways and check every row's sort value.
///
/// `row_key` identifies a row in the response, `value_of` maps that
/// identity to the value the column sorts by.
fn check_both_directions<I, K>(
    table: &dyn Table,
    db: &Database,
    ctx: &TableContext,
    key: &str,
    row_key: impl Fn(&TableResponse) -> Vec<I>,
    value_of: impl Fn(&I) -> K,
) where
    I: Debug,
    K: Ord + Debug,
{
    let unsorted = table.get_data(db, ctx, &request()).unwrap();
    for descending in [false, true] {
        let response = table.get_data(db, ctx, &sorted_by(key, descending)).unwrap();
        assert_eq!(response.total, unsorted.total);
        assert_eq!(response.rows.len(), unsorted.rows.len());

        let values: Vec<K> = row_key(&response).iter().map(&value_of).collect();
        assert!(values.len() > 1, "sorting by {} needs more than one row", key);
        assert!(
            values.windows(2).any(|w| w[0] != w[1]),
            "sorting by {} needs distinct values",
            key
        );
        assert_monotone(key, descending, &values);
    }
}

#[test]
fn test_builds_sort_monotone_by_every_orderable_key() {
    let mut data = DatasetBuilder::new();
    let project = data.project("demo", None);
    let rows = [
        (BuildOutcome::Failed, "beaglebone", "2024-03-04 08:00:00", "2024-03-04 09:00:00"),
        (BuildOutcome::Succeeded, "qemuarm", "2024-03-01 08:00:00", "2024-03-02 09:00:00"),
        (BuildOutcome::Failed, "qemux86-64", "2024-03-03 08:00:00", "2024-03-03 08:30:00"),
        (BuildOutcome::Succeeded, "beaglebone", "2024-03-02 08:00:00", "2024-03-05 09:00:00"),
    ];
    let mut builds = HashMap::new();
    for (outcome, machine, started, completed) in rows {
        let id = data.build(project, outcome, started, completed);
        data.build_machine(id, machine);
        builds.insert(id.get(), (outcome.code(), machine, started, completed));
    }
    let db = open(data);
    let ctx = ctx();

    check_both_directions(&BuildsTable, &db, &ctx, "outcome", build_ids, |id| builds[id].0);
    check_both_directions(&BuildsTable, &db, &ctx, "machine", build_ids, |id| builds[id].1);
    check_both_directions(&BuildsTable, &db, &ctx, "started_on", build_ids, |id| builds[id].2);
    check_both_directions(&BuildsTable, &db, &ctx, "completed_on", build_ids, |id| builds[id].3);
}

/// Project on `master` with layers, machines and recipes whose sort
/// values do not follow insertion order.
fn catalog() -> (DatasetBuilder, TableContext) {
    let mut data = DatasetBuilder::new();
    let master = data.release("master");
    let project = data.project("demo", Some(master));

    let yocto = data.layer("meta-yocto", Some(master));
    let core = data.layer("openembedded-core", Some(master));
    let arm = data.layer("meta-arm", Some(master));

    data.machine("qemux86-64", core);
    data.machine("beaglebone", yocto);
    data.machine("juno", arm);

    let recipes = [
        ("zlib", core, false, "libs", "Zlib"),
        ("busybox", yocto, false, "base", "GPL-2.0-only"),
        ("trusted-firmware-a", arm, false, "bootloaders", "BSD-3-Clause"),
        ("core-image-minimal", core, true, "image", "MIT"),
        ("arm-image", arm, true, "devel", "Apache-2.0"),
        ("poky-image", yocto, true, "console", "GPL-2.0-only"),
    ];
    for (name, layer, is_image, section, license) in recipes {
        let id = data.recipe(name, layer, is_image);
        data.classify_recipe(id, section, license);
    }

    (data, ctx().with_project(project))
}

fn layer_name(data: &DatasetBuilder, layer_version: LayerVersionId) -> String {
    let layer = data.layer_of(layer_version).unwrap();
    let layers = &data.dataset().layers;
    layers.iter().find(|l| l.id == layer).unwrap().name.clone()
}

#[test]
fn test_layers_sort_by_layer_name() {
    let (data, ctx) = catalog();
    let db = open(data);

    check_both_directions(&LayersTable, &db, &ctx, "layer__name", names, |name| name.clone());
}

#[test]
fn test_machines_sort_by_name_and_layer() {
    let (data, ctx) = catalog();
    let layer_of: HashMap<String, String> = data
        .dataset()
        .machines
        .iter()
        .map(|m| (m.name.clone(), layer_name(&data, m.layer_version_id)))
        .collect();
    let db = open(data);

    check_both_directions(&MachinesTable, &db, &ctx, "name", names, |name| name.clone());
    check_both_directions(&MachinesTable, &db, &ctx, "layer_version__layer__name", names, |name| {
        layer_of[name].clone()
    });
}

#[test]
fn test_recipe_tables_sort_by_every_orderable_key() {
    let (data, ctx) = catalog();
    let recipes: HashMap<String, (String, String, String)> = data
        .dataset()
        .recipes
        .iter()
        .map(|r| {
            let layer = layer_name(&data, r.layer_version_id);
            (r.name.clone(), (r.section.clone(), layer, r.license.clone()))
        })
        .collect();
    let db = open(data);

    let tables: [&dyn Table; 2] = [&SoftwareRecipesTable, &ImageRecipesTable];
    for table in tables {
        check_both_directions(table, &db, &ctx, "name", names, |name| name.clone());
        check_both_directions(table, &db, &ctx, "section", names, |name| recipes[name].0.clone());
        check_both_directions(table, &db, &ctx, "layer_version__layer__name", names, |name| {
            recipes[name].1.clone()
        });
        check_both_directions(table, &db, &ctx, "license", names, |name| recipes[name].2.clone());
    }
}

#[test]
fn test_select_packages_sort_by_size() {
    let mut data = DatasetBuilder::new();
    let project = data.project("demo", None);
    let build =
        data.build(project, BuildOutcome::Succeeded, "2024-03-09 08:00:00", "2024-03-09 09:00:00");
    let sizes = [("glibc", 4096), ("busybox", 10), ("openssl", 2_000_000), ("zlib", 512)];
    let in_image = data.package("base-files", None, 100);
    for (name, size) in sizes {
        data.package(name, Some(build), size);
    }
    let image = data.custom_image("my-image", None, project, &[in_image]);
    let db = open(data);

    let size_of: HashMap<String, i64> = sizes
        .iter()
        .map(|(n, s)| (n.to_string(), *s))
        .chain([("base-files".to_string(), 100)])
        .collect();
    let ctx = ctx().with_project(project).with_recipe(image);

    check_both_directions(&SelectPackagesTable, &db, &ctx, "name", names, |name| name.clone());
    check_both_directions(&SelectPackagesTable, &db, &ctx, "size", names, |name| size_of[name]);
}

#[test]
fn test_projects_sort_by_every_orderable_key_with_missing_release() {
    let mut data = DatasetBuilder::new();
    let master = data.release("master");
    let dunfell = data.release("dunfell");
    let mut projects = HashMap::new();
    let rows = [
        ("kirkstone-bsp", Some((dunfell, "dunfell")), "2024-03-05 12:00:00"),
        ("app", None, "2024-02-01 12:00:00"),
        ("demo", Some((master, "master")), "2024-03-07 12:00:00"),
        ("sandbox", None, "2024-01-15 12:00:00"),
    ];
    for (name, release, updated) in rows {
        let id = data.project(name, release.map(|(r, _)| r));
        data.touch_project(id, updated);
        projects.insert(id.get(), (name, release.map(|(_, n)| n), updated));
    }
    let db = open(data);
    let ctx = ctx();
    let project_ids = |response: &TableResponse| ids_after(response, "name", "/project/");

    check_both_directions(&ProjectsTable, &db, &ctx, "name", project_ids, |id| projects[id].0);
    // projects without a release sort as NULL: first ascending, last descending
    check_both_directions(&ProjectsTable, &db, &ctx, "release", project_ids, |id| projects[id].1);
    check_both_directions(&ProjectsTable, &db, &ctx, "updated", project_ids, |id| projects[id].2);
}
