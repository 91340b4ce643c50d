mod common;

use common::{build_ids, cell, ctx, open, request, with_filter};
use toaster_tables::tables::BuildsTable;
use toaster_tables::{Error, filter_info, get_data, recent_builds};
use toaster_testing::DatasetBuilder;
use toaster_types::{BuildOutcome, MessageLevel, ProjectId, TaskOutcome};

/// One project with a successful and a failed build on consecutive days,
/// plus one build still running.
fn two_builds() -> (DatasetBuilder, ProjectId, i64, i64) {
    let mut data = DatasetBuilder::new();
    let release = data.release("master");
    let project = data.project("demo", Some(release));
    let ok = data.build(project, BuildOutcome::Succeeded, "2024-03-09 08:00:00", "2024-03-09 09:30:00");
    let failed = data.build(project, BuildOutcome::Failed, "2024-03-10 07:00:00", "2024-03-10 07:20:00");
    data.build(project, BuildOutcome::InProgress, "2024-03-10 10:00:00", "2024-03-10 10:00:00");
    (data, project, ok.get(), failed.get())
}

#[test]
fn test_in_progress_builds_excluded() {
    let (data, project, ok, failed) = two_builds();
    let db = open(data);

    let response = get_data(&BuildsTable, &db, &ctx().with_project(project), &request()).unwrap();

    assert_eq!(response.total, 2);
    assert_eq!(response.title, "Project builds");
    // default order is most recently completed first
    assert_eq!(response.orderby, "-completed_on");
    assert_eq!(build_ids(&response), vec![failed, ok]);
}

#[test]
fn test_outcome_filter_selects_matching_build() {
    let (data, project, ok, failed) = two_builds();
    let db = open(data);
    let ctx = ctx().with_project(project);

    let success = get_data(
        &BuildsTable,
        &db,
        &ctx,
        &with_filter("outcome_filter:successful_builds"),
    )
    .unwrap();
    assert_eq!(build_ids(&success), vec![ok]);

    let failure =
        get_data(&BuildsTable, &db, &ctx, &with_filter("outcome_filter:failed_builds")).unwrap();
    assert_eq!(build_ids(&failure), vec![failed]);
}

#[test]
fn test_sort_by_completed_on_is_monotone() {
    let mut data = DatasetBuilder::new();
    let project = data.project("demo", None);
    let mut expected = Vec::new();
    for (i, day) in ["2024-03-04", "2024-03-01", "2024-03-03", "2024-03-02"].iter().enumerate() {
        let id = data.build(
            project,
            BuildOutcome::Succeeded,
            &format!("{} 08:00:00", day),
            &format!("{} 09:0{}:00", day, i),
        );
        expected.push((*day, id.get()));
    }
    let db = open(data);
    expected.sort();

    let mut req = request();
    req.orderby = Some("completed_on".to_string());
    let ascending = get_data(&BuildsTable, &db, &ctx(), &req).unwrap();
    assert_eq!(
        build_ids(&ascending),
        expected.iter().map(|(_, id)| *id).collect::<Vec<_>>()
    );

    req.orderby = Some("-completed_on".to_string());
    let descending = get_data(&BuildsTable, &db, &ctx(), &req).unwrap();
    assert_eq!(
        build_ids(&descending),
        expected.iter().rev().map(|(_, id)| *id).collect::<Vec<_>>()
    );
}

#[test]
fn test_page_far_past_the_end_keeps_total() {
    let (data, project, _, _) = two_builds();
    let db = open(data);

    let mut req = request();
    req.page = usize::MAX;
    let response = get_data(&BuildsTable, &db, &ctx().with_project(project), &req).unwrap();

    assert!(response.rows.is_empty());
    assert_eq!(response.total, 2);
    assert_eq!(response.page, usize::MAX);
}

#[test]
fn test_unorderable_column_rejected() {
    let (data, _, _, _) = two_builds();
    let db = open(data);

    let mut req = request();
    req.orderby = Some("errors".to_string());
    let err = get_data(&BuildsTable, &db, &ctx(), &req).unwrap_err();

    assert!(matches!(err, Error::InvalidOrder(_)));
    assert!(err.is_bad_request());
}

#[test]
fn test_error_and_warning_counts() {
    let mut data = DatasetBuilder::new();
    let project = data.project("demo", None);
    let build = data.build(project, BuildOutcome::Failed, "2024-03-09 08:00:00", "2024-03-09 09:00:00");
    data.log(build, MessageLevel::Error);
    data.log(build, MessageLevel::Error);
    data.log(build, MessageLevel::Exception);
    data.log(build, MessageLevel::Critical);
    data.log(build, MessageLevel::Warning);
    data.log(build, MessageLevel::Info);
    let db = open(data);

    let response = get_data(&BuildsTable, &db, &ctx(), &request()).unwrap();

    assert!(cell(&response, 0, "errors").contains("3 errors"));
    assert!(cell(&response, 0, "warnings").contains("1 warning<"));
}

#[test]
fn test_project_without_builds_shows_empty_state() {
    let mut data = DatasetBuilder::new();
    let project = data.project("empty", None);
    let other = data.project("busy", None);
    data.build(other, BuildOutcome::Succeeded, "2024-03-09 08:00:00", "2024-03-09 09:00:00");
    let db = open(data);

    let response = get_data(&BuildsTable, &db, &ctx().with_project(project), &request()).unwrap();

    assert!(response.is_empty());
    assert!(response.rows.is_empty());
    assert_eq!(response.empty_state, "This project has no builds.");
}

#[test]
fn test_unknown_project_not_found() {
    let (data, _, _, _) = two_builds();
    let db = open(data);

    let err = get_data(&BuildsTable, &db, &ctx().with_project(ProjectId::new(999)), &request())
        .unwrap_err();

    assert!(matches!(err, Error::NotFound { entity: "project", id: 999 }));
    assert!(err.is_not_found());
}

#[test]
fn test_day_filters() {
    let (data, project, ok, failed) = two_builds();
    let db = open(data);
    let ctx = ctx().with_project(project);

    let today = get_data(&BuildsTable, &db, &ctx, &with_filter("started_on_filter:today")).unwrap();
    assert_eq!(build_ids(&today), vec![failed]);

    let yesterday =
        get_data(&BuildsTable, &db, &ctx, &with_filter("completed_on_filter:yesterday")).unwrap();
    assert_eq!(build_ids(&yesterday), vec![ok]);
}

#[test]
fn test_date_range_filter() {
    let (data, project, ok, failed) = two_builds();
    let db = open(data);
    let ctx = ctx().with_project(project);

    let both = get_data(
        &BuildsTable,
        &db,
        &ctx,
        &with_filter("started_on_filter:date_range:2024-03-09,2024-03-10"),
    )
    .unwrap();
    assert_eq!(build_ids(&both), vec![failed, ok]);

    let mut req = with_filter("completed_on_filter:date_range");
    req.filter_value = Some("2024-03-09,2024-03-09".to_string());
    let first_day = get_data(&BuildsTable, &db, &ctx, &req).unwrap();
    assert_eq!(build_ids(&first_day), vec![ok]);

    let reversed = get_data(
        &BuildsTable,
        &db,
        &ctx,
        &with_filter("started_on_filter:date_range:2024-03-10,2024-03-09"),
    )
    .unwrap();
    assert_eq!(reversed.total, 0);
}

#[test]
fn test_date_range_requires_value() {
    let (data, _, _, _) = two_builds();
    let db = open(data);

    let err = get_data(&BuildsTable, &db, &ctx(), &with_filter("started_on_filter:date_range"))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidFilterValue { .. }));
}

#[test]
fn test_failed_tasks_partition() {
    let mut data = DatasetBuilder::new();
    let project = data.project("demo", None);
    let clean = data.build(project, BuildOutcome::Succeeded, "2024-03-09 08:00:00", "2024-03-09 09:00:00");
    data.task(clean, "busybox", "do_compile", TaskOutcome::Succeeded);
    let one = data.build(project, BuildOutcome::Failed, "2024-03-09 10:00:00", "2024-03-09 11:00:00");
    let task = data.task(one, "busybox", "do_compile", TaskOutcome::Failed);
    let many = data.build(project, BuildOutcome::Failed, "2024-03-09 12:00:00", "2024-03-09 13:00:00");
    data.task(many, "glibc", "do_configure", TaskOutcome::Failed);
    data.task(many, "gcc", "do_compile", TaskOutcome::Failed);
    let db = open(data);

    let with = get_data(&BuildsTable, &db, &ctx(), &with_filter("failed_tasks_filter:with_failed_tasks")).unwrap();
    let without =
        get_data(&BuildsTable, &db, &ctx(), &with_filter("failed_tasks_filter:without_failed_tasks")).unwrap();

    assert_eq!(build_ids(&with), vec![many.get(), one.get()]);
    assert_eq!(build_ids(&without), vec![clean.get()]);

    // single failure links the task, several link the filtered task list
    assert!(cell(&with, 1, "failed_tasks").contains(&format!("/task/{}", task)));
    assert!(cell(&with, 1, "failed_tasks").contains("busybox.do_compile"));
    assert!(cell(&with, 0, "failed_tasks").contains("2 tasks"));
    assert!(cell(&with, 0, "failed_tasks").contains("filter=outcome%3A4"));
}

#[test]
fn test_image_files_only_for_successful_builds() {
    let mut data = DatasetBuilder::new();
    let project = data.project("demo", None);
    let ok = data.build(project, BuildOutcome::Succeeded, "2024-03-09 08:00:00", "2024-03-09 09:00:00");
    let target = data.target(ok, "core-image-minimal");
    data.image_file(target, "core-image-minimal-qemux86-64.ext4", 1024);
    data.image_file(target, "core-image-minimal-qemux86-64.tar.bz2", 1024);
    let failed = data.build(project, BuildOutcome::Failed, "2024-03-09 10:00:00", "2024-03-09 11:00:00");
    let target = data.target(failed, "core-image-sato");
    data.image_file(target, "core-image-sato-qemux86-64.ext4", 1024);
    let db = open(data);

    let response = get_data(&BuildsTable, &db, &ctx(), &request()).unwrap();

    assert_eq!(build_ids(&response), vec![failed.get(), ok.get()]);
    assert_eq!(cell(&response, 0, "image_files"), "");
    assert!(cell(&response, 1, "image_files").contains("ext4"));
    assert!(cell(&response, 1, "image_files").contains("tar.bz2"));
    assert!(cell(&response, 1, "target").contains("core-image-minimal"));
}

#[test]
fn test_filter_info_counts() {
    let (data, project, _, _) = two_builds();
    let db = open(data);
    let ctx = ctx().with_project(project);

    let outcome = filter_info(&BuildsTable, &db, &ctx, "outcome_filter", None).unwrap();
    let counts: Vec<_> = outcome
        .filter_actions
        .iter()
        .map(|a| (a.action_name.as_str(), a.count))
        .collect();
    assert_eq!(counts, vec![("successful_builds", Some(1)), ("failed_builds", Some(1))]);

    let started = filter_info(&BuildsTable, &db, &ctx, "started_on_filter", None).unwrap();
    let types: Vec<_> = started
        .filter_actions
        .iter()
        .map(|a| (a.action_type, a.count))
        .collect();
    assert_eq!(types, vec![("day", Some(1)), ("day", Some(1)), ("daterange", None)]);

    let err = filter_info(&BuildsTable, &db, &ctx, "nosuchfilter", None).unwrap_err();
    assert!(matches!(err, Error::UnknownFilter(_)));
}

#[test]
fn test_recent_builds_lists_running_first() {
    let (data, project, ok, failed) = two_builds();
    let db = open(data);

    let builds = recent_builds(&db, &ctx().with_project(project)).unwrap();
    let outcomes: Vec<_> = builds.iter().map(|b| b.outcome()).collect();
    assert_eq!(
        outcomes,
        vec![BuildOutcome::InProgress, BuildOutcome::Failed, BuildOutcome::Succeeded]
    );
    assert_eq!(builds[1].build.id.get(), failed);
    assert_eq!(builds[2].build.id.get(), ok);

    let err = recent_builds(&db, &ctx().with_project(ProjectId::new(999))).unwrap_err();
    assert!(err.is_not_found());
}
