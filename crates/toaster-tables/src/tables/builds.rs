use toaster_index::{BuildSummary, Database, Queryset, build};
use toaster_types::{BuildOutcome, TaskOutcome, format_short_date, pluralize, sec_to_hms};

use crate::column::Column;
use crate::context::{Extra, TableContext};
use crate::filter::{Day, FilterAction, TableFilter};
use crate::html::escape;
use crate::table::ToasterTable;
use crate::tables::projects::hover_help;
use crate::{Result, urls};

const DEFAULT_PROJECT_HELP: &str = "This project shows information about the builds you start \
    from the command line while Toaster is running";

/// Finished builds, across all projects or within one.
pub struct BuildsTable;

impl ToasterTable for BuildsTable {
    type Row = BuildSummary;

    fn name(&self) -> &'static str {
        "builds"
    }

    fn title(&self, ctx: &TableContext) -> String {
        match ctx.pid {
            Some(_) => "Project builds".to_string(),
            None => "All builds".to_string(),
        }
    }

    fn default_orderby(&self) -> &'static str {
        "-completed_on"
    }

    fn empty_state(&self, ctx: &TableContext) -> String {
        match ctx.pid {
            Some(_) => "This project has no builds.".to_string(),
            None => crate::table::DEFAULT_EMPTY_STATE.to_string(),
        }
    }

    fn search_fields(&self) -> &'static [&'static str] {
        build::SEARCH_FIELDS
    }

    fn setup_queryset(
        &self,
        db: &Database,
        ctx: &TableContext,
        _extra: &mut Extra,
    ) -> Result<Queryset<BuildSummary>> {
        let mut queryset = db
            .builds()
            .exclude(build::outcome_is(BuildOutcome::InProgress));

        if ctx.pid.is_some() {
            let project = ctx.project(db)?;
            queryset = queryset.filter(build::in_project(project.id));
        }

        Ok(queryset)
    }

    fn setup_filters(&self, _ctx: &TableContext, _extra: &Extra) -> Vec<TableFilter> {
        vec![
            TableFilter::new("outcome_filter", "Filter builds by outcome")
                .add_action(FilterAction::toggle(
                    "successful_builds",
                    "Successful builds",
                    build::outcome_is(BuildOutcome::Succeeded),
                ))
                .add_action(FilterAction::toggle(
                    "failed_builds",
                    "Failed builds",
                    build::outcome_is(BuildOutcome::Failed),
                )),
            date_filter(
                "started_on_filter",
                "Filter by date when build was started",
                "started_on",
            ),
            date_filter(
                "completed_on_filter",
                "Filter by date when build was completed",
                "completed_on",
            ),
            TableFilter::new("failed_tasks_filter", "Filter builds by failed tasks")
                .add_action(FilterAction::toggle(
                    "with_failed_tasks",
                    "Builds with failed tasks",
                    build::has_failed_tasks(),
                ))
                .add_action(FilterAction::toggle(
                    "without_failed_tasks",
                    "Builds without failed tasks",
                    build::has_failed_tasks().not(),
                )),
        ]
    }

    fn setup_columns(&self, _ctx: &TableContext) -> Vec<Column<BuildSummary>> {
        vec![
            Column::template("Outcome", "outcome", outcome_cell)
                .help_text("Final state of the build (successful or failed)")
                .not_hideable()
                .orderable("outcome")
                .filter("outcome_filter"),
            Column::template("Recipe", "target", |row: &BuildSummary, _: &Extra| {
                let url = escape(&urls::build_dashboard(row.build.id));
                row.target_labels
                    .iter()
                    .map(|label| format!("<a href=\"{}\">{}</a><br />", url, escape(label)))
                    .collect()
            })
            .help_text("What was built (i.e. one or more recipes or image recipes)")
            .not_hideable(),
            Column::template("Machine", "machine", |row: &BuildSummary, _: &Extra| {
                dashboard_link(row, &escape(&row.build.machine))
            })
            .help_text("Hardware for which you are building a recipe or image recipe")
            .not_hideable()
            .orderable("machine"),
            Column::template("Started on", "started_on", |row: &BuildSummary, _: &Extra| {
                dashboard_link(row, &format_short_date(&row.build.started_on))
            })
            .help_text("The date and time when the build started")
            .orderable("started_on")
            .filter("started_on_filter"),
            Column::template("Completed on", "completed_on", |row: &BuildSummary, _: &Extra| {
                dashboard_link(row, &format_short_date(&row.build.completed_on))
            })
            .help_text("The date and time when the build finished")
            .not_hideable()
            .orderable("completed_on")
            .filter("completed_on_filter"),
            Column::template("Failed tasks", "failed_tasks", failed_tasks_cell)
                .help_text("The number of tasks which failed during the build")
                .filter("failed_tasks_filter"),
            Column::template("Errors", "errors", |row: &BuildSummary, _: &Extra| {
                if row.errors_no == 0 {
                    return String::new();
                }
                format!(
                    "<a class=\"errors.count error\" href=\"{}#errors\">{} error{}</a>",
                    escape(&urls::build_dashboard(row.build.id)),
                    row.errors_no,
                    pluralize(row.errors_no)
                )
            })
            .help_text("The number of errors encountered during the build (if any)"),
            Column::template("Warnings", "warnings", |row: &BuildSummary, _: &Extra| {
                if row.warnings_no == 0 {
                    return String::new();
                }
                format!(
                    "<a class=\"warnings.count warning\" href=\"{}#warnings\">{} warning{}</a>",
                    escape(&urls::build_dashboard(row.build.id)),
                    row.warnings_no,
                    pluralize(row.warnings_no)
                )
            })
            .help_text("The number of warnings encountered during the build (if any)"),
            Column::template("Time", "time", |row: &BuildSummary, _: &Extra| {
                format!(
                    "<a href=\"{}\">{}</a>",
                    escape(&urls::build_time(row.build.id)),
                    sec_to_hms(row.build.timespent_seconds())
                )
            })
            .help_text("How long the build took to finish")
            .not_hideable(),
            Column::template("Image files", "image_files", |row: &BuildSummary, _: &Extra| {
                if row.outcome() != BuildOutcome::Succeeded {
                    return String::new();
                }
                format!(
                    "<a href=\"{}#images\">{}</a>",
                    escape(&urls::build_dashboard(row.build.id)),
                    escape(&row.image_extensions)
                )
            })
            .help_text("The root file system types produced by the build"),
            Column::template("Project", "project-name", project_cell),
        ]
    }

    fn decorate(&self, db: &Database, rows: &mut [BuildSummary]) -> Result<()> {
        Ok(db.decorate_builds(rows)?)
    }
}

fn date_filter(name: &str, title: &str, field: &'static str) -> TableFilter {
    TableFilter::new(name, title)
        .add_action(FilterAction::day("today", "Today's builds", field, Day::Today))
        .add_action(FilterAction::day(
            "yesterday",
            "Yesterday's builds",
            field,
            Day::Yesterday,
        ))
        .add_action(FilterAction::date_range("date_range", "Build date range", field))
}

fn dashboard_link(row: &BuildSummary, html: &str) -> String {
    format!(
        "<a href=\"{}\">{}</a>",
        escape(&urls::build_dashboard(row.build.id)),
        html
    )
}

fn outcome_cell(row: &BuildSummary, _extra: &Extra) -> String {
    let icon = match row.outcome() {
        BuildOutcome::Succeeded => "<i class=\"icon-ok-sign success\"></i>",
        BuildOutcome::Failed => "<i class=\"icon-minus-sign error\"></i>",
        _ => "",
    };
    let mut html = dashboard_link(row, icon);

    if row.build.cooker_log_path.is_some() {
        html.push_str(&format!(
            "&nbsp;<a href=\"{}\"><i class=\"icon-download-alt\" title=\"Download build log\"></i></a>",
            escape(&urls::build_artifact(row.build.id, "cookerlog", row.build.id.get()))
        ));
    }
    html
}

fn failed_tasks_cell(row: &BuildSummary, _extra: &Extra) -> String {
    let id = row.build.id;
    match row.failed_tasks.as_slice() {
        [] => String::new(),
        [task] => format!(
            "<a href=\"{}\"><span class=\"error\">{}.{}</span></a>\
             <a href=\"{}\"><i class=\"icon-download-alt\" data-original-title=\"Download task log file\"></i></a>",
            escape(&urls::task(id, task.id)),
            escape(&task.recipe_name),
            escape(&task.task_name),
            escape(&urls::build_artifact(id, "tasklogfile", task.id.get()))
        ),
        tasks => format!(
            "<a href=\"{}?filter=outcome%3A{}\"><span class=\"error\">{} tasks</span></a>",
            escape(&urls::build_tasks(id)),
            TaskOutcome::Failed.code(),
            tasks.len()
        ),
    }
}

fn project_cell(row: &BuildSummary, _extra: &Extra) -> String {
    let mut html = format!(
        "<a href=\"{}\">{}</a>",
        escape(&urls::project_url(row.build.project_id, row.project_is_default)),
        escape(&row.project_name)
    );
    if row.project_is_default {
        html.push_str(&hover_help(DEFAULT_PROJECT_HELP));
    }
    html
}

/// Builds still running followed by the latest finished ones, optionally
/// within one project.
pub fn recent_builds(db: &Database, ctx: &TableContext) -> Result<Vec<BuildSummary>> {
    let pid = match ctx.pid {
        Some(_) => Some(ctx.project(db)?.id),
        None => None,
    };
    Ok(db.recent_builds(pid)?)
}
