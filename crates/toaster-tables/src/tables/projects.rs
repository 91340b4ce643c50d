use toaster_index::{Database, ProjectSummary, Queryset, project};
use toaster_types::{BuildOutcome, format_short_date, pluralize};

use crate::column::Column;
use crate::context::{Extra, TableContext};
use crate::html::{escape, muted};
use crate::table::ToasterTable;
use crate::{Result, urls};

const NOT_APPLICABLE_RELEASE: &str = "This project does not have a release set. It simply \
    collects information about the builds you start from the command line while Toaster is running";

const NOT_APPLICABLE_MACHINE: &str = "This project does not have a machine set. It simply \
    collects information about the builds you start from the command line while Toaster is running";

pub(crate) fn hover_help(text: &str) -> String {
    format!(
        "<i class=\"icon-question-sign get-help hover-help\" data-original-title=\"{}\" \
         style=\"visibility: hidden;\"></i>",
        escape(text)
    )
}

/// Every project, most recently active first.
pub struct ProjectsTable;

impl ToasterTable for ProjectsTable {
    type Row = ProjectSummary;

    fn name(&self) -> &'static str {
        "projects"
    }

    fn title(&self, _ctx: &TableContext) -> String {
        "All projects".to_string()
    }

    fn default_orderby(&self) -> &'static str {
        "-updated"
    }

    fn search_fields(&self) -> &'static [&'static str] {
        project::SEARCH_FIELDS
    }

    fn setup_queryset(
        &self,
        db: &Database,
        _ctx: &TableContext,
        _extra: &mut Extra,
    ) -> Result<Queryset<ProjectSummary>> {
        Ok(db.projects().filter(project::visible()))
    }

    fn setup_columns(&self, _ctx: &TableContext) -> Vec<Column<ProjectSummary>> {
        vec![
            Column::template("Project", "name", |row: &ProjectSummary, _: &Extra| {
                let p = &row.project;
                format!(
                    "<span data-project-field=\"name\"><a href=\"{}\">{}</a></span>",
                    escape(&urls::project_url(p.id, p.is_default)),
                    escape(&p.name)
                )
            })
            .not_hideable()
            .orderable("name"),
            Column::template("Last activity on", "updated", |row: &ProjectSummary, _: &Extra| {
                let p = &row.project;
                format!(
                    "<span data-project-field=\"updated\"><a href=\"{}\">{}</a></span>",
                    escape(&urls::project_url(p.id, p.is_default)),
                    format_short_date(&p.updated)
                )
            })
            .help_text(
                "Starting date and time of the last project build. If the project has no \
                 builds, this shows the date the project was created.",
            )
            .orderable("updated"),
            Column::template("Release", "release", release_cell)
                .help_text("The version of the build system used by the project")
                .not_hideable()
                .orderable("release_name"),
            Column::template("Machine", "machine", machine_cell)
                .help_text("The hardware currently selected for the project")
                .not_hideable(),
            Column::template(
                "Number of builds",
                "number_of_builds",
                |row: &ProjectSummary, _: &Extra| {
                    if row.finished_builds > 0 {
                        format!(
                            "<a href=\"{}\">{}</a>",
                            escape(&urls::project_builds(row.project.id)),
                            row.finished_builds
                        )
                    } else {
                        muted("0")
                    }
                },
            )
            .help_text("The number of builds which have been run for the project"),
            Column::template(
                "Last build outcome",
                "last_build_outcome",
                |row: &ProjectSummary, _: &Extra| {
                    last_build_cell(row, |last| {
                        let icon = match last.outcome {
                            BuildOutcome::Succeeded => "<i class=\"icon-ok-sign success\"></i>",
                            BuildOutcome::Failed => "<i class=\"icon-minus-sign error\"></i>",
                            _ => "",
                        };
                        format!(
                            "<a href=\"{}\">{}</a>",
                            escape(&urls::build_dashboard(last.id)),
                            icon
                        )
                    })
                },
            )
            .help_text("Indicates whether the last project build completed successfully or failed"),
            Column::template("Recipe", "recipe_name", |row: &ProjectSummary, _: &Extra| {
                last_build_cell(row, |last| {
                    format!(
                        "<a href=\"{}\">{}</a>",
                        escape(&urls::build_dashboard(last.id)),
                        escape(&last.target)
                    )
                })
            })
            .help_text("The last recipe which was built in this project"),
            Column::template("Errors", "errors", |row: &ProjectSummary, _: &Extra| {
                last_build_cell(row, |last| {
                    format!(
                        "<a class=\"errors.count error\" href=\"{}#errors\">{} error{}</a>",
                        escape(&urls::build_dashboard(last.id)),
                        last.errors,
                        pluralize(last.errors)
                    )
                })
            })
            .help_text("The number of errors encountered during the last project build (if any)"),
            Column::template("Warnings", "warnings", |row: &ProjectSummary, _: &Extra| {
                last_build_cell(row, |last| {
                    format!(
                        "<a class=\"warnings.count warning\" href=\"{}#warnings\">{} warning{}</a>",
                        escape(&urls::build_dashboard(last.id)),
                        last.warnings,
                        pluralize(last.warnings)
                    )
                })
            })
            .help_text(
                "The number of warnings encountered during the last project build (if any)",
            ),
            Column::template("Image files", "image_files", |row: &ProjectSummary, _: &Extra| {
                last_build_cell(row, |last| {
                    if last.outcome != BuildOutcome::Succeeded {
                        return String::new();
                    }
                    format!(
                        "<a href=\"{}#images\">{}</a>",
                        escape(&urls::build_dashboard(last.id)),
                        escape(&last.image_extensions)
                    )
                })
            })
            .help_text("The root file system types produced by the last project build"),
        ]
    }

    fn decorate(&self, db: &Database, rows: &mut [ProjectSummary]) -> Result<()> {
        Ok(db.decorate_projects(rows)?)
    }
}

/// Renders only for projects with finished builds.
fn last_build_cell(
    row: &ProjectSummary,
    render: impl FnOnce(&toaster_index::LastBuild) -> String,
) -> String {
    match &row.last_build {
        Some(last) if row.finished_builds > 0 => render(last),
        _ => String::new(),
    }
}

fn release_cell(row: &ProjectSummary, _extra: &Extra) -> String {
    let p = &row.project;
    let inner = match &p.release {
        Some(release) => format!(
            "<a href=\"{}#project-details\">{}</a>",
            escape(&urls::project(p.id)),
            escape(&release.name)
        ),
        None if p.is_default => format!(
            "{}{}",
            muted("Not applicable"),
            hover_help(NOT_APPLICABLE_RELEASE)
        ),
        None => "No release available".to_string(),
    };
    format!("<span data-project-field=\"release\">{}</span>", inner)
}

fn machine_cell(row: &ProjectSummary, _extra: &Extra) -> String {
    let p = &row.project;
    let inner = if p.is_default {
        format!(
            "{}{}",
            muted("Not applicable"),
            hover_help(NOT_APPLICABLE_MACHINE)
        )
    } else {
        format!(
            "<a href=\"{}#machine-distro\">{}</a>",
            escape(&urls::project(p.id)),
            escape(p.machine.as_deref().unwrap_or_default())
        )
    };
    format!("<span data-project-field=\"machine\">{}</span>", inner)
}
