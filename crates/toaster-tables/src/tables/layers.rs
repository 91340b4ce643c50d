use serde_json::{Value, json};
use toaster_index::{Database, LayerSummary, Queryset, layer};
use toaster_types::{is_shaid, truncate_chars};

use crate::buttons;
use crate::column::Column;
use crate::context::{Extra, TableContext};
use crate::filter::{ProjectFilters, TableFilter};
use crate::html::{escape, external_icon};
use crate::table::ToasterTable;
use crate::{Result, urls};

const REVISION_HELP: &str = "The Git branch, tag or commit. For the layers from the OpenEmbedded \
    layer source, the revision is always the branch compatible with the Yocto Project version you \
    selected for this project";

/// Layers a project can add.
pub struct LayersTable;

impl ToasterTable for LayersTable {
    type Row = LayerSummary;

    fn name(&self) -> &'static str {
        "layers"
    }

    fn title(&self, _ctx: &TableContext) -> String {
        "Compatible layers".to_string()
    }

    fn default_orderby(&self) -> &'static str {
        "layer__name"
    }

    fn search_fields(&self) -> &'static [&'static str] {
        layer::SEARCH_FIELDS
    }

    fn setup_queryset(
        &self,
        db: &Database,
        ctx: &TableContext,
        extra: &mut Extra,
    ) -> Result<Queryset<LayerSummary>> {
        let project = ctx.project(db)?;
        extra.current_layers = db.project_layer_version_ids(project.id)?;

        Ok(db.layer_versions().filter(layer::compatible_with(&project)))
    }

    fn setup_filters(&self, _ctx: &TableContext, extra: &Extra) -> Vec<TableFilter> {
        let filters = ProjectFilters::new("id", extra.current_layers.iter().map(|id| id.get()));
        vec![filters.into_filter(
            "Filter by project layers",
            "Layers added to this project",
            "Layers not added to this project",
        )]
    }

    fn setup_columns(&self, _ctx: &TableContext) -> Vec<Column<LayerSummary>> {
        vec![
            Column::template("Layer", "layer__name", |row: &LayerSummary, extra: &Extra| {
                let lv = &row.layer_version;
                format!(
                    "<a href=\"{}\">{}</a>",
                    escape(&urls::layer_details(extra.project_id(), lv.id)),
                    escape(&lv.layer.name)
                )
            })
            .not_hideable()
            .orderable("layer_name"),
            Column::field("Summary", "layer__summary", |row: &LayerSummary, _: &Extra| {
                json!(row.layer_version.layer.summary)
            }),
            Column::template(
                "Git repository URL",
                "layer__vcs_url",
                |row: &LayerSummary, extra: &Extra| {
                    let lv = &row.layer_version;
                    format!(
                        "<a href=\"{}\"><code>{}</code></a>{}",
                        escape(&urls::layer_details(extra.project_id(), lv.id)),
                        escape(&lv.layer.vcs_url),
                        external_icon(lv.vcs_link_url())
                    )
                },
            )
            .help_text("The Git repository for the layer source code")
            .hidden(),
            Column::template("Subdirectory", "git_subdir", |row: &LayerSummary, extra: &Extra| {
                let lv = &row.layer_version;
                let link = if lv.dirpath.is_empty() {
                    String::new()
                } else {
                    external_icon(lv.vcs_dirpath_link_url().as_deref())
                };
                format!(
                    "<a href=\"{}\"><code>{}</code></a>{}",
                    escape(&urls::layer_details(extra.project_id(), lv.id)),
                    escape(&lv.dirpath),
                    link
                )
            })
            .help_text("The layer directory within the Git repository")
            .hidden(),
            Column::template("Revision", "revision", |row: &LayerSummary, _: &Extra| {
                revision_cell(&row.layer_version.vcs_reference())
            })
            .help_text(REVISION_HELP),
            Column::template("Dependencies", "dependencies", dependencies_cell)
                .help_text("Other layers a layer depends upon"),
            Column::template("Add | Delete", "add-del-layers", |row: &LayerSummary, extra: &Extra| {
                buttons::layer_btn(&row.layer_version, extra)
            })
            .help_text("Add or delete layers to / from your project")
            .not_hideable()
            .filter("in_current_project"),
            Column::field("LayerDetailsUrl", "layerdetailurl", |row: &LayerSummary, extra: &Extra| {
                Value::String(urls::layer_details(extra.project_id(), row.layer_version.id))
            })
            .not_displayable(),
            Column::field(
                "name",
                "name",
                |row: &LayerSummary, _: &Extra| json!(row.layer_version.layer.name),
            )
            .not_displayable(),
        ]
    }

    fn decorate(&self, db: &Database, rows: &mut [LayerSummary]) -> Result<()> {
        Ok(db.decorate_layers(rows)?)
    }
}

/// Commit ids are shortened behind a popover holding the full id.
pub(crate) fn revision_cell(reference: &str) -> String {
    if is_shaid(reference) {
        format!(
            "<a class=\"btn\" data-content=\"<ul class='unstyled'> <li>{}</li> </ul>\">{}</a>",
            escape(reference),
            escape(&truncate_chars(reference, 10))
        )
    } else {
        escape(reference)
    }
}

fn dependencies_cell(row: &LayerSummary, extra: &Extra) -> String {
    if row.dependencies.is_empty() {
        return String::new();
    }
    let lv = &row.layer_version;
    let pid = extra.project_id();

    let items: String = row
        .dependencies
        .iter()
        .map(|dep| {
            format!(
                "<li><a href='{}'>{}</a></li>",
                escape(&urls::layer_details(pid, dep.depends_on)),
                escape(&dep.depends_on_name)
            )
        })
        .collect();

    format!(
        "<a class=\"btn\" title=\"{title}\" data-content=\"{content}\">{count}</a>",
        title = escape(&format!(
            "<a href='{}'>{}</a> dependencies",
            urls::layer_details(pid, lv.id),
            lv.layer.name
        )),
        content = escape(&format!("<ul class='unstyled'>{}</ul>", items)),
        count = row.dependencies.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision_cell_truncates_sha() {
        let sha = "0123456789abcdef0123456789abcdef01234567";
        let cell = revision_cell(sha);
        assert!(cell.contains(sha));
        assert!(cell.contains(">012345678…</a>"));
        assert_eq!(revision_cell("kirkstone"), "kirkstone");
    }
}
