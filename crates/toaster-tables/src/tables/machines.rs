use serde_json::json;
use toaster_index::{Database, Queryset, recipe};
use toaster_types::Machine;

use crate::buttons;
use crate::column::Column;
use crate::context::{Extra, TableContext};
use crate::filter::{ProjectFilters, TableFilter};
use crate::html::{escape, external_icon};
use crate::table::ToasterTable;
use crate::{Error, Result, urls};

fn machine_filters(extra: &Extra) -> Vec<TableFilter> {
    let filters = ProjectFilters::new("lv_id", extra.current_layers.iter().map(|id| id.get()));
    vec![filters.into_filter(
        "Filter by project machines",
        "Machines provided by layers added to this project",
        "Machines provided by layers not added to this project",
    )]
}

fn compatible_machines(
    db: &Database,
    ctx: &TableContext,
    extra: &mut Extra,
) -> Result<Queryset<Machine>> {
    let project = ctx.project(db)?;
    extra.current_layers = db.project_layer_version_ids(project.id)?;
    Ok(db.machines().filter(recipe::machine_compatible_with(&project)))
}

fn name_column() -> Column<Machine> {
    Column::field("Machine", "name", |m: &Machine, _: &Extra| json!(m.name))
        .not_hideable()
        .orderable("name")
}

fn description_column() -> Column<Machine> {
    Column::field("Description", "description", |m: &Machine, _: &Extra| json!(m.description))
}

/// Machines provided by layers compatible with the project.
pub struct MachinesTable;

impl ToasterTable for MachinesTable {
    type Row = Machine;

    fn name(&self) -> &'static str {
        "machines"
    }

    fn title(&self, _ctx: &TableContext) -> String {
        "Compatible machines".to_string()
    }

    fn default_orderby(&self) -> &'static str {
        "name"
    }

    fn empty_state(&self, _ctx: &TableContext) -> String {
        "No machines maybe you need to do a build?".to_string()
    }

    fn search_fields(&self) -> &'static [&'static str] {
        recipe::MACHINE_SEARCH_FIELDS
    }

    fn setup_queryset(
        &self,
        db: &Database,
        ctx: &TableContext,
        extra: &mut Extra,
    ) -> Result<Queryset<Machine>> {
        compatible_machines(db, ctx, extra)
    }

    fn setup_filters(&self, _ctx: &TableContext, extra: &Extra) -> Vec<TableFilter> {
        machine_filters(extra)
    }

    fn setup_columns(&self, _ctx: &TableContext) -> Vec<Column<Machine>> {
        vec![
            name_column(),
            description_column(),
            Column::template("Layer", "layer_version__layer__name", |m: &Machine, extra: &Extra| {
                format!(
                    "<a href=\"{}\">{}</a>",
                    escape(&urls::layer_details(extra.project_id(), m.layer_version.id)),
                    escape(&m.layer_version.layer.name)
                )
            })
            .orderable("lv_layer_name"),
            Column::field("Revision", "layer_version__get_vcs_reference", |m: &Machine, _: &Extra| {
                json!(m.layer_version.vcs_reference())
            })
            .help_text(
                "The Git branch, tag or commit. For the layers from the OpenEmbedded layer \
                 source, the revision is always the branch compatible with the Yocto Project \
                 version you selected for this project",
            )
            .hidden(),
            Column::template("Machine file", "machinefile", |m: &Machine, _: &Extra| {
                format!(
                    "<code>{}</code>{}",
                    escape(&m.machine_file()),
                    external_icon(m.vcs_machine_file_link_url().as_deref())
                )
            })
            .hidden(),
            Column::template("Select", "add-del-layers", |m: &Machine, extra: &Extra| {
                buttons::machine_btn(&m.name, &m.layer_version, extra)
            })
            .help_text(
                "Sets the selected machine as the project machine. You can only have one \
                 machine per project",
            )
            .not_hideable()
            .filter("in_current_project"),
        ]
    }
}

/// Machines of a single layer version, shown on its details page.
pub struct LayerMachinesTable;

impl ToasterTable for LayerMachinesTable {
    type Row = Machine;

    fn name(&self) -> &'static str {
        "layermachines"
    }

    fn title(&self, ctx: &TableContext) -> String {
        MachinesTable.title(ctx)
    }

    fn default_orderby(&self) -> &'static str {
        "name"
    }

    fn empty_state(&self, ctx: &TableContext) -> String {
        MachinesTable.empty_state(ctx)
    }

    fn search_fields(&self) -> &'static [&'static str] {
        recipe::MACHINE_SEARCH_FIELDS
    }

    fn setup_queryset(
        &self,
        db: &Database,
        ctx: &TableContext,
        extra: &mut Extra,
    ) -> Result<Queryset<Machine>> {
        let layer_id = ctx.require_layer_id()?;
        let queryset = compatible_machines(db, ctx, extra)?;
        if db.get_layer_version(layer_id)?.is_none() {
            return Err(Error::NotFound {
                entity: "layer version",
                id: layer_id.get(),
            });
        }
        extra.in_prj = db.count_project_layer(ctx.require_project_id()?, layer_id)?;

        Ok(queryset.filter(recipe::provided_by([layer_id.get()])))
    }

    fn setup_filters(&self, _ctx: &TableContext, extra: &Extra) -> Vec<TableFilter> {
        machine_filters(extra)
    }

    fn setup_columns(&self, _ctx: &TableContext) -> Vec<Column<Machine>> {
        vec![
            name_column(),
            description_column(),
            Column::template("Select machine", "add-del-layers", |m: &Machine, extra: &Extra| {
                let disabled = if extra.in_prj == 0 {
                    " disabled=\"disabled\""
                } else {
                    ""
                };
                format!(
                    "<a href=\"{}?setMachine={}\" class=\"btn btn-block select-machine-btn\"{}>\
                     Select machine</a>",
                    escape(&urls::project(extra.project_id())),
                    escape(&m.name),
                    disabled
                )
            }),
        ]
    }
}
