use serde_json::json;
use toaster_index::{Database, Queryset, recipe};
use toaster_types::Recipe;

use crate::buttons;
use crate::column::Column;
use crate::context::{Extra, TableContext};
use crate::filter::{ProjectFilters, TableFilter};
use crate::html::{escape, external_icon};
use crate::table::ToasterTable;
use crate::{Error, Result, urls};

const RECIPES_EMPTY_STATE: &str = "Toaster has no recipe information. To generate recipe \
    information you can configure a layer source then run a build.";

const RECIPE_HELP: &str = "Information about a single piece of software, including where to \
    download the source, configuration options, how to compile the source files and how to \
    package the compiled output";

const IMAGE_RECIPE_HELP: &str = "When you build an image recipe, you get an image: a root file \
    system you can deploy to a machine";

// Shared pieces of the recipe tables.

fn compatible_recipes(
    db: &Database,
    ctx: &TableContext,
    extra: &mut Extra,
) -> Result<Queryset<Recipe>> {
    let project = ctx.project(db)?;
    extra.current_layers = db.project_layer_version_ids(project.id)?;
    Ok(db.recipes().filter(recipe::compatible_with(&project)))
}

fn recipe_filters(extra: &Extra) -> Vec<TableFilter> {
    let filters = ProjectFilters::new("lv_id", extra.current_layers.iter().map(|id| id.get()));
    vec![filters.into_filter(
        "Filter by project recipes",
        "Recipes provided by layers added to this project",
        "Recipes provided by layers not added to this project",
    )]
}

fn name_column(title: &str, help: &str) -> Column<Recipe> {
    Column::field(title, "name", |r: &Recipe, _: &Extra| json!(r.name))
        .help_text(help)
        .not_hideable()
        .orderable("name")
}

fn version_column() -> Column<Recipe> {
    Column::field("Version", "version", |r: &Recipe, _: &Extra| json!(r.version))
}

fn description_column() -> Column<Recipe> {
    Column::field("Description", "get_description_or_summary", |r: &Recipe, _: &Extra| {
        json!(r.description_or_summary())
    })
}

/// Columns every compatible-recipe table shows after its name column.
fn base_columns() -> Vec<Column<Recipe>> {
    vec![
        version_column(),
        description_column(),
        Column::template("Recipe file", "recipe-file", |r: &Recipe, _: &Extra| {
            format!(
                "<code>{}</code>{}",
                escape(&r.file_path),
                external_icon(r.vcs_recipe_file_link_url().as_deref())
            )
        })
        .help_text("Path to the recipe .bb file")
        .hidden(),
        Column::field("Section", "section", |r: &Recipe, _: &Extra| json!(r.section))
            .help_text("The section in which recipes should be categorized")
            .hidden()
            .orderable("section"),
        Column::template("Layer", "layer_version__layer__name", |r: &Recipe, extra: &Extra| {
            format!(
                "<a href=\"{}\">{}</a>",
                escape(&urls::layer_details(extra.project_id(), r.layer_version.id)),
                escape(&r.layer_version.layer.name)
            )
        })
        .help_text("The name of the layer providing the recipe")
        .orderable("lv_layer_name"),
        Column::field("License", "license", |r: &Recipe, _: &Extra| json!(r.license))
            .help_text(
                "The list of source licenses for the recipe. Multiple license names separated \
                 by the pipe character indicates a choice between licenses. Multiple license \
                 names separated by the ampersand character indicates multiple licenses exist \
                 that cover different parts of the source",
            )
            .hidden()
            .orderable("license"),
        Column::field("Revision", "layer_version__get_vcs_reference", |r: &Recipe, _: &Extra| {
            json!(r.layer_version.vcs_reference())
        })
        .hidden(),
    ]
}

fn build_column() -> Column<Recipe> {
    Column::template("Build", "add-del-layers", |r: &Recipe, extra: &Extra| {
        buttons::recipe_btn(&r.name, &r.layer_version, extra)
    })
    .help_text("Add or delete recipes to and from your project")
    .not_hideable()
    .filter("in_current_project")
}

/// Recipes of a single layer version, shown on its details page.
pub struct LayerRecipesTable;

impl ToasterTable for LayerRecipesTable {
    type Row = Recipe;

    fn name(&self) -> &'static str {
        "layerrecipes"
    }

    fn title(&self, _ctx: &TableContext) -> String {
        "Recipes".to_string()
    }

    fn default_orderby(&self) -> &'static str {
        "name"
    }

    fn empty_state(&self, _ctx: &TableContext) -> String {
        RECIPES_EMPTY_STATE.to_string()
    }

    fn search_fields(&self) -> &'static [&'static str] {
        recipe::RECIPE_SEARCH_FIELDS
    }

    fn setup_queryset(
        &self,
        db: &Database,
        ctx: &TableContext,
        extra: &mut Extra,
    ) -> Result<Queryset<Recipe>> {
        let project = ctx.project(db)?;
        let layer_id = ctx.require_layer_id()?;
        if db.get_layer_version(layer_id)?.is_none() {
            return Err(Error::NotFound {
                entity: "layer version",
                id: layer_id.get(),
            });
        }
        extra.current_layers = db.project_layer_version_ids(project.id)?;
        extra.in_prj = db.count_project_layer(project.id, layer_id)?;

        Ok(db.recipes().filter(recipe::provided_by([layer_id.get()])))
    }

    fn setup_filters(&self, _ctx: &TableContext, extra: &Extra) -> Vec<TableFilter> {
        recipe_filters(extra)
    }

    fn setup_columns(&self, _ctx: &TableContext) -> Vec<Column<Recipe>> {
        vec![
            name_column("Recipe", RECIPE_HELP),
            version_column(),
            description_column(),
            Column::template("Build recipe", "add-del-layers", |r: &Recipe, extra: &Extra| {
                let disabled = if extra.in_prj == 0 {
                    " disabled=\"disabled\""
                } else {
                    ""
                };
                format!(
                    "<button class=\"btn btn-block build-recipe-btn\" data-recipe-name=\"{}\"{}>\
                     Build recipe</button>",
                    escape(&r.name),
                    disabled
                )
            }),
        ]
    }
}

/// Compatible image recipes.
pub struct ImageRecipesTable;

impl ToasterTable for ImageRecipesTable {
    type Row = Recipe;

    fn name(&self) -> &'static str {
        "imagerecipes"
    }

    fn title(&self, _ctx: &TableContext) -> String {
        "Compatible image recipes".to_string()
    }

    fn default_orderby(&self) -> &'static str {
        "name"
    }

    fn empty_state(&self, _ctx: &TableContext) -> String {
        RECIPES_EMPTY_STATE.to_string()
    }

    fn search_fields(&self) -> &'static [&'static str] {
        recipe::RECIPE_SEARCH_FIELDS
    }

    fn setup_queryset(
        &self,
        db: &Database,
        ctx: &TableContext,
        extra: &mut Extra,
    ) -> Result<Queryset<Recipe>> {
        Ok(compatible_recipes(db, ctx, extra)?.filter(recipe::is_image(true)))
    }

    fn setup_filters(&self, _ctx: &TableContext, extra: &Extra) -> Vec<TableFilter> {
        recipe_filters(extra)
    }

    fn setup_columns(&self, _ctx: &TableContext) -> Vec<Column<Recipe>> {
        let mut columns = vec![name_column("Image recipe", IMAGE_RECIPE_HELP)];
        columns.extend(base_columns());
        columns.push(build_column());
        columns
    }
}

/// Image recipes a new custom image can be based on.
pub struct NewCustomImagesTable;

impl ToasterTable for NewCustomImagesTable {
    type Row = Recipe;

    fn name(&self) -> &'static str {
        "newcustomimage"
    }

    fn title(&self, _ctx: &TableContext) -> String {
        "Select the image recipe you want to customise".to_string()
    }

    fn default_orderby(&self) -> &'static str {
        "name"
    }

    fn empty_state(&self, _ctx: &TableContext) -> String {
        RECIPES_EMPTY_STATE.to_string()
    }

    fn search_fields(&self) -> &'static [&'static str] {
        recipe::RECIPE_SEARCH_FIELDS
    }

    fn setup_queryset(
        &self,
        db: &Database,
        ctx: &TableContext,
        extra: &mut Extra,
    ) -> Result<Queryset<Recipe>> {
        ImageRecipesTable.setup_queryset(db, ctx, extra)
    }

    fn setup_filters(&self, _ctx: &TableContext, extra: &Extra) -> Vec<TableFilter> {
        recipe_filters(extra)
    }

    fn setup_columns(&self, _ctx: &TableContext) -> Vec<Column<Recipe>> {
        let mut columns = vec![name_column("Image recipe", IMAGE_RECIPE_HELP)];
        columns.extend(base_columns());
        columns.push(
            Column::template("Customise", "customise-or-add-recipe", |r: &Recipe, extra: &Extra| {
                buttons::customise_btn(r.id.get(), &r.name, &r.layer_version, extra)
            })
            .not_hideable()
            .filter("in_current_project"),
        );
        columns
    }
}

/// Compatible recipes that are not images.
pub struct SoftwareRecipesTable;

impl ToasterTable for SoftwareRecipesTable {
    type Row = Recipe;

    fn name(&self) -> &'static str {
        "softwarerecipes"
    }

    fn title(&self, _ctx: &TableContext) -> String {
        "Compatible software recipes".to_string()
    }

    fn default_orderby(&self) -> &'static str {
        "name"
    }

    fn empty_state(&self, _ctx: &TableContext) -> String {
        RECIPES_EMPTY_STATE.to_string()
    }

    fn search_fields(&self) -> &'static [&'static str] {
        recipe::RECIPE_SEARCH_FIELDS
    }

    fn setup_queryset(
        &self,
        db: &Database,
        ctx: &TableContext,
        extra: &mut Extra,
    ) -> Result<Queryset<Recipe>> {
        Ok(compatible_recipes(db, ctx, extra)?.filter(recipe::is_image(false)))
    }

    fn setup_filters(&self, _ctx: &TableContext, extra: &Extra) -> Vec<TableFilter> {
        recipe_filters(extra)
    }

    fn setup_columns(&self, _ctx: &TableContext) -> Vec<Column<Recipe>> {
        let mut columns = vec![name_column("Software recipe", RECIPE_HELP)];
        columns.extend(base_columns());
        columns.push(build_column());
        columns
    }
}
