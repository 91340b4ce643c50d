use serde_json::json;
use toaster_index::{Database, Queryset, package, recipe};
use toaster_types::{CustomImageRecipe, Package, filesizeformat};

use crate::buttons;
use crate::column::Column;
use crate::context::{Extra, TableContext};
use crate::html::escape;
use crate::table::ToasterTable;
use crate::{Error, Result, urls};

/// Custom images defined in a project.
pub struct CustomImagesTable;

impl ToasterTable for CustomImagesTable {
    type Row = CustomImageRecipe;

    fn name(&self) -> &'static str {
        "customimages"
    }

    fn title(&self, _ctx: &TableContext) -> String {
        "Custom images".to_string()
    }

    fn default_orderby(&self) -> &'static str {
        "name"
    }

    fn search_fields(&self) -> &'static [&'static str] {
        recipe::CUSTOM_IMAGE_SEARCH_FIELDS
    }

    fn setup_queryset(
        &self,
        db: &Database,
        ctx: &TableContext,
        _extra: &mut Extra,
    ) -> Result<Queryset<CustomImageRecipe>> {
        let project = ctx.project(db)?;
        Ok(db
            .custom_image_recipes()
            .filter(recipe::custom_image_in_project(project.id)))
    }

    fn setup_columns(&self, _ctx: &TableContext) -> Vec<Column<CustomImageRecipe>> {
        vec![
            Column::template("Custom image", "name", |r: &CustomImageRecipe, extra: &Extra| {
                format!(
                    "<a href=\"{}\">{}</a>",
                    escape(&urls::custom_recipe(extra.project_id(), r.id)),
                    escape(&r.name)
                )
            })
            .not_hideable(),
            Column::template(
                "Recipe file",
                "recipe_file",
                |_: &CustomImageRecipe, _: &Extra| String::new(),
            ),
            Column::template(
                "Approx packages",
                "approx_packages",
                |r: &CustomImageRecipe, _: &Extra| {
                    format!("<a href=\"#imagedetails\">{}</a>", r.package_count)
                },
            ),
            Column::template("Build", "build_custom_img", |r: &CustomImageRecipe, _: &Extra| {
                format!(
                    "<button data-recipe-name=\"{}\" class=\"btn btn-block build-recipe-btn\" \
                     style=\"margin-top: 5px;\">Build</button>",
                    escape(&r.name)
                )
            })
            .not_hideable(),
        ]
    }
}

/// Packages that can be added to or removed from a custom image.
pub struct SelectPackagesTable;

impl ToasterTable for SelectPackagesTable {
    type Row = Package;

    fn name(&self) -> &'static str {
        "selectpackages"
    }

    fn title(&self, _ctx: &TableContext) -> String {
        "Add | Remove packages".to_string()
    }

    fn default_orderby(&self) -> &'static str {
        "name"
    }

    fn search_fields(&self) -> &'static [&'static str] {
        package::SEARCH_FIELDS
    }

    fn setup_queryset(
        &self,
        db: &Database,
        ctx: &TableContext,
        extra: &mut Extra,
    ) -> Result<Queryset<Package>> {
        let recipe_id = ctx.require_recipe_id()?;
        let image = db
            .get_custom_image_recipe(recipe_id)?
            .ok_or(Error::NotFound {
                entity: "custom image recipe",
                id: recipe_id.get(),
            })?;
        let project = ctx.project(db)?;

        extra.recipe_id = Some(image.id);
        extra.current_packages = db.custom_image_package_ids(image.id)?;

        Ok(db
            .packages()
            .filter(package::image_candidates(image.id, project.id)))
    }

    fn setup_columns(&self, _ctx: &TableContext) -> Vec<Column<Package>> {
        vec![
            Column::field("Package", "name", |p: &Package, _: &Extra| json!(p.name))
                .not_hideable()
                .orderable("name"),
            Column::field("Package Version", "version", |p: &Package, _: &Extra| json!(p.version)),
            Column::template("Approx Size", "size", |p: &Package, _: &Extra| filesizeformat(p.size))
                .orderable("size"),
            Column::field("summary", "summary", |p: &Package, _: &Extra| json!(p.summary)),
            Column::template("Add | Remove", "add_rm_pkg_btn", buttons::pkg_add_rm_btn).help_text(
                "Use the add and remove buttons to modify the package content of you custom image",
            ),
        ]
    }
}
