//! Action buttons shared by several tables.
//!
//! Each renders both states of its toggle; the one not applying to the row
//! is hidden so client code can flip it without a reload.

use toaster_types::{LayerVersion, Package};

use crate::context::Extra;
use crate::html::escape;
use crate::urls;

const HIDDEN: &str = " style=\"display:none;\"";

fn hidden_unless(visible: bool) -> &'static str {
    if visible { "" } else { HIDDEN }
}

/// Add / delete a layer to / from the project.
pub fn layer_btn(layer_version: &LayerVersion, extra: &Extra) -> String {
    let in_project = extra.layer_in_project(layer_version.id);
    let name = escape(&layer_version.layer.name);
    let url = escape(&urls::layer_details(extra.project_id(), layer_version.id));

    format!(
        "<button class=\"btn btn-danger btn-block layer-exists-{id} layerbtn\" \
         data-layer='{{\"id\": {id}, \"name\": \"{name}\", \"layerdetailurl\": \"{url}\"}}' \
         data-directive=\"remove\"{del_hidden}><i class=\"icon-trash\"></i> Delete layer</button>\
         <button class=\"btn btn-block layer-add-{id} layerbtn\" \
         data-layer='{{\"id\": {id}, \"name\": \"{name}\", \"layerdetailurl\": \"{url}\"}}' \
         data-directive=\"add\"{add_hidden}><i class=\"icon-plus\"></i> Add layer</button>",
        id = layer_version.id,
        name = name,
        url = url,
        del_hidden = hidden_unless(in_project),
        add_hidden = hidden_unless(!in_project),
    )
}

/// Button offering to add the layer providing a machine or recipe.
fn add_layer_btn(layer_version: &LayerVersion, extra: &Extra, tooltip: &str) -> String {
    format!(
        "<button class=\"btn btn-block layer-add-{id} layerbtn\" \
         data-layer='{{\"id\": {id}, \"name\": \"{name}\", \"layerdetailurl\": \"{url}\"}}' \
         data-directive=\"add\" title=\"{tooltip}\"{hidden}>\
         <i class=\"icon-plus\"></i> Add layer</button>",
        id = layer_version.id,
        name = escape(&layer_version.layer.name),
        url = escape(&urls::layer_details(extra.project_id(), layer_version.id)),
        tooltip = escape(tooltip),
        hidden = hidden_unless(!extra.layer_in_project(layer_version.id)),
    )
}

/// Select a machine, available once its layer is in the project.
pub fn machine_btn(machine_name: &str, layer_version: &LayerVersion, extra: &Extra) -> String {
    let select = format!(
        "<a href=\"{url}?setMachine={name}\" class=\"btn btn-block layer-exists-{id}\"{hidden}>\
         Select machine</a>",
        url = escape(&urls::project(extra.project_id())),
        name = escape(machine_name),
        id = layer_version.id,
        hidden = hidden_unless(extra.layer_in_project(layer_version.id)),
    );
    let tooltip = format!(
        "To enable this machine, you must add the {} layer to your project",
        layer_version.layer.name
    );
    format!("{}{}", select, add_layer_btn(layer_version, extra, &tooltip))
}

/// Build a recipe, available once its layer is in the project.
pub fn recipe_btn(recipe_name: &str, layer_version: &LayerVersion, extra: &Extra) -> String {
    let build = format!(
        "<button data-recipe-name=\"{name}\" class=\"btn btn-block layer-exists-{id} build-recipe-btn\"{hidden}>\
         Build recipe</button>",
        name = escape(recipe_name),
        id = layer_version.id,
        hidden = hidden_unless(extra.layer_in_project(layer_version.id)),
    );
    let tooltip = format!(
        "To build this recipe, you must add the {} layer to your project",
        layer_version.layer.name
    );
    format!("{}{}", build, add_layer_btn(layer_version, extra, &tooltip))
}

/// Start customising an image recipe, available once its layer is in the
/// project.
pub fn customise_btn(recipe_id: i64, recipe_name: &str, layer_version: &LayerVersion, extra: &Extra) -> String {
    let customise = format!(
        "<button class=\"btn btn-block layer-exists-{id} customise-btn\" \
         data-recipe=\"{recipe_id}\" data-recipe-name=\"{name}\"{hidden}>Customise</button>",
        id = layer_version.id,
        recipe_id = recipe_id,
        name = escape(recipe_name),
        hidden = hidden_unless(extra.layer_in_project(layer_version.id)),
    );
    let tooltip = format!(
        "To customise this image recipe, you must add the {} layer to your project",
        layer_version.layer.name
    );
    format!("{}{}", customise, add_layer_btn(layer_version, extra, &tooltip))
}

/// Add a package to, or remove it from, the custom image being edited.
pub fn pkg_add_rm_btn(package: &Package, extra: &Extra) -> String {
    let in_image = extra.package_in_image(package.id);
    let recipe_id = extra.recipe_id.map(|id| id.get()).unwrap_or_default();

    format!(
        "<button class=\"btn btn-block btn-danger add-rm-package-btn\" data-directive=\"remove\" \
         data-package=\"{id}\" data-recipe=\"{recipe}\"{rm_hidden}>\
         <i class=\"icon-trash no-tooltip\"></i> Remove package</button>\
         <button class=\"btn btn-block add-rm-package-btn\" data-directive=\"add\" \
         data-package=\"{id}\" data-recipe=\"{recipe}\"{add_hidden}>\
         <i class=\"icon-plus\"></i> Add package</button>",
        id = package.id,
        recipe = recipe_id,
        rm_hidden = hidden_unless(in_image),
        add_hidden = hidden_unless(!in_image),
    )
}
