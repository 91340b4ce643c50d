use anyhow::{Context, Result};
use std::path::Path;
use toaster_index::{Database, Dataset};
use tracing::info;

use crate::types::OutputFormat;

pub fn handle(db_path: &Path, file: &Path, format: OutputFormat) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read dataset {}", file.display()))?;
    let dataset = Dataset::from_json(&json)
        .with_context(|| format!("Invalid dataset {}", file.display()))?;

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut db = Database::open(db_path)?;
    let stats = db.import(&dataset)?;
    info!(file = %file.display(), ?stats, "imported dataset");

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        _ => {
            println!("Imported {} into {}", file.display(), db_path.display());
            println!("  projects:       {}", stats.projects);
            println!("  layer versions: {}", stats.layer_versions);
            println!("  recipes:        {}", stats.recipes);
            println!("  machines:       {}", stats.machines);
            println!("  builds:         {}", stats.builds);
            println!("  packages:       {}", stats.packages);
            println!("  log messages:   {}", stats.log_messages);
        }
    }
    Ok(())
}
