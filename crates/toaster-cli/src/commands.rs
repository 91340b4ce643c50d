use anyhow::Result;
use std::path::Path;
use toaster_tables::{FilterSelection, TableRequest};

use super::args::{Cli, Commands};
use super::handlers;
use crate::config::{CONFIG_FILE, Config, DATABASE_FILE, resolve_data_dir};
use crate::logging;

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;

    let Some(command) = cli.command else {
        show_guidance(&data_dir);
        return Ok(());
    };

    let config = Config::load_from(&data_dir.join(CONFIG_FILE))?;
    let db_path = data_dir.join(DATABASE_FILE);

    match command {
        Commands::Tables => handlers::tables::handle(cli.format),

        Commands::Table {
            name,
            scope,
            orderby,
            filters,
            filter_value,
            search,
            limit,
            page,
        } => {
            let db = handlers::open_database(&db_path)?;
            let request = TableRequest {
                orderby,
                filters: filters
                    .iter()
                    .map(|f| f.parse::<FilterSelection>())
                    .collect::<toaster_tables::Result<Vec<_>>>()?,
                filter_value,
                search,
                limit: limit.filter(|l| *l > 0).unwrap_or(config.tables.page_size),
                page: page.max(1),
            };
            handlers::table::handle(&db, &name, &scope, &request, cli.format)
        }

        Commands::FilterInfo {
            name,
            filter,
            scope,
            search,
        } => {
            let db = handlers::open_database(&db_path)?;
            handlers::filter_info::handle(&db, &name, &filter, &scope, search.as_deref(), cli.format)
        }

        Commands::RecentBuilds { scope } => {
            let db = handlers::open_database(&db_path)?;
            handlers::recent_builds::handle(&db, &scope, cli.format)
        }

        Commands::Import { file } => {
            handlers::import::handle(&db_path, Path::new(&file), cli.format)
        }

        Commands::Serve { listen } => {
            let listen = listen.unwrap_or_else(|| config.server.listen.clone());
            handlers::serve::handle(db_path, &listen, config.tables.page_size)
        }
    }
}

fn show_guidance(data_dir: &Path) {
    let db_exists = data_dir.join(DATABASE_FILE).exists();

    println!("toaster - build dashboard tables\n");

    if !db_exists {
        println!("Get started:");
        println!("  toaster import <DATASET.json>\n");
        println!("The dataset is loaded into {}", data_dir.display());
        println!();
    } else {
        println!("Quick commands:");
        println!("  toaster tables                      # List tables");
        println!("  toaster table builds                # All builds");
        println!("  toaster table layers --project 1    # Layers compatible with project 1");
        println!("  toaster serve                       # Serve tables over HTTP\n");
    }

    println!("For more commands:");
    println!("  toaster --help");
}
