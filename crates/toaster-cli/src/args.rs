// NOTE: flat subcommands
//
// The surface is small (list, render, filter counts, recent builds, import,
// serve), so commands stay flat instead of namespaced.

use clap::{Parser, Subcommand};

use crate::types::{LogLevel, OutputFormat};

#[derive(Parser)]
#[command(name = "toaster")]
#[command(about = "Render the build dashboard tables from the command line or over HTTP", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory holding toaster.db and toaster.toml
    /// [default: $TOASTER_PATH, XDG data dir, or ~/.toaster]
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Identifiers a table may be scoped by.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ScopeArgs {
    /// Project id
    #[arg(long = "project", value_name = "ID")]
    pub project: Option<i64>,

    /// Layer version id
    #[arg(long = "layer", value_name = "ID")]
    pub layer: Option<i64>,

    /// Custom image recipe id
    #[arg(long = "recipe", value_name = "ID")]
    pub recipe: Option<i64>,

    /// Reference date for today/yesterday filters (YYYY-MM-DD) [default: today]
    #[arg(long, value_name = "DATE")]
    pub today: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the registered tables
    Tables,

    /// Render one page of a table
    Table {
        /// Table name (see `toaster tables`)
        name: String,

        #[command(flatten)]
        scope: ScopeArgs,

        /// Sort key, `-` prefixed for descending
        #[arg(long)]
        orderby: Option<String>,

        /// Filter selection `filter:action[:value]`; may repeat
        #[arg(long = "filter", value_name = "SELECTION")]
        filters: Vec<String>,

        /// Value for selected actions that need one (e.g. `2024-03-01,2024-03-09`)
        #[arg(long)]
        filter_value: Option<String>,

        /// Free-text search over the table's search fields
        #[arg(long)]
        search: Option<String>,

        /// Rows per page [default: tables.page_size from toaster.toml]
        #[arg(long)]
        limit: Option<usize>,

        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Row counts of each action of a table filter
    FilterInfo {
        /// Table name
        name: String,

        /// Filter name
        filter: String,

        #[command(flatten)]
        scope: ScopeArgs,

        #[arg(long)]
        search: Option<String>,
    },

    /// Builds in progress followed by the latest finished ones
    RecentBuilds {
        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// Load a JSON dataset into the database
    Import {
        /// Dataset file
        file: String,
    },

    /// Serve the tables over HTTP
    Serve {
        /// Listen address [default: server.listen from toaster.toml]
        #[arg(long)]
        listen: Option<String>,
    },
}
