// NOTE: one table engine, two front ends
//
// The CLI and the HTTP server both resolve a table by name, build a
// `TableRequest` and call into `toaster-tables`; they differ only in how
// the request is parsed and how the response is written out. Neither keeps
// state between requests besides the configuration.

mod args;
mod commands;
pub mod config;
mod handlers;
pub mod logging;
pub mod server;
pub mod types;
mod views;

pub use args::{Cli, Commands};
pub use commands::run;
