// Dashboard tables: querysets, filters and column renderers for every
// table the web UI pages through

mod buttons;
mod column;
mod context;
mod error;
mod filter;
pub mod html;
mod request;
mod table;
pub mod tables;
pub mod urls;

// Public API
pub use column::{Cell, Column, ColumnDescriptor};
pub use context::{Extra, TableContext};
pub use error::{Error, Result};
pub use filter::{Day, FilterAction, FilterActionInfo, FilterInfo, ProjectFilters, TableFilter};
pub use request::{DEFAULT_PAGE_SIZE, FilterSelection, TableRequest, TableResponse};
pub use table::{DEFAULT_EMPTY_STATE, ToasterTable, filter_info, get_data};
pub use tables::{Table, TableInfo, lookup, recent_builds, registry};
