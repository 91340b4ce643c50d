//! Testing infrastructure for toaster integration tests.
//!
//! - `TestWorld`: isolated data directory plus CLI execution
//! - `fixtures`: `DatasetBuilder` for compact, id-allocating test data
//! - `assertions`: checks over rendered table JSON

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use fixtures::DatasetBuilder;
pub use world::TestWorld;
