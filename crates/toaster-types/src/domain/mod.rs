pub mod build;
pub mod ids;
pub mod layer;
pub mod package;
pub mod project;
pub mod recipe;

pub use build::*;
pub use ids::*;
pub use layer::*;
pub use package::*;
pub use project::*;
pub use recipe::*;
