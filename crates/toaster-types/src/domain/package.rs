use serde::{Deserialize, Serialize};

use crate::{BuildId, PackageId};

/// A binary package produced by a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: PackageId,
    pub build_id: Option<BuildId>,
    pub name: String,
    pub version: String,
    pub revision: String,
    /// Installed size in bytes.
    pub size: i64,
    pub summary: String,
}
