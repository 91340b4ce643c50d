use rusqlite::ToSql;
use rusqlite::types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares a typed integer primary key.
///
/// Every entity is keyed by an integer row id in the store; wrapping each in
/// its own type keeps a layer version id from being passed where a project
/// id is expected.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                i64::column_result(value).map(Self)
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.0))
            }
        }
    };
}

define_id!(
    /// Release (branch of the build system a project targets)
    ReleaseId
);
define_id!(LayerId);
define_id!(
    /// A specific checkout of a layer; most relations point here, not at the layer
    LayerVersionId
);
define_id!(RecipeId);
define_id!(MachineId);
define_id!(ProjectId);
define_id!(BuildId);
define_id!(TargetId);
define_id!(TaskId);
define_id!(PackageId);
define_id!(LogMessageId);
