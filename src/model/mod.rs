mod database;
mod role;
mod table;
mod user;
mod view;

pub use database::{DatabaseSpec, LiveDatabase};
pub use role::{LiveGrant, LiveRole, RoleSpec};
pub use table::{
    ColumnSpec, ColumnsDelta, IndexSpec, LiveColumn, LiveIndex, LiveTable, PartitionBy, TableDelta,
    TableSpec,
};
pub use user::{LiveUser, UserSpec};
pub use view::{normalize_query, LiveView, ViewSpec};
