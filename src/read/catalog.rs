use async_trait::async_trait;

use crate::core::MasonError;
use crate::model::{LiveDatabase, LiveRole, LiveTable, LiveUser, LiveView};

/// Read-only introspection surface over the store.
///
/// Absence of a matching object is `Ok(None)`, never an error: "not yet
/// created" is a normal state for a reconciler to observe.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn table(&self, database: &str, name: &str) -> Result<Option<LiveTable>, MasonError>;

    /// Names of everything resident in a database, views included.
    async fn table_names(&self, database: &str) -> Result<Vec<String>, MasonError>;

    async fn view(&self, database: &str, name: &str) -> Result<Option<LiveView>, MasonError>;

    async fn database(&self, name: &str) -> Result<Option<LiveDatabase>, MasonError>;

    async fn role(&self, name: &str) -> Result<Option<LiveRole>, MasonError>;

    async fn user(&self, name: &str) -> Result<Option<LiveUser>, MasonError>;
}
