use async_trait::async_trait;
use clickhouse::{Client, Row};
use log::debug;
use serde::Deserialize;

use crate::core::MasonError;
use crate::model::{
    normalize_query, LiveColumn, LiveDatabase, LiveGrant, LiveIndex, LiveRole, LiveTable,
    LiveUser, LiveView,
};
use crate::read::Catalog;

/// [`Catalog`] backed by the store's own system tables.
pub struct SystemReader {
    client: Client,
}

#[derive(Row, Deserialize)]
struct TableRow {
    database: String,
    name: String,
    engine: String,
    engine_full: String,
    comment: String,
}

#[derive(Row, Deserialize)]
struct ViewRow {
    database: String,
    name: String,
    engine: String,
    as_select: String,
    comment: String,
}

#[derive(Row, Deserialize)]
struct NameRow {
    name: String,
}

#[derive(Row, Deserialize)]
struct DatabaseRow {
    name: String,
    engine: String,
    data_path: String,
    metadata_path: String,
    uuid: String,
    comment: String,
}

#[derive(Row, Deserialize)]
struct GrantRow {
    access_type: String,
    database: Option<String>,
}

#[derive(Row, Deserialize)]
struct UserRow {
    name: String,
    default_roles_list: Vec<String>,
}

impl SystemReader {
    pub fn new(client: Client) -> SystemReader {
        SystemReader { client }
    }

    async fn table_columns(
        &self,
        database: &str,
        table: &str,
    ) -> Result<Vec<LiveColumn>, MasonError> {
        let columns = self
            .client
            .query(
                "SELECT ?fields FROM system.columns \
                 WHERE database = ? AND table = ? ORDER BY position",
            )
            .bind(database)
            .bind(table)
            .fetch_all::<LiveColumn>()
            .await?;
        Ok(columns)
    }

    async fn table_indexes(
        &self,
        database: &str,
        table: &str,
    ) -> Result<Vec<LiveIndex>, MasonError> {
        let indexes = self
            .client
            .query(
                "SELECT ?fields FROM system.data_skipping_indices \
                 WHERE database = ? AND table = ?",
            )
            .bind(database)
            .bind(table)
            .fetch_all::<LiveIndex>()
            .await?;
        Ok(indexes)
    }
}

#[async_trait]
impl Catalog for SystemReader {
    async fn table(&self, database: &str, name: &str) -> Result<Option<LiveTable>, MasonError> {
        debug!("reading table {database}.{name}");
        let row = self
            .client
            .query("SELECT ?fields FROM system.tables WHERE database = ? AND name = ?")
            .bind(database)
            .bind(name)
            .fetch_optional::<TableRow>()
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let columns = self.table_columns(database, name).await?;
        let indexes = self.table_indexes(database, name).await?;
        Ok(Some(LiveTable {
            database: row.database,
            name: row.name,
            engine: row.engine,
            engine_full: row.engine_full,
            comment: row.comment,
            columns,
            indexes,
        }))
    }

    async fn table_names(&self, database: &str) -> Result<Vec<String>, MasonError> {
        let rows = self
            .client
            .query("SELECT name FROM system.tables WHERE database = ?")
            .bind(database)
            .fetch_all::<NameRow>()
            .await?;
        Ok(rows.into_iter().map(|r| r.name).collect())
    }

    async fn view(&self, database: &str, name: &str) -> Result<Option<LiveView>, MasonError> {
        debug!("reading view {database}.{name}");
        let row = self
            .client
            .query("SELECT ?fields FROM system.tables WHERE database = ? AND name = ?")
            .bind(database)
            .bind(name)
            .fetch_optional::<ViewRow>()
            .await?;
        Ok(row.map(|r| LiveView {
            database: r.database,
            name: r.name,
            engine: r.engine,
            // the stored text is unformatted, normalize before anyone compares it
            as_select: normalize_query(&r.as_select),
            comment: r.comment,
        }))
    }

    async fn database(&self, name: &str) -> Result<Option<LiveDatabase>, MasonError> {
        let row = self
            .client
            .query(
                "SELECT name, engine, data_path, metadata_path, toString(uuid) AS uuid, comment \
                 FROM system.databases WHERE name = ?",
            )
            .bind(name)
            .fetch_optional::<DatabaseRow>()
            .await?;
        Ok(row.map(|r| LiveDatabase {
            name: r.name,
            engine: r.engine,
            data_path: r.data_path,
            metadata_path: r.metadata_path,
            uuid: r.uuid,
            comment: r.comment,
        }))
    }

    async fn role(&self, name: &str) -> Result<Option<LiveRole>, MasonError> {
        let row = self
            .client
            .query("SELECT name FROM system.roles WHERE name = ?")
            .bind(name)
            .fetch_optional::<NameRow>()
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let grants = self
            .client
            .query(
                "SELECT toString(access_type) AS access_type, database \
                 FROM system.grants WHERE role_name = ?",
            )
            .bind(name)
            .fetch_all::<GrantRow>()
            .await?;
        Ok(Some(LiveRole {
            name: row.name,
            grants: grants
                .into_iter()
                .map(|g| LiveGrant {
                    access_type: g.access_type,
                    database: g.database.unwrap_or_else(|| "*".to_string()),
                })
                .collect(),
        }))
    }

    async fn user(&self, name: &str) -> Result<Option<LiveUser>, MasonError> {
        let row = self
            .client
            .query("SELECT name, default_roles_list FROM system.users WHERE name = ?")
            .bind(name)
            .fetch_optional::<UserRow>()
            .await?;
        Ok(row.map(|r| LiveUser {
            name: r.name,
            default_roles: r.default_roles_list,
        }))
    }
}
