//! Test utilities: scripted stand-ins for the store seams plus spec
//! factories.
//!
//! This module is only available when the `testutil` feature is enabled.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::MasonError;
use crate::exec::Runner;
use crate::meta::CommentMetadata;
use crate::model::{
    ColumnSpec, LiveColumn, LiveDatabase, LiveRole, LiveTable, LiveUser, LiveView, TableSpec,
};
use crate::read::Catalog;

/// Runner that records every statement instead of talking to a store.
/// `fail_on` makes any statement containing that fragment fail, for
/// exercising partial-application paths.
#[derive(Default)]
pub struct ScriptedRunner {
    pub executed: Mutex<Vec<String>>,
    pub formatted: Mutex<Vec<String>>,
    pub fail_on: Option<String>,
}

impl ScriptedRunner {
    pub fn new() -> ScriptedRunner {
        ScriptedRunner::default()
    }

    pub fn failing_on(fragment: &str) -> ScriptedRunner {
        ScriptedRunner {
            fail_on: Some(fragment.to_string()),
            ..ScriptedRunner::default()
        }
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().expect("runner lock").clone()
    }
}

#[async_trait]
impl Runner for ScriptedRunner {
    async fn execute(&self, sql: &str) -> Result<(), MasonError> {
        if let Some(fragment) = &self.fail_on {
            if sql.contains(fragment.as_str()) {
                return Err(MasonError::ClientError(format!(
                    "scripted failure on {fragment}"
                )));
            }
        }
        self.executed.lock().expect("runner lock").push(sql.to_string());
        Ok(())
    }

    async fn format(&self, sql: &str) -> Result<String, MasonError> {
        self.formatted.lock().expect("runner lock").push(sql.to_string());
        Ok(sql.to_string())
    }
}

/// Catalog serving fixed in-memory snapshots.
#[derive(Default)]
pub struct ScriptedCatalog {
    pub tables: Vec<LiveTable>,
    pub views: Vec<LiveView>,
    pub databases: Vec<LiveDatabase>,
    pub roles: Vec<LiveRole>,
    pub users: Vec<LiveUser>,
}

#[async_trait]
impl Catalog for ScriptedCatalog {
    async fn table(&self, database: &str, name: &str) -> Result<Option<LiveTable>, MasonError> {
        Ok(self
            .tables
            .iter()
            .find(|t| t.database == database && t.name == name)
            .cloned())
    }

    async fn table_names(&self, database: &str) -> Result<Vec<String>, MasonError> {
        let mut names: Vec<String> = self
            .tables
            .iter()
            .filter(|t| t.database == database)
            .map(|t| t.name.clone())
            .collect();
        names.extend(
            self.views
                .iter()
                .filter(|v| v.database == database)
                .map(|v| v.name.clone()),
        );
        Ok(names)
    }

    async fn view(&self, database: &str, name: &str) -> Result<Option<LiveView>, MasonError> {
        Ok(self
            .views
            .iter()
            .find(|v| v.database == database && v.name == name)
            .cloned())
    }

    async fn database(&self, name: &str) -> Result<Option<LiveDatabase>, MasonError> {
        Ok(self.databases.iter().find(|d| d.name == name).cloned())
    }

    async fn role(&self, name: &str) -> Result<Option<LiveRole>, MasonError> {
        Ok(self.roles.iter().find(|r| r.name == name).cloned())
    }

    async fn user(&self, name: &str) -> Result<Option<LiveUser>, MasonError> {
        Ok(self.users.iter().find(|u| u.name == name).cloned())
    }
}

pub fn column(name: &str, r#type: &str) -> ColumnSpec {
    ColumnSpec {
        name: name.to_string(),
        r#type: r#type.to_string(),
        ..ColumnSpec::default()
    }
}

/// Minimal two-column MergeTree spec, the usual starting point of a test.
pub fn table_spec(database: &str, name: &str) -> TableSpec {
    TableSpec {
        database: database.to_string(),
        name: name.to_string(),
        engine: "MergeTree".to_string(),
        order_by: vec!["key".to_string()],
        columns: vec![column("key", "UInt64"), column("value", "String")],
        ..TableSpec::default()
    }
}

/// The live snapshot the store would report for a spec this tool created:
/// metadata encoded into the comment slot, engine descriptor reassembled
/// from the structured fields.
pub fn live_table_of(spec: &TableSpec) -> LiveTable {
    let cluster = spec.cluster.clone().unwrap_or_default();
    let comment = CommentMetadata::new(&spec.comment, &cluster)
        .encode()
        .expect("metadata encodes");

    let mut engine_full = format!("{}({})", spec.engine, spec.engine_params.join(", "));
    if !spec.order_by.is_empty() {
        engine_full.push_str(&format!(" ORDER BY ({})", spec.order_by.join(", ")));
    }
    if !spec.ttl.is_empty() {
        let rules: Vec<String> = spec
            .ttl
            .iter()
            .map(|(expression, action)| format!("{expression} {action}"))
            .collect();
        engine_full.push_str(&format!(" TTL {}", rules.join(", ")));
    }

    LiveTable {
        database: spec.database.clone(),
        name: spec.name.clone(),
        engine: spec.engine.clone(),
        engine_full,
        comment,
        columns: spec
            .columns
            .iter()
            .map(|c| LiveColumn {
                name: c.name.clone(),
                r#type: c.r#type.clone(),
                comment: c.comment.clone(),
                default_kind: c.default_kind.clone(),
                default_expression: c.default_expression.clone(),
                compression_codec: c.compression_codec.clone(),
            })
            .collect(),
        indexes: Vec::new(),
    }
}
