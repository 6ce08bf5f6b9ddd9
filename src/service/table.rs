use std::sync::Arc;

use log::info;

use crate::conf::BehaviorConfig;
use crate::core::{MasonError, ObjectId};
use crate::exec::Executor;
use crate::model::{TableDelta, TableSpec};
use crate::plan;
use crate::read::Catalog;
use crate::service::resolve_cluster;

pub struct TableService {
    catalog: Arc<dyn Catalog>,
    executor: Executor,
    behavior: BehaviorConfig,
    default_cluster: Option<String>,
}

impl TableService {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        executor: Executor,
        behavior: BehaviorConfig,
        default_cluster: Option<String>,
    ) -> TableService {
        TableService {
            catalog,
            executor,
            behavior,
            default_cluster,
        }
    }

    fn resolved(&self, spec: &TableSpec) -> TableSpec {
        let mut spec = spec.clone();
        spec.cluster = resolve_cluster(spec.cluster, &self.default_cluster);
        spec
    }

    fn id(spec: &TableSpec) -> ObjectId {
        ObjectId::table(
            spec.cluster.as_deref().unwrap_or_default(),
            &spec.database,
            &spec.name,
        )
    }

    pub async fn create(&self, spec: &TableSpec) -> Result<ObjectId, MasonError> {
        let spec = self.resolved(spec);
        let diagnostics = spec.validate();
        if !diagnostics.is_empty() {
            return Err(MasonError::ValidationFailed(diagnostics));
        }

        let statement = plan::table::create_table(&spec, &self.behavior)?;
        self.executor.apply(vec![statement]).await?;
        info!("created table {}.{}", spec.database, spec.name);
        Ok(Self::id(&spec))
    }

    /// `None` when the table does not exist. A table that exists but whose
    /// comment slot does not decode was not created by this tool; that is
    /// an error, not absence.
    pub async fn read(&self, database: &str, name: &str) -> Result<Option<TableSpec>, MasonError> {
        match self.catalog.table(database, name).await? {
            Some(live) => Ok(Some(live.to_spec()?)),
            None => Ok(None),
        }
    }

    pub async fn update(
        &self,
        spec: &TableSpec,
        delta: &TableDelta,
    ) -> Result<ObjectId, MasonError> {
        let spec = self.resolved(spec);
        let diagnostics = spec.validate();
        if !diagnostics.is_empty() {
            return Err(MasonError::ValidationFailed(diagnostics));
        }

        let live = self
            .catalog
            .table(&spec.database, &spec.name)
            .await?
            .ok_or_else(|| {
                MasonError::NotFound(format!("table {}.{}", spec.database, spec.name))
            })?;

        let statements = plan::table::update_table(&spec, &live, delta)?;
        self.executor.apply(statements).await?;
        info!("updated table {}.{}", spec.database, spec.name);
        Ok(Self::id(&spec))
    }

    pub async fn delete(&self, spec: &TableSpec) -> Result<(), MasonError> {
        let spec = self.resolved(spec);
        self.executor.apply(vec![plan::table::drop_table(&spec)]).await?;
        info!("dropped table {}.{}", spec.database, spec.name);
        Ok(())
    }
}
