use std::sync::Arc;

use log::info;

use crate::core::{Diagnostic, MasonError, ObjectId};
use crate::exec::Executor;
use crate::model::DatabaseSpec;
use crate::plan;
use crate::read::Catalog;
use crate::service::resolve_cluster;

pub struct DatabaseService {
    catalog: Arc<dyn Catalog>,
    executor: Executor,
    default_cluster: Option<String>,
}

impl DatabaseService {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        executor: Executor,
        default_cluster: Option<String>,
    ) -> DatabaseService {
        DatabaseService {
            catalog,
            executor,
            default_cluster,
        }
    }

    fn resolved(&self, spec: &DatabaseSpec) -> DatabaseSpec {
        let mut spec = spec.clone();
        spec.cluster = resolve_cluster(spec.cluster, &self.default_cluster);
        spec
    }

    pub async fn create(&self, spec: &DatabaseSpec) -> Result<ObjectId, MasonError> {
        let spec = self.resolved(spec);
        self.executor
            .apply(vec![plan::database::create_database(&spec)])
            .await?;
        info!("created database {}", spec.name);
        Ok(ObjectId::database(
            spec.cluster.as_deref().unwrap_or_default(),
            &spec.name,
        ))
    }

    pub async fn read(&self, name: &str) -> Result<Option<DatabaseSpec>, MasonError> {
        Ok(self.catalog.database(name).await?.map(|live| live.to_spec()))
    }

    /// Refuses to drop a database that still holds tables or views; the
    /// resident objects are listed in the diagnostic so the caller knows
    /// what is in the way.
    pub async fn delete(&self, spec: &DatabaseSpec) -> Result<(), MasonError> {
        let resident = self.catalog.table_names(&spec.name).await?;
        if !resident.is_empty() {
            let diagnostic = Diagnostic::error(
                format!("unable to delete database {}", spec.name),
                format!("database contains tables: {}", resident.join(", ")),
            );
            return Err(MasonError::ValidationFailed(vec![diagnostic]));
        }

        let spec = self.resolved(spec);
        self.executor
            .apply(vec![plan::database::drop_database(&spec)])
            .await?;
        info!("dropped database {}", spec.name);
        Ok(())
    }
}
