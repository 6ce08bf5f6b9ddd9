use std::sync::Arc;

use log::info;

use crate::conf::BehaviorConfig;
use crate::core::{MasonError, ObjectId};
use crate::exec::Executor;
use crate::model::ViewSpec;
use crate::plan;
use crate::read::Catalog;
use crate::service::resolve_cluster;

pub struct ViewService {
    catalog: Arc<dyn Catalog>,
    executor: Executor,
    behavior: BehaviorConfig,
    default_cluster: Option<String>,
}

impl ViewService {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        executor: Executor,
        behavior: BehaviorConfig,
        default_cluster: Option<String>,
    ) -> ViewService {
        ViewService {
            catalog,
            executor,
            behavior,
            default_cluster,
        }
    }

    fn resolved(&self, spec: &ViewSpec) -> ViewSpec {
        let mut spec = spec.clone();
        spec.cluster = resolve_cluster(spec.cluster, &self.default_cluster);
        spec
    }

    pub async fn create(&self, spec: &ViewSpec) -> Result<ObjectId, MasonError> {
        let spec = self.resolved(spec);
        let diagnostics = spec.validate();
        if !diagnostics.is_empty() {
            return Err(MasonError::ValidationFailed(diagnostics));
        }

        let statement = plan::view::create_view(&spec, &self.behavior)?;
        self.executor.apply(vec![statement]).await?;
        info!("created view {}.{}", spec.database, spec.name);
        Ok(ObjectId::table(
            spec.cluster.as_deref().unwrap_or_default(),
            &spec.database,
            &spec.name,
        ))
    }

    /// The query text comes back in the store's normalized form, not the
    /// text the view was created with.
    pub async fn read(&self, database: &str, name: &str) -> Result<Option<ViewSpec>, MasonError> {
        match self.catalog.view(database, name).await? {
            Some(live) => Ok(Some(live.to_spec()?)),
            None => Ok(None),
        }
    }

    pub async fn delete(&self, spec: &ViewSpec) -> Result<(), MasonError> {
        let spec = self.resolved(spec);
        self.executor.apply(vec![plan::view::drop_view(&spec)]).await?;
        info!("dropped view {}.{}", spec.database, spec.name);
        Ok(())
    }
}
