use std::sync::Arc;

use log::info;

use crate::core::{MasonError, ObjectId};
use crate::exec::Executor;
use crate::model::RoleSpec;
use crate::plan;
use crate::read::Catalog;

pub struct RoleService {
    catalog: Arc<dyn Catalog>,
    executor: Executor,
}

impl RoleService {
    pub fn new(catalog: Arc<dyn Catalog>, executor: Executor) -> RoleService {
        RoleService { catalog, executor }
    }

    /// Create the role, then grant each privilege one at a time. A failing
    /// grant drops the half-created role again so a retry starts clean.
    pub async fn create(&self, spec: &RoleSpec) -> Result<ObjectId, MasonError> {
        self.executor
            .apply(vec![plan::role::create_role(&spec.name)])
            .await?;

        for privilege in &spec.privileges {
            let statement = plan::role::grant(
                &spec.name,
                &spec.database,
                std::slice::from_ref(privilege),
            );
            if let Err(err) = self.executor.apply(vec![statement]).await {
                if let Err(drop_err) = self
                    .executor
                    .apply(vec![plan::role::drop_role(&spec.name)])
                    .await
                {
                    return Err(MasonError::ClientError(format!(
                        "{err}; rolling back role {} also failed: {drop_err}",
                        spec.name
                    )));
                }
                return Err(err);
            }
        }

        info!(
            "created role {} with {} privilege(s) on {}",
            spec.name,
            spec.privileges.len(),
            spec.database
        );
        Ok(ObjectId::named(&spec.name))
    }

    pub async fn read(&self, name: &str) -> Result<Option<RoleSpec>, MasonError> {
        Ok(self.catalog.role(name).await?.map(|live| live.to_spec()))
    }

    /// `previous_name` is the name the role currently holds in the store;
    /// it differs from `spec.name` when the update renames.
    pub async fn update(
        &self,
        spec: &RoleSpec,
        previous_name: &str,
    ) -> Result<ObjectId, MasonError> {
        let live = self
            .catalog
            .role(previous_name)
            .await?
            .ok_or_else(|| MasonError::NotFound(format!("role {previous_name}")))?;

        let statements = plan::role::update_role(spec, &live);
        self.executor.apply(statements).await?;
        info!("updated role {}", spec.name);
        Ok(ObjectId::named(&spec.name))
    }

    pub async fn delete(&self, name: &str) -> Result<(), MasonError> {
        self.executor.apply(vec![plan::role::drop_role(name)]).await?;
        info!("dropped role {name}");
        Ok(())
    }
}
