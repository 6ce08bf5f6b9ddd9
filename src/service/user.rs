use std::sync::Arc;

use log::info;

use crate::core::{MasonError, ObjectId};
use crate::exec::Executor;
use crate::model::UserSpec;
use crate::plan;
use crate::read::Catalog;

pub struct UserService {
    catalog: Arc<dyn Catalog>,
    executor: Executor,
}

impl UserService {
    pub fn new(catalog: Arc<dyn Catalog>, executor: Executor) -> UserService {
        UserService { catalog, executor }
    }

    pub async fn create(&self, spec: &UserSpec) -> Result<ObjectId, MasonError> {
        self.executor
            .apply(plan::user::create_user_sequence(spec))
            .await?;
        info!("created user {} with {} role(s)", spec.name, spec.roles.len());
        Ok(ObjectId::named(&spec.name))
    }

    pub async fn read(&self, name: &str) -> Result<Option<UserSpec>, MasonError> {
        Ok(self.catalog.user(name).await?.map(|live| live.to_spec()))
    }

    /// The password hash cannot be read back from the store, so the caller
    /// reports whether it changed.
    pub async fn update(
        &self,
        spec: &UserSpec,
        previous_name: &str,
        password_changed: bool,
    ) -> Result<ObjectId, MasonError> {
        let live = self
            .catalog
            .user(previous_name)
            .await?
            .ok_or_else(|| MasonError::NotFound(format!("user {previous_name}")))?;

        let statements = plan::user::update_user(spec, &live, password_changed);
        self.executor.apply(statements).await?;
        info!("updated user {}", spec.name);
        Ok(ObjectId::named(&spec.name))
    }

    pub async fn delete(&self, name: &str) -> Result<(), MasonError> {
        self.executor.apply(vec![plan::user::drop_user(name)]).await?;
        info!("dropped user {name}");
        Ok(())
    }
}
