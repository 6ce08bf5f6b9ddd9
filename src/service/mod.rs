mod database;
mod role;
mod table;
mod user;
mod view;

use std::sync::Arc;

pub use database::DatabaseService;
pub use role::RoleService;
pub use table::TableService;
pub use user::UserService;
pub use view::ViewService;

use crate::conf::Config;
use crate::exec::{ClickhouseRunner, Executor, Runner};
use crate::read::{Catalog, SystemReader};

/// The five object services wired over one store connection.
pub struct Mason {
    pub tables: TableService,
    pub views: ViewService,
    pub databases: DatabaseService,
    pub roles: RoleService,
    pub users: UserService,
}

impl Mason {
    pub fn connect(config: &Config) -> Mason {
        let client = config.connection.client();
        let catalog: Arc<dyn Catalog> = Arc::new(SystemReader::new(client.clone()));
        let runner: Arc<dyn Runner> = Arc::new(ClickhouseRunner::new(client));
        Mason::new(catalog, runner, config)
    }

    /// Wiring seam for callers that substitute their own catalog or runner.
    pub fn new(catalog: Arc<dyn Catalog>, runner: Arc<dyn Runner>, config: &Config) -> Mason {
        let behavior = config.behavior.clone();
        let default_cluster = config.connection.default_cluster.clone();
        let executor = Executor::new(runner, behavior.debug_statements);
        Mason {
            tables: TableService::new(
                catalog.clone(),
                executor.clone(),
                behavior.clone(),
                default_cluster.clone(),
            ),
            views: ViewService::new(
                catalog.clone(),
                executor.clone(),
                behavior,
                default_cluster.clone(),
            ),
            databases: DatabaseService::new(catalog.clone(), executor.clone(), default_cluster),
            roles: RoleService::new(catalog.clone(), executor.clone()),
            users: UserService::new(catalog, executor),
        }
    }
}

/// A spec without its own cluster picks up the connection default.
fn resolve_cluster(cluster: Option<String>, default_cluster: &Option<String>) -> Option<String> {
    cluster.or_else(|| default_cluster.clone())
}
