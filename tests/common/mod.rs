use std::sync::Arc;

use mason::conf::{BehaviorConfig, Config, ConnectionConfig};
use mason::service::Mason;
use mason::testutil::{ScriptedCatalog, ScriptedRunner};

pub fn test_config() -> Config {
    Config {
        connection: ConnectionConfig::default(),
        behavior: BehaviorConfig::default(),
    }
}

pub fn config_with_default_cluster(cluster: &str) -> Config {
    Config {
        connection: ConnectionConfig {
            default_cluster: Some(cluster.to_string()),
            ..ConnectionConfig::default()
        },
        behavior: BehaviorConfig::default(),
    }
}

/// Wire the full service bundle over scripted seams, handing back the
/// runner so tests can inspect what got executed.
pub fn mason_over(
    catalog: ScriptedCatalog,
    runner: ScriptedRunner,
    config: &Config,
) -> (Mason, Arc<ScriptedRunner>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let runner = Arc::new(runner);
    let mason = Mason::new(Arc::new(catalog), runner.clone(), config);
    (mason, runner)
}
