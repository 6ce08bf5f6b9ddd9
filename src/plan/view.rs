use crate::conf::BehaviorConfig;
use crate::core::MasonError;
use crate::meta::CommentMetadata;
use crate::model::ViewSpec;
use crate::plan::{cluster_clause, join_clauses, Statement};

pub fn create_view(spec: &ViewSpec, behavior: &BehaviorConfig) -> Result<Statement, MasonError> {
    let cluster = spec.cluster.clone().unwrap_or_default();
    let target = format!("{}.{}", spec.database, spec.name);
    let metadata = CommentMetadata {
        comment: spec.comment.clone(),
        cluster: cluster.clone(),
        to_table: spec.to_table.clone(),
    };
    let object = if spec.materialized { "MATERIALIZED VIEW" } else { "VIEW" };

    let parts = [
        behavior.create_verb().prefix(object),
        target.clone(),
        cluster_clause(&cluster),
        spec.to_table
            .as_ref()
            .map(|table| format!("TO {table}"))
            .unwrap_or_default(),
        format!("AS ({})", spec.query),
        format!("COMMENT '{}'", metadata.encode()?),
    ];
    Ok(Statement::new(format!("creating view {target}"), join_clauses(&parts)))
}

pub fn drop_view(spec: &ViewSpec) -> Statement {
    let cluster = spec.cluster.clone().unwrap_or_default();
    let target = format!("{}.{}", spec.database, spec.name);
    let parts = [
        format!("DROP VIEW IF EXISTS {target}"),
        cluster_clause(&cluster),
    ];
    Statement::new(format!("dropping view {target}"), join_clauses(&parts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn materialized_view_renders_target_table() {
        let spec = ViewSpec {
            database: "logs".to_string(),
            name: "events_mv".to_string(),
            cluster: Some("main".to_string()),
            comment: "hourly rollup".to_string(),
            query: "SELECT key FROM logs.events".to_string(),
            materialized: true,
            to_table: Some("logs.events_hourly".to_string()),
        };
        let statement = create_view(&spec, &BehaviorConfig::default()).unwrap();
        assert_eq!(
            statement.sql,
            "CREATE MATERIALIZED VIEW logs.events_mv ON CLUSTER main TO logs.events_hourly \
             AS (SELECT key FROM logs.events) \
             COMMENT '{\"comment\":\"hourly rollup\",\"cluster\":\"main\",\"to_table\":\"logs.events_hourly\"}'"
        );
    }

    #[test]
    fn plain_view_omits_materialized_parts() {
        let spec = ViewSpec {
            database: "logs".to_string(),
            name: "recent".to_string(),
            query: "SELECT * FROM logs.events".to_string(),
            ..ViewSpec::default()
        };
        let statement = create_view(&spec, &BehaviorConfig::default()).unwrap();
        assert_eq!(
            statement.sql,
            "CREATE VIEW logs.recent AS (SELECT * FROM logs.events) \
             COMMENT '{\"comment\":\"\",\"cluster\":\"\"}'"
        );
    }

    #[test]
    fn drop_names_the_view() {
        let spec = ViewSpec {
            database: "logs".to_string(),
            name: "recent".to_string(),
            cluster: Some("main".to_string()),
            ..ViewSpec::default()
        };
        assert_eq!(
            drop_view(&spec).sql,
            "DROP VIEW IF EXISTS logs.recent ON CLUSTER main"
        );
    }
}
