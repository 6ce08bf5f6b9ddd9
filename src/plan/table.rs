use std::collections::{BTreeMap, HashMap};

use crate::conf::BehaviorConfig;
use crate::core::MasonError;
use crate::descriptor;
use crate::meta::CommentMetadata;
use crate::model::{ColumnSpec, ColumnsDelta, IndexSpec, LiveTable, PartitionBy, TableDelta, TableSpec};
use crate::plan::{cluster_clause, comment_clause, escape_literal, join_clauses, Statement};

pub fn create_table(spec: &TableSpec, behavior: &BehaviorConfig) -> Result<Statement, MasonError> {
    let cluster = spec.cluster.clone().unwrap_or_default();
    let target = format!("{}.{}", spec.database, spec.name);
    let encoded = CommentMetadata::new(&spec.comment, &cluster).encode()?;

    let mut inner = column_clauses(&spec.columns);
    inner.extend(index_clauses(&spec.indexes));
    let columns_block = if inner.is_empty() {
        String::new()
    } else {
        format!("(\n{}\n)", inner.join(",\n"))
    };

    let parts = [
        behavior.create_verb().prefix("TABLE"),
        target.clone(),
        cluster_clause(&cluster),
        columns_block,
        format!("ENGINE = {}({})", spec.engine, spec.engine_params.join(", ")),
        order_by_clause(&spec.order_by),
        primary_key_clause(&spec.primary_key),
        partition_by_clause(&spec.partition_by),
        ttl_clause(&spec.ttl),
        settings_clause(&spec.settings),
        format!("COMMENT '{encoded}'"),
    ];
    Ok(Statement::new(format!("creating table {target}"), join_clauses(&parts)))
}

pub fn drop_table(spec: &TableSpec) -> Statement {
    let cluster = spec.cluster.clone().unwrap_or_default();
    let target = format!("{}.{}", spec.database, spec.name);
    let parts = [
        format!("DROP TABLE IF EXISTS {target}"),
        cluster_clause(&cluster),
    ];
    Statement::new(format!("dropping table {target}"), join_clauses(&parts))
}

/// Statements reconciling a live table towards `spec`, restricted to the
/// parts `delta` marks as changed. An empty delta plans nothing.
pub fn update_table(
    spec: &TableSpec,
    live: &LiveTable,
    delta: &TableDelta,
) -> Result<Vec<Statement>, MasonError> {
    let cluster = spec.cluster.clone().unwrap_or_default();
    let on_cluster = cluster_clause(&cluster);
    let target = format!("{}.{}", spec.database, spec.name);
    let mut statements = Vec::new();

    if delta.comment_changed {
        let encoded = CommentMetadata::new(&spec.comment, &cluster).encode()?;
        let parts = [
            format!("ALTER TABLE {target}"),
            on_cluster.clone(),
            format!("MODIFY COMMENT '{encoded}'"),
        ];
        statements.push(Statement::new(
            format!("modifying comment on {target}"),
            join_clauses(&parts),
        ));
    }

    if let Some(columns) = &delta.columns {
        statements.extend(column_statements(&target, &on_cluster, columns));
    }

    if delta.ttl_changed {
        statements.extend(ttl_statements(
            &target,
            &on_cluster,
            descriptor::has_ttl(&live.engine_full),
            &spec.ttl,
        ));
    }

    Ok(statements)
}

fn column_clauses(columns: &[ColumnSpec]) -> Vec<String> {
    columns
        .iter()
        .map(|column| {
            let parts = [
                format!("`{}` {}", column.name, column.r#type),
                column.default_kind.clone(),
                column.default_expression.clone(),
                column.compression_codec.clone(),
                comment_clause(&column.comment),
            ];
            format!("\t{}", join_clauses(&parts))
        })
        .collect()
}

fn index_clauses(indexes: &[IndexSpec]) -> Vec<String> {
    indexes
        .iter()
        .map(|index| {
            let mut clause = format!("INDEX {} {} TYPE {}", index.name, index.expression, index.r#type);
            if index.granularity > 0 {
                clause.push_str(&format!(" GRANULARITY {}", index.granularity));
            }
            format!("\t{clause}")
        })
        .collect()
}

fn order_by_clause(order_by: &[String]) -> String {
    if order_by.is_empty() {
        String::new()
    } else {
        format!("ORDER BY ({})", order_by.join(", "))
    }
}

fn primary_key_clause(primary_key: &[String]) -> String {
    if primary_key.is_empty() {
        String::new()
    } else {
        format!("PRIMARY KEY ({})", primary_key.join(", "))
    }
}

fn partition_by_clause(partition_by: &[PartitionBy]) -> String {
    if partition_by.is_empty() {
        return String::new();
    }
    let items: Vec<String> = partition_by
        .iter()
        .map(|partition| match (&partition.function, partition.modulus) {
            (None, _) => partition.column.clone(),
            (Some(function), None) => format!("{}({})", function, partition.column),
            (Some(function), Some(modulus)) => {
                format!("{}({}) % {}", function, partition.column, modulus)
            }
        })
        .collect();
    format!("PARTITION BY ({})", items.join(", "))
}

fn ttl_clause(ttl: &BTreeMap<String, String>) -> String {
    if ttl.is_empty() {
        return String::new();
    }
    let rules: Vec<String> = ttl
        .iter()
        .map(|(expression, action)| format!("{expression} {action}"))
        .collect();
    format!("TTL {}", rules.join(", "))
}

fn settings_clause(settings: &BTreeMap<String, String>) -> String {
    if settings.is_empty() {
        return String::new();
    }
    let items: Vec<String> = settings
        .iter()
        .map(|(key, value)| format!("{} = '{}'", key, escape_literal(value)))
        .collect();
    format!("SETTINGS {}", items.join(", "))
}

/// Walk the desired column list in order, carrying a position cursor so
/// added columns land exactly where the spec declares them. Modifications
/// are split per aspect; default kind, default expression and compression
/// codec travel as one statement since the store requires them together.
/// Columns that disappeared from the desired list are dropped last.
fn column_statements(target: &str, on_cluster: &str, delta: &ColumnsDelta) -> Vec<Statement> {
    let previous: HashMap<&str, &ColumnSpec> =
        delta.previous.iter().map(|c| (c.name.as_str(), c)).collect();
    let desired: HashMap<&str, &ColumnSpec> =
        delta.desired.iter().map(|c| (c.name.as_str(), c)).collect();

    let mut statements = Vec::new();
    let mut position = "FIRST".to_string();
    for column in &delta.desired {
        match previous.get(column.name.as_str()) {
            None => {
                let parts = [
                    format!("ALTER TABLE {target}"),
                    on_cluster.to_string(),
                    format!("ADD COLUMN `{}` {}", column.name, column.r#type),
                    column.default_kind.clone(),
                    column.default_expression.clone(),
                    column.compression_codec.clone(),
                    comment_clause(&column.comment),
                    position.clone(),
                ];
                statements.push(Statement::new(
                    format!("adding column {} to {target}", column.name),
                    join_clauses(&parts),
                ));
            }
            Some(old) => {
                if old.r#type != column.r#type {
                    let parts = [
                        format!("ALTER TABLE {target}"),
                        on_cluster.to_string(),
                        format!("MODIFY COLUMN `{}` {}", column.name, column.r#type),
                    ];
                    statements.push(Statement::new(
                        format!("modifying column {} on {target}", column.name),
                        join_clauses(&parts),
                    ));
                }
                if old.comment != column.comment {
                    let parts = [
                        format!("ALTER TABLE {target}"),
                        on_cluster.to_string(),
                        format!("COMMENT COLUMN `{}` '{}'", column.name, escape_literal(&column.comment)),
                    ];
                    statements.push(Statement::new(
                        format!("commenting column {} on {target}", column.name),
                        join_clauses(&parts),
                    ));
                }
                if old.default_kind != column.default_kind
                    || old.default_expression != column.default_expression
                    || old.compression_codec != column.compression_codec
                {
                    let parts = [
                        format!("ALTER TABLE {target}"),
                        on_cluster.to_string(),
                        format!("MODIFY COLUMN `{}`", column.name),
                        column.default_kind.clone(),
                        column.default_expression.clone(),
                        column.compression_codec.clone(),
                    ];
                    statements.push(Statement::new(
                        format!("modifying column {} on {target}", column.name),
                        join_clauses(&parts),
                    ));
                }
            }
        }
        position = format!("AFTER {}", column.name);
    }

    for column in &delta.previous {
        if !desired.contains_key(column.name.as_str()) {
            let parts = [
                format!("ALTER TABLE {target}"),
                on_cluster.to_string(),
                format!("DROP COLUMN `{}`", column.name),
            ];
            statements.push(Statement::new(
                format!("dropping column {} from {target}", column.name),
                join_clauses(&parts),
            ));
        }
    }
    statements
}

/// Two-phase TTL change: drop whatever TTL the live table carries, then
/// apply the full desired rule set in one statement. Either phase can be
/// absent.
fn ttl_statements(
    target: &str,
    on_cluster: &str,
    live_has_ttl: bool,
    desired: &BTreeMap<String, String>,
) -> Vec<Statement> {
    let mut statements = Vec::new();
    if live_has_ttl {
        let parts = [
            format!("ALTER TABLE {target}"),
            on_cluster.to_string(),
            "REMOVE TTL".to_string(),
        ];
        statements.push(Statement::new(
            format!("removing ttl from {target}"),
            join_clauses(&parts),
        ));
    }
    if !desired.is_empty() {
        let rules: Vec<String> = desired
            .iter()
            .map(|(expression, action)| format!("{expression} {action}"))
            .collect();
        let parts = [
            format!("ALTER TABLE {target}"),
            on_cluster.to_string(),
            format!("MODIFY TTL {}", rules.join(", ")),
        ];
        statements.push(Statement::new(
            format!("modifying ttl on {target}"),
            join_clauses(&parts),
        ));
    }
    statements
}
