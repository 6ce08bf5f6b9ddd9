use crate::model::DatabaseSpec;
use crate::plan::{cluster_clause, comment_clause, join_clauses, Statement};

/// Databases always use the plain create verb; re-running against an
/// existing database is surfaced instead of papered over.
pub fn create_database(spec: &DatabaseSpec) -> Statement {
    let cluster = spec.cluster.clone().unwrap_or_default();
    let parts = [
        format!("CREATE DATABASE {}", spec.name),
        cluster_clause(&cluster),
        comment_clause(&spec.comment),
    ];
    Statement::new(
        format!("creating database {}", spec.name),
        join_clauses(&parts),
    )
}

/// `SYNC` makes the drop wait until the database is gone on every replica,
/// so a follow-up create cannot race it.
pub fn drop_database(spec: &DatabaseSpec) -> Statement {
    let cluster = spec.cluster.clone().unwrap_or_default();
    let parts = [
        format!("DROP DATABASE {}", spec.name),
        cluster_clause(&cluster),
        "SYNC".to_string(),
    ];
    Statement::new(
        format!("dropping database {}", spec.name),
        join_clauses(&parts),
    )
}
