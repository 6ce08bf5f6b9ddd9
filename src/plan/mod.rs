//! Pure statement builders. Everything here turns specs and snapshots into
//! [`Statement`] values; nothing talks to the store.

pub mod database;
pub mod role;
mod statement;
pub mod table;
pub mod user;
pub mod view;

pub use statement::Statement;

/// `ON CLUSTER` fragment, empty when no cluster is set.
fn cluster_clause(cluster: &str) -> String {
    if cluster.is_empty() {
        String::new()
    } else {
        format!("ON CLUSTER {cluster}")
    }
}

/// Join fragments with single spaces, skipping empty ones so optional
/// clauses vanish without leaving double spaces behind.
fn join_clauses(parts: &[String]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape a value for embedding in a single-quoted SQL literal.
fn escape_literal(value: &str) -> String {
    value.replace('\'', "\\'")
}

/// `COMMENT '...'` fragment, empty when there is no comment.
fn comment_clause(comment: &str) -> String {
    if comment.is_empty() {
        String::new()
    } else {
        format!("COMMENT '{}'", escape_literal(comment))
    }
}
