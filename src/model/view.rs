use serde::{Deserialize, Serialize};

use crate::core::{Diagnostic, MasonError};
use crate::meta::CommentMetadata;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ViewSpec {
    pub database: String,
    pub name: String,
    #[serde(default)]
    pub cluster: Option<String>,
    #[serde(default)]
    pub comment: String,
    /// The SELECT the view wraps, passed through verbatim on create.
    pub query: String,
    #[serde(default)]
    pub materialized: bool,
    /// Target table of a materialized view, as `database.table`.
    #[serde(default)]
    pub to_table: Option<String>,
}

impl ViewSpec {
    /// Every table the query reads from must be database-qualified; the
    /// view itself lives in a database and an unqualified name would
    /// silently resolve relative to it.
    pub fn validate(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for target in from_targets(&self.query) {
            if !target.contains('.') {
                diagnostics.push(Diagnostic::error(
                    "invalid value",
                    format!("query table {target} must be in database.table format"),
                ));
            }
        }
        diagnostics
    }
}

/// Snapshot of a view from the store. `as_select` holds the normalized
/// query text, see [`normalize_query`].
#[derive(Debug, Clone, PartialEq)]
pub struct LiveView {
    pub database: String,
    pub name: String,
    pub engine: String,
    pub as_select: String,
    pub comment: String,
}

impl LiveView {
    pub fn to_spec(&self) -> Result<ViewSpec, MasonError> {
        let metadata = CommentMetadata::decode(&self.comment)?;
        Ok(ViewSpec {
            database: self.database.clone(),
            name: self.name.clone(),
            cluster: (!metadata.cluster.is_empty()).then(|| metadata.cluster.clone()),
            comment: metadata.comment,
            query: self.as_select.clone(),
            materialized: self.engine == "MaterializedView",
            to_table: metadata.to_table,
        })
    }
}

/// Canonical form for comparing view text: whitespace collapsed, trailing
/// semicolon dropped, lowercased. The store reformats the stored SELECT,
/// so the raw text never compares equal to what the caller wrote.
pub fn normalize_query(query: &str) -> String {
    let collapsed = query.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.trim_end_matches(';').trim_end().to_lowercase()
}

/// Table names following a FROM keyword. Subqueries contribute their own
/// inner FROM targets rather than a name.
fn from_targets(query: &str) -> Vec<&str> {
    let bytes = query.as_bytes();
    let mut targets = Vec::new();
    let mut i = 0;
    while i + 4 <= bytes.len() {
        if !bytes[i..i + 4].eq_ignore_ascii_case(b"from") {
            i += 1;
            continue;
        }
        let boundary = i == 0 || !(bytes[i - 1].is_ascii_alphanumeric() || bytes[i - 1] == b'_');
        let mut j = i + 4;
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if boundary && j > i + 4 {
            let start = j;
            while j < bytes.len()
                && (bytes[j].is_ascii_alphanumeric() || matches!(bytes[j], b'_' | b'-' | b'.'))
            {
                j += 1;
            }
            if j > start {
                targets.push(&query[start..j]);
                i = j;
                continue;
            }
        }
        i += 4;
    }
    targets
}
