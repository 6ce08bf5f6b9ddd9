use std::collections::BTreeMap;

use clickhouse::Row;
use serde::{Deserialize, Serialize};

use crate::core::{Diagnostic, MasonError};
use crate::descriptor;
use crate::meta::CommentMetadata;

/// Desired shape of a table. This is the document a caller hands in; the
/// live side of the comparison is [`LiveTable`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct TableSpec {
    pub database: String,
    pub name: String,
    /// `None` picks up the connection's default cluster.
    #[serde(default)]
    pub cluster: Option<String>,
    #[serde(default)]
    pub comment: String,
    pub engine: String,
    #[serde(default)]
    pub engine_params: Vec<String>,
    #[serde(default)]
    pub order_by: Vec<String>,
    #[serde(default)]
    pub primary_key: Vec<String>,
    #[serde(default)]
    pub partition_by: Vec<PartitionBy>,
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub indexes: Vec<IndexSpec>,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
    /// TTL rules as expression -> action, e.g. `ts + INTERVAL 3 DAY` -> `DELETE`.
    #[serde(default)]
    pub ttl: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ColumnSpec {
    pub name: String,
    pub r#type: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub default_kind: String,
    #[serde(default)]
    pub default_expression: String,
    #[serde(default)]
    pub compression_codec: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct IndexSpec {
    pub name: String,
    pub expression: String,
    pub r#type: String,
    #[serde(default)]
    pub granularity: u64,
}

/// One partitioning term: the bare column, optionally wrapped in a
/// function, optionally reduced by a modulus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct PartitionBy {
    pub column: String,
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default)]
    pub modulus: Option<u64>,
}

impl TableSpec {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Check that every column referenced by the ordering key and the
    /// partitioning terms is declared. All findings are collected; nothing
    /// short-circuits.
    pub fn validate(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for field in &self.order_by {
            for reference in column_references(field) {
                if !self.has_column(reference) {
                    diagnostics.push(Diagnostic::error(
                        "wrong value",
                        format!("order by field '{reference}' is not a column of the table"),
                    ));
                }
            }
        }
        for partition in &self.partition_by {
            if !self.has_column(&partition.column) {
                diagnostics.push(Diagnostic::error(
                    "wrong value",
                    format!(
                        "partition by field '{}' is not a column of the table",
                        partition.column
                    ),
                ));
            }
        }
        diagnostics
    }
}

/// Caller-reported change set for a table update. The planner only emits
/// statements for the parts marked changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableDelta {
    pub comment_changed: bool,
    pub columns: Option<ColumnsDelta>,
    pub ttl_changed: bool,
}

/// Previous and desired column lists, both in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnsDelta {
    pub previous: Vec<ColumnSpec>,
    pub desired: Vec<ColumnSpec>,
}

/// Snapshot of a table as introspected from the store's system tables.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveTable {
    pub database: String,
    pub name: String,
    pub engine: String,
    /// Full engine descriptor, ordering key and TTL text included.
    pub engine_full: String,
    /// Raw comment slot, still carrying the encoded metadata.
    pub comment: String,
    pub columns: Vec<LiveColumn>,
    pub indexes: Vec<LiveIndex>,
}

#[derive(Debug, Clone, PartialEq, Row, Deserialize)]
pub struct LiveColumn {
    pub name: String,
    pub r#type: String,
    pub comment: String,
    pub default_kind: String,
    pub default_expression: String,
    pub compression_codec: String,
}

#[derive(Debug, Clone, PartialEq, Row, Deserialize)]
pub struct LiveIndex {
    pub name: String,
    pub expr: String,
    pub r#type: String,
    pub granularity: u64,
}

impl LiveTable {
    /// Convert the snapshot into the spec shape callers compare against.
    /// Decodes the side-channel metadata out of the comment slot and parses
    /// the structured parts of the engine descriptor. Parts the store does
    /// not report structurally (primary key, partitioning, settings, TTL
    /// rules) come back empty; the raw descriptor keeps the full text.
    pub fn to_spec(&self) -> Result<TableSpec, MasonError> {
        let metadata = CommentMetadata::decode(&self.comment)?;
        Ok(TableSpec {
            database: self.database.clone(),
            name: self.name.clone(),
            cluster: (!metadata.cluster.is_empty()).then(|| metadata.cluster.clone()),
            comment: metadata.comment,
            engine: self.engine.clone(),
            engine_params: descriptor::engine_params(&self.engine_full),
            order_by: descriptor::order_by(&self.engine_full),
            primary_key: Vec::new(),
            partition_by: Vec::new(),
            columns: self.columns.iter().map(LiveColumn::to_spec).collect(),
            indexes: self.indexes.iter().map(LiveIndex::to_spec).collect(),
            settings: BTreeMap::new(),
            ttl: BTreeMap::new(),
        })
    }
}

impl LiveColumn {
    pub fn to_spec(&self) -> ColumnSpec {
        ColumnSpec {
            name: self.name.clone(),
            r#type: self.r#type.clone(),
            comment: self.comment.clone(),
            default_kind: self.default_kind.clone(),
            default_expression: self.default_expression.clone(),
            compression_codec: self.compression_codec.clone(),
        }
    }
}

impl LiveIndex {
    pub fn to_spec(&self) -> IndexSpec {
        IndexSpec {
            name: self.name.clone(),
            expression: self.expr.clone(),
            r#type: self.r#type.clone(),
            granularity: self.granularity,
        }
    }
}

/// Identifiers an expression reads from, skipping function names (an
/// identifier directly followed by an open paren) and string literals.
fn column_references(expression: &str) -> Vec<&str> {
    let bytes = expression.as_bytes();
    let mut references = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i] as char;
        if c == '\'' {
            i += 1;
            while i < bytes.len() && bytes[i] != b'\'' {
                i += 1;
            }
            i += 1;
        } else if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            let mut next = i;
            while next < bytes.len() && bytes[next].is_ascii_whitespace() {
                next += 1;
            }
            if next >= bytes.len() || bytes[next] != b'(' {
                references.push(&expression[start..i]);
            }
        } else if c.is_ascii_digit() {
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
        } else {
            i += 1;
        }
    }
    references
}
