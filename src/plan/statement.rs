use std::fmt;

/// One mutating statement, tagged with a description of the operation it
/// performs. The tag travels into execution errors so a failure names the
/// step, not just the SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub operation: String,
    pub sql: String,
}

impl Statement {
    pub fn new(operation: impl Into<String>, sql: impl Into<String>) -> Statement {
        Statement {
            operation: operation.into(),
            sql: sql.into(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
