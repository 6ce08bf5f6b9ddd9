use std::sync::Arc;

use async_trait::async_trait;
use clickhouse::{Client, Row};
use log::{debug, warn};
use serde::Deserialize;

use crate::core::MasonError;
use crate::plan::Statement;

/// Store-side execution seam. `execute` runs one mutating statement,
/// `format` round-trips SQL through the store's own formatter without
/// running it.
#[async_trait]
pub trait Runner: Send + Sync {
    async fn execute(&self, sql: &str) -> Result<(), MasonError>;

    async fn format(&self, sql: &str) -> Result<String, MasonError>;
}

pub struct ClickhouseRunner {
    client: Client,
}

#[derive(Row, Deserialize)]
struct FormattedRow {
    formatted: String,
}

impl ClickhouseRunner {
    pub fn new(client: Client) -> ClickhouseRunner {
        ClickhouseRunner { client }
    }
}

#[async_trait]
impl Runner for ClickhouseRunner {
    async fn execute(&self, sql: &str) -> Result<(), MasonError> {
        self.client.query(sql).execute().await?;
        Ok(())
    }

    async fn format(&self, sql: &str) -> Result<String, MasonError> {
        let row = self
            .client
            .query("SELECT formatQuery(?) AS formatted")
            .bind(sql)
            .fetch_one::<FormattedRow>()
            .await?;
        Ok(row.formatted)
    }
}

/// Applies planned statements strictly in order, stopping at the first
/// failure. DDL is not transactional, so the error names the failing
/// operation and carries the prefix that did get applied.
#[derive(Clone)]
pub struct Executor {
    runner: Arc<dyn Runner>,
    debug_statements: bool,
}

impl Executor {
    pub fn new(runner: Arc<dyn Runner>, debug_statements: bool) -> Executor {
        Executor {
            runner,
            debug_statements,
        }
    }

    pub async fn apply(&self, statements: Vec<Statement>) -> Result<(), MasonError> {
        let mut applied: Vec<Statement> = Vec::with_capacity(statements.len());
        for statement in statements {
            if self.debug_statements {
                self.trace(&statement).await;
            }
            if let Err(err) = self.runner.execute(&statement.sql).await {
                let message = match err {
                    MasonError::ClientError(message) => message,
                    other => other.to_string(),
                };
                return Err(MasonError::ExecutionFailed {
                    operation: statement.operation,
                    message,
                    applied,
                });
            }
            debug!("applied: {}", statement.operation);
            applied.push(statement);
        }
        Ok(())
    }

    /// Best-effort trace through the store formatter. A formatter failure
    /// must never abort the run, the raw SQL is logged instead.
    async fn trace(&self, statement: &Statement) {
        match self.runner.format(&statement.sql).await {
            Ok(formatted) => debug!("{}: {formatted}", statement.operation),
            Err(err) => {
                warn!("statement formatter unavailable: {err}");
                debug!("{}: {}", statement.operation, statement.sql);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct RecordingRunner {
        executed: Mutex<Vec<String>>,
        fail_on: Option<String>,
        format_available: bool,
        formatted: Mutex<Vec<String>>,
    }

    impl RecordingRunner {
        fn new() -> RecordingRunner {
            RecordingRunner {
                executed: Mutex::new(Vec::new()),
                fail_on: None,
                format_available: true,
                formatted: Mutex::new(Vec::new()),
            }
        }

        fn failing_on(fragment: &str) -> RecordingRunner {
            RecordingRunner {
                fail_on: Some(fragment.to_string()),
                ..RecordingRunner::new()
            }
        }
    }

    #[async_trait]
    impl Runner for RecordingRunner {
        async fn execute(&self, sql: &str) -> Result<(), MasonError> {
            if let Some(fragment) = &self.fail_on {
                if sql.contains(fragment.as_str()) {
                    return Err(MasonError::ClientError("boom".to_string()));
                }
            }
            self.executed.lock().unwrap().push(sql.to_string());
            Ok(())
        }

        async fn format(&self, sql: &str) -> Result<String, MasonError> {
            if !self.format_available {
                return Err(MasonError::ClientError("no formatter".to_string()));
            }
            self.formatted.lock().unwrap().push(sql.to_string());
            Ok(format!("FORMATTED {sql}"))
        }
    }

    fn statements() -> Vec<Statement> {
        vec![
            Statement::new("step one", "CREATE ROLE a"),
            Statement::new("step two", "GRANT SELECT ON x.* TO a"),
            Statement::new("step three", "DROP ROLE b"),
        ]
    }

    #[tokio::test]
    async fn applies_in_order() {
        let runner = Arc::new(RecordingRunner::new());
        let executor = Executor::new(runner.clone(), false);

        executor.apply(statements()).await.unwrap();
        let executed = runner.executed.lock().unwrap().clone();
        assert_eq!(
            executed,
            vec!["CREATE ROLE a", "GRANT SELECT ON x.* TO a", "DROP ROLE b"]
        );
        assert!(runner.formatted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failure_reports_applied_prefix() {
        let runner = Arc::new(RecordingRunner::failing_on("GRANT"));
        let executor = Executor::new(runner.clone(), false);

        let err = executor.apply(statements()).await.unwrap_err();
        match err {
            MasonError::ExecutionFailed {
                operation,
                message,
                applied,
            } => {
                assert_eq!(operation, "step two");
                assert_eq!(message, "boom");
                assert_eq!(applied.len(), 1);
                assert_eq!(applied[0].sql, "CREATE ROLE a");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // nothing past the failing statement ran
        assert_eq!(runner.executed.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn debug_mode_formats_before_running() {
        let runner = Arc::new(RecordingRunner::new());
        let executor = Executor::new(runner.clone(), true);

        executor.apply(statements()).await.unwrap();
        assert_eq!(runner.formatted.lock().unwrap().len(), 3);
        assert_eq!(runner.executed.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn formatter_outage_does_not_abort() {
        let runner = Arc::new(RecordingRunner {
            format_available: false,
            ..RecordingRunner::new()
        });
        let executor = Executor::new(runner.clone(), true);

        executor.apply(statements()).await.unwrap();
        assert_eq!(runner.executed.lock().unwrap().len(), 3);
    }
}
