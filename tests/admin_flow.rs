mod common;

use std::collections::BTreeSet;

use common::{config_with_default_cluster, mason_over, test_config};
use mason::core::MasonError;
use mason::model::{DatabaseSpec, LiveGrant, LiveRole, LiveUser, LiveView, RoleSpec, UserSpec};
use mason::testutil::{live_table_of, table_spec, ScriptedCatalog, ScriptedRunner};

fn role_spec(name: &str, database: &str, privileges: &[&str]) -> RoleSpec {
    RoleSpec {
        name: name.to_string(),
        database: database.to_string(),
        privileges: privileges.iter().map(|p| p.to_string()).collect::<BTreeSet<_>>(),
    }
}

#[tokio::test]
async fn database_create_carries_cluster_and_comment() {
    let (mason, runner) = mason_over(
        ScriptedCatalog::default(),
        ScriptedRunner::new(),
        &config_with_default_cluster("main"),
    );

    let spec = DatabaseSpec {
        name: "logs".to_string(),
        cluster: None,
        comment: "app telemetry".to_string(),
    };
    let id = mason.databases.create(&spec).await.unwrap();

    assert_eq!(
        runner.executed(),
        vec!["CREATE DATABASE logs ON CLUSTER main COMMENT 'app telemetry'"]
    );
    assert_eq!(id.as_str(), "main:logs");
}

#[tokio::test]
async fn database_delete_refuses_while_objects_remain() {
    let catalog = ScriptedCatalog {
        tables: vec![live_table_of(&table_spec("logs", "events"))],
        views: vec![LiveView {
            database: "logs".to_string(),
            name: "events_mv".to_string(),
            engine: "MaterializedView".to_string(),
            as_select: "select key from logs.events".to_string(),
            comment: String::new(),
        }],
        ..ScriptedCatalog::default()
    };
    let (mason, runner) = mason_over(catalog, ScriptedRunner::new(), &test_config());

    let spec = DatabaseSpec {
        name: "logs".to_string(),
        ..DatabaseSpec::default()
    };
    let err = mason.databases.delete(&spec).await.unwrap_err();

    match err {
        MasonError::ValidationFailed(diagnostics) => {
            assert_eq!(diagnostics.len(), 1);
            assert!(diagnostics[0].detail.contains("events"));
            assert!(diagnostics[0].detail.contains("events_mv"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(runner.executed().is_empty());
}

#[tokio::test]
async fn database_delete_waits_for_every_replica() {
    let (mason, runner) = mason_over(
        ScriptedCatalog::default(),
        ScriptedRunner::new(),
        &test_config(),
    );

    let spec = DatabaseSpec {
        name: "stale".to_string(),
        cluster: Some("main".to_string()),
        ..DatabaseSpec::default()
    };
    mason.databases.delete(&spec).await.unwrap();

    assert_eq!(runner.executed(), vec!["DROP DATABASE stale ON CLUSTER main SYNC"]);
}

#[tokio::test]
async fn role_create_grants_each_privilege_separately() {
    let (mason, runner) = mason_over(
        ScriptedCatalog::default(),
        ScriptedRunner::new(),
        &test_config(),
    );

    let id = mason
        .roles
        .create(&role_spec("reader", "logs", &["SELECT", "INSERT"]))
        .await
        .unwrap();

    assert_eq!(
        runner.executed(),
        vec![
            "CREATE ROLE reader",
            "GRANT INSERT ON logs.* TO reader",
            "GRANT SELECT ON logs.* TO reader",
        ]
    );
    assert_eq!(id.as_str(), "reader");
}

#[tokio::test]
async fn a_failing_grant_rolls_the_role_back() {
    let (mason, runner) = mason_over(
        ScriptedCatalog::default(),
        ScriptedRunner::failing_on("GRANT"),
        &test_config(),
    );

    let err = mason
        .roles
        .create(&role_spec("reader", "logs", &["SELECT"]))
        .await
        .unwrap_err();

    match err {
        MasonError::ExecutionFailed { operation, .. } => {
            assert_eq!(operation, "granting privileges to role reader");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(runner.executed(), vec!["CREATE ROLE reader", "DROP ROLE reader"]);
}

#[tokio::test]
async fn role_read_reconstructs_the_spec() {
    let catalog = ScriptedCatalog {
        roles: vec![LiveRole {
            name: "reader".to_string(),
            grants: vec![
                LiveGrant {
                    access_type: "SELECT".to_string(),
                    database: "logs".to_string(),
                },
                LiveGrant {
                    access_type: "INSERT".to_string(),
                    database: "logs".to_string(),
                },
            ],
        }],
        ..ScriptedCatalog::default()
    };
    let (mason, _runner) = mason_over(catalog, ScriptedRunner::new(), &test_config());

    let read = mason.roles.read("reader").await.unwrap().unwrap();
    assert_eq!(read, role_spec("reader", "logs", &["SELECT", "INSERT"]));
}

#[tokio::test]
async fn role_update_renames_and_settles_privileges() {
    let catalog = ScriptedCatalog {
        roles: vec![LiveRole {
            name: "reader".to_string(),
            grants: vec![LiveGrant {
                access_type: "SELECT".to_string(),
                database: "logs".to_string(),
            }],
        }],
        ..ScriptedCatalog::default()
    };
    let (mason, runner) = mason_over(catalog, ScriptedRunner::new(), &test_config());

    mason
        .roles
        .update(&role_spec("log_reader", "logs", &["SELECT", "INSERT"]), "reader")
        .await
        .unwrap();

    assert_eq!(
        runner.executed(),
        vec![
            "ALTER ROLE reader RENAME TO log_reader",
            "GRANT INSERT ON logs.* TO log_reader",
        ]
    );
}

#[tokio::test]
async fn role_update_of_an_absent_role_is_not_found() {
    let (mason, runner) = mason_over(
        ScriptedCatalog::default(),
        ScriptedRunner::new(),
        &test_config(),
    );

    let err = mason
        .roles
        .update(&role_spec("ghost", "logs", &[]), "ghost")
        .await
        .unwrap_err();

    assert!(matches!(err, MasonError::NotFound(_)));
    assert_eq!(err.to_string(), "role ghost not found");
    assert!(runner.executed().is_empty());
}

#[tokio::test]
async fn user_create_grants_roles_and_pins_defaults() {
    let (mason, runner) = mason_over(
        ScriptedCatalog::default(),
        ScriptedRunner::new(),
        &test_config(),
    );

    let spec = UserSpec {
        name: "svc_ingest".to_string(),
        password: "hunter2".to_string(),
        roles: ["writer", "reader"].iter().map(|r| r.to_string()).collect(),
    };
    mason.users.create(&spec).await.unwrap();

    assert_eq!(
        runner.executed(),
        vec![
            "CREATE USER svc_ingest IDENTIFIED WITH sha256_password BY 'hunter2'",
            "GRANT reader TO svc_ingest",
            "GRANT writer TO svc_ingest",
            "SET DEFAULT ROLE ALL TO svc_ingest",
        ]
    );
}

#[tokio::test]
async fn user_update_settles_roles_and_repins_defaults() {
    let catalog = ScriptedCatalog {
        users: vec![LiveUser {
            name: "svc".to_string(),
            default_roles: vec!["reader".to_string(), "writer".to_string()],
        }],
        ..ScriptedCatalog::default()
    };
    let (mason, runner) = mason_over(catalog, ScriptedRunner::new(), &test_config());

    let spec = UserSpec {
        name: "svc".to_string(),
        password: String::new(),
        roles: ["reader", "auditor"].iter().map(|r| r.to_string()).collect(),
    };
    mason.users.update(&spec, "svc", false).await.unwrap();

    assert_eq!(
        runner.executed(),
        vec![
            "GRANT auditor TO svc",
            "REVOKE writer FROM svc",
            "SET DEFAULT ROLE ALL TO svc",
        ]
    );
}

#[tokio::test]
async fn user_delete_drops_the_user() {
    let (mason, runner) = mason_over(
        ScriptedCatalog::default(),
        ScriptedRunner::new(),
        &test_config(),
    );

    mason.users.delete("svc").await.unwrap();
    assert_eq!(runner.executed(), vec!["DROP USER svc"]);
}
