use crate::model::{LiveRole, RoleSpec};
use crate::plan::Statement;

pub fn create_role(name: &str) -> Statement {
    Statement::new(format!("creating role {name}"), format!("CREATE ROLE {name}"))
}

pub fn drop_role(name: &str) -> Statement {
    Statement::new(format!("dropping role {name}"), format!("DROP ROLE {name}"))
}

pub fn rename_role(from: &str, to: &str) -> Statement {
    Statement::new(
        format!("renaming role {from} to {to}"),
        format!("ALTER ROLE {from} RENAME TO {to}"),
    )
}

/// Grants scoped to `system` or to every database go through
/// `CURRENT GRANTS`; the server refuses to hand out more than the granting
/// user holds, which is exactly the ceiling wanted there.
pub fn grant(role: &str, database: &str, privileges: &[String]) -> Statement {
    let operation = format!("granting privileges to role {role}");
    let joined = privileges.join(",");
    let sql = if database == "system" || database == "*" {
        format!("GRANT CURRENT GRANTS ({joined} ON {database}.*) TO {role}")
    } else {
        format!("GRANT {joined} ON {database}.* TO {role}")
    };
    Statement::new(operation, sql)
}

pub fn revoke(role: &str, database: &str, privileges: &[String]) -> Statement {
    Statement::new(
        format!("revoking privileges from role {role}"),
        format!("REVOKE {} ON {database}.* FROM {role}", privileges.join(",")),
    )
}

pub fn revoke_all(role: &str) -> Statement {
    Statement::new(
        format!("revoking all privileges from role {role}"),
        format!("REVOKE ALL ON *.* FROM {role}"),
    )
}

/// Reconcile a live role towards `spec`: rename first, then move the
/// database scope by revoking everything and regranting the carried-over
/// privileges, then settle the privilege set difference.
pub fn update_role(spec: &RoleSpec, live: &LiveRole) -> Vec<Statement> {
    let live_privileges = live.privileges();
    let mut statements = Vec::new();

    if live.name != spec.name {
        statements.push(rename_role(&live.name, &spec.name));
    }

    if live.database() != spec.database {
        statements.push(revoke_all(&spec.name));
        let carried: Vec<String> = live_privileges.iter().cloned().collect();
        if !carried.is_empty() {
            statements.push(grant(&spec.name, &spec.database, &carried));
        }
    }

    let to_grant: Vec<String> = spec
        .privileges
        .difference(&live_privileges)
        .cloned()
        .collect();
    if !to_grant.is_empty() {
        statements.push(grant(&spec.name, &spec.database, &to_grant));
    }

    let to_revoke: Vec<String> = live_privileges
        .difference(&spec.privileges)
        .cloned()
        .collect();
    if !to_revoke.is_empty() {
        statements.push(revoke(&spec.name, &spec.database, &to_revoke));
    }

    statements
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::model::LiveGrant;

    use super::*;

    fn live_role(name: &str, database: &str, privileges: &[&str]) -> LiveRole {
        LiveRole {
            name: name.to_string(),
            grants: privileges
                .iter()
                .map(|p| LiveGrant {
                    access_type: p.to_string(),
                    database: database.to_string(),
                })
                .collect(),
        }
    }

    fn role_spec(name: &str, database: &str, privileges: &[&str]) -> RoleSpec {
        RoleSpec {
            name: name.to_string(),
            database: database.to_string(),
            privileges: privileges.iter().map(|p| p.to_string()).collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn grant_on_database_is_direct() {
        let statement = grant("reader", "logs", &["SELECT".to_string()]);
        assert_eq!(statement.sql, "GRANT SELECT ON logs.* TO reader");
    }

    #[test]
    fn grant_on_all_databases_uses_current_grants() {
        let statement = grant("reader", "*", &["SELECT".to_string(), "INSERT".to_string()]);
        assert_eq!(statement.sql, "GRANT CURRENT GRANTS (SELECT,INSERT ON *.*) TO reader");
    }

    #[test]
    fn grant_on_system_uses_current_grants() {
        let statement = grant("watcher", "system", &["SELECT".to_string()]);
        assert_eq!(statement.sql, "GRANT CURRENT GRANTS (SELECT ON system.*) TO watcher");
    }

    #[test]
    fn update_settles_privilege_difference() {
        let live = live_role("reader", "logs", &["SELECT", "ALTER"]);
        let spec = role_spec("reader", "logs", &["SELECT", "INSERT"]);
        let statements = update_role(&spec, &live);
        let sql: Vec<&str> = statements.iter().map(|s| s.sql.as_str()).collect();
        assert_eq!(
            sql,
            vec![
                "GRANT INSERT ON logs.* TO reader",
                "REVOKE ALTER ON logs.* FROM reader",
            ]
        );
    }

    #[test]
    fn update_renames_before_granting() {
        let live = live_role("reader", "logs", &["SELECT"]);
        let spec = role_spec("log_reader", "logs", &["SELECT"]);
        let statements = update_role(&spec, &live);
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].sql, "ALTER ROLE reader RENAME TO log_reader");
    }

    #[test]
    fn database_move_revokes_everything_then_regrants() {
        let live = live_role("reader", "logs", &["SELECT"]);
        let spec = role_spec("reader", "metrics", &["SELECT"]);
        let statements = update_role(&spec, &live);
        let sql: Vec<&str> = statements.iter().map(|s| s.sql.as_str()).collect();
        assert_eq!(
            sql,
            vec![
                "REVOKE ALL ON *.* FROM reader",
                "GRANT SELECT ON metrics.* TO reader",
            ]
        );
    }

    #[test]
    fn identical_spec_plans_nothing() {
        let live = live_role("reader", "logs", &["SELECT"]);
        let spec = role_spec("reader", "logs", &["SELECT"]);
        assert!(update_role(&spec, &live).is_empty());
    }
}
