use crate::model::{LiveUser, UserSpec};
use crate::plan::{escape_literal, Statement};

pub fn create_user(spec: &UserSpec) -> Statement {
    Statement::new(
        format!("creating user {}", spec.name),
        format!(
            "CREATE USER {} IDENTIFIED WITH sha256_password BY '{}'",
            spec.name,
            escape_literal(&spec.password)
        ),
    )
}

pub fn drop_user(name: &str) -> Statement {
    Statement::new(format!("dropping user {name}"), format!("DROP USER {name}"))
}

pub fn rename_user(from: &str, to: &str) -> Statement {
    Statement::new(
        format!("renaming user {from} to {to}"),
        format!("ALTER USER {from} RENAME TO {to}"),
    )
}

pub fn alter_password(name: &str, password: &str) -> Statement {
    Statement::new(
        format!("changing password of user {name}"),
        format!(
            "ALTER USER {name} IDENTIFIED WITH sha256_password BY '{}'",
            escape_literal(password)
        ),
    )
}

pub fn grant_role(user: &str, role: &str) -> Statement {
    Statement::new(
        format!("granting role {role} to user {user}"),
        format!("GRANT {role} TO {user}"),
    )
}

pub fn revoke_role(user: &str, role: &str) -> Statement {
    Statement::new(
        format!("revoking role {role} from user {user}"),
        format!("REVOKE {role} FROM {user}"),
    )
}

/// Every granted role doubles as a default role, so the default set is
/// re-pinned to ALL whenever the granted set changes.
pub fn set_default_roles(user: &str) -> Statement {
    Statement::new(
        format!("setting default roles of user {user}"),
        format!("SET DEFAULT ROLE ALL TO {user}"),
    )
}

/// Statements creating a user with its roles granted and made default.
pub fn create_user_sequence(spec: &UserSpec) -> Vec<Statement> {
    let mut statements = vec![create_user(spec)];
    for role in &spec.roles {
        statements.push(grant_role(&spec.name, role));
    }
    if !spec.roles.is_empty() {
        statements.push(set_default_roles(&spec.name));
    }
    statements
}

/// Reconcile a live user towards `spec`. The password hash cannot be read
/// back, so the caller reports whether it changed.
pub fn update_user(spec: &UserSpec, live: &LiveUser, password_changed: bool) -> Vec<Statement> {
    let mut statements = Vec::new();

    if live.name != spec.name {
        statements.push(rename_user(&live.name, &spec.name));
    }
    if password_changed {
        statements.push(alter_password(&spec.name, &spec.password));
    }

    let live_roles = live.to_spec().roles;
    let to_grant: Vec<&String> = spec.roles.difference(&live_roles).collect();
    let to_revoke: Vec<&String> = live_roles.difference(&spec.roles).collect();
    for role in &to_grant {
        statements.push(grant_role(&spec.name, role));
    }
    for role in &to_revoke {
        statements.push(revoke_role(&spec.name, role));
    }
    if !to_grant.is_empty() || !to_revoke.is_empty() {
        statements.push(set_default_roles(&spec.name));
    }

    statements
}
