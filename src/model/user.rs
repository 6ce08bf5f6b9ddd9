use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct UserSpec {
    pub name: String,
    /// Hashed server-side; never read back.
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveUser {
    pub name: String,
    /// Roles the user falls back to on login, which after reconciliation
    /// is every granted role.
    pub default_roles: Vec<String>,
}

impl LiveUser {
    /// The password cannot be introspected, so the converted spec carries
    /// an empty one.
    pub fn to_spec(&self) -> UserSpec {
        UserSpec {
            name: self.name.clone(),
            password: String::new(),
            roles: self.default_roles.iter().cloned().collect(),
        }
    }
}
