use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Desired shape of a role: a set of privileges scoped to one database,
/// with `*` standing for all of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct RoleSpec {
    pub name: String,
    pub database: String,
    #[serde(default)]
    pub privileges: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveRole {
    pub name: String,
    pub grants: Vec<LiveGrant>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveGrant {
    pub access_type: String,
    /// `*` when the grant is not scoped to one database.
    pub database: String,
}

impl LiveRole {
    pub fn privileges(&self) -> BTreeSet<String> {
        self.grants.iter().map(|g| g.access_type.clone()).collect()
    }

    /// All grants of a role share one database scope, so the first grant
    /// determines it. A role with no grants scopes to `*`.
    pub fn database(&self) -> String {
        self.grants
            .first()
            .map(|g| g.database.clone())
            .unwrap_or_else(|| "*".to_string())
    }

    pub fn to_spec(&self) -> RoleSpec {
        RoleSpec {
            name: self.name.clone(),
            database: self.database(),
            privileges: self.privileges(),
        }
    }
}
