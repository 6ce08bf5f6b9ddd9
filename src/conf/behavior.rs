use serde::{Deserialize, Serialize};

/// Verb used for create statements. The store rejects a plain `CREATE` of
/// an existing object, so deployments that re-run their reconciliation
/// pick one of the tolerant forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateVerb {
    Plain,
    OrReplace,
    IfNotExists,
}

impl CreateVerb {
    /// Statement head for the given object word, e.g. `TABLE` or
    /// `MATERIALIZED VIEW`.
    pub fn prefix(&self, object: &str) -> String {
        match self {
            CreateVerb::Plain => format!("CREATE {object}"),
            CreateVerb::OrReplace => format!("CREATE OR REPLACE {object}"),
            CreateVerb::IfNotExists => format!("CREATE {object} IF NOT EXISTS"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct BehaviorConfig {
    #[serde(default)]
    pub create_or_replace: bool,
    #[serde(default)]
    pub create_if_not_exists: bool,
    /// Trace every statement through the store's formatter before running it.
    #[serde(default)]
    pub debug_statements: bool,
}

impl BehaviorConfig {
    /// Environment-variable flavor of the config, for callers that have no
    /// config file: MASON_CREATE_OR_REPLACE, MASON_CREATE_IF_NOT_EXISTS and
    /// MASON_DEBUG_STATEMENTS, each set to `true` to enable.
    pub fn from_env() -> BehaviorConfig {
        BehaviorConfig {
            create_or_replace: env_flag("MASON_CREATE_OR_REPLACE"),
            create_if_not_exists: env_flag("MASON_CREATE_IF_NOT_EXISTS"),
            debug_statements: env_flag("MASON_DEBUG_STATEMENTS"),
        }
    }

    /// `OrReplace` wins when both tolerant forms are requested.
    pub fn create_verb(&self) -> CreateVerb {
        if self.create_or_replace {
            CreateVerb::OrReplace
        } else if self.create_if_not_exists {
            CreateVerb::IfNotExists
        } else {
            CreateVerb::Plain
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| v == "true")
}
