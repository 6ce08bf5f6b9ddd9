use std::fmt;

/// Opaque identifier a caller can persist across reconciliations. The
/// format is stable: `cluster:database:name` for tables and views,
/// `cluster:name` for databases, the bare name for roles and users. An
/// empty cluster segment means the object was created without one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn table(cluster: &str, database: &str, name: &str) -> ObjectId {
        ObjectId(format!("{cluster}:{database}:{name}"))
    }

    pub fn database(cluster: &str, name: &str) -> ObjectId {
        ObjectId(format!("{cluster}:{name}"))
    }

    pub fn named(name: &str) -> ObjectId {
        ObjectId(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
