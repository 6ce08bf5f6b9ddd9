use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct DatabaseSpec {
    pub name: String,
    #[serde(default)]
    pub cluster: Option<String>,
    /// Stored verbatim; databases carry no encoded metadata.
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveDatabase {
    pub name: String,
    pub engine: String,
    pub data_path: String,
    pub metadata_path: String,
    pub uuid: String,
    pub comment: String,
}

impl LiveDatabase {
    /// The store does not record which cluster a database was created on,
    /// so the converted spec leaves the cluster unset.
    pub fn to_spec(&self) -> DatabaseSpec {
        DatabaseSpec {
            name: self.name.clone(),
            cluster: None,
            comment: self.comment.clone(),
        }
    }
}
