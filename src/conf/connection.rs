use clickhouse::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub database: Option<String>,
    /// Cluster substituted into specs that leave their own cluster unset.
    #[serde(default)]
    pub default_cluster: Option<String>,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8123
}

fn default_user() -> String {
    "default".to_string()
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig {
            host: default_host(),
            port: default_port(),
            user: default_user(),
            password: String::new(),
            secure: false,
            database: None,
            default_cluster: None,
        }
    }
}

impl ConnectionConfig {
    pub fn url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }

    pub fn client(&self) -> Client {
        let mut client = Client::default()
            .with_url(self.url())
            .with_user(self.user.clone())
            .with_password(self.password.clone());
        if let Some(database) = &self.database {
            client = client.with_database(database.clone());
        }
        client
    }
}
