//! Connection parameters for the Neo4j HTTP sink

use crate::error::IngestError;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:7474";
pub const DEFAULT_USER: &str = "neo4j";
pub const DEFAULT_DATABASE: &str = "neo4j";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const BOLT_SCHEMES: [&str; 2] = ["bolt", "neo4j"];

/// Where and how to reach the store
#[derive(Clone)]
pub struct ConnectionConfig {
    /// `http://host:port`, `https://host:port` or bare `host:port`
    pub endpoint: String,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Forces `https`
    pub encrypted: bool,
    /// Applies to connecting and to each request
    pub timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user: DEFAULT_USER.to_string(),
            password: String::new(),
            database: DEFAULT_DATABASE.to_string(),
            encrypted: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("endpoint", &self.endpoint)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("encrypted", &self.encrypted)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ConnectionConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = user.into();
        self.password = password.into();
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_encrypted(mut self, encrypted: bool) -> Self {
        self.encrypted = encrypted;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `NEO4J_URI`, `NEO4J_USER`, `NEO4J_PASSWORD`, `NEO4J_DATABASE`,
    /// `NEO4J_ENCRYPTED` and `NEO4J_TIMEOUT_MS`, defaulting what is unset.
    pub fn from_env() -> Result<Self, IngestError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, IngestError> {
        let mut config = Self::default();

        if let Some(endpoint) = lookup("NEO4J_URI") {
            config.endpoint = endpoint;
        }
        if let Some(user) = lookup("NEO4J_USER") {
            config.user = user;
        }
        if let Some(password) = lookup("NEO4J_PASSWORD") {
            config.password = password;
        }
        if let Some(database) = lookup("NEO4J_DATABASE") {
            config.database = database;
        }
        if let Some(raw) = lookup("NEO4J_ENCRYPTED") {
            config.encrypted = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                other => {
                    return Err(IngestError::Config(format!(
                        "NEO4J_ENCRYPTED must be a boolean, got {:?}",
                        other
                    )))
                }
            };
        }
        if let Some(raw) = lookup("NEO4J_TIMEOUT_MS") {
            let millis: u64 = raw.trim().parse().map_err(|_| {
                IngestError::Config(format!("NEO4J_TIMEOUT_MS must be milliseconds, got {:?}", raw))
            })?;
            config.timeout = Duration::from_millis(millis);
        }

        Ok(config)
    }

    /// Resolve the HTTP base URL, honoring `encrypted`
    pub fn base_url(&self) -> Result<String, IngestError> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(IngestError::Config("endpoint is empty".to_string()));
        }

        let secure = if self.encrypted { "https" } else { "http" };
        let (scheme, rest) = match endpoint.split_once("://") {
            None => (secure, endpoint),
            Some((scheme, rest)) => match scheme.to_ascii_lowercase().as_str() {
                "https" => ("https", rest),
                "http" => (secure, rest),
                other => {
                    let base = other.split('+').next().unwrap_or(other);
                    let hint = if BOLT_SCHEMES.contains(&base) {
                        " (Bolt is not supported; use the HTTP endpoint, e.g. http://localhost:7474)"
                    } else {
                        ""
                    };
                    return Err(IngestError::Config(format!(
                        "unsupported endpoint scheme {:?}{}",
                        scheme, hint
                    )));
                }
            },
        };

        let rest = rest.trim_end_matches('/');
        if rest.is_empty() {
            return Err(IngestError::Config(format!("endpoint {:?} has no host", self.endpoint)));
        }

        Ok(format!("{}://{}", scheme, rest))
    }

    /// URL of the auto-commit transaction endpoint for the configured database
    pub fn commit_url(&self) -> Result<String, IngestError> {
        let valid_name = !self.database.is_empty()
            && self
                .database
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_');
        if !valid_name {
            return Err(IngestError::Config(format!(
                "invalid database name {:?}",
                self.database
            )));
        }
        Ok(format!("{}/db/{}/tx/commit", self.base_url()?, self.database))
    }
}
