//! Configuration loading and management
//!
//! Configuration is read from YAML. Every section has defaults, so an empty
//! document (or no file at all) yields a working in-memory server.
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 8080
//! storage:
//!   backend: postgres
//!   database_url: postgres://orders:secret@db/orders
//! labels:
//!   city: municipio
//! fixtures:
//!   activities:
//!     - { id: 1, description: "Site visit" }
//! ```

use crate::core::entity::OpaqueRecord;
use anyhow::{Result, bail};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Environment variable naming the YAML file to load
pub const CONFIG_PATH_ENV: &str = "ORDERAPI_CONFIG";

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub labels: AttributeLabels,
    pub messages: ResponseMessages,
    pub fixtures: Fixtures,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Attach a permissive CORS layer
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors: false,
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding the listener
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    InMemory,
    Postgres,
}

/// Store selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::InMemory,
            database_url: None,
            max_connections: 5,
        }
    }
}

/// Display labels used in validation messages
///
/// Fields without a label are shown with underscores replaced by spaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeLabels(IndexMap<String, String>);

impl Default for AttributeLabels {
    fn default() -> Self {
        Self::from_pairs([
            ("legalization_date", "fecha de legalización"),
            ("address", "dirección"),
            ("city", "ciudad"),
            ("observation_id", "observacion"),
            ("causal_id", "causal"),
        ])
    }
}

impl AttributeLabels {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(field, label)| (field.to_string(), label.to_string()))
                .collect(),
        )
    }

    pub fn label_for<'a>(&'a self, field: &'a str) -> Cow<'a, str> {
        match self.0.get(field) {
            Some(label) => Cow::Borrowed(label.as_str()),
            None => Cow::Owned(field.replace('_', " ")),
        }
    }

    /// Overlay labels from another map
    pub fn merge(&mut self, other: AttributeLabels) {
        self.0.extend(other.0);
    }
}

/// The `message` strings returned by successful mutations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseMessages {
    pub created: String,
    pub updated: String,
    pub deleted: String,
    pub activity_attached: String,
    pub activity_detached: String,
}

impl Default for ResponseMessages {
    fn default() -> Self {
        Self {
            created: "Registro creado exitosamente".to_string(),
            updated: "Registro actualizado exitosamente".to_string(),
            deleted: "Registro eliminado exitosamente".to_string(),
            activity_attached: "Actividad agregada exitosamente".to_string(),
            activity_detached: "Actividad eliminada exitosamente".to_string(),
        }
    }
}

/// Records preloaded into the in-memory store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixtures {
    pub activities: Vec<OpaqueRecord>,
    pub observations: Vec<OpaqueRecord>,
    pub causals: Vec<OpaqueRecord>,
}

impl Fixtures {
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty() && self.observations.is_empty() && self.causals.is_empty()
    }
}

/// Mirror of [`AppConfig`] used while parsing, so partial label maps extend
/// the defaults instead of replacing them
#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    storage: StorageConfig,
    #[serde(default)]
    labels: Option<AttributeLabels>,
    #[serde(default)]
    messages: ResponseMessages,
    #[serde(default)]
    fixtures: Fixtures,
}

impl From<RawConfig> for AppConfig {
    fn from(raw: RawConfig) -> Self {
        let mut labels = AttributeLabels::default();
        if let Some(overrides) = raw.labels {
            labels.merge(overrides);
        }
        Self {
            server: raw.server,
            storage: raw.storage,
            labels,
            messages: raw.messages,
            fixtures: raw.fixtures,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawConfig = serde_yaml::from_str(yaml)?;
        Ok(raw.into())
    }

    /// Load the file named by `ORDERAPI_CONFIG` (or defaults), then apply
    /// environment overrides and validate
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => {
                tracing::info!(path = %path, "loading configuration file");
                Self::from_yaml_file(&path)?
            }
            Err(_) => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `ORDERAPI_HOST`, `ORDERAPI_PORT` and `DATABASE_URL`
    ///
    /// `lookup` resolves a variable name; `load` passes the process
    /// environment.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup("ORDERAPI_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("ORDERAPI_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid ORDERAPI_PORT '{}': {}", port, e))?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.storage.database_url = Some(url);
        }
        Ok(())
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("server.port must be greater than zero");
        }
        if self.storage.backend == StorageBackend::Postgres && self.storage.database_url.is_none()
        {
            bail!("storage.database_url (or DATABASE_URL) is required for the postgres backend");
        }
        Ok(())
    }
}
