//! Node configuration.

use std::path::PathBuf;

use ac_02_identity_gate::IdentityConfig;
use ac_03_academy_records::{RecordCodec, ServiceConfig};
use thiserror::Error;
use tracing::{info, warn};

/// Host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Directory holding `records.db` and the `LOCK` file.
    pub data_dir: PathBuf,
    pub service: ServiceConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./academy-data"),
            service: ServiceConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("academy and student organisations must differ (both are {0})")]
    SameOrganization(String),

    #[error("ACADEMY_CODEC: {0}")]
    InvalidCodec(String),
}

impl NodeConfig {
    /// Store file inside the data directory.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("records.db")
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each
    /// `ACADEMY_*` key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = NodeConfig::default();

        if let Some(path) = lookup("ACADEMY_DATA_PATH") {
            config.data_dir = PathBuf::from(path);
        }
        if let Some(codec) = lookup("ACADEMY_CODEC") {
            config.service.codec = codec.parse::<RecordCodec>().map_err(ConfigError::InvalidCodec)?;
        }

        let identity: &mut IdentityConfig = &mut config.service.identity;
        if let Some(org) = lookup("ACADEMY_ORG") {
            identity.academy_org = org;
        }
        if let Some(org) = lookup("ACADEMY_STUDENT_ORG") {
            identity.student_org = org;
        }
        if let Some(attr) = lookup("ACADEMY_IDENTITY_ATTR") {
            identity.identity_attribute = attr;
        }

        Ok(config)
    }

    /// Reject configurations the gate cannot enforce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let identity = &self.service.identity;
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Empty("ACADEMY_DATA_PATH"));
        }
        if identity.academy_org.is_empty() {
            return Err(ConfigError::Empty("ACADEMY_ORG"));
        }
        if identity.student_org.is_empty() {
            return Err(ConfigError::Empty("ACADEMY_STUDENT_ORG"));
        }
        if identity.identity_attribute.is_empty() {
            return Err(ConfigError::Empty("ACADEMY_IDENTITY_ATTR"));
        }
        if identity.academy_org == identity.student_org {
            warn!("Academy and student organisations are both {}", identity.academy_org);
            return Err(ConfigError::SameOrganization(identity.academy_org.clone()));
        }
        info!(
            "Config OK: data={} codec={:?} orgs={}/{}",
            self.data_dir.display(),
            self.service.codec,
            identity.academy_org,
            identity.student_org
        );
        Ok(())
    }
}
