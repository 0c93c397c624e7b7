//! Client configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! [credentials]
//! access_key = "..."
//! secret_key = "..."
//!
//! [hosts]
//! rs = "http://rs.qiniu.com"
//! zone = "z0"
//!
//! [download]
//! expires_secs = 3600
//! ```

use crate::error::{ClientError, Result};
use kodo_auth::{Credential, DEFAULT_DOWNLOAD_EXPIRY_SECS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Root client configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Access/secret key pair
    pub credentials: CredentialsConfig,
    /// Service endpoints
    pub hosts: HostsConfig,
    /// Download URL signing
    pub download: DownloadConfig,
}

impl Config {
    /// Parse a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file, falling back to defaults when it does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Build the credential, failing if either key is missing
    pub fn credential(&self) -> Result<Credential> {
        Credential::new(
            self.credentials.access_key.as_str(),
            self.credentials.secret_key.as_str(),
        )
        .map_err(ClientError::from)
    }
}

/// Access/secret key pair as written in the config file
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub access_key: String,
    pub secret_key: String,
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Service endpoints
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HostsConfig {
    /// Resource management (`rs`) endpoint, used for single and batch operations
    pub rs: String,
    /// Endpoint serving the bucket listing
    pub buckets: String,
    /// Persistent processing endpoint
    pub api: String,
    /// Region for the async fetch API (`api-<zone>.qiniu.com`)
    pub zone: String,
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self {
            rs: "http://rs.qiniu.com".to_string(),
            buckets: "http://rs.qbox.me".to_string(),
            api: "http://api.qiniu.com".to_string(),
            zone: "z0".to_string(),
        }
    }
}

/// Download URL signing
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Validity window of signed download URLs
    pub expires_secs: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            expires_secs: DEFAULT_DOWNLOAD_EXPIRY_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.hosts.rs, "http://rs.qiniu.com");
        assert_eq!(config.hosts.zone, "z0");
        assert_eq!(config.download.expires_secs, 3600);
        assert!(config.credential().is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml_str(
            r#"
            [credentials]
            access_key = "ak"
            secret_key = "sk"

            [hosts]
            zone = "z2"
            "#,
        )
        .unwrap();
        assert_eq!(config.hosts.zone, "z2");
        assert_eq!(config.hosts.api, "http://api.qiniu.com");
        assert_eq!(config.credential().unwrap().access_key(), "ak");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_toml_str("hosts = 5"),
            Err(ClientError::Config(_))
        ));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[download]\nexpires_secs = 60").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.download.expires_secs, 60);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.download.expires_secs, DEFAULT_DOWNLOAD_EXPIRY_SECS);
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = Config::from_toml_str("[credentials]\nsecret_key = \"hunter2\"").unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
