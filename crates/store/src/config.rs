//! Document store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `STORE_BACKEND` - `memory` or `firestore` (default: memory)
//! - `FIRESTORE_PROJECT_ID` - GCP project id (required for the firestore backend)
//! - `FIRESTORE_DATABASE` - Database id (default: `(default)`)
//! - `FIRESTORE_API_KEY` - Web API key appended to requests (optional; public
//!   read rules need none)
//! - `FIRESTORE_BASE_URL` - API endpoint override for the emulator (optional)
//! - `STORE_POLL_INTERVAL_SECS` - Change-detection polling interval (default: 5)

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use crate::{DocumentStore, FirestoreStore, MemoryStore};

const DEFAULT_DATABASE: &str = "(default)";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum StoreConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Firestore,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "firestore" => Ok(Self::Firestore),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

/// Document store configuration.
#[derive(Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// GCP project id; present whenever `backend` is firestore.
    pub project_id: Option<String>,
    pub database: String,
    pub api_key: Option<SecretString>,
    /// Endpoint override for the Firestore emulator.
    pub base_url: Option<String>,
    pub poll_interval: Duration,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("backend", &self.backend)
            .field("project_id", &self.project_id)
            .field("database", &self.database)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `StoreConfigError` if the backend name is unknown, the
    /// firestore backend is selected without a project id, or the polling
    /// interval does not parse.
    pub fn from_env() -> Result<Self, StoreConfigError> {
        let backend = get_env_or_default("STORE_BACKEND", "memory")
            .parse::<StoreBackend>()
            .map_err(|e| StoreConfigError::InvalidEnvVar("STORE_BACKEND".to_string(), e))?;

        let project_id = match backend {
            StoreBackend::Firestore => Some(get_required_env("FIRESTORE_PROJECT_ID")?),
            StoreBackend::Memory => get_optional_env("FIRESTORE_PROJECT_ID"),
        };

        let poll_interval_secs = get_env_or_default(
            "STORE_POLL_INTERVAL_SECS",
            &DEFAULT_POLL_INTERVAL_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            StoreConfigError::InvalidEnvVar("STORE_POLL_INTERVAL_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            backend,
            project_id,
            database: get_env_or_default("FIRESTORE_DATABASE", DEFAULT_DATABASE),
            api_key: get_optional_env("FIRESTORE_API_KEY").map(SecretString::from),
            base_url: get_optional_env("FIRESTORE_BASE_URL"),
            poll_interval: Duration::from_secs(poll_interval_secs),
        })
    }

    /// Build the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `StoreConfigError::MissingEnvVar` if the firestore backend
    /// was selected without a project id (possible when the config was
    /// constructed by hand).
    pub fn build(&self) -> Result<Arc<dyn DocumentStore>, StoreConfigError> {
        match self.backend {
            StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
            StoreBackend::Firestore => {
                let project_id = self.project_id.as_deref().ok_or_else(|| {
                    StoreConfigError::MissingEnvVar("FIRESTORE_PROJECT_ID".to_string())
                })?;
                let store = self.base_url.as_deref().map_or_else(
                    || {
                        FirestoreStore::new(
                            project_id,
                            &self.database,
                            self.api_key.clone(),
                            self.poll_interval,
                        )
                    },
                    |base_url| {
                        FirestoreStore::with_base_url(
                            base_url,
                            project_id,
                            &self.database,
                            self.api_key.clone(),
                            self.poll_interval,
                        )
                    },
                );
                Ok(Arc::new(store))
            }
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, StoreConfigError> {
    std::env::var(key).map_err(|_| StoreConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parsing() {
        assert_eq!("memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert_eq!(
            " Firestore ".parse::<StoreBackend>().unwrap(),
            StoreBackend::Firestore
        );
        assert!("postgres".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_build_memory_backend() {
        let config = StoreConfig {
            backend: StoreBackend::Memory,
            project_id: None,
            database: DEFAULT_DATABASE.to_string(),
            api_key: None,
            base_url: None,
            poll_interval: Duration::from_secs(5),
        };
        assert!(config.build().is_ok());
    }

    #[test]
    fn test_build_firestore_requires_project_id() {
        let config = StoreConfig {
            backend: StoreBackend::Firestore,
            project_id: None,
            database: DEFAULT_DATABASE.to_string(),
            api_key: None,
            base_url: None,
            poll_interval: Duration::from_secs(5),
        };
        assert!(matches!(
            config.build(),
            Err(StoreConfigError::MissingEnvVar(_))
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = StoreConfig {
            backend: StoreBackend::Firestore,
            project_id: Some("cedars-prod".to_string()),
            database: DEFAULT_DATABASE.to_string(),
            api_key: Some(SecretString::from("AIzaVerySecret")),
            base_url: None,
            poll_interval: Duration::from_secs(5),
        };
        let output = format!("{config:?}");
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("AIzaVerySecret"));
    }
}
