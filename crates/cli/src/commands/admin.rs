//! Admin credential management command.
//!
//! # Usage
//!
//! ```bash
//! cedars-cli admin set-password --password 'new-password'
//! ```

use std::sync::Arc;

use thiserror::Error;

use cedars_admin::auth::{AdminAuthService, AuthError};
use cedars_store::StoreConfig;

/// Minimum password length accepted from the CLI.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors that can occur during credential management.
#[derive(Debug, Error)]
pub enum AdminCommandError {
    /// Store configuration failed.
    #[error("store configuration error: {0}")]
    Config(#[from] cedars_store::StoreConfigError),

    /// Hashing or storing the credential failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Password too weak.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,
}

/// Hash and store a new shared admin password.
pub async fn set_password(password: &str) -> Result<(), AdminCommandError> {
    dotenvy::dotenv().ok();

    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AdminCommandError::WeakPassword);
    }

    let store = StoreConfig::from_env()?.build()?;
    let auth = AdminAuthService::new(Arc::clone(&store));
    auth.set_password(password).await?;
    tracing::info!("admin password set");
    Ok(())
}
