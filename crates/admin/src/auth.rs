//! Admin authentication service.
//!
//! A single shared credential: one argon2 hash held in the `admin`
//! collection's lone document. Logging in with the right password issues a
//! bearer token that lives for the life of the process; there is no lockout
//! or throttling on this panel.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde_json::json;

use cedars_store::{DocumentStore, StoreError, collections};

/// Document field holding the argon2 PHC string.
const PASSWORD_HASH_FIELD: &str = "passwordHash";

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No credential document exists yet.
    #[error("admin credential not configured; run `cedars-cli admin set-password`")]
    NotConfigured,

    /// Password hashing or verification failed structurally.
    #[error("password hash error: {0}")]
    Hash(String),

    /// Credential document could not be read or written.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Admin authentication service.
///
/// Verifies the shared password against the stored hash and tracks the
/// bearer tokens it has issued.
pub struct AdminAuthService {
    store: Arc<dyn DocumentStore>,
    tokens: RwLock<HashSet<String>>,
}

impl AdminAuthService {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            tokens: RwLock::new(HashSet::new()),
        }
    }

    /// Verify the password and issue a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotConfigured`] when no credential document
    /// exists and [`AuthError::InvalidCredentials`] on a wrong password.
    pub async fn login(&self, password: &str) -> Result<String, AuthError> {
        let stored_hash = self.stored_hash().await?;
        verify_password(password, &stored_hash)?;

        let token = uuid::Uuid::new_v4().to_string();
        self.with_tokens(|tokens| {
            tokens.insert(token.clone());
        });
        tracing::info!("admin login succeeded");
        Ok(token)
    }

    /// Revoke a bearer token. Revoking an unknown token is a no-op.
    pub fn logout(&self, token: &str) {
        self.with_tokens(|tokens| {
            tokens.remove(token);
        });
    }

    /// Whether a bearer token is currently valid.
    #[must_use]
    pub fn is_valid(&self, token: &str) -> bool {
        self.tokens
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains(token)
    }

    /// Hash and store a new admin password, creating the credential document
    /// on first use.
    ///
    /// # Errors
    ///
    /// Fails if hashing fails or the store write fails.
    pub async fn set_password(&self, password: &str) -> Result<(), AuthError> {
        let hash = hash_password(password)?;
        let fields = json!({ PASSWORD_HASH_FIELD: hash });

        match self.credential_document().await? {
            Some(id) => {
                self.store
                    .update_document(collections::ADMIN, &id, fields)
                    .await?;
            }
            None => {
                self.store
                    .create_document(collections::ADMIN, fields)
                    .await?;
            }
        }
        tracing::info!("admin password updated");
        Ok(())
    }

    async fn stored_hash(&self) -> Result<String, AuthError> {
        let documents = self.store.list_documents(collections::ADMIN).await?;
        documents
            .first()
            .and_then(|doc| doc.fields.get(PASSWORD_HASH_FIELD))
            .and_then(|value| value.as_str())
            .map(str::to_owned)
            .ok_or(AuthError::NotConfigured)
    }

    async fn credential_document(&self) -> Result<Option<String>, AuthError> {
        let documents = self.store.list_documents(collections::ADMIN).await?;
        Ok(documents.first().map(|doc| doc.id.clone()))
    }

    fn with_tokens(&self, f: impl FnOnce(&mut HashSet<String>)) {
        let mut tokens = self
            .tokens
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut tokens);
    }
}

/// Hash a password with argon2id and a fresh salt.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC-format hash.
fn verify_password(password: &str, stored_hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AuthError::Hash(e.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}
