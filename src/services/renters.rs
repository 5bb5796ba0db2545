//! Renter registration and authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::{AuthConfig, SeedConfig},
    error::{AppError, AppResult},
    models::{
        renter::{Credentials, NewRenter},
        Renter, RenterClaims, Role,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct RentersService {
    repository: Repository,
    config: AuthConfig,
}

impl RentersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new `user` renter and return a token for it
    pub async fn register(&self, credentials: Credentials) -> AppResult<(String, Renter)> {
        let credentials = Credentials {
            username: credentials.username.trim().to_string(),
            ..credentials
        };
        credentials.validate()?;
        let handle = credentials.username;

        if self.repository.renters_get_by_handle(&handle).await?.is_some() {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        let renter = self
            .repository
            .renters_create(&NewRenter {
                handle,
                credential_hash: self.hash_password(&credentials.password)?,
                role: Role::User,
            })
            .await?;

        tracing::info!("Renter registered: id={} handle={}", renter.id, renter.handle);

        let token = self.create_token_for(&renter)?;
        Ok((token, renter))
    }

    /// Authenticate by handle and password and return a token
    pub async fn authenticate(&self, credentials: &Credentials) -> AppResult<(String, Renter)> {
        let renter = self
            .repository
            .renters_get_by_handle(credentials.username.trim())
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !self.verify_password(&renter, &credentials.password)? {
            return Err(AppError::Authentication("Invalid username or password".to_string()));
        }

        let token = self.create_token_for(&renter)?;
        Ok((token, renter))
    }

    /// Get renter by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Renter> {
        self.repository.renters_get(id).await
    }

    /// Create the configured admin account unless it already exists
    pub async fn seed_admin(&self, seed: &SeedConfig) -> AppResult<Option<Renter>> {
        let Some(ref password) = seed.admin_password else {
            return Ok(None);
        };

        if self.repository.renters_get_by_handle(&seed.admin_handle).await?.is_some() {
            return Ok(None);
        }

        let admin = self
            .repository
            .renters_create(&NewRenter {
                handle: seed.admin_handle.clone(),
                credential_hash: self.hash_password(password)?,
                role: Role::Admin,
            })
            .await?;

        tracing::info!("Admin renter created: {}", admin.handle);
        Ok(Some(admin))
    }

    fn create_token_for(&self, renter: &Renter) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = RenterClaims {
            sub: renter.handle.clone(),
            renter_id: renter.id,
            role: renter.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify renter password
    fn verify_password(&self, renter: &Renter, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&renter.credential_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
