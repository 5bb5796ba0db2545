//! Renter model, roles and JWT claims

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// Renter role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Internal row structure for database queries (role stored as text)
#[derive(Debug, Clone, FromRow)]
pub struct RenterRow {
    id: i64,
    handle: String,
    credential_hash: String,
    role: String,
}

/// Renter account
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Renter {
    pub id: i64,
    pub handle: String,
    /// Argon2 PHC string, never serialized
    #[serde(skip_serializing)]
    pub credential_hash: String,
    pub role: Role,
}

impl TryFrom<RenterRow> for Renter {
    type Error = AppError;

    fn try_from(row: RenterRow) -> Result<Self, Self::Error> {
        let role = row.role.parse().map_err(AppError::Internal)?;
        Ok(Renter {
            id: row.id,
            handle: row.handle,
            credential_hash: row.credential_hash,
            role,
        })
    }
}

/// New renter handed to the store (credential already hashed)
#[derive(Debug, Clone)]
pub struct NewRenter {
    pub handle: String,
    pub credential_hash: String,
    pub role: Role,
}

/// Register / login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct Credentials {
    #[serde(default)]
    #[validate(length(min = 3, max = 64, message = "Username must be 3 to 64 characters"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
}

/// JWT Claims for authenticated renters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenterClaims {
    pub sub: String,
    pub renter_id: i64,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl RenterClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }
}
