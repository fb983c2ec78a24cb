//! User model, authentication claims and related request types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::AppError;

text_enum! {
    /// Account role
    Role {
        Reader => "reader",
        Admin => "admin",
    }
}

text_enum! {
    /// Account status. Frozen accounts cannot log in.
    UserStatus {
        Active => "active",
        Frozen => "frozen",
    }
}

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub real_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_frozen(&self) -> bool {
        self.status == UserStatus::Frozen
    }

    /// Forbidden for frozen accounts
    pub fn ensure_active(&self) -> Result<(), AppError> {
        if self.is_frozen() {
            return Err(AppError::Authorization("Account is frozen".to_string()));
        }
        Ok(())
    }
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32, message = "Username must be 3 to 32 characters"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(max = 64, message = "Real name is too long"))]
    pub real_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

impl RegisterRequest {
    /// Trim text fields; blank optional fields become `None`
    pub fn normalized(self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            password: self.password,
            real_name: blank_to_none(self.real_name),
            email: blank_to_none(self.email),
        }
    }
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Update own profile request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfile {
    #[validate(length(max = 64, message = "Real name is too long"))]
    pub real_name: Option<String>,
    /// Empty string clears the email
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 20, message = "Phone number is too long"))]
    pub phone: Option<String>,
}

impl UpdateProfile {
    /// Trim provided fields. A provided but blank email is kept as `Some("")`
    /// so the repository clears it, and is not run through the email check.
    pub fn normalized(self) -> Self {
        Self {
            real_name: self.real_name.map(|s| s.trim().to_string()),
            email: self.email.map(|s| s.trim().to_string()),
            phone: self.phone.map(|s| s.trim().to_string()),
        }
    }

    pub fn validate_fields(&self) -> Result<(), AppError> {
        match self.email.as_deref() {
            Some("") => Self {
                real_name: self.real_name.clone(),
                email: None,
                phone: self.phone.clone(),
            }
            .validate()?,
            _ => self.validate()?,
        }
        Ok(())
    }
}

/// Change password request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePassword {
    #[serde(default)]
    pub old_password: String,
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}

/// Admin user listing query
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct UserQuery {
    /// Substring of username or real name
    pub keyword: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Claims for `user`, valid for `ttl_hours` from now
    pub fn for_user(user: &User, ttl_hours: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user.username.clone(),
            user_id: user.id,
            role: user.role,
            exp: now + (ttl_hours as i64 * 3600),
            iat: now,
        }
    }

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
