//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        user::{ChangePassword, RegisterRequest, UpdateProfile, User, UserClaims, UserStatus},
        Page,
    },
    repository::Repository,
};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new reader account
    pub async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        let request = request.normalized();
        request.validate()?;

        if self.repository.users.username_exists(&request.username).await? {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        let hash = hash_password(&request.password)?;
        let user = self
            .repository
            .users
            .create(
                &request.username,
                &hash,
                request.real_name.as_deref(),
                request.email.as_deref(),
            )
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Authenticate by username and password. Returns the JWT and the user.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Username and password are required".to_string(),
            ));
        }

        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&user.password, password)? {
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        user.ensure_active()?;

        let token = UserClaims::for_user(&user, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        tracing::info!(user_id = user.id, "User logged in");
        Ok((token, user))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn update_profile(&self, id: i32, profile: UpdateProfile) -> AppResult<User> {
        let profile = profile.normalized();
        profile.validate_fields()?;
        self.repository.users.update_profile(id, &profile).await
    }

    pub async fn change_password(&self, id: i32, request: ChangePassword) -> AppResult<()> {
        request.validate()?;

        let user = self.repository.users.get_by_id(id).await?;
        if !verify_password(&user.password, &request.old_password)? {
            return Err(AppError::Validation("Old password is incorrect".to_string()));
        }

        let hash = hash_password(&request.new_password)?;
        self.repository.users.update_password(id, &hash).await?;

        tracing::info!(user_id = id, "Password changed");
        Ok(())
    }

    /// Admin search over usernames and real names
    pub async fn search(&self, keyword: Option<&str>, page: Page) -> AppResult<(Vec<User>, i64)> {
        self.repository.users.search(keyword, page).await
    }

    /// Freeze or unfreeze an account. Admins cannot freeze themselves.
    pub async fn set_status(&self, actor_id: i32, target_id: i32, status: UserStatus) -> AppResult<User> {
        if actor_id == target_id && status == UserStatus::Frozen {
            return Err(AppError::Conflict("You cannot freeze your own account".to_string()));
        }

        let user = self.repository.users.set_status(target_id, status).await?;
        tracing::info!(actor_id, target_id, status = %status, "User status changed");
        Ok(user)
    }

    pub async fn export(&self) -> AppResult<Vec<User>> {
        self.repository.users.list_all().await
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check `password` against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("123456").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "123456").unwrap());
        assert!(!verify_password(&hash, "654321").unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        assert_ne!(hash_password("secret").unwrap(), hash_password("secret").unwrap());
    }

    #[test]
    fn test_garbage_hash_is_internal_error() {
        assert!(matches!(
            verify_password("plaintext", "plaintext"),
            Err(AppError::Internal(_))
        ));
    }
}
