//! Users repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use super::{keyword, like_pattern};
use crate::{
    error::{AppError, AppResult},
    models::{
        user::{UpdateProfile, User, UserStatus},
        Page,
    },
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Current account status; tokens outlive a freeze
    pub async fn ensure_active(&self, id: i32) -> AppResult<()> {
        self.get_by_id(id).await?.ensure_active()
    }

    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn username_exists(&self, username: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Create a reader account. `password_hash` is already hashed.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        real_name: Option<&str>,
        email: Option<&str>,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password, real_name, email)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(real_name)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    /// Update own profile. A blank email clears it.
    pub async fn update_profile(&self, id: i32, profile: &UpdateProfile) -> AppResult<User> {
        let mut sets = vec!["updated_at = $1".to_string()];
        let mut param_idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, param_idx));
                    param_idx += 1;
                }
            };
        }

        add_field!(profile.real_name, "real_name");
        add_field!(profile.email, "email");
        add_field!(profile.phone, "phone");

        let query = format!(
            "UPDATE users SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            param_idx
        );

        let mut builder = sqlx::query_as::<_, User>(&query).bind(Utc::now());

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    let val: Option<&str> = Some(val.as_str()).filter(|v| !v.is_empty());
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(profile.real_name);
        bind_field!(profile.email);
        bind_field!(profile.phone);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    pub async fn update_password(&self, id: i32, password_hash: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET password = $1, updated_at = NOW() WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn set_status(&self, id: i32, status: UserStatus) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Search users by username or real name, newest first
    pub async fn search(&self, keyword_param: Option<&str>, page: Page) -> AppResult<(Vec<User>, i64)> {
        let pattern = keyword(keyword_param).map(like_pattern);
        let where_clause = if pattern.is_some() {
            "WHERE username ILIKE $1 OR real_name ILIKE $1"
        } else {
            ""
        };

        let count_query = format!("SELECT COUNT(*) FROM users {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(ref p) = pattern {
            count_builder = count_builder.bind(p);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let limit_idx = if pattern.is_some() { 2 } else { 1 };
        let query = format!(
            "SELECT * FROM users {} ORDER BY created_at DESC, id DESC LIMIT ${} OFFSET ${}",
            where_clause,
            limit_idx,
            limit_idx + 1
        );
        let mut builder = sqlx::query_as::<_, User>(&query);
        if let Some(ref p) = pattern {
            builder = builder.bind(p);
        }
        let users = builder
            .bind(page.per_page)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((users, total))
    }

    /// Every user, oldest first
    pub async fn list_all(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }
}
