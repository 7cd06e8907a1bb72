// Postgres persistence for user accounts and password-reset OTPs.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StoreError};

pub struct AccountStore {
    pool: PgPool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub password_salt: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// A password-reset token. The OTP itself is never stored; only its
/// digest.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ResetToken {
    pub id: Uuid,
    pub otp_hash: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
}

impl ResetToken {
    /// A token redeems a reset exactly once, and only before its expiry.
    pub fn usable_at(&self, now: DateTime<Utc>) -> bool {
        !self.used && self.expires_at > now
    }
}

impl AccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new user. Email uniqueness is case-insensitive;
    /// collisions surface as `EmailTaken`.
    pub async fn create_user(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
        password_salt: &str,
    ) -> Result<User> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, password_hash, password_salt)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(password_salt)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::EmailTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn set_password(
        &self,
        user_id: Uuid,
        password_hash: &str,
        password_salt: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users SET password_hash = $2, password_salt = $3
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(password_hash)
        .bind(password_salt)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Store a new reset-token digest with its expiry. Any earlier tokens
    /// for the user are invalidated; only the latest code works.
    pub async fn create_reset_token(
        &self,
        user_id: Uuid,
        otp_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE password_reset_tokens SET used = TRUE WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO password_reset_tokens (id, user_id, otp_hash, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(otp_hash)
        .bind(expires_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// All reset tokens for a user, newest first. The caller decides
    /// usability via [`ResetToken::usable_at`], compares digests in
    /// constant time, and consumes the match.
    pub async fn reset_tokens(&self, user_id: Uuid) -> Result<Vec<ResetToken>> {
        let tokens = sqlx::query_as::<_, ResetToken>(
            r#"
            SELECT id, otp_hash, expires_at, used FROM password_reset_tokens
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tokens)
    }

    /// Consume a token. Tokens are single use.
    pub async fn mark_token_used(&self, token_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE password_reset_tokens SET used = TRUE WHERE id = $1")
            .bind(token_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
