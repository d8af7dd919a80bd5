use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub created_at: OffsetDateTime,
}

/// A user's single issued API token. Reused until invalidated; there is no
/// invalidation path in the current API surface.
#[derive(Debug, Clone, FromRow)]
pub struct UserToken {
    pub email: String,
    pub token: String,
    pub issued_at: OffsetDateTime,
}

/// Users and their issued API tokens.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> anyhow::Result<User>;
    async fn find_token(&self, email: &str) -> anyhow::Result<Option<UserToken>>;
    /// Persist a freshly minted token. If a token already exists for the
    /// email (two first logins racing), the stored one wins and is returned.
    async fn save_token(&self, email: &str, token: &str) -> anyhow::Result<UserToken>;
}

pub struct PgIdentityStore {
    db: PgPool,
}

impl PgIdentityStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, name, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_token(&self, email: &str) -> anyhow::Result<Option<UserToken>> {
        let token = sqlx::query_as::<_, UserToken>(
            r#"
            SELECT email, token, issued_at
            FROM user_tokens
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(token)
    }

    async fn save_token(&self, email: &str, token: &str) -> anyhow::Result<UserToken> {
        // The no-op DO UPDATE returns the already stored row, so concurrent
        // first logins settle on whichever token landed first.
        let token = sqlx::query_as::<_, UserToken>(
            r#"
            INSERT INTO user_tokens (email, token)
            VALUES ($1, $2)
            ON CONFLICT (email) DO UPDATE SET token = user_tokens.token
            RETURNING email, token, issued_at
            "#,
        )
        .bind(email)
        .bind(token)
        .fetch_one(&self.db)
        .await?;
        Ok(token)
    }
}
