//! Password reset repository for database operations.
//!
//! Reset tokens are stored hashed and expire after one hour. The raw
//! token is returned exactly once, to be sent in the reset email.

use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::entities::password_resets;

/// Lifetime of a reset token.
const TOKEN_TTL_HOURS: i64 = 1;

/// Password reset repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct PasswordResetRepository {
    db: DatabaseConnection,
}

impl PasswordResetRepository {
    /// Creates a new password reset repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Hashes a reset token for storage.
    #[must_use]
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Generates a random reset token.
    #[must_use]
    pub fn generate_token() -> String {
        // URL-safe so it can ride in a reset link
        let bytes: [u8; 32] = rand::random();
        base64_url::encode(&bytes)
    }

    /// Creates a new reset token for a user, invalidating any outstanding
    /// ones. Returns the raw token to be sent via email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create_token(&self, user_id: Uuid) -> Result<String, DbErr> {
        self.invalidate_user_tokens(user_id).await?;

        let raw_token = Self::generate_token();
        let token_hash = Self::hash_token(&raw_token);
        let now = Utc::now();
        let expires_at = now + Duration::hours(TOKEN_TTL_HOURS);

        let token = password_resets::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            token_hash: Set(token_hash),
            expires_at: Set(expires_at.into()),
            used_at: Set(None),
            created_at: Set(now.into()),
        };

        token.insert(&self.db).await?;

        Ok(raw_token)
    }

    /// Finds an unused, unexpired token matching the raw token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_valid(
        &self,
        raw_token: &str,
    ) -> Result<Option<password_resets::Model>, DbErr> {
        let token_hash = Self::hash_token(raw_token);

        password_resets::Entity::find()
            .filter(password_resets::Column::TokenHash.eq(token_hash))
            .filter(password_resets::Column::UsedAt.is_null())
            .filter(password_resets::Column::ExpiresAt.gt(Utc::now()))
            .one(&self.db)
            .await
    }

    /// Marks a token as used.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn mark_used(&self, id: Uuid) -> Result<(), DbErr> {
        password_resets::ActiveModel {
            id: Set(id),
            used_at: Set(Some(Utc::now().into())),
            ..Default::default()
        }
        .update(&self.db)
        .await?;

        Ok(())
    }

    /// Invalidates all outstanding tokens for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn invalidate_user_tokens(&self, user_id: Uuid) -> Result<u64, DbErr> {
        let now = Utc::now();

        let result = password_resets::Entity::update_many()
            .col_expr(
                password_resets::Column::UsedAt,
                sea_orm::sea_query::Expr::value(now),
            )
            .filter(password_resets::Column::UserId.eq(user_id))
            .filter(password_resets::Column::UsedAt.is_null())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Cleans up expired tokens (for maintenance).
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn cleanup_expired(&self) -> Result<u64, DbErr> {
        let result = password_resets::Entity::delete_many()
            .filter(password_resets::Column::ExpiresAt.lt(Utc::now()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
