//! Password reset tokens migration.
//!
//! Creates the password_resets table for the forgot-password flow.
//! Tokens are stored hashed; the raw token only ever travels in the
//! reset email.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(PASSWORD_RESETS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS password_resets CASCADE;")
            .await?;
        Ok(())
    }
}

const PASSWORD_RESETS_SQL: &str = r"
-- Password reset tokens (single use, short lived)
CREATE TABLE password_resets (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    token_hash VARCHAR(64) NOT NULL,
    expires_at TIMESTAMPTZ NOT NULL,
    used_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Index for token lookup
CREATE INDEX idx_password_resets_token_hash ON password_resets(token_hash) WHERE used_at IS NULL;

-- Index for invalidating a user's outstanding tokens
CREATE INDEX idx_password_resets_user ON password_resets(user_id) WHERE used_at IS NULL;
";
