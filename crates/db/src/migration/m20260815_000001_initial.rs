//! Initial database migration.
//!
//! Creates the enums, core tables, triggers, and the global default
//! category seed.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: USERS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;

        // ============================================================
        // PART 3: CATEGORIES
        // ============================================================
        db.execute_unprepared(CATEGORIES_SQL).await?;

        // ============================================================
        // PART 4: ACCOUNTS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 5: TRANSACTIONS
        // ============================================================
        db.execute_unprepared(TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 6: BUDGETS & GOALS
        // ============================================================
        db.execute_unprepared(BUDGETS_SQL).await?;
        db.execute_unprepared(GOALS_SQL).await?;

        // ============================================================
        // PART 7: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        // ============================================================
        // PART 8: SEED DATA
        // ============================================================
        db.execute_unprepared(SEED_DEFAULT_CATEGORIES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Account kinds
CREATE TYPE account_type AS ENUM ('cash', 'bank', 'credit_card');

-- Transaction kinds
CREATE TYPE transaction_type AS ENUM ('income', 'expense', 'transfer', 'credit_card_payment');

-- Category kinds
CREATE TYPE category_type AS ENUM ('income', 'expense');

-- Budget periods
CREATE TYPE budget_period AS ENUM ('monthly', 'weekly');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    currency CHAR(3) NOT NULL DEFAULT 'CLP',
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_email ON users(email) WHERE is_active = true;
";

const CATEGORIES_SQL: &str = r"
CREATE TABLE categories (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID REFERENCES users(id) ON DELETE CASCADE,
    name VARCHAR(100) NOT NULL,
    category_type category_type NOT NULL,
    icon VARCHAR(50) NOT NULL,
    color VARCHAR(7) NOT NULL,
    parent_id UUID REFERENCES categories(id) ON DELETE RESTRICT,
    is_default BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_default_is_global CHECK (NOT is_default OR user_id IS NULL)
);

CREATE INDEX idx_categories_user ON categories(user_id) WHERE user_id IS NOT NULL;
CREATE INDEX idx_categories_parent ON categories(parent_id) WHERE parent_id IS NOT NULL;
CREATE UNIQUE INDEX uq_categories_default_name ON categories(name) WHERE is_default = true;
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name VARCHAR(100) NOT NULL,
    account_type account_type NOT NULL,
    balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    credit_limit NUMERIC(19, 4),
    closing_day INTEGER,
    due_day INTEGER,
    color VARCHAR(7) NOT NULL,
    icon VARCHAR(50) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_card_terms CHECK (
        (account_type = 'credit_card') =
        (credit_limit IS NOT NULL AND closing_day IS NOT NULL AND due_day IS NOT NULL)
    ),
    CONSTRAINT chk_closing_day CHECK (closing_day IS NULL OR closing_day BETWEEN 1 AND 31),
    CONSTRAINT chk_due_day CHECK (due_day IS NULL OR due_day BETWEEN 1 AND 31),
    CONSTRAINT chk_credit_limit_not_negative CHECK (credit_limit IS NULL OR credit_limit >= 0)
);

CREATE INDEX idx_accounts_user ON accounts(user_id);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    transaction_type transaction_type NOT NULL,
    transaction_date DATE NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    description TEXT NOT NULL,
    category_id UUID REFERENCES categories(id) ON DELETE RESTRICT,
    from_account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE RESTRICT,
    to_account_id UUID REFERENCES accounts(id) ON DELETE RESTRICT,
    voided BOOLEAN NOT NULL DEFAULT false,
    voided_by UUID REFERENCES transactions(id),
    reverses UUID REFERENCES transactions(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_endpoints CHECK (
        (transaction_type IN ('income', 'expense')
            AND category_id IS NOT NULL AND to_account_id IS NULL)
        OR (transaction_type IN ('transfer', 'credit_card_payment')
            AND to_account_id IS NOT NULL AND category_id IS NULL)
    ),
    CONSTRAINT chk_reversal_not_voided CHECK (NOT (voided AND reverses IS NOT NULL))
);

CREATE INDEX idx_txn_user_date ON transactions(user_id, transaction_date DESC, created_at DESC);
CREATE INDEX idx_txn_category ON transactions(category_id) WHERE category_id IS NOT NULL;
CREATE INDEX idx_txn_from_account ON transactions(from_account_id);
CREATE INDEX idx_txn_to_account ON transactions(to_account_id) WHERE to_account_id IS NOT NULL;
";

const BUDGETS_SQL: &str = r"
CREATE TABLE budgets (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    category_id UUID NOT NULL REFERENCES categories(id) ON DELETE RESTRICT,
    amount NUMERIC(19, 4) NOT NULL,
    period budget_period NOT NULL DEFAULT 'monthly',
    alert_threshold INTEGER NOT NULL DEFAULT 80,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_budget_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_alert_threshold CHECK (alert_threshold BETWEEN 1 AND 100)
);

CREATE INDEX idx_budgets_user ON budgets(user_id);
CREATE INDEX idx_budgets_category ON budgets(category_id);
";

const GOALS_SQL: &str = r"
CREATE TABLE goals (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name VARCHAR(100) NOT NULL,
    target_amount NUMERIC(19, 4) NOT NULL,
    current_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    target_date DATE,
    color VARCHAR(7) NOT NULL,
    icon VARCHAR(50) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_target_positive CHECK (target_amount > 0),
    CONSTRAINT chk_current_not_negative CHECK (current_amount >= 0)
);

CREATE INDEX idx_goals_user ON goals(user_id);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: set_updated_at
-- Keeps updated_at current on every row update
-- ============================================================
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_users_updated_at
BEFORE UPDATE ON users
FOR EACH ROW
EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_categories_updated_at
BEFORE UPDATE ON categories
FOR EACH ROW
EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_accounts_updated_at
BEFORE UPDATE ON accounts
FOR EACH ROW
EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_budgets_updated_at
BEFORE UPDATE ON budgets
FOR EACH ROW
EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_goals_updated_at
BEFORE UPDATE ON goals
FOR EACH ROW
EXECUTE FUNCTION set_updated_at();

-- ============================================================
-- FUNCTION: prevent_voided_modification
-- A voided transaction row is immutable
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_voided_modification()
RETURNS TRIGGER AS $$
BEGIN
    IF OLD.voided AND NEW.voided THEN
        RAISE EXCEPTION 'Voided transactions are immutable';
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_voided_mod
BEFORE UPDATE ON transactions
FOR EACH ROW
EXECUTE FUNCTION prevent_voided_modification();
";

const SEED_DEFAULT_CATEGORIES_SQL: &str = r"
-- ============================================================
-- SEED: Global default categories (user_id NULL, read-only)
-- ============================================================
INSERT INTO categories (user_id, name, category_type, icon, color, is_default) VALUES
(NULL, 'Sueldo', 'income', '💰', '#22c55e', true),
(NULL, 'Supermercado', 'expense', '🛒', '#f97316', true),
(NULL, 'Restaurantes', 'expense', '🍽️', '#f97316', true),
(NULL, 'Uber/Taxi', 'expense', '🚗', '#3b82f6', true),
(NULL, 'Streaming', 'expense', '📺', '#f59e0b', true),
(NULL, 'Arriendo', 'expense', '🏠', '#8b5cf6', true),
(NULL, 'Cuentas Básicas', 'expense', '💡', '#8b5cf6', true),
(NULL, 'Otros', 'expense', '✨', '#6b7280', true)
ON CONFLICT (name) WHERE is_default = true DO NOTHING;
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================

-- Drop triggers
DROP TRIGGER IF EXISTS trg_prevent_voided_mod ON transactions;
DROP TRIGGER IF EXISTS trg_goals_updated_at ON goals;
DROP TRIGGER IF EXISTS trg_budgets_updated_at ON budgets;
DROP TRIGGER IF EXISTS trg_accounts_updated_at ON accounts;
DROP TRIGGER IF EXISTS trg_categories_updated_at ON categories;
DROP TRIGGER IF EXISTS trg_users_updated_at ON users;

-- Drop functions
DROP FUNCTION IF EXISTS prevent_voided_modification();
DROP FUNCTION IF EXISTS set_updated_at();

-- Drop tables (reverse order of creation)
DROP TABLE IF EXISTS goals CASCADE;
DROP TABLE IF EXISTS budgets CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS categories CASCADE;
DROP TABLE IF EXISTS users CASCADE;

-- Drop enums
DROP TYPE IF EXISTS budget_period CASCADE;
DROP TYPE IF EXISTS category_type CASCADE;
DROP TYPE IF EXISTS transaction_type CASCADE;
DROP TYPE IF EXISTS account_type CASCADE;
";
