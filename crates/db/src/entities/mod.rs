//! `SeaORM` entity definitions.

pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod goals;
pub mod password_resets;
pub mod sea_orm_active_enums;
pub mod sessions;
pub mod transactions;
pub mod users;
