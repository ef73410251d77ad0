//! Core business logic for Plata.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Accounts, transactions, voiding, budgets, and goals
//! - `metrics` - KPIs, breakdowns, and statement projections derived from ledger state
//! - `auth` - Password hashing

pub mod auth;
pub mod ledger;
pub mod metrics;

pub use ledger::{Ledger, LedgerError, LedgerSnapshot};
pub use metrics::MetricsService;
