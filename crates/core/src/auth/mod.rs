//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//!
//! There are no roles in this system: every user owns exactly one ledger
//! and has full access to it.

mod password;

pub use password::{PasswordError, hash_password, verify_password};
