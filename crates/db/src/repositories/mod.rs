//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod finance;
pub mod password_reset;
pub mod session;
pub mod user;

pub use finance::{FinanceError, FinanceRepository};
pub use password_reset::PasswordResetRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
