//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod category;
pub mod usage;
pub mod user;

pub use account::AccountRepository;
pub use category::{CategoryRepository, RefreshSummary};
pub use usage::{DEFAULT_SHORTCUT_LIMIT, Shortcut, UsageRepository};
pub use user::{CreateUserInput, UserRepository};
