//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod repository;
mod security;

pub use repository::{CategoryRepository, FinanceRepository, TransactionRepository, UserRepository};
pub use security::{PasswordHasher, TokenService};
