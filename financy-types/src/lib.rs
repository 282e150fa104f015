//! # Financy Types
//!
//! Domain types and port traits for the personal finance tracker.
//! This crate has ZERO external IO dependencies - only data structures,
//! validation rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (User, Category, Transaction)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for the operation surface
//! - `error/` - Domain and application error types
//! - `identity/` - The per-request caller identity
//! - `patch/` - Tri-state fields for partial updates
//! - `validation/` - Input normalization primitives

pub mod domain;
pub mod dto;
pub mod error;
pub mod identity;
pub mod patch;
pub mod ports;
pub mod validation;

// Re-export commonly used types
pub use domain::{
    Category, CategoryId, NewTransaction, NewUser, Transaction, TransactionChanges, TransactionId,
    TransactionType, User, UserId,
};
pub use dto::*;
pub use error::{
    AppError, CODE_BAD_USER_INPUT, CODE_INTERNAL, CODE_NOT_FOUND, CODE_UNAUTHENTICATED,
    DomainError, HashError, OPAQUE_INTERNAL_MESSAGE, RepoError, TokenError,
};
pub use identity::Caller;
pub use patch::Patch;
pub use ports::{
    CategoryRepository, FinanceRepository, PasswordHasher, TokenService, TransactionRepository,
    UserRepository,
};
