//! # Financy Hex
//!
//! Application services and HTTP adapter for the finance tracker.
//!
//! ## Architecture
//!
//! - `service/` - Application services (Auth, Category, Transaction, User)
//! - `inbound/` - HTTP adapter (Axum server, authorization gate, dispatcher)
//!
//! The services are generic over `R: FinanceRepository`, allowing
//! different repository implementations to be injected.

pub mod inbound;
pub mod service;


pub use service::{AuthService, CategoryService, Services, TransactionService, UserService};
