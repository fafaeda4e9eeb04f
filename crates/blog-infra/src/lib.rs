//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//! This crate contains database, in-memory and mail integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `smtp` - SMTP mail delivery via lettre

pub mod database;
pub mod mail;
pub mod memory;

// Re-exports - In-Memory
pub use database::DatabaseConnections;
pub use mail::{ConsoleMailer, InMemoryMailer};
pub use memory::InMemoryStore;

#[cfg(feature = "smtp")]
pub use mail::{SmtpConfig, SmtpMailer};
