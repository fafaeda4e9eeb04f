//! # Blog Core
//!
//! The domain layer of the Quill blog.
//! Entities, form validation, repository/mailer ports and the view logic
//! that drives the public blog pages. No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod forms;
pub mod pii;
pub mod ports;
pub mod services;

pub use error::DomainError;
pub use services::BlogService;
