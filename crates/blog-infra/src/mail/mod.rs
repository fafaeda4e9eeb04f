//! Mail transports.
//!
//! - `console`: logs every message, for development
//! - `memory`: keeps every message, for tests
//! - `smtp`: delivers through an SMTP relay (feature `smtp`)

mod console;
mod memory;
#[cfg(feature = "smtp")]
mod smtp;

pub use console::ConsoleMailer;
pub use memory::InMemoryMailer;
#[cfg(feature = "smtp")]
pub use smtp::{SmtpConfig, SmtpMailer};
