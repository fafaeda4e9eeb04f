//! # Blog Shared
//!
//! Wire types of the blog API, shared between the server and its clients.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
