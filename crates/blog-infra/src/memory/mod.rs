//! In-memory storage backend.

mod store;

#[cfg(test)]
mod tests;

pub use store::{
    InMemoryCommentRepository, InMemoryPostRepository, InMemoryStore, InMemoryTagRepository,
    InMemoryUserRepository,
};
