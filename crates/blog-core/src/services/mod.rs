//! Application services - the blog's view logic over the ports.

mod blog;
mod views;

pub use blog::{BlogService, BlogSettings};
pub use views::{PostCard, PostDetail, PostListing, SharePage};
