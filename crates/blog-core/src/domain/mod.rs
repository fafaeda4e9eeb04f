//! Domain entities - the core business objects.

mod comment;
mod pagination;
mod post;
mod similar;
mod tag;
mod user;

pub use comment::Comment;
pub use pagination::{POSTS_PER_PAGE, PageInfo};
pub use post::{Post, PostDate, PostStatus};
pub use similar::{SIMILAR_POSTS_LIMIT, SimilarPost, rank_similar};
pub use tag::Tag;
pub use user::User;
