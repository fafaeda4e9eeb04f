use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A label attached to posts. The slug is unique across all tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl Tag {
    /// Create a tag, deriving its slug from the name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: Uuid::new_v4(),
            slug: slug::slugify(&name),
            name,
        }
    }
}
