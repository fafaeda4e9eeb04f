use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(format!("unknown post status '{other}'")),
        }
    }
}

/// Post entity - represents a blog article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub publish: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub status: PostStatus,
}

impl Post {
    /// Create a new draft post, scheduled for publication now.
    pub fn new(author_id: Uuid, title: String, slug: String, body: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            slug,
            body,
            publish: now,
            created: now,
            updated: now,
            status: PostStatus::Draft,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Calendar date (UTC) the slug is unique for.
    pub fn publish_date(&self) -> NaiveDate {
        self.publish.date_naive()
    }

    /// Canonical path of the post's detail page.
    pub fn absolute_path(&self) -> String {
        format!(
            "/blog/{}/{}/{}/{}",
            self.publish.year(),
            self.publish.month(),
            self.publish.day(),
            self.slug
        )
    }

    /// Move the post from draft to published.
    pub fn mark_published(&mut self) {
        self.status = PostStatus::Published;
        self.touch();
    }

    /// Record an edit.
    pub fn touch(&mut self) {
        self.updated = Utc::now();
    }
}

/// Date segment of a detail URL, as received from the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PostDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl PostDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// `None` when the parts do not form a calendar date.
    pub fn to_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// Half-open UTC range `[start, end)` covering a calendar day.
    ///
    /// `None` for the last day chrono can represent, which has no successor.
    pub fn day_bounds(date: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = date.and_time(NaiveTime::MIN).and_utc();
        let end = date.succ_opt()?.and_time(NaiveTime::MIN).and_utc();
        Some((start, end))
    }
}

impl fmt::Display for PostDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.year, self.month, self.day)
    }
}
