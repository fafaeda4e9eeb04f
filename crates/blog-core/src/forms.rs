//! Typed form inputs and their validation.
//!
//! Each form deserializes leniently (missing fields become empty strings) and
//! is checked by `clean()`, which trims the input and returns either the
//! validated value or the per-field error messages.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

const REQUIRED: &str = "This field is required.";
const INVALID_EMAIL: &str = "Enter a valid email address.";

/// Field name to error messages, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            for err in errs {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

fn required(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required").with_message(REQUIRED.into()));
    }
    Ok(())
}

fn required_email(value: &str) -> Result<(), ValidationError> {
    required(value)?;
    if !value.to_owned().validate_email() {
        return Err(ValidationError::new("email").with_message(INVALID_EMAIL.into()));
    }
    Ok(())
}

/// Reader comment submitted from a post's detail page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CommentForm {
    #[serde(default)]
    #[validate(
        custom(function = "required"),
        length(max = 80, message = "Ensure this value has at most 80 characters.")
    )]
    pub name: String,

    #[serde(default)]
    #[validate(custom(function = "required_email"))]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "required"))]
    pub body: String,
}

/// A comment that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidComment {
    pub name: String,
    pub email: String,
    pub body: String,
}

impl CommentForm {
    pub fn clean(self) -> Result<ValidComment, FieldErrors> {
        let form = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            body: self.body.trim().to_string(),
        };
        form.validate()?;
        Ok(ValidComment {
            name: form.name,
            email: form.email,
            body: form.body,
        })
    }
}

/// "Share this post by email" submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SharePostForm {
    #[serde(default)]
    #[validate(
        custom(function = "required"),
        length(max = 25, message = "Ensure this value has at most 25 characters.")
    )]
    pub name: String,

    #[serde(default)]
    #[validate(custom(function = "required_email"))]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "required_email"))]
    pub to: String,

    #[serde(default)]
    pub comments: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidShare {
    pub name: String,
    pub email: String,
    pub to: String,
    pub comments: Option<String>,
}

impl SharePostForm {
    pub fn clean(self) -> Result<ValidShare, FieldErrors> {
        let form = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            to: self.to.trim().to_string(),
            comments: self.comments.trim().to_string(),
        };
        form.validate()?;
        Ok(ValidShare {
            name: form.name,
            email: form.email,
            to: form.to,
            comments: Some(form.comments).filter(|c| !c.is_empty()),
        })
    }
}

/// A post written by an author. The slug is derived from the title when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewPost {
    pub author_id: Uuid,

    #[serde(default)]
    #[validate(
        custom(function = "required"),
        length(max = 250, message = "Ensure this value has at most 250 characters.")
    )]
    pub title: String,

    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "required"))]
    pub body: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub publish: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPost {
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub tags: Vec<String>,
    pub publish: Option<DateTime<Utc>>,
}

impl NewPost {
    pub fn clean(self) -> Result<ValidPost, FieldErrors> {
        let form = Self {
            title: self.title.trim().to_string(),
            body: self.body.trim().to_string(),
            ..self
        };

        let mut errors = match form.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => e.into(),
        };

        let source = form
            .slug
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(form.title.as_str());
        let slug = slug::slugify(source);
        if slug.is_empty() && !errors.contains("title") {
            errors.add("slug", "Enter a valid slug.");
        } else if slug.chars().count() > 250 {
            errors.add("slug", "Ensure this value has at most 250 characters.");
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidPost {
            author_id: form.author_id,
            title: form.title,
            slug,
            body: form.body,
            tags: clean_tags(form.tags),
            publish: form.publish,
        })
    }
}

/// Changes an author makes to an existing post. Slug and publish date stay fixed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostEdit {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl PostEdit {
    pub fn clean(self) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = self.title.map(|t| t.trim().to_string());
        if let Some(title) = &title {
            if title.is_empty() {
                errors.add("title", REQUIRED);
            } else if title.chars().count() > 250 {
                errors.add("title", "Ensure this value has at most 250 characters.");
            }
        }

        let body = self.body.map(|b| b.trim().to_string());
        if body.as_deref() == Some("") {
            errors.add("body", REQUIRED);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            title,
            body,
            tags: self.tags.map(clean_tags),
        })
    }
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || slug::slugify(tag).is_empty() {
            continue;
        }
        if !cleaned.iter().any(|t| slug::slugify(t) == slug::slugify(tag)) {
            cleaned.push(tag.to_string());
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(name: &str, email: &str, body: &str) -> CommentForm {
        CommentForm {
            name: name.to_string(),
            email: email.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_valid_comment_is_trimmed() {
        let valid = comment("  Ann ", " ann@example.com ", " Nice post ")
            .clean()
            .unwrap();
        assert_eq!(valid.name, "Ann");
        assert_eq!(valid.email, "ann@example.com");
        assert_eq!(valid.body, "Nice post");
    }

    #[test]
    fn test_comment_missing_email() {
        let errors = comment("Ann", "", "Nice post").clean().unwrap_err();
        assert_eq!(errors.get("email"), Some(&[REQUIRED.to_string()][..]));
        assert!(!errors.contains("name"));
        assert!(!errors.contains("body"));
    }

    #[test]
    fn test_comment_malformed_email_and_long_name() {
        let errors = comment(&"x".repeat(81), "not-an-email", "body")
            .clean()
            .unwrap_err();
        assert_eq!(errors.get("email"), Some(&[INVALID_EMAIL.to_string()][..]));
        assert!(errors.contains("name"));
    }

    #[test]
    fn test_comment_deserializes_missing_fields_as_empty() {
        let form: CommentForm = serde_json::from_str(r#"{"name":"Ann","body":"Hi"}"#).unwrap();
        assert_eq!(form.email, "");
        assert!(form.clean().unwrap_err().contains("email"));
    }

    #[test]
    fn test_share_comments_are_optional() {
        let valid = SharePostForm {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            to: "bob@example.com".into(),
            comments: "   ".into(),
        }
        .clean()
        .unwrap();
        assert_eq!(valid.comments, None);
    }

    #[test]
    fn test_share_requires_recipient() {
        let errors = SharePostForm {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            ..Default::default()
        }
        .clean()
        .unwrap_err();
        assert!(errors.contains("to"));
        assert!(!errors.contains("comments"));
    }

    #[test]
    fn test_new_post_slug_from_title() {
        let valid = NewPost {
            title: "Hello, World!".into(),
            body: "Body".into(),
            tags: vec!["Rust".into(), " rust ".into(), "".into(), "Web".into()],
            ..Default::default()
        }
        .clean()
        .unwrap();
        assert_eq!(valid.slug, "hello-world");
        assert_eq!(valid.tags, vec!["Rust".to_string(), "Web".to_string()]);
    }

    #[test]
    fn test_new_post_explicit_slug_is_normalized() {
        let valid = NewPost {
            title: "Hello".into(),
            slug: Some("My Custom Slug".into()),
            body: "Body".into(),
            ..Default::default()
        }
        .clean()
        .unwrap();
        assert_eq!(valid.slug, "my-custom-slug");
    }

    #[test]
    fn test_new_post_requires_title_and_body() {
        let errors = NewPost::default().clean().unwrap_err();
        assert!(errors.contains("title"));
        assert!(errors.contains("body"));
        assert!(!errors.contains("slug"));
    }

    #[test]
    fn test_post_edit_rejects_blank_title() {
        let errors = PostEdit {
            title: Some("  ".into()),
            ..Default::default()
        }
        .clean()
        .unwrap_err();
        assert!(errors.contains("title"));
    }
}
