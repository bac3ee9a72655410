//! Gate-check for inbound post submissions.
//!
//! Violations are collected, not fail-fast: a rejected submission reports
//! every broken rule at once so the caller can fix them in one round trip.

use serde::Deserialize;
use thiserror::Error;
use url::Url;

const TITLE_MIN: usize = 5;
const TITLE_MAX: usize = 200;
const EXCERPT_MIN: usize = 10;
const EXCERPT_MAX: usize = 500;
const CONTENT_MIN: usize = 50;

/// An inbound create/update payload before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostSubmission {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub tags: Option<Vec<String>>,
    pub featured: Option<bool>,
    pub image: Option<String>,
}

/// A submission that passed validation, with defaults substituted.
#[derive(Debug, Clone)]
pub struct ValidatedPost {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub tags: Vec<String>,
    pub featured: bool,
    pub image: String,
}

/// Configured fallbacks for optional submission fields.
#[derive(Debug, Clone)]
pub struct PostDefaults {
    pub author: String,
    pub image: String,
}

#[derive(Debug, Clone, Error)]
#[error("submission rejected: {}", .messages.join("; "))]
pub struct ValidationError {
    pub messages: Vec<String>,
}

/// Validate a submission, substituting configured defaults for absent
/// optional fields. Every violated rule contributes one message.
pub fn validate(
    submission: PostSubmission,
    defaults: &PostDefaults,
) -> Result<ValidatedPost, ValidationError> {
    let mut messages = Vec::new();

    let title = required_with_length(
        submission.title,
        "title",
        TITLE_MIN,
        Some(TITLE_MAX),
        &mut messages,
    );
    let excerpt = required_with_length(
        submission.excerpt,
        "excerpt",
        EXCERPT_MIN,
        Some(EXCERPT_MAX),
        &mut messages,
    );
    let content = required_with_length(submission.content, "content", CONTENT_MIN, None, &mut messages);

    let image = match submission.image {
        Some(image) => {
            if Url::parse(&image).is_err() {
                messages.push("image must be a valid URI".to_string());
            }
            image
        }
        None => defaults.image.clone(),
    };

    if !messages.is_empty() {
        return Err(ValidationError { messages });
    }

    Ok(ValidatedPost {
        title: title.unwrap_or_default(),
        excerpt: excerpt.unwrap_or_default(),
        content: content.unwrap_or_default(),
        author: submission.author.unwrap_or_else(|| defaults.author.clone()),
        tags: submission.tags.unwrap_or_default(),
        featured: submission.featured.unwrap_or(false),
        image,
    })
}

fn required_with_length(
    value: Option<String>,
    field: &str,
    min: usize,
    max: Option<usize>,
    messages: &mut Vec<String>,
) -> Option<String> {
    let Some(value) = value else {
        messages.push(format!("{field} is required"));
        return None;
    };

    let length = value.chars().count();
    let in_range = length >= min && max.is_none_or(|max| length <= max);
    if !in_range {
        match max {
            Some(max) => {
                messages.push(format!("{field} must be between {min} and {max} characters"));
            }
            None => messages.push(format!("{field} must be at least {min} characters")),
        }
    }
    Some(value)
}
