//! Side-effect free checks and normalization for snippet and tag input.
//!
//! Every check reports a [`ValidationError`] that knows which form field it
//! belongs to, so callers can aggregate failures and report them in one pass.

use crate::language::Language;
use serde::{Deserialize, Serialize};

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_CONTENT_LEN: usize = 50_000;
pub const MAX_TAG_LEN: usize = 30;
pub const MIN_TAGS_PER_SNIPPET: usize = 1;
pub const MAX_TAGS_PER_SNIPPET: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title is required")]
    TitleRequired,
    #[error("Title cannot be empty or whitespace only")]
    TitleBlank,
    #[error("Title must be 100 characters or less")]
    TitleTooLong,
    #[error("Code content is required")]
    ContentRequired,
    #[error("Code content cannot be empty or whitespace only")]
    ContentBlank,
    #[error("Code content must be 50,000 characters or less")]
    ContentTooLong,
    #[error("Language selection is required")]
    LanguageRequired,
    #[error("Choose a language from the supported list")]
    LanguageUnsupported,
    #[error("At least one tag is required")]
    TagsRequired,
    #[error("Tag cannot be empty")]
    TagEmpty,
    #[error("Tag must be 30 characters or less")]
    TagTooLong,
    #[error("Tags can only contain letters, numbers, hyphens, and underscores")]
    TagInvalidChars,
    #[error("At least one tag is required")]
    TooFewTags,
    #[error("Maximum 5 tags per snippet")]
    TooManyTags,
}

impl ValidationError {
    /// Name of the input field the failure is reported against.
    pub fn field(self) -> &'static str {
        match self {
            Self::TitleRequired | Self::TitleBlank | Self::TitleTooLong => "title",
            Self::ContentRequired | Self::ContentBlank | Self::ContentTooLong => "content",
            Self::LanguageRequired | Self::LanguageUnsupported => "language",
            Self::TagsRequired
            | Self::TagEmpty
            | Self::TagTooLong
            | Self::TagInvalidChars
            | Self::TooFewTags
            | Self::TooManyTags => "tags",
        }
    }
}

/// Wire form of a validation failure: `{ "field": ..., "message": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl From<ValidationError> for FieldError {
    fn from(error: ValidationError) -> Self {
        Self {
            field: error.field(),
            message: error.to_string(),
        }
    }
}

/// Raw snippet fields as submitted. `None` models a field that was not sent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnippetDraft {
    pub title: Option<String>,
    pub content: Option<String>,
    pub language: Option<String>,
    pub tags: Option<Vec<String>>,
}

pub fn validate_title(title: Option<&str>) -> Result<(), ValidationError> {
    let Some(title) = title.filter(|value| !value.is_empty()) else {
        return Err(ValidationError::TitleRequired);
    };
    if title.trim().is_empty() {
        return Err(ValidationError::TitleBlank);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(())
}

pub fn validate_content(content: Option<&str>) -> Result<(), ValidationError> {
    let Some(content) = content.filter(|value| !value.is_empty()) else {
        return Err(ValidationError::ContentRequired);
    };
    if content.trim().is_empty() {
        return Err(ValidationError::ContentBlank);
    }
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(ValidationError::ContentTooLong);
    }
    Ok(())
}

/// Checks the language against the supported set and returns the parsed id.
pub fn validate_language(language: Option<&str>) -> Result<Language, ValidationError> {
    let Some(language) = language.filter(|value| !value.trim().is_empty()) else {
        return Err(ValidationError::LanguageRequired);
    };
    language
        .parse()
        .map_err(|_| ValidationError::LanguageUnsupported)
}

/// Presence check only; the upper bound lives in [`validate_tag_count`].
pub fn validate_tags(tags: Option<&[String]>) -> Result<(), ValidationError> {
    match tags {
        Some(tags) if !tags.is_empty() => Ok(()),
        _ => Err(ValidationError::TagsRequired),
    }
}

/// Runs every whole-snippet check in field order and returns all failures.
pub fn validate_snippet_data(draft: &SnippetDraft) -> Vec<ValidationError> {
    [
        validate_title(draft.title.as_deref()),
        validate_content(draft.content.as_deref()),
        validate_language(draft.language.as_deref()).map(|_| ()),
        validate_tags(draft.tags.as_deref()),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect()
}

pub fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}

pub fn validate_tag_format(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::TagEmpty);
    }
    if trimmed.chars().count() > MAX_TAG_LEN {
        return Err(ValidationError::TagTooLong);
    }
    if !trimmed
        .bytes()
        .all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_'))
    {
        return Err(ValidationError::TagInvalidChars);
    }
    Ok(())
}

/// First format failure across a list of tag names, if any.
pub fn validate_tag_names<S: AsRef<str>>(names: &[S]) -> Option<ValidationError> {
    names
        .iter()
        .find_map(|name| validate_tag_format(name.as_ref()).err())
}

pub fn normalize_tag_name(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn validate_tag_count(count: usize) -> Result<(), ValidationError> {
    if count < MIN_TAGS_PER_SNIPPET {
        return Err(ValidationError::TooFewTags);
    }
    if count > MAX_TAGS_PER_SNIPPET {
        return Err(ValidationError::TooManyTags);
    }
    Ok(())
}

pub fn is_duplicate_tag<S: AsRef<str>>(candidate: &str, existing: &[S]) -> bool {
    let normalized = normalize_tag_name(candidate);
    existing
        .iter()
        .any(|tag| normalize_tag_name(tag.as_ref()) == normalized)
}
