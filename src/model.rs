//! Read models returned by the services.

use crate::language::Language;
use crate::persistence::{SnippetModel, TagModel};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub created_at: DateTimeWithTimeZone,
}

impl From<TagModel> for Tag {
    fn from(model: TagModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at,
        }
    }
}

/// A snippet row with the comma-joined tag names of its associations.
///
/// `tags` is derived from the join table on every read and is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub language: Language,
    pub tags: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Snippet {
    pub(crate) fn from_model(model: SnippetModel, tags: &[TagModel]) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            language: model.language,
            tags: join_tag_names(tags),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// A snippet together with its resolved tags, ordered by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnippetWithTags {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub language: Language,
    pub tag_list: Vec<Tag>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl SnippetWithTags {
    pub(crate) fn from_model(model: SnippetModel, tags: Vec<TagModel>) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            language: model.language,
            tag_list: tags.into_iter().map(Tag::from).collect(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    pub fn tag_names(&self) -> Vec<&str> {
        self.tag_list.iter().map(|tag| tag.name.as_str()).collect()
    }
}

fn join_tag_names(tags: &[TagModel]) -> String {
    tags.iter()
        .map(|tag| tag.name.as_str())
        .collect::<Vec<_>>()
        .join(",")
}
