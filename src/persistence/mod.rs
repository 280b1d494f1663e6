mod snippet;
mod snippet_tag;
mod tag;

pub(crate) use crate::persistence::snippet::{
    SnippetActiveModel, SnippetColumn, SnippetEntity, SnippetModel,
};
pub(crate) use crate::persistence::snippet_tag::{
    SnippetTagActiveModel, SnippetTagColumn, SnippetTagEntity, SnippetTagRelation,
};
pub(crate) use crate::persistence::tag::{TagActiveModel, TagColumn, TagEntity, TagModel};
