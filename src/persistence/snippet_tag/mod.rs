pub(crate) mod entity;

pub(crate) use entity::{
    ActiveModel as SnippetTagActiveModel, Column as SnippetTagColumn, Entity as SnippetTagEntity,
    Relation as SnippetTagRelation,
};
