use crate::language::Language;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "snippets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub language: Language,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::persistence::snippet_tag::entity::Entity")]
    SnippetTag,
}

impl Related<crate::persistence::snippet_tag::entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SnippetTag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
