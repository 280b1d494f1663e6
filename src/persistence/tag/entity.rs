use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub created_at: DateTimeWithTimeZone,
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
