use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "snippet_tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub snippet_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub tag_id: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::persistence::snippet::entity::Entity",
        from = "Column::SnippetId",
        to = "crate::persistence::snippet::entity::Column::Id",
        on_delete = "Cascade",
        on_update = "Cascade"
    )]
    Snippet,
    #[sea_orm(
        belongs_to = "crate::persistence::tag::entity::Entity",
        from = "Column::TagId",
        to = "crate::persistence::tag::entity::Column::Id",
        on_delete = "Cascade",
        on_update = "Cascade"
    )]
    Tag,
}

impl Related<crate::persistence::snippet::entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Snippet.def()
    }
}

impl Related<crate::persistence::tag::entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
