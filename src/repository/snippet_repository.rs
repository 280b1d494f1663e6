use crate::language::Language;
use crate::persistence::{
    SnippetActiveModel, SnippetColumn, SnippetEntity, SnippetModel, SnippetTagEntity,
    SnippetTagRelation, TagColumn,
};
use crate::repository::escape_like;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, sea_query::LikeExpr,
};

pub(crate) struct SnippetRepository;

impl SnippetRepository {
    pub(crate) async fn insert<C>(
        db: &C,
        active_model: SnippetActiveModel,
    ) -> Result<SnippetModel, DbErr>
    where
        C: ConnectionTrait,
    {
        active_model.insert(db).await
    }

    pub(crate) async fn update<C>(
        db: &C,
        active_model: SnippetActiveModel,
    ) -> Result<SnippetModel, DbErr>
    where
        C: ConnectionTrait,
    {
        active_model.update(db).await
    }

    pub(crate) async fn find_by_id<C>(db: &C, id: i32) -> Result<Option<SnippetModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        SnippetEntity::find_by_id(id).one(db).await
    }

    /// Every snippet, newest first by `column`; ties fall back to id.
    pub(crate) async fn list_newest_first<C>(
        db: &C,
        column: SnippetColumn,
    ) -> Result<Vec<SnippetModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        SnippetEntity::find()
            .order_by_desc(column)
            .order_by_desc(SnippetColumn::Id)
            .all(db)
            .await
    }

    pub(crate) async fn find_by_language<C>(
        db: &C,
        language: Language,
    ) -> Result<Vec<SnippetModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        SnippetEntity::find()
            .filter(SnippetColumn::Language.eq(language))
            .order_by_desc(SnippetColumn::UpdatedAt)
            .order_by_desc(SnippetColumn::Id)
            .all(db)
            .await
    }

    /// Snippets having at least one tag whose name contains any of `terms`.
    pub(crate) async fn find_by_tag_substrings<C>(
        db: &C,
        terms: &[String],
    ) -> Result<Vec<SnippetModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        let condition = terms.iter().fold(Condition::any(), |condition, term| {
            let pattern = format!("%{}%", escape_like(term));
            condition.add(TagColumn::Name.like(LikeExpr::new(pattern).escape('\\')))
        });

        SnippetEntity::find()
            .inner_join(SnippetTagEntity)
            .join(JoinType::InnerJoin, SnippetTagRelation::Tag.def())
            .filter(condition)
            .distinct()
            .order_by_desc(SnippetColumn::UpdatedAt)
            .order_by_desc(SnippetColumn::Id)
            .all(db)
            .await
    }

    pub(crate) async fn delete_by_id<C>(db: &C, id: i32) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let result = SnippetEntity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected)
    }
}
