use crate::persistence::{
    SnippetTagActiveModel, SnippetTagColumn, SnippetTagEntity, TagActiveModel, TagColumn,
    TagEntity, TagModel,
};
use crate::repository::escape_like;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, prelude::DateTimeWithTimeZone,
    sea_query::{LikeExpr, OnConflict},
};

pub(crate) struct TagRepository;

impl TagRepository {
    pub(crate) async fn find_by_name<C>(db: &C, name: &str) -> Result<Option<TagModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        TagEntity::find()
            .filter(TagColumn::Name.eq(name))
            .one(db)
            .await
    }

    /// Inserts `name` unless a row with that name already exists. Returns the
    /// number of rows written, so `0` means another writer got there first.
    pub(crate) async fn insert_if_absent<C>(
        db: &C,
        name: &str,
        created_at: DateTimeWithTimeZone,
    ) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let active_model = TagActiveModel {
            name: Set(name.to_string()),
            created_at: Set(created_at),
            ..Default::default()
        };

        TagEntity::insert(active_model)
            .on_conflict(OnConflict::column(TagColumn::Name).do_nothing().to_owned())
            .exec_without_returning(db)
            .await
    }

    pub(crate) async fn find_by_prefix<C>(
        db: &C,
        prefix: &str,
        limit: u64,
    ) -> Result<Vec<TagModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        let pattern = format!("{}%", escape_like(prefix));

        TagEntity::find()
            .filter(TagColumn::Name.like(LikeExpr::new(pattern).escape('\\')))
            .order_by_asc(TagColumn::Name)
            .limit(limit)
            .all(db)
            .await
    }

    pub(crate) async fn find_by_snippet_id<C>(
        db: &C,
        snippet_id: i32,
    ) -> Result<Vec<TagModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        TagEntity::find()
            .inner_join(SnippetTagEntity)
            .filter(SnippetTagColumn::SnippetId.eq(snippet_id))
            .order_by_asc(TagColumn::Name)
            .all(db)
            .await
    }

    /// Tags of several snippets in one query, as `(snippet_id, tag)` pairs
    /// ordered by tag name.
    pub(crate) async fn find_by_snippet_ids<C>(
        db: &C,
        snippet_ids: &[i32],
    ) -> Result<Vec<(i32, TagModel)>, DbErr>
    where
        C: ConnectionTrait,
    {
        if snippet_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = SnippetTagEntity::find()
            .find_also_related(TagEntity)
            .filter(SnippetTagColumn::SnippetId.is_in(snippet_ids.iter().copied()))
            .order_by_asc(TagColumn::Name)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(link, tag)| tag.map(|tag| (link.snippet_id, tag)))
            .collect())
    }

    pub(crate) async fn insert_link<C>(
        db: &C,
        snippet_id: i32,
        tag_id: i32,
        created_at: DateTimeWithTimeZone,
    ) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        let active_model = SnippetTagActiveModel {
            snippet_id: Set(snippet_id),
            tag_id: Set(tag_id),
            created_at: Set(created_at),
        };

        SnippetTagEntity::insert(active_model)
            .exec_without_returning(db)
            .await?;
        Ok(())
    }

    pub(crate) async fn delete_links_for_snippet<C>(db: &C, snippet_id: i32) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let result = SnippetTagEntity::delete_many()
            .filter(SnippetTagColumn::SnippetId.eq(snippet_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
