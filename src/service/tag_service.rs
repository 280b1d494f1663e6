use crate::model::Tag;
use crate::persistence::TagModel;
use crate::repository::tag_repository::TagRepository;
use crate::service::error::{ServiceError, map_db_error};
use crate::validation::{is_duplicate_tag, normalize_tag_name, validate_tag_format};
use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use std::sync::Arc;
use tracing::debug;

/// Result cap used by tag autocomplete.
pub const DEFAULT_PREFIX_LIMIT: u64 = 8;

/// Normalized, de-duplicated tag names in first-seen order.
pub(crate) fn unique_tag_names(names: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !is_duplicate_tag(name, &unique) {
            unique.push(normalize_tag_name(name));
        }
    }
    unique
}

/// Finds the tag with the normalized form of `name`, creating it if needed.
///
/// The insert ignores unique-index conflicts and the row is always read back,
/// so two writers racing on the same new name end up with the same row.
pub(crate) async fn create_or_find_tag_with<C>(db: &C, name: &str) -> Result<TagModel, ServiceError>
where
    C: ConnectionTrait,
{
    validate_tag_format(name)?;
    let normalized = normalize_tag_name(name);

    if let Some(existing) = TagRepository::find_by_name(db, &normalized)
        .await
        .map_err(map_db_error)?
    {
        return Ok(existing);
    }

    let inserted = TagRepository::insert_if_absent(db, &normalized, Utc::now().into())
        .await
        .map_err(map_db_error)?;
    if inserted == 0 {
        debug!(tag = %normalized, "tag was created concurrently, reading it back");
    } else {
        debug!(tag = %normalized, "created tag");
    }

    TagRepository::find_by_name(db, &normalized)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| ServiceError::internal(format!("tag `{normalized}` missing after insert")))
}

/// Replaces the whole tag set of a snippet. Callers provide the transaction.
pub(crate) async fn replace_snippet_tags<C>(
    db: &C,
    snippet_id: i32,
    names: &[String],
) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    TagRepository::delete_links_for_snippet(db, snippet_id)
        .await
        .map_err(map_db_error)?;

    let now = Utc::now().into();
    for name in unique_tag_names(names) {
        let tag = create_or_find_tag_with(db, &name).await?;
        TagRepository::insert_link(db, snippet_id, tag.id, now)
            .await
            .map_err(map_db_error)?;
    }

    Ok(())
}

#[derive(Clone)]
pub struct TagService {
    db: Arc<DatabaseConnection>,
}

impl TagService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn create_or_find_tag(&self, name: &str) -> Result<Tag, ServiceError> {
        create_or_find_tag_with(self.db.as_ref(), name)
            .await
            .map(Tag::from)
    }

    /// Autocomplete lookup. A blank prefix matches nothing.
    pub async fn tags_by_prefix(&self, prefix: &str, limit: u64) -> Result<Vec<Tag>, ServiceError> {
        if prefix.trim().is_empty() {
            return Ok(Vec::new());
        }

        let normalized = normalize_tag_name(prefix);
        let tags = TagRepository::find_by_prefix(self.db.as_ref(), &normalized, limit)
            .await
            .map_err(map_db_error)?;

        Ok(tags.into_iter().map(Tag::from).collect())
    }

    pub async fn tags_by_snippet_id(&self, snippet_id: i32) -> Result<Vec<Tag>, ServiceError> {
        let tags = TagRepository::find_by_snippet_id(self.db.as_ref(), snippet_id)
            .await
            .map_err(map_db_error)?;

        Ok(tags.into_iter().map(Tag::from).collect())
    }

    /// Replaces the snippet's tags with `names` in a single transaction.
    pub async fn associate_tags_with_snippet(
        &self,
        snippet_id: i32,
        names: &[String],
    ) -> Result<(), ServiceError> {
        let txn = self.db.begin().await.map_err(map_db_error)?;
        replace_snippet_tags(&txn, snippet_id, names).await?;
        txn.commit().await.map_err(map_db_error)?;

        debug!(snippet_id, count = names.len(), "replaced snippet tags");
        Ok(())
    }

    /// Drops every association of one snippet. Returns the number removed.
    pub async fn remove_tags_from_snippet(&self, snippet_id: i32) -> Result<u64, ServiceError> {
        TagRepository::delete_links_for_snippet(self.db.as_ref(), snippet_id)
            .await
            .map_err(map_db_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::error::ServiceErrorKind;
    use crate::service::test_support::{insert_snippet, open_test_db};

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn unique_names_collapse_case_and_whitespace() {
        assert_eq!(
            unique_tag_names(&names(&["A", "a", " a ", "B"])),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[tokio::test]
    async fn create_or_find_returns_one_row_per_logical_name() {
        let db = open_test_db().await;
        let service = TagService::new(db);

        let first = service.create_or_find_tag("JavaScript").await.expect("create tag");
        let second = service.create_or_find_tag(" javascript ").await.expect("find tag");

        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "javascript");
    }

    #[tokio::test]
    async fn insert_if_absent_ignores_existing_names() {
        let db = open_test_db().await;
        let first = TagRepository::insert_if_absent(db.as_ref(), "rust", Utc::now().into())
            .await
            .unwrap();
        let second = TagRepository::insert_if_absent(db.as_ref(), "rust", Utc::now().into())
            .await
            .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 0);
    }

    #[tokio::test]
    async fn concurrent_create_or_find_agree_on_one_row() {
        let db = open_test_db().await;

        let (left, right) = tokio::join!(
            create_or_find_tag_with(db.as_ref(), "Tokio"),
            create_or_find_tag_with(db.as_ref(), "tokio "),
        );
        let (left, right) = (left.expect("left writer"), right.expect("right writer"));

        assert_eq!(left.id, right.id);
        let stored = TagRepository::find_by_prefix(db.as_ref(), "tokio", DEFAULT_PREFIX_LIMIT)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn create_or_find_rejects_malformed_names() {
        let db = open_test_db().await;
        let service = TagService::new(db);

        let error = service
            .create_or_find_tag("not allowed!")
            .await
            .expect_err("invalid characters must be rejected");
        assert_eq!(error.kind(), ServiceErrorKind::BadRequest);
        assert_eq!(error.details()[0].field, "tags");
    }

    #[tokio::test]
    async fn prefix_search_is_sorted_capped_and_ignores_blank_input() {
        let db = open_test_db().await;
        let service = TagService::new(db);
        for name in ["javascript", "java", "typescript"] {
            service.create_or_find_tag(name).await.expect("seed tag");
        }

        assert!(service.tags_by_prefix("", DEFAULT_PREFIX_LIMIT).await.unwrap().is_empty());
        assert!(service.tags_by_prefix("   ", DEFAULT_PREFIX_LIMIT).await.unwrap().is_empty());

        let found: Vec<String> = service
            .tags_by_prefix(" JAVA", DEFAULT_PREFIX_LIMIT)
            .await
            .unwrap()
            .into_iter()
            .map(|tag| tag.name)
            .collect();
        assert_eq!(found, vec!["java", "javascript"]);

        let capped = service.tags_by_prefix("j", 1).await.unwrap();
        assert_eq!(capped.len(), 1);
        assert_eq!(capped[0].name, "java");
    }

    #[tokio::test]
    async fn prefix_search_treats_underscore_literally() {
        let db = open_test_db().await;
        let service = TagService::new(db);
        service.create_or_find_tag("a_b").await.unwrap();
        service.create_or_find_tag("axb").await.unwrap();

        let found = service.tags_by_prefix("a_", DEFAULT_PREFIX_LIMIT).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "a_b");
    }

    #[tokio::test]
    async fn association_collapses_duplicates() {
        let db = open_test_db().await;
        let snippet_id = insert_snippet(&db, "dupes").await;
        let service = TagService::new(db);

        service
            .associate_tags_with_snippet(snippet_id, &names(&["A", "a", " a "]))
            .await
            .expect("associate tags");

        let tags = service.tags_by_snippet_id(snippet_id).await.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "a");
    }

    #[tokio::test]
    async fn association_replaces_and_empty_input_clears() {
        let db = open_test_db().await;
        let snippet_id = insert_snippet(&db, "replace").await;
        let service = TagService::new(db);

        service
            .associate_tags_with_snippet(snippet_id, &names(&["c", "a", "b"]))
            .await
            .unwrap();
        let a_id = service.create_or_find_tag("a").await.unwrap().id;
        let ordered: Vec<String> = service
            .tags_by_snippet_id(snippet_id)
            .await
            .unwrap()
            .into_iter()
            .map(|tag| tag.name)
            .collect();
        assert_eq!(ordered, vec!["a", "b", "c"]);

        service
            .associate_tags_with_snippet(snippet_id, &[])
            .await
            .unwrap();
        assert!(service.tags_by_snippet_id(snippet_id).await.unwrap().is_empty());

        // Tag rows survive for reuse.
        assert_eq!(service.create_or_find_tag("A").await.unwrap().id, a_id);
    }

    #[tokio::test]
    async fn failed_association_keeps_previous_tag_set() {
        let db = open_test_db().await;
        let snippet_id = insert_snippet(&db, "atomic").await;
        let service = TagService::new(db);

        service
            .associate_tags_with_snippet(snippet_id, &names(&["keep"]))
            .await
            .unwrap();
        service
            .associate_tags_with_snippet(snippet_id, &names(&["fine", "bad tag"]))
            .await
            .expect_err("invalid tag must abort the replace");

        let tags = service.tags_by_snippet_id(snippet_id).await.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "keep");
        assert!(service.tags_by_prefix("fine", 8).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn removing_tags_only_touches_one_snippet() {
        let db = open_test_db().await;
        let first = insert_snippet(&db, "first").await;
        let second = insert_snippet(&db, "second").await;
        let service = TagService::new(db);

        service
            .associate_tags_with_snippet(first, &names(&["shared", "one"]))
            .await
            .unwrap();
        service
            .associate_tags_with_snippet(second, &names(&["shared"]))
            .await
            .unwrap();

        let removed = service.remove_tags_from_snippet(first).await.unwrap();
        assert_eq!(removed, 2);
        assert!(service.tags_by_snippet_id(first).await.unwrap().is_empty());
        assert_eq!(service.tags_by_snippet_id(second).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_snippet_has_no_tags() {
        let db = open_test_db().await;
        let service = TagService::new(db);
        assert!(service.tags_by_snippet_id(404).await.unwrap().is_empty());
    }
}
