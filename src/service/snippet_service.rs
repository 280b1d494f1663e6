use crate::model::{Snippet, SnippetWithTags};
use crate::persistence::{SnippetActiveModel, SnippetColumn, SnippetModel, TagModel};
use crate::repository::snippet_repository::SnippetRepository;
use crate::repository::tag_repository::TagRepository;
use crate::service::error::{ServiceError, map_db_error};
use crate::service::tag_service::replace_snippet_tags;
use crate::validation::{
    MAX_TAGS_PER_SNIPPET, SnippetDraft, ValidationError, normalize_line_endings,
    normalize_tag_name, validate_content, validate_language, validate_snippet_data,
    validate_tag_count, validate_tag_names, validate_title,
};
use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ConnectionTrait, DatabaseConnection, IntoActiveModel, TransactionTrait,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Sort key for [`SnippetService::list`]. Both orders are newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnippetOrder {
    #[default]
    Created,
    Updated,
}

impl SnippetOrder {
    fn column(self) -> SnippetColumn {
        match self {
            Self::Created => SnippetColumn::CreatedAt,
            Self::Updated => SnippetColumn::UpdatedAt,
        }
    }
}

/// Partial update. Absent fields are left untouched; `tags: Some(vec![])`
/// clears the tag set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnippetChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub language: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl SnippetChanges {
    pub(crate) fn validation_errors(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if let Some(title) = self.title.as_deref() {
            errors.extend(validate_title(Some(title)).err());
        }
        if let Some(content) = self.content.as_deref() {
            errors.extend(validate_content(Some(content)).err());
        }
        if let Some(language) = self.language.as_deref() {
            errors.extend(validate_language(Some(language)).err());
        }
        if let Some(tags) = self.tags.as_deref() {
            errors.extend(validate_tag_names(tags));
            if tags.len() > MAX_TAGS_PER_SNIPPET {
                errors.push(ValidationError::TooManyTags);
            }
        }
        errors
    }
}

#[derive(Clone)]
pub struct SnippetService {
    db: Arc<DatabaseConnection>,
}

impl SnippetService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Validates every field, then inserts the row and its tags as one unit.
    pub async fn create(&self, draft: SnippetDraft) -> Result<SnippetWithTags, ServiceError> {
        let mut errors = validate_snippet_data(&draft);
        if let Some(tags) = draft.tags.as_deref().filter(|tags| !tags.is_empty()) {
            errors.extend(validate_tag_names(tags));
            errors.extend(validate_tag_count(tags.len()).err());
        }
        if !errors.is_empty() {
            return Err(ServiceError::validation(errors));
        }

        let language = validate_language(draft.language.as_deref())?;
        let tags = draft.tags.unwrap_or_default();
        let now = Utc::now().into();
        let active_model = SnippetActiveModel {
            title: Set(draft.title.unwrap_or_default()),
            content: Set(normalize_line_endings(
                draft.content.as_deref().unwrap_or_default(),
            )),
            language: Set(language),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let txn = self.db.begin().await.map_err(map_db_error)?;
        let model = SnippetRepository::insert(&txn, active_model)
            .await
            .map_err(map_db_error)?;
        replace_snippet_tags(&txn, model.id, &tags).await?;
        let snippet = with_tags(&txn, model).await?;
        txn.commit().await.map_err(map_db_error)?;

        info!(snippet_id = snippet.id, tags = snippet.tag_list.len(), "created snippet");
        Ok(snippet)
    }

    pub async fn get(&self, id: i32) -> Result<Option<SnippetWithTags>, ServiceError> {
        let Some(model) = SnippetRepository::find_by_id(self.db.as_ref(), id)
            .await
            .map_err(map_db_error)?
        else {
            return Ok(None);
        };

        with_tags(self.db.as_ref(), model).await.map(Some)
    }

    pub async fn list(&self, order: SnippetOrder) -> Result<Vec<SnippetWithTags>, ServiceError> {
        let models = SnippetRepository::list_newest_first(self.db.as_ref(), order.column())
            .await
            .map_err(map_db_error)?;
        let mut tags = tags_by_snippet(self.db.as_ref(), &models).await?;

        Ok(models
            .into_iter()
            .map(|model| {
                let snippet_tags = tags.remove(&model.id).unwrap_or_default();
                SnippetWithTags::from_model(model, snippet_tags)
            })
            .collect())
    }

    /// Applies the present fields. Returns `None` when the id is unknown.
    pub async fn update(
        &self,
        id: i32,
        changes: SnippetChanges,
    ) -> Result<Option<SnippetWithTags>, ServiceError> {
        let errors = changes.validation_errors();
        if !errors.is_empty() {
            return Err(ServiceError::validation(errors));
        }

        let txn = self.db.begin().await.map_err(map_db_error)?;
        let Some(existing) = SnippetRepository::find_by_id(&txn, id)
            .await
            .map_err(map_db_error)?
        else {
            return Ok(None);
        };

        let mut active_model = existing.into_active_model();
        if let Some(title) = changes.title {
            active_model.title = Set(title);
        }
        if let Some(content) = changes.content.as_deref() {
            active_model.content = Set(normalize_line_endings(content));
        }
        if let Some(language) = changes.language.as_deref() {
            active_model.language = Set(validate_language(Some(language))?);
        }
        active_model.updated_at = Set(Utc::now().into());

        let model = SnippetRepository::update(&txn, active_model)
            .await
            .map_err(map_db_error)?;
        if let Some(tags) = changes.tags.as_deref() {
            replace_snippet_tags(&txn, id, tags).await?;
        }
        let snippet = with_tags(&txn, model).await?;
        txn.commit().await.map_err(map_db_error)?;

        info!(snippet_id = id, "updated snippet");
        Ok(Some(snippet))
    }

    /// Removes the snippet and its tag links. Tag rows are kept for reuse.
    pub async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let txn = self.db.begin().await.map_err(map_db_error)?;
        let links = TagRepository::delete_links_for_snippet(&txn, id)
            .await
            .map_err(map_db_error)?;
        let rows = SnippetRepository::delete_by_id(&txn, id)
            .await
            .map_err(map_db_error)?;
        txn.commit().await.map_err(map_db_error)?;

        if rows > 0 {
            info!(snippet_id = id, links, "deleted snippet");
        }
        Ok(rows > 0)
    }

    /// Snippets with a tag containing any of `terms`, most recently updated
    /// first. Blank terms are ignored.
    pub async fn search_by_tags(&self, terms: &[String]) -> Result<Vec<Snippet>, ServiceError> {
        let mut normalized: Vec<String> = Vec::with_capacity(terms.len());
        for term in terms {
            let term = normalize_tag_name(term);
            if !term.is_empty() && !normalized.contains(&term) {
                normalized.push(term);
            }
        }
        if normalized.is_empty() {
            return Ok(Vec::new());
        }

        let models = SnippetRepository::find_by_tag_substrings(self.db.as_ref(), &normalized)
            .await
            .map_err(map_db_error)?;
        debug!(terms = ?normalized, hits = models.len(), "tag search");

        self.with_legacy_tags(models).await
    }

    pub async fn filter_by_language(&self, language: &str) -> Result<Vec<Snippet>, ServiceError> {
        let language = validate_language(Some(language))?;
        let models = SnippetRepository::find_by_language(self.db.as_ref(), language)
            .await
            .map_err(map_db_error)?;

        self.with_legacy_tags(models).await
    }

    async fn with_legacy_tags(
        &self,
        models: Vec<SnippetModel>,
    ) -> Result<Vec<Snippet>, ServiceError> {
        let tags = tags_by_snippet(self.db.as_ref(), &models).await?;

        Ok(models
            .into_iter()
            .map(|model| {
                let snippet_tags = tags.get(&model.id).map(Vec::as_slice).unwrap_or_default();
                Snippet::from_model(model, snippet_tags)
            })
            .collect())
    }
}

async fn with_tags<C>(db: &C, model: SnippetModel) -> Result<SnippetWithTags, ServiceError>
where
    C: ConnectionTrait,
{
    let tags = TagRepository::find_by_snippet_id(db, model.id)
        .await
        .map_err(map_db_error)?;
    Ok(SnippetWithTags::from_model(model, tags))
}

/// Tags of every snippet in `models`, grouped by snippet id and sorted by name.
async fn tags_by_snippet<C>(
    db: &C,
    models: &[SnippetModel],
) -> Result<HashMap<i32, Vec<TagModel>>, ServiceError>
where
    C: ConnectionTrait,
{
    let ids: Vec<i32> = models.iter().map(|model| model.id).collect();
    let pairs = TagRepository::find_by_snippet_ids(db, &ids)
        .await
        .map_err(map_db_error)?;

    let mut grouped: HashMap<i32, Vec<TagModel>> = HashMap::with_capacity(ids.len());
    for (snippet_id, tag) in pairs {
        grouped.entry(snippet_id).or_default().push(tag);
    }
    Ok(grouped)
}
