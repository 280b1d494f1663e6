pub mod error;
pub mod snippet_service;
pub mod tag_service;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::language::Language;
    use crate::persistence::SnippetActiveModel;
    use crate::repository::snippet_repository::SnippetRepository;
    use crate::storage::{Storage, StorageConfig};
    use chrono::Utc;
    use sea_orm::{ActiveValue::Set, DatabaseConnection};
    use std::sync::Arc;

    pub(crate) async fn open_test_db() -> Arc<DatabaseConnection> {
        Storage::open(StorageConfig::in_memory())
            .await
            .expect("open in-memory storage")
            .connection()
    }

    /// Inserts a bare snippet row without tags and returns its id.
    pub(crate) async fn insert_snippet(db: &DatabaseConnection, title: &str) -> i32 {
        let now = Utc::now().into();
        let active_model = SnippetActiveModel {
            title: Set(title.to_string()),
            content: Set("fn main() {}".to_string()),
            language: Set(Language::Rust),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        SnippetRepository::insert(db, active_model)
            .await
            .expect("insert snippet")
            .id
    }
}
