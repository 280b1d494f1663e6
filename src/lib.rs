//! Personal code snippet manager: validated, tagged snippets stored in SQLite
//! and served over a small JSON API.

pub mod app;
pub mod config;
mod handler;
pub mod highlight;
pub mod language;
pub mod logging;
pub mod model;
mod persistence;
mod repository;
pub mod response;
pub mod service;
pub mod storage;
pub mod validation;

pub use app::router;
pub use service::error::{ServiceError, ServiceErrorKind};
pub use service::snippet_service::{SnippetChanges, SnippetOrder, SnippetService};
pub use service::tag_service::TagService;
pub use storage::{Storage, StorageConfig};
