//! Content storage.
//!
//! A [`ContentStore`] reads and writes the `events` and `news_articles`
//! records. Two stores exist: [`MockStore`], holding the seed content in
//! memory, and [`PgStore`], backed by `PostgreSQL`. Pages never call a store
//! directly; they go through the [`Catalog`], which applies the
//! published-only rules and turns storage failures into empty results.

use async_trait::async_trait;

use crate::domain::{Event, NewDraft, NewsArticle};

mod catalog;
pub use catalog::{Catalog, Clock, system_clock};

mod desk;
pub use desk::{DeskError, NewsDesk};

/// In-memory store.
pub mod mock;
pub use mock::MockStore;

mod postgres;
pub use postgres::PgStore;

/// Built-in content.
pub mod seed;

/// Read and write access to site content.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Published events, date ascending.
    async fn published_events(&self) -> Result<Vec<Event>, StoreError>;

    /// Published events dated now or later, date ascending.
    async fn upcoming_published_events(&self, limit: u32) -> Result<Vec<Event>, StoreError>;

    /// The published event with this id.
    async fn published_event_by_id(&self, id: i64) -> Result<Option<Event>, StoreError>;

    /// The published event with this slug.
    async fn published_event_by_slug(&self, slug: &str) -> Result<Option<Event>, StoreError>;

    /// Published articles, newest first.
    async fn published_articles(&self, limit: u32) -> Result<Vec<NewsArticle>, StoreError>;

    /// The published article with this slug.
    async fn published_article_by_slug(&self, slug: &str)
    -> Result<Option<NewsArticle>, StoreError>;

    /// Every article in any state.
    async fn all_articles(&self) -> Result<Vec<NewsArticle>, StoreError>;

    /// The article with this id, in any state.
    async fn article_by_id(&self, id: i64) -> Result<Option<NewsArticle>, StoreError>;

    /// Stores a new draft and returns it with its assigned id.
    async fn insert_draft(&self, draft: &NewDraft) -> Result<NewsArticle, StoreError>;

    /// Writes every editable field and the status of an existing article.
    async fn save_article(&self, article: &NewsArticle) -> Result<NewsArticle, StoreError>;

    /// Removes an article. Returns whether it existed.
    async fn delete_article(&self, id: i64) -> Result<bool, StoreError>;
}

/// Errors raised by a [`ContentStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The table has not been created yet.
    #[error("relation \"{0}\" does not exist")]
    MissingRelation(String),

    /// The article does not exist.
    #[error("Article {0} not found")]
    ArticleNotFound(i64),

    /// A stored value could not be read back.
    #[error("Invalid {column} value '{value}'")]
    InvalidColumn {
        /// Offending column.
        column: &'static str,
        /// Stored value.
        value: String,
    },

    /// Any other database failure.
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    /// Whether this error means the schema is not there yet.
    #[must_use]
    pub const fn is_missing_relation(&self) -> bool {
        matches!(self, Self::MissingRelation(_))
    }
}

/// `PostgreSQL` error code for an undefined table.
const UNDEFINED_TABLE: &str = "42P01";

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &error {
            if db.code().as_deref() == Some(UNDEFINED_TABLE) {
                let relation = missing_relation(db.message()).unwrap_or_default();
                return Self::MissingRelation(relation);
            }
        }
        match missing_relation(&error.to_string()) {
            Some(relation) => Self::MissingRelation(relation),
            None => Self::Database(error),
        }
    }
}

/// Extracts `name` from a `relation "name" does not exist` message.
fn missing_relation(message: &str) -> Option<String> {
    let (_, rest) = message.split_once("relation \"")?;
    let (name, tail) = rest.split_once('"')?;
    tail.trim_start()
        .starts_with("does not exist")
        .then(|| name.to_string())
}
