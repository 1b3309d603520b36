use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::instrument;

use super::{Clock, ContentStore, StoreError};
use crate::domain::{ArticleUpdate, NewDraft, NewsArticle, PublishError, UnpublishError, news};

/// Reasons an editorial action was refused or failed.
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    /// A draft needs a topic.
    #[error("Please enter a topic.")]
    EmptyTopic,

    /// The update matches what is stored.
    #[error("No changes detected to save.")]
    NoChanges,

    /// No article has this id.
    #[error("Article {0} not found")]
    NotFound(i64),

    /// The article cannot be published yet.
    #[error(transparent)]
    Publish(#[from] PublishError),

    /// The article cannot return to draft.
    #[error(transparent)]
    Unpublish(#[from] UnpublishError),

    /// The store failed.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for DeskError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::ArticleNotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

impl DeskError {
    /// Whether the request itself was at fault, as opposed to the store.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

/// Editorial actions on news articles.
///
/// Unlike the [`Catalog`](super::Catalog), the desk reports failures so the
/// editor can see them.
#[derive(Clone)]
pub struct NewsDesk {
    store: Arc<dyn ContentStore>,
    clock: Clock,
}

impl std::fmt::Debug for NewsDesk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsDesk").finish_non_exhaustive()
    }
}

impl NewsDesk {
    /// Creates a desk writing to `store`.
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>, clock: Clock) -> Self {
        Self { store, clock }
    }

    async fn load(&self, id: i64) -> Result<NewsArticle, DeskError> {
        self.store
            .article_by_id(id)
            .await?
            .ok_or(DeskError::NotFound(id))
    }

    /// Every article, drafts first and then newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<NewsArticle>, DeskError> {
        let mut articles = self.store.all_articles().await?;
        news::sort_for_desk(&mut articles);
        Ok(articles)
    }

    /// Starts a draft about `topic`.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::EmptyTopic`] for a blank topic, or an error if the
    /// store fails.
    #[instrument(skip(self))]
    pub async fn create_draft(&self, topic: &str) -> Result<NewsArticle, DeskError> {
        if topic.trim().is_empty() {
            return Err(DeskError::EmptyTopic);
        }
        let draft = self.store.insert_draft(&NewDraft::from_topic(topic)).await?;
        tracing::info!(id = draft.id, slug = ?draft.slug, "Draft created");
        Ok(draft)
    }

    /// Saves the fields of `update` that differ from the stored article.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::NoChanges`] when nothing differs,
    /// [`DeskError::NotFound`] for an unknown id, or an error if the store
    /// fails.
    #[instrument(skip(self, update))]
    pub async fn update(&self, id: i64, update: &ArticleUpdate) -> Result<NewsArticle, DeskError> {
        let mut article = self.load(id).await?;
        let changes = update.changes_against(&article);
        if changes.is_empty() {
            return Err(DeskError::NoChanges);
        }
        article.apply(&changes, (self.clock)());
        Ok(self.store.save_article(&article).await?)
    }

    /// Publishes an article, at `at` or now.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Publish`] if the article has no author,
    /// [`DeskError::NotFound`] for an unknown id, or an error if the store
    /// fails.
    #[instrument(skip(self))]
    pub async fn publish(
        &self,
        id: i64,
        at: Option<DateTime<Utc>>,
    ) -> Result<NewsArticle, DeskError> {
        let mut article = self.load(id).await?;
        article.publish(at, (self.clock)())?;
        let saved = self.store.save_article(&article).await?;
        tracing::info!(id, "Article published");
        Ok(saved)
    }

    /// Returns a published article to draft.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Unpublish`] if the article is not published,
    /// [`DeskError::NotFound`] for an unknown id, or an error if the store
    /// fails.
    #[instrument(skip(self))]
    pub async fn unpublish(&self, id: i64) -> Result<NewsArticle, DeskError> {
        let mut article = self.load(id).await?;
        article.unpublish((self.clock)())?;
        Ok(self.store.save_article(&article).await?)
    }

    /// Deletes an article and returns what was deleted.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::NotFound`] for an unknown id, or an error if the
    /// store fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<NewsArticle, DeskError> {
        let article = self.load(id).await?;
        if !self.store.delete_article(id).await? {
            return Err(DeskError::NotFound(id));
        }
        tracing::info!(id, "Article deleted");
        Ok(article)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::{
        domain::ArticleStatus,
        storage::{MockStore, seed::Seed},
    };

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 10, 12, 0, 0).unwrap()
    }

    fn desk() -> NewsDesk {
        let clock: Clock = Arc::new(now);
        NewsDesk::new(
            Arc::new(MockStore::new(Seed::builtin(), clock.clone())),
            clock,
        )
    }

    #[tokio::test]
    async fn list_puts_drafts_first() {
        let articles = desk().list().await.unwrap();
        assert_eq!(articles[0].status, ArticleStatus::Draft);
        assert_eq!(articles[0].id, 4);
    }

    #[tokio::test]
    async fn blank_topic_is_refused() {
        assert!(matches!(
            desk().create_draft("  ").await,
            Err(DeskError::EmptyTopic)
        ));
    }

    #[tokio::test]
    async fn draft_slug_comes_from_topic() {
        let draft = desk().create_draft("Fight Week: What We Learned").await.unwrap();
        assert_eq!(draft.slug.as_deref(), Some("fight-week-what-we-learned"));
        assert_eq!(draft.status, ArticleStatus::Draft);
    }

    #[tokio::test]
    async fn publishing_needs_an_author() {
        let desk = desk();

        let error = desk.publish(4, None).await.unwrap_err();
        assert_eq!(error.to_string(), "An author is required before publishing");
        assert_eq!(desk.load(4).await.unwrap().status, ArticleStatus::Draft);

        desk.update(
            4,
            &ArticleUpdate {
                author: Some(Some("Jane Doe".to_string())),
                ..ArticleUpdate::default()
            },
        )
        .await
        .unwrap();
        let published = desk.publish(4, None).await.unwrap();

        assert_eq!(published.status, ArticleStatus::Published);
        assert_eq!(published.published_at, Some(now()));
    }

    #[tokio::test]
    async fn unchanged_update_is_refused() {
        let desk = desk();
        let article = desk.load(1).await.unwrap();
        let update = ArticleUpdate {
            title: Some(article.title.clone()),
            ..ArticleUpdate::default()
        };

        let error = desk.update(1, &update).await.unwrap_err();
        assert_eq!(error.to_string(), "No changes detected to save.");
    }

    #[tokio::test]
    async fn unpublish_only_published() {
        let desk = desk();
        assert!(matches!(
            desk.unpublish(4).await,
            Err(DeskError::Unpublish(_))
        ));

        let article = desk.unpublish(1).await.unwrap();
        assert_eq!(article.status, ArticleStatus::Draft);
        assert_eq!(article.published_at, None);
    }

    #[tokio::test]
    async fn delete_unknown_article() {
        let error = desk().delete(99).await.unwrap_err();
        assert!(matches!(error, DeskError::NotFound(99)));
        assert!(error.is_rejection());
    }

    #[tokio::test]
    async fn deleted_article_is_gone() {
        let desk = desk();
        let deleted = desk.delete(2).await.unwrap();
        assert_eq!(deleted.id, 2);
        assert!(matches!(desk.load(2).await, Err(DeskError::NotFound(2))));
    }
}
