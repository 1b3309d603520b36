//! The mock data source keeps everything in memory. Writes from the news
//! desk last until the process exits.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Clock, ContentStore, StoreError, seed::Seed};
use crate::domain::{ArticleStatus, Event, NewDraft, NewsArticle};

/// An in-memory [`ContentStore`].
pub struct MockStore {
    events: Vec<Event>,
    articles: RwLock<Vec<NewsArticle>>,
    next_article_id: AtomicI64,
    clock: Clock,
}

impl std::fmt::Debug for MockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStore")
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl MockStore {
    /// Creates a store holding the seed's events and articles.
    #[must_use]
    pub fn new(seed: Seed, clock: Clock) -> Self {
        let next_id = seed.articles.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        Self {
            events: seed.events,
            articles: RwLock::new(seed.articles),
            next_article_id: AtomicI64::new(next_id),
            clock,
        }
    }

    fn published_events_sorted(&self) -> Vec<Event> {
        let mut events: Vec<_> = self
            .events
            .iter()
            .filter(|event| event.is_published())
            .cloned()
            .collect();
        // `ORDER BY date ASC` puts undated rows last.
        events.sort_by_key(|event| (event.date.is_none(), event.date));
        events
    }

    async fn published_articles_sorted(&self) -> Vec<NewsArticle> {
        let mut articles: Vec<_> = self
            .articles
            .read()
            .await
            .iter()
            .filter(|article| article.is_published())
            .cloned()
            .collect();
        // `ORDER BY published_at DESC` puts undated rows first.
        articles.sort_by(|a, b| match (a.published_at, b.published_at) {
            (None, None) => std::cmp::Ordering::Equal,
            (None, Some(_)) => std::cmp::Ordering::Less,
            (Some(_), None) => std::cmp::Ordering::Greater,
            (Some(a), Some(b)) => b.cmp(&a),
        });
        articles
    }
}

fn take<T>(items: Vec<T>, limit: u32) -> Vec<T> {
    items
        .into_iter()
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .collect()
}

#[async_trait]
impl ContentStore for MockStore {
    async fn published_events(&self) -> Result<Vec<Event>, StoreError> {
        Ok(self.published_events_sorted())
    }

    async fn upcoming_published_events(&self, limit: u32) -> Result<Vec<Event>, StoreError> {
        let now = (self.clock)();
        let upcoming = self
            .published_events_sorted()
            .into_iter()
            .filter(|event| event.date.is_some_and(|date| date >= now))
            .collect();
        Ok(take(upcoming, limit))
    }

    async fn published_event_by_id(&self, id: i64) -> Result<Option<Event>, StoreError> {
        Ok(self
            .events
            .iter()
            .find(|event| event.id == id && event.is_published())
            .cloned())
    }

    async fn published_event_by_slug(&self, slug: &str) -> Result<Option<Event>, StoreError> {
        Ok(self
            .events
            .iter()
            .find(|event| event.slug.as_deref() == Some(slug) && event.is_published())
            .cloned())
    }

    async fn published_articles(&self, limit: u32) -> Result<Vec<NewsArticle>, StoreError> {
        Ok(take(self.published_articles_sorted().await, limit))
    }

    async fn published_article_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<NewsArticle>, StoreError> {
        Ok(self
            .articles
            .read()
            .await
            .iter()
            .find(|article| article.slug.as_deref() == Some(slug) && article.is_published())
            .cloned())
    }

    async fn all_articles(&self) -> Result<Vec<NewsArticle>, StoreError> {
        Ok(self.articles.read().await.clone())
    }

    async fn article_by_id(&self, id: i64) -> Result<Option<NewsArticle>, StoreError> {
        Ok(self
            .articles
            .read()
            .await
            .iter()
            .find(|article| article.id == id)
            .cloned())
    }

    async fn insert_draft(&self, draft: &NewDraft) -> Result<NewsArticle, StoreError> {
        let now = (self.clock)();
        let article = NewsArticle {
            id: self.next_article_id.fetch_add(1, Ordering::Relaxed),
            title: draft.title.clone(),
            slug: Some(draft.slug.clone()),
            summary: draft.summary.clone(),
            content: draft.content.clone(),
            image_url: None,
            source_url: None,
            author: None,
            published_at: None,
            status: ArticleStatus::Draft,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.articles.write().await.push(article.clone());
        Ok(article)
    }

    async fn save_article(&self, article: &NewsArticle) -> Result<NewsArticle, StoreError> {
        let mut articles = self.articles.write().await;
        let stored = articles
            .iter_mut()
            .find(|stored| stored.id == article.id)
            .ok_or(StoreError::ArticleNotFound(article.id))?;
        let created_at = stored.created_at;
        *stored = NewsArticle {
            created_at,
            updated_at: Some((self.clock)()),
            ..article.clone()
        };
        Ok(stored.clone())
    }

    async fn delete_article(&self, id: i64) -> Result<bool, StoreError> {
        let mut articles = self.articles.write().await;
        let before = articles.len();
        articles.retain(|article| article.id != id);
        Ok(articles.len() != before)
    }
}
