use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use tracing::instrument;

use super::{ContentStore, StoreError};
use crate::domain::{Event, Fighter, NewsArticle};

/// Source of the current time.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The wall clock.
#[must_use]
pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// Read access to published content.
///
/// Every fetch is an independent read. A failing store never fails the
/// caller: the failure is logged and the fetch returns an empty list or
/// `None`.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn ContentStore>,
    fighters: Arc<[Fighter]>,
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("fighters", &self.fighters.len())
            .finish_non_exhaustive()
    }
}

/// Unwraps a store result, logging and defaulting on failure.
fn or_empty<T: Default>(operation: &'static str, result: Result<T, StoreError>) -> T {
    match result {
        Ok(value) => value,
        Err(StoreError::MissingRelation(relation)) => {
            tracing::info!(
                operation,
                %relation,
                "Table does not exist yet; returning no results"
            );
            T::default()
        }
        Err(error) => {
            tracing::error!(operation, %error, "Content fetch failed");
            T::default()
        }
    }
}

impl Catalog {
    /// Creates a catalog over `store` with a fixed fighter roster.
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>, fighters: Vec<Fighter>) -> Self {
        Self {
            store,
            fighters: fighters.into(),
        }
    }

    /// The underlying store, for editorial writes.
    #[must_use]
    pub fn store(&self) -> Arc<dyn ContentStore> {
        Arc::clone(&self.store)
    }

    /// All published events, date ascending.
    #[instrument(skip(self))]
    pub async fn fetch_published_events(&self) -> Vec<Event> {
        or_empty(
            "fetch_published_events",
            self.store.published_events().await,
        )
    }

    /// Published events dated now or later, date ascending.
    #[instrument(skip(self))]
    pub async fn fetch_upcoming_published_events(&self, limit: u32) -> Vec<Event> {
        or_empty(
            "fetch_upcoming_published_events",
            self.store.upcoming_published_events(limit).await,
        )
    }

    /// The published event with this id.
    ///
    /// Ids of zero or less are never looked up.
    #[instrument(skip(self))]
    pub async fn fetch_published_event_by_id(&self, id: i64) -> Option<Event> {
        if id <= 0 {
            tracing::warn!(id, "Invalid event id requested");
            return None;
        }
        or_empty(
            "fetch_published_event_by_id",
            self.store.published_event_by_id(id).await,
        )
    }

    /// The published event with this slug.
    #[instrument(skip(self))]
    pub async fn fetch_published_event_by_slug(&self, slug: &str) -> Option<Event> {
        or_empty(
            "fetch_published_event_by_slug",
            self.store.published_event_by_slug(slug).await,
        )
    }

    /// Published articles, newest first.
    #[instrument(skip(self))]
    pub async fn fetch_published_articles(&self, limit: u32) -> Vec<NewsArticle> {
        or_empty(
            "fetch_published_articles",
            self.store.published_articles(limit).await,
        )
    }

    /// The published article with this slug.
    #[instrument(skip(self))]
    pub async fn fetch_published_article_by_slug(&self, slug: &str) -> Option<NewsArticle> {
        or_empty(
            "fetch_published_article_by_slug",
            self.store.published_article_by_slug(slug).await,
        )
    }

    /// The newest published articles for the homepage.
    #[instrument(skip(self))]
    pub async fn fetch_latest_news(&self, limit: u32) -> Vec<NewsArticle> {
        or_empty("fetch_latest_news", self.store.published_articles(limit).await)
    }

    /// Looks an event up by numeric id or by slug.
    pub async fn find_event(&self, key: &str) -> Option<Event> {
        match key.parse::<i64>() {
            Ok(id) => self.fetch_published_event_by_id(id).await,
            Err(_) => self.fetch_published_event_by_slug(key).await,
        }
    }

    /// The fighter roster.
    #[must_use]
    pub fn fighters(&self) -> &[Fighter] {
        &self.fighters
    }

    /// The fighter with this id.
    #[must_use]
    pub fn fighter(&self, id: i64) -> Option<&Fighter> {
        self.fighters.iter().find(|fighter| fighter.id == id)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::TimeZone;

    use super::*;
    use crate::{
        domain::NewDraft,
        storage::{MockStore, seed::Seed},
    };

    /// A store whose every call fails with the configured message.
    struct FailingStore(&'static str);

    impl FailingStore {
        fn error(&self) -> StoreError {
            sqlx::Error::Protocol(self.0.to_string()).into()
        }
    }

    #[async_trait]
    impl ContentStore for FailingStore {
        async fn published_events(&self) -> Result<Vec<Event>, StoreError> {
            Err(self.error())
        }
        async fn upcoming_published_events(&self, _: u32) -> Result<Vec<Event>, StoreError> {
            Err(self.error())
        }
        async fn published_event_by_id(&self, _: i64) -> Result<Option<Event>, StoreError> {
            Err(self.error())
        }
        async fn published_event_by_slug(&self, _: &str) -> Result<Option<Event>, StoreError> {
            Err(self.error())
        }
        async fn published_articles(&self, _: u32) -> Result<Vec<NewsArticle>, StoreError> {
            Err(self.error())
        }
        async fn published_article_by_slug(
            &self,
            _: &str,
        ) -> Result<Option<NewsArticle>, StoreError> {
            Err(self.error())
        }
        async fn all_articles(&self) -> Result<Vec<NewsArticle>, StoreError> {
            Err(self.error())
        }
        async fn article_by_id(&self, _: i64) -> Result<Option<NewsArticle>, StoreError> {
            Err(self.error())
        }
        async fn insert_draft(&self, _: &NewDraft) -> Result<NewsArticle, StoreError> {
            Err(self.error())
        }
        async fn save_article(&self, _: &NewsArticle) -> Result<NewsArticle, StoreError> {
            Err(self.error())
        }
        async fn delete_article(&self, _: i64) -> Result<bool, StoreError> {
            Err(self.error())
        }
    }

    /// Counts lookups so short-circuits can be observed.
    #[derive(Default)]
    struct CountingStore(std::sync::atomic::AtomicUsize);

    #[async_trait]
    impl ContentStore for CountingStore {
        async fn published_events(&self) -> Result<Vec<Event>, StoreError> {
            Ok(Vec::new())
        }
        async fn upcoming_published_events(&self, _: u32) -> Result<Vec<Event>, StoreError> {
            Ok(Vec::new())
        }
        async fn published_event_by_id(&self, _: i64) -> Result<Option<Event>, StoreError> {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(None)
        }
        async fn published_event_by_slug(&self, _: &str) -> Result<Option<Event>, StoreError> {
            Ok(None)
        }
        async fn published_articles(&self, _: u32) -> Result<Vec<NewsArticle>, StoreError> {
            Ok(Vec::new())
        }
        async fn published_article_by_slug(
            &self,
            _: &str,
        ) -> Result<Option<NewsArticle>, StoreError> {
            Ok(None)
        }
        async fn all_articles(&self) -> Result<Vec<NewsArticle>, StoreError> {
            Ok(Vec::new())
        }
        async fn article_by_id(&self, _: i64) -> Result<Option<NewsArticle>, StoreError> {
            Ok(None)
        }
        async fn insert_draft(&self, _: &NewDraft) -> Result<NewsArticle, StoreError> {
            Err(StoreError::ArticleNotFound(0))
        }
        async fn save_article(&self, a: &NewsArticle) -> Result<NewsArticle, StoreError> {
            Err(StoreError::ArticleNotFound(a.id))
        }
        async fn delete_article(&self, _: i64) -> Result<bool, StoreError> {
            Ok(false)
        }
    }

    fn failing(message: &'static str) -> Catalog {
        Catalog::new(Arc::new(FailingStore(message)), Vec::new())
    }

    fn mock() -> Catalog {
        let now = Utc.with_ymd_and_hms(2025, 4, 10, 0, 0, 0).unwrap();
        let seed = Seed::builtin();
        let fighters = seed.fighters.clone();
        Catalog::new(Arc::new(MockStore::new(seed, Arc::new(move || now))), fighters)
    }

    #[tokio::test]
    async fn missing_news_table_gives_empty_latest_news() {
        let catalog = failing("relation \"news_articles\" does not exist");
        assert!(catalog.fetch_latest_news(4).await.is_empty());
        assert!(catalog.fetch_published_articles(10).await.is_empty());
        assert!(catalog.fetch_published_article_by_slug("x").await.is_none());
    }

    #[tokio::test]
    async fn any_store_failure_degrades_to_empty() {
        let catalog = failing("connection reset by peer");
        assert!(catalog.fetch_published_events().await.is_empty());
        assert!(catalog.fetch_upcoming_published_events(5).await.is_empty());
        assert!(catalog.fetch_published_event_by_id(1).await.is_none());
        assert!(catalog.fetch_published_event_by_slug("ufc-298").await.is_none());
    }

    #[tokio::test]
    async fn non_positive_ids_skip_the_store() {
        let store = Arc::new(CountingStore::default());
        let catalog = Catalog::new(store.clone(), Vec::new());

        assert!(catalog.fetch_published_event_by_id(0).await.is_none());
        assert!(catalog.fetch_published_event_by_id(-3).await.is_none());
        assert_eq!(store.0.load(std::sync::atomic::Ordering::SeqCst), 0);

        catalog.fetch_published_event_by_id(7).await;
        assert_eq!(store.0.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_event_is_none() {
        assert!(mock().fetch_published_event_by_id(42).await.is_none());
    }

    #[tokio::test]
    async fn events_found_by_id_or_slug() {
        let catalog = mock();
        assert_eq!(catalog.find_event("2").await.map(|e| e.id), Some(2));
        assert_eq!(catalog.find_event("ufc-298").await.map(|e| e.id), Some(1));
        assert!(catalog.find_event("ufc-299").await.is_none());
    }

    #[tokio::test]
    async fn latest_news_is_limited() {
        assert_eq!(mock().fetch_latest_news(2).await.len(), 2);
    }

    #[test]
    fn fighter_lookup() {
        let catalog = mock();
        assert_eq!(catalog.fighters().len(), 6);
        assert_eq!(catalog.fighter(3).map(|f| f.record.as_str()), Some("22-3-1"));
        assert!(catalog.fighter(7).is_none());
    }
}
