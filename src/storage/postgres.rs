use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, postgres::PgPoolOptions, types::Json};
use tracing::instrument;

use super::{ContentStore, StoreError};
use crate::domain::{ArticleStatus, Event, EventStatus, NewDraft, NewsArticle, event};

const EVENT_COLUMNS: &str = "id, league, event_name, slug, main_card, date, location, \
     how_to_watch, how_to_watch_url, ticket_link, image_url, status, created_at, updated_at, \
     fight_card";

const ARTICLE_COLUMNS: &str = "id, title, slug, summary, content, image_url, source_url, author, \
     published_at, status, created_at, updated_at";

/// A [`ContentStore`] backed by `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a pool for `url`.
    ///
    /// Connections are opened on first use, so an unreachable database only
    /// shows up as failed (and logged) reads.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is malformed.
    pub fn connect_lazy(url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_lazy(url)
            .map_err(StoreError::from)?;
        Ok(Self::new(pool))
    }
}

#[derive(Debug, FromRow)]
struct EventRow {
    id: i64,
    league: String,
    event_name: Option<String>,
    slug: Option<String>,
    main_card: Option<String>,
    date: Option<DateTime<Utc>>,
    location: Option<String>,
    how_to_watch: Option<String>,
    how_to_watch_url: Option<String>,
    ticket_link: Option<String>,
    image_url: Option<String>,
    status: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    fight_card: Option<Json<serde_json::Value>>,
}

impl TryFrom<EventRow> for Event {
    type Error = StoreError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let status = match row.status.as_str() {
            "PUBLISHED" => EventStatus::Published,
            "DRAFT" => EventStatus::Draft,
            _ => {
                return Err(StoreError::InvalidColumn {
                    column: "events.status",
                    value: row.status,
                });
            }
        };
        Ok(Self {
            id: row.id,
            league: row.league,
            event_name: row.event_name,
            slug: row.slug,
            main_card: row.main_card,
            date: row.date,
            location: row.location,
            how_to_watch: row.how_to_watch,
            how_to_watch_url: row.how_to_watch_url,
            ticket_link: row.ticket_link,
            image_url: row.image_url,
            status,
            description: None,
            created_at: row.created_at,
            updated_at: row.updated_at,
            fight_card: row
                .fight_card
                .map(|Json(card)| event::decode_fight_card(card))
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug, FromRow)]
struct ArticleRow {
    id: i64,
    title: String,
    slug: Option<String>,
    summary: Option<String>,
    content: Option<String>,
    image_url: Option<String>,
    source_url: Option<String>,
    author: Option<String>,
    published_at: Option<DateTime<Utc>>,
    status: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<ArticleRow> for NewsArticle {
    type Error = StoreError;

    fn try_from(row: ArticleRow) -> Result<Self, Self::Error> {
        let status = ArticleStatus::from_column(&row.status).ok_or_else(|| {
            StoreError::InvalidColumn {
                column: "news_articles.status",
                value: row.status.clone(),
            }
        })?;
        Ok(Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            summary: row.summary,
            content: row.content,
            image_url: row.image_url,
            source_url: row.source_url,
            author: row.author,
            published_at: row.published_at,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn convert<R, T>(rows: Vec<R>) -> Result<Vec<T>, StoreError>
where
    T: TryFrom<R, Error = StoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}

#[async_trait]
impl ContentStore for PgStore {
    #[instrument(skip(self))]
    async fn published_events(&self) -> Result<Vec<Event>, StoreError> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE status = 'PUBLISHED' ORDER BY date ASC"
        );
        let rows: Vec<EventRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        convert(rows)
    }

    #[instrument(skip(self))]
    async fn upcoming_published_events(&self, limit: u32) -> Result<Vec<Event>, StoreError> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE status = 'PUBLISHED' AND date >= NOW() \
             ORDER BY date ASC LIMIT $1"
        );
        let rows: Vec<EventRow> = sqlx::query_as(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;
        convert(rows)
    }

    #[instrument(skip(self))]
    async fn published_event_by_id(&self, id: i64) -> Result<Option<Event>, StoreError> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE status = 'PUBLISHED' AND id = $1 LIMIT 1"
        );
        let row: Option<EventRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Event::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn published_event_by_slug(&self, slug: &str) -> Result<Option<Event>, StoreError> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE status = 'PUBLISHED' AND slug = $1 LIMIT 1"
        );
        let row: Option<EventRow> = sqlx::query_as(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Event::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn published_articles(&self, limit: u32) -> Result<Vec<NewsArticle>, StoreError> {
        let sql = format!(
            "SELECT {ARTICLE_COLUMNS} FROM news_articles WHERE status = 'published' \
             ORDER BY published_at DESC LIMIT $1"
        );
        let rows: Vec<ArticleRow> = sqlx::query_as(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;
        convert(rows)
    }

    #[instrument(skip(self))]
    async fn published_article_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<NewsArticle>, StoreError> {
        let sql = format!(
            "SELECT {ARTICLE_COLUMNS} FROM news_articles WHERE status = 'published' AND slug = $1 \
             LIMIT 1"
        );
        let row: Option<ArticleRow> = sqlx::query_as(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        row.map(NewsArticle::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn all_articles(&self) -> Result<Vec<NewsArticle>, StoreError> {
        let sql = format!(
            "SELECT {ARTICLE_COLUMNS} FROM news_articles \
             ORDER BY (status = 'draft') DESC, created_at DESC"
        );
        let rows: Vec<ArticleRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        convert(rows)
    }

    #[instrument(skip(self))]
    async fn article_by_id(&self, id: i64) -> Result<Option<NewsArticle>, StoreError> {
        let sql = format!("SELECT {ARTICLE_COLUMNS} FROM news_articles WHERE id = $1");
        let row: Option<ArticleRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(NewsArticle::try_from).transpose()
    }

    #[instrument(skip(self, draft), fields(slug = %draft.slug))]
    async fn insert_draft(&self, draft: &NewDraft) -> Result<NewsArticle, StoreError> {
        let sql = format!(
            "INSERT INTO news_articles (title, slug, summary, content, status, created_at, \
             updated_at) VALUES ($1, $2, $3, $4, 'draft', NOW(), NOW()) \
             RETURNING {ARTICLE_COLUMNS}"
        );
        let row: ArticleRow = sqlx::query_as(&sql)
            .bind(&draft.title)
            .bind(&draft.slug)
            .bind(&draft.summary)
            .bind(&draft.content)
            .fetch_one(&self.pool)
            .await?;
        row.try_into()
    }

    #[instrument(skip(self, article), fields(id = article.id))]
    async fn save_article(&self, article: &NewsArticle) -> Result<NewsArticle, StoreError> {
        let sql = format!(
            "UPDATE news_articles SET title = $2, slug = $3, summary = $4, content = $5, \
             image_url = $6, source_url = $7, author = $8, published_at = $9, status = $10, \
             updated_at = NOW() WHERE id = $1 RETURNING {ARTICLE_COLUMNS}"
        );
        let row: Option<ArticleRow> = sqlx::query_as(&sql)
            .bind(article.id)
            .bind(&article.title)
            .bind(&article.slug)
            .bind(&article.summary)
            .bind(&article.content)
            .bind(&article.image_url)
            .bind(&article.source_url)
            .bind(&article.author)
            .bind(article.published_at)
            .bind(article.status.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or(StoreError::ArticleNotFound(article.id))?
            .try_into()
    }

    #[instrument(skip(self))]
    async fn delete_article(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM news_articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
