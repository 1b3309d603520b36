//! News articles and their editorial lifecycle.

use std::fmt;

use chrono::{DateTime, Utc};
use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

use crate::domain::slug::generate_slug;

/// Editorial state of an article.
///
/// Stored lower-case in the `news_articles.status` column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    /// Being written or reviewed.
    #[default]
    Draft,
    /// Live on the site.
    Published,
    /// Retired from the site.
    Archived,
}

impl ArticleStatus {
    /// The column value for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }

    /// Parses a column value.
    #[must_use]
    pub fn from_column(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A news article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    /// Datastore identifier.
    pub id: i64,
    /// Headline.
    pub title: String,
    /// URL slug.
    #[serde(default)]
    pub slug: Option<String>,
    /// Teaser shown in listings.
    #[serde(default)]
    pub summary: Option<String>,
    /// Body text. Paragraphs are separated by blank lines.
    #[serde(default)]
    pub content: Option<String>,
    /// Lead image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Where the story was first reported.
    #[serde(default)]
    pub source_url: Option<String>,
    /// Byline. Required to publish.
    #[serde(default)]
    pub author: Option<String>,
    /// When the article went live.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Editorial state.
    #[serde(default)]
    pub status: ArticleStatus,
    /// Row creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Row modification time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Reasons an article cannot be published.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublishError {
    /// The byline is missing or blank.
    #[error("An author is required before publishing")]
    MissingAuthor,
}

/// Reasons an article cannot return to draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnpublishError {
    /// Only published articles can be unpublished.
    #[error("Only published articles can be unpublished (status is {0})")]
    NotPublished(ArticleStatus),
}

impl NewsArticle {
    /// The slug to link to, derived from the title when none is stored.
    #[must_use]
    pub fn link_slug(&self) -> String {
        self.slug
            .as_deref()
            .filter(|slug| !slug.is_empty())
            .map_or_else(|| generate_slug(&self.title), ToString::to_string)
    }

    /// Body split into paragraphs on blank lines.
    #[must_use]
    pub fn paragraphs(&self) -> Vec<&str> {
        self.content
            .as_deref()
            .unwrap_or_default()
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }

    /// Whether the article is live.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status == ArticleStatus::Published
    }

    /// Whether the publish action is available.
    ///
    /// Publishing is only offered once the byline is non-empty.
    #[must_use]
    pub fn can_publish(&self) -> bool {
        self.byline().is_ok()
    }

    /// The trimmed byline.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::MissingAuthor`] if the byline is missing or
    /// blank.
    pub fn byline(&self) -> Result<NonEmptyString, PublishError> {
        let author = self.author.as_deref().map(str::trim).unwrap_or_default();
        NonEmptyString::new(author.to_string()).map_err(|_| PublishError::MissingAuthor)
    }

    fn has_slug(&self) -> bool {
        self.slug.as_deref().is_some_and(|slug| !slug.trim().is_empty())
    }

    /// Moves the article to published.
    ///
    /// The publish time is `at` when given, otherwise `now`. The byline is
    /// stored trimmed, and an article without a slug gets one from its
    /// title.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::MissingAuthor`] if the byline is blank. The
    /// article is left untouched in that case.
    pub fn publish(
        &mut self,
        at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<(), PublishError> {
        let byline = self.byline()?;
        self.author = Some(byline.as_str().to_string());
        if !self.has_slug() {
            self.slug = Some(generate_slug(&self.title));
        }
        self.status = ArticleStatus::Published;
        self.published_at = Some(at.unwrap_or(now));
        self.updated_at = Some(now);
        Ok(())
    }

    /// Returns a published article to draft and clears its publish time.
    ///
    /// # Errors
    ///
    /// Returns [`UnpublishError::NotPublished`] for drafts and archived
    /// articles.
    pub fn unpublish(&mut self, now: DateTime<Utc>) -> Result<(), UnpublishError> {
        if self.status != ArticleStatus::Published {
            return Err(UnpublishError::NotPublished(self.status));
        }
        self.status = ArticleStatus::Draft;
        self.published_at = None;
        self.updated_at = Some(now);
        Ok(())
    }

    /// Applies the fields present in `update`.
    ///
    /// A published article keeps a slug: clearing it derives a new one from
    /// the title.
    pub fn apply(&mut self, update: &ArticleUpdate, now: DateTime<Utc>) {
        if let Some(title) = &update.title {
            self.title.clone_from(title);
        }
        macro_rules! merge {
            ($($field:ident),*) => {
                $(if let Some(value) = &update.$field {
                    self.$field = value.clone();
                })*
            };
        }
        merge!(
            slug,
            summary,
            content,
            image_url,
            source_url,
            author,
            published_at
        );
        if self.is_published() && !self.has_slug() {
            self.slug = Some(generate_slug(&self.title));
        }
        self.updated_at = Some(now);
    }
}

/// A partial update to an article.
///
/// Outer `None` leaves a field alone; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleUpdate {
    /// New headline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New slug.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub slug: Option<Option<String>>,
    /// New teaser.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub summary: Option<Option<String>>,
    /// New body.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub content: Option<Option<String>>,
    /// New image.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub image_url: Option<Option<String>>,
    /// New source link.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub source_url: Option<Option<String>>,
    /// New byline.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub author: Option<Option<String>>,
    /// New publish time.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub published_at: Option<Option<DateTime<Utc>>>,
}

impl ArticleUpdate {
    /// Whether the update touches nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.slug.is_none()
            && self.summary.is_none()
            && self.content.is_none()
            && self.image_url.is_none()
            && self.source_url.is_none()
            && self.author.is_none()
            && self.published_at.is_none()
    }

    /// Reduces the update to the fields that differ from `article`.
    ///
    /// Blank strings count as cleared.
    #[must_use]
    pub fn changes_against(&self, article: &NewsArticle) -> Self {
        fn text(
            value: Option<&Option<String>>,
            current: Option<&String>,
        ) -> Option<Option<String>> {
            let value = value?;
            let normalised = value.as_deref().map(str::trim).filter(|s| !s.is_empty());
            (normalised != current.map(String::as_str)).then(|| normalised.map(ToString::to_string))
        }

        Self {
            title: self
                .title
                .as_ref()
                .filter(|title| **title != article.title)
                .cloned(),
            slug: text(self.slug.as_ref(), article.slug.as_ref()),
            summary: text(self.summary.as_ref(), article.summary.as_ref()),
            content: text(self.content.as_ref(), article.content.as_ref()),
            image_url: text(self.image_url.as_ref(), article.image_url.as_ref()),
            source_url: text(self.source_url.as_ref(), article.source_url.as_ref()),
            author: text(self.author.as_ref(), article.author.as_ref()),
            published_at: self
                .published_at
                .filter(|at| *at != article.published_at),
        }
    }
}

/// A new draft article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDraft {
    /// Headline.
    pub title: String,
    /// URL slug.
    pub slug: String,
    /// Teaser.
    pub summary: Option<String>,
    /// Body.
    pub content: Option<String>,
}

impl NewDraft {
    /// Starts a draft for a topic. The slug is derived from the topic.
    #[must_use]
    pub fn from_topic(topic: &str) -> Self {
        let title = topic.trim().to_string();
        Self {
            slug: generate_slug(&title),
            summary: None,
            content: None,
            title,
        }
    }
}

/// Editorial ordering: drafts first, then newest first.
pub fn sort_for_desk(articles: &mut [NewsArticle]) {
    articles.sort_by(|a, b| {
        let drafts_first =
            (a.status != ArticleStatus::Draft).cmp(&(b.status != ArticleStatus::Draft));
        drafts_first.then_with(|| b.created_at.cmp(&a.created_at))
    });
}

mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<T: Serialize, S: Serializer>(
        value: &Option<Option<T>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T: Deserialize<'de>, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Option<T>>, D::Error> {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use test_case::test_case;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 3, 12, 0, 0).unwrap()
    }

    fn draft(author: Option<&str>) -> NewsArticle {
        NewsArticle {
            id: 7,
            title: "Champion Announces Retirement".to_string(),
            slug: None,
            summary: None,
            content: Some("First.\n\n\nSecond.\n\n".to_string()),
            image_url: None,
            source_url: None,
            author: author.map(ToString::to_string),
            published_at: None,
            status: ArticleStatus::Draft,
            created_at: None,
            updated_at: None,
        }
    }

    #[test_case(None; "missing")]
    #[test_case(Some(""); "empty")]
    #[test_case(Some("   "); "blank")]
    fn publishing_without_author_is_rejected(author: Option<&str>) {
        let mut article = draft(author);

        assert!(!article.can_publish());
        assert_eq!(
            article.publish(None, now()),
            Err(PublishError::MissingAuthor)
        );
        assert_eq!(article.status, ArticleStatus::Draft);
        assert_eq!(article.published_at, None);
    }

    #[test]
    fn publishing_becomes_available_once_author_is_set() {
        let mut article = draft(None);
        assert!(!article.can_publish());

        article.author = Some("Jane Doe".to_string());

        assert!(article.can_publish());
        article.publish(None, now()).unwrap();
        assert_eq!(article.status, ArticleStatus::Published);
        assert_eq!(article.published_at, Some(now()));
    }

    #[test]
    fn explicit_publish_time_is_kept() {
        let mut article = draft(Some("Jane"));
        let at = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();

        article.publish(Some(at), now()).unwrap();

        assert_eq!(article.published_at, Some(at));
    }

    #[test]
    fn only_published_articles_can_be_unpublished() {
        let mut article = draft(Some("Jane"));
        assert_eq!(
            article.unpublish(now()),
            Err(UnpublishError::NotPublished(ArticleStatus::Draft))
        );

        article.publish(None, now()).unwrap();
        article.unpublish(now()).unwrap();
        assert_eq!(article.status, ArticleStatus::Draft);
        assert_eq!(article.published_at, None);
    }

    #[test]
    fn paragraphs_skip_blank_runs() {
        assert_eq!(draft(None).paragraphs(), ["First.", "Second."]);
    }

    #[test]
    fn publishing_fills_a_missing_slug_and_trims_the_byline() {
        let mut article = draft(Some("  Jane Doe "));
        article.slug = Some("  ".to_string());

        article.publish(None, now()).unwrap();

        assert_eq!(article.slug.as_deref(), Some("champion-announces-retirement"));
        assert_eq!(article.author.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn publishing_keeps_a_stored_slug() {
        let mut article = draft(Some("Jane"));
        article.slug = Some("retirement".to_string());

        article.publish(None, now()).unwrap();

        assert_eq!(article.slug.as_deref(), Some("retirement"));
    }

    #[test]
    fn clearing_the_slug_of_a_published_article_derives_a_new_one() {
        let mut article = draft(Some("Jane"));
        article.publish(None, now()).unwrap();

        article.apply(
            &ArticleUpdate {
                slug: Some(None),
                ..ArticleUpdate::default()
            },
            now(),
        );

        assert_eq!(article.slug.as_deref(), Some("champion-announces-retirement"));
    }

    #[test]
    fn drafts_may_drop_their_slug() {
        let mut article = draft(Some("Jane"));
        article.slug = Some("retirement".to_string());

        article.apply(
            &ArticleUpdate {
                slug: Some(None),
                ..ArticleUpdate::default()
            },
            now(),
        );

        assert_eq!(article.slug, None);
    }

    #[test]
    fn link_slug_is_derived_from_title() {
        assert_eq!(draft(None).link_slug(), "champion-announces-retirement");
    }

    #[test]
    fn changes_against_drops_unchanged_fields() {
        let mut article = draft(Some("Jane"));
        article.summary = Some("Old".to_string());
        let update = ArticleUpdate {
            title: Some(article.title.clone()),
            summary: Some(Some("Old".to_string())),
            author: Some(Some("John".to_string())),
            image_url: Some(Some(String::new())),
            ..ArticleUpdate::default()
        };

        let changes = update.changes_against(&article);

        assert_eq!(
            changes,
            ArticleUpdate {
                author: Some(Some("John".to_string())),
                ..ArticleUpdate::default()
            }
        );
    }

    #[test]
    fn clearing_a_field_is_a_change() {
        let mut article = draft(Some("Jane"));
        article.summary = Some("Old".to_string());
        let update = ArticleUpdate {
            summary: Some(Some(String::new())),
            ..ArticleUpdate::default()
        };

        assert_eq!(update.changes_against(&article).summary, Some(None));
    }

    #[test]
    fn update_json_distinguishes_null_from_absent() {
        let update: ArticleUpdate =
            serde_json::from_str(r#"{"summary": null, "author": "Jane"}"#).unwrap();

        assert_eq!(update.summary, Some(None));
        assert_eq!(update.author, Some(Some("Jane".to_string())));
        assert_eq!(update.content, None);
    }

    #[test]
    fn apply_merges_present_fields() {
        let mut article = draft(None);
        article.apply(
            &ArticleUpdate {
                author: Some(Some("Jane".to_string())),
                content: Some(None),
                ..ArticleUpdate::default()
            },
            now(),
        );

        assert_eq!(article.author.as_deref(), Some("Jane"));
        assert_eq!(article.content, None);
        assert_eq!(article.updated_at, Some(now()));
    }

    #[test]
    fn desk_order_puts_drafts_first_then_newest() {
        let at = |day| Some(Utc.with_ymd_and_hms(2025, 4, day, 0, 0, 0).unwrap());
        let mut articles = vec![
            NewsArticle {
                id: 1,
                status: ArticleStatus::Published,
                created_at: at(5),
                ..draft(None)
            },
            NewsArticle {
                id: 2,
                created_at: at(1),
                ..draft(None)
            },
            NewsArticle {
                id: 3,
                created_at: at(3),
                ..draft(None)
            },
        ];

        sort_for_desk(&mut articles);

        let ids: Vec<_> = articles.iter().map(|a| a.id).collect();
        assert_eq!(ids, [3, 2, 1]);
    }
}
