use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::{domain::Config, storage::Catalog};

/// How often a page is expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    /// Changes every day.
    Daily,
    /// Changes every week.
    Weekly,
    /// Changes every month.
    Monthly,
    /// Changes every year.
    Yearly,
}

impl ChangeFrequency {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

/// One `<url>` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    /// Absolute URL.
    pub loc: String,
    /// Last modification time.
    pub last_modified: DateTime<Utc>,
    /// Expected change frequency.
    pub change_frequency: ChangeFrequency,
    /// Relative priority between 0 and 1.
    pub priority: f32,
}

const STATIC_PAGES: &[(&str, ChangeFrequency, f32)] = &[
    ("/", ChangeFrequency::Daily, 1.0),
    ("/events", ChangeFrequency::Daily, 0.9),
    ("/fighters", ChangeFrequency::Daily, 0.9),
    ("/news", ChangeFrequency::Daily, 0.9),
    ("/glossary", ChangeFrequency::Monthly, 0.8),
    ("/community", ChangeFrequency::Daily, 0.8),
    ("/about", ChangeFrequency::Monthly, 0.7),
    ("/faq", ChangeFrequency::Monthly, 0.7),
    ("/privacy", ChangeFrequency::Yearly, 0.5),
];

/// Every indexable page: the static pages followed by each published
/// event, fighter and article.
pub async fn build_sitemap(
    catalog: &Catalog,
    config: &Config,
    now: DateTime<Utc>,
    article_limit: u32,
) -> Vec<SitemapEntry> {
    let entry = |path: &str, last_modified, change_frequency, priority| SitemapEntry {
        loc: config.absolute_url(path),
        last_modified,
        change_frequency,
        priority,
    };

    let mut entries: Vec<_> = STATIC_PAGES
        .iter()
        .map(|&(path, frequency, priority)| entry(path, now, frequency, priority))
        .collect();

    for event in catalog.fetch_published_events().await {
        entries.push(entry(
            &format!("/events/{}", event.id),
            event.updated_at.unwrap_or(now),
            ChangeFrequency::Daily,
            0.8,
        ));
    }
    for fighter in catalog.fighters() {
        entries.push(entry(
            &format!("/fighters/{}", fighter.id),
            now,
            ChangeFrequency::Weekly,
            0.8,
        ));
    }
    for article in catalog.fetch_published_articles(article_limit).await {
        entries.push(entry(
            &format!("/news/{}", article.link_slug()),
            article.updated_at.or(article.published_at).unwrap_or(now),
            ChangeFrequency::Monthly,
            0.7,
        ));
    }
    entries
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Renders entries as a sitemap XML document.
#[must_use]
pub fn render_sitemap(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        // Writing to a String cannot fail.
        let _ = write!(
            xml,
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            escape(&entry.loc),
            entry.last_modified.to_rfc3339_opts(SecondsFormat::Secs, true),
            entry.change_frequency.as_str(),
            entry.priority,
        );
    }
    xml.push_str("</urlset>\n");
    xml
}

/// The `robots.txt` body.
#[must_use]
pub fn robots_txt(config: &Config) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /admin/\nDisallow: /api/\n\nSitemap: {}\n",
        config.absolute_url("/sitemap.xml")
    )
}
