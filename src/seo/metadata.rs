use serde::Serialize;

use crate::domain::Config;

/// Site name used in titles and structured data.
pub const SITE_NAME: &str = "mma.box";

/// Image shared when a page has none of its own.
const DEFAULT_IMAGE: &str = "/android-chrome-512x512.png";

/// Crawler directive for a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Robots {
    /// Index the page and follow its links.
    #[default]
    Index,
    /// Keep the page out of the index but follow its links.
    NoIndex,
}

impl Robots {
    /// Value of the `robots` meta tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index, follow",
            Self::NoIndex => "noindex, follow",
        }
    }
}

/// The `<head>` metadata of a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMeta {
    /// Document title.
    pub title: String,
    /// Meta description.
    pub description: String,
    /// Meta keywords.
    pub keywords: Vec<String>,
    /// Absolute canonical URL.
    pub canonical: String,
    /// Open Graph object type.
    pub og_type: &'static str,
    /// Absolute Open Graph image URL.
    pub og_image: String,
    /// Crawler directive.
    pub robots: &'static str,
}

impl PageMeta {
    /// Metadata for the page at `path`.
    #[must_use]
    pub fn new(
        config: &Config,
        path: &str,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            keywords: Vec::new(),
            canonical: config.absolute_url(path),
            og_type: "website",
            og_image: config.absolute_url(DEFAULT_IMAGE),
            robots: Robots::Index.as_str(),
        }
    }

    /// Adds keywords.
    #[must_use]
    pub fn keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords
            .extend(keywords.iter().map(ToString::to_string));
        self
    }

    /// Marks the page as an article.
    #[must_use]
    pub const fn article(mut self) -> Self {
        self.og_type = "article";
        self
    }

    /// Uses a page-specific share image. Relative paths are made absolute.
    #[must_use]
    pub fn image(mut self, config: &Config, image: Option<&str>) -> Self {
        if let Some(image) = image.filter(|image| !image.is_empty()) {
            self.og_image = if image.starts_with("http") {
                image.to_string()
            } else {
                config.absolute_url(image)
            };
        }
        self
    }

    /// Keeps the page out of search indexes.
    #[must_use]
    pub const fn noindex(mut self) -> Self {
        self.robots = Robots::NoIndex.as_str();
        self
    }

    /// Shortens the description to at most 160 characters on a word boundary.
    #[must_use]
    pub fn truncate_description(mut self) -> Self {
        const MAX: usize = 160;
        if self.description.chars().count() > MAX {
            let cut: String = self.description.chars().take(MAX - 1).collect();
            let cut = cut.rsplit_once(' ').map_or(cut.as_str(), |(head, _)| head);
            self.description = format!("{}…", cut.trim_end_matches([',', '.', ';', ':']));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_and_image_are_absolute() {
        let config = Config::default();
        let meta = PageMeta::new(&config, "/events", "Events", "All events")
            .image(&config, Some("/posters/ufc-298.png"));

        assert_eq!(meta.canonical, "https://www.mma.box/events");
        assert_eq!(meta.og_image, "https://www.mma.box/posters/ufc-298.png");
        assert_eq!(meta.robots, "index, follow");
    }

    #[test]
    fn noindex_pages() {
        let meta = PageMeta::new(&Config::default(), "/missing", "Page Not Found", "").noindex();
        assert_eq!(meta.robots, "noindex, follow");
    }

    #[test]
    fn long_descriptions_are_truncated_on_words() {
        let long = "word ".repeat(60);
        let meta = PageMeta::new(&Config::default(), "/", "t", long).truncate_description();

        assert!(meta.description.chars().count() <= 160);
        assert!(meta.description.ends_with("word…"));
    }
}
