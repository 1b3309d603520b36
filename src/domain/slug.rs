//! URL slugs.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9-]+").expect("valid regex"));
static HYPHENS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").expect("valid regex"));

/// Converts free text into a URL-safe slug.
///
/// The result is lowercase, uses hyphens between words, and contains only
/// `[a-z0-9-]`. Accents are stripped (`é` becomes `e`); other characters
/// outside that set are dropped. Text that leaves nothing behind produces
/// `untitled-<unix millis>` so the slug is never empty.
///
/// ```
/// use mmabox::domain::generate_slug;
///
/// assert_eq!(generate_slug("UFC 298: Volkanovski vs. Topuria"), "ufc-298-volkanovski-vs-topuria");
/// assert_eq!(generate_slug("José Aldo"), "jose-aldo");
/// assert!(generate_slug("").starts_with("untitled-"));
/// ```
#[must_use]
pub fn generate_slug(text: &str) -> String {
    let slug = slugify(text);
    if slug.is_empty() {
        format!("untitled-{}", Utc::now().timestamp_millis())
    } else {
        slug
    }
}

fn slugify(text: &str) -> String {
    let stripped: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    let hyphenated = WHITESPACE.replace_all(stripped.trim(), "-");
    let cleaned = NON_SLUG.replace_all(&hyphenated, "");
    let collapsed = HYPHENS.replace_all(&cleaned, "-");

    collapsed.trim_matches('-').to_string()
}
