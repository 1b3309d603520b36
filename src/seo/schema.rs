//! schema.org JSON-LD documents.

use serde_json::{Value, json};

use super::SITE_NAME;
use crate::domain::{
    Config, Event, Fighter, NewsArticle,
    glossary::{self, Faq},
};

const LOGO: &str = "/android-chrome-512x512.png";

/// A JSON-LD document.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonLd(Value);

impl JsonLd {
    /// Serialises the document for embedding in a `<script>` element.
    ///
    /// `</` is written as `<\/` so content cannot close the element early.
    #[must_use]
    pub fn to_script(&self) -> String {
        self.0.to_string().replace("</", "<\\/")
    }
}

fn document(kind: &str, body: Value) -> JsonLd {
    let mut value = json!({
        "@context": "https://schema.org",
        "@type": kind,
    });
    if let (Some(target), Value::Object(fields)) = (value.as_object_mut(), body) {
        target.extend(fields);
    }
    JsonLd(value)
}

/// The organisation behind the site.
#[must_use]
pub fn organization(config: &Config) -> JsonLd {
    document(
        "Organization",
        json!({
            "name": SITE_NAME,
            "url": config.site_url(),
            "logo": config.absolute_url(LOGO),
            "description": "The ultimate MMA hub for fans and fighters, featuring live events, fighter stats, news, and community.",
            "sameAs": [
                "https://twitter.com/mmabox",
                "https://instagram.com/mmabox",
                "https://youtube.com/mmabox",
                "https://facebook.com/mmabox",
            ],
            "foundingDate": "2023-01-01",
            "address": { "@type": "PostalAddress", "addressCountry": "US" },
        }),
    )
}

/// The website itself.
#[must_use]
pub fn website(config: &Config) -> JsonLd {
    document(
        "WebSite",
        json!({
            "url": config.site_url(),
            "name": "mma.box - Your Ultimate MMA Destination",
            "description": "Follow live MMA events, fighter stats, breaking news, and exclusive content in one place.",
            "inLanguage": "en-US",
            "publisher": {
                "@type": "Organization",
                "name": SITE_NAME,
                "logo": {
                    "@type": "ImageObject",
                    "url": config.absolute_url(LOGO),
                    "width": 512,
                    "height": 512,
                },
            },
        }),
    )
}

/// The site as a sports organisation.
#[must_use]
pub fn sports_organization(config: &Config) -> JsonLd {
    document(
        "SportsOrganization",
        json!({
            "name": SITE_NAME,
            "url": config.site_url(),
            "logo": config.absolute_url(LOGO),
            "sport": "Mixed Martial Arts",
            "description": "Providing comprehensive coverage of mixed martial arts events, fighters, and news across all major promotions",
        }),
    )
}

/// An event and its headline bout.
#[must_use]
pub fn sports_event(event: &Event, config: &Config) -> JsonLd {
    let mut body = json!({
        "name": event.title(),
        "url": config.absolute_url(&format!("/events/{}", event.id)),
        "description": event.description.clone().unwrap_or_else(|| match &event.main_card {
            Some(main) => format!("Watch {main} and other exciting fights at {}", event.title()),
            None => format!("{} fight card, start time and how to watch", event.title()),
        }),
        "sport": "Mixed Martial Arts",
        "organizer": { "@type": "Organization", "name": event.league },
        "eventStatus": "https://schema.org/EventScheduled",
    });
    if let Some(date) = event.date {
        body["startDate"] = json!(date.to_rfc3339());
    }
    if let Some(location) = &event.location {
        body["location"] = json!({
            "@type": "Place",
            "name": location,
            "address": { "@type": "PostalAddress", "addressLocality": location },
        });
    }
    if let Some((red, blue)) = event.headliners() {
        body["competitor"] = json!([
            { "@type": "Person", "name": red },
            { "@type": "Person", "name": blue },
        ]);
    }
    if let Some(image) = &event.image_url {
        body["image"] = json!(image);
    }
    if let Some(tickets) = &event.ticket_link {
        body["offers"] = json!({ "@type": "Offer", "url": tickets });
    }
    document("SportsEvent", body)
}

/// A news article.
#[must_use]
pub fn news_article(article: &NewsArticle, config: &Config) -> JsonLd {
    let url = config.absolute_url(&format!("/news/{}", article.link_slug()));
    let mut body = json!({
        "headline": article.title,
        "url": url,
        "mainEntityOfPage": url,
        "description": article.summary,
        "author": {
            "@type": "Person",
            "name": article.author.as_deref().unwrap_or(SITE_NAME),
        },
        "publisher": {
            "@type": "Organization",
            "name": SITE_NAME,
            "logo": { "@type": "ImageObject", "url": config.absolute_url(LOGO) },
        },
    });
    if let Some(published) = article.published_at {
        body["datePublished"] = json!(published.to_rfc3339());
    }
    if let Some(modified) = article.updated_at.or(article.published_at) {
        body["dateModified"] = json!(modified.to_rfc3339());
    }
    if let Some(image) = &article.image_url {
        body["image"] = json!(image);
    }
    document("NewsArticle", body)
}

/// A fighter profile.
#[must_use]
pub fn person(fighter: &Fighter, config: &Config) -> JsonLd {
    let mut body = json!({
        "name": fighter.name,
        "url": config.absolute_url(&format!("/fighters/{}", fighter.id)),
        "jobTitle": "Mixed Martial Artist",
        "description": fighter.bio.clone().unwrap_or_else(|| {
            format!(
                "{} {} fighter with a record of {}",
                fighter.name, fighter.division, fighter.record
            )
        }),
    });
    if let Some(country) = &fighter.country {
        body["nationality"] = json!({ "@type": "Country", "name": country });
    }
    if let Some(team) = &fighter.team {
        body["memberOf"] = json!({ "@type": "SportsTeam", "name": team });
    }
    if let Some(height) = &fighter.height {
        body["height"] = json!(height);
    }
    if let Some(weight) = &fighter.weight {
        body["weight"] = json!(weight);
    }
    document("Person", body)
}

/// Questions and answers.
#[must_use]
pub fn faq_page(entries: &[Faq]) -> JsonLd {
    let questions: Vec<_> = entries
        .iter()
        .map(|faq| {
            json!({
                "@type": "Question",
                "name": faq.question,
                "acceptedAnswer": { "@type": "Answer", "text": faq.answer },
            })
        })
        .collect();
    document("FAQPage", json!({ "mainEntity": questions }))
}

/// The glossary.
#[must_use]
pub fn defined_term_set() -> JsonLd {
    let terms: Vec<_> = glossary::all_terms()
        .map(|term| {
            json!({
                "@type": "DefinedTerm",
                "name": term.term,
                "description": term.definition,
            })
        })
        .collect();
    document(
        "DefinedTermSet",
        json!({
            "name": "MMA Glossary",
            "description": "Comprehensive glossary of Mixed Martial Arts terms and techniques",
            "definedTerm": terms,
        }),
    )
}

/// A breadcrumb trail entry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Crumb {
    /// Text shown.
    pub label: String,
    /// Site path.
    pub path: String,
}

impl Crumb {
    /// Creates a crumb.
    pub fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

/// The trail from the homepage to the current page, which comes last.
#[must_use]
pub fn breadcrumb_list(crumbs: &[Crumb], config: &Config) -> JsonLd {
    let items: Vec<_> = crumbs
        .iter()
        .zip(1..)
        .map(|(crumb, position): (&Crumb, u32)| {
            json!({
                "@type": "ListItem",
                "position": position,
                "item": { "@id": config.absolute_url(&crumb.path), "name": crumb.label },
            })
        })
        .collect();
    document("BreadcrumbList", json!({ "itemListElement": items }))
}
