use axum::{
    extract::{Path, Query, State},
    http::{Uri, header},
    response::{Html, IntoResponse},
};
use serde::Deserialize;
use tera::Context;
use tracing::instrument;

use super::{
    AppState, Page, PageError,
    views::{
        self, AccountView, ArticleSummary, BoutView, CountdownView, EventSummary, FighterCard,
    },
};
use crate::{
    domain::{
        Event,
        fighter::{self, ALL_DIVISIONS},
        glossary,
    },
    seo::{self, Crumb, PageMeta, SITE_NAME, schema},
    wallet::{Account, Address, COMMUNITY_PATH},
};

/// Articles listed in the sitemap.
const SITEMAP_ARTICLE_LIMIT: u32 = 1000;

type PageResult = Result<Html<String>, PageError>;

/// Parses a positive numeric id from a path segment.
pub(super) fn parse_id(raw: &str) -> Option<i64> {
    raw.parse().ok().filter(|id| *id > 0)
}

#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> PageResult {
    let config = state.config();
    let upcoming = state
        .catalog()
        .fetch_upcoming_published_events(config.upcoming_limit)
        .await;
    let news = state
        .catalog()
        .fetch_latest_news(config.latest_news_limit)
        .await;
    let fighters: Vec<_> = state
        .catalog()
        .fighters()
        .iter()
        .filter(|fighter| fighter.featured)
        .map(FighterCard::from)
        .collect();

    let next = upcoming.first();
    let meta = PageMeta::new(
        config,
        "/",
        format!("{SITE_NAME} - Your Ultimate MMA Destination"),
        "Follow live MMA events, fighter stats, breaking news, and exclusive content. The ultimate hub for mixed martial arts fans.",
    )
    .keywords(&["MMA", "UFC", "mixed martial arts", "fight card", "MMA news", "MMA fighters"]);
    let mut page = Page::new("/", meta)
        .schema(schema::organization(config))
        .schema(schema::website(config))
        .schema(schema::sports_organization(config));
    if let Some(event) = next {
        page = page.schema(schema::sports_event(event, config));
    }

    let mut context = Context::new();
    context.insert(
        "next_event",
        &next.map(|event| EventSummary::new(event, &state.dates)),
    );
    context.insert(
        "countdown",
        &next
            .and_then(|event| event.date)
            .map(|date| CountdownView::new(date, state.now())),
    );
    context.insert(
        "upcoming",
        &upcoming
            .iter()
            .map(|event| EventSummary::new(event, &state.dates))
            .collect::<Vec<_>>(),
    );
    context.insert(
        "news",
        &news
            .iter()
            .map(|article| ArticleSummary::new(article, &state.dates))
            .collect::<Vec<_>>(),
    );
    context.insert("fighters", &fighters);

    state.render("home.html", page, context)
}

#[instrument(skip(state))]
pub async fn events(State(state): State<AppState>) -> PageResult {
    let now = state.now();
    let (upcoming, mut past): (Vec<_>, Vec<_>) = state
        .catalog()
        .fetch_published_events()
        .await
        .into_iter()
        .partition(|event| event.date.is_none_or(|date| date >= now));
    past.reverse();

    let summaries = |events: &[Event]| -> Vec<EventSummary> {
        events
            .iter()
            .map(|event| EventSummary::new(event, &state.dates))
            .collect()
    };

    let meta = PageMeta::new(
        state.config(),
        "/events",
        format!("MMA Events & Fight Cards | {SITE_NAME}"),
        "Upcoming and recent MMA events with full fight cards, start times, locations and how to watch.",
    )
    .keywords(&["MMA events", "UFC schedule", "fight cards", "MMA schedule"]);
    let page = Page::new("/events", meta).crumbs([Crumb::new("Events", "/events")]);

    let mut context = Context::new();
    context.insert("upcoming", &summaries(&upcoming));
    context.insert("past", &summaries(&past));
    state.render("events.html", page, context)
}

#[instrument(skip(state))]
pub async fn event(State(state): State<AppState>, Path(raw_id): Path<String>) -> PageResult {
    let path = format!("/events/{raw_id}");
    let Some(id) = parse_id(&raw_id) else {
        tracing::debug!(raw_id, "Rejected event id");
        return Err(state.not_found(&path));
    };
    let Some(event) = state.catalog().fetch_published_event_by_id(id).await else {
        return Err(state.not_found(&path));
    };
    let path = format!("/events/{}", event.id);
    let config = state.config();

    let description = event.description.clone().unwrap_or_else(|| {
        let date = state.dates.format_day(event.date);
        match &event.main_card {
            Some(main) => format!(
                "{}: {main}. {date}. Full fight card, start time and how to watch.",
                event.title()
            ),
            None => format!(
                "{}. {date}. Full fight card, start time and how to watch.",
                event.title()
            ),
        }
    });
    let meta = PageMeta::new(
        config,
        &path,
        format!("{} | {SITE_NAME}", event.title()),
        &description,
    )
    .keywords(&[event.league.as_str(), event.title(), "fight card", "MMA"])
        .image(config, event.image_url.as_deref())
        .truncate_description();
    let page = Page::new(&path, meta)
        .crumbs([
            Crumb::new("Events", "/events"),
            Crumb::new(event.title(), path.clone()),
        ])
        .schema(schema::sports_event(&event, config));

    let card: Vec<BoutView> = event.ordered_card().iter().map(BoutView::from).collect();
    let mut context = Context::new();
    context.insert("event", &EventSummary::new(&event, &state.dates));
    context.insert("description", &event.description);
    context.insert("card", &card);
    context.insert(
        "countdown",
        &event.date.map(|date| CountdownView::new(date, state.now())),
    );
    context.insert("how_to_watch", &event.how_to_watch);
    context.insert("how_to_watch_url", &event.how_to_watch_url);
    context.insert("ticket_link", &event.ticket_link);
    state.render("event.html", page, context)
}

#[instrument(skip(state))]
pub async fn news(State(state): State<AppState>) -> PageResult {
    let articles = state
        .catalog()
        .fetch_published_articles(state.config().news_page_limit)
        .await;

    let meta = PageMeta::new(
        state.config(),
        "/news",
        format!("MMA News | {SITE_NAME}"),
        "Breaking MMA news, fight announcements, results and analysis.",
    )
    .keywords(&["MMA news", "UFC news", "fight announcements"]);
    let page = Page::new("/news", meta).crumbs([Crumb::new("News", "/news")]);

    let mut context = Context::new();
    context.insert(
        "articles",
        &articles
            .iter()
            .map(|article| ArticleSummary::new(article, &state.dates))
            .collect::<Vec<_>>(),
    );
    state.render("news.html", page, context)
}

#[instrument(skip(state))]
pub async fn article(State(state): State<AppState>, Path(slug): Path<String>) -> PageResult {
    let path = format!("/news/{slug}");
    let Some(article) = state.catalog().fetch_published_article_by_slug(&slug).await else {
        return Err(state.not_found(&path));
    };
    let config = state.config();
    let paragraphs = article.paragraphs();

    let description = article
        .summary
        .clone()
        .or_else(|| paragraphs.first().map(ToString::to_string))
        .unwrap_or_else(|| article.title.clone());
    let meta = PageMeta::new(config, &path, format!("{} | {SITE_NAME}", article.title), description)
        .article()
        .keywords(&["MMA news", "UFC", "mixed martial arts"])
        .image(config, article.image_url.as_deref())
        .truncate_description();
    let page = Page::new(&path, meta)
        .crumbs([
            Crumb::new("News", "/news"),
            Crumb::new(article.title.clone(), path.clone()),
        ])
        .schema(schema::news_article(&article, config));

    let mut context = Context::new();
    context.insert("article", &ArticleSummary::new(&article, &state.dates));
    context.insert("paragraphs", &paragraphs);
    context.insert("source_url", &article.source_url);
    state.render("article.html", page, context)
}

/// Query string of the fighter list.
#[derive(Debug, Default, Deserialize)]
pub struct FighterFilter {
    #[serde(default)]
    q: String,
    division: Option<String>,
}

#[instrument(skip(state))]
pub async fn fighters(
    State(state): State<AppState>,
    Query(filter): Query<FighterFilter>,
) -> PageResult {
    let roster = state.catalog().fighters();
    let matches: Vec<FighterCard> =
        fighter::filter_fighters(roster, &filter.q, filter.division.as_deref())
            .into_iter()
            .map(FighterCard::from)
            .collect();

    let meta = PageMeta::new(
        state.config(),
        "/fighters",
        format!("MMA Fighters | {SITE_NAME}"),
        "Profiles, records and stats for MMA fighters across every division.",
    )
    .keywords(&["MMA fighters", "UFC fighters", "fighter stats", "fighter records"]);
    let page = Page::new("/fighters", meta).crumbs([Crumb::new("Fighters", "/fighters")]);

    let mut context = Context::new();
    context.insert("fighters", &matches);
    context.insert("divisions", &fighter::divisions(roster));
    context.insert("search", &filter.q);
    context.insert(
        "selected_division",
        filter.division.as_deref().unwrap_or(ALL_DIVISIONS),
    );
    state.render("fighters.html", page, context)
}

#[instrument(skip(state))]
pub async fn fighter(State(state): State<AppState>, Path(raw_id): Path<String>) -> PageResult {
    let path = format!("/fighters/{raw_id}");
    let Some(fighter) = parse_id(&raw_id).and_then(|id| state.catalog().fighter(id)) else {
        return Err(state.not_found(&path));
    };
    let config = state.config();
    let path = format!("/fighters/{}", fighter.id);

    let description = fighter.bio.clone().unwrap_or_else(|| {
        format!(
            "{} is a {} fighter with a professional record of {}.",
            fighter.name, fighter.division, fighter.record
        )
    });
    let meta = PageMeta::new(config, &path, format!("{} | {SITE_NAME}", fighter.name), description)
        .keywords(&[fighter.name.as_str(), fighter.division.as_str(), "MMA fighter"])
        .image(config, fighter.image.as_deref())
        .truncate_description();
    let page = Page::new(&path, meta)
        .crumbs([
            Crumb::new("Fighters", "/fighters"),
            Crumb::new(fighter.name.clone(), path.clone()),
        ])
        .schema(schema::person(fighter, config));

    let mut context = Context::new();
    context.insert("fighter", fighter);
    context.insert("initials", &fighter.initials());
    context.insert("stats", &fighter.stats());
    state.render("fighter.html", page, context)
}

#[instrument(skip(state))]
pub async fn glossary(State(state): State<AppState>) -> PageResult {
    let meta = PageMeta::new(
        state.config(),
        "/glossary",
        format!("MMA Glossary | {SITE_NAME}"),
        "Definitions of MMA terms and techniques, from striking and grappling to submissions and scoring.",
    )
    .keywords(&["MMA glossary", "MMA terms", "BJJ terms", "MMA techniques"]);
    let page = Page::new("/glossary", meta)
        .crumbs([Crumb::new("Glossary", "/glossary")])
        .schema(schema::defined_term_set());

    let index = views::glossary_index();
    let letters: Vec<char> = index.iter().map(|group| group.letter).collect();
    let mut context = Context::new();
    context.insert("categories", &views::glossary_categories());
    context.insert("letters", &letters);
    context.insert("index", &index);
    state.render("glossary.html", page, context)
}

#[instrument(skip(state))]
pub async fn faq(State(state): State<AppState>) -> PageResult {
    let meta = PageMeta::new(
        state.config(),
        "/faq",
        format!("Frequently Asked Questions | {SITE_NAME}"),
        "Answers to common questions about mma.box, fight schedules and MMA rules.",
    );
    let page = Page::new("/faq", meta)
        .crumbs([Crumb::new("FAQ", "/faq")])
        .schema(schema::faq_page(glossary::FAQ));

    let mut context = Context::new();
    context.insert("faq", glossary::FAQ);
    state.render("faq.html", page, context)
}

#[instrument(skip(state))]
pub async fn about(State(state): State<AppState>) -> PageResult {
    let meta = PageMeta::new(
        state.config(),
        "/about",
        format!("About | {SITE_NAME}"),
        "mma.box is a home for MMA fans: fight cards, fighter profiles, news and more.",
    );
    let page = Page::new("/about", meta).crumbs([Crumb::new("About", "/about")]);
    state.render("about.html", page, Context::new())
}

#[instrument(skip(state))]
pub async fn privacy(State(state): State<AppState>) -> PageResult {
    let meta = PageMeta::new(
        state.config(),
        "/privacy",
        format!("Privacy Policy | {SITE_NAME}"),
        "How mma.box handles your data.",
    );
    let page = Page::new("/privacy", meta).crumbs([Crumb::new("Privacy", "/privacy")]);
    state.render("privacy.html", page, Context::new())
}

/// Query string of the community page, set by the wallet SDK once an
/// account is connected.
#[derive(Debug, Default, Deserialize)]
pub struct ConnectedAccount {
    address: Option<String>,
    ens: Option<String>,
}

impl ConnectedAccount {
    fn account(&self) -> Option<Result<Account, String>> {
        let raw = self.address.as_deref().filter(|raw| !raw.trim().is_empty())?;
        Some(
            raw.parse::<Address>()
                .map(|address| Account {
                    address,
                    ens_name: self.ens.clone(),
                })
                .map_err(|error| error.to_string()),
        )
    }
}

#[instrument(skip(state))]
pub async fn community(
    State(state): State<AppState>,
    Query(connected): Query<ConnectedAccount>,
) -> PageResult {
    let meta = PageMeta::new(
        state.config(),
        COMMUNITY_PATH,
        format!("Community | {SITE_NAME}"),
        "Join the mma.box community of fight fans.",
    )
    .keywords(&["MMA community", "MMA fans", "fight fans"]);
    let page =
        Page::new(COMMUNITY_PATH, meta).crumbs([Crumb::new("Community", COMMUNITY_PATH)]);

    let enabled = state.wallet.is_enabled();
    let bootstrap = state.wallet.bootstrap(COMMUNITY_PATH);
    let mut context = Context::new();
    context.insert("wallet_enabled", &enabled);
    if enabled {
        match connected.account() {
            Some(Ok(account)) => context.insert("account", &AccountView::from(&account)),
            Some(Err(reason)) => {
                tracing::debug!(%reason, "Ignoring malformed wallet address");
                context.insert("wallet_error", &reason);
            }
            None => {}
        }
    }
    context.insert(
        "networks",
        &bootstrap.map(|bootstrap| bootstrap.networks).unwrap_or_default(),
    );
    state.render("community.html", page, context)
}

#[instrument(skip(state))]
pub async fn sitemap(State(state): State<AppState>) -> impl IntoResponse {
    let entries = seo::build_sitemap(
        state.catalog(),
        state.config(),
        state.now(),
        SITEMAP_ARTICLE_LIMIT,
    )
    .await;
    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        seo::render_sitemap(&entries),
    )
}

pub async fn robots(State(state): State<AppState>) -> String {
    seo::robots_txt(state.config())
}

pub async fn not_found(State(state): State<AppState>, uri: Uri) -> PageError {
    tracing::debug!(path = uri.path(), "No route");
    state.not_found(uri.path())
}
