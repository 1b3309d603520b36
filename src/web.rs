//! The HTTP front end.
//!
//! [`router`] mounts every page, the sitemap, the countdown API and, when an
//! admin token is configured, the news desk API. Pages are rendered from
//! templates embedded in the binary.

use std::{fmt, net::SocketAddr, sync::Arc};

use axum::{Router, response::Html, routing::get};
use chrono::{DateTime, Datelike, Utc};
use tera::{Context, Tera};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;

use crate::{
    domain::{Config, DateFormatter, Fighter},
    seo::{Crumb, JsonLd, PageMeta, SITE_NAME, schema},
    storage::{Catalog, Clock, ContentStore, NewsDesk},
    wallet::{self, WalletConnector},
};

mod admin;
pub use admin::DeskResponse;

mod api;
pub use api::CountdownResponse;

mod error;
pub use error::PageError;

mod pages;
mod templates;
mod views;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    catalog: Catalog,
    desk: NewsDesk,
    wallet: Arc<dyn WalletConnector>,
    templates: Arc<Tera>,
    clock: Clock,
    dates: DateFormatter,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("catalog", &self.catalog)
            .field("wallet", &self.wallet)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Assembles the state over a content store.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded templates fail to parse.
    pub fn new(
        config: Config,
        store: Arc<dyn ContentStore>,
        fighters: Vec<Fighter>,
        clock: Clock,
    ) -> Result<Self, tera::Error> {
        let wallet = wallet::from_config(&config.wallet, config.site_url());
        Ok(Self {
            catalog: Catalog::new(Arc::clone(&store), fighters),
            desk: NewsDesk::new(store, Arc::clone(&clock)),
            wallet,
            templates: Arc::new(templates::load()?),
            dates: DateFormatter::new(config.timezone()),
            config: Arc::new(config),
            clock,
        })
    }

    /// The site configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read access to published content.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Editorial actions.
    #[must_use]
    pub const fn desk(&self) -> &NewsDesk {
        &self.desk
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn render(
        &self,
        template: &str,
        page: Page,
        mut context: Context,
    ) -> Result<Html<String>, PageError> {
        let Page {
            path,
            meta,
            crumbs,
            mut schemas,
        } = page;
        if crumbs.len() > 1 {
            schemas.push(schema::breadcrumb_list(&crumbs, &self.config));
        }
        let scripts: Vec<String> = schemas.iter().map(JsonLd::to_script).collect();
        let wallet = self
            .wallet
            .bootstrap(&path)
            .and_then(|bootstrap| serde_json::to_string(&bootstrap).ok())
            .map(|json| json.replace("</", "<\\/"));

        context.insert("meta", &meta);
        context.insert("crumbs", &crumbs);
        context.insert("schemas", &scripts);
        context.insert("wallet", &wallet);
        context.insert("site_name", SITE_NAME);
        context.insert("year", &self.now().year());

        Ok(Html(self.templates.render(template, &context)?))
    }

    /// The 404 page for `path`.
    fn not_found(&self, path: &str) -> PageError {
        let meta = PageMeta::new(
            &self.config,
            path,
            format!("Page Not Found | {SITE_NAME}"),
            "The page you are looking for could not be found.",
        )
        .noindex();
        let mut context = Context::new();
        context.insert("path", path);

        match self.render("not_found.html", Page::new(path, meta), context) {
            Ok(Html(body)) => PageError::NotFound(body),
            Err(error) => {
                tracing::error!(%error, "Failed to render the not-found page");
                PageError::NotFound(error::PLAIN_NOT_FOUND.to_string())
            }
        }
    }
}

/// What the base layout needs besides the page's own context.
struct Page {
    path: String,
    meta: PageMeta,
    crumbs: Vec<Crumb>,
    schemas: Vec<JsonLd>,
}

impl Page {
    fn new(path: &str, meta: PageMeta) -> Self {
        Self {
            path: path.to_string(),
            meta,
            crumbs: Vec::new(),
            schemas: Vec::new(),
        }
    }

    /// Sets the breadcrumb trail. The homepage crumb is prepended.
    fn crumbs(mut self, crumbs: impl IntoIterator<Item = Crumb>) -> Self {
        self.crumbs = std::iter::once(Crumb::new("Home", "/")).chain(crumbs).collect();
        self
    }

    fn schema(mut self, schema: JsonLd) -> Self {
        self.schemas.push(schema);
        self
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/", get(pages::home))
        .route("/events", get(pages::events))
        .route("/events/{id}", get(pages::event))
        .route("/news", get(pages::news))
        .route("/news/{slug}", get(pages::article))
        .route("/fighters", get(pages::fighters))
        .route("/fighters/{id}", get(pages::fighter))
        .route("/glossary", get(pages::glossary))
        .route("/faq", get(pages::faq))
        .route("/about", get(pages::about))
        .route("/privacy", get(pages::privacy))
        .route("/community", get(pages::community))
        .route("/sitemap.xml", get(pages::sitemap))
        .route("/robots.txt", get(pages::robots))
        .route("/api/events/{id}/countdown", get(api::countdown));

    match state.config.admin_token.as_deref().map(str::trim) {
        Some(token) if !token.is_empty() => {
            app = app.nest("/admin", admin::router(token));
        }
        _ => tracing::debug!("No admin token configured; admin API disabled"),
    }

    app.fallback(pages::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the site on `bind` until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(state: AppState, bind: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(error) => {
                tracing::error!(%error, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(error) => {
                tracing::error!(%error, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
